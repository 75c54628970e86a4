/// E2E tests for the feed
/// These tests run against a real server instance started with
/// STRANDS_DATABASE_URL pointing at a scratch database
use reqwest::Client;
use serde_json::json;

const BASE_URL: &str = "http://localhost:3000";

async fn graphql(
    client: &Client,
    query: String,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let response = client
        .post(format!("{}/graphql", BASE_URL))
        .json(&json!({ "query": query }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    Ok(response.json().await?)
}

#[tokio::test]
#[ignore] // Run with: cargo test --test e2e_feed -- --ignored
async fn test_feed_page_loads() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client.get(format!("{}/", BASE_URL)).send().await?;

    assert_eq!(response.status(), 200);
    let body = response.text().await?;
    assert!(body.contains("Strands"));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_post_and_reply_over_graphql() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let suffix = uuid::Uuid::now_v7().simple().to_string();
    let suffix = &suffix[suffix.len() - 8..];

    let mut ids = Vec::new();
    for who in ["poster", "replier"] {
        let body = graphql(
            &client,
            format!(
                r#"mutation {{ updateUser(input: {{ externalId: "e2e-{who}-{suffix}", username: "{who}{suffix}", name: "{who}", path: "/" }}) {{ id }} }}"#
            ),
        )
        .await?;
        ids.push(body["data"]["updateUser"]["id"].as_str().unwrap().to_string());
    }

    let body = graphql(
        &client,
        format!(
            r#"mutation {{ createThread(input: {{ text: "e2e thread", authorId: "{}", path: "/" }}) {{ id }} }}"#,
            ids[0]
        ),
    )
    .await?;
    let thread_id = body["data"]["createThread"]["id"].as_str().unwrap().to_string();

    graphql(
        &client,
        format!(
            r#"mutation {{ addReply(input: {{ threadId: "{thread_id}", text: "e2e reply", authorId: "{}", path: "/thread/{thread_id}" }}) {{ id }} }}"#,
            ids[1]
        ),
    )
    .await?;

    let page = client
        .get(format!("{}/thread/{}", BASE_URL, thread_id))
        .send()
        .await?
        .text()
        .await?;
    assert!(page.contains("e2e reply"));

    let body = graphql(
        &client,
        format!(r#"{{ activity(userId: "{}") {{ text }} }}"#, ids[0]),
    )
    .await?;
    assert_eq!(body["data"]["activity"][0]["text"], "e2e reply");

    Ok(())
}
