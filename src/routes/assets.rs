use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

/// Serve a compiled-in file from `assets/`.
pub async fn serve(Path(path): Path<String>) -> Response {
    let Some(file) = Assets::get(&path) else {
        tracing::debug!(path, "Asset not found");
        return StatusCode::NOT_FOUND.into_response();
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        file.data.to_vec(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_revalidation_script_as_javascript() {
        let response = serve(Path("js/revalidate.js".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.contains("javascript"));
    }

    #[tokio::test]
    async fn unknown_asset_is_404() {
        let response = serve(Path("nope.txt".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    fn template_classes(dir: &std::path::Path, classes: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                template_classes(&path, classes);
                continue;
            }
            let html = std::fs::read_to_string(&path).unwrap();
            for chunk in html.split("class=\"").skip(1) {
                let value = chunk.split('"').next().unwrap_or_default();
                classes.extend(
                    value
                        .split_whitespace()
                        .filter(|c| !c.contains('{'))
                        .map(str::to_string),
                );
            }
        }
    }

    #[test]
    fn stylesheet_defines_every_template_class() {
        let css = Assets::get("css/output.css").expect("stylesheet is generated at build time");
        let css = String::from_utf8_lossy(&css.data);

        let mut classes = Vec::new();
        template_classes(
            &std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("templates"),
            &mut classes,
        );
        classes.sort();
        classes.dedup();

        assert!(!classes.is_empty());
        for class in classes {
            assert!(css.contains(&format!(".{}", class)), "no rule for .{}", class);
        }
    }
}
