// Repository pattern - isolates all database side effects for users
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{
    format_timestamp, is_constraint_violation, placeholders, read_timestamp, RepositoryError,
    MAX_IN_PARAMS,
};
use crate::pagination::Page;
use crate::state::DbPool;
use crate::threads::repository::{load_threads, populate};
use crate::threads::ThreadId;
use crate::users::domain::*;

const USER_COLUMNS: &str = "id, external_id, username, name, bio, image, onboarded, created_at";

/// Repository trait - all user database operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create the user on first save, otherwise overwrite their profile fields.
    /// Always marks the user onboarded.
    async fn upsert_user(&self, profile: &UserProfile) -> Result<User, RepositoryError>;

    /// Load a user by external id
    async fn get_user(&self, external_id: &str) -> Result<Option<User>, RepositoryError>;

    /// Load a user with their threads, each thread's replies, and each reply's author
    async fn get_user_with_threads(
        &self,
        external_id: &str,
    ) -> Result<Option<UserWithThreads>, RepositoryError>;

    /// Paginated search over everyone except the requester
    async fn search_users(&self, search: &SearchUsers) -> Result<Page<User>, RepositoryError>;
}

/// SQLite implementation
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<User, RepositoryError> {
        let conn = self.pool.get()?;
        let username = profile.normalized_username();

        let result = conn.execute(
            "INSERT INTO users (id, external_id, username, name, bio, image, onboarded, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)
             ON CONFLICT(external_id) DO UPDATE SET
               username = excluded.username,
               name = excluded.name,
               bio = excluded.bio,
               image = excluded.image,
               onboarded = 1",
            params![
                UserId::generate().as_str(),
                profile.external_id,
                username,
                profile.name,
                profile.bio,
                profile.image,
                format_timestamp(Utc::now().trunc_subsecs(6)),
            ],
        );

        match result {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => {
                return Err(RepositoryError::Conflict(format!(
                    "username '{}' is already taken",
                    username
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let user = find_user(&conn, &profile.external_id)?.ok_or_else(|| {
            RepositoryError::NotFound(format!("user {}", profile.external_id))
        })?;

        tracing::debug!(user_id = %user.id, username = %user.username, "Saved user profile");
        Ok(user)
    }

    async fn get_user(&self, external_id: &str) -> Result<Option<User>, RepositoryError> {
        let conn = self.pool.get()?;
        find_user(&conn, external_id)
    }

    async fn get_user_with_threads(
        &self,
        external_id: &str,
    ) -> Result<Option<UserWithThreads>, RepositoryError> {
        let conn = self.pool.get()?;

        let Some(user) = find_user(&conn, external_id)? else {
            return Ok(None);
        };

        let threads = load_threads(&conn, &user.threads)?;
        let threads = populate(&conn, threads, 1)?;

        Ok(Some(UserWithThreads { user, threads }))
    }

    async fn search_users(&self, search: &SearchUsers) -> Result<Page<User>, RepositoryError> {
        let conn = self.pool.get()?;

        let mut filter = String::from("external_id != ?");
        let mut values = vec![Value::Text(search.requester_id.clone())];

        let text = search.search_text.trim();
        if !text.is_empty() {
            filter.push_str(
                " AND (fold_case(username) LIKE ? ESCAPE '\\' OR fold_case(name) LIKE ? ESCAPE '\\')",
            );
            let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
            values.push(Value::Text(pattern.clone()));
            values.push(Value::Text(pattern));
        }

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM users WHERE {}", filter),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let order = search.sort_order.as_sql();
        let sql = format!(
            "SELECT {} FROM users WHERE {} ORDER BY created_at {}, rowid {} LIMIT ? OFFSET ?",
            USER_COLUMNS, filter, order, order
        );
        values.push(Value::Integer(search.pagination.limit() as i64));
        values.push(Value::Integer(search.pagination.skip() as i64));

        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map(params_from_iter(values.iter()), user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        let users = attach_threads(&conn, users)?;

        Ok(Page::new(users, total.max(0) as u64, search.pagination))
    }
}

/// Type alias for Arc-wrapped repository (for AppState)
pub type DynUserRepository = Arc<dyn UserRepository>;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get(0)?),
        external_id: row.get(1)?,
        username: row.get(2)?,
        name: row.get(3)?,
        bio: row.get(4)?,
        image: row.get(5)?,
        onboarded: row.get(6)?,
        created_at: read_timestamp(row, 7)?,
        threads: Vec::new(),
    })
}

fn find_user(conn: &Connection, external_id: &str) -> Result<Option<User>, RepositoryError> {
    let result = conn.query_row(
        &format!("SELECT {} FROM users WHERE external_id = ?1", USER_COLUMNS),
        params![external_id],
        user_from_row,
    );

    match result {
        Ok(user) => Ok(attach_threads(conn, vec![user])?.pop()),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn attach_threads(conn: &Connection, users: Vec<User>) -> Result<Vec<User>, RepositoryError> {
    if users.is_empty() {
        return Ok(users);
    }

    let mut by_user: HashMap<String, Vec<ThreadId>> = HashMap::new();
    {
        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        for batch in ids.chunks(MAX_IN_PARAMS) {
            let sql = format!(
                "SELECT user_id, thread_id FROM user_threads WHERE user_id IN ({}) ORDER BY seq",
                placeholders(batch.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(batch.iter()))?;
            while let Some(row) = rows.next()? {
                let user_id: String = row.get(0)?;
                by_user
                    .entry(user_id)
                    .or_default()
                    .push(ThreadId(row.get(1)?));
            }
        }
    }

    Ok(users
        .into_iter()
        .map(|mut user| {
            user.threads = by_user.remove(user.id.as_str()).unwrap_or_default();
            user
        })
        .collect())
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::pagination::Pagination;
    use crate::threads::{NewThread, SqliteThreadRepository, ThreadRepository};
    use tempfile::TempDir;

    fn create_test_repo() -> (SqliteUserRepository, DbPool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = db::create_pool(&db_path).unwrap();
        db::run_migrations(&pool).unwrap();

        (SqliteUserRepository::new(pool.clone()), pool, temp_dir)
    }

    fn profile(external_id: &str, username: &str, name: &str) -> UserProfile {
        UserProfile {
            external_id: external_id.to_string(),
            username: username.to_string(),
            name: name.to_string(),
            bio: String::new(),
            image: format!("/img/{}.png", external_id),
        }
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_record() {
        let (repo, pool, _temp) = create_test_repo();

        let first = repo
            .upsert_user(&profile("ext-1", "alice", "Alice"))
            .await
            .unwrap();
        let mut update = profile("ext-1", "alice2", "Alice Two");
        update.bio = "hello".into();
        let second = repo.upsert_user(&update).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.username, "alice2");
        assert_eq!(second.name, "Alice Two");
        assert_eq!(second.bio, "hello");
        assert!(second.onboarded);

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_username_is_stored_lowercase() {
        let (repo, _pool, _temp) = create_test_repo();

        repo.upsert_user(&profile("ext-1", "AliCE", "Alice"))
            .await
            .unwrap();

        let stored = repo.get_user("ext-1").await.unwrap().unwrap();
        assert_eq!(stored.username, "alice");
    }

    #[tokio::test]
    async fn test_username_taken_by_someone_else_conflicts() {
        let (repo, _pool, _temp) = create_test_repo();

        repo.upsert_user(&profile("ext-1", "alice", "Alice"))
            .await
            .unwrap();
        let result = repo.upsert_user(&profile("ext-2", "ALICE", "Imposter")).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert!(repo.get_user("ext-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_missing_user_returns_none() {
        let (repo, _pool, _temp) = create_test_repo();
        assert!(repo.get_user("nobody").await.unwrap().is_none());
        assert!(repo.get_user_with_threads("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_excludes_requester() {
        let (repo, _pool, _temp) = create_test_repo();
        repo.upsert_user(&profile("me", "me", "Me")).await.unwrap();
        repo.upsert_user(&profile("ext-1", "alice", "Alice"))
            .await
            .unwrap();

        let page = repo.search_users(&SearchUsers::new("me")).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].external_id, "ext-1");
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_search_matches_username_or_name_case_insensitively() {
        let (repo, _pool, _temp) = create_test_repo();
        repo.upsert_user(&profile("ext-1", "alice", "Wonderland"))
            .await
            .unwrap();
        repo.upsert_user(&profile("ext-2", "bob", "Alice Cooper"))
            .await
            .unwrap();
        repo.upsert_user(&profile("ext-3", "carol", "Carol"))
            .await
            .unwrap();

        let page = repo
            .search_users(&SearchUsers::new("me").with_search_text("ALI"))
            .await
            .unwrap();
        let mut found: Vec<&str> = page.items.iter().map(|u| u.external_id.as_str()).collect();
        found.sort();
        assert_eq!(found, vec!["ext-1", "ext-2"]);
    }

    #[tokio::test]
    async fn test_search_folds_accented_capitals() {
        let (repo, _pool, _temp) = create_test_repo();
        repo.upsert_user(&profile("ext-1", "elodie", "Élodie"))
            .await
            .unwrap();
        repo.upsert_user(&profile("ext-2", "otto", "Ärger"))
            .await
            .unwrap();

        for query in ["élo", "ÉLO", "Élodie"] {
            let page = repo
                .search_users(&SearchUsers::new("me").with_search_text(query))
                .await
                .unwrap();
            assert_eq!(page.items.len(), 1, "query {}", query);
            assert_eq!(page.items[0].external_id, "ext-1");
        }

        let page = repo
            .search_users(&SearchUsers::new("me").with_search_text("äRG"))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].external_id, "ext-2");
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let (repo, _pool, _temp) = create_test_repo();
        repo.upsert_user(&profile("ext-1", "alice", "Alice"))
            .await
            .unwrap();
        repo.upsert_user(&profile("ext-2", "under_score", "U"))
            .await
            .unwrap();

        let percent = repo
            .search_users(&SearchUsers::new("me").with_search_text("%"))
            .await
            .unwrap();
        assert!(percent.items.is_empty());

        let underscore = repo
            .search_users(&SearchUsers::new("me").with_search_text("_"))
            .await
            .unwrap();
        assert_eq!(underscore.items.len(), 1);
        assert_eq!(underscore.items[0].username, "under_score");
    }

    #[tokio::test]
    async fn test_search_paginates_with_has_more() {
        let (repo, _pool, _temp) = create_test_repo();
        for i in 0..5 {
            repo.upsert_user(&profile(&format!("ext-{}", i), &format!("user{}", i), "U"))
                .await
                .unwrap();
        }

        let search = SearchUsers::new("me").with_pagination(Pagination::new(1, 2));
        let first = repo.search_users(&search).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.has_more);

        let last = repo
            .search_users(&search.clone().with_pagination(Pagination::new(3, 2)))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn test_search_sort_order() {
        let (repo, _pool, _temp) = create_test_repo();
        for i in 0..3 {
            repo.upsert_user(&profile(&format!("ext-{}", i), &format!("user{}", i), "U"))
                .await
                .unwrap();
        }

        let newest_first = repo.search_users(&SearchUsers::new("me")).await.unwrap();
        assert_eq!(newest_first.items[0].external_id, "ext-2");

        let oldest_first = repo
            .search_users(&SearchUsers::new("me").with_sort_order(SortOrder::Asc))
            .await
            .unwrap();
        assert_eq!(oldest_first.items[0].external_id, "ext-0");
    }

    #[tokio::test]
    async fn test_get_user_with_threads_populates_replies() {
        let (repo, pool, _temp) = create_test_repo();
        let threads = SqliteThreadRepository::new(pool);

        let alice = repo
            .upsert_user(&profile("ext-a", "alice", "Alice"))
            .await
            .unwrap();
        let bob = repo
            .upsert_user(&profile("ext-b", "bob", "Bob"))
            .await
            .unwrap();

        let first = threads
            .create_thread(NewThread::new("first post", alice.id.clone()))
            .await
            .unwrap();
        threads
            .create_thread(NewThread::new("second post", alice.id.clone()))
            .await
            .unwrap();
        threads
            .add_reply(&first.id, "nice one", &bob.id)
            .await
            .unwrap();

        let loaded = repo.get_user_with_threads("ext-a").await.unwrap().unwrap();
        assert_eq!(loaded.user.threads.len(), 2);
        assert_eq!(loaded.threads.len(), 2);
        assert_eq!(loaded.threads[0].thread.text, "first post");
        assert_eq!(loaded.threads[0].replies.len(), 1);
        assert_eq!(loaded.threads[0].replies[0].author.username, "bob");
        assert!(loaded.threads[1].replies.is_empty());
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }
}
