// Repository pattern - isolates all database side effects for threads
use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{
    format_timestamp, placeholders, read_timestamp, with_transaction, RepositoryError,
    MAX_IN_PARAMS,
};
use crate::pagination::{Page, Pagination};
use crate::state::DbPool;
use crate::threads::domain::*;
use crate::users::{AuthorSummary, UserId};

const THREAD_COLUMNS: &str = "id, text, author_id, parent_id, community_id, created_at";

/// Repository trait - all thread database operations
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Create a top-level thread and append it to the author's thread list
    async fn create_thread(&self, new_thread: NewThread) -> Result<Thread, RepositoryError>;

    /// Newest top-level threads, each with its author and one level of replies
    async fn list_top_level_threads(
        &self,
        pagination: Pagination,
    ) -> Result<Page<PopulatedThread>, RepositoryError>;

    /// A thread with its replies and their replies, every level with authors
    async fn get_thread_by_id(
        &self,
        id: &ThreadId,
    ) -> Result<Option<PopulatedThread>, RepositoryError>;

    /// Attach a new reply to `parent_id`. Fails without writing if the parent is missing.
    async fn add_reply(
        &self,
        parent_id: &ThreadId,
        text: &str,
        author_id: &UserId,
    ) -> Result<Thread, RepositoryError>;

    /// Replies by other users to anything `user_id` has posted
    async fn get_activity(&self, user_id: &UserId)
        -> Result<Vec<PopulatedThread>, RepositoryError>;
}

/// SQLite implementation
pub struct SqliteThreadRepository {
    pool: DbPool,
}

impl SqliteThreadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ThreadRepository for SqliteThreadRepository {
    async fn create_thread(&self, new_thread: NewThread) -> Result<Thread, RepositoryError> {
        let conn = self.pool.get()?;

        // The thread row and the author's list entry land together or not at all
        let thread = with_transaction(&conn, |conn| {
            ensure_user_exists(conn, &new_thread.author_id)?;

            let thread = insert_thread(
                conn,
                &new_thread.text,
                &new_thread.author_id,
                None,
                new_thread.community_id.clone(),
            )?;

            conn.execute(
                "INSERT INTO user_threads (user_id, thread_id) VALUES (?1, ?2)",
                params![thread.author_id.as_str(), thread.id.as_str()],
            )?;

            Ok::<_, RepositoryError>(thread)
        })?;

        tracing::debug!(thread_id = %thread.id, author_id = %thread.author_id, "Created thread");
        Ok(thread)
    }

    async fn list_top_level_threads(
        &self,
        pagination: Pagination,
    ) -> Result<Page<PopulatedThread>, RepositoryError> {
        let conn = self.pool.get()?;

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM threads WHERE parent_id IS NULL",
            [],
            |row| row.get(0),
        )?;

        let threads = {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM threads
                 WHERE parent_id IS NULL
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?1 OFFSET ?2",
                THREAD_COLUMNS
            ))?;
            let rows = stmt
                .query_map(
                    params![pagination.limit() as i64, pagination.skip() as i64],
                    thread_from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let threads = attach_children(&conn, threads)?;
        let populated = populate(&conn, threads, 1)?;

        Ok(Page::new(populated, total.max(0) as u64, pagination))
    }

    async fn get_thread_by_id(
        &self,
        id: &ThreadId,
    ) -> Result<Option<PopulatedThread>, RepositoryError> {
        let conn = self.pool.get()?;

        let threads = load_threads(&conn, std::slice::from_ref(id))?;
        if threads.is_empty() {
            return Ok(None);
        }

        Ok(populate(&conn, threads, 2)?.pop())
    }

    async fn add_reply(
        &self,
        parent_id: &ThreadId,
        text: &str,
        author_id: &UserId,
    ) -> Result<Thread, RepositoryError> {
        let conn = self.pool.get()?;

        let reply = with_transaction(&conn, |conn| {
            ensure_thread_exists(conn, parent_id)?;
            ensure_user_exists(conn, author_id)?;

            let reply = insert_thread(conn, text, author_id, Some(parent_id), None)?;

            conn.execute(
                "INSERT INTO thread_children (parent_id, child_id) VALUES (?1, ?2)",
                params![parent_id.as_str(), reply.id.as_str()],
            )?;

            Ok::<_, RepositoryError>(reply)
        })?;

        tracing::debug!(reply_id = %reply.id, parent_id = %parent_id, "Added reply");
        Ok(reply)
    }

    async fn get_activity(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PopulatedThread>, RepositoryError> {
        let conn = self.pool.get()?;

        let replies = {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM threads
                 WHERE id IN (
                     SELECT c.child_id FROM thread_children c
                     JOIN threads p ON p.id = c.parent_id
                     WHERE p.author_id = ?1
                 )
                 AND author_id != ?1
                 ORDER BY created_at DESC, rowid DESC",
                THREAD_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![user_id.as_str()], thread_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let replies = attach_children(&conn, replies)?;
        populate(&conn, replies, 0)
    }
}

/// Type alias for Arc-wrapped repository (for AppState)
pub type DynThreadRepository = Arc<dyn ThreadRepository>;

fn thread_from_row(row: &Row<'_>) -> rusqlite::Result<Thread> {
    Ok(Thread {
        id: ThreadId(row.get(0)?),
        text: row.get(1)?,
        author_id: UserId(row.get(2)?),
        parent_id: row.get::<_, Option<String>>(3)?.map(ThreadId),
        community_id: row.get(4)?,
        created_at: read_timestamp(row, 5)?,
        children: Vec::new(),
    })
}

fn insert_thread(
    conn: &Connection,
    text: &str,
    author_id: &UserId,
    parent_id: Option<&ThreadId>,
    community_id: Option<String>,
) -> Result<Thread, RepositoryError> {
    let thread = Thread {
        id: ThreadId::generate(),
        text: text.to_string(),
        author_id: author_id.clone(),
        parent_id: parent_id.cloned(),
        community_id,
        created_at: Utc::now().trunc_subsecs(6),
        children: Vec::new(),
    };

    conn.execute(
        "INSERT INTO threads (id, text, author_id, parent_id, community_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            thread.id.as_str(),
            thread.text,
            thread.author_id.as_str(),
            thread.parent_id.as_ref().map(|p| p.as_str()),
            thread.community_id,
            format_timestamp(thread.created_at),
        ],
    )?;

    Ok(thread)
}

fn ensure_user_exists(conn: &Connection, user_id: &UserId) -> Result<(), RepositoryError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE id = ?1",
        params![user_id.as_str()],
        |row| row.get(0),
    )?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound(format!("user {}", user_id)))
    }
}

fn ensure_thread_exists(conn: &Connection, thread_id: &ThreadId) -> Result<(), RepositoryError> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM threads WHERE id = ?1",
        params![thread_id.as_str()],
        |row| row.get(0),
    )?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound(format!("thread {}", thread_id)))
    }
}

/// Fill in each thread's ordered child list.
fn attach_children(conn: &Connection, threads: Vec<Thread>) -> Result<Vec<Thread>, RepositoryError> {
    if threads.is_empty() {
        return Ok(threads);
    }

    let mut by_parent: HashMap<String, Vec<ThreadId>> = HashMap::new();
    {
        let ids: Vec<&str> = threads.iter().map(|t| t.id.as_str()).collect();
        for batch in ids.chunks(MAX_IN_PARAMS) {
            let sql = format!(
                "SELECT parent_id, child_id FROM thread_children WHERE parent_id IN ({}) ORDER BY seq",
                placeholders(batch.len())
            );

            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(batch.iter()))?;
            while let Some(row) = rows.next()? {
                let parent_id: String = row.get(0)?;
                by_parent
                    .entry(parent_id)
                    .or_default()
                    .push(ThreadId(row.get(1)?));
            }
        }
    }

    Ok(threads
        .into_iter()
        .map(|mut thread| {
            thread.children = by_parent.remove(thread.id.as_str()).unwrap_or_default();
            thread
        })
        .collect())
}

/// Load threads by id, returned in the order of `ids`. Unknown ids are skipped.
pub(crate) fn load_threads(
    conn: &Connection,
    ids: &[ThreadId],
) -> Result<Vec<Thread>, RepositoryError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<String, Thread> = HashMap::with_capacity(ids.len());
    for batch in ids.chunks(MAX_IN_PARAMS) {
        let sql = format!(
            "SELECT {} FROM threads WHERE id IN ({})",
            THREAD_COLUMNS,
            placeholders(batch.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(batch.iter().map(|id| id.as_str())), thread_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        by_id.extend(rows.into_iter().map(|t| (t.id.0.clone(), t)));
    }

    let ordered: Vec<Thread> = ids.iter().filter_map(|id| by_id.remove(id.as_str())).collect();
    attach_children(conn, ordered)
}

fn load_authors(
    conn: &Connection,
    threads: &[Thread],
) -> Result<HashMap<String, AuthorSummary>, RepositoryError> {
    let mut ids: Vec<&str> = threads.iter().map(|t| t.author_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut authors = HashMap::with_capacity(ids.len());
    for batch in ids.chunks(MAX_IN_PARAMS) {
        let sql = format!(
            "SELECT id, external_id, name, username, image FROM users WHERE id IN ({})",
            placeholders(batch.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(batch.iter()), |row| {
                Ok(AuthorSummary {
                    id: UserId(row.get(0)?),
                    external_id: row.get(1)?,
                    name: row.get(2)?,
                    username: row.get(3)?,
                    image: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        authors.extend(rows.into_iter().map(|a| (a.id.0.clone(), a)));
    }

    Ok(authors)
}

/// Resolve authors for `threads` and replies down `depth` levels, one batch
/// of queries per level.
pub(crate) fn populate(
    conn: &Connection,
    threads: Vec<Thread>,
    depth: usize,
) -> Result<Vec<PopulatedThread>, RepositoryError> {
    let authors = load_authors(conn, &threads)?;

    let mut resolved: HashMap<String, PopulatedThread> = if depth > 0 {
        let child_ids: Vec<ThreadId> = threads
            .iter()
            .flat_map(|t| t.children.iter().cloned())
            .collect();
        let children = load_threads(conn, &child_ids)?;
        populate(conn, children, depth - 1)?
            .into_iter()
            .map(|p| (p.thread.id.0.clone(), p))
            .collect()
    } else {
        HashMap::new()
    };

    threads
        .into_iter()
        .map(|thread| -> Result<PopulatedThread, RepositoryError> {
            let author = authors
                .get(thread.author_id.as_str())
                .cloned()
                .ok_or_else(|| RepositoryError::NotFound(format!("user {}", thread.author_id)))?;
            let replies = thread
                .children
                .iter()
                .filter_map(|id| resolved.remove(id.as_str()))
                .collect();
            Ok(PopulatedThread {
                thread,
                author,
                replies,
            })
        })
        .collect()
}
