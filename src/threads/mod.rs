pub mod domain;
pub mod repository;

pub use domain::{NewThread, PopulatedThread, Thread, ThreadId};
pub use repository::{DynThreadRepository, SqliteThreadRepository, ThreadRepository};
