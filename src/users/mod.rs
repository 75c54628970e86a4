pub mod domain;
pub mod repository;

pub use domain::{
    AuthorSummary, SearchUsers, SortOrder, User, UserId, UserProfile, UserWithThreads,
};
pub use repository::{DynUserRepository, SqliteUserRepository, UserRepository};
