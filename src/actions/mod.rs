//! Entry points used by the HTML forms and GraphQL: validate, call the
//! repository, then signal revalidation once the write has committed.
//! Repository failures come back wrapped with the name of the action.

pub mod thread;
pub mod user;

pub use thread::{add_reply, create_thread, fetch_thread, fetch_threads, get_activity};
pub use user::{fetch_user, fetch_user_threads, fetch_users, update_user, PROFILE_EDIT_PATH};

use thiserror::Error;
use validator::ValidationErrors;

use crate::db::RepositoryError;
use crate::validation::describe;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid input: {}", describe(.0))]
    Invalid(#[from] ValidationErrors),

    #[error("{context}: {source}")]
    Failed {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ActionError {
    fn wrap(context: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| {
            tracing::warn!("{}: {}", context, source);
            Self::Failed { context, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Failed { source, .. } if source.is_not_found())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Failed {
                source: RepositoryError::Conflict(_),
                ..
            }
        )
    }
}
