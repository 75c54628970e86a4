use validator::Validate;

use super::ActionError;
use crate::pagination::Page;
use crate::revalidate::Revalidate;
use crate::users::{SearchUsers, User, UserProfile, UserRepository, UserWithThreads};
use crate::validation::ProfileForm;

/// The only page whose cache a profile save invalidates.
pub const PROFILE_EDIT_PATH: &str = "/profile/edit";

pub async fn update_user(
    users: &dyn UserRepository,
    revalidator: &dyn Revalidate,
    form: ProfileForm,
    path: &str,
) -> Result<User, ActionError> {
    form.validate()?;

    let profile = UserProfile {
        external_id: form.external_id,
        username: form.username,
        name: form.name,
        bio: form.bio,
        image: form.image,
    };

    let user = users
        .upsert_user(&profile)
        .await
        .map_err(ActionError::wrap("Failed to create/update user"))?;

    if path == PROFILE_EDIT_PATH {
        revalidator.revalidate(path);
    }

    Ok(user)
}

pub async fn fetch_user(
    users: &dyn UserRepository,
    external_id: &str,
) -> Result<Option<User>, ActionError> {
    users
        .get_user(external_id)
        .await
        .map_err(ActionError::wrap("Failed to fetch user"))
}

pub async fn fetch_user_threads(
    users: &dyn UserRepository,
    external_id: &str,
) -> Result<Option<UserWithThreads>, ActionError> {
    users
        .get_user_with_threads(external_id)
        .await
        .map_err(ActionError::wrap("Failed to fetch user posts"))
}

pub async fn fetch_users(
    users: &dyn UserRepository,
    search: &SearchUsers,
) -> Result<Page<User>, ActionError> {
    users
        .search_users(search)
        .await
        .map_err(ActionError::wrap("Failed to fetch users"))
}
