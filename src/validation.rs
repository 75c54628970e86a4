//! Form rules checked before anything is written.

use serde::Deserialize;
use validator::Validate;

/// The post-thread form: a body and the account posting it.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ThreadForm {
    #[validate(length(min = 3, message = "Minimum of 3 characters"))]
    pub thread: String,

    #[serde(rename = "accountId")]
    #[validate(length(min = 1, message = "Account is required"))]
    pub account_id: String,
}

/// A reply body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 3, message = "Minimum of 3 characters"))]
    pub thread: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(rename = "externalId")]
    #[validate(length(min = 1, message = "Account is required"))]
    pub external_id: String,

    #[validate(length(min = 1, max = 30, message = "Username must be 1-30 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 30, message = "Name must be 1-30 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: String,

    #[serde(default)]
    pub image: String,
}

/// Flatten field errors into `field: message` lines for display.
pub fn describe(errors: &validator::ValidationErrors) -> String {
    let mut lines: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid", field),
            })
        })
        .collect();
    lines.sort();
    lines.join("; ")
}
