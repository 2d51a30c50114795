use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::user;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 50))]
    pub user_id: String,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub password: Option<String>,
    #[validate(length(max = 50))]
    pub user_group: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub password: Option<String>,
    #[validate(length(max = 50))]
    pub user_group: Option<String>,
}

/// User representation returned to callers. The stored credential is never
/// serialized.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub name: Option<String>,
    pub user_group: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            user_id: model.user_id,
            name: model.name,
            user_group: model.user_group,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateRequest {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthenticateResponse {
    pub message: String,
    pub user_id: String,
}
