use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::{User, UserStatus};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub name: String,
}

/// Public fields of a freshly created account.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub registration_time: OffsetDateTime,
}

/// Public projection of a user row for the admin listing.
#[derive(Debug, Serialize)]
pub struct UserListItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub registration_time: OffsetDateTime,
    pub last_login: Option<OffsetDateTime>,
}

impl From<User> for UserListItem {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            status: u.status,
            registration_time: u.registration_time,
            last_login: u.last_login,
        }
    }
}

/// Request body for the bulk status update.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(rename = "userIds")]
    pub user_ids: Vec<Uuid>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    #[serde(rename = "selfBlocked")]
    pub self_blocked: bool,
}

/// Request body for the bulk delete.
#[derive(Debug, Deserialize)]
pub struct DeleteUsersRequest {
    #[serde(rename = "userIds")]
    pub user_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DeleteUsersResponse {
    pub message: String,
    #[serde(rename = "selfDeleted")]
    pub self_deleted: bool,
}
