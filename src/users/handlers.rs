use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{gate::AuthUser, password, token::JwtKeys},
    error::ApiError,
    state::AppState,
    users::{
        dto::{
            DeleteUsersRequest, DeleteUsersResponse, LoginRequest, LoginResponse,
            RegisterRequest, RegisteredUser, StatusUpdateRequest, StatusUpdateResponse,
            UserListItem,
        },
        repo::{self, UserStatus},
    },
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).delete(delete_users))
        .route("/users/status", patch(update_status))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn affects_self(user_ids: &[Uuid], actor: Uuid) -> bool {
    user_ids.contains(&actor)
}

/// True iff the caller just revoked its own access.
fn self_blocked(user_ids: &[Uuid], actor: Uuid, status: UserStatus) -> bool {
    status == UserStatus::Blocked && affects_self(user_ids, actor)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.password.trim().is_empty() {
        warn!("register with empty password");
        return Err(ApiError::InvalidInput("Password cannot be empty".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidInput("Invalid email".into()));
    }

    let hash = password::hash_password(&payload.password).map_err(ApiError::Internal)?;

    // A duplicate email surfaces as a UNIQUE violation and is not
    // distinguished from other store failures in the response
    let user = repo::create(&state.db, &payload.name, &payload.email, &hash)
        .await
        .map_err(|e| {
            error!(error = %e, email = %payload.email, "create user failed");
            ApiError::RegistrationFailed
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            name: user.name,
            email: user.email,
            registration_time: user.registration_time,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = repo::find_by_email(&state.db, &payload.email)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    let ok = password::verify_password(&payload.password, &user.password_hash)
        .map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    // Blocked status is only revealed once the credentials check out
    if user.status == UserStatus::Blocked {
        warn!(user_id = %user.id, "login on blocked account");
        return Err(ApiError::Blocked);
    }

    repo::touch_last_login(&state.db, user.id)
        .await
        .map_err(ApiError::Internal)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name).map_err(ApiError::Internal)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        name: user.name,
    }))
}

#[instrument(skip(state, _auth))]
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<UserListItem>>, ApiError> {
    let users = repo::list(&state.db).await.map_err(ApiError::Internal)?;
    Ok(Json(users.into_iter().map(UserListItem::from).collect()))
}

#[instrument(skip(state, auth, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    if payload.user_ids.is_empty() {
        return Err(ApiError::InvalidInput(
            "userIds must be a non-empty array".into(),
        ));
    }
    let status = UserStatus::parse(&payload.status).ok_or_else(|| {
        ApiError::InvalidInput("Invalid status. Must be 'active' or 'blocked'".into())
    })?;

    let updated = repo::set_status(&state.db, &payload.user_ids, status)
        .await
        .map_err(ApiError::Internal)?;

    let self_blocked = self_blocked(&payload.user_ids, auth.user_id, status);
    if self_blocked {
        warn!(user_id = %auth.user_id, "caller blocked own account");
    }

    info!(updated, status = ?status, actor = %auth.user_id, "bulk status update");
    Ok(Json(StatusUpdateResponse {
        message: format!("Successfully updated {updated} users"),
        self_blocked,
    }))
}

#[instrument(skip(state, auth, payload))]
pub async fn delete_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<DeleteUsersRequest>,
) -> Result<Json<DeleteUsersResponse>, ApiError> {
    if payload.user_ids.is_empty() {
        return Err(ApiError::InvalidInput(
            "userIds must be a non-empty array".into(),
        ));
    }

    let deleted = repo::delete(&state.db, &payload.user_ids)
        .await
        .map_err(ApiError::Internal)?;
    if deleted == 0 {
        return Err(ApiError::NotFound(
            "No matching users found to delete".into(),
        ));
    }

    let self_deleted = affects_self(&payload.user_ids, auth.user_id);
    if self_deleted {
        warn!(user_id = %auth.user_id, "caller deleted own account");
    }

    info!(deleted, actor = %auth.user_id, "bulk delete");
    Ok(Json(DeleteUsersResponse {
        message: format!("Successfully deleted {deleted} users"),
        self_deleted,
    }))
}
