//! Handler for `POST /user` (account creation behind HTTP Basic).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use farmlog_core::error::CoreError;
use farmlog_core::validate;
use farmlog_db::models::user::{CreateUser, User};
use farmlog_db::repositories::UserRepo;

use crate::auth::basic::{credentials_match, parse_basic_credentials};
use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Minimum accepted password length for new accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// POST /user
///
/// Create a user account. Guarded by HTTP Basic against the operator
/// credentials from configuration, not by a bearer token; a taken username
/// is a 400 conflict.
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    check_basic_auth(&state, &headers)?;

    validate::username(&input.username).map_err(AppError::Core)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(&state.pool, &input.username, &password_hash).await?;

    tracing::info!(user_id = user.id, "User account created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Verify the `Authorization: Basic` header against the configured operator
/// credentials.
fn check_basic_auth(state: &AppState, headers: &HeaderMap) -> AppResult<()> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    let (username, password) = parse_basic_credentials(header).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Basic <credentials>".into(),
        ))
    })?;

    let username_ok = credentials_match(&username, &state.config.admin_username);
    let password_ok = credentials_match(&password, &state.config.admin_password);
    if !(username_ok && password_ok) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Incorrect username or password".into(),
        )));
    }
    Ok(())
}
