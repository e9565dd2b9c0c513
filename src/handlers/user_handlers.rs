use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info, warn};

use crate::auth::{AccessToken, PasswordHasher, RefreshToken, TokenManager};
use crate::db::DbPool;
use crate::dto::{AccessTokenResponse, MessageResponse, TokenPairResponse, UserCredentialsDto, UserResponse};
use crate::errors::{ApiError, AuthError, AuthErrorBody, ErrorBody};
use crate::repo;
use crate::validation::{ValidatedJson, ValidatedPath};

/// Runs an Argon2 operation off the async worker threads
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce(PasswordHasher) -> Result<T, crate::auth::PasswordError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || work(PasswordHasher::new()))
        .await
        .map_err(anyhow::Error::from)?;
    Ok(result.map_err(anyhow::Error::from)?)
}

/// Handler for registering a new user
///
/// This function handles POST requests to `/register`. The password is
/// stored as an Argon2 hash.
#[utoipa::path(
    post,
    path = "/register",
    tag = "users",
    request_body = UserCredentialsDto,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Invalid payload or username taken", body = ErrorBody)
    )
)]
#[instrument(skip(pool, payload), fields(username = %payload.username))]
pub async fn register_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(payload): ValidatedJson<UserCredentialsDto>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    info!("Registering new user");

    let password = payload.password;
    let hash = blocking(move |hasher| hasher.hash(&password)).await?;

    let user = repo::create_user(&pool, &payload.username, &hash)
        .map_err(|e| ApiError::conflict_or_internal(e, "A user with that username already exists."))?;

    info!("Successfully registered user with id: {}", user.get_id());

    Ok((StatusCode::CREATED, Json(MessageResponse::new("User created successfully."))))
}

/// Handler for exchanging credentials for a token pair
///
/// This function handles POST requests to `/login`. The access token in the
/// pair is fresh.
#[utoipa::path(
    post,
    path = "/login",
    tag = "users",
    request_body = UserCredentialsDto,
    responses(
        (status = 200, description = "Fresh access token and refresh token", body = TokenPairResponse),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = AuthErrorBody)
    )
)]
#[instrument(skip(pool, tokens, payload), fields(username = %payload.username))]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    State(tokens): State<Arc<TokenManager>>,
    ValidatedJson(payload): ValidatedJson<UserCredentialsDto>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let Some(user) = repo::get_user_by_username(&pool, &payload.username)? else {
        debug!("Unknown username");
        return Err(AuthError::InvalidCredentials.into());
    };

    let password = payload.password;
    let stored = user.get_password_hash().to_string();
    if !blocking(move |hasher| hasher.verify(&password, &stored)).await? {
        debug!("Password mismatch");
        return Err(AuthError::InvalidCredentials.into());
    }

    let identity = user.get_id();
    let pair = TokenPairResponse {
        access_token: tokens.issue_access_token(identity, true)?,
        refresh_token: tokens.issue_refresh_token(identity)?,
    };

    info!("User {} logged in", identity);

    Ok(Json(pair))
}

/// Handler for minting a new access token from a refresh token
///
/// This function handles POST requests to `/refresh`. The new access token
/// is not fresh and the presented refresh token is revoked.
#[utoipa::path(
    post,
    path = "/refresh",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Non-fresh access token", body = AccessTokenResponse),
        (status = 401, description = "Missing, invalid or revoked refresh token", body = AuthErrorBody)
    )
)]
#[instrument(skip(tokens, claims), fields(sub = %claims.sub))]
pub async fn refresh_handler(
    State(tokens): State<Arc<TokenManager>>,
    RefreshToken(claims): RefreshToken,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let identity = claims.identity()?;

    // Only the request whose revoke inserts the jti may mint a token
    if !tokens.revoke(&claims) {
        warn!("Refresh token {} was already used", claims.jti);
        return Err(AuthError::TokenRevoked.into());
    }
    debug!("Revoked refresh token {}", claims.jti);

    let access_token = tokens.issue_access_token(identity, false)?;

    Ok(Json(AccessTokenResponse { access_token }))
}

/// Handler for revoking the presented access token
///
/// This function handles POST requests to `/logout`.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = AuthErrorBody)
    )
)]
#[instrument(skip(tokens, claims), fields(sub = %claims.sub))]
pub async fn logout_handler(
    State(tokens): State<Arc<TokenManager>>,
    AccessToken(claims): AccessToken,
) -> Result<Json<MessageResponse>, ApiError> {
    tokens.revoke(&claims);
    info!("Revoked access token {}", claims.jti);

    Ok(Json(MessageResponse::new("Successfully logged out.")))
}

/// Handler for listing all users
///
/// This function handles GET requests to `/user`.
#[utoipa::path(
    get,
    path = "/user",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = AuthErrorBody)
    )
)]
#[instrument(skip(pool, _claims))]
pub async fn list_users_handler(
    State(pool): State<Arc<DbPool>>,
    AccessToken(_claims): AccessToken,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users: Vec<UserResponse> = repo::list_users(&pool)?.into_iter().map(UserResponse::from).collect();

    info!("Retrieved {} users", users.len());

    Ok(Json(users))
}

/// Handler for retrieving a specific user
///
/// This function handles GET requests to `/user/{user_id}`.
#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "users",
    params(("user_id" = i32, Path, description = "User ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = AuthErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, _claims))]
pub async fn get_user_handler(
    State(pool): State<Arc<DbPool>>,
    AccessToken(_claims): AccessToken,
    ValidatedPath(user_id): ValidatedPath<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repo::get_user(&pool, user_id)?.ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(user.into()))
}

/// Handler for deleting a user
///
/// This function handles DELETE requests to `/user/{user_id}` and is
/// restricted to the admin identity.
#[utoipa::path(
    delete,
    path = "/user/{user_id}",
    tag = "users",
    params(("user_id" = i32, Path, description = "User ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Missing token or admin privilege required", body = AuthErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, claims), fields(sub = %claims.sub))]
pub async fn delete_user_handler(
    State(pool): State<Arc<DbPool>>,
    AccessToken(claims): AccessToken,
    ValidatedPath(user_id): ValidatedPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    claims.require_admin()?;

    info!("Deleting user with id: {}", user_id);

    if !repo::delete_user(&pool, user_id)? {
        return Err(ApiError::not_found("User not found."));
    }

    Ok(Json(MessageResponse::new("User deleted.")))
}
