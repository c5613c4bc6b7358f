//! Account profile handlers.
//!
//! All routes here operate behind authentication. The `/users/me` routes
//! read, update, and delete the caller's own account; the user directory
//! is paginated and exposes only public fields.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use notabene_postgres::PgClient;
use notabene_postgres::model::UpdateUser;
use notabene_postgres::query::UserRepository;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use validator::Validate;

use crate::extract::{AuthState, Json, ValidateJson};
use crate::handler::authentication::UserResponse;
use crate::handler::pagination::PaginationQuery;
use crate::handler::response::ErrorResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState};

/// Tracing target for account profile operations.
const TRACING_TARGET: &str = "notabene_server::handler::users";

/// Request payload for updating the caller's account.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "displayName": "Ada King",
    "emailAddress": "ada@example.org"
}))]
struct UpdateUserRequest {
    /// New display name.
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    /// New email address.
    #[validate(email)]
    pub email_address: Option<String>,
    /// New plaintext password, hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

/// Response for the paginated user directory.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UsersListResponse {
    /// Users on the requested page, newest first.
    pub items: Vec<UserResponse>,
    /// Total number of accounts, independent of the page.
    pub total_count: i64,
    /// 1-based page number.
    pub page: i64,
    /// Page size used for this listing.
    pub per_page: i64,
}

/// Retrieves the authenticated account.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/users/me", tag = "users",
    responses(
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = OK, description = "Current account", body = UserResponse),
    ),
)]
async fn get_own_account(
    AuthState(current_user): AuthState,
) -> Result<(StatusCode, Json<UserResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        user_id = current_user.id,
        "retrieving own account"
    );

    Ok((StatusCode::OK, Json(current_user.into())))
}

/// Updates the authenticated account.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    patch, path = "/users/me", tag = "users",
    request_body(
        content = UpdateUserRequest,
        description = "Fields to update",
        content_type = "application/json",
    ),
    responses(
        (status = BAD_REQUEST, description = "Invalid update data", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = CONFLICT, description = "Email already registered", body = ErrorResponse),
        (status = OK, description = "Updated account", body = UserResponse),
    ),
)]
async fn update_own_account(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    AuthState(current_user): AuthState,
    ValidateJson(request): ValidateJson<UpdateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        user_id = current_user.id,
        has_display_name = request.display_name.is_some(),
        has_email = request.email_address.is_some(),
        has_password = request.password.is_some(),
        "updating account"
    );

    let mut conn = pg_client.get_connection().await?;

    // Check for email collisions with other accounts before writing
    let normalized_email = request
        .email_address
        .as_ref()
        .map(|email| email.trim().to_lowercase());

    if let Some(ref email) = normalized_email
        && *email != current_user.email_address
        && conn.email_exists(email).await?
    {
        tracing::info!(
            target: TRACING_TARGET,
            user_id = current_user.id,
            "account update rejected: email already registered"
        );
        return Err(ErrorKind::EmailTaken.into_error());
    }

    let password_hash = match request.password.as_deref() {
        Some(password) => Some(password_hasher.hash_password(password)?),
        None => None,
    };

    let updates = UpdateUser {
        display_name: request.display_name,
        email_address: normalized_email,
        password_hash,
        ..Default::default()
    };

    let Some(user) = conn.update_user(current_user.id, updates).await? else {
        // The account vanished between token resolution and the update
        return Err(ErrorKind::NotFound.with_resource("user").into_static());
    };

    tracing::info!(
        target: TRACING_TARGET,
        user_id = user.id,
        "account updated"
    );

    Ok((StatusCode::OK, Json(user.into())))
}

/// Deletes the authenticated account.
///
/// Owned notes are removed by the database cascade.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    delete, path = "/users/me", tag = "users",
    responses(
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = NO_CONTENT, description = "Account deleted"),
    ),
)]
async fn delete_own_account(
    State(pg_client): State<PgClient>,
    AuthState(current_user): AuthState,
) -> Result<StatusCode> {
    let mut conn = pg_client.get_connection().await?;
    let deleted = conn.delete_user(current_user.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = current_user.id,
        deleted = deleted,
        "account deletion processed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Lists accounts, newest first.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/users", tag = "users",
    params(PaginationQuery),
    responses(
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = OK, description = "One page of accounts", body = UsersListResponse),
    ),
)]
async fn list_users(
    State(pg_client): State<PgClient>,
    AuthState(current_user): AuthState,
    Query(query): Query<PaginationQuery>,
) -> Result<(StatusCode, Json<UsersListResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        user_id = current_user.id,
        page = query.page_number(),
        per_page = query.page_size(),
        "listing users"
    );

    let mut conn = pg_client.get_connection().await?;
    let users = conn.list_users(query.to_pagination()).await?;
    let total_count = conn.count_users().await?;

    let response = UsersListResponse {
        items: users.into_iter().map(Into::into).collect(),
        total_count,
        page: query.page_number(),
        per_page: query.page_size(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Returns the account profile routes.
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(get_own_account, update_own_account, delete_own_account))
        .routes(routes!(list_users))
}
