//! Authentication handlers for signup, login, and logout.
//!
//! Signup and login are the only public routes in the API. Logout requires
//! a valid token and is a pure acknowledgment: tokens are stateless, so
//! there is nothing to invalidate server-side.

use axum::extract::State;
use axum::http::StatusCode;
use jiff::Timestamp;
use notabene_postgres::PgClient;
use notabene_postgres::model::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use validator::Validate;

use crate::extract::{AuthState, Json, ValidateJson};
use crate::handler::Result;
use crate::handler::response::ErrorResponse;
use crate::service::{AuthService, IssuedToken, ServiceState};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "notabene_server::handler::authentication";

/// Request payload for signup.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "displayName": "Ada Lovelace",
    "emailAddress": "ada@example.com",
    "password": "correct-horse-battery"
}))]
struct SignupRequest {
    /// Human-readable name of the account.
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    /// Email address of the account.
    #[validate(email)]
    pub email_address: String,
    /// Plaintext password, hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Public view of an account, returned after signup.
///
/// Deliberately omits the password hash.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    /// ID of the account.
    pub user_id: i64,
    /// Human-readable name of the account.
    pub display_name: String,
    /// Email address of the account.
    pub email_address: String,
    /// Timestamp when the account was created.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name,
            email_address: user.email_address,
            created_at: user.created_at.into(),
            updated_at: user.updated_at.into(),
        }
    }
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "emailAddress": "ada@example.com",
    "password": "correct-horse-battery"
}))]
struct LoginRequest {
    /// Email address of the account.
    #[validate(email)]
    pub email_address: String,
    /// Password of the account.
    pub password: String,
}

/// Response returned after successful login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    /// Signed session token.
    pub access_token: String,
    /// Token type tag, always `Bearer`.
    pub token_type: String,
    /// Timestamp when the token expires.
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: Timestamp,
}

impl LoginResponse {
    fn new(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.access_token,
            token_type: IssuedToken::TOKEN_TYPE.to_owned(),
            expires_at: issued.expires_at,
        }
    }
}

/// Response returned after logout.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct LogoutResponse {
    /// Human-readable acknowledgment.
    pub message: String,
}

/// Registers a new account.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/auth/signup", tag = "auth",
    request_body(
        content = SignupRequest,
        description = "New account details",
        content_type = "application/json",
    ),
    responses(
        (status = BAD_REQUEST, description = "Invalid signup data", body = ErrorResponse),
        (status = CONFLICT, description = "Email already registered", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error", body = ErrorResponse),
        (status = CREATED, description = "Account created", body = UserResponse),
    ),
)]
async fn signup(
    State(pg_client): State<PgClient>,
    State(auth_service): State<AuthService>,
    ValidateJson(request): ValidateJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email_address,
        "signup attempt"
    );

    let mut conn = pg_client.get_connection().await?;
    let user = auth_service
        .signup(
            &mut *conn,
            &request.display_name,
            &request.email_address,
            &request.password,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Authenticates an account and returns a session token.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/auth/login", tag = "auth",
    request_body(
        content = LoginRequest,
        description = "Login credentials",
        content_type = "application/json",
    ),
    responses(
        (status = BAD_REQUEST, description = "Invalid login data", body = ErrorResponse),
        (
            status = UNAUTHORIZED,
            description = "Invalid credentials - unknown email or wrong password",
            body = ErrorResponse,
            example = json!({
                "name": "invalid_credentials",
                "message": "Incorrect email or password"
            })
        ),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error", body = ErrorResponse),
        (status = OK, description = "Login succeeded", body = LoginResponse),
    ),
)]
async fn login(
    State(pg_client): State<PgClient>,
    State(auth_service): State<AuthService>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email_address,
        "login attempt"
    );

    let mut conn = pg_client.get_connection().await?;
    let (_user, issued) = auth_service
        .login(&mut *conn, &request.email_address, &request.password)
        .await?;

    Ok((StatusCode::OK, Json(LoginResponse::new(issued))))
}

/// Acknowledges a logout.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/auth/logout", tag = "auth",
    responses(
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorResponse),
        (status = OK, description = "Logout acknowledged", body = LogoutResponse),
    ),
)]
async fn logout(
    State(auth_service): State<AuthService>,
    AuthState(current_user): AuthState,
) -> Result<(StatusCode, Json<LogoutResponse>)> {
    auth_service.logout(current_user.id);

    let response = LogoutResponse {
        message: "Logged out successfully".to_owned(),
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Returns the public authentication routes.
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(signup))
        .routes(routes!(login))
}

/// Returns the authentication routes that require a valid token.
pub fn protected_routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(logout))
}
