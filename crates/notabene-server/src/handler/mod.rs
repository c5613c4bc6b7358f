//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Routes are split into a public half (signup, login) and a private half
//! guarded by the authentication middleware (everything else). Unknown
//! paths fall back to the structured `not_found` response.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
mod error;
mod notes;
mod pagination;
mod response;
mod users;

use axum::middleware::from_fn_with_state;
use axum::response::Response;
use utoipa_axum::router::OpenApiRouter;

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::pagination::PaginationQuery;
use crate::middleware::require_authentication;
use crate::service::ServiceState;

#[inline]
async fn fallback_handler() -> Response {
    use axum::response::IntoResponse;
    ErrorKind::NotFound.into_response()
}

/// Returns an [`OpenApiRouter`] with all private routes.
fn private_routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .merge(authentication::protected_routes())
        .merge(users::routes())
        .merge(notes::routes())
}

/// Returns an [`OpenApiRouter`] with all public routes.
fn public_routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().merge(authentication::routes())
}

/// Returns an [`OpenApiRouter`] with all routes.
pub fn routes(state: ServiceState) -> OpenApiRouter<ServiceState> {
    let require_authentication = from_fn_with_state(state, require_authentication);

    // Private routes with authentication middleware
    let private_router = private_routes().route_layer(require_authentication);

    // Public routes without authentication
    let public_router = public_routes();

    OpenApiRouter::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(fallback_handler)
}
