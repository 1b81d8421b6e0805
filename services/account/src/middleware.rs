//! Middleware for bearer token validation and authentication

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use crate::{AppState, error::AccountError, models::AccountDetails};

/// Resolve the bearer token to an [`AccountDetails`] principal.
///
/// The principal is inserted into request extensions for the handlers. A
/// missing, malformed or expired token stops the request with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AccountError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| AccountError::unauthorized("Unauthorized"))?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            AccountError::unauthorized("Unauthorized")
        })?;

    req.extensions_mut().insert(AccountDetails::new(claims.sub));

    Ok(next.run(req).await)
}
