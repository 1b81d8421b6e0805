//! Account service routes
//!
//! Handlers validate every field before calling the account service, then
//! translate the service outcome into a status and message.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::{
    AppState,
    error::{AccountError, AccountResult},
    middleware::auth_middleware,
    models::{
        AccountDetails, AccountUpdate, LoginRequest, RegisterRequest, TokenResponse,
        UpdateRequest,
    },
    service::{
        AddAccountResult, CredentialsResult, DeleteAccountResult, UpdateNameResult,
        UpdatePasswordResult,
    },
    validation::{
        ValidationError, present, required, validate_email, validate_full_name,
        validate_new_password, validate_password_length,
    },
};

/// Create the router for the account service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/details", get(account_details))
        .route("/delete", delete(delete_account))
        .route("/update", post(update_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let account_routes = Router::new()
        .route("/public/register", post(register))
        .route("/public/login", post(login))
        .merge(protected_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/account", account_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn internal_error(context: &str, err: anyhow::Error) -> AccountError {
    error!("{}: {:#}", context, err);
    AccountError::Internal
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "account-service"
    }))
}

/// Account registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AccountResult<impl IntoResponse> {
    let (Some(first), Some(last), Some(email), Some(password)) = (
        required(payload.first.as_deref()),
        required(payload.last.as_deref()),
        required(payload.email.as_deref()),
        present(payload.password.as_deref()),
    ) else {
        return Err(ValidationError::MissingFields.into());
    };

    validate_full_name(first, last)?;
    validate_email(email)?;
    validate_new_password(password)?;

    let result = state
        .accounts
        .add_account(email, password, first, last)
        .await
        .map_err(|e| internal_error("Failed to create account", e))?;

    match result {
        AddAccountResult::Created => {
            info!("Registered new account");
            Ok((StatusCode::CREATED, "Account created successfully!"))
        }
        AddAccountResult::EmailTaken => Err(AccountError::Conflict),
    }
}

/// Login endpoint; issues a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AccountResult<impl IntoResponse> {
    let (Some(email), Some(password)) = (
        required(payload.email.as_deref()),
        present(payload.password.as_deref()),
    ) else {
        return Err(ValidationError::MissingFields.into());
    };

    validate_email(email)?;
    validate_password_length(password)?;

    let result = state
        .accounts
        .check_credentials(email, password)
        .await
        .map_err(|e| internal_error("Failed to check credentials", e))?;

    match result {
        CredentialsResult::Valid => {
            let token = state
                .jwt_service
                .generate_token(email)
                .map_err(|e| internal_error("Failed to generate token", e))?;

            Ok(Json(TokenResponse { token }))
        }
        // Same message for both so registered emails cannot be discovered.
        CredentialsResult::UnknownEmail | CredentialsResult::WrongPassword => {
            warn!(code = result.code(), "Rejected login");
            Err(AccountError::unauthorized("Invalid email or password."))
        }
    }
}

/// Profile of the authenticated account
pub async fn account_details(
    State(state): State<AppState>,
    Extension(principal): Extension<AccountDetails>,
) -> AccountResult<impl IntoResponse> {
    let profile = state
        .accounts
        .account_by_email_without_password(&principal.email)
        .await
        .map_err(|e| internal_error("Failed to load account", e))?
        .ok_or_else(|| AccountError::not_found("Account not found."))?;

    Ok(Json(profile))
}

/// Delete the authenticated account. The body is the raw current password.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(principal): Extension<AccountDetails>,
    password: String,
) -> AccountResult<impl IntoResponse> {
    // A valid token whose account has vanished.
    let account = state
        .accounts
        .account_by_email(&principal.email)
        .await
        .map_err(|e| internal_error("Failed to load account", e))?
        .ok_or_else(|| AccountError::not_found("Invalid token."))?;

    let result = state
        .accounts
        .delete_account(&account.email, &password)
        .await
        .map_err(|e| internal_error("Failed to delete account", e))?;

    match result {
        DeleteAccountResult::Deleted => Ok((StatusCode::OK, "Account deleted successfully.")),
        DeleteAccountResult::UnknownEmail | DeleteAccountResult::WrongPassword => {
            Err(AccountError::invalid_input("Invalid password."))
        }
    }
}

/// Update the authenticated account's password or name
pub async fn update_account(
    State(state): State<AppState>,
    Extension(principal): Extension<AccountDetails>,
    Json(payload): Json<UpdateRequest>,
) -> AccountResult<impl IntoResponse> {
    let account = state
        .accounts
        .account_by_email(&principal.email)
        .await
        .map_err(|e| internal_error("Failed to load account", e))?
        .ok_or_else(|| AccountError::not_found("Invalid token."))?;

    match payload.into_update()? {
        AccountUpdate::Password { current, new } => {
            validate_new_password(&new)?;

            let result = state
                .accounts
                .update_password(&account.email, &current, &new)
                .await
                .map_err(|e| internal_error("Failed to update password", e))?;

            match result {
                UpdatePasswordResult::Updated => {
                    Ok((StatusCode::OK, "Password updated successfully."))
                }
                UpdatePasswordResult::UnknownEmail | UpdatePasswordResult::WrongPassword => {
                    Err(AccountError::unauthorized("Current password is incorrect."))
                }
            }
        }
        AccountUpdate::Name { first, last } => {
            validate_full_name(&first, &last)?;

            let result = state
                .accounts
                .update_name(&account.email, &first, &last)
                .await
                .map_err(|e| internal_error("Failed to update name", e))?;

            match result {
                UpdateNameResult::Updated => Ok((StatusCode::OK, "Name updated successfully.")),
                // Kept as 401 for compatibility; likely meant to be 404.
                UpdateNameResult::UnknownEmail => {
                    Err(AccountError::unauthorized("Account not found."))
                }
            }
        }
    }
}
