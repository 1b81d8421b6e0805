//! Account management service
//!
//! Registration, login with bearer tokens, profile retrieval, account
//! deletion, and name/password updates over a small JSON API.

pub mod config;
pub mod database;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod validation;

use std::sync::Arc;

use crate::{jwt::JwtService, service::AccountService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountService>,
    pub jwt_service: JwtService,
}

impl AppState {
    pub fn new(accounts: impl AccountService + 'static, jwt_service: JwtService) -> Self {
        Self {
            accounts: Arc::new(accounts),
            jwt_service,
        }
    }
}
