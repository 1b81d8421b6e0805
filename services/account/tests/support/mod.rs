//! Shared fixtures for router tests

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI64, Ordering},
    },
};

use account::{
    AppState,
    jwt::{JwtConfig, JwtService},
    models::{Account, AccountProfile},
    routes::create_router,
    service::{
        AccountService, AddAccountResult, CredentialsResult, DeleteAccountResult,
        UpdateNameResult, UpdatePasswordResult,
    },
};
use anyhow::{Result, bail};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use tower::ServiceExt;

/// In-memory [`AccountService`] that records which operations were called.
///
/// Passwords are kept in plaintext in `password_hash`; hashing is covered by
/// the repository's own tests.
#[derive(Default)]
pub struct MemoryAccountService {
    accounts: Mutex<HashMap<String, Account>>,
    next_id: AtomicI64,
    calls: Mutex<Vec<&'static str>>,
    broken: AtomicBool,
    lose_on_rename: AtomicBool,
}

impl MemoryAccountService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every operation fails as if the store were down.
    pub fn broken() -> Arc<Self> {
        let service = Self::default();
        service.broken.store(true, Ordering::SeqCst);
        Arc::new(service)
    }

    /// Make renames report a missing account, as if it vanished mid-request.
    pub fn lose_accounts_on_rename(&self) {
        self.lose_on_rename.store(true, Ordering::SeqCst);
    }

    pub fn insert(&self, email: &str, password: &str, first: &str, last: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                id,
                email: email.to_string(),
                password_hash: password.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn remove(&self, email: &str) {
        self.accounts.lock().unwrap().remove(email);
    }

    pub fn get(&self, email: &str) -> Option<Account> {
        self.accounts.lock().unwrap().get(email).cloned()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(op);
        if self.broken.load(Ordering::SeqCst) {
            bail!("store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl AccountService for MemoryAccountService {
    async fn add_account(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AddAccountResult> {
        self.record("add_account")?;
        if self.get(email).is_some() {
            return Ok(AddAccountResult::EmailTaken);
        }
        self.insert(email, password, first_name, last_name);
        Ok(AddAccountResult::Created)
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<CredentialsResult> {
        self.record("check_credentials")?;
        Ok(match self.get(email) {
            None => CredentialsResult::UnknownEmail,
            Some(account) if account.password_hash == password => CredentialsResult::Valid,
            Some(_) => CredentialsResult::WrongPassword,
        })
    }

    async fn delete_account(&self, email: &str, password: &str) -> Result<DeleteAccountResult> {
        self.record("delete_account")?;
        let mut accounts = self.accounts.lock().unwrap();
        let result = match accounts.get(email) {
            None => DeleteAccountResult::UnknownEmail,
            Some(account) if account.password_hash == password => DeleteAccountResult::Deleted,
            Some(_) => DeleteAccountResult::WrongPassword,
        };
        if result == DeleteAccountResult::Deleted {
            accounts.remove(email);
        }
        Ok(result)
    }

    async fn update_name(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UpdateNameResult> {
        self.record("update_name")?;
        if self.lose_on_rename.load(Ordering::SeqCst) {
            return Ok(UpdateNameResult::UnknownEmail);
        }
        let mut accounts = self.accounts.lock().unwrap();
        Ok(match accounts.get_mut(email) {
            None => UpdateNameResult::UnknownEmail,
            Some(account) => {
                account.first_name = first_name.to_string();
                account.last_name = last_name.to_string();
                UpdateNameResult::Updated
            }
        })
    }

    async fn update_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<UpdatePasswordResult> {
        self.record("update_password")?;
        let mut accounts = self.accounts.lock().unwrap();
        Ok(match accounts.get_mut(email) {
            None => UpdatePasswordResult::UnknownEmail,
            Some(account) if account.password_hash == current_password => {
                account.password_hash = new_password.to_string();
                UpdatePasswordResult::Updated
            }
            Some(_) => UpdatePasswordResult::WrongPassword,
        })
    }

    async fn next_account_id(&self) -> Result<i64> {
        self.record("next_account_id")?;
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.record("account_by_email")?;
        Ok(self.get(email))
    }

    async fn account_by_email_without_password(
        &self,
        email: &str,
    ) -> Result<Option<AccountProfile>> {
        self.record("account_by_email_without_password")?;
        Ok(self.get(email).map(AccountProfile::from))
    }
}

pub struct TestApp {
    pub router: Router,
    pub accounts: Arc<MemoryAccountService>,
    pub jwt: JwtService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_service(MemoryAccountService::new())
    }

    pub fn with_service(accounts: Arc<MemoryAccountService>) -> Self {
        let jwt = JwtService::new(JwtConfig {
            secret: "router-test-secret".to_string(),
            token_expiry: 300,
        });
        let state = AppState {
            accounts: accounts.clone(),
            jwt_service: jwt.clone(),
        };

        Self {
            router: create_router(state),
            accounts,
            jwt,
        }
    }

    pub fn token_for(&self, email: &str) -> String {
        self.jwt.generate_token(email).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, String) {
        self.send(json_request(Method::POST, uri, &body, None)).await
    }

    pub async fn post_json_as(
        &self,
        email: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, String) {
        let token = self.token_for(email);
        self.send(json_request(Method::POST, uri, &body, Some(&token)))
            .await
    }

    pub async fn get_as(&self, email: &str, uri: &str) -> (StatusCode, String) {
        let token = self.token_for(email);
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn delete_as(&self, email: &str, password: &str) -> (StatusCode, String) {
        let token = self.token_for(email);
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/account/delete")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(password.to_string()))
            .unwrap();
        self.send(request).await
    }
}

pub fn json_request(
    method: Method,
    uri: &str,
    body: &serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
