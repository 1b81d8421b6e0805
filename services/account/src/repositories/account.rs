//! Account repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    models::{Account, AccountProfile},
    password::{hash_password, verify_password},
    service::{
        AccountService, AddAccountResult, CredentialsResult, DeleteAccountResult,
        UpdateNameResult, UpdatePasswordResult,
    },
};

/// Postgres-backed [`AccountService`].
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountService for AccountRepository {
    async fn add_account(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AddAccountResult> {
        let password_hash = hash_password(password)?;
        let id = self.next_account_id().await?;

        // The unique constraint on email decides races between registrations.
        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO accounts (id, email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(&password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(id) => {
                info!(account_id = id, "Created account");
                Ok(AddAccountResult::Created)
            }
            None => Ok(AddAccountResult::EmailTaken),
        }
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<CredentialsResult> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM accounts WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        let Some(password_hash) = stored else {
            return Ok(CredentialsResult::UnknownEmail);
        };

        if verify_password(password, &password_hash)? {
            Ok(CredentialsResult::Valid)
        } else {
            Ok(CredentialsResult::WrongPassword)
        }
    }

    async fn delete_account(&self, email: &str, password: &str) -> Result<DeleteAccountResult> {
        let mut tx = self.pool.begin().await?;

        // Row lock keeps the password check and the delete atomic.
        let stored: Option<(i64, String)> = sqlx::query_as(
            "SELECT id, password_hash FROM accounts WHERE email = $1 FOR UPDATE",
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((id, password_hash)) = stored else {
            tx.rollback().await?;
            return Ok(DeleteAccountResult::UnknownEmail);
        };

        if !verify_password(password, &password_hash)? {
            tx.rollback().await?;
            warn!(account_id = id, "Rejected account deletion: wrong password");
            return Ok(DeleteAccountResult::WrongPassword);
        }

        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(account_id = id, "Deleted account");
        Ok(DeleteAccountResult::Deleted)
    }

    async fn update_name(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UpdateNameResult> {
        let updated = sqlx::query(
            r#"
            UPDATE accounts
            SET first_name = $2,
                last_name = $3,
                updated_at = NOW()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(UpdateNameResult::UnknownEmail);
        }

        info!("Updated account name");
        Ok(UpdateNameResult::Updated)
    }

    async fn update_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<UpdatePasswordResult> {
        let mut tx = self.pool.begin().await?;

        let stored: Option<(i64, String)> = sqlx::query_as(
            "SELECT id, password_hash FROM accounts WHERE email = $1 FOR UPDATE",
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((id, password_hash)) = stored else {
            tx.rollback().await?;
            return Ok(UpdatePasswordResult::UnknownEmail);
        };

        if !verify_password(current_password, &password_hash)? {
            tx.rollback().await?;
            warn!(account_id = id, "Rejected password change: wrong current password");
            return Ok(UpdatePasswordResult::WrongPassword);
        }

        let new_hash = hash_password(new_password)?;
        sqlx::query("UPDATE accounts SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(&new_hash)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(account_id = id, "Updated account password");
        Ok(UpdatePasswordResult::Updated)
    }

    async fn next_account_id(&self) -> Result<i64> {
        let id: i64 = sqlx::query_scalar("SELECT nextval('account_id_seq')")
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn account_by_email_without_password(
        &self,
        email: &str,
    ) -> Result<Option<AccountProfile>> {
        let profile = sqlx::query_as::<_, AccountProfile>(
            "SELECT id, email, first_name, last_name FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
