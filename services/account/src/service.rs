//! Account service contract
//!
//! Handlers only ever talk to storage through [`AccountService`]. Each
//! mutation returns its own outcome enum; store failures are `Err` and are
//! reported to clients as a generic internal error.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Account, AccountProfile};

/// Outcome of creating an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddAccountResult {
    Created,
    EmailTaken,
}

/// Outcome of a login credential check.
///
/// Callers conflate the two failure variants in responses; they stay
/// distinct here so logs can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsResult {
    Valid,
    UnknownEmail,
    WrongPassword,
}

/// Outcome of deleting an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAccountResult {
    Deleted,
    UnknownEmail,
    WrongPassword,
}

/// Outcome of renaming an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateNameResult {
    Updated,
    UnknownEmail,
}

/// Outcome of changing a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePasswordResult {
    Updated,
    UnknownEmail,
    WrongPassword,
}

macro_rules! legacy_codes {
    ($ty:ty { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $ty {
            /// Numeric result code used by older clients and in logs.
            pub fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

legacy_codes!(AddAccountResult { Created => 0, EmailTaken => 1 });
legacy_codes!(CredentialsResult { Valid => 0, UnknownEmail => 1, WrongPassword => 2 });
legacy_codes!(DeleteAccountResult { Deleted => 0, UnknownEmail => 1, WrongPassword => 2 });
legacy_codes!(UpdateNameResult { Updated => 0, UnknownEmail => 1 });
legacy_codes!(UpdatePasswordResult { Updated => 0, UnknownEmail => 1, WrongPassword => 2 });

/// Account lifecycle operations.
///
/// Implementations own hashing and uniqueness. Operations that re-verify a
/// password before writing must do both atomically.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account. The password arrives in plaintext.
    async fn add_account(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AddAccountResult>;

    /// Verify login credentials.
    async fn check_credentials(&self, email: &str, password: &str) -> Result<CredentialsResult>;

    /// Delete an account after re-checking its password.
    async fn delete_account(&self, email: &str, password: &str) -> Result<DeleteAccountResult>;

    /// Update the display name.
    async fn update_name(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UpdateNameResult>;

    /// Replace the password after re-checking the current one.
    async fn update_password(
        &self,
        email: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<UpdatePasswordResult>;

    /// Next value of the monotonic account id sequence.
    async fn next_account_id(&self) -> Result<i64>;

    /// Full account record, hash included.
    async fn account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Account record with the hash stripped.
    async fn account_by_email_without_password(
        &self,
        email: &str,
    ) -> Result<Option<AccountProfile>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_always_zero() {
        assert_eq!(AddAccountResult::Created.code(), 0);
        assert_eq!(CredentialsResult::Valid.code(), 0);
        assert_eq!(DeleteAccountResult::Deleted.code(), 0);
        assert_eq!(UpdateNameResult::Updated.code(), 0);
        assert_eq!(UpdatePasswordResult::Updated.code(), 0);
    }

    #[test]
    fn credential_failures_keep_distinct_codes() {
        assert_eq!(CredentialsResult::UnknownEmail.code(), 1);
        assert_eq!(CredentialsResult::WrongPassword.code(), 2);
        assert_eq!(AddAccountResult::EmailTaken.code(), 1);
    }
}
