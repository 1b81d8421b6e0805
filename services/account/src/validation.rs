//! Input validation utilities
//!
//! Every check here runs before the account service is touched, so a
//! rejected request never causes a partial mutation.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Maximum length of a first or last name, in characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum length of a password, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 64;

/// Minimum length for a password to count as strong.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A field-level validation failure.
///
/// The display text is the message returned to the client verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required.")]
    MissingFields,

    #[error("First name must be 32 characters or less.")]
    FirstNameTooLong,

    #[error("Last name must be 32 characters or less.")]
    LastNameTooLong,

    #[error("First name contains invalid characters.")]
    FirstNameInvalid,

    #[error("Last name contains invalid characters.")]
    LastNameInvalid,

    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("Password must be 64 characters or less.")]
    PasswordTooLong,

    #[error(
        "Password must be at least 8 characters and include at least one number, \
         one special character, one uppercase letter, and one lowercase letter."
    )]
    WeakPassword,

    #[error("Missing password fields.")]
    MissingPasswordFields,

    #[error("Missing name fields.")]
    MissingNameFields,

    #[error("Invalid update type.")]
    InvalidUpdateType,
}

/// Which half of the display name is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    First,
    Last,
}

impl NameField {
    fn too_long(self) -> ValidationError {
        match self {
            NameField::First => ValidationError::FirstNameTooLong,
            NameField::Last => ValidationError::LastNameTooLong,
        }
    }

    fn invalid(self) -> ValidationError {
        match self {
            NameField::First => ValidationError::FirstNameInvalid,
            NameField::Last => ValidationError::LastNameInvalid,
        }
    }
}

fn name_regex() -> &'static Regex {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z'\-. ]+$").expect("Failed to compile name regex"))
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,6}$")
            .expect("Failed to compile email regex")
    })
}

/// Return the trimmed value of a required field, or `None` when the field is
/// absent or blank.
pub fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Like [`required`], but hands back the value untrimmed. Passwords keep
/// their whitespace.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate a first or last name.
///
/// Letters, apostrophes, hyphens, periods and spaces only; at most 32
/// characters. The length check runs first so an overlong name reports its
/// length rather than its characters.
pub fn validate_name(name: &str, field: NameField) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(field.too_long());
    }

    if !name_regex().is_match(name) {
        return Err(field.invalid());
    }

    Ok(())
}

/// Validate a first/last name pair in the order clients expect errors:
/// both lengths, then both character sets.
pub fn validate_full_name(first: &str, last: &str) -> Result<(), ValidationError> {
    if first.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::FirstNameTooLong);
    }
    if last.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::LastNameTooLong);
    }

    validate_name(first, NameField::First)?;
    validate_name(last, NameField::Last)
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate only the upper bound on password length.
///
/// Login uses this on its own; strength is a registration-time policy.
pub fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    Ok(())
}

/// Whether a password meets the strength policy: at least 8 characters with
/// a digit, a lowercase letter, an uppercase letter and a character outside
/// `[A-Za-z0-9]`.
pub fn is_strong(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else {
            has_special = true;
        }
    }

    has_upper && has_lower && has_digit && has_special
}

/// Validate a password that is about to be stored.
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    validate_password_length(password)?;

    if !is_strong(password) {
        return Err(ValidationError::WeakPassword);
    }

    Ok(())
}
