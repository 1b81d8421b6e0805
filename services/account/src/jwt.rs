//! JWT service for token generation and validation
//!
//! Tokens are HS256-signed and carry the account email as their subject.
//! Their contents are opaque to clients.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default token lifetime in seconds (1 hour).
pub const DEFAULT_TOKEN_EXPIRY: u64 = 3600;

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

fn read_secret_file(path: &str) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read JWT secret file {}: {}", path, e))?;
    Ok(contents.trim().to_string())
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token expiration time in seconds
    pub token_expiry: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET_FILE`: Path to a file holding the signing secret
    /// - `JWT_SECRET`: Inline signing secret, used when `JWT_SECRET_FILE` is unset
    /// - `JWT_TOKEN_EXPIRY`: Token expiry in seconds (default: 3600)
    ///
    /// The secret must be at least 32 bytes. A `JWT_SECRET` naming an existing
    /// path is treated as a file and must be readable.
    pub fn from_env() -> Result<Self> {
        let secret = match std::env::var("JWT_SECRET_FILE") {
            Ok(path) => read_secret_file(&path)?,
            Err(_) => {
                let secret = std::env::var("JWT_SECRET").map_err(|_| {
                    anyhow::anyhow!("JWT_SECRET or JWT_SECRET_FILE environment variable not set")
                })?;

                if std::path::Path::new(&secret).exists() {
                    read_secret_file(&secret)?
                } else {
                    secret
                }
            }
        };

        if secret.len() < MIN_SECRET_LENGTH {
            anyhow::bail!("JWT secret must be at least {} bytes", MIN_SECRET_LENGTH);
        }

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account email
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Generate a token bound to an account email
    pub fn generate_token(&self, email: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: email.to_string(),
            iat: now,
            exp: now + self.config.token_expiry,
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
