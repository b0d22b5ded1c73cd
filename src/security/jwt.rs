use anyhow::{anyhow, Result};
/// JWT token generation and validation using RS256 (RSA with SHA-256)
/// Access tokens: 1-hour expiry
/// Refresh tokens: 30-day expiry
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Email address
    pub email: String,
}

/// Token pair returned by login and refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// Thread-safe mutable storage for JWT keys loaded from the environment
lazy_static! {
    static ref JWT_KEYS: RwLock<Option<(EncodingKey, DecodingKey)>> = RwLock::new(None);
}

/// Initialize JWT keys from PEM-formatted strings.
/// Must be called during application startup before any JWT operations.
pub fn initialize_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to load private key: {}", e))?;

    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to load public key: {}", e))?;

    let mut keys = JWT_KEYS
        .write()
        .map_err(|e| anyhow!("Failed to acquire write lock on JWT keys: {}", e))?;
    *keys = Some((encoding_key, decoding_key));

    Ok(())
}

fn get_encoding_key() -> Result<EncodingKey> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| anyhow!("Failed to acquire read lock on JWT keys: {}", e))?;

    keys.as_ref()
        .map(|(enc, _)| enc.clone())
        .ok_or_else(|| anyhow!("JWT keys not initialized. Call initialize_keys() during startup"))
}

fn get_decoding_key() -> Result<DecodingKey> {
    let keys = JWT_KEYS
        .read()
        .map_err(|e| anyhow!("Failed to acquire read lock on JWT keys: {}", e))?;

    keys.as_ref()
        .map(|(_, dec)| dec.clone())
        .ok_or_else(|| anyhow!("JWT keys not initialized. Call initialize_keys() during startup"))
}

fn generate_token(user_id: Uuid, email: &str, token_type: &str, expiry: Duration) -> Result<String> {
    let now = Utc::now();

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + expiry).timestamp(),
        token_type: token_type.to_string(),
        email: email.to_string(),
    };

    let encoding_key = get_encoding_key()?;
    encode(
        &Header::new(jsonwebtoken::Algorithm::RS256),
        &claims,
        &encoding_key,
    )
    .map_err(|e| anyhow!("Failed to generate {} token: {}", token_type, e))
}

/// Generate a new access token
pub fn generate_access_token(user_id: Uuid, email: &str) -> Result<String> {
    generate_token(
        user_id,
        email,
        "access",
        Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS),
    )
}

/// Generate a new refresh token
pub fn generate_refresh_token(user_id: Uuid, email: &str) -> Result<String> {
    generate_token(
        user_id,
        email,
        "refresh",
        Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
    )
}

/// Generate both access and refresh tokens
pub fn generate_token_pair(user_id: Uuid, email: &str) -> Result<TokenResponse> {
    let access_token = generate_access_token(user_id, email)?;
    let refresh_token = generate_refresh_token(user_id, email)?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_HOURS * 3600,
    })
}

/// Validate and decode a token
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;
    decode::<Claims>(
        token,
        &decoding_key,
        &Validation::new(jsonwebtoken::Algorithm::RS256),
    )
    .map_err(|e| anyhow!("Token validation failed: {}", e))
}

/// Validate a token and require the "refresh" type claim
pub fn validate_refresh_token(token: &str) -> Result<Claims> {
    let token_data = validate_token(token)?;
    if token_data.claims.token_type != "refresh" {
        return Err(anyhow!("Not a refresh token"));
    }
    Ok(token_data.claims)
}

/// Extract user ID from token
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub).map_err(|e| anyhow!("Invalid user ID in token: {}", e))
}
