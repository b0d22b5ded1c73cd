use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub env: String,

    #[serde(default = "default_app_host")]
    pub host: String,

    #[serde(default = "default_app_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Private key for signing tokens (PEM format, base64-encoded for env var)
    pub private_key_pem: String,

    /// Public key for validating tokens (PEM format, base64-encoded for env var)
    pub public_key_pem: String,

    /// Whether safe (GET/HEAD/OPTIONS) requests are allowed without a token.
    #[serde(default)]
    pub public_read: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins; "*" allows any origin.
    pub allowed_origins: String,

    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_db_max_connections() -> u32 {
    20
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_cors_max_age() -> u64 {
    3600
}

fn decode_pem(var: &str) -> Result<String, String> {
    let base64_encoded =
        env::var(var).map_err(|_| format!("{var} must be set (base64-encoded PEM content)"))?;
    let decoded = general_purpose::STANDARD
        .decode(base64_encoded.trim())
        .map_err(|e| format!("Failed to decode {var} from base64: {e}"))?;
    String::from_utf8(decoded).map_err(|_| format!("{var} is not valid UTF-8"))
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("APP_HOST").unwrap_or_else(|_| default_app_host()),
            port: env::var("APP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_app_port),
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or_else(default_db_max_connections),
        };

        let auth = AuthConfig {
            private_key_pem: decode_pem("JWT_PRIVATE_KEY_PEM")?,
            public_key_pem: decode_pem("JWT_PUBLIC_KEY_PEM")?,
            public_read: env::var("AUTH_PUBLIC_READ")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        };

        let media = MediaConfig {
            root: env::var("MEDIA_ROOT").unwrap_or_else(|_| default_media_root()),
        };

        let cors = {
            let allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if app.env.eq_ignore_ascii_case("production") => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                Err(_) => "http://localhost:3000".to_string(),
            };

            CorsConfig {
                allowed_origins,
                max_age: env::var("CORS_MAX_AGE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_cors_max_age),
            }
        };

        Ok(Config {
            app,
            database,
            auth,
            media,
            cors,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_env(), "development");
        assert_eq!(default_app_host(), "0.0.0.0");
        assert_eq!(default_app_port(), 8080);
        assert_eq!(default_db_max_connections(), 20);
        assert_eq!(default_media_root(), "media");
    }
}
