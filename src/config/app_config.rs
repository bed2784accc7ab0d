use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: Option<DatabaseConfig>,
    pub cors: CorsConfig,
    pub environment: Environment,
    pub s3: Option<S3Config>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    pub assets_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("assets_url", &self.assets_url)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Staging,
    Main,
}

impl Environment {
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Environment::Staging => "products-staging",
            Environment::Main => "products-main",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staging" => Ok(Environment::Staging),
            "main" | "production" => Ok(Environment::Main),
            other => Err(AppError::ConfigError(format!(
                "Invalid APP_ENV value: {}",
                other
            ))),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database = match optional_var("DB_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            }),
            None => None,
        };

        let s3 = match optional_var("S3_BUCKET") {
            Some(bucket) => Some(S3Config {
                bucket,
                assets_url: env::var("ASSETS_URL")
                    .map_err(|_| {
                        AppError::ConfigError(
                            "ASSETS_URL must be set when S3_BUCKET is set".to_string(),
                        )
                    })?
                    .trim_end_matches('/')
                    .to_string(),
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: env::var("AWS_ACCESS_KEY_ID").map_err(|_| {
                    AppError::ConfigError("AWS_ACCESS_KEY_ID not set".to_string())
                })?,
                secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
                    AppError::ConfigError("AWS_SECRET_ACCESS_KEY not set".to_string())
                })?,
            }),
            None => None,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database,
            cors: CorsConfig {
                allowed_origins: optional_var("FRONTEND_URL")
                    .map(|urls| {
                        urls.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            environment: env::var("APP_ENV")
                .unwrap_or_else(|_| "staging".to_string())
                .parse()?,
            s3,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_environment_names() {
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!(" MAIN ".parse::<Environment>().unwrap(), Environment::Main);
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn environment_selects_key_prefix() {
        assert_eq!(Environment::Staging.key_prefix(), "products-staging");
        assert_eq!(Environment::Main.key_prefix(), "products-main");
    }
}
