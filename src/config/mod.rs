//! Configuration module for the wedding backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;

use crate::errors::AppError;

/// Default upload body limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Output format for the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Admin credentials guarding the upload and delete routes.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Credentials and placement for the remote media host.
#[derive(Debug, Clone)]
pub struct RemoteMediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder every upload is placed under
    pub folder: String,
    /// API base URL, without trailing slash
    pub api_base: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Path to SQLite store file
    pub db_path: PathBuf,
    /// Directory holding legacy `<collection>.json` files imported at start-up
    pub seed_dir: PathBuf,
    /// Directory for locally stored uploads, served under `/assets`
    pub media_dir: PathBuf,
    /// Remote media host; `None` selects local storage
    pub remote_media: Option<RemoteMediaConfig>,
    /// Admin credentials; `None` disables admin authentication
    pub admin: Option<AdminCredentials>,
    /// Maximum accepted upload body in bytes
    pub max_upload_bytes: usize,
    /// Allowed cross-origin; `None` allows any origin
    pub cors_origin: Option<HeaderValue>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("WEDDING_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3001".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid WEDDING_BIND_ADDR: {}", e)))?;

        let db_path = var("WEDDING_DB_PATH")
            .unwrap_or_else(|| "./data/wedding.sqlite".to_string())
            .into();

        let seed_dir = var("WEDDING_SEED_DIR")
            .unwrap_or_else(|| "./assets".to_string())
            .into();

        let media_dir = var("WEDDING_MEDIA_DIR")
            .unwrap_or_else(|| "./public/assets".to_string())
            .into();

        let remote_media = match (
            var("CLOUDINARY_CLOUD_NAME"),
            var("CLOUDINARY_API_KEY"),
            var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(RemoteMediaConfig {
                cloud_name,
                api_key,
                api_secret,
                folder: var("WEDDING_MEDIA_FOLDER").unwrap_or_else(|| "wedding".to_string()),
                api_base: var("WEDDING_MEDIA_API_BASE")
                    .unwrap_or_else(|| "https://api.cloudinary.com/v1_1".to_string())
                    .trim_end_matches('/')
                    .to_string(),
            }),
            _ => None,
        };

        let admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            _ => None,
        };

        let max_upload_bytes = match var("WEDDING_MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!("Invalid WEDDING_MAX_UPLOAD_BYTES: {}", e))
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let cors_origin = var("WEDDING_CORS_ORIGIN")
            .map(|origin| {
                HeaderValue::from_str(origin.trim_end_matches('/'))
                    .map_err(|e| AppError::Config(format!("Invalid WEDDING_CORS_ORIGIN: {}", e)))
            })
            .transpose()?;

        let log_level = var("WEDDING_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match var("WEDDING_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "Invalid WEDDING_LOG_FORMAT: {} (expected text or json)",
                    other
                )))
            }
        };

        Ok(Self {
            bind_addr,
            db_path,
            seed_dir,
            media_dir,
            remote_media,
            admin,
            max_upload_bytes,
            cors_origin,
            log_level,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3001");
        assert_eq!(config.db_path, PathBuf::from("./data/wedding.sqlite"));
        assert_eq!(config.seed_dir, PathBuf::from("./assets"));
        assert_eq!(config.media_dir, PathBuf::from("./public/assets"));
        assert!(config.remote_media.is_none());
        assert!(config.admin.is_none());
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.cors_origin.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_remote_media_requires_all_credentials() {
        let partial = config_from(&[
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "key"),
        ])
        .unwrap();
        assert!(partial.remote_media.is_none());

        let full = config_from(&[
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "key"),
            ("CLOUDINARY_API_SECRET", "secret"),
            ("WEDDING_MEDIA_API_BASE", "http://localhost:9000/v1_1/"),
        ])
        .unwrap();
        let remote = full.remote_media.unwrap();
        assert_eq!(remote.cloud_name, "demo");
        assert_eq!(remote.folder, "wedding");
        assert_eq!(remote.api_base, "http://localhost:9000/v1_1");
    }

    #[test]
    fn test_admin_credentials_need_both_values() {
        let config = config_from(&[("ADMIN_USERNAME", "admin"), ("ADMIN_PASSWORD", "")]).unwrap();
        assert!(config.admin.is_none());

        let config =
            config_from(&[("ADMIN_USERNAME", "admin"), ("ADMIN_PASSWORD", "hunter2")]).unwrap();
        let admin = config.admin.unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.password, "hunter2");
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            config_from(&[("WEDDING_BIND_ADDR", "not-an-address")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("WEDDING_MAX_UPLOAD_BYTES", "lots")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("WEDDING_LOG_FORMAT", "xml")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("WEDDING_BIND_ADDR", "0.0.0.0:8080"),
            ("WEDDING_MAX_UPLOAD_BYTES", "1024"),
            ("WEDDING_CORS_ORIGIN", "https://wedding.example.com/"),
            ("WEDDING_LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(
            config.cors_origin.unwrap(),
            HeaderValue::from_static("https://wedding.example.com")
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
