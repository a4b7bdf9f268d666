//! Process configuration.
//!
//! Built once at start-up from environment variables and handed by reference
//! to whatever needs it. `APP_ENV` picks the defaults: `local` mirrors a
//! developer machine (file-backed SQLite, open CORS, assets on disk) while
//! `production` insists on explicit secrets, origins and object storage.

use anyhow::{anyhow, bail, Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "local-development-secret-do-not-use-in-production";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow!("unknown APP_ENV '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AllowAll,
    Origins(Vec<String>),
}

impl CorsPolicy {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.iter().any(|o| o == "*") {
            Self::AllowAll
        } else {
            Self::Origins(origins)
        }
    }
}

/// Who may delete a blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Any authenticated user.
    #[default]
    AnyAuthenticated,
    /// Only the user who created the blog.
    OwnerOnly,
}

impl FromStr for DeletePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authenticated" | "any" => Ok(Self::AnyAuthenticated),
            "owner" | "owner_only" => Ok(Self::OwnerOnly),
            other => Err(anyhow!("unknown BLOG_DELETE_POLICY '{}'", other)),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub custom_domain: String,
    pub endpoint_url: Option<String>,
    pub media_location: String,
    pub static_location: String,
    pub cache_control: String,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &"***")
            .field("secret_access_key", &"***")
            .field("custom_domain", &self.custom_domain)
            .field("endpoint_url", &self.endpoint_url)
            .field("media_location", &self.media_location)
            .field("static_location", &self.static_location)
            .field("cache_control", &self.cache_control)
            .finish()
    }
}

/// Directory and public URL prefix for one class of assets on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDir {
    pub root: PathBuf,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Local { media: LocalDir, static_files: LocalDir },
    S3(S3Config),
}

#[derive(Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub http_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub page_size: i64,
    pub delete_policy: DeletePolicy,
    pub max_upload_bytes: usize,
    pub cors: CorsPolicy,
    pub storage: StorageConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("environment", &self.environment)
            .field("http_addr", &self.http_addr)
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"***")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("page_size", &self.page_size)
            .field("delete_policy", &self.delete_policy)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("cors", &self.cors)
            .field("storage", &self.storage)
            .finish()
    }
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => Environment::Local,
        };
        let production = environment == Environment::Production;

        let require = |key: &str| -> Result<String> {
            get(key).ok_or_else(|| anyhow!("{} must be set", key))
        };

        let host = get("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(&get, "HTTP_PORT", 3000)?;

        let database_url = if production {
            require("DATABASE_URL")?
        } else {
            get("DATABASE_URL").unwrap_or_else(|| "sqlite://db.sqlite3?mode=rwc".to_string())
        };

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if production => bail!("JWT_SECRET must be set"),
            None => {
                tracing::warn!("JWT_SECRET not set, using the built-in development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let token_ttl_hours: i64 = parse_or(&get, "TOKEN_TTL_HOURS", 10)?;
        if token_ttl_hours <= 0 {
            bail!("TOKEN_TTL_HOURS must be positive");
        }

        let page_size: i64 = parse_or(&get, "PAGE_SIZE", 3)?;
        if page_size <= 0 {
            bail!("PAGE_SIZE must be positive");
        }

        let delete_policy = match get("BLOG_DELETE_POLICY") {
            Some(raw) => raw.parse()?,
            None => DeletePolicy::default(),
        };

        let cors = match get("CORS_ALLOWED_ORIGINS") {
            Some(raw) => CorsPolicy::parse(&raw),
            None if production => bail!("CORS_ALLOWED_ORIGINS must be set"),
            None => CorsPolicy::AllowAll,
        };

        let backend = get("STORAGE_BACKEND").unwrap_or_else(|| {
            if production { "s3" } else { "local" }.to_string()
        });
        let storage = match backend.trim().to_ascii_lowercase().as_str() {
            "local" => StorageConfig::Local {
                media: LocalDir {
                    root: PathBuf::from(get("MEDIA_ROOT").unwrap_or_else(|| "media".to_string())),
                    base_url: get("MEDIA_URL").unwrap_or_else(|| "/media/".to_string()),
                },
                static_files: LocalDir {
                    root: PathBuf::from(
                        get("STATIC_ROOT").unwrap_or_else(|| "static".to_string()),
                    ),
                    base_url: get("STATIC_URL").unwrap_or_else(|| "/static/".to_string()),
                },
            },
            "s3" => {
                let bucket = require("AWS_STORAGE_BUCKET_NAME")?;
                let custom_domain = get("AWS_S3_CUSTOM_DOMAIN")
                    .unwrap_or_else(|| format!("{}.s3.amazonaws.com", bucket));
                StorageConfig::S3(S3Config {
                    region: get("AWS_S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                    access_key_id: require("AWS_ACCESS_KEY_ID")?,
                    secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                    endpoint_url: get("AWS_S3_ENDPOINT_URL"),
                    media_location: get("AWS_MEDIA_LOCATION")
                        .map(|l| l.trim_matches('/').to_string())
                        .unwrap_or_else(|| "media".to_string()),
                    static_location: get("AWS_LOCATION")
                        .map(|l| l.trim_matches('/').to_string())
                        .unwrap_or_else(|| "static".to_string()),
                    cache_control: "max-age=86400".to_string(),
                    bucket,
                    custom_domain,
                })
            }
            other => bail!("unknown STORAGE_BACKEND '{}'", other),
        };

        Ok(Self {
            environment,
            http_addr: format!("{}:{}", host, port),
            database_url,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            token_ttl_hours,
            page_size,
            delete_policy,
            max_upload_bytes: parse_or(&get, "MEDIA_MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            cors,
            storage,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: '{}'", key, raw)),
        None => Ok(default),
    }
}
