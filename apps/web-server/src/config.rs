//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use scribe_infra::JwtConfig;

#[cfg(feature = "postgres")]
use scribe_infra::DatabaseConfig;

/// Default lifetime of a cached listing page.
pub const DEFAULT_PAGE_CACHE_TTL: Duration = Duration::from_secs(20);

/// Settings handlers read at request time.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where anonymous users are sent for auth-gated routes.
    pub login_url: String,
    pub page_cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            login_url: "/auth/login/".to_string(),
            page_cache_ttl: DEFAULT_PAGE_CACHE_TTL,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub media_root: PathBuf,
    pub jwt: JwtConfig,
    pub settings: Settings,
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
        });

        let defaults = Settings::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            #[cfg(feature = "postgres")]
            database,
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            jwt: JwtConfig::from_env(),
            settings: Settings {
                login_url: env::var("LOGIN_URL").unwrap_or(defaults.login_url),
                page_cache_ttl: Duration::from_secs(parsed(
                    "PAGE_CACHE_TTL_SECS",
                    defaults.page_cache_ttl.as_secs(),
                )),
            },
        }
    }
}
