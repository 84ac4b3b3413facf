use std::env;

/// Runtime configuration for the blog backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string (default: "sqlite://blog.db?mode=rwc")
    pub database_url: String,

    /// Maximum pooled database connections (default: 10)
    pub db_max_connections: u32,

    /// Bind address (default: "0.0.0.0")
    pub host: String,

    /// Listening port (default: 8000)
    pub port: u16,

    /// Enable request rate limiting (default: true)
    pub rate_limit_enabled: bool,

    /// Requests allowed per client within one window (default: 100)
    pub rate_limit_times: u32,

    /// Window length in seconds (default: 60)
    pub rate_limit_seconds: u64,

    /// Allowed CORS Origins (comma separated, "*" for any)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://blog.db?mode=rwc".to_string(),
            db_max_connections: 10,
            host: "0.0.0.0".to_string(),
            port: 8000,
            rate_limit_enabled: true,
            rate_limit_times: 100,
            rate_limit_seconds: 60,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.db_max_connections),

            host: env::var("HOST").unwrap_or(default.host),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            rate_limit_enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.rate_limit_enabled),

            rate_limit_times: env::var("RATE_LIMIT_TIMES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.rate_limit_times),

            rate_limit_seconds: env::var("RATE_LIMIT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u64| *v > 0)
                .unwrap_or(default.rate_limit_seconds),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for local development and tests (in-memory database, no rate limiting)
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            host: "127.0.0.1".to_string(),
            port: 8000,
            rate_limit_enabled: false,
            rate_limit_times: 1000,
            rate_limit_seconds: 60,
            allowed_origins: vec!["*".to_string()],
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.database_url.starts_with("sqlite:")
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
