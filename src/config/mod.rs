use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin. `*` allows any origin.
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "*".to_string()),
        })
    }

    /// Whether CORS should accept requests from any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.frontend_url.trim() == "*"
    }
}
