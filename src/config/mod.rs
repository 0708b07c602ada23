use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the audit service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub narrative: NarrativeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let data_dir = env::var("AUDIT_DATA_DIR").ok().map(PathBuf::from);

        let narrative = NarrativeConfig {
            api_url: env::var("NARRATIVE_API_URL").ok().filter(|v| !v.is_empty()),
            api_key: env::var("NARRATIVE_API_KEY").ok().filter(|v| !v.is_empty()),
            model: env::var("NARRATIVE_MODEL").unwrap_or_else(|_| "onqo-narrative-1".to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig { data_dir },
            narrative,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Persistence strategy, decided once at startup: a data directory selects
/// the document store, otherwise reports live in process memory.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

/// Credentials for the hosted narrative (text-completion) service. The
/// service runs fine without them; the summary endpoint then reports
/// itself unconfigured instead of enriching.
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

impl NarrativeConfig {
    pub fn is_configured(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("AUDIT_DATA_DIR");
        env::remove_var("NARRATIVE_API_URL");
        env::remove_var("NARRATIVE_API_KEY");
        env::remove_var("NARRATIVE_MODEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.storage.data_dir.is_none());
        assert!(!config.narrative.is_configured());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn narrative_requires_both_url_and_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("NARRATIVE_API_URL", "https://narrative.example/v1/complete");
        let config = AppConfig::load().expect("config loads");
        assert!(!config.narrative.is_configured());

        env::set_var("NARRATIVE_API_KEY", "sk-test");
        let config = AppConfig::load().expect("config loads");
        assert!(config.narrative.is_configured());
    }

    #[test]
    fn data_dir_selects_document_storage() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AUDIT_DATA_DIR", "/var/lib/onqo-audit");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.storage.data_dir.as_deref(),
            Some(std::path::Path::new("/var/lib/onqo-audit"))
        );
    }
}
