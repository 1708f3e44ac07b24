use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::registry::JobIdPolicy;

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

/// Top-level configuration for the registry service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub registry: RegistryConfig,
    pub auth: AuthMode,
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

        let data_dir = env::var("VS_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let job_id_policy = match env::var("VS_JOB_ID_POLICY") {
            Ok(raw) => JobIdPolicy::parse(&raw).ok_or(ConfigError::InvalidJobIdPolicy(raw))?,
            Err(_) => JobIdPolicy::default(),
        };

        let auth_disabled = env::var("VS_AUTH_DISABLED")
            .map(|raw| matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let auth = match (env::var("VS_AUTH_USERNAME"), env::var("VS_AUTH_PASSWORD")) {
            (Ok(username), Ok(password)) => AuthMode::Basic(AuthConfig { username, password }),
            (Ok(_), Err(_)) | (Err(_), Ok(_)) => return Err(ConfigError::IncompleteAuth),
            (Err(_), Err(_)) if auth_disabled => AuthMode::Disabled,
            (Err(_), Err(_)) => AuthMode::Unconfigured,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig {
                data_dir: PathBuf::from(data_dir),
            },
            registry: RegistryConfig { job_id_policy },
            auth,
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

/// Location of the reference data files.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
}

impl CatalogConfig {
    pub fn locations_path(&self) -> PathBuf {
        self.data_dir.join("locations.json")
    }

    pub fn services_path(&self) -> PathBuf {
        self.data_dir.join("services.json")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryConfig {
    pub job_id_policy: JobIdPolicy,
}

/// How the registry routes are protected. Anything short of explicit credentials or an
/// explicit `VS_AUTH_DISABLED` opt-out leaves them closed.
#[derive(Debug, Clone)]
pub enum AuthMode {
    Basic(AuthConfig),
    Disabled,
    Unconfigured,
}

impl AuthMode {
    /// Fails when neither credentials nor the opt-out were provided.
    pub fn ensure_configured(&self) -> Result<(), ConfigError> {
        match self {
            AuthMode::Unconfigured => Err(ConfigError::MissingAuth),
            AuthMode::Basic(_) | AuthMode::Disabled => Ok(()),
        }
    }
}

/// HTTP Basic credentials guarding the registry routes.
#[derive(Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidJobIdPolicy(String),
    IncompleteAuth,
    MissingAuth,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16 port number"),
            ConfigError::InvalidHost { source } => {
                write!(f, "APP_HOST must be an IP address or 'localhost': {source}")
            }
            ConfigError::InvalidJobIdPolicy(raw) => write!(
                f,
                "VS_JOB_ID_POLICY must be 'legacy' or 'sequential', got '{raw}'"
            ),
            ConfigError::IncompleteAuth => write!(
                f,
                "VS_AUTH_USERNAME and VS_AUTH_PASSWORD must be set together"
            ),
            ConfigError::MissingAuth => write!(
                f,
                "set VS_AUTH_USERNAME and VS_AUTH_PASSWORD, or VS_AUTH_DISABLED=true to serve without authentication"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidJobIdPolicy(_)
            | ConfigError::IncompleteAuth
            | ConfigError::MissingAuth => None,
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
        env::remove_var("VS_DATA_DIR");
        env::remove_var("VS_JOB_ID_POLICY");
        env::remove_var("VS_AUTH_USERNAME");
        env::remove_var("VS_AUTH_PASSWORD");
        env::remove_var("VS_AUTH_DISABLED");
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
        assert_eq!(config.catalog.locations_path(), PathBuf::from("data/locations.json"));
        assert_eq!(config.registry.job_id_policy, JobIdPolicy::LegacySum);
        assert!(matches!(config.auth, AuthMode::Unconfigured));
        assert!(matches!(
            config.auth.ensure_configured(),
            Err(ConfigError::MissingAuth)
        ));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_job_id_policy_and_credentials() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VS_JOB_ID_POLICY", "Sequential");
        env::set_var("VS_AUTH_USERNAME", "testing");
        env::set_var("VS_AUTH_PASSWORD", "testpass");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.registry.job_id_policy, JobIdPolicy::Sequential);
        config.auth.ensure_configured().expect("credentials count");
        let AuthMode::Basic(auth) = config.auth else {
            panic!("expected basic credentials, got {:?}", config.auth);
        };
        assert_eq!(auth.username, "testing");
        assert!(!format!("{auth:?}").contains("testpass"));
        reset_env();
    }

    #[test]
    fn rejects_half_configured_credentials() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VS_AUTH_USERNAME", "testing");

        assert!(matches!(AppConfig::load(), Err(ConfigError::IncompleteAuth)));
        reset_env();
    }

    #[test]
    fn serving_without_credentials_needs_explicit_opt_out() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VS_AUTH_DISABLED", "true");

        let config = AppConfig::load().expect("config loads");
        assert!(matches!(config.auth, AuthMode::Disabled));
        assert!(config.auth.ensure_configured().is_ok());

        env::set_var("VS_AUTH_DISABLED", "no");
        let config = AppConfig::load().expect("config loads");
        assert!(matches!(config.auth, AuthMode::Unconfigured));
        reset_env();
    }

    #[test]
    fn rejects_unknown_job_id_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VS_JOB_ID_POLICY", "uuid");

        match AppConfig::load() {
            Err(ConfigError::InvalidJobIdPolicy(raw)) => assert_eq!(raw, "uuid"),
            other => panic!("expected policy error, got {other:?}"),
        }
        reset_env();
    }
}
