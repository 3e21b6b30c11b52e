use crate::workflows::losses::{EngineConfig, ZeroDeliveryPolicy};
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: load_engine()?,
        })
    }
}

/// Engine constants: defaults, then `LOSS_ENGINE_CONFIG`, then the `LOSS_*` overrides.
fn load_engine() -> Result<EngineConfig, ConfigError> {
    let mut engine = match env::var("LOSS_ENGINE_CONFIG") {
        Ok(path) if !path.trim().is_empty() => read_engine_file(PathBuf::from(path))?,
        _ => EngineConfig::default(),
    };

    if let Some(value) = float_var("LOSS_TARIFF_RATE")? {
        engine.tariff.tariff_rate = value;
    }
    if let Some(value) = float_var("LOSS_HOURS_PER_PERIOD")? {
        engine.tariff.hours_per_period = value;
    }
    if let Some(value) = float_var("LOSS_LOAD_FACTOR")? {
        engine.tariff.load_factor = value;
    }

    if let Ok(raw) = env::var("LOSS_PRIORITY_SECTORS") {
        engine.rules.priority_sectors = raw
            .split(',')
            .map(str::trim)
            .filter(|sector| !sector.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Ok(raw) = env::var("LOSS_ZERO_DELIVERY_POLICY") {
        engine.zero_delivery =
            ZeroDeliveryPolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "LOSS_ZERO_DELIVERY_POLICY",
                value: raw.clone(),
            })?;
    }

    if let Ok(raw) = env::var("LOSS_CLAMP_PCT_SCORE") {
        engine.scoring.clamp_pct_score = parse_bool(&raw).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "LOSS_CLAMP_PCT_SCORE",
                value: raw.clone(),
            }
        })?;
    }

    engine.validate().map_err(ConfigError::InvalidEngine)?;
    Ok(engine)
}

fn read_engine_file(path: PathBuf) -> Result<EngineConfig, ConfigError> {
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::EngineFile {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::EngineFileFormat { path, source })
}

fn float_var(key: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidValue {
        key: &'static str,
        value: String,
    },
    EngineFile {
        path: PathBuf,
        source: std::io::Error,
    },
    EngineFileFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidEngine(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{} has an unsupported value '{}'", key, value)
            }
            ConfigError::EngineFile { path, .. } => {
                write!(f, "unable to read engine config {}", path.display())
            }
            ConfigError::EngineFileFormat { path, source } => {
                write!(f, "engine config {} is not valid: {}", path.display(), source)
            }
            ConfigError::InvalidEngine(reason) => write!(f, "invalid engine config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::EngineFile { source, .. } => Some(source),
            ConfigError::EngineFileFormat { source, .. } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidValue { .. }
            | ConfigError::InvalidEngine(_) => None,
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
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "LOSS_ENGINE_CONFIG",
            "LOSS_TARIFF_RATE",
            "LOSS_HOURS_PER_PERIOD",
            "LOSS_LOAD_FACTOR",
            "LOSS_PRIORITY_SECTORS",
            "LOSS_ZERO_DELIVERY_POLICY",
            "LOSS_CLAMP_PCT_SCORE",
        ] {
            env::remove_var(key);
        }
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
        assert_eq!(config.engine, EngineConfig::default());
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
    fn engine_overrides_apply_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LOSS_TARIFF_RATE", "9.75");
        env::set_var("LOSS_PRIORITY_SECTORS", "Gazcue, Boca Chica,");
        env::set_var("LOSS_ZERO_DELIVERY_POLICY", "skip");
        env::set_var("LOSS_CLAMP_PCT_SCORE", "true");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.engine.tariff.tariff_rate, 9.75);
        assert_eq!(config.engine.tariff.hours_per_period, 730.0);
        assert_eq!(
            config.engine.rules.priority_sectors,
            vec!["Gazcue".to_string(), "Boca Chica".to_string()]
        );
        assert_eq!(config.engine.zero_delivery, ZeroDeliveryPolicy::SkipRecord);
        assert!(config.engine.scoring.clamp_pct_score);
    }

    #[test]
    fn rejects_unknown_zero_delivery_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LOSS_ZERO_DELIVERY_POLICY", "ignore");
        let error = AppConfig::load().expect_err("policy rejected");
        reset_env();

        match error {
            ConfigError::InvalidValue { key, value } => {
                assert_eq!(key, "LOSS_ZERO_DELIVERY_POLICY");
                assert_eq!(value, "ignore");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_load_factor() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LOSS_LOAD_FACTOR", "0");
        let error = AppConfig::load().expect_err("load factor rejected");
        reset_env();

        assert!(matches!(error, ConfigError::InvalidEngine(_)));
    }

    #[test]
    fn engine_file_is_merged_before_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = env::temp_dir().join(format!("puntorojo-engine-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"tariff": {"tariff_rate": 15.0}, "rules": {"high_score": 75.0}}"#,
        )
        .expect("write engine file");
        env::set_var("LOSS_ENGINE_CONFIG", &path);
        env::set_var("LOSS_TARIFF_RATE", "11.0");

        let config = AppConfig::load();
        reset_env();
        std::fs::remove_file(&path).ok();
        let config = config.expect("config loads");

        assert_eq!(config.engine.tariff.tariff_rate, 11.0);
        assert_eq!(config.engine.tariff.load_factor, 0.8);
        assert_eq!(config.engine.rules.high_score, 75.0);
        assert_eq!(config.engine.rules.medium_score, 40.0);
    }

    #[test]
    fn missing_engine_file_is_reported() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LOSS_ENGINE_CONFIG", "./no-such-engine.json");
        let error = AppConfig::load().expect_err("missing file rejected");
        reset_env();

        assert!(matches!(error, ConfigError::EngineFile { .. }));
    }
}
