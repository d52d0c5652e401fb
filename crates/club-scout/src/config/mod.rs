use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::recommendations::{FactorWeights, RatingScale, ScoringConfig};

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
    pub scoring: ScoringConfig,
    pub data: DataConfig,
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

        let defaults = ScoringConfig::default();
        let weights = FactorWeights {
            fit: parse_or("SCOUT_WEIGHT_FIT", defaults.weights.fit)?,
            performance: parse_or("SCOUT_WEIGHT_PERFORMANCE", defaults.weights.performance)?,
            availability: parse_or("SCOUT_WEIGHT_AVAILABILITY", defaults.weights.availability)?,
            news_impact: parse_or("SCOUT_WEIGHT_NEWS_IMPACT", defaults.weights.news_impact)?,
            risk_penalty: parse_or("SCOUT_WEIGHT_RISK", defaults.weights.risk_penalty)?,
        };
        let rating_scale = RatingScale {
            min: parse_or("SCOUT_RATING_MIN", defaults.rating_scale.min)?,
            max: parse_or("SCOUT_RATING_MAX", defaults.rating_scale.max)?,
        };
        let news_window_days = parse_or("SCOUT_NEWS_WINDOW_DAYS", defaults.news_window_days)?;

        let fetch_timeout_ms = parse_or("SCOUT_FETCH_TIMEOUT_MS", 5_000u64)?;
        let fixture_path = env::var("SCOUT_FIXTURE_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            scoring: ScoringConfig {
                weights,
                rating_scale,
                news_window_days,
            },
            data: DataConfig {
                fixture_path,
                fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            },
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        _ => Ok(default),
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
    /// Colourised output, only enabled for local development.
    pub ansi: bool,
}

/// Where the candidate pool comes from and how long a fetch may take.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub fixture_path: Option<PathBuf>,
    pub fetch_timeout: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
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
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SCOUT_WEIGHT_FIT",
            "SCOUT_WEIGHT_PERFORMANCE",
            "SCOUT_WEIGHT_AVAILABILITY",
            "SCOUT_WEIGHT_NEWS_IMPACT",
            "SCOUT_WEIGHT_RISK",
            "SCOUT_RATING_MIN",
            "SCOUT_RATING_MAX",
            "SCOUT_NEWS_WINDOW_DAYS",
            "SCOUT_FETCH_TIMEOUT_MS",
            "SCOUT_FIXTURE_PATH",
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
        assert_eq!(config.scoring, ScoringConfig::default());
        assert_eq!(config.data.fetch_timeout, Duration::from_millis(5_000));
        assert!(config.data.fixture_path.is_none());
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
    fn weight_overrides_are_read_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCOUT_WEIGHT_FIT", "0.40");
        env::set_var("SCOUT_WEIGHT_PERFORMANCE", "0.25");
        env::set_var("SCOUT_WEIGHT_NEWS_IMPACT", "0.10");
        env::set_var("SCOUT_FETCH_TIMEOUT_MS", "250");
        let config = AppConfig::load().expect("config loads");
        assert!((config.scoring.weights.fit - 0.40).abs() < f32::EPSILON);
        assert!((config.scoring.weights.news_impact - 0.10).abs() < f32::EPSILON);
        assert_eq!(config.data.fetch_timeout, Duration::from_millis(250));
        assert!(config.scoring.validate().is_ok());
        reset_env();
    }

    #[test]
    fn ansi_output_is_limited_to_development() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let development = AppConfig::load().expect("config loads");
        assert!(development.telemetry.ansi);

        env::set_var("APP_ENV", "production");
        let production = AppConfig::load().expect("config loads");
        assert_eq!(production.environment, AppEnvironment::Production);
        assert!(!production.telemetry.ansi);
        reset_env();
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCOUT_RATING_MAX", "ten");
        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { key, value }) => {
                assert_eq!(key, "SCOUT_RATING_MAX");
                assert_eq!(value, "ten");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
        reset_env();
    }
}
