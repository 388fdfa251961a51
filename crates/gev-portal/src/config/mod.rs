use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::workflows::admissions::SimulatedReviewPolicy;
use crate::workflows::catalog::{Catalog, CatalogError};
use crate::workflows::portal::UploadSimulation;

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
    pub portal: PortalConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            portal: PortalConfig::from_env()?,
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

/// Catalog source and the timings of the simulated review and uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    pub catalog_path: Option<PathBuf>,
    pub review_delay: Duration,
    pub decision_delay: Duration,
    pub upload_tick: Duration,
    pub upload_step: u8,
    pub upload_settle: Duration,
    pub upload_success_ratio: f64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            review_delay: Duration::from_secs(15),
            decision_delay: Duration::from_secs(30),
            upload_tick: Duration::from_millis(150),
            upload_step: 10,
            upload_settle: Duration::from_millis(500),
            upload_success_ratio: 0.8,
        }
    }
}

impl PortalConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let catalog_path = env::var("GEV_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let review_delay = Duration::from_secs(parse_var(
            "GEV_REVIEW_DELAY_SECS",
            defaults.review_delay.as_secs(),
        )?);
        let decision_delay = Duration::from_secs(parse_var(
            "GEV_DECISION_DELAY_SECS",
            defaults.decision_delay.as_secs(),
        )?);
        if decision_delay < review_delay {
            return Err(ConfigError::OutOfRange {
                variable: "GEV_DECISION_DELAY_SECS",
                expected: "at least GEV_REVIEW_DELAY_SECS",
            });
        }

        let upload_tick = Duration::from_millis(parse_var(
            "GEV_UPLOAD_TICK_MS",
            defaults.upload_tick.as_millis() as u64,
        )?);
        let upload_step = parse_var("GEV_UPLOAD_STEP", defaults.upload_step)?;
        if !(1..=100).contains(&upload_step) {
            return Err(ConfigError::OutOfRange {
                variable: "GEV_UPLOAD_STEP",
                expected: "between 1 and 100",
            });
        }
        let upload_settle = Duration::from_millis(parse_var(
            "GEV_UPLOAD_SETTLE_MS",
            defaults.upload_settle.as_millis() as u64,
        )?);
        let upload_success_ratio =
            parse_var("GEV_UPLOAD_SUCCESS_RATIO", defaults.upload_success_ratio)?;
        if !(0.0..=1.0).contains(&upload_success_ratio) {
            return Err(ConfigError::OutOfRange {
                variable: "GEV_UPLOAD_SUCCESS_RATIO",
                expected: "between 0 and 1",
            });
        }

        Ok(Self {
            catalog_path,
            review_delay,
            decision_delay,
            upload_tick,
            upload_step,
            upload_settle,
            upload_success_ratio,
        })
    }

    /// Reads the configured catalog file, or the embedded seed data when unset.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_path(path),
            None => Catalog::embedded(),
        }
    }

    pub fn review_policy(&self) -> SimulatedReviewPolicy {
        SimulatedReviewPolicy::new(self.review_delay, self.decision_delay)
    }

    pub fn upload_simulation(&self) -> UploadSimulation {
        UploadSimulation::new(
            self.upload_tick,
            self.upload_step,
            self.upload_settle,
            self.upload_success_ratio,
        )
    }
}

fn parse_var<T: FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable, value }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
    OutOfRange { variable: &'static str, expected: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a number, got '{value}'")
            }
            ConfigError::OutOfRange { variable, expected } => {
                write!(f, "{variable} must be {expected}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. } => None,
        }
    }
}
