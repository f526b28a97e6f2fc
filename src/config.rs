use std::net::SocketAddr;
use std::time::Duration;

pub const ADDR_ENV: &str = "TRIP_PLANNER_HTTP_ADDR";
pub const LINK_DELAY_ENV: &str = "TRIP_PLANNER_LINK_DELAY_MS";

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LINK_DELAY_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a socket address, got '{value}'")]
    InvalidAddr { name: &'static str, value: String },
    #[error("{name} must be a number of milliseconds, got '{value}'")]
    InvalidDelay { name: &'static str, value: String },
}

/// Settings for the HTTP server, read from the environment.
///
/// | Env var                      | Default        |
/// |------------------------------|----------------|
/// | `TRIP_PLANNER_HTTP_ADDR`     | `0.0.0.0:3000` |
/// | `TRIP_PLANNER_LINK_DELAY_MS` | `500`          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub addr: SocketAddr,
    /// Artificial wait before the mock link parser answers.
    pub link_parse_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            link_parse_delay: Duration::from_millis(DEFAULT_LINK_DELAY_MS),
        }
    }
}

impl HttpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(ADDR_ENV).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                name: ADDR_ENV,
                value: raw_addr.clone(),
            })?;

        let link_parse_delay = match lookup(LINK_DELAY_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidDelay {
                    name: LINK_DELAY_ENV,
                    value: raw.clone(),
                })?,
            None => Duration::from_millis(DEFAULT_LINK_DELAY_MS),
        };

        Ok(Self {
            addr,
            link_parse_delay,
        })
    }
}
