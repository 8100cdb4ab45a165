//! Session configuration.

use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Per-attempt reply timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Environment variable holding the controller address.
pub const HOST_ENV: &str = "DRAGONFLY_IP";

/// Environment variable holding the controller UDP port.
pub const PORT_ENV: &str = "DRAGONFLY_PORT";

/// Where to find the controller and how long to wait for each reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Host name or IP address of the controller.
    pub host: String,
    /// UDP port of the controller.
    pub port: u16,
    /// How long to wait for a reply before resending.
    pub timeout: Duration,
}

impl SessionConfig {
    /// Create a configuration with the default timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        SessionConfig {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the controller address from `DRAGONFLY_IP` and `DRAGONFLY_PORT`.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let host = lookup(HOST_ENV)
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| ClientError::Config(format!("{HOST_ENV} is not set")))?;
        let port = lookup(PORT_ENV)
            .ok_or_else(|| ClientError::Config(format!("{PORT_ENV} is not set")))?;
        let port = port.trim().parse::<u16>().map_err(|e| {
            ClientError::Config(format!("{PORT_ENV} is not a valid port ({port:?}): {e}"))
        })?;

        Ok(SessionConfig::new(host.trim(), port))
    }
}
