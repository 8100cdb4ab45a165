//! Command-line arguments.

use std::time::Duration;

use clap::{Parser, Subcommand};
use dragonfly_client::{ChannelId, RelayState, SessionConfig};

/// Channels in a standard controller bank.
pub const DEFAULT_CHANNELS: ChannelId = 8;

/// Query and control a Dragonfly dome controller over UDP.
#[derive(Debug, Parser)]
#[command(name = "dragonfly", version, about)]
pub struct Cli {
    /// Controller host name or IP address.
    #[arg(long, env = "DRAGONFLY_IP")]
    pub host: String,

    /// Controller UDP port.
    #[arg(long, env = "DRAGONFLY_PORT")]
    pub port: u16,

    /// Per-attempt reply timeout in milliseconds.
    #[arg(long, default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: u64,

    /// Number of channels read by `relays`, `sensors` and `all`.
    #[arg(long, default_value_t = DEFAULT_CHANNELS)]
    pub channels: ChannelId,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

impl Cli {
    /// Build the session configuration from the connection arguments.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.host.clone(), self.port)
            .with_timeout(Duration::from_millis(self.timeout_ms))
    }
}

/// Device operations exposed on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Read one relay's name, activity flag and state.
    Relay {
        /// Relay index.
        id: ChannelId,
    },
    /// Read one sensor's name and value.
    Sensor {
        /// Sensor index.
        id: ChannelId,
    },
    /// Read every relay in the bank.
    Relays,
    /// Read every sensor in the bank.
    Sensors,
    /// Read every sensor and relay in the bank.
    All,
    /// Read whether a relay is open or closed.
    RelayStatus {
        /// Relay index.
        id: ChannelId,
    },
    /// Read a sensor's status value.
    SensorStatus {
        /// Sensor index.
        id: ChannelId,
    },
    /// Drive a relay open or closed.
    SetRelay {
        /// Relay index.
        id: ChannelId,
        /// `open` or `closed`.
        state: RelayState,
    },
    /// Toggle a relay.
    ToggleRelay {
        /// Relay index.
        id: ChannelId,
    },
    /// Read the firmware version.
    Version,
    /// Send command text verbatim and print the reply.
    Raw {
        /// Command text; `#` is appended if missing.
        text: String,
    },
}
