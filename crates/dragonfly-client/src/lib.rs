//! # dragonfly-client
//!
//! Blocking UDP client for Dragonfly dome controllers.
//!
//! A [`Session`] owns one datagram socket for the duration of a logical
//! interaction. Each command is sent and answered before the next one goes
//! out; a command that gets no reply is resent up to [`MAX_ATTEMPTS`] times
//! before failing with [`ClientError::Timeout`]. The socket is released exactly
//! once, either by [`Session::close`] or when the session is dropped.
//!
//! [`DomeController`] layers the device operations (relay and sensor queries,
//! relay control, firmware version) on top of a session.
//!
//! Sessions are not shared. The device protocol carries no request IDs, so
//! callers that talk to one controller from several threads must serialize
//! access themselves.
//!
//! ## Example
//!
//! ```no_run
//! use dragonfly_client::{DomeController, RelayState, SessionConfig};
//!
//! let config = SessionConfig::new("192.168.1.50", 10000);
//! let version = DomeController::scoped(&config, |dome| {
//!     dome.set_relay_state(0, RelayState::Closed)?;
//!     dome.read_firmware_version()
//! })?;
//! if let Some(info) = version {
//!     println!("{}", info.summary());
//! }
//! # Ok::<(), dragonfly_client::ClientError>(())
//! ```

mod config;
mod controller;
mod error;
mod session;
mod transport;

pub use config::{SessionConfig, DEFAULT_TIMEOUT, HOST_ENV, PORT_ENV};
pub use controller::DomeController;
pub use error::{ClientError, ClientResult};
pub use session::{Session, MAX_ATTEMPTS};
pub use transport::{is_timeout, Transport, UdpTransport};

pub use dragonfly_protocol::{
    decode_relay_record, decode_sensor_record, ChannelId, Command, Model, OperativeMode,
    ProtocolError, RelayState, RelayStatus, SensorStatus, VersionInfo,
};
