//! Dragonfly Dome Controller Protocol
//!
//! This crate provides types and utilities for talking to Lunatico Seletek
//! family controllers (the Dragonfly dome controller in particular) over their
//! ASCII-over-UDP interface. It performs no I/O; see `dragonfly-client` for the
//! socket side.
//!
//! # Protocol Overview
//!
//! Every exchange is one datagram each way:
//!
//! - **Commands** (host → device): ASCII text terminated with `#`
//! - **Responses** (device → host): ASCII text, trimmed of surrounding whitespace
//!
//! Replies have no formal grammar. The only structure the decoders rely on is
//! comma-separated fields, with the channel name after a `:` in the first field
//! and the state token in the last field.
//!
//! # Command Types
//!
//! - **Relay I/O commands** (`!relio ...`): relay and sensor queries, relay set/toggle
//! - **Controller commands** (`!seletek ...`): firmware version query
//!
//! # Example
//!
//! ```
//! use dragonfly_protocol::{decode_relay_record, Command, RelayState};
//!
//! let cmd = Command::SetRelay { relay: 3, state: RelayState::Closed };
//! assert_eq!(cmd.to_command_string(), "!relio rlset 2 3 1#");
//!
//! let relay = decode_relay_record("ch:Door,0,0,1,closed")?;
//! assert_eq!(relay.name, "Door");
//! assert!(relay.is_active);
//! # Ok::<(), dragonfly_protocol::ProtocolError>(())
//! ```

mod codec;
mod commands;
mod error;
mod responses;
mod version;

pub use codec::*;
pub use commands::*;
pub use error::*;
pub use responses::*;
pub use version::*;
