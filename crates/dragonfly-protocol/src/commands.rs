//! Commands that can be sent to the dome controller.
//!
//! Two command families exist:
//! - Relay I/O commands (`!relio ...`) for relays and sensors
//! - Controller commands (`!seletek ...`), of which only `version` is used
//!
//! Channel indices are not validated. Controllers are conventionally wired as
//! an 8-channel bank (0-7), but that range belongs to the caller.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::codec::{self, COMMAND_TERMINATOR};
use crate::error::{ProtocolError, ProtocolResult};

/// Index of a relay or sensor channel.
pub type ChannelId = u32;

/// Prefix of relay I/O commands.
const RELIO: &str = "!relio";

/// Prefix of controller commands.
const SELETEK: &str = "!seletek";

/// Binary state of a relay contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayState {
    /// Contact open (wire value `0`).
    Open,
    /// Contact closed (wire value `1`).
    Closed,
}

impl RelayState {
    /// Get the lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayState::Open => "open",
            RelayState::Closed => "closed",
        }
    }

    /// Get the digit used in `rlset` commands.
    pub fn wire_value(&self) -> &'static str {
        match self {
            RelayState::Open => "0",
            RelayState::Closed => "1",
        }
    }

    fn from_wire_value(s: &str) -> Option<RelayState> {
        match s {
            "0" => Some(RelayState::Open),
            "1" => Some(RelayState::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelayState {
    type Err = ProtocolError;

    fn from_str(s: &str) -> ProtocolResult<RelayState> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(RelayState::Open),
            "closed" => Ok(RelayState::Closed),
            _ => Err(ProtocolError::InvalidRelayState(s.to_string())),
        }
    }
}

/// Commands understood by the dome controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ========== Relay I/O Commands ==========
    /// Read the digital state of a relay (`rldgrd`).
    RelayStatus {
        /// Relay index.
        relay: ChannelId,
    },

    /// Read the analog status of a sensor (`snanrd`).
    SensorStatus {
        /// Sensor index.
        sensor: ChannelId,
    },

    /// Read the configuration record of a relay, including its name (`getreldata`).
    RelayData {
        /// Relay index.
        relay: ChannelId,
    },

    /// Read the configuration record of a sensor, including its name (`getsendata`).
    SensorData {
        /// Sensor index.
        sensor: ChannelId,
    },

    /// Toggle a relay (`rlchg`).
    ToggleRelay {
        /// Relay index.
        relay: ChannelId,
    },

    /// Drive a relay to a given state (`rlset`).
    SetRelay {
        /// Relay index.
        relay: ChannelId,
        /// Desired contact state.
        state: RelayState,
    },

    // ========== Controller Commands ==========
    /// Query the packed firmware version number.
    Version,

    // ========== Raw Command ==========
    /// Send a raw command string. A missing terminator is appended.
    Raw {
        /// The raw command text.
        command: String,
    },
}

impl Command {
    /// Encode the command as the bytes of one datagram.
    pub fn encode(&self) -> Vec<u8> {
        codec::encode_command(&self.to_command_string())
    }

    /// Get the full command text, including the `#` terminator.
    pub fn to_command_string(&self) -> String {
        match self {
            Command::RelayStatus { relay } => format!("{RELIO} rldgrd 0 {relay}#"),
            Command::SensorStatus { sensor } => format!("{RELIO} snanrd 0 {sensor}#"),
            Command::RelayData { relay } => format!("{RELIO} getreldata {relay}#"),
            Command::SensorData { sensor } => format!("{RELIO} getsendata {sensor}#"),
            Command::ToggleRelay { relay } => format!("{RELIO} rlchg 2 {relay} 1#"),
            Command::SetRelay { relay, state } => {
                format!("{RELIO} rlset 2 {relay} {}#", state.wire_value())
            }
            Command::Version => format!("{SELETEK} version#"),
            Command::Raw { command } => {
                if command.ends_with(COMMAND_TERMINATOR) {
                    command.clone()
                } else {
                    codec::terminate(command)
                }
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_string())
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    /// Parse wire text back into a command.
    ///
    /// Only the known command forms are recognised; anything else is
    /// [`ProtocolError::InvalidCommand`]. `Raw` is never produced.
    fn from_str(s: &str) -> ProtocolResult<Command> {
        let invalid = || ProtocolError::InvalidCommand(s.to_string());

        let body = s.trim().strip_suffix(COMMAND_TERMINATOR).ok_or_else(invalid)?;
        let tokens: Vec<&str> = body.split_whitespace().collect();
        let channel = |token: &str| token.parse::<ChannelId>().map_err(|_| invalid());

        match tokens.as_slice() {
            [RELIO, "rldgrd", "0", relay] => Ok(Command::RelayStatus { relay: channel(*relay)? }),
            [RELIO, "snanrd", "0", sensor] => Ok(Command::SensorStatus {
                sensor: channel(*sensor)?,
            }),
            [RELIO, "getreldata", relay] => Ok(Command::RelayData { relay: channel(*relay)? }),
            [RELIO, "getsendata", sensor] => Ok(Command::SensorData { sensor: channel(*sensor)? }),
            [RELIO, "rlchg", "2", relay, "1"] => Ok(Command::ToggleRelay {
                relay: channel(*relay)?,
            }),
            [RELIO, "rlset", "2", relay, value] => {
                let state = RelayState::from_wire_value(value).ok_or_else(invalid)?;
                Ok(Command::SetRelay { relay: channel(*relay)?, state })
            }
            [SELETEK, "version"] => Ok(Command::Version),
            _ => Err(invalid()),
        }
    }
}
