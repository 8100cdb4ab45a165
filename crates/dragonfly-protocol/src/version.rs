//! Firmware version decoding.
//!
//! The `!seletek version#` reply carries one packed decimal number. Its digits
//! are read by place value:
//!
//! ```text
//!   v = O M J NN
//!       | | | +-- firmware minor   (v % 100)
//!       | | +---- firmware major   (v / 100 % 10)
//!       | +------ model            (v / 1000 % 10)
//!       +-------- operative mode   (v / 10000)
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::{ProtocolError, ProtocolResult};

/// Model the client is written for. Other models are accepted with a warning.
pub const EXPECTED_MODEL: Model = Model::Dragonfly;

/// Controller run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperativeMode {
    /// Normal operation (code 0).
    Idle,
    /// Bootloader mode (code 1).
    Bootloader,
    /// Controller reports an error (code 2).
    Error,
    /// Code outside the known table.
    Unknown(u64),
}

impl OperativeMode {
    /// Map an operative code to a mode.
    pub fn from_code(code: u64) -> OperativeMode {
        match code {
            0 => OperativeMode::Idle,
            1 => OperativeMode::Bootloader,
            2 => OperativeMode::Error,
            other => OperativeMode::Unknown(other),
        }
    }

    /// Label used in the version summary. Idle has no label.
    pub fn label(&self) -> &'static str {
        match self {
            OperativeMode::Idle => "",
            OperativeMode::Bootloader => "Bootloader",
            OperativeMode::Error => "Error",
            OperativeMode::Unknown(_) => "Unknown",
        }
    }
}

/// Hardware variant of the Seletek controller family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Model {
    /// Code 0, also used for any code outside the table.
    Error,
    /// Code 1.
    Seletek,
    /// Code 2.
    Armadillo,
    /// Code 3.
    Platypus,
    /// Code 4.
    Dragonfly,
}

impl Model {
    /// Map a model digit to a model, falling back to [`Model::Error`].
    pub fn from_code(code: u64) -> Model {
        match code {
            1 => Model::Seletek,
            2 => Model::Armadillo,
            3 => Model::Platypus,
            4 => Model::Dragonfly,
            _ => Model::Error,
        }
    }

    /// Get the model name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Error => "Error",
            Model::Seletek => "Seletek",
            Model::Armadillo => "Armadillo",
            Model::Platypus => "Platypus",
            Model::Dragonfly => "Dragonfly",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded firmware identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    /// The packed number as received.
    pub raw: u64,
    /// Run mode.
    pub operative: OperativeMode,
    /// Hardware model.
    pub model: Model,
    /// Firmware major version (one digit).
    pub firmware_major: u8,
    /// Firmware minor version (two digits).
    pub firmware_minor: u8,
}

impl VersionInfo {
    /// Unpack a version number.
    pub fn from_number(raw: u64) -> VersionInfo {
        VersionInfo {
            raw,
            operative: OperativeMode::from_code(raw / 10_000),
            model: Model::from_code((raw / 1_000) % 10),
            firmware_major: ((raw / 100) % 10) as u8,
            firmware_minor: (raw % 100) as u8,
        }
    }

    /// Decode a version reply.
    ///
    /// Logs a warning when the model is not [`EXPECTED_MODEL`]; this does not
    /// affect the result.
    pub fn parse(response: &str) -> ProtocolResult<VersionInfo> {
        let info = VersionInfo::from_number(parse_version_number(response)?);
        if info.model != EXPECTED_MODEL {
            log::warn!(
                "Detected model is {} while {} model is expected",
                info.model,
                EXPECTED_MODEL
            );
        }
        Ok(info)
    }

    /// Get the human-readable summary, e.g. `Dragonfly fwv 1.5`.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.operative.label();
        if !label.is_empty() {
            write!(f, "{} ", label)?;
        }
        write!(
            f,
            "{} fwv {}.{}",
            self.model, self.firmware_major, self.firmware_minor
        )
    }
}

/// Extract the first run of decimal digits in a reply.
pub fn parse_version_number(response: &str) -> ProtocolResult<u64> {
    let response = response.trim();
    let no_version = || ProtocolError::NoVersionInfo {
        response: response.to_string(),
    };

    let start = response
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(no_version)?;
    let digits = &response[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse().map_err(|_| no_version())
}
