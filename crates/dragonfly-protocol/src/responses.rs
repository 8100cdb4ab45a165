//! Response decoding for the Dragonfly protocol.
//!
//! Replies are free-form text. Three shapes are understood:
//! - Relay status: a closed relay's reply ends in `1#`; anything else is open
//! - Sensor status: `<label>:<value>#`
//! - Composite records: `<prefix>:<name>,<f1>,<f2>,<active>,...,<state>`, built
//!   by joining a data reply and a status token (see [`compose_record`](crate::compose_record))

use serde::Serialize;

use crate::codec::{COMMAND_TERMINATOR, FIELD_SEPARATOR, NAME_SEPARATOR};
use crate::commands::RelayState;
use crate::error::{ProtocolError, ProtocolResult};

/// Sensor status reported when the device sends an empty reply.
pub const UNKNOWN_SENSOR_STATUS: &str = "unknown";

/// Suffix of a relay status reply for a closed contact.
const CLOSED_SUFFIX: &str = "1#";

/// Position of the activity flag in a relay record.
const RELAY_ACTIVE_FIELD: usize = 3;

/// Decode a relay status reply.
///
/// This is a binary classification: the relay is closed if the reply ends with
/// `1#`, and open otherwise, including when the reply is empty.
pub fn decode_relay_state(raw: &str) -> RelayState {
    if raw.ends_with(CLOSED_SUFFIX) {
        RelayState::Closed
    } else {
        RelayState::Open
    }
}

/// Decode a sensor status reply.
///
/// The status is the text after the first `:` (up to any following `:`),
/// with trailing `#` removed. An empty reply decodes to
/// [`UNKNOWN_SENSOR_STATUS`]; a non-empty reply without `:` is malformed.
pub fn decode_sensor_status(raw: &str) -> ProtocolResult<String> {
    if raw.is_empty() {
        return Ok(UNKNOWN_SENSOR_STATUS.to_string());
    }

    let status = raw
        .split(NAME_SEPARATOR)
        .nth(1)
        .ok_or_else(|| ProtocolError::MalformedResponse {
            expected: "a ':' separated sensor status",
            response: raw.to_string(),
        })?;

    Ok(status.trim_end_matches(COMMAND_TERMINATOR).to_string())
}

/// Channel name carried in the first field of a record: the text after the last `:`.
fn channel_name(field: &str) -> &str {
    field
        .rsplit_once(NAME_SEPARATOR)
        .map_or(field, |(_, name)| name)
}

/// Relay record decoded from a composite reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayStatus {
    /// Channel name as configured on the device.
    pub name: String,
    /// Whether the relay is enabled (field 3 is exactly `1`).
    pub is_active: bool,
    /// Last field of the record, verbatim.
    pub state: String,
}

impl RelayStatus {
    /// Parse a composite relay record.
    ///
    /// Requires at least four comma-separated fields so the activity flag
    /// can be read.
    pub fn parse(record: &str) -> ProtocolResult<RelayStatus> {
        let parts: Vec<&str> = record.split(FIELD_SEPARATOR).collect();
        if parts.len() <= RELAY_ACTIVE_FIELD {
            return Err(ProtocolError::MalformedResponse {
                expected: "at least 4 comma-separated relay fields",
                response: record.to_string(),
            });
        }

        Ok(RelayStatus {
            name: channel_name(parts[0]).to_string(),
            is_active: parts[RELAY_ACTIVE_FIELD] == "1",
            state: parts[parts.len() - 1].to_string(),
        })
    }
}

/// Sensor record decoded from a composite reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorStatus {
    /// Channel name as configured on the device.
    pub name: String,
    /// Last field of the record, verbatim. Kept as text because the numeric
    /// encoding depends on the channel type.
    pub value: String,
}

impl SensorStatus {
    /// Parse a composite sensor record.
    ///
    /// Every string has at least one field, so this cannot fail; a record
    /// without commas yields the same text as name source and value.
    pub fn parse(record: &str) -> SensorStatus {
        let first = record.split(FIELD_SEPARATOR).next().unwrap_or(record);
        let last = record.rsplit(FIELD_SEPARATOR).next().unwrap_or(record);

        SensorStatus {
            name: channel_name(first).to_string(),
            value: last.to_string(),
        }
    }
}

/// Decode a composite relay record. See [`RelayStatus::parse`].
pub fn decode_relay_record(record: &str) -> ProtocolResult<RelayStatus> {
    RelayStatus::parse(record)
}

/// Decode a composite sensor record. See [`SensorStatus::parse`].
pub fn decode_sensor_record(record: &str) -> SensorStatus {
    SensorStatus::parse(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_state_closed() {
        assert_eq!(decode_relay_state("!relio rldgrd 0 3 1#"), RelayState::Closed);
        assert_eq!(decode_relay_state("1#"), RelayState::Closed);
    }

    #[test]
    fn test_relay_state_open() {
        assert_eq!(decode_relay_state("!relio rldgrd 0 3 0#"), RelayState::Open);
        assert_eq!(decode_relay_state("!relio rldgrd 0 3 1"), RelayState::Open);
        assert_eq!(decode_relay_state("11"), RelayState::Open);
    }

    #[test]
    fn test_relay_state_empty_is_open() {
        assert_eq!(decode_relay_state(""), RelayState::Open);
    }

    #[test]
    fn test_sensor_status_value() {
        assert_eq!(decode_sensor_status("Name:42#").unwrap(), "42");
        assert_eq!(decode_sensor_status("!relio snanrd 0 2:1023#").unwrap(), "1023");
    }

    #[test]
    fn test_sensor_status_stops_at_second_colon() {
        assert_eq!(decode_sensor_status("a:b:c#").unwrap(), "b");
    }

    #[test]
    fn test_sensor_status_empty_is_unknown() {
        assert_eq!(decode_sensor_status("").unwrap(), UNKNOWN_SENSOR_STATUS);
    }

    #[test]
    fn test_sensor_status_without_colon_is_malformed() {
        let err = decode_sensor_status("garbage#").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedResponse { .. }));
    }

    #[test]
    fn test_relay_record_active() {
        let relay = decode_relay_record("ch:Door,0,0,1,closed").unwrap();
        assert_eq!(
            relay,
            RelayStatus {
                name: "Door".to_string(),
                is_active: true,
                state: "closed".to_string(),
            }
        );
    }

    #[test]
    fn test_relay_record_inactive() {
        let relay = decode_relay_record("ch:Door,0,0,0,open").unwrap();
        assert_eq!(relay.name, "Door");
        assert!(!relay.is_active);
        assert_eq!(relay.state, "open");
    }

    #[test]
    fn test_relay_record_name_after_last_colon() {
        let relay = decode_relay_record("!relio:getreldata:Roof Motor,1,2,1,x,open").unwrap();
        assert_eq!(relay.name, "Roof Motor");
        assert_eq!(relay.state, "open");
    }

    #[test]
    fn test_relay_record_activity_must_be_exactly_one() {
        assert!(!decode_relay_record("ch:A,0,0,01,open").unwrap().is_active);
        assert!(!decode_relay_record("ch:A,0,0, 1,open").unwrap().is_active);
    }

    #[test]
    fn test_relay_record_too_short_is_malformed() {
        let err = decode_relay_record("ch:Door,0,closed").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedResponse {
                expected: "at least 4 comma-separated relay fields",
                response: "ch:Door,0,closed".to_string(),
            }
        );
    }

    #[test]
    fn test_sensor_record() {
        let sensor = decode_sensor_record("ch:Temp,1,2,23.5");
        assert_eq!(
            sensor,
            SensorStatus {
                name: "Temp".to_string(),
                value: "23.5".to_string(),
            }
        );
    }

    #[test]
    fn test_sensor_record_without_separators() {
        let sensor = decode_sensor_record("Rain");
        assert_eq!(sensor.name, "Rain");
        assert_eq!(sensor.value, "Rain");
    }

    #[test]
    fn test_records_serialize_with_report_field_names() {
        let relay = decode_relay_record("ch:Door,0,0,1,closed").unwrap();
        let json = serde_json::to_value(&relay).unwrap();
        assert_eq!(json["name"], "Door");
        assert_eq!(json["is_active"], true);
        assert_eq!(json["state"], "closed");

        let sensor = decode_sensor_record("ch:Temp,1,2,23.5");
        let json = serde_json::to_value(&sensor).unwrap();
        assert_eq!(json["value"], "23.5");
    }
}
