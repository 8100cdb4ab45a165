//! JSON reports for each subcommand.
//!
//! The payload shapes follow the controller's REST API: single records are
//! wrapped in a one-element list under `relay` / `sensor`, bank reads are
//! lists under `relays` / `sensors`.

use dragonfly_client::{
    ChannelId, ClientResult, DomeController, RelayStatus, SensorStatus, Transport,
};
use serde_json::{json, Value};

use crate::cli::CliCommand;

/// Read relays `0..channels` on one session.
pub fn relay_bank<T: Transport>(
    dome: &mut DomeController<T>,
    channels: ChannelId,
) -> ClientResult<Vec<RelayStatus>> {
    (0..channels).map(|id| dome.relay_record(id)).collect()
}

/// Read sensors `0..channels` on one session.
pub fn sensor_bank<T: Transport>(
    dome: &mut DomeController<T>,
    channels: ChannelId,
) -> ClientResult<Vec<SensorStatus>> {
    (0..channels).map(|id| dome.sensor_record(id)).collect()
}

/// Run one subcommand and build its report.
pub fn execute<T: Transport>(
    dome: &mut DomeController<T>,
    command: &CliCommand,
    channels: ChannelId,
) -> ClientResult<Value> {
    let report = match command {
        CliCommand::Relay { id } => json!({ "relay": [dome.relay_record(*id)?] }),
        CliCommand::Sensor { id } => json!({ "sensor": [dome.sensor_record(*id)?] }),
        CliCommand::Relays => json!({ "relays": relay_bank(dome, channels)? }),
        CliCommand::Sensors => json!({ "sensors": sensor_bank(dome, channels)? }),
        CliCommand::All => {
            let mut sensors = Vec::new();
            let mut relays = Vec::new();
            for id in 0..channels {
                sensors.push(dome.sensor_record(id)?);
                relays.push(dome.relay_record(id)?);
            }
            json!({ "sensors": sensors, "relays": relays })
        }
        CliCommand::RelayStatus { id } => {
            json!({ "relay": id, "state": dome.relay_status(*id)? })
        }
        CliCommand::SensorStatus { id } => {
            json!({ "sensor": id, "status": dome.sensor_status(*id)? })
        }
        CliCommand::SetRelay { id, state } => {
            json!({ "response": dome.set_relay_state(*id, *state)? })
        }
        CliCommand::ToggleRelay { id } => json!({ "response": dome.toggle_relay(*id)? }),
        CliCommand::Version => match dome.read_firmware_version()? {
            Some(version) => json!({ "version": version, "summary": version.summary() }),
            None => json!({ "version": null }),
        },
        CliCommand::Raw { text } => json!({ "response": dome.send_raw(text)? }),
    };
    Ok(report)
}
