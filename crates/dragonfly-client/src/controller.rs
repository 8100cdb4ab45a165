//! Device operations on top of a session.

use dragonfly_protocol::{
    compose_record, decode_relay_record, decode_relay_state, decode_sensor_record,
    decode_sensor_status, ChannelId, Command, RelayState, RelayStatus, SensorStatus, VersionInfo,
};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::ClientResult;
use crate::session::Session;
use crate::transport::{Transport, UdpTransport};

/// Client for one Dragonfly dome controller.
///
/// Every operation is one or two blocking round trips on the underlying
/// [`Session`]. Channel indices are passed through without range checks.
#[derive(Debug)]
pub struct DomeController<T: Transport = UdpTransport> {
    session: Session<T>,
}

impl DomeController<UdpTransport> {
    /// Open a UDP session to the configured controller.
    pub fn open(config: &SessionConfig) -> ClientResult<Self> {
        Ok(DomeController::new(Session::open(config)?))
    }

    /// Open a session, run `f`, and close the session whatever `f` returns.
    pub fn scoped<R>(
        config: &SessionConfig,
        f: impl FnOnce(&mut Self) -> ClientResult<R>,
    ) -> ClientResult<R> {
        DomeController::open(config)?.scope(f)
    }
}

impl<T: Transport> DomeController<T> {
    /// Wrap an open session.
    pub fn new(session: Session<T>) -> Self {
        DomeController { session }
    }

    /// Create a controller over an already opened transport.
    pub fn with_transport(transport: T) -> Self {
        DomeController::new(Session::with_transport(transport))
    }

    /// Run `f` against this controller and close the session afterwards,
    /// including when `f` fails.
    pub fn scope<R>(mut self, f: impl FnOnce(&mut Self) -> ClientResult<R>) -> ClientResult<R> {
        let result = f(&mut self);
        self.close();
        result
    }

    /// Get the underlying session.
    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Check whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Close the session.
    pub fn close(&mut self) {
        self.session.close();
    }

    /// Read whether a relay is open or closed.
    pub fn relay_status(&mut self, relay: ChannelId) -> ClientResult<RelayState> {
        let response = self.session.send(&Command::RelayStatus { relay })?;
        Ok(decode_relay_state(&response))
    }

    /// Read a sensor's status text, `"unknown"` if the device sends nothing.
    pub fn sensor_status(&mut self, sensor: ChannelId) -> ClientResult<String> {
        let response = self.session.send(&Command::SensorStatus { sensor })?;
        Ok(decode_sensor_status(&response)?)
    }

    /// Read a relay's data record followed by its state, joined into one
    /// composite record. Two round trips.
    pub fn relay_data(&mut self, relay: ChannelId) -> ClientResult<String> {
        let data = self.session.send(&Command::RelayData { relay })?;
        let state = self.relay_status(relay)?;
        Ok(compose_record(&data, state.as_str()))
    }

    /// Read a sensor's data record followed by its status, joined into one
    /// composite record. Two round trips.
    pub fn sensor_data(&mut self, sensor: ChannelId) -> ClientResult<String> {
        let data = self.session.send(&Command::SensorData { sensor })?;
        let status = self.sensor_status(sensor)?;
        Ok(compose_record(&data, &status))
    }

    /// Read and decode a relay's composite record.
    pub fn relay_record(&mut self, relay: ChannelId) -> ClientResult<RelayStatus> {
        let record = self.relay_data(relay)?;
        Ok(decode_relay_record(&record)?)
    }

    /// Read and decode a sensor's composite record.
    pub fn sensor_record(&mut self, sensor: ChannelId) -> ClientResult<SensorStatus> {
        let record = self.sensor_data(sensor)?;
        Ok(decode_sensor_record(&record))
    }

    /// Toggle a relay. Returns the device's acknowledgement verbatim.
    pub fn toggle_relay(&mut self, relay: ChannelId) -> ClientResult<String> {
        self.session.send(&Command::ToggleRelay { relay })
    }

    /// Drive a relay open or closed. Returns the device's acknowledgement verbatim.
    ///
    /// A non-empty acknowledgement does not by itself mean the relay changed.
    pub fn set_relay_state(&mut self, relay: ChannelId, state: RelayState) -> ClientResult<String> {
        self.session.send(&Command::SetRelay { relay, state })
    }

    /// Read and decode the firmware version.
    ///
    /// Returns `None` when the device sends an empty reply or a reply with no
    /// version number; both are logged rather than returned as errors.
    pub fn read_firmware_version(&mut self) -> ClientResult<Option<VersionInfo>> {
        let response = self.session.send(&Command::Version)?;
        if response.is_empty() {
            warn!("Failed to receive firmware version");
            return Ok(None);
        }

        match VersionInfo::parse(&response) {
            Ok(version) => {
                info!(version = %version, raw = version.raw, "Firmware version read");
                Ok(Some(version))
            }
            Err(err) => {
                warn!(error = %err, "Could not decode firmware version");
                Ok(None)
            }
        }
    }

    /// Send arbitrary command text and return the reply verbatim.
    pub fn send_raw(&mut self, text: &str) -> ClientResult<String> {
        self.session.send(&Command::Raw {
            command: text.to_string(),
        })
    }
}
