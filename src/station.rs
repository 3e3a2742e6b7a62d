//! Station-scoped facades combining build, send, and parse into one call.
//!
//! Each facade is a plain struct of `Option` fields: `Default` is the empty,
//! all-unset state, and [`fetch`](StationSettings::fetch) fails fast with
//! [`Error::Precondition`] when only one of the two identifying parameters
//! (serial number, token) is supplied. Parsing is shared between the network
//! path and offline construction from a captured JSON document.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::client::{MridRange, TimeWindow, ZentraClient};
use crate::error::{ApiResult, Error};
use crate::models::{
    ApiToken, DeviceErrorCounters, InstallationMetadata, ReadingsEnvelope, SettingsEnvelope,
    StatusEnvelope, Table,
};
use crate::timeseries::Configuration;

/// Identifying parameters and time bounds for `/settings` and `/statuses`.
#[derive(Debug, Clone, Default)]
pub struct StationParams {
    pub sn: Option<String>,
    pub token: Option<ApiToken>,
    pub window: TimeWindow,
}

impl StationParams {
    /// Resolve the identifying pair: both present, neither, or a
    /// precondition violation when only one was supplied.
    pub(crate) fn identity(&self) -> ApiResult<Option<(&str, &ApiToken)>> {
        match (self.sn.as_deref(), self.token.as_ref()) {
            (Some(sn), Some(token)) => Ok(Some((sn, token))),
            (None, None) => Ok(None),
            _ => Err(Error::Precondition(
                "\"sn\" and \"token\" parameters must both be included",
            )),
        }
    }
}

/// Identifying parameters and bounds for `/readings`.
#[derive(Debug, Clone, Default)]
pub struct ReadingsParams {
    pub sn: Option<String>,
    pub token: Option<ApiToken>,
    pub window: TimeWindow,
    pub mrids: MridRange,
}

impl ReadingsParams {
    pub(crate) fn identity(&self) -> ApiResult<Option<(&str, &ApiToken)>> {
        match (self.sn.as_deref(), self.token.as_ref()) {
            (Some(sn), Some(token)) => Ok(Some((sn, token))),
            (None, None) => Ok(None),
            _ => Err(Error::Precondition(
                "\"sn\" and \"token\" parameters must both be included",
            )),
        }
    }
}

/// Device settings for one station.
#[derive(Debug, Clone, Default)]
pub struct StationSettings {
    pub device_info: Option<Value>,
    pub measurement_settings: Option<Table>,
    pub time_settings: Option<Table>,
    pub locations: Option<Table>,
    pub installation_metadata: Option<InstallationMetadata>,
}

impl StationSettings {
    /// Build, send, and parse a `/settings` request.
    ///
    /// # Errors
    ///
    /// `Error::Precondition` when exactly one of `sn`/`token` is set; with
    /// neither set, the empty value is returned without any I/O.
    pub fn fetch(client: &ZentraClient, params: &StationParams) -> ApiResult<Self> {
        match params.identity()? {
            Some((sn, token)) => client.get_settings(sn, token, params.window),
            None => Ok(Self::default()),
        }
    }

    /// Parse from a previously captured response document.
    pub fn from_json_value(body: Value) -> ApiResult<Self> {
        let envelope: SettingsEnvelope = serde_json::from_value(body)?;
        let device = envelope.device;

        let installation_metadata = device
            .installation_metadata
            .into_iter()
            .next()
            .map(InstallationMetadata::from_record)
            .transpose()
            .map_err(Error::UnexpectedShape)?;

        Ok(Self {
            device_info: Some(device.device_info),
            measurement_settings: Some(device.measurement_settings),
            time_settings: Some(device.time_settings),
            locations: Some(device.locations),
            installation_metadata,
        })
    }

    /// Parse from a response document stored on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> ApiResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_value(serde_json::from_str(&raw)?)
    }
}

/// Device status for one station.
#[derive(Debug, Clone, Default)]
pub struct StationStatus {
    pub device_info: Option<Value>,
    pub device_error_counters: Option<DeviceErrorCounters>,
    pub cellular_statuses: Option<Table>,
    pub cellular_error_counters: Option<Value>,
}

impl StationStatus {
    /// Build, send, and parse a `/statuses` request.
    ///
    /// # Errors
    ///
    /// Same precondition behavior as [`StationSettings::fetch`].
    pub fn fetch(client: &ZentraClient, params: &StationParams) -> ApiResult<Self> {
        match params.identity()? {
            Some((sn, token)) => client.get_status(sn, token, params.window),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json_value(body: Value) -> ApiResult<Self> {
        let envelope: StatusEnvelope = serde_json::from_value(body)?;
        let device = envelope.device;

        let device_error_counters = if device.device_error_counters.is_null() {
            None
        } else {
            Some(
                DeviceErrorCounters::from_value(device.device_error_counters)
                    .map_err(Error::UnexpectedShape)?,
            )
        };

        Ok(Self {
            device_info: Some(device.device_info),
            device_error_counters,
            cellular_statuses: Some(device.cellular_statuses),
            cellular_error_counters: Some(device.cellular_error_counters),
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ApiResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_value(serde_json::from_str(&raw)?)
    }
}

/// Readings for one station: device info plus one configuration record per
/// sensor-port grouping.
#[derive(Debug, Clone, Default)]
pub struct StationReadings {
    pub device_info: Option<Value>,
    pub timeseries: Option<Vec<Configuration>>,
}

impl StationReadings {
    /// Build, send, and parse a `/readings` request.
    ///
    /// # Errors
    ///
    /// Same precondition behavior as [`StationSettings::fetch`]; an unknown
    /// serial number surfaces as `Error::UnknownDevice`.
    pub fn fetch(client: &ZentraClient, params: &ReadingsParams) -> ApiResult<Self> {
        match params.identity()? {
            Some((sn, token)) => client.get_readings(sn, token, params.window, params.mrids),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json_value(body: Value) -> ApiResult<Self> {
        let envelope: ReadingsEnvelope = serde_json::from_value(body)?;
        let device = envelope.device;

        Ok(Self {
            device_info: Some(device.device_info),
            timeseries: Some(
                device
                    .timeseries
                    .into_iter()
                    .map(|entry| entry.configuration)
                    .collect(),
            ),
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ApiResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_value(serde_json::from_str(&raw)?)
    }
}
