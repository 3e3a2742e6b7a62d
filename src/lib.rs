//! Client for the ZENTRA Cloud environmental-sensor API.
//!
//! Wraps the tokenized v1 endpoints (`/tokens`, `/settings`, `/statuses`,
//! `/readings`) with typed request builders and response models, and
//! reshapes the vendor's positionally typed timeseries payload into a tidy
//! long-form table, one row per (timestamp, port, metric entry).
//!
//! All I/O is synchronous and blocking; each fetch is one round trip.
//!
//! ```no_run
//! use zentra_client::{Config, StationReadings, ReadingsParams, ZentraClient};
//!
//! # fn main() -> zentra_client::ApiResult<()> {
//! let client = ZentraClient::new(&Config::default())?;
//! let token = client.get_token("user", "password")?;
//!
//! let readings = StationReadings::fetch(
//!     &client,
//!     &ReadingsParams {
//!         sn: Some("06-00187".to_string()),
//!         token: Some(token),
//!         ..Default::default()
//!     },
//! )?;
//!
//! for configuration in readings.timeseries.unwrap_or_default() {
//!     for row in configuration.reshape() {
//!         println!("{} port {} -> {:?}", row.datetime, row.port, row.metrics);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod station;
pub mod timeseries;

pub use client::{MridRange, TimeWindow, ZentraClient};
pub use config::{Config, ConfigError, DEFAULT_BASE_URL, DEFAULT_QUALITY_LABEL};
pub use error::{ApiResult, Error};
pub use models::{ApiToken, DeviceErrorCounters, InstallationMetadata, Table};
pub use station::{
    ReadingsParams, StationParams, StationReadings, StationSettings, StationStatus,
};
pub use timeseries::{Configuration, PortCell, ReadingRow, ValuesRow};
