use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::timeseries::Configuration;

/// Opaque bearer token issued by `POST /tokens`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header. The vendor uses the `Token`
    /// scheme, not `Bearer`.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Token {}", self.0)
    }
}

/// Response from `POST /tokens`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// A one-level flattening of a nested JSON sub-structure into named rows.
///
/// The vendor serializes tabular data either as an array of row objects or
/// as an object of equal-length column arrays; both decode to the same
/// row-oriented form here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Table {
    rows: Vec<Map<String, Value>>,
}

impl Table {
    #[must_use]
    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct column names across all rows, sorted.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl TryFrom<Value> for Table {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(Self {
            rows: rows_from_value(value)?,
        })
    }
}

/// Decode any of the vendor's tabular encodings into row objects:
/// array-of-objects, object-of-columns (equal-length arrays), a single
/// scalar object (one row), or null/empty (zero rows).
pub(crate) fn rows_from_value(value: Value) -> Result<Vec<Map<String, Value>>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(format!("expected row object, found {other}")),
            })
            .collect(),
        Value::Object(map) => {
            if map.is_empty() {
                Ok(Vec::new())
            } else if map.values().all(Value::is_array) {
                columns_to_rows(map)
            } else {
                // Scalar object: a single row.
                Ok(vec![map])
            }
        }
        other => Err(format!("expected tabular value, found {other}")),
    }
}

fn columns_to_rows(map: Map<String, Value>) -> Result<Vec<Map<String, Value>>, String> {
    let mut height = None;
    for (name, column) in &map {
        let len = column.as_array().map_or(0, Vec::len);
        match height {
            None => height = Some(len),
            Some(h) if h != len => {
                return Err(format!("ragged column {name}: {len} values, expected {h}"))
            }
            Some(_) => {}
        }
    }

    let height = height.unwrap_or(0);
    let mut rows = vec![Map::new(); height];
    for (name, column) in map {
        if let Value::Array(cells) = column {
            for (row, cell) in rows.iter_mut().zip(cells) {
                row.insert(name.clone(), cell);
            }
        }
    }
    Ok(rows)
}

/// `GET /settings` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsEnvelope {
    pub device: SettingsDevice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsDevice {
    #[serde(default)]
    pub device_info: Value,
    #[serde(default)]
    pub measurement_settings: Table,
    #[serde(default)]
    pub time_settings: Table,
    #[serde(default)]
    pub locations: Table,
    /// The wire format wraps the metadata record in a one-element array.
    #[serde(default)]
    pub installation_metadata: Vec<Value>,
}

/// Installation metadata record with its `sensor_elevations` sub-table
/// pulled out; the remaining scalar fields pass through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallationMetadata {
    pub sensor_elevations: Table,
    pub fields: Map<String, Value>,
}

impl InstallationMetadata {
    pub(crate) fn from_record(record: Value) -> Result<Self, String> {
        let mut fields = match record {
            Value::Object(fields) => fields,
            other => return Err(format!("expected metadata object, found {other}")),
        };
        let sensor_elevations = match fields.remove("sensor_elevations") {
            Some(raw) => Table::try_from(raw)?,
            None => Table::default(),
        };
        Ok(Self {
            sensor_elevations,
            fields,
        })
    }
}

/// `GET /statuses` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEnvelope {
    pub device: StatusDevice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusDevice {
    #[serde(default)]
    pub device_info: Value,
    #[serde(default)]
    pub device_error_counters: Value,
    #[serde(default)]
    pub cellular_statuses: Table,
    #[serde(default)]
    pub cellular_error_counters: Value,
}

/// Device error counters with the nested `sensor_errors` table pulled out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceErrorCounters {
    pub sensor_errors: Table,
    pub counters: Map<String, Value>,
}

impl DeviceErrorCounters {
    pub(crate) fn from_value(value: Value) -> Result<Self, String> {
        let mut counters = match value {
            Value::Object(counters) => counters,
            other => return Err(format!("expected error counters object, found {other}")),
        };
        let sensor_errors = match counters.remove("sensor_errors") {
            Some(raw) => Table::try_from(raw)?,
            None => Table::default(),
        };
        Ok(Self {
            sensor_errors,
            counters,
        })
    }
}

/// `GET /readings` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingsEnvelope {
    pub device: ReadingsDevice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingsDevice {
    #[serde(default)]
    pub device_info: Value,
    #[serde(default)]
    pub timeseries: Vec<TimeseriesEntry>,
}

/// One timeseries entry; the vendor nests the record under `configuration`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeseriesEntry {
    pub configuration: Configuration,
}
