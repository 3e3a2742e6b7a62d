//! Decoding and reshaping of the vendor's timeseries payload.
//!
//! A `values` row on the wire is a positionally typed JSON array: index 0 is
//! an epoch timestamp, index 1 the monotonically increasing record id
//! (`mrid`), index 2 a signal-quality indicator, and every index from 3
//! upward is a per-port cell holding a small nested table of metric values.
//! Decoding splits the fixed prefix into named fields and the remainder into
//! [`PortCell`]s; nothing downstream indexes positionally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::DEFAULT_QUALITY_LABEL;
use crate::models::{rows_from_value, Table};

/// One vendor configuration record: sensor wiring plus a block of
/// timestamped readings valid since a given time.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    /// Epoch seconds since which this wiring is valid.
    #[serde(default)]
    pub valid_since: i64,
    /// Sensor descriptors, one row per physical port.
    #[serde(default)]
    pub sensors: Table,
    /// Raw readings, one row per record.
    #[serde(default)]
    pub values: Vec<ValuesRow>,
}

impl Configuration {
    #[must_use]
    pub fn valid_since_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.valid_since, 0)
    }

    /// Number of port columns, discovered from the payload. Uniform within
    /// one values table; differs across stations.
    #[must_use]
    pub fn port_count(&self) -> usize {
        self.values
            .iter()
            .map(|row| row.ports.len())
            .max()
            .unwrap_or(0)
    }

    /// Reshape the raw values block into a tidy long-form table, one row per
    /// (timestamp, port, metric entry).
    ///
    /// The unpivoted (timestamp, port) pairs are sorted ascending by
    /// `(datetime, port)` with the port compared as its string identifier;
    /// consumers doing time-windowed joins rely on that order. A record with
    /// no port columns contributes nothing, and an empty per-port cell
    /// expands to zero rows rather than a row of nulls.
    #[must_use]
    pub fn reshape(&self) -> Vec<ReadingRow> {
        // Unpivot: one entry per original row x port.
        let mut pairs: Vec<(String, &ValuesRow, &PortCell)> = self
            .values
            .iter()
            .flat_map(|row| {
                row.ports
                    .iter()
                    .enumerate()
                    .map(move |(index, cell)| ((index + 1).to_string(), row, cell))
            })
            .collect();

        pairs.sort_by(|(port_a, row_a, _), (port_b, row_b, _)| {
            (row_a.datetime, port_a).cmp(&(row_b.datetime, port_b))
        });

        // Expand each per-port cell into its metric rows.
        let mut readings = Vec::new();
        for (port, row, cell) in pairs {
            for metrics in cell.entries() {
                readings.push(ReadingRow {
                    datetime: row.datetime,
                    mrid: row.mrid,
                    quality: row.quality,
                    port: port.clone(),
                    metrics: metrics.clone(),
                });
            }
        }
        readings
    }
}

/// One decoded `values` row: fixed prefix plus the per-port cells.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct ValuesRow {
    /// Reading timestamp, already converted from epoch seconds to UTC.
    pub datetime: DateTime<Utc>,
    pub mrid: i64,
    pub quality: f64,
    pub ports: Vec<PortCell>,
}

impl TryFrom<Vec<Value>> for ValuesRow {
    type Error = String;

    fn try_from(columns: Vec<Value>) -> Result<Self, Self::Error> {
        if columns.len() < 3 {
            return Err(format!(
                "values row has {} columns, expected at least 3",
                columns.len()
            ));
        }

        let mut columns = columns.into_iter();
        let timestamp = number(&columns.next().unwrap_or(Value::Null), "timestamp")? as i64;
        let mrid = number(&columns.next().unwrap_or(Value::Null), "mrid")? as i64;
        let quality = number(&columns.next().unwrap_or(Value::Null), "quality")?;

        let datetime = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| format!("timestamp {timestamp} out of range"))?;

        let ports = columns
            .map(PortCell::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            datetime,
            mrid,
            quality,
            ports,
        })
    }
}

fn number(value: &Value, column: &str) -> Result<f64, String> {
    value
        .as_f64()
        .ok_or_else(|| format!("non-numeric {column} column: {value}"))
}

/// One per-port cell: the nested table of metric values reported for a port
/// at a single timestamp. May hold several entries when more than one
/// logical sensor sits behind the port, or none at all.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct PortCell {
    entries: Vec<Map<String, Value>>,
}

impl PortCell {
    #[must_use]
    pub fn entries(&self) -> &[Map<String, Value>] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Value> for PortCell {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(Self {
            entries: rows_from_value(value)?,
        })
    }
}

/// One normalized output row: `(datetime, mrid, quality, port)` followed by
/// the metric columns exploded from the per-port cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingRow {
    pub datetime: DateTime<Utc>,
    pub mrid: i64,
    pub quality: f64,
    pub port: String,
    pub metrics: Map<String, Value>,
}

impl ReadingRow {
    /// Column/value pairs in output order, with the signal-quality column
    /// under the given label (the vendor has renamed it across revisions).
    #[must_use]
    pub fn labeled(&self, quality_label: &str) -> Vec<(String, Value)> {
        let mut record = vec![
            ("datetime".to_string(), Value::from(self.datetime.to_rfc3339())),
            ("mrid".to_string(), Value::from(self.mrid)),
            (quality_label.to_string(), Value::from(self.quality)),
            ("port".to_string(), Value::from(self.port.clone())),
        ];
        record.extend(self.metrics.iter().map(|(k, v)| (k.clone(), v.clone())));
        record
    }

    /// Same as [`labeled`](ReadingRow::labeled) with the default `rssi` label.
    #[must_use]
    pub fn columns(&self) -> Vec<(String, Value)> {
        self.labeled(DEFAULT_QUALITY_LABEL)
    }
}
