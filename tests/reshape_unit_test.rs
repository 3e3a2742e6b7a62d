//! Unit tests for the timeseries reshaper.
//!
//! Run with: cargo test --test reshape_unit_test

use serde_json::json;
use zentra_client::{Configuration, PortCell, ValuesRow};

fn configuration(values: serde_json::Value) -> Configuration {
    serde_json::from_value(json!({
        "valid_since": 1_483_228_800,
        "sensors": [
            {"port": 1, "sensor_name": "ATMOS 41"},
            {"port": 2, "sensor_name": "TEROS 12"}
        ],
        "values": values,
    }))
    .expect("configuration fixture should decode")
}

#[test]
fn two_rows_two_ports_reshape_in_order() {
    let config = configuration(json!([
        [100, 1, -70, {"m": 1}, {"m": 2}],
        [200, 2, -72, {"m": 3}, {"m": 4}]
    ]));

    let rows = config.reshape();
    assert_eq!(rows.len(), 4);

    let order: Vec<(i64, &str)> = rows
        .iter()
        .map(|r| (r.datetime.timestamp(), r.port.as_str()))
        .collect();
    assert_eq!(order, vec![(100, "1"), (100, "2"), (200, "1"), (200, "2")]);

    assert_eq!(rows[0].metrics["m"], json!(1));
    assert_eq!(rows[1].metrics["m"], json!(2));
    assert_eq!(rows[2].metrics["m"], json!(3));
    assert_eq!(rows[3].metrics["m"], json!(4));

    assert_eq!(rows[0].mrid, 1);
    assert_eq!(rows[0].quality, -70.0);
    assert_eq!(rows[3].mrid, 2);
    assert_eq!(rows[3].quality, -72.0);
}

#[test]
fn output_has_rows_times_ports_entries_and_is_sorted() {
    // 3 records x 3 ports, deliberately out of time order on the wire.
    let config = configuration(json!([
        [300, 3, -71, {"a": 1}, {"a": 2}, {"a": 3}],
        [100, 1, -70, {"a": 4}, {"a": 5}, {"a": 6}],
        [200, 2, -72, {"a": 7}, {"a": 8}, {"a": 9}]
    ]));

    assert_eq!(config.port_count(), 3);

    let rows = config.reshape();
    assert_eq!(rows.len(), 3 * 3);

    for pair in rows.windows(2) {
        let a = (pair[0].datetime, pair[0].port.as_str());
        let b = (pair[1].datetime, pair[1].port.as_str());
        assert!(a <= b, "output not sorted by (datetime, port): {a:?} > {b:?}");
    }
}

#[test]
fn multi_sensor_cell_expands_to_one_row_per_entry() {
    // Two logical sensors behind port 1.
    let config = configuration(json!([
        [100, 1, -70, [{"value": 19.5}, {"value": 7.2}]]
    ]));

    let rows = config.reshape();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].port, "1");
    assert_eq!(rows[1].port, "1");
    assert_eq!(rows[0].metrics["value"], json!(19.5));
    assert_eq!(rows[1].metrics["value"], json!(7.2));
}

#[test]
fn column_oriented_cell_zips_into_rows() {
    let config = configuration(json!([
        [100, 1, -70, {"value": [1.5, 2.5], "units": ["%", "%"]}]
    ]));

    let rows = config.reshape();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].metrics["value"], json!(1.5));
    assert_eq!(rows[1].metrics["value"], json!(2.5));
    assert_eq!(rows[1].metrics["units"], json!("%"));
}

#[test]
fn empty_cell_expands_to_zero_rows_not_nulls() {
    let config = configuration(json!([
        [100, 1, -70, {}, {"m": 1}],
        [200, 2, -72, null, []]
    ]));

    let rows = config.reshape();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].datetime.timestamp(), 100);
    assert_eq!(rows[0].port, "2");
}

#[test]
fn zero_port_columns_yield_empty_output() {
    let config = configuration(json!([[100, 1, -70], [200, 2, -72]]));
    assert_eq!(config.port_count(), 0);
    assert!(config.reshape().is_empty());
}

#[test]
fn no_values_yield_empty_output() {
    let config = configuration(json!([]));
    assert!(config.reshape().is_empty());
}

#[test]
fn epoch_round_trips_through_utc_datetime() {
    let row: ValuesRow =
        serde_json::from_value(json!([1_546_300_800, 42, -61, {"m": 0}])).unwrap();
    assert_eq!(row.datetime.timestamp(), 1_546_300_800);
    assert_eq!(row.datetime.to_rfc3339(), "2019-01-01T00:00:00+00:00");
}

#[test]
fn valid_since_converts_to_utc() {
    let config = configuration(json!([]));
    assert_eq!(
        config.valid_since_utc().map(|dt| dt.timestamp()),
        Some(1_483_228_800)
    );
}

#[test]
fn short_values_row_is_a_decode_error() {
    let result: Result<ValuesRow, _> = serde_json::from_value(json!([100, 1]));
    assert!(result.is_err());
}

#[test]
fn non_numeric_prefix_is_a_decode_error() {
    let result: Result<ValuesRow, _> =
        serde_json::from_value(json!(["yesterday", 1, -70, {"m": 1}]));
    assert!(result.is_err());
}

#[test]
fn ragged_column_cell_is_a_decode_error() {
    let result: Result<PortCell, _> =
        serde_json::from_value(json!({"value": [1, 2], "units": ["%"]}));
    assert!(result.is_err());
}

#[test]
fn labeled_row_orders_fixed_columns_before_metrics() {
    let config = configuration(json!([
        [100, 7, -65, {"temperature": 21.0, "humidity": 0.4}]
    ]));

    let rows = config.reshape();
    let record = rows[0].labeled("signal_quality");
    let names: Vec<&str> = record.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec!["datetime", "mrid", "signal_quality", "port", "humidity", "temperature"]
    );

    let default_record = rows[0].columns();
    assert_eq!(default_record[2].0, "rssi");
}

#[test]
fn sensors_metadata_is_kept_as_a_table() {
    let config = configuration(json!([]));
    assert_eq!(config.sensors.len(), 2);
    assert_eq!(config.sensors.columns(), vec!["port", "sensor_name"]);
}
