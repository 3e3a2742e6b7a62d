use std::time::Duration;

use reqwest::blocking::{Client, Request};
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ApiResult, Error};
use crate::models::{ApiToken, TokenResponse};
use crate::station::{StationReadings, StationSettings, StationStatus};

/// Inclusive time bounds in UTC epoch seconds; an omitted bound leaves that
/// side unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl TimeWindow {
    #[must_use]
    pub fn new(start_time: Option<i64>, end_time: Option<i64>) -> Self {
        Self {
            start_time,
            end_time,
        }
    }
}

/// Inclusive record-id bounds for `/readings`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MridRange {
    pub start_mrid: Option<i64>,
    pub end_mrid: Option<i64>,
}

pub struct ZentraClient {
    http: Client,
    base_url: String,
    quality_label: String,
}

impl ZentraClient {
    /// Build a blocking client against the configured API root.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &Config) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            quality_label: config.quality_label.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Output label used for the signal-quality column.
    #[must_use]
    pub fn quality_label(&self) -> &str {
        &self.quality_label
    }

    // --- Request builders: pure, no I/O, deterministic. ---

    /// `POST /tokens` with a form-encoded credential pair.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` only if the URL is unbuildable.
    pub fn build_token_request(&self, username: &str, password: &str) -> ApiResult<Request> {
        let request = self
            .http
            .post(format!("{}/tokens", self.base_url))
            .form(&[("username", username), ("password", password)])
            .build()?;
        Ok(request)
    }

    /// `GET /settings` for one station.
    pub fn build_settings_request(
        &self,
        sn: &str,
        token: &ApiToken,
        window: TimeWindow,
    ) -> ApiResult<Request> {
        self.build_station_request("settings", sn, token, window, MridRange::default())
    }

    /// `GET /statuses` for one station.
    pub fn build_status_request(
        &self,
        sn: &str,
        token: &ApiToken,
        window: TimeWindow,
    ) -> ApiResult<Request> {
        self.build_station_request("statuses", sn, token, window, MridRange::default())
    }

    /// `GET /readings` for one station, optionally bounded by time and mrid.
    pub fn build_readings_request(
        &self,
        sn: &str,
        token: &ApiToken,
        window: TimeWindow,
        mrids: MridRange,
    ) -> ApiResult<Request> {
        self.build_station_request("readings", sn, token, window, mrids)
    }

    fn build_station_request(
        &self,
        endpoint: &str,
        sn: &str,
        token: &ApiToken,
        window: TimeWindow,
        mrids: MridRange,
    ) -> ApiResult<Request> {
        let mut params: Vec<(&str, String)> = vec![("sn", sn.to_string())];
        if let Some(start) = window.start_time {
            params.push(("start_time", start.to_string()));
        }
        if let Some(end) = window.end_time {
            params.push(("end_time", end.to_string()));
        }
        if let Some(start) = mrids.start_mrid {
            params.push(("start_mrid", start.to_string()));
        }
        if let Some(end) = mrids.end_mrid {
            params.push(("end_mrid", end.to_string()));
        }

        let request = self
            .http
            .get(format!("{}/{}", self.base_url, endpoint))
            .header(AUTHORIZATION, token.header_value())
            .query(&params)
            .build()?;
        Ok(request)
    }

    // --- Send/parse: one blocking round trip per call. ---

    /// Exchange a credential pair for an access token.
    ///
    /// # Errors
    ///
    /// `Error::Rejected` on a non-success status (invalid credentials
    /// included), `Error::UnexpectedShape` if the body carries no token.
    pub fn get_token(&self, username: &str, password: &str) -> ApiResult<ApiToken> {
        let request = self.build_token_request(username, password)?;
        let body = self.fetch_json(request)?;
        let parsed: TokenResponse = serde_json::from_value(body)?;
        parsed
            .token
            .map(ApiToken::new)
            .ok_or_else(|| Error::UnexpectedShape("token response without a token".to_string()))
    }

    /// Fetch and parse `/settings` for one station.
    pub fn get_settings(
        &self,
        sn: &str,
        token: &ApiToken,
        window: TimeWindow,
    ) -> ApiResult<StationSettings> {
        let request = self.build_settings_request(sn, token, window)?;
        StationSettings::from_json_value(self.fetch_json(request)?)
    }

    /// Fetch and parse `/statuses` for one station.
    pub fn get_status(
        &self,
        sn: &str,
        token: &ApiToken,
        window: TimeWindow,
    ) -> ApiResult<StationStatus> {
        let request = self.build_status_request(sn, token, window)?;
        StationStatus::from_json_value(self.fetch_json(request)?)
    }

    /// Fetch and parse `/readings` for one station.
    pub fn get_readings(
        &self,
        sn: &str,
        token: &ApiToken,
        window: TimeWindow,
        mrids: MridRange,
    ) -> ApiResult<StationReadings> {
        let request = self.build_readings_request(sn, token, window, mrids)?;
        StationReadings::from_json_value(self.fetch_json(request)?)
    }

    /// Send a built request and return its JSON body.
    ///
    /// A non-success status surfaces as `Error::Rejected`; a success status
    /// carrying the vendor's structured error object (single top-level
    /// `"Error"` key, e.g. an unknown serial number) surfaces as
    /// `Error::UnknownDevice`. A silently-empty result is never produced.
    pub fn fetch_json(&self, request: Request) -> ApiResult<Value> {
        tracing::debug!(method = %request.method(), url = %request.url(), "Dispatching request");

        let response = self.http.execute(request)?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(Error::Rejected { status, body });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body_preview = %body.chars().take(500).collect::<String>(),
                "Failed to parse response body"
            );
            e
        })?;

        if let Some(message) = vendor_error(&value) {
            return Err(Error::UnknownDevice(message));
        }

        Ok(value)
    }
}

/// Detect the vendor's structured error body: an object whose only key is
/// `"Error"` with a string message.
fn vendor_error(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get("Error")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}
