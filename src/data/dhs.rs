//! Wisconsin DHS COVID-19 API integration.
//!
//! One blocking GET per run, no retries. Transport failures and non-200
//! statuses are reported as outcomes rather than errors so the caller can
//! print its one-line message and carry on.

use std::time::Duration;

use chrono::DateTime;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::query::{DEFAULT_BASE_URL, DhsQuery};
use crate::domain::DailyRecord;
use crate::error::{AppError, ErrorKind};

/// Result of the single HTTP attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 200 with a body (not yet parsed).
    Body(String),
    /// Connection refused, DNS, timeout, or an unreadable body.
    NoResponse,
    /// Any status other than 200.
    BadStatus(u16),
}

pub struct DhsClient {
    client: Client,
    base_url: String,
}

impl DhsClient {
    /// Build a client, honouring `DHS_BASE_URL` from the environment (or `.env`).
    pub fn from_env(timeout: Duration) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("DHS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, timeout)
    }

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::new(ErrorKind::Network, format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch(&self, query: &DhsQuery) -> Result<FetchOutcome, AppError> {
        let url = query.url()?;
        log::debug!("query string: {url}");

        let resp = match self.client.get(url).send() {
            Ok(resp) => resp,
            Err(e) => {
                log::error!("Could not connect to DHS - {e}");
                return Ok(FetchOutcome::NoResponse);
            }
        };

        let status = resp.status();
        if status != StatusCode::OK {
            log::warn!("DHS responded with status {status}");
            return Ok(FetchOutcome::BadStatus(status.as_u16()));
        }

        match resp.text() {
            Ok(body) => {
                log::trace!("raw output: {body}");
                log::info!("Response length: {} bytes", body.len());
                Ok(FetchOutcome::Body(body))
            }
            Err(e) => {
                log::error!("Could not read DHS response - {e}");
                Ok(FetchOutcome::NoResponse)
            }
        }
    }
}

/// Top-level ArcGIS query response.
///
/// A missing `features` array is treated the same as an empty one.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: RawAttributes,
}

/// ArcGIS reports query failures in a 200 body.
#[derive(Debug, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Attributes exactly as returned; every field may be absent or null.
#[derive(Debug, Default, Deserialize)]
pub struct RawAttributes {
    #[serde(rename = "DATE")]
    pub date: Option<i64>,
    #[serde(rename = "POS_NEW")]
    pub pos_new: Option<i64>,
    #[serde(rename = "TEST_NEW")]
    pub test_new: Option<i64>,
    #[serde(rename = "DTH_NEW")]
    pub dth_new: Option<i64>,
    #[serde(rename = "HOSP_YES")]
    pub hosp_yes: Option<i64>,
    #[serde(rename = "NAME")]
    pub name: Option<String>,
}

impl FeatureCollection {
    /// Parse a response body; `None` when it is not the expected JSON envelope.
    pub fn parse(body: &str) -> Option<Self> {
        match serde_json::from_str::<FeatureCollection>(body) {
            Ok(collection) => {
                if let Some(err) = &collection.error {
                    log::warn!(
                        "DHS service error {}: {}",
                        err.code.map(|c| c.to_string()).unwrap_or_else(|| "?".into()),
                        err.message.as_deref().unwrap_or("")
                    );
                }
                Some(collection)
            }
            Err(e) => {
                log::error!("Failed to parse DHS response: {e}");
                None
            }
        }
    }

    /// Validate every feature into a `DailyRecord`, in arrival order.
    pub fn into_records(self) -> Result<Vec<DailyRecord>, AppError> {
        self.features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| validate_record(index, feature.attributes))
            .collect()
    }
}

fn validate_record(index: usize, attrs: RawAttributes) -> Result<DailyRecord, AppError> {
    fn required(index: usize, field: &str, value: Option<i64>) -> Result<i64, AppError> {
        value.ok_or_else(|| AppError::malformed_record(index, field, "is missing or null"))
    }

    let timestamp_ms = required(index, "DATE", attrs.date)?;
    let date = DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| {
            AppError::malformed_record(index, "DATE", &format!("{timestamp_ms} is out of range"))
        })?;

    Ok(DailyRecord {
        timestamp_ms,
        date,
        new_positive: required(index, "POS_NEW", attrs.pos_new)?,
        new_tests: required(index, "TEST_NEW", attrs.test_new)?,
        new_deaths: required(index, "DTH_NEW", attrs.dth_new)?,
        cumulative_hospitalized: required(index, "HOSP_YES", attrs.hosp_yes)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2020-10-01T05:00:00Z
    const OCT_1: i64 = 1_601_528_400_000;

    #[test]
    fn parses_features_into_records() {
        let body = format!(
            r#"{{"features":[{{"attributes":{{"DATE":{OCT_1},"POS_NEW":2319,"TEST_NEW":11497,"DTH_NEW":7,"HOSP_YES":9271,"NAME":"WI"}}}}]}}"#
        );
        let records = FeatureCollection::parse(&body).unwrap().into_records().unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2020, 10, 1).unwrap());
        assert_eq!(r.new_positive, 2319);
        assert_eq!(r.new_tests, 11497);
        assert_eq!(r.new_deaths, 7);
        assert_eq!(r.cumulative_hospitalized, 9271);
    }

    #[test]
    fn missing_features_is_empty() {
        let records = FeatureCollection::parse("{}").unwrap().into_records().unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn service_error_body_has_no_features() {
        let body = r#"{"error":{"code":400,"message":"Invalid query"}}"#;
        let collection = FeatureCollection::parse(body).unwrap();
        assert_eq!(collection.error.as_ref().and_then(|e| e.code), Some(400));
        assert!(collection.into_records().unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_not_parsed() {
        assert!(FeatureCollection::parse("<html>busy</html>").is_none());
    }

    #[test]
    fn null_hospitalization_is_malformed() {
        let body = format!(
            r#"{{"features":[{{"attributes":{{"DATE":{OCT_1},"POS_NEW":1,"TEST_NEW":2,"DTH_NEW":0,"HOSP_YES":null}}}}]}}"#
        );
        let err = FeatureCollection::parse(&body)
            .unwrap()
            .into_records()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert!(err.to_string().contains("HOSP_YES"));
    }

    #[test]
    fn missing_date_is_malformed_with_index() {
        let body = format!(
            r#"{{"features":[
                {{"attributes":{{"DATE":{OCT_1},"POS_NEW":1,"TEST_NEW":2,"DTH_NEW":0,"HOSP_YES":5}}}},
                {{"attributes":{{"POS_NEW":1,"TEST_NEW":2,"DTH_NEW":0,"HOSP_YES":5}}}}
            ]}}"#
        );
        let err = FeatureCollection::parse(&body)
            .unwrap()
            .into_records()
            .unwrap_err();
        assert_eq!(err.to_string(), "Malformed record #1: DATE is missing or null.");
    }

    #[test]
    fn unreachable_host_is_no_response() {
        let client = DhsClient::new("http://127.0.0.1:9/MapServer", Duration::from_secs(2)).unwrap();
        let query = crate::data::query::build_query(
            client.base_url(),
            &crate::domain::RegionSelector::State,
            NaiveDate::from_ymd_opt(2020, 10, 1).unwrap(),
        );
        assert_eq!(client.fetch(&query).unwrap(), FetchOutcome::NoResponse);
    }
}
