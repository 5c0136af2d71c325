//! Query construction for the DHS ArcGIS MapServer.
//!
//! Pure data transformation: no network access happens here.
//!
//! The region name is dropped into the `where` clause as-is. Only the URL
//! encoding applied to query parameters protects it, so callers must not pass
//! untrusted names without their own sanitization.

use chrono::{Datelike, NaiveDate};
use reqwest::Url;

use crate::domain::RegionSelector;
use crate::error::{AppError, ErrorKind};

pub const DEFAULT_BASE_URL: &str =
    "https://dhsgis.wi.gov/server/rest/services/DHS_COVID19/COVID19_WI/MapServer";

const LAYER_STATE: u32 = 11;
const LAYER_COUNTY: u32 = 12;
const LAYER_MUNICIPALITY: u32 = 16;

const FIELDS_STATE: &str = "DATE,POS_NEW,TEST_NEW,NAME,DTH_NEW,HOSP_YES";
const FIELDS_REGION: &str = "NAME,DATE,POS_NEW,HOSP_YES,DTH_NEW,TEST_NEW";

/// Everything an HTTP client needs to issue the GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhsQuery {
    pub endpoint: String,
    pub params: Vec<(&'static str, String)>,
    pub label: String,
}

impl DhsQuery {
    /// Fully encoded request URL.
    pub fn url(&self) -> Result<Url, AppError> {
        Url::parse_with_params(&self.endpoint, &self.params).map_err(|e| {
            AppError::new(
                ErrorKind::Usage,
                format!("Invalid DHS endpoint '{}': {e}", self.endpoint),
            )
        })
    }

    /// The raw `where` clause, before URL encoding.
    pub fn where_clause(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == "where")
            .map(|(_, v)| v.as_str())
    }
}

/// Build the query for `region`, returning records strictly after `start_date`.
pub fn build_query(base_url: &str, region: &RegionSelector, start_date: NaiveDate) -> DhsQuery {
    let date_filter = format!(
        "DATE>'{}-{}-{} 14:00:00.000000'",
        start_date.year(),
        start_date.month(),
        start_date.day()
    );

    let (layer, fields, clause) = match region {
        RegionSelector::State => (LAYER_STATE, FIELDS_STATE, date_filter),
        RegionSelector::County(name) => (
            LAYER_COUNTY,
            FIELDS_REGION,
            format!("NAME='{name}' and {date_filter}"),
        ),
        RegionSelector::Municipality(name) => (
            LAYER_MUNICIPALITY,
            FIELDS_REGION,
            format!("NAME='{name}' and {date_filter}"),
        ),
    };

    DhsQuery {
        endpoint: format!("{}/{layer}/query", base_url.trim_end_matches('/')),
        params: vec![
            ("where", clause),
            ("outFields", fields.to_string()),
            ("outSR", "4326".to_string()),
            ("f", "json".to_string()),
        ],
        label: region.label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 9, 5).unwrap()
    }

    #[test]
    fn state_query_uses_layer_11() {
        let q = build_query(DEFAULT_BASE_URL, &RegionSelector::State, start());
        assert!(q.endpoint.ends_with("/MapServer/11/query"));
        assert_eq!(q.where_clause(), Some("DATE>'2020-9-5 14:00:00.000000'"));
        assert_eq!(q.label, "Query for entire state");
    }

    #[test]
    fn county_query_filters_by_name() {
        let q = build_query(DEFAULT_BASE_URL, &RegionSelector::County("Dane".into()), start());
        assert!(q.endpoint.ends_with("/MapServer/12/query"));
        assert_eq!(
            q.where_clause(),
            Some("NAME='Dane' and DATE>'2020-9-5 14:00:00.000000'")
        );
        assert_eq!(q.label, "Query for Dane county");
    }

    #[test]
    fn municipality_query_uses_layer_16() {
        let q = build_query(
            DEFAULT_BASE_URL,
            &RegionSelector::Municipality("Madison".into()),
            start(),
        );
        assert!(q.endpoint.ends_with("/MapServer/16/query"));
        assert_eq!(q.label, "Query for municipality \"Madison\"");
    }

    #[test]
    fn url_encodes_the_where_clause() {
        let q = build_query(
            "http://localhost:8080/MapServer/",
            &RegionSelector::County("Fond du Lac".into()),
            start(),
        );
        let url = q.url().unwrap();
        assert_eq!(url.path(), "/MapServer/12/query");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&(
            "where".to_string(),
            "NAME='Fond du Lac' and DATE>'2020-9-5 14:00:00.000000'".to_string()
        )));
        assert!(pairs.contains(&("f".to_string(), "json".to_string())));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn invalid_base_url_is_a_usage_error() {
        let q = build_query("not a url", &RegionSelector::State, start());
        assert_eq!(q.url().unwrap_err().kind(), ErrorKind::Usage);
    }
}
