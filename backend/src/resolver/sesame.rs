//! CDS Sesame name resolver (Simbad, NED and VizieR behind one endpoint).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use super::TargetResolver;
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::EquatorialCoordinates;

pub const DEFAULT_SESAME_URL: &str = "https://cds.unistra.fr/cgi-bin/nph-sesame/-oI/A";

/// Blocking HTTP client for the Sesame plain-text interface.
pub struct SesameResolver {
    client: Client,
    base_url: Url,
}

impl SesameResolver {
    pub fn new(base_url: &str, timeout: Duration) -> SchedulerResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SchedulerError::Configuration(format!("invalid Sesame URL '{}': {}", base_url, e))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SchedulerError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    /// The whole query string is the name; `+` and `&` must not reach the CGI bare.
    fn query_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        let encoded = urlencoding::encode(name.trim());
        url.set_query(Some(encoded.as_ref()));
        url
    }
}

impl TargetResolver for SesameResolver {
    fn resolve(&self, name: &str) -> SchedulerResult<EquatorialCoordinates> {
        let url = self.query_url(name);
        log::debug!("Querying Sesame: {}", url);

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "name service timed out".to_string()
                } else {
                    format!("name service request failed: {}", e)
                };
                SchedulerError::resolution(name, reason)
            })?;

        parse_sesame_response(name, &body)
    }

    fn name(&self) -> &str {
        "sesame"
    }
}

/// Extract the first `%J ra dec` line from a Sesame `-oI` response.
pub fn parse_sesame_response(name: &str, body: &str) -> SchedulerResult<EquatorialCoordinates> {
    let line = body
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("%J "))
        .ok_or_else(|| SchedulerError::resolution(name, "not found by name service"))?;

    let mut fields = line["%J ".len()..].split_whitespace();
    let mut next_number = || -> SchedulerResult<f64> {
        fields
            .next()
            .and_then(|f| f.parse::<f64>().ok())
            .ok_or_else(|| SchedulerError::resolution(name, format!("malformed position '{}'", line)))
    };
    let ra = next_number()?;
    let dec = next_number()?;

    EquatorialCoordinates::new(ra, dec).map_err(|e| SchedulerError::resolution(name, e))
}
