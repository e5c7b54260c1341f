/// Synchronous client for the **disease.sh COVID-19 API (v3)**.
///
/// Three endpoints feed the dashboard:
/// - `GET /all` worldwide totals
/// - `GET /countries` one record per country
/// - `GET /countries/{code}` totals for one country
///
/// plus `GET /historical/all?lastdays=N` for the "new per day" chart.
///
/// ### Notes
/// - No retries and, by default, no request timeout: a hung request blocks the calling
///   thread until the server gives up. Set [`ClientConfig::timeout`] to bound it.
/// - `/countries` records are decoded one at a time; malformed ones are logged and dropped.
///
/// Typical usage:
/// ```no_run
/// # use covid_tracker::{Client, Scope, StatsSource};
/// let client = Client::default();
/// let us = client.fetch_aggregate(&Scope::parse("US")?)?;
/// println!("{} cases", us.cases);
/// # Ok::<(), anyhow::Error>(())
/// ```
use crate::error::{FetchCause, FetchError};
use crate::models::{AggregateStat, CountryStat, RawStat, RawTimeline, Scope, Timeline};
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19";

/// Number of days the chart covers unless asked otherwise.
pub const DEFAULT_HISTORY_DAYS: u32 = 120;

/// Where the stats for the dashboard come from.
///
/// [`Client`] talks to the real API; tests plug in canned or delayed sources.
/// Implementations must not mutate any view state: they only answer requests.
pub trait StatsSource {
    /// Totals for `scope` (`/all` or `/countries/{code}`).
    fn fetch_aggregate(&self, scope: &Scope) -> Result<AggregateStat, FetchError>;

    /// Every country, in API order.
    fn fetch_country_list(&self) -> Result<Vec<CountryStat>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Total request timeout; `None` means wait indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: None,
            user_agent: concat!("covid_tracker/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default()).expect("reqwest client build")
    }
}

// Country codes are plain ASCII; keep `-` and `_` readable in logs.
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Path of the aggregate endpoint for `scope`.
pub fn aggregate_endpoint(scope: &Scope) -> String {
    match scope {
        Scope::Worldwide => "/all".to_string(),
        Scope::Country(code) => format!(
            "/countries/{}",
            percent_encoding::utf8_percent_encode(code.trim(), SAFE)
        ),
    }
}

impl Client {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(5))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn get_json(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| FetchError::new(endpoint, FetchCause::Network(e)))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(FetchError::new(
                endpoint,
                FetchCause::Status {
                    status: status.as_u16(),
                    message: api_message(&body),
                },
            ));
        }
        resp.json::<Value>()
            .map_err(|e| FetchError::new(endpoint, FetchCause::Decode(e.to_string())))
    }

    /// Cumulative worldwide counts for the last `last_days` days.
    pub fn fetch_historical(&self, last_days: u32) -> Result<Timeline, FetchError> {
        let endpoint = format!("/historical/all?lastdays={last_days}");
        let v = self.get_json(&endpoint)?;
        decode_timeline(v).map_err(|cause| FetchError::new(endpoint, cause))
    }
}

impl StatsSource for Client {
    fn fetch_aggregate(&self, scope: &Scope) -> Result<AggregateStat, FetchError> {
        let endpoint = aggregate_endpoint(scope);
        let v = self.get_json(&endpoint)?;
        decode_aggregate(scope.clone(), v).map_err(|cause| FetchError::new(endpoint, cause))
    }

    fn fetch_country_list(&self) -> Result<Vec<CountryStat>, FetchError> {
        let endpoint = "/countries";
        let v = self.get_json(endpoint)?;
        decode_countries(v).map_err(|cause| FetchError::new(endpoint, cause))
    }
}

/// Pull the API's `{"message": "..."}` out of an error body, or fall back to the raw text.
fn api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Decode an aggregate payload (`/all` or `/countries/{code}`).
pub fn decode_aggregate(scope: Scope, v: Value) -> Result<AggregateStat, FetchCause> {
    if !v.is_object() {
        return Err(FetchCause::Decode("expected a JSON object".into()));
    }
    let raw: RawStat =
        serde_json::from_value(v).map_err(|e| FetchCause::Decode(e.to_string()))?;
    AggregateStat::from_raw(scope, raw).map_err(FetchCause::MissingField)
}

/// Decode the `/countries` array. Records that fail to decode are dropped.
pub fn decode_countries(v: Value) -> Result<Vec<CountryStat>, FetchCause> {
    let Value::Array(items) = v else {
        return Err(FetchCause::Decode("expected a JSON array".into()));
    };
    let total = items.len();
    let mut out = Vec::with_capacity(total);
    for (idx, item) in items.into_iter().enumerate() {
        let raw: RawStat = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("dropping country record #{idx}: {e}");
                continue;
            }
        };
        match CountryStat::try_from(raw) {
            Ok(stat) => out.push(stat),
            Err(e) => warn!("dropping country record #{idx}: {e}"),
        }
    }
    if out.len() < total {
        debug!("kept {} of {} country records", out.len(), total);
    }
    Ok(out)
}

/// Decode the `/historical/all` payload.
pub fn decode_timeline(v: Value) -> Result<Timeline, FetchCause> {
    let raw: RawTimeline =
        serde_json::from_value(v).map_err(|e| FetchCause::Decode(e.to_string()))?;
    Timeline::try_from(raw).map_err(|e| FetchCause::Decode(format!("bad timeline date: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_per_scope() {
        assert_eq!(aggregate_endpoint(&Scope::Worldwide), "/all");
        assert_eq!(aggregate_endpoint(&Scope::Country("US".into())), "/countries/US");
        assert_eq!(
            aggregate_endpoint(&Scope::Country("côte".into())),
            "/countries/c%C3%B4te"
        );
    }

    #[test]
    fn error_body_message_is_extracted() {
        let body = r#"{"message":"Country not found or doesn't have any cases"}"#;
        assert_eq!(api_message(body), "Country not found or doesn't have any cases");
        assert_eq!(api_message(" Bad Gateway \n"), "Bad Gateway");
    }
}
