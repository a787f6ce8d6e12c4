//! Tap configuration
//!
//! The configuration is a flat JSON object read from a file or passed
//! inline on the command line. It is validated once at startup and is
//! read-only afterwards.

use crate::error::{Error, Result, ResultExt};
use crate::schema::{JsonSchema, JsonType, SchemaProperty};
use crate::types::{JsonValue, OptionStringExt};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Root of the greytHR data API
pub const DEFAULT_API_URL: &str = "https://api.greythr.com";

/// Upper bound on pages fetched per stream when `max_pages` is not set
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Path of the client-token exchange on the tenant domain
pub const TOKEN_PATH: &str = "/uas/v1/oauth2/client-token";

/// Runtime configuration for the tap
#[derive(Clone, Deserialize)]
pub struct TapConfig {
    /// API user
    #[serde(default)]
    pub api_username: String,

    /// API password
    #[serde(default)]
    pub api_password: String,

    /// Tenant domain, e.g. `yourcompany.greythr.com`
    #[serde(default)]
    pub greythr_domain: String,

    /// Leave year for the leave balance endpoint
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,

    /// Explicit start of the attendance window
    #[serde(default, alias = "start_date")]
    pub start: Option<NaiveDate>,

    /// Explicit end of the attendance window
    #[serde(default, alias = "end_date")]
    pub end: Option<NaiveDate>,

    /// Data API root
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Page cap per stream
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Accept `"2024"` as well as `2024` for the year
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(s.none_if_empty()),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

impl TapConfig {
    /// Load and validate configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Load and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load and validate configuration from a JSON value
    pub fn from_value(value: JsonValue) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and cross-field constraints
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("api_username", &self.api_username),
            ("api_password", &self.api_password),
            ("greythr_domain", &self.greythr_domain),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        if let Some(year) = &self.year {
            if year.parse::<i32>().is_err() {
                return Err(Error::invalid_value("year", format!("'{year}' is not a year")));
            }
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(Error::invalid_value(
                    "start",
                    format!("start {start} is after end {end}"),
                ));
            }
        }

        if self.max_pages == Some(0) {
            return Err(Error::invalid_value("max_pages", "must be at least 1"));
        }

        url::Url::parse(&self.api_url)?;
        url::Url::parse(&self.token_url())?;

        Ok(())
    }

    /// Tenant host without scheme or trailing slash
    pub fn domain_host(&self) -> &str {
        let domain = self.greythr_domain.trim();
        let domain = domain
            .strip_prefix("https://")
            .or_else(|| domain.strip_prefix("http://"))
            .unwrap_or(domain);
        domain.trim_end_matches('/')
    }

    /// Token exchange URL on the tenant domain
    pub fn token_url(&self) -> String {
        let domain = self.greythr_domain.trim().trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            format!("{domain}{TOKEN_PATH}")
        } else {
            format!("https://{domain}{TOKEN_PATH}")
        }
    }

    /// Leave year: configured value, else the year of `today`
    pub fn leave_year(&self, today: NaiveDate) -> String {
        self.year
            .clone()
            .unwrap_or_else(|| today.year().to_string())
    }

    /// Effective page cap per stream
    pub fn max_pages(&self) -> u32 {
        self.max_pages.unwrap_or(DEFAULT_MAX_PAGES)
    }

    /// JSON schema describing the recognized options
    pub fn json_schema() -> JsonSchema {
        JsonSchema::new()
            .with_title("tap-greythr")
            .required_property(
                "api_username",
                SchemaProperty::new(JsonType::String)
                    .with_description("Username to authenticate against the API service")
                    .secret(),
            )
            .required_property(
                "api_password",
                SchemaProperty::new(JsonType::String)
                    .with_description("Password to authenticate against the API service")
                    .secret(),
            )
            .required_property(
                "greythr_domain",
                SchemaProperty::new(JsonType::String)
                    .with_description("The greytHR tenant domain, e.g. 'yourcompany.greythr.com'"),
            )
            .property(
                "year",
                SchemaProperty::nullable(JsonType::String)
                    .with_description("The year for which to fetch leave balances"),
            )
            .property(
                "start",
                SchemaProperty::nullable(JsonType::String)
                    .with_format("date")
                    .with_description("Start date of the attendance window"),
            )
            .property(
                "end",
                SchemaProperty::nullable(JsonType::String)
                    .with_format("date")
                    .with_description("End date of the attendance window"),
            )
            .property(
                "api_url",
                SchemaProperty::nullable(JsonType::String)
                    .with_format("uri")
                    .with_description("Root of the greytHR data API"),
            )
            .property(
                "max_pages",
                SchemaProperty::nullable(JsonType::Integer)
                    .with_description("Maximum pages fetched per stream before failing"),
            )
            .property(
                "user_agent",
                SchemaProperty::nullable(JsonType::String)
                    .with_description("User agent sent with every request"),
            )
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("api_username", &"<redacted>")
            .field("api_password", &"<redacted>")
            .field("greythr_domain", &self.greythr_domain)
            .field("year", &self.year)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("api_url", &self.api_url)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}
