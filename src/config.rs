use jiff::tz::TimeZone;
use serde::Deserialize;
use url::Url;

const DEFAULT_RECENT_ATTENDANCE_LIMIT: u32 = 50;
const DEFAULT_PROFILE_ATTENDANCE_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid origin {origin}: {error}")]
    InvalidOrigin { origin: String, error: String },

    #[error("unable to parse config: {0}")]
    Parse(String),

    #[error("unknown time zone {0}")]
    UnknownTimeZone(String),
}

type Error = ConfigError;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Settings handed in by the hosting page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Origin every endpoint is resolved against, `https://attendance.example.edu`
    pub origin: Url,

    #[serde(default = "default_recent_attendance_limit")]
    pub recent_attendance_limit: u32,

    #[serde(default = "default_profile_attendance_limit")]
    pub profile_attendance_limit: u32,

    /// IANA zone used when showing attendance timestamps
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl ClientConfig {
    pub fn new(origin: &str) -> Result<Self> {
        let origin = Url::parse(origin).map_err(|error| ConfigError::InvalidOrigin {
            origin: origin.to_string(),
            error: error.to_string(),
        })?;

        Ok(Self {
            origin,
            recent_attendance_limit: DEFAULT_RECENT_ATTENDANCE_LIMIT,
            profile_attendance_limit: DEFAULT_PROFILE_ATTENDANCE_LIMIT,
            time_zone: default_time_zone(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|error| ConfigError::Parse(error.to_string()))
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Origin without a trailing slash, endpoints start with `/`
    pub fn origin_str(&self) -> &str {
        self.origin.as_str().trim_end_matches('/')
    }

    pub fn time_zone(&self) -> Result<TimeZone> {
        if self.time_zone.eq_ignore_ascii_case("UTC") {
            return Ok(TimeZone::UTC);
        }

        TimeZone::get(&self.time_zone).map_err(|_| ConfigError::UnknownTimeZone(self.time_zone.clone()))
    }
}

fn default_recent_attendance_limit() -> u32 {
    DEFAULT_RECENT_ATTENDANCE_LIMIT
}

fn default_profile_attendance_limit() -> u32 {
    DEFAULT_PROFILE_ATTENDANCE_LIMIT
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_config_fills_defaults() {
        let config = ClientConfig::from_json(r#"{"origin": "https://attendance.example.edu"}"#).unwrap();

        assert_eq!(config.origin_str(), "https://attendance.example.edu");
        assert_eq!(config.recent_attendance_limit, 50);
        assert_eq!(config.profile_attendance_limit, 10);
        assert_eq!(config.time_zone().unwrap().iana_name(), Some("UTC"));
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let error = ClientConfig::new("not a url").unwrap_err();
        assert!(matches!(error, ConfigError::InvalidOrigin { .. }));
    }

    #[test]
    fn missing_origin_is_a_parse_error() {
        let error = ClientConfig::from_json(r#"{"recent_attendance_limit": 5}"#).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_time_zone_is_reported() {
        let config = ClientConfig::new("http://localhost:5000").unwrap().with_time_zone("Mars/Olympus");
        assert_eq!(
            config.time_zone().unwrap_err(),
            ConfigError::UnknownTimeZone("Mars/Olympus".to_string())
        );
    }
}
