use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Information about a zone file as reported by a `HEAD` on its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDetails {
    pub name: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub content_length: Option<u64>,
    pub content_type: String,
}

impl ZoneDetails {
    /// Parses an HTTP date such as `Mon, 02 Jan 2006 15:04:05 GMT`.
    pub fn parse_last_modified(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(value.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl fmt::Display for ZoneDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// TLD metadata as listed by `/czds/tlds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldMeta {
    pub tld: String,
    #[serde(rename = "ulable", default)]
    pub ulabel: String,
    #[serde(rename = "currentStatus", default)]
    pub current_status: String,
    #[serde(default)]
    pub sftp: bool,
}

impl fmt::Display for TldMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tld={} ulabel={} status={} sftp={}",
            self.tld, self.ulabel, self.current_status, self.sftp
        )
    }
}

/// Account credentials for the authentication endpoint.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        Ok(Self { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_http_dates() {
        let parsed = ZoneDetails::parse_last_modified("Wed, 21 Oct 2015 07:28:00 GMT");
        let expected = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
        assert_eq!(parsed, Some(expected));
        assert_eq!(ZoneDetails::parse_last_modified("yesterday"), None);
    }

    #[test]
    fn test_details_display_as_json() {
        let details = ZoneDetails {
            name: "example".into(),
            last_modified: None,
            content_length: Some(42),
            content_type: "application/x-gzip".into(),
        };
        let json: serde_json::Value = serde_json::from_str(&details.to_string()).unwrap();
        assert_eq!(json["name"], "example");
        assert_eq!(json["content_length"], 42);
    }

    #[test]
    fn test_tld_meta_uses_wire_names() {
        let meta: TldMeta = serde_json::from_str(
            r#"{"tld":"example","ulable":"example","currentStatus":"approved","sftp":false}"#,
        )
        .unwrap();
        assert_eq!(meta.current_status, "approved");
        assert_eq!(
            meta.to_string(),
            "tld=example ulabel=example status=approved sftp=false"
        );
    }

    #[test]
    fn test_empty_credentials_are_rejected() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(ApiError::MissingCredentials)
        ));
        assert!(matches!(
            Credentials::new("user", ""),
            Err(ApiError::MissingCredentials)
        ));
        let creds = Credentials::new("user", "secret").unwrap();
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
