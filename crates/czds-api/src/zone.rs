//! Mapping between TLD codes and zone download URLs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Base API URL for the ICANN CZDS REST API.
pub const DEFAULT_API_URL: &str = "https://czds-api.icann.org";
/// Authentication URL for the ICANN CZDS REST API.
pub const DEFAULT_AUTH_URL: &str = "https://account-api.icann.org/api/authenticate";
/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("czds/", env!("CARGO_PKG_VERSION"));

static ZONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/([^/]+)\.zone$").unwrap());

/// Remote locations used by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub auth_url: String,
    pub user_agent: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Endpoints {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Download URL for a TLD code under these endpoints.
    pub fn zone_url(&self, tld: &str) -> String {
        url_from_tld(&self.api_url, tld)
    }

    pub fn links_url(&self) -> String {
        format!("{}/czds/downloads/links", self.api_url)
    }

    pub fn tlds_url(&self) -> String {
        format!("{}/czds/tlds", self.api_url)
    }
}

/// Returns the TLD named by a zone URL as returned by the links listing,
/// or an empty string when the URL does not end in `/<tld>.zone`.
pub fn tld_from_url(url: &str) -> String {
    ZONE_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Returns the download URL of a TLD zone under `api_url`.
pub fn url_from_tld(api_url: &str, tld: &str) -> String {
    format!(
        "{}/czds/downloads/{}.zone",
        api_url.trim_end_matches('/'),
        tld.to_lowercase()
    )
}
