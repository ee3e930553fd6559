//! Layered settings: defaults, TOML file, `CZDS_*` environment.
//!
//! Command-line flags are applied on top by the subcommands themselves.

use std::path::{Path, PathBuf};

use czds_api::zone::{DEFAULT_API_URL, DEFAULT_AUTH_URL, DEFAULT_USER_AGENT};
use czds_api::{Credentials, Endpoints};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Config files tried in order when no `--config` is given.
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["/etc/czds.toml", "czds.toml"];
pub const ENV_PREFIX: &str = "CZDS_";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),
    #[error("invalid configuration: {0}")]
    Figment(#[from] figment::Error),
    #[error("{key} must be at least 1")]
    NoWorkers { key: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auth: AuthSettings,
    pub api: ApiSettings,
    pub download: DownloadSettings,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Unset means the per-command default (4 for `ls`, 2 for `fetch`).
    pub info_workers: Option<usize>,
    pub fetch_workers: usize,
    pub base_url: String,
    pub auth_url: String,
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            info_workers: None,
            fetch_workers: czds_fetch::data::DEFAULT_TRANSFER_WORKERS,
            base_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    pub destination_dir: PathBuf,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            destination_dir: PathBuf::from("./"),
        }
    }
}

impl Settings {
    /// Load settings from `path` (which must exist) or the default locations,
    /// then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(Error::MissingFile(path.to_path_buf()));
                }
                figment = figment.merge(Toml::file_exact(path));
            }
            None => {
                for path in DEFAULT_CONFIG_PATHS {
                    figment = figment.merge(Toml::file_exact(path));
                }
            }
        }
        Self::extract(figment.merge(env_provider()))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.info_workers == Some(0) {
            return Err(Error::NoWorkers {
                key: "api.info_workers",
            });
        }
        if self.api.fetch_workers == 0 {
            return Err(Error::NoWorkers {
                key: "api.fetch_workers",
            });
        }
        Ok(())
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::default()
            .api_url(&self.api.base_url)
            .auth_url(&self.api.auth_url)
            .user_agent(&self.api.user_agent)
    }

    pub fn credentials(&self) -> czds_api::Result<Credentials> {
        Credentials::new(&self.auth.username, &self.auth.password)
    }
}

/// `CZDS_API_FETCH_WORKERS` becomes `api.fetch_workers`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| key.as_str().replacen('_', ".", 1).into())
}
