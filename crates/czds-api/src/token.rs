//! Persistence of access tokens between invocations.
//!
//! The stored file contains an unencrypted bearer token; it is written with
//! restrictive permissions and replaced atomically so a failed save never
//! clobbers a previous token.

use std::fmt;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Default permissions of a stored token file.
pub const DEFAULT_TOKEN_MODE: u32 = 0o440;

/// Bearer token issued by the authentication endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "accessToken")]
    access_token: String,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.access_token
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }

    /// Read a token written by [`AccessToken::store`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let buf = std::fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&buf)?)
    }

    /// Serialize the token to `path` with the given Unix permissions.
    pub fn store(&self, path: impl AsRef<Path>, mode: u32) -> Result<()> {
        if self.is_empty() {
            return Err(ApiError::MissingCredentials);
        }

        let path = path.as_ref();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let body = serde_json::to_vec(self)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(".czds-token")
            .suffix(".tmp")
            .tempfile_in(parent)?;
        tmp.write_all(&body)?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(mode))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        tmp.persist(path).map_err(|e| ApiError::Io(e.error))?;
        Ok(())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken").field("access_token", &"<redacted>").finish()
    }
}
