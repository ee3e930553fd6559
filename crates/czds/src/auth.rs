use std::path::Path;

use anyhow::{Context, Result};
use czds_api::{AccessToken, HttpSession};
use tracing::debug;

use crate::config::Settings;

/// Session authorized by a saved token when `auth_file` is given, otherwise
/// by logging in with the configured credentials.
pub async fn authenticate(settings: &Settings, auth_file: Option<&Path>) -> Result<HttpSession> {
    match auth_file {
        Some(path) => {
            debug!(path = %path.display(), "reading authorization token");
            let token = AccessToken::load(path)
                .with_context(|| format!("unable to read token from '{}'", path.display()))?;
            let session = HttpSession::new(settings.endpoints())?;
            Ok(session.with_token(token))
        }
        None => login(settings).await,
    }
}

pub async fn login(settings: &Settings) -> Result<HttpSession> {
    debug!("requesting auth token using credentials");
    let credentials = settings.credentials()?;
    let mut session = HttpSession::new(settings.endpoints())?;
    session
        .login(&credentials)
        .await
        .context("authentication failed")?;
    debug!("request is authorized");
    Ok(session)
}
