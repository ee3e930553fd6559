use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use czds_api::token::DEFAULT_TOKEN_MODE;
use tracing::{debug, info};

use crate::auth;
use crate::config::Settings;
use crate::exit::TokenNotSaved;

#[derive(Args, Clone, Debug)]
#[command(long_about = "Authenticate with the configured credentials and save the access \
    token into FILE. An existing FILE is left untouched when anything fails.")]
pub struct SaveArg {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub async fn run(arg: SaveArg, settings: &Settings) -> Result<()> {
    debug!(path = %arg.file.display(), "token will be saved");
    let session = auth::login(settings).await?;
    let token = session.token().context("login returned no token")?;

    token
        .store(&arg.file, DEFAULT_TOKEN_MODE)
        .map_err(|e| TokenNotSaved {
            path: arg.file.clone(),
            source: e,
        })?;
    info!(path = %arg.file.display(), "access token saved");
    Ok(())
}
