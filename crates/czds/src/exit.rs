//! Process exit codes.

use std::path::PathBuf;

/// The access token was obtained but could not be written.
#[derive(Debug, thiserror::Error)]
#[error("unable to save session to '{}': {source}", .path.display())]
pub struct TokenNotSaved {
    pub path: PathBuf,
    #[source]
    pub source: czds_api::ApiError,
}

/// 2 when a token could not be saved, 1 for every other failure.
pub fn code_for(err: &anyhow::Error) -> u8 {
    if err.chain().any(|cause| cause.is::<TokenNotSaved>()) {
        2
    } else {
        1
    }
}
