use std::io;
use std::path::PathBuf;

use czds_api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no TLD can be derived from '{0}'")]
    UnrecognizedUrl(String),

    #[error("stream interrupted after {copied} bytes: {source}")]
    Interrupted {
        copied: u64,
        #[source]
        source: ApiError,
    },

    #[error("failed to {op} '{}': {source}", .path.display())]
    LocalIo {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("API reported length of {expected} bytes but wrote {actual} bytes")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("work queue closed before the item could be handed off")]
    QueueClosed,

    #[error("cancelled")]
    Cancelled,
}

impl FetchError {
    pub(crate) fn local(
        op: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::LocalIo { op, path, source }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
