use std::io;

/// Coarse classification of [`ApiError`], used for logging and exit decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, malformed request or response.
    Transport,
    /// Credentials or token rejected.
    Auth,
    /// The account may not access the resource.
    Permission,
    /// Terms and conditions must be accepted out-of-band.
    TermsRequired,
    /// The remote side failed.
    Server,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing or invalid credentials supplied")]
    MissingCredentials,

    #[error("malformed request reported by API")]
    BadRequest,

    #[error("invalid credentials provided to API")]
    InvalidCredentials,

    #[error("access token rejected by API (expired or invalid)")]
    InvalidToken,

    #[error("unsupported content type sent to API")]
    UnsupportedContent,

    #[error("too many authentication requests sent to API")]
    TooManyRequests,

    #[error("access to zone file denied to this user")]
    NoPermission,

    #[error("this user has not accepted the new terms and conditions to access the CZDS")]
    TermsRequired,

    #[error("internal error in API")]
    InternalServer,

    #[error("unexpected status code {status} returned by {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[cfg(feature = "reqwest")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials
            | Self::InvalidCredentials
            | Self::InvalidToken
            | Self::UnsupportedContent
            | Self::TooManyRequests => ErrorKind::Auth,
            Self::NoPermission => ErrorKind::Permission,
            Self::TermsRequired => ErrorKind::TermsRequired,
            Self::InternalServer => ErrorKind::Server,
            Self::UnexpectedStatus { status, .. } if *status >= 500 => ErrorKind::Server,
            _ => ErrorKind::Transport,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_known_errors() {
        assert_eq!(ApiError::InvalidCredentials.kind(), ErrorKind::Auth);
        assert_eq!(ApiError::InvalidToken.kind(), ErrorKind::Auth);
        assert_eq!(ApiError::NoPermission.kind(), ErrorKind::Permission);
        assert_eq!(ApiError::TermsRequired.kind(), ErrorKind::TermsRequired);
        assert_eq!(ApiError::InternalServer.kind(), ErrorKind::Server);
        assert_eq!(ApiError::BadRequest.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_unexpected_status_splits_on_server_range() {
        let server = ApiError::UnexpectedStatus {
            status: 503,
            url: "https://czds-api.icann.org/czds/downloads/links".into(),
        };
        let client = ApiError::UnexpectedStatus {
            status: 404,
            url: "https://czds-api.icann.org/czds/downloads/links".into(),
        };
        assert_eq!(server.kind(), ErrorKind::Server);
        assert_eq!(client.kind(), ErrorKind::Transport);
        assert!(client.to_string().contains("404"));
    }
}
