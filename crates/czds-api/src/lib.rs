//! Client for the ICANN Centralized Zone Data Service (CZDS) REST API.
//!
//! # Architecture
//!
//! - [`Session`] - the surface the fetch pipeline consumes (list, details, download)
//! - [`HttpSession`] - production implementation backed by `reqwest`
//! - [`zone`] - pure helpers mapping TLD codes to download URLs and back
//! - [`token`] - persistence of bearer tokens between invocations
//!
//! Errors for well-known HTTP status codes are typed; see [`ApiError`].

mod data;
mod error;
mod session;
pub mod token;
pub mod zone;

pub use data::{Credentials, TldMeta, ZoneDetails};
pub use error::{ApiError, ErrorKind, Result};
pub use session::{BoxStream, ByteStream, Session};
pub use token::AccessToken;
pub use zone::{Endpoints, tld_from_url, url_from_tld};

#[cfg(feature = "reqwest")]
pub use session::HttpSession;
