use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::ZoneDetails;
use crate::error::Result;

/// A boxed stream type for response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Body of a zone download, yielded chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Authenticated access to the zone listing and zone files.
///
/// This is the minimal surface the fetch pipeline needs. Implementations map
/// well-known HTTP statuses to [`ApiError`](crate::ApiError) variants and never
/// retry on their own.
pub trait Session: Send + Sync {
    /// Zone URLs the account may download, in API order.
    fn list(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Size, type and modification time of a zone without downloading it.
    fn details(&self, url: &str) -> impl Future<Output = Result<ZoneDetails>> + Send;

    /// Open a streaming read of the zone content.
    fn download(&self, url: &str) -> impl Future<Output = Result<ByteStream>> + Send;
}

#[cfg(feature = "reqwest")]
mod http {
    use std::collections::BTreeMap;

    use futures_util::StreamExt;
    use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};
    use reqwest::{Client, Method, RequestBuilder, Response};
    use tracing::debug;

    use super::*;
    use crate::data::{Credentials, TldMeta};
    use crate::error::ApiError;
    use crate::token::AccessToken;
    use crate::zone::{Endpoints, tld_from_url};

    /// Production session backed by `reqwest`.
    pub struct HttpSession {
        client: Client,
        endpoints: Endpoints,
        token: Option<AccessToken>,
    }

    impl HttpSession {
        pub fn new(endpoints: Endpoints) -> Result<Self> {
            let client = Client::builder()
                .user_agent(endpoints.user_agent.clone())
                .build()?;
            Ok(Self {
                client,
                endpoints,
                token: None,
            })
        }

        /// Reuse a token obtained earlier, typically loaded from a token file.
        pub fn with_token(mut self, token: AccessToken) -> Self {
            self.token = Some(token);
            self
        }

        pub fn token(&self) -> Option<&AccessToken> {
            self.token.as_ref()
        }

        pub fn endpoints(&self) -> &Endpoints {
            &self.endpoints
        }

        /// Authenticate against the account API and keep the returned token.
        pub async fn login(&mut self, credentials: &Credentials) -> Result<&AccessToken> {
            debug!(
                url = %self.endpoints.auth_url,
                user = %credentials.username,
                "requesting access token"
            );
            let response = self
                .client
                .post(&self.endpoints.auth_url)
                .header(ACCEPT, "application/json")
                .json(credentials)
                .send()
                .await?;

            let response = match response.status().as_u16() {
                200 => response,
                400 => return Err(ApiError::BadRequest),
                401 => return Err(ApiError::InvalidCredentials),
                415 => return Err(ApiError::UnsupportedContent),
                429 => return Err(ApiError::TooManyRequests),
                500 => return Err(ApiError::InternalServer),
                status => {
                    return Err(ApiError::UnexpectedStatus {
                        status,
                        url: self.endpoints.auth_url.clone(),
                    });
                }
            };

            let body = response.bytes().await?;
            let token: AccessToken = serde_json::from_slice(&body)?;
            Ok(self.token.insert(token))
        }

        /// Metadata for every TLD visible to the account, keyed by TLD.
        pub async fn tlds(&self) -> Result<BTreeMap<String, TldMeta>> {
            let url = self.endpoints.tlds_url();
            let response = self.request(Method::GET, &url).send().await?;
            let response = api_status(response, &url)?;
            let body = response.bytes().await?;
            let list: Vec<TldMeta> = serde_json::from_slice(&body)?;
            Ok(list.into_iter().map(|meta| (meta.tld.clone(), meta)).collect())
        }

        fn request(&self, method: Method, url: &str) -> RequestBuilder {
            let request = self
                .client
                .request(method, url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json");

            match &self.token {
                Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token.as_str())),
                None => request,
            }
        }
    }

    fn api_status(response: Response, url: &str) -> Result<Response> {
        match response.status().as_u16() {
            200 => Ok(response),
            400 => Err(ApiError::BadRequest),
            401 => Err(ApiError::InvalidToken),
            500 => Err(ApiError::InternalServer),
            status => Err(ApiError::UnexpectedStatus {
                status,
                url: url.to_string(),
            }),
        }
    }

    fn download_status(response: Response, url: &str) -> Result<Response> {
        match response.status().as_u16() {
            403 => Err(ApiError::NoPermission),
            409 => Err(ApiError::TermsRequired),
            _ => api_status(response, url),
        }
    }

    fn header_str<'a>(
        response: &'a Response,
        name: reqwest::header::HeaderName,
    ) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    impl Session for HttpSession {
        async fn list(&self) -> Result<Vec<String>> {
            let url = self.endpoints.links_url();
            debug!(%url, "fetching zone links");
            let response = self.request(Method::GET, &url).send().await?;
            let response = api_status(response, &url)?;
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        }

        async fn details(&self, url: &str) -> Result<ZoneDetails> {
            let response = self.request(Method::HEAD, url).send().await?;
            let response = api_status(response, url)?;

            // HEAD responses carry no body, so the length comes from the header
            // rather than `Response::content_length`.
            let content_length =
                header_str(&response, CONTENT_LENGTH).and_then(|v| v.parse::<u64>().ok());
            let last_modified =
                header_str(&response, LAST_MODIFIED).and_then(ZoneDetails::parse_last_modified);
            let content_type = header_str(&response, CONTENT_TYPE)
                .unwrap_or_default()
                .to_string();

            Ok(ZoneDetails {
                name: tld_from_url(url),
                last_modified,
                content_length,
                content_type,
            })
        }

        async fn download(&self, url: &str) -> Result<ByteStream> {
            let response = self.request(Method::GET, url).send().await?;
            let response = download_status(response, url)?;
            let stream = response.bytes_stream().map(|chunk| chunk.map_err(ApiError::from));
            Ok(Box::pin(stream))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use http::HttpSession;
