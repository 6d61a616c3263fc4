use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{
    AuthData, FavoriteStatus, Offer, OfferDetail, Review, ReviewDraft, UserInfo,
};
use crate::token::TokenStore;

pub mod endpoint;

pub use endpoint::Endpoint;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{0}'")]
    BaseUrl(String),
    #[error("invalid endpoint path '{path}': {reason}")]
    Path { path: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server answered {status} for {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status of a non-2xx answer, if that is what this error is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport { source, .. } if source.is_timeout())
    }
}

/// The remote six-cities API as seen by the coordinators.
#[async_trait]
pub trait ApiService: Send + Sync {
    async fn check_session(&self) -> Result<UserInfo, ApiError>;

    async fn login(&self, credentials: &AuthData) -> Result<UserInfo, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;

    async fn offers(&self) -> Result<Vec<Offer>, ApiError>;

    async fn offer(&self, offer_id: &str) -> Result<OfferDetail, ApiError>;

    async fn nearby(&self, offer_id: &str) -> Result<Vec<Offer>, ApiError>;

    async fn reviews(&self, offer_id: &str) -> Result<Vec<Review>, ApiError>;

    async fn post_review(&self, offer_id: &str, draft: &ReviewDraft) -> Result<(), ApiError>;

    async fn favorites(&self) -> Result<Vec<Offer>, ApiError>;

    async fn set_favorite(
        &self,
        offer_id: &str,
        status: FavoriteStatus,
    ) -> Result<OfferDetail, ApiError>;
}

/// reqwest-backed client with a fixed base URL, a fixed timeout and a
/// token-attaching request step.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token_header: String,
    tokens: Arc<dyn TokenStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token_header", &self.token_header)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token_header: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let http = Client::builder()
            .user_agent("six-cities/0.1")
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            http,
            base_url,
            token_header: token_header.into(),
            tokens,
        })
    }

    pub fn from_config(cfg: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::new(
            &cfg.api.base_url,
            cfg.api.timeout(),
            cfg.api.token_header.clone(),
            tokens,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a request for `endpoint`, attaching the persisted token when one
    /// is present. A missing token is not an error; the server decides.
    pub fn build_request(
        &self,
        method: Method,
        endpoint: Endpoint<'_>,
        body: Option<&Value>,
    ) -> Result<reqwest::Request, ApiError> {
        let url = self.endpoint_url(endpoint)?;

        let mut builder = self.http.request(method, url.clone());
        if let Some(token) = self.tokens.get() {
            builder = builder.header(self.token_header.as_str(), token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.build().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// Append the endpoint's segments to the base path. Segments are
    /// percent-encoded, so an id can never add segments or a query.
    fn endpoint_url(&self, endpoint: Endpoint<'_>) -> Result<Url, ApiError> {
        let segments = endpoint.segments();
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || s.as_str() == "." || s.as_str() == "..")
        {
            return Err(ApiError::Path {
                path: endpoint.path(),
                reason: format!("'{}' is not a valid path segment", bad),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&segments);
        Ok(url)
    }

    /// Send the request and return the raw body of a 2xx answer.
    async fn execute(&self, request: reqwest::Request) -> Result<(String, String), ApiError> {
        let url = request.url().to_string();
        debug!(method = %request.method(), %url, "api request");

        let res = self
            .http
            .execute(request)
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%url, %status, "api request rejected");
            return Err(ApiError::Status { url, status, body });
        }

        let body = res.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        debug!(%url, %status, bytes = body.len(), "api response");
        Ok((url, body))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: Endpoint<'_>,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let request = self.build_request(method, endpoint, body)?;
        let (url, raw) = self.execute(request).await?;
        serde_json::from_str(&raw).map_err(|source| ApiError::Decode { url, source })
    }

    async fn send(
        &self,
        method: Method,
        endpoint: Endpoint<'_>,
        body: Option<&Value>,
    ) -> Result<(), ApiError> {
        let request = self.build_request(method, endpoint, body)?;
        self.execute(request).await.map(|_| ())
    }
}

#[async_trait]
impl ApiService for ApiClient {
    async fn check_session(&self) -> Result<UserInfo, ApiError> {
        self.fetch(Method::GET, Endpoint::Login, None).await
    }

    async fn login(&self, credentials: &AuthData) -> Result<UserInfo, ApiError> {
        let body = serde_json::to_value(credentials).map_err(ApiError::Encode)?;
        self.fetch(Method::POST, Endpoint::Login, Some(&body)).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.send(Method::DELETE, Endpoint::Logout, None).await
    }

    async fn offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.fetch(Method::GET, Endpoint::Offers, None).await
    }

    async fn offer(&self, offer_id: &str) -> Result<OfferDetail, ApiError> {
        self.fetch(Method::GET, Endpoint::Offer(offer_id), None).await
    }

    async fn nearby(&self, offer_id: &str) -> Result<Vec<Offer>, ApiError> {
        self.fetch(Method::GET, Endpoint::Nearby(offer_id), None).await
    }

    async fn reviews(&self, offer_id: &str) -> Result<Vec<Review>, ApiError> {
        self.fetch(Method::GET, Endpoint::Comments(offer_id), None).await
    }

    async fn post_review(&self, offer_id: &str, draft: &ReviewDraft) -> Result<(), ApiError> {
        let body = serde_json::to_value(draft).map_err(ApiError::Encode)?;
        self.send(Method::POST, Endpoint::Comments(offer_id), Some(&body))
            .await
    }

    async fn favorites(&self) -> Result<Vec<Offer>, ApiError> {
        self.fetch(Method::GET, Endpoint::Favorites, None).await
    }

    async fn set_favorite(
        &self,
        offer_id: &str,
        status: FavoriteStatus,
    ) -> Result<OfferDetail, ApiError> {
        self.fetch(
            Method::POST,
            Endpoint::FavoriteStatus { offer_id, status },
            None,
        )
        .await
    }
}

/// Parse the base URL and make sure relative joins append to its path.
fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim()).map_err(|_| ApiError::BaseUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::BaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
