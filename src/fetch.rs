//! Fetching subscription bodies.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use url::Url;

use crate::config::AggregatorConfig;
use crate::error::FetchError;
use crate::middleware::PacingMiddleware;

/// Outcome of fetching one source. A fetch never fails past this type.
#[derive(Debug)]
pub enum FetchResult {
    Body(String),
    Failure { url: String, cause: FetchError },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Body(_))
    }

    pub fn into_result(self) -> Result<String, FetchError> {
        match self {
            FetchResult::Body(body) => Ok(body),
            FetchResult::Failure { cause, .. } => Err(cause),
        }
    }
}

/// Something that can retrieve a subscription body by URL.
///
/// The pipeline only talks to this trait, so tests can serve bodies from
/// memory.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> FetchResult {
        (**self).fetch(url).await
    }
}

/// Fetches subscriptions over HTTP(S).
#[derive(Clone)]
pub struct HttpFetcher {
    client: ClientWithMiddleware,
}

impl HttpFetcher {
    /// Build a client from the run configuration.
    ///
    /// Fails if the underlying client cannot be built, e.g. because the user
    /// agent is not a valid header value or the upstream proxy URL is invalid.
    pub fn new(config: &AggregatorConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let client = builder.build()?;

        // The sequential loop sleeps between sources itself.
        let pacing = if config.is_sequential() {
            PacingMiddleware::new()
        } else {
            PacingMiddleware::with_interval(config.delay)
        };

        Ok(Self {
            client: ClientBuilder::new(client).with(pacing).build(),
        })
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let url = Url::parse(url)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        response.text().await.map_err(FetchError::Body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        match self.get(url).await {
            Ok(body) => FetchResult::Body(body),
            Err(cause) => FetchResult::Failure {
                url: url.to_string(),
                cause,
            },
        }
    }
}
