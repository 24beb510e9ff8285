//! Request middleware for subscription fetches.

use anyhow::anyhow;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest_middleware::{Error, Middleware, Next, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Middleware that spaces out request starts and logs every request.
///
/// Without a pacing interval it only logs; the sequential run loop does its
/// own pausing between sources.
#[derive(Clone, Default)]
pub struct PacingMiddleware {
    /// Shared limiter allowing one request per pacing interval.
    limiter: Option<Arc<Limiter>>,
}

impl PacingMiddleware {
    /// Create a middleware that only logs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a middleware that lets at most one request start per `interval`.
    /// A zero interval disables pacing.
    pub fn with_interval(interval: Duration) -> Self {
        let limiter =
            Quota::with_period(interval).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter }
    }

    pub fn is_pacing(&self) -> bool {
        self.limiter.is_some()
    }
}

#[async_trait]
impl Middleware for PacingMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> Result<reqwest::Response> {
        let scheme = req.url().scheme();
        if scheme != "http" && scheme != "https" {
            return Err(Error::Middleware(anyhow!(
                "unsupported url scheme `{}` for {}",
                scheme,
                req.url()
            )));
        }

        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = req.url().clone();
        let start = Instant::now();
        debug!("GET {}", url);

        let result = next.run(req, extensions).await;
        match &result {
            Ok(response) => debug!("GET {} -> {} in {:?}", url, response.status(), start.elapsed()),
            Err(e) => debug!("GET {} failed after {:?}: {}", url, start.elapsed(), e),
        }
        result
    }
}
