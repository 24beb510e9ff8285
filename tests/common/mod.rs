#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::StatusCode;
use sub_merge::{FetchError, FetchResult, Fetcher};
use tokio_util::sync::CancellationToken;

/// Serves canned bodies; unknown URLs answer 404.
#[derive(Default)]
pub struct MemoryFetcher {
    pub bodies: HashMap<String, String>,
    pub latency: HashMap<String, Duration>,
    pub calls: AtomicUsize,
    pub order: Mutex<Vec<String>>,
    pub cancel_on_fetch: Option<CancellationToken>,
}

impl MemoryFetcher {
    pub fn new(bodies: &[(&str, String)]) -> Self {
        Self {
            bodies: bodies.iter().map(|(u, b)| (u.to_string(), b.clone())).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.latency.get(url) {
            tokio::time::sleep(*delay).await;
        }
        self.order.lock().unwrap().push(url.to_string());
        if let Some(token) = &self.cancel_on_fetch {
            token.cancel();
        }
        match self.bodies.get(url) {
            Some(body) => FetchResult::Body(body.clone()),
            None => FetchResult::Failure {
                url: url.to_string(),
                cause: FetchError::Status(StatusCode::NOT_FOUND),
            },
        }
    }
}

pub fn urls(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// `http://a` serves raw links, `http://b` the same kind of list in base64.
pub fn scenario_fetcher() -> MemoryFetcher {
    MemoryFetcher::new(&[
        ("http://a", "vless://x\nfoo\nvmess://y\n".to_string()),
        ("http://b", STANDARD.encode("vmess://y\nss://z\n")),
    ])
}
