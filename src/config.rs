//! Configuration for an aggregation run.

use std::time::Duration;

/// Proxy-link schemes recognized when no explicit list is configured.
pub const DEFAULT_SCHEMES: [&str; 5] =
    ["vmess://", "vless://", "ss://", "trojan://", "hysteria2://"];

/// User agent sent with every subscription request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for an aggregation run.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Prefixes an entry must start with to be kept.
    pub schemes: Vec<String>,
    /// Timeout for a single subscription request.
    pub timeout: Duration,
    /// Pause between consecutive subscription fetches.
    pub delay: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Number of sources fetched at once. 1 means strictly sequential.
    pub concurrency: usize,
    /// Optional upstream proxy used for every fetch (http, https or socks5).
    pub proxy: Option<String>,
}

impl AggregatorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AggregatorConfigBuilder {
        AggregatorConfigBuilder::new()
    }

    /// Whether sources are fetched one at a time.
    pub fn is_sequential(&self) -> bool {
        self.concurrency <= 1
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfigBuilder::new().build()
    }
}

/// Builder for `AggregatorConfig`.
pub struct AggregatorConfigBuilder {
    schemes: Option<Vec<String>>,
    timeout: Option<Duration>,
    delay: Option<Duration>,
    user_agent: Option<String>,
    concurrency: Option<usize>,
    proxy: Option<String>,
}

impl AggregatorConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            schemes: None,
            timeout: None,
            delay: None,
            user_agent: None,
            concurrency: None,
            proxy: None,
        }
    }

    /// Replace the recognized scheme prefixes.
    pub fn schemes(mut self, schemes: Vec<impl Into<String>>) -> Self {
        self.schemes = Some(schemes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the timeout for a single request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the pause between consecutive fetches.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the user agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set how many sources may be fetched at once.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Route every fetch through an upstream proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AggregatorConfig {
        AggregatorConfig {
            schemes: self
                .schemes
                .unwrap_or_else(|| DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect()),
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            delay: self.delay.unwrap_or(Duration::from_secs(1)),
            user_agent: self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            concurrency: self.concurrency.unwrap_or(1).max(1),
            proxy: self.proxy,
        }
    }
}

impl Default for AggregatorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
