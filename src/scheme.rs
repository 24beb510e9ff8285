//! Recognized proxy-link schemes.

use crate::config::AggregatorConfig;

/// Keeps entries that start with one of a fixed set of prefixes.
///
/// Matching is a case-sensitive literal prefix test; `VMESS://` does not
/// match `vmess://`.
#[derive(Debug, Clone)]
pub struct SchemeFilter {
    prefixes: Vec<String>,
}

impl SchemeFilter {
    pub fn new(prefixes: Vec<impl Into<String>>) -> Self {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &AggregatorConfig) -> Self {
        Self::new(config.schemes.clone())
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Whether `entry` starts with a recognized prefix.
    pub fn matches(&self, entry: &str) -> bool {
        self.prefixes.iter().any(|p| entry.starts_with(p.as_str()))
    }

    /// Drop every candidate that does not match.
    pub fn filter(&self, candidates: Vec<String>) -> Vec<String> {
        candidates.into_iter().filter(|c| self.matches(c)).collect()
    }
}

impl Default for SchemeFilter {
    fn default() -> Self {
        Self::from_config(&AggregatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schemes_match() {
        let filter = SchemeFilter::default();
        for entry in ["vmess://a", "vless://b", "ss://c", "trojan://d", "hysteria2://e"] {
            assert!(filter.matches(entry), "{entry}");
        }
    }

    #[test]
    fn wrong_case_and_malformed_are_rejected() {
        let filter = SchemeFilter::default();
        assert!(!filter.matches("VMESS://a"));
        assert!(!filter.matches("vmess:/a"));
        assert!(!filter.matches(" vmess://a"));
        assert!(!filter.matches("hysteria://a"));
        assert!(!filter.matches("socks5://127.0.0.1:1080"));
    }

    #[test]
    fn filter_keeps_order() {
        let filter = SchemeFilter::default();
        let kept = filter.filter(vec![
            "vless://x".to_string(),
            "foo".to_string(),
            "vmess://y".to_string(),
        ]);
        assert_eq!(kept, vec!["vless://x", "vmess://y"]);
    }

    #[test]
    fn custom_prefixes() {
        let filter = SchemeFilter::new(vec!["tuic://", ""]);
        assert_eq!(filter.prefixes(), ["tuic://".to_string()]);
        assert!(filter.matches("tuic://x"));
        assert!(!filter.matches("vmess://x"));
    }
}
