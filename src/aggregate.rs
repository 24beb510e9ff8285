//! The deduplicated set of entries collected across sources.

use std::collections::HashSet;

/// Every recognized entry seen so far, keyed by exact string.
///
/// The set only grows. Two links that differ in any byte, even a trailing
/// slash, are both kept.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    entries: HashSet<String>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold entries into the set. Returns how many were not already present.
    pub fn add<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.entries.len();
        self.entries.extend(entries);
        self.entries.len() - before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry)
    }

    /// All entries in lexicographic order.
    pub fn snapshot(&self) -> Vec<&str> {
        let mut entries: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        entries.sort_unstable();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicates_collapse() {
        let mut agg = Aggregate::new();
        assert_eq!(agg.add(strings(&["vless://x", "vmess://y"])), 2);
        assert_eq!(agg.add(strings(&["vmess://y", "ss://z", "ss://z"])), 1);
        assert_eq!(agg.len(), 3);
        assert_eq!(agg.snapshot(), vec!["ss://z", "vless://x", "vmess://y"]);
    }

    #[test]
    fn exact_identity() {
        let mut agg = Aggregate::new();
        agg.add(strings(&["vless://x", "vless://x/"]));
        assert_eq!(agg.len(), 2);
        assert!(agg.contains("vless://x/"));
    }

    #[test]
    fn order_of_adds_does_not_matter() {
        let mut a = Aggregate::new();
        a.add(strings(&["b", "a"]));
        a.add(strings(&["c"]));
        let mut b = Aggregate::new();
        b.add(strings(&["c", "a"]));
        b.add(strings(&["b"]));
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn empty_add_is_noop() {
        let mut agg = Aggregate::new();
        assert_eq!(agg.add(Vec::new()), 0);
        assert!(agg.is_empty());
    }
}
