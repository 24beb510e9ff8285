//! Per-source processing and the run loop.

use std::pin::pin;

use futures::stream::{self, StreamExt};
use log::{info, warn};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::aggregate::Aggregate;
use crate::config::AggregatorConfig;
use crate::detect::{self, Encoding};
use crate::error::{DecodeError, Error, FetchError, Result};
use crate::extract;
use crate::fetch::Fetcher;
use crate::scheme::SchemeFilter;

/// Entries pulled out of one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub encoding: Encoding,
    /// Number of non-empty lines before scheme filtering.
    pub candidates: usize,
    /// Lines that passed the scheme filter, in body order.
    pub entries: Vec<String>,
}

/// Classify, extract and filter one body. No I/O.
pub fn process_body(
    body: &str,
    filter: &SchemeFilter,
) -> std::result::Result<Extracted, DecodeError> {
    let encoding = detect::classify(body);
    let candidates = extract::extract(body, encoding)?;
    let count = candidates.len();
    Ok(Extracted {
        encoding,
        candidates: count,
        entries: filter.filter(candidates),
    })
}

/// What one source contributed to the run.
#[derive(Debug)]
pub enum SourceOutcome {
    /// At least one recognized entry; `added` of them were new to the set.
    Collected { entries: usize, added: usize },
    /// The body was fetched and decoded but held no recognized entry.
    NoRecognizedEntries { candidates: usize },
    FetchFailed(FetchError),
    DecodeFailed(DecodeError),
}

#[derive(Debug)]
pub struct SourceReport {
    /// Zero-based position in the source list.
    pub index: usize,
    pub url: String,
    pub outcome: SourceOutcome,
}

/// Counts over a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub sources: usize,
    pub collected: usize,
    pub empty: usize,
    pub fetch_failed: usize,
    pub decode_failed: usize,
    pub unique: usize,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub aggregate: Aggregate,
    /// One report per source, in source-list order.
    pub sources: Vec<SourceReport>,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            sources: self.sources.len(),
            unique: self.aggregate.len(),
            ..RunSummary::default()
        };
        for report in &self.sources {
            match report.outcome {
                SourceOutcome::Collected { .. } => summary.collected += 1,
                SourceOutcome::NoRecognizedEntries { .. } => summary.empty += 1,
                SourceOutcome::FetchFailed(_) => summary.fetch_failed += 1,
                SourceOutcome::DecodeFailed(_) => summary.decode_failed += 1,
            }
        }
        summary
    }
}

enum Staged {
    Fetched(Extracted),
    FetchFailed(FetchError),
    DecodeFailed(DecodeError),
}

/// Drives fetching and folding for a list of sources.
pub struct Pipeline<F> {
    config: AggregatorConfig,
    filter: SchemeFilter,
    fetcher: F,
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(config: AggregatorConfig, fetcher: F) -> Self {
        let filter = SchemeFilter::from_config(&config);
        Self {
            config,
            filter,
            fetcher,
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Process every source and return the aggregate.
    ///
    /// Fails with [`Error::EmptyAggregate`] if no source contributed an entry,
    /// or [`Error::Cancelled`] if `cancel` fires first.
    pub async fn run(&self, urls: &[String], cancel: &CancellationToken) -> Result<RunReport> {
        let report = self.collect(urls, cancel).await?;
        let summary = report.summary();
        info!(
            "Sources: {} total, {} collected, {} without recognized entries",
            summary.sources, summary.collected, summary.empty
        );
        info!(
            "Failures: {} fetch, {} decode",
            summary.fetch_failed, summary.decode_failed
        );
        if report.aggregate.is_empty() {
            return Err(Error::EmptyAggregate { sources: urls.len() });
        }
        Ok(report)
    }

    /// Process every source without judging the result.
    pub async fn collect(&self, urls: &[String], cancel: &CancellationToken) -> Result<RunReport> {
        info!("Found {} subscription URLs to process", urls.len());
        if self.config.is_sequential() {
            self.collect_sequential(urls, cancel).await
        } else {
            self.collect_concurrent(urls, cancel).await
        }
    }

    async fn collect_sequential(
        &self,
        urls: &[String],
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        let mut aggregate = Aggregate::new();
        let mut sources = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            if index > 0 && !self.config.delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(Error::Cancelled),
                    _ = time::sleep(self.config.delay) => {}
                }
            }
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            info!("Processing {}/{}: {}", index + 1, urls.len(), url);
            let staged = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                staged = self.process_source(url) => staged,
            };
            sources.push(fold(&mut aggregate, index, url, staged));
        }

        Ok(RunReport { aggregate, sources })
    }

    // Fetches overlap, but results are folded here one at a time and in
    // source-list order.
    async fn collect_concurrent(
        &self,
        urls: &[String],
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        let mut aggregate = Aggregate::new();
        let mut sources = Vec::with_capacity(urls.len());

        let mut results = pin!(stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move {
                if cancel.is_cancelled() {
                    return None;
                }
                Some((index, url, self.process_source(url).await))
            })
            .buffered(self.config.concurrency));

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                next = results.next() => next,
            };
            match next {
                Some(Some((index, url, staged))) => {
                    info!("Processed {}/{}: {}", index + 1, urls.len(), url);
                    sources.push(fold(&mut aggregate, index, url, staged));
                }
                Some(None) => return Err(Error::Cancelled),
                None => break,
            }
        }

        Ok(RunReport { aggregate, sources })
    }

    async fn process_source(&self, url: &str) -> Staged {
        let body = match self.fetcher.fetch(url).await.into_result() {
            Ok(body) => body,
            Err(e) => return Staged::FetchFailed(e),
        };
        match process_body(&body, &self.filter) {
            Ok(extracted) => Staged::Fetched(extracted),
            Err(e) => Staged::DecodeFailed(e),
        }
    }
}

fn fold(aggregate: &mut Aggregate, index: usize, url: &str, staged: Staged) -> SourceReport {
    let outcome = match staged {
        Staged::Fetched(extracted) => {
            info!(
                "  Found {} configurations ({} lines, {:?})",
                extracted.entries.len(),
                extracted.candidates,
                extracted.encoding
            );
            if extracted.entries.is_empty() {
                warn!("No recognized configurations in {} ({} lines)", url, extracted.candidates);
                SourceOutcome::NoRecognizedEntries {
                    candidates: extracted.candidates,
                }
            } else {
                let entries = extracted.entries.len();
                let added = aggregate.add(extracted.entries);
                SourceOutcome::Collected { entries, added }
            }
        }
        Staged::FetchFailed(e) => {
            warn!("Failed to fetch content from {}: {}", url, e);
            SourceOutcome::FetchFailed(e)
        }
        Staged::DecodeFailed(e) => {
            warn!("Failed to decode base64 content from {}: {}", url, e);
            SourceOutcome::DecodeFailed(e)
        }
    };
    SourceReport {
        index,
        url: url.to_string(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    #[test]
    fn raw_body_is_filtered() {
        let body = "vless://x\nfoo\nvmess://y\n";
        let extracted = process_body(body, &SchemeFilter::default()).unwrap();
        assert_eq!(extracted.encoding, Encoding::Raw);
        assert_eq!(extracted.candidates, 3);
        assert_eq!(extracted.entries, vec!["vless://x", "vmess://y"]);
    }

    #[test]
    fn base64_body_is_decoded_then_filtered() {
        let body = STANDARD.encode("vmess://y\nVMESS://q\nss://z\n");
        let extracted = process_body(&body, &SchemeFilter::default()).unwrap();
        assert_eq!(extracted.encoding, Encoding::Base64);
        assert_eq!(extracted.entries, vec!["vmess://y", "ss://z"]);
    }

    #[test]
    fn undecodable_base64_is_an_error() {
        let body = STANDARD.encode([0xc3, 0x28, 0xa0]);
        assert!(process_body(&body, &SchemeFilter::default()).is_err());
    }

    #[test]
    fn fold_distinguishes_empty_from_failed() {
        let mut aggregate = Aggregate::new();
        let empty = Extracted {
            encoding: Encoding::Raw,
            candidates: 2,
            entries: Vec::new(),
        };
        let report = fold(&mut aggregate, 0, "http://a", Staged::Fetched(empty));
        assert!(matches!(report.outcome, SourceOutcome::NoRecognizedEntries { candidates: 2 }));

        let report = fold(
            &mut aggregate,
            1,
            "http://b",
            Staged::FetchFailed(FetchError::Status(reqwest::StatusCode::NOT_FOUND)),
        );
        assert!(matches!(report.outcome, SourceOutcome::FetchFailed(_)));
        assert_eq!(report.index, 1);
        assert!(aggregate.is_empty());
    }
}
