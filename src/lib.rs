//! # sub-merge
//!
//! Merge proxy subscription endpoints into one deduplicated link list.
//!
//! Each subscription URL is fetched, its body classified as base64 or raw
//! text, split into lines, filtered down to recognized proxy-link schemes
//! (`vmess://`, `vless://`, `ss://`, `trojan://`, `hysteria2://` by default)
//! and folded into a single set that is written out sorted, one link per
//! line.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod middleware;
pub mod output;
pub mod pipeline;
pub mod scheme;
pub mod sources;

pub use aggregate::Aggregate;
pub use config::{AggregatorConfig, AggregatorConfigBuilder, DEFAULT_SCHEMES};
pub use detect::{classify, Encoding};
pub use error::{DecodeError, Error, FetchError, Result};
pub use extract::extract;
pub use fetch::{FetchResult, Fetcher, HttpFetcher};
pub use middleware::PacingMiddleware;
pub use output::{render, write_output};
pub use pipeline::{process_body, Pipeline, RunReport, RunSummary, SourceOutcome, SourceReport};
pub use scheme::SchemeFilter;
pub use sources::{parse_source_list, read_source_list};
