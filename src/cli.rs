//! Command-line surface of the `sub-merge` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{error, info, LevelFilter};
use tokio_util::sync::CancellationToken;

use crate::config::AggregatorConfig;
use crate::error::{Error, Result};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::output;
use crate::pipeline::{Pipeline, RunSummary};
use crate::sources;

/// Exit status when the merged list came out empty.
pub const EXIT_EMPTY: u8 = 2;
/// Exit status for any other fatal error.
pub const EXIT_FATAL: u8 = 1;
/// Exit status after Ctrl-C.
pub const EXIT_CANCELLED: u8 = 130;

/// Merge proxy subscriptions into one sorted, deduplicated list.
#[derive(Debug, Parser)]
#[command(name = "sub-merge", version, about)]
pub struct Cli {
    /// File listing subscription URLs, separated by newlines and/or commas.
    #[arg(short = 'i', long = "sources", default_value = "subs.txt")]
    pub sources: PathBuf,

    /// File the merged list is written to. Overwritten on every run.
    #[arg(short, long, default_value = "sum.txt")]
    pub output: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, default_value = "30", value_parser = parse_seconds)]
    pub timeout: Duration,

    /// Pause between subscription fetches in seconds.
    #[arg(long, default_value = "1", value_parser = parse_seconds)]
    pub delay: Duration,

    /// Recognized link prefix. Repeat to allow several; replaces the defaults.
    #[arg(long = "scheme", value_name = "PREFIX")]
    pub schemes: Vec<String>,

    /// User-Agent header sent with every request.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Upstream proxy for all fetches, e.g. socks5://127.0.0.1:1080.
    #[arg(long)]
    pub proxy: Option<String>,

    /// Number of subscriptions fetched at once.
    #[arg(short = 'j', long, default_value_t = 1)]
    pub concurrency: usize,

    /// Log per-request detail.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log level implied by `-v` / `-q`, used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }

    pub fn to_config(&self) -> AggregatorConfig {
        let mut builder = AggregatorConfig::builder()
            .timeout(self.timeout)
            .delay(self.delay)
            .concurrency(self.concurrency);
        if !self.schemes.is_empty() {
            builder = builder.schemes(self.schemes.clone());
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.clone());
        }
        builder.build()
    }
}

fn parse_seconds(s: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("`{s}` is not a valid duration: {e}"))
}

/// Initialise `env_logger` on stderr. `RUST_LOG` wins over the flags.
pub fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();
}

/// Read the source list, fetch every subscription over HTTP and write the
/// output file.
pub async fn execute(cli: &Cli, cancel: &CancellationToken) -> Result<RunSummary> {
    let urls = sources::read_source_list(&cli.sources)?;
    let config = cli.to_config();
    let fetcher = HttpFetcher::new(&config)?;
    merge_to_file(cli, urls, Pipeline::new(config, fetcher), cancel).await
}

/// Same as [`execute`] with a caller-supplied fetcher.
pub async fn execute_with<F: Fetcher>(
    cli: &Cli,
    fetcher: F,
    cancel: &CancellationToken,
) -> Result<RunSummary> {
    let urls = sources::read_source_list(&cli.sources)?;
    merge_to_file(cli, urls, Pipeline::new(cli.to_config(), fetcher), cancel).await
}

async fn merge_to_file<F: Fetcher>(
    cli: &Cli,
    urls: Vec<String>,
    pipeline: Pipeline<F>,
    cancel: &CancellationToken,
) -> Result<RunSummary> {
    let report = pipeline.run(&urls, cancel).await?;
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    output::write_output(&cli.output, &report.aggregate)?;
    Ok(report.summary())
}

/// Map a run result to the process exit status and log the outcome.
pub fn report_exit(result: &Result<RunSummary>) -> u8 {
    match result {
        Ok(summary) => {
            info!("Processing complete! Found {} unique configurations.", summary.unique);
            0
        }
        Err(e) => {
            error!("{}", e);
            exit_code(e)
        }
    }
}

pub fn exit_code(err: &Error) -> u8 {
    match err {
        Error::EmptyAggregate { .. } | Error::EmptyOutput { .. } => EXIT_EMPTY,
        Error::Cancelled => EXIT_CANCELLED,
        Error::SourceListUnreadable { .. } | Error::Output { .. } | Error::Client(_) => EXIT_FATAL,
    }
}
