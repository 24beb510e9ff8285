use std::process::ExitCode;

use clap::Parser;
use log::warn;
use tokio_util::sync::CancellationToken;

use sub_merge::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_logging(cli.log_level());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping before the next fetch");
            on_signal.cancel();
        }
    });

    let result = cli::execute(&cli, &cancel).await;
    ExitCode::from(cli::report_exit(&result))
}
