// ittia-check - command-line entry point

use std::process::ExitCode;

use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ittia_check::cli::{render_content, Cli};
use ittia_check::{CheckOptions, FactChecker, IttiaChecker};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.to_config()?;
    tracing::debug!(base_url = %config.base_url, format = %config.format, "config loaded");
    let checker = IttiaChecker::new(config)?;

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling check");
            interrupt.cancel();
        }
    });

    let mut options = CheckOptions {
        cancellation_token: Some(token),
        ..Default::default()
    };

    // The sender lives in `options`; the printer exits once the check returns.
    let printer = if cli.verbose {
        let (tx, mut rx) = mpsc::channel(32);
        options.progress = Some(tx);
        Some(tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::info!(stage = event.stage_name(), "stage");
            }
        }))
    } else {
        None
    };

    let result = checker.check_with(&cli.query_text(), options).await;
    if let Some(handle) = printer {
        let _ = handle.await;
    }

    if let Some(content) = result? {
        println!("{}", render_content(&content));
    }
    Ok(())
}
