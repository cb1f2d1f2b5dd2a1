mod cli;
mod commands;
mod console;
mod error;
mod output;

use std::fs::OpenOptions;
use std::future::Future;
use std::sync::Mutex;

use clap::Parser;
use claimdesk::{ClaimDeskConfig, ClaimDeskHttpClient, Resolution};
use cli::Command;
use error::CliError;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv(); // load .env before clap reads env fallbacks

    let cli = cli::Cli::parse();

    // The console owns the terminal, so its logs go to a file or nowhere.
    let writer = match &cli.command {
        Command::Console(args) => match &args.log_file {
            Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
                Err(e) => {
                    eprintln!("cannot open log file {}: {e}", path.display());
                    std::process::exit(1);
                }
            },
            None => BoxMakeWriter::new(std::io::sink),
        },
        _ => BoxMakeWriter::new(std::io::stderr),
    };

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(writer)
        .init();

    // Shared cancellation token + signal handlers.
    let cancel = setup_signal_handlers();

    let (config, client) = match connect(&cli) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    info!(api = %config.api_url, page_size = config.page_size, "claimdesk starting");

    let page_size = config.page_size;
    let result = match cli.command {
        Command::List(args) => {
            until_cancelled(&cancel, commands::run_list(client, page_size, args)).await
        }
        Command::Accept(args) => {
            let run = commands::run_resolve(client, page_size, Resolution::Accept, args);
            until_cancelled(&cancel, run).await
        }
        Command::Reject(args) => {
            let run = commands::run_resolve(client, page_size, Resolution::Reject, args);
            until_cancelled(&cancel, run).await
        }
        Command::User(args) => until_cancelled(&cancel, commands::run_user(client, args)).await,
        Command::Console(_) => console::run_console(client, page_size, cancel).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "claimdesk error");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Build the validated config and HTTP client from the command line.
fn connect(cli: &cli::Cli) -> Result<(ClaimDeskConfig, ClaimDeskHttpClient), CliError> {
    let api_url = cli.api_url.clone().ok_or_else(|| {
        CliError::Config("--api-url or CLAIMDESK_API_URL is required".to_string())
    })?;

    let config = ClaimDeskConfig {
        api_token: cli.api_token.clone(),
        page_size: cli.page_size,
        ..ClaimDeskConfig::new(api_url)
    };
    config.validate()?;
    let client = ClaimDeskHttpClient::from_config(&config)?;
    Ok((config, client))
}

/// Run a one-shot command, giving up if a shutdown signal arrives first.
async fn until_cancelled<F>(cancel: &CancellationToken, run: F) -> Result<(), CliError>
where
    F: Future<Output = Result<(), CliError>>,
{
    tokio::select! {
        r = run => r,
        _ = cancel.cancelled() => Err(CliError::Aborted),
    }
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            let mut sig = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");
            sig.recv().await;
            info!("received SIGTERM, shutting down");
            cancel_clone.cancel();
        });
    }

    cancel
}
