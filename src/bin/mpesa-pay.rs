//! Terminal front-end for the payment form

use anyhow::{Context, Result};
use clap::Parser;
use mpesa_form::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initiate an M-Pesa payment from the command line
#[derive(Debug, Parser)]
#[command(name = "mpesa-pay", version, about)]
struct Cli {
    /// Phone number to charge, in 2547XXXXXXXX format
    #[arg(long)]
    phone: String,

    /// Amount to charge
    #[arg(long)]
    amount: String,

    /// Backend base URL (defaults to BACKEND_URL / VITE_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Request timeout in seconds (defaults to BACKEND_TIMEOUT_SECS or 30)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Environment file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = load_env_file(cli.env_file.as_deref()) {
        eprintln!("error: {error:#}");
        return ExitCode::from(2);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}

/// Load environment variables from a file
///
/// Without an explicit path a missing `./.env` is not an error; a file that exists but
/// does not parse always is.
fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => dotenvy::from_path(path)
            .with_context(|| format!("failed to load env file '{}'", path.display())),
        None => match dotenvy::dotenv() {
            Err(err) if !err.not_found() => Err(err).context("failed to load .env"),
            _ => Ok(()),
        },
    }
}

fn load_config(cli: &Cli) -> Result<BackendConfig> {
    let config = match &cli.backend_url {
        Some(url) => BackendConfig::new(url)?,
        None => BackendConfig::from_env().context("backend URL not configured")?,
    };
    Ok(match cli.timeout_secs {
        Some(secs) if secs > 0 => config.with_timeout_secs(secs),
        Some(_) => anyhow::bail!("--timeout-secs must be at least 1"),
        None => config,
    })
}

async fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;
    let gateway = HttpPaymentGateway::new(&config)?;
    tracing::debug!(endpoint = %gateway.endpoint(), "Using payment endpoint");

    let form = PaymentForm::new(Arc::new(gateway));
    form.set_phone(cli.phone);
    form.set_amount(cli.amount);

    let outcome = form.submit().await;
    let view = form.view();

    if !outcome.reached_gateway() {
        for error in [view.phone_error, view.amount_error].into_iter().flatten() {
            println!("{error}");
        }
        return Ok(false);
    }

    if let Some((message, _)) = &view.status {
        println!("{message}");
    }

    Ok(outcome == SubmitOutcome::Succeeded)
}
