//! # Cartax CLI
//!
//! Applies a tax provider's rate list to a cart document and prints the
//! priced cart.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          cartax (binary)                                │
//! │                                                                         │
//! │  Config::load ──► init_tracing ──► pricing::run ──► stdout (JSON)      │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                   cartax-core                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so stdout stays a clean JSON document.

mod config;
mod error;
mod pricing;

use std::path::PathBuf;
use std::process::ExitCode;

use cartax_core::TaxApplicationEngine;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingSettings};
use crate::error::CliResult;
use crate::pricing::PricingInput;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cart JSON document
    #[arg(long)]
    cart: PathBuf,

    /// Tax rates JSON document (array of { lineId, rate })
    #[arg(long)]
    rates: PathBuf,

    /// Shipping quotes JSON document to price alongside the cart
    #[arg(long)]
    shipping_rates: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn init_tracing(settings: &LoggingSettings) {
    let filter = EnvFilter::try_new(&settings.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if settings.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config.logging);
    info!(
        source = ?config.source,
        quote_match = %config.policy.shipping_quote_match,
        reject_delimited_ids = config.policy.reject_delimited_ids,
        "Configuration loaded"
    );

    let engine = TaxApplicationEngine::new(config.policy);
    let output = pricing::run(
        &engine,
        &PricingInput {
            cart: &cli.cart,
            rates: &cli.rates,
            shipping_rates: cli.shipping_rates.as_deref(),
        },
    )?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Config errors happen before the subscriber exists, so report
            // directly on stderr.
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
