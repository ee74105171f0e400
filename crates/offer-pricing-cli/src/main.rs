mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::discount::DiscountRateArgs;
use commands::line_item::LineItemArgs;
use commands::offer::PriceOfferArgs;
use commands::tax::TaxArgs;

/// Price service offers for a research service provider
#[derive(Parser)]
#[command(
    name = "offer-pricing",
    version,
    about = "Price service offers for a research service provider",
    long_about = "A CLI for pricing research service offers with decimal precision. \
                  Applies affiliation-specific unit prices, quantity and storage \
                  discounts, per-group overheads and German VAT rules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter (e.g. "debug", "offer_pricing_core=debug")
    #[arg(long, global = true, env = "OFFER_PRICING_LOG")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pricing pipeline on an offer
    PriceOffer(PriceOfferArgs),
    /// Price a single product snapshot for an affiliation and quantity
    LineItem(LineItemArgs),
    /// Look up the quantity discount rate
    DiscountRate(DiscountRateArgs),
    /// VAT for a net amount under the applicable tax policy
    Tax(TaxArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(filter: Option<&str>) {
    let filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    debug!(output = ?cli.output, "offer-pricing started");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::PriceOffer(args) => commands::offer::run_price_offer(args),
        Commands::LineItem(args) => commands::line_item::run_line_item(args),
        Commands::DiscountRate(args) => commands::discount::run_discount_rate(args),
        Commands::Tax(args) => commands::tax::run_tax(args),
        Commands::Version => {
            println!("offer-pricing {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
