use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::Currency;
use tax_data::DEFAULT_RATES_URL;

use crate::overrides::Override;

/// Personal income tax estimator (Nigeria Tax Act 2025 bands).
///
/// Computes an itemized estimate from an inputs file, batches of scenarios
/// from CSV, and converts amounts between supported currencies.
#[derive(Debug, Parser)]
#[command(name = "tax-estimate", version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the exchange-rates service; the base currency code is
    /// appended as the last path segment.
    #[arg(long, global = true, default_value = DEFAULT_RATES_URL)]
    pub rates_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute tax for one set of inputs.
    Compute(ComputeArgs),
    /// Compute tax for every row of a scenario CSV.
    Batch(BatchArgs),
    /// Print the band schedule.
    Bands(RegimeArgs),
    /// List the regimes available for `--regime-id`.
    Regimes(RegimeArgs),
    /// Fetch exchange rates and print each currency against a home currency.
    Rates(RatesArgs),
    /// Convert an amount between two currencies.
    Convert(ConvertArgs),
    /// Print a shareable summary with WhatsApp and email links.
    Share(ShareArgs),
}

/// Where the regime comes from. Without flags the built-in 2025 regime is used.
///
/// A regime file is registered alongside the built-in regimes and becomes the
/// default; `--regime-id` picks any registered regime instead.
#[derive(Debug, Clone, Default, Args)]
pub struct RegimeArgs {
    /// TOML file describing the regime.
    #[arg(long, value_name = "FILE")]
    pub regime: Option<PathBuf>,

    /// CSV band table (`label,width,rate`) replacing the bands of the
    /// regime file, or of the built-in default when no file is given.
    #[arg(long, value_name = "CSV")]
    pub bands: Option<PathBuf>,

    /// Id of the registered regime to use, e.g. `ng-2025`.
    #[arg(long, value_name = "ID")]
    pub regime_id: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// TOML or JSON inputs file. Without it every amount starts at zero.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Override one field, e.g. `--set reliefs.annual_rent_paid=1,200,000`.
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub overrides: Vec<Override>,
}

#[derive(Debug, Args)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub regime: RegimeArgs,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Skip input validation; negative amounts go straight to the engine.
    #[arg(long)]
    pub unchecked: bool,

    /// Also show the result converted into this currency.
    #[arg(long, value_name = "CODE")]
    pub currency: Option<Currency>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Scenario CSV, one row per scenario.
    #[arg(short, long, value_name = "CSV")]
    pub file: PathBuf,

    #[command(flatten)]
    pub regime: RegimeArgs,

    /// Print results as JSON lines.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct RatesArgs {
    /// Currency the others are quoted in.
    #[arg(long, default_value = "NGN", value_name = "CODE")]
    pub home: Currency,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Amount to convert; thousands separators are accepted.
    #[arg(value_parser = parse_amount_arg)]
    pub amount: Decimal,

    pub from: Currency,

    pub to: Currency,
}

#[derive(Debug, Args)]
pub struct ShareArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub regime: RegimeArgs,

    /// Link appended to the message as a call to action.
    #[arg(long, value_name = "URL")]
    pub link: Option<String>,
}

/// Parses an amount argument, stripping comma thousands separators.
pub fn parse_amount_arg(s: &str) -> Result<Decimal, String> {
    let normalized = s.trim().replace(',', "");
    normalized
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount '{s}': {e}"))
}
