use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tax_core::fx::RatesProvider;
use tax_core::share::{email_subject, share_message};
use tax_core::{PersonalIncomeTax, RegimeRegistry, TaxInputs, TaxRegime, TaxResult};
use tax_data::{BandLoader, HttpRatesProvider, scenarios};
use tracing::{debug, info, warn};

use crate::cli::{
    BatchArgs, Cli, Command, ComputeArgs, ConvertArgs, InputArgs, RatesArgs, RegimeArgs,
    ShareArgs,
};
use crate::overrides::apply_overrides;
use crate::render::{BandTable, RatesTable, ResultReport};

/// The built-in regimes plus whatever `args` loads from disk.
///
/// A regime file (with its bands replaced when `--bands` is given) is
/// registered and made the default. A band table alone re-registers the
/// built-in default with those bands.
pub fn build_registry(args: &RegimeArgs) -> Result<RegimeRegistry> {
    let mut registry = RegimeRegistry::with_builtin();

    let loaded = match (&args.regime, &args.bands) {
        (Some(path), Some(bands)) => {
            let partial = tax_data::read_regime_file(path)
                .with_context(|| format!("Failed to read regime: {}", path.display()))?;
            Some(with_band_table(&partial, bands)?)
        }
        (Some(path), None) => Some(
            tax_data::load_regime_file(path)
                .with_context(|| format!("Failed to load regime: {}", path.display()))?,
        ),
        (None, Some(bands)) => Some(with_band_table(registry.default_regime()?, bands)?),
        (None, None) => None,
    };

    if let Some(regime) = loaded {
        let id = regime.id.clone();
        registry
            .register(regime)
            .with_context(|| format!("Invalid regime '{id}'"))?;
        registry.set_default(&id)?;
    }
    Ok(registry)
}

fn with_band_table(
    base: &TaxRegime,
    bands: &Path,
) -> Result<TaxRegime> {
    let records = BandLoader::parse_file(bands)
        .with_context(|| format!("Failed to parse band table: {}", bands.display()))?;
    BandLoader::apply(base, records).with_context(|| format!("Invalid band table: {}", bands.display()))
}

/// Resolve the active regime: the one named by `--regime-id`, otherwise the
/// registry default.
pub fn load_regime(args: &RegimeArgs) -> Result<TaxRegime> {
    let registry = build_registry(args)?;
    let regime = match &args.regime_id {
        Some(id) => registry.get(id)?,
        None => registry.default_regime()?,
    };
    debug!(id = %regime.id, "selected tax regime");
    Ok(regime.clone())
}

/// Load the inputs file (if any) and apply `--set` overrides on top.
pub fn load_inputs(args: &InputArgs) -> Result<TaxInputs> {
    let loaded = match &args.input {
        Some(path) => tax_data::load_inputs_file(path)
            .with_context(|| format!("Failed to load inputs: {}", path.display()))?,
        None => TaxInputs::default(),
    };
    apply_overrides(loaded, &args.overrides).context("Invalid --set override")
}

fn compute(
    regime: &TaxRegime,
    inputs: &TaxInputs,
    unchecked: bool,
) -> Result<TaxResult> {
    let calculator = PersonalIncomeTax::new(regime);
    if unchecked {
        debug!("input validation skipped");
        return Ok(calculator.compute(inputs));
    }
    calculator
        .compute_checked(inputs)
        .context("Inputs failed validation (use --unchecked to compute anyway)")
}

/// Run a parsed command line against the HTTP rates service.
pub async fn run<W: Write>(
    cli: Cli,
    out: &mut W,
) -> Result<()> {
    let provider = HttpRatesProvider::with_base_url(&cli.rates_url)
        .context("Failed to set up the rates client")?;
    execute(cli.command, &provider, out).await
}

/// Run one command, fetching rates (when needed) from `rates`.
pub async fn execute<W: Write>(
    command: Command,
    rates: &dyn RatesProvider,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Compute(args) => run_compute(args, rates, out).await,
        Command::Batch(args) => run_batch(args, out),
        Command::Bands(args) => {
            let regime = load_regime(&args)?;
            writeln!(out, "{}", BandTable { regime: &regime })?;
            Ok(())
        }
        Command::Regimes(args) => run_regimes(args, out),
        Command::Rates(args) => run_rates(args, rates, out).await,
        Command::Convert(args) => run_convert(args, rates, out).await,
        Command::Share(args) => run_share(args, out),
    }
}

async fn run_compute<W: Write>(
    args: ComputeArgs,
    rates: &dyn RatesProvider,
    out: &mut W,
) -> Result<()> {
    let regime = load_regime(&args.regime)?;
    let inputs = load_inputs(&args.inputs)?;
    let result = compute(&regime, &inputs, args.unchecked)?;
    info!(regime = %regime.id, tax = %result.total_tax_due, "computed estimate");

    let converted = match args.currency {
        Some(currency) if currency != regime.currency => {
            let snapshot = rates
                .latest(regime.currency)
                .await
                .with_context(|| format!("Failed to fetch rates from {}", rates.name()))?;
            let converted = snapshot
                .convert_result(&result, regime.currency, currency)
                .with_context(|| format!("Failed to convert result into {currency}"))?;
            Some((currency, converted))
        }
        _ => None,
    };

    if args.json {
        let mut document = serde_json::json!({ "result": result });
        if let Some((currency, converted)) = &converted {
            document["converted"] = serde_json::json!({
                "currency": currency,
                "result": converted,
            });
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
        return Ok(());
    }

    writeln!(out, "{}", ResultReport::new(&result, &regime))?;
    if let Some((currency, converted)) = &converted {
        writeln!(out)?;
        writeln!(out, "In {} ({}):", currency.code(), currency.name())?;
        writeln!(out, "{}", ResultReport::new(converted, &regime).in_currency(*currency))?;
    }
    Ok(())
}

fn run_batch<W: Write>(
    args: BatchArgs,
    out: &mut W,
) -> Result<()> {
    let regime = load_regime(&args.regime)?;
    let calculator = PersonalIncomeTax::new(&regime);
    let batch = scenarios::load_from_file(&args.file)
        .with_context(|| format!("Failed to load scenarios: {}", args.file.display()))?;

    if !args.json {
        writeln!(
            out,
            "{:>4}  {:<20} {:>16} {:>14} {:>16} {:>8}",
            "Row", "Name", "Gross", "Tax", "Monthly net", "Rate"
        )?;
    }

    let mut skipped = 0usize;
    for scenario in &batch {
        let inputs = match &scenario.inputs {
            Ok(inputs) => inputs,
            Err(err) => {
                skipped += 1;
                warn!(row = scenario.row, name = %scenario.name, "skipping scenario: {err}");
                if !args.json {
                    writeln!(out, "{:>4}  {:<20} skipped: {err}", scenario.row, scenario.name)?;
                }
                continue;
            }
        };
        let result = calculator.compute(inputs);

        if args.json {
            let line = serde_json::json!({
                "row": scenario.row,
                "name": scenario.name,
                "result": result,
            });
            writeln!(out, "{line}")?;
        } else {
            writeln!(
                out,
                "{:>4}  {:<20} {:>16} {:>14} {:>16} {:>8}",
                scenario.row,
                scenario.name,
                tax_core::format::format_currency(result.total_gross_income, regime.currency),
                tax_core::format::format_currency(result.total_tax_due, regime.currency),
                tax_core::format::format_currency(result.monthly_take_home_pay, regime.currency),
                tax_core::format::format_percent(result.effective_rate()),
            )?;
        }
    }

    info!(rows = batch.len(), skipped, "batch complete");
    Ok(())
}

fn run_regimes<W: Write>(
    args: RegimeArgs,
    out: &mut W,
) -> Result<()> {
    let registry = build_registry(&args)?;
    let default_id = registry.default_regime()?.id.clone();
    for id in registry.available() {
        let regime = registry.get(id)?;
        let marker = if id == default_id { "*" } else { " " };
        writeln!(out, "{marker} {:<16} {} ({})", id, regime.name, regime.tax_year)?;
    }
    Ok(())
}

async fn run_rates<W: Write>(
    args: RatesArgs,
    rates: &dyn RatesProvider,
    out: &mut W,
) -> Result<()> {
    let snapshot = rates
        .latest(args.home)
        .await
        .with_context(|| format!("Failed to fetch rates from {}", rates.name()))?;
    let quotes = snapshot.quotes_against(args.home);
    writeln!(
        out,
        "{}",
        RatesTable {
            home: args.home,
            quotes: &quotes,
            fetched_at: snapshot.fetched_at,
        }
    )?;
    Ok(())
}

async fn run_convert<W: Write>(
    args: ConvertArgs,
    rates: &dyn RatesProvider,
    out: &mut W,
) -> Result<()> {
    let snapshot = rates
        .latest(args.from)
        .await
        .with_context(|| format!("Failed to fetch rates from {}", rates.name()))?;
    let converted = snapshot
        .convert(args.amount, args.from, args.to)
        .with_context(|| format!("Failed to convert {} to {}", args.from, args.to))?;
    writeln!(
        out,
        "{} {} = {}{} {}",
        tax_core::format::format_amount(args.amount, 2),
        args.from.code(),
        args.to.symbol(),
        tax_core::format::format_amount(converted, 2),
        args.to.code(),
    )?;
    Ok(())
}

fn run_share<W: Write>(
    args: ShareArgs,
    out: &mut W,
) -> Result<()> {
    let regime = load_regime(&args.regime)?;
    let inputs = load_inputs(&args.inputs)?;
    let result = compute(&regime, &inputs, false)?;

    let message = share_message(&result, &regime, args.link.as_deref());
    let whatsapp = tax_data::whatsapp_url(&message)?;
    let mailto = tax_data::mailto_url(&email_subject(&regime), &message)?;

    writeln!(out, "{message}")?;
    writeln!(out)?;
    writeln!(out, "WhatsApp: {whatsapp}")?;
    writeln!(out, "Email:    {mailto}")?;
    Ok(())
}
