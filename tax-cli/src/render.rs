//! Plain-text reports for terminal output.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tax_core::format::{format_amount, format_currency, format_percent};
use tax_core::{BandRow, Currency, TaxRegime, TaxResult};

/// Itemized view of one result.
pub struct ResultReport<'a> {
    pub result: &'a TaxResult,
    pub regime: &'a TaxRegime,
    /// Currency the result's amounts are expressed in.
    pub currency: Currency,
}

impl<'a> ResultReport<'a> {
    pub fn new(
        result: &'a TaxResult,
        regime: &'a TaxRegime,
    ) -> Self {
        Self {
            result,
            regime,
            currency: regime.currency,
        }
    }

    #[must_use]
    pub fn in_currency(
        self,
        currency: Currency,
    ) -> Self {
        Self { currency, ..self }
    }

    fn money(
        &self,
        amount: Decimal,
    ) -> String {
        format_currency(amount, self.currency)
    }
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        writeln!(f, "Regime:                 {}", self.regime.name)?;
        writeln!(f, "Total gross income:     {}", self.money(r.total_gross_income))?;

        if r.is_exempt {
            writeln!(
                f,
                "Exempt: total gross income is at or below {}",
                format_currency(self.regime.minimum_wage_exemption, self.regime.currency)
            )?;
        } else {
            writeln!(f, "Benefits in kind:       {}", self.money(r.bik_adjustments))?;
            writeln!(
                f,
                "Deductions and reliefs: {}",
                self.money(r.total_exemptions_and_deductions)
            )?;
            writeln!(f, "  incl. rent relief:    {}", self.money(r.rent_relief))?;
            writeln!(f, "Chargeable gains:       {}", self.money(r.total_chargeable_gains))?;
            writeln!(f, "Net chargeable income:  {}", self.money(r.net_chargeable_income))?;

            if !r.breakdown.is_empty() {
                writeln!(f)?;
                if self.currency != self.regime.currency {
                    writeln!(
                        f,
                        "Band limits are in {} ({}); amounts are in {}.",
                        self.regime.currency.code(),
                        self.regime.currency.name(),
                        self.currency.code()
                    )?;
                }
                writeln!(f, "{:<28} {:>6} {:>16} {:>14}", "Band", "Rate", "Taxable", "Tax")?;
                for line in &r.breakdown {
                    writeln!(
                        f,
                        "{:<28} {:>6} {:>16} {:>14}",
                        line.bracket,
                        format_percent(line.rate),
                        self.money(line.taxable_amount),
                        self.money(line.tax_due)
                    )?;
                }
                writeln!(f)?;
            }
        }

        writeln!(f, "Total tax due:          {}", self.money(r.total_tax_due))?;
        writeln!(f, "Effective rate:         {}", format_percent(r.effective_rate()))?;
        writeln!(f, "Annual take-home:       {}", self.money(r.annual_take_home_pay))?;
        write!(f, "Monthly take-home:      {}", self.money(r.monthly_take_home_pay))
    }
}

/// The band schedule as income ranges.
pub struct BandTable<'a> {
    pub regime: &'a TaxRegime,
}

impl fmt::Display for BandTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let currency = self.regime.currency;
        writeln!(f, "{} ({})", self.regime.name, self.regime.tax_year)?;
        writeln!(f, "{:<28} {:>16} {:>16} {:>6}", "Band", "From", "To", "Rate")?;
        let rows = self.regime.band_table();
        for (i, row) in rows.iter().enumerate() {
            write_band_row(f, row, currency)?;
            if i + 1 < rows.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn write_band_row(
    f: &mut fmt::Formatter<'_>,
    row: &BandRow,
    currency: Currency,
) -> fmt::Result {
    let upper = row
        .upper
        .map(|u| format_currency(u, currency))
        .unwrap_or_else(|| "and above".to_string());
    write!(
        f,
        "{:<28} {:>16} {:>16} {:>6}",
        row.label,
        format_currency(row.lower, currency),
        upper,
        format_percent(row.rate_percent)
    )
}

/// One currency's value against the home currency.
pub struct RatesTable<'a> {
    pub home: Currency,
    pub quotes: &'a [(Currency, Decimal)],
    pub fetched_at: Option<DateTime<Utc>>,
}

impl fmt::Display for RatesTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.fetched_at {
            Some(at) => writeln!(f, "Rates as of {}", at.format("%Y-%m-%d %H:%M UTC"))?,
            None => writeln!(f, "Rates (no timestamp from source)")?,
        }
        for (i, (currency, quote)) in self.quotes.iter().enumerate() {
            write!(
                f,
                "1 {} ({}) = {}{}",
                currency.code(),
                currency.name(),
                self.home.symbol(),
                format_amount(*quote, 2)
            )?;
            if i + 1 < self.quotes.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
