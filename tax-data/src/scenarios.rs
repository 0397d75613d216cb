//! CSV loader for batches of tax scenarios.
//!
//! ## CSV Format
//!
//! One scenario per row. Column order does **not** matter (headers are
//! matched by name, ignoring case and underscores). Every column is optional.
//!
//! | Column                   | Type    | Notes                                   |
//! |--------------------------|---------|-----------------------------------------|
//! | `name`                   | string  | Label for reports; defaults to `row N`  |
//! | `residency`              | string  | `resident` or `non-resident`            |
//! | `annual_gross_salary`    | decimal | Empty cell is 0; `1,234.56` accepted    |
//! | `dividends`              | decimal |                                         |
//! | `interest`               | decimal |                                         |
//! | `royalties`              | decimal |                                         |
//! | `digital_asset_gains`    | decimal |                                         |
//! | `digital_asset_losses`   | decimal |                                         |
//! | `other_asset_gains`      | decimal |                                         |
//! | `housing_provided`       | boolean | `true/false`, `yes/no`, `1/0`           |
//! | `housing_rental_value`   | decimal |                                         |
//! | `car_provided`           | boolean |                                         |
//! | `car_acquisition_cost`   | decimal |                                         |
//! | `annual_pension`         | decimal |                                         |
//! | `annual_nhf`             | decimal |                                         |
//! | `annual_nhis`            | decimal |                                         |
//! | `annual_rent_paid`       | decimal |                                         |
//! | `life_assurance_premiums`| decimal |                                         |
//! | `mortgage_interest`      | decimal |                                         |
//!
//! ### Example
//!
//! ```csv
//! name,annual_gross_salary,annual_rent_paid,housing_provided,housing_rental_value
//! Ada,"6,000,000",1200000,no,
//! Bayo,15000000,,yes,2500000
//! ```
//!
//! A row with a bad value does not stop the batch: every problem in the row
//! is collected into a [`ValidationError`] carried by that row's
//! [`Scenario`], and the remaining rows load normally.

use std::fs;
use std::path::Path;

use tax_core::validation::Validator;
use tax_core::{AmountField, FlagField, TaxInputs, ValidationError};
use tracing::debug;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One row of a scenario file.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// 1-based data row number (header = row 0).
    pub row: usize,
    pub name: String,
    pub inputs: Result<TaxInputs, ValidationError>,
}

/// Errors that stop the whole file from loading.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioLoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV itself is malformed (ragged rows, bad quoting, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("unrecognised column '{0}'")]
    UnknownColumn(String),
}

// ---------------------------------------------------------------------------
// Header mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    Name,
    Residency,
    Amount(AmountField),
    Flag(FlagField),
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn map_header(header: &str) -> Result<Column, ScenarioLoadError> {
    let wanted = normalize_header(header);
    match wanted.as_str() {
        "name" => return Ok(Column::Name),
        "residency" => return Ok(Column::Residency),
        _ => {}
    }
    if let Some(field) = AmountField::ALL
        .into_iter()
        .find(|f| normalize_header(f.column()) == wanted)
    {
        return Ok(Column::Amount(field));
    }
    FlagField::ALL
        .into_iter()
        .find(|f| normalize_header(f.column()) == wanted)
        .map(Column::Flag)
        .ok_or_else(|| ScenarioLoadError::UnknownColumn(header.trim().to_string()))
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    columns: &[Column],
    record: &csv::StringRecord,
    row_number: usize,
) -> Scenario {
    let mut validator = Validator::new();
    let mut inputs = TaxInputs::default();
    let mut name = None;

    for (column, cell) in columns.iter().zip(record.iter()) {
        inputs = match *column {
            Column::Name => {
                name = Some(cell.trim().to_string()).filter(|n| !n.is_empty());
                inputs
            }
            Column::Residency => inputs.with_residency(validator.residency(cell)),
            Column::Amount(field) => inputs.with_amount(field, validator.amount(field, cell)),
            Column::Flag(field) => inputs.with_flag(field, validator.flag(field, cell)),
        };
    }

    Scenario {
        row: row_number,
        name: name.unwrap_or_else(|| format!("row {row_number}")),
        inputs: validator.finish().map(|()| inputs),
    }
}

/// Parse CSV text and return one [`Scenario`] per data row, in file order.
///
/// # Errors
///
/// * [`ScenarioLoadError::UnknownColumn`] – a header names no known field.
/// * [`ScenarioLoadError::Parse`] – the CSV is structurally invalid.
pub fn load_from_str(input: &str) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let columns = reader
        .headers()?
        .iter()
        .map(map_header)
        .collect::<Result<Vec<_>, _>>()?;

    let scenarios = reader
        .records()
        .enumerate()
        .map(|(idx, result)| {
            let record = result?;
            Ok(convert_row(&columns, &record, idx + 1))
        })
        .collect::<Result<Vec<_>, ScenarioLoadError>>()?;

    debug!(rows = scenarios.len(), "loaded scenarios");
    Ok(scenarios)
}

/// Read a CSV file from disk and parse it.
pub fn load_from_file(path: &Path) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let content = fs::read_to_string(path).map_err(|source| ScenarioLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
