pub mod bands;
pub mod inputs;
pub mod rates;
pub mod regime_file;
pub mod scenarios;
pub mod share;

pub use bands::{BandLoader, BandLoaderError, BandRecord};
pub use inputs::{InputFormat, InputLoadError, load_inputs_file, load_inputs_from_str};
pub use rates::{DEFAULT_RATES_URL, HttpRatesProvider, parse_rates_response};
pub use regime_file::{RegimeFileError, load_regime_file, load_regime_from_str, read_regime_file};
pub use scenarios::{Scenario, ScenarioLoadError};
pub use share::{ShareError, mailto_url, whatsapp_url};
