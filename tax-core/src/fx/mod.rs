//! Currency conversion.
//!
//! [`ExchangeRates`] is a plain snapshot; fetching one is behind the
//! [`RatesProvider`] trait so the network client lives outside this crate.

mod provider;
mod rates;

pub use provider::{RatesError, RatesProvider, StaticRatesProvider};
pub use rates::{ExchangeRates, FxError};
