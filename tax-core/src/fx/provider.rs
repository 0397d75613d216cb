use async_trait::async_trait;
use thiserror::Error;

use super::{ExchangeRates, FxError};
use crate::Currency;

#[derive(Debug, Error)]
pub enum RatesError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("rates service returned status {0}")]
    Status(u16),

    #[error("could not decode rates response: {0}")]
    Decode(String),

    #[error(transparent)]
    Fx(#[from] FxError),
}

/// A source of exchange rates.
///
/// One call is one fetch: implementations do not cache or retry. Callers
/// that need fresher rates simply ask again.
#[async_trait]
pub trait RatesProvider: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Fetch rates quoted against `base`.
    async fn latest(
        &self,
        base: Currency,
    ) -> Result<ExchangeRates, RatesError>;
}

/// Serves a fixed snapshot, rebased on request.
///
/// Used offline and in tests.
#[derive(Debug, Clone)]
pub struct StaticRatesProvider {
    rates: ExchangeRates,
}

impl StaticRatesProvider {
    pub fn new(rates: ExchangeRates) -> Self {
        Self { rates }
    }
}

#[async_trait]
impl RatesProvider for StaticRatesProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn latest(
        &self,
        base: Currency,
    ) -> Result<ExchangeRates, RatesError> {
        Ok(self.rates.rebase(base)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn snapshot() -> ExchangeRates {
        ExchangeRates::new(Currency::Usd)
            .with_rate(Currency::Ngn, dec!(1500))
            .unwrap()
            .with_rate(Currency::Eur, dec!(0.75))
            .unwrap()
    }

    #[tokio::test]
    async fn static_provider_returns_snapshot_for_its_base() {
        let provider = StaticRatesProvider::new(snapshot());

        let rates = provider.latest(Currency::Usd).await.unwrap();

        assert_eq!(rates, snapshot());
    }

    #[tokio::test]
    async fn static_provider_rebases() {
        let provider = StaticRatesProvider::new(snapshot());

        let rates = provider.latest(Currency::Eur).await.unwrap();

        assert_eq!(rates.base, Currency::Eur);
        assert_eq!(rates.rate(Currency::Ngn).unwrap(), dec!(2000));
    }

    #[tokio::test]
    async fn static_provider_missing_base_is_fx_error() {
        let provider = StaticRatesProvider::new(snapshot());

        let err = provider.latest(Currency::Gbp).await.unwrap_err();

        assert!(matches!(
            err,
            RatesError::Fx(FxError::MissingRate {
                currency: Currency::Gbp,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn provider_works_behind_trait_object() {
        let provider: Arc<dyn RatesProvider> = Arc::new(StaticRatesProvider::new(snapshot()));

        assert_eq!(provider.name(), "static");
        let rates = provider.latest(Currency::Usd).await.unwrap();
        assert_eq!(
            rates.convert(dec!(2), Currency::Usd, Currency::Ngn).unwrap(),
            dec!(3000)
        );
    }
}
