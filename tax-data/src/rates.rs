use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::fx::{ExchangeRates, FxError, RatesError, RatesProvider};
use tax_core::Currency;
use tracing::debug;

/// Public endpoint serving `{base_url}/{BASE}`.
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest";

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: String,
    #[serde(default)]
    time_last_updated: Option<i64>,
    rates: BTreeMap<String, Decimal>,
}

/// Decode a `latest` response body.
///
/// Codes outside the supported set are skipped, as are non-positive rates.
/// The response base must itself be a supported currency.
pub fn parse_rates_response(body: &str) -> Result<ExchangeRates, RatesError> {
    let response: LatestRatesResponse =
        serde_json::from_str(body).map_err(|e| RatesError::Decode(e.to_string()))?;

    let base: Currency = response.base.parse().map_err(FxError::from)?;
    let mut rates = ExchangeRates::new(base);
    rates.fetched_at = response
        .time_last_updated
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    for (code, rate) in response.rates {
        let Ok(currency) = code.parse::<Currency>() else {
            continue;
        };
        if currency == base {
            continue;
        }
        if let Err(err) = rates.insert(currency, rate) {
            debug!(%code, %err, "skipping rate");
        }
    }

    debug!(%base, count = rates.rates.len(), "decoded exchange rates");
    Ok(rates)
}

// ─── Provider ────────────────────────────────────────────────────────────────

/// Fetches rates over HTTP, one GET per call, no retry.
#[derive(Clone)]
pub struct HttpRatesProvider {
    client: Client,
    base_url: String,
}

impl HttpRatesProvider {
    /// # Errors
    /// [`RatesError::Transport`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, RatesError> {
        Self::with_base_url(DEFAULT_RATES_URL)
    }

    /// Client with a 15 second request timeout against `base_url`.
    ///
    /// # Errors
    /// [`RatesError::Transport`] if the HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RatesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| RatesError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(
        &self,
        base: Currency,
    ) -> String {
        format!("{}/{}", self.base_url, base.code())
    }
}

#[async_trait]
impl RatesProvider for HttpRatesProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn latest(
        &self,
        base: Currency,
    ) -> Result<ExchangeRates, RatesError> {
        let url = self.url_for(base);
        debug!(%url, "fetching exchange rates");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RatesError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RatesError::Transport(e.to_string()))?;

        parse_rates_response(&body)
    }
}
