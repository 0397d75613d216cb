//! Share links for a result summary.
//!
//! Messages come from [`tax_core::share::share_message`]. Both links encode
//! spaces as `%20` rather than `+`, since mail clients show a literal `+`.

use reqwest::Url;
use thiserror::Error;

const WHATSAPP_BASE: &str = "https://wa.me/";

#[derive(Debug, Error)]
#[error("could not build share link: {0}")]
pub struct ShareError(String);

/// `https://wa.me/?text=...`
pub fn whatsapp_url(message: &str) -> Result<Url, ShareError> {
    let mut url = Url::parse(WHATSAPP_BASE).map_err(|e| ShareError(e.to_string()))?;
    url.query_pairs_mut().append_pair("text", message);
    Ok(with_percent_spaces(url))
}

/// `mailto:?subject=...&body=...`
pub fn mailto_url(
    subject: &str,
    body: &str,
) -> Result<Url, ShareError> {
    let mut url = Url::parse("mailto:").map_err(|e| ShareError(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("subject", subject)
        .append_pair("body", body);
    Ok(with_percent_spaces(url))
}

/// Form encoding writes spaces as `+` and a literal `+` as `%2B`, so the
/// swap is unambiguous.
fn with_percent_spaces(mut url: Url) -> Url {
    if let Some(query) = url.query().map(|q| q.replace('+', "%20")) {
        url.set_query(Some(&query));
    }
    url
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_whatsapp_url_encodes_message() {
        let url = whatsapp_url("Tax Due: ₦870,000\nMonthly: ₦427,500").unwrap();

        assert_eq!(
            url.as_str(),
            "https://wa.me/?text=Tax%20Due%3A%20%E2%82%A6870%2C000%0AMonthly%3A%20%E2%82%A6427%2C500"
        );
    }

    #[test]
    fn test_whatsapp_url_keeps_literal_plus() {
        let url = whatsapp_url("1 + 1").unwrap();

        assert_eq!(url.as_str(), "https://wa.me/?text=1%20%2B%201");
    }

    #[test]
    fn test_mailto_url_has_subject_then_body() {
        let url = mailto_url("My 2025 Tax", "a&b=c").unwrap();

        assert_eq!(url.as_str(), "mailto:?subject=My%202025%20Tax&body=a%26b%3Dc");
    }

    #[test]
    fn test_links_round_trip_message() {
        let message = "💰 Gross: ₦6,000,000\n\nCalculate at: https://example.com/?a=1&b=2";

        let url = whatsapp_url(message).unwrap();
        let decoded: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(decoded, vec![("text".to_string(), message.to_string())]);
    }
}
