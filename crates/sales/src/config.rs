//! Sales module configuration.

use acme_core::Currency;

/// Environment variable holding the ISO code of the default order currency.
pub const DEFAULT_CURRENCY_ENV: &str = "ACME_SALES_DEFAULT_CURRENCY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesConfig {
    /// Currency used by [`crate::SalesOrder::open`].
    pub default_currency: Currency,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::USD,
        }
    }
}

impl SalesConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(DEFAULT_CURRENCY_ENV) {
            match raw.parse::<Currency>() {
                Ok(currency) => config.default_currency = currency,
                Err(err) => tracing::warn!(
                    key = DEFAULT_CURRENCY_ENV,
                    value = %raw,
                    error = %err,
                    "invalid default currency; using {}",
                    config.default_currency
                ),
            }
        }

        config
    }
}
