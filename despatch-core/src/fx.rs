use serde::Deserialize;
use std::collections::HashMap;

/// Static currency → PKR conversion table.
///
/// Injected into the commission calculator and the agent wallet reads so
/// tests can substitute deterministic rates. Unrecognized currencies fall
/// back to the default currency's rate.
#[derive(Debug, Clone, Deserialize)]
pub struct FxTable {
    #[serde(default = "default_rates")]
    pub pkr_rates: HashMap<String, f64>,
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_currency() -> String {
    "AED".to_string()
}

fn default_rates() -> HashMap<String, f64> {
    let mut rates = HashMap::new();
    rates.insert("AED".to_string(), 76.0);
    rates.insert("SAR".to_string(), 74.0);
    rates.insert("USD".to_string(), 278.0);
    rates.insert("GBP".to_string(), 354.0);
    rates.insert("EUR".to_string(), 300.0);
    rates.insert("OMR".to_string(), 722.0);
    rates.insert("QAR".to_string(), 76.0);
    rates
}

impl Default for FxTable {
    fn default() -> Self {
        Self {
            pkr_rates: default_rates(),
            default_currency: default_currency(),
        }
    }
}

impl FxTable {
    /// Rate used to convert one unit of `currency` into PKR.
    pub fn to_pkr(&self, currency: &str) -> f64 {
        if let Some(rate) = self.pkr_rates.get(currency) {
            return *rate;
        }
        self.pkr_rates
            .get(&self.default_currency)
            .copied()
            .unwrap_or(1.0)
    }

    pub fn supports(&self, currency: &str) -> bool {
        self.pkr_rates.contains_key(currency)
    }
}
