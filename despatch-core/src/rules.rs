use serde::Deserialize;

/// Business knobs for the settlement core. Loaded from config so tests and
/// deployments can tune rates without touching code.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementRules {
    /// Agent commission as a fraction of order total.
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
    /// Minimum agent withdrawal amount, in the settlement currency (PKR).
    #[serde(default = "default_min_agent_payout")]
    pub min_agent_payout: f64,
    /// Identical create-order submissions inside this window return the
    /// existing order instead of creating a duplicate.
    #[serde(default = "default_duplicate_window")]
    pub duplicate_window_seconds: i64,
    /// Daily profit draw band around the per-day average.
    #[serde(default = "default_variance_low")]
    pub daily_variance_low: f64,
    #[serde(default = "default_variance_high")]
    pub daily_variance_high: f64,
    /// Seconds between profit-distribution sweeps.
    #[serde(default = "default_scheduler_interval")]
    pub scheduler_interval_seconds: u64,
}

fn default_commission_rate() -> f64 {
    0.12
}

fn default_min_agent_payout() -> f64 {
    10_000.0
}

fn default_duplicate_window() -> i64 {
    30
}

fn default_variance_low() -> f64 {
    0.7
}

fn default_variance_high() -> f64 {
    1.3
}

fn default_scheduler_interval() -> u64 {
    86_400
}

impl Default for SettlementRules {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
            min_agent_payout: default_min_agent_payout(),
            duplicate_window_seconds: default_duplicate_window(),
            daily_variance_low: default_variance_low(),
            daily_variance_high: default_variance_high(),
            scheduler_interval_seconds: default_scheduler_interval(),
        }
    }
}
