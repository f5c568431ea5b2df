use crate::models::Order;
use despatch_core::{FxTable, SettlementRules};

/// Converts an order's monetary value into a normalized PKR commission
/// figure at the moment of delivery.
///
/// Compute-once, freeze-forever: the snapshot is written to the order via a
/// conditional write and never recomputed, even if line items change later.
/// That preserves historical payout correctness against catalog edits.
#[derive(Clone)]
pub struct CommissionCalculator {
    rate: f64,
    fx: FxTable,
}

impl CommissionCalculator {
    pub fn new(rules: &SettlementRules, fx: FxTable) -> Self {
        Self {
            rate: rules.commission_rate,
            fx,
        }
    }

    /// Commission in whole PKR for an order: `total × rate × fx(currency)`.
    pub fn commission_pkr(&self, order: &Order) -> f64 {
        self.commission_for(order.effective_total(), &order.currency)
    }

    /// Same formula from raw inputs. The agent wallet read path uses this
    /// as the canonical fallback for legacy orders missing the snapshot.
    pub fn commission_for(&self, total: f64, currency: &str) -> f64 {
        (total * self.rate * self.fx.to_pkr(currency)).round()
    }
}
