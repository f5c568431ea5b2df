use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvestorRequestStatus {
    Pending,
    Accepted,
    Closed,
}

/// A committed investment: the scheduler smooths `monthly_target` into
/// variable daily payouts from `start_date` onward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorRequest {
    pub id: Uuid,
    pub investor_id: Uuid,
    pub monthly_target: f64,
    pub currency: String,
    pub status: InvestorRequestStatus,
    pub start_date: NaiveDate,
    pub last_distribution_date: Option<NaiveDate>,
    /// Running total of everything ever distributed for this request.
    pub earned_profit: f64,
    pub created_at: DateTime<Utc>,
}

impl InvestorRequest {
    pub fn new(investor_id: Uuid, monthly_target: f64, currency: String, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            investor_id,
            monthly_target,
            currency,
            status: InvestorRequestStatus::Pending,
            start_date,
            last_distribution_date: None,
            earned_profit: 0.0,
            created_at: Utc::now(),
        }
    }
}

/// One payout record per (request, calendar date). Append-only, written
/// solely by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyProfit {
    pub id: Uuid,
    pub request_id: Uuid,
    pub investor_id: Uuid,
    pub date: NaiveDate,
    /// "YYYY-MM" bucket the monthly aggregation keys on.
    pub month_year: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl DailyProfit {
    pub fn month_bucket(date: NaiveDate) -> String {
        date.format("%Y-%m").to_string()
    }
}
