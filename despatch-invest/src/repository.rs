use crate::models::{DailyProfit, InvestorRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Repository trait for investor requests and their daily-profit ledger.
///
/// `try_insert_daily_profit` is the idempotency guard for scheduler reruns:
/// insertion and the one-per-(request, date) check happen under a single
/// storage guard.
#[async_trait]
pub trait InvestorRepository: Send + Sync {
    async fn insert_request(
        &self,
        request: &InvestorRequest,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_request(
        &self,
        id: Uuid,
    ) -> Result<Option<InvestorRequest>, Box<dyn std::error::Error + Send + Sync>>;

    /// Accepted requests with a positive target whose distribution start is
    /// on or before `today`.
    async fn list_distributable(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<InvestorRequest>, Box<dyn std::error::Error + Send + Sync>>;

    /// Insert unless a record already exists for (request, date). Returns
    /// true when this call inserted.
    async fn try_insert_daily_profit(
        &self,
        profit: &DailyProfit,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Sum of a request's daily-profit amounts inside one month bucket.
    async fn sum_profits_for_month(
        &self,
        request_id: Uuid,
        month_year: &str,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_profits(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<DailyProfit>, Box<dyn std::error::Error + Send + Sync>>;

    /// Stamp `last_distribution_date` and bump the request's running
    /// earned-profit counter after a successful distribution.
    async fn record_distribution(
        &self,
        request_id: Uuid,
        date: NaiveDate,
        amount: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
