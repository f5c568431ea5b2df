use async_trait::async_trait;
use chrono::NaiveDate;
use despatch_invest::{DailyProfit, InvestorRepository, InvestorRequest, InvestorRequestStatus};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

struct InvestState {
    requests: HashMap<Uuid, InvestorRequest>,
    profits: Vec<DailyProfit>,
    /// Uniqueness index for the one-profit-per-(request, date) guard.
    profit_keys: HashSet<(Uuid, NaiveDate)>,
}

/// In-memory investor collection. The daily-profit ledger is append-only;
/// the (request, date) uniqueness check and the append share one lock.
pub struct MemoryInvestorStore {
    state: RwLock<InvestState>,
}

impl MemoryInvestorStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(InvestState {
                requests: HashMap::new(),
                profits: Vec::new(),
                profit_keys: HashSet::new(),
            }),
        }
    }
}

impl Default for MemoryInvestorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvestorRepository for MemoryInvestorStore {
    async fn insert_request(
        &self,
        request: &InvestorRequest,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        self.state
            .write()
            .await
            .requests
            .insert(request.id, request.clone());
        Ok(request.id)
    }

    async fn get_request(
        &self,
        id: Uuid,
    ) -> Result<Option<InvestorRequest>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.state.read().await.requests.get(&id).cloned())
    }

    async fn list_distributable(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<InvestorRequest>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .state
            .read()
            .await
            .requests
            .values()
            .filter(|r| {
                r.status == InvestorRequestStatus::Accepted
                    && r.monthly_target > 0.0
                    && r.start_date <= today
            })
            .cloned()
            .collect())
    }

    async fn try_insert_daily_profit(
        &self,
        profit: &DailyProfit,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self.state.write().await;
        if !state.profit_keys.insert((profit.request_id, profit.date)) {
            return Ok(false);
        }
        state.profits.push(profit.clone());
        Ok(true)
    }

    async fn sum_profits_for_month(
        &self,
        request_id: Uuid,
        month_year: &str,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .state
            .read()
            .await
            .profits
            .iter()
            .filter(|p| p.request_id == request_id && p.month_year == month_year)
            .map(|p| p.amount)
            .sum())
    }

    async fn list_profits(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<DailyProfit>, Box<dyn std::error::Error + Send + Sync>> {
        let mut result: Vec<DailyProfit> = self
            .state
            .read()
            .await
            .profits
            .iter()
            .filter(|p| p.request_id == request_id)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.date);
        Ok(result)
    }

    async fn record_distribution(
        &self,
        request_id: Uuid,
        date: NaiveDate,
        amount: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut state = self.state.write().await;
        let request = state
            .requests
            .get_mut(&request_id)
            .ok_or_else(|| format!("investor request {} not found", request_id))?;
        request.last_distribution_date = Some(date);
        request.earned_profit += amount;
        Ok(())
    }
}
