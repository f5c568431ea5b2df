use crate::models::{DailyProfit, InvestorRequest};
use crate::repository::InvestorRepository;
use chrono::{Datelike, Months, NaiveDate, Utc};
use despatch_core::SettlementRules;
use rand::Rng;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Pluggable random source for the daily draw, so the "sums to target by
/// month end" property can be verified without flakiness.
pub trait DailyRandom: Send {
    fn in_range(&mut self, lo: f64, hi: f64) -> f64;
}

/// Production source backed by the thread-local RNG.
pub struct ThreadRngRandom;

impl DailyRandom for ThreadRngRandom {
    fn in_range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        rand::thread_rng().gen_range(lo..=hi)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Scheduler storage failure: {0}")]
    Storage(String),
}

/// Smooths each accepted investor request's monthly profit target into
/// variable daily payouts: the per-day average of what remains, jittered
/// inside the configured band, with the last day of the month forced to
/// emit exactly the remainder.
pub struct ProfitDistributionScheduler {
    requests: Arc<dyn InvestorRepository>,
    rules: SettlementRules,
    rng: Mutex<Box<dyn DailyRandom>>,
}

impl ProfitDistributionScheduler {
    pub fn new(
        requests: Arc<dyn InvestorRepository>,
        rules: SettlementRules,
        rng: Box<dyn DailyRandom>,
    ) -> Self {
        Self {
            requests,
            rules,
            rng: Mutex::new(rng),
        }
    }

    /// One sweep over all distributable requests. Failures for one request
    /// are logged and isolated; they never abort the rest of the run.
    pub async fn run_once(&self, today: NaiveDate) -> Result<RunSummary, SchedulerError> {
        let requests = self
            .requests
            .list_distributable(today)
            .await
            .map_err(|e| SchedulerError::Storage(e.to_string()))?;

        let mut summary = RunSummary::default();
        for request in requests {
            summary.processed += 1;
            match self.distribute_one(&request, today).await {
                Ok(true) => summary.written += 1,
                Ok(false) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        request_id = %request.id,
                        investor_id = %request.investor_id,
                        error = %e,
                        "daily profit distribution failed for request"
                    );
                }
            }
        }

        tracing::info!(
            processed = summary.processed,
            written = summary.written,
            skipped = summary.skipped,
            failed = summary.failed,
            %today,
            "profit distribution sweep finished"
        );
        Ok(summary)
    }

    /// Returns true when a record was written for `today`.
    async fn distribute_one(
        &self,
        request: &InvestorRequest,
        today: NaiveDate,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let month_year = DailyProfit::month_bucket(today);
        let earned_this_month = self
            .requests
            .sum_profits_for_month(request.id, &month_year)
            .await?;

        let remaining = request.monthly_target - earned_this_month;
        let days_left = days_in_month(today) - today.day() + 1;

        let amount = if days_left == 1 {
            // Month end: meet the target exactly, never overshoot silently.
            round2(remaining.max(0.0))
        } else {
            let avg_per_day = remaining / days_left as f64;
            let draw = {
                let mut rng = self
                    .rng
                    .lock()
                    .map_err(|_| "scheduler rng lock poisoned".to_string())?;
                rng.in_range(
                    avg_per_day * self.rules.daily_variance_low,
                    avg_per_day * self.rules.daily_variance_high,
                )
            };
            round2(draw)
        };

        if amount <= 0.0 {
            return Ok(false);
        }

        let profit = DailyProfit {
            id: Uuid::new_v4(),
            request_id: request.id,
            investor_id: request.investor_id,
            date: today,
            month_year,
            amount,
            created_at: Utc::now(),
        };

        // Idempotency guard: reruns on the same day lose the insert.
        if !self.requests.try_insert_daily_profit(&profit).await? {
            return Ok(false);
        }

        self.requests
            .record_distribution(request.id, today, amount)
            .await?;
        Ok(true)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn days_in_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvestorRequestStatus;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use tokio::sync::Mutex as AsyncMutex;

    struct SeededRandom(StdRng);

    impl DailyRandom for SeededRandom {
        fn in_range(&mut self, lo: f64, hi: f64) -> f64 {
            if hi <= lo {
                return lo;
            }
            self.0.gen_range(lo..=hi)
        }
    }

    #[derive(Default)]
    struct MemInvest {
        requests: AsyncMutex<HashMap<Uuid, InvestorRequest>>,
        profits: AsyncMutex<Vec<DailyProfit>>,
        fail_sum_for: Option<Uuid>,
    }

    #[async_trait]
    impl InvestorRepository for MemInvest {
        async fn insert_request(
            &self,
            request: &InvestorRequest,
        ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
            self.requests
                .lock()
                .await
                .insert(request.id, request.clone());
            Ok(request.id)
        }

        async fn get_request(
            &self,
            id: Uuid,
        ) -> Result<Option<InvestorRequest>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.requests.lock().await.get(&id).cloned())
        }

        async fn list_distributable(
            &self,
            today: NaiveDate,
        ) -> Result<Vec<InvestorRequest>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self
                .requests
                .lock()
                .await
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
            let mut profits = self.profits.lock().await;
            if profits
                .iter()
                .any(|p| p.request_id == profit.request_id && p.date == profit.date)
            {
                return Ok(false);
            }
            profits.push(profit.clone());
            Ok(true)
        }

        async fn sum_profits_for_month(
            &self,
            request_id: Uuid,
            month_year: &str,
        ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_sum_for == Some(request_id) {
                return Err("simulated storage outage".into());
            }
            Ok(self
                .profits
                .lock()
                .await
                .iter()
                .filter(|p| p.request_id == request_id && p.month_year == month_year)
                .map(|p| p.amount)
                .sum())
        }

        async fn list_profits(
            &self,
            request_id: Uuid,
        ) -> Result<Vec<DailyProfit>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self
                .profits
                .lock()
                .await
                .iter()
                .filter(|p| p.request_id == request_id)
                .cloned()
                .collect())
        }

        async fn record_distribution(
            &self,
            request_id: Uuid,
            date: NaiveDate,
            amount: f64,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let mut requests = self.requests.lock().await;
            if let Some(request) = requests.get_mut(&request_id) {
                request.last_distribution_date = Some(date);
                request.earned_profit += amount;
            }
            Ok(())
        }
    }

    fn accepted_request(target: f64, start: NaiveDate) -> InvestorRequest {
        let mut request =
            InvestorRequest::new(Uuid::new_v4(), target, "PKR".to_string(), start);
        request.status = InvestorRequestStatus::Accepted;
        request
    }

    fn scheduler(repo: Arc<MemInvest>, seed: u64) -> ProfitDistributionScheduler {
        ProfitDistributionScheduler::new(
            repo,
            SettlementRules::default(),
            Box::new(SeededRandom(StdRng::seed_from_u64(seed))),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2025, 4, 10)), 30);
        assert_eq!(days_in_month(date(2025, 1, 31)), 31);
        assert_eq!(days_in_month(date(2024, 2, 5)), 29);
    }

    #[tokio::test]
    async fn test_rerun_same_day_writes_one_record() {
        let repo = Arc::new(MemInvest::default());
        let request = accepted_request(3000.0, date(2025, 6, 1));
        repo.insert_request(&request).await.unwrap();

        let sched = scheduler(repo.clone(), 7);
        let first = sched.run_once(date(2025, 6, 1)).await.unwrap();
        assert_eq!(first.written, 1);

        let second = sched.run_once(date(2025, 6, 1)).await.unwrap();
        assert_eq!(second.written, 0);
        assert_eq!(second.skipped, 1);

        assert_eq!(repo.list_profits(request.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_month_converges_to_target() {
        let repo = Arc::new(MemInvest::default());
        // June has 30 days
        let request = accepted_request(3000.0, date(2025, 6, 1));
        repo.insert_request(&request).await.unwrap();

        let sched = scheduler(repo.clone(), 42);
        for day in 1..=30 {
            sched.run_once(date(2025, 6, day)).await.unwrap();
        }

        let profits = repo.list_profits(request.id).await.unwrap();
        let total: f64 = profits.iter().map(|p| p.amount).sum();
        assert!(
            (total - 3000.0).abs() <= 0.01,
            "month total {} drifted from target",
            total
        );

        // The last day emitted exactly the remainder of everything before it.
        let last = profits.iter().find(|p| p.date == date(2025, 6, 30)).unwrap();
        let before: f64 = profits
            .iter()
            .filter(|p| p.date != date(2025, 6, 30))
            .map(|p| p.amount)
            .sum();
        assert!((last.amount - (3000.0 - before)).abs() <= 0.01);

        let stored = repo.get_request(request.id).await.unwrap().unwrap();
        assert_eq!(stored.last_distribution_date, Some(date(2025, 6, 30)));
        assert!((stored.earned_profit - 3000.0).abs() <= 0.01);
    }

    #[tokio::test]
    async fn test_daily_amounts_stay_inside_variance_band() {
        let repo = Arc::new(MemInvest::default());
        let request = accepted_request(3000.0, date(2025, 6, 1));
        repo.insert_request(&request).await.unwrap();

        let sched = scheduler(repo.clone(), 9);
        // Day 1 of a 30-day month: avg = 100, band [70, 130]
        sched.run_once(date(2025, 6, 1)).await.unwrap();
        let profits = repo.list_profits(request.id).await.unwrap();
        let amount = profits[0].amount;
        assert!((70.0..=130.0).contains(&amount), "draw {} outside band", amount);
    }

    #[tokio::test]
    async fn test_start_date_gates_distribution() {
        let repo = Arc::new(MemInvest::default());
        let request = accepted_request(3000.0, date(2025, 6, 15));
        repo.insert_request(&request).await.unwrap();

        let sched = scheduler(repo.clone(), 3);
        let summary = sched.run_once(date(2025, 6, 10)).await.unwrap();
        assert_eq!(summary.processed, 0);

        let summary = sched.run_once(date(2025, 6, 15)).await.unwrap();
        assert_eq!(summary.written, 1);
    }

    #[tokio::test]
    async fn test_one_failing_request_does_not_abort_sweep() {
        let bad = accepted_request(3000.0, date(2025, 6, 1));
        let good = accepted_request(1500.0, date(2025, 6, 1));

        let repo = Arc::new(MemInvest {
            fail_sum_for: Some(bad.id),
            ..Default::default()
        });
        repo.insert_request(&bad).await.unwrap();
        repo.insert_request(&good).await.unwrap();

        let sched = scheduler(repo.clone(), 11);
        let summary = sched.run_once(date(2025, 6, 5)).await.unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.written, 1);
        assert_eq!(repo.list_profits(good.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_met_target_stops_emitting() {
        let repo = Arc::new(MemInvest::default());
        let request = accepted_request(100.0, date(2025, 6, 1));
        repo.insert_request(&request).await.unwrap();

        // Pre-load the month at target
        repo.try_insert_daily_profit(&DailyProfit {
            id: Uuid::new_v4(),
            request_id: request.id,
            investor_id: request.investor_id,
            date: date(2025, 6, 1),
            month_year: "2025-06".to_string(),
            amount: 100.0,
            created_at: Utc::now(),
        })
        .await
        .unwrap();

        let sched = scheduler(repo.clone(), 5);
        let summary = sched.run_once(date(2025, 6, 10)).await.unwrap();
        // remaining == 0 -> draw <= 0 -> no record
        assert_eq!(summary.written, 0);
        assert_eq!(summary.skipped, 1);
    }
}
