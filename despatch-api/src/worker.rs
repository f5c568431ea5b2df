use chrono::Utc;
use despatch_invest::ProfitDistributionScheduler;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

/// Background profit-distribution loop. One sweep per interval; a failed
/// sweep is logged and retried on the next tick.
pub async fn start_profit_worker(
    scheduler: Arc<ProfitDistributionScheduler>,
    interval_seconds: u64,
) {
    info!(interval_seconds, "profit distribution worker started");
    loop {
        let today = Utc::now().date_naive();
        match scheduler.run_once(today).await {
            Ok(summary) => {
                info!(
                    processed = summary.processed,
                    written = summary.written,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    "profit sweep complete"
                );
            }
            Err(e) => error!(error = %e, "profit sweep failed"),
        }
        sleep(Duration::from_secs(interval_seconds)).await;
    }
}
