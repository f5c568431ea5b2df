pub mod models;
pub mod repository;
pub mod scheduler;

pub use models::{DailyProfit, InvestorRequest, InvestorRequestStatus};
pub use repository::InvestorRepository;
pub use scheduler::{DailyRandom, ProfitDistributionScheduler, ThreadRngRandom};
