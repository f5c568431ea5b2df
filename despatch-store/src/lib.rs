pub mod app_config;
pub mod invest_store;
pub mod order_store;
pub mod product_store;
pub mod remit_store;
pub mod users;

pub use invest_store::MemoryInvestorStore;
pub use order_store::MemoryOrderStore;
pub use product_store::MemoryProductStore;
pub use remit_store::{MemoryAgentRemitStore, MemoryRemittanceStore};
pub use users::MemoryUserDirectory;
