pub mod inventory;
pub mod product;
pub mod repository;

pub use inventory::{InventoryError, InventoryLedger};
pub use product::Product;
pub use repository::ProductRepository;
