pub mod commission;
pub mod delivery;
pub mod intake;
pub mod models;
pub mod repository;
pub mod state_machine;

pub use commission::CommissionCalculator;
pub use delivery::{DeliveryService, PostCommitHook};
pub use intake::OrderIntake;
pub use models::{Order, OrderItem, OrderStatus, ShipmentStatus};
pub use repository::OrderRepository;
pub use state_machine::{OrderError, OrderStateMachine};
