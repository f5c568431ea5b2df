use std::sync::Arc;

use despatch_catalog::InventoryLedger;
use despatch_core::{CapabilityChecker, DirectoryCapabilityChecker, FxTable, SettlementRules};
use despatch_invest::{InvestorRepository, ProfitDistributionScheduler, ThreadRngRandom};
use despatch_ledger::{AgentLedger, DriverLedger};
use despatch_order::{CommissionCalculator, DeliveryService, OrderIntake, OrderRepository, PostCommitHook};
use despatch_shared::models::events::OrderDeliveredEvent;
use despatch_store::{
    MemoryAgentRemitStore, MemoryInvestorStore, MemoryOrderStore, MemoryProductStore,
    MemoryRemittanceStore, MemoryUserDirectory,
};
use tokio::sync::broadcast;

use crate::metrics::Metrics;
use crate::notifier::{DeliveredBroadcastHook, DriverMessageHook, LoggingReceiptSender};

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub intake: Arc<OrderIntake>,
    pub delivery: Arc<DeliveryService>,
    pub driver_ledger: Arc<DriverLedger>,
    pub agent_ledger: Arc<AgentLedger>,
    pub investors: Arc<dyn InvestorRepository>,
    pub capabilities: Arc<dyn CapabilityChecker>,
    pub metrics: Arc<Metrics>,
    pub delivered_tx: broadcast::Sender<OrderDeliveredEvent>,
    pub rules: SettlementRules,
}

/// Concrete store handles kept alongside the trait-typed state, so startup
/// seeding and tests can reach the collections directly.
pub struct StoreHandles {
    pub orders: Arc<MemoryOrderStore>,
    pub products: Arc<MemoryProductStore>,
    pub remittances: Arc<MemoryRemittanceStore>,
    pub agent_remits: Arc<MemoryAgentRemitStore>,
    pub investors: Arc<MemoryInvestorStore>,
    pub users: Arc<MemoryUserDirectory>,
    pub scheduler: Arc<ProfitDistributionScheduler>,
}

/// Wire the full engine over the in-memory stores.
pub fn build_in_memory(rules: SettlementRules, fx: FxTable) -> (AppState, StoreHandles) {
    let orders = Arc::new(MemoryOrderStore::new());
    let products = Arc::new(MemoryProductStore::new());
    let remittances = Arc::new(MemoryRemittanceStore::new());
    let agent_remits = Arc::new(MemoryAgentRemitStore::new());
    let investors = Arc::new(MemoryInvestorStore::new());
    let users = Arc::new(MemoryUserDirectory::new());

    let metrics = Arc::new(Metrics::new());
    let (delivered_tx, _) = broadcast::channel(100);

    let calculator = CommissionCalculator::new(&rules, fx);
    let inventory = InventoryLedger::new(products.clone());
    let hooks: Vec<Arc<dyn PostCommitHook>> = vec![
        Arc::new(DeliveredBroadcastHook::new(delivered_tx.clone())),
        Arc::new(DriverMessageHook),
    ];

    let intake = Arc::new(OrderIntake::new(orders.clone(), rules.clone()));
    let delivery = Arc::new(DeliveryService::new(
        orders.clone(),
        inventory,
        calculator.clone(),
        hooks,
    ));
    let driver_ledger = Arc::new(DriverLedger::new(
        orders.clone(),
        remittances.clone(),
        users.clone(),
    ));
    let agent_ledger = Arc::new(AgentLedger::new(
        orders.clone(),
        agent_remits.clone(),
        calculator,
        rules.clone(),
        Some(Arc::new(LoggingReceiptSender)),
    ));
    let scheduler = Arc::new(ProfitDistributionScheduler::new(
        investors.clone(),
        rules.clone(),
        Box::new(ThreadRngRandom),
    ));
    let capabilities = Arc::new(DirectoryCapabilityChecker::new(
        users.clone() as Arc<dyn despatch_core::UserDirectory>,
    ));

    let state = AppState {
        orders: orders.clone(),
        intake,
        delivery,
        driver_ledger,
        agent_ledger,
        investors: investors.clone(),
        capabilities,
        metrics,
        delivered_tx,
        rules,
    };

    let handles = StoreHandles {
        orders,
        products,
        remittances,
        agent_remits,
        investors,
        users,
        scheduler,
    };

    (state, handles)
}
