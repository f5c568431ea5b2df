use chrono::Utc;
use despatch_core::{Actor, FxTable, Role, SettlementRules, UserProfile};
use despatch_ledger::driver::SubmitRemittance;
use despatch_ledger::{
    AgentLedger, AgentRemitStatus, DriverLedger, LedgerError, RemitMethod, RemittanceStatus,
};
use despatch_order::{CommissionCalculator, Order, OrderItem, OrderRepository, ShipmentStatus};
use despatch_store::{
    MemoryAgentRemitStore, MemoryOrderStore, MemoryRemittanceStore, MemoryUserDirectory,
};
use std::sync::Arc;
use uuid::Uuid;

fn delivered_order(
    owner: Uuid,
    creator: Uuid,
    driver: Option<Uuid>,
    collected: f64,
    commission_pkr: Option<f64>,
) -> Order {
    let mut order = Order::new(
        format!("INV-{}", Uuid::new_v4().simple()),
        "+971500001234".to_string(),
        "Street 5".to_string(),
        "Dubai".to_string(),
        "AE".to_string(),
        25.2,
        55.3,
        creator,
        Role::Agent,
        owner,
        "AED".to_string(),
    );
    order.add_item(OrderItem {
        product_id: Uuid::new_v4(),
        name: "Widget".to_string(),
        price: collected,
        quantity: 1,
    });
    order.cod_amount = collected;
    order.collected_amount = collected;
    order.delivery_boy = driver;
    order.shipment_status = ShipmentStatus::Delivered;
    order.delivered_at = Some(Utc::now());
    order.agent_commission_pkr = commission_pkr;
    order.recompute_balance_due();
    order
}

fn driver_actor(owner: Uuid) -> Actor {
    Actor {
        id: Uuid::new_v4(),
        role: Role::Driver,
        owner_id: owner,
        country: Some("AE".to_string()),
    }
}

async fn seeded_directory(owner: Uuid, manager_id: Uuid) -> Arc<MemoryUserDirectory> {
    let users = Arc::new(MemoryUserDirectory::new());
    users
        .seed(UserProfile {
            id: manager_id,
            name: "Manager".to_string(),
            role: Role::Manager,
            owner_id: owner,
            country: Some("AE".to_string()),
        })
        .await;
    users
}

fn submit_input(manager_id: Uuid, amount: f64) -> SubmitRemittance {
    SubmitRemittance {
        manager_id,
        amount,
        currency: "AED".to_string(),
        method: RemitMethod::Cash,
        proof_ref: None,
        from: None,
        to: None,
    }
}

#[tokio::test]
async fn driver_available_nets_accepted_remittances() {
    let owner = Uuid::new_v4();
    let driver = driver_actor(owner);
    let manager_id = Uuid::new_v4();

    let orders = Arc::new(MemoryOrderStore::new());
    for amount in [300.0, 200.0] {
        orders
            .create_order(&delivered_order(owner, Uuid::new_v4(), Some(driver.id), amount, None))
            .await
            .unwrap();
    }

    let remits = Arc::new(MemoryRemittanceStore::new());
    let users = seeded_directory(owner, manager_id).await;
    let ledger = DriverLedger::new(orders, remits, users);

    let wallet = ledger.wallet(driver.id).await.unwrap();
    assert_eq!(wallet.gross, 500.0);
    assert_eq!(wallet.available, 500.0);
    assert_eq!(wallet.delivered_orders, 2);

    // Submit and accept 400, leaving 100 available
    let remittance = ledger
        .submit(&driver, submit_input(manager_id, 400.0))
        .await
        .unwrap();
    assert_eq!(remittance.status, RemittanceStatus::Pending);
    assert_eq!(remittance.total_delivered_orders, 2);

    let manager = Actor {
        id: manager_id,
        role: Role::Manager,
        owner_id: owner,
        country: Some("AE".to_string()),
    };
    ledger.accept(&manager, remittance.id).await.unwrap();

    let wallet = ledger.wallet(driver.id).await.unwrap();
    assert_eq!(wallet.settled, 400.0);
    assert_eq!(wallet.available, 100.0);
    // Accepted total never exceeds gross
    assert!(wallet.settled <= wallet.gross);
}

#[tokio::test]
async fn second_pending_remittance_is_rejected() {
    let owner = Uuid::new_v4();
    let driver = driver_actor(owner);
    let manager_id = Uuid::new_v4();

    let orders = Arc::new(MemoryOrderStore::new());
    orders
        .create_order(&delivered_order(owner, Uuid::new_v4(), Some(driver.id), 500.0, None))
        .await
        .unwrap();

    let ledger = DriverLedger::new(
        orders,
        Arc::new(MemoryRemittanceStore::new()),
        seeded_directory(owner, manager_id).await,
    );

    let first = ledger
        .submit(&driver, submit_input(manager_id, 100.0))
        .await
        .unwrap();

    let second = ledger.submit(&driver, submit_input(manager_id, 100.0)).await;
    match second {
        Err(LedgerError::PendingExists(existing)) => assert_eq!(existing, first.id),
        other => panic!("expected PendingExists, got {:?}", other.map(|r| r.id)),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_accept_and_reject_resolve_exactly_once() {
    let owner = Uuid::new_v4();
    let manager_id = Uuid::new_v4();
    let manager = Actor {
        id: manager_id,
        role: Role::Manager,
        owner_id: owner,
        country: Some("AE".to_string()),
    };

    let orders = Arc::new(MemoryOrderStore::new());
    let users = seeded_directory(owner, manager_id).await;

    for _ in 0..50 {
        let driver = driver_actor(owner);
        orders
            .create_order(&delivered_order(owner, Uuid::new_v4(), Some(driver.id), 500.0, None))
            .await
            .unwrap();
        let ledger = Arc::new(DriverLedger::new(
            orders.clone(),
            Arc::new(MemoryRemittanceStore::new()),
            users.clone(),
        ));

        let remittance = ledger
            .submit(&driver, submit_input(manager_id, 100.0))
            .await
            .unwrap();

        let accept = {
            let ledger = ledger.clone();
            let manager = manager.clone();
            tokio::spawn(async move { ledger.accept(&manager, remittance.id).await })
        };
        let reject = {
            let ledger = ledger.clone();
            let manager = manager.clone();
            tokio::spawn(async move { ledger.reject(&manager, remittance.id).await })
        };

        let accepted = accept.await.unwrap();
        let rejected = reject.await.unwrap();
        assert!(
            accepted.is_ok() != rejected.is_ok(),
            "exactly one resolution must win, got accept={:?} reject={:?}",
            accepted.is_ok(),
            rejected.is_ok()
        );

        // The stored status matches whichever call reported success.
        let stored = ledger
            .wallet(driver.id)
            .await
            .unwrap();
        if accepted.is_ok() {
            assert_eq!(stored.settled, 100.0);
        } else {
            assert_eq!(stored.settled, 0.0);
        }
    }
}

#[tokio::test]
async fn remittance_amount_bounded_by_available() {
    let owner = Uuid::new_v4();
    let driver = driver_actor(owner);
    let manager_id = Uuid::new_v4();

    let orders = Arc::new(MemoryOrderStore::new());
    orders
        .create_order(&delivered_order(owner, Uuid::new_v4(), Some(driver.id), 250.0, None))
        .await
        .unwrap();

    let ledger = DriverLedger::new(
        orders,
        Arc::new(MemoryRemittanceStore::new()),
        seeded_directory(owner, manager_id).await,
    );

    let result = ledger.submit(&driver, submit_input(manager_id, 250.01)).await;
    assert!(matches!(
        result,
        Err(LedgerError::ExceedsAvailable { .. })
    ));

    let zero = ledger.submit(&driver, submit_input(manager_id, 0.0)).await;
    assert!(matches!(zero, Err(LedgerError::Validation(_))));
}

#[tokio::test]
async fn transfer_method_requires_proof() {
    let owner = Uuid::new_v4();
    let driver = driver_actor(owner);
    let manager_id = Uuid::new_v4();

    let orders = Arc::new(MemoryOrderStore::new());
    orders
        .create_order(&delivered_order(owner, Uuid::new_v4(), Some(driver.id), 500.0, None))
        .await
        .unwrap();

    let ledger = DriverLedger::new(
        orders,
        Arc::new(MemoryRemittanceStore::new()),
        seeded_directory(owner, manager_id).await,
    );

    let mut input = submit_input(manager_id, 100.0);
    input.method = RemitMethod::Transfer;
    assert!(matches!(
        ledger.submit(&driver, input.clone()).await,
        Err(LedgerError::Validation(_))
    ));

    input.proof_ref = Some("uploads/proof-123.jpg".to_string());
    assert!(ledger.submit(&driver, input).await.is_ok());
}

fn agent_ledger(
    orders: Arc<MemoryOrderStore>,
    remits: Arc<MemoryAgentRemitStore>,
) -> AgentLedger {
    let rules = SettlementRules::default();
    let calculator = CommissionCalculator::new(&rules, FxTable::default());
    AgentLedger::new(orders, remits, calculator, rules, None)
}

#[tokio::test]
async fn agent_minimum_payout_boundary() {
    let owner = Uuid::new_v4();
    let agent = Actor {
        id: Uuid::new_v4(),
        role: Role::Agent,
        owner_id: owner,
        country: None,
    };

    // Exactly 10_000 PKR of commission available
    let orders = Arc::new(MemoryOrderStore::new());
    orders
        .create_order(&delivered_order(owner, agent.id, None, 100.0, Some(10_000.0)))
        .await
        .unwrap();
    let ledger = agent_ledger(orders, Arc::new(MemoryAgentRemitStore::new()));

    let remit = ledger.submit(&agent, 10_000.0, None).await.unwrap();
    assert_eq!(remit.status, AgentRemitStatus::Pending);

    // 9_999 available: the same request must fail on the balance check
    let orders = Arc::new(MemoryOrderStore::new());
    orders
        .create_order(&delivered_order(owner, agent.id, None, 100.0, Some(9_999.0)))
        .await
        .unwrap();
    let ledger = agent_ledger(orders, Arc::new(MemoryAgentRemitStore::new()));

    let result = ledger.submit(&agent, 10_000.0, None).await;
    assert!(matches!(result, Err(LedgerError::ExceedsAvailable { .. })));

    // Below the fixed minimum fails outright, regardless of balance
    let result = ledger.submit(&agent, 9_999.0, None).await;
    assert!(matches!(result, Err(LedgerError::BelowMinimum { .. })));
}

#[tokio::test]
async fn legacy_orders_fall_back_to_computed_commission() {
    let owner = Uuid::new_v4();
    let agent_id = Uuid::new_v4();

    let orders = Arc::new(MemoryOrderStore::new());
    // One snapshotted order, one legacy order missing the snapshot
    orders
        .create_order(&delivered_order(owner, agent_id, None, 100.0, Some(500.0)))
        .await
        .unwrap();
    orders
        .create_order(&delivered_order(owner, agent_id, None, 100.0, None))
        .await
        .unwrap();

    let ledger = agent_ledger(orders, Arc::new(MemoryAgentRemitStore::new()));
    let wallet = ledger.wallet(agent_id).await.unwrap();

    // Legacy fallback: 100 AED × 0.12 × 76 = 912
    assert_eq!(wallet.gross, 500.0 + 912.0);
}

#[tokio::test]
async fn send_revalidates_against_fresh_balance() {
    let owner_id = Uuid::new_v4();
    let agent = Actor {
        id: Uuid::new_v4(),
        role: Role::Agent,
        owner_id,
        country: None,
    };
    let owner = Actor {
        id: owner_id,
        role: Role::Admin,
        owner_id,
        country: None,
    };

    let orders = Arc::new(MemoryOrderStore::new());
    orders
        .create_order(&delivered_order(owner_id, agent.id, None, 100.0, Some(25_000.0)))
        .await
        .unwrap();
    let remits = Arc::new(MemoryAgentRemitStore::new());
    let ledger = agent_ledger(orders, remits);

    // Two approved requests against a 25k balance
    let first = ledger.submit(&agent, 15_000.0, None).await.unwrap();
    let second = ledger.submit(&agent, 10_000.0, None).await.unwrap();
    ledger.approve(&owner, first.id).await.unwrap();
    ledger.approve(&owner, second.id).await.unwrap();

    // Sending the first consumes 15k; only 10k remains
    let sent = ledger.send(&owner, first.id).await.unwrap();
    assert_eq!(sent.status, AgentRemitStatus::Sent);

    let wallet = ledger.wallet(agent.id).await.unwrap();
    assert_eq!(wallet.available, 10_000.0);

    // Second still fits exactly
    assert!(ledger.send(&owner, second.id).await.is_ok());

    // A third approved request would find nothing left
    let wallet = ledger.wallet(agent.id).await.unwrap();
    assert_eq!(wallet.available, 0.0);
}

#[tokio::test]
async fn remit_status_chain_is_one_way() {
    let owner_id = Uuid::new_v4();
    let agent = Actor {
        id: Uuid::new_v4(),
        role: Role::Agent,
        owner_id,
        country: None,
    };
    let owner = Actor {
        id: owner_id,
        role: Role::Admin,
        owner_id,
        country: None,
    };

    let orders = Arc::new(MemoryOrderStore::new());
    orders
        .create_order(&delivered_order(owner_id, agent.id, None, 100.0, Some(20_000.0)))
        .await
        .unwrap();
    let ledger = agent_ledger(orders, Arc::new(MemoryAgentRemitStore::new()));

    let remit = ledger.submit(&agent, 12_000.0, None).await.unwrap();

    // Cannot send before approval
    assert!(matches!(
        ledger.send(&owner, remit.id).await,
        Err(LedgerError::Validation(_))
    ));

    ledger.approve(&owner, remit.id).await.unwrap();
    // Cannot approve twice
    assert!(matches!(
        ledger.approve(&owner, remit.id).await,
        Err(LedgerError::Validation(_))
    ));

    ledger.send(&owner, remit.id).await.unwrap();
    // Sent is final
    assert!(matches!(
        ledger.send(&owner, remit.id).await,
        Err(LedgerError::Validation(_))
    ));
}
