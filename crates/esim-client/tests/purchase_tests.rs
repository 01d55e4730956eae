//! Purchase orchestration: step ordering, declined-vs-error outcomes, and
//! the persisted order collection.

use esim_client::{
    ApiError, EsimService, PaymentService, PurchaseError, PurchaseOrchestrator, SessionStore,
    Transport,
};
use esim_common::{OrderStatus, Plan};
use esim_config::{ConfigResolver, FlagUpdate, MemoryStore};
use mockito::Server;
use serde_json::json;
use std::sync::Arc;

struct Stack {
    session: Arc<SessionStore>,
    orchestrator: PurchaseOrchestrator,
}

async fn stack(dev_url: &str, patch: FlagUpdate) -> Stack {
    let kv = Arc::new(MemoryStore::new());
    let config = Arc::new(ConfigResolver::load(kv.clone()).await);
    config
        .update(FlagUpdate {
            dev_url: Some(dev_url.to_string()),
            ..patch
        })
        .await
        .unwrap();
    let session = Arc::new(SessionStore::new(kv));
    let transport = Arc::new(Transport::new(session.clone()));
    let payments = Arc::new(PaymentService::new(
        config.clone(),
        transport.clone(),
        session.clone(),
    ));
    let esims = Arc::new(EsimService::new(config, transport, session.clone()));
    Stack {
        session: session.clone(),
        orchestrator: PurchaseOrchestrator::new(payments, esims, session),
    }
}

fn global_plan() -> Plan {
    Plan {
        id: 2,
        name: "Global 5GB".to_string(),
        data_mb: 5120,
        validity_days: 30,
        price: 29.99,
        currency: "USD".to_string(),
        countries: vec!["US".to_string()],
        features: vec![],
    }
}

#[tokio::test]
async fn demo_purchase_creates_exactly_one_paid_order() {
    let s = stack("http://127.0.0.1:9", FlagUpdate::default()).await;
    let plan = global_plan();

    let order = s
        .orchestrator
        .purchase("user-1", &plan, "pm_demo_visa")
        .await
        .unwrap();

    assert_eq!(order.plan.id, 2);
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.data_remaining_mb, 5120.0);

    let stored = s.session.orders().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, order.id);
}

#[tokio::test]
async fn declined_payment_creates_no_order_and_no_provisioning_call() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/payments/create-intent/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": "pi_1", "amount": 29.99, "currency": "USD", "status": "pending"})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("POST", "/payments/confirm/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": "pi_1", "amount": 29.99, "currency": "USD", "status": "failed"})
                .to_string(),
        )
        .create_async()
        .await;
    let provision = server
        .mock("POST", "/esims/purchase/")
        .expect(0)
        .create_async()
        .await;

    let s = stack(
        &server.url(),
        FlagUpdate {
            real_payments: Some(true),
            real_esim: Some(true),
            ..Default::default()
        },
    )
    .await;

    let result = s
        .orchestrator
        .purchase("user-1", &global_plan(), "pm_bad_card")
        .await;

    match result {
        Err(PurchaseError::Declined { intent_id }) => assert_eq!(intent_id, "pi_1"),
        other => panic!("expected declined outcome, got {other:?}"),
    }
    assert!(s.session.orders().await.unwrap().is_empty());
    provision.assert_async().await;
}

#[tokio::test]
async fn unreachable_payment_backend_still_completes_synthetically() {
    // Payments flagged real against a dead backend: both payment steps fall
    // back inside the service and the purchase still resolves.
    let s = stack(
        "http://127.0.0.1:9",
        FlagUpdate {
            real_payments: Some(true),
            ..Default::default()
        },
    )
    .await;

    let order = s
        .orchestrator
        .purchase("user-1", &global_plan(), "pm_demo_visa")
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(s.session.orders().await.unwrap().len(), 1);
}

#[tokio::test]
async fn client_error_on_intent_creation_aborts_with_no_order() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/payments/create-intent/")
        .with_status(400)
        .with_body("amount invalid")
        .create_async()
        .await;
    let confirm = server
        .mock("POST", "/payments/confirm/")
        .expect(0)
        .create_async()
        .await;

    let s = stack(
        &server.url(),
        FlagUpdate {
            real_payments: Some(true),
            ..Default::default()
        },
    )
    .await;

    let result = s
        .orchestrator
        .purchase("user-1", &global_plan(), "pm_demo_visa")
        .await;

    assert!(matches!(
        result,
        Err(PurchaseError::Api(ApiError::Client { status: 400, .. }))
    ));
    assert!(s.session.orders().await.unwrap().is_empty());
    confirm.assert_async().await;
}

#[tokio::test]
async fn successful_real_payment_provisions_through_esim_service() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/payments/create-intent/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": "pi_2", "amount": 29.99, "currency": "USD", "status": "pending"})
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("POST", "/payments/confirm/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": "pi_2", "amount": 29.99, "currency": "USD", "status": "succeeded"})
                .to_string(),
        )
        .create_async()
        .await;

    // Esim stays in synthetic mode; the order is generated locally.
    let s = stack(
        &server.url(),
        FlagUpdate {
            real_payments: Some(true),
            ..Default::default()
        },
    )
    .await;

    let order = s
        .orchestrator
        .purchase("user-1", &global_plan(), "pm_demo_visa")
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.plan.id, 2);
    assert_eq!(s.session.orders().await.unwrap().len(), 1);
}

#[tokio::test]
async fn repeat_purchases_append_to_the_collection() {
    let s = stack("http://127.0.0.1:9", FlagUpdate::default()).await;
    let plan = global_plan();

    s.orchestrator
        .purchase("user-1", &plan, "pm_demo_visa")
        .await
        .unwrap();
    s.orchestrator
        .purchase("user-1", &plan, "pm_demo_visa")
        .await
        .unwrap();

    // Sequential invocations are independent; each creates its own order.
    let stored = s.session.orders().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].id, stored[1].id);
    assert_ne!(stored[0].iccid, stored[1].iccid);
}
