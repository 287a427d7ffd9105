//! Integration tests for the ticketing features running in a Store
//!
//! Effects here run for real: the simulated gateway sleeps, delays fire and
//! the in-memory account backends are shared between stores.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use std::sync::Arc;
use std::time::Duration;
use ticketbook_runtime::{Store, StoreError};
use ticketbook_testing::test_clock;
use ticketing::account::mocks::{InMemoryAssetUploader, InMemoryAuthProvider, InMemoryDocumentStore};
use ticketing::account::{AccountAction, AccountEnvironment, AccountReducer, AccountState, SignUpForm};
use ticketing::{
    CheckoutAction, CheckoutEnvironment, CheckoutReducer, CheckoutState, InboxAction,
    InboxEnvironment, InboxReducer, InboxState, ItemId, Money, SimulatedCheckoutGateway, seed,
};

fn checkout_store(
    gateway: SimulatedCheckoutGateway,
) -> Store<CheckoutState, CheckoutAction, CheckoutEnvironment, CheckoutReducer> {
    let env = CheckoutEnvironment::new(Arc::new(test_clock()), gateway.shared());
    Store::new(CheckoutState::new(seed::techconf_listing()), CheckoutReducer::new(), env)
}

fn inc(id: &str) -> CheckoutAction {
    CheckoutAction::IncrementQuantity {
        item_id: ItemId::from(id),
    }
}

#[tokio::test]
async fn test_checkout_places_order() {
    let store = checkout_store(SimulatedCheckoutGateway::new(Duration::from_millis(10)));

    store.send(inc("1")).await.unwrap();
    store.send(inc("1")).await.unwrap();
    store.send(inc("2")).await.unwrap();
    store
        .send(CheckoutAction::DecrementQuantity {
            item_id: ItemId::from("3"),
        })
        .await
        .unwrap();

    let total = store.state(CheckoutState::total).await;
    assert_eq!(total, Money::from_dollars(2 * 299 + 599));

    let mut handle = store.send(CheckoutAction::ProceedToCheckout).await.unwrap();
    assert!(store.state(|s| s.processing).await);

    handle
        .wait_with_timeout(Duration::from_secs(5))
        .await
        .unwrap();

    let (processing, empty, confirmation) = store
        .state(|s| (s.processing, s.selection.is_empty(), s.last_confirmation.clone()))
        .await;
    assert!(!processing);
    assert!(empty);
    let confirmation = confirmation.unwrap();
    assert_eq!(confirmation.total, total);
    assert_eq!(confirmation.ticket_count, 3);
}

#[tokio::test]
async fn test_checkout_result_is_broadcast() {
    let store = checkout_store(SimulatedCheckoutGateway::new(Duration::from_millis(10)));
    store.send(inc("3")).await.unwrap();

    let result = store
        .send_and_wait_for(
            CheckoutAction::ProceedToCheckout,
            |action| matches!(action, CheckoutAction::CheckoutCompleted { .. }),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    let CheckoutAction::CheckoutCompleted { confirmation } = result else {
        unreachable!("predicate only matches CheckoutCompleted");
    };
    assert_eq!(confirmation.total, Money::from_dollars(199));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_completed_order_visible_when_result_arrives() {
    let store = checkout_store(SimulatedCheckoutGateway::new(Duration::ZERO));

    for _ in 0..50 {
        store.send(inc("1")).await.unwrap();

        let result = store
            .send_and_wait_for(
                CheckoutAction::ProceedToCheckout,
                |action| matches!(action, CheckoutAction::CheckoutCompleted { .. }),
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        let CheckoutAction::CheckoutCompleted { confirmation } = result else {
            unreachable!("predicate only matches CheckoutCompleted");
        };

        let (processing, last_confirmation, empty) = store
            .state(|s| (s.processing, s.last_confirmation.clone(), s.selection.is_empty()))
            .await;
        assert!(!processing);
        assert_eq!(last_confirmation, Some(confirmation));
        assert!(empty);
    }
}

#[tokio::test]
async fn test_declined_checkout_keeps_selection() {
    let store = checkout_store(SimulatedCheckoutGateway::declining(
        Duration::from_millis(10),
        "event sold out",
    ));
    store.send(inc("2")).await.unwrap();

    store
        .send(CheckoutAction::ProceedToCheckout)
        .await
        .unwrap()
        .wait()
        .await;

    let (quantity, error, can_checkout) = store
        .state(|s| (s.quantity(&ItemId::from("2")), s.last_error.clone(), s.can_checkout()))
        .await;
    assert_eq!(quantity, 1);
    assert_eq!(error.as_deref(), Some("Order declined: event sold out"));
    assert!(can_checkout);
}

#[tokio::test]
async fn test_concurrent_increments() {
    let store = checkout_store(SimulatedCheckoutGateway::new(Duration::ZERO));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                let _ = store.send(inc("1")).await;
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let quantity = store.state(|s| s.quantity(&ItemId::from("1"))).await;
    assert_eq!(quantity, 10);
}

#[tokio::test]
async fn test_shutdown_rejects_new_actions() {
    let store = checkout_store(SimulatedCheckoutGateway::new(Duration::ZERO));
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    let result = store.send(inc("1")).await;
    assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
}

#[tokio::test]
async fn test_inbox_refresh_completes() {
    let env = InboxEnvironment::new(75, Duration::from_millis(10));
    let store = Store::new(InboxState::new(seed::notifications()), InboxReducer::new(), env);

    store
        .send(InboxAction::SwipeChanged {
            id: "3".to_string(),
            offset: -120,
        })
        .await
        .unwrap();
    assert_eq!(store.state(InboxState::unread_count).await, 1);

    let mut handle = store.send(InboxAction::Refresh).await.unwrap();
    assert!(store.state(|s| s.refreshing).await);
    handle.wait().await;
    assert!(!store.state(|s| s.refreshing).await);

    store.send(InboxAction::ClearAll).await.unwrap();
    assert!(store.state(InboxState::is_empty).await);
}

#[tokio::test]
async fn test_refresh_completion_is_observable() {
    let env = InboxEnvironment::new(75, Duration::from_millis(10));
    let store = Store::new(InboxState::new(seed::notifications()), InboxReducer::new(), env);
    let mut actions = store.subscribe_actions();

    store.send(InboxAction::Refresh).await.unwrap();
    store.send(InboxAction::MarkAsRead { id: "1".to_string() }).await.unwrap();

    let received = tokio::time::timeout(Duration::from_secs(5), actions.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received, InboxAction::RefreshCompleted);
    assert!(!store.state(|s| s.refreshing).await);
    assert!(actions.try_recv().is_err());
}

#[tokio::test]
async fn test_account_sign_up_sign_out_sign_in() {
    let auth = InMemoryAuthProvider::new();
    let documents = InMemoryDocumentStore::new();
    let env = AccountEnvironment::new(
        Arc::new(auth.clone()),
        Arc::new(documents.clone()),
        Arc::new(InMemoryAssetUploader::default()),
    );
    let store = Store::new(AccountState::new(), AccountReducer::new(), env);

    let form = SignUpForm {
        email: "grace@example.com".to_string(),
        password: "cobol-59".to_string(),
        confirm_password: "cobol-59".to_string(),
        full_name: "Grace Hopper".to_string(),
        is_event_manager: true,
        company_name: "Navy Events".to_string(),
        ..SignUpForm::default()
    };
    store.send(AccountAction::SignUp { form }).await.unwrap().wait().await;

    assert_eq!(store.state(AccountState::greeting_name).await, "Grace Hopper");
    assert!(auth.current_user().is_some());
    assert_eq!(documents.len(), 1);

    store.send(AccountAction::SignOut).await.unwrap().wait().await;
    assert!(!store.state(AccountState::is_signed_in).await);
    assert!(auth.current_user().is_none());

    store
        .send(AccountAction::SignIn {
            email: "grace@example.com".to_string(),
            password: "cobol-59".to_string(),
        })
        .await
        .unwrap()
        .wait()
        .await;

    let notice = store.state(|s| s.notice.clone()).await;
    assert_eq!(notice.as_deref(), Some("Welcome back, Grace Hopper!"));
}
