//! Ticketbook demo binary
//!
//! Walks through the checkout, inbox and account flows against the simulated
//! gateway and in-memory account backends.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use ticketbook_core::environment::SystemClock;
use ticketbook_runtime::Store;
use ticketing::account::mocks::{InMemoryAssetUploader, InMemoryAuthProvider, InMemoryDocumentStore};
use ticketing::account::{AccountAction, AccountEnvironment, AccountReducer, AccountState, SignUpForm};
use ticketing::{
    CheckoutAction, CheckoutEnvironment, CheckoutReducer, CheckoutState, Config, InboxAction,
    InboxReducer, InboxState, ItemId, SimulatedCheckoutGateway, TicketCategory, TicketFilter,
    filter_tickets, search_categories, seed,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(?config, "Starting Ticketbook demo");

    let greeting_name = run_account().await?;
    run_browse(&greeting_name);
    run_checkout(&config).await?;
    run_inbox(&config).await?;

    println!("\n=== Demo complete ===");
    Ok(())
}

async fn run_account() -> anyhow::Result<String> {
    println!("=== Account ===");

    let env = AccountEnvironment::new(
        Arc::new(InMemoryAuthProvider::new()),
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(InMemoryAssetUploader::default()),
    );
    let store = Store::new(AccountState::new(), AccountReducer::new(), env);

    let form = SignUpForm {
        email: "ada@example.com".to_string(),
        password: "analytical".to_string(),
        confirm_password: "analytical".to_string(),
        full_name: "Ada Lovelace".to_string(),
        is_event_manager: true,
        company_name: "Analytical Events".to_string(),
        event_experience: "Ten years of engine demos".to_string(),
        avatar_uri: Some("file:///photos/ada.jpg".to_string()),
    };
    store
        .send(AccountAction::SignUp { form })
        .await
        .context("sign-up rejected")?
        .wait()
        .await;
    report_account(&store).await;

    store.send(AccountAction::SignOut).await?.wait().await;
    store
        .send(AccountAction::SignIn {
            email: "ada@example.com".to_string(),
            password: "analytical".to_string(),
        })
        .await?
        .wait()
        .await;
    report_account(&store).await;

    let greeting_name = store.state(AccountState::greeting_name).await;
    store.shutdown(SHUTDOWN_TIMEOUT).await?;
    Ok(greeting_name)
}

async fn report_account(store: &Store<AccountState, AccountAction, AccountEnvironment, AccountReducer>) {
    let (notice, error) = store
        .state(|s| (s.notice.clone(), s.last_error.clone()))
        .await;
    match (notice, error) {
        (_, Some(error)) => println!("  error: {error}"),
        (Some(notice), None) => println!("  {notice}"),
        (None, None) => {},
    }
}

fn run_browse(greeting_name: &str) {
    println!("\n=== Browse ===");

    let feed = seed::home_feed(Some(greeting_name));
    println!("  Hello, {}! {} featured events", feed.greeting_name, feed.featured.len());

    let listings = seed::ticket_listings();
    for listing in filter_tickets(&listings, TicketFilter::Category(TicketCategory::Music)) {
        println!("  [{}] {} from {}", listing.category, listing.event_name, listing.price);
    }

    let categories = seed::event_categories();
    let matches: Vec<_> = search_categories(&categories, "o").map(|c| c.name.as_str()).collect();
    println!("  Categories matching \"o\": {}", matches.join(", "));
}

async fn run_checkout(config: &Config) -> anyhow::Result<()> {
    println!("\n=== Checkout ===");

    let env = CheckoutEnvironment::new(
        Arc::new(SystemClock),
        SimulatedCheckoutGateway::new(config.checkout.processing_delay()).shared(),
    );
    let store = Store::new(
        CheckoutState::new(seed::techconf_listing()),
        CheckoutReducer::new(),
        env,
    );

    for (tier, clicks) in [("1", 2), ("2", 1)] {
        for _ in 0..clicks {
            store
                .send(CheckoutAction::IncrementQuantity {
                    item_id: ItemId::from(tier),
                })
                .await?;
        }
    }
    store
        .send(CheckoutAction::DecrementQuantity {
            item_id: ItemId::from("3"),
        })
        .await?;

    let (lines, total) = store.state(|s| (s.order_lines(), s.total())).await;
    for line in &lines {
        println!("  {} x {} = {}", line.quantity, line.name, line.subtotal);
    }
    println!("  Total: {total}");

    println!("  Processing payment...");
    store.send(CheckoutAction::ProceedToCheckout).await?.wait().await;

    let (confirmation, error) = store
        .state(|s| (s.last_confirmation.clone(), s.last_error.clone()))
        .await;
    match (confirmation, error) {
        (Some(confirmation), None) => println!(
            "  Order {} confirmed: {} tickets, {}",
            confirmation.order_id, confirmation.ticket_count, confirmation.total
        ),
        (_, error) => println!("  Checkout failed: {}", error.unwrap_or_default()),
    }

    store.shutdown(SHUTDOWN_TIMEOUT).await?;
    Ok(())
}

async fn run_inbox(config: &Config) -> anyhow::Result<()> {
    println!("\n=== Inbox ===");

    let store = Store::new(
        InboxState::new(seed::notifications()),
        InboxReducer::new(),
        config.notifications.inbox_environment(),
    );
    println!("  Unread: {}", store.state(InboxState::unread_count).await);

    store
        .send(InboxAction::SwipeChanged {
            id: "1".to_string(),
            offset: -90,
        })
        .await?;
    store.send(InboxAction::Delete { id: "2".to_string() }).await?;
    println!(
        "  After swipe and delete: {} shown, {} unread",
        store.state(|s| s.notifications.len()).await,
        store.state(InboxState::unread_count).await
    );

    let mut refresh = store.send(InboxAction::Refresh).await?;
    println!("  Refreshing: {}", store.state(|s| s.refreshing).await);
    refresh.wait().await;
    println!("  Refreshing: {}", store.state(|s| s.refreshing).await);

    store.shutdown(SHUTDOWN_TIMEOUT).await?;
    Ok(())
}
