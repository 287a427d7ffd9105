//! Ticketbook - client-side core of an event-ticketing app
//!
//! Each screen with behaviour beyond display is a reducer driven by a
//! `ticketbook_runtime::Store`:
//!
//! - **Checkout**: ticket quantities per tier, live order total, order placement
//! - **Inbox**: notification read state, swipe-to-read, pull-to-refresh
//! - **Account**: sign-in, sign-up, sign-out and profile editing
//!
//! The browse screens (home feed, ticket list, category directory) are plain
//! data plus filtering, see [`catalog`] and [`seed`].
//!
//! # Order total
//!
//! The heart of checkout is [`SelectionState`]: a map from ticket tier to a
//! non-negative quantity whose total is
//!
//! ```text
//! total = Σ quantity(id) × unit_price(id)   over ids the catalog knows
//! ```
//!
//! computed exactly in cents. Negative requests are stored as zero and unknown
//! tiers contribute nothing, so no quantity operation can fail.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod gateway;
pub mod notifications;
pub mod seed;
pub mod selection;
pub mod types;

pub use catalog::{
    Catalog, CatalogItem, EventCategory, EventListing, HomeFeed, TicketCategory, TicketFilter,
    TicketListing, filter_tickets, search_categories,
};
pub use checkout::{CheckoutAction, CheckoutEnvironment, CheckoutReducer, CheckoutState};
pub use config::Config;
pub use gateway::{
    CheckoutGateway, GatewayError, OrderConfirmation, OrderRequest, SimulatedCheckoutGateway,
};
pub use notifications::{
    InboxAction, InboxEnvironment, InboxReducer, InboxState, Notification, NotificationKind,
};
pub use selection::{OrderLine, SelectionState};
pub use types::{EventId, ItemId, Money, OrderId, UserId};
