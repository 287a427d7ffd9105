//! Checkout gateway used to place orders.
//!
//! The app never talks to a real payment processor: checkout is simulated by
//! waiting for a processing delay and confirming. The trait keeps that
//! swappable.

use crate::selection::OrderLine;
use crate::types::{EventId, Money, OrderId};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Checkout gateway result
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Checkout gateway error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The order was refused
    #[error("Order declined: {reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },
    /// An order with nothing to pay for reached the gateway
    #[error("Order is empty")]
    EmptyOrder,
}

/// Order submitted at checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Event the tickets are for
    pub event_id: EventId,
    /// Priced lines, in catalog order
    pub lines: Vec<OrderLine>,
    /// Order total
    pub total: Money,
    /// When the user confirmed
    pub submitted_at: DateTime<Utc>,
}

/// Accepted order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Identifier assigned by the gateway
    pub order_id: OrderId,
    /// Event the tickets are for
    pub event_id: EventId,
    /// Amount charged
    pub total: Money,
    /// Number of tickets purchased
    pub ticket_count: u64,
    /// When the order was placed
    pub placed_at: DateTime<Utc>,
}

/// Places orders
pub trait CheckoutGateway: Send + Sync {
    /// Submit an order for processing
    ///
    /// # Errors
    ///
    /// Returns error if the order is declined or processing fails
    fn submit(&self, order: OrderRequest) -> BoxFuture<'static, GatewayResult<OrderConfirmation>>;
}

#[derive(Clone, Debug)]
enum Outcome {
    Confirm,
    Decline(String),
}

/// Gateway that waits a fixed processing delay, then answers
///
/// Confirms every non-empty order unless built with [`Self::declining`].
#[derive(Clone, Debug)]
pub struct SimulatedCheckoutGateway {
    processing_delay: Duration,
    outcome: Outcome,
}

impl SimulatedCheckoutGateway {
    /// Creates a gateway that confirms after `processing_delay`
    #[must_use]
    pub const fn new(processing_delay: Duration) -> Self {
        Self {
            processing_delay,
            outcome: Outcome::Confirm,
        }
    }

    /// Creates a gateway that declines every order with `reason`
    #[must_use]
    pub fn declining(processing_delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            processing_delay,
            outcome: Outcome::Decline(reason.into()),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(self) -> Arc<dyn CheckoutGateway> {
        Arc::new(self)
    }
}

impl CheckoutGateway for SimulatedCheckoutGateway {
    fn submit(&self, order: OrderRequest) -> BoxFuture<'static, GatewayResult<OrderConfirmation>> {
        let delay = self.processing_delay;
        let outcome = self.outcome.clone();
        async move {
            tokio::time::sleep(delay).await;

            if order.total.is_zero() || order.lines.is_empty() {
                return Err(GatewayError::EmptyOrder);
            }

            if let Outcome::Decline(reason) = outcome {
                tracing::warn!(event_id = %order.event_id, %reason, "Simulated order declined");
                return Err(GatewayError::Declined { reason });
            }

            let confirmation = OrderConfirmation {
                order_id: OrderId::new(),
                ticket_count: order.lines.iter().map(|line| u64::from(line.quantity)).sum(),
                event_id: order.event_id,
                total: order.total,
                placed_at: order.submitted_at,
            };

            tracing::info!(
                order_id = %confirmation.order_id,
                event_id = %confirmation.event_id,
                total = confirmation.total.cents(),
                tickets = confirmation.ticket_count,
                "Simulated order confirmed"
            );

            Ok(confirmation)
        }
        .boxed()
    }
}
