//! Checkout screen: ticket selection for one event and order placement.

use crate::catalog::{Catalog, EventListing};
use crate::gateway::{CheckoutGateway, OrderConfirmation, OrderRequest};
use crate::selection::{OrderLine, SelectionState};
use crate::types::{ItemId, Money};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ticketbook_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};

/// State of the checkout screen for one event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutState {
    /// Event being purchased, with its ticket tiers
    pub event: EventListing,
    /// Quantities chosen so far
    pub selection: SelectionState,
    /// Whether an order is with the gateway
    pub processing: bool,
    /// Most recent successful order
    pub last_confirmation: Option<OrderConfirmation>,
    /// Last rejection or gateway failure, for display
    pub last_error: Option<String>,
}

impl CheckoutState {
    /// Fresh checkout for `event` with nothing selected
    #[must_use]
    pub fn new(event: EventListing) -> Self {
        Self {
            event,
            selection: SelectionState::new(),
            processing: false,
            last_confirmation: None,
            last_error: None,
        }
    }

    /// Ticket tiers on sale
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.event.ticket_types
    }

    /// Current order total
    #[must_use]
    pub fn total(&self) -> Money {
        self.selection.compute_total(self.catalog())
    }

    /// Selected quantity of one tier
    #[must_use]
    pub fn quantity(&self, item_id: &ItemId) -> u32 {
        self.selection.current_quantity(item_id)
    }

    /// Lines that would be ordered, in catalog order
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.selection.order_lines(self.catalog())
    }

    /// Whether the checkout button is enabled
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        !self.processing && !self.total().is_zero()
    }
}

/// Inputs of the checkout screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutAction {
    // Commands
    /// Replace the quantity of a tier (negative requests store zero)
    SetQuantity {
        /// Tier
        item_id: ItemId,
        /// Requested quantity
        quantity: i64,
    },
    /// Add one ticket of a tier
    IncrementQuantity {
        /// Tier
        item_id: ItemId,
    },
    /// Remove one ticket of a tier, stopping at zero
    DecrementQuantity {
        /// Tier
        item_id: ItemId,
    },
    /// Submit the current selection as an order
    ProceedToCheckout,

    // Effect results
    /// The gateway accepted the order
    ///
    /// Clears the whole selection, including quantities edited while the
    /// order was processing.
    CheckoutCompleted {
        /// Gateway receipt
        confirmation: OrderConfirmation,
    },
    /// The gateway refused the order or failed
    CheckoutFailed {
        /// Human-readable reason
        reason: String,
    },
}

/// Collaborators of the checkout reducer
#[derive(Clone)]
pub struct CheckoutEnvironment {
    /// Clock stamping submitted orders
    pub clock: Arc<dyn Clock>,
    /// Gateway placing orders
    pub gateway: Arc<dyn CheckoutGateway>,
}

impl CheckoutEnvironment {
    /// Creates a new `CheckoutEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, gateway: Arc<dyn CheckoutGateway>) -> Self {
        Self { clock, gateway }
    }
}

/// Reducer for the checkout screen
#[derive(Clone, Debug, Default)]
pub struct CheckoutReducer;

impl CheckoutReducer {
    /// Creates a new `CheckoutReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_checkout(state: &CheckoutState) -> Result<(), String> {
        if state.processing {
            return Err("A checkout is already in progress".to_string());
        }

        if state.total().is_zero() {
            return Err("Please select at least one ticket".to_string());
        }

        Ok(())
    }

    fn submit(state: &CheckoutState, env: &CheckoutEnvironment) -> Effect<CheckoutAction> {
        let order = OrderRequest {
            event_id: state.event.id.clone(),
            lines: state.order_lines(),
            total: state.total(),
            submitted_at: env.clock.now(),
        };
        let gateway = Arc::clone(&env.gateway);

        Effect::future(async move {
            tracing::info!(
                event_id = %order.event_id,
                total = order.total.cents(),
                lines = order.lines.len(),
                "Submitting order"
            );

            match gateway.submit(order).await {
                Ok(confirmation) => Some(CheckoutAction::CheckoutCompleted { confirmation }),
                Err(error) => {
                    tracing::warn!(%error, "Checkout failed");
                    Some(CheckoutAction::CheckoutFailed {
                        reason: error.to_string(),
                    })
                },
            }
        })
    }
}

impl Reducer for CheckoutReducer {
    type State = CheckoutState;
    type Action = CheckoutAction;
    type Environment = CheckoutEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CheckoutAction::SetQuantity { item_id, quantity } => {
                state.selection.set_quantity(&item_id, quantity);
                SmallVec::new()
            },
            CheckoutAction::IncrementQuantity { item_id } => {
                state.selection.increment_quantity(&item_id);
                SmallVec::new()
            },
            CheckoutAction::DecrementQuantity { item_id } => {
                state.selection.decrement_quantity(&item_id);
                SmallVec::new()
            },

            CheckoutAction::ProceedToCheckout => {
                if let Err(error) = Self::validate_checkout(state) {
                    state.last_error = Some(error);
                    return SmallVec::new();
                }

                state.processing = true;
                state.last_error = None;
                smallvec![Self::submit(state, env)]
            },

            // Results only apply to the order in flight
            CheckoutAction::CheckoutCompleted { .. } | CheckoutAction::CheckoutFailed { .. }
                if !state.processing =>
            {
                tracing::debug!("Ignoring checkout result with no order in flight");
                SmallVec::new()
            },
            CheckoutAction::CheckoutCompleted { confirmation } => {
                state.processing = false;
                state.selection.clear();
                state.last_confirmation = Some(confirmation);
                state.last_error = None;
                SmallVec::new()
            },
            CheckoutAction::CheckoutFailed { reason } => {
                state.processing = false;
                state.last_error = Some(reason);
                SmallVec::new()
            },
        }
    }
}
