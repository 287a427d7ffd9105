//! Notification inbox: read state, swipe-to-read, deletion and pull-to-refresh.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use ticketbook_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// What a notification is about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Reminder for an upcoming event
    EventReminder,
    /// Price change on a watched listing
    PriceAlert,
    /// Event added to the user's calendar
    NewEvent,
}

/// One inbox entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Identifier, unique within the inbox
    pub id: String,
    /// Category
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Relative time label ("Yesterday")
    pub timestamp: String,
    /// Whether the user has seen it
    pub read: bool,
    /// Icon name
    #[serde(rename = "iconName")]
    pub icon: String,
}

/// Inbox contents and refresh indicator
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxState {
    /// Notifications, newest first
    pub notifications: Vec<Notification>,
    /// Whether a pull-to-refresh is running
    pub refreshing: bool,
}

impl InboxState {
    /// Inbox holding `notifications`
    #[must_use]
    pub const fn new(notifications: Vec<Notification>) -> Self {
        Self {
            notifications,
            refreshing: false,
        }
    }

    /// Looks up a notification
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Number of unread notifications
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Whether the inbox shows its empty state
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    fn mark_read(&mut self, id: &str) {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) {
            notification.read = true;
        }
    }
}

/// Inputs of the inbox screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InboxAction {
    /// Mark one notification as read
    MarkAsRead {
        /// Notification id
        id: String,
    },
    /// Remove one notification
    Delete {
        /// Notification id
        id: String,
    },
    /// Remove every notification (after the user confirmed)
    ClearAll,
    /// A row's horizontal swipe offset changed (negative is leftwards)
    SwipeChanged {
        /// Notification id
        id: String,
        /// Offset in points
        offset: i32,
    },
    /// Pull-to-refresh started
    Refresh,
    /// Pull-to-refresh finished
    RefreshCompleted,
}

/// Tunables of the inbox reducer
#[derive(Clone, Debug)]
pub struct InboxEnvironment {
    /// Leftward swipe distance past which a row counts as read
    pub swipe_read_threshold: u16,
    /// How long the refresh indicator spins
    pub refresh_delay: Duration,
}

impl InboxEnvironment {
    /// Creates a new `InboxEnvironment`
    #[must_use]
    pub const fn new(swipe_read_threshold: u16, refresh_delay: Duration) -> Self {
        Self {
            swipe_read_threshold,
            refresh_delay,
        }
    }

    fn swipe_marks_read(&self, offset: i32) -> bool {
        offset < -i32::from(self.swipe_read_threshold)
    }
}

impl Default for InboxEnvironment {
    fn default() -> Self {
        Self::new(75, Duration::from_secs(2))
    }
}

/// Reducer for the notification inbox
#[derive(Clone, Debug, Default)]
pub struct InboxReducer;

impl InboxReducer {
    /// Creates a new `InboxReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for InboxReducer {
    type State = InboxState;
    type Action = InboxAction;
    type Environment = InboxEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            InboxAction::MarkAsRead { id } => {
                state.mark_read(&id);
                SmallVec::new()
            },
            InboxAction::SwipeChanged { id, offset } => {
                if env.swipe_marks_read(offset) {
                    state.mark_read(&id);
                }
                SmallVec::new()
            },
            InboxAction::Delete { id } => {
                state.notifications.retain(|n| n.id != id);
                SmallVec::new()
            },
            InboxAction::ClearAll => {
                tracing::debug!(cleared = state.notifications.len(), "Clearing inbox");
                state.notifications.clear();
                SmallVec::new()
            },
            InboxAction::Refresh => {
                // One spinner at a time
                if state.refreshing {
                    return SmallVec::new();
                }
                state.refreshing = true;
                smallvec![Effect::delay(env.refresh_delay, InboxAction::RefreshCompleted)]
            },
            InboxAction::RefreshCompleted => {
                state.refreshing = false;
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use ticketbook_testing::{ReducerTest, assertions};

    fn seeded() -> InboxState {
        InboxState::new(seed::notifications())
    }

    fn id(raw: &str) -> String {
        raw.to_string()
    }

    #[test]
    fn seed_inbox_has_two_unread() {
        assert_eq!(seeded().unread_count(), 2);
    }

    #[test]
    fn mark_as_read_touches_only_target() {
        ReducerTest::new(InboxReducer::new())
            .with_env(InboxEnvironment::default())
            .given_state(seeded())
            .when_action(InboxAction::MarkAsRead { id: id("1") })
            .then_state(|state| {
                assert!(state.get("1").is_some_and(|n| n.read));
                assert!(state.get("3").is_some_and(|n| !n.read));
                assert_eq!(state.unread_count(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn unknown_ids_are_ignored() {
        ReducerTest::new(InboxReducer::new())
            .with_env(InboxEnvironment::default())
            .given_state(seeded())
            .when_action(InboxAction::MarkAsRead { id: id("404") })
            .when_action(InboxAction::Delete { id: id("404") })
            .then_state(|state| assert_eq!(state, &seeded()))
            .run();
    }

    #[test]
    fn swipe_marks_read_only_past_threshold() {
        ReducerTest::new(InboxReducer::new())
            .with_env(InboxEnvironment::default())
            .given_state(seeded())
            .when_action(InboxAction::SwipeChanged {
                id: id("1"),
                offset: -75,
            })
            .when_action(InboxAction::SwipeChanged {
                id: id("3"),
                offset: -76,
            })
            .then_state(|state| {
                assert!(state.get("1").is_some_and(|n| !n.read));
                assert!(state.get("3").is_some_and(|n| n.read));
            })
            .run();
    }

    #[test]
    fn delete_and_clear_all() {
        ReducerTest::new(InboxReducer::new())
            .with_env(InboxEnvironment::default())
            .given_state(seeded())
            .when_action(InboxAction::Delete { id: id("2") })
            .then_state(|state| {
                assert_eq!(state.notifications.len(), 2);
                assert!(state.get("2").is_none());
            })
            .run();

        ReducerTest::new(InboxReducer::new())
            .with_env(InboxEnvironment::default())
            .given_state(seeded())
            .when_action(InboxAction::ClearAll)
            .then_state(|state| {
                assert!(state.is_empty());
                assert_eq!(state.unread_count(), 0);
            })
            .run();
    }

    #[test]
    fn refresh_schedules_completion() {
        ReducerTest::new(InboxReducer::new())
            .with_env(InboxEnvironment::default())
            .given_state(seeded())
            .when_action(InboxAction::Refresh)
            .then_state(|state| assert!(state.refreshing))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_delay_effect(effects);
            })
            .run();
    }

    #[test]
    fn refresh_while_refreshing_is_ignored() {
        ReducerTest::new(InboxReducer::new())
            .with_env(InboxEnvironment::default())
            .given_state(seeded())
            .when_action(InboxAction::Refresh)
            .when_action(InboxAction::Refresh)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn refresh_completed_stops_spinner() {
        ReducerTest::new(InboxReducer::new())
            .with_env(InboxEnvironment::default())
            .given_state(seeded())
            .when_action(InboxAction::Refresh)
            .when_action(InboxAction::RefreshCompleted)
            .then_state(|state| assert!(!state.refreshing))
            .run();
    }

    #[test]
    fn notification_uses_app_field_names() {
        let json = serde_json::to_value(&seed::notifications()[1]).unwrap_or_default();
        assert_eq!(json["type"], "price_alert");
        assert_eq!(json["iconName"], "pricetag");
        assert_eq!(json["read"], true);
    }
}
