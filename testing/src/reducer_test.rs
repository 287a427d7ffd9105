//! Ergonomic testing utilities for reducers
//!
//! A fluent Given-When-Then API that reduces one or more actions in order.
//! State assertions see the final state; effect assertions see the effects
//! returned for the last action.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use ticketbook_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// ReducerTest::new(InboxReducer::new())
///     .with_env(test_env())
///     .given_state(InboxState::new(seed::notifications()))
///     .when_action(InboxAction::ClearAll)
///     .then_state(|state| assert!(state.is_empty()))
///     .then_effects(assertions::assert_no_effects)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Add an action to apply (When)
    ///
    /// May be called repeatedly; actions are reduced in order and effect
    /// assertions see the effects of the last one.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting effects (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        assert!(
            !self.actions.is_empty(),
            "At least one action must be set with when_action()"
        );

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use ticketbook_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect would do work when executed.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }

    /// Assert that effects contain at least one Delay effect
    ///
    /// # Panics
    ///
    /// Panics if no Delay effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_delay_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Delay { .. })),
            "Expected at least one Delay effect, but none found"
        );
    }
}

/// Resolving effect descriptions in tests that run without a Store
pub mod effects {
    use ticketbook_core::effect::Effect;

    /// Drive an effect to completion and collect the actions it produces
    ///
    /// Delays are not waited on; their action is returned immediately.
    /// Parallel branches are resolved in declaration order.
    pub async fn resolve<A>(effect: Effect<A>) -> Vec<A> {
        let mut produced = Vec::new();
        let mut pending = vec![effect];

        while let Some(effect) = pending.pop() {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => produced.extend(fut.await),
                Effect::Delay { action, .. } => produced.push(*action),
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    pending.extend(effects.into_iter().rev());
                },
            }
        }

        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketbook_core::{SmallVec, smallvec};

    #[derive(Clone, Debug)]
    struct TestState {
        seats: u32,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum TestAction {
        Add,
        Remove,
        Confirm,
        Confirmed,
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Add => {
                    state.seats += 1;
                    smallvec![Effect::None]
                },
                TestAction::Remove => {
                    state.seats = state.seats.saturating_sub(1);
                    smallvec![Effect::None]
                },
                TestAction::Confirm => {
                    smallvec![Effect::future(async { Some(TestAction::Confirmed) })]
                },
                TestAction::Confirmed => SmallVec::new(),
            }
        }
    }

    #[test]
    fn test_reducer_test_single_action() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { seats: 0 })
            .when_action(TestAction::Add)
            .then_state(|state| {
                assert_eq!(state.seats, 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_reducer_test_action_sequence() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { seats: 0 })
            .when_action(TestAction::Add)
            .when_action(TestAction::Add)
            .when_action(TestAction::Remove)
            .then_state(|state| {
                assert_eq!(state.seats, 1);
            })
            .run();
    }

    #[test]
    fn test_effects_come_from_last_action() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { seats: 0 })
            .when_action(TestAction::Confirm)
            .when_action(TestAction::Add)
            .then_state(|state| assert_eq!(state.seats, 1))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assert!(matches!(effects[0], Effect::None));
            })
            .run();
    }

    #[test]
    fn test_assertions_effects_count() {
        assertions::assert_effects_count(&[Effect::<TestAction>::None], 1);
        assertions::assert_effects_count::<TestAction>(&[], 0);
    }

    #[tokio::test]
    async fn test_resolve_future_effect() {
        let mut state = TestState { seats: 0 };
        let returned = TestReducer.reduce(&mut state, TestAction::Confirm, &TestEnv);
        assertions::assert_has_future_effect(&returned);

        let mut produced = Vec::new();
        for effect in returned {
            produced.extend(effects::resolve(effect).await);
        }
        assert_eq!(produced, vec![TestAction::Confirmed]);
    }
}
