//! Location authorization state machine
//!
//! Pure transition function from (state, event) to (state, effects). The
//! caller performs the effects against the location service; nothing here
//! touches the platform.

use crate::platform::{AuthorizationState, LocationError};
use tracing::{debug, warn};

/// Input to the authorization machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationEvent {
    /// Screen came up; `current` is what the platform reports right now
    Initialize { current: AuthorizationState },
    /// Platform reported a new authorization
    Changed(AuthorizationState),
}

/// Request the caller must issue against the location service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationEffect {
    RequestPermission,
    RequestSingleFix,
}

/// Outcome of one transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AuthorizationState,
    pub effects: Vec<AuthorizationEffect>,
    /// Refusal to log, if the new state is a refusal
    pub refusal: Option<LocationError>,
}

/// Tunables for [`transition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizationPolicy {
    /// Treat a change to `AuthorizedAlways` like `AuthorizedWhenInUse`
    pub fix_on_always: bool,
}

fn refusal_for(state: AuthorizationState) -> Option<LocationError> {
    match state {
        AuthorizationState::Denied => Some(LocationError::PermissionDenied),
        AuthorizationState::Restricted => Some(LocationError::PermissionRestricted),
        _ => None,
    }
}

/// Compute the next state and the requests to issue
pub fn transition(
    state: AuthorizationState,
    event: AuthorizationEvent,
    policy: AuthorizationPolicy,
) -> Transition {
    match event {
        AuthorizationEvent::Initialize { current } => {
            let effects = if current.is_authorized() {
                vec![AuthorizationEffect::RequestSingleFix]
            } else {
                // Platform ignores this after a refusal
                vec![AuthorizationEffect::RequestPermission]
            };
            Transition {
                state: current,
                effects,
                refusal: refusal_for(current),
            }
        }
        AuthorizationEvent::Changed(new_state) => {
            let triggers_fix = match new_state {
                AuthorizationState::AuthorizedWhenInUse => true,
                AuthorizationState::AuthorizedAlways => policy.fix_on_always,
                _ => false,
            };
            if state == new_state {
                debug!(?state, "authorization unchanged");
            }
            Transition {
                state: new_state,
                effects: if triggers_fix {
                    vec![AuthorizationEffect::RequestSingleFix]
                } else {
                    Vec::new()
                },
                refusal: refusal_for(new_state),
            }
        }
    }
}

/// Authorization state owned by the screen, re-evaluated on every callback
#[derive(Debug, Clone, Default)]
pub struct AuthorizationMachine {
    state: AuthorizationState,
    policy: AuthorizationPolicy,
}

impl AuthorizationMachine {
    pub fn new(policy: AuthorizationPolicy) -> Self {
        Self {
            state: AuthorizationState::NotDetermined,
            policy,
        }
    }

    pub fn state(&self) -> AuthorizationState {
        self.state
    }

    /// Apply `event`, returning the requests to issue
    pub fn handle(&mut self, event: AuthorizationEvent) -> Vec<AuthorizationEffect> {
        let old_state = self.state;
        let outcome = transition(old_state, event, self.policy);

        if let Some(refusal) = &outcome.refusal {
            warn!(error = %refusal, "location access refused; no automatic retry");
        }
        debug!(?old_state, new_state = ?outcome.state, effects = ?outcome.effects, "authorization transition");

        self.state = outcome.state;
        outcome.effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::AuthorizationEffect::*;
    use crate::platform::AuthorizationState::*;

    const ALL_STATES: [AuthorizationState; 5] = [
        NotDetermined,
        Denied,
        Restricted,
        AuthorizedWhenInUse,
        AuthorizedAlways,
    ];

    fn init(current: AuthorizationState) -> Transition {
        transition(
            NotDetermined,
            AuthorizationEvent::Initialize { current },
            AuthorizationPolicy::default(),
        )
    }

    #[test]
    fn test_initialize_requests() {
        assert_eq!(init(NotDetermined).effects, vec![RequestPermission]);
        assert_eq!(init(Denied).effects, vec![RequestPermission]);
        assert_eq!(init(Restricted).effects, vec![RequestPermission]);
        assert_eq!(init(AuthorizedWhenInUse).effects, vec![RequestSingleFix]);
        assert_eq!(init(AuthorizedAlways).effects, vec![RequestSingleFix]);
    }

    #[test]
    fn test_initialize_adopts_current_state() {
        for state in ALL_STATES {
            assert_eq!(init(state).state, state);
        }
        assert_eq!(init(Restricted).refusal, Some(LocationError::PermissionRestricted));
        assert_eq!(init(Denied).refusal, Some(LocationError::PermissionDenied));
        assert_eq!(init(AuthorizedAlways).refusal, None);
    }

    #[test]
    fn test_only_when_in_use_change_requests_fix() {
        for from in ALL_STATES {
            for to in ALL_STATES {
                let outcome =
                    transition(from, AuthorizationEvent::Changed(to), AuthorizationPolicy::default());
                assert_eq!(outcome.state, to);
                if to == AuthorizedWhenInUse {
                    assert_eq!(outcome.effects, vec![RequestSingleFix]);
                } else {
                    assert!(outcome.effects.is_empty(), "{:?} -> {:?}", from, to);
                }
            }
        }
    }

    #[test]
    fn test_fix_on_always_policy() {
        let policy = AuthorizationPolicy { fix_on_always: true };
        let outcome = transition(NotDetermined, AuthorizationEvent::Changed(AuthorizedAlways), policy);
        assert_eq!(outcome.effects, vec![RequestSingleFix]);
    }

    #[test]
    fn test_not_determined_never_requests_fix() {
        let mut machine = AuthorizationMachine::default();
        let mut effects = machine.handle(AuthorizationEvent::Initialize { current: NotDetermined });
        effects.extend(machine.handle(AuthorizationEvent::Changed(NotDetermined)));
        effects.extend(machine.handle(AuthorizationEvent::Changed(Denied)));

        assert!(!effects.contains(&RequestSingleFix));
        assert_eq!(effects, vec![RequestPermission]);
    }

    #[test]
    fn test_denied_then_granted_requests_one_fix() {
        let mut machine = AuthorizationMachine::default();
        let mut effects = machine.handle(AuthorizationEvent::Initialize { current: NotDetermined });
        effects.extend(machine.handle(AuthorizationEvent::Changed(Denied)));
        assert_eq!(machine.state(), Denied);

        effects.extend(machine.handle(AuthorizationEvent::Changed(AuthorizedWhenInUse)));
        assert_eq!(machine.state(), AuthorizedWhenInUse);
        assert_eq!(effects.iter().filter(|&&e| e == RequestSingleFix).count(), 1);
    }
}
