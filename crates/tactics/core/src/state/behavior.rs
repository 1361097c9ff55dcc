//! Behaviour state machine.
//!
//! ```text
//! Idle <-> Moving <-> Attacking <-> Defending
//!   \________|___________|_____________/
//!            v (morale 0 in battle, or low health)
//!         Routing --(morale restored)--> Idle
//!            |
//!   any ---> Dead (health 0, terminal)
//! ```

use super::common::{Position, TileIndex, UnitId};
use crate::error::{ErrorSeverity, GameError};

/// Current behaviour of a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorState {
    #[default]
    Idle,
    Moving {
        destination: Option<TileIndex>,
    },
    Attacking {
        target: UnitId,
    },
    Defending,
    Routing,
    Dead,
}

impl BehaviorState {
    pub fn is_dead(&self) -> bool {
        matches!(self, BehaviorState::Dead)
    }

    pub fn is_routing(&self) -> bool {
        matches!(self, BehaviorState::Routing)
    }

    pub fn target(&self) -> Option<UnitId> {
        match self {
            BehaviorState::Attacking { target } => Some(*target),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Idle => "idle",
            BehaviorState::Moving { .. } => "moving",
            BehaviorState::Attacking { .. } => "attacking",
            BehaviorState::Defending => "defending",
            BehaviorState::Routing => "routing",
            BehaviorState::Dead => "dead",
        }
    }

    /// Whether `self -> next` is a legal transition.
    ///
    /// Dead is terminal. Routing may only recover to Idle or die; every other
    /// state may move freely between the active states or into Routing/Dead.
    pub fn can_transition_to(&self, next: &BehaviorState) -> bool {
        match (self, next) {
            (BehaviorState::Dead, _) => false,
            (BehaviorState::Routing, BehaviorState::Idle | BehaviorState::Dead) => true,
            (BehaviorState::Routing, _) => false,
            _ => true,
        }
    }
}

/// Which weapon the next attack uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngagementMode {
    #[default]
    Melee,
    Ranged,
}

/// Behaviour component: state plus the throttled caches that the tick loop
/// maintains.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Behavior {
    pub state: BehaviorState,
    /// Last computed engagement mode; refreshed on a timer and on demand.
    pub engagement: EngagementMode,
    /// Seconds until the engagement mode is recomputed.
    pub engagement_refresh_in: f32,
    /// Point a routing unit is running from.
    pub flee_from: Option<Position>,
    /// Seconds until the flee direction is recomputed.
    pub flee_refresh_in: f32,
    /// Tile the current move started from.
    pub move_origin: Option<TileIndex>,
}

impl Behavior {
    /// Applies a transition. Returns the previous state on success.
    pub fn transition(&mut self, next: BehaviorState) -> Result<BehaviorState, StateError> {
        if !self.state.can_transition_to(&next) {
            return Err(StateError::IllegalTransition {
                from: self.state.name(),
                to: next.name(),
            });
        }
        let previous = self.state;
        self.state = next;
        if !next.is_routing() {
            self.flee_from = None;
            self.flee_refresh_in = 0.0;
        }
        if !matches!(next, BehaviorState::Moving { .. }) {
            self.move_origin = None;
        }
        Ok(previous)
    }
}

/// Rejected behaviour transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("cannot transition from {from} to {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            StateError::IllegalTransition { .. } => "STATE_ILLEGAL_TRANSITION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_is_terminal() {
        let mut behavior = Behavior {
            state: BehaviorState::Dead,
            ..Behavior::default()
        };
        assert!(behavior.transition(BehaviorState::Idle).is_err());
        assert!(behavior.transition(BehaviorState::Routing).is_err());
        assert_eq!(behavior.state, BehaviorState::Dead);
    }

    #[test]
    fn routing_only_recovers_to_idle() {
        let mut behavior = Behavior::default();
        behavior.transition(BehaviorState::Routing).unwrap();
        assert!(
            behavior
                .transition(BehaviorState::Attacking { target: UnitId(2) })
                .is_err()
        );
        assert_eq!(
            behavior.transition(BehaviorState::Idle),
            Ok(BehaviorState::Routing)
        );
    }

    #[test]
    fn leaving_routing_clears_flee_cache() {
        let mut behavior = Behavior::default();
        behavior.transition(BehaviorState::Routing).unwrap();
        behavior.flee_from = Some(Position::ORIGIN);
        behavior.transition(BehaviorState::Idle).unwrap();
        assert!(behavior.flee_from.is_none());
    }
}
