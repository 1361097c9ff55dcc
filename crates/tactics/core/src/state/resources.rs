//! Fatigue and ammunition trackers.
//!
//! Both are small independent meters: fatigue changes continuously with the
//! behaviour state, ammunition changes in discrete steps.

use super::behavior::BehaviorState;
use crate::config::CombatConfig;

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Accumulated exertion in `[0, max_fatigue]`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fatigue {
    value: f32,
}

impl Fatigue {
    pub fn new(value: f32, config: &CombatConfig) -> Self {
        Self {
            value: value.clamp(0.0, config.max_fatigue),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Rate of change (per second) for the given behaviour state.
    ///
    /// Attacking and routing exert the most, moving less, idling recovers.
    pub fn rate_for(state: &BehaviorState, config: &CombatConfig) -> f32 {
        match state {
            BehaviorState::Attacking { .. } | BehaviorState::Routing => config.fatigue_attack_rate,
            BehaviorState::Moving { .. } => config.fatigue_move_rate,
            BehaviorState::Idle => -config.fatigue_recovery_rate,
            BehaviorState::Defending | BehaviorState::Dead => 0.0,
        }
    }

    /// Advances fatigue by `dt` seconds in `state`.
    pub fn advance(&mut self, state: &BehaviorState, dt: f32, config: &CombatConfig) {
        let rate = Self::rate_for(state, config);
        self.value = (self.value + rate * dt).clamp(0.0, config.max_fatigue);
    }

    /// Multiplier applied to attack, defense and movement speed.
    pub fn factor(&self, config: &CombatConfig) -> f32 {
        if config.max_fatigue <= 0.0 {
            return 1.0;
        }
        lerp(
            1.0,
            config.fatigue_penalty_factor,
            self.value / config.max_fatigue,
        )
    }
}

/// Ranged ammunition counter in `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ammo {
    current: u32,
    max: u32,
}

impl Ammo {
    /// Full magazine of `max` rounds.
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Spends one round. Returns `false` (and changes nothing) when empty.
    pub fn consume(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn resupply(&mut self) {
        self.current = self.max;
    }

    /// Changes the magazine size, keeping the current count within it.
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
        self.clamp_to_max();
    }

    pub fn clamp_to_max(&mut self) {
        self.current = self.current.min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UnitId;

    #[test]
    fn fatigue_accumulates_and_recovers_within_bounds() {
        let config = CombatConfig::default();
        let mut fatigue = Fatigue::default();

        fatigue.advance(
            &BehaviorState::Attacking { target: UnitId(1) },
            100.0,
            &config,
        );
        assert_eq!(fatigue.value(), config.max_fatigue);

        fatigue.advance(&BehaviorState::Idle, 1000.0, &config);
        assert_eq!(fatigue.value(), 0.0);
    }

    #[test]
    fn moving_is_slower_than_attacking() {
        let config = CombatConfig::default();
        let moving = Fatigue::rate_for(&BehaviorState::Moving { destination: None }, &config);
        let routing = Fatigue::rate_for(&BehaviorState::Routing, &config);
        assert!(moving > 0.0);
        assert!(routing > moving);
    }

    #[test]
    fn fatigue_factor_interpolates_to_penalty() {
        let config = CombatConfig::default();
        assert_eq!(Fatigue::new(0.0, &config).factor(&config), 1.0);
        assert_eq!(
            Fatigue::new(100.0, &config).factor(&config),
            config.fatigue_penalty_factor
        );
        let half = Fatigue::new(50.0, &config).factor(&config);
        assert!((half - 0.75).abs() < 1e-6);
    }

    #[test]
    fn empty_ammo_never_goes_negative() {
        let mut ammo = Ammo::full(1);
        assert!(ammo.consume());
        assert!(!ammo.consume());
        assert_eq!(ammo.current(), 0);

        ammo.resupply();
        assert_eq!(ammo.current(), 1);
        ammo.set_max(0);
        assert_eq!(ammo.current(), 0);
    }
}
