/// Combat tunables and compile-time capacity limits.
///
/// Every field has a default so content files may override only what they
/// care about.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Flat tile bonus granted to a defender standing on a hill.
    pub hill_defense_bonus: f32,
    /// Damage bonus per flanking unit (0.1 = +10% each).
    pub flank_bonus_per_ally: f32,
    /// Damage modifier per unit of elevation difference.
    pub elevation_step: f32,
    /// Absolute cap of the elevation modifier.
    pub elevation_cap: f32,

    /// Health fraction at or below which a damaged unit routs in battle.
    pub rout_health_fraction: f32,
    /// Distance under which a unit fights with its melee weapon.
    pub melee_engage_distance: f32,
    /// Attack multiplier for out-of-ammo melee fallback.
    pub melee_fallback_penalty: f32,

    pub max_fatigue: f32,
    /// Attack/defense/speed multiplier at maximum fatigue.
    pub fatigue_penalty_factor: f32,
    /// Fatigue gained per second while attacking or routing.
    pub fatigue_attack_rate: f32,
    /// Fatigue gained per second while moving.
    pub fatigue_move_rate: f32,
    /// Fatigue recovered per second while idle.
    pub fatigue_recovery_rate: f32,

    /// Seconds between engagement-mode refreshes.
    pub engagement_refresh_interval: f32,
    /// Seconds between flee-direction refreshes for routing units.
    pub flee_refresh_interval: f32,

    pub morale_recovery_per_turn: f32,
    pub kill_morale_bonus: f32,
    pub experience_per_damage: f32,
    /// Level `n` requires `n * experience_per_level` accumulated experience.
    pub experience_per_level: f32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_ABILITIES: usize = 16;
    pub const MAX_TRANSPORT_CAPACITY: usize = 12;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HILL_DEFENSE_BONUS: f32 = 2.0;
    pub const DEFAULT_FLANK_BONUS_PER_ALLY: f32 = 0.1;
    pub const DEFAULT_ELEVATION_STEP: f32 = 0.02;
    pub const DEFAULT_ELEVATION_CAP: f32 = 0.1;
    pub const DEFAULT_ROUT_HEALTH_FRACTION: f32 = 0.2;
    pub const DEFAULT_MELEE_ENGAGE_DISTANCE: f32 = 1.5;

    pub fn new() -> Self {
        Self {
            hill_defense_bonus: Self::DEFAULT_HILL_DEFENSE_BONUS,
            flank_bonus_per_ally: Self::DEFAULT_FLANK_BONUS_PER_ALLY,
            elevation_step: Self::DEFAULT_ELEVATION_STEP,
            elevation_cap: Self::DEFAULT_ELEVATION_CAP,
            rout_health_fraction: Self::DEFAULT_ROUT_HEALTH_FRACTION,
            melee_engage_distance: Self::DEFAULT_MELEE_ENGAGE_DISTANCE,
            melee_fallback_penalty: 0.5,
            max_fatigue: 100.0,
            fatigue_penalty_factor: 0.5,
            fatigue_attack_rate: 8.0,
            fatigue_move_rate: 3.0,
            fatigue_recovery_rate: 5.0,
            engagement_refresh_interval: 0.5,
            flee_refresh_interval: 1.0,
            morale_recovery_per_turn: 10.0,
            kill_morale_bonus: 10.0,
            experience_per_damage: 1.0,
            experience_per_level: 100.0,
        }
    }

    /// Experience needed to advance from `level` to `level + 1`.
    pub fn experience_for_next_level(&self, level: u32) -> f32 {
        level.max(1) as f32 * self.experience_per_level
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
