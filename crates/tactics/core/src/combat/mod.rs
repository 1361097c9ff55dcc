//! Combat resolution primitives.
//!
//! - `damage`: the damage formula and its tile/flank/elevation modifiers
//! - `engagement`: attack legality and weapon-mode selection
//! - `result`: attack outcome types
//!
//! Everything here is pure; the [`Battlefield`](crate::Battlefield) applies
//! the results to unit state.

pub mod damage;
pub mod engagement;
pub mod error;
pub mod result;

pub use damage::{
    DamageBreakdown, DamageInputs, calculate_damage, elevation_multiplier, flank_multiplier,
    tile_bonus,
};
pub use engagement::{AttackPlan, check_attack, plan_attack, select_mode};
pub use error::AttackError;
pub use result::{AttackOutcome, Strike};
