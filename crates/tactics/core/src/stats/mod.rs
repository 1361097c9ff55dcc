//! Stat system.
//!
//! ```text
//! [ Base + Equipment + Abilities ]
//!      ↓
//! [ Unit-template faction bonuses ]
//!      ↓
//! [ Equipment-template faction bonuses ]
//!      ↓
//! [ Round ]
//! ```

pub mod aggregate;
pub mod bonus;
pub mod faction;

pub use aggregate::{
    BaseStats, CombatStats, StatBonuses, StatInputs, StatKind, StatModifier, aggregate,
};
pub use bonus::{Bonus, BonusStack, StatBounds};
pub use faction::Faction;
