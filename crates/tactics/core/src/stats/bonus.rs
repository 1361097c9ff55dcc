//! Bonus application following the layered stack architecture.
//!
//! A stack folds its bonuses in a fixed order:
//! Flat → %Inc → More → Clamp
//!
//! The stat aggregator chains several stacks (unit-faction, then
//! equipment-faction) so that each stage sees the output of the previous one.

/// A single bonus that can be applied to a stat value.
///
/// - **Flat**: Additive bonuses applied first (e.g., +5 attack from a tech)
/// - **Increased**: Fractions summed, then applied once (0.2 = +20%)
/// - **More**: Multipliers applied one after another (1.5 = ×1.5)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    Flat(f32),
    Increased(f32),
    More(f32),
}

impl Bonus {
    pub fn flat(value: f32) -> Self {
        Bonus::Flat(value)
    }

    /// Fractional increase (0.2 = +20%).
    pub fn increased(fraction: f32) -> Self {
        Bonus::Increased(fraction)
    }

    /// Sequential multiplier (1.5 = ×1.5).
    pub fn more(multiplier: f32) -> Self {
        Bonus::More(multiplier)
    }
}

/// A collection of bonuses applied in the correct order.
///
/// 1. Flat bonuses (summed)
/// 2. Increased bonuses (summed, then multiplied once)
/// 3. More multipliers (applied sequentially)
/// 4. Clamp to bounds
///
/// # Example
/// ```
/// # use tactics_core::stats::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::flat(2.0));
/// stack.add(Bonus::increased(0.25));
/// stack.add(Bonus::increased(0.25));
///
/// // (10 + 2) × 1.5
/// assert_eq!(stack.apply_unclamped(10.0), 18.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        self.bonuses.extend(bonuses);
    }

    /// Sum of all flat bonuses.
    pub fn flat_sum(&self) -> f32 {
        self.bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Flat(v) => Some(*v),
                _ => None,
            })
            .sum()
    }

    /// Sum of all increased fractions.
    pub fn increased_sum(&self) -> f32 {
        self.bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Increased(p) => Some(*p),
                _ => None,
            })
            .sum()
    }

    /// Product of all More multipliers (1.0 when there are none).
    pub fn more_product(&self) -> f32 {
        self.bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::More(m) => Some(*m),
                _ => None,
            })
            .product()
    }

    /// Apply all bonuses to a base value with clamping.
    ///
    /// # Formula
    ///
    /// ```text
    /// result = clamp((base + flat_sum) × (1 + inc_sum) × more_product, min, max)
    /// ```
    pub fn apply(&self, base: f32, bounds: StatBounds) -> f32 {
        let after_inc = (base + self.flat_sum()) * (1.0 + self.increased_sum());
        let after_more = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::More(m) => Some(*m),
                _ => None,
            })
            .fold(after_inc, |acc, multiplier| acc * multiplier);
        after_more.clamp(bounds.min, bounds.max)
    }

    pub fn apply_unclamped(&self, base: f32) -> f32 {
        self.apply(base, StatBounds::UNCLAMPED)
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }
}

/// Builder helpers for constructing stacks fluently.
impl BonusStack {
    pub fn flat(mut self, value: f32) -> Self {
        self.add(Bonus::flat(value));
        self
    }

    pub fn increased(mut self, fraction: f32) -> Self {
        self.add(Bonus::increased(fraction));
        self
    }

    pub fn more(mut self, multiplier: f32) -> Self {
        self.add(Bonus::more(multiplier));
        self
    }
}

/// Clamping bounds for a stat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatBounds {
    pub min: f32,
    pub max: f32,
}

impl StatBounds {
    /// Attack and defense: never negative.
    pub const COMBAT: Self = Self {
        min: 0.0,
        max: 99_999.0,
    };

    /// Maximum health: at least 1 so a spawned unit is alive.
    pub const HEALTH: Self = Self {
        min: 1.0,
        max: 999_999.0,
    };

    /// Range and movement speed.
    pub const DISTANCE: Self = Self {
        min: 0.0,
        max: 10_000.0,
    };

    pub const UNCLAMPED: Self = Self {
        min: f32::MIN,
        max: f32::MAX,
    };
}
