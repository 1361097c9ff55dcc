use std::fmt;

/// Unique identifier for a unit tracked by the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owning faction (player, AI empire, wildlife).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactionId(pub u16);

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction:{}", self.0)
    }
}

/// Index of a tile in the external world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileIndex(pub u32);

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile:{}", self.0)
    }
}

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

content_id!(
    /// Key of a unit template in the content catalog.
    TemplateId
);
content_id!(
    /// Key of an equipment item definition.
    ItemId
);
content_id!(
    /// Key of an ability definition.
    AbilityId
);
content_id!(
    /// Key of a research technology or culture that grants faction bonuses.
    BonusSourceId
);

/// Continuous world-space location of a unit.
///
/// `x`/`y` span the battlefield plane; `elevation` is height above the
/// reference plane and only feeds the elevation damage modifier.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub elevation: f32,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        elevation: 0.0,
    };

    pub const fn new(x: f32, y: f32, elevation: f32) -> Self {
        Self { x, y, elevation }
    }

    /// Planar Euclidean distance (elevation ignored).
    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, h{:.1})", self.x, self.y, self.elevation)
    }
}

/// Axis-aligned battlefield rectangle that routing units may not leave.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BattleBounds {
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.x >= self.min_x
            && position.x <= self.max_x
            && position.y >= self.min_y
            && position.y <= self.max_y
    }

    /// Clamps the planar coordinates into the rectangle, keeping elevation.
    pub fn clamp(&self, position: Position) -> Position {
        Position {
            x: position.x.clamp(self.min_x, self.max_x),
            y: position.y.clamp(self.min_y, self.max_y),
            elevation: position.elevation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_ignores_elevation() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 50.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn bounds_clamp_keeps_elevation() {
        let bounds = BattleBounds::new(0.0, 0.0, 10.0, 10.0);
        let clamped = bounds.clamp(Position::new(-3.0, 12.0, 2.0));
        assert_eq!(clamped, Position::new(0.0, 10.0, 2.0));
        assert!(bounds.contains(&clamped));
    }
}
