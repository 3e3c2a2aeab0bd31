//! Tile types and their terrain classification.
//!
//! Every [`TileType`] maps to a fixed set of [`TileFlags`]. The mapping is
//! stateless: two tiles of the same type always classify the same way,
//! regardless of where they sit on the grid.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Terrain classification axes.
    ///
    /// The axes are independent: a tile may be destructible without being
    /// collidable and vice versa. The empty tile carries neither flag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TileFlags: u8 {
        /// Tile can be removed from the grid.
        const DESTRUCTIBLE = 0b0000_0001;
        /// Tile blocks entity occupancy.
        const COLLIDABLE = 0b0000_0010;
    }
}

/// Terrain occupying a single grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Empty floor.
    #[default]
    Null,
    /// Brick wall, blocks movement and can be shot away.
    Bricks,
    /// Steel wall, blocks movement and cannot be removed.
    Steel,
    /// Water, impassable for tanks.
    Water,
    /// Foliage, purely cosmetic.
    Bushes,
    /// Ice floor.
    Ice,
}

impl TileType {
    /// All tile types, in declaration order.
    pub const ALL: [TileType; 6] = [
        Self::Null,
        Self::Bricks,
        Self::Steel,
        Self::Water,
        Self::Bushes,
        Self::Ice,
    ];

    /// Returns the classification flags of this tile type.
    #[must_use]
    pub const fn flags(self) -> TileFlags {
        match self {
            Self::Bricks => TileFlags::DESTRUCTIBLE.union(TileFlags::COLLIDABLE),
            Self::Steel | Self::Water => TileFlags::COLLIDABLE,
            Self::Null | Self::Bushes | Self::Ice => TileFlags::empty(),
        }
    }

    /// Returns `true` for the distinguished empty tile.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Null)
    }

    /// ASCII glyph used by [`crate::Grid::from_ascii`] and `Display`.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Null => '.',
            Self::Bricks => '#',
            Self::Steel => '@',
            Self::Water => '~',
            Self::Bushes => '%',
            Self::Ice => '-',
        }
    }

    /// Parses an ASCII glyph back into a tile type.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Self::Null),
            '#' => Some(Self::Bricks),
            '@' => Some(Self::Steel),
            '~' => Some(Self::Water),
            '%' => Some(Self::Bushes),
            '-' => Some(Self::Ice),
            _ => None,
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bricks => write!(f, "Bricks"),
            Self::Steel => write!(f, "Steel"),
            Self::Water => write!(f, "Water"),
            Self::Bushes => write!(f, "Bushes"),
            Self::Ice => write!(f, "Ice"),
        }
    }
}

/// Returns `true` if the tile can be deleted from the grid.
#[must_use]
pub const fn is_tile_destructible(tile: TileType) -> bool {
    tile.flags().contains(TileFlags::DESTRUCTIBLE)
}

/// Returns `true` if the tile blocks entity occupancy.
#[must_use]
pub const fn is_tile_collidable(tile: TileType) -> bool {
    tile.flags().contains(TileFlags::COLLIDABLE)
}
