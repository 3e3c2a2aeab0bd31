//! # Tilegrid
//!
//! Terrain substrate for tank arenas.
//!
//! The arena floor is a fixed-size grid of [`TileType`] cells. Each tile type
//! is classified along two independent axes, destructible and collidable,
//! exposed through [`TileFlags`] and the stateless helpers
//! [`is_tile_destructible`] and [`is_tile_collidable`].
//!
//! - [`Grid`]: row-major tile storage with bounds-checked lookups
//! - [`LevelBuilder`]: produces a fresh [`Grid`] for a level number
//!
//! ## Quick Start
//!
//! ```
//! use tilegrid::{Grid, TileType, is_tile_collidable};
//!
//! let grid = Grid::from_ascii(&[
//!     "..#",
//!     ".@.",
//!     "...",
//! ]).unwrap();
//!
//! assert_eq!(grid.tile_at(2, 0).unwrap(), TileType::Bricks);
//! assert!(is_tile_collidable(grid.tile_at(1, 1).unwrap()));
//! assert!(grid.tile_at(3, 0).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod grid;
pub mod tile;

pub use builder::{FixedLevelBuilder, LevelBuilder, ProceduralLevelBuilder};
pub use grid::{Grid, GridError, TemplateError};
pub use tile::{is_tile_collidable, is_tile_destructible, TileFlags, TileType};
