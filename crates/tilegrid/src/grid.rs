//! Fixed-size tile storage.
//!
//! A [`Grid`] is a `size_x` × `size_y` array of [`TileType`] stored in
//! row-major order. Lookups outside the grid fail with
//! [`GridError::OutOfGrid`]; callers decide whether that is fatal.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tile::TileType;

/// Errors raised by grid lookups and mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested coordinates lie outside the grid.
    #[error("tile ({x}, {y}) is outside the {size_x}x{size_y} grid")]
    OutOfGrid {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Grid width.
        size_x: u32,
        /// Grid height.
        size_y: u32,
    },
}

/// Errors raised when building a grid from an ASCII template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template has no rows or an empty first row.
    #[error("grid template is empty")]
    Empty,
    /// A row differs in width from the first row.
    #[error("row {row} has width {actual}, expected {expected}")]
    RaggedRow {
        /// Offending row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A glyph does not name any tile type.
    #[error("unknown tile glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph {
        /// The unrecognised character.
        glyph: char,
        /// Column of the glyph.
        x: usize,
        /// Row of the glyph.
        y: usize,
    },
}

/// Row-major grid of tiles.
///
/// # Example
///
/// ```
/// use tilegrid::{Grid, TileType};
///
/// let mut grid = Grid::new(4, 3);
/// grid.set_tile(1, 2, TileType::Steel).unwrap();
///
/// assert_eq!(grid.size_x(), 4);
/// assert_eq!(grid.size_y(), 3);
/// assert_eq!(grid.tile_at(1, 2), Ok(TileType::Steel));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size_x: u32,
    size_y: u32,
    tiles: Vec<TileType>,
}

impl Grid {
    /// Creates an all-empty grid.
    #[must_use]
    pub fn new(size_x: u32, size_y: u32) -> Self {
        let len = size_x as usize * size_y as usize;
        Self {
            size_x,
            size_y,
            tiles: vec![TileType::Null; len],
        }
    }

    /// Builds a grid from rows of tile glyphs (see [`TileType::glyph`]).
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the template is empty, ragged or
    /// contains an unknown glyph.
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Result<Self, TemplateError> {
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if width == 0 {
            return Err(TemplateError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual != width {
                return Err(TemplateError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile =
                    TileType::from_glyph(glyph).ok_or(TemplateError::UnknownGlyph { glyph, x, y })?;
                tiles.push(tile);
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        Ok(Self {
            size_x: width as u32,
            size_y: rows.len() as u32,
            tiles,
        })
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn size_y(&self) -> u32 {
        self.size_y
    }

    /// Returns `true` if `(x, y)` addresses a cell of this grid.
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x < self.size_x && y < self.size_y
    }

    /// Returns the tile at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfGrid`] if the coordinates are outside the grid.
    pub fn tile_at(&self, x: u32, y: u32) -> Result<TileType, GridError> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Overwrites the tile at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfGrid`] if the coordinates are outside the grid.
    pub fn set_tile(&mut self, x: u32, y: u32, tile: TileType) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.tiles[i] = tile;
        Ok(())
    }

    /// Clears the tile at `(x, y)` back to [`TileType::Null`].
    ///
    /// Classification is the caller's concern; this removes any tile.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfGrid`] if the coordinates are outside the grid.
    pub fn delete_tile(&mut self, x: u32, y: u32) -> Result<(), GridError> {
        self.set_tile(x, y, TileType::Null)
    }

    /// Iterates over `(x, y, tile)` in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, TileType)> + '_ {
        let size_x = self.size_x.max(1);
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            #[allow(clippy::cast_possible_truncation)]
            let i = i as u32;
            (i % size_x, i / size_x, *tile)
        })
    }

    /// Number of tiles that are not [`TileType::Null`].
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|t| !t.is_empty()).count()
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfGrid {
                x,
                y,
                size_x: self.size_x,
                size_y: self.size_y,
            });
        }
        Ok(y as usize * self.size_x as usize + x as usize)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.size_x.max(1) as usize) {
            for tile in row {
                write!(f, "{}", tile.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
