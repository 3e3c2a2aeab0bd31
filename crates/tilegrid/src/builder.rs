//! Level construction.
//!
//! A [`LevelBuilder`] turns a level number into a freshly allocated [`Grid`].
//! Ownership of the grid passes to the caller, which replaces whatever grid
//! it held before.
//!
//! Two builders ship with the crate:
//!
//! - [`ProceduralLevelBuilder`]: deterministic layouts seeded per level
//! - [`FixedLevelBuilder`]: serves hand-made grids, used by fixtures

use std::collections::BTreeMap;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::grid::Grid;
use crate::tile::TileType;

/// Produces the grid for a level number.
///
/// Implementations must be deterministic: the same level number always
/// yields the same grid.
pub trait LevelBuilder: Send + Sync {
    /// Builds the grid for `level_number`.
    fn build_level(&self, level_number: u32) -> Grid;
}

/// Deterministic procedural level generator.
///
/// Layouts are mirror-symmetric around the vertical axis. The top row
/// (enemy spawn lane) and a pocket at the bottom centre (player spawn) are
/// always left empty. Obstacle density grows with the level number up to a
/// cap.
///
/// # Example
///
/// ```
/// use tilegrid::{LevelBuilder, ProceduralLevelBuilder};
///
/// let builder = ProceduralLevelBuilder::new(26, 26, 7);
/// let a = builder.build_level(3);
/// let b = builder.build_level(3);
/// assert_eq!(a, b);
/// assert_eq!(a.size_x(), 26);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProceduralLevelBuilder {
    size_x: u32,
    size_y: u32,
    seed: u64,
}

impl ProceduralLevelBuilder {
    /// Base obstacle probability for level 1.
    const BASE_DENSITY: f64 = 0.12;
    /// Density added per level.
    const DENSITY_STEP: f64 = 0.02;
    /// Density never exceeds this.
    const MAX_DENSITY: f64 = 0.35;
    /// Width and height of the player spawn pocket.
    const SPAWN_POCKET: u32 = 2;

    /// Creates a builder for `size_x` × `size_y` grids.
    #[must_use]
    pub const fn new(size_x: u32, size_y: u32, seed: u64) -> Self {
        Self {
            size_x,
            size_y,
            seed,
        }
    }

    /// Obstacle probability for a level.
    #[must_use]
    pub fn density(level_number: u32) -> f64 {
        let steps = f64::from(level_number.saturating_sub(1));
        (Self::BASE_DENSITY + steps * Self::DENSITY_STEP).min(Self::MAX_DENSITY)
    }

    /// Column range of the player spawn pocket.
    #[must_use]
    pub fn player_spawn(&self) -> (u32, u32) {
        let x = self.size_x.saturating_sub(Self::SPAWN_POCKET) / 2;
        let y = self.size_y.saturating_sub(Self::SPAWN_POCKET);
        (x, y)
    }

    fn rng_for(&self, level_number: u32) -> ChaCha8Rng {
        let mixed = self
            .seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(u64::from(level_number));
        ChaCha8Rng::seed_from_u64(mixed)
    }

    fn is_reserved(&self, x: u32, y: u32) -> bool {
        if y == 0 {
            return true;
        }
        let (px, py) = self.player_spawn();
        x >= px && x < px + Self::SPAWN_POCKET && y >= py
    }

    fn pick_tile(rng: &mut ChaCha8Rng, level_number: u32) -> TileType {
        let roll: f64 = rng.gen();
        // Harder levels trade bricks for steel.
        let steel_share = (0.1 + f64::from(level_number) * 0.02).min(0.3);
        if roll < steel_share {
            TileType::Steel
        } else if roll < steel_share + 0.1 {
            TileType::Water
        } else if roll < steel_share + 0.2 {
            TileType::Bushes
        } else {
            TileType::Bricks
        }
    }
}

impl Default for ProceduralLevelBuilder {
    fn default() -> Self {
        Self::new(26, 26, 0)
    }
}

impl LevelBuilder for ProceduralLevelBuilder {
    fn build_level(&self, level_number: u32) -> Grid {
        let mut grid = Grid::new(self.size_x, self.size_y);
        let mut rng = self.rng_for(level_number);
        let density = Self::density(level_number);
        let half = self.size_x.div_ceil(2);

        for y in 0..self.size_y {
            for x in 0..half {
                if !rng.gen_bool(density) {
                    continue;
                }
                let tile = Self::pick_tile(&mut rng, level_number);
                let mirror = self.size_x - 1 - x;
                for cx in [x, mirror] {
                    if self.is_reserved(cx, y) {
                        continue;
                    }
                    let placed = grid.set_tile(cx, y, tile);
                    debug_assert!(placed.is_ok());
                }
            }
        }

        debug!(
            level = level_number,
            size_x = self.size_x,
            size_y = self.size_y,
            occupied = grid.occupied_count(),
            "built procedural level"
        );
        grid
    }
}

/// Serves pre-built grids keyed by level number.
///
/// Unknown levels produce an empty grid of the fallback size.
#[derive(Debug, Clone, Default)]
pub struct FixedLevelBuilder {
    levels: BTreeMap<u32, Grid>,
    fallback_size: (u32, u32),
}

impl FixedLevelBuilder {
    /// Creates a builder whose unknown levels are `size_x` × `size_y` and empty.
    #[must_use]
    pub fn new(size_x: u32, size_y: u32) -> Self {
        Self {
            levels: BTreeMap::new(),
            fallback_size: (size_x, size_y),
        }
    }

    /// Registers the grid served for `level_number`.
    #[must_use]
    pub fn with_level(mut self, level_number: u32, grid: Grid) -> Self {
        self.levels.insert(level_number, grid);
        self
    }

    /// Number of registered levels.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

impl LevelBuilder for FixedLevelBuilder {
    fn build_level(&self, level_number: u32) -> Grid {
        self.levels.get(&level_number).cloned().unwrap_or_else(|| {
            let (size_x, size_y) = self.fallback_size;
            Grid::new(size_x, size_y)
        })
    }
}
