//! Entity module for the tank arena.
//!
//! This module provides the mobile entities that live on the tile grid:
//! - [`EntityId`]: Generational handle resolved through the registry
//! - [`Direction`]: The four cardinal facings
//! - [`EntityKind`]: Closed tagged variant selecting tank or bullet state
//! - [`Entity`]: Position, extent, facing and kind-specific components
//!
//! # Handles
//!
//! Entities are owned by the [`EntityRegistry`](crate::registry::EntityRegistry).
//! Everything else, events included, holds an [`EntityId`]. A handle can
//! always be compared for identity but must be re-resolved through the
//! registry to read state, and resolves to `None` once the entity is gone.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use tankarena_core::config::TankParams;
//! use tankarena_core::entity::{Direction, Entity, TankComponents, TankType};
//!
//! let params = TankParams::default();
//! let mut tank = Entity::new_tank(
//!     Vec2::new(2.0, 2.0),
//!     Vec2::ONE,
//!     Direction::East,
//!     TankComponents::new(TankType::Basic, &params),
//! );
//!
//! assert!(!tank.advance()); // tanks only move while flagged as moving
//! tank.as_tank_mut().unwrap().moving = true;
//! assert!(tank.advance());
//! assert!(tank.x() > 2.0);
//! ```

pub mod components;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::BulletParams;
use crate::event::CollisionMember;

pub use components::{BulletComponents, FireCooldown, TankComponents, TankType};

/// Generational handle to an entity in the registry.
///
/// The `index` addresses a registry slot; the `generation` distinguishes
/// successive occupants of that slot. Once an entity is removed its slot's
/// generation advances, so stale handles never resolve to a newer entity.
///
/// # Example
///
/// ```
/// use tankarena_core::entity::EntityId;
///
/// let a = EntityId::new(3, 0);
/// let b = EntityId::new(3, 1);
/// assert_ne!(a, b);
/// assert_eq!(a.index(), b.index());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Creates a handle from its raw parts.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the registry.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Cardinal facing. North points towards row 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards decreasing `y`.
    North,
    /// Towards increasing `x`.
    East,
    /// Towards increasing `y`.
    South,
    /// Towards decreasing `x`.
    West,
}

impl Direction {
    /// All directions in clockwise order starting at North.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Unit step in grid coordinates.
    #[must_use]
    pub const fn offset(self) -> Vec2 {
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::East => Vec2::new(1.0, 0.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::West => Vec2::new(-1.0, 0.0),
        }
    }

    /// The direction rotated by 180°.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// The direction rotated clockwise by 90°.
    #[must_use]
    pub const fn rotated_cw(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Returns `true` if turning from `self` to `other` is a 180° reversal.
    #[must_use]
    pub fn is_reversal_of(self, other: Self) -> bool {
        self.opposite() == other
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::North => write!(f, "North"),
            Self::East => write!(f, "East"),
            Self::South => write!(f, "South"),
            Self::West => write!(f, "West"),
        }
    }
}

/// Inclusive tile range covered by an entity's extent.
///
/// `min` is `floor(position)` and `max` is `ceil(position + size - 1)` on
/// each axis. Bounds are signed so that callers can detect footprints that
/// start left of or above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    /// First covered column.
    pub min_x: i64,
    /// Last covered column.
    pub max_x: i64,
    /// First covered row.
    pub min_y: i64,
    /// Last covered row.
    pub max_y: i64,
}

impl Footprint {
    /// Iterates over every covered `(x, y)` cell, column-major.
    pub fn cells(self) -> impl Iterator<Item = (i64, i64)> {
        (self.min_x..=self.max_x)
            .flat_map(move |x| (self.min_y..=self.max_y).map(move |y| (x, y)))
    }
}

/// Kind-specific entity state.
///
/// The set is closed: every consumer matches it exhaustively, which is what
/// makes collision classification checkable by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A tank, player-controlled or enemy.
    Tank(TankComponents),
    /// A bullet in flight.
    Bullet(BulletComponents),
}

/// A mobile entity on the tile grid.
///
/// Position is the top-left corner in real-valued grid coordinates and size
/// is measured in tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    position: Vec2,
    size: Vec2,
    facing: Direction,
    kind: EntityKind,
}

impl Entity {
    /// Creates a tank entity.
    #[must_use]
    pub const fn new_tank(
        position: Vec2,
        size: Vec2,
        facing: Direction,
        tank: TankComponents,
    ) -> Self {
        Self {
            position,
            size,
            facing,
            kind: EntityKind::Tank(tank),
        }
    }

    /// Creates a bullet entity. Its facing is its direction of travel.
    #[must_use]
    pub const fn new_bullet(position: Vec2, size: Vec2, bullet: BulletComponents) -> Self {
        Self {
            position,
            size,
            facing: bullet.direction,
            kind: EntityKind::Bullet(bullet),
        }
    }

    /// Column coordinate of the top-left corner.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.position.x
    }

    /// Row coordinate of the top-left corner.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.position.y
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Sets the column coordinate.
    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    /// Sets the row coordinate.
    pub fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    /// Moves the top-left corner.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Extent in tiles.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Width in tiles.
    #[must_use]
    pub const fn size_x(&self) -> f32 {
        self.size.x
    }

    /// Height in tiles.
    #[must_use]
    pub const fn size_y(&self) -> f32 {
        self.size.y
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Changes the facing. Bullets keep their direction of travel in sync.
    pub fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
        if let EntityKind::Bullet(bullet) = &mut self.kind {
            bullet.direction = facing;
        }
    }

    /// Kind-specific state.
    #[must_use]
    pub const fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Returns the tank components if this is a tank, `None` otherwise.
    #[must_use]
    pub const fn as_tank(&self) -> Option<&TankComponents> {
        match &self.kind {
            EntityKind::Tank(tank) => Some(tank),
            EntityKind::Bullet(_) => None,
        }
    }

    /// Returns mutable tank components if this is a tank, `None` otherwise.
    #[must_use]
    pub fn as_tank_mut(&mut self) -> Option<&mut TankComponents> {
        match &mut self.kind {
            EntityKind::Tank(tank) => Some(tank),
            EntityKind::Bullet(_) => None,
        }
    }

    /// Returns the bullet components if this is a bullet, `None` otherwise.
    #[must_use]
    pub const fn as_bullet(&self) -> Option<&BulletComponents> {
        match &self.kind {
            EntityKind::Bullet(bullet) => Some(bullet),
            EntityKind::Tank(_) => None,
        }
    }

    /// Returns `true` if this entity is a tank.
    #[must_use]
    pub const fn is_tank(&self) -> bool {
        matches!(self.kind, EntityKind::Tank(_))
    }

    /// Returns `true` if this entity is a bullet.
    #[must_use]
    pub const fn is_bullet(&self) -> bool {
        matches!(self.kind, EntityKind::Bullet(_))
    }

    /// Returns `true` if this entity is the player's tank.
    #[must_use]
    pub fn is_player(&self) -> bool {
        self.as_tank().is_some_and(|tank| tank.tank_type.is_player())
    }

    /// Advances the entity by one step of its own movement rule.
    ///
    /// Tanks travel `speed` tiles along their facing while flagged as moving
    /// and tick their firing cooldown on every call. Bullets always travel
    /// along their direction.
    ///
    /// Returns `true` if the position changed.
    pub fn advance(&mut self) -> bool {
        let (direction, speed) = match &mut self.kind {
            EntityKind::Tank(tank) => {
                tank.cooldown.tick();
                if !tank.moving {
                    return false;
                }
                (self.facing, tank.speed)
            }
            EntityKind::Bullet(bullet) => (bullet.direction, bullet.speed),
        };

        if speed <= 0.0 {
            return false;
        }
        self.position += direction.offset() * speed;
        true
    }

    /// Produces a bullet in front of this tank if its cooldown allows.
    ///
    /// The bullet is centred on the tank's front edge, placed just outside
    /// the tank, and travels along the tank's facing. It is friendly when
    /// fired by the player. Bullets never fire.
    pub fn create_bullet(&mut self, params: &BulletParams) -> Option<Entity> {
        let facing = self.facing;
        let tank = self.as_tank_mut()?;
        if !tank.cooldown.is_ready() {
            return None;
        }
        tank.cooldown.trigger();
        let friendly = tank.tank_type.is_player();

        let half = params.size / 2.0;
        let center = self.position + self.size / 2.0;
        let position = match facing {
            Direction::North => Vec2::new(center.x - half, self.position.y - params.size),
            Direction::South => Vec2::new(center.x - half, self.position.y + self.size.y),
            Direction::East => Vec2::new(self.position.x + self.size.x, center.y - half),
            Direction::West => Vec2::new(self.position.x - params.size, center.y - half),
        };

        Some(Entity::new_bullet(
            position,
            Vec2::splat(params.size),
            BulletComponents {
                friendly,
                direction: facing,
                speed: params.speed,
            },
        ))
    }

    /// Buckets this entity into its collision classification.
    ///
    /// A bullet's friendliness flag decides Friendly vs Enemy, not the type
    /// of the tank that fired it.
    #[must_use]
    pub fn classify(&self, id: EntityId) -> CollisionMember {
        match &self.kind {
            EntityKind::Tank(tank) if tank.tank_type.is_player() => CollisionMember::PlayerTank(id),
            EntityKind::Tank(_) => CollisionMember::EnemyTank(id),
            EntityKind::Bullet(bullet) if bullet.friendly => CollisionMember::FriendlyBullet(id),
            EntityKind::Bullet(_) => CollisionMember::EnemyBullet(id),
        }
    }

    /// Tile range covered at the current position.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn footprint(&self) -> Footprint {
        Footprint {
            min_x: self.position.x.floor() as i64,
            max_x: (self.position.x + self.size.x - 1.0).ceil() as i64,
            min_y: self.position.y.floor() as i64,
            max_y: (self.position.y + self.size.y - 1.0).ceil() as i64,
        }
    }

    /// Returns `true` if the two extents overlap. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Entity) -> bool {
        let a_max = self.position + self.size;
        let b_max = other.position + other.size;
        self.position.x < b_max.x
            && other.position.x < a_max.x
            && self.position.y < b_max.y
            && other.position.y < a_max.y
    }

    /// Returns `true` if `(x, y)` lies inside the extent (right/bottom edges open).
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.position.x
            && x < self.position.x + self.size.x
            && y >= self.position.y
            && y < self.position.y + self.size.y
    }
}
