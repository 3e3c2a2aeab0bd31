//! Event protocol for simulation outcomes.
//!
//! Every state change the board or registry performs is reported as an
//! [`Event`]: an [`EventKind`] tag plus an [`EventPayload`] whose shape is
//! fixed by the kind. Subscribers (rendering, audio, scoring, bot AI) match
//! on the payload; there is no member that can be read while unpopulated.
//!
//! # Construction
//!
//! In-crate producers use the typed constructors ([`Event::entity_moved`],
//! [`Event::collision`], ...) which cannot pair a kind with the wrong shape.
//! Producers that pick the kind at runtime go through [`Event::new`], which
//! rejects mismatches with [`EventError::PayloadMismatch`]. Deserialisation
//! runs the same check.
//!
//! # Collisions
//!
//! A collision carries two [`CollisionMember`]s. When either member is
//! privileged (the player tank or a friendly bullet) and was detected as the
//! struck subject, it is moved into the first slot; see
//! [`order_collision_members`].
//!
//! # Handles
//!
//! Entity references inside events are [`EntityId`] handles. An event may
//! outlive the entity it mentions (a `TankKilled` always does), so consumers
//! must re-resolve handles through the registry and treat `None` as "gone".
//!
//! # Example
//!
//! ```
//! use tankarena_core::entity::EntityId;
//! use tankarena_core::event::{Event, EventKind, EventPayload};
//!
//! let id = EntityId::new(0, 0);
//! let moved = Event::entity_moved(id);
//! assert_eq!(moved.kind(), EventKind::EntityMoved);
//! assert_eq!(moved.entity(), Some(id));
//!
//! // Wrong shape for the kind is rejected.
//! let bad = Event::new(EventKind::LevelLoaded, EventPayload::Entity { entity: id });
//! assert!(bad.is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tilegrid::TileType;

use crate::entity::{Direction, EntityId};
use crate::registry::GameStatistics;

/// Errors raised when constructing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventError {
    /// The payload shape does not belong to the kind.
    #[error("event kind {kind} requires a {expected} payload, got {actual}")]
    PayloadMismatch {
        /// Requested kind.
        kind: EventKind,
        /// Shape the kind requires.
        expected: PayloadShape,
        /// Shape that was supplied.
        actual: PayloadShape,
    },
}

/// Closed set of event kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Placeholder event carrying nothing.
    Null,
    /// A non-player entity entered the registry.
    EntitySpawned,
    /// An entity's position changed.
    EntityMoved,
    /// An entity left the registry without being killed.
    EntityRemoved,
    /// The player tank entered the registry.
    PlayerSpawned,
    /// The player tank was destroyed.
    PlayerKilled,
    /// Two members collided.
    Collision,
    /// An enemy tank was destroyed.
    TankKilled,
    /// A tank changed facing.
    TankRotated,
    /// A tank took a hit.
    TankHit,
    /// A tile was placed on an empty cell.
    TilePlaced,
    /// A tile changed type.
    TileChanged,
    /// A tile was removed.
    TileDeleted,
    /// A new level grid replaced the old one.
    LevelLoaded,
    /// Score or kill statistics changed.
    StatisticsChanged,
    /// A bot chose an action for its tank.
    BotDecision,
}

impl EventKind {
    /// All kinds in declaration order.
    pub const ALL: [EventKind; 16] = [
        Self::Null,
        Self::EntitySpawned,
        Self::EntityMoved,
        Self::EntityRemoved,
        Self::PlayerSpawned,
        Self::PlayerKilled,
        Self::Collision,
        Self::TankKilled,
        Self::TankRotated,
        Self::TankHit,
        Self::TilePlaced,
        Self::TileChanged,
        Self::TileDeleted,
        Self::LevelLoaded,
        Self::StatisticsChanged,
        Self::BotDecision,
    ];

    /// Payload shape this kind requires.
    #[must_use]
    pub const fn payload_shape(self) -> PayloadShape {
        match self {
            Self::Null => PayloadShape::None,
            Self::EntitySpawned
            | Self::EntityMoved
            | Self::EntityRemoved
            | Self::PlayerSpawned
            | Self::PlayerKilled
            | Self::TankKilled
            | Self::TankRotated
            | Self::TankHit => PayloadShape::Entity,
            Self::Collision => PayloadShape::Collision,
            Self::TilePlaced | Self::TileChanged | Self::TileDeleted => PayloadShape::Tile,
            Self::LevelLoaded => PayloadShape::Level,
            Self::StatisticsChanged => PayloadShape::Statistics,
            Self::BotDecision => PayloadShape::Bot,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Discriminant of [`EventPayload`], used in error reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadShape {
    /// No payload.
    None,
    /// Single entity handle.
    Entity,
    /// Two collision members.
    Collision,
    /// Tile coordinates and type.
    Tile,
    /// Level number.
    Level,
    /// Statistics snapshot.
    Statistics,
    /// Bot decision.
    Bot,
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One side of a collision.
///
/// Entity members carry a handle to the subject; the board member carries
/// the tile coordinates of the collision and the terrain found there
/// (`None` when the coordinates are off the grid).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionMember {
    /// The player's tank.
    PlayerTank(EntityId),
    /// Any non-player tank.
    EnemyTank(EntityId),
    /// A bullet fired by the player's side.
    FriendlyBullet(EntityId),
    /// A bullet fired by the enemy side.
    EnemyBullet(EntityId),
    /// Terrain or the grid edge.
    Board {
        /// Tile column.
        x: u32,
        /// Tile row.
        y: u32,
        /// Terrain at `(x, y)`.
        tile: Option<TileType>,
    },
}

impl CollisionMember {
    /// Returns `true` for the classifications that always take the first slot.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        matches!(self, Self::PlayerTank(_) | Self::FriendlyBullet(_))
    }

    /// Handle of the subject, `None` for the board.
    #[must_use]
    pub const fn entity(&self) -> Option<EntityId> {
        match self {
            Self::PlayerTank(id)
            | Self::EnemyTank(id)
            | Self::FriendlyBullet(id)
            | Self::EnemyBullet(id) => Some(*id),
            Self::Board { .. } => None,
        }
    }

    /// Returns `true` for the board member.
    #[must_use]
    pub const fn is_board(&self) -> bool {
        matches!(self, Self::Board { .. })
    }
}

/// Orders two collision members.
///
/// `acting` is the entity whose move or placement was rejected, `struck` is
/// what was found at its coordinates. If `struck` is privileged the pair is
/// swapped, otherwise detection order is kept.
#[must_use]
pub fn order_collision_members(
    acting: CollisionMember,
    struck: CollisionMember,
) -> (CollisionMember, CollisionMember) {
    if struck.is_privileged() {
        (struck, acting)
    } else {
        (acting, struck)
    }
}

/// Action chosen by a bot for its tank.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotDecision {
    /// Start moving in a direction.
    Move(Direction),
    /// Turn in place.
    Rotate(Direction),
    /// Fire the gun.
    Fire,
    /// Do nothing this tick.
    Wait,
}

/// Event payload, one variant per [`PayloadShape`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    /// No payload.
    None,
    /// A single entity.
    Entity {
        /// Subject of the event.
        entity: EntityId,
    },
    /// An ordered pair of collision members.
    Collision {
        /// Privileged member when one is present, else the acting entity.
        first: CollisionMember,
        /// The other member.
        second: CollisionMember,
    },
    /// A grid cell.
    Tile {
        /// Tile column.
        x: u32,
        /// Tile row.
        y: u32,
        /// Tile type involved (the removed type for deletions).
        tile: TileType,
    },
    /// A level.
    Level {
        /// Level that was loaded.
        level_number: u32,
    },
    /// A statistics snapshot.
    Statistics(GameStatistics),
    /// A bot decision.
    Bot {
        /// Tank the bot controls.
        tank: EntityId,
        /// Chosen action.
        decision: BotDecision,
    },
}

impl EventPayload {
    /// Shape of this payload.
    #[must_use]
    pub const fn shape(&self) -> PayloadShape {
        match self {
            Self::None => PayloadShape::None,
            Self::Entity { .. } => PayloadShape::Entity,
            Self::Collision { .. } => PayloadShape::Collision,
            Self::Tile { .. } => PayloadShape::Tile,
            Self::Level { .. } => PayloadShape::Level,
            Self::Statistics(_) => PayloadShape::Statistics,
            Self::Bot { .. } => PayloadShape::Bot,
        }
    }
}

/// A simulation outcome.
///
/// The kind and payload are private so that every value in circulation has
/// passed the shape check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    kind: EventKind,
    payload: EventPayload,
}

#[derive(Deserialize)]
struct RawEvent {
    kind: EventKind,
    payload: EventPayload,
}

impl TryFrom<RawEvent> for Event {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.payload)
    }
}

impl Event {
    /// Creates an event, checking that the payload fits the kind.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if `payload`'s shape is not
    /// the one `kind` requires.
    pub fn new(kind: EventKind, payload: EventPayload) -> Result<Self, EventError> {
        let expected = kind.payload_shape();
        let actual = payload.shape();
        if expected != actual {
            return Err(EventError::PayloadMismatch {
                kind,
                expected,
                actual,
            });
        }
        Ok(Self { kind, payload })
    }

    fn entity_event(kind: EventKind, entity: EntityId) -> Self {
        debug_assert_eq!(kind.payload_shape(), PayloadShape::Entity);
        Self {
            kind,
            payload: EventPayload::Entity { entity },
        }
    }

    fn tile_event(kind: EventKind, x: u32, y: u32, tile: TileType) -> Self {
        debug_assert_eq!(kind.payload_shape(), PayloadShape::Tile);
        Self {
            kind,
            payload: EventPayload::Tile { x, y, tile },
        }
    }

    /// An empty placeholder event.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            kind: EventKind::Null,
            payload: EventPayload::None,
        }
    }

    /// A non-player entity was added to the registry.
    #[must_use]
    pub fn entity_spawned(entity: EntityId) -> Self {
        Self::entity_event(EventKind::EntitySpawned, entity)
    }

    /// An entity's position changed.
    #[must_use]
    pub fn entity_moved(entity: EntityId) -> Self {
        Self::entity_event(EventKind::EntityMoved, entity)
    }

    /// An entity was removed without being killed.
    #[must_use]
    pub fn entity_removed(entity: EntityId) -> Self {
        Self::entity_event(EventKind::EntityRemoved, entity)
    }

    /// The player tank was added to the registry.
    #[must_use]
    pub fn player_spawned(entity: EntityId) -> Self {
        Self::entity_event(EventKind::PlayerSpawned, entity)
    }

    /// The player tank was destroyed.
    #[must_use]
    pub fn player_killed(entity: EntityId) -> Self {
        Self::entity_event(EventKind::PlayerKilled, entity)
    }

    /// An enemy tank was destroyed.
    #[must_use]
    pub fn tank_killed(entity: EntityId) -> Self {
        Self::entity_event(EventKind::TankKilled, entity)
    }

    /// A tank changed facing.
    #[must_use]
    pub fn tank_rotated(entity: EntityId) -> Self {
        Self::entity_event(EventKind::TankRotated, entity)
    }

    /// A tank took a hit.
    #[must_use]
    pub fn tank_hit(entity: EntityId) -> Self {
        Self::entity_event(EventKind::TankHit, entity)
    }

    /// A collision between two already-ordered members.
    ///
    /// Use [`order_collision_members`] first when the order comes from
    /// detection rather than from the caller.
    #[must_use]
    pub const fn collision(first: CollisionMember, second: CollisionMember) -> Self {
        Self {
            kind: EventKind::Collision,
            payload: EventPayload::Collision { first, second },
        }
    }

    /// A tile was placed.
    #[must_use]
    pub fn tile_placed(x: u32, y: u32, tile: TileType) -> Self {
        Self::tile_event(EventKind::TilePlaced, x, y, tile)
    }

    /// A tile changed to `tile`.
    #[must_use]
    pub fn tile_changed(x: u32, y: u32, tile: TileType) -> Self {
        Self::tile_event(EventKind::TileChanged, x, y, tile)
    }

    /// The tile `removed` was deleted from `(x, y)`.
    #[must_use]
    pub fn tile_deleted(x: u32, y: u32, removed: TileType) -> Self {
        Self::tile_event(EventKind::TileDeleted, x, y, removed)
    }

    /// A level grid was loaded.
    #[must_use]
    pub const fn level_loaded(level_number: u32) -> Self {
        Self {
            kind: EventKind::LevelLoaded,
            payload: EventPayload::Level { level_number },
        }
    }

    /// Statistics changed.
    #[must_use]
    pub const fn statistics_changed(stats: GameStatistics) -> Self {
        Self {
            kind: EventKind::StatisticsChanged,
            payload: EventPayload::Statistics(stats),
        }
    }

    /// A bot chose `decision` for `tank`.
    #[must_use]
    pub const fn bot_decision(tank: EntityId, decision: BotDecision) -> Self {
        Self {
            kind: EventKind::BotDecision,
            payload: EventPayload::Bot { tank, decision },
        }
    }

    /// Kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Payload of this event.
    #[must_use]
    pub const fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// Consumes the event, returning its payload.
    #[must_use]
    pub fn into_payload(self) -> EventPayload {
        self.payload
    }

    /// Subject handle of an entity-shaped event.
    #[must_use]
    pub const fn entity(&self) -> Option<EntityId> {
        match &self.payload {
            EventPayload::Entity { entity } => Some(*entity),
            _ => None,
        }
    }

    /// Ordered members of a collision event.
    #[must_use]
    pub const fn collision_members(&self) -> Option<(&CollisionMember, &CollisionMember)> {
        match &self.payload {
            EventPayload::Collision { first, second } => Some((first, second)),
            _ => None,
        }
    }

    /// Cell and tile of a tile-shaped event.
    #[must_use]
    pub const fn tile(&self) -> Option<(u32, u32, TileType)> {
        match &self.payload {
            EventPayload::Tile { x, y, tile } => Some((*x, *y, *tile)),
            _ => None,
        }
    }

    /// Level number of a level event.
    #[must_use]
    pub const fn level_number(&self) -> Option<u32> {
        match &self.payload {
            EventPayload::Level { level_number } => Some(*level_number),
            _ => None,
        }
    }

    /// Statistics snapshot of a statistics event.
    #[must_use]
    pub const fn statistics(&self) -> Option<&GameStatistics> {
        match &self.payload {
            EventPayload::Statistics(stats) => Some(stats),
            _ => None,
        }
    }

    /// Tank and decision of a bot event.
    #[must_use]
    pub const fn bot_decision_info(&self) -> Option<(EntityId, BotDecision)> {
        match &self.payload {
            EventPayload::Bot { tank, decision } => Some((*tank, *decision)),
            _ => None,
        }
    }

    /// Returns `true` if the event mentions `id` anywhere in its payload.
    ///
    /// Only compares handles, so it is safe for entities that no longer exist.
    #[must_use]
    pub fn involves(&self, id: EntityId) -> bool {
        match &self.payload {
            EventPayload::Entity { entity } => *entity == id,
            EventPayload::Collision { first, second } => {
                first.entity() == Some(id) || second.entity() == Some(id)
            }
            EventPayload::Bot { tank, .. } => *tank == id,
            EventPayload::None
            | EventPayload::Tile { .. }
            | EventPayload::Level { .. }
            | EventPayload::Statistics(_) => false,
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::null()
    }
}
