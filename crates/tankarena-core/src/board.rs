//! Board orchestration.
//!
//! The [`Board`] is the single authority for state-changing operations
//! within a tick. Every operation follows the same shape:
//!
//! 1. **Validate** the resulting position against the grid and the registry
//! 2. **Commit** the change (or revert it, for snapping and rotation)
//! 3. **Report** the outcome as a `bool` and as events on the queue
//!
//! # Validation
//!
//! A position is valid when its coordinates are non-negative, every tile of
//! its footprint is on the grid and either empty or non-collidable, and it
//! overlaps no other live entity.
//!
//! # Commit policies
//!
//! - Snapping and rotation revert on failure.
//! - [`Board::move_entity`] reports an invalid move with a `Collision` event
//!   but keeps the new position.
//! - Spawning and firing always register the new entity; the result only
//!   signals whether the placement was valid.
//!
//! # Example
//!
//! ```
//! use tankarena_core::board::Board;
//! use tankarena_core::config::ArenaConfig;
//! use tankarena_core::entity::{Direction, TankType};
//! use tankarena_core::event::EventKind;
//! use tilegrid::FixedLevelBuilder;
//!
//! let mut board = Board::new(ArenaConfig::default(), Box::new(FixedLevelBuilder::new(3, 3)));
//! board.load_level(1);
//!
//! assert!(board.spawn_tank(1, 1, TankType::Basic, Direction::North));
//! let kinds: Vec<_> = board.take_events().iter().map(|e| e.kind()).collect();
//! assert_eq!(kinds, vec![EventKind::LevelLoaded, EventKind::EntitySpawned]);
//! ```

use std::fmt;

use tilegrid::{is_tile_collidable, is_tile_destructible, Grid, LevelBuilder};
use tracing::{debug, trace, warn};

use crate::config::ArenaConfig;
use crate::entity::{Direction, Entity, EntityId, EntityKind, TankType};
use crate::event::{order_collision_members, CollisionMember, Event};
use crate::event_queue::EventQueue;
use crate::registry::EntityRegistry;

// =============================================================================
// Board
// =============================================================================

/// Grid, entities and event queue of one arena, plus the level source.
pub struct Board {
    grid: Grid,
    registry: EntityRegistry,
    events: EventQueue,
    levels: Box<dyn LevelBuilder>,
    config: ArenaConfig,
    current_level: Option<u32>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("grid", &format!("{}x{}", self.grid.size_x(), self.grid.size_y()))
            .field("registry", &self.registry)
            .field("events", &self.events.len())
            .field("levels", &"<dyn LevelBuilder>")
            .field("config", &self.config)
            .field("current_level", &self.current_level)
            .finish()
    }
}

impl Board {
    /// Creates a board with an empty grid of the configured level size.
    ///
    /// No level is loaded until [`load_level`](Self::load_level) is called.
    #[must_use]
    pub fn new(config: ArenaConfig, levels: Box<dyn LevelBuilder>) -> Self {
        Self {
            grid: Grid::new(config.level.size_x, config.level.size_y),
            registry: EntityRegistry::new(&config),
            events: EventQueue::new(),
            levels,
            config,
            current_level: None,
        }
    }

    /// Replaces the starting grid.
    #[must_use]
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = grid;
        self
    }

    // -------------------------------------------------------------------------
    // Tank control
    // -------------------------------------------------------------------------

    /// Starts or stops a tank.
    pub fn set_tank_moving(&mut self, tank: EntityId, moving: bool) -> bool {
        self.registry.set_tank_moving(tank, moving)
    }

    /// Turns a tank to face `direction`.
    ///
    /// A 90° turn first snaps the tank to the nearest whole tile; if the
    /// snapped position is invalid the turn is aborted with position and
    /// facing untouched. A 180° reversal never snaps.
    ///
    /// Returns `false` if the tank already faces `direction`, the turn was
    /// aborted, or the handle is not a live tank.
    pub fn set_tank_direction(&mut self, tank: EntityId, direction: Direction) -> bool {
        let Some(facing) = self
            .registry
            .get(tank)
            .filter(|entity| entity.is_tank())
            .map(Entity::facing)
        else {
            warn!(entity = %tank, "set_tank_direction on stale handle or non-tank");
            return false;
        };

        if facing == direction {
            return false;
        }
        if !facing.is_reversal_of(direction) && !self.snap_tank_to_grid(tank, true, true) {
            debug!(entity = %tank, from = %facing, to = %direction, "rotation aborted");
            return false;
        }

        self.registry.set_tank_direction(tank, direction);
        self.events.register_event(Event::tank_rotated(tank));
        debug!(entity = %tank, from = %facing, to = %direction, "tank rotated");
        true
    }

    /// Rounds the requested axes of an entity's position to whole tiles.
    ///
    /// On success reports `EntityMoved`, even if nothing changed. On failure
    /// the original position is restored and nothing is reported.
    pub fn snap_tank_to_grid(&mut self, target: EntityId, snap_x: bool, snap_y: bool) -> bool {
        let Some(entity) = self.registry.get_mut(target) else {
            warn!(entity = %target, "snap_tank_to_grid on stale handle");
            return false;
        };

        let original = entity.position();
        let mut snapped = original;
        if snap_x {
            snapped.x = snapped.x.round();
        }
        if snap_y {
            snapped.y = snapped.y.round();
        }
        entity.set_position(snapped);

        if !self.validate_entity_position(target) {
            if let Some(entity) = self.registry.get_mut(target) {
                entity.set_position(original);
            }
            return false;
        }

        self.events.register_event(Event::entity_moved(target));
        trace!(entity = %target, x = snapped.x, y = snapped.y, "snapped to grid");
        true
    }

    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------

    /// Moves every live entity once, in registry order.
    ///
    /// Entities destroyed earlier in the same pass are skipped.
    pub fn move_all_entities(&mut self) {
        let ids: Vec<EntityId> = self.registry.entity_ids().collect();
        for id in ids {
            if self.registry.contains(id) {
                self.move_entity(id);
            }
        }
    }

    /// Advances one entity by its own movement rule.
    ///
    /// No movement means no events and `false`. Otherwise `EntityMoved` is
    /// reported, then the new position is validated; an invalid position
    /// adds a `Collision` event and returns `false`, and is kept.
    pub fn move_entity(&mut self, target: EntityId) -> bool {
        let Some(entity) = self.registry.get_mut(target) else {
            warn!(entity = %target, "move_entity on stale handle");
            return false;
        };
        if !entity.advance() {
            return false;
        }
        trace!(entity = %target, x = entity.x(), y = entity.y(), "entity moved");

        self.events.register_event(Event::entity_moved(target));
        if !self.validate_entity_position(target) {
            if let Some(event) = self.create_collision_event(target) {
                self.events.register_event(event);
            }
            return false;
        }
        true
    }

    // -------------------------------------------------------------------------
    // Spawning
    // -------------------------------------------------------------------------

    /// Asks a tank for a bullet and registers it.
    ///
    /// Returns `false` when no bullet was produced (cooldown, or not a tank).
    /// A bullet spawned at an invalid position reports the firer's
    /// `Collision` first; it is registered and reported with
    /// `EntitySpawned` either way.
    pub fn fire_tank(&mut self, tank: EntityId) -> bool {
        let params = self.config.bullet;
        let Some(firer) = self.registry.get_mut(tank) else {
            warn!(entity = %tank, "fire_tank on stale handle");
            return false;
        };
        let Some(bullet) = firer.create_bullet(&params) else {
            return false;
        };

        if !self.validate_placement(&bullet, None) {
            if let Some(event) = self.create_collision_event(tank) {
                self.events.register_event(event);
            }
        }

        let bullet_id = self.registry.add_entity(bullet);
        self.events.register_event(Event::entity_spawned(bullet_id));
        debug!(tank = %tank, bullet = %bullet_id, "tank fired");
        true
    }

    /// Creates and registers a tank at tile `(x, y)`.
    ///
    /// The player tank reports `PlayerSpawned`, every other type
    /// `EntitySpawned`. The tank stays registered even when its position is
    /// invalid; in that case a `Collision` event follows and `false` is
    /// returned.
    pub fn spawn_tank(&mut self, x: u32, y: u32, tank_type: TankType, facing: Direction) -> bool {
        if tank_type.is_player() {
            return self.spawn_player(x, y, facing);
        }
        let id = self.add_tank(x, y, tank_type, facing);
        self.events.register_event(Event::entity_spawned(id));
        debug!(entity = %id, x, y, %tank_type, "tank spawned");
        self.report_placement(id)
    }

    fn spawn_player(&mut self, x: u32, y: u32, facing: Direction) -> bool {
        let id = self.add_tank(x, y, TankType::Player, facing);
        self.events.register_event(Event::player_spawned(id));
        debug!(entity = %id, x, y, "player spawned");
        self.report_placement(id)
    }

    #[allow(clippy::cast_precision_loss)]
    fn add_tank(&mut self, x: u32, y: u32, tank_type: TankType, facing: Direction) -> EntityId {
        let tank = self
            .registry
            .create_tank(x as f32, y as f32, tank_type, facing);
        self.registry.add_entity(tank)
    }

    fn report_placement(&mut self, id: EntityId) -> bool {
        if self.validate_entity_position(id) {
            return true;
        }
        if let Some(event) = self.create_collision_event(id) {
            self.events.register_event(event);
        }
        false
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Returns `true` if a live entity's current position is valid.
    ///
    /// Stale handles are never valid.
    #[must_use]
    pub fn validate_entity_position(&self, target: EntityId) -> bool {
        self.registry
            .get(target)
            .is_some_and(|entity| self.validate_placement(entity, Some(target)))
    }

    fn validate_placement(&self, entity: &Entity, exclude: Option<EntityId>) -> bool {
        let position = entity.position();
        if !position.is_finite() || position.x < 0.0 || position.y < 0.0 {
            return false;
        }

        for (x, y) in entity.footprint().cells() {
            let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                return false;
            };
            match self.grid.tile_at(x, y) {
                Ok(tile) if !tile.is_empty() && is_tile_collidable(tile) => return false,
                Ok(_) => {}
                Err(_) => return false,
            }
        }

        !self.registry.check_entity_collisions(entity, exclude)
    }

    /// Builds the `Collision` event for an entity at its current position.
    ///
    /// The second member is whatever occupies the entity's top-left corner.
    /// Failing that, it is the first entity in registry order that overlaps
    /// the entity anywhere, and only then the board at the top-left
    /// coordinates. Privileged members are moved to the first slot.
    /// Returns `None` for stale handles.
    #[must_use]
    pub fn create_collision_event(&self, acting: EntityId) -> Option<Event> {
        let entity = self.registry.get(acting)?;
        let first = entity.classify(acting);

        let struck = self
            .registry
            .find_entity_at_position(entity.x(), entity.y(), Some(acting))
            .or_else(|| self.registry.find_overlapping_entity(entity, Some(acting)))
            .and_then(|id| self.registry.get(id).map(|other| other.classify(id)))
            .unwrap_or_else(|| self.board_member(entity.x(), entity.y()));

        let (first, second) = order_collision_members(first, struck);
        debug!(?first, ?second, "collision");
        Some(Event::collision(first, second))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn board_member(&self, x: f32, y: f32) -> CollisionMember {
        let (x, y) = (x as u32, y as u32);
        CollisionMember::Board {
            x,
            y,
            tile: self.grid.tile_at(x, y).ok(),
        }
    }

    // -------------------------------------------------------------------------
    // Terrain and lifecycle
    // -------------------------------------------------------------------------

    /// Removes a destructible tile and reports `TileDeleted`.
    ///
    /// Indestructible tiles and off-grid coordinates are left alone.
    pub fn delete_tile(&mut self, x: u32, y: u32) -> bool {
        let Ok(tile) = self.grid.tile_at(x, y) else {
            return false;
        };
        if !is_tile_destructible(tile) || self.grid.delete_tile(x, y).is_err() {
            return false;
        }
        self.events.register_event(Event::tile_deleted(x, y, tile));
        debug!(x, y, %tile, "tile deleted");
        true
    }

    /// Destroys every enemy entity, newest first.
    ///
    /// Enemy tanks are killed so that statistics are updated; enemy bullets
    /// are removed. The player tank and friendly bullets survive.
    pub fn kill_all_enemy_entities(&mut self) {
        let ids: Vec<EntityId> = self.registry.entity_ids().rev().collect();
        for id in ids {
            let Some(entity) = self.registry.get(id) else {
                continue;
            };
            let (is_tank, spared) = match entity.kind() {
                EntityKind::Tank(tank) => (true, tank.tank_type.is_player()),
                EntityKind::Bullet(bullet) => (false, bullet.friendly),
            };
            if spared {
                continue;
            }
            if is_tank {
                self.registry.kill_tank(id, &mut self.events);
            } else {
                self.registry.remove_entity(id, &mut self.events);
            }
        }
    }

    /// Removes one entity, reporting `EntityRemoved`.
    pub fn remove_entity(&mut self, target: EntityId) -> bool {
        self.registry.remove_entity(target, &mut self.events)
    }

    /// Applies one hit to a tank, killing it at zero health.
    pub fn hit_tank(&mut self, tank: EntityId) -> bool {
        self.registry.hit_tank(tank, &mut self.events)
    }

    /// Drops every entity without reporting events.
    pub fn remove_all_entities(&mut self) {
        debug!(count = self.registry.len(), "removing all entities");
        self.registry.clear();
    }

    /// Clears the arena, installs the grid for `level_number` and reports
    /// `LevelLoaded`.
    pub fn load_level(&mut self, level_number: u32) {
        self.remove_all_entities();
        self.grid = self.levels.build_level(level_number);
        self.current_level = Some(level_number);
        self.events.register_event(Event::level_loaded(level_number));
        debug!(
            level_number,
            size_x = self.grid.size_x(),
            size_y = self.grid.size_y(),
            "level loaded"
        );
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Replaces the grid. Entities are kept.
    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    /// Current grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn size_x(&self) -> u32 {
        self.grid.size_x()
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn size_y(&self) -> u32 {
        self.grid.size_y()
    }

    /// Entity registry.
    #[must_use]
    pub const fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Mutable entity registry, for placing entities directly.
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// Pending events.
    #[must_use]
    pub const fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Drains pending events, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Number of the last loaded level.
    #[must_use]
    pub const fn current_level(&self) -> Option<u32> {
        self.current_level
    }
}
