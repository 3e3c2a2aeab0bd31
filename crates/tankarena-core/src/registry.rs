//! Entity registry for the tank arena.
//!
//! The [`EntityRegistry`] is the sole owner of live entities. It provides:
//! - Generational slot storage addressed by [`EntityId`] handles
//! - Registry order: the insertion order used by every full iteration
//! - Lifecycle operations (add, remove, hit, kill, clear)
//! - Inter-entity collision and point-lookup queries
//! - Kill statistics
//!
//! # Generations
//!
//! Removing an entity frees its slot and advances the slot's generation.
//! A handle issued for the old occupant keeps comparing equal to itself but
//! no longer resolves: [`EntityRegistry::get`] returns `None` for it even
//! after the slot is reused.
//!
//! # Lifecycle events
//!
//! Removal, hits and kills report themselves on the [`EventQueue`] passed
//! in by the caller (`EntityRemoved`, `TankHit`, `TankKilled` /
//! `PlayerKilled`, `StatisticsChanged`). [`EntityRegistry::clear`] is silent.
//!
//! # Example
//!
//! ```
//! use tankarena_core::config::ArenaConfig;
//! use tankarena_core::entity::{Direction, TankType};
//! use tankarena_core::event_queue::EventQueue;
//! use tankarena_core::registry::EntityRegistry;
//!
//! let mut registry = EntityRegistry::new(&ArenaConfig::default());
//! let mut events = EventQueue::new();
//!
//! let tank = registry.create_tank(2.0, 3.0, TankType::Basic, Direction::North);
//! let id = registry.add_entity(tank);
//! assert!(registry.get(id).is_some());
//!
//! assert!(registry.kill_tank(id, &mut events));
//! assert!(registry.get(id).is_none());
//! assert_eq!(registry.statistics().enemies_killed, 1);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ArenaConfig, TankRoster};
use crate::entity::{Direction, Entity, EntityId, TankComponents, TankType};
use crate::event::Event;
use crate::event_queue::EventQueue;

/// Running score and kill counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Points earned from kills.
    pub points: u32,
    /// Enemy tanks destroyed.
    pub enemies_killed: u32,
    /// Times the player tank was destroyed.
    pub player_deaths: u32,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Owner of every live entity.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live handles in insertion order.
    order: Vec<EntityId>,
    tanks: TankRoster,
    tank_size: f32,
    stats: GameStatistics,
}

impl EntityRegistry {
    /// Creates an empty registry using the tank parameters from `config`.
    #[must_use]
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            tanks: config.tanks,
            tank_size: config.tank_size,
            stats: GameStatistics::default(),
        }
    }

    /// Builds an unregistered tank at `(x, y)`.
    ///
    /// Pass the result to [`add_entity`](Self::add_entity) to make it live.
    #[must_use]
    pub fn create_tank(&self, x: f32, y: f32, tank_type: TankType, facing: Direction) -> Entity {
        Entity::new_tank(
            Vec2::new(x, y),
            Vec2::splat(self.tank_size),
            facing,
            TankComponents::new(tank_type, self.tanks.get(tank_type)),
        )
    }

    /// Takes ownership of `entity` and returns its handle.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            EntityId::new(index, slot.generation)
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entity: Some(entity),
            });
            EntityId::new(index, 0)
        };
        self.order.push(id);
        id
    }

    /// Removes an entity and reports `EntityRemoved`.
    ///
    /// Returns `false` if the handle is stale.
    pub fn remove_entity(&mut self, id: EntityId, events: &mut EventQueue) -> bool {
        if self.take(id).is_none() {
            warn!(entity = %id, "remove_entity on stale handle");
            return false;
        }
        debug!(entity = %id, "entity removed");
        events.register_event(Event::entity_removed(id));
        true
    }

    /// Destroys a tank, updating statistics.
    ///
    /// Enemy kills report `TankKilled` and award the archetype's points; the
    /// player reports `PlayerKilled`. Both are followed by
    /// `StatisticsChanged`. Returns `false` if the handle is stale or not a
    /// tank.
    pub fn kill_tank(&mut self, id: EntityId, events: &mut EventQueue) -> bool {
        let Some(tank_type) = self
            .get(id)
            .and_then(Entity::as_tank)
            .map(|tank| tank.tank_type)
        else {
            warn!(entity = %id, "kill_tank on stale handle or non-tank");
            return false;
        };
        self.take(id);

        if tank_type.is_player() {
            self.stats.player_deaths += 1;
            events.register_event(Event::player_killed(id));
        } else {
            self.stats.enemies_killed += 1;
            self.stats.points += self.tanks.get(tank_type).points;
            events.register_event(Event::tank_killed(id));
        }
        debug!(entity = %id, %tank_type, points = self.stats.points, "tank killed");
        events.register_event(Event::statistics_changed(self.stats));
        true
    }

    /// Applies one hit to a tank and reports `TankHit`.
    ///
    /// A tank whose health reaches zero is killed through
    /// [`kill_tank`](Self::kill_tank). Returns `false` if the handle is stale
    /// or not a tank.
    pub fn hit_tank(&mut self, id: EntityId, events: &mut EventQueue) -> bool {
        let Some(tank) = self.get_mut(id).and_then(Entity::as_tank_mut) else {
            warn!(entity = %id, "hit_tank on stale handle or non-tank");
            return false;
        };
        tank.health = tank.health.saturating_sub(1);
        let destroyed = tank.health == 0;
        events.register_event(Event::tank_hit(id));
        if destroyed {
            self.kill_tank(id, events);
        }
        true
    }

    /// Drops every entity without reporting events. Statistics are kept.
    ///
    /// Handles issued before the call stay stale afterwards.
    pub fn clear(&mut self) {
        for id in std::mem::take(&mut self.order) {
            let slot = &mut self.slots[id.index() as usize];
            slot.entity = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index());
        }
    }

    /// Starts or stops a tank.
    pub fn set_tank_moving(&mut self, id: EntityId, moving: bool) -> bool {
        match self.get_mut(id).and_then(Entity::as_tank_mut) {
            Some(tank) => {
                tank.moving = moving;
                true
            }
            None => {
                warn!(entity = %id, "set_tank_moving on stale handle or non-tank");
                false
            }
        }
    }

    /// Turns a tank to face `direction`.
    pub fn set_tank_direction(&mut self, id: EntityId, direction: Direction) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.is_tank() => {
                entity.set_facing(direction);
                true
            }
            _ => {
                warn!(entity = %id, "set_tank_direction on stale handle or non-tank");
                false
            }
        }
    }

    /// Returns `true` if `entity` overlaps any live entity other than `exclude`.
    #[must_use]
    pub fn check_entity_collisions(&self, entity: &Entity, exclude: Option<EntityId>) -> bool {
        self.entities()
            .any(|(id, other)| Some(id) != exclude && entity.overlaps(other))
    }

    /// First entity in registry order, other than `exclude`, whose extent
    /// contains `(x, y)`.
    #[must_use]
    pub fn find_entity_at_position(
        &self,
        x: f32,
        y: f32,
        exclude: Option<EntityId>,
    ) -> Option<EntityId> {
        self.entities()
            .find(|(id, other)| Some(*id) != exclude && other.contains_point(x, y))
            .map(|(id, _)| id)
    }

    /// First entity in registry order, other than `exclude`, that overlaps
    /// `entity`.
    #[must_use]
    pub fn find_overlapping_entity(
        &self,
        entity: &Entity,
        exclude: Option<EntityId>,
    ) -> Option<EntityId> {
        self.entities()
            .find(|(id, other)| Some(*id) != exclude && entity.overlaps(other))
            .map(|(id, _)| id)
    }

    /// Returns the entity behind `id`, if it is still live.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entity.as_ref())
    }

    /// Returns the entity behind `id` mutably, if it is still live.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.entity.as_mut())
    }

    /// Returns `true` if `id` resolves to a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Live handles in registry order.
    pub fn entity_ids(&self) -> impl DoubleEndedIterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// Live entities with their handles, in registry order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.get(*id).map(|entity| (*id, entity)))
    }

    /// Handle of the first player tank in registry order.
    #[must_use]
    pub fn player(&self) -> Option<EntityId> {
        self.entities()
            .find(|(_, entity)| entity.is_player())
            .map(|(id, _)| id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Current statistics.
    #[must_use]
    pub const fn statistics(&self) -> &GameStatistics {
        &self.stats
    }

    fn take(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self
            .slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())?;
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.order.retain(|live| *live != id);
        Some(entity)
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(&ArenaConfig::default())
    }
}
