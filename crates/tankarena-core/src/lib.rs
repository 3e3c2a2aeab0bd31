//! # Tankarena Core
//!
//! Collision and entity-lifecycle engine for tile-grid tank arenas.
//!
//! The crate advances tanks and bullets over a [`tilegrid::Grid`], validates
//! every resulting position against terrain and other entities, and records
//! each outcome as a typed [`Event`] on an [`EventQueue`] for rendering,
//! audio, scoring and bot subscribers to drain once per tick.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): closed tank/bullet variants addressed by
//!   generational [`EntityId`] handles
//! - **Registry** ([`registry`]): sole owner of live entities, lifecycle and
//!   statistics
//! - **Events** ([`event`], [`event_queue`]): kind-tagged messages whose
//!   payload shape is fixed by the kind
//! - **Board** ([`board`]): validate, commit and report for every operation
//!
//! Execution is single-threaded and synchronous: each board call runs to
//! completion before the next one starts.
//!
//! ## Usage
//!
//! ```
//! use tankarena_core::{ArenaConfig, Board, Direction, EventKind, TankType};
//! use tilegrid::ProceduralLevelBuilder;
//!
//! let config = ArenaConfig::default();
//! let levels = ProceduralLevelBuilder::new(config.level.size_x, config.level.size_y, 7);
//! let (px, py) = levels.player_spawn();
//!
//! let mut board = Board::new(config, Box::new(levels));
//! board.load_level(1);
//! assert!(board.spawn_tank(px, py, TankType::Player, Direction::North));
//!
//! let player = board.registry().player().unwrap();
//! board.set_tank_moving(player, true);
//! board.move_all_entities();
//!
//! let events = board.take_events();
//! assert_eq!(events[0].kind(), EventKind::LevelLoaded);
//! assert_eq!(events[1].kind(), EventKind::PlayerSpawned);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod config;
pub mod entity;
pub mod event;
pub mod event_queue;
pub mod registry;

pub use board::Board;
pub use config::{ArenaConfig, BulletParams, ConfigError, LevelConfig, TankParams, TankRoster};
pub use entity::{
    BulletComponents, Direction, Entity, EntityId, EntityKind, TankComponents, TankType,
};
pub use event::{
    BotDecision, CollisionMember, Event, EventError, EventKind, EventPayload, PayloadShape,
};
pub use event_queue::EventQueue;
pub use registry::{EntityRegistry, GameStatistics};

#[cfg(test)]
mod tests;
