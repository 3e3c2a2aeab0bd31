//! Test helper functions for building boards and placing entities.

use glam::Vec2;
use tilegrid::{FixedLevelBuilder, Grid};

use crate::board::Board;
use crate::config::ArenaConfig;
use crate::entity::{BulletComponents, Direction, Entity, EntityId, TankType};
use crate::event::{Event, EventKind};

// =============================================================================
// Board Setup
// =============================================================================

/// Builds a board whose starting grid is parsed from ASCII rows.
///
/// Level loads on the returned board serve an empty grid of the same size.
pub fn board_from_ascii(rows: &[&str]) -> Board {
    let grid = Grid::from_ascii(rows).expect("valid test grid");
    let levels = FixedLevelBuilder::new(grid.size_x(), grid.size_y());
    Board::new(ArenaConfig::default(), Box::new(levels)).with_grid(grid)
}

/// Builds a board with an empty `size_x` × `size_y` grid.
pub fn empty_board(size_x: u32, size_y: u32) -> Board {
    let levels = FixedLevelBuilder::new(size_x, size_y);
    Board::new(ArenaConfig::default(), Box::new(levels)).with_grid(Grid::new(size_x, size_y))
}

// =============================================================================
// Entity Placement
// =============================================================================

/// Spawns a tank through the board and returns its handle and validity.
pub fn spawn(board: &mut Board, x: u32, y: u32, tank_type: TankType) -> (EntityId, bool) {
    let valid = board.spawn_tank(x, y, tank_type, Direction::North);
    let id = newest(board);
    (id, valid)
}

/// Registers a tank at an arbitrary position without validation or events.
pub fn place_tank(
    board: &mut Board,
    x: f32,
    y: f32,
    tank_type: TankType,
    facing: Direction,
) -> EntityId {
    let tank = board.registry().create_tank(x, y, tank_type, facing);
    board.registry_mut().add_entity(tank)
}

/// Registers a bullet without validation or events.
pub fn place_bullet(
    board: &mut Board,
    x: f32,
    y: f32,
    friendly: bool,
    direction: Direction,
    speed: f32,
) -> EntityId {
    let bullet = Entity::new_bullet(
        Vec2::new(x, y),
        Vec2::splat(board.config().bullet.size),
        BulletComponents {
            friendly,
            direction,
            speed,
        },
    );
    board.registry_mut().add_entity(bullet)
}

/// Handle of the most recently registered entity.
pub fn newest(board: &Board) -> EntityId {
    board
        .registry()
        .entity_ids()
        .last()
        .expect("registry has entities")
}

// =============================================================================
// Event Inspection
// =============================================================================

/// Kinds of the given events, in order.
pub fn kinds(events: &[Event]) -> Vec<EventKind> {
    events.iter().map(Event::kind).collect()
}

/// Drains the board's queue and returns the event kinds.
pub fn drain_kinds(board: &mut Board) -> Vec<EventKind> {
    kinds(&board.take_events())
}
