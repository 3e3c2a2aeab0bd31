//! End-to-end board scenarios.
//!
//! Each test drives the public board operations on a small fixed grid and
//! checks both the returned result and the exact event sequence.

use glam::Vec2;
use tilegrid::{Grid, TileType};

use crate::entity::{Direction, TankType};
use crate::event::{CollisionMember, EventKind};

use super::helpers::{
    board_from_ascii, drain_kinds, empty_board, kinds, newest, place_bullet, place_tank, spawn,
};

// =============================================================================
// Spawning
// =============================================================================

#[test]
fn spawn_enemy_on_empty_grid() {
    let mut board = empty_board(3, 3);
    let (id, valid) = spawn(&mut board, 1, 1, TankType::Basic);

    assert!(valid);
    let events = board.take_events();
    assert_eq!(kinds(&events), vec![EventKind::EntitySpawned]);
    assert_eq!(events[0].entity(), Some(id));
    assert!(board.validate_entity_position(id));
    assert_eq!(board.registry().get(id).unwrap().facing(), Direction::North);
}

#[test]
fn spawn_on_wall_still_registers_tank() {
    let mut board = board_from_ascii(&["@.", ".."]);
    let (id, valid) = spawn(&mut board, 0, 0, TankType::Fast);

    assert!(!valid);
    assert!(board.registry().contains(id));
    let events = board.take_events();
    assert_eq!(
        kinds(&events),
        vec![EventKind::EntitySpawned, EventKind::Collision]
    );
    assert_eq!(
        events[1].collision_members(),
        Some((
            &CollisionMember::EnemyTank(id),
            &CollisionMember::Board {
                x: 0,
                y: 0,
                tile: Some(TileType::Steel)
            }
        ))
    );
}

#[test]
fn player_spawn_reports_player_spawned() {
    let mut board = empty_board(4, 4);
    let (id, valid) = spawn(&mut board, 2, 3, TankType::Player);

    assert!(valid);
    assert_eq!(board.registry().player(), Some(id));
    assert_eq!(drain_kinds(&mut board), vec![EventKind::PlayerSpawned]);
}

#[test]
fn spawn_onto_player_puts_player_first() {
    let mut board = empty_board(4, 4);
    let (player, _) = spawn(&mut board, 1, 1, TankType::Player);
    board.take_events();

    let (enemy, valid) = spawn(&mut board, 1, 1, TankType::Armor);
    assert!(!valid);
    let events = board.take_events();
    assert_eq!(
        events[1].collision_members(),
        Some((
            &CollisionMember::PlayerTank(player),
            &CollisionMember::EnemyTank(enemy)
        ))
    );
}

#[test]
fn spawn_past_the_edge_is_invalid() {
    let mut board = empty_board(3, 3);
    let (id, valid) = spawn(&mut board, 3, 0, TankType::Basic);
    assert!(!valid);
    assert!(board.registry().contains(id));
    assert_eq!(board.events().count_kind(EventKind::Collision), 1);
}

// =============================================================================
// Movement
// =============================================================================

#[test]
fn idle_entity_produces_no_events() {
    let mut board = empty_board(3, 3);
    let id = place_tank(&mut board, 1.0, 1.0, TankType::Basic, Direction::East);

    assert!(!board.move_entity(id));
    assert!(board.events().is_empty());
    assert_eq!(board.registry().get(id).unwrap().position(), Vec2::new(1.0, 1.0));
}

#[test]
fn valid_move_reports_entity_moved() {
    let mut board = empty_board(4, 4);
    let id = place_tank(&mut board, 1.0, 1.0, TankType::Player, Direction::East);
    board.set_tank_moving(id, true);

    assert!(board.move_entity(id));
    let events = board.take_events();
    assert_eq!(kinds(&events), vec![EventKind::EntityMoved]);
    assert_eq!(events[0].entity(), Some(id));
    assert_eq!(board.registry().get(id).unwrap().position(), Vec2::new(1.125, 1.0));
}

#[test]
fn invalid_move_is_reported_but_not_reverted() {
    let mut board = board_from_ascii(&["...", "..#"]);
    let id = place_tank(&mut board, 1.0, 1.0, TankType::Player, Direction::East);
    board.set_tank_moving(id, true);

    assert!(!board.move_entity(id));
    assert_eq!(
        drain_kinds(&mut board),
        vec![EventKind::EntityMoved, EventKind::Collision]
    );
    assert_eq!(board.registry().get(id).unwrap().position(), Vec2::new(1.125, 1.0));
    assert!(!board.validate_entity_position(id));
}

#[test]
fn move_all_uses_registry_order() {
    let mut board = empty_board(8, 8);
    let a = place_bullet(&mut board, 1.0, 4.0, true, Direction::North, 0.5);
    let tank = place_tank(&mut board, 5.0, 5.0, TankType::Basic, Direction::North);
    let b = place_bullet(&mut board, 3.0, 4.0, false, Direction::South, 0.5);

    board.move_all_entities();
    let moved: Vec<_> = board
        .take_events()
        .iter()
        .filter_map(|e| e.entity())
        .collect();
    assert_eq!(moved, vec![a, b]);
    assert_eq!(board.registry().get(tank).unwrap().position(), Vec2::new(5.0, 5.0));
}

#[test]
fn bullet_leaving_the_grid_collides_with_board() {
    let mut board = empty_board(3, 3);
    let id = place_bullet(&mut board, 1.0, 0.25, false, Direction::North, 0.5);

    assert!(!board.move_entity(id));
    let events = board.take_events();
    let (first, second) = events[1].collision_members().unwrap();
    assert_eq!(*first, CollisionMember::EnemyBullet(id));
    assert!(second.is_board());
}

#[test]
fn enemy_bullet_into_player_puts_player_first() {
    let mut board = empty_board(5, 5);
    let player = place_tank(&mut board, 2.0, 2.0, TankType::Player, Direction::North);
    let bullet = place_bullet(&mut board, 2.0, 1.5, false, Direction::South, 0.5);

    assert!(!board.move_entity(bullet));
    let events = board.take_events();
    assert_eq!(
        events[1].collision_members(),
        Some((
            &CollisionMember::PlayerTank(player),
            &CollisionMember::EnemyBullet(bullet)
        ))
    );
}

#[test]
fn player_into_enemy_bullet_puts_player_first() {
    let mut board = empty_board(5, 5);
    let bullet = place_bullet(&mut board, 2.125, 2.0, false, Direction::South, 0.0);
    let player = place_tank(&mut board, 2.0, 2.0, TankType::Player, Direction::East);
    board.set_tank_moving(player, true);

    assert!(!board.move_entity(player));
    let events = board.take_events();
    assert_eq!(
        events[1].collision_members(),
        Some((
            &CollisionMember::PlayerTank(player),
            &CollisionMember::EnemyBullet(bullet)
        ))
    );
}

#[test]
fn enemy_tank_into_friendly_bullet_puts_bullet_first() {
    let mut board = empty_board(5, 5);
    let bullet = place_bullet(&mut board, 1.0, 2.0625, true, Direction::East, 0.0);
    let enemy = place_tank(&mut board, 1.0, 2.0, TankType::Basic, Direction::South);
    board.set_tank_moving(enemy, true);

    assert!(!board.move_entity(enemy));
    let events = board.take_events();
    assert_eq!(
        events[1].collision_members(),
        Some((
            &CollisionMember::FriendlyBullet(bullet),
            &CollisionMember::EnemyTank(enemy)
        ))
    );
}

#[test]
fn bullet_moving_east_hits_offset_tank() {
    let mut board = empty_board(5, 5);
    let enemy = place_tank(&mut board, 2.0, 1.0, TankType::Basic, Direction::North);
    let bullet = place_bullet(&mut board, 1.375, 1.375, true, Direction::East, 0.5);

    assert!(!board.move_entity(bullet));
    let events = board.take_events();
    assert_eq!(
        kinds(&events),
        vec![EventKind::EntityMoved, EventKind::Collision]
    );
    assert_eq!(
        events[1].collision_members(),
        Some((
            &CollisionMember::FriendlyBullet(bullet),
            &CollisionMember::EnemyTank(enemy)
        ))
    );
}

#[test]
fn bullet_moving_south_hits_offset_player() {
    let mut board = empty_board(5, 5);
    let player = place_tank(&mut board, 1.0, 2.0, TankType::Player, Direction::North);
    let bullet = place_bullet(&mut board, 1.375, 1.375, false, Direction::South, 0.5);

    assert!(!board.move_entity(bullet));
    let events = board.take_events();
    assert_eq!(
        events[1].collision_members(),
        Some((
            &CollisionMember::PlayerTank(player),
            &CollisionMember::EnemyBullet(bullet)
        ))
    );
}

#[test]
fn tank_moving_south_reports_bullet_below_its_corner() {
    let mut board = empty_board(5, 5);
    let bullet = place_bullet(&mut board, 1.5, 1.875, false, Direction::North, 0.0);
    let player = place_tank(&mut board, 1.0, 0.875, TankType::Player, Direction::South);
    board.set_tank_moving(player, true);

    assert!(!board.move_entity(player));
    let events = board.take_events();
    let (first, second) = events[1].collision_members().unwrap();
    assert_eq!(*first, CollisionMember::PlayerTank(player));
    assert_eq!(*second, CollisionMember::EnemyBullet(bullet));
    assert!(!second.is_board());
}

// =============================================================================
// Rotation and Snapping
// =============================================================================

#[test]
fn snap_on_aligned_tank_round_trips() {
    let mut board = empty_board(3, 3);
    let (id, _) = spawn(&mut board, 1, 1, TankType::Basic);
    board.take_events();

    assert!(board.snap_tank_to_grid(id, true, true));
    let events = board.take_events();
    assert_eq!(kinds(&events), vec![EventKind::EntityMoved]);
    assert_eq!(events[0].entity(), Some(id));
    assert_eq!(board.registry().get(id).unwrap().position(), Vec2::new(1.0, 1.0));
}

#[test]
fn reversal_never_snaps() {
    let mut board = empty_board(4, 4);
    let id = place_tank(&mut board, 1.5, 1.25, TankType::Power, Direction::East);

    assert!(board.set_tank_direction(id, Direction::West));
    assert_eq!(board.registry().get(id).unwrap().position(), Vec2::new(1.5, 1.25));
    assert_eq!(board.registry().get(id).unwrap().facing(), Direction::West);
    assert_eq!(drain_kinds(&mut board), vec![EventKind::TankRotated]);
}

#[test]
fn quarter_turn_into_wall_is_aborted() {
    let mut board = board_from_ascii(&["...", "..~"]);
    let id = place_tank(&mut board, 1.75, 0.5, TankType::Basic, Direction::North);

    assert!(!board.set_tank_direction(id, Direction::East));
    let tank = board.registry().get(id).unwrap();
    assert_eq!(tank.position(), Vec2::new(1.75, 0.5));
    assert_eq!(tank.facing(), Direction::North);
    assert!(board.events().is_empty());
}

// =============================================================================
// Firing
// =============================================================================

#[test]
fn fire_registers_bullet_in_front() {
    let mut board = empty_board(5, 5);
    let (player, _) = spawn(&mut board, 2, 2, TankType::Player);
    board.take_events();

    assert!(board.fire_tank(player));
    let bullet = newest(&board);
    let events = board.take_events();
    assert_eq!(kinds(&events), vec![EventKind::EntitySpawned]);
    assert_eq!(events[0].entity(), Some(bullet));

    let entity = board.registry().get(bullet).unwrap();
    assert!(entity.as_bullet().unwrap().friendly);
    assert_eq!(entity.position(), Vec2::new(2.375, 1.75));
    assert!(board.validate_entity_position(bullet));
}

#[test]
fn fire_is_cooldown_gated() {
    let mut board = empty_board(5, 5);
    let (enemy, _) = spawn(&mut board, 2, 2, TankType::Basic);
    board.take_events();

    assert!(board.fire_tank(enemy));
    assert!(!board.fire_tank(enemy));
    assert_eq!(board.registry().len(), 2);
}

#[test]
fn fire_into_wall_reports_collision_and_registers_bullet() {
    let mut board = board_from_ascii(&[".#.", "...", "..."]);
    let (tank, _) = spawn(&mut board, 1, 1, TankType::Basic);
    board.take_events();

    assert!(board.fire_tank(tank));
    let events = board.take_events();
    assert_eq!(
        kinds(&events),
        vec![EventKind::Collision, EventKind::EntitySpawned]
    );
    let (first, _) = events[0].collision_members().unwrap();
    assert_eq!(*first, CollisionMember::EnemyTank(tank));
    assert!(board.registry().contains(newest(&board)));
    assert_eq!(board.registry().len(), 2);
}

#[test]
fn bullets_cannot_fire() {
    let mut board = empty_board(3, 3);
    let bullet = place_bullet(&mut board, 1.0, 1.0, true, Direction::North, 0.5);
    assert!(!board.fire_tank(bullet));
    assert!(board.events().is_empty());
}

// =============================================================================
// Terrain
// =============================================================================

#[test]
fn delete_indestructible_tile_is_a_no_op() {
    let mut board = board_from_ascii(&["@~", "%-"]);
    let before = board.grid().clone();
    for y in 0..2 {
        for x in 0..2 {
            assert!(!board.delete_tile(x, y));
        }
    }
    assert_eq!(board.grid(), &before);
    assert!(board.events().is_empty());
}

#[test]
fn deleted_bricks_open_the_path() {
    let mut board = board_from_ascii(&["...", "..#"]);
    let id = place_tank(&mut board, 2.0, 1.0, TankType::Basic, Direction::North);
    assert!(!board.validate_entity_position(id));

    assert!(board.delete_tile(2, 1));
    assert!(board.validate_entity_position(id));
    assert_eq!(drain_kinds(&mut board), vec![EventKind::TileDeleted]);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn kill_all_spares_player_side() {
    let mut board = empty_board(8, 8);
    let player = place_tank(&mut board, 0.0, 0.0, TankType::Player, Direction::North);
    let basic = place_tank(&mut board, 2.0, 0.0, TankType::Basic, Direction::North);
    let friendly = place_bullet(&mut board, 4.0, 0.0, true, Direction::North, 0.5);
    let hostile = place_bullet(&mut board, 5.0, 0.0, false, Direction::North, 0.5);
    let armor = place_tank(&mut board, 6.0, 0.0, TankType::Armor, Direction::North);

    board.kill_all_enemy_entities();

    let registry = board.registry();
    assert_eq!(
        registry.entity_ids().collect::<Vec<_>>(),
        vec![player, friendly]
    );
    assert_eq!(registry.statistics().enemies_killed, 2);
    assert_eq!(registry.statistics().points, 500);
    assert_eq!(registry.statistics().player_deaths, 0);

    let events = board.take_events();
    assert_eq!(
        kinds(&events),
        vec![
            EventKind::TankKilled,
            EventKind::StatisticsChanged,
            EventKind::EntityRemoved,
            EventKind::TankKilled,
            EventKind::StatisticsChanged,
        ]
    );
    assert_eq!(events[0].entity(), Some(armor));
    assert_eq!(events[2].entity(), Some(hostile));
    assert_eq!(events[3].entity(), Some(basic));
}

#[test]
fn remove_all_is_silent() {
    let mut board = empty_board(4, 4);
    let (id, _) = spawn(&mut board, 0, 0, TankType::Basic);
    spawn(&mut board, 2, 2, TankType::Player);
    board.take_events();

    board.remove_all_entities();
    assert!(board.registry().is_empty());
    assert!(board.events().is_empty());
    assert!(!board.validate_entity_position(id));
}

#[test]
fn load_level_replaces_grid_and_entities() {
    let mut board = board_from_ascii(&["##", "##"]);
    let (old, _) = spawn(&mut board, 0, 0, TankType::Basic);
    board.take_events();

    board.load_level(4);

    assert_eq!(board.current_level(), Some(4));
    assert_eq!(board.grid(), &Grid::new(2, 2));
    assert!(!board.registry().contains(old));
    let events = board.take_events();
    assert_eq!(kinds(&events), vec![EventKind::LevelLoaded]);
    assert_eq!(events[0].level_number(), Some(4));
}

#[test]
fn stale_handles_fail_quietly() {
    let mut board = empty_board(4, 4);
    let (id, _) = spawn(&mut board, 1, 1, TankType::Basic);
    board.remove_all_entities();
    board.take_events();

    assert!(!board.move_entity(id));
    assert!(!board.fire_tank(id));
    assert!(!board.set_tank_moving(id, true));
    assert!(!board.set_tank_direction(id, Direction::East));
    assert!(!board.snap_tank_to_grid(id, true, true));
    assert!(board.create_collision_event(id).is_none());
    assert!(board.events().is_empty());
}
