//! Headless arena harness.
//! Usage: cargo run --bin arena_harness -- --level 3 --ticks 500 --config arena.json

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tankarena_core::{
    ArenaConfig, Board, CollisionMember, Direction, EntityId, Event, EventKind, TankType,
};
use tilegrid::ProceduralLevelBuilder;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Ticks between volleys.
const FIRE_INTERVAL: u32 = 8;

#[derive(Parser, Debug)]
#[command(name = "arena_harness", about = "Headless tank arena tick loop")]
struct Args {
    /// Level number handed to the procedural builder.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Ticks to simulate before stopping.
    #[arg(long, default_value_t = 200)]
    ticks: u32,
    /// JSON arena configuration; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn populate(board: &mut Board, player_spawn: (u32, u32)) {
    let (px, py) = player_spawn;
    board.spawn_tank(px, py, TankType::Player, Direction::North);

    let right = board.size_x().saturating_sub(1);
    let enemies = [
        (0, TankType::Basic),
        (right / 2, TankType::Fast),
        (right, TankType::Armor),
    ];
    for (x, tank_type) in enemies {
        board.spawn_tank(x, 0, tank_type, Direction::South);
    }

    let tanks: Vec<_> = board
        .registry()
        .entities()
        .filter(|(_, entity)| entity.is_tank())
        .map(|(id, _)| id)
        .collect();
    for id in tanks {
        board.set_tank_moving(id, true);
    }
}

fn fire_all(board: &mut Board) {
    let tanks: Vec<_> = board
        .registry()
        .entities()
        .filter(|(_, entity)| entity.is_tank())
        .map(|(id, _)| id)
        .collect();
    for id in tanks {
        board.fire_tank(id);
    }
}

/// Applies the consequences of one collision: bullets are spent, struck
/// tanks of the other side take a hit, bricks under a bullet break and
/// blocked tanks turn around.
fn resolve_collision(board: &mut Board, first: CollisionMember, second: CollisionMember) {
    use CollisionMember::{Board as Terrain, EnemyBullet, EnemyTank, FriendlyBullet, PlayerTank};

    match (first, second) {
        (FriendlyBullet(bullet), EnemyTank(tank)) | (PlayerTank(tank), EnemyBullet(bullet)) => {
            board.remove_entity(bullet);
            board.hit_tank(tank);
        }
        (FriendlyBullet(a) | EnemyBullet(a), FriendlyBullet(b) | EnemyBullet(b)) => {
            board.remove_entity(a);
            board.remove_entity(b);
        }
        (FriendlyBullet(bullet) | EnemyBullet(bullet), Terrain { x, y, .. }) => {
            board.remove_entity(bullet);
            board.delete_tile(x, y);
        }
        (FriendlyBullet(bullet) | EnemyBullet(bullet), PlayerTank(_) | EnemyTank(_)) => {
            board.remove_entity(bullet);
        }
        (PlayerTank(tank) | EnemyTank(tank), _) => turn_around(board, tank),
        (Terrain { .. }, _) => {}
    }
}

fn turn_around(board: &mut Board, tank: EntityId) {
    if let Some(facing) = board.registry().get(tank).map(|entity| entity.facing()) {
        board.set_tank_direction(tank, facing.opposite());
    }
}

fn record(counts: &mut HashMap<EventKind, usize>, events: &[Event]) {
    for event in events {
        *counts.entry(event.kind()).or_default() += 1;
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ArenaConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ArenaConfig::default(),
    };
    info!(
        level = args.level,
        ticks = args.ticks,
        config = ?args.config,
        "harness starting"
    );

    let levels =
        ProceduralLevelBuilder::new(config.level.size_x, config.level.size_y, config.level.seed);
    let player_spawn = levels.player_spawn();
    let mut board = Board::new(config, Box::new(levels));
    board.load_level(args.level);
    populate(&mut board, player_spawn);

    let mut counts = HashMap::new();
    record(&mut counts, &board.take_events());

    for tick in 0..args.ticks {
        board.move_all_entities();
        if tick % FIRE_INTERVAL == 0 {
            fire_all(&mut board);
        }

        let events = board.take_events();
        for event in &events {
            if let Some((first, second)) = event.collision_members() {
                resolve_collision(&mut board, *first, *second);
            }
        }
        record(&mut counts, &events);
        record(&mut counts, &board.take_events());

        debug!(tick, live = board.registry().len(), "tick complete");
        if board.registry().player().is_none() {
            info!(tick, "player destroyed");
            break;
        }
    }

    for kind in EventKind::ALL {
        if let Some(count) = counts.get(&kind) {
            info!(%kind, count, "event total");
        }
    }
    let stats = board.registry().statistics();
    info!(
        points = stats.points,
        enemies_killed = stats.enemies_killed,
        player_deaths = stats.player_deaths,
        "harness finished"
    );
    Ok(())
}
