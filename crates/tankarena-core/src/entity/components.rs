//! Kind-specific component structs for entities.
//!
//! [`TankComponents`] and [`BulletComponents`] hold all state that only one
//! entity kind carries. Shared state (position, extent, facing) lives on
//! [`Entity`](super::Entity) itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TankParams;

/// Tank archetype.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankType {
    /// The player's tank.
    Player,
    /// Slow enemy with a slow gun.
    Basic,
    /// Fast-moving enemy.
    Fast,
    /// Enemy with a rapid-fire gun.
    Power,
    /// Heavily armoured enemy.
    Armor,
}

impl TankType {
    /// All archetypes, player first.
    pub const ALL: [TankType; 5] = [
        Self::Player,
        Self::Basic,
        Self::Fast,
        Self::Power,
        Self::Armor,
    ];

    /// Returns `true` for the player's tank type.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }
}

impl fmt::Display for TankType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Basic => write!(f, "Basic"),
            Self::Fast => write!(f, "Fast"),
            Self::Power => write!(f, "Power"),
            Self::Armor => write!(f, "Armor"),
        }
    }
}

/// Firing cooldown measured in movement steps.
///
/// A fresh cooldown is ready. Firing arms it for `period` steps; each
/// [`tick`](Self::tick) counts one step down.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireCooldown {
    period: u32,
    remaining: u32,
}

impl FireCooldown {
    /// Creates a ready cooldown with the given period.
    #[must_use]
    pub const fn new(period: u32) -> Self {
        Self {
            period,
            remaining: 0,
        }
    }

    /// Steps between shots.
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Steps left before the next shot.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns `true` if a shot may be fired now.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    /// Arms the cooldown after a shot.
    pub fn trigger(&mut self) {
        self.remaining = self.period;
    }

    /// Counts down one step.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Components for tank entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankComponents {
    /// Archetype, decides player/enemy classification.
    pub tank_type: TankType,
    /// Remaining hit points.
    pub health: u32,
    /// Tiles travelled per movement step.
    pub speed: f32,
    /// Whether the tank advances on its next movement step.
    pub moving: bool,
    /// Firing cooldown.
    pub cooldown: FireCooldown,
}

impl TankComponents {
    /// Creates idle tank components from archetype parameters.
    #[must_use]
    pub fn new(tank_type: TankType, params: &TankParams) -> Self {
        Self {
            tank_type,
            health: params.health,
            speed: params.speed,
            moving: false,
            cooldown: FireCooldown::new(params.fire_cooldown),
        }
    }
}

/// Components for bullet entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletComponents {
    /// Fired by the player's side.
    pub friendly: bool,
    /// Direction of travel.
    pub direction: super::Direction,
    /// Tiles travelled per movement step.
    pub speed: f32,
}
