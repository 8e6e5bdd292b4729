//! Timer-gated spawning of enemies and collectibles
//!
//! The spawner only decides *what* appears and *where*; the game state turns
//! its orders into pooled entities.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collectible::CollectibleKind;
use super::enemy::EnemyVariant;
use super::timer::Timer;
use crate::consts::{SPAWN_MIN, SPAWN_SPAN};
use crate::tuning::Tuning;

/// Something to create this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnOrder {
    Enemy { variant: EnemyVariant, position: Vec3 },
    Collectible { kind: CollectibleKind, position: Vec3 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    enemy_timer: Timer,
    collectible_timer: Timer,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Random integer grid point inside the spawn square
    fn random_position<R: Rng>(rng: &mut R) -> Vec3 {
        let x = rng.random_range(0..SPAWN_SPAN) + SPAWN_MIN;
        let y = rng.random_range(0..SPAWN_SPAN) + SPAWN_MIN;
        Vec3::new(x as f32, y as f32, 0.0)
    }

    fn random_variant<R: Rng>(rng: &mut R) -> EnemyVariant {
        match rng.random_range(0..3) {
            0 => EnemyVariant::Standard,
            1 => EnemyVariant::Shooter,
            _ => EnemyVariant::Orbiting,
        }
    }

    /// Poll both timers. A timer that fires is restarted in the same call.
    pub fn poll<R: Rng>(&mut self, now: f64, tuning: &Tuning, rng: &mut R) -> Vec<SpawnOrder> {
        let mut orders = Vec::new();

        // Arm on first use
        self.enemy_timer.start(now, tuning.enemy_spawn_secs);
        self.collectible_timer.start(now, tuning.collectible_spawn_secs);

        if self.enemy_timer.finished(now) {
            self.enemy_timer.start(now, tuning.enemy_spawn_secs);
            orders.push(SpawnOrder::Enemy {
                variant: Self::random_variant(rng),
                position: Self::random_position(rng),
            });
        }

        if self.collectible_timer.finished(now) {
            self.collectible_timer.start(now, tuning.collectible_spawn_secs);
            for kind in CollectibleKind::ALL {
                orders.push(SpawnOrder::Collectible {
                    kind,
                    position: Self::random_position(rng),
                });
            }
        }

        orders
    }

    pub fn next_enemy_in(&self, now: f64) -> f32 {
        self.enemy_timer.time_left(now)
    }
}
