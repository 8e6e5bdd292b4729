//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time comes only from the `dt` handed to `tick`
//! - Seeded RNG only (held in the simulation context)
//! - Stable pool iteration order
//! - No rendering or platform dependencies

pub mod collectible;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod explosion;
pub mod player;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collectible::{Collectible, CollectibleKind};
pub use collision::{ContactRule, contact_rule, resolve};
pub use enemy::{Enemy, EnemyBehavior, EnemyState, EnemyVariant, Satellite, Steering};
pub use entity::{Body, Capabilities, EntityKind, Orbit, Pooled, compact};
pub use explosion::{Bomb, Explosion};
pub use player::{AnimationFrame, Player};
pub use projectile::{Bullet, ShotClock};
pub use spawner::{SpawnOrder, Spawner};
pub use state::{GameEvent, GamePhase, GameState, SimContext};
pub use tick::{TickInput, tick};
pub use timer::Timer;
