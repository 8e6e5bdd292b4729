//! Bone Hunt - a top-down collect-and-survive arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, enemy AI, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `hud`: Read-only per-frame snapshot for the heads-up display
//! - `render`: Draw list and camera handed to an external renderer
//! - `assets`: Texture handle table filled by an external loader

pub mod assets;
pub mod hud;
pub mod render;
pub mod sim;
pub mod tuning;

pub use hud::{HudObserver, HudSnapshot};
pub use tuning::{Tuning, TuningError};

use glam::{Vec2, Vec3};

/// World configuration constants
pub mod consts {
    /// Fixed timestep used by the headless driver (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Spawn grid: positions are drawn from `SPAWN_MIN..SPAWN_MIN + SPAWN_SPAN`
    pub const SPAWN_MIN: i32 = -2;
    pub const SPAWN_SPAN: i32 = 15;

    /// Player hit points at start (and the potion cap)
    pub const PLAYER_MAX_HP: i32 = 3;

    /// Camera zoom used for the world view
    pub const CAMERA_ZOOM: f32 = 0.35;
    /// Background tile scale (covers the whole playfield)
    pub const BACKGROUND_SCALE: f32 = 90.0;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) around `center` to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Distance in the play plane (depth ignored)
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).truncate().length()
}
