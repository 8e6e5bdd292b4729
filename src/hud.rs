//! Heads-up display snapshot
//!
//! The HUD only ever sees a copy of the numbers it shows, captured once per
//! frame after the tick. Glyph layout is the observer's business.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::state::{GamePhase, GameState};

/// Score digits shown on screen
pub const SCORE_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub hp: i32,
    pub max_hp: i32,
    pub invincible: bool,
    /// Seconds of invincibility remaining (0 when not invincible)
    pub invincibility_left: f32,
    /// Bones toward the next invincibility grant
    pub bones: u32,
    pub bone_threshold: u32,
    /// Discs toward the win
    pub discs: u32,
    pub goal_threshold: u32,
    pub position: Vec2,
    pub phase: GamePhase,
    /// Seconds until the next timed enemy spawn
    pub next_enemy_in: f32,
    /// Seconds until the player may fire again (0 when ready)
    pub shot_cooldown_left: f32,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let invincibility_left = if player.invincible {
            player.invincibility_timer.time_left(state.now())
        } else {
            0.0
        };
        let now = state.now();
        let shot_cooldown_left = state.ctx.shots.last_shot().map_or(0.0, |last| {
            (f64::from(state.tuning.friendly_shot_cooldown_secs) - (now - last)).max(0.0) as f32
        });
        Self {
            score: state.ctx.score,
            hp: player.hp,
            max_hp: state.tuning.player_max_hp,
            invincible: player.invincible,
            invincibility_left,
            bones: player.objects_collected,
            bone_threshold: state.tuning.bone_threshold,
            discs: player.goal_objects_collected,
            goal_threshold: state.tuning.goal_threshold,
            position: player.body.planar(),
            phase: state.phase,
            next_enemy_in: state.spawner.next_enemy_in(now),
            shot_cooldown_left,
        }
    }

    /// Zero-padded score digits, most significant first. Scores past the
    /// display width show as all nines.
    pub fn score_digits(&self) -> [u8; SCORE_DIGITS] {
        let max = 10u64.pow(SCORE_DIGITS as u32) - 1;
        let mut value = self.score.min(max);
        let mut digits = [0u8; SCORE_DIGITS];
        for digit in digits.iter_mut().rev() {
            *digit = (value % 10) as u8;
            value /= 10;
        }
        digits
    }

    /// One entry per heart slot: true = full
    pub fn hearts(&self) -> Vec<bool> {
        (0..self.max_hp.max(0)).map(|i| i < self.hp).collect()
    }
}

/// Anything that presents the HUD
pub trait HudObserver {
    fn update(&mut self, snapshot: &HudSnapshot);
}
