//! Player controller
//!
//! Turns per-frame movement intent into velocity, and tracks hit points,
//! invincibility and collectible counters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::timer::Timer;
use crate::assets::TextureHandle;
use crate::tuning::Tuning;

/// Walk-cycle frame shown by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationFrame {
    #[default]
    Still,
    LeftStep,
    RightStep,
}

/// Something the player's own update wants reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerNotice {
    InvincibilityEnded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub hp: i32,
    /// Bones since the last invincibility grant
    pub objects_collected: u32,
    /// Discs toward the win condition
    pub goal_objects_collected: u32,
    pub invincible: bool,
    pub invincibility_timer: Timer,
    /// Direction intent for this frame (normalized during update)
    pub velocity: Vec3,
    pub base_speed: f32,
    pub curr_speed: f32,
    pub frame: AnimationFrame,
    animation_timer: Timer,
}

impl Player {
    pub fn new(id: u32, position: Vec3, texture: TextureHandle, tuning: &Tuning) -> Self {
        Self {
            body: Body::new(id, position, texture),
            hp: tuning.player_max_hp,
            objects_collected: 0,
            goal_objects_collected: 0,
            invincible: false,
            invincibility_timer: Timer::new(),
            velocity: Vec3::ZERO,
            base_speed: tuning.player_base_speed,
            curr_speed: tuning.player_base_speed,
            frame: AnimationFrame::Still,
            animation_timer: Timer::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Forget last frame's movement intent
    pub fn clear_velocity(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    /// Add forward (+1) or backward (-1) motion along the current bearing.
    /// Several calls in one frame accumulate.
    pub fn drive(&mut self, sign: i32) {
        self.velocity += self.body.bearing() * sign as f32;
    }

    /// Replace the frame's motion with a step along world x: +1 toward +x,
    /// -1 toward -x. Independent of the current bearing.
    pub fn strafe(&mut self, sign: i32) {
        self.velocity = Vec3::X * sign as f32;
    }

    /// Rotate the bearing: +1 counter-clockwise, -1 clockwise
    pub fn turn(&mut self, sign: i32, rate: f32, dt: f32) {
        let angle = self.body.rotation() + sign as f32 * rate * dt;
        self.body.set_rotation(angle);
    }

    /// Speed for this frame only
    pub fn set_speed(&mut self, multiplier: f32) {
        self.curr_speed = self.base_speed * multiplier;
    }

    /// Unconditional; invincibility gating belongs to the caller
    pub fn take_damage(&mut self) {
        self.hp -= 1;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Become invincible for at least `secs`. A longer running grant is kept.
    pub fn grant_invincibility(&mut self, now: f64, secs: f32) {
        if !self.invincibility_timer.running() || self.invincibility_timer.time_left(now) < secs {
            self.invincibility_timer.stop();
            self.invincibility_timer.start(now, secs);
        }
        self.invincible = true;
    }

    /// Restore one hit point. Returns false when already at the cap.
    pub fn heal(&mut self, cap: i32) -> bool {
        if self.hp >= cap {
            return false;
        }
        self.hp += 1;
        true
    }

    /// Count a bone; the threshold resets the counter and grants invincibility.
    /// Returns true when invincibility was granted.
    pub fn collect_bone(&mut self, now: f64, tuning: &Tuning) -> bool {
        self.objects_collected += 1;
        if self.objects_collected >= tuning.bone_threshold {
            self.objects_collected = 0;
            self.grant_invincibility(now, tuning.pickup_invincibility_secs);
            log::info!("Invincible for {}s", tuning.pickup_invincibility_secs);
            return true;
        }
        false
    }

    /// Count a disc. Returns true once the win threshold is reached.
    pub fn collect_disc(&mut self, tuning: &Tuning) -> bool {
        self.goal_objects_collected += 1;
        self.goal_objects_collected >= tuning.goal_threshold
    }

    pub fn update(&mut self, dt: f32, now: f64, tuning: &Tuning) -> Option<PlayerNotice> {
        // Zero intent means standing still, not NaN
        let direction = self.velocity.normalize_or_zero();
        self.velocity = direction;
        if !self.body.disabled {
            self.body.position += direction * self.curr_speed * dt;
        }
        self.body.advance(dt, now);

        self.animate(now, tuning);

        if self.invincible && self.invincibility_timer.finished(now) {
            self.invincible = false;
            log::info!("No longer invincible");
            return Some(PlayerNotice::InvincibilityEnded);
        }
        None
    }

    fn animate(&mut self, now: f64, tuning: &Tuning) {
        let moving = self.velocity != Vec3::ZERO && self.curr_speed > 0.0;
        if !moving {
            self.frame = AnimationFrame::Still;
            self.animation_timer.stop();
            return;
        }
        if self.animation_timer.running() && !self.animation_timer.finished(now) {
            return;
        }
        // Faster movement, faster steps
        let period = tuning.animation_stride_secs * self.base_speed / self.curr_speed;
        self.animation_timer.start(now, period);
        self.frame = match self.frame {
            AnimationFrame::LeftStep => AnimationFrame::RightStep,
            AnimationFrame::RightStep | AnimationFrame::Still => AnimationFrame::LeftStep,
        };
    }
}
