//! Enemy behavior state machine
//!
//! Enemies patrol a circle around their spawn anchor until the resolver sees
//! the player inside the trigger radius, then intercept the player's last
//! known position for the rest of their life.
//!
//! Two specializations hang off the base machine:
//! - `Orbiting`: carries a decorative satellite that circles the enemy
//! - `Shooter`: fires at the player while intercepting, on its own cooldown

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Body, EntityKind, Pooled};
use super::timer::Timer;
use crate::assets::TextureHandle;
use crate::tuning::Tuning;

/// Behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Patrolling,
    Intercepting,
}

/// How an intercepting enemy updates its velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steering {
    /// Re-aim straight at the target only when the re-aim timer allows
    Throttled,
    /// Integrate a steering acceleration every frame, slowing on arrival
    Continuous,
}

/// Spawnable enemy flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    Standard,
    Orbiting,
    Shooter,
}

/// Decorative companion slaved to an orbit around its enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Satellite {
    pub body: Body,
    pub radius: f32,
    /// Orbit angular speed (radians/s)
    pub angular_speed: f32,
    /// Self-rotation (radians/s)
    pub spin: f32,
    pub angle: f32,
}

impl Satellite {
    fn follow(&mut self, center: Vec3, dt: f32, now: f64) {
        self.angle += self.angular_speed * dt;
        self.body.position = Vec3::new(
            center.x + self.radius * self.angle.cos(),
            center.y + self.radius * self.angle.sin(),
            center.z,
        );
        let spun = self.body.rotation() + self.spin * dt;
        self.body.set_rotation(spun);
        self.body.advance(dt, now);
    }
}

/// Variant-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyBehavior {
    Standard,
    Orbiting(Satellite),
    Shooter {
        cooldown: Timer,
        /// Seconds between shots
        period: f32,
    },
}

/// A bullet the enemy wants fired this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub state: EnemyState,
    pub steering: Steering,
    /// Center of the patrol circle
    pub anchor: Vec3,
    pub patrol_radius: f32,
    /// Radians/s around the anchor
    pub patrol_speed: f32,
    pub patrol_phase: f32,
    pub chase_speed: f32,
    pub reaim_secs: f32,
    /// Continuous steering slows down inside this radius
    pub arrival_radius: f32,
    pub steering_gain: f32,
    pub velocity: Vec3,
    /// Refreshed by the resolver every frame
    pub last_player_pos: Vec3,
    pub reaim_timer: Timer,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    pub fn new(
        id: u32,
        variant: EnemyVariant,
        position: Vec3,
        texture: TextureHandle,
        satellite_texture: TextureHandle,
        satellite_id: u32,
        tuning: &Tuning,
    ) -> Self {
        let (chase_speed, reaim_secs, steering, behavior) = match variant {
            EnemyVariant::Standard => (
                tuning.chase_speed,
                tuning.reaim_secs,
                Steering::Throttled,
                EnemyBehavior::Standard,
            ),
            EnemyVariant::Orbiting => {
                let mut body = Body::new(satellite_id, position, satellite_texture).with_scale(0.5);
                body.collidable = EntityKind::Decoration.capabilities().collidable;
                let satellite = Satellite {
                    body,
                    radius: tuning.satellite_radius,
                    angular_speed: tuning.satellite_speed,
                    spin: tuning.satellite_spin,
                    angle: 0.0,
                };
                (
                    tuning.chase_speed,
                    tuning.reaim_secs,
                    Steering::Continuous,
                    EnemyBehavior::Orbiting(satellite),
                )
            }
            EnemyVariant::Shooter => (
                tuning.shooter_chase_speed,
                tuning.shooter_reaim_secs,
                Steering::Throttled,
                EnemyBehavior::Shooter {
                    cooldown: Timer::new(),
                    period: tuning.shooter_cooldown_secs,
                },
            ),
        };

        Self {
            body: Body::new(id, position, texture).with_rotation(std::f32::consts::FRAC_PI_2),
            state: EnemyState::Patrolling,
            steering,
            anchor: position,
            patrol_radius: tuning.patrol_radius,
            patrol_speed: tuning.patrol_angular_speed,
            patrol_phase: 0.0,
            chase_speed,
            reaim_secs,
            arrival_radius: tuning.arrival_radius,
            steering_gain: tuning.steering_gain,
            velocity: Vec3::ZERO,
            last_player_pos: position,
            reaim_timer: Timer::new(),
            behavior,
        }
    }

    pub fn variant(&self) -> EnemyVariant {
        match self.behavior {
            EnemyBehavior::Standard => EnemyVariant::Standard,
            EnemyBehavior::Orbiting(_) => EnemyVariant::Orbiting,
            EnemyBehavior::Shooter { .. } => EnemyVariant::Shooter,
        }
    }

    pub fn satellite(&self) -> Option<&Satellite> {
        match &self.behavior {
            EnemyBehavior::Orbiting(s) => Some(s),
            _ => None,
        }
    }

    pub fn update_player_pos(&mut self, pos: Vec3) {
        self.last_player_pos = pos;
    }

    /// Switch to chasing. Returns true on the transition.
    pub fn alert(&mut self) -> bool {
        if self.state == EnemyState::Intercepting {
            return false;
        }
        self.state = EnemyState::Intercepting;
        true
    }

    /// Planar direction to the last known player position (zero if on top)
    fn aim(&self) -> Vec3 {
        let mut to_target = self.last_player_pos - self.body.position;
        to_target.z = 0.0;
        to_target.normalize_or_zero()
    }

    fn face(&mut self, dir: Vec3) {
        if dir != Vec3::ZERO {
            self.body.set_rotation(dir.y.atan2(dir.x));
        }
    }

    pub fn update(&mut self, dt: f32, now: f64) -> Option<ShotRequest> {
        if !self.body.disabled {
            match self.state {
                EnemyState::Patrolling => self.patrol(dt),
                EnemyState::Intercepting => match self.steering {
                    Steering::Throttled => self.intercept_throttled(dt, now),
                    Steering::Continuous => self.intercept_continuous(dt),
                },
            }
        }
        self.body.advance(dt, now);

        let center = self.body.position;
        let intercepting = self.state == EnemyState::Intercepting;
        let aim = self.aim();
        match &mut self.behavior {
            EnemyBehavior::Standard => None,
            EnemyBehavior::Orbiting(satellite) => {
                satellite.follow(center, dt, now);
                None
            }
            EnemyBehavior::Shooter { cooldown, period } => {
                if !intercepting || aim == Vec3::ZERO {
                    return None;
                }
                if cooldown.running() && !cooldown.finished(now) {
                    return None;
                }
                cooldown.start(now, *period);
                Some(ShotRequest {
                    origin: center + aim,
                    direction: aim,
                })
            }
        }
    }

    /// Circle the anchor; face along the tangent
    fn patrol(&mut self, dt: f32) {
        self.patrol_phase += self.patrol_speed * dt;
        let (sin, cos) = self.patrol_phase.sin_cos();
        self.body.position = Vec3::new(
            self.anchor.x + self.patrol_radius * cos,
            self.anchor.y + self.patrol_radius * sin,
            self.anchor.z,
        );
        self.body
            .set_rotation(self.patrol_phase + std::f32::consts::FRAC_PI_2);
    }

    fn intercept_throttled(&mut self, dt: f32, now: f64) {
        if !self.reaim_timer.running() || self.reaim_timer.finished(now) {
            let dir = self.aim();
            self.velocity = dir * self.chase_speed;
            self.face(dir);
            self.reaim_timer.start(now, self.reaim_secs);
        }
        self.body.position += self.velocity * dt;
    }

    fn intercept_continuous(&mut self, dt: f32) {
        let mut to_target = self.last_player_pos - self.body.position;
        to_target.z = 0.0;
        let distance = to_target.length();

        let desired = if distance > f32::EPSILON {
            let arrival = (distance / self.arrival_radius).min(1.0);
            to_target / distance * self.chase_speed * arrival
        } else {
            Vec3::ZERO
        };

        let blend = (self.steering_gain * dt).min(1.0);
        self.velocity += (desired - self.velocity) * blend;
        self.velocity = self.velocity.clamp_length_max(self.chase_speed);
        self.body.position += self.velocity * dt;

        let heading = self.velocity.normalize_or_zero();
        self.face(heading);
    }
}

impl Pooled for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }
}
