//! Bullets and the friendly-fire cooldown

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Pooled};
use crate::assets::TextureHandle;

/// A time-boxed projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    /// Unit vector
    pub direction: Vec3,
    pub speed: f32,
    /// Age limit in seconds
    pub lifespan: f32,
    /// Player-fired (hits enemies) vs enemy-fired (hits the player)
    pub friendly: bool,
}

impl Bullet {
    /// `direction` must be non-zero; it is normalized here
    pub fn new(
        id: u32,
        position: Vec3,
        direction: Vec3,
        texture: TextureHandle,
        speed: f32,
        lifespan: f32,
        friendly: bool,
    ) -> Self {
        let direction = direction.normalize_or_zero();
        // Sprite art points up, so rotate a quarter turn back from the heading
        let heading = direction.y.atan2(direction.x) - std::f32::consts::FRAC_PI_2;
        Self {
            body: Body::new(id, position, texture)
                .with_scale(0.5)
                .with_rotation(heading),
            direction,
            speed,
            lifespan,
            friendly,
        }
    }

    pub fn update(&mut self, dt: f32, now: f64) {
        if !self.body.disabled {
            self.body.position += self.direction * self.speed * dt;
        }
        self.body.advance(dt, now);
        if self.body.age >= self.lifespan {
            self.body.mark_for_deletion();
        }
    }
}

impl Pooled for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// Global cooldown for player shots. Enemy shots never consult it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotClock {
    last_friendly_shot: Option<f64>,
}

impl ShotClock {
    /// Claim a friendly shot at `now`. Returns false while cooling down.
    pub fn try_fire(&mut self, now: f64, cooldown: f32) -> bool {
        if let Some(last) = self.last_friendly_shot {
            if now - last < f64::from(cooldown) {
                return false;
            }
        }
        self.last_friendly_shot = Some(now);
        true
    }

    pub fn last_shot(&self) -> Option<f64> {
        self.last_friendly_shot
    }
}
