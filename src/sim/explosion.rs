//! Explosions and bombs
//!
//! Explosions are transient markers with a fixed-duration timer. Bombs burn a
//! fuse and then blow up every enemy inside their blast radius.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Body, EntityKind, Pooled};
use super::timer::Timer;
use crate::assets::TextureHandle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub body: Body,
    pub timer: Timer,
}

impl Explosion {
    pub fn new(id: u32, position: Vec3, texture: TextureHandle, now: f64, duration: f32) -> Self {
        let mut body = Body::new(id, position, texture);
        body.collidable = EntityKind::Explosion.capabilities().collidable;
        let mut timer = Timer::new();
        timer.start(now, duration);
        Self { body, timer }
    }

    pub fn update(&mut self, dt: f32, now: f64) {
        self.body.advance(dt, now);
        if self.timer.finished(now) {
            self.body.mark_for_deletion();
        }
    }
}

impl Pooled for Explosion {
    fn body(&self) -> &Body {
        &self.body
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub body: Body,
    /// Seconds until detonation
    pub fuse: f32,
    pub blast_radius: f32,
    pub detonated: bool,
}

impl Bomb {
    pub fn new(id: u32, position: Vec3, texture: TextureHandle, fuse: f32, blast_radius: f32) -> Self {
        let mut body = Body::new(id, position, texture).with_scale(0.5);
        body.collidable = EntityKind::Bomb.capabilities().collidable;
        Self {
            body,
            fuse,
            blast_radius,
            detonated: false,
        }
    }

    /// Burn the fuse. Returns true on the frame the bomb goes off.
    pub fn update(&mut self, dt: f32, now: f64) -> bool {
        self.body.advance(dt, now);
        if self.detonated {
            return false;
        }
        self.fuse -= dt;
        if self.fuse <= 0.0 {
            self.detonated = true;
            return true;
        }
        false
    }
}

impl Pooled for Bomb {
    fn body(&self) -> &Body {
        &self.body
    }
}
