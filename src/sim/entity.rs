//! Entity base: transform, lifecycle flags and the kind/capability table
//!
//! Every pooled object embeds a [`Body`]. Behavior differences between kinds
//! are expressed through [`EntityKind`] and its [`Capabilities`] rather than
//! by probing concrete types.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collectible::CollectibleKind;
use crate::assets::TextureHandle;
use crate::{normalize_angle, polar_to_cartesian};

/// Circular motion around a fixed center, parametrized by the simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub radius: f32,
    /// Radians per second
    pub angular_speed: f32,
    pub center: Vec2,
}

impl Orbit {
    pub fn position_at(&self, time: f64) -> Vec2 {
        let angle = (f64::from(self.angular_speed) * time) as f32;
        polar_to_cartesian(self.center, self.radius, angle)
    }
}

/// Shared state of every simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    /// x, y in the play plane; z is draw depth only
    pub position: Vec3,
    /// Always stored in [0, 2π)
    rotation: f32,
    pub scale: Vec2,
    pub collidable: bool,
    /// Frozen in place (no self-driven motion)
    pub disabled: bool,
    marked_for_deletion: bool,
    pub orbit: Option<Orbit>,
    pub texture: TextureHandle,
    /// Seconds since creation
    pub age: f32,
}

impl Body {
    pub fn new(id: u32, position: Vec3, texture: TextureHandle) -> Self {
        Self {
            id,
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
            collidable: true,
            disabled: false,
            marked_for_deletion: false,
            orbit: None,
            texture,
            age: 0.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::splat(scale);
        self
    }

    pub fn with_rotation(mut self, angle: f32) -> Self {
        self.set_rotation(angle);
        self
    }

    pub fn with_orbit(mut self, radius: f32, angular_speed: f32, center: Vec2) -> Self {
        self.orbit = Some(Orbit {
            radius,
            angular_speed,
            center,
        });
        self
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, angle: f32) {
        self.rotation = normalize_angle(angle);
    }

    /// Facing direction
    pub fn bearing(&self) -> Vec3 {
        Vec3::new(self.rotation.cos(), self.rotation.sin(), 0.0)
    }

    #[inline]
    pub fn planar(&self) -> Vec2 {
        self.position.truncate()
    }

    pub fn mark_for_deletion(&mut self) {
        self.marked_for_deletion = true;
    }

    #[inline]
    pub fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }

    /// Alive and able to take part in collisions this frame
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.collidable && !self.marked_for_deletion
    }

    /// Advance age and, for orbiting bodies, snap to the orbit path
    pub fn advance(&mut self, dt: f32, now: f64) {
        self.age += dt;
        if let Some(orbit) = self.orbit {
            let p = orbit.position_at(now);
            self.position = Vec3::new(p.x, p.y, self.position.z);
        }
    }
}

/// Closed set of entity kinds the resolver distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Bullet { friendly: bool },
    Collectible(CollectibleKind),
    Explosion,
    Bomb,
    /// Visual-only objects (orbiting axe, enemy satellites)
    Decoration,
}

/// What an entity kind can do when it touches the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// New bodies of this kind start collidable
    pub collidable: bool,
    /// Touching it hurts a non-invincible player
    pub hazard: bool,
    /// Touching the player destroys it (score + explosion)
    pub destructible: bool,
    /// Touching the player picks it up
    pub pickup: bool,
}

impl EntityKind {
    pub const fn capabilities(self) -> Capabilities {
        match self {
            EntityKind::Player => Capabilities {
                collidable: true,
                hazard: false,
                destructible: false,
                pickup: false,
            },
            EntityKind::Enemy => Capabilities {
                collidable: true,
                hazard: true,
                destructible: true,
                pickup: false,
            },
            EntityKind::Bullet { friendly } => Capabilities {
                collidable: true,
                hazard: !friendly,
                destructible: false,
                pickup: false,
            },
            EntityKind::Collectible(_) => Capabilities {
                collidable: true,
                hazard: false,
                destructible: false,
                pickup: true,
            },
            EntityKind::Explosion | EntityKind::Bomb => Capabilities {
                collidable: false,
                hazard: false,
                destructible: false,
                pickup: false,
            },
            EntityKind::Decoration => Capabilities {
                collidable: false,
                hazard: true,
                destructible: false,
                pickup: false,
            },
        }
    }
}

/// Anything stored in a pool
pub trait Pooled {
    fn body(&self) -> &Body;
}

impl Pooled for Body {
    fn body(&self) -> &Body {
        self
    }
}

/// Drop every deletion-flagged entity. Returns how many were removed.
///
/// Must only run after all collision passes for the frame.
pub fn compact<T: Pooled>(pool: &mut Vec<T>) -> usize {
    let before = pool.len();
    pool.retain(|e| !e.body().is_marked_for_deletion());
    before - pool.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn body() -> Body {
        Body::new(1, Vec3::ZERO, TextureHandle::PLACEHOLDER)
    }

    #[test]
    fn test_bearing() {
        let b = body().with_rotation(FRAC_PI_2);
        assert!((b.bearing() - Vec3::Y).length() < 1e-5);
        let b = body().with_rotation(0.0);
        assert!((b.bearing() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_negative_rotation_wraps() {
        let b = body().with_rotation(-PI / 4.0);
        assert!((b.rotation() - 1.75 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_follows_clock() {
        let mut b = body().with_orbit(1.0, 3.0, Vec2::new(2.0, 2.0));
        b.advance(0.0, 0.0);
        assert!((b.planar() - Vec2::new(3.0, 2.0)).length() < 1e-5);
        b.advance(0.1, (PI / 6.0) as f64);
        assert!((b.planar() - Vec2::new(2.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn test_compact_removes_marked_only() {
        let mut pool: Vec<Body> = (0..4)
            .map(|i| Body::new(i, Vec3::ZERO, TextureHandle::PLACEHOLDER))
            .collect();
        pool[1].mark_for_deletion();
        pool[3].mark_for_deletion();
        assert_eq!(compact(&mut pool), 2);
        assert_eq!(pool.iter().map(|b| b.id).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_capabilities_table() {
        assert!(EntityKind::Enemy.capabilities().destructible);
        assert!(EntityKind::Bullet { friendly: false }.capabilities().hazard);
        assert!(!EntityKind::Bullet { friendly: true }.capabilities().hazard);
        assert!(EntityKind::Collectible(CollectibleKind::Disc).capabilities().pickup);
        assert!(!EntityKind::Decoration.capabilities().collidable);
    }

    proptest! {
        #[test]
        fn stored_rotation_is_normalized(angle in -100.0f32..100.0) {
            let mut b = body();
            b.set_rotation(angle);
            prop_assert!(b.rotation() >= 0.0 && b.rotation() < TAU);
        }
    }
}
