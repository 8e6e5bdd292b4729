//! Collectibles: bones, potions and discs

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Pooled};
use crate::assets::TextureHandle;

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Counts toward pickup invincibility
    Bone,
    /// Restores one hit point up to the cap
    Potion,
    /// Counts toward the win condition
    Disc,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 3] = [
        CollectibleKind::Bone,
        CollectibleKind::Potion,
        CollectibleKind::Disc,
    ];
}

/// A collectible lying in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub body: Body,
    pub kind: CollectibleKind,
}

impl Collectible {
    pub fn new(id: u32, kind: CollectibleKind, position: Vec3, texture: TextureHandle) -> Self {
        Self {
            body: Body::new(id, position, texture).with_scale(0.5),
            kind,
        }
    }

    /// Take the collectible out of play. Returns false if it was already
    /// taken, so a second overlap in the same frame awards nothing.
    pub fn pick_up(&mut self) -> bool {
        if !self.body.is_solid() {
            return false;
        }
        self.body.collidable = false;
        self.body.mark_for_deletion();
        true
    }
}

impl Pooled for Collectible {
    fn body(&self) -> &Body {
        &self.body
    }
}
