//! Texture handle table
//!
//! The simulation never looks inside a texture: it stores opaque handles and
//! passes them through to the renderer. Loading the image data is the job of
//! an external [`AssetLoader`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque renderer-side texture id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// Handle used when a texture failed to load (renderer draws a flat quad)
    pub const PLACEHOLDER: Self = Self(0);

    pub fn is_placeholder(self) -> bool {
        self == Self::PLACEHOLDER
    }
}

/// Why a texture could not be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    NotFound(String),
    Decode { path: String, reason: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "texture not found: {path}"),
            Self::Decode { path, reason } => write!(f, "cannot decode {path}: {reason}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Supplies texture handles at setup time
pub trait AssetLoader {
    fn load_texture(&mut self, path: &str) -> Result<TextureHandle, AssetError>;
}

/// Every texture the game asks for, by role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    PlayerLeftStep,
    PlayerRightStep,
    PlayerStill,
    Enemy,
    Background,
    Bullet,
    Explosion,
    Bone,
    Axe,
    Potion,
    Disc,
    Bomb,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 12] = [
        TextureSlot::PlayerLeftStep,
        TextureSlot::PlayerRightStep,
        TextureSlot::PlayerStill,
        TextureSlot::Enemy,
        TextureSlot::Background,
        TextureSlot::Bullet,
        TextureSlot::Explosion,
        TextureSlot::Bone,
        TextureSlot::Axe,
        TextureSlot::Potion,
        TextureSlot::Disc,
        TextureSlot::Bomb,
    ];

    /// Path relative to the resources directory
    pub fn path(self) -> &'static str {
        match self {
            TextureSlot::PlayerLeftStep => "textures/player_frames/left_step.png",
            TextureSlot::PlayerRightStep => "textures/player_frames/right_step.png",
            TextureSlot::PlayerStill => "textures/player_frames/still.png",
            TextureSlot::Enemy => "textures/enemy_orange.png",
            TextureSlot::Background => "textures/grass03.png",
            TextureSlot::Bullet => "textures/orb.png",
            TextureSlot::Explosion => "textures/explosion0.png",
            TextureSlot::Bone => "textures/bone.png",
            TextureSlot::Axe => "textures/axe.png",
            TextureSlot::Potion => "textures/potion.png",
            TextureSlot::Disc => "textures/disc.png",
            TextureSlot::Bomb => "textures/bomb.png",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Loaded handles, indexed by [`TextureSlot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Textures {
    handles: [TextureHandle; TextureSlot::ALL.len()],
}

impl Default for Textures {
    /// Every slot gets a distinct synthetic handle (headless runs and tests)
    fn default() -> Self {
        let mut handles = [TextureHandle::PLACEHOLDER; TextureSlot::ALL.len()];
        for (i, handle) in handles.iter_mut().enumerate() {
            *handle = TextureHandle(i as u32 + 1);
        }
        Self { handles }
    }
}

impl Textures {
    /// Ask the loader for every slot. Failures are logged and degrade to the
    /// placeholder handle; they never abort setup.
    pub fn load(loader: &mut dyn AssetLoader, resources_dir: &str) -> Self {
        let mut handles = [TextureHandle::PLACEHOLDER; TextureSlot::ALL.len()];
        let mut failures = 0;
        for slot in TextureSlot::ALL {
            let path = format!("{}/{}", resources_dir.trim_end_matches('/'), slot.path());
            handles[slot.index()] = match loader.load_texture(&path) {
                Ok(handle) => handle,
                Err(e) => {
                    log::warn!("{e}, using placeholder");
                    failures += 1;
                    TextureHandle::PLACEHOLDER
                }
            };
        }
        if failures > 0 {
            log::warn!("{failures} of {} textures missing", TextureSlot::ALL.len());
        } else {
            log::info!("Loaded {} textures", TextureSlot::ALL.len());
        }
        Self { handles }
    }

    #[inline]
    pub fn get(&self, slot: TextureSlot) -> TextureHandle {
        self.handles[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loader that fails for anything under `missing`
    struct FakeLoader {
        next: u32,
        missing: &'static str,
    }

    impl AssetLoader for FakeLoader {
        fn load_texture(&mut self, path: &str) -> Result<TextureHandle, AssetError> {
            if path.contains(self.missing) {
                return Err(AssetError::NotFound(path.to_string()));
            }
            self.next += 1;
            Ok(TextureHandle(100 + self.next))
        }
    }

    #[test]
    fn test_failed_texture_degrades_to_placeholder() {
        let mut loader = FakeLoader {
            next: 0,
            missing: "axe",
        };
        let textures = Textures::load(&mut loader, "res/");
        assert!(textures.get(TextureSlot::Axe).is_placeholder());
        assert!(!textures.get(TextureSlot::Enemy).is_placeholder());
        assert_eq!(loader.next as usize, TextureSlot::ALL.len() - 1);
    }

    #[test]
    fn test_default_handles_are_distinct() {
        let textures = Textures::default();
        assert_ne!(
            textures.get(TextureSlot::Bone),
            textures.get(TextureSlot::Potion)
        );
        assert!(TextureSlot::ALL.iter().all(|s| !textures.get(*s).is_placeholder()));
    }

    #[test]
    fn test_slot_indices_match_table() {
        for (i, slot) in TextureSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }
}
