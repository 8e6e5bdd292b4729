//! Draw list and camera for an external renderer
//!
//! The simulation never draws. Each frame the driver builds a flat list of
//! GPU-ready sprite instances from a read-only view of the state and hands it,
//! together with the view matrix, to whatever implements [`Renderer`].

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec2, Vec3};

use crate::assets::{TextureHandle, TextureSlot};
use crate::consts::CAMERA_ZOOM;
use crate::sim::entity::Body;
use crate::sim::player::AnimationFrame;
use crate::sim::state::GameState;

/// Player is flashing (invincible)
pub const FLAG_INVINCIBLE: u32 = 1;
/// Hostile projectile (tinted differently from friendly shots)
pub const FLAG_HOSTILE: u32 = 1 << 1;

/// One textured quad (must match the sprite shader's instance layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Column-major model matrix
    pub transform: [[f32; 4]; 4], // offset 0
    pub texture: u32,              // offset 64
    pub flags: u32,                // offset 68
    _pad: [u32; 2],                // pad to 80 bytes
}

impl SpriteInstance {
    pub fn new(body: &Body, texture: TextureHandle, flags: u32) -> Self {
        Self {
            transform: sprite_transform(body).to_cols_array_2d(),
            texture: texture.0,
            flags,
            _pad: [0; 2],
        }
    }
}

/// Model matrix: scale, then rotate about z, then translate (depth kept)
pub fn sprite_transform(body: &Body) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(body.scale.x, body.scale.y, 1.0),
        Quat::from_rotation_z(body.rotation()),
        body.position,
    )
}

/// World-to-clip transform centered on `camera`
pub fn view_matrix(width: u32, height: u32, camera: Vec2) -> Mat4 {
    let aspect = if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    };
    Mat4::from_scale(Vec3::new(CAMERA_ZOOM / aspect, CAMERA_ZOOM, 1.0))
        * Mat4::from_translation(-camera.extend(0.0))
}

/// Everything visible this frame, back-to-front by pool; background last
pub fn build_draw_list(state: &GameState) -> Vec<SpriteInstance> {
    let mut sprites = Vec::with_capacity(state.entity_count() + state.enemies.len() + 1);

    for explosion in &state.explosions {
        sprites.push(SpriteInstance::new(&explosion.body, explosion.body.texture, 0));
    }

    let player = &state.player;
    let slot = match player.frame {
        AnimationFrame::Still => TextureSlot::PlayerStill,
        AnimationFrame::LeftStep => TextureSlot::PlayerLeftStep,
        AnimationFrame::RightStep => TextureSlot::PlayerRightStep,
    };
    let flags = if player.invincible { FLAG_INVINCIBLE } else { 0 };
    sprites.push(SpriteInstance::new(&player.body, state.textures.get(slot), flags));

    for enemy in &state.enemies {
        sprites.push(SpriteInstance::new(&enemy.body, enemy.body.texture, 0));
        if let Some(satellite) = enemy.satellite() {
            sprites.push(SpriteInstance::new(&satellite.body, satellite.body.texture, 0));
        }
    }

    for bullet in &state.bullets {
        let flags = if bullet.friendly { 0 } else { FLAG_HOSTILE };
        sprites.push(SpriteInstance::new(&bullet.body, bullet.body.texture, flags));
    }
    for bomb in &state.bombs {
        sprites.push(SpriteInstance::new(&bomb.body, bomb.body.texture, 0));
    }
    for item in state.bones.iter().chain(&state.potions).chain(&state.discs) {
        sprites.push(SpriteInstance::new(&item.body, item.body.texture, 0));
    }
    for decoration in &state.decorations {
        sprites.push(SpriteInstance::new(decoration, decoration.texture, 0));
    }

    sprites.push(SpriteInstance::new(&state.background, state.background.texture, 0));
    sprites
}

/// Implemented by the graphics backend
pub trait Renderer {
    /// Draw one frame. `current_time` is the simulation clock in seconds.
    fn draw(&mut self, view: Mat4, current_time: f64, sprites: &[SpriteInstance]);
}

/// Build the frame's camera and draw list and submit them
pub fn render_frame(renderer: &mut dyn Renderer, state: &GameState, width: u32, height: u32) {
    let view = view_matrix(width, height, state.player.body.planar());
    let sprites = build_draw_list(state);
    renderer.draw(view, state.now(), &sprites);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Textures;
    use crate::sim::enemy::EnemyVariant;
    use crate::tuning::Tuning;

    #[derive(Default)]
    struct Capture {
        frames: usize,
        last: Vec<SpriteInstance>,
        time: f64,
    }

    impl Renderer for Capture {
        fn draw(&mut self, _view: Mat4, current_time: f64, sprites: &[SpriteInstance]) {
            self.frames += 1;
            self.time = current_time;
            self.last = sprites.to_vec();
        }
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 80);
        let body = Body::new(1, Vec3::ZERO, TextureHandle(3));
        let sprites = [SpriteInstance::new(&body, body.texture, 0); 2];
        assert_eq!(bytemuck::cast_slice::<_, u8>(&sprites).len(), 160);
    }

    #[test]
    fn test_view_centers_camera() {
        let view = view_matrix(800, 600, Vec2::new(3.0, -2.0));
        let p = view.transform_point3(Vec3::new(3.0, -2.0, 0.0));
        assert!(p.length() < 1e-5);
        let q = view.transform_point3(Vec3::new(3.0, -1.0, 0.0));
        assert!((q.y - CAMERA_ZOOM).abs() < 1e-5);
        // Degenerate window does not divide by zero
        assert!(view_matrix(0, 0, Vec2::ZERO).is_finite());
    }

    #[test]
    fn test_sprite_transform_places_body() {
        let body = Body::new(1, Vec3::new(2.0, 1.0, 0.5), TextureHandle(1))
            .with_scale(0.5)
            .with_rotation(std::f32::consts::FRAC_PI_2);
        let m = sprite_transform(&body);
        assert!((m.transform_point3(Vec3::ZERO) - body.position).length() < 1e-5);
        let tip = m.transform_point3(Vec3::X);
        assert!((tip - Vec3::new(2.0, 1.5, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_draw_list_covers_world() {
        let mut state = GameState::new(4);
        state.spawn_enemy(EnemyVariant::Orbiting, Vec3::new(8.0, 8.0, 0.0));
        let sprites = build_draw_list(&state);
        // Every pooled entity, one satellite, and the background
        assert_eq!(sprites.len(), state.entity_count() + 1 + 1);
        assert_eq!(sprites.last().map(|s| s.texture), Some(state.background.texture.0));
    }

    #[test]
    fn test_invincible_player_flagged() {
        let mut state = GameState::empty(1, Tuning::default(), Textures::default());
        state.player.grant_invincibility(0.0, 5.0);
        let sprites = build_draw_list(&state);
        assert!(sprites.iter().any(|s| s.flags & FLAG_INVINCIBLE != 0));
    }

    #[test]
    fn test_render_frame_submits_once() {
        let state = GameState::new(2);
        let mut capture = Capture::default();
        render_frame(&mut capture, &state, 1280, 720);
        assert_eq!(capture.frames, 1);
        assert_eq!(capture.last.len(), build_draw_list(&state).len());
        assert_eq!(capture.time, 0.0);
    }
}
