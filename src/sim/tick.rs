//! Variable timestep simulation tick
//!
//! One call advances the world by `dt` seconds: input, own updates, spawning,
//! collision resolution, then compaction.

use glam::Vec2;

use super::collision;
use super::entity::compact;
use super::player::PlayerNotice;
use super::state::{GameEvent, GameState};
use crate::assets::TextureSlot;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// +1 forward, -1 backward (W/S)
    pub drive: i8,
    /// +1 toward world +x, -1 toward world -x (D/A)
    pub strafe: i8,
    /// +1 counter-clockwise, -1 clockwise (Q/E)
    pub turn: i8,
    /// Double speed for this frame (shift)
    pub boost: bool,
    /// Fire a friendly bullet toward this world point (mouse click)
    pub fire_at: Option<Vec2>,
    /// Drop a bomb at the player's feet (space)
    pub drop_bomb: bool,
    /// End the session (escape); read by the driver only
    pub quit: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase.is_terminal() {
        return;
    }
    state.events.clear();
    state.ctx.clock += f64::from(dt);
    let now = state.now();

    apply_input(state, input, dt);

    if let Some(PlayerNotice::InvincibilityEnded) = state.player.update(dt, now, &state.tuning) {
        state.events.push(GameEvent::InvincibilityEnded);
    }

    // Enemies act on last frame's view of the player
    let shots: Vec<_> = state
        .enemies
        .iter_mut()
        .filter_map(|enemy| enemy.update(dt, now))
        .collect();
    let bullet_texture = state.textures.get(TextureSlot::Bullet);
    let enemy_bullet_speed = state.tuning.enemy_bullet_speed;
    for shot in shots {
        state.spawn_bullet(
            shot.origin,
            shot.direction,
            bullet_texture,
            enemy_bullet_speed,
            false,
        );
    }

    for bullet in &mut state.bullets {
        bullet.update(dt, now);
    }
    for bomb in &mut state.bombs {
        if bomb.update(dt, now) {
            log::debug!("Bomb {} fuse burnt out", bomb.body.id);
        }
    }
    for explosion in &mut state.explosions {
        explosion.update(dt, now);
    }
    for decoration in &mut state.decorations {
        decoration.advance(dt, now);
    }

    let orders = state.spawner.poll(now, &state.tuning, &mut state.ctx.rng);
    for order in orders {
        state.apply_spawn_order(order);
    }

    collision::resolve(state);
    compact_pools(state);
}

fn apply_input(state: &mut GameState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    player.clear_velocity();
    player.set_speed(if input.boost {
        tuning.boost_multiplier
    } else {
        1.0
    });
    if input.turn != 0 {
        player.turn(i32::from(input.turn.signum()), tuning.player_turn_rate, dt);
    }
    if input.drive != 0 {
        player.drive(i32::from(input.drive.signum()));
    }
    // Strafing replaces any drive input from this frame
    if input.strafe != 0 {
        player.strafe(i32::from(input.strafe.signum()));
    }

    if let Some(target) = input.fire_at {
        let origin = state.player.position();
        let direction = (target - origin.truncate()).extend(0.0);
        let texture = state.textures.get(TextureSlot::Bullet);
        let speed = state.tuning.bullet_speed;
        state.spawn_bullet(origin, direction, texture, speed, true);
    }

    if input.drop_bomb {
        state.drop_bomb();
    }
}

/// Drop everything marked during this frame
fn compact_pools(state: &mut GameState) {
    let removed = compact(&mut state.enemies)
        + compact(&mut state.bullets)
        + compact(&mut state.bones)
        + compact(&mut state.potions)
        + compact(&mut state.discs)
        + compact(&mut state.explosions)
        + compact(&mut state.bombs)
        + compact(&mut state.decorations);
    if removed > 0 {
        log::trace!("Compacted {} entities", removed);
    }
}
