//! Collision and damage resolution
//!
//! Runs after every entity has done its own update for the frame. Contacts are
//! planar circle overlaps; what a contact *means* comes from [`contact_rule`],
//! which is driven by the capability table rather than concrete types.
//!
//! Pass order: enemy/player, hazards, bullets, collectibles, bombs. Nothing is
//! removed here; entities are only marked and the tick compacts afterwards.

use glam::Vec3;

use super::collectible::CollectibleKind;
use super::entity::{Body, EntityKind};
use super::state::{GameEvent, GamePhase, GameState};
use crate::planar_distance;

/// What happens when two entity kinds overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    Ignore,
    /// Player loses a hit point unless invincible
    Hazard,
    /// Player rams an enemy: the enemy is destroyed, the player hurt
    Ram,
    /// Player picks the other entity up
    Pickup,
    /// Friendly bullet destroys an enemy
    BulletHitsEnemy,
    /// Hostile bullet is absorbed by the player
    BulletHitsPlayer,
}

fn ordered_rule(a: EntityKind, b: EntityKind) -> Option<ContactRule> {
    let caps = b.capabilities();
    match a {
        EntityKind::Player => {
            if caps.pickup {
                Some(ContactRule::Pickup)
            } else if caps.destructible {
                Some(ContactRule::Ram)
            } else if matches!(b, EntityKind::Bullet { friendly: false }) {
                Some(ContactRule::BulletHitsPlayer)
            } else if caps.hazard {
                Some(ContactRule::Hazard)
            } else {
                None
            }
        }
        EntityKind::Bullet { friendly: true } if caps.destructible => {
            Some(ContactRule::BulletHitsEnemy)
        }
        _ => None,
    }
}

/// Rule for an overlapping pair. Symmetric in its arguments.
pub fn contact_rule(a: EntityKind, b: EntityKind) -> ContactRule {
    ordered_rule(a, b)
        .or_else(|| ordered_rule(b, a))
        .unwrap_or(ContactRule::Ignore)
}

/// Both bodies take part in collisions and overlap within `radius`
fn touching(a: &Body, b: &Body, radius: f32) -> bool {
    a.is_solid() && b.is_solid() && planar_distance(a.position, b.position) < radius
}

/// Resolve every contact for this frame
pub fn resolve(state: &mut GameState) {
    if state.phase.is_terminal() {
        return;
    }
    enemy_pass(state);
    hazard_pass(state);
    bullet_pass(state);
    collectible_pass(state);
    bomb_pass(state);
}

/// One hit on the player. Returns true if damage was dealt.
fn hurt_player(state: &mut GameState) -> bool {
    if state.player.invincible || state.phase.is_terminal() {
        return false;
    }
    state.player.take_damage();
    let now = state.now();
    state
        .player
        .grant_invincibility(now, state.tuning.hit_invincibility_secs);
    let hp = state.player.hp;
    log::info!("Player hit, {} hp left", hp);
    state.events.push(GameEvent::PlayerHit { hp });

    if state.player.is_dead() {
        let position = state.player.position();
        state.spawn_explosion(position);
        state.end_session(GamePhase::GameOver);
    }
    true
}

/// Destroy enemy `index` for score. Returns false if it was already gone.
fn destroy_enemy(state: &mut GameState, index: usize) -> bool {
    let enemy = &mut state.enemies[index];
    if enemy.body.is_marked_for_deletion() {
        return false;
    }
    enemy.body.mark_for_deletion();
    let id = enemy.body.id;
    let variant = enemy.variant();
    let position = enemy.body.position;

    state.ctx.score += state.tuning.enemy_kill_score;
    state.spawn_explosion(position);
    state.events.push(GameEvent::EnemyDestroyed { id });
    log::info!("{:?} enemy {} destroyed, score {}", variant, id, state.ctx.score);
    true
}

/// Refresh every enemy's view of the player, raise alerts, then handle rams
fn enemy_pass(state: &mut GameState) {
    let player_pos = state.player.position();
    let trigger = state.tuning.trigger_radius;
    let radius = state.tuning.collision_radius;

    for i in 0..state.enemies.len() {
        if state.phase.is_terminal() {
            return;
        }
        let enemy = &mut state.enemies[i];
        if enemy.body.is_marked_for_deletion() {
            continue;
        }
        enemy.update_player_pos(player_pos);
        if planar_distance(player_pos, enemy.body.position) < trigger && enemy.alert() {
            let id = enemy.body.id;
            log::debug!("Enemy {} intercepting", id);
            state.events.push(GameEvent::EnemyAlerted { id });
        }

        // Ram: both sides take the hit
        if touching(&state.player.body, &state.enemies[i].body, radius) {
            hurt_player(state);
            destroy_enemy(state, i);
        }
    }
}

/// Decorations and satellites hurt only when something made them collidable
fn hazard_pass(state: &mut GameState) {
    let radius = state.tuning.collision_radius;
    let player = &state.player.body;
    let contacts = state
        .decorations
        .iter()
        .chain(state.enemies.iter().filter_map(|e| e.satellite().map(|s| &s.body)))
        .filter(|body| touching(player, body, radius))
        .count();

    for _ in 0..contacts {
        hurt_player(state);
    }
}

fn bullet_pass(state: &mut GameState) {
    let radius = state.tuning.collision_radius;

    for b in 0..state.bullets.len() {
        if state.phase.is_terminal() {
            return;
        }
        let bullet = &state.bullets[b];
        if !bullet.body.is_solid() {
            continue;
        }
        let kind = EntityKind::Bullet {
            friendly: bullet.friendly,
        };

        let target = state
            .enemies
            .iter()
            .position(|e| touching(&bullet.body, &e.body, radius));
        if let Some(e) = target {
            if contact_rule(kind, EntityKind::Enemy) == ContactRule::BulletHitsEnemy {
                state.bullets[b].body.mark_for_deletion();
                destroy_enemy(state, e);
                continue;
            }
        }

        if touching(&state.bullets[b].body, &state.player.body, radius)
            && contact_rule(kind, EntityKind::Player) == ContactRule::BulletHitsPlayer
        {
            // Absorbed even while invincible; only the damage is gated
            state.bullets[b].body.mark_for_deletion();
            hurt_player(state);
        }
    }
}

fn collectible_pass(state: &mut GameState) {
    let radius = state.tuning.collision_radius;

    for kind in CollectibleKind::ALL {
        for i in 0..state.collectible_pool(kind).len() {
            if state.phase.is_terminal() {
                return;
            }
            let item = &state.collectible_pool(kind)[i];
            if !touching(&state.player.body, &item.body, radius) {
                continue;
            }
            if contact_rule(EntityKind::Player, EntityKind::Collectible(kind)) != ContactRule::Pickup {
                continue;
            }
            if state.collectible_pool_mut(kind)[i].pick_up() {
                apply_pickup(state, kind);
            }
        }
    }
}

fn apply_pickup(state: &mut GameState, kind: CollectibleKind) {
    let now = state.now();
    match kind {
        CollectibleKind::Bone => {
            state.ctx.score += state.tuning.bone_score;
            if state.player.collect_bone(now, &state.tuning) {
                let secs = state.tuning.pickup_invincibility_secs;
                state.events.push(GameEvent::InvincibilityStarted { secs });
            }
        }
        CollectibleKind::Potion => {
            state.ctx.score += state.tuning.potion_score;
            if !state.player.heal(state.tuning.player_max_hp) {
                log::debug!("Potion wasted at full health");
            }
        }
        CollectibleKind::Disc => {
            state.ctx.score += state.tuning.disc_score;
            state.events.push(GameEvent::Collected { kind });
            if state.player.collect_disc(&state.tuning) {
                state.end_session(GamePhase::Won);
            }
            return;
        }
    }
    state.events.push(GameEvent::Collected { kind });
}

/// Bombs whose fuse ran out this frame blow up every enemy in range
fn bomb_pass(state: &mut GameState) {
    for b in 0..state.bombs.len() {
        if state.phase.is_terminal() {
            return;
        }
        let bomb = &state.bombs[b];
        if !bomb.detonated || bomb.body.is_marked_for_deletion() {
            continue;
        }
        let center: Vec3 = bomb.body.position;
        let blast = bomb.blast_radius;

        let victims: Vec<usize> = state
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| planar_distance(center, e.body.position) <= blast)
            .map(|(i, _)| i)
            .collect();
        let mut kills = 0;
        for i in victims {
            if destroy_enemy(state, i) {
                kills += 1;
            }
        }

        state.bombs[b].body.mark_for_deletion();
        state.spawn_explosion(center);
        log::info!("Bomb detonated, {} enemies caught", kills);
        state.events.push(GameEvent::BombDetonated { kills });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{TextureSlot, Textures};
    use crate::sim::enemy::{EnemyState, EnemyVariant};
    use crate::sim::explosion::Bomb;
    use crate::tuning::Tuning;

    fn still_world() -> GameState {
        let tuning = Tuning {
            patrol_radius: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::empty(3, tuning, Textures::default());
        state.events.clear();
        state
    }

    fn at(x: f32, y: f32) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    const KINDS: [EntityKind; 9] = [
        EntityKind::Player,
        EntityKind::Enemy,
        EntityKind::Bullet { friendly: true },
        EntityKind::Bullet { friendly: false },
        EntityKind::Collectible(CollectibleKind::Bone),
        EntityKind::Collectible(CollectibleKind::Disc),
        EntityKind::Explosion,
        EntityKind::Bomb,
        EntityKind::Decoration,
    ];

    #[test]
    fn test_contact_rule_is_symmetric() {
        for a in KINDS {
            for b in KINDS {
                assert_eq!(contact_rule(a, b), contact_rule(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_ignored_pairs() {
        assert_eq!(contact_rule(EntityKind::Enemy, EntityKind::Enemy), ContactRule::Ignore);
        assert_eq!(
            contact_rule(EntityKind::Collectible(CollectibleKind::Bone), EntityKind::Enemy),
            ContactRule::Ignore
        );
        assert_eq!(
            contact_rule(EntityKind::Bullet { friendly: false }, EntityKind::Enemy),
            ContactRule::Ignore
        );
        assert_eq!(
            contact_rule(EntityKind::Bullet { friendly: true }, EntityKind::Player),
            ContactRule::Ignore
        );
        assert_eq!(contact_rule(EntityKind::Player, EntityKind::Explosion), ContactRule::Ignore);
    }

    #[test]
    fn test_trigger_radius_alerts() {
        let mut state = still_world();
        state.spawn_enemy(EnemyVariant::Standard, at(2.5, 0.0));
        resolve(&mut state);
        assert_eq!(state.enemies[0].state, EnemyState::Patrolling);
        // Last known position is refreshed even out of range
        assert_eq!(state.enemies[0].last_player_pos, Vec3::ZERO);

        state.enemies[0].body.position = at(1.5, 0.0);
        resolve(&mut state);
        assert_eq!(state.enemies[0].state, EnemyState::Intercepting);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::EnemyAlerted { .. })));
        assert_eq!(state.player.hp, 3);
    }

    #[test]
    fn test_death_at_one_hp() {
        let mut state = still_world();
        state.player.hp = 1;
        state.spawn_enemy(EnemyVariant::Standard, at(0.3, 0.0));
        resolve(&mut state);

        assert_eq!(state.player.hp, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.enemies[0].body.is_marked_for_deletion());
        assert_eq!(state.ctx.score, 100);
        // One at the player, one at the enemy
        assert_eq!(state.explosions.len(), 2);
        let player_pos = state.player.position();
        assert!(state.explosions.iter().any(|e| e.body.position == player_pos));
        assert!(state.explosions.iter().any(|e| e.body.position == at(0.3, 0.0)));

        resolve(&mut state);
        let deaths = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::PlayerDied)
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_ram_while_invincible_destroys_enemy_without_damage() {
        let mut state = still_world();
        state.player.grant_invincibility(0.0, 10.0);
        state.spawn_enemy(EnemyVariant::Shooter, at(0.0, 0.5));
        resolve(&mut state);
        assert_eq!(state.player.hp, 3);
        assert!(state.enemies[0].body.is_marked_for_deletion());
        assert_eq!(state.ctx.score, 100);
    }

    #[test]
    fn test_hit_grants_short_invincibility() {
        let mut state = still_world();
        state.spawn_enemy(EnemyVariant::Standard, at(0.2, 0.0));
        state.spawn_enemy(EnemyVariant::Standard, at(-0.2, 0.0));
        resolve(&mut state);
        // The second enemy lands inside the hit invincibility window
        assert_eq!(state.player.hp, 2);
        assert!(state.player.invincible);
        assert!((state.player.invincibility_timer.time_left(0.0) - 1.5).abs() < 1e-5);
        assert_eq!(state.ctx.score, 200);
    }

    #[test]
    fn test_non_collidable_enemy_is_ignored() {
        let mut state = still_world();
        state.spawn_enemy(EnemyVariant::Standard, at(0.1, 0.0));
        state.enemies[0].body.collidable = false;
        resolve(&mut state);
        assert_eq!(state.player.hp, 3);
        assert!(!state.enemies[0].body.is_marked_for_deletion());
        // Trigger detection is independent of collidability
        assert_eq!(state.enemies[0].state, EnemyState::Intercepting);
    }

    #[test]
    fn test_friendly_bullet_kills_enemy() {
        let mut state = still_world();
        state.spawn_enemy(EnemyVariant::Standard, at(8.0, 0.0));
        let tex = state.textures.get(TextureSlot::Bullet);
        state.spawn_bullet(at(7.8, 0.0), Vec3::X, tex, 6.0, true);
        resolve(&mut state);
        assert!(state.bullets[0].body.is_marked_for_deletion());
        assert!(state.enemies[0].body.is_marked_for_deletion());
        assert_eq!(state.ctx.score, 100);
    }

    #[test]
    fn test_friend_and_foe() {
        let mut state = still_world();
        state.spawn_enemy(EnemyVariant::Standard, at(8.0, 0.0));
        let tex = state.textures.get(TextureSlot::Bullet);
        state.spawn_bullet(at(8.1, 0.0), Vec3::X, tex, 4.0, false);
        state.spawn_bullet(at(0.1, 0.0), Vec3::X, tex, 6.0, true);
        resolve(&mut state);
        assert!(!state.enemies[0].body.is_marked_for_deletion());
        assert_eq!(state.player.hp, 3);
        assert!(state.bullets.iter().all(|b| !b.body.is_marked_for_deletion()));
    }

    #[test]
    fn test_hostile_bullet_absorbed_by_invincible_player() {
        let mut state = still_world();
        state.player.grant_invincibility(0.0, 10.0);
        let tex = state.textures.get(TextureSlot::Bullet);
        state.spawn_bullet(at(0.2, 0.0), Vec3::X, tex, 4.0, false);
        resolve(&mut state);
        assert_eq!(state.player.hp, 3);
        assert!(state.bullets[0].body.is_marked_for_deletion());

        state.player.invincible = false;
        state.spawn_bullet(at(-0.2, 0.0), Vec3::X, tex, 4.0, false);
        resolve(&mut state);
        assert_eq!(state.player.hp, 2);
    }

    #[test]
    fn test_pickup_is_idempotent_before_compaction() {
        let mut state = still_world();
        state.spawn_collectible(CollectibleKind::Bone, at(0.1, 0.0));
        resolve(&mut state);
        resolve(&mut state);
        assert_eq!(state.player.objects_collected, 1);
        assert_eq!(state.ctx.score, 20);
    }

    #[test]
    fn test_enemy_standing_on_collectible_does_nothing() {
        let mut state = still_world();
        state.spawn_enemy(EnemyVariant::Standard, at(6.0, 6.0));
        state.spawn_collectible(CollectibleKind::Bone, at(6.0, 6.0));
        resolve(&mut state);
        assert!(!state.bones[0].body.is_marked_for_deletion());
        assert!(!state.enemies[0].body.is_marked_for_deletion());
    }

    #[test]
    fn test_third_bone_grants_invincibility() {
        let mut state = still_world();
        for _ in 0..3 {
            state.spawn_collectible(CollectibleKind::Bone, at(0.1, 0.1));
        }
        resolve(&mut state);
        assert_eq!(state.player.objects_collected, 0);
        assert!(state.player.invincible);
        assert!(
            state
                .events
                .contains(&GameEvent::InvincibilityStarted { secs: 10.0 })
        );
        assert_eq!(state.ctx.score, 60);
    }

    #[test]
    fn test_potion_heals_up_to_cap() {
        let mut state = still_world();
        state.player.hp = 2;
        state.spawn_collectible(CollectibleKind::Potion, at(0.0, 0.1));
        state.spawn_collectible(CollectibleKind::Potion, at(0.1, 0.0));
        resolve(&mut state);
        assert_eq!(state.player.hp, 3);
        assert_eq!(state.potions.iter().filter(|p| p.body.is_marked_for_deletion()).count(), 2);
    }

    #[test]
    fn test_third_disc_wins() {
        let mut state = still_world();
        state.player.goal_objects_collected = 2;
        state.spawn_collectible(CollectibleKind::Disc, at(0.0, 0.2));
        resolve(&mut state);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.events.contains(&GameEvent::Won));
        assert_eq!(state.ctx.score, 50);
    }

    #[test]
    fn test_bomb_blast_kills_enemies_in_radius() {
        let mut state = still_world();
        state.spawn_enemy(EnemyVariant::Standard, at(5.0, 0.0));
        state.spawn_enemy(EnemyVariant::Orbiting, at(6.0, 1.0));
        state.spawn_enemy(EnemyVariant::Standard, at(12.0, 0.0));
        let mut bomb = Bomb::new(99, at(5.0, 0.5), state.textures.get(TextureSlot::Bomb), 0.0, 2.5);
        bomb.detonated = true;
        state.bombs.push(bomb);

        resolve(&mut state);
        let dead: Vec<bool> = state
            .enemies
            .iter()
            .map(|e| e.body.is_marked_for_deletion())
            .collect();
        assert_eq!(dead, vec![true, true, false]);
        assert!(state.bombs[0].body.is_marked_for_deletion());
        assert!(state.events.contains(&GameEvent::BombDetonated { kills: 2 }));
        assert_eq!(state.ctx.score, 200);
    }

    #[test]
    fn test_collidable_decoration_hurts() {
        let mut state = still_world();
        let mut axe = Body::new(50, at(0.1, 0.0), state.textures.get(TextureSlot::Axe));
        axe.collidable = false;
        state.decorations.push(axe.clone());
        resolve(&mut state);
        assert_eq!(state.player.hp, 3);

        axe.collidable = true;
        state.decorations[0] = axe;
        resolve(&mut state);
        assert_eq!(state.player.hp, 2);
    }
}
