//! Game state and core simulation types
//!
//! Everything the simulation mutates lives here: the pools, the player, and
//! the explicit simulation context (score, clock, seeded RNG).

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collectible::{Collectible, CollectibleKind};
use super::enemy::{Enemy, EnemyVariant};
use super::entity::{Body, EntityKind};
use super::explosion::{Bomb, Explosion};
use super::player::Player;
use super::projectile::{Bullet, ShotClock};
use super::spawner::{SpawnOrder, Spawner};
use super::timer::Timer;
use crate::assets::{TextureSlot, Textures};
use crate::consts::BACKGROUND_SCALE;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Enough discs collected
    Won,
    /// Player hit points ran out
    GameOver,
}

impl GamePhase {
    /// The frame loop stops in these phases
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::GameOver)
    }
}

/// Things that happened during a tick, for logging and the driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, variant: EnemyVariant },
    CollectibleSpawned { id: u32, kind: CollectibleKind },
    EnemyAlerted { id: u32 },
    BulletFired { id: u32, friendly: bool },
    PlayerHit { hp: i32 },
    EnemyDestroyed { id: u32 },
    Collected { kind: CollectibleKind },
    InvincibilityStarted { secs: f32 },
    InvincibilityEnded,
    BombDropped { id: u32 },
    BombDetonated { kills: u32 },
    PlayerDied,
    Won,
}

/// Explicit replacement for global counters and ambient randomness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimContext {
    pub seed: u64,
    pub score: u64,
    /// Simulation clock (seconds since start)
    pub clock: f64,
    pub shots: ShotClock,
    pub bomb_cooldown: Timer,
    /// Seeded generator for spawn positions. Serialized with its stream
    /// position so a restored state keeps drawing the same numbers.
    pub rng: Pcg32,
    next_id: u32,
}

impl SimContext {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            score: 0,
            clock: 0.0,
            shots: ShotClock::default(),
            bomb_cooldown: Timer::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub textures: Textures,
    pub phase: GamePhase,
    pub ctx: SimContext,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub bones: Vec<Collectible>,
    pub potions: Vec<Collectible>,
    pub discs: Vec<Collectible>,
    pub explosions: Vec<Explosion>,
    pub bombs: Vec<Bomb>,
    /// Free-floating visual objects (never collide)
    pub decorations: Vec<Body>,
    pub background: Body,
    pub spawner: Spawner,
    /// Events raised during the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New session with the default balance and the compiled-in world layout
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Textures::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, textures: Textures) -> Self {
        let mut state = Self::empty(seed, tuning, textures);
        state.populate_world();
        state
    }

    /// Just the player at the origin, facing up; no enemies or collectibles
    pub fn empty(seed: u64, tuning: Tuning, textures: Textures) -> Self {
        let mut ctx = SimContext::new(seed);
        let mut player = Player::new(
            ctx.next_entity_id(),
            Vec3::ZERO,
            textures.get(TextureSlot::PlayerStill),
            &tuning,
        );
        player.body.set_rotation(std::f32::consts::FRAC_PI_2);

        let mut background = Body::new(
            ctx.next_entity_id(),
            Vec3::ZERO,
            textures.get(TextureSlot::Background),
        )
        .with_scale(BACKGROUND_SCALE);
        background.collidable = false;

        Self {
            tuning,
            textures,
            phase: GamePhase::Playing,
            ctx,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            bones: Vec::new(),
            potions: Vec::new(),
            discs: Vec::new(),
            explosions: Vec::new(),
            bombs: Vec::new(),
            decorations: Vec::new(),
            background,
            spawner: Spawner::new(),
            events: Vec::new(),
        }
    }

    /// Starting layout: one patrolling enemy, a ring of bones, a potion, a
    /// disc and the orbiting axe.
    fn populate_world(&mut self) {
        self.spawn_enemy(EnemyVariant::Standard, Vec3::new(-5.0, 1.0, 0.0));

        let bones = [
            (2.0, 2.0),
            (-2.0, -2.0),
            (-2.0, 3.0),
            (4.0, 1.0),
            (-1.0, -3.0),
            (3.0, -2.0),
        ];
        for (x, y) in bones {
            self.spawn_collectible(CollectibleKind::Bone, Vec3::new(x, y, 0.0));
        }
        self.spawn_collectible(CollectibleKind::Potion, Vec3::new(6.0, -4.0, 0.0));
        self.spawn_collectible(CollectibleKind::Disc, Vec3::new(-6.0, -5.0, 0.0));

        let mut axe = Body::new(
            self.ctx.next_entity_id(),
            Vec3::ZERO,
            self.textures.get(TextureSlot::Axe),
        )
        .with_scale(0.5)
        .with_orbit(1.0, 3.0, Vec2::new(2.0, 2.0));
        axe.collidable = EntityKind::Decoration.capabilities().collidable;
        axe.advance(0.0, self.ctx.clock);
        self.decorations.push(axe);

        self.events.clear();
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.ctx.clock
    }

    pub fn spawn_enemy(&mut self, variant: EnemyVariant, position: Vec3) -> u32 {
        let id = self.ctx.next_entity_id();
        let satellite_id = self.ctx.next_entity_id();
        let enemy = Enemy::new(
            id,
            variant,
            position,
            self.textures.get(TextureSlot::Enemy),
            self.textures.get(TextureSlot::Axe),
            satellite_id,
            &self.tuning,
        );
        log::info!("New {:?} enemy at: {} {}", variant, position.x, position.y);
        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned { id, variant });
        id
    }

    pub fn spawn_collectible(&mut self, kind: CollectibleKind, position: Vec3) -> u32 {
        let id = self.ctx.next_entity_id();
        let slot = match kind {
            CollectibleKind::Bone => TextureSlot::Bone,
            CollectibleKind::Potion => TextureSlot::Potion,
            CollectibleKind::Disc => TextureSlot::Disc,
        };
        let collectible = Collectible::new(id, kind, position, self.textures.get(slot));
        log::debug!("New {:?} at: {} {}", kind, position.x, position.y);
        self.collectible_pool_mut(kind).push(collectible);
        self.events.push(GameEvent::CollectibleSpawned { id, kind });
        id
    }

    pub fn collectible_pool(&self, kind: CollectibleKind) -> &Vec<Collectible> {
        match kind {
            CollectibleKind::Bone => &self.bones,
            CollectibleKind::Potion => &self.potions,
            CollectibleKind::Disc => &self.discs,
        }
    }

    pub fn collectible_pool_mut(&mut self, kind: CollectibleKind) -> &mut Vec<Collectible> {
        match kind {
            CollectibleKind::Bone => &mut self.bones,
            CollectibleKind::Potion => &mut self.potions,
            CollectibleKind::Disc => &mut self.discs,
        }
    }

    pub fn apply_spawn_order(&mut self, order: SpawnOrder) {
        match order {
            SpawnOrder::Enemy { variant, position } => {
                self.spawn_enemy(variant, position);
            }
            SpawnOrder::Collectible { kind, position } => {
                self.spawn_collectible(kind, position);
            }
        }
    }

    /// Fire a bullet. Friendly shots respect the global cooldown; enemy shots
    /// do not. Returns the new bullet's id, or None if nothing was fired.
    pub fn spawn_bullet(
        &mut self,
        position: Vec3,
        direction: Vec3,
        texture: crate::assets::TextureHandle,
        speed: f32,
        friendly: bool,
    ) -> Option<u32> {
        if direction.truncate().length_squared() <= f32::EPSILON {
            return None;
        }
        let now = self.ctx.clock;
        if friendly
            && !self
                .ctx
                .shots
                .try_fire(now, self.tuning.friendly_shot_cooldown_secs)
        {
            return None;
        }
        let id = self.ctx.next_entity_id();
        let mut planar = direction;
        planar.z = 0.0;
        self.bullets.push(Bullet::new(
            id,
            position,
            planar,
            texture,
            speed,
            self.tuning.bullet_lifespan_secs,
            friendly,
        ));
        self.events.push(GameEvent::BulletFired { id, friendly });
        Some(id)
    }

    pub fn spawn_explosion(&mut self, position: Vec3) -> u32 {
        let id = self.ctx.next_entity_id();
        self.explosions.push(Explosion::new(
            id,
            position,
            self.textures.get(TextureSlot::Explosion),
            self.ctx.clock,
            self.tuning.explosion_secs,
        ));
        id
    }

    /// Drop a bomb at the player's feet, unless the bomb cooldown is running
    pub fn drop_bomb(&mut self) -> Option<u32> {
        let now = self.ctx.clock;
        let cooldown = &mut self.ctx.bomb_cooldown;
        if cooldown.running() && !cooldown.finished(now) {
            return None;
        }
        cooldown.start(now, self.tuning.bomb_cooldown_secs);
        let id = self.ctx.next_entity_id();
        self.bombs.push(Bomb::new(
            id,
            self.player.position(),
            self.textures.get(TextureSlot::Bomb),
            self.tuning.bomb_fuse_secs,
            self.tuning.bomb_blast_radius,
        ));
        self.events.push(GameEvent::BombDropped { id });
        Some(id)
    }

    pub fn end_session(&mut self, phase: GamePhase) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = phase;
        match phase {
            GamePhase::GameOver => {
                log::info!("Player has died! Final score: {}", self.ctx.score);
                self.events.push(GameEvent::PlayerDied);
            }
            GamePhase::Won => {
                log::info!("All discs collected! Final score: {}", self.ctx.score);
                self.events.push(GameEvent::Won);
            }
            GamePhase::Playing => {}
        }
    }

    /// Number of live entities across all pools (player included)
    pub fn entity_count(&self) -> usize {
        1 + self.enemies.len()
            + self.bullets.len()
            + self.bones.len()
            + self.potions.len()
            + self.discs.len()
            + self.explosions.len()
            + self.bombs.len()
            + self.decorations.len()
    }
}
