//! Bone Hunt headless driver
//!
//! Runs the simulation at a fixed 60 Hz step with no window: a small autopilot
//! produces the input, a logging HUD and a counting renderer stand in for the
//! real presentation layers.
//!
//! Usage: `bone-hunt [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;
    use std::time::Instant;

    use glam::{Mat4, Vec2};

    use bone_hunt::assets::Textures;
    use bone_hunt::consts::FRAME_DT;
    use bone_hunt::normalize_angle;
    use bone_hunt::render::{Renderer, SpriteInstance, render_frame};
    use bone_hunt::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use bone_hunt::{HudObserver, HudSnapshot, Tuning};

    /// Give up after this much simulated time
    const SESSION_LIMIT_SECS: f64 = 180.0;
    const DEFAULT_SEED: u64 = 0x5EED;

    /// Logs the HUD whenever a shown value changes
    #[derive(Default)]
    struct LogHud {
        last: Option<HudSnapshot>,
    }

    impl HudObserver for LogHud {
        fn update(&mut self, hud: &HudSnapshot) {
            let changed = self.last.is_none_or(|last| {
                last.score != hud.score
                    || last.hp != hud.hp
                    || last.invincible != hud.invincible
                    || last.discs != hud.discs
            });
            if changed {
                let score: String = hud.score_digits().iter().map(|d| d.to_string()).collect();
                let hearts: String = hud
                    .hearts()
                    .iter()
                    .map(|full| if *full { '♥' } else { '·' })
                    .collect();
                log::info!(
                    "SCORE {} | {} | bones {}/{} | discs {}/{}{}",
                    score,
                    hearts,
                    hud.bones,
                    hud.bone_threshold,
                    hud.discs,
                    hud.goal_threshold,
                    if hud.invincible {
                        format!(" | invincible {:.1}s", hud.invincibility_left)
                    } else {
                        String::new()
                    }
                );
            }
            self.last = Some(*hud);
        }
    }

    /// Counts what would have been drawn
    #[derive(Default)]
    struct NullRenderer {
        frames: u64,
        sprites: u64,
    }

    impl Renderer for NullRenderer {
        fn draw(&mut self, _view: Mat4, _current_time: f64, sprites: &[SpriteInstance]) {
            self.frames += 1;
            self.sprites += sprites.len() as u64;
        }
    }

    fn nearest(me: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
        points.min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)))
    }

    /// Head for the nearest collectible, shoot the nearest enemy in range,
    /// and drop a bomb when crowded.
    fn autopilot(state: &GameState) -> TickInput {
        let me = state.player.body.planar();

        let mut input = TickInput::default();

        let goal = nearest(
            me,
            state
                .discs
                .iter()
                .chain(&state.bones)
                .chain(&state.potions)
                .map(|c| c.body.planar()),
        );
        if let Some(goal) = goal {
            let to_goal = goal - me;
            let heading = to_goal.y.atan2(to_goal.x);
            let diff = normalize_angle(heading - state.player.body.rotation());
            if diff > 0.1 && diff < std::f32::consts::PI {
                input.turn = 1;
            } else if diff >= std::f32::consts::PI && diff < std::f32::consts::TAU - 0.1 {
                input.turn = -1;
            }
            input.drive = 1;
            input.boost = to_goal.length() > 6.0;
        }

        let threat = nearest(me, state.enemies.iter().map(|e| e.body.planar()));
        if let Some(enemy) = threat {
            if enemy.distance(me) < 6.0 {
                input.fire_at = Some(enemy);
            }
        }

        let crowd = state
            .enemies
            .iter()
            .filter(|e| e.body.planar().distance(me) < state.tuning.bomb_blast_radius)
            .count();
        input.drop_bomb = crowd >= 2;

        input
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let tuning = match args.next() {
            Some(path) => Tuning::load(Path::new(&path)),
            None => Tuning::default(),
        };

        log::info!("Bone Hunt (headless) starting, seed {}", seed);
        let mut state = GameState::with_config(seed, tuning, Textures::default());
        let mut hud = LogHud::default();
        let mut renderer = NullRenderer::default();
        let started = Instant::now();

        while !state.phase.is_terminal() && state.now() < SESSION_LIMIT_SECS {
            let input = autopilot(&state);
            if input.quit {
                break;
            }
            tick(&mut state, &input, FRAME_DT);

            for event in &state.events {
                match event {
                    GameEvent::EnemySpawned { id, variant } => {
                        log::debug!("enemy {} ({:?}) joined", id, variant)
                    }
                    GameEvent::BombDetonated { kills } if *kills > 0 => {
                        log::info!("bomb took out {} enemies", kills)
                    }
                    _ => {}
                }
            }

            hud.update(&HudSnapshot::capture(&state));
            render_frame(&mut renderer, &state, 1280, 720);
        }

        let outcome = match state.phase {
            GamePhase::Won => "won",
            GamePhase::GameOver => "lost",
            GamePhase::Playing => "timed out",
        };
        log::info!(
            "Session {} at {:.1}s with score {} ({} frames, {:.1} sprites/frame, {:?} wall)",
            outcome,
            state.now(),
            state.ctx.score,
            renderer.frames,
            renderer.sprites as f64 / renderer.frames.max(1) as f64,
            started.elapsed()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No standalone entry point on wasm
}
