//! Game balance and tuning
//!
//! Every gameplay constant lives here so a run can be re-balanced from a JSON
//! file without recompiling. `Tuning::default()` is the shipped balance.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_MAX_HP;

/// Failure to build a [`Tuning`] from external data
#[derive(Debug)]
pub enum TuningError {
    /// The document is not valid JSON for this schema
    Parse(serde_json::Error),
    /// A value parsed but is outside its legal range
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "tuning parse error: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning value `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Movement speed at multiplier 1.0 (units/s)
    pub player_base_speed: f32,
    /// Speed multiplier while boosting
    pub boost_multiplier: f32,
    /// Turn rate (radians/s)
    pub player_turn_rate: f32,
    /// Hit points at start, also the potion cap
    pub player_max_hp: i32,
    /// Bones needed to trigger pickup invincibility
    pub bone_threshold: u32,
    /// Discs needed to win
    pub goal_threshold: u32,
    /// Invincibility granted by the bone threshold (s)
    pub pickup_invincibility_secs: f32,
    /// Invincibility granted after taking a hit (s)
    pub hit_invincibility_secs: f32,
    /// Walk-cycle frame period at base speed (s)
    pub animation_stride_secs: f32,

    // === Enemies ===
    pub patrol_radius: f32,
    /// Patrol angular speed (radians/s)
    pub patrol_angular_speed: f32,
    pub chase_speed: f32,
    /// Seconds between re-aims while intercepting
    pub reaim_secs: f32,
    /// Inside this radius a continuously steering enemy slows down
    pub arrival_radius: f32,
    /// How quickly continuous steering closes the velocity gap (1/s)
    pub steering_gain: f32,
    pub shooter_chase_speed: f32,
    pub shooter_reaim_secs: f32,
    pub shooter_cooldown_secs: f32,
    pub satellite_radius: f32,
    /// Satellite orbit angular speed (radians/s)
    pub satellite_speed: f32,
    /// Satellite self-rotation (radians/s)
    pub satellite_spin: f32,

    // === Projectiles ===
    pub bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    pub bullet_lifespan_secs: f32,
    /// Global cooldown between friendly shots (s)
    pub friendly_shot_cooldown_secs: f32,

    // === Bombs ===
    pub bomb_fuse_secs: f32,
    pub bomb_blast_radius: f32,
    pub bomb_cooldown_secs: f32,

    // === Collision ===
    /// Enemies start chasing the player inside this radius
    pub trigger_radius: f32,
    /// Physical overlap radius
    pub collision_radius: f32,

    // === Scoring ===
    pub enemy_kill_score: u64,
    pub bone_score: u64,
    pub potion_score: u64,
    pub disc_score: u64,

    // === Spawning ===
    pub enemy_spawn_secs: f32,
    pub collectible_spawn_secs: f32,
    pub explosion_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_base_speed: 4.0,
            boost_multiplier: 2.0,
            // π/1800 rad per step at 1500 steps/s
            player_turn_rate: std::f32::consts::PI / 1800.0 * 1500.0,
            player_max_hp: PLAYER_MAX_HP,
            bone_threshold: 3,
            goal_threshold: 3,
            pickup_invincibility_secs: 10.0,
            hit_invincibility_secs: 1.5,
            animation_stride_secs: 0.25,

            patrol_radius: 3.0,
            patrol_angular_speed: 1.0,
            chase_speed: 1.4,
            reaim_secs: 2.0,
            arrival_radius: 1.0,
            steering_gain: 4.0,
            shooter_chase_speed: 1.0,
            shooter_reaim_secs: 1.0,
            shooter_cooldown_secs: 2.0,
            satellite_radius: 1.5,
            satellite_speed: 4.0,
            satellite_spin: 3.0,

            bullet_speed: 6.0,
            enemy_bullet_speed: 4.0,
            bullet_lifespan_secs: 5.0,
            friendly_shot_cooldown_secs: 1.0,

            bomb_fuse_secs: 2.0,
            bomb_blast_radius: 2.5,
            bomb_cooldown_secs: 4.0,

            trigger_radius: 2.0,
            collision_radius: 0.6,

            enemy_kill_score: 100,
            bone_score: 20,
            potion_score: 10,
            disc_score: 50,

            enemy_spawn_secs: 5.0,
            collectible_spawn_secs: 8.0,
            explosion_secs: 5.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player_base_speed", self.player_base_speed),
            ("trigger_radius", self.trigger_radius),
            ("collision_radius", self.collision_radius),
            ("bullet_lifespan_secs", self.bullet_lifespan_secs),
            ("enemy_spawn_secs", self.enemy_spawn_secs),
            ("collectible_spawn_secs", self.collectible_spawn_secs),
            ("explosion_secs", self.explosion_secs),
            ("arrival_radius", self.arrival_radius),
            ("animation_stride_secs", self.animation_stride_secs),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }
        let non_negative = [
            ("boost_multiplier", self.boost_multiplier),
            ("player_turn_rate", self.player_turn_rate),
            ("patrol_radius", self.patrol_radius),
            ("chase_speed", self.chase_speed),
            ("reaim_secs", self.reaim_secs),
            ("steering_gain", self.steering_gain),
            ("shooter_chase_speed", self.shooter_chase_speed),
            ("shooter_reaim_secs", self.shooter_reaim_secs),
            ("shooter_cooldown_secs", self.shooter_cooldown_secs),
            ("bullet_speed", self.bullet_speed),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("friendly_shot_cooldown_secs", self.friendly_shot_cooldown_secs),
            ("bomb_blast_radius", self.bomb_blast_radius),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be zero or more",
                });
            }
        }
        if self.collision_radius >= self.trigger_radius {
            return Err(TuningError::Invalid {
                field: "collision_radius",
                reason: "must be smaller than trigger_radius",
            });
        }
        if self.player_max_hp < 1 {
            return Err(TuningError::Invalid {
                field: "player_max_hp",
                reason: "must be at least 1",
            });
        }
        if self.bone_threshold == 0 {
            return Err(TuningError::Invalid {
                field: "bone_threshold",
                reason: "must be at least 1",
            });
        }
        if self.goal_threshold == 0 {
            return Err(TuningError::Invalid {
                field: "goal_threshold",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {e}, using default tuning", path.display());
                Self::default()
            }
        }
    }
}
