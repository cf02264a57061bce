//! Simulation tunables.
//!
//! Every field has a default, so a RON file only needs the values it
//! changes, e.g. `(gravity: 0.6, total_waves: 5)`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Nominal tick length in seconds.
pub const TICK_DT: f32 = 1.0 / 60.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── World ────────────────────────────────────────────────────────────────
    pub world_width: f32,
    pub world_height: f32,
    /// y coordinate of the floor surface.
    pub ground_y: f32,
    /// Gap kept between an actor's half-width and the world edge.
    pub edge_margin: f32,

    // ── Kinematics (units per tick) ──────────────────────────────────────────
    pub gravity: f32,
    pub jump_impulse: f32,
    pub player_speed: f32,
    pub enemy_speed: f32,
    /// Boss pursuit speed, in units per tick at 60 Hz; scaled by `dt * 60`.
    pub boss_speed: f32,

    // ── Timers (seconds) ─────────────────────────────────────────────────────
    pub animation_speed: f32,
    pub attack_duration: f32,
    pub invincibility_secs: f32,
    pub hit_flash_secs: f32,
    pub impact_secs: f32,

    // ── Combat ───────────────────────────────────────────────────────────────
    pub starting_lives: u32,
    /// Width of the melee hitbox.
    pub attack_range: f32,
    pub boss_max_health: u32,
    pub boss_hit_damage: u32,
    /// Beyond this horizontal distance the boss keeps walking toward the player.
    pub boss_melee_range: f32,
    /// Within this horizontal distance the boss strikes.
    pub boss_attack_range: f32,
    pub boss_attack_cooldown: f32,

    // ── Encounter ────────────────────────────────────────────────────────────
    pub total_waves: u32,
    pub spawn_delay: f32,
    pub first_spawn_x: f32,
    /// Each later wave spawns this much further right.
    pub spawn_spacing: f32,
    pub patrol_half_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            ground_y: 550.0,
            edge_margin: 5.0,

            gravity: 0.8,
            jump_impulse: -15.0,
            player_speed: 5.0,
            enemy_speed: 2.0,
            boss_speed: 1.5,

            animation_speed: 0.15,
            attack_duration: 0.3,
            invincibility_secs: 2.0,
            hit_flash_secs: 0.2,
            impact_secs: 0.15,

            starting_lives: 3,
            attack_range: 80.0,
            boss_max_health: 100,
            boss_hit_damage: 10,
            boss_melee_range: 40.0,
            boss_attack_range: 40.0,
            boss_attack_cooldown: 2.0,

            total_waves: 3,
            spawn_delay: 1.0,
            first_spawn_x: 600.0,
            spawn_spacing: 50.0,
            patrol_half_width: 150.0,
        }
    }
}

pub fn from_ron_str(text: &str) -> Result<Tuning, ConfigError> {
    Ok(ron::from_str(text)?)
}

/// Load tunables from a RON file.
pub fn load(path: &Path) -> Result<Tuning, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    from_ron_str(&text)
}
