//! Encounter setup and pacing: enemy waves, the exit lock, the boss arena
//! and the fixed layout of the open level.

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{Boss, EncounterProgress, Enemy, Facing, GameMode, GameSession, Platform, Variant};
use crate::events::{SimEvent, Track};
use crate::geometry::Vec2;

const PLATFORM_THICKNESS: f32 = 20.0;

// ── Waves ────────────────────────────────────────────────────────────────────

/// Drop dead enemies from the roster.
pub fn purge_dead(roster: &[Enemy]) -> Vec<Enemy> {
    roster.iter().filter(|e| e.body.alive).cloned().collect()
}

/// Build the enemy for the next wave. Each wave starts further right than
/// the last; the initial walking direction is random.
pub fn spawn_wave_enemy(
    progress: &EncounterProgress,
    variant: Variant,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Enemy {
    let size = variant.body_size();
    let x = tuning.first_spawn_x + progress.current_wave as f32 * tuning.spawn_spacing;
    let patrol_left = x - tuning.patrol_half_width;
    let patrol_right = (tuning.world_width - 100.0).min(x + tuning.patrol_half_width);
    let direction = if rng.gen_bool(0.5) { Facing::Right } else { Facing::Left };
    Enemy::new(
        Vec2::new(x, tuning.ground_y - size.1 / 2.0),
        size,
        patrol_left,
        patrol_right,
        tuning.enemy_speed,
        direction,
    )
}

/// Advance wave pacing by one tick.
///
/// The first wave spawns as soon as the roster is empty. Later waves wait
/// until every enemy is dead and `spawn_delay` seconds have passed. Once the
/// last wave is cleared the exit unlocks. Returns the purged and refilled
/// roster.
pub fn tick(
    progress: &EncounterProgress,
    dt: f32,
    roster: &[Enemy],
    variant: Variant,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> (EncounterProgress, Vec<Enemy>, Vec<SimEvent>) {
    let mut progress = progress.clone();
    let mut roster = purge_dead(roster);
    let mut events = Vec::new();

    if roster.is_empty() && progress.current_wave == 0 && progress.waves_remaining() {
        roster.push(spawn_wave_enemy(&progress, variant, tuning, rng));
        progress.current_wave = 1;
        progress.spawn_timer = 0.0;
        events.push(SimEvent::WaveSpawned { wave: 1 });
        log::debug!("wave 1/{} spawned", progress.total_waves);
    }

    if roster.is_empty() && progress.waves_remaining() {
        progress.spawn_timer += dt;
        if progress.spawn_timer >= progress.spawn_delay {
            roster.push(spawn_wave_enemy(&progress, variant, tuning, rng));
            progress.current_wave += 1;
            progress.spawn_timer = 0.0;
            events.push(SimEvent::WaveSpawned { wave: progress.current_wave });
            log::debug!("wave {}/{} spawned", progress.current_wave, progress.total_waves);
        }
    }

    if roster.is_empty() && !progress.waves_remaining() && progress.exit_locked {
        progress.exit_locked = false;
        events.push(SimEvent::ExitUnlocked);
        log::debug!("all waves cleared, exit unlocked");
    }

    (progress, roster, events)
}

// ── Exit & boss room ─────────────────────────────────────────────────────────

/// Whether the player stands in the doorway of an unlocked exit.
pub fn at_exit(player_pos: Vec2, progress: &EncounterProgress, tuning: &Tuning) -> bool {
    let exit_x = tuning.world_width - 50.0;
    let exit_y = tuning.ground_y - 50.0;
    !progress.exit_locked && (player_pos.x - exit_x).abs() < 50.0 && (player_pos.y - exit_y).abs() < 60.0
}

/// Floor plus five floating ledges.
pub fn boss_arena(tuning: &Tuning) -> Vec<Platform> {
    let g = tuning.ground_y;
    let t = PLATFORM_THICKNESS;
    vec![
        Platform::new(0.0, g, tuning.world_width, t),
        Platform::new(100.0, g - 120.0, 180.0, t),
        Platform::new(520.0, g - 120.0, 180.0, t),
        Platform::new(200.0, g - 220.0, 140.0, t),
        Platform::new(460.0, g - 220.0, 140.0, t),
        Platform::new(310.0, g - 320.0, 180.0, t),
    ]
}

/// Swap to the boss arena: new geometry, boss in the middle, player at the
/// left wall.
pub fn enter_boss_room(session: &GameSession) -> (GameSession, Vec<SimEvent>) {
    let tuning = &session.tuning;
    let size = session.variant.body_size();
    let feet_on_floor = tuning.ground_y - size.1 / 2.0;

    let mut player = session.player.clone();
    player.body.pos = Vec2::new(size.0 / 2.0 + 80.0, feet_on_floor);
    player.body.vel = Vec2::ZERO;

    let boss = Boss::new(Vec2::new(tuning.world_width / 2.0, feet_on_floor), size, tuning);

    log::debug!("entering boss room");
    let next = GameSession {
        mode: GameMode::BossRoom,
        player,
        enemies: Vec::new(),
        boss: Some(boss),
        platforms: boss_arena(tuning),
        ..session.clone()
    };
    let events = vec![
        SimEvent::ModeChanged { from: session.mode, to: GameMode::BossRoom },
        SimEvent::MusicStop,
        SimEvent::MusicStart(Track::Boss),
    ];
    (next, events)
}

// ── Open level ───────────────────────────────────────────────────────────────

pub fn open_level_platforms() -> Vec<Platform> {
    [
        (150.0, 450.0, 200.0),
        (450.0, 400.0, 200.0),
        (250.0, 300.0, 150.0),
        (500.0, 250.0, 200.0),
        (100.0, 200.0, 150.0),
        (600.0, 150.0, 150.0),
    ]
    .into_iter()
    .map(|(x, y, w)| Platform::new(x, y, w, PLATFORM_THICKNESS))
    .collect()
}

/// One patroller standing on each of the lower four ledges.
pub fn open_level_enemies(tuning: &Tuning) -> Vec<Enemy> {
    let size = Variant::Open.body_size();
    [
        (200.0, 420.0, 150.0, 330.0),
        (500.0, 370.0, 450.0, 630.0),
        (300.0, 270.0, 250.0, 380.0),
        (550.0, 220.0, 500.0, 680.0),
    ]
    .into_iter()
    .map(|(x, y, left, right)| {
        Enemy::new(Vec2::new(x, y), size, left, right, tuning.enemy_speed, Facing::Right)
    })
    .collect()
}

/// Goal ledge of the open level: far right and high up.
pub fn in_goal_region(player_pos: Vec2) -> bool {
    player_pos.x > 700.0 && player_pos.y < 180.0
}
