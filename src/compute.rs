//! Game state machine and the per-tick update.
//!
//! Every public function takes the current `GameSession` by reference (and,
//! where needed, an RNG handle) and returns the next session together with
//! the events it produced. Randomness only enters through the injected RNG.

use rand::Rng;

use crate::combat::{boss_strike, collect_pickups, resolve_contacts, resolve_hits, try_attack};
use crate::config::Tuning;
use crate::director;
use crate::entities::{EncounterProgress, Enemy, GameMode, GameSession, Platform, Player, Variant};
use crate::events::{SimEvent, Track};
use crate::geometry::Vec2;
use crate::input::{InputEdges, InputSnapshot};
use crate::physics::{step_boss, step_enemy, step_player};

/// Horizontal start position of the player in every level.
const PLAYER_START_X: f32 = 100.0;

// ── Constructors ─────────────────────────────────────────────────────────────

/// A session sitting on the menu, with the level already laid out.
pub fn init_session(variant: Variant, tuning: Tuning) -> GameSession {
    let player = fresh_player(variant, &tuning);
    let (platforms, enemies) = level_layout(variant, &tuning);
    GameSession {
        mode: GameMode::Menu,
        variant,
        encounter: EncounterProgress::new(tuning.total_waves, tuning.spawn_delay),
        tuning,
        player,
        enemies,
        boss: None,
        platforms,
        collectibles: Vec::new(),
        sound_enabled: true,
        last_input: InputSnapshot::default(),
        frame: 0,
    }
}

fn fresh_player(variant: Variant, tuning: &Tuning) -> Player {
    let size = variant.body_size();
    Player::new(
        Vec2::new(PLAYER_START_X, tuning.ground_y - size.1 / 2.0),
        size,
        tuning.starting_lives,
    )
}

fn level_layout(variant: Variant, tuning: &Tuning) -> (Vec<Platform>, Vec<Enemy>) {
    match variant {
        // the corridor is bare floor; its enemies come from the director
        Variant::Waves => (Vec::new(), Vec::new()),
        Variant::Open => (director::open_level_platforms(), director::open_level_enemies(tuning)),
    }
}

/// Fresh player, roster, geometry and encounter. Mode, sound setting and
/// input history carry over.
pub fn reset_game(session: &GameSession) -> GameSession {
    let tuning = &session.tuning;
    let (platforms, enemies) = level_layout(session.variant, tuning);
    GameSession {
        player: fresh_player(session.variant, tuning),
        enemies,
        boss: None,
        platforms,
        collectibles: Vec::new(),
        encounter: EncounterProgress::new(tuning.total_waves, tuning.spawn_delay),
        ..session.clone()
    }
}

// ── Mode transitions ─────────────────────────────────────────────────────────

fn with_mode(session: &GameSession, to: GameMode) -> (GameSession, SimEvent) {
    log::debug!("mode {:?} -> {:?}", session.mode, to);
    let next = GameSession { mode: to, ..session.clone() };
    (next, SimEvent::ModeChanged { from: session.mode, to })
}

fn start_playing(session: &GameSession) -> (GameSession, Vec<SimEvent>) {
    let (next, changed) = with_mode(&reset_game(session), GameMode::Playing);
    (next, vec![changed, SimEvent::MusicStart(Track::Level)])
}

/// Handle a fresh "confirm" press. Modes without a confirm edge are left
/// untouched.
pub fn confirm(session: &GameSession) -> (GameSession, Vec<SimEvent>) {
    match session.mode {
        GameMode::Menu if session.variant.has_instructions() => {
            let (next, changed) = with_mode(session, GameMode::Instructions);
            (next, vec![changed])
        }
        GameMode::Menu | GameMode::Instructions => start_playing(session),
        GameMode::GameOver | GameMode::Victory => {
            let (next, changed) = with_mode(session, GameMode::Menu);
            (next, vec![changed, SimEvent::MusicStop])
        }
        GameMode::Playing | GameMode::BossRoom => (session.clone(), Vec::new()),
    }
}

/// Abandon a running game and return to the menu. Progress is discarded on
/// the next start.
pub fn escape(session: &GameSession) -> (GameSession, Vec<SimEvent>) {
    if !session.mode.is_active() {
        return (session.clone(), Vec::new());
    }
    let (next, changed) = with_mode(session, GameMode::Menu);
    (next, vec![changed, SimEvent::MusicStop])
}

pub fn toggle_sound(session: &GameSession) -> (GameSession, Vec<SimEvent>) {
    let sound_enabled = !session.sound_enabled;
    log::debug!("sound {}", if sound_enabled { "on" } else { "off" });
    let event = if sound_enabled {
        SimEvent::MusicStart(Track::Level)
    } else {
        SimEvent::MusicStop
    };
    (GameSession { sound_enabled, ..session.clone() }, vec![event])
}

/// The transition a set of input edges triggers from the current mode, if any.
fn transition(session: &GameSession, edges: &InputEdges) -> Option<(GameSession, Vec<SimEvent>)> {
    match session.mode {
        GameMode::Playing | GameMode::BossRoom if edges.escape => Some(escape(session)),
        GameMode::Menu if edges.confirm => Some(confirm(session)),
        GameMode::Menu if edges.toggle_sound => Some(toggle_sound(session)),
        GameMode::Instructions | GameMode::GameOver | GameMode::Victory if edges.confirm => {
            Some(confirm(session))
        }
        _ => None,
    }
}

// ── Per-frame update ─────────────────────────────────────────────────────────

/// Advance the session by one frame.
///
/// Discrete actions are derived from the previous frame's input. A frame
/// that changes mode does not also run the simulation.
pub fn update(
    session: &GameSession,
    input: &InputSnapshot,
    dt: f32,
    rng: &mut impl Rng,
) -> (GameSession, Vec<SimEvent>) {
    let edges = InputEdges::between(&session.last_input, input);

    let (next, events) = match transition(session, &edges) {
        Some(changed) => changed,
        None if session.mode.is_active() => simulate(session, input, edges.attack, dt, rng),
        None => (session.clone(), Vec::new()),
    };

    log::trace!("frame {} mode {:?} events {}", session.frame + 1, next.mode, events.len());
    let next = GameSession {
        last_input: *input,
        frame: session.frame + 1,
        ..next
    };
    (next, events)
}

/// One simulation tick for a running game: player, enemies and boss move,
/// combat resolves, the director paces waves, then the outcome is evaluated.
pub fn simulate(
    session: &GameSession,
    input: &InputSnapshot,
    attack_pressed: bool,
    dt: f32,
    rng: &mut impl Rng,
) -> (GameSession, Vec<SimEvent>) {
    let tuning = &session.tuning;
    let mut events = Vec::new();

    // ── 1. Player ────────────────────────────────────────────────────────────
    let player = if attack_pressed {
        try_attack(&session.player, tuning)
    } else {
        session.player.clone()
    };
    let (player, ev) = step_player(
        &player,
        input,
        &session.platforms,
        session.variant.landing_band(),
        dt,
        tuning,
    );
    events.extend(ev);
    let (player, collectibles, ev) = collect_pickups(&player, &session.collectibles);
    events.extend(ev);

    // ── 2. Enemies & boss ────────────────────────────────────────────────────
    let enemies: Vec<Enemy> = session.enemies.iter().map(|e| step_enemy(e, dt, tuning)).collect();
    let boss = session
        .boss
        .as_ref()
        .map(|b| step_boss(b, player.body.pos.x, dt, tuning));

    // ── 3. Player swing ──────────────────────────────────────────────────────
    let (player, enemies, ev) = resolve_hits(&player, &enemies, tuning);
    events.extend(ev);
    let (player, boss) = match boss {
        Some(b) => {
            let (player, mut struck, ev) = resolve_hits(&player, std::slice::from_ref(&b), tuning);
            events.extend(ev);
            (player, struck.pop())
        }
        None => (player, None),
    };

    // ── 4. Damage to the player ──────────────────────────────────────────────
    let (player, ev) = resolve_contacts(&player, &enemies, boss.as_ref(), tuning);
    events.extend(ev);
    let (player, boss) = match boss {
        Some(b) => {
            let (b, player, ev) = boss_strike(&b, &player, tuning);
            events.extend(ev);
            (player, Some(b))
        }
        None => (player, None),
    };

    // ── 5. Roster & waves ────────────────────────────────────────────────────
    let (encounter, enemies) = if session.variant == Variant::Waves && session.mode == GameMode::Playing {
        let (encounter, roster, ev) =
            director::tick(&session.encounter, dt, &enemies, session.variant, tuning, rng);
        events.extend(ev);
        (encounter, roster)
    } else {
        (session.encounter.clone(), director::purge_dead(&enemies))
    };

    let next = GameSession {
        player,
        enemies,
        boss,
        collectibles,
        encounter,
        ..session.clone()
    };

    // ── 6. Outcome ───────────────────────────────────────────────────────────
    let (next, ev) = evaluate(&next);
    events.extend(ev);
    (next, events)
}

/// Decide defeat, victory or the move into the boss room. Runs only for a
/// game in progress, so each terminal transition happens once.
pub fn evaluate(session: &GameSession) -> (GameSession, Vec<SimEvent>) {
    if !session.mode.is_active() {
        return (session.clone(), Vec::new());
    }

    if session.player.lives == 0 {
        let (next, changed) = with_mode(session, GameMode::GameOver);
        return (next, vec![SimEvent::PlayerDefeated, changed]);
    }

    match session.variant {
        Variant::Open if director::in_goal_region(session.player.body.pos) => {
            let (next, changed) = with_mode(session, GameMode::Victory);
            (next, vec![SimEvent::GoalReached, changed])
        }
        Variant::Waves
            if session.mode == GameMode::BossRoom
                && session.boss.as_ref().is_some_and(|b| !b.is_alive()) =>
        {
            let (next, changed) = with_mode(session, GameMode::Victory);
            (next, vec![SimEvent::BossDefeated, changed])
        }
        Variant::Waves
            if session.mode == GameMode::Playing
                && director::at_exit(session.player.body.pos, &session.encounter, &session.tuning) =>
        {
            director::enter_boss_room(session)
        }
        _ => (session.clone(), Vec::new()),
    }
}
