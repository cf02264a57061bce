use blade_gauntlet::compute::*;
use blade_gauntlet::config::{Tuning, TICK_DT};
use blade_gauntlet::director::enter_boss_room;
use blade_gauntlet::entities::*;
use blade_gauntlet::events::{SimEvent, Track};
use blade_gauntlet::geometry::Vec2;
use blade_gauntlet::input::InputSnapshot;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FLOOR_Y: f32 = 550.0 - 10.5;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Wave game already in progress, wave 1 under way with an empty roster.
fn make_state() -> GameSession {
    let mut s = init_session(Variant::Waves, Tuning::default());
    s.mode = GameMode::Playing;
    s.encounter.current_wave = 1;
    s
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn confirm_key() -> InputSnapshot {
    InputSnapshot { confirm: true, ..idle() }
}

/// Press and release a key: one update with it down, one with it up.
fn tap(s: &GameSession, key: InputSnapshot, rng: &mut StdRng) -> (GameSession, Vec<SimEvent>) {
    let (s, events) = update(s, &key, TICK_DT, rng);
    let (s, _) = update(&s, &idle(), TICK_DT, rng);
    (s, events)
}

fn enemy_at(x: f32) -> Enemy {
    Enemy::new(
        Vec2::new(x, FLOOR_Y),
        Variant::Waves.body_size(),
        x - 150.0,
        x + 150.0,
        2.0,
        Facing::Right,
    )
}

// ── init_session / reset_game ─────────────────────────────────────────────────

#[test]
fn init_session_starts_on_menu() {
    let s = init_session(Variant::Waves, Tuning::default());
    assert_eq!(s.mode, GameMode::Menu);
    assert_eq!(s.player.lives, 3);
    assert_eq!(s.player.body.pos, Vec2::new(100.0, FLOOR_Y));
    assert!(s.enemies.is_empty());
    assert!(s.platforms.is_empty());
    assert!(s.boss.is_none());
    assert!(s.sound_enabled);
    assert!(s.encounter.exit_locked);
}

#[test]
fn open_variant_lays_out_level() {
    let s = init_session(Variant::Open, Tuning::default());
    assert_eq!(s.enemies.len(), 4);
    assert_eq!(s.platforms.len(), 6);
    assert_eq!(s.player.body.pos, Vec2::new(100.0, 520.0));
}

#[test]
fn reset_game_restores_fresh_level() {
    let mut s = make_state();
    s.player.lives = 1;
    s.encounter.exit_locked = false;
    s.enemies.push(enemy_at(400.0));
    let s2 = reset_game(&s);
    assert_eq!(s2.player.lives, 3);
    assert!(s2.enemies.is_empty());
    assert!(s2.encounter.exit_locked);
    assert_eq!(s2.encounter.current_wave, 0);
    assert_eq!(s2.mode, GameMode::Playing);
}

// ── State machine ─────────────────────────────────────────────────────────────

#[test]
fn wave_game_goes_through_instructions() {
    let mut rng = seeded_rng();
    let s = init_session(Variant::Waves, Tuning::default());

    let (s, events) = tap(&s, confirm_key(), &mut rng);
    assert_eq!(s.mode, GameMode::Instructions);
    assert_eq!(
        events,
        vec![SimEvent::ModeChanged { from: GameMode::Menu, to: GameMode::Instructions }]
    );

    let (s, events) = tap(&s, confirm_key(), &mut rng);
    assert_eq!(s.mode, GameMode::Playing);
    assert!(events.contains(&SimEvent::MusicStart(Track::Level)));
}

#[test]
fn open_game_skips_instructions() {
    let mut rng = seeded_rng();
    let s = init_session(Variant::Open, Tuning::default());
    let (s, _) = update(&s, &confirm_key(), TICK_DT, &mut rng);
    assert_eq!(s.mode, GameMode::Playing);
}

#[test]
fn held_confirm_advances_once() {
    let mut rng = seeded_rng();
    let s = init_session(Variant::Waves, Tuning::default());
    let (s, _) = update(&s, &confirm_key(), TICK_DT, &mut rng);
    let (s, events) = update(&s, &confirm_key(), TICK_DT, &mut rng);
    assert_eq!(s.mode, GameMode::Instructions);
    assert!(events.is_empty());
}

#[test]
fn transition_frame_skips_simulation() {
    let mut rng = seeded_rng();
    let mut s = init_session(Variant::Waves, Tuning::default());
    s.mode = GameMode::Instructions;
    let (s, events) = update(&s, &confirm_key(), TICK_DT, &mut rng);
    assert_eq!(s.mode, GameMode::Playing);
    assert_eq!(s.player.body.vel, Vec2::ZERO);
    assert!(s.enemies.is_empty());
    assert!(!events.iter().any(|e| matches!(e, SimEvent::WaveSpawned { .. })));
}

#[test]
fn escape_abandons_game() {
    let mut rng = seeded_rng();
    let s = make_state();
    let (s, events) = update(&s, &InputSnapshot { escape: true, ..idle() }, TICK_DT, &mut rng);
    assert_eq!(s.mode, GameMode::Menu);
    assert!(events.contains(&SimEvent::MusicStop));
}

#[test]
fn escape_from_boss_room() {
    let (s, _) = enter_boss_room(&make_state());
    let (s2, _) = escape(&s);
    assert_eq!(s2.mode, GameMode::Menu);
}

#[test]
fn escape_on_menu_is_ignored() {
    let s = init_session(Variant::Waves, Tuning::default());
    let (s2, events) = escape(&s);
    assert_eq!(s2.mode, GameMode::Menu);
    assert!(events.is_empty());
}

#[test]
fn game_over_confirm_returns_to_menu() {
    let mut s = make_state();
    s.mode = GameMode::GameOver;
    let (s2, events) = confirm(&s);
    assert_eq!(s2.mode, GameMode::Menu);
    assert!(events.contains(&SimEvent::MusicStop));
}

#[test]
fn sound_toggle_on_menu() {
    let mut rng = seeded_rng();
    let s = init_session(Variant::Waves, Tuning::default());
    let toggle = InputSnapshot { toggle_sound: true, ..idle() };

    let (s, events) = tap(&s, toggle, &mut rng);
    assert!(!s.sound_enabled);
    assert_eq!(events, vec![SimEvent::MusicStop]);

    let (s, events) = tap(&s, toggle, &mut rng);
    assert!(s.sound_enabled);
    assert_eq!(events, vec![SimEvent::MusicStart(Track::Level)]);
}

#[test]
fn sound_toggle_ignored_while_playing() {
    let mut rng = seeded_rng();
    let s = make_state();
    let (s2, _) = update(&s, &InputSnapshot { toggle_sound: true, ..idle() }, TICK_DT, &mut rng);
    assert!(s2.sound_enabled);
}

// ── Simulation ────────────────────────────────────────────────────────────────

#[test]
fn first_tick_spawns_wave_one() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.encounter.current_wave = 0;
    let (s2, events) = update(&s, &idle(), TICK_DT, &mut rng);
    assert_eq!(s2.enemies.len(), 1);
    assert!(events.contains(&SimEvent::WaveSpawned { wave: 1 }));
}

#[test]
fn attack_kills_enemy_in_reach() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.enemies = vec![enemy_at(140.0)];

    let (s, events) = update(&s, &InputSnapshot { attack: true, ..idle() }, TICK_DT, &mut rng);
    let kills = events
        .iter()
        .filter(|e| matches!(e, SimEvent::EnemyKilled { .. }))
        .count();
    assert_eq!(kills, 1);
    assert!(s.enemies.is_empty());
    assert_eq!(s.player.lives, 3);
    assert!(s.player.attack_landed);
}

#[test]
fn holding_attack_does_not_restart_swing() {
    let mut rng = seeded_rng();
    let s = make_state();
    let attack = InputSnapshot { attack: true, ..idle() };
    let (mut s, _) = update(&s, &attack, TICK_DT, &mut rng);
    for _ in 0..30 {
        s = update(&s, &attack, TICK_DT, &mut rng).0;
    }
    assert!(!s.player.attacking);
}

#[test]
fn last_life_ends_game_once() {
    let mut rng = seeded_rng();
    let mut s = make_state();
    s.player.lives = 1;
    s.enemies = vec![enemy_at(100.0)];

    let (s, events) = update(&s, &idle(), TICK_DT, &mut rng);
    assert_eq!(s.mode, GameMode::GameOver);
    assert_eq!(s.player.lives, 0);
    let defeats = events.iter().filter(|e| **e == SimEvent::PlayerDefeated).count();
    assert_eq!(defeats, 1);

    let (s, events) = update(&s, &idle(), TICK_DT, &mut rng);
    assert_eq!(s.mode, GameMode::GameOver);
    assert!(!events.contains(&SimEvent::PlayerDefeated));
}

#[test]
fn lives_stay_in_range_under_random_input() {
    let mut rng = seeded_rng();
    let mut input_rng = StdRng::seed_from_u64(7);
    let mut s = make_state();
    for _ in 0..5000 {
        let input = InputSnapshot {
            left: input_rng.gen_bool(0.3),
            right: input_rng.gen_bool(0.5),
            jump: input_rng.gen_bool(0.1),
            attack: input_rng.gen_bool(0.2),
            confirm: input_rng.gen_bool(0.05),
            escape: false,
            toggle_sound: false,
        };
        s = update(&s, &input, TICK_DT, &mut rng).0;
        assert!(s.player.lives <= 3);
        for e in &s.enemies {
            assert!(e.body.pos.x >= e.patrol_left && e.body.pos.x <= e.patrol_right);
        }
    }
}

// ── evaluate ──────────────────────────────────────────────────────────────────

#[test]
fn unlocked_exit_leads_to_boss_room() {
    let mut s = make_state();
    s.encounter.exit_locked = false;
    s.player.body.pos = Vec2::new(750.0, FLOOR_Y);
    let (s2, events) = evaluate(&s);
    assert_eq!(s2.mode, GameMode::BossRoom);
    assert!(s2.boss.is_some());
    assert!(events.contains(&SimEvent::MusicStart(Track::Boss)));
}

#[test]
fn locked_exit_keeps_player_in_level() {
    let mut s = make_state();
    s.player.body.pos = Vec2::new(750.0, FLOOR_Y);
    let (s2, events) = evaluate(&s);
    assert_eq!(s2.mode, GameMode::Playing);
    assert!(events.is_empty());
}

#[test]
fn beaten_boss_means_victory() {
    let (mut s, _) = enter_boss_room(&make_state());
    if let Some(b) = s.boss.as_mut() {
        b.health = 0;
        b.body.alive = false;
    }
    let (s2, events) = evaluate(&s);
    assert_eq!(s2.mode, GameMode::Victory);
    assert!(events.contains(&SimEvent::BossDefeated));
}

#[test]
fn idle_player_in_boss_room_gets_hit() {
    let (mut s, _) = enter_boss_room(&make_state());
    let mut rng = seeded_rng();
    let mut hurt = false;
    for _ in 0..300 {
        let (next, events) = update(&s, &idle(), TICK_DT, &mut rng);
        hurt |= events.iter().any(|e| matches!(e, SimEvent::PlayerHurt { .. }));
        s = next;
    }
    assert!(hurt);
    assert!(s.player.lives < 3);
    assert!(s.boss.as_ref().is_some_and(|b| b.in_melee));
}

#[test]
fn living_boss_is_not_victory() {
    let (s, _) = enter_boss_room(&make_state());
    let (s2, _) = evaluate(&s);
    assert_eq!(s2.mode, GameMode::BossRoom);
}

#[test]
fn open_goal_means_victory() {
    let mut s = init_session(Variant::Open, Tuning::default());
    s.mode = GameMode::Playing;
    s.player.body.pos = Vec2::new(720.0, 120.0);
    let (s2, events) = evaluate(&s);
    assert_eq!(s2.mode, GameMode::Victory);
    assert!(events.contains(&SimEvent::GoalReached));
}

#[test]
fn evaluate_outside_play_does_nothing() {
    let mut s = make_state();
    s.mode = GameMode::Menu;
    s.player.lives = 0;
    let (s2, events) = evaluate(&s);
    assert_eq!(s2.mode, GameMode::Menu);
    assert!(events.is_empty());
}

#[test]
fn frame_counter_advances_every_update() {
    let mut rng = seeded_rng();
    let s = init_session(Variant::Waves, Tuning::default());
    let (s, _) = update(&s, &idle(), TICK_DT, &mut rng);
    let (s, _) = update(&s, &idle(), TICK_DT, &mut rng);
    assert_eq!(s.frame, 2);
}
