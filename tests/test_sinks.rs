use std::collections::HashSet;

use blade_gauntlet::animation::{ActorKind, Pose, SpriteKey};
use blade_gauntlet::compute::init_session;
use blade_gauntlet::config::Tuning;
use blade_gauntlet::director::enter_boss_room;
use blade_gauntlet::entities::*;
use blade_gauntlet::error::SinkError;
use blade_gauntlet::events::{SimEvent, SoundCue, Track};
use blade_gauntlet::sinks::*;

#[derive(Default)]
struct RecordingRenderer {
    sprites: HashSet<SpriteKey>,
    looks: Vec<Look>,
    scenes: usize,
    finished: usize,
    fail_scene: bool,
}

impl RenderSink for RecordingRenderer {
    fn has_sprite(&self, key: SpriteKey) -> bool {
        self.sprites.contains(&key)
    }

    fn draw_scene(&mut self, _scene: &SceneView) -> Result<(), SinkError> {
        self.scenes += 1;
        if self.fail_scene {
            return Err(SinkError::Backend("no display".into()));
        }
        Ok(())
    }

    fn draw_actor(&mut self, _actor: &ActorView, look: Look) -> Result<(), SinkError> {
        self.looks.push(look);
        Ok(())
    }

    fn finish(&mut self, _scene: &SceneView) -> Result<(), SinkError> {
        self.finished += 1;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingAudio {
    played: Vec<SoundCue>,
    broken: bool,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), SinkError> {
        if self.broken {
            return Err(SinkError::Backend("device lost".into()));
        }
        self.played.push(cue);
        Ok(())
    }
}

fn boss_room() -> GameSession {
    let mut s = init_session(Variant::Waves, Tuning::default());
    s.mode = GameMode::Playing;
    enter_boss_room(&s).0
}

// ── Scene view ────────────────────────────────────────────────────────────────

#[test]
fn scene_carries_hud_data() {
    let s = boss_room();
    let scene = scene_view(&s);
    assert_eq!(scene.mode, GameMode::BossRoom);
    assert_eq!(scene.hud.lives, 3);
    assert_eq!(scene.hud.boss_health, Some((100, 100)));
    assert_eq!(scene.platforms.len(), 6);
    assert!(scene.exit.is_none());
    // boss then player
    assert_eq!(scene.actors.len(), 2);
    assert_eq!(scene.actors[1].kind, ActorKind::Player);
}

#[test]
fn blinking_player_is_left_out() {
    let mut s = boss_room();
    s.player.invincible = true;
    s.player.invincible_timer = 1.85;
    let scene = scene_view(&s);
    assert!(scene.actors.iter().all(|a| a.kind != ActorKind::Player));
}

#[test]
fn wave_corridor_shows_locked_exit() {
    let mut s = init_session(Variant::Waves, Tuning::default());
    s.mode = GameMode::Playing;
    let scene = scene_view(&s);
    assert_eq!(scene.exit.map(|e| e.locked), Some(true));
    assert_eq!(scene.hud.total_waves, 3);
}

// ── draw ──────────────────────────────────────────────────────────────────────

#[test]
fn actors_without_art_fall_back() {
    let s = boss_room();
    let player_idle = SpriteKey::new(ActorKind::Player, Pose::Idle, Facing::Right);
    let mut r = RecordingRenderer {
        sprites: HashSet::from([player_idle]),
        ..Default::default()
    };
    draw(&s, &mut r);
    assert_eq!(r.looks, vec![Look::Fallback(ActorKind::Boss), Look::Sprite(player_idle, 0)]);
    assert_eq!(r.finished, 1);
}

#[test]
fn menu_draws_no_actors() {
    let s = init_session(Variant::Open, Tuning::default());
    let mut r = RecordingRenderer::default();
    draw(&s, &mut r);
    assert!(r.looks.is_empty());
    assert_eq!(r.scenes, 1);
}

#[test]
fn render_failure_is_swallowed() {
    let s = boss_room();
    let mut r = RecordingRenderer { fail_scene: true, ..Default::default() };
    draw(&s, &mut r);
    assert_eq!(r.finished, 1);
}

// ── dispatch_audio ────────────────────────────────────────────────────────────

#[test]
fn audio_cues_follow_events() {
    let events = [
        SimEvent::Jumped,
        SimEvent::ExitUnlocked,
        SimEvent::PlayerHurt { lives: 2 },
        SimEvent::MusicStart(Track::Level),
    ];
    let mut audio = RecordingAudio::default();
    dispatch_audio(&events, &mut audio, true);
    assert_eq!(
        audio.played,
        vec![SoundCue::Jump, SoundCue::Hurt, SoundCue::MusicStart(Track::Level)]
    );
}

#[test]
fn muted_audio_only_stops_music() {
    let events = [SimEvent::Jumped, SimEvent::MusicStop, SimEvent::MusicStart(Track::Boss)];
    let mut audio = RecordingAudio::default();
    dispatch_audio(&events, &mut audio, false);
    assert_eq!(audio.played, vec![SoundCue::MusicStop]);
}

#[test]
fn audio_failure_is_swallowed() {
    let mut audio = RecordingAudio { broken: true, ..Default::default() };
    dispatch_audio(&[SimEvent::Jumped, SimEvent::MusicStop], &mut audio, true);
    assert!(audio.played.is_empty());
}

// ── HUD ───────────────────────────────────────────────────────────────────────

#[test]
fn boss_bar_fill_scales_health() {
    let mut hud = scene_view(&boss_room()).hud;
    assert_eq!(hud.boss_bar_fill(10), Some(10));
    hud.boss_health = Some((55, 100));
    assert_eq!(hud.boss_bar_fill(10), Some(5));
    hud.boss_health = Some((0, 0));
    assert_eq!(hud.boss_bar_fill(10), Some(0));
    hud.boss_health = None;
    assert_eq!(hud.boss_bar_fill(10), None);
}

#[test]
fn boss_bar_fill_handles_huge_health() {
    let mut hud = scene_view(&boss_room()).hud;
    hud.boss_health = Some((u32::MAX, u32::MAX));
    assert_eq!(hud.boss_bar_fill(10), Some(10));
    hud.boss_health = Some((u32::MAX / 2, u32::MAX));
    assert_eq!(hud.boss_bar_fill(10), Some(4));
}
