//! Boundary to the render and audio collaborators.
//!
//! The core describes a frame as a `SceneView` and a list of `ActorView`s
//! and hands sound intents to an `AudioSink`. Collaborator errors are logged
//! here and never reach the simulation.

use crate::animation::{ActorKind, Pose, SpriteKey};
use crate::entities::{GameMode, GameSession, Variant};
use crate::error::SinkError;
use crate::events::{SimEvent, SoundCue};
use crate::geometry::{Aabb, Vec2};

// ── Views ────────────────────────────────────────────────────────────────────

/// How a renderer should draw one actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Look {
    /// A sprite the renderer reported it has, and the frame within its pose.
    Sprite(SpriteKey, usize),
    /// Procedural placeholder for an actor without artwork.
    Fallback(ActorKind),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActorView {
    pub kind: ActorKind,
    pub bounds: Aabb,
    pub sprite: SpriteKey,
    pub frame: usize,
    /// Drawn tinted while a hit flash is running.
    pub flashing: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub lives: u32,
    pub enemies_alive: usize,
    pub wave: u32,
    pub total_waves: u32,
    pub exit_locked: bool,
    /// `(health, max_health)` while a boss is present.
    pub boss_health: Option<(u32, u32)>,
    pub collectibles: u32,
    pub sound_enabled: bool,
}

impl Hud {
    /// How many of `cells` a boss health bar fills, rounded down.
    pub fn boss_bar_fill(&self, cells: u32) -> Option<u32> {
        self.boss_health.map(|(health, max)| {
            let filled = u64::from(health.min(max)) * u64::from(cells) / u64::from(max.max(1));
            filled as u32
        })
    }
}

/// Doorway at the far end of the wave corridor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExitView {
    pub bounds: Aabb,
    pub locked: bool,
}

/// Everything a renderer needs for one frame besides the actors.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneView {
    pub mode: GameMode,
    pub variant: Variant,
    pub world: Aabb,
    pub ground_y: f32,
    pub platforms: Vec<Aabb>,
    pub collectibles: Vec<Aabb>,
    pub exit: Option<ExitView>,
    pub hud: Hud,
    pub actors: Vec<ActorView>,
}

/// Build the render snapshot of a session. Actors are listed back to
/// front: enemies, boss, player, then the impact spark.
pub fn scene_view(session: &GameSession) -> SceneView {
    let tuning = &session.tuning;
    let mut actors = Vec::new();

    for e in session.enemies.iter().filter(|e| e.body.alive) {
        let (sprite, frame) = e.sprite();
        actors.push(ActorView {
            kind: ActorKind::Enemy,
            bounds: e.body.hitbox(),
            sprite,
            frame,
            flashing: e.hit_flash,
        });
    }
    if let Some(b) = session.boss.as_ref().filter(|b| b.is_alive()) {
        let (sprite, frame) = b.sprite();
        actors.push(ActorView {
            kind: ActorKind::Boss,
            bounds: b.body.hitbox(),
            sprite,
            frame,
            flashing: b.hit_flash,
        });
    }

    let player = &session.player;
    if player.visible() {
        let (sprite, frame) = player.sprite();
        actors.push(ActorView {
            kind: ActorKind::Player,
            bounds: player.body.hitbox(),
            sprite,
            frame,
            flashing: false,
        });
    }
    if let Some(impact) = player.impact {
        actors.push(ActorView {
            kind: ActorKind::Player,
            bounds: Aabb::from_center(impact.at, 30.0, 30.0),
            sprite: SpriteKey::new(ActorKind::Player, Pose::Impact, player.body.facing),
            frame: 0,
            flashing: false,
        });
    }

    let exit = (session.variant == Variant::Waves && session.mode == GameMode::Playing).then(|| {
        ExitView {
            bounds: Aabb::from_center(
                Vec2::new(tuning.world_width - 50.0, tuning.ground_y - 50.0),
                60.0,
                100.0,
            ),
            locked: session.encounter.exit_locked,
        }
    });

    SceneView {
        mode: session.mode,
        variant: session.variant,
        world: Aabb::new(0.0, 0.0, tuning.world_width, tuning.world_height),
        ground_y: tuning.ground_y,
        platforms: session.platforms.iter().map(|p| p.rect).collect(),
        collectibles: session
            .collectibles
            .iter()
            .filter(|c| !c.collected)
            .map(|c| c.hitbox())
            .collect(),
        exit,
        hud: Hud {
            lives: player.lives,
            enemies_alive: session.enemies.iter().filter(|e| e.body.alive).count(),
            wave: session.encounter.current_wave,
            total_waves: session.encounter.total_waves,
            exit_locked: session.encounter.exit_locked,
            boss_health: session.boss.as_ref().map(|b| (b.health, b.max_health)),
            collectibles: player.collectibles_collected,
            sound_enabled: session.sound_enabled,
        },
        actors,
    }
}

// ── Render ───────────────────────────────────────────────────────────────────

pub trait RenderSink {
    /// Whether artwork exists for `key`. Actors without it are drawn with a
    /// fallback look.
    fn has_sprite(&self, key: SpriteKey) -> bool;
    /// Start a frame: background, level geometry, HUD.
    fn draw_scene(&mut self, scene: &SceneView) -> Result<(), SinkError>;
    fn draw_actor(&mut self, actor: &ActorView, look: Look) -> Result<(), SinkError>;
    /// Overlays and presentation.
    fn finish(&mut self, scene: &SceneView) -> Result<(), SinkError>;
}

fn report(stage: &str, result: Result<(), SinkError>) {
    if let Err(e) = result {
        log::warn!("render {stage} failed: {e}");
    }
}

/// Draw one frame. Actors are skipped on the menu and instruction screens.
pub fn draw(session: &GameSession, sink: &mut impl RenderSink) {
    let scene = scene_view(session);
    report("scene", sink.draw_scene(&scene));

    if !matches!(scene.mode, GameMode::Menu | GameMode::Instructions) {
        for actor in &scene.actors {
            let look = if sink.has_sprite(actor.sprite) {
                Look::Sprite(actor.sprite, actor.frame)
            } else {
                Look::Fallback(actor.kind)
            };
            report("actor", sink.draw_actor(actor, look));
        }
    }

    report("finish", sink.finish(&scene));
}

// ── Audio ────────────────────────────────────────────────────────────────────

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), SinkError>;
}

/// Forward the sound cues of `events` to `sink`. With sound disabled only
/// `MusicStop` gets through.
pub fn dispatch_audio(events: &[SimEvent], sink: &mut impl AudioSink, sound_enabled: bool) {
    for cue in events.iter().filter_map(SimEvent::sound_cue) {
        if !sound_enabled && cue != SoundCue::MusicStop {
            continue;
        }
        if let Err(e) = sink.play(cue) {
            log::warn!("audio cue {} failed: {e}", cue.name());
        }
    }
}
