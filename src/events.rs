//! Semantic events emitted by the simulation.
//!
//! Collaborators react to these; nothing in the core reads them back.

use crate::entities::GameMode;
use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Track {
    Level,
    Boss,
}

/// Fire-and-forget request for the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Jump,
    Hit,
    Hurt,
    MusicStart(Track),
    MusicStop,
}

impl SoundCue {
    /// Semantic name, for backends that key assets by string.
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Hit => "hit",
            SoundCue::Hurt => "hurt",
            SoundCue::MusicStart(Track::Level) => "music_start:level",
            SoundCue::MusicStart(Track::Boss) => "music_start:boss",
            SoundCue::MusicStop => "music_stop",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    Jumped,
    /// An enemy was struck down by the player's swing.
    EnemyKilled { at: Vec2 },
    BossDamaged { at: Vec2, health: u32 },
    PlayerHurt { lives: u32 },
    CollectiblePicked { total: u32 },
    WaveSpawned { wave: u32 },
    ExitUnlocked,
    BossDefeated,
    PlayerDefeated,
    GoalReached,
    ModeChanged { from: GameMode, to: GameMode },
    MusicStart(Track),
    MusicStop,
}

impl SimEvent {
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            SimEvent::Jumped => Some(SoundCue::Jump),
            SimEvent::EnemyKilled { .. } | SimEvent::BossDamaged { .. } => Some(SoundCue::Hit),
            SimEvent::PlayerHurt { .. } => Some(SoundCue::Hurt),
            SimEvent::MusicStart(track) => Some(SoundCue::MusicStart(*track)),
            SimEvent::MusicStop => Some(SoundCue::MusicStop),
            _ => None,
        }
    }
}
