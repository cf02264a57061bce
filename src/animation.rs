//! Sprite selection table.
//!
//! Sprites are addressed by `(actor, pose, facing)` rather than string keys,
//! so every lookup is checked at compile time. Frame counts come from
//! `frame_count`; a count of zero means the actor has no such pose.

use crate::entities::Facing;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Enemy,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    Idle,
    Walk,
    Attack,
    /// Slash spark drawn where a swing landed.
    Impact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub actor: ActorKind,
    pub pose: Pose,
    pub facing: Facing,
}

impl SpriteKey {
    pub const fn new(actor: ActorKind, pose: Pose, facing: Facing) -> Self {
        Self { actor, pose, facing }
    }
}

pub const fn frame_count(actor: ActorKind, pose: Pose) -> usize {
    match (actor, pose) {
        (ActorKind::Player, Pose::Idle) => 1,
        (ActorKind::Player, Pose::Walk) => 2,
        (ActorKind::Player, Pose::Attack) => 1,
        (ActorKind::Player, Pose::Impact) => 1,
        (ActorKind::Enemy, Pose::Walk) => 2,
        (ActorKind::Boss, Pose::Walk) => 2,
        (ActorKind::Boss, Pose::Attack) => 1,
        _ => 0,
    }
}

/// Frame within a pose for an animation cursor that has advanced
/// `cursor_frame` times.
pub fn frame_index(actor: ActorKind, pose: Pose, cursor_frame: u32) -> usize {
    match frame_count(actor, pose) {
        0 => 0,
        n => cursor_frame as usize % n,
    }
}

/// Player pose: an active swing wins over walking.
pub fn player_pose(attacking: bool, moving: bool) -> Pose {
    if attacking {
        Pose::Attack
    } else if moving {
        Pose::Walk
    } else {
        Pose::Idle
    }
}
