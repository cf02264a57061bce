//! Per-tick input snapshot and edge detection.
//!
//! The host polls its devices once per frame and hands the core a plain
//! `InputSnapshot` of what is held down. Discrete actions (attack, confirm,
//! escape, sound toggle) only fire on the tick their key goes down, which
//! the core derives by comparing against the previous snapshot.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
    pub confirm: bool,
    pub escape: bool,
    pub toggle_sound: bool,
}

/// Actions whose key went from released to pressed this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputEdges {
    pub attack: bool,
    pub confirm: bool,
    pub escape: bool,
    pub toggle_sound: bool,
}

impl InputEdges {
    pub fn between(previous: &InputSnapshot, current: &InputSnapshot) -> Self {
        Self {
            attack: current.attack && !previous.attack,
            confirm: current.confirm && !previous.confirm,
            escape: current.escape && !previous.escape,
            toggle_sound: current.toggle_sound && !previous.toggle_sound,
        }
    }
}
