//! Melee swings, contact damage and pickups.
//!
//! A swing lasts `attack_duration` seconds. It can land once: the first
//! tick its hitbox overlaps live targets, every one of those targets is
//! struck and the swing is spent until the next one starts.

use crate::config::Tuning;
use crate::entities::{Boss, Collectible, Enemy, Facing, Impact, Player};
use crate::events::SimEvent;
use crate::geometry::{Aabb, Vec2};

/// Anything a player swing can strike.
pub trait Target: Clone {
    fn hitbox(&self) -> Aabb;
    fn is_alive(&self) -> bool;
    fn position(&self) -> Vec2;
    /// The target after taking one landed swing, and the event it produces.
    fn struck(&self, tuning: &Tuning) -> (Self, SimEvent);
}

impl Target for Enemy {
    fn hitbox(&self) -> Aabb {
        self.body.hitbox()
    }

    fn is_alive(&self) -> bool {
        self.body.alive
    }

    fn position(&self) -> Vec2 {
        self.body.pos
    }

    fn struck(&self, _tuning: &Tuning) -> (Self, SimEvent) {
        let mut e = self.clone();
        e.body.alive = false;
        e.hit_flash = true;
        e.hit_flash_timer = 0.0;
        (e, SimEvent::EnemyKilled { at: self.body.pos })
    }
}

impl Target for Boss {
    fn hitbox(&self) -> Aabb {
        self.body.hitbox()
    }

    fn is_alive(&self) -> bool {
        Boss::is_alive(self)
    }

    fn position(&self) -> Vec2 {
        self.body.pos
    }

    fn struck(&self, tuning: &Tuning) -> (Self, SimEvent) {
        let mut b = self.clone();
        b.health = b.health.saturating_sub(tuning.boss_hit_damage);
        b.body.alive = b.health > 0;
        b.hit_flash = true;
        b.hit_flash_timer = 0.0;
        let event = SimEvent::BossDamaged { at: b.body.pos, health: b.health };
        (b, event)
    }
}

// ── Player swing ─────────────────────────────────────────────────────────────

/// Start a swing unless one is already in progress.
pub fn try_attack(player: &Player, tuning: &Tuning) -> Player {
    if player.attacking {
        return player.clone();
    }
    Player {
        attacking: true,
        attack_timer: tuning.attack_duration,
        attack_landed: false,
        ..player.clone()
    }
}

/// Strike zone in front of the player, sized from the body width.
pub fn attack_hitbox(player: &Player, tuning: &Tuning) -> Aabb {
    let base = player.body.width;
    let width = tuning.attack_range;
    let height = base * 1.5;
    let offset = base / 2.0 + 10.0;
    let top = player.body.pos.y - base / 2.0 - 10.0;
    let left = match player.body.facing {
        Facing::Right => player.body.pos.x + offset,
        Facing::Left => player.body.pos.x - offset - width,
    };
    Aabb::new(left, top, width, height)
}

/// Apply the current swing to `targets`.
///
/// Every live target overlapping the hitbox on the landing tick is struck;
/// afterwards the swing is marked as landed and ignores all targets until
/// it ends.
pub fn resolve_hits<T: Target>(
    player: &Player,
    targets: &[T],
    tuning: &Tuning,
) -> (Player, Vec<T>, Vec<SimEvent>) {
    if !player.attacking || player.attack_landed {
        return (player.clone(), targets.to_vec(), Vec::new());
    }

    let zone = attack_hitbox(player, tuning);
    let mut events = Vec::new();
    let mut last_hit = None;
    let targets: Vec<T> = targets
        .iter()
        .map(|t| {
            if t.is_alive() && t.hitbox().intersects(&zone) {
                let (struck, event) = t.struck(tuning);
                events.push(event);
                last_hit = Some(t.position());
                struck
            } else {
                t.clone()
            }
        })
        .collect();

    let player = match last_hit {
        Some(at) => Player {
            attack_landed: true,
            impact: Some(Impact { at, elapsed: 0.0 }),
            ..player.clone()
        },
        None => player.clone(),
    };
    (player, targets, events)
}

// ── Damage to the player ─────────────────────────────────────────────────────

/// Lose one life and start the invincibility window. Returns `false` and
/// leaves the player untouched while already invincible.
pub fn take_damage(player: &Player, tuning: &Tuning) -> (Player, bool) {
    if player.invincible {
        return (player.clone(), false);
    }
    let hurt = Player {
        lives: player.lives.saturating_sub(1),
        invincible: true,
        invincible_timer: tuning.invincibility_secs,
        ..player.clone()
    };
    (hurt, true)
}

/// Damage from touching live enemies or the boss.
pub fn resolve_contacts(
    player: &Player,
    enemies: &[Enemy],
    boss: Option<&Boss>,
    tuning: &Tuning,
) -> (Player, Vec<SimEvent>) {
    let own_box = player.body.hitbox();
    let touching = enemies
        .iter()
        .filter(|e| e.body.alive)
        .map(|e| e.body.hitbox())
        .chain(boss.filter(|b| b.is_alive()).map(|b| b.body.hitbox()))
        .filter(|hb| hb.intersects(&own_box))
        .count();

    let mut player = player.clone();
    let mut events = Vec::new();
    for _ in 0..touching {
        let (next, hurt) = take_damage(&player, tuning);
        player = next;
        if hurt {
            events.push(SimEvent::PlayerHurt { lives: player.lives });
        }
    }
    (player, events)
}

/// The boss strikes when the player is within its attack range and its
/// cooldown has run out.
pub fn boss_strike(boss: &Boss, player: &Player, tuning: &Tuning) -> (Boss, Player, Vec<SimEvent>) {
    let distance = (boss.body.pos.x - player.body.pos.x).abs();
    if !boss.is_alive() || distance > boss.attack_range || boss.attack_cooldown > 0.0 {
        return (boss.clone(), player.clone(), Vec::new());
    }

    let boss = Boss {
        attack_cooldown: tuning.boss_attack_cooldown,
        ..boss.clone()
    };
    let (player, hurt) = take_damage(player, tuning);
    let events = if hurt {
        vec![SimEvent::PlayerHurt { lives: player.lives }]
    } else {
        Vec::new()
    };
    (boss, player, events)
}

// ── Pickups ──────────────────────────────────────────────────────────────────

pub fn collect_pickups(
    player: &Player,
    collectibles: &[Collectible],
) -> (Player, Vec<Collectible>, Vec<SimEvent>) {
    let own_box = player.body.hitbox();
    let mut player = player.clone();
    let mut events = Vec::new();
    let collectibles: Vec<Collectible> = collectibles
        .iter()
        .map(|c| {
            if !c.collected && c.hitbox().intersects(&own_box) {
                player.collectibles_collected += 1;
                events.push(SimEvent::CollectiblePicked { total: player.collectibles_collected });
                Collectible { collected: true, ..*c }
            } else {
                *c
            }
        })
        .collect();
    (player, collectibles, events)
}
