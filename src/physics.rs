//! Kinematics for every actor.
//!
//! Like the rest of the core, each function takes the current value by
//! reference and returns the next one. Velocities are in units per tick;
//! timers advance by `dt` seconds.

use crate::config::Tuning;
use crate::entities::{AnimCursor, Body, Boss, Enemy, Facing, LandingBand, Platform, Player};
use crate::events::SimEvent;
use crate::input::InputSnapshot;

// ── Shared helpers ───────────────────────────────────────────────────────────

pub fn advance_anim(anim: AnimCursor, dt: f32, speed: f32) -> AnimCursor {
    let timer = anim.timer + dt;
    if timer >= speed {
        AnimCursor { frame: anim.frame.wrapping_add(1), timer: 0.0 }
    } else {
        AnimCursor { timer, ..anim }
    }
}

/// Count a timer down, returning `None` once it runs out.
fn count_down(remaining: f32, dt: f32) -> Option<f32> {
    let left = remaining - dt;
    (left > 0.0).then_some(left)
}

/// Keep a body inside the horizontal world bounds and below the top edge.
pub fn clamp_to_world(body: &Body, tuning: &Tuning) -> Body {
    let min_x = body.width / 2.0 + tuning.edge_margin;
    let max_x = (tuning.world_width - body.width / 2.0 - tuning.edge_margin).max(min_x);
    let min_y = body.height / 2.0;
    let mut out = body.clone();
    out.pos.x = out.pos.x.clamp(min_x, max_x);
    out.pos.y = out.pos.y.max(min_y);
    out
}

/// Whether a falling or resting body's feet are caught by `platform`.
pub fn caught_by(body: &Body, platform: &Platform, band: LandingBand) -> bool {
    let hb = body.hitbox();
    let p = &platform.rect;
    body.vel.y >= 0.0
        && hb.right() > p.left + band.inset
        && hb.left < p.right() - band.inset
        && hb.bottom() >= p.top - band.above
        && hb.bottom() <= p.top + band.below
}

/// Index of the first platform, in list order, that catches the body.
pub fn land_on_platforms(body: &Body, platforms: &[Platform], band: LandingBand) -> Option<usize> {
    platforms.iter().position(|p| caught_by(body, p, band))
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Advance the player one tick: steering, jump, gravity, world bounds,
/// platform and ground resolution, then the countdown timers.
pub fn step_player(
    player: &Player,
    input: &InputSnapshot,
    platforms: &[Platform],
    band: LandingBand,
    dt: f32,
    tuning: &Tuning,
) -> (Player, Vec<SimEvent>) {
    let mut events = Vec::new();
    let mut p = player.clone();

    // ── 1. Steering ──────────────────────────────────────────────────────────
    p.body.vel.x = 0.0;
    p.moving = false;
    if input.left {
        p.body.vel.x = -tuning.player_speed;
        p.body.facing = Facing::Left;
        p.moving = true;
    } else if input.right {
        p.body.vel.x = tuning.player_speed;
        p.body.facing = Facing::Right;
        p.moving = true;
    }

    // ── 2. Jump ──────────────────────────────────────────────────────────────
    if input.jump && p.grounded {
        p.body.vel.y = tuning.jump_impulse;
        p.grounded = false;
        events.push(SimEvent::Jumped);
    }

    // ── 3. Integrate ─────────────────────────────────────────────────────────
    p.body.vel.y += tuning.gravity;
    p.body.pos = p.body.pos + p.body.vel;
    p.body = clamp_to_world(&p.body, tuning);

    // ── 4. Platforms, then the floor ─────────────────────────────────────────
    p.grounded = false;
    if let Some(i) = land_on_platforms(&p.body, platforms, band) {
        p.body.pos.y = platforms[i].rect.top - p.body.height / 2.0;
        p.body.vel.y = 0.0;
        p.grounded = true;
    } else if p.body.feet() >= tuning.ground_y {
        p.body.pos.y = tuning.ground_y - p.body.height / 2.0;
        p.body.vel.y = 0.0;
        p.grounded = true;
    }

    // ── 5. Timers ────────────────────────────────────────────────────────────
    if p.invincible {
        match count_down(p.invincible_timer, dt) {
            Some(left) => p.invincible_timer = left,
            None => {
                p.invincible = false;
                p.invincible_timer = 0.0;
            }
        }
    }
    if p.attacking {
        match count_down(p.attack_timer, dt) {
            Some(left) => p.attack_timer = left,
            None => {
                p.attacking = false;
                p.attack_timer = 0.0;
                p.attack_landed = false;
            }
        }
    }
    p.impact = p.impact.and_then(|mut impact| {
        impact.elapsed += dt;
        (impact.elapsed < tuning.impact_secs).then_some(impact)
    });
    p.body.anim = advance_anim(p.body.anim, dt, tuning.animation_speed);

    (p, events)
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Walk the patrol route, turning around exactly at each bound.
pub fn step_enemy(enemy: &Enemy, dt: f32, tuning: &Tuning) -> Enemy {
    if !enemy.body.alive {
        return enemy.clone();
    }
    let mut e = enemy.clone();

    e.body.pos.x += e.body.vel.x;
    if e.body.pos.x <= e.patrol_left {
        e.body.pos.x = e.patrol_left;
        e.body.vel.x = tuning.enemy_speed;
        e.body.facing = Facing::Right;
    } else if e.body.pos.x >= e.patrol_right {
        e.body.pos.x = e.patrol_right;
        e.body.vel.x = -tuning.enemy_speed;
        e.body.facing = Facing::Left;
    }

    if e.hit_flash {
        e.hit_flash_timer += dt;
        if e.hit_flash_timer >= tuning.hit_flash_secs {
            e.hit_flash = false;
            e.hit_flash_timer = 0.0;
        }
    }
    e.body.anim = advance_anim(e.body.anim, dt, tuning.animation_speed);
    e
}

// ── Boss ─────────────────────────────────────────────────────────────────────

/// Pursue the player along the floor; stop once within melee range.
pub fn step_boss(boss: &Boss, player_x: f32, dt: f32, tuning: &Tuning) -> Boss {
    if !boss.is_alive() {
        return boss.clone();
    }
    let mut b = boss.clone();

    b.body.pos.y = tuning.ground_y - b.body.height / 2.0;
    b.body.vel.y = 0.0;

    let distance = (b.body.pos.x - player_x).abs();
    if distance > tuning.boss_melee_range {
        b.in_melee = false;
        if b.body.pos.x < player_x {
            b.body.vel.x = tuning.boss_speed;
            b.body.facing = Facing::Right;
        } else {
            b.body.vel.x = -tuning.boss_speed;
            b.body.facing = Facing::Left;
        }
    } else {
        b.in_melee = true;
        b.body.vel.x = 0.0;
    }

    // boss_speed is tuned per 60 Hz tick
    b.body.pos.x += b.body.vel.x * dt * 60.0;
    b.body = clamp_to_world(&b.body, tuning);

    if b.hit_flash {
        b.hit_flash_timer += dt;
        if b.hit_flash_timer >= tuning.hit_flash_secs {
            b.hit_flash = false;
            b.hit_flash_timer = 0.0;
        }
    }
    if b.attack_cooldown > 0.0 {
        b.attack_cooldown = (b.attack_cooldown - dt).max(0.0);
    }
    b.body.anim = advance_anim(b.body.anim, dt, tuning.animation_speed);
    b
}
