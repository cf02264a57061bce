//! Actors, level geometry and the session that owns them. Plain data; the
//! simulation lives in `physics`, `combat`, `director` and `compute`.

use crate::animation::{self, ActorKind, Pose, SpriteKey};
use crate::config::Tuning;
use crate::geometry::{Aabb, Vec2};
use crate::input::InputSnapshot;

// ── Modes & variants ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    Menu,
    Instructions,
    Playing,
    BossRoom,
    GameOver,
    Victory,
}

impl GameMode {
    /// Modes in which the simulation advances.
    pub fn is_active(&self) -> bool {
        matches!(self, GameMode::Playing | GameMode::BossRoom)
    }
}

/// Which of the two built-in games a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Corridor with enemy waves, a locked exit and a boss arena.
    Waves,
    /// Single platform level with fixed patrols and a goal ledge.
    Open,
}

/// How far around a platform's top edge a falling actor's feet are caught.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandingBand {
    /// Horizontal overlap must exceed the platform edges by this much.
    pub inset: f32,
    pub above: f32,
    pub below: f32,
}

impl Variant {
    /// Collision box (width, height) shared by every actor in the variant.
    pub fn body_size(&self) -> (f32, f32) {
        match self {
            // 40×60 sprites drawn at 0.35 scale
            Variant::Waves => (14.0, 21.0),
            Variant::Open => (40.0, 60.0),
        }
    }

    pub fn landing_band(&self) -> LandingBand {
        match self {
            Variant::Waves => LandingBand { inset: 5.0, above: 5.0, below: 15.0 },
            Variant::Open => LandingBand { inset: 0.0, above: 0.0, below: 20.0 },
        }
    }

    pub fn has_instructions(&self) -> bool {
        matches!(self, Variant::Waves)
    }
}

// ── Actor core ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Animation frame counter driven by elapsed time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimCursor {
    pub frame: u32,
    pub timer: f32,
}

/// Fields every moving actor has. Position is the centre of the body box.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub facing: Facing,
    pub anim: AnimCursor,
    pub alive: bool,
    pub width: f32,
    pub height: f32,
}

impl Body {
    pub fn new(pos: Vec2, (width, height): (f32, f32)) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: Facing::Right,
            anim: AnimCursor::default(),
            alive: true,
            width,
            height,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.pos, self.width, self.height)
    }

    /// y of the body's feet.
    pub fn feet(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Where the last landed swing struck, shown briefly by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    pub at: Vec2,
    pub elapsed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub lives: u32,
    pub invincible: bool,
    /// Seconds of invincibility left.
    pub invincible_timer: f32,
    pub grounded: bool,
    pub moving: bool,
    pub attacking: bool,
    /// Seconds left in the current swing.
    pub attack_timer: f32,
    /// Set once the current swing has struck something.
    pub attack_landed: bool,
    pub impact: Option<Impact>,
    pub collectibles_collected: u32,
}

impl Player {
    pub fn new(pos: Vec2, size: (f32, f32), lives: u32) -> Self {
        Self {
            body: Body::new(pos, size),
            lives,
            invincible: false,
            invincible_timer: 0.0,
            grounded: false,
            moving: false,
            attacking: false,
            attack_timer: 0.0,
            attack_landed: false,
            impact: None,
            collectibles_collected: 0,
        }
    }

    /// False on the "off" half of the invincibility blink.
    pub fn visible(&self) -> bool {
        !(self.invincible && (self.invincible_timer * 10.0).floor() as i64 % 2 == 0)
    }

    pub fn sprite(&self) -> (SpriteKey, usize) {
        let pose = animation::player_pose(self.attacking, self.moving);
        let frame = animation::frame_index(ActorKind::Player, pose, self.body.anim.frame);
        (SpriteKey::new(ActorKind::Player, pose, self.body.facing), frame)
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Ground patroller walking back and forth inside `[patrol_left, patrol_right]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub patrol_left: f32,
    pub patrol_right: f32,
    pub hit_flash: bool,
    pub hit_flash_timer: f32,
}

impl Enemy {
    /// `direction` is the sign of the initial walk; the start position is
    /// clamped into the patrol range.
    pub fn new(
        pos: Vec2,
        size: (f32, f32),
        patrol_left: f32,
        patrol_right: f32,
        speed: f32,
        direction: Facing,
    ) -> Self {
        let mut body = Body::new(
            Vec2::new(pos.x.clamp(patrol_left, patrol_right.max(patrol_left)), pos.y),
            size,
        );
        body.vel.x = speed * direction.sign();
        body.facing = direction;
        Self {
            body,
            patrol_left,
            patrol_right: patrol_right.max(patrol_left),
            hit_flash: false,
            hit_flash_timer: 0.0,
        }
    }

    pub fn sprite(&self) -> (SpriteKey, usize) {
        let frame = animation::frame_index(ActorKind::Enemy, Pose::Walk, self.body.anim.frame);
        (SpriteKey::new(ActorKind::Enemy, Pose::Walk, self.body.facing), frame)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub body: Body,
    pub health: u32,
    pub max_health: u32,
    /// Seconds until the boss may strike again.
    pub attack_cooldown: f32,
    pub attack_range: f32,
    /// Close enough to stop walking and strike.
    pub in_melee: bool,
    pub hit_flash: bool,
    pub hit_flash_timer: f32,
}

impl Boss {
    pub fn new(pos: Vec2, size: (f32, f32), tuning: &Tuning) -> Self {
        let mut body = Body::new(pos, size);
        body.vel.x = -tuning.boss_speed;
        body.facing = Facing::Left;
        Self {
            body,
            health: tuning.boss_max_health,
            max_health: tuning.boss_max_health,
            attack_cooldown: 0.0,
            attack_range: tuning.boss_attack_range,
            in_melee: false,
            hit_flash: false,
            hit_flash_timer: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn sprite(&self) -> (SpriteKey, usize) {
        let pose = if self.in_melee { Pose::Attack } else { Pose::Walk };
        let frame = animation::frame_index(ActorKind::Boss, pose, self.body.anim.frame);
        (SpriteKey::new(ActorKind::Boss, pose, self.body.facing), frame)
    }
}

// ── Level geometry & pickups ──────────────────────────────────────────────────

/// Static one-way platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Platform {
    pub rect: Aabb,
}

impl Platform {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { rect: Aabb::new(left, top, width, height) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collectible {
    pub pos: Vec2,
    pub collected: bool,
}

impl Collectible {
    pub const SIZE: f32 = 30.0;

    pub fn new(pos: Vec2) -> Self {
        Self { pos, collected: false }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.pos, Self::SIZE, Self::SIZE)
    }
}

// ── Encounter progress ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct EncounterProgress {
    /// Waves spawned so far (0 before the first).
    pub current_wave: u32,
    pub total_waves: u32,
    /// Seconds accumulated towards the next spawn.
    pub spawn_timer: f32,
    pub spawn_delay: f32,
    pub exit_locked: bool,
}

impl EncounterProgress {
    pub fn new(total_waves: u32, spawn_delay: f32) -> Self {
        Self {
            current_wave: 0,
            total_waves,
            spawn_timer: 0.0,
            spawn_delay,
            exit_locked: true,
        }
    }

    pub fn waves_remaining(&self) -> bool {
        self.current_wave < self.total_waves
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Everything one running game owns. Cloneable so update functions can
/// return a fresh copy without touching the original.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub mode: GameMode,
    pub variant: Variant,
    pub tuning: Tuning,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    /// Geometry of the active room, swapped wholesale on room change.
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub encounter: EncounterProgress,
    pub sound_enabled: bool,
    /// Input seen on the previous update, for edge detection.
    pub last_input: InputSnapshot,
    pub frame: u64,
}
