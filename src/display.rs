//! Terminal renderer: draws the scene the core hands over with crossterm.
//!
//! World coordinates (800×600 by default) are scaled onto the terminal
//! grid. Row 0 holds the HUD, the last row the controls hint.

use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use blade_gauntlet::animation::{ActorKind, Pose, SpriteKey};
use blade_gauntlet::entities::{Facing, GameMode, Variant};
use blade_gauntlet::error::SinkError;
use blade_gauntlet::geometry::Aabb;
use blade_gauntlet::sinks::{ActorView, Hud, Look, RenderSink, SceneView};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_GROUND: Color = Color::DarkYellow;
const C_PLATFORM: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_INFO: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BOSS: Color = Color::Magenta;
const C_FLASH: Color = Color::Red;
const C_IMPACT: Color = Color::Yellow;
const C_EXIT_LOCKED: Color = Color::DarkRed;
const C_EXIT_OPEN: Color = Color::Green;
const C_PICKUP: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Smallest grid the play field still fits on.
const MIN_COLS: u16 = 40;
const MIN_ROWS: u16 = 12;

type Glyphs = HashMap<SpriteKey, &'static [&'static str]>;

/// Text sprites per `(actor, pose, facing)`. The boss has no attack art and
/// is drawn with the fallback block while striking.
fn glyph_table() -> Glyphs {
    use ActorKind::*;
    use Facing::*;
    use Pose::*;

    let entries: [(ActorKind, Pose, Facing, &'static [&'static str]); 12] = [
        (Player, Idle, Right, &["@▸"]),
        (Player, Idle, Left, &["◂@"]),
        (Player, Walk, Right, &["@▸", "@›"]),
        (Player, Walk, Left, &["◂@", "‹@"]),
        (Player, Attack, Right, &["@═"]),
        (Player, Attack, Left, &["═@"]),
        (Player, Impact, Right, &["✶"]),
        (Player, Impact, Left, &["✶"]),
        (Enemy, Walk, Right, &["e>", "e»"]),
        (Enemy, Walk, Left, &["<e", "«e"]),
        (Boss, Walk, Right, &["Ѫ>", "Ѫ»"]),
        (Boss, Walk, Left, &["<Ѫ", "«Ѫ"]),
    ];
    entries
        .into_iter()
        .map(|(actor, pose, facing, frames)| (SpriteKey::new(actor, pose, facing), frames))
        .collect()
}

fn actor_color(kind: ActorKind, pose: Pose) -> Color {
    match (kind, pose) {
        (ActorKind::Player, Pose::Impact) => C_IMPACT,
        (ActorKind::Player, _) => C_PLAYER,
        (ActorKind::Enemy, _) => C_ENEMY,
        (ActorKind::Boss, _) => C_BOSS,
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub struct TerminalRenderer<W: Write> {
    out: W,
    glyphs: Glyphs,
    cols: u16,
    rows: u16,
    /// Scale from world units to cells, per axis.
    scale: (f32, f32),
    too_small: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            glyphs: glyph_table(),
            cols: 0,
            rows: 0,
            scale: (1.0, 1.0),
            too_small: false,
        }
    }

    /// Terminal cell for a world position; column 0 and row 0 are taken by
    /// the border and the HUD.
    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let col = 1.0 + (x * self.scale.0).max(0.0);
        let row = 1.0 + (y * self.scale.1).max(0.0);
        (
            (col as u16).min(self.cols.saturating_sub(2)),
            (row as u16).min(self.rows.saturating_sub(2)),
        )
    }

    fn put(&mut self, col: u16, row: u16, color: Color, text: &str) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn put_centered(&mut self, row: u16, color: Color, text: &str) -> std::io::Result<()> {
        let col = (self.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
        self.put(col, row, color, text)
    }

    /// Fill the cells covered by `bounds` with `ch`.
    fn fill(&mut self, bounds: &Aabb, color: Color, ch: char) -> std::io::Result<()> {
        let (c0, r0) = self.cell(bounds.left, bounds.top);
        let (c1, r1) = self.cell(bounds.right(), bounds.bottom());
        let line: String = std::iter::repeat(ch).take((c1.saturating_sub(c0)).max(1) as usize).collect();
        for row in r0..=r1.max(r0) {
            self.put(c0, row, color, &line)?;
        }
        Ok(())
    }

    // ── Scene layers ─────────────────────────────────────────────────────────

    fn draw_border(&mut self) -> std::io::Result<()> {
        let w = self.cols as usize;
        let bottom = self.rows.saturating_sub(2);
        self.put(0, 1, C_BORDER, &format!("┌{}┐", "─".repeat(w.saturating_sub(2))))?;
        self.put(0, bottom, C_BORDER, &format!("└{}┘", "─".repeat(w.saturating_sub(2))))?;
        for row in 2..bottom {
            self.put(0, row, C_BORDER, "│")?;
            self.put(self.cols.saturating_sub(1), row, C_BORDER, "│")?;
        }
        Ok(())
    }

    fn draw_level(&mut self, scene: &SceneView) -> std::io::Result<()> {
        let (_, ground_row) = self.cell(0.0, scene.ground_y);
        let floor = "▔".repeat(self.cols.saturating_sub(2) as usize);
        self.put(1, ground_row, C_GROUND, &floor)?;

        for p in &scene.platforms {
            let top = Aabb::new(p.left, p.top, p.width, 0.0);
            self.fill(&top, C_PLATFORM, '▀')?;
        }
        for c in &scene.collectibles {
            let (col, row) = self.cell(c.center().x, c.center().y);
            self.put(col, row, C_PICKUP, "◆")?;
        }
        if let Some(exit) = scene.exit {
            let color = if exit.locked { C_EXIT_LOCKED } else { C_EXIT_OPEN };
            self.fill(&exit.bounds, color, if exit.locked { '▒' } else { '░' })?;
        }
        Ok(())
    }

    fn draw_hud(&mut self, scene: &SceneView) -> std::io::Result<()> {
        let hud: &Hud = &scene.hud;
        let hearts = format!("Lives:{}", "♥".repeat(hud.lives as usize));
        self.put(1, 0, C_HUD_LIVES, &hearts)?;

        let mut info = match scene.mode {
            GameMode::BossRoom => String::from("BOSS"),
            _ if scene.variant == Variant::Waves => format!(
                "Wave {}/{}  Enemies:{}  Exit:{}",
                hud.wave,
                hud.total_waves,
                hud.enemies_alive,
                if hud.exit_locked { "LOCKED" } else { "OPEN" }
            ),
            _ => format!("Enemies:{}", hud.enemies_alive),
        };
        if let (Some((health, max)), Some(filled)) = (hud.boss_health, hud.boss_bar_fill(10)) {
            let filled = filled as usize;
            info.push_str(&format!(
                "  [{}{}] {}/{}",
                "█".repeat(filled),
                "░".repeat(10 - filled),
                health,
                max
            ));
        }
        if hud.collectibles > 0 {
            info.push_str(&format!("  ◆{}", hud.collectibles));
        }
        self.put_centered(0, C_HUD_INFO, &info)?;

        let sound = if hud.sound_enabled { "♪ on" } else { "♪ off" };
        let col = self.cols.saturating_sub(sound.chars().count() as u16 + 1);
        self.put(col, 0, C_HINT, sound)?;
        Ok(())
    }

    fn draw_controls_hint(&mut self, mode: GameMode) -> std::io::Result<()> {
        let hint = match mode {
            GameMode::Menu => "ENTER : Start   M : Sound   Q : Quit",
            GameMode::Instructions => "ENTER : Play   Q : Quit",
            GameMode::Playing | GameMode::BossRoom => {
                "← → / A D : Move   SPACE / W : Jump   X : Attack   ESC : Menu"
            }
            GameMode::GameOver | GameMode::Victory => "ENTER : Menu   Q : Quit",
        };
        self.put(1, self.rows.saturating_sub(1), C_HINT, hint)
    }

    // ── Overlays ─────────────────────────────────────────────────────────────

    fn draw_box(&mut self, lines: &[(&str, Color)]) -> std::io::Result<()> {
        let start = (self.rows / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, (text, color)) in lines.iter().enumerate() {
            self.put_centered(start + i as u16, *color, text)?;
        }
        Ok(())
    }

    fn draw_overlay(&mut self, scene: &SceneView) -> std::io::Result<()> {
        match scene.mode {
            GameMode::Menu => {
                let variant = match scene.variant {
                    Variant::Waves => "Gauntlet: three waves and a boss",
                    Variant::Open => "Climb: reach the green ledge",
                };
                self.draw_box(&[
                    ("⚔  BLADE  GAUNTLET  ⚔", Color::Cyan),
                    ("", Color::Reset),
                    (variant, Color::White),
                    ("", Color::Reset),
                    ("Press ENTER to start", Color::Yellow),
                ])
            }
            GameMode::Instructions => self.draw_box(&[
                ("HOW TO PLAY", Color::Cyan),
                ("", Color::Reset),
                ("← → / A D      move", Color::White),
                ("SPACE / ↑ / W  jump", Color::White),
                ("X              swing your blade", Color::White),
                ("", Color::Reset),
                ("Clear every wave, then take the exit", Color::DarkGrey),
                ("on the right to face the boss.", Color::DarkGrey),
                ("", Color::Reset),
                ("Press ENTER to begin", Color::Yellow),
            ]),
            GameMode::GameOver => self.draw_box(&[
                ("╔════════════════════╗", Color::Red),
                ("║     GAME  OVER     ║", Color::Red),
                ("╚════════════════════╝", Color::Red),
                ("ENTER - Menu", Color::White),
            ]),
            GameMode::Victory => self.draw_box(&[
                ("╔════════════════════╗", Color::Green),
                ("║      VICTORY!      ║", Color::Green),
                ("╚════════════════════╝", Color::Green),
                ("ENTER - Menu", Color::White),
            ]),
            GameMode::Playing | GameMode::BossRoom => Ok(()),
        }
    }
}

impl<W: Write> RenderSink for TerminalRenderer<W> {
    fn has_sprite(&self, key: SpriteKey) -> bool {
        self.glyphs.contains_key(&key)
    }

    fn draw_scene(&mut self, scene: &SceneView) -> Result<(), SinkError> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.too_small = cols < MIN_COLS || rows < MIN_ROWS;
        if self.too_small {
            self.put(0, 0, Color::Red, "Terminal too small")?;
            return Err(SinkError::Backend(format!(
                "terminal is {cols}x{rows}, need at least {MIN_COLS}x{MIN_ROWS}"
            )));
        }

        // play field spans rows 1..rows-2 inside the border
        self.scale = (
            f32::from(cols.saturating_sub(2)) / scene.world.width.max(1.0),
            f32::from(rows.saturating_sub(3)) / scene.world.height.max(1.0),
        );

        self.draw_border()?;
        if scene.mode.is_active() || matches!(scene.mode, GameMode::GameOver | GameMode::Victory) {
            self.draw_level(scene)?;
            self.draw_hud(scene)?;
        }
        Ok(())
    }

    fn draw_actor(&mut self, actor: &ActorView, look: Look) -> Result<(), SinkError> {
        if self.too_small {
            return Ok(());
        }
        match look {
            Look::Sprite(key, frame) => {
                let frames = *self.glyphs.get(&key).ok_or(SinkError::MissingAsset(key))?;
                let text = frames[frame % frames.len()];
                let color = if actor.flashing { C_FLASH } else { actor_color(key.actor, key.pose) };
                let (col, row) = self.cell(actor.bounds.center().x, actor.bounds.center().y);
                self.put(col, row, color, text)?;
            }
            Look::Fallback(kind) => {
                let color = if actor.flashing { C_FLASH } else { actor_color(kind, Pose::Walk) };
                self.fill(&actor.bounds, color, '█')?;
            }
        }
        Ok(())
    }

    fn finish(&mut self, scene: &SceneView) -> Result<(), SinkError> {
        if !self.too_small {
            self.draw_overlay(scene)?;
            self.draw_controls_hint(scene.mode)?;
        }
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}
