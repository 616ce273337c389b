/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable `RenderSnapshot`.
/// The 800×600 logical viewport is scaled into whatever terminal area is
/// available inside the border.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_shooter::config::{ENEMY_PALETTE, HEIGHT, WIDTH};
use space_shooter::entities::{GameStatus, PowerUpKind, WaveKind};
use space_shooter::snapshot::{format_remaining, Hud, RenderSnapshot, Sprite, SpriteFlags, SpriteTag};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_HEALTH: Color = Color::Green;
const C_HUD_POWER: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_SHIELD: Color = Color::Blue;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_PENETRATING: Color = Color::Magenta;
const C_BULLET_ENEMY: Color = Color::Red;
const C_SPECIAL: Color = Color::Magenta;
const C_BOSS: Color = Color::DarkRed;
const C_BOSS_CORE: Color = Color::Yellow;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_BANNER: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_POWERUP_ACTIVE: Color = Color::Yellow;

/// Terminal area the logical viewport is mapped onto.
struct Viewport {
    cols: u16,
    rows: u16,
}

impl Viewport {
    /// Rows 0 (HUD), 1 (top border), rows-2 (bottom border), rows-1 (hint)
    /// are reserved; the playfield sits between the walls.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let inner_w = self.cols.saturating_sub(2) as f32;
        let inner_h = self.rows.saturating_sub(4) as f32;
        if !(0.0..WIDTH).contains(&x) || !(0.0..HEIGHT).contains(&y) {
            return None;
        }
        let col = 1 + (x / WIDTH * inner_w) as u16;
        let row = 2 + (y / HEIGHT * inner_h) as u16;
        Some((col, row))
    }

    fn center(&self) -> (u16, u16) {
        (self.cols / 2, self.rows / 2)
    }
}

fn enemy_color(index: u8) -> Color {
    let (r, g, b) = ENEMY_PALETTE[index as usize % ENEMY_PALETTE.len()];
    Color::Rgb { r, g, b }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &RenderSnapshot) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let view = Viewport { cols, rows };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match snap.status {
        GameStatus::Menu => draw_menu(out, &view)?,
        GameStatus::Playing => {
            draw_border(out, &view)?;
            draw_hud(out, &view, &snap.hud)?;
            for sprite in &snap.sprites {
                draw_sprite(out, &view, sprite)?;
            }
            draw_controls_hint(out, &view)?;
            if let Some(text) = &snap.banner {
                draw_centered(out, &view, 0, text, C_BANNER)?;
            } else if snap.paused {
                draw_centered(out, &view, 0, "PAUSED", C_BANNER)?;
                draw_centered(out, &view, 1, "P - Resume  M - Menu", C_HINT)?;
            }
        }
        GameStatus::GameOver => draw_game_over(out, &view, &snap.hud)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, hud: &Hud) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", hud.score)))?;

    let kind = match hud.wave_kind {
        WaveKind::Regular => "",
        WaveKind::Bonus => " BONUS",
        WaveKind::Boss => " BOSS",
    };
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("  Wave:{}{}", hud.wave, kind)))?;

    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("  HP:{:>3.0}%", hud.health_pct)))?;
    out.queue(style::SetForegroundColor(C_HUD_POWER))?;
    out.queue(Print(format!("  PWR:{:>3.0}%", hud.power_pct)))?;

    let mut tags = String::new();
    for (label, ticks) in [
        ("DBL", hud.double_shoot),
        ("PEN", hud.penetrating),
        ("SHD", hud.shield),
    ] {
        if ticks > 0 {
            tags.push_str(&format!("[{} {}] ", label, format_remaining(ticks)));
        }
    }
    if hud.god_mode {
        tags.push_str("[GOD] ");
    }
    let lives_str = format!("Lives:{}", "♥".repeat(hud.lives as usize));
    let right_len = (tags.chars().count() + lives_str.chars().count()) as u16;
    out.queue(cursor::MoveTo(view.cols.saturating_sub(right_len + 1), 0))?;
    if !tags.is_empty() {
        out.queue(style::SetForegroundColor(C_POWERUP_ACTIVE))?;
        out.queue(Print(&tags))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;
    Ok(())
}

// ── Sprites ───────────────────────────────────────────────────────────────────

fn sprite_glyph(sprite: &Sprite) -> (&'static str, Color) {
    let body = sprite.colors.map(|c| enemy_color(c.body));
    match sprite.tag {
        SpriteTag::Player if sprite.flags.contains(SpriteFlags::SHIELD) => ("(▲)", C_SHIELD),
        SpriteTag::Player if sprite.flags.contains(SpriteFlags::RESPAWN_GRACE) => ("▵", C_PLAYER),
        SpriteTag::Player => ("▲", C_PLAYER),
        SpriteTag::Bullet if sprite.flags.contains(SpriteFlags::PENETRATING) => {
            ("┃", C_BULLET_PENETRATING)
        }
        SpriteTag::Bullet => ("║", C_BULLET_PLAYER),
        SpriteTag::EnemyBullet if sprite.flags.contains(SpriteFlags::AIMED) => ("•", C_BULLET_ENEMY),
        SpriteTag::EnemyBullet => ("↓", C_BULLET_ENEMY),
        SpriteTag::Enemy => ("«▼»", body.unwrap_or(Color::Green)),
        SpriteTag::FlockEnemy if sprite.flags.contains(SpriteFlags::DETACHED) => {
            ("\\▼/", body.unwrap_or(Color::Green))
        }
        SpriteTag::FlockEnemy => ("<◆>", body.unwrap_or(Color::Green)),
        SpriteTag::SpecialEnemy => ("<═◎═>", C_SPECIAL),
        SpriteTag::Boss => ("╔══════╗", C_BOSS),
        SpriteTag::BossPart if sprite.flags.contains(SpriteFlags::DESTROYED) => ("░", C_HINT),
        SpriteTag::BossPart => ("▓▓", C_BOSS),
        SpriteTag::BossCore if sprite.flags.contains(SpriteFlags::CORE_EXPOSED) => {
            ("(◉)", C_BOSS_CORE)
        }
        SpriteTag::BossCore => ("[■]", C_BOSS),
        SpriteTag::PowerUp(PowerUpKind::DoubleShoot) => ("D", Color::Yellow),
        SpriteTag::PowerUp(PowerUpKind::Penetrating) => ("P", Color::Magenta),
        SpriteTag::PowerUp(PowerUpKind::Shield) => ("S", Color::Blue),
        SpriteTag::ExtraLife if sprite.flags.contains(SpriteFlags::COLLECTED) => ("+1", Color::Green),
        SpriteTag::ExtraLife => ("♥", Color::Green),
        SpriteTag::Explosion => ("✶", C_EXPLOSION),
    }
}

fn draw_sprite<W: Write>(out: &mut W, view: &Viewport, sprite: &Sprite) -> std::io::Result<()> {
    let (glyph, color) = sprite_glyph(sprite);
    // Glyphs are centred on the sprite's box.
    let cx = sprite.x + sprite.width / 2.0;
    let cy = sprite.y + sprite.height / 2.0;
    let Some((col, row)) = view.cell(cx, cy) else {
        return Ok(());
    };
    let half = glyph.chars().count() as u16 / 2;
    out.queue(cursor::MoveTo(col.saturating_sub(half).max(1), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Print `text` horizontally centred, `offset` rows below the middle.
fn draw_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    offset: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let (cx, cy) = view.center();
    let col = cx.saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, cy + offset))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let (cx, cy) = view.center();
    let title = "★  SPACE  SHOOTER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let lines: &[(&str, Color)] = &[
        ("SPACE - Start", Color::White),
        ("", Color::White),
        ("← → / A D : Move    SPACE : Shoot", C_HINT),
        ("P : Pause    M : Menu    G : God mode", C_HINT),
        ("0-9 : Jump to wave    Q : Quit", C_HINT),
        ("", Color::White),
        ("Power-ups:  D double shot   P penetrating   S shield", C_HINT),
    ];
    for (i, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(text.chars().count() as u16 / 2),
            cy.saturating_sub(3) + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, view: &Viewport, hud: &Hud) -> std::io::Result<()> {
    let box_lines: &[&str] = &[
        "╔════════════════════╗",
        "║    GAME  OVER      ║",
        "╚════════════════════╝",
    ];
    for (i, line) in box_lines.iter().enumerate() {
        draw_centered(out, view, i as u16, line, Color::Red)?;
    }
    let rows = box_lines.len() as u16;
    draw_centered(
        out,
        view,
        rows,
        &format!("Final Score: {:>6}", hud.score),
        Color::Yellow,
    )?;
    draw_centered(out, view, rows + 1, &format!("Reached wave {}", hud.wave), C_HINT)?;
    draw_centered(out, view, rows + 2, "R - Play Again  M - Menu  Q - Quit", Color::White)?;
    Ok(())
}
