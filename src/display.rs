/// Rendering layer. All terminal I/O lives here.
///
/// The game core draws into a [`TerminalSink`], which rasterises shapes from
/// world units onto a grid of terminal cells. [`render`] then writes that
/// grid plus the border, HUD and overlays to the terminal. No game logic is
/// performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_debris::draw::{DrawSink, Rgb};
use space_debris::geometry::{Bounded, Bounds};
use space_debris::{GameController, GameState};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_HP: Color = Color::Red;
const C_HUD_INFO: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_PAUSED: Color = Color::Cyan;

/// Rows used by the HUD and border above the playfield.
const TOP_ROWS: u16 = 2;
/// Rows used by the border and hint line below the playfield.
const BOTTOM_ROWS: u16 = 2;

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

// ── Terminal draw sink ────────────────────────────────────────────────────────

/// Cell grid covering the playfield inside the border.
pub struct TerminalSink {
    cols: u16,
    rows: u16,
    scale_x: f32,
    scale_y: f32,
    cells: Vec<Option<Rgb>>,
}

impl TerminalSink {
    /// Size the grid for a terminal of `term_width` x `term_height` showing a
    /// world of `world_width` x `world_height` units.
    pub fn new(term_width: u16, term_height: u16, world_width: f32, world_height: f32) -> Self {
        let cols = term_width.saturating_sub(2).max(1);
        let rows = term_height.saturating_sub(TOP_ROWS + BOTTOM_ROWS).max(1);
        Self {
            cols,
            rows,
            scale_x: cols as f32 / world_width,
            scale_y: rows as f32 / world_height,
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn cell_range(lo: f32, hi: f32, scale: f32, len: u16) -> std::ops::Range<u16> {
        if hi < 0.0 {
            return 0..0;
        }
        let start = (lo * scale).floor().max(0.0);
        // Anything visible covers at least one cell.
        let end = (hi * scale).ceil().max(start + 1.0).min(len as f32);
        if start >= end {
            return 0..0;
        }
        start as u16..end as u16
    }
}

impl DrawSink for TerminalSink {
    fn fill(&mut self, shape: &Bounds, color: Rgb) {
        let xs = Self::cell_range(shape.left(), shape.right(), self.scale_x, self.cols);
        let ys = Self::cell_range(shape.top(), shape.bottom(), self.scale_y, self.rows);
        for row in ys {
            for col in xs.clone() {
                self.cells[row as usize * self.cols as usize + col as usize] = Some(color);
            }
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    sink: &TerminalSink,
    game: &GameController,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, game, width)?;
    draw_cells(out, sink)?;
    draw_controls_hint(out, height)?;

    if game.state() == GameState::Paused {
        draw_banner(out, width, height, "║  PAUSED  -  P to resume  ║", C_PAUSED)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in TOP_ROWS..height.saturating_sub(BOTTOM_ROWS) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, game: &GameController, width: u16) -> std::io::Result<()> {
    let max = game.config().max_hit_points;
    let hp = game.world_hit_points().unwrap_or(0);

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(format!(
        "World:{}{} {:>2}/{}",
        "█".repeat(hp as usize),
        "░".repeat(max.saturating_sub(hp) as usize),
        hp,
        max
    )))?;

    let info = format!("Round {}  Frame {:>6}", game.round(), game.frame());
    let ix = width.saturating_sub(info.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(ix, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_INFO))?;
    out.queue(Print(info))?;

    Ok(())
}

// ── Playfield ─────────────────────────────────────────────────────────────────

fn draw_cells<W: Write>(out: &mut W, sink: &TerminalSink) -> std::io::Result<()> {
    for row in 0..sink.rows {
        for col in 0..sink.cols {
            if let Some(rgb) = sink.cells[row as usize * sink.cols as usize + col as usize] {
                out.queue(cursor::MoveTo(col + 1, row + TOP_ROWS))?;
                out.queue(style::SetForegroundColor(to_color(rgb)))?;
                out.queue(Print("█"))?;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Shoot   P : Pause   R : Restart   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    msg: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, height / 2))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(msg))?;
    Ok(())
}
