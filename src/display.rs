//! Terminal front end.  Draws a `RenderContext` snapshot with queued
//! crossterm commands and flushes once per frame.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use lizard_chase::entities::{GameOverReason, GameOverSummary, Position};
use lizard_chase::game_loop::GameRenderer;
use lizard_chase::lizard::LizardState;
use lizard_chase::state::RenderContext;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TITLE: Color = Color::Cyan;
const C_BORDER: Color = Color::DarkBlue;
const C_HUD_LABEL: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_PLAYER: Color = Color::Green;
const C_ENEMY: Color = Color::Red;
const C_LIZARD: Color = Color::Yellow;
const C_LIZARD_BOOSTED: Color = Color::Magenta;
const C_TAIL: Color = Color::DarkYellow;
const C_DEAD: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

const TITLE: &str = "Lizard Chase: run from the crocodile";

/// Board rows start below the title and the top border.
const BOARD_TOP: u16 = 2;
/// Every cell is two terminal columns wide so emoji line up.
const CELL_WIDTH: u16 = 2;

pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> GameRenderer for TerminalRenderer<W> {
    fn initialize(&mut self) -> io::Result<()> {
        self.out.execute(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    /// Render one complete frame.
    fn render(&mut self, ctx: &RenderContext) -> io::Result<()> {
        let out = &mut self.out;
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        draw_title(out)?;
        draw_border(out, ctx)?;
        draw_entities(out, ctx)?;
        let status_row = BOARD_TOP + ctx.board_height as u16 + 2;
        draw_status(out, ctx, status_row)?;
        draw_lizard_status(out, ctx, status_row + 1)?;
        draw_controls_hint(out, status_row + 3)?;

        // Park cursor in a harmless spot and flush
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, status_row + 5))?;
        out.flush()
    }

    fn render_game_over(&mut self, summary: &GameOverSummary) -> io::Result<()> {
        draw_game_over(&mut self.out, summary)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

// ── Frame pieces ──────────────────────────────────────────────────────────────

fn draw_title<W: Write>(out: &mut W) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(TITLE))?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, ctx: &RenderContext) -> io::Result<()> {
    let inner = ctx.board_width as usize * CELL_WIDTH as usize;
    let bottom = BOARD_TOP + ctx.board_height as u16;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, BOARD_TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;

    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for row in BOARD_TOP..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(1 + inner as u16, row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn cell<W: Write>(out: &mut W, at: Position, glyph: &str, color: Color) -> io::Result<()> {
    let col = 1 + at.x as u16 * CELL_WIDTH;
    let row = BOARD_TOP + at.y as u16;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Later draws win, so the crocodile goes last and covers whatever it is on.
fn draw_entities<W: Write>(out: &mut W, ctx: &RenderContext) -> io::Result<()> {
    if let Some(tail) = ctx.tail {
        cell(out, tail, "~~", C_TAIL)?;
    }
    if ctx.lizard_alive {
        if ctx.lizard_state == LizardState::TailDropped {
            out.queue(style::SetBackgroundColor(Color::DarkYellow))?;
        }
        let color = if ctx.lizard_speed_boosted {
            C_LIZARD_BOOSTED
        } else {
            C_LIZARD
        };
        cell(out, ctx.lizard, "🦎", color)?;
        out.queue(style::SetBackgroundColor(Color::Reset))?;
    }
    if ctx.player_alive {
        cell(out, ctx.player, "🐢", C_PLAYER)?;
    }
    cell(out, ctx.enemy, "🐊", C_ENEMY)?;
    Ok(())
}

/// Red when the crocodile is close, yellow at mid range, green otherwise.
fn distance_color(distance: i32) -> Color {
    match distance {
        d if d < 5 => Color::Red,
        d if d < 10 => Color::Yellow,
        _ => Color::Green,
    }
}

fn draw_status<W: Write>(out: &mut W, ctx: &RenderContext, row: u16) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
    out.queue(Print("Score: "))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("{:>6}", ctx.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
    out.queue(Print("  │  Turtle: "))?;

    if ctx.player_alive {
        let distance = ctx.player.distance_to(ctx.enemy);
        out.queue(style::SetForegroundColor(distance_color(distance)))?;
        out.queue(Print(format!("distance {:>3}", distance)))?;
    } else {
        out.queue(style::SetForegroundColor(C_DEAD))?;
        out.queue(Print("eaten"))?;
    }
    Ok(())
}

fn draw_lizard_status<W: Write>(out: &mut W, ctx: &RenderContext, row: u16) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
    out.queue(Print("Lizard: "))?;

    if ctx.lizard_alive {
        let (label, color) = match ctx.lizard_state {
            LizardState::Wandering => ("wandering", Color::Green),
            LizardState::Fleeing => ("fleeing", Color::Yellow),
            LizardState::TailDropped if ctx.lizard_speed_boosted => ("sprinting!", Color::Magenta),
            LizardState::TailDropped => ("tailless", Color::Magenta),
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(label))?;

        let distance = ctx.lizard.distance_to(ctx.enemy);
        out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
        out.queue(Print("  │  distance "))?;
        out.queue(style::SetForegroundColor(distance_color(distance)))?;
        out.queue(Print(format!("{:>3}", distance)))?;
    } else {
        out.queue(style::SetForegroundColor(C_DEAD))?;
        out.queue(Print("eaten"))?;
    }

    if ctx.tails_eaten > 0 {
        out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
        out.queue(Print("  │  "))?;
        out.queue(style::SetForegroundColor(C_TAIL))?;
        out.queue(Print(format!("tails eaten: {}", ctx.tails_eaten)))?;
    }
    Ok(())
}

// ── Controls hint ─────────────────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, row: u16) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("W A S D / arrows : Move   P : Pause   Q / Esc : Quit"))?;
    Ok(())
}

// ── Game-over screen ──────────────────────────────────────────────────────────

fn reason_line(summary: &GameOverSummary) -> &'static str {
    match summary.reason {
        GameOverReason::AllCaught => "The crocodile ate both the turtle and the lizard!",
        GameOverReason::PlayerQuit => "You left the game.",
        GameOverReason::TimeUp => match (summary.player_survived, summary.lizard_survived) {
            (true, true) => "Time is up. Both of you made it!",
            (true, false) => "Time is up. The turtle made it, the lizard did not.",
            (false, true) => "Time is up. The lizard made it, the turtle did not.",
            (false, false) => "Time is up. Nobody made it.",
        },
    }
}

fn rating(score: u32) -> (&'static str, Color) {
    match score {
        s if s >= 500 => ("Master", Color::Yellow),
        s if s >= 200 => ("Expert", Color::Cyan),
        s if s >= 100 => ("Advanced", Color::Green),
        s if s >= 50 => ("Intermediate", Color::White),
        _ => ("Beginner", Color::DarkGrey),
    }
}

fn draw_game_over<W: Write>(out: &mut W, summary: &GameOverSummary) -> io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let boxed: &[&str] = &[
        "╔════════════════════╗",
        "║     GAME  OVER     ║",
        "╚════════════════════╝",
    ];
    out.queue(style::SetForegroundColor(Color::Red))?;
    for (i, line) in boxed.iter().enumerate() {
        out.queue(cursor::MoveTo(2, 1 + i as u16))?;
        out.queue(Print(*line))?;
    }

    out.queue(cursor::MoveTo(2, 5))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(reason_line(summary)))?;

    out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
    out.queue(cursor::MoveTo(2, 7))?;
    out.queue(Print(format!("Final score:   {:>6}", summary.final_score)))?;
    out.queue(cursor::MoveTo(2, 8))?;
    out.queue(Print(format!("Survived:      {:>6} ticks", summary.survival_ticks)))?;

    let (label, color) = rating(summary.final_score);
    out.queue(cursor::MoveTo(2, 9))?;
    out.queue(Print("Rating:        "))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(label))?;

    out.queue(cursor::MoveTo(2, 11))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Press any key to exit"))?;

    out.queue(style::ResetColor)?;
    out.flush()
}
