mod display;
mod input;

use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{cursor, event, terminal, ExecutableCommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use lizard_chase::entities::GameOverSummary;
use lizard_chase::game_loop::{GameLoopService, SystemClock};
use lizard_chase::settings::{self, GameSettings};

use display::TerminalRenderer;
use input::KeyboardInput;

#[derive(Parser, Debug)]
#[command(name = "lizard_chase")]
#[command(about = "Keep the turtle away from the crocodile while the lizard fends for itself")]
struct Args {
    /// Board width in cells
    #[arg(long, default_value_t = settings::DEFAULT_BOARD_WIDTH)]
    width: i32,

    /// Board height in cells
    #[arg(long, default_value_t = settings::DEFAULT_BOARD_HEIGHT)]
    height: i32,

    /// Milliseconds between ticks
    #[arg(long, default_value_t = 200)]
    interval_ms: u64,

    /// Distance at which the lizard starts fleeing
    #[arg(long, default_value_t = settings::DEFAULT_FLEE_DISTANCE)]
    flee_distance: i32,

    /// Distance at which the lizard drops its tail
    #[arg(long, default_value_t = settings::DEFAULT_TAIL_DROP_DISTANCE)]
    tail_drop_distance: i32,

    /// Chance (0.0-1.0) that the crocodile moves on a given tick
    #[arg(long, default_value_t = 1.0)]
    enemy_speed: f64,

    /// End the game after this many ticks
    #[arg(long)]
    time_limit: Option<u32>,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the log file (defaults to the user cache directory)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn settings(&self) -> Result<GameSettings> {
        let mut builder = GameSettings::builder()
            .board_size(self.width, self.height)
            .update_interval(Duration::from_millis(self.interval_ms))
            .lizard_flee_distance(self.flee_distance)
            .lizard_tail_drop_distance(self.tail_drop_distance)
            .enemy_move_probability(self.enemy_speed);
        if let Some(ticks) = self.time_limit {
            builder = builder.time_limit(ticks);
        }
        if let Some(seed) = self.seed {
            builder = builder.seed(seed);
        }
        builder.build().context("invalid game settings")
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    // Fail on bad flags before touching the terminal.
    let settings = args.settings()?;

    let log_dir = args.log_dir.clone().unwrap_or_else(default_log_dir);
    let _guard = setup_logging(&log_dir)?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    let result = play(settings, &mut out);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    let summary = result?;
    println!(
        "Final score {} after {} ticks ({:?})",
        summary.final_score, summary.survival_ticks, summary.reason
    );
    Ok(())
}

fn play<W: Write>(settings: GameSettings, out: &mut W) -> Result<GameOverSummary> {
    let renderer = TerminalRenderer::new(&mut *out);
    let mut game =
        GameLoopService::from_settings(settings, renderer, KeyboardInput::new(), SystemClock)?;
    let summary = game.run().context("game loop failed")?;

    // Leave the game-over screen up until a key is pressed.
    loop {
        if let event::Event::Key(_) = event::read()? {
            break;
        }
    }
    Ok(summary)
}

/// Log to a file only; the terminal belongs to the game.
fn setup_logging(log_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, "lizard_chase.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("log file: {}/lizard_chase.log", log_dir.display());
    Ok(guard)
}

fn default_log_dir() -> PathBuf {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .unwrap_or_else(std::env::temp_dir);
    base.join("lizard_chase").join("logs")
}
