//! Drives one session: render, read input, move the world, resolve catches,
//! wait.  Terminal I/O and timing sit behind the traits below so the loop
//! can run headless in tests.

use std::io;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::entities::{Direction, GameOverSummary, GamePhase};
use crate::error::GameError;
use crate::events::GameEvent;
use crate::settings::GameSettings;
use crate::state::{GameState, RenderContext};

// ── Seams ─────────────────────────────────────────────────────────────────────

pub trait GameRenderer {
    fn initialize(&mut self) -> io::Result<()>;
    fn render(&mut self, context: &RenderContext) -> io::Result<()>;
    fn render_game_over(&mut self, summary: &GameOverSummary) -> io::Result<()>;
    fn cleanup(&mut self) -> io::Result<()>;
}

/// What the keyboard asked for this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerInput {
    /// No key, or a key with no binding.
    None,
    Move(Direction),
    /// Toggles pause.
    Pause,
    Quit,
}

pub trait InputHandler {
    /// Must not block.  Unavailable input reads as [`PlayerInput::None`].
    fn poll(&mut self) -> PlayerInput;
}

pub trait GameClock {
    fn wait(&mut self, interval: Duration);
}

/// Real-time pacing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl GameClock for SystemClock {
    fn wait(&mut self, interval: Duration) {
        thread::sleep(interval);
    }
}

/// How the input of one tick was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    /// Nothing pressed; the turtle drifted on its own.
    Continue,
    Moved,
    Quit,
    Pause,
}

// ── Service ───────────────────────────────────────────────────────────────────

pub struct GameLoopService<R, I, C> {
    state: GameState,
    renderer: R,
    input: I,
    clock: C,
    rng: StdRng,
    had_tail_last_tick: bool,
}

impl<R, I, C> GameLoopService<R, I, C>
where
    R: GameRenderer,
    I: InputHandler,
    C: GameClock,
{
    /// Builds a fresh session from `settings`.  The RNG is seeded from the
    /// settings when a seed is given, otherwise from entropy.
    pub fn from_settings(
        settings: GameSettings,
        renderer: R,
        input: I,
        clock: C,
    ) -> Result<Self, GameError> {
        let rng = match settings.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = GameState::new(settings)?;
        Ok(Self::new(state, renderer, input, clock, rng))
    }

    pub fn new(state: GameState, renderer: R, input: I, clock: C, rng: StdRng) -> Self {
        let had_tail_last_tick = state.lizard().has_tail();
        Self {
            state,
            renderer,
            input,
            clock,
            rng,
            had_tail_last_tick,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Listener registration goes through the service once it owns the state.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Plays the session to the end and returns how it ended.
    ///
    /// The renderer is cleaned up even when starting or drawing fails.
    pub fn run(&mut self) -> Result<GameOverSummary, GameError> {
        if let Err(err) = self.begin() {
            let _ = self.renderer.cleanup();
            return Err(err);
        }
        let played = self.play();
        let cleaned = self.renderer.cleanup();
        let summary = played?;
        cleaned?;
        Ok(summary)
    }

    /// Initializes the renderer and starts the session.
    pub fn begin(&mut self) -> Result<(), GameError> {
        self.renderer.initialize()?;
        self.state.start()?;
        self.had_tail_last_tick = self.state.lizard().has_tail();
        info!(
            interval_ms = self.state.settings().update_interval().as_millis() as u64,
            "loop started"
        );
        self.state.emit(GameEvent::LoopStarted);
        Ok(())
    }

    fn play(&mut self) -> Result<GameOverSummary, GameError> {
        loop {
            if let Some(summary) = self.state.outcome() {
                self.renderer.render_game_over(&summary)?;
                return Ok(summary);
            }
            self.step()?;
        }
    }

    /// One loop iteration.  A paused session only renders, listens for
    /// resume or quit, and waits.
    pub fn step(&mut self) -> Result<(), GameError> {
        match self.state.phase() {
            GamePhase::Running => {
                self.render()?;
                self.process_input();
                self.update_world();
                self.check_game_conditions();
                self.wait_for_next_tick();
            }
            GamePhase::Paused => {
                self.render()?;
                match self.input.poll() {
                    PlayerInput::Pause => self.state.resume(),
                    PlayerInput::Quit => self.state.quit_by_player(),
                    PlayerInput::None | PlayerInput::Move(_) => {}
                }
                self.wait_for_next_tick();
            }
            GamePhase::NotStarted | GamePhase::Ended => {}
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let context = self.state.snapshot();
        self.renderer.render(&context)
    }

    /// A caught turtle can still quit, nothing else.
    pub fn process_input(&mut self) -> InputResult {
        let input = self.input.poll();

        if !self.state.is_player_alive() {
            if input == PlayerInput::Quit {
                self.state.quit_by_player();
                return InputResult::Quit;
            }
            return InputResult::Continue;
        }

        match input {
            PlayerInput::Quit => {
                self.state.quit_by_player();
                InputResult::Quit
            }
            PlayerInput::Pause => {
                self.state.pause();
                InputResult::Pause
            }
            PlayerInput::Move(direction) => {
                self.state.move_player(direction);
                InputResult::Moved
            }
            PlayerInput::None => {
                self.state.player_default_move(&mut self.rng);
                InputResult::Continue
            }
        }
    }

    /// Lizard acts, the crocodile steps towards its target, the clock ticks.
    pub fn update_world(&mut self) {
        if !self.state.is_active() {
            return;
        }

        if self.state.is_lizard_alive() {
            self.state.lizard_act(&mut self.rng);

            let has_tail = self.state.lizard().has_tail();
            if self.had_tail_last_tick && !has_tail {
                self.state.notify_tail_dropped();
            }
            self.had_tail_last_tick = has_tail;
        }

        let target = self.state.pursuit_target();
        debug!(?target, "crocodile target");
        self.state.move_enemy_towards(target.position(), &mut self.rng);

        self.state.tick();
        let tick = self.state.tick_count();
        self.state.emit(GameEvent::TickCompleted { tick });
    }

    fn check_game_conditions(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.state.check_collisions();
    }

    fn wait_for_next_tick(&mut self) {
        let interval = self.state.settings().update_interval();
        self.clock.wait(interval);
    }
}
