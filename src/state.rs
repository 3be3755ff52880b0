//! The session aggregate: every entity, the score, the phase and the
//! listeners that hear about changes.
//!
//! All mutation goes through methods here.  Once the phase is `Ended` every
//! mutating method is a no-op.

use rand::Rng;
use tracing::{debug, info};

use crate::compute::MovementStrategy;
use crate::entities::{
    Direction, Entity, EntityKind, GameOverReason, GameOverSummary, GamePhase, Position,
};
use crate::error::GameError;
use crate::events::{EventBus, GameEvent, SubscriptionId};
use crate::lizard::{Lizard, LizardState};
use crate::settings::{GameSettings, SettingsError};

// ── Read-only views ───────────────────────────────────────────────────────────

/// Where the crocodile is heading this tick, and why.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PursuitTarget {
    /// An uneaten tail beats any live prey.
    Tail(Position),
    Player(Position),
    Lizard(Position),
    /// Nothing left to chase; stay put.
    Hold(Position),
}

impl PursuitTarget {
    pub fn position(self) -> Position {
        match self {
            PursuitTarget::Tail(p)
            | PursuitTarget::Player(p)
            | PursuitTarget::Lizard(p)
            | PursuitTarget::Hold(p) => p,
        }
    }
}

/// Everything a renderer needs for one frame, copied out of the state.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderContext {
    pub player: Position,
    pub enemy: Position,
    pub lizard: Position,
    pub lizard_state: LizardState,
    pub lizard_speed_boosted: bool,
    /// Present only while the tail is uneaten.
    pub tail: Option<Position>,
    pub player_alive: bool,
    pub lizard_alive: bool,
    pub score: u32,
    pub tick_count: u32,
    pub board_width: i32,
    pub board_height: i32,
    pub tails_eaten: u32,
    pub phase: GamePhase,
}

// ── GameState ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct GameState {
    settings: GameSettings,
    player: Entity,
    enemy: Entity,
    lizard: Lizard,
    score: u32,
    tick_count: u32,
    tails_eaten: u32,
    phase: GamePhase,
    player_alive: bool,
    lizard_alive: bool,
    outcome: Option<GameOverSummary>,
    events: EventBus,
}

impl GameState {
    /// Places every entity at its configured starting cell.
    pub fn new(settings: GameSettings) -> Result<Self, SettingsError> {
        let board = settings.board();
        let player = Entity::new(EntityKind::Player, settings.player_position(), board)?;
        let enemy = Entity::new(EntityKind::Enemy, settings.enemy_position(), board)?;
        let lizard = Lizard::new(
            settings.lizard_position(),
            board,
            settings.lizard_flee_distance(),
            settings.lizard_tail_drop_distance(),
        )?;

        Ok(Self {
            settings,
            player,
            enemy,
            lizard,
            score: 0,
            tick_count: 0,
            tails_eaten: 0,
            phase: GamePhase::NotStarted,
            player_alive: true,
            lizard_alive: true,
            outcome: None,
            events: EventBus::new(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn enemy(&self) -> &Entity {
        &self.enemy
    }

    pub fn lizard(&self) -> &Lizard {
        &self.lizard
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn tails_eaten(&self) -> u32 {
        self.tails_eaten
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// True only while `Running`.
    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_player_alive(&self) -> bool {
        self.player_alive
    }

    pub fn is_lizard_alive(&self) -> bool {
        self.lizard_alive
    }

    /// Set once the session has ended.
    pub fn outcome(&self) -> Option<GameOverSummary> {
        self.outcome
    }

    pub fn snapshot(&self) -> RenderContext {
        let board = self.settings.board();
        RenderContext {
            player: self.player.position(),
            enemy: self.enemy.position(),
            lizard: self.lizard.position(),
            lizard_state: self.lizard.state(),
            lizard_speed_boosted: self.lizard.is_speed_boosted(),
            tail: self.lizard.active_tail().map(Entity::position),
            player_alive: self.player_alive,
            lizard_alive: self.lizard_alive,
            score: self.score,
            tick_count: self.tick_count,
            board_width: board.width(),
            board_height: board.height(),
            tails_eaten: self.tails_eaten,
            phase: self.phase,
        }
    }

    // ── Listeners ─────────────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.emit(&event);
    }

    // ── Phase control ─────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::NotStarted {
            return Err(GameError::AlreadyStarted { phase: self.phase });
        }

        self.score = 0;
        self.tick_count = 0;
        self.tails_eaten = 0;
        self.player_alive = true;
        self.lizard_alive = true;
        self.phase = GamePhase::Running;

        info!(board = %self.settings.board(), "game started");
        self.emit(GameEvent::Initialized);
        Ok(())
    }

    /// Advances the clock.  One tick survived is one point.
    pub fn tick(&mut self) {
        if !self.is_active() {
            return;
        }

        self.tick_count += 1;
        self.score += 1;
        self.emit(GameEvent::ScoreChanged { score: self.score });

        if let Some(limit) = self.settings.time_limit() {
            if self.tick_count >= limit {
                // Catches on the final tick still count.
                self.check_collisions();
                self.end_game(GameOverReason::TimeUp);
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::Paused;
        info!(tick = self.tick_count, "game paused");
        self.emit(GameEvent::Paused);
    }

    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.phase = GamePhase::Running;
        info!(tick = self.tick_count, "game resumed");
        self.emit(GameEvent::Resumed);
    }

    pub fn quit_by_player(&mut self) {
        self.end_game(GameOverReason::PlayerQuit);
    }

    fn end_game(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::Ended {
            return;
        }
        self.phase = GamePhase::Ended;

        let summary = GameOverSummary {
            final_score: self.score,
            survival_ticks: self.tick_count,
            reason,
            player_survived: self.player_alive,
            lizard_survived: self.lizard_alive,
        };
        self.outcome = Some(summary);
        info!(?reason, score = self.score, ticks = self.tick_count, "game over");
        self.emit(GameEvent::GameOver(summary));
    }

    // ── Movement ──────────────────────────────────────────────────────────────

    /// Keyboard move for the turtle.  False if blocked, dead or not running.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        if !self.is_active() || !self.player_alive {
            return false;
        }
        self.player.try_move(direction)
    }

    /// The turtle drifts at random when no key was pressed.
    pub fn player_default_move(&mut self, rng: &mut impl Rng) {
        if !self.is_active() || !self.player_alive {
            return;
        }
        let here = self.player.position();
        let direction = MovementStrategy::Random.direction(here, here, rng);
        self.player.try_move(direction);
    }

    pub fn lizard_act(&mut self, rng: &mut impl Rng) {
        if !self.is_active() || !self.lizard_alive {
            return;
        }
        self.lizard.act(self.enemy.position(), rng);
    }

    /// One chase step towards `target`, subject to the enemy move probability.
    /// Returns whether the crocodile actually moved.
    pub fn move_enemy_towards(&mut self, target: Position, rng: &mut impl Rng) -> bool {
        if !self.is_active() {
            return false;
        }
        let probability = self.settings.enemy_move_probability();
        if probability < 1.0 && !rng.gen_bool(probability) {
            return false;
        }

        let from = self.enemy.position();
        let direction = MovementStrategy::Chase.direction(from, target, rng);
        let moved = direction != Direction::None && self.enemy.try_move(direction);
        debug!(%from, %target, ?direction, moved, "crocodile step");
        moved
    }

    /// Target priority: an uneaten tail, then the nearer live prey (ties go
    /// to the turtle), then whichever prey is left, else hold position.
    pub fn pursuit_target(&self) -> PursuitTarget {
        if let Some(tail) = self.lizard.active_tail() {
            return PursuitTarget::Tail(tail.position());
        }

        match (self.player_alive, self.lizard_alive) {
            (true, true) => {
                let to_player = self.enemy.distance_to(&self.player);
                let to_lizard = self.enemy.distance_to(self.lizard.entity());
                if to_player <= to_lizard {
                    PursuitTarget::Player(self.player.position())
                } else {
                    PursuitTarget::Lizard(self.lizard.position())
                }
            }
            (true, false) => PursuitTarget::Player(self.player.position()),
            (false, true) => PursuitTarget::Lizard(self.lizard.position()),
            (false, false) => PursuitTarget::Hold(self.enemy.position()),
        }
    }

    // ── Collisions & tail ─────────────────────────────────────────────────────

    /// Resolves catches for this tick.  Returns true if anyone was caught.
    ///
    /// Turtle and lizard are checked independently, so both can be caught in
    /// one call.  An eaten tail never ends the game.
    pub fn check_collisions(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }

        let mut caught = false;
        let spot = self.enemy.position();

        if self.player_alive && self.player.collides_with(&self.enemy) {
            self.player_alive = false;
            caught = true;
            info!(position = %spot, "turtle caught");
            self.emit(GameEvent::Collision {
                prey: EntityKind::Player,
                position: spot,
                is_game_over: !self.lizard_alive,
            });
            self.emit(GameEvent::PlayerCaught { position: spot });
        }

        if self.lizard_alive && self.lizard.entity().collides_with(&self.enemy) {
            self.lizard_alive = false;
            caught = true;
            info!(position = %spot, "lizard caught");
            self.emit(GameEvent::Collision {
                prey: EntityKind::Lizard,
                position: spot,
                is_game_over: !self.player_alive,
            });
            self.emit(GameEvent::LizardCaught { position: spot });
        }

        if !self.player_alive && !self.lizard_alive {
            self.end_game(GameOverReason::AllCaught);
            return true;
        }

        let tail_hit = self
            .lizard
            .active_tail()
            .is_some_and(|tail| tail.collides_with(&self.enemy));
        if tail_hit {
            self.lizard.notify_tail_eaten();
            self.tails_eaten += 1;
            info!(position = %spot, tails_eaten = self.tails_eaten, "tail eaten");
            self.emit(GameEvent::TailEaten {
                position: spot,
                tails_eaten: self.tails_eaten,
            });
        }

        caught
    }

    /// Announces a tail the lizard has just dropped.
    pub fn notify_tail_dropped(&mut self) {
        if !self.is_active() {
            return;
        }
        if let Some(tail) = self.lizard.dropped_tail() {
            let event = GameEvent::TailDropped {
                tail: tail.position(),
                lizard: self.lizard.position(),
            };
            self.emit(event);
        }
    }
}
