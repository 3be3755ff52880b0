//! Immutable session settings and their validating builder.

use std::time::Duration;

use crate::entities::{Bounds, Position, MAX_BOARD_SIZE};

pub const DEFAULT_BOARD_WIDTH: i32 = 32;
pub const DEFAULT_BOARD_HEIGHT: i32 = 32;
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_FLEE_DISTANCE: i32 = 8;
pub const DEFAULT_TAIL_DROP_DISTANCE: i32 = 2;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("board size {width}x{height} must be within 1..={max} on both sides", max = MAX_BOARD_SIZE)]
    InvalidBoardSize { width: i32, height: i32 },

    #[error("{entity} position {position} lies outside the {bounds} board")]
    OutOfBounds {
        entity: &'static str,
        position: Position,
        bounds: Bounds,
    },

    #[error("enemy move probability {0} must be within 0.0..=1.0")]
    InvalidProbability(f64),

    #[error("{name} must be positive, got {value}")]
    InvalidDistance { name: &'static str, value: i32 },

    #[error("time limit must be at least one tick")]
    InvalidTimeLimit,
}

/// Everything needed to set up one session.  Only obtainable through
/// [`GameSettingsBuilder::build`], so every instance is valid.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    board: Bounds,
    player_position: Position,
    enemy_position: Position,
    lizard_position: Position,
    update_interval: Duration,
    enemy_move_probability: f64,
    lizard_flee_distance: i32,
    lizard_tail_drop_distance: i32,
    time_limit: Option<u32>,
    seed: Option<u64>,
}

impl GameSettings {
    pub fn builder() -> GameSettingsBuilder {
        GameSettingsBuilder::default()
    }

    pub fn board(&self) -> Bounds {
        self.board
    }

    pub fn player_position(&self) -> Position {
        self.player_position
    }

    pub fn enemy_position(&self) -> Position {
        self.enemy_position
    }

    pub fn lizard_position(&self) -> Position {
        self.lizard_position
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub fn enemy_move_probability(&self) -> f64 {
        self.enemy_move_probability
    }

    pub fn lizard_flee_distance(&self) -> i32 {
        self.lizard_flee_distance
    }

    pub fn lizard_tail_drop_distance(&self) -> i32 {
        self.lizard_tail_drop_distance
    }

    /// Ticks after which the session ends with `TimeUp`.
    pub fn time_limit(&self) -> Option<u32> {
        self.time_limit
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Collects raw values; all validation happens in [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct GameSettingsBuilder {
    board_width: i32,
    board_height: i32,
    player_position: Option<Position>,
    enemy_position: Option<Position>,
    lizard_position: Option<Position>,
    update_interval: Duration,
    enemy_move_probability: f64,
    lizard_flee_distance: i32,
    lizard_tail_drop_distance: i32,
    time_limit: Option<u32>,
    seed: Option<u64>,
}

impl Default for GameSettingsBuilder {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            player_position: None,
            enemy_position: None,
            lizard_position: None,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            enemy_move_probability: 1.0,
            lizard_flee_distance: DEFAULT_FLEE_DISTANCE,
            lizard_tail_drop_distance: DEFAULT_TAIL_DROP_DISTANCE,
            time_limit: None,
            seed: None,
        }
    }
}

impl GameSettingsBuilder {
    pub fn board_size(mut self, width: i32, height: i32) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    pub fn player_position(mut self, position: Position) -> Self {
        self.player_position = Some(position);
        self
    }

    pub fn enemy_position(mut self, position: Position) -> Self {
        self.enemy_position = Some(position);
        self
    }

    pub fn lizard_position(mut self, position: Position) -> Self {
        self.lizard_position = Some(position);
        self
    }

    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn enemy_move_probability(mut self, probability: f64) -> Self {
        self.enemy_move_probability = probability;
        self
    }

    pub fn lizard_flee_distance(mut self, distance: i32) -> Self {
        self.lizard_flee_distance = distance;
        self
    }

    pub fn lizard_tail_drop_distance(mut self, distance: i32) -> Self {
        self.lizard_tail_drop_distance = distance;
        self
    }

    pub fn time_limit(mut self, ticks: u32) -> Self {
        self.time_limit = Some(ticks);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<GameSettings, SettingsError> {
        let board = Bounds::new(self.board_width, self.board_height)?;

        // Unset positions fall back to a spread-out layout: the crocodile on
        // the left, the turtle on the right, the lizard low in the middle.
        let (w, h) = (self.board_width, self.board_height);
        let player_position = self
            .player_position
            .unwrap_or(Position::new(three_quarters(w), h / 2));
        let enemy_position = self.enemy_position.unwrap_or(Position::new(w / 4, h / 2));
        let lizard_position = self
            .lizard_position
            .unwrap_or(Position::new(w / 2, three_quarters(h)));

        check_position("turtle", player_position, board)?;
        check_position("crocodile", enemy_position, board)?;
        check_position("lizard", lizard_position, board)?;

        if !(0.0..=1.0).contains(&self.enemy_move_probability) {
            return Err(SettingsError::InvalidProbability(self.enemy_move_probability));
        }
        check_distance("flee distance", self.lizard_flee_distance)?;
        check_distance("tail drop distance", self.lizard_tail_drop_distance)?;
        if self.time_limit == Some(0) {
            return Err(SettingsError::InvalidTimeLimit);
        }

        Ok(GameSettings {
            board,
            player_position,
            enemy_position,
            lizard_position,
            update_interval: self.update_interval,
            enemy_move_probability: self.enemy_move_probability,
            lizard_flee_distance: self.lizard_flee_distance,
            lizard_tail_drop_distance: self.lizard_tail_drop_distance,
            time_limit: self.time_limit,
            seed: self.seed,
        })
    }
}

fn three_quarters(side: i32) -> i32 {
    side / 4 * 3 + side % 4 * 3 / 4
}

fn check_position(
    entity: &'static str,
    position: Position,
    bounds: Bounds,
) -> Result<(), SettingsError> {
    if bounds.contains(position) {
        Ok(())
    } else {
        Err(SettingsError::OutOfBounds {
            entity,
            position,
            bounds,
        })
    }
}

fn check_distance(name: &'static str, value: i32) -> Result<(), SettingsError> {
    if value > 0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidDistance { name, value })
    }
}
