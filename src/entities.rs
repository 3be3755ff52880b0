//! Board geometry and game entities: plain data with bounds-checked movement.
//!
//! Nothing in here knows about strategies, states or scoring; those live in
//! `compute`, `lizard` and `state`.

use std::fmt;

use crate::settings::SettingsError;

// ── Position ──────────────────────────────────────────────────────────────────

/// A cell on the board.  `y` grows downwards, like terminal rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn moved(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// One step closer to `target`, closing the X gap before the Y gap.
    pub fn step_towards(self, target: Position) -> Self {
        if self.x < target.x {
            self.moved(1, 0)
        } else if self.x > target.x {
            self.moved(-1, 0)
        } else if self.y < target.y {
            self.moved(0, 1)
        } else if self.y > target.y {
            self.moved(0, -1)
        } else {
            self
        }
    }

    /// One step away from `target`, X axis first.
    pub fn step_away_from(self, target: Position) -> Self {
        if self.x < target.x {
            self.moved(-1, 0)
        } else if self.x > target.x {
            self.moved(1, 0)
        } else if self.y < target.y {
            self.moved(0, -1)
        } else if self.y > target.y {
            self.moved(0, 1)
        } else {
            self
        }
    }

    /// Manhattan distance.
    pub fn distance_to(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Largest board side.  Keeps every cell addressable by the terminal renderer.
pub const MAX_BOARD_SIZE: i32 = 1000;

/// The playable rectangle `[0, width) × [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    width: i32,
    height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Result<Self, SettingsError> {
        let side = 1..=MAX_BOARD_SIZE;
        if !side.contains(&width) || !side.contains(&height) {
            return Err(SettingsError::InvalidBoardSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    pub fn clamp(&self, position: Position) -> Position {
        Position::new(
            position.x.clamp(0, self.width - 1),
            position.y.clamp(0, self.height - 1),
        )
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four real moves, in the order used whenever directions are ranked.
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }

    pub const fn apply_to(self, position: Position) -> Position {
        let (dx, dy) = self.delta();
        position.moved(dx, dy)
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The turtle, driven by the keyboard.
    Player,
    /// The crocodile.
    Enemy,
    Lizard,
    /// A dropped lizard tail.  Never moves.
    Tail,
}

impl EntityKind {
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Player => "turtle",
            EntityKind::Enemy => "crocodile",
            EntityKind::Lizard => "lizard",
            EntityKind::Tail => "tail",
        }
    }
}

/// Anything that occupies a cell.  Position changes only through
/// [`Entity::try_move`], which refuses to leave the bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    position: Position,
    bounds: Bounds,
    active: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Position, bounds: Bounds) -> Result<Self, SettingsError> {
        if !bounds.contains(position) {
            return Err(SettingsError::OutOfBounds {
                entity: kind.name(),
                position,
                bounds,
            });
        }
        Ok(Self {
            kind,
            position,
            bounds,
            active: true,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// False only for a tail that has been eaten.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Moves one cell.  Returns false and leaves the position untouched when
    /// the destination is outside the bounds.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        let next = direction.apply_to(self.position);
        if !self.bounds.contains(next) {
            return false;
        }
        self.position = next;
        true
    }

    pub fn collides_with(&self, other: &Entity) -> bool {
        self.position == other.position
    }

    pub fn distance_to(&self, other: &Entity) -> i32 {
        self.position.distance_to(other.position)
    }
}

// ── Session enums ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    Running,
    Paused,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    /// Both the turtle and the lizard were eaten.
    AllCaught,
    PlayerQuit,
    /// The configured tick limit was reached.
    TimeUp,
}

/// Final numbers handed to the game-over screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub final_score: u32,
    pub survival_ticks: u32,
    pub reason: GameOverReason,
    pub player_survived: bool,
    pub lizard_survived: bool,
}
