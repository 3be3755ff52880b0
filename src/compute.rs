//! Pure movement logic.
//!
//! Every function here maps positions (and, where needed, an injected RNG) to
//! a direction or a position.  Nothing is mutated; callers apply the answer.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{Bounds, Direction, Position};

/// How far from the lizard a dropped tail lands.
pub const TAIL_DROP_OFFSET: i32 = 5;

// ── Strategies ────────────────────────────────────────────────────────────────

/// The movement strategies an entity can be driven by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementStrategy {
    /// Any of the four cardinal directions, uniformly.  Ignores the target.
    Random,
    /// Greedy approach to the target.
    Chase,
    /// Greedy retreat from the target.
    Flee,
}

impl MovementStrategy {
    pub fn direction(
        self,
        current: Position,
        target: Position,
        rng: &mut impl Rng,
    ) -> Direction {
        match self {
            MovementStrategy::Random => random_direction(rng),
            MovementStrategy::Chase => chase_direction(current, target),
            MovementStrategy::Flee => flee_direction(current, target),
        }
    }
}

pub fn random_direction(rng: &mut impl Rng) -> Direction {
    Direction::CARDINAL[rng.gen_range(0..Direction::CARDINAL.len())]
}

/// Step along the axis with the larger gap; ties go to X.
/// `None` when already on the target.
pub fn chase_direction(current: Position, target: Position) -> Direction {
    let dx = target.x - current.x;
    let dy = target.y - current.y;
    if dx == 0 && dy == 0 {
        return Direction::None;
    }

    let horizontal = if dx > 0 { Direction::Right } else { Direction::Left };
    let vertical = if dy > 0 { Direction::Down } else { Direction::Up };

    if dx.abs() >= dy.abs() {
        if dx != 0 {
            horizontal
        } else {
            vertical
        }
    } else if dy != 0 {
        vertical
    } else {
        horizontal
    }
}

/// Mirror image of [`chase_direction`]: same axis choice, opposite step.
pub fn flee_direction(current: Position, threat: Position) -> Direction {
    chase_direction(current, threat).opposite()
}

// ── Fallbacks ─────────────────────────────────────────────────────────────────

/// Directions to try when `preferred` is blocked by a wall.
pub fn perpendicular_fallbacks(preferred: Direction) -> &'static [Direction] {
    match preferred {
        Direction::Left | Direction::Right => &[Direction::Up, Direction::Down],
        Direction::Up | Direction::Down => &[Direction::Left, Direction::Right],
        Direction::None => &Direction::CARDINAL,
    }
}

/// Smallest clearance to any wall.  Larger means further from a corner.
pub fn space_score(position: Position, bounds: Bounds) -> i32 {
    let left = position.x;
    let right = bounds.width() - 1 - position.x;
    let top = position.y;
    let bottom = bounds.height() - 1 - position.y;
    left.min(right).min(top.min(bottom))
}

/// In-bounds escape moves, best first.
///
/// Each neighbour scores `distance from threat + space score`.  The sort is
/// stable, so equal scores keep the Up, Down, Left, Right order.
pub fn rank_escape_directions(
    current: Position,
    threat: Position,
    bounds: Bounds,
) -> Vec<Direction> {
    let mut scored: Vec<(Direction, i32)> = Direction::CARDINAL
        .iter()
        .filter_map(|&dir| {
            let next = dir.apply_to(current);
            bounds
                .contains(next)
                .then(|| (dir, next.distance_to(threat) + space_score(next, bounds)))
        })
        .collect();
    scored.sort_by_key(|&(_, score)| Reverse(score));
    scored.into_iter().map(|(dir, _)| dir).collect()
}

// ── Tail placement ────────────────────────────────────────────────────────────

/// Where a freshly dropped tail lands.
///
/// The eight compass offsets at `distance` are shuffled; the first one that
/// stays on the board wins.  If none does, the first shuffled candidate is
/// clamped onto the board.
pub fn tail_drop_position(
    origin: Position,
    distance: i32,
    bounds: Bounds,
    rng: &mut impl Rng,
) -> Position {
    let d = distance;
    let mut offsets = [
        (d, 0),
        (-d, 0),
        (0, d),
        (0, -d),
        (d, d),
        (-d, d),
        (d, -d),
        (-d, -d),
    ];
    offsets.shuffle(rng);

    offsets
        .iter()
        .map(|&(dx, dy)| origin.moved(dx, dy))
        .find(|&candidate| bounds.contains(candidate))
        .unwrap_or_else(|| {
            let (dx, dy) = offsets[0];
            bounds.clamp(origin.moved(dx, dy))
        })
}
