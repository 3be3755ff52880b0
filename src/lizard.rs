//! The lizard: an NPC that wanders, flees the crocodile and, when cornered,
//! drops its tail as a decoy and sprints.

use rand::Rng;
use tracing::{debug, info};

use crate::compute::{self, MovementStrategy, TAIL_DROP_OFFSET};
use crate::entities::{Bounds, Direction, Entity, EntityKind, Position};
use crate::settings::SettingsError;

/// Ticks of double-speed running granted by a tail drop.
pub const SPEED_BOOST_DURATION: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LizardState {
    /// Crocodile far away; strolling at random.
    Wandering,
    /// Crocodile within flee distance.
    Fleeing,
    /// Tail is gone.  Never left once entered.
    TailDropped,
}

/// Next state given the distance to the crocodile.
///
/// From `Wandering` a close enough crocodile leads straight to
/// `TailDropped`, skipping `Fleeing`.
pub fn next_state(
    state: LizardState,
    distance: i32,
    has_tail: bool,
    flee_distance: i32,
    tail_drop_distance: i32,
) -> LizardState {
    match state {
        LizardState::Wandering if distance <= tail_drop_distance => LizardState::TailDropped,
        LizardState::Wandering if distance <= flee_distance => LizardState::Fleeing,
        LizardState::Wandering => LizardState::Wandering,
        LizardState::Fleeing if distance <= tail_drop_distance && has_tail => {
            LizardState::TailDropped
        }
        LizardState::Fleeing if distance > flee_distance => LizardState::Wandering,
        LizardState::Fleeing => LizardState::Fleeing,
        LizardState::TailDropped => LizardState::TailDropped,
    }
}

#[derive(Clone, Debug)]
pub struct Lizard {
    body: Entity,
    state: LizardState,
    flee_distance: i32,
    tail_drop_distance: i32,
    speed_boost_ticks: u32,
    dropped_tail: Option<Entity>,
}

impl Lizard {
    pub fn new(
        position: Position,
        bounds: Bounds,
        flee_distance: i32,
        tail_drop_distance: i32,
    ) -> Result<Self, SettingsError> {
        Ok(Self {
            body: Entity::new(EntityKind::Lizard, position, bounds)?,
            state: LizardState::Wandering,
            flee_distance,
            tail_drop_distance,
            speed_boost_ticks: 0,
            dropped_tail: None,
        })
    }

    pub fn entity(&self) -> &Entity {
        &self.body
    }

    pub fn position(&self) -> Position {
        self.body.position()
    }

    pub fn state(&self) -> LizardState {
        self.state
    }

    pub fn has_tail(&self) -> bool {
        self.state != LizardState::TailDropped
    }

    /// The tail left behind, eaten or not.
    pub fn dropped_tail(&self) -> Option<&Entity> {
        self.dropped_tail.as_ref()
    }

    /// The tail, only while it still distracts the crocodile.
    pub fn active_tail(&self) -> Option<&Entity> {
        self.dropped_tail.as_ref().filter(|tail| tail.is_active())
    }

    pub fn is_speed_boosted(&self) -> bool {
        self.speed_boost_ticks > 0
    }

    pub fn speed_boost_ticks(&self) -> u32 {
        self.speed_boost_ticks
    }

    /// One tick of behaviour: update the state from the crocodile's distance,
    /// then move according to the new state.
    pub fn act(&mut self, enemy: Position, rng: &mut impl Rng) {
        let distance = self.position().distance_to(enemy);
        self.update_state(distance, rng);

        match self.state {
            LizardState::Wandering => self.wander(rng),
            LizardState::Fleeing => self.flee(enemy, rng),
            LizardState::TailDropped => {
                self.flee(enemy, rng);
                if self.is_speed_boosted() {
                    self.flee(enemy, rng);
                }
            }
        }
    }

    /// Marks the dropped tail as eaten.  No-op without a tail.
    pub fn notify_tail_eaten(&mut self) {
        if let Some(tail) = self.dropped_tail.as_mut() {
            tail.deactivate();
        }
    }

    fn update_state(&mut self, distance: i32, rng: &mut impl Rng) {
        if self.state == LizardState::TailDropped {
            self.speed_boost_ticks = self.speed_boost_ticks.saturating_sub(1);
            return;
        }

        let next = next_state(
            self.state,
            distance,
            self.has_tail(),
            self.flee_distance,
            self.tail_drop_distance,
        );
        if next == self.state {
            return;
        }
        debug!(from = ?self.state, to = ?next, distance, "lizard state change");
        match next {
            LizardState::TailDropped => self.drop_tail(rng),
            other => self.state = other,
        }
    }

    fn drop_tail(&mut self, rng: &mut impl Rng) {
        if !self.has_tail() {
            return;
        }
        let bounds = self.body.bounds();
        let landing = compute::tail_drop_position(self.position(), TAIL_DROP_OFFSET, bounds, rng);

        // `landing` is either a contained candidate or clamped into bounds.
        match Entity::new(EntityKind::Tail, landing, bounds) {
            Ok(tail) => self.dropped_tail = Some(tail),
            Err(err) => debug!(%err, "tail landed off the board"),
        }
        self.state = LizardState::TailDropped;
        self.speed_boost_ticks = SPEED_BOOST_DURATION;
        info!(lizard = %self.position(), tail = %landing, "lizard dropped its tail");
    }

    fn wander(&mut self, rng: &mut impl Rng) {
        let preferred = MovementStrategy::Random.direction(self.position(), self.position(), rng);
        if self.body.try_move(preferred) {
            return;
        }
        for &alt in compute::perpendicular_fallbacks(preferred) {
            if self.body.try_move(alt) {
                return;
            }
        }
        // Narrow boards: the way back along the same axis may be the only one.
        for alt in Direction::CARDINAL {
            if self.body.try_move(alt) {
                return;
            }
        }
    }

    fn flee(&mut self, enemy: Position, rng: &mut impl Rng) {
        let preferred = MovementStrategy::Flee.direction(self.position(), enemy, rng);
        if preferred != Direction::None && self.body.try_move(preferred) {
            return;
        }
        let escapes = compute::rank_escape_directions(self.position(), enemy, self.body.bounds());
        for alt in escapes {
            if self.body.try_move(alt) {
                return;
            }
        }
    }
}
