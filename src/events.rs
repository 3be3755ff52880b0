//! Game notifications and the listener list that delivers them.
//!
//! Listeners only ever see `&GameEvent`; they have no handle on the state
//! that produced it.

use std::fmt;

use crate::entities::{EntityKind, GameOverSummary, Position};

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// The session has started.
    Initialized,
    ScoreChanged { score: u32 },
    /// `prey` and the crocodile now share `position`.
    Collision {
        prey: EntityKind,
        position: Position,
        is_game_over: bool,
    },
    PlayerCaught { position: Position },
    LizardCaught { position: Position },
    TailDropped { tail: Position, lizard: Position },
    TailEaten { position: Position, tails_eaten: u32 },
    Paused,
    Resumed,
    GameOver(GameOverSummary),
    /// Emitted by the loop once the session is running.
    LoopStarted,
    /// Emitted by the loop after each world update.
    TickCompleted { tick: u32 },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Ordered list of listeners.  Delivery is synchronous and in subscription
/// order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed (or already removed).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, event: &GameEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn listeners_hear_events_in_subscription_order() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let first = Rc::clone(&heard);
        let a = bus.subscribe(move |_| first.borrow_mut().push("a"));
        let second = Rc::clone(&heard);
        bus.subscribe(move |_| second.borrow_mut().push("b"));
        assert_eq!(bus.listener_count(), 2);

        bus.emit(&GameEvent::Initialized);
        assert!(bus.unsubscribe(a));
        bus.emit(&GameEvent::Paused);

        assert_eq!(heard.borrow().as_slice(), &["a", "b", "b"]);
        assert_eq!(bus.listener_count(), 1);
    }
}
