//! Keyboard input.  Reads whatever crossterm has queued without blocking and
//! turns the first bound key into a `PlayerInput`.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lizard_chase::entities::Direction;
use lizard_chase::game_loop::{InputHandler, PlayerInput};
use tracing::warn;

#[derive(Debug, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputHandler for KeyboardInput {
    fn poll(&mut self) -> PlayerInput {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return PlayerInput::None,
                Err(err) => {
                    warn!(%err, "keyboard unavailable");
                    return PlayerInput::None;
                }
            }
            match event::read() {
                Ok(Event::Key(key)) => {
                    let input = map_key(&key);
                    if input != PlayerInput::None {
                        return input;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "keyboard read failed");
                    return PlayerInput::None;
                }
            }
        }
    }
}

/// Key bindings.  Releases and unbound keys map to `None`.
pub fn map_key(key: &KeyEvent) -> PlayerInput {
    if key.kind == KeyEventKind::Release {
        return PlayerInput::None;
    }
    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => PlayerInput::Move(Direction::Up),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
            PlayerInput::Move(Direction::Down)
        }
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
            PlayerInput::Move(Direction::Left)
        }
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
            PlayerInput::Move(Direction::Right)
        }
        KeyCode::Char('p') | KeyCode::Char('P') => PlayerInput::Pause,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => PlayerInput::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => PlayerInput::Quit,
        _ => PlayerInput::None,
    }
}
