//! A turtle and a lizard run from a crocodile on a small grid.
//!
//! The library holds the whole simulation; the `lizard_chase` binary only
//! adds a crossterm renderer and keyboard input on top of
//! [`game_loop::GameLoopService`].

pub mod compute;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod lizard;
pub mod settings;
pub mod state;
