use crate::entities::GamePhase;
use crate::settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// `start` was called on a session that is not fresh.
    #[error("game already started (phase {phase:?})")]
    AlreadyStarted { phase: GamePhase },

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Renderer output failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
