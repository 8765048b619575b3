//! Error types for the dice engine.
//!
//! Only caller bugs and lobby/config misuse are errors. Game-rule refusals
//! (rolling past the limit, building something unaffordable) are not; the
//! command functions report those as `None`.

use thiserror::Error;

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A die face outside 1..=6.
    #[error("Invalid die face: {0}")]
    InvalidFace(u8),

    #[error("Die index {index} out of range for {len} dice")]
    DieIndexOutOfRange { index: usize, len: usize },

    #[error("Unknown build kind: {0}")]
    UnknownBuildKind(String),

    #[error("Unknown resource kind: {0}")]
    UnknownResource(String),

    /// Rules that would make the game unplayable.
    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    #[error("Failed to parse rules: {0}")]
    RulesParse(#[from] serde_json::Error),

    #[error("Lobby is full ({capacity} players)")]
    LobbyFull { capacity: usize },

    #[error("Lobby is closed")]
    LobbyClosed,

    #[error("Need at least {required} players to start, have {have}")]
    NotEnoughPlayers { required: usize, have: usize },

    #[error("Player id already taken: {0}")]
    DuplicatePlayer(String),
}
