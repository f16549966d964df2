//! Crate error type
//!
//! The per-frame simulation never fails: missing paddles or a stationary ball
//! degrade to no-ops. Errors come from tournament bookkeeping, alias
//! registration, settings validation and persistence.

use std::fmt;

/// Top-level error enum
#[derive(Debug)]
pub enum Error {
    /// Bracket needs a power-of-two player count of at least 2
    InvalidBracketSize {
        players: usize,
    },

    /// A registered alias failed validation
    InvalidAlias {
        /// 0-based registration slot
        index: usize,
        reason: &'static str,
    },

    /// The same alias was registered twice
    DuplicateAlias {
        alias: String,
    },

    /// Result recorded on a tournament that already has a champion
    TournamentFinished,

    /// No match has both players and no winner, yet the tournament is not
    /// finished. Only reachable with a hand-edited or corrupted bracket.
    NoCurrentMatch,

    /// A result cannot be routed: the next-round slot is missing or full
    MalformedBracket {
        match_id: u32,
    },

    /// Backing key-value store rejected an operation
    Storage(String),

    /// JSON encode/decode failure
    Serialization(serde_json::Error),

    /// A setting is outside its usable range
    InvalidSetting {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBracketSize { players } => write!(
                f,
                "invalid bracket size: {} players (need a power of two, at least 2)",
                players
            ),
            Error::InvalidAlias { index, reason } => {
                write!(f, "player {} alias rejected: {}", index + 1, reason)
            }
            Error::DuplicateAlias { alias } => {
                write!(f, "alias \"{}\" is already registered", alias)
            }
            Error::TournamentFinished => write!(f, "tournament is already finished"),
            Error::NoCurrentMatch => {
                write!(f, "no playable match found in an unfinished tournament")
            }
            Error::MalformedBracket { match_id } => {
                write!(f, "winner of match {} has no free slot in the next round", match_id)
            }
            Error::Storage(msg) => write!(f, "storage error: {}", msg),
            Error::Serialization(e) => write!(f, "serialization error: {}", e),
            Error::InvalidSetting {
                name,
                value,
                reason,
            } => write!(f, "setting '{}' = {} rejected: {}", name, value, reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e)
    }
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, Error>;
