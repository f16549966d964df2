//! Single-elimination tournament
//!
//! Driven once per finished match, independent of the frame loop.

pub mod bracket;
pub mod registration;
pub mod storage;

pub use bracket::{Match, MatchOutcome, Tournament, generate_bracket, round_count};
pub use registration::{
    ALIASES_KEY, MAX_ALIAS_LEN, SUPPORTED_PLAYER_COUNTS, load_aliases, save_aliases,
    validate_aliases,
};
pub use storage::{CURRENT_TOURNAMENT_KEY, clear_tournament, load_tournament, save_tournament};
