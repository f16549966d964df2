//! Tournament persistence
//!
//! The bracket is saved after every mutation so a reload mid-tournament picks
//! up where it left off.

use super::bracket::Tournament;
use super::registration::ALIASES_KEY;
use crate::error::Result;
use crate::persistence::{SessionStore, load_json, save_json};

/// Session key for the bracket
pub const CURRENT_TOURNAMENT_KEY: &str = "currentTournament";

pub fn save_tournament(store: &mut dyn SessionStore, tournament: &Tournament) -> Result<()> {
    save_json(store, CURRENT_TOURNAMENT_KEY, tournament)
}

/// `Ok(None)` when no tournament is in progress
pub fn load_tournament(store: &dyn SessionStore) -> Result<Option<Tournament>> {
    load_json(store, CURRENT_TOURNAMENT_KEY)
}

/// Forget the bracket and the registered aliases
pub fn clear_tournament(store: &mut dyn SessionStore) {
    store.remove(CURRENT_TOURNAMENT_KEY);
    store.remove(ALIASES_KEY);
    log::info!("Tournament cleared");
}
