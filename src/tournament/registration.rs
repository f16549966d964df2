//! Player alias registration
//!
//! Aliases are trimmed, must be non-empty, at most `MAX_ALIAS_LEN` characters
//! and unique (case-sensitive). Only 4- and 8-player tournaments can be set up.

use crate::error::{Error, Result};
use crate::persistence::{SessionStore, load_json, save_json};

/// Session key for the registered aliases
pub const ALIASES_KEY: &str = "tournamentAliases";

/// Longest alias accepted, in characters
pub const MAX_ALIAS_LEN: usize = 15;

/// Player counts the setup screen offers
pub const SUPPORTED_PLAYER_COUNTS: [usize; 2] = [4, 8];

/// Check a registration form and return the trimmed aliases in entry order
pub fn validate_aliases<S: AsRef<str>>(aliases: &[S]) -> Result<Vec<String>> {
    if !SUPPORTED_PLAYER_COUNTS.contains(&aliases.len()) {
        return Err(Error::InvalidBracketSize {
            players: aliases.len(),
        });
    }

    let mut accepted: Vec<String> = Vec::with_capacity(aliases.len());
    for (index, raw) in aliases.iter().enumerate() {
        let alias = raw.as_ref().trim();
        if alias.is_empty() {
            return Err(Error::InvalidAlias {
                index,
                reason: "alias is empty",
            });
        }
        if alias.chars().count() > MAX_ALIAS_LEN {
            return Err(Error::InvalidAlias {
                index,
                reason: "alias is longer than 15 characters",
            });
        }
        if accepted.iter().any(|a| a == alias) {
            return Err(Error::DuplicateAlias {
                alias: alias.to_string(),
            });
        }
        accepted.push(alias.to_string());
    }

    Ok(accepted)
}

pub fn save_aliases(store: &mut dyn SessionStore, aliases: &[String]) -> Result<()> {
    save_json(store, ALIASES_KEY, &aliases)
}

pub fn load_aliases(store: &dyn SessionStore) -> Result<Option<Vec<String>>> {
    load_json(store, ALIASES_KEY)
}
