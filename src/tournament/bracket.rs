//! Single-elimination bracket
//!
//! Round 1 pairs the shuffled players in order. Later rounds start empty and
//! are filled as winners come through: match `k` of a round feeds match
//! `k / 2` of the next, first into `player1`, then `player2`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Player;
use crate::error::{Error, Result};
use crate::sim::Score;

/// One bracket slot pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Creation order, 0-based and unique across the bracket
    pub id: u32,
    /// 1-based round number
    pub round: u32,
    pub player1: Option<String>,
    pub player2: Option<String>,
    pub winner: Option<String>,
    pub score: Option<Score>,
}

impl Match {
    fn empty(id: u32, round: u32) -> Self {
        Self {
            id,
            round,
            player1: None,
            player2: None,
            winner: None,
            score: None,
        }
    }

    /// Both players known and no result yet
    pub fn is_playable(&self) -> bool {
        self.winner.is_none() && self.player1.is_some() && self.player2.is_some()
    }

    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    /// Name in the slot a player plays from
    pub fn player(&self, player: Player) -> Option<&str> {
        match player {
            Player::One => self.player1.as_deref(),
            Player::Two => self.player2.as_deref(),
        }
    }
}

/// What `record_match_result` did with the winner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Winner moved into a next-round match
    Advanced { winner: String, next_match_id: u32 },
    /// The final was played
    Champion { winner: String },
}

/// Whole tournament state, persisted as JSON between matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    /// Players in shuffled (bracket) order
    pub players: Vec<String>,
    /// All matches, round by round in creation order
    pub matches: Vec<Match>,
    /// Index of the match being played; refreshed after every result
    pub current_match_index: usize,
    pub is_finished: bool,
    pub champion: Option<String>,
}

/// Number of rounds for `players`, or an error unless it is a power of two >= 2
pub fn round_count(players: usize) -> Result<u32> {
    if players < 2 || !players.is_power_of_two() {
        return Err(Error::InvalidBracketSize { players });
    }
    Ok(players.trailing_zeros())
}

/// Build every match of the bracket for players already in bracket order.
///
/// Round 1 gets `n / 2` filled matches; each later round half as many empty ones.
pub fn generate_bracket(players: &[String]) -> Result<Vec<Match>> {
    let rounds = round_count(players.len())?;
    let mut matches = Vec::with_capacity(players.len() - 1);
    let mut next_id = 0u32;

    for pair in players.chunks_exact(2) {
        matches.push(Match {
            player1: Some(pair[0].clone()),
            player2: Some(pair[1].clone()),
            ..Match::empty(next_id, 1)
        });
        next_id += 1;
    }

    let mut matches_in_round = players.len() / 4;
    for round in 2..=rounds {
        for _ in 0..matches_in_round {
            matches.push(Match::empty(next_id, round));
            next_id += 1;
        }
        matches_in_round /= 2;
    }

    Ok(matches)
}

/// Uniform in-place shuffle, swapping from the end toward the start
fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

impl Tournament {
    /// Shuffle `players` and lay out the bracket
    pub fn create<R: Rng>(mut players: Vec<String>, rng: &mut R) -> Result<Self> {
        round_count(players.len())?;
        shuffle(&mut players, rng);
        let matches = generate_bracket(&players)?;

        log::info!(
            "Tournament created: {} players, {} matches",
            players.len(),
            matches.len()
        );

        Ok(Self {
            players,
            matches,
            current_match_index: 0,
            is_finished: false,
            champion: None,
        })
    }

    /// Total rounds in this bracket
    pub fn rounds(&self) -> u32 {
        self.players.len().max(1).trailing_zeros()
    }

    /// First playable match in creation order; `None` once finished
    pub fn current_match(&self) -> Option<&Match> {
        self.current_position().map(|i| &self.matches[i])
    }

    fn current_position(&self) -> Option<usize> {
        if self.is_finished {
            return None;
        }
        self.matches.iter().position(Match::is_playable)
    }

    /// Matches of one round in creation order
    pub fn matches_in_round(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Matches still waiting for a result
    pub fn remaining_matches(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_resolved()).count()
    }

    /// Resolve the current match and route its winner.
    ///
    /// `winner` names the slot (`player1` or `player2`) that won. Leaves the
    /// tournament untouched on error.
    pub fn record_match_result(&mut self, winner: Player, score: Score) -> Result<MatchOutcome> {
        if self.is_finished {
            log::warn!("Result recorded on a finished tournament; ignored");
            return Err(Error::TournamentFinished);
        }

        let Some(index) = self.current_position() else {
            log::warn!("No playable match in an unfinished tournament");
            return Err(Error::NoCurrentMatch);
        };

        let current = &self.matches[index];
        let Some(winner_name) = current.player(winner).map(str::to_owned) else {
            return Err(Error::NoCurrentMatch);
        };
        let match_id = current.id;
        let next = self.next_match_index(index)?;

        let current = &mut self.matches[index];
        current.winner = Some(winner_name.clone());
        current.score = Some(score);
        log::info!(
            "Match {} (round {}) won by {} {}-{}",
            match_id,
            current.round,
            winner_name,
            score.player1,
            score.player2
        );

        match next {
            Some(next_index) => {
                let next_match = &mut self.matches[next_index];
                if next_match.player1.is_none() {
                    next_match.player1 = Some(winner_name.clone());
                } else {
                    next_match.player2 = Some(winner_name.clone());
                }
                let next_match_id = next_match.id;
                self.current_match_index = self.current_position().unwrap_or(next_index);

                Ok(MatchOutcome::Advanced {
                    winner: winner_name,
                    next_match_id,
                })
            }
            None => {
                self.is_finished = true;
                self.champion = Some(winner_name.clone());
                log::info!("Tournament finished, champion: {}", winner_name);

                Ok(MatchOutcome::Champion {
                    winner: winner_name,
                })
            }
        }
    }

    /// Index of the match the winner of `matches[index]` moves into.
    ///
    /// `Ok(None)` when `matches[index]` is in the last round.
    fn next_match_index(&self, index: usize) -> Result<Option<usize>> {
        let current = &self.matches[index];
        let next_round = current.round + 1;
        if !self.matches.iter().any(|m| m.round == next_round) {
            return Ok(None);
        }

        let malformed = || {
            log::warn!("Bracket cannot route the winner of match {}", current.id);
            Error::MalformedBracket {
                match_id: current.id,
            }
        };

        let position = self
            .matches_in_round(current.round)
            .position(|m| m.id == current.id)
            .ok_or_else(malformed)?;

        let next_index = self
            .matches
            .iter()
            .enumerate()
            .filter(|(_, m)| m.round == next_round)
            .nth(position / 2)
            .map(|(i, _)| i)
            .ok_or_else(malformed)?;

        let target = &self.matches[next_index];
        if target.player1.is_some() && target.player2.is_some() {
            return Err(malformed());
        }

        Ok(Some(next_index))
    }

    /// Display name of the current round
    pub fn round_name(&self) -> String {
        let Some(current) = self.current_match() else {
            return "Finished".to_string();
        };

        let from_end = (self.rounds() + 1).saturating_sub(current.round);
        match from_end {
            1 => "Final".to_string(),
            2 => "Semi-finals".to_string(),
            3 => "Quarter-finals".to_string(),
            _ => format!("Round {}", current.round),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn names(n: usize) -> Vec<String> {
        ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P"]
            .iter()
            .take(n)
            .map(|s| s.to_string())
            .collect()
    }

    fn unshuffled(n: usize) -> Tournament {
        let players = names(n);
        Tournament {
            matches: generate_bracket(&players).unwrap(),
            players,
            current_match_index: 0,
            is_finished: false,
            champion: None,
        }
    }

    #[test]
    fn test_generate_bracket_four_players() {
        let matches = generate_bracket(&names(4)).unwrap();
        assert_eq!(matches.len(), 3);

        assert_eq!(matches[0].player1.as_deref(), Some("A"));
        assert_eq!(matches[0].player2.as_deref(), Some("B"));
        assert_eq!(matches[1].player1.as_deref(), Some("C"));
        assert_eq!(matches[1].player2.as_deref(), Some("D"));
        assert!(matches[..2].iter().all(|m| m.round == 1));

        assert_eq!(matches[2], Match::empty(2, 2));
    }

    #[test]
    fn test_generate_bracket_eight_players() {
        let matches = generate_bracket(&names(8)).unwrap();
        let rounds: Vec<u32> = matches.iter().map(|m| m.round).collect();
        assert_eq!(rounds, vec![1, 1, 1, 1, 2, 2, 3]);
        let ids: Vec<u32> = matches.iter().map(|m| m.id).collect();
        assert_eq!(ids, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_invalid_bracket_sizes() {
        for n in [0, 1, 3, 6, 12] {
            assert!(matches!(
                generate_bracket(&names(n)),
                Err(Error::InvalidBracketSize { players }) if players == n
            ));
        }
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(Tournament::create(names(6), &mut rng).is_err());
        assert!(generate_bracket(&names(2)).is_ok());
    }

    #[test]
    fn test_create_shuffles_deterministically() {
        let a = Tournament::create(names(8), &mut Pcg32::seed_from_u64(5)).unwrap();
        let b = Tournament::create(names(8), &mut Pcg32::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);

        let mut sorted = a.players.clone();
        sorted.sort();
        assert_eq!(sorted, names(8));
        assert!(!a.is_finished);
        assert_eq!(a.champion, None);
    }

    #[test]
    fn test_shuffle_reaches_every_first_slot() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let mut items = vec![0, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            seen.insert(items[0]);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_four_player_tournament_flow() {
        let mut t = unshuffled(4);
        assert_eq!(t.round_name(), "Semi-finals");
        assert_eq!(t.current_match().map(|m| m.id), Some(0));

        let outcome = t.record_match_result(Player::One, Score::new(1, 0)).unwrap();
        assert_eq!(
            outcome,
            MatchOutcome::Advanced {
                winner: "A".into(),
                next_match_id: 2
            }
        );
        assert_eq!(t.matches[2].player1.as_deref(), Some("A"));
        assert_eq!(t.current_match().map(|m| m.id), Some(1));
        assert_eq!(t.current_match_index, 1);

        t.record_match_result(Player::Two, Score::new(0, 1)).unwrap();
        assert_eq!(t.matches[2].player2.as_deref(), Some("D"));
        assert_eq!(t.round_name(), "Final");

        let outcome = t.record_match_result(Player::Two, Score::new(0, 1)).unwrap();
        assert_eq!(
            outcome,
            MatchOutcome::Champion {
                winner: "D".into()
            }
        );
        assert!(t.is_finished);
        assert_eq!(t.champion.as_deref(), Some("D"));
        assert!(t.current_match().is_none());
        assert_eq!(t.round_name(), "Finished");
        assert_eq!(t.matches[2].score, Some(Score::new(0, 1)));
    }

    #[test]
    fn test_eight_player_routing() {
        let mut t = unshuffled(8);
        assert_eq!(t.round_name(), "Quarter-finals");

        // Round 1 winners: A, D, E, H
        for winner in [Player::One, Player::Two, Player::One, Player::Two] {
            t.record_match_result(winner, Score::new(1, 0)).unwrap();
        }
        let semis: Vec<_> = t
            .matches_in_round(2)
            .map(|m| (m.player1.clone(), m.player2.clone()))
            .collect();
        assert_eq!(
            semis,
            vec![
                (Some("A".to_string()), Some("D".to_string())),
                (Some("E".to_string()), Some("H".to_string())),
            ]
        );
        assert_eq!(t.round_name(), "Semi-finals");

        t.record_match_result(Player::Two, Score::new(0, 1)).unwrap();
        t.record_match_result(Player::One, Score::new(1, 0)).unwrap();
        let last = t.matches.last().unwrap();
        assert_eq!(last.player1.as_deref(), Some("D"));
        assert_eq!(last.player2.as_deref(), Some("E"));

        t.record_match_result(Player::One, Score::new(1, 0)).unwrap();
        assert_eq!(t.champion.as_deref(), Some("D"));
    }

    #[test]
    fn test_record_after_finish_is_rejected() {
        let mut t = unshuffled(2);
        assert_eq!(t.round_name(), "Final");
        t.record_match_result(Player::One, Score::new(1, 0)).unwrap();
        let before = t.clone();

        assert!(matches!(
            t.record_match_result(Player::Two, Score::new(0, 1)),
            Err(Error::TournamentFinished)
        ));
        assert_eq!(t, before);
    }

    #[test]
    fn test_record_without_playable_match() {
        let mut t = unshuffled(4);
        // Hand-corrupted: nobody left to play but not finished
        for m in t.matches.iter_mut() {
            m.player2 = None;
        }
        let before = t.clone();
        assert!(matches!(
            t.record_match_result(Player::One, Score::new(1, 0)),
            Err(Error::NoCurrentMatch)
        ));
        assert_eq!(t, before);
        assert_eq!(t.round_name(), "Finished");
    }

    #[test]
    fn test_full_next_slot_is_malformed() {
        let mut t = unshuffled(4);
        t.matches[2].player1 = Some("X".into());
        t.matches[2].player2 = Some("Y".into());
        let before = t.clone();
        assert!(matches!(
            t.record_match_result(Player::One, Score::new(1, 0)),
            Err(Error::MalformedBracket { match_id: 0 })
        ));
        assert_eq!(t, before);
    }

    #[test]
    fn test_serialized_field_names() {
        let t = unshuffled(2);
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("currentMatchIndex").is_some());
        assert!(json.get("isFinished").is_some());
        assert_eq!(json["matches"][0]["player1"], "A");
        assert!(json["matches"][0]["winner"].is_null());

        let back: Tournament = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    proptest! {
        #[test]
        fn prop_bracket_always_produces_one_champion(
            exponent in 1u32..5,
            seed in any::<u64>(),
            picks in prop::collection::vec(any::<bool>(), 16),
        ) {
            let n = 1usize << exponent;
            let mut t = Tournament::create(names(n), &mut Pcg32::seed_from_u64(seed)).unwrap();
            prop_assert_eq!(t.matches.len(), n - 1);
            prop_assert_eq!(t.rounds(), exponent);

            let mut played = 0;
            while !t.is_finished {
                let before = t.remaining_matches();
                let winner = if picks[played] { Player::One } else { Player::Two };
                t.record_match_result(winner, Score::new(1, 0)).unwrap();
                prop_assert_eq!(t.remaining_matches(), before - 1);
                played += 1;
            }

            prop_assert_eq!(played, n - 1);
            let champion = t.champion.clone().unwrap();
            prop_assert!(t.players.contains(&champion));
            // Every name appears at most once per round
            for round in 1..=t.rounds() {
                let mut seen = std::collections::HashSet::new();
                for m in t.matches_in_round(round) {
                    for name in [&m.player1, &m.player2].into_iter().flatten() {
                        prop_assert!(seen.insert(name.clone()));
                    }
                }
            }
        }
    }
}
