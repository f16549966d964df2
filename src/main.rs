//! Pong Bracket entry point
//!
//! Native: plays a headless 4-player tournament with computer paddles.
//! Web: sets up browser logging and reports any tournament in progress.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use pong_bracket::Settings;
    use pong_bracket::persistence::BrowserSessionStore;
    use pong_bracket::tournament::load_tournament;

    pub fn start() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Pong Bracket starting...");

        let Some(store) = BrowserSessionStore::open() else {
            log::warn!("sessionStorage unavailable; nothing to resume");
            return;
        };

        let settings = Settings::load(&store);
        if let Err(e) = settings.validate() {
            log::warn!("Stored settings rejected: {}", e);
        }

        match load_tournament(&store) {
            Ok(Some(tournament)) => log::info!(
                "Resuming tournament: {} ({} matches left)",
                tournament.round_name(),
                tournament.remaining_matches()
            ),
            Ok(None) => log::info!("No tournament in progress"),
            Err(e) => log::error!("Failed to load tournament: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web::start();
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use pong_bracket::persistence::MemoryStore;
    use pong_bracket::sim::{Ai, PaddleId, PhysicsSystem, Side};
    use pong_bracket::tournament::{
        Tournament, clear_tournament, load_tournament, save_aliases, save_tournament,
        validate_aliases,
    };
    use pong_bracket::{Error, GameMode, Player, Result, Score, Settings};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Fixed host frame time (60 Hz)
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up on a rally-forever match after this many seconds
    const MAX_MATCH_SECONDS: u32 = 600;

    const PLAYERS: [&str; 4] = ["Ada", "Brook", "Cyd", "Dana"];

    /// Play one match between two computer paddles.
    ///
    /// `None` when nobody won within `MAX_MATCH_SECONDS`.
    fn play_match(settings: &Settings, seed: u64) -> Option<(Player, Score)> {
        let mut system = PhysicsSystem::new(settings.clone(), GameMode::Tournament, seed);
        log::debug!("{} (seed {})", system.mode().description(), seed);
        let mut ais = [
            Ai::new(PaddleId::new(Side::Right, 0), system.settings(), seed.wrapping_add(1)),
            Ai::new(PaddleId::new(Side::Left, 0), system.settings(), seed.wrapping_add(2)),
        ];

        for _ in 0..MAX_MATCH_SECONDS * 60 {
            let (position, velocity) = (system.ball_position(), system.ball_velocity());
            let inputs: Vec<_> = ais
                .iter_mut()
                .filter_map(|ai| ai.control(system.arena(), position, velocity, FRAME_DT))
                .collect();
            system.apply_input(&inputs, FRAME_DT);

            let events = system.update(FRAME_DT);
            if let Some(goal) = events.goal {
                log::debug!(
                    "Goal for player {} ({}-{})",
                    goal.scorer.number(),
                    goal.score.player1,
                    goal.score.player2
                );
            }
            if let Some(winner) = system.winner() {
                return Some((winner, system.score()));
            }
        }

        None
    }

    pub fn run(seed: u64) -> Result<()> {
        let mut store = MemoryStore::new();
        let settings = Settings::load(&store);
        settings.validate()?;

        let aliases = validate_aliases(&PLAYERS)?;
        save_aliases(&mut store, &aliases)?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut tournament = Tournament::create(aliases, &mut rng)?;
        save_tournament(&mut store, &tournament)?;

        while let Some(current) = tournament.current_match() {
            let player1 = current.player1.clone().unwrap_or_default();
            let player2 = current.player2.clone().unwrap_or_default();
            log::info!("{}: {} vs {}", tournament.round_name(), player1, player2);

            let (winner, score) = match play_match(&settings, rng.random()) {
                Some(result) => result,
                None => {
                    let winner = if rng.random_bool(0.5) {
                        Player::One
                    } else {
                        Player::Two
                    };
                    log::warn!(
                        "{} vs {} timed out, player {} advances by coin toss",
                        player1,
                        player2,
                        winner.number()
                    );
                    (winner, Score::default())
                }
            };

            tournament.record_match_result(winner, score)?;
            save_tournament(&mut store, &tournament)?;

            // Continue from the stored copy, as a page reload would
            tournament = load_tournament(&store)?
                .ok_or_else(|| Error::Storage("tournament missing after save".to_string()))?;
        }

        match &tournament.champion {
            Some(champion) => println!("Champion: {}", champion),
            None => log::warn!("Tournament ended without a champion"),
        }

        clear_tournament(&mut store);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pong Bracket (native) starting...");

    let seed = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("usage: pong-bracket [seed]");
                std::process::exit(2);
            }
        },
        None => rand::random(),
    };
    log::info!("Seed: {}", seed);

    if let Err(e) = demo::run(seed) {
        log::error!("Tournament aborted: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
