//! Batch simulation of all-computer games.
//!
//! Plays many games in parallel on a rayon pool and records one
//! `GameRecord` per game. Every game gets its own seed derived from the
//! base seed, so a fixed base seed reproduces the whole batch regardless of
//! thread count.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::board::{Board, PlayerId, Resources, Role, ALL_ROLES, ROLE_COUNT};
use crate::cards::CardLibrary;
use crate::error::{ConfigError, GameError};
use crate::game::{Game, GameConfig};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{players} players requested, between 1 and {max} allowed")]
    PlayerCount { players: usize, max: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration for a simulation batch.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub games: usize,
    /// Computer players per game.
    pub players: usize,
    /// Base seed (0 = use entropy).
    pub seed: u64,
    /// Number of worker threads.
    pub threads: usize,
    /// Options for every game. Its seed is replaced per game.
    pub game: GameConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            games: 100,
            players: ROLE_COUNT,
            seed: 0,
            threads: 4,
            game: GameConfig::default(),
        }
    }
}

/// Final state of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub role: Role,
    pub resources: Resources,
    pub finished: bool,
    pub rank: Option<u32>,
}

/// A complete simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub seed: u64,
    pub rounds: u32,
    /// Turn actions taken, including acknowledgements and turn ends.
    pub actions: u32,
    /// Every player reached FINISH.
    pub completed: bool,
    pub finish_order: Vec<PlayerId>,
    pub players: Vec<PlayerRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Plays one all-computer game to the end.
pub fn play_game(
    board: &Arc<Board>,
    cards: &Arc<CardLibrary>,
    config: &GameConfig,
    players: usize,
    game_id: usize,
    seed: u64,
) -> GameRecord {
    let created = Game::new(
        board.clone(),
        cards.clone(),
        GameConfig {
            seed,
            ..config.clone()
        },
    );
    let mut game = match created {
        Ok(game) => game,
        Err(e) => {
            tracing::warn!(game_id, seed, error = %e, "game not created");
            return GameRecord {
                game_id,
                seed,
                rounds: 0,
                actions: 0,
                completed: false,
                finish_order: Vec::new(),
                players: Vec::new(),
                error: Some(e.to_string()),
            };
        }
    };

    let mut actions = 0u32;
    let result = setup(&mut game, players).and_then(|()| {
        while !game.is_over() {
            game.play_computer_action()?;
            actions += 1;
        }
        Ok(())
    });
    if let Err(e) = &result {
        tracing::warn!(game_id, seed, error = %e, "game aborted");
    }

    GameRecord {
        game_id,
        seed,
        rounds: game.round(),
        actions,
        completed: !game.players().is_empty() && game.players().iter().all(|p| p.finished),
        finish_order: game.finish_order().to_vec(),
        players: game
            .players()
            .iter()
            .map(|p| PlayerRecord {
                id: p.id,
                role: p.role,
                resources: p.resources,
                finished: p.finished,
                rank: p.rank,
            })
            .collect(),
        error: result.err().map(|e| e.to_string()),
    }
}

fn setup(game: &mut Game, players: usize) -> Result<(), GameError> {
    for i in 0..players {
        game.add_player(format!("bot{}", i), false, None)?;
    }
    game.assign_roles()?;
    game.determine_turn_order()?;
    game.begin()?;
    Ok(())
}

/// Derives per-game seeds. Seeds are never 0, which would mean entropy.
fn game_seeds(base: u64, games: usize) -> Vec<u64> {
    let mut rng = if base == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(base)
    };
    (0..games).map(|_| rng.gen_range(1..=u64::MAX)).collect()
}

/// Plays a batch of games in parallel. Records come back in game order.
pub fn run_simulation(
    board: Arc<Board>,
    cards: Arc<CardLibrary>,
    config: &SimulationConfig,
) -> Result<Vec<GameRecord>, SimulationError> {
    if config.players == 0 || config.players > ROLE_COUNT {
        return Err(SimulationError::PlayerCount {
            players: config.players,
            max: ROLE_COUNT,
        });
    }
    config.game.validate()?;
    let seeds = game_seeds(config.seed, config.games);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.max(1))
        .build()?;

    tracing::info!(
        games = config.games,
        players = config.players,
        threads = config.threads,
        "starting simulation"
    );

    let records = pool.install(|| {
        seeds
            .par_iter()
            .enumerate()
            .map(|(id, &seed)| play_game(&board, &cards, &config.game, config.players, id, seed))
            .collect()
    });
    Ok(records)
}

/// Writes one JSON object per line.
pub fn write_jsonl<W: Write>(records: &[GameRecord], out: &mut W) -> Result<(), SimulationError> {
    for record in records {
        serde_json::to_writer(&mut *out, record).map_err(std::io::Error::from)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub completed: usize,
    pub aborted: usize,
    pub mean_rounds: f64,
    /// First-place finishes per role, in `ALL_ROLES` order.
    pub wins: [usize; ROLE_COUNT],
}

impl Summary {
    pub fn from_records(records: &[GameRecord]) -> Summary {
        let mut s = Summary {
            games: records.len(),
            ..Summary::default()
        };
        let mut total_rounds = 0u64;
        for r in records {
            total_rounds += r.rounds as u64;
            if r.completed {
                s.completed += 1;
            }
            if r.error.is_some() {
                s.aborted += 1;
            }
            if let Some(winner) = r.players.iter().find(|p| p.rank == Some(1)) {
                s.wins[winner.role.index()] += 1;
            }
        }
        if !records.is_empty() {
            s.mean_rounds = total_rounds as f64 / records.len() as f64;
        }
        s
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Summary ===")?;
        writeln!(f, "Games: {}", self.games)?;
        writeln!(f, "Completed: {} (aborted {})", self.completed, self.aborted)?;
        writeln!(f, "Mean rounds: {:.1}", self.mean_rounds)?;
        for role in ALL_ROLES {
            let wins = self.wins[role.index()];
            let pct = if self.games > 0 {
                wins as f64 / self.games as f64 * 100.0
            } else {
                0.0
            };
            writeln!(f, "  {:<12} wins {:>5} ({:.1}%)", role.name(), wins, pct)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> (Arc<Board>, Arc<CardLibrary>) {
        (
            Arc::new(Board::standard().unwrap()),
            Arc::new(CardLibrary::standard().unwrap()),
        )
    }

    #[test]
    fn every_game_terminates() {
        let (board, cards) = content();
        let config = SimulationConfig {
            games: 8,
            seed: 12,
            threads: 2,
            ..SimulationConfig::default()
        };
        let records = run_simulation(board, cards, &config).unwrap();
        assert_eq!(records.len(), 8);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.game_id, i);
            assert!(r.completed, "game {} did not complete: {:?}", i, r.error);
            assert_eq!(r.finish_order.len(), 4);
            assert!(r.rounds >= 1);
        }
    }

    #[test]
    fn same_seed_same_output() {
        let (board, cards) = content();
        let config = SimulationConfig {
            games: 4,
            players: 3,
            seed: 77,
            threads: 3,
            ..SimulationConfig::default()
        };
        let render = |records: &[GameRecord]| {
            let mut buf = Vec::new();
            write_jsonl(records, &mut buf).unwrap();
            String::from_utf8(buf).unwrap()
        };
        let a = run_simulation(board.clone(), cards.clone(), &config).unwrap();
        let b = run_simulation(board, cards, &SimulationConfig { threads: 1, ..config }).unwrap();
        assert_eq!(render(&a), render(&b));
        assert_eq!(render(&a).lines().count(), 4);
    }

    #[test]
    fn round_limit_stops_games() {
        let (board, cards) = content();
        let record = play_game(
            &board,
            &cards,
            &GameConfig {
                max_rounds: Some(1),
                ..GameConfig::default()
            },
            2,
            0,
            9,
        );
        assert_eq!(record.rounds, 1);
        assert!(!record.completed);
        assert!(record.error.is_none());
    }

    #[test]
    fn rejects_bad_player_count() {
        let (board, cards) = content();
        let config = SimulationConfig {
            players: 5,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            run_simulation(board, cards, &config),
            Err(SimulationError::PlayerCount { players: 5, .. })
        ));
    }

    #[test]
    fn rejects_invalid_game_options() {
        let (board, cards) = content();
        let bad = GameConfig {
            die_sides: 0,
            ..GameConfig::default()
        };
        let config = SimulationConfig {
            games: 2,
            game: bad.clone(),
            ..SimulationConfig::default()
        };
        assert!(matches!(
            run_simulation(board.clone(), cards.clone(), &config),
            Err(SimulationError::Config(ConfigError::InvalidOption { .. }))
        ));

        let record = play_game(&board, &cards, &bad, 2, 0, 4);
        assert!(!record.completed);
        assert!(record.players.is_empty());
        assert!(record.error.is_some());
    }

    #[test]
    fn never_reshuffle_games_still_terminate() {
        let (board, cards) = content();
        let config = SimulationConfig {
            games: 6,
            seed: 31,
            threads: 2,
            game: GameConfig {
                reshuffle: crate::cards::ReshufflePolicy::Never,
                ..GameConfig::default()
            },
            ..SimulationConfig::default()
        };
        for r in run_simulation(board, cards, &config).unwrap() {
            assert!(r.completed, "game {} stuck: {:?}", r.game_id, r.error);
        }
    }

    #[test]
    fn jsonl_record_shape() {
        let (board, cards) = content();
        let record = play_game(&board, &cards, &GameConfig::default(), 2, 3, 5);
        let mut buf = Vec::new();
        write_jsonl(&[record], &mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["game_id"], 3);
        assert_eq!(value["seed"], 5);
        assert_eq!(value["players"].as_array().unwrap().len(), 2);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn summary_counts_wins_by_role() {
        let (board, cards) = content();
        let records: Vec<GameRecord> = (0..5)
            .map(|i| play_game(&board, &cards, &GameConfig::default(), 4, i, i as u64 + 1))
            .collect();
        let summary = Summary::from_records(&records);
        assert_eq!(summary.games, 5);
        assert_eq!(summary.wins.iter().sum::<usize>(), summary.completed);
        assert!(summary.to_string().contains("colonialist"));
    }
}
