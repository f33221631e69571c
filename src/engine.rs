//! Engine state management.
//!
//! Holds the loaded board and card content, the options for the next game,
//! and at most one game. Each `handle_*` method runs one protocol command
//! and writes its response lines; game errors become `error <message>`
//! lines and never end the session.

use std::io::{self, Write};
use std::sync::Arc;

use crate::board::{Board, Coord, Role};
use crate::cards::CardLibrary;
use crate::error::{ConfigError, GameError};
use crate::game::{ActionOutcome, Game, GameConfig, GameEvent, TracingObserver};
use crate::protocol::format_event;

/// Protocol version reported in the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    board: Arc<Board>,
    cards: Arc<CardLibrary>,
    /// Options applied to the next new game.
    pub config: GameConfig,
    game: Option<Game>,
}

impl Engine {
    /// Creates an engine with no game in progress.
    pub fn new(board: Arc<Board>, cards: Arc<CardLibrary>, config: GameConfig) -> Self {
        Engine {
            board,
            cards,
            config,
            game: None,
        }
    }

    /// An engine over the standard board and the embedded cards.
    pub fn standard() -> Result<Self, ConfigError> {
        Ok(Engine::new(
            Arc::new(Board::standard()?),
            Arc::new(CardLibrary::standard()?),
            GameConfig::default(),
        ))
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Discards any game in progress and opens a new one in setup.
    ///
    /// On invalid options the previous game is discarded all the same.
    pub fn new_game(&mut self) -> Result<(), GameError> {
        self.game = None;
        let mut game = Game::new(self.board.clone(), self.cards.clone(), self.config.clone())?;
        game.add_observer(Box::new(TracingObserver));
        tracing::info!(seed = self.config.seed, "new game");
        self.game = Some(game);
        Ok(())
    }

    pub fn handle_newgame<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.new_game() {
            Ok(()) => Ok(()),
            Err(e) => writeln!(out, "error {}", e),
        }
    }

    pub fn handle_handshake<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name crossroads")?;
        writeln!(out, "id version {}", env!("CARGO_PKG_VERSION"))?;
        for line in self.config.option_lines() {
            writeln!(out, "{}", line)?;
        }
        writeln!(out, "protocol_version {}", PROTOCOL_VERSION)?;
        writeln!(out, "crossroadsok")
    }

    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")
    }

    /// Sets an option for the next new game. Bad names or values are reported inline.
    pub fn handle_setoption<W: Write>(
        &mut self,
        name: &str,
        value: Option<&str>,
        out: &mut W,
    ) -> io::Result<()> {
        match self.config.set_option(name, value.unwrap_or("")) {
            Ok(()) => Ok(()),
            Err(e) => writeln!(out, "error {}", e),
        }
    }

    /// Seats a player, opening a new game first if none is in progress.
    pub fn handle_player<W: Write>(
        &mut self,
        name: &str,
        human: bool,
        role: Option<Role>,
        out: &mut W,
    ) -> io::Result<()> {
        if self.game.is_none() {
            if let Err(e) = self.new_game() {
                return writeln!(out, "error {}", e);
            }
        }
        let Some(game) = self.game.as_mut() else {
            return Ok(());
        };
        match game.add_player(name, human, role) {
            Ok(id) => writeln!(out, "ok {}", id),
            Err(e) => writeln!(out, "error {}", e),
        }
    }

    /// Assigns roles, decides the turn order and begins the first turn.
    pub fn handle_start<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(game) = self.game.as_mut() else {
            return writeln!(out, "error no game in progress");
        };
        let started = game.assign_roles().and_then(|roles| {
            let rotation = game.determine_turn_order()?;
            let first = game.begin()?;
            Ok((roles, rotation, first))
        });
        match started {
            Ok((roles, rotation, first)) => {
                writeln!(out, "{}", format_event(&GameEvent::RolesAssigned { roles }))?;
                writeln!(
                    out,
                    "{}",
                    format_event(&GameEvent::TurnOrderDecided {
                        rotation,
                        rolls: game.turn_order_rolls().to_vec(),
                    })
                )?;
                writeln!(
                    out,
                    "{}",
                    format_event(&GameEvent::TurnStarted {
                        player: first,
                        round: game.round(),
                    })
                )?;
                writeln!(out, "phase {}", game.phase())
            }
            Err(e) => writeln!(out, "error {}", e),
        }
    }

    pub fn handle_roll<W: Write>(&mut self, value: Option<u32>, out: &mut W) -> io::Result<()> {
        self.act(out, |g| match value {
            Some(v) => g.roll_die(v),
            None => g.roll(),
        })
    }

    pub fn handle_choose<W: Write>(&mut self, coord: Coord, out: &mut W) -> io::Result<()> {
        self.act(out, |g| g.resolve_choice(coord))
    }

    pub fn handle_ack<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.act(out, Game::acknowledge_card)
    }

    pub fn handle_endturn<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.act(out, Game::end_turn)
    }

    pub fn handle_auto<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.act(out, Game::play_computer_action)
    }

    /// Writes `state <json>` for the current game.
    pub fn handle_state<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.game {
            Some(game) => writeln!(out, "state {}", game.snapshot().to_json()),
            None => writeln!(out, "error no game in progress"),
        }
    }

    /// Runs a turn action and reports its events, or the error.
    fn act<W, F>(&mut self, out: &mut W, action: F) -> io::Result<()>
    where
        W: Write,
        F: FnOnce(&mut Game) -> Result<ActionOutcome, GameError>,
    {
        let Some(game) = self.game.as_mut() else {
            return writeln!(out, "error no game in progress");
        };
        match action(game) {
            Ok(outcome) => {
                for event in &outcome.events {
                    writeln!(out, "{}", format_event(event))?;
                }
                writeln!(out, "phase {}", outcome.phase)
            }
            Err(e) => {
                tracing::debug!(error = %e, "action rejected");
                writeln!(out, "error {}", e)
            }
        }
    }
}
