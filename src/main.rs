//! Crossroads -- a four-path board game engine speaking a line protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to see them.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crossroads::engine::Engine;
use crossroads::protocol::parser::{parse_command, Command};

/// Runs the protocol loop, reading commands from stdin and writing
/// responses to stdout.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut engine = match Engine::standard() {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "failed to load game content");
            return ExitCode::FAILURE;
        }
    };

    match run(&mut engine) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "i/o error");
            ExitCode::FAILURE
        }
    }
}

fn run(engine: &mut Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = line?;

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Crossroads => engine.handle_handshake(&mut out)?,
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => {
                engine.handle_setoption(&name, value.as_deref(), &mut out)?
            }
            Command::NewGame => engine.handle_newgame(&mut out)?,
            Command::Player { name, human, role } => {
                engine.handle_player(&name, human, role, &mut out)?
            }
            Command::Start => engine.handle_start(&mut out)?,
            Command::Roll { value } => engine.handle_roll(value, &mut out)?,
            Command::Choose { coord } => engine.handle_choose(coord, &mut out)?,
            Command::Ack => engine.handle_ack(&mut out)?,
            Command::EndTurn => engine.handle_endturn(&mut out)?,
            Command::Auto => engine.handle_auto(&mut out)?,
            Command::State => engine.handle_state(&mut out)?,
            Command::Quit => break,
        }
        out.flush()?;
    }
    out.flush()
}
