//! Integration tests for the crossroads engine binary.
//!
//! Tests the full protocol session flow by spawning the engine process,
//! sending commands via stdin, and verifying stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the engine and collects stdout lines.
fn run_engine(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_crossroads");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start crossroads");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

/// Options that make a session reproducible.
const FIXED: [&str; 3] = [
    "setoption name Seed value 11",
    "setoption name TurnOrder value seating",
    "setoption name EndOfTurnEvents value false",
];

fn session(commands: &[&str]) -> Vec<String> {
    let mut all: Vec<&str> = FIXED.to_vec();
    all.extend_from_slice(commands);
    all.push("quit");
    run_engine(&all)
}

#[test]
fn handshake_with_protocol_version() {
    let lines = run_engine(&["crossroads", "quit"]);

    assert_eq!(lines[0], "id name crossroads");
    assert!(lines.iter().any(|l| l.starts_with("id version ")));
    assert!(lines.iter().any(|l| l == "protocol_version 1"));

    // crossroadsok closes the handshake
    assert_eq!(lines.last().map(String::as_str), Some("crossroadsok"));
    let proto_idx = lines.iter().position(|l| l == "protocol_version 1").unwrap();
    assert!(proto_idx < lines.len() - 1);
}

#[test]
fn handshake_includes_options() {
    let lines = run_engine(&["crossroads", "quit"]);
    let option_lines: Vec<&String> = lines.iter().filter(|l| l.starts_with("option ")).collect();
    assert_eq!(option_lines.len(), 9);
    for opt in &option_lines {
        assert!(opt.contains("type "), "option line missing type: {}", opt);
    }
}

#[test]
fn isready_response() {
    let lines = run_engine(&["isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn unknown_commands_are_ignored() {
    let lines = run_engine(&["frobnicate", "roll banana", "", "choose nowhere", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn eof_without_quit_exits_cleanly() {
    let lines = run_engine(&["isready"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn bad_option_reported_inline() {
    let lines = run_engine(&[
        "setoption name DieSides value zero",
        "setoption name Gravity value 3",
        "isready",
        "quit",
    ]);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("error "));
    assert_eq!(lines[1], "error unknown option 'Gravity'");
    assert_eq!(lines[2], "readyok");
}

#[test]
fn actions_before_game_are_errors() {
    let lines = session(&["roll", "ack", "state"]);
    assert_eq!(lines, vec!["error no game in progress"; 3]);
}

#[test]
fn human_turn_with_card_draw() {
    let lines = session(&["player Ana", "start", "roll 3", "roll 1", "ack", "endturn"]);

    assert_eq!(lines[0], "ok p0");
    assert_eq!(lines[1], "roles p0:colonialist");
    assert_eq!(lines[2], "order p0");
    assert_eq!(lines[3], "turn p0 round 1");
    assert_eq!(lines[4], "phase awaiting-roll");
    assert_eq!(lines[5], "rolled p0 3");
    assert!(lines[6].starts_with("moved p0 300,540 -> 375,464 steps 3 stop draw"));
    assert!(lines[7].starts_with("card p0 purple "));

    let ack_wait = lines
        .iter()
        .position(|l| l == "phase awaiting-card-ack")
        .expect("card acknowledgement pending");
    assert_eq!(lines[ack_wait + 1], "error cannot roll during awaiting-card-ack");
    assert_eq!(lines[ack_wait + 2], "phase turn-complete");
    assert_eq!(lines[ack_wait + 3], "endturn p0");
    assert_eq!(lines[ack_wait + 4], "turn p0 round 2");
    assert_eq!(lines[ack_wait + 5], "phase awaiting-roll");
}

#[test]
fn computer_game_runs_to_completion() {
    let mut commands = vec!["player Ana computer", "player Bob computer historian", "start"];
    commands.extend(std::iter::repeat("auto").take(400));
    commands.push("state");
    let lines = session(&commands);

    assert!(lines.contains(&"roles p0:colonialist p1:historian".to_string()));
    let over = lines
        .iter()
        .find(|l| l.starts_with("gameover "))
        .expect("game should end");
    assert!(over.contains(" order p"));
    assert!(lines.iter().any(|l| l == "finished p0 rank 1" || l == "finished p1 rank 1"));
    assert!(lines.iter().any(|l| l == "error cannot auto during game-over"));

    let state = lines.last().unwrap().strip_prefix("state ").unwrap();
    let value: serde_json::Value = serde_json::from_str(state).unwrap();
    assert_eq!(value["phase"], "game-over");
    assert_eq!(value["finish_order"].as_array().unwrap().len(), 2);
}

#[test]
fn role_conflicts_are_reported_at_start() {
    let lines = session(&["player Ana colonialist", "player Bob colonialist", "start"]);
    assert_eq!(lines[0], "ok p0");
    assert_eq!(lines[1], "ok p1");
    assert!(lines[2].starts_with("error "));
    assert!(lines[2].contains("colonialist"));
}

#[test]
fn newgame_resets_session() {
    let lines = session(&["player Ana", "start", "newgame", "player Bob", "state"]);
    let last = lines.last().unwrap();
    let value: serde_json::Value = serde_json::from_str(last.strip_prefix("state ").unwrap()).unwrap();
    assert_eq!(value["phase"], "setup");
    assert_eq!(value["players"].as_array().unwrap().len(), 1);
    assert_eq!(value["players"][0]["name"], "Bob");
}
