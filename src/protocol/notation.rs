//! Text notation for game events.
//!
//! Each event becomes one protocol line:
//!
//! ```text
//! roles p0:colonialist p1:historian
//! order p1 p0 rolls 2 5
//! turn p1 round 1
//! rolled p1 4
//! moved p1 300,540 -> 415,504 steps 3 stop draw path orange
//! choice p0 537,302 566,273:purple 604,315:orange
//! chose p0 604,315 orange
//! card p1 orange Archive Funding Cut
//! exhausted p0 purple
//! resource p1 knowledge 0 -> -3
//! finished p0 rank 1
//! endturn p1
//! gameover round 12 order p0 p1
//! ```

use std::fmt::Write;

use crate::board::PlayerId;
use crate::game::GameEvent;

fn join_ids(ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats one event as a protocol line (without the trailing newline).
pub fn format_event(event: &GameEvent) -> String {
    match event {
        GameEvent::RolesAssigned { roles } => {
            let mut s = String::from("roles");
            for (id, role) in roles {
                let _ = write!(s, " {}:{}", id, role);
            }
            s
        }
        GameEvent::TurnOrderDecided { rotation, rolls } => {
            let mut s = format!("order {}", join_ids(rotation));
            if !rolls.is_empty() {
                s.push_str(" rolls");
                for r in rolls {
                    let _ = write!(s, " {}", r);
                }
            }
            s
        }
        GameEvent::TurnStarted { player, round } => format!("turn {} round {}", player, round),
        GameEvent::DieRolled { player, value } => format!("rolled {} {}", player, value),
        GameEvent::PlayerMoved {
            player,
            from,
            to,
            steps,
            stop,
            path,
        } => format!(
            "moved {} {} -> {} steps {} stop {} path {}",
            player, from, to, steps, stop, path
        ),
        GameEvent::ChoiceOffered {
            player,
            at,
            branches,
        } => {
            let mut s = format!("choice {} {}", player, at);
            for b in branches {
                let _ = write!(s, " {}:{}", b.coord, b.color);
            }
            s
        }
        GameEvent::BranchChosen {
            player,
            coord,
            color,
        } => format!("chose {} {} {}", player, coord, color),
        GameEvent::CardDrawn {
            player, deck, name, ..
        } => format!("card {} {} {}", player, deck, name),
        GameEvent::DeckExhausted { player, deck } => format!("exhausted {} {}", player, deck),
        GameEvent::ResourceChanged {
            player,
            kind,
            before,
            after,
        } => format!("resource {} {} {} -> {}", player, kind, before, after),
        GameEvent::PlayerFinished { player, rank } => format!("finished {} rank {}", player, rank),
        GameEvent::TurnEnded { player } => format!("endturn {}", player),
        GameEvent::GameOver {
            round,
            finish_order,
        } => {
            if finish_order.is_empty() {
                format!("gameover round {}", round)
            } else {
                format!("gameover round {} order {}", round, join_ids(finish_order))
            }
        }
    }
}
