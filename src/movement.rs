//! Movement resolver.
//!
//! Walks a player across the board graph one space per unit of budget.
//! Movement stops on arrival at a draw space, a choicepoint or FINISH, or
//! when the budget runs out, whichever happens first. Both entry points
//! work on a copy of the player and only write it back on success.

use std::fmt;

use serde::Serialize;

use crate::board::{Board, Coord, PathColor, Player, PlayerId, SpaceKind};
use crate::error::GameError;

/// Why a move stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    BudgetExhausted,
    DrawTriggered,
    ChoicepointReached,
    FinishReached,
}

impl StopReason {
    /// Short protocol name.
    pub const fn name(self) -> &'static str {
        match self {
            StopReason::BudgetExhausted => "budget",
            StopReason::DrawTriggered => "draw",
            StopReason::ChoicepointReached => "choice",
            StopReason::FinishReached => "finish",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A candidate successor of a choicepoint, tagged with the path it leads onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub coord: Coord,
    pub color: PathColor,
}

/// Result of one resolver call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub player: PlayerId,
    pub from: Coord,
    pub to: Coord,
    /// Spaces entered, in order.
    pub visited: Vec<Coord>,
    pub steps: u32,
    /// Budget left unused when the move stopped.
    pub remaining: u32,
    pub stop: StopReason,
    /// Candidate branches; empty unless the stop is `ChoicepointReached`.
    pub branches: Vec<Branch>,
    /// Committed path after the move.
    pub path: PathColor,
}

/// Advances `player` by up to `budget` spaces along their committed path.
pub fn advance(board: &Board, player: &mut Player, budget: u32) -> Result<MoveOutcome, GameError> {
    if player.finished || player.position == board.finish() {
        return Err(GameError::AlreadyFinished(player.id));
    }
    let mut moved = player.clone();
    let outcome = walk(board, &mut moved, budget)?;
    *player = moved;
    Ok(outcome)
}

/// Resolves a pending choicepoint decision and resumes with `remaining` budget.
///
/// With no budget left the branch is recorded on the player and taken as
/// the first step of their next move.
pub fn resolve_choice(
    board: &Board,
    player: &mut Player,
    chosen: Coord,
    remaining: u32,
) -> Result<MoveOutcome, GameError> {
    if player.finished {
        return Err(GameError::AlreadyFinished(player.id));
    }
    let here = board
        .space_at(player.position)
        .ok_or(GameError::UnknownSpace(player.position))?;
    if here.kind != SpaceKind::Choicepoint || !here.successors.contains(&chosen) {
        return Err(GameError::InvalidChoice(chosen));
    }
    let color = board
        .space_at(chosen)
        .and_then(|s| s.color)
        .ok_or(GameError::InvalidChoice(chosen))?;

    let mut moved = player.clone();
    moved.path = color;
    moved.branch = Some(chosen);
    let outcome = walk(board, &mut moved, remaining)?;
    *player = moved;
    Ok(outcome)
}

/// The colored candidates at a choicepoint, in successor order.
pub fn branches_at(board: &Board, coord: Coord) -> Vec<Branch> {
    let Some(space) = board.space_at(coord) else {
        return Vec::new();
    };
    if space.kind != SpaceKind::Choicepoint {
        return Vec::new();
    }
    space
        .successors
        .iter()
        .filter_map(|&c| {
            let color = board.space_at(c)?.color?;
            Some(Branch { coord: c, color })
        })
        .collect()
}

fn walk(board: &Board, player: &mut Player, budget: u32) -> Result<MoveOutcome, GameError> {
    let from = player.position;
    let mut visited = Vec::new();
    let mut remaining = budget;

    let stop = loop {
        let here = board
            .space_at(player.position)
            .ok_or(GameError::UnknownSpace(player.position))?;
        if remaining == 0 {
            break StopReason::BudgetExhausted;
        }
        let next = match here.kind {
            SpaceKind::Start => board.path_for(player.path).start(),
            SpaceKind::Regular | SpaceKind::Draw => here.successors[0],
            SpaceKind::Choicepoint => match player.branch.take() {
                Some(branch) => branch,
                None => break StopReason::ChoicepointReached,
            },
            SpaceKind::Finish => break StopReason::FinishReached,
        };

        let entered = board.space_at(next).ok_or(GameError::UnknownSpace(next))?;
        player.position = next;
        if let Some(color) = entered.color {
            player.path = color;
        }
        remaining -= 1;
        visited.push(next);

        match entered.kind {
            SpaceKind::Finish => break StopReason::FinishReached,
            SpaceKind::Draw => break StopReason::DrawTriggered,
            SpaceKind::Choicepoint => break StopReason::ChoicepointReached,
            SpaceKind::Regular | SpaceKind::Start => {}
        }
    };

    let branches = if stop == StopReason::ChoicepointReached {
        branches_at(board, player.position)
    } else {
        Vec::new()
    };

    tracing::trace!(
        player = %player.id,
        from = %from,
        to = %player.position,
        steps = visited.len(),
        stop = %stop,
        "walked"
    );

    Ok(MoveOutcome {
        player: player.id,
        from,
        to: player.position,
        steps: visited.len() as u32,
        visited,
        remaining,
        stop,
        branches,
        path: player.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::{path_spaces, FINISH, START};
    use crate::board::Role;

    fn board() -> Board {
        Board::standard().unwrap()
    }

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn purple_at(i: usize) -> Player {
        let mut p = Player::new(PlayerId(0), "P", Role::Colonialist, START, true);
        if i != usize::MAX {
            p.position = path_spaces(PathColor::Purple)[i].0;
        }
        p
    }

    #[test]
    fn zero_budget_is_a_no_op() {
        let b = board();
        let mut p = purple_at(3);
        let before = p.clone();
        let out = advance(&b, &mut p, 0).unwrap();
        assert_eq!(out.stop, StopReason::BudgetExhausted);
        assert_eq!(out.to, out.from);
        assert_eq!(out.steps, 0);
        assert_eq!(p, before);
    }

    #[test]
    fn leaves_start_on_committed_path() {
        let b = board();
        let mut p = Player::new(PlayerId(3), "I", Role::Investor, START, false);
        let out = advance(&b, &mut p, 1).unwrap();
        assert_eq!(out.to, c(441, 638));
        assert_eq!(out.path, PathColor::Blue);
        assert_eq!(out.stop, StopReason::BudgetExhausted);
    }

    #[test]
    fn draw_stops_on_arrival_and_reports_remainder() {
        let b = board();
        let mut p = purple_at(usize::MAX);
        let out = advance(&b, &mut p, 5).unwrap();
        assert_eq!(out.stop, StopReason::DrawTriggered);
        assert_eq!(out.to, c(375, 464));
        assert_eq!(out.visited, vec![c(321, 518), c(348, 491), c(375, 464)]);
        assert_eq!(out.steps, 3);
        assert_eq!(out.remaining, 2);
        assert_eq!(p.position, c(375, 464));
    }

    #[test]
    fn exact_budget_onto_choicepoint_offers_branches() {
        let b = board();
        let mut p = purple_at(7);
        let out = advance(&b, &mut p, 1).unwrap();
        assert_eq!(out.stop, StopReason::ChoicepointReached);
        assert_eq!(out.remaining, 0);
        assert_eq!(
            out.branches,
            vec![
                Branch {
                    coord: c(566, 273),
                    color: PathColor::Purple
                },
                Branch {
                    coord: c(604, 315),
                    color: PathColor::Orange
                }
            ]
        );
    }

    #[test]
    fn choicepoint_stops_mid_budget() {
        let b = board();
        let mut p = purple_at(6);
        let out = advance(&b, &mut p, 6).unwrap();
        assert_eq!(out.stop, StopReason::ChoicepointReached);
        assert_eq!(out.to, c(537, 302));
        assert_eq!(out.steps, 2);
        assert_eq!(out.remaining, 4);
    }

    #[test]
    fn standing_on_choicepoint_without_branch_does_not_move() {
        let b = board();
        let mut p = purple_at(8);
        let out = advance(&b, &mut p, 3).unwrap();
        assert_eq!(out.stop, StopReason::ChoicepointReached);
        assert_eq!(out.steps, 0);
        assert_eq!(out.remaining, 3);
        assert_eq!(out.branches.len(), 2);
    }

    #[test]
    fn overshoot_stops_at_finish() {
        let b = board();
        let mut p = purple_at(13);
        let out = advance(&b, &mut p, 4).unwrap();
        assert_eq!(out.stop, StopReason::FinishReached);
        assert_eq!(out.to, FINISH);
        assert_eq!(out.steps, 1);
        assert_eq!(out.remaining, 3);
    }

    #[test]
    fn finished_player_cannot_move() {
        let b = board();
        let mut p = purple_at(13);
        p.position = FINISH;
        assert_eq!(advance(&b, &mut p, 2), Err(GameError::AlreadyFinished(PlayerId(0))));

        let mut q = purple_at(2);
        q.finished = true;
        assert_eq!(advance(&b, &mut q, 2), Err(GameError::AlreadyFinished(PlayerId(0))));
    }

    #[test]
    fn choosing_the_same_color_continues_toward_589_246() {
        let b = board();
        let mut p = purple_at(8);
        let out = resolve_choice(&b, &mut p, c(566, 273), 2).unwrap();
        assert_eq!(out.visited, vec![c(566, 273), c(589, 246)]);
        assert_eq!(out.path, PathColor::Purple);
        assert_eq!(p.position, c(589, 246));
        assert_eq!(p.branch, None);
    }

    #[test]
    fn choosing_a_crossing_switches_path() {
        let b = board();
        let mut p = purple_at(8);
        let out = resolve_choice(&b, &mut p, c(604, 315), 2).unwrap();
        assert_eq!(p.path, PathColor::Orange);
        assert_eq!(out.to, c(631, 288));
        assert_eq!(out.stop, StopReason::ChoicepointReached);
    }

    #[test]
    fn invalid_choice_leaves_player_unchanged() {
        let b = board();
        let mut p = purple_at(8);
        let before = p.clone();
        assert_eq!(
            resolve_choice(&b, &mut p, c(589, 246), 3),
            Err(GameError::InvalidChoice(c(589, 246)))
        );
        assert_eq!(p, before);

        let mut q = purple_at(4);
        let before = q.clone();
        assert_eq!(
            resolve_choice(&b, &mut q, c(456, 383), 3),
            Err(GameError::InvalidChoice(c(456, 383)))
        );
        assert_eq!(q, before);
    }

    #[test]
    fn choice_without_budget_is_taken_next_move() {
        let b = board();
        let mut p = purple_at(8);
        let out = resolve_choice(&b, &mut p, c(604, 315), 0).unwrap();
        assert_eq!(out.stop, StopReason::BudgetExhausted);
        assert_eq!(p.position, c(537, 302));
        assert_eq!(p.branch, Some(c(604, 315)));
        assert_eq!(p.path, PathColor::Orange);

        let out = advance(&b, &mut p, 1).unwrap();
        assert_eq!(out.to, c(604, 315));
        assert_eq!(p.branch, None);
    }

    #[test]
    fn never_consumes_more_than_supplied() {
        let b = board();
        for space in b.spaces() {
            if space.kind == SpaceKind::Finish {
                continue;
            }
            for budget in 0..=6 {
                let mut p = purple_at(usize::MAX);
                p.position = space.coord;
                if let Some(color) = space.color {
                    p.path = color;
                }
                let out = advance(&b, &mut p, budget).unwrap();
                assert!(out.steps <= budget);
                assert_eq!(out.steps + out.remaining, budget);
                assert_eq!(out.visited.len() as u32, out.steps);
            }
        }
    }
}
