//! The turn/phase state machine.
//!
//! `Game` owns the players, decks and RNG of a single game. Every action
//! computes its effects against copies (a `Transition`) and only commits
//! them once nothing can fail any more, so a rejected action leaves the
//! game exactly as it was. Events are published to observers after the
//! commit.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::computer;
use super::config::{GameConfig, TurnOrderPolicy};
use super::event::{GameEvent, GameObserver};
use super::phase::{next_turn, Phase, TurnStep};
use super::snapshot::{GameSnapshot, PlayerView};
use crate::board::{Board, Coord, Player, PlayerId, Resources, Role, SpaceKind, ALL_ROLES, ROLE_COUNT};
use crate::cards::{self, CardId, CardLibrary, Deck, DeckId, ResourceDelta, ALL_DECKS};
use crate::error::GameError;
use crate::movement::{self, Branch, MoveOutcome, StopReason};

const AWAITING_ROLL: Phase = Phase::TurnInProgress(TurnStep::AwaitingRoll);
const AWAITING_CHOICE: Phase = Phase::TurnInProgress(TurnStep::AwaitingChoice);
const AWAITING_CARD_ACK: Phase = Phase::TurnInProgress(TurnStep::AwaitingCardAck);

/// A card drawn during an action and what it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawnCard {
    pub deck: DeckId,
    pub card: CardId,
    pub name: String,
    pub delta: ResourceDelta,
}

/// Result of a turn action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// The player who acted.
    pub player: PlayerId,
    pub roll: Option<u32>,
    pub movement: Option<MoveOutcome>,
    pub card: Option<DrawnCard>,
    /// Phase after the action.
    pub phase: Phase,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Nothing,
    Choice { remaining: u32 },
    Card { remaining: u32 },
}

#[derive(Debug, Clone)]
struct Seat {
    name: String,
    human: bool,
    role: Option<Role>,
}

/// Changes computed by an action, applied all at once by `Game::commit`.
struct Transition {
    player: Player,
    rng: SmallRng,
    deck: Option<Deck>,
    phase: Phase,
    pending: Pending,
    active: usize,
    round: u32,
    roll: Option<u32>,
    movement: Option<MoveOutcome>,
    card: Option<DrawnCard>,
    events: Vec<GameEvent>,
}

/// A single game, from setup to game over.
pub struct Game {
    board: Arc<Board>,
    cards: Arc<CardLibrary>,
    config: GameConfig,
    phase: Phase,
    seats: Vec<Seat>,
    /// Seat order; `PlayerId(i)` is `players[i]`.
    players: Vec<Player>,
    rotation: Vec<PlayerId>,
    /// Roll-off values in seat order; empty under seating order.
    turn_rolls: Vec<u32>,
    /// Index into `rotation`.
    active: usize,
    round: u32,
    decks: Vec<Deck>,
    rng: SmallRng,
    pending: Pending,
    finish_order: Vec<PlayerId>,
    last_outcome: Option<ActionOutcome>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("players", &self.players)
            .field("rotation", &self.rotation)
            .field("active", &self.active)
            .field("finish_order", &self.finish_order)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Creates a game in `Setup`. Decks are shuffled from the configured seed.
    ///
    /// Fails with `GameError::Config` if the options are out of range.
    pub fn new(board: Arc<Board>, cards: Arc<CardLibrary>, config: GameConfig) -> Result<Game, GameError> {
        config.validate()?;
        let mut rng = if config.seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.seed)
        };
        let decks = ALL_DECKS
            .iter()
            .map(|&d| Deck::new(d, cards.deck_cards(d), config.reshuffle, &mut rng))
            .collect();
        Ok(Game {
            board,
            cards,
            config,
            phase: Phase::Setup,
            seats: Vec::new(),
            players: Vec::new(),
            rotation: Vec::new(),
            turn_rolls: Vec::new(),
            active: 0,
            round: 0,
            decks,
            rng,
            pending: Pending::Nothing,
            finish_order: Vec::new(),
            last_outcome: None,
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    // ---- accessors ----

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cards(&self) -> &CardLibrary {
        &self.cards
    }

    /// Players in seat order. Empty until roles are assigned.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn rotation(&self) -> &[PlayerId] {
        &self.rotation
    }

    /// Die values of the roll-off in seat order; empty under seating order.
    pub fn turn_order_rolls(&self) -> &[u32] {
        &self.turn_rolls
    }

    /// The player whose turn it is, once turns have begun.
    pub fn active_player(&self) -> Option<&Player> {
        if !self.in_turns() {
            return None;
        }
        let id = self.rotation.get(self.active)?;
        self.players.get(id.index())
    }

    pub fn finish_order(&self) -> &[PlayerId] {
        &self.finish_order
    }

    pub fn last_outcome(&self) -> Option<&ActionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Branches on offer while a choice is pending.
    pub fn pending_branches(&self) -> Vec<Branch> {
        match (self.pending, self.active_player()) {
            (Pending::Choice { .. }, Some(p)) => movement::branches_at(&self.board, p.position),
            _ => Vec::new(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    fn in_turns(&self) -> bool {
        matches!(
            self.phase,
            Phase::TurnInProgress(_) | Phase::TurnComplete | Phase::GameOver
        )
    }

    fn expect_phase(&self, phase: Phase, action: &'static str) -> Result<(), GameError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(self.illegal(action))
        }
    }

    fn illegal(&self, action: &'static str) -> GameError {
        GameError::IllegalAction {
            action,
            phase: self.phase,
        }
    }

    fn active_index(&self) -> usize {
        self.rotation[self.active].index()
    }

    // ---- setup ----

    /// Seats a player. Only legal during setup.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        human: bool,
        role: Option<Role>,
    ) -> Result<PlayerId, GameError> {
        self.expect_phase(Phase::Setup, "add player")?;
        if self.seats.len() >= u8::MAX as usize {
            return Err(GameError::NotEnoughRoles {
                players: self.seats.len() + 1,
                roles: ROLE_COUNT,
            });
        }
        let id = PlayerId(self.seats.len() as u8);
        self.seats.push(Seat {
            name: name.into(),
            human,
            role,
        });
        tracing::debug!(player = %id, human, "player seated");
        Ok(id)
    }

    /// Gives every seated player a unique role and places them on START.
    ///
    /// Requested roles are honored; everyone else gets the first free role.
    pub fn assign_roles(&mut self) -> Result<Vec<(PlayerId, Role)>, GameError> {
        self.expect_phase(Phase::Setup, "assign roles")?;
        if self.seats.is_empty() {
            return Err(GameError::NoPlayers);
        }
        if self.seats.len() > ROLE_COUNT {
            return Err(GameError::NotEnoughRoles {
                players: self.seats.len(),
                roles: ROLE_COUNT,
            });
        }

        let mut taken = [false; ROLE_COUNT];
        for role in self.seats.iter().filter_map(|s| s.role) {
            if taken[role.index()] {
                return Err(GameError::RoleTaken(role));
            }
            taken[role.index()] = true;
        }

        let mut free = ALL_ROLES.iter().copied().filter(|r| !taken[r.index()]);
        let mut players = Vec::with_capacity(self.seats.len());
        for (i, seat) in self.seats.iter().enumerate() {
            let role = match seat.role {
                Some(r) => r,
                None => free.next().ok_or(GameError::NotEnoughRoles {
                    players: self.seats.len(),
                    roles: ROLE_COUNT,
                })?,
            };
            let mut player = Player::new(PlayerId(i as u8), seat.name.clone(), role, self.board.start(), seat.human);
            player.resources = Resources::uniform(self.config.starting_resources);
            players.push(player);
        }

        let roles: Vec<(PlayerId, Role)> = players.iter().map(|p| (p.id, p.role)).collect();
        self.players = players;
        self.phase = Phase::RoleSelection;
        self.publish(GameEvent::RolesAssigned {
            roles: roles.clone(),
        });
        Ok(roles)
    }

    /// Decides the rotation according to the configured policy.
    pub fn determine_turn_order(&mut self) -> Result<Vec<PlayerId>, GameError> {
        self.expect_phase(Phase::RoleSelection, "decide turn order")?;
        let seat_order: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        let mut rng = self.rng.clone();
        let (rotation, rolls) = match self.config.turn_order {
            TurnOrderPolicy::Seating => (seat_order, Vec::new()),
            TurnOrderPolicy::RollOff => {
                let rolls: Vec<u32> = seat_order
                    .iter()
                    .map(|_| rng.gen_range(1..=self.config.die_sides))
                    .collect();
                let mut order = seat_order;
                // stable: ties keep seat order
                order.sort_by_key(|id| Reverse(rolls[id.index()]));
                (order, rolls)
            }
        };

        self.rng = rng;
        self.rotation = rotation.clone();
        self.turn_rolls = rolls.clone();
        self.phase = Phase::TurnOrder;
        self.publish(GameEvent::TurnOrderDecided {
            rotation: rotation.clone(),
            rolls,
        });
        Ok(rotation)
    }

    /// Starts the first turn at rotation index 0.
    pub fn begin(&mut self) -> Result<PlayerId, GameError> {
        self.expect_phase(Phase::TurnOrder, "begin")?;
        self.active = 0;
        self.round = 1;
        self.phase = AWAITING_ROLL;
        let first = self.rotation[0];
        self.publish(GameEvent::TurnStarted {
            player: first,
            round: self.round,
        });
        Ok(first)
    }

    /// Moves the active player straight to `coord`, for setting up scenarios.
    #[doc(hidden)]
    pub fn place_player(&mut self, id: PlayerId, coord: Coord) -> Result<(), GameError> {
        self.expect_phase(AWAITING_ROLL, "place")?;
        let space = self
            .board
            .space_at(coord)
            .ok_or(GameError::UnknownSpace(coord))?;
        if space.kind == SpaceKind::Finish {
            return Err(GameError::UnknownSpace(coord));
        }
        let color = space.color;
        let player = self
            .players
            .get_mut(id.index())
            .ok_or(GameError::UnknownPlayer(id))?;
        if player.finished {
            return Err(GameError::AlreadyFinished(id));
        }
        player.position = coord;
        player.branch = None;
        if let Some(color) = color {
            player.path = color;
        }
        Ok(())
    }

    // ---- turn actions ----

    /// Rolls the die for the active player and moves them.
    pub fn roll(&mut self) -> Result<ActionOutcome, GameError> {
        self.expect_phase(AWAITING_ROLL, "roll")?;
        let mut rng = self.rng.clone();
        let value = rng.gen_range(1..=self.config.die_sides);
        self.roll_with(value, rng)
    }

    /// Like `roll`, with a die value supplied by the caller.
    pub fn roll_die(&mut self, value: u32) -> Result<ActionOutcome, GameError> {
        self.expect_phase(AWAITING_ROLL, "roll")?;
        if !(1..=self.config.die_sides).contains(&value) {
            return Err(GameError::InvalidRoll(value));
        }
        self.roll_with(value, self.rng.clone())
    }

    fn roll_with(&mut self, value: u32, rng: SmallRng) -> Result<ActionOutcome, GameError> {
        let mut t = self.transition(rng);
        t.roll = Some(value);
        t.events.push(GameEvent::DieRolled {
            player: t.player.id,
            value,
        });
        let moved = movement::advance(&self.board, &mut t.player, value)?;
        self.after_move(&mut t, moved)?;
        Ok(self.commit(t))
    }

    /// Takes the chosen branch at a pending choicepoint and finishes the move.
    pub fn resolve_choice(&mut self, coord: Coord) -> Result<ActionOutcome, GameError> {
        self.resolve_choice_with(coord, self.rng.clone())
    }

    fn resolve_choice_with(&mut self, coord: Coord, rng: SmallRng) -> Result<ActionOutcome, GameError> {
        self.expect_phase(AWAITING_CHOICE, "choose")?;
        let Pending::Choice { remaining } = self.pending else {
            return Err(self.illegal("choose"));
        };
        let mut t = self.transition(rng);
        let moved = movement::resolve_choice(&self.board, &mut t.player, coord, remaining)?;
        let color = self
            .board
            .space_at(coord)
            .and_then(|s| s.color)
            .unwrap_or(t.player.path);
        t.events.push(GameEvent::BranchChosen {
            player: t.player.id,
            coord,
            color,
        });
        self.after_move(&mut t, moved)?;
        Ok(self.commit(t))
    }

    /// Acknowledges the drawn card. Under carry-over the unused budget is
    /// walked now; otherwise the turn is complete.
    pub fn acknowledge_card(&mut self) -> Result<ActionOutcome, GameError> {
        self.expect_phase(AWAITING_CARD_ACK, "acknowledge")?;
        let remaining = match self.pending {
            Pending::Card { remaining } => remaining,
            _ => 0,
        };
        let mut t = self.transition(self.rng.clone());
        if remaining > 0 {
            let moved = movement::advance(&self.board, &mut t.player, remaining)?;
            self.after_move(&mut t, moved)?;
        } else {
            t.phase = Phase::TurnComplete;
            t.pending = Pending::Nothing;
        }
        Ok(self.commit(t))
    }

    /// Ends the active player's turn and hands over to the next player.
    ///
    /// A finished player who is not skipped may end their turn straight
    /// from `AwaitingRoll`, since they cannot roll.
    pub fn end_turn(&mut self) -> Result<ActionOutcome, GameError> {
        let finished_turn = self.phase == AWAITING_ROLL
            && self.active_player().map(|p| p.finished).unwrap_or(false);
        if self.phase != Phase::TurnComplete && !finished_turn {
            return Err(self.illegal("end turn"));
        }

        let mut t = self.transition(self.rng.clone());
        // an exhausted event deck disables end-of-turn events
        if self.config.end_of_turn_events
            && !t.player.finished
            && !self.decks[DeckId::Event.index()].is_exhausted()
        {
            t.card = Some(self.draw_card(&mut t, DeckId::Event)?);
        }
        t.pending = Pending::Nothing;
        t.events.push(GameEvent::TurnEnded { player: t.player.id });

        let finished: Vec<bool> = self
            .rotation
            .iter()
            .map(|id| self.players[id.index()].finished)
            .collect();
        let next = next_turn(self.active, &finished, self.config.skip_finished);
        let round_limit_hit = |wrapped: bool| {
            wrapped && self.config.max_rounds.is_some_and(|max| self.round >= max)
        };

        match next {
            Some(next) if !round_limit_hit(next.wrapped) => {
                if next.wrapped {
                    t.round += 1;
                }
                t.active = next.index;
                t.phase = AWAITING_ROLL;
                t.events.push(GameEvent::TurnStarted {
                    player: self.rotation[next.index],
                    round: t.round,
                });
            }
            _ => {
                t.phase = Phase::GameOver;
                t.events.push(GameEvent::GameOver {
                    round: self.round,
                    finish_order: self.finish_order.clone(),
                });
            }
        }
        Ok(self.commit(t))
    }

    /// Performs the next legal action for a computer-controlled active player.
    pub fn play_computer_action(&mut self) -> Result<ActionOutcome, GameError> {
        let player = self.active_player().ok_or_else(|| self.illegal("auto"))?;
        if player.human {
            return Err(self.illegal("auto"));
        }
        let finished = player.finished;
        match self.phase {
            AWAITING_ROLL if finished => self.end_turn(),
            AWAITING_ROLL => self.roll(),
            AWAITING_CHOICE => {
                let mut rng = self.rng.clone();
                let branches = self.pending_branches();
                let pick = computer::choose_branch(&branches, &mut rng)
                    .ok_or_else(|| self.illegal("auto"))?;
                self.resolve_choice_with(pick.coord, rng)
            }
            AWAITING_CARD_ACK => self.acknowledge_card(),
            Phase::TurnComplete => self.end_turn(),
            _ => Err(self.illegal("auto")),
        }
    }

    /// A read-only view of the whole game.
    pub fn snapshot(&self) -> GameSnapshot {
        let players = if self.players.is_empty() {
            self.seats
                .iter()
                .enumerate()
                .map(|(i, s)| PlayerView {
                    id: PlayerId(i as u8),
                    name: s.name.clone(),
                    human: s.human,
                    role: s.role,
                    position: self.board.start(),
                    path: s.role.map(Role::home_path),
                    resources: Resources::uniform(self.config.starting_resources),
                    finished: false,
                    rank: None,
                })
                .collect()
        } else {
            self.players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    name: p.name.clone(),
                    human: p.human,
                    role: Some(p.role),
                    position: p.position,
                    path: Some(p.path),
                    resources: p.resources,
                    finished: p.finished,
                    rank: p.rank,
                })
                .collect()
        };
        GameSnapshot {
            phase: self.phase,
            round: self.round,
            active: self.active_player().map(|p| p.id),
            rotation: self.rotation.clone(),
            players,
            finish_order: self.finish_order.clone(),
            branches: self.pending_branches(),
            last_outcome: self.last_outcome.clone(),
        }
    }

    // ---- internals ----

    fn transition(&self, rng: SmallRng) -> Transition {
        Transition {
            player: self.players[self.active_index()].clone(),
            rng,
            deck: None,
            phase: self.phase,
            pending: self.pending,
            active: self.active,
            round: self.round,
            roll: None,
            movement: None,
            card: None,
            events: Vec::new(),
        }
    }

    /// Turns a resolver outcome into the next phase, drawing a card on draw spaces.
    fn after_move(&self, t: &mut Transition, moved: MoveOutcome) -> Result<(), GameError> {
        let id = t.player.id;
        t.events.push(GameEvent::PlayerMoved {
            player: id,
            from: moved.from,
            to: moved.to,
            steps: moved.steps,
            stop: moved.stop,
            path: moved.path,
        });

        match moved.stop {
            StopReason::BudgetExhausted => {
                t.phase = Phase::TurnComplete;
                t.pending = Pending::Nothing;
            }
            StopReason::ChoicepointReached => {
                t.events.push(GameEvent::ChoiceOffered {
                    player: id,
                    at: moved.to,
                    branches: moved.branches.clone(),
                });
                t.phase = AWAITING_CHOICE;
                t.pending = Pending::Choice {
                    remaining: moved.remaining,
                };
            }
            StopReason::DrawTriggered => {
                let color = self
                    .board
                    .space_at(moved.to)
                    .and_then(|s| s.color)
                    .ok_or(GameError::UnknownSpace(moved.to))?;
                let deck = DeckId::for_path(color);
                if self.decks[deck.index()].is_exhausted() {
                    // nothing left to draw: the move ends here without a card
                    t.events.push(GameEvent::DeckExhausted { player: id, deck });
                    t.phase = Phase::TurnComplete;
                    t.pending = Pending::Nothing;
                    t.movement = Some(moved);
                    return Ok(());
                }
                t.card = Some(self.draw_card(t, deck)?);
                t.phase = AWAITING_CARD_ACK;
                let carried = if self.config.carry_over_after_draw {
                    moved.remaining
                } else {
                    0
                };
                t.pending = Pending::Card { remaining: carried };
            }
            StopReason::FinishReached => {
                let rank = self.finish_order.len() as u32 + 1;
                t.player.finished = true;
                t.player.rank = Some(rank);
                t.pending = Pending::Nothing;
                t.events.push(GameEvent::PlayerFinished { player: id, rank });

                let everyone_done = self.players.iter().all(|p| p.id == id || p.finished);
                if everyone_done {
                    let mut order = self.finish_order.clone();
                    order.push(id);
                    t.phase = Phase::GameOver;
                    t.events.push(GameEvent::GameOver {
                        round: self.round,
                        finish_order: order,
                    });
                } else {
                    t.phase = Phase::TurnComplete;
                }
            }
        }
        t.movement = Some(moved);
        Ok(())
    }

    /// Draws from a copy of the deck and applies the card to the transition's player.
    fn draw_card(&self, t: &mut Transition, deck: DeckId) -> Result<DrawnCard, GameError> {
        let mut pile = self.decks[deck.index()].clone();
        let card_id = pile.draw(&mut t.rng)?;
        let card = self.cards.card(card_id);
        let delta = cards::apply(&mut t.player, card);

        t.events.push(GameEvent::CardDrawn {
            player: t.player.id,
            deck,
            card: card_id,
            name: card.name.clone(),
        });
        for change in &delta.changes {
            t.events.push(GameEvent::ResourceChanged {
                player: t.player.id,
                kind: change.kind,
                before: change.before,
                after: change.after,
            });
        }
        t.deck = Some(pile);
        Ok(DrawnCard {
            deck,
            card: card_id,
            name: card.name.clone(),
            delta,
        })
    }

    fn commit(&mut self, t: Transition) -> ActionOutcome {
        let id = t.player.id;
        if t.player.finished && !self.players[id.index()].finished {
            self.finish_order.push(id);
        }
        self.players[id.index()] = t.player;
        self.rng = t.rng;
        if let Some(deck) = t.deck {
            let i = deck.id().index();
            self.decks[i] = deck;
        }
        self.phase = t.phase;
        self.pending = t.pending;
        self.active = t.active;
        self.round = t.round;

        let outcome = ActionOutcome {
            player: id,
            roll: t.roll,
            movement: t.movement,
            card: t.card,
            phase: t.phase,
            events: t.events,
        };
        for event in &outcome.events {
            for observer in &mut self.observers {
                observer.notify(event);
            }
        }
        tracing::debug!(
            player = %id,
            phase = %self.phase,
            events = outcome.events.len(),
            "action committed"
        );
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    fn publish(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}
