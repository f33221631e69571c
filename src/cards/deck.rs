//! Deck draw state and reshuffle policy.
//!
//! A deck never repeats a card until every card has been drawn once. Under
//! `ReshufflePolicy::Reshuffle` an exhausted deck is reshuffled on the next
//! draw, and the first card after the reshuffle is never the card drawn
//! last (when the deck holds more than one card).

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::card::{CardId, DeckId};
use crate::error::GameError;

/// What happens when a deck runs out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReshufflePolicy {
    #[default]
    Reshuffle,
    Never,
}

impl ReshufflePolicy {
    pub const fn name(self) -> &'static str {
        match self {
            ReshufflePolicy::Reshuffle => "reshuffle",
            ReshufflePolicy::Never => "never",
        }
    }

    pub fn from_name(s: &str) -> Option<ReshufflePolicy> {
        match s.to_ascii_lowercase().as_str() {
            "reshuffle" => Some(ReshufflePolicy::Reshuffle),
            "never" => Some(ReshufflePolicy::Never),
            _ => None,
        }
    }
}

impl fmt::Display for ReshufflePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The remaining-draw sequence of one deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: DeckId,
    cards: Vec<CardId>,
    /// Top of the deck is the end of the vector.
    remaining: Vec<CardId>,
    last_drawn: Option<CardId>,
    policy: ReshufflePolicy,
}

impl Deck {
    /// Creates a shuffled deck.
    pub fn new<R: Rng + ?Sized>(
        id: DeckId,
        cards: &[CardId],
        policy: ReshufflePolicy,
        rng: &mut R,
    ) -> Self {
        let mut remaining = cards.to_vec();
        remaining.shuffle(rng);
        Deck {
            id,
            cards: cards.to_vec(),
            remaining,
            last_drawn: None,
            policy,
        }
    }

    pub fn id(&self) -> DeckId {
        self.id
    }

    /// Cards left before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn last_drawn(&self) -> Option<CardId> {
        self.last_drawn
    }

    /// True when `draw` can only fail: nothing left and no reshuffle allowed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
            && (self.policy == ReshufflePolicy::Never || self.cards.is_empty())
    }

    /// Draws the top card, reshuffling first if the policy allows it.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<CardId, GameError> {
        if self.remaining.is_empty() {
            if self.policy == ReshufflePolicy::Never || self.cards.is_empty() {
                return Err(GameError::DeckEmpty(self.id));
            }
            self.reshuffle(rng);
        }
        let card = self.remaining.pop().ok_or(GameError::DeckEmpty(self.id))?;
        self.last_drawn = Some(card);
        Ok(card)
    }

    fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.remaining.clone_from(&self.cards);
        self.remaining.shuffle(rng);
        let top = self.remaining.len() - 1;
        if top > 0 && Some(self.remaining[top]) == self.last_drawn {
            self.remaining.swap(0, top);
        }
        tracing::debug!(deck = %self.id, cards = self.remaining.len(), "reshuffled");
    }
}
