//! Card content loading and validation.
//!
//! Content is JSON grouped by deck:
//!
//! ```json
//! { "decks": { "purple": [ { "name": "...", "description": "...",
//!     "effects": { "colonialist": { "money": -5, "explanation": "..." }, ... } } ] } }
//! ```
//!
//! Every card must carry an effect for every role. A missing role is a
//! load-time `ConfigError`, so applying a card later cannot fail.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::card::{Card, CardId, DeckId, Effect, ALL_DECKS, DECK_COUNT};
use crate::board::{ResourceKind, Role, RoleMap, ALL_RESOURCES};
use crate::error::ConfigError;

static STANDARD_CARDS: &str = include_str!("../../data/cards.json");

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLibrary {
    decks: BTreeMap<DeckId, Vec<RawCard>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCard {
    name: String,
    #[serde(default)]
    description: String,
    effects: BTreeMap<Role, RawEffect>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEffect {
    money: Option<i64>,
    knowledge: Option<i64>,
    influence: Option<i64>,
    #[serde(default)]
    explanation: String,
}

impl RawEffect {
    fn into_effect(self) -> Effect {
        let changes = ALL_RESOURCES
            .iter()
            .filter_map(|&kind| {
                let delta = match kind {
                    ResourceKind::Money => self.money,
                    ResourceKind::Knowledge => self.knowledge,
                    ResourceKind::Influence => self.influence,
                };
                delta.map(|d| (kind, d))
            })
            .collect();
        Effect {
            changes,
            explanation: self.explanation,
        }
    }
}

/// All cards, grouped by deck. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct CardLibrary {
    cards: Vec<Card>,
    decks: [Vec<CardId>; DECK_COUNT],
}

impl CardLibrary {
    /// The embedded card content.
    pub fn standard() -> Result<CardLibrary, ConfigError> {
        CardLibrary::from_json(STANDARD_CARDS)
    }

    /// Parses and validates card content.
    pub fn from_json(json: &str) -> Result<CardLibrary, ConfigError> {
        let raw: RawLibrary =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;

        let mut cards = Vec::new();
        let mut decks: [Vec<CardId>; DECK_COUNT] = Default::default();

        for (deck, raw_cards) in raw.decks {
            for raw_card in raw_cards {
                if raw_card.name.trim().is_empty() {
                    return Err(ConfigError::EmptyCardName(deck));
                }
                let mut raw_effects = raw_card.effects;
                let name = raw_card.name;
                let effects = RoleMap::try_from_fn(|role| {
                    raw_effects
                        .remove(&role)
                        .map(RawEffect::into_effect)
                        .ok_or_else(|| ConfigError::MissingRoleEffect {
                            card: name.clone(),
                            role,
                        })
                })?;
                let id = CardId(cards.len() as u16);
                decks[deck.index()].push(id);
                cards.push(Card {
                    id,
                    deck,
                    name,
                    description: raw_card.description,
                    effects,
                });
            }
        }

        // The event deck may be left empty; draw spaces need a card to give.
        for deck in ALL_DECKS.iter().filter(|d| **d != DeckId::Event) {
            if decks[deck.index()].is_empty() {
                return Err(ConfigError::EmptyDeck(*deck));
            }
        }

        Ok(CardLibrary { cards, decks })
    }

    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }

    /// The cards of a deck in content order.
    pub fn deck_cards(&self, deck: DeckId) -> &[CardId] {
        &self.decks[deck.index()]
    }

    /// Finds a card by exact name.
    pub fn find(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
