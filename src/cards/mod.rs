//! Card effect engine: card content, decks, and effect application.

pub mod card;
pub mod deck;
pub mod effect;
pub mod library;

pub use card::{Card, CardId, DeckId, Effect, ALL_DECKS, DECK_COUNT};
pub use deck::{Deck, ReshufflePolicy};
pub use effect::{apply, ResourceChange, ResourceDelta};
pub use library::CardLibrary;
