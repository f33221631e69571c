//! Decisions for non-human players.
//!
//! A computer player only has to make legal choices, so branches are picked
//! uniformly at random.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::movement::Branch;

/// Picks one of the offered branches.
pub fn choose_branch<R: Rng + ?Sized>(branches: &[Branch], rng: &mut R) -> Option<Branch> {
    branches.choose(rng).copied()
}
