//! Applying a card's per-role effect to a player.

use serde::Serialize;

use super::card::{Card, CardId};
use crate::board::{Player, PlayerId, ResourceKind};

/// Before/after value of one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceChange {
    pub kind: ResourceKind,
    pub before: i64,
    pub after: i64,
}

/// Everything one card application changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDelta {
    pub player: PlayerId,
    pub card: CardId,
    pub changes: Vec<ResourceChange>,
}

/// Applies the effect for the player's role. Only the kinds named in that
/// effect are touched. There is no deduplication: applying the same card
/// twice applies it twice.
pub fn apply(player: &mut Player, card: &Card) -> ResourceDelta {
    let effect = &card.effects[player.role];
    let changes = effect
        .changes
        .iter()
        .map(|&(kind, delta)| {
            let before = player.resources[kind];
            let after = before + delta;
            player.resources[kind] = after;
            ResourceChange {
                kind,
                before,
                after,
            }
        })
        .collect();
    ResourceDelta {
        player: player.id,
        card: card.id,
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coord, Resources, Role};
    use crate::cards::CardLibrary;

    fn colonialist() -> Player {
        Player::new(PlayerId(0), "C", Role::Colonialist, Coord::new(0, 0), false)
    }

    #[test]
    fn reclamation_applies_once() {
        let lib = CardLibrary::standard().unwrap();
        let card = lib.find("The Reclamation of Historical Spaces").unwrap();
        let mut p = colonialist();
        let delta = apply(&mut p, card);
        assert_eq!(
            p.resources,
            Resources {
                money: -5,
                knowledge: -3,
                influence: -4
            }
        );
        assert_eq!(delta.player, PlayerId(0));
        assert_eq!(delta.card, card.id);
        assert_eq!(
            delta.changes[0],
            ResourceChange {
                kind: ResourceKind::Money,
                before: 0,
                after: -5
            }
        );
    }

    #[test]
    fn applying_twice_doubles_the_delta() {
        let lib = CardLibrary::standard().unwrap();
        let card = lib.find("The Reclamation of Historical Spaces").unwrap();
        let mut p = colonialist();
        apply(&mut p, card);
        let second = apply(&mut p, card);
        assert_eq!(p.resources.money, -10);
        assert_eq!(p.resources.knowledge, -6);
        assert_eq!(p.resources.influence, -8);
        assert_eq!(second.changes[2].before, -4);
        assert_eq!(second.changes[2].after, -8);
    }

    #[test]
    fn untouched_kinds_stay_put() {
        let lib = CardLibrary::standard().unwrap();
        for card in lib.cards() {
            for role in crate::board::ALL_ROLES {
                let mut p = Player::new(PlayerId(1), "P", role, Coord::new(0, 0), true);
                p.resources = Resources::uniform(10);
                let delta = apply(&mut p, card);
                let effect = &card.effects[role];
                for kind in crate::board::ALL_RESOURCES {
                    assert_eq!(p.resources[kind], 10 + effect.delta(kind));
                }
                assert_eq!(delta.changes.len(), effect.changes.len());
            }
        }
    }
}
