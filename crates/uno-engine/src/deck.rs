//! Building and shuffling the 108-card deck.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::{Card, CardKind, Color};

/// Number of cards in a full deck. Cards are only ever moved between piles
/// and hands, so every running game holds exactly this many.
pub const DECK_SIZE: usize = 108;

/// Copies of each wild kind in a deck.
const WILDS_PER_KIND: usize = 4;

/// Builds a full, unshuffled deck.
///
/// Per color: one `0`, two each of `1`–`9`, two each of skip, reverse and
/// draw-two (25 cards, 100 across the four colors). Then four wilds and four
/// wild-draw-fours.
pub fn build() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in Color::PLAYABLE {
        deck.push(Card::number(color, 0));
        for value in 1..=9 {
            deck.push(Card::number(color, value));
            deck.push(Card::number(color, value));
        }
        for kind in CardKind::ACTIONS {
            deck.push(Card::action(color, kind));
            deck.push(Card::action(color, kind));
        }
    }
    for _ in 0..WILDS_PER_KIND {
        deck.push(Card::wild(CardKind::Wild));
        deck.push(Card::wild(CardKind::Wild4));
    }
    deck
}

/// Returns `cards` in a uniformly random order (Fisher–Yates).
pub fn shuffle<R: Rng + ?Sized>(mut cards: Vec<Card>, rng: &mut R) -> Vec<Card> {
    cards.shuffle(rng);
    cards
}

/// A freshly built deck, shuffled.
pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    shuffle(build(), rng)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn count(deck: &[Card], pred: impl Fn(&Card) -> bool) -> usize {
        deck.iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_build_has_108_cards() {
        assert_eq!(build().len(), DECK_SIZE);
    }

    #[test]
    fn test_build_composition_per_color() {
        let deck = build();
        for color in Color::PLAYABLE {
            let zeros = count(&deck, |c| c.color == color && c.value == Some(0));
            assert_eq!(zeros, 1, "{color} should have a single zero");
            for value in 1..=9 {
                let n = count(&deck, |c| c.color == color && c.value == Some(value));
                assert_eq!(n, 2, "{color} {value} should appear twice");
            }
            for kind in CardKind::ACTIONS {
                let n = count(&deck, |c| c.color == color && c.kind == kind);
                assert_eq!(n, 2, "{color} {kind:?} should appear twice");
            }
        }
    }

    #[test]
    fn test_build_wilds_are_black_and_unchosen() {
        let deck = build();
        assert_eq!(count(&deck, |c| c.kind == CardKind::Wild), 4);
        assert_eq!(count(&deck, |c| c.kind == CardKind::Wild4), 4);
        assert!(
            deck.iter()
                .filter(|c| c.is_wild())
                .all(|c| c.color == Color::Black && c.chosen_color.is_none())
        );
        assert_eq!(count(&deck, |c| c.color == Color::Black), 8);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut original = build();
        let mut shuffled = shuffle(build(), &mut rng);
        assert_ne!(original, shuffled, "seeded shuffle should move cards");

        let key = |c: &Card| (c.color as u8, c.kind as u8, c.value);
        original.sort_by_key(key);
        shuffled.sort_by_key(key);
        assert_eq!(original, shuffled);
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let a = shuffled(&mut StdRng::seed_from_u64(99));
        let b = shuffled(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_gives_every_permutation_equal_weight() {
        // Three distinct cards have six orderings. Over 60k shuffles each
        // ordering should land near 10k; the bounds sit ~10 standard
        // deviations out so the check is stable for any seed.
        let cards = vec![
            Card::number(Color::Red, 1),
            Card::number(Color::Red, 2),
            Card::number(Color::Red, 3),
        ];
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen: HashMap<Vec<Card>, usize> = HashMap::new();
        for _ in 0..60_000 {
            *seen.entry(shuffle(cards.clone(), &mut rng)).or_default() += 1;
        }
        assert_eq!(seen.len(), 6);
        for (order, hits) in seen {
            assert!(
                (9_000..=11_000).contains(&hits),
                "ordering {order:?} drawn {hits} times"
            );
        }
    }
}
