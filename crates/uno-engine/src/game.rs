//! The authoritative state of one running game.
//!
//! A [`Game`] owns every card: the hidden hands, the draw pile and the
//! discard pile. It does not own the seating order; the enclosing
//! [`Room`](crate::Room) passes its player list into each operation, and
//! `current_player` indexes into that list.
//!
//! Every operation validates first and mutates second, so a returned
//! [`Rejection`] always means nothing changed.

use std::cmp::Ordering;
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::rules::{self, Direction, ForcedDraw};
use crate::{Card, Color, GameConfig, PlayerId, Rejection, deck};

/// What happened after an accepted play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The turn moved on; the game continues.
    Continued,
    /// The player emptied their hand.
    Won { winner: PlayerId },
}

/// What happened after an accepted draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A card moved into the hand. If it is `playable` the turn stays put.
    Drew { playable: bool },
    /// Nothing left to draw; the action was a no-op.
    PileEmpty,
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    hands: HashMap<PlayerId, Vec<Card>>,
    /// The end of the vector is the top of the pile.
    draw_pile: Vec<Card>,
    /// Never empty: the last element is the public top card.
    discard_pile: Vec<Card>,
    current_player: usize,
    direction: Direction,
    recycle_discard: bool,
    /// Only consulted when recycling the discard pile.
    rng: StdRng,
}

impl Game {
    /// Shuffles a fresh deck and deals it to `seats`.
    pub fn deal<R: Rng + ?Sized>(
        seats: &[PlayerId],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Self, Rejection> {
        let mut game = Self::from_deck(seats, config, deck::shuffled(rng))?;
        game.rng = StdRng::seed_from_u64(rng.random());
        Ok(game)
    }

    /// Deals from `deck` as given, with the end of the vector as the top.
    ///
    /// Each seat in order takes `hand_size` cards off the top. Then cards
    /// are turned up until a colored number appears; it opens the discard
    /// pile and the rejected cards go to the bottom of the draw pile.
    pub fn from_deck(
        seats: &[PlayerId],
        config: &GameConfig,
        deck: Vec<Card>,
    ) -> Result<Self, Rejection> {
        let cannot_deal = || Rejection::CannotDeal {
            players: seats.len(),
            hand_size: config.hand_size,
        };

        let mut draw_pile = deck;
        let mut hands = HashMap::with_capacity(seats.len());
        for &id in seats {
            if draw_pile.len() < config.hand_size {
                return Err(cannot_deal());
            }
            let hand: Vec<Card> = (0..config.hand_size)
                .filter_map(|_| draw_pile.pop())
                .collect();
            hands.insert(id, hand);
        }

        let first = seed_discard(&mut draw_pile).ok_or_else(cannot_deal)?;

        Ok(Self {
            hands,
            draw_pile,
            discard_pile: vec![first],
            current_player: 0,
            direction: Direction::Clockwise,
            recycle_discard: config.recycle_discard,
            rng: StdRng::seed_from_u64(0),
        })
    }

    // -- Read access ------------------------------------------------------

    /// The public top of the discard pile.
    pub fn top_card(&self) -> &Card {
        self.discard_pile
            .last()
            .expect("discard pile is seeded when the game is dealt")
    }

    /// A player's hand, or an empty slice for someone not dealt in.
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        self.hands.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn card_count(&self, player: PlayerId) -> usize {
        self.hand(player).len()
    }

    pub fn draw_count(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_count(&self) -> usize {
        self.discard_pile.len()
    }

    /// Index into the room's player order of whoever acts next.
    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Cards across all hands and both piles.
    pub fn total_cards(&self) -> usize {
        self.draw_pile.len()
            + self.discard_pile.len()
            + self.hands.values().map(Vec::len).sum::<usize>()
    }

    // -- Actions ----------------------------------------------------------

    /// Plays the card at `hand_index` from `player`'s hand.
    ///
    /// Wilds need `chosen_color` set to one of the four real colors; it is
    /// ignored for every other card. Emptying the hand wins immediately and
    /// skips the card's effect.
    pub fn play_card(
        &mut self,
        seats: &[PlayerId],
        player: PlayerId,
        hand_index: usize,
        chosen_color: Option<Color>,
    ) -> Result<PlayOutcome, Rejection> {
        let seat = self.require_turn(seats, player)?;
        let hand = self.hands.get(&player).ok_or(Rejection::NotInRoom(player))?;
        let mut card = *hand
            .get(hand_index)
            .ok_or(Rejection::NoSuchCard(hand_index))?;

        if !rules::is_legal_play(&card, self.top_card()) {
            return Err(Rejection::IllegalCard);
        }
        if card.is_wild() {
            match chosen_color {
                Some(color) if color.is_playable() => card.chosen_color = Some(color),
                _ => return Err(Rejection::MissingColor),
            }
        }

        // Validation done; from here on the play is committed.
        let hand = self.hands.entry(player).or_default();
        hand.remove(hand_index);
        let emptied = hand.is_empty();

        if !card.is_wild() {
            if let Some(previous) = self.discard_pile.last_mut() {
                if previous.chosen_color.is_some_and(|c| c != card.color) {
                    previous.chosen_color = None;
                }
            }
        }
        self.discard_pile.push(card);

        if emptied {
            tracing::debug!(%player, %card, "hand emptied");
            return Ok(PlayOutcome::Won { winner: player });
        }

        let effect =
            rules::resolve_play_effect(&card, seats.len(), seat, self.direction);
        if let Some(ForcedDraw { target, count }) = effect.forced_draw {
            self.force_draw(seats[target], count);
        }
        self.direction = effect.direction;
        self.current_player = effect.next_player;

        Ok(PlayOutcome::Continued)
    }

    /// Draws one card for `player`, who must have nothing playable.
    pub fn draw_card(
        &mut self,
        seats: &[PlayerId],
        player: PlayerId,
    ) -> Result<DrawOutcome, Rejection> {
        let seat = self.require_turn(seats, player)?;
        let top = *self.top_card();
        if rules::has_legal_play(self.hand(player), &top) {
            return Err(Rejection::MustPlay);
        }

        let Some(card) = self.take_from_draw_pile() else {
            tracing::debug!(%player, "draw pile empty, draw ignored");
            return Ok(DrawOutcome::PileEmpty);
        };

        let playable = rules::is_legal_play(&card, &top);
        self.hands.entry(player).or_default().push(card);
        if !playable {
            self.current_player =
                rules::advance(seat, seats.len(), self.direction, 1);
        }
        Ok(DrawOutcome::Drew { playable })
    }

    /// Takes the player at `leaving` out of the game. `seats` is the order
    /// *before* they are removed from it.
    ///
    /// Their cards go to the bottom of the draw pile, and the turn index is
    /// shifted so it keeps pointing at the same player (or, if the leaver
    /// held the turn, at whoever would have gone next).
    pub(crate) fn remove_seat(&mut self, seats: &[PlayerId], leaving: usize) {
        if let Some(mut cards) = self.hands.remove(&seats[leaving]) {
            cards.append(&mut self.draw_pile);
            self.draw_pile = cards;
        }

        let remaining = seats.len() - 1;
        if remaining == 0 {
            self.current_player = 0;
            return;
        }
        self.current_player = match leaving.cmp(&self.current_player) {
            Ordering::Less => self.current_player - 1,
            Ordering::Greater => self.current_player,
            Ordering::Equal => match self.direction {
                Direction::Clockwise => leaving % remaining,
                Direction::CounterClockwise => (leaving + remaining - 1) % remaining,
            },
        };
    }

    // -- Internals --------------------------------------------------------

    /// Returns `player`'s seat if it is their turn.
    fn require_turn(
        &self,
        seats: &[PlayerId],
        player: PlayerId,
    ) -> Result<usize, Rejection> {
        let seat = seats
            .iter()
            .position(|&id| id == player)
            .ok_or(Rejection::NotInRoom(player))?;
        if seat != self.current_player {
            return Err(Rejection::NotYourTurn);
        }
        Ok(seat)
    }

    /// Moves up to `count` cards onto `victim`. A short pile is not an error.
    fn force_draw(&mut self, victim: PlayerId, count: usize) {
        let mut drawn = 0;
        while drawn < count {
            let Some(card) = self.take_from_draw_pile() else {
                break;
            };
            self.hands.entry(victim).or_default().push(card);
            drawn += 1;
        }
        tracing::debug!(%victim, requested = count, drawn, "forced draw");
    }

    fn take_from_draw_pile(&mut self) -> Option<Card> {
        if self.draw_pile.is_empty() && self.recycle_discard {
            self.recycle_discard_pile();
        }
        self.draw_pile.pop()
    }

    /// Shuffles everything under the top discard back into the draw pile.
    fn recycle_discard_pile(&mut self) {
        let Some(top) = self.discard_pile.pop() else {
            return;
        };
        let mut recycled: Vec<Card> = self
            .discard_pile
            .drain(..)
            .map(|mut card| {
                card.chosen_color = None;
                card
            })
            .collect();
        recycled.shuffle(&mut self.rng);
        self.draw_pile = recycled;
        self.discard_pile.push(top);
        tracing::debug!(cards = self.draw_pile.len(), "discard pile recycled");
    }
}

/// Turns up cards from the top of `draw_pile` until a colored number
/// appears and returns it. Cards turned up before it move to the bottom of
/// the pile, in the order they sat.
fn seed_discard(draw_pile: &mut Vec<Card>) -> Option<Card> {
    let pos = draw_pile.iter().rposition(Card::is_colored_number)?;
    let mut reordered: Vec<Card> = draw_pile.drain(pos + 1..).collect();
    let first = draw_pile.pop()?;
    reordered.append(draw_pile);
    *draw_pile = reordered;
    Some(first)
}
