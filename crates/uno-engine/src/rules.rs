//! Stateless card rules: legality checks and play-effect resolution.
//!
//! Nothing here touches a `Game`. The engine feeds these functions the
//! cards and turn position it holds and applies whatever they return.

use serde::{Deserialize, Serialize};

use crate::{Card, CardKind};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Turn direction through the room's player order.
///
/// On the wire this is `1` (clockwise, increasing index) or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    /// `+1` or `-1`.
    pub fn sign(self) -> i8 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.sign()
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Clockwise),
            -1 => Ok(Self::CounterClockwise),
            other => Err(format!("direction must be 1 or -1, got {other}")),
        }
    }
}

/// Moves `steps` seats from `from` around a table of `seats` players.
///
/// `seats` must be non-zero.
pub fn advance(from: usize, seats: usize, direction: Direction, steps: usize) -> usize {
    debug_assert!(seats > 0);
    let seats_i = seats as isize;
    let offset = (steps % seats) as isize * direction.sign() as isize;
    (from as isize + offset).rem_euclid(seats_i) as usize
}

// ---------------------------------------------------------------------------
// Legality
// ---------------------------------------------------------------------------

/// Returns `true` if `card` may be played on top of `top`.
///
/// In order: a match on the top's effective color; any wild; the top's
/// printed color; equal numbers; equal action kinds.
pub fn is_legal_play(card: &Card, top: &Card) -> bool {
    if card.color == top.effective_color() {
        return true;
    }
    if card.is_wild() {
        return true;
    }
    if card.color == top.color {
        return true;
    }
    match (card.kind, top.kind) {
        (CardKind::Number, CardKind::Number) => card.value == top.value,
        (CardKind::Number, _) => false,
        (kind, top_kind) => kind == top_kind,
    }
}

/// Returns `true` if any card in `hand` is playable on `top`.
pub fn has_legal_play(hand: &[Card], top: &Card) -> bool {
    hand.iter().any(|card| is_legal_play(card, top))
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Cards pushed onto another player as a side effect of a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedDraw {
    /// Seat index of the player who must draw.
    pub target: usize,
    /// How many cards they draw (fewer if the pile runs short).
    pub count: usize,
}

/// The turn state after a card resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayEffect {
    pub direction: Direction,
    pub next_player: usize,
    pub forced_draw: Option<ForcedDraw>,
}

/// Resolves the turn change caused by `card` being played from seat
/// `player_index` at a table of `seats` players moving in `direction`.
///
/// | kind    | advance | side effect                  |
/// |---------|---------|------------------------------|
/// | number  | 1       |                              |
/// | skip    | 2       |                              |
/// | reverse | 1       | flips direction; 2 seats → 2 |
/// | draw2   | 2       | next seat draws 2            |
/// | wild    | 1       |                              |
/// | wild4   | 2       | next seat draws 4            |
///
/// The forced-draw target is the next seat in the direction the turn was
/// already moving.
pub fn resolve_play_effect(
    card: &Card,
    seats: usize,
    player_index: usize,
    direction: Direction,
) -> PlayEffect {
    let next_seat = advance(player_index, seats, direction, 1);

    let (direction, steps, forced_draw) = match card.kind {
        CardKind::Number | CardKind::Wild => (direction, 1, None),
        CardKind::Skip => (direction, 2, None),
        CardKind::Reverse => {
            // With two players a reverse hands the turn straight back.
            let steps = if seats == 2 { 2 } else { 1 };
            (direction.reversed(), steps, None)
        }
        CardKind::Draw2 => (
            direction,
            2,
            Some(ForcedDraw { target: next_seat, count: 2 }),
        ),
        CardKind::Wild4 => (
            direction,
            2,
            Some(ForcedDraw { target: next_seat, count: 4 }),
        ),
    };

    PlayEffect {
        direction,
        next_player: advance(player_index, seats, direction, steps),
        forced_draw,
    }
}
