//! Card shape: colors, kinds, and the `Card` value itself.
//!
//! Cards are plain `Copy` values compared structurally. Nothing in the
//! engine tracks card identity, only where a card currently sits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A card color. `Black` is reserved for wild cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Black,
}

impl Color {
    /// The four colors a player can match on or choose for a wild.
    pub const PLAYABLE: [Color; 4] =
        [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    /// Returns `true` for every color except `Black`.
    pub fn is_playable(self) -> bool {
        !matches!(self, Color::Black)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Black => "black",
        };
        f.write_str(name)
    }
}

/// What a card does when played.
///
/// Serialized in lowercase (`"draw2"`, `"wild4"`), matching the `type`
/// field clients already understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Number,
    Skip,
    Reverse,
    Draw2,
    Wild,
    Wild4,
}

impl CardKind {
    /// The three colored action kinds.
    pub const ACTIONS: [CardKind; 3] =
        [CardKind::Skip, CardKind::Reverse, CardKind::Draw2];

    /// Returns `true` for `Wild` and `Wild4`.
    pub fn is_wild(self) -> bool {
        matches!(self, Self::Wild | Self::Wild4)
    }
}

/// A single card.
///
/// `value` is set only for number cards. `chosen_color` is set only on a
/// wild that has been played, and overrides `color` for matching while that
/// card is the visible top of the discard pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub color: Color,
    #[serde(rename = "type")]
    pub kind: CardKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_color: Option<Color>,
}

impl Card {
    /// A colored number card.
    pub fn number(color: Color, value: u8) -> Self {
        debug_assert!(value <= 9, "number cards run from 0 to 9");
        Self {
            color,
            kind: CardKind::Number,
            value: Some(value),
            chosen_color: None,
        }
    }

    /// A colored skip, reverse or draw-two.
    pub fn action(color: Color, kind: CardKind) -> Self {
        debug_assert!(CardKind::ACTIONS.contains(&kind));
        Self {
            color,
            kind,
            value: None,
            chosen_color: None,
        }
    }

    /// A black wild or wild-draw-four, with no color chosen yet.
    pub fn wild(kind: CardKind) -> Self {
        debug_assert!(kind.is_wild());
        Self {
            color: Color::Black,
            kind,
            value: None,
            chosen_color: None,
        }
    }

    /// The color used for matching: the chosen color of a played wild,
    /// otherwise the printed color.
    pub fn effective_color(&self) -> Color {
        self.chosen_color.unwrap_or(self.color)
    }

    pub fn is_wild(&self) -> bool {
        self.kind.is_wild()
    }

    /// Returns `true` for colored number cards, the only cards allowed to
    /// open the discard pile.
    pub fn is_colored_number(&self) -> bool {
        self.kind == CardKind::Number && self.color.is_playable()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.value) {
            (CardKind::Number, Some(v)) => write!(f, "{} {v}", self.color),
            (CardKind::Number, None) => write!(f, "{} ?", self.color),
            (CardKind::Skip, _) => write!(f, "{} skip", self.color),
            (CardKind::Reverse, _) => write!(f, "{} reverse", self.color),
            (CardKind::Draw2, _) => write!(f, "{} draw2", self.color),
            (CardKind::Wild, _) | (CardKind::Wild4, _) => {
                let name = if self.kind == CardKind::Wild { "wild" } else { "wild4" };
                match self.chosen_color {
                    Some(chosen) => write!(f, "{name} ({chosen})"),
                    None => f.write_str(name),
                }
            }
        }
    }
}
