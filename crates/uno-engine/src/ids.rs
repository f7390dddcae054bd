//! Identity types shared by every layer: players and room codes.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A unique identifier for a connected player.
///
/// Assigned by the server when a connection is accepted and stable for the
/// lifetime of that connection. `#[serde(transparent)]` keeps it a plain
/// number on the wire (`42`, not `{"0":42}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Characters a room code is drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A human-typable room code: six uppercase alphanumeric characters.
///
/// The server builds codes through [`RoomCode::generate`] and accepts client
/// input only through [`RoomCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Number of characters in a code.
    pub const LEN: usize = 6;

    /// Draws a random code. Uniqueness among live rooms is the registry's
    /// job; this only produces a well-formed candidate.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..Self::LEN)
            .map(|_| {
                let idx = rng.random_range(0..CODE_ALPHABET.len());
                char::from(CODE_ALPHABET[idx])
            })
            .collect();
        Self(code)
    }

    /// Normalizes user input (surrounding whitespace, lowercase) into a
    /// code. Returns `None` if the result is not six alphanumerics.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim().to_ascii_uppercase();
        let well_formed = code.len() == Self::LEN
            && code.bytes().all(|b| CODE_ALPHABET.contains(&b));
        well_formed.then_some(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
