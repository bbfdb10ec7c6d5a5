//! Cube-coordinate hex identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseHexError;

/// A hex on the board, in cube coordinates.
///
/// Serializes as its string key (`"q,r,s"`), so boards keyed by `HexId`
/// serialize as plain string-keyed maps.
///
/// ```
/// use hexbots::hex::HexId;
///
/// let hex = HexId::new(1, -1);
/// assert_eq!(hex.s(), 0);
/// assert_eq!(hex.to_string(), "1,-1,0");
/// assert_eq!("1,-1,0".parse::<HexId>().unwrap(), hex);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HexId {
    q: i32,
    r: i32,
    s: i32,
}

impl HexId {
    /// Create a hex from its axial `q` and `r` coordinates.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Create a hex from full cube coordinates.
    ///
    /// Returns `None` unless `q + r + s == 0`.
    #[must_use]
    pub const fn from_cube(q: i32, r: i32, s: i32) -> Option<Self> {
        if q + r + s == 0 {
            Some(Self { q, r, s })
        } else {
            None
        }
    }

    /// The origin hex (board center).
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }

    #[must_use]
    pub const fn q(self) -> i32 {
        self.q
    }

    #[must_use]
    pub const fn r(self) -> i32 {
        self.r
    }

    #[must_use]
    pub const fn s(self) -> i32 {
        self.s
    }

    /// Offset this hex by a cube direction.
    #[must_use]
    pub const fn offset(self, dq: i32, dr: i32) -> Self {
        Self::new(self.q + dq, self.r + dr)
    }

    /// Number of steps between two hexes, ignoring the board edge.
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s - other.s).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// Distance from the board center.
    #[must_use]
    pub fn length(self) -> u32 {
        self.distance(Self::origin())
    }
}

impl fmt::Display for HexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.q, self.r, self.s)
    }
}

impl FromStr for HexId {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(|part| part.trim().parse::<i32>());
        let (Some(Ok(q)), Some(Ok(r)), Some(Ok(c)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseHexError::Malformed(s.to_string()));
        };
        Self::from_cube(q, r, c).ok_or_else(|| ParseHexError::NotOnPlane(s.to_string()))
    }
}

impl From<HexId> for String {
    fn from(hex: HexId) -> Self {
        hex.to_string()
    }
}

impl TryFrom<String> for HexId {
    type Error = ParseHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
