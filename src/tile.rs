//! Pyramid tile identifiers and the closed-form neighbor formulas.
//!
//! The pyramid is five concentric rings: `E` (32 tiles) at the base up to
//! the single apex tile `A1`. Tiles are immutable identifiers written in
//! the external notation `E24`, `B3`, `A1`; everything mutable (blocked,
//! cleared, items) lives in the board and search state.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SolverError;

/// Pyramid level, base to apex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    E,
    D,
    C,
    B,
    A,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::E, Level::D, Level::C, Level::B, Level::A];

    /// Number of tiles in this ring.
    pub fn width(self) -> u8 {
        match self {
            Level::E => 32,
            Level::D => 16,
            Level::C => 8,
            Level::B => 4,
            Level::A => 1,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Level::E => 'E',
            Level::D => 'D',
            Level::C => 'C',
            Level::B => 'B',
            Level::A => 'A',
        }
    }

    pub fn from_letter(c: char) -> Option<Level> {
        match c {
            'E' => Some(Level::E),
            'D' => Some(Level::D),
            'C' => Some(Level::C),
            'B' => Some(Level::B),
            'A' => Some(Level::A),
            _ => None,
        }
    }

    /// Next level toward the apex, if any.
    pub fn inward(self) -> Option<Level> {
        match self {
            Level::E => Some(Level::D),
            Level::D => Some(Level::C),
            Level::C => Some(Level::B),
            Level::B => Some(Level::A),
            Level::A => None,
        }
    }

    /// Next level toward the base, if any.
    pub fn outward(self) -> Option<Level> {
        match self {
            Level::A => Some(Level::B),
            Level::B => Some(Level::C),
            Level::C => Some(Level::D),
            Level::D => Some(Level::E),
            Level::E => None,
        }
    }

    /// Offset of this ring's first tile in the 0..61 flat ordering.
    fn ordinal_base(self) -> u8 {
        match self {
            Level::E => 0,
            Level::D => 32,
            Level::C => 48,
            Level::B => 56,
            Level::A => 60,
        }
    }
}

/// A single pyramid tile, identified by ring and 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile {
    pub level: Level,
    pub index: u8,
}

/// The unique apex tile.
pub const APEX: Tile = Tile {
    level: Level::A,
    index: 1,
};

/// Total number of tiles in the pyramid (32+16+8+4+1).
pub const TILE_COUNT: usize = 61;

impl Tile {
    /// Build a tile, rejecting out-of-range indices.
    pub fn new(level: Level, index: u8) -> Result<Tile, SolverError> {
        if index < 1 || index > level.width() {
            return Err(SolverError::InvalidTile(format!(
                "{}{}",
                level.letter(),
                index
            )));
        }
        Ok(Tile { level, index })
    }

    /// Flat 0..61 ordinal, used for deterministic tie-breaking.
    pub fn ordinal(self) -> u8 {
        self.level.ordinal_base() + self.index - 1
    }

    pub fn is_apex(self) -> bool {
        self == APEX
    }

    pub fn is_base(self) -> bool {
        self.level == Level::E
    }

    /// Next tile counter-clockwise around this ring (index−1, wrapping).
    pub fn counter_clockwise(self) -> Tile {
        let n = self.level.width();
        let index = if self.index == 1 { n } else { self.index - 1 };
        Tile {
            level: self.level,
            index,
        }
    }

    /// Next tile clockwise around this ring (index+1, wrapping).
    pub fn clockwise(self) -> Tile {
        let n = self.level.width();
        let index = if self.index == n { 1 } else { self.index + 1 };
        Tile {
            level: self.level,
            index,
        }
    }

    /// Tile one level toward the apex.
    ///
    /// Rings E, D, C halve the index (`⌈index/2⌉`). Every B tile maps to
    /// the apex directly: the apex has one tile, not two, so the halving
    /// formula does not apply at the B/A boundary.
    pub fn inward(self) -> Option<Tile> {
        let level = self.level.inward()?;
        if level == Level::A {
            return Some(APEX);
        }
        Some(Tile {
            level,
            index: (self.index + 1) / 2,
        })
    }

    /// The two (or, from the apex, four) tiles one level toward the base.
    ///
    /// Rings B, C, D double the index: left child `2·index−1`, right child
    /// `2·index`. The apex connects outward to all four B tiles, not just
    /// the two the doubling formula would give.
    pub fn outward(self) -> OutwardTiles {
        match self.level.outward() {
            None => OutwardTiles::None,
            Some(Level::B) => OutwardTiles::Apex,
            Some(level) => OutwardTiles::Pair(
                Tile {
                    level,
                    index: 2 * self.index - 1,
                },
                Tile {
                    level,
                    index: 2 * self.index,
                },
            ),
        }
    }

    /// Left outward tile (`2·index−1`), if this is not the base or the apex.
    pub fn outward_left(self) -> Option<Tile> {
        match self.outward() {
            OutwardTiles::Pair(left, _) => Some(left),
            _ => None,
        }
    }

    /// Right outward tile (`2·index`), if this is not the base or the apex.
    pub fn outward_right(self) -> Option<Tile> {
        match self.outward() {
            OutwardTiles::Pair(_, right) => Some(right),
            _ => None,
        }
    }

    /// All tiles of the pyramid in ordinal order.
    pub fn all() -> impl Iterator<Item = Tile> {
        Level::ALL.into_iter().flat_map(|level| {
            (1..=level.width()).map(move |index| Tile { level, index })
        })
    }
}

/// Outward adjacency of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutwardTiles {
    /// Base-level tile: no level below.
    None,
    /// Ordinary tile: left and right children on the next ring out.
    Pair(Tile, Tile),
    /// The apex: connects to all four B tiles.
    Apex,
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.level.letter(), self.index)
    }
}

impl FromStr for Tile {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Tile, SolverError> {
        let invalid = || SolverError::InvalidTile(s.to_string());
        let mut chars = s.chars();
        let level = chars
            .next()
            .and_then(Level::from_letter)
            .ok_or_else(invalid)?;
        let rest = chars.as_str();
        if rest.is_empty() || rest.starts_with('0') || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let index: u8 = rest.parse().map_err(|_| invalid())?;
        Tile::new(level, index).map_err(|_| invalid())
    }
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Tile, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_closure() {
        // Walking a full ring in either direction returns to the start.
        for tile in Tile::all() {
            let n = tile.level.width();
            let mut cw = tile;
            let mut ccw = tile;
            for _ in 0..n {
                cw = cw.clockwise();
                ccw = ccw.counter_clockwise();
            }
            assert_eq!(cw, tile);
            assert_eq!(ccw, tile);
        }
    }

    #[test]
    fn test_around_neighbors_differ() {
        for tile in Tile::all() {
            if tile.level.width() > 1 {
                assert_ne!(tile.clockwise(), tile);
                assert_ne!(tile.counter_clockwise(), tile);
            } else {
                // The apex ring wraps onto itself.
                assert_eq!(tile.clockwise(), tile);
            }
        }
    }

    #[test]
    fn test_inward_formula() {
        assert_eq!(
            "E1".parse::<Tile>().unwrap().inward(),
            Some("D1".parse().unwrap())
        );
        assert_eq!(
            "E2".parse::<Tile>().unwrap().inward(),
            Some("D1".parse().unwrap())
        );
        assert_eq!(
            "E32".parse::<Tile>().unwrap().inward(),
            Some("D16".parse().unwrap())
        );
        assert_eq!(
            "D7".parse::<Tile>().unwrap().inward(),
            Some("C4".parse().unwrap())
        );
        assert_eq!(
            "C8".parse::<Tile>().unwrap().inward(),
            Some("B4".parse().unwrap())
        );
    }

    #[test]
    fn test_apex_boundary_overrides() {
        // Every B tile goes inward to the apex.
        for index in 1..=4 {
            let b = Tile::new(Level::B, index).unwrap();
            assert_eq!(b.inward(), Some(APEX));
        }
        assert_eq!(APEX.inward(), None);

        // The apex goes outward to all four B tiles.
        assert_eq!(APEX.outward(), OutwardTiles::Apex);
        assert_eq!(APEX.outward_left(), None);
        assert_eq!(APEX.outward_right(), None);
    }

    #[test]
    fn test_base_has_no_outward() {
        for index in 1..=32 {
            let e = Tile::new(Level::E, index).unwrap();
            assert_eq!(e.outward(), OutwardTiles::None);
        }
    }

    #[test]
    fn test_inward_outward_inverse() {
        // Away from the A/B boundary, each tile's outward pair are exactly
        // the two tiles that map inward to it.
        for tile in Tile::all() {
            if let OutwardTiles::Pair(left, right) = tile.outward() {
                assert_eq!(left.inward(), Some(tile));
                assert_eq!(right.inward(), Some(tile));
                assert_eq!(right.index, left.index + 1);
            }
        }
        // And exhaustively: every interior tile has exactly two inward
        // preimages.
        for tile in Tile::all() {
            if tile.level == Level::E || tile.level == Level::A {
                continue;
            }
            let preimages: Vec<Tile> = Tile::all().filter(|t| t.inward() == Some(tile)).collect();
            assert_eq!(preimages.len(), 2, "preimages of {}", tile);
        }
        // All four B tiles are preimages of the apex.
        let apex_preimages: Vec<Tile> =
            Tile::all().filter(|t| t.inward() == Some(APEX)).collect();
        assert_eq!(apex_preimages.len(), 4);
    }

    #[test]
    fn test_ordinals_are_dense() {
        let ordinals: Vec<u8> = Tile::all().map(Tile::ordinal).collect();
        assert_eq!(ordinals.len(), TILE_COUNT);
        for (expected, ordinal) in ordinals.into_iter().enumerate() {
            assert_eq!(ordinal as usize, expected);
        }
    }

    #[test]
    fn test_notation_round_trip() {
        for tile in Tile::all() {
            let parsed: Tile = tile.to_string().parse().unwrap();
            assert_eq!(parsed, tile);
        }
    }

    #[test]
    fn test_notation_rejects_malformed() {
        for bad in ["", "F1", "A2", "B5", "C9", "D17", "E33", "E0", "E", "e4", "D03", "B1x"] {
            assert!(bad.parse::<Tile>().is_err(), "accepted {:?}", bad);
        }
    }
}
