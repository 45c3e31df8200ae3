//! Board: the fixed facts of one puzzle instance.
//!
//! A board is loaded once from a JSON config (blocked tiles, collectible
//! placement, start tile), validated, and never mutated afterward. Item
//! pickup and obstacle clearing are recorded per search state, never here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::tile::{Level, Tile};

/// Collectible kinds. At most one Key and one Ladder per board; Dynamite
/// may appear on several tiles (each grants one charge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Key,
    Ladder,
    Dynamite,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Key => "key",
            ItemKind::Ladder => "ladder",
            ItemKind::Dynamite => "dynamite",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One collectible placement in the config.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collectible {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub location: Tile,
}

/// The raw puzzle configuration as read from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub start: Tile,
    #[serde(default)]
    pub blocked: Vec<Tile>,
    #[serde(default)]
    pub collectibles: Vec<Collectible>,
}

/// A validated, immutable puzzle instance.
///
/// Blocked tiles and collectibles keep their config order; search state
/// refers to both lists by position (bitmask indices).
#[derive(Debug, Clone)]
pub struct Board {
    start: Tile,
    blocked: Vec<Tile>,
    collectibles: Vec<Collectible>,
}

impl Board {
    /// Validate a config and freeze it into a board. All MalformedBoard
    /// conditions surface here, before any search runs.
    pub fn new(config: BoardConfig) -> Result<Board, SolverError> {
        if config.start.level != Level::E {
            return Err(SolverError::StartNotOnBase(config.start));
        }

        let mut blocked: Vec<Tile> = Vec::new();
        for tile in config.blocked {
            if !blocked.contains(&tile) {
                blocked.push(tile);
            }
        }
        if blocked.contains(&config.start) {
            return Err(SolverError::StartBlocked(config.start));
        }

        for (i, item) in config.collectibles.iter().enumerate() {
            if blocked.contains(&item.location) {
                return Err(SolverError::ItemOnBlockedTile(item.location));
            }
            for earlier in &config.collectibles[..i] {
                if earlier.location == item.location {
                    return Err(SolverError::ItemCollision(item.location));
                }
                if earlier.kind == item.kind && item.kind != ItemKind::Dynamite {
                    return Err(SolverError::DuplicateItem {
                        kind: item.kind,
                        first: earlier.location,
                        second: item.location,
                    });
                }
            }
        }

        Ok(Board {
            start: config.start,
            blocked,
            collectibles: config.collectibles,
        })
    }

    pub fn start(&self) -> Tile {
        self.start
    }

    pub fn is_blocked(&self, tile: Tile) -> bool {
        self.blocked.contains(&tile)
    }

    /// Position of a tile in the blocked list, for the cleared bitmask.
    pub fn blocked_index(&self, tile: Tile) -> Option<usize> {
        self.blocked.iter().position(|&t| t == tile)
    }

    pub fn blocked_tiles(&self) -> &[Tile] {
        &self.blocked
    }

    pub fn item_at(&self, tile: Tile) -> Option<ItemKind> {
        self.collectibles
            .iter()
            .find(|c| c.location == tile)
            .map(|c| c.kind)
    }

    /// Position of a tile's collectible in the list, for the collected
    /// bitmask.
    pub fn collectible_index(&self, tile: Tile) -> Option<usize> {
        self.collectibles.iter().position(|c| c.location == tile)
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    /// Total dynamite charges available anywhere on the board.
    pub fn dynamite_count(&self) -> usize {
        self.collectibles
            .iter()
            .filter(|c| c.kind == ItemKind::Dynamite)
            .count()
    }
}
