//! Error types for board validation and the search engine.
//!
//! Infeasibility ("no route to the apex") is a normal solver outcome, not
//! an error; these variants cover malformed inputs and internal bugs only.

use thiserror::Error;

use crate::board::ItemKind;
use crate::tile::Tile;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolverError {
    /// A tile string that does not name a pyramid tile (`E1`..`A1`).
    #[error("invalid tile id: {0}")]
    InvalidTile(String),

    /// The start tile must be on the base ring E.
    #[error("start tile {0} is not on the base level")]
    StartNotOnBase(Tile),

    /// Standing on a blocked tile is never legal, including at the start.
    #[error("start tile {0} is blocked")]
    StartBlocked(Tile),

    /// Key and Ladder are unique; a second placement is ambiguous.
    #[error("item {kind} placed on more than one tile ({first} and {second})")]
    DuplicateItem {
        kind: ItemKind,
        first: Tile,
        second: Tile,
    },

    /// A tile may host at most one collectible.
    #[error("tile {0} hosts more than one collectible")]
    ItemCollision(Tile),

    /// Blocked tiles cannot host items; the rules leave that undefined.
    #[error("blocked tile {0} also hosts an item")]
    ItemOnBlockedTile(Tile),

    /// A search-internal contradiction (bad cost, negative charge count,
    /// state explosion past the theoretical bound). Fatal, never retried.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}
