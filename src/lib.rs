//! Minimum-MP route solver for the five-level pyramid puzzle.
//!
//! This crate computes the cheapest Movement-Point route from a base tile
//! to the apex, honoring the key precondition for entering the apex and
//! the permanent effects of Key, Ladder, and Dynamite pickups. The board
//! is an immutable value; all mutation during a run lives in the search
//! state that is threaded through a uniform-cost search.

pub mod board;
pub mod error;
pub mod graph;
pub mod solver;
pub mod tile;
pub mod trace;

// Re-export main types
pub use board::{Board, BoardConfig, Collectible, ItemKind};
pub use error::SolverError;
pub use graph::{successors, SearchState, Step, Transition};
pub use solver::{solve, SolverConfig, SolverResult};
pub use tile::{Level, OutwardTiles, Tile, APEX, TILE_COUNT};
pub use trace::{build_route, Route, TraceElement};
