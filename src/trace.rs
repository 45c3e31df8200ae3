//! Route representation and the pipe-delimited path notation.
//!
//! A route is one element per visited tile: a bare tile ID for a plain
//! move, `TILE:item` when the visit picked something up, `clear:TILE`
//! when entering the tile consumed a dynamite charge. Clearing and the
//! move into the cleared tile are one combined element. The start tile
//! comes first, tagged only if it hosted an item itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, ItemKind};
use crate::error::SolverError;
use crate::graph::{SearchState, Step};
use crate::tile::Tile;

/// One element of the external path notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "action")]
pub enum TraceElement {
    /// Plain visit: `E5`.
    Move { tile: Tile },
    /// Visit that picked up an item: `D10:key`.
    Collect { tile: Tile, item: ItemKind },
    /// Visit that consumed a charge to enter: `clear:C2`.
    Clear { tile: Tile },
}

impl TraceElement {
    pub fn tile(&self) -> Tile {
        match *self {
            TraceElement::Move { tile }
            | TraceElement::Collect { tile, .. }
            | TraceElement::Clear { tile } => tile,
        }
    }
}

impl fmt::Display for TraceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TraceElement::Move { tile } => write!(f, "{}", tile),
            TraceElement::Collect { tile, item } => write!(f, "{}:{}", tile, item),
            TraceElement::Clear { tile } => write!(f, "clear:{}", tile),
        }
    }
}

/// A complete route from the start tile to the apex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub elements: Vec<TraceElement>,
    pub total_mp: u32,
}

impl Route {
    /// The pipe-delimited notation, e.g. `E5|E6:ladder|D3:key|clear:C2|...`.
    pub fn notation(&self) -> String {
        let parts: Vec<String> = self.elements.iter().map(|e| e.to_string()).collect();
        parts.join("|")
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

/// Assemble a route from the start state and the forward step sequence.
/// Pure; performs no search logic, only translation into notation.
pub fn build_route(
    board: &Board,
    initial: &SearchState,
    steps: &[Step],
    total_mp: u32,
) -> Result<Route, SolverError> {
    let mut elements = Vec::with_capacity(steps.len() + 1);

    // The start tile's own item, if any, was seeded into the initial
    // inventory; surface it on the first element.
    let start_item = board
        .collectible_index(initial.tile)
        .filter(|&i| initial.collected & (1 << i) != 0)
        .and_then(|_| board.item_at(initial.tile));
    elements.push(match start_item {
        Some(item) => TraceElement::Collect {
            tile: initial.tile,
            item,
        },
        None => TraceElement::Move { tile: initial.tile },
    });

    for step in steps {
        let element = match (step.cleared, step.pickup) {
            (true, Some(_)) => {
                // Board validation forbids items on blocked tiles.
                return Err(SolverError::InvariantViolation(format!(
                    "cleared tile {} also produced a pickup",
                    step.to
                )));
            }
            (true, None) => TraceElement::Clear { tile: step.to },
            (false, Some(item)) => TraceElement::Collect {
                tile: step.to,
                item,
            },
            (false, None) => TraceElement::Move { tile: step.to },
        };
        elements.push(element);
    }

    Ok(Route { elements, total_mp })
}
