//! Search states and legal-transition enumeration.
//!
//! A search state is the current tile plus everything the run has changed
//! so far: which collectibles were taken and which blocked tiles were
//! cleared, each as a bitmask over the board's config-order lists.
//! Inventory (key, ladder, remaining dynamite charges) is derived from the
//! collected mask, so a spent dynamite tile can never be re-collected.
//! States are immutable values; transitions always produce a new state.

use smallvec::SmallVec;

use crate::board::{Board, ItemKind};
use crate::error::SolverError;
use crate::tile::{OutwardTiles, Tile, APEX};

/// Movement-point cost of an around or outward move.
const STEP_COST: u32 = 1;
/// Movement-point cost of an inward move without the ladder.
const CLIMB_COST: u32 = 2;

/// One node of the augmented state graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchState {
    pub tile: Tile,
    /// Bit i set: collectible i (board config order) has been taken.
    pub collected: u64,
    /// Bit i set: blocked tile i (board config order) has been cleared.
    pub cleared: u64,
}

impl SearchState {
    /// The start state: standing on the start tile with nothing collected
    /// or cleared, except an item hosted by the start tile itself, which
    /// is picked up on arrival.
    pub fn initial(board: &Board) -> SearchState {
        let mut collected = 0u64;
        if let Some(idx) = board.collectible_index(board.start()) {
            collected |= 1 << idx;
        }
        SearchState {
            tile: board.start(),
            collected,
            cleared: 0,
        }
    }

    pub fn has_key(&self, board: &Board) -> bool {
        self.has_kind(board, ItemKind::Key)
    }

    pub fn has_ladder(&self, board: &Board) -> bool {
        self.has_kind(board, ItemKind::Ladder)
    }

    fn has_kind(&self, board: &Board, kind: ItemKind) -> bool {
        board
            .collectibles()
            .iter()
            .enumerate()
            .any(|(i, c)| c.kind == kind && self.collected & (1 << i) != 0)
    }

    /// Unspent dynamite charges: collected dynamite tiles minus cleared
    /// tiles. Errors if the books don't balance, which would mean a
    /// transition bug.
    pub fn dynamite_charges(&self, board: &Board) -> Result<u32, SolverError> {
        let collected = board
            .collectibles()
            .iter()
            .enumerate()
            .filter(|(i, c)| c.kind == ItemKind::Dynamite && self.collected & (1 << i) != 0)
            .count() as u32;
        collected
            .checked_sub(self.cleared.count_ones())
            .ok_or_else(|| {
                SolverError::InvariantViolation(format!(
                    "negative dynamite balance at {}: {} collected, {} spent",
                    self.tile,
                    collected,
                    self.cleared.count_ones()
                ))
            })
    }

    /// Whether the run is finished: standing on the apex with the key.
    pub fn is_goal(&self, board: &Board) -> bool {
        self.tile == APEX && self.has_key(board)
    }
}

/// What a single transition did, recorded for the trace builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub to: Tile,
    /// Item picked up on arrival, if the destination hosted an unowned one.
    pub pickup: Option<ItemKind>,
    /// True if entering the destination consumed a dynamite charge.
    pub cleared: bool,
}

/// A legal outgoing edge: cost in MP, the resulting state, and the step
/// record.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub cost: u32,
    pub state: SearchState,
    pub step: Step,
}

/// Enumerate the legal transitions out of a state, in a fixed order
/// (counter-clockwise, clockwise, inward, outward left then right; from
/// the apex, the four B tiles in index order). Pure in the state and the
/// immutable board.
pub fn successors(
    state: &SearchState,
    board: &Board,
) -> Result<SmallVec<[Transition; 5]>, SolverError> {
    let charges = state.dynamite_charges(board)?;
    let ladder = state.has_ladder(board);
    let key = state.has_key(board);

    let mut candidates: SmallVec<[(Tile, u32); 5]> = SmallVec::new();
    let inward_cost = if ladder { STEP_COST } else { CLIMB_COST };

    // The apex ring wraps onto itself; skip the degenerate self-moves.
    let ccw = state.tile.counter_clockwise();
    if ccw != state.tile {
        candidates.push((ccw, STEP_COST));
        candidates.push((state.tile.clockwise(), STEP_COST));
    }
    if let Some(inner) = state.tile.inward() {
        candidates.push((inner, inward_cost));
    }
    match state.tile.outward() {
        OutwardTiles::None => {}
        OutwardTiles::Pair(left, right) => {
            candidates.push((left, STEP_COST));
            candidates.push((right, STEP_COST));
        }
        OutwardTiles::Apex => {
            for tile in APEX_OUTWARD {
                candidates.push((tile, STEP_COST));
            }
        }
    }

    let mut transitions = SmallVec::new();
    for (to, cost) in candidates {
        if cost == 0 {
            return Err(SolverError::InvariantViolation(format!(
                "zero-cost move {} -> {}",
                state.tile, to
            )));
        }

        // Entering the apex requires the key, blocked or not.
        if to == APEX && !key {
            continue;
        }

        let mut next = SearchState {
            tile: to,
            collected: state.collected,
            cleared: state.cleared,
        };
        let mut cleared = false;

        if board.is_blocked(to) {
            let idx = board.blocked_index(to).ok_or_else(|| {
                SolverError::InvariantViolation(format!("blocked tile {} not indexed", to))
            })?;
            if next.cleared & (1 << idx) == 0 {
                // Clearing and entering are one atomic transition.
                if charges == 0 {
                    continue;
                }
                next.cleared |= 1 << idx;
                cleared = true;
            }
        }

        let mut pickup = None;
        if let Some(idx) = board.collectible_index(to) {
            if next.collected & (1 << idx) == 0 {
                next.collected |= 1 << idx;
                pickup = board.item_at(to);
            }
        }

        transitions.push(Transition {
            cost,
            state: next,
            step: Step {
                to,
                pickup,
                cleared,
            },
        });
    }

    Ok(transitions)
}

/// The apex's outward neighbors, in tile-id order.
const APEX_OUTWARD: [Tile; 4] = [
    Tile {
        level: crate::tile::Level::B,
        index: 1,
    },
    Tile {
        level: crate::tile::Level::B,
        index: 2,
    },
    Tile {
        level: crate::tile::Level::B,
        index: 3,
    },
    Tile {
        level: crate::tile::Level::B,
        index: 4,
    },
];
