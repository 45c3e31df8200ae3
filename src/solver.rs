//! Uniform-cost search over the pyramid state graph.
//!
//! Classic Dijkstra with a closed set, run over (tile, collected, cleared)
//! states rather than bare tiles. All edge costs are 1 or 2 MP, so the
//! usual non-negative-edge optimality argument applies. Tie-breaking
//! between equal-cost frontier entries is lowest destination tile ID
//! first, then insertion order, so output is reproducible.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

use log::debug;

use crate::board::Board;
use crate::error::SolverError;
use crate::graph::{successors, SearchState, Step};
use crate::tile::TILE_COUNT;
use crate::trace::{build_route, Route};

/// Configuration for the search.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Hard ceiling on distinct states, on top of the per-board bound.
    pub max_states: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_states: 1_000_000,
        }
    }
}

/// Result of a search run. An absent route means the board is infeasible;
/// that is a normal outcome, not an error.
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub route: Option<Route>,
    pub states_expanded: usize,
    pub time_elapsed_ms: u64,
}

/// Frontier entry. Derived ordering is lexicographic over (cost, tile,
/// sequence); wrapped in `Reverse` to turn the max-heap into a min-heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Node {
    cost: u32,
    tile_ord: u8,
    seq: u64,
    state_idx: usize,
}

/// Theoretical state-count ceiling for a board: tiles × key × ladder ×
/// charge levels × cleared subsets. A search that grows past this has a
/// transition bug, not a big board.
fn state_bound(board: &Board) -> usize {
    let cleared_subsets = 1usize
        .checked_shl(board.blocked_tiles().len() as u32)
        .unwrap_or(usize::MAX);
    (TILE_COUNT * 4)
        .saturating_mul(board.dynamite_count() + 1)
        .saturating_mul(cleared_subsets)
}

/// Find the minimum-MP route from the board's start tile to the apex with
/// the key in hand.
pub fn solve(board: &Board, config: &SolverConfig) -> Result<SolverResult, SolverError> {
    let start_time = Instant::now();
    let bound = state_bound(board).min(config.max_states);

    let mut states: Vec<SearchState> = Vec::new();
    let mut index: HashMap<SearchState, usize> = HashMap::new();
    let mut dist: Vec<u32> = Vec::new();
    let mut parent: Vec<Option<(usize, Step)>> = Vec::new();
    let mut closed: Vec<bool> = Vec::new();

    let initial = SearchState::initial(board);
    states.push(initial);
    index.insert(initial, 0);
    dist.push(0);
    parent.push(None);
    closed.push(false);

    let mut heap: BinaryHeap<Reverse<Node>> = BinaryHeap::new();
    let mut seq: u64 = 0;
    heap.push(Reverse(Node {
        cost: 0,
        tile_ord: initial.tile.ordinal(),
        seq,
        state_idx: 0,
    }));

    let mut states_expanded = 0usize;

    while let Some(Reverse(node)) = heap.pop() {
        let idx = node.state_idx;
        if closed[idx] || node.cost > dist[idx] {
            continue;
        }
        closed[idx] = true;
        states_expanded += 1;

        let state = states[idx];
        if state.is_goal(board) {
            debug!(
                "goal reached at {} MP after {} expansions",
                node.cost, states_expanded
            );
            let route = reconstruct(board, &states, &parent, dist[idx], idx)?;
            return Ok(SolverResult {
                route: Some(route),
                states_expanded,
                time_elapsed_ms: start_time.elapsed().as_millis() as u64,
            });
        }

        for transition in successors(&state, board)? {
            let next_cost = node
                .cost
                .checked_add(transition.cost)
                .ok_or_else(|| SolverError::InvariantViolation("cost overflow".into()))?;

            let next_idx = match index.entry(transition.state) {
                Entry::Occupied(e) => {
                    let i = *e.get();
                    if closed[i] || next_cost >= dist[i] {
                        continue;
                    }
                    dist[i] = next_cost;
                    parent[i] = Some((idx, transition.step));
                    i
                }
                Entry::Vacant(e) => {
                    if states.len() >= bound {
                        return Err(SolverError::InvariantViolation(format!(
                            "state count exceeded bound {}",
                            bound
                        )));
                    }
                    let i = states.len();
                    e.insert(i);
                    states.push(transition.state);
                    dist.push(next_cost);
                    parent.push(Some((idx, transition.step)));
                    closed.push(false);
                    i
                }
            };

            seq += 1;
            heap.push(Reverse(Node {
                cost: next_cost,
                tile_ord: transition.state.tile.ordinal(),
                seq,
                state_idx: next_idx,
            }));
        }
    }

    debug!("frontier exhausted after {} expansions", states_expanded);
    Ok(SolverResult {
        route: None,
        states_expanded,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    })
}

/// Walk the parent chain from the goal back to the start and hand the
/// forward step sequence to the trace builder.
fn reconstruct(
    board: &Board,
    states: &[SearchState],
    parent: &[Option<(usize, Step)>],
    total_mp: u32,
    goal_idx: usize,
) -> Result<Route, SolverError> {
    let mut steps: Vec<Step> = Vec::new();
    let mut idx = goal_idx;
    while let Some((prev, step)) = parent[idx] {
        steps.push(step);
        idx = prev;
    }
    steps.reverse();
    build_route(board, &states[idx], &steps, total_mp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardConfig, Collectible, ItemKind};
    use crate::tile::Tile;

    fn tile(s: &str) -> Tile {
        s.parse().unwrap()
    }

    fn board(start: &str, blocked: &[&str], items: &[(ItemKind, &str)]) -> Board {
        Board::new(BoardConfig {
            start: tile(start),
            blocked: blocked.iter().map(|s| tile(s)).collect(),
            collectibles: items
                .iter()
                .map(|&(kind, loc)| Collectible {
                    kind,
                    location: tile(loc),
                })
                .collect(),
        })
        .unwrap()
    }

    fn solve_notation(board: &Board) -> (String, u32) {
        let result = solve(board, &SolverConfig::default()).unwrap();
        let route = result.route.expect("expected a feasible route");
        (route.notation(), route.total_mp)
    }

    #[test]
    fn test_straight_climb_with_key_en_route() {
        // E1 -> D1 (key) -> C1 -> B1 -> A1, four inward moves at 2 MP.
        let b = board("E1", &[], &[(ItemKind::Key, "D1")]);
        let (notation, mp) = solve_notation(&b);
        assert_eq!(notation, "E1|D1:key|C1|B1|A1");
        assert_eq!(mp, 8);
    }

    #[test]
    fn test_ladder_pickup_pays_for_itself() {
        // One around step to the ladder, then four climbs at 1 MP each
        // instead of 2: 5 MP total versus 8 for the direct climb.
        let b = board("E1", &[], &[(ItemKind::Key, "D1"), (ItemKind::Ladder, "E2")]);
        let (notation, mp) = solve_notation(&b);
        assert_eq!(notation, "E1|E2:ladder|D1:key|C1|B1|A1");
        assert_eq!(mp, 5);
    }

    #[test]
    fn test_dynamite_detour_and_single_clear() {
        // The whole B ring is walled off, so exactly one clear is forced;
        // the dynamite sits one around step aside of the start.
        let b = board(
            "E1",
            &["B1", "B2", "B3", "B4"],
            &[(ItemKind::Key, "D1"), (ItemKind::Dynamite, "E2")],
        );
        let (notation, mp) = solve_notation(&b);
        assert_eq!(notation, "E1|E2:dynamite|D1:key|C1|clear:B1|A1");
        // Detour 1 MP, then four inward climbs; the clear itself is free.
        assert_eq!(mp, 9);
        assert_eq!(notation.matches("clear:").count(), 1);
    }

    #[test]
    fn test_infeasible_without_key() {
        let b = board("E1", &[], &[]);
        let result = solve(&b, &SolverConfig::default()).unwrap();
        assert!(result.route.is_none());
        assert!(result.states_expanded > 0);
    }

    #[test]
    fn test_infeasible_key_walled_off() {
        // Every entrance to the key tile D1 (ring neighbors D2/D16,
        // inward from E1/E2, outward from C1) is blocked and no dynamite
        // exists anywhere.
        let b = board(
            "E5",
            &["D2", "D16", "E1", "E2", "C1"],
            &[(ItemKind::Key, "D1")],
        );
        let result = solve(&b, &SolverConfig::default()).unwrap();
        assert!(result.route.is_none());
    }

    #[test]
    fn test_infeasible_apex_blocked_no_dynamite() {
        let b = board("E1", &["A1"], &[(ItemKind::Key, "D1")]);
        let result = solve(&b, &SolverConfig::default()).unwrap();
        assert!(result.route.is_none());
    }

    #[test]
    fn test_blocked_apex_cleared_with_dynamite() {
        let b = board(
            "E1",
            &["A1"],
            &[(ItemKind::Key, "D1"), (ItemKind::Dynamite, "C1")],
        );
        let (notation, mp) = solve_notation(&b);
        assert_eq!(notation, "E1|D1:key|C1:dynamite|B1|clear:A1");
        assert_eq!(mp, 8);
    }

    #[test]
    fn test_deterministic_output() {
        let b = board("E1", &[], &[(ItemKind::Key, "D1")]);
        let first = solve_notation(&b);
        for _ in 0..5 {
            assert_eq!(solve_notation(&b), first);
        }
    }

    #[test]
    fn test_cost_accounting_without_ladder() {
        // One around step plus four inward climbs at 2 MP each.
        let b = board("E3", &[], &[(ItemKind::Key, "E2")]);
        let (notation, mp) = solve_notation(&b);
        assert_eq!(notation, "E3|E2:key|D1|C1|B1|A1");
        assert_eq!(mp, 1 + 4 * 2);
    }

    #[test]
    fn test_two_dynamite_charges_stack() {
        // B ring and apex both walled off: two clears are unavoidable,
        // so both charges must be collected.
        let b = board(
            "E1",
            &["B1", "B2", "B3", "B4", "A1"],
            &[
                (ItemKind::Key, "D1"),
                (ItemKind::Dynamite, "E2"),
                (ItemKind::Dynamite, "E3"),
            ],
        );
        let result = solve(&b, &SolverConfig::default()).unwrap();
        let route = result.route.expect("two charges should open the way");
        assert_eq!(route.notation().matches("clear:").count(), 2);
    }

    #[test]
    fn test_one_charge_short() {
        // Same wall, single charge: infeasible.
        let b = board(
            "E1",
            &["B1", "B2", "B3", "B4", "A1"],
            &[(ItemKind::Key, "D1"), (ItemKind::Dynamite, "E2")],
        );
        let result = solve(&b, &SolverConfig::default()).unwrap();
        assert!(result.route.is_none());
    }

    #[test]
    fn test_start_on_key_tile() {
        let b = board("E1", &[], &[(ItemKind::Key, "E1")]);
        let (notation, mp) = solve_notation(&b);
        assert_eq!(notation, "E1:key|D1|C1|B1|A1");
        assert_eq!(mp, 8);
    }
}
