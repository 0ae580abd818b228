//! Reachability explorer (C4): bounded breadth-first search of the marking
//! state space with hash-bucketed duplicate detection (§4.4).

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::hash::hash_marking;
use crate::spn::{Marking, SpnMatrix};

/// The default token cap per place before exploration is aborted as
/// unbounded (§4.4).
pub const DEFAULT_PLACE_LIMIT: u64 = 10;
/// The default cap on the number of distinct markings before exploration
/// is aborted as unbounded (§4.4).
pub const DEFAULT_MARK_LIMIT: usize = 500;

/// The reachability graph produced by [`explore`] (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachabilityGraph {
    /// Unique markings in BFS discovery order; `v[0]` is the initial
    /// marking.
    pub v: Vec<Marking>,
    /// Edges `(src_idx, dst_idx)`, 0-based indices into `v`, in
    /// `(BFS visit order of source, ascending transition index)` order.
    pub e: Vec<(usize, usize)>,
    /// `a[i]` is the transition fired on edge `e[i]`.
    pub a: Vec<usize>,
    /// False iff exploration was aborted because `place_limit` or
    /// `mark_limit` was exceeded.
    pub bounded: bool,
}

/// Breadth-first exploration of the marking space reachable from
/// `matrix.m0`, per §4.4's algorithm. `place_limit` bounds the token count
/// on any single place; `mark_limit` bounds the number of distinct
/// markings discovered.
pub fn explore(matrix: &SpnMatrix, place_limit: u64, mark_limit: usize) -> ReachabilityGraph {
    let mut v: Vec<Marking> = Vec::with_capacity(mark_limit.min(1024));
    v.push(matrix.m0.clone());

    let mut by_hash: HashMap<u64, Vec<usize>, ahash::RandomState> = HashMap::default();
    by_hash.entry(hash_marking(&matrix.m0)).or_default().push(0);

    let mut queue: VecDeque<usize> = VecDeque::new();
    queue.push_back(0);

    let mut e = Vec::new();
    let mut a = Vec::new();
    let mut bounded = true;

    'bfs: while let Some(src) = queue.pop_front() {
        let marking = v[src].clone();
        for t in 0..matrix.transitions {
            if !matrix.is_enabled(&marking, t) {
                continue;
            }
            let next = matrix.fire(&marking, t);

            if next.iter().any(|&tokens| tokens > place_limit) {
                bounded = false;
                break 'bfs;
            }

            let h = hash_marking(&next);
            let existing = by_hash
                .get(&h)
                .and_then(|bucket| bucket.iter().copied().find(|&i| v[i] == next));

            let dst = match existing {
                Some(i) => i,
                None => {
                    if v.len() + 1 > mark_limit {
                        bounded = false;
                        break 'bfs;
                    }
                    let idx = v.len();
                    v.push(next);
                    by_hash.entry(h).or_default().push(idx);
                    queue.push_back(idx);
                    idx
                }
            };

            e.push((src, dst));
            a.push(t);
        }
    }

    ReachabilityGraph { v, e, a, bounded }
}
