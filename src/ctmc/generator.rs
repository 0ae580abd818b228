//! CTMC assembler (C5): builds the sparse generator matrix from a
//! reachability graph and firing rates, then substitutes the probability-
//! conservation constraint (§4.5).

use std::collections::HashMap;

use crate::reachability::ReachabilityGraph;

/// A sparse `n x n` generator matrix stored as coordinate triplets
/// `(row, col, value)`. Duplicate `(row, col)` pairs have already been
/// summed, there is at most one triplet per occupied cell.
#[derive(Debug, Clone)]
pub struct SparseGenerator {
    pub n: usize,
    pub triplets: Vec<(usize, usize, f64)>,
}

/// Builds the raw generator `Q` from `(V, E, A, lambda)` (§4.5): for each
/// edge `(src, dst)` fired by transition `t`, `Q[dst, src] += lambda[t]`
/// and `Q[src, src] -= lambda[t]`. Parallel edges between the same pair
/// (different transitions) sum. Column sums of the returned `Q` are zero.
pub fn assemble(graph: &ReachabilityGraph, lambda: &[f64]) -> SparseGenerator {
    let n = graph.v.len();
    let mut acc: HashMap<(usize, usize), f64> = HashMap::with_capacity(graph.e.len() * 2);
    for (i, &(src, dst)) in graph.e.iter().enumerate() {
        let rate = lambda[graph.a[i]];
        *acc.entry((dst, src)).or_insert(0.0) += rate;
        *acc.entry((src, src)).or_insert(0.0) -= rate;
    }
    let triplets = acc.into_iter().map(|((r, c), v)| (r, c, v)).collect();
    SparseGenerator { n, triplets }
}

/// Overwrites row 0 with all-ones and returns the matching right-hand side
/// `y` (`y[0] = 1`, rest 0), turning the rank-deficient `Q pi = 0` into the
/// nonsingular system the exact solver solves (§4.5 "Rationale").
pub fn substitute_constraint(q: &SparseGenerator) -> (SparseGenerator, Vec<f64>) {
    let mut triplets: Vec<(usize, usize, f64)> = q
        .triplets
        .iter()
        .copied()
        .filter(|&(row, _, _)| row != 0)
        .collect();
    for col in 0..q.n {
        triplets.push((0, col, 1.0));
    }
    let mut y = vec![0.0; q.n];
    if q.n > 0 {
        y[0] = 1.0;
    }
    (SparseGenerator { n: q.n, triplets }, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reachability::explore;
    use crate::spn::SpnMatrix;

    fn producer_consumer_graph() -> ReachabilityGraph {
        let net = SpnMatrix {
            places: 2,
            transitions: 2,
            t_in: vec![vec![1, 0], vec![0, 1]],
            t_out: vec![vec![0, 1], vec![1, 0]],
            m0: vec![1, 0],
        };
        explore::explore(&net, explore::DEFAULT_PLACE_LIMIT, explore::DEFAULT_MARK_LIMIT)
    }

    #[test]
    fn column_sums_are_zero() {
        let graph = producer_consumer_graph();
        let q = assemble(&graph, &[1.0, 1.0]);
        let mut col_sums = vec![0.0; q.n];
        for &(_, c, v) in &q.triplets {
            col_sums[c] += v;
        }
        for sum in col_sums {
            assert!(sum.abs() < 1e-9);
        }
    }

    #[test]
    fn substitution_overwrites_row_zero() {
        let graph = producer_consumer_graph();
        let q = assemble(&graph, &[1.0, 1.0]);
        let (q_sub, y) = substitute_constraint(&q);
        let row0: Vec<_> = q_sub
            .triplets
            .iter()
            .filter(|&&(r, _, _)| r == 0)
            .collect();
        assert_eq!(row0.len(), q.n);
        assert!(row0.iter().all(|&&(_, _, v)| (v - 1.0).abs() < 1e-12));
        assert_eq!(y[0], 1.0);
        assert!(y[1..].iter().all(|&v| v == 0.0));
    }
}
