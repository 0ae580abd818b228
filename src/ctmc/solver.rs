//! Steady-state solver (C6): solves the constraint-substituted linear
//! system, with a pluggable strategy trait per §9.5, plus the marking
//! density and mean-token metrics derived from the solution (§4.5).

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use super::generator::{self, SparseGenerator};
use crate::reachability::ReachabilityGraph;

#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("reachability graph has no states")]
    EmptySystem,
    #[error("generator matrix is singular")]
    Singular,
}

/// "Solve sparse linear system, may fail", the single-method contract a
/// solver strategy must satisfy (§9.5). `ExactSolver` is the only
/// implementation this crate ships; an iterative strategy (e.g. a
/// GMRES-family method) can implement the same trait without changing any
/// caller.
pub trait SteadyStateSolver {
    fn solve(&self, q: &SparseGenerator, y: &[f64]) -> Result<Vec<f64>, SolveError>;
}

/// The reference "exact" solver: densifies the (already small, by
/// `mark_limit`) generator and solves via LU factorization.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactSolver;

impl SteadyStateSolver for ExactSolver {
    fn solve(&self, q: &SparseGenerator, y: &[f64]) -> Result<Vec<f64>, SolveError> {
        if q.n == 0 {
            return Err(SolveError::EmptySystem);
        }
        let mut dense = DMatrix::<f64>::zeros(q.n, q.n);
        for &(row, col, value) in &q.triplets {
            dense[(row, col)] += value;
        }
        let b = DVector::from_row_slice(y);
        dense
            .lu()
            .solve(&b)
            .map(|solution| solution.iter().copied().collect())
            .ok_or(SolveError::Singular)
    }
}

/// Steady-state analysis derived from a reachability graph and firing
/// rates, via a pluggable [`SteadyStateSolver`] (§4.5, §4.6).
#[derive(Debug, Clone)]
pub struct SteadyState {
    pub pi: Vec<f64>,
    /// `‖Q_raw * pi‖_inf`, computed against the pre-substitution
    /// generator. Used to check the steady-state conservation property
    /// (§8 item 7); not asserted internally.
    pub max_residual: f64,
    /// `density[p][k]` is the steady-state probability place `p` holds
    /// `k` tokens. Row `p` sums to 1.
    pub density: Vec<Vec<f64>>,
    /// `mu[p] = sum_k k * density[p][k]`.
    pub mu: Vec<f64>,
    /// `sum_p mu[p]`.
    pub mu_total: f64,
}

/// Assembles the generator, substitutes the constraint row, solves, and
/// derives marking density / mean tokens (the full C5 + C6 pipeline).
pub fn solve_steady_state(
    graph: &ReachabilityGraph,
    lambda: &[f64],
    places: usize,
    solver: &dyn SteadyStateSolver,
) -> Result<SteadyState, SolveError> {
    let q_raw = generator::assemble(graph, lambda);
    let (q_sub, y) = generator::substitute_constraint(&q_raw);
    let pi = solver.solve(&q_sub, &y)?;
    let max_residual = residual_inf_norm(&q_raw, &pi);
    let (density, mu, mu_total) = derive_metrics(graph, places, &pi);
    Ok(SteadyState {
        pi,
        max_residual,
        density,
        mu,
        mu_total,
    })
}

fn residual_inf_norm(q: &SparseGenerator, pi: &[f64]) -> f64 {
    let mut acc = vec![0.0; q.n];
    for &(row, col, value) in &q.triplets {
        acc[row] += value * pi[col];
    }
    acc.into_iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

fn derive_metrics(
    graph: &ReachabilityGraph,
    places: usize,
    pi: &[f64],
) -> (Vec<Vec<f64>>, Vec<f64>, f64) {
    let k_max = graph
        .v
        .iter()
        .flat_map(|marking| marking.iter().copied())
        .max()
        .unwrap_or(0) as usize;

    let mut density = vec![vec![0.0; k_max + 1]; places];
    for (i, marking) in graph.v.iter().enumerate() {
        for (p, &tokens) in marking.iter().enumerate() {
            density[p][tokens as usize] += pi[i];
        }
    }

    let mu: Vec<f64> = density
        .iter()
        .map(|row| row.iter().enumerate().map(|(k, &d)| k as f64 * d).sum())
        .collect();
    let mu_total = mu.iter().sum();

    (density, mu, mu_total)
}
