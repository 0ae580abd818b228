//! Validity filter (C7): composes C3's connectivity check, C4's
//! boundedness result, and C6's solvability into a single state machine
//! (§4.6). A failure at any stage produces `Outcome::Invalid`, a value,
//! never an error (only truly unexpected conditions are errors, §7).

use serde::{Deserialize, Serialize};

use crate::ctmc::{solve_steady_state, SolveError, SteadyState, SteadyStateSolver};
use crate::reachability::{explore, ReachabilityGraph};
use crate::spn::filter::has_no_isolated_nodes;
use crate::spn::SpnMatrix;

/// Why a candidate was rejected (§4.6's `CANDIDATE -> ... -> INVALID`
/// transitions).
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidReason {
    /// Failed `CANDIDATE -> CONNECTED`: an isolated place or transition
    /// remains even after C8's optional repair pass.
    Disconnected,
    /// Failed `CONNECTED -> BOUNDED`: the reachability explorer aborted.
    Unbounded,
    /// Failed `BOUNDED -> SOLVABLE`: the steady-state solver broke down.
    Unsolvable(SolveError),
}

/// A candidate that reached the `VALID` state, bundled with everything
/// §4.6 says to emit: the matrix, reachability graph, rates, and derived
/// steady-state metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidSpn {
    pub matrix: SpnMatrix,
    pub graph: ReachabilityGraph,
    pub lambda: Vec<f64>,
    pub density: Vec<Vec<f64>>,
    pub mu: Vec<f64>,
    pub mu_total: f64,
    pub states: usize,
}

/// The result of running a candidate through the C7 state machine.
#[derive(Debug, Clone)]
pub enum Outcome {
    Invalid(InvalidReason),
    Valid(ValidSpn),
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid(_))
    }
}

/// Runs `matrix` through `CANDIDATE -> CONNECTED -> BOUNDED -> SOLVABLE ->
/// VALID`, assuming any needed C3 repair has already been applied by the
/// caller (§4.6: "applied by C8 *before* C7").
pub fn evaluate(
    matrix: SpnMatrix,
    lambda: Vec<f64>,
    place_limit: u64,
    mark_limit: usize,
    solver: &dyn SteadyStateSolver,
) -> Outcome {
    if !has_no_isolated_nodes(&matrix) {
        return Outcome::Invalid(InvalidReason::Disconnected);
    }

    let graph = explore::explore(&matrix, place_limit, mark_limit);
    if !graph.bounded {
        return Outcome::Invalid(InvalidReason::Unbounded);
    }

    match solve_steady_state(&graph, &lambda, matrix.places, solver) {
        Ok(SteadyState {
            density, mu, mu_total, ..
        }) => {
            let states = graph.v.len();
            Outcome::Valid(ValidSpn {
                matrix,
                graph,
                lambda,
                density,
                mu,
                mu_total,
                states,
            })
        }
        Err(e) => Outcome::Invalid(InvalidReason::Unsolvable(e)),
    }
}
