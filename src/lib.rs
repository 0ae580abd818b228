//! Generates benchmark datasets of Stochastic Petri Nets (SPNs): random
//! but structurally-valid synthesis, reachability-graph construction, and
//! steady-state analysis over the induced continuous-time Markov chain,
//! composed into a binning generator that fills `(places, transitions,
//! state-count-bucket)` cells with valid SPNs.
//!
//! Persistence, CLI argument parsing, console progress reporting, and
//! plotting are explicitly out of scope (this crate hands back in-memory
//! results for an external caller to persist, render, or report on).

pub mod ctmc;
pub mod dataset;
pub mod error;
pub mod reachability;
pub mod rng;
pub mod spn;
pub mod validity;

pub use ctmc::{ExactSolver, SolveError, SteadyStateSolver};
pub use dataset::{generate_dataset, BinKey, DatasetReport, GenerateOptions, SolverChoice};
pub use error::SpnError;
pub use reachability::{ReachabilityGraph, DEFAULT_MARK_LIMIT, DEFAULT_PLACE_LIMIT};
pub use spn::{Marking, SpnMatrix};
pub use validity::{InvalidReason, Outcome, ValidSpn};

use rand::SeedableRng;
use rand::rngs::SmallRng;

/// `spn_generate_random(P, T, prob, lambda_max, n, shared_structure)`
/// (§6). Synthesizes `n` random SPNs (C2), drawing from an unseeded RNG;
/// callers who need reproducibility should go through
/// [`spn::synth::synthesize_many`] with their own seeded RNG instead.
pub fn spn_generate_random(
    places: usize,
    transitions: usize,
    prob: f64,
    lambda_max: u64,
    n: usize,
    shared_structure: bool,
) -> Result<Vec<(SpnMatrix, Vec<f64>)>, SpnError> {
    let mut rng = SmallRng::from_os_rng();
    spn::synth::synthesize_many(
        places,
        transitions,
        prob,
        lambda_max,
        n.max(1),
        shared_structure,
        &mut rng,
    )
}

/// `get_reachability_graph(matrix, place_limit=10, marks_limit=500)`
/// (§6). Thin wrapper over C4's explorer.
pub fn get_reachability_graph(
    matrix: &SpnMatrix,
    place_limit: u64,
    marks_limit: usize,
) -> ReachabilityGraph {
    reachability::explore(matrix, place_limit, marks_limit)
}

/// `filter_spn(matrix, place_bound=10, marks_lower (unused), marks_upper=500, solver)`
/// (§6). `marks_lower` is accepted but ignored for external compatibility
/// (§9.6), the source's filter signature carries it but never reads it.
///
/// The source's listed signature has no explicit rate vector, but C6
/// structurally requires firing rates to solve the CTMC (§4.5); this
/// crate takes `lambda` explicitly rather than silently fabricating rates
/// inside a function named "filter" (see DESIGN.md, "filter_spn rates").
pub fn filter_spn(
    matrix: SpnMatrix,
    lambda: Vec<f64>,
    place_bound: u64,
    _marks_lower: usize,
    marks_upper: usize,
    solver: &dyn SteadyStateSolver,
) -> Outcome {
    validity::evaluate(matrix, lambda, place_bound, marks_upper, solver)
}
