//! Binning generator (C8): repeatedly synthesizes candidates, filters them
//! through C3/C4/C6 via C7, and places survivors into bins keyed by
//! `(places, transitions, state-count-bucket)` (§4.7).

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::bins::{bucket_of, BinKey};
use crate::ctmc::{ExactSolver, SteadyStateSolver};
use crate::error::SpnError;
use crate::reachability::{DEFAULT_MARK_LIMIT, DEFAULT_PLACE_LIMIT};
use crate::rng::worker_rng;
use crate::spn::filter::{add_edges_to_isolated_nodes, has_no_isolated_nodes};
use crate::spn::synth;
use crate::validity::{evaluate, InvalidReason, Outcome, ValidSpn};

/// Which [`SteadyStateSolver`] to use. Only `Exact` ships in this crate
/// (§4.5, §9.5); naming a variant here is what lets a caller request a
/// not-yet-written iterative solver through the same option struct later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SolverChoice {
    #[default]
    Exact,
}

impl SolverChoice {
    fn build(self) -> Box<dyn SteadyStateSolver + Sync> {
        match self {
            SolverChoice::Exact => Box::new(ExactSolver),
        }
    }
}

/// Options recognized by [`generate_dataset`] (§6).
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub prob: f64,
    pub lambda_max: u64,
    pub place_limit: u64,
    pub mark_limit: usize,
    pub solver: SolverChoice,
    pub mini_batch_size: usize,
    pub worker_count: usize,
    pub master_seed: u64,
    /// Optional cap on total candidates drawn across all bins; `None`
    /// means run until every bin is full (§4.7 "Termination").
    pub max_attempts: Option<u64>,
    /// Cooperative cancellation flag, checked between batches (§5).
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            prob: 0.1,
            lambda_max: 5,
            place_limit: DEFAULT_PLACE_LIMIT,
            mark_limit: DEFAULT_MARK_LIMIT,
            solver: SolverChoice::Exact,
            mini_batch_size: 16,
            worker_count: rayon::current_num_threads(),
            master_seed: 0,
            max_attempts: None,
            cancel: None,
        }
    }
}

/// The outcome of a full `generate_dataset` run. `unfilled_bins` is a
/// warning, not an error (§7 "Bin unfillable"); the dataset accepted so
/// far is still returned.
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub accepted: Vec<ValidSpn>,
    pub unfilled_bins: Vec<BinKey>,
    pub attempts: u64,
}

struct BinTable {
    per_bin: usize,
    counts: std::collections::HashMap<BinKey, usize>,
}

impl BinTable {
    fn new(p_range: &RangeInclusive<usize>, t_range: &RangeInclusive<usize>, state_bins: &[usize], per_bin: usize) -> Self {
        let mut counts = std::collections::HashMap::new();
        for places in p_range.clone() {
            for transitions in t_range.clone() {
                for bucket in 0..=state_bins.len() {
                    counts.insert(
                        BinKey {
                            places,
                            transitions,
                            bucket,
                        },
                        0,
                    );
                }
            }
        }
        Self { per_bin, counts }
    }

    fn is_full(&self, key: &BinKey) -> bool {
        self.counts.get(key).copied().unwrap_or(self.per_bin) >= self.per_bin
    }

    fn all_full(&self) -> bool {
        self.counts.values().all(|&n| n >= self.per_bin)
    }

    fn accept(&mut self, key: BinKey) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    fn unfilled(&self) -> Vec<BinKey> {
        self.counts
            .iter()
            .filter(|&(_, &n)| n < self.per_bin)
            .map(|(&k, _)| k)
            .collect()
    }
}

fn validate_args(
    p_range: &RangeInclusive<usize>,
    t_range: &RangeInclusive<usize>,
    per_bin: usize,
    options: &GenerateOptions,
) -> Result<(), SpnError> {
    if p_range.is_empty() || *p_range.start() == 0 {
        return Err(SpnError::InvalidArgument(
            "P_range must be non-empty and start at >= 1".into(),
        ));
    }
    if t_range.is_empty() || *t_range.start() == 0 {
        return Err(SpnError::InvalidArgument(
            "T_range must be non-empty and start at >= 1".into(),
        ));
    }
    if per_bin == 0 {
        return Err(SpnError::InvalidArgument("per_bin must be >= 1".into()));
    }
    if options.mini_batch_size == 0 {
        return Err(SpnError::InvalidArgument(
            "mini_batch_size must be >= 1".into(),
        ));
    }
    if options.worker_count == 0 {
        return Err(SpnError::InvalidArgument(
            "worker_count must be >= 1".into(),
        ));
    }
    if !(0.0..=1.0).contains(&options.prob) {
        return Err(SpnError::InvalidArgument("prob must be within [0, 1]".into()));
    }
    Ok(())
}

/// One candidate drawn and pushed through C2 -> C3 (if needed) -> C7.
fn run_one_candidate(
    places: usize,
    transitions: usize,
    options: &GenerateOptions,
    solver: &dyn SteadyStateSolver,
    rng: &mut impl Rng,
) -> Outcome {
    let (mut matrix, lambda) = match synth::synthesize(
        places,
        transitions,
        options.prob,
        options.lambda_max,
        rng,
    ) {
        Ok(pair) => pair,
        Err(e) => {
            // Synthesis only rejects on shape errors, which validate_args
            // already screened out of P_range/T_range; treat defensively
            // as a disconnected candidate rather than panicking.
            warn!(error = %e, "candidate synthesis rejected");
            return Outcome::Invalid(InvalidReason::Disconnected);
        }
    };
    if !has_no_isolated_nodes(&matrix) {
        matrix = add_edges_to_isolated_nodes(matrix, rng);
    }
    evaluate(matrix, lambda, options.place_limit, options.mark_limit, solver)
}

/// `generate_dataset(P_range, T_range, state_bins, per_bin, options)`
/// (§6). Draws random `(P, T)` pairs, generates mini-batches of candidates
/// per worker in parallel, and accepts survivors into bins until every bin
/// reaches `per_bin` or the run is cancelled / the attempt cap is reached.
pub fn generate_dataset(
    p_range: RangeInclusive<usize>,
    t_range: RangeInclusive<usize>,
    mut state_bins: Vec<usize>,
    per_bin: usize,
    options: GenerateOptions,
) -> Result<DatasetReport, SpnError> {
    validate_args(&p_range, &t_range, per_bin, &options)?;
    state_bins.sort_unstable();

    let solver = options.solver.build();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.worker_count)
        .build()
        .map_err(|e| SpnError::InvalidArgument(e.to_string()))?;

    let bin_table = Mutex::new(BinTable::new(&p_range, &t_range, &state_bins, per_bin));
    let accepted: Mutex<Vec<ValidSpn>> = Mutex::new(Vec::new());
    let attempts = AtomicU64::new(0);
    let cancel = options
        .cancel
        .clone()
        .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));

    // Each worker owns one RNG for the whole run (§5), persisted across
    // batches here as a per-worker mutex so state advances between calls
    // instead of resetting every batch.
    let worker_rngs: Vec<Mutex<ChaCha8Rng>> = (0..options.worker_count)
        .map(|worker_id| Mutex::new(worker_rng(options.master_seed, worker_id as u64)))
        .collect();

    pool.install(|| {
        'outer: loop {
            if cancel.load(Ordering::Relaxed) {
                info!("generation cancelled");
                break;
            }
            if bin_table.lock().expect("bin table poisoned").all_full() {
                break;
            }
            if let Some(cap) = options.max_attempts {
                if attempts.load(Ordering::Relaxed) >= cap {
                    warn!(attempts = cap, "attempt cap reached with bins unfilled");
                    break;
                }
            }

            // Each worker draws its own (P, T) and runs a mini-batch
            // independently, with its own long-lived deterministic RNG.
            let per_worker: Vec<Vec<(BinKey, Outcome)>> = (0..options.worker_count)
                .into_par_iter()
                .map(|worker_id| {
                    let mut rng = worker_rngs[worker_id]
                        .lock()
                        .expect("worker rng poisoned");
                    (0..options.mini_batch_size)
                        .map(|_| {
                            let places = rng.random_range(p_range.clone());
                            let transitions = rng.random_range(t_range.clone());
                            let outcome =
                                run_one_candidate(places, transitions, &options, solver.as_ref(), &mut *rng);
                            let bucket = match &outcome {
                                Outcome::Valid(valid) => bucket_of(&state_bins, valid.states),
                                Outcome::Invalid(_) => 0,
                            };
                            (
                                BinKey {
                                    places,
                                    transitions,
                                    bucket,
                                },
                                outcome,
                            )
                        })
                        .collect()
                })
                .collect();

            attempts.fetch_add(
                (options.worker_count * options.mini_batch_size) as u64,
                Ordering::Relaxed,
            );

            // Bin accounting and acceptance are serialized behind a single
            // mutex, processed in worker-id order for reproducibility (§5).
            let mut table = bin_table.lock().expect("bin table poisoned");
            let mut accepted_guard = accepted.lock().expect("accepted list poisoned");
            for batch in per_worker {
                for (key, outcome) in batch {
                    match outcome {
                        Outcome::Invalid(reason) => {
                            debug!(?reason, "candidate rejected");
                        }
                        Outcome::Valid(valid) => {
                            if table.is_full(&key) {
                                debug!(?key, "bin already full, discarding valid candidate");
                                continue;
                            }
                            table.accept(key);
                            if table.is_full(&key) {
                                info!(?key, "bin filled");
                            }
                            accepted_guard.push(valid);
                        }
                    }
                }
            }
            drop(table);
            drop(accepted_guard);

            if bin_table.lock().expect("bin table poisoned").all_full() {
                break 'outer;
            }
        }
    });

    let unfilled_bins = bin_table.lock().expect("bin table poisoned").unfilled();
    if !unfilled_bins.is_empty() {
        warn!(count = unfilled_bins.len(), "dataset generated with unfilled bins");
    }

    Ok(DatasetReport {
        accepted: accepted.into_inner().expect("accepted list poisoned"),
        unfilled_bins,
        attempts: attempts.load(Ordering::Relaxed),
    })
}
