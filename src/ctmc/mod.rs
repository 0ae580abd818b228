//! CTMC assembly (C5) and the steady-state solver (C6) built on it.

pub mod generator;
pub mod solver;

pub use generator::{assemble, substitute_constraint, SparseGenerator};
pub use solver::{solve_steady_state, ExactSolver, SolveError, SteadyState, SteadyStateSolver};
