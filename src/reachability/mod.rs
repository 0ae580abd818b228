//! Reachability-graph construction: the marking hasher (C1) and the
//! bounded BFS explorer (C4) built on top of it.

pub mod explore;
pub mod hash;

pub use explore::{explore, ReachabilityGraph, DEFAULT_MARK_LIMIT, DEFAULT_PLACE_LIMIT};
pub use hash::hash_marking;
