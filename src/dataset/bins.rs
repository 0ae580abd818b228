//! Bin keys for the binning generator (§4.7, §9.2). The source keys bins
//! by formatted strings (`"p<P>_t<T>_s<bucket>"`); this crate uses a
//! structured tuple key instead (§9.2: "string formatting is incidental").

use serde::{Deserialize, Serialize};

/// A cell in the `(places x transitions x state-count-bucket)` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinKey {
    pub places: usize,
    pub transitions: usize,
    pub bucket: usize,
}

/// Classifies `states` into the bucket index for sorted bin edges
/// `state_bins = [b_1, ..., b_k]`: bucket 0 is `(-inf, b_1)`, bucket `i`
/// (`0 < i < k`) is `[b_i, b_{i+1})`, and bucket `k` is `[b_k, inf)`.
pub fn bucket_of(state_bins: &[usize], states: usize) -> usize {
    state_bins
        .iter()
        .position(|&edge| states < edge)
        .unwrap_or(state_bins.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        let edges = vec![10, 50, 200];
        assert_eq!(bucket_of(&edges, 0), 0);
        assert_eq!(bucket_of(&edges, 9), 0);
        assert_eq!(bucket_of(&edges, 10), 1);
        assert_eq!(bucket_of(&edges, 49), 1);
        assert_eq!(bucket_of(&edges, 50), 2);
        assert_eq!(bucket_of(&edges, 199), 2);
        assert_eq!(bucket_of(&edges, 200), 3);
        assert_eq!(bucket_of(&edges, 10_000), 3);
    }

    #[test]
    fn empty_edges_is_a_single_bucket() {
        assert_eq!(bucket_of(&[], 0), 0);
        assert_eq!(bucket_of(&[], 1_000_000), 0);
    }
}
