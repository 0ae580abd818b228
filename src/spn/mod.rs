//! The SPN data model: the compound matrix `[Tin | Tout | M0]` and the
//! markings it induces (§3).

pub mod filter;
pub mod synth;

use serde::{Deserialize, Serialize};

/// A non-negative integer vector of length `P`, one entry per place.
pub type Marking = Vec<u64>;

/// The compound SPN matrix `[Tin | Tout | M0]` of shape `P x (2T + 1)`
/// (§3). `t_in` and `t_out` are dense `P x T` arrays of `{0, 1}`; arc
/// weights are unit by design (§9.3), this crate does not support
/// multi-weighted arcs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpnMatrix {
    pub places: usize,
    pub transitions: usize,
    /// `t_in[p][t] == 1` iff place `p` is an input of transition `t`.
    pub t_in: Vec<Vec<u8>>,
    /// `t_out[p][t] == 1` iff place `p` is an output of transition `t`.
    pub t_out: Vec<Vec<u8>>,
    pub m0: Marking,
}

impl SpnMatrix {
    /// An all-zero matrix of the given shape, ready for [`synth`] to fill
    /// in or for hand-authored test fixtures.
    pub fn empty(places: usize, transitions: usize) -> Self {
        Self {
            places,
            transitions,
            t_in: vec![vec![0; transitions]; places],
            t_out: vec![vec![0; transitions]; places],
            m0: vec![0; places],
        }
    }

    /// Whether transition `t` is enabled in `marking`: every input place
    /// holds at least as many tokens as `t_in` requires (§4.4).
    pub fn is_enabled(&self, marking: &Marking, t: usize) -> bool {
        (0..self.places).all(|p| marking[p] >= self.t_in[p][t] as u64)
    }

    /// The marking reached by firing transition `t` from `marking`,
    /// assuming it is enabled. `M' = M + C[:, t]` where `C = Tout - Tin`.
    pub fn fire(&self, marking: &Marking, t: usize) -> Marking {
        (0..self.places)
            .map(|p| {
                marking[p] + self.t_out[p][t] as u64 - self.t_in[p][t] as u64
            })
            .collect()
    }

    /// The incidence column `C[:, t] = Tout[:, t] - Tin[:, t]`.
    pub fn incidence_column(&self, t: usize) -> Vec<i64> {
        (0..self.places)
            .map(|p| self.t_out[p][t] as i64 - self.t_in[p][t] as i64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producer_consumer() -> SpnMatrix {
        // Tin = [[1,0],[0,1]], Tout = [[0,1],[1,0]], M0 = [1,0]
        SpnMatrix {
            places: 2,
            transitions: 2,
            t_in: vec![vec![1, 0], vec![0, 1]],
            t_out: vec![vec![0, 1], vec![1, 0]],
            m0: vec![1, 0],
        }
    }

    #[test]
    fn enabled_transition_fires_correctly() {
        let net = producer_consumer();
        assert!(net.is_enabled(&net.m0, 0));
        assert!(!net.is_enabled(&net.m0, 1));
        assert_eq!(net.fire(&net.m0, 0), vec![0, 1]);
    }

    #[test]
    fn incidence_column_matches_tout_minus_tin() {
        let net = producer_consumer();
        assert_eq!(net.incidence_column(0), vec![-1, 1]);
        assert_eq!(net.incidence_column(1), vec![1, -1]);
    }
}
