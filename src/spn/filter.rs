//! Structural filter (C3): detects isolated places/transitions and repairs
//! them by adding arcs (§4.3).

use rand::Rng;

use super::SpnMatrix;

/// True iff every place has at least one arc (input or output) and every
/// transition has at least one arc (input or output).
pub fn has_no_isolated_nodes(matrix: &SpnMatrix) -> bool {
    let place_ok = (0..matrix.places).all(|p| {
        (0..matrix.transitions).any(|t| matrix.t_in[p][t] == 1 || matrix.t_out[p][t] == 1)
    });
    let transition_ok = (0..matrix.transitions).all(|t| {
        (0..matrix.places).any(|p| matrix.t_in[p][t] == 1 || matrix.t_out[p][t] == 1)
    });
    place_ok && transition_ok
}

/// For each isolated place, adds one random input arc and one random
/// output arc. For each isolated transition, adds one arc to a random
/// place in a coin-flipped direction. Guarantees `has_no_isolated_nodes`
/// on the returned matrix.
pub fn add_edges_to_isolated_nodes(mut matrix: SpnMatrix, rng: &mut impl Rng) -> SpnMatrix {
    for p in 0..matrix.places {
        let isolated =
            (0..matrix.transitions).all(|t| matrix.t_in[p][t] == 0 && matrix.t_out[p][t] == 0);
        if isolated && matrix.transitions > 0 {
            let t_in = rng.random_range(0..matrix.transitions);
            let t_out = rng.random_range(0..matrix.transitions);
            matrix.t_in[p][t_in] = 1;
            matrix.t_out[p][t_out] = 1;
        }
    }
    for t in 0..matrix.transitions {
        let isolated =
            (0..matrix.places).all(|p| matrix.t_in[p][t] == 0 && matrix.t_out[p][t] == 0);
        if isolated && matrix.places > 0 {
            let p = rng.random_range(0..matrix.places);
            if rng.random_bool(0.5) {
                matrix.t_in[p][t] = 1;
            } else {
                matrix.t_out[p][t] = 1;
            }
        }
    }
    matrix
}
