//! SPN synthesizer (C2): builds a random, structurally-connected SPN with
//! an initial marking and firing rates (§4.2).

use rand::seq::SliceRandom;
use rand::Rng;

use super::SpnMatrix;
use crate::error::SpnError;

#[derive(Clone, Copy)]
enum Node {
    Place(usize),
    Transition(usize),
}

/// The arc skeleton produced by steps 1-2 of §4.2: a connected bipartite
/// graph with no isolated places or transitions, before densification,
/// marking, and rate assignment.
struct Skeleton {
    t_in: Vec<Vec<u8>>,
    t_out: Vec<Vec<u8>>,
}

/// Connects `place` and `transition` with an arc in a fair-coin-chosen
/// direction.
fn connect(skeleton: &mut Skeleton, place: usize, transition: usize, rng: &mut impl Rng) {
    if rng.random_bool(0.5) {
        skeleton.t_in[place][transition] = 1;
    } else {
        skeleton.t_out[place][transition] = 1;
    }
}

/// Steps 1-2 of §4.2: spanning-tree seed plus incremental connection,
/// guaranteeing the underlying undirected bipartite graph is connected and
/// every node has at least one arc.
fn build_skeleton(places: usize, transitions: usize, rng: &mut impl Rng) -> Skeleton {
    let mut skeleton = Skeleton {
        t_in: vec![vec![0; transitions]; places],
        t_out: vec![vec![0; transitions]; places],
    };

    let p0 = rng.random_range(0..places);
    let t0 = rng.random_range(0..transitions);
    connect(&mut skeleton, p0, t0, rng);

    let mut connected_places = vec![p0];
    let mut connected_transitions = vec![t0];

    let mut remaining: Vec<Node> = (0..places)
        .filter(|&p| p != p0)
        .map(Node::Place)
        .chain((0..transitions).filter(|&t| t != t0).map(Node::Transition))
        .collect();
    remaining.shuffle(rng);

    for node in remaining {
        match node {
            Node::Place(p) => {
                let t = *connected_transitions.choose(rng).expect("seeded with t0");
                connect(&mut skeleton, p, t, rng);
                connected_places.push(p);
            }
            Node::Transition(t) => {
                let p = *connected_places.choose(rng).expect("seeded with p0");
                connect(&mut skeleton, p, t, rng);
                connected_transitions.push(t);
            }
        }
    }

    skeleton
}

/// Step 3 of §4.2: independently sets every currently-zero entry of `Tin`
/// and `Tout` to 1 with probability `prob`.
fn densify(skeleton: &Skeleton, prob: f64, rng: &mut impl Rng) -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
    let places = skeleton.t_in.len();
    let transitions = if places > 0 { skeleton.t_in[0].len() } else { 0 };
    let mut t_in = skeleton.t_in.clone();
    let mut t_out = skeleton.t_out.clone();
    for p in 0..places {
        for t in 0..transitions {
            if t_in[p][t] == 0 && rng.random_bool(prob) {
                t_in[p][t] = 1;
            }
            if t_out[p][t] == 0 && rng.random_bool(prob) {
                t_out[p][t] = 1;
            }
        }
    }
    (t_in, t_out)
}

/// Step 4 of §4.2: draws an initial marking of i.i.d. `{0, 1}` coin flips.
fn draw_initial_marking(places: usize, rng: &mut impl Rng) -> Vec<u64> {
    (0..places).map(|_| rng.random_range(0..=1u64)).collect()
}

/// Step 5 of §4.2: draws firing rates uniformly from `{1, ..., lambda_max}`.
fn draw_rates(transitions: usize, lambda_max: u64, rng: &mut impl Rng) -> Vec<f64> {
    (0..transitions)
        .map(|_| rng.random_range(1..=lambda_max) as f64)
        .collect()
}

fn validate_shape(places: usize, transitions: usize, prob: f64) -> Result<(), SpnError> {
    if places == 0 {
        return Err(SpnError::InvalidArgument("places must be >= 1".into()));
    }
    if transitions == 0 {
        return Err(SpnError::InvalidArgument("transitions must be >= 1".into()));
    }
    if !(0.0..=1.0).contains(&prob) {
        return Err(SpnError::InvalidArgument(
            "prob must be within [0, 1]".into(),
        ));
    }
    Ok(())
}

/// `synthesize(P, T, prob, lambda_max) -> (matrix, lambda)` (§4.2).
pub fn synthesize(
    places: usize,
    transitions: usize,
    prob: f64,
    lambda_max: u64,
    rng: &mut impl Rng,
) -> Result<(SpnMatrix, Vec<f64>), SpnError> {
    validate_shape(places, transitions, prob)?;
    let skeleton = build_skeleton(places, transitions, rng);
    let (t_in, t_out) = densify(&skeleton, prob, rng);
    let m0 = draw_initial_marking(places, rng);
    let lambda = draw_rates(transitions, lambda_max, rng);
    Ok((
        SpnMatrix {
            places,
            transitions,
            t_in,
            t_out,
            m0,
        },
        lambda,
    ))
}

/// `synthesize_many(..., n, shared_structure)` (§4.2 "Batch mode"). When
/// `shared_structure` is true, the arc skeleton (steps 1-2) is built once
/// and shared across all `n` outputs; each output still gets its own
/// independent densification, marking, and rate draws.
pub fn synthesize_many(
    places: usize,
    transitions: usize,
    prob: f64,
    lambda_max: u64,
    n: usize,
    shared_structure: bool,
    rng: &mut impl Rng,
) -> Result<Vec<(SpnMatrix, Vec<f64>)>, SpnError> {
    validate_shape(places, transitions, prob)?;
    if n == 0 {
        return Err(SpnError::InvalidArgument("n must be >= 1".into()));
    }

    if shared_structure {
        let skeleton = build_skeleton(places, transitions, rng);
        Ok((0..n)
            .map(|_| {
                let (t_in, t_out) = densify(&skeleton, prob, rng);
                let m0 = draw_initial_marking(places, rng);
                let lambda = draw_rates(transitions, lambda_max, rng);
                (
                    SpnMatrix {
                        places,
                        transitions,
                        t_in,
                        t_out,
                        m0,
                    },
                    lambda,
                )
            })
            .collect())
    } else {
        (0..n)
            .map(|_| synthesize(places, transitions, prob, lambda_max, rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spn::filter::has_no_isolated_nodes;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn synthesized_nets_have_no_isolated_nodes() {
        let mut rng = SmallRng::seed_from_u64(7);
        for places in 1..=6 {
            for transitions in 1..=6 {
                let (matrix, lambda) =
                    synthesize(places, transitions, 0.3, 5, &mut rng).unwrap();
                assert!(has_no_isolated_nodes(&matrix));
                assert_eq!(lambda.len(), transitions);
                assert!(lambda.iter().all(|&r| (1.0..=5.0).contains(&r)));
            }
        }
    }

    #[test]
    fn rejects_zero_places_or_transitions() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(synthesize(0, 2, 0.3, 5, &mut rng).is_err());
        assert!(synthesize(2, 0, 0.3, 5, &mut rng).is_err());
    }

    #[test]
    fn shared_structure_batch_keeps_identical_skeletons() {
        let mut rng = SmallRng::seed_from_u64(3);
        let batch = synthesize_many(4, 3, 0.2, 4, 5, true, &mut rng).unwrap();
        let skeleton_arcs = |m: &SpnMatrix| {
            // Arcs present regardless of densification are a superset; we
            // can't recover the exact skeleton post-densification, so
            // instead check the weaker, still-meaningful invariant: every
            // output is connected (densification only ever adds arcs).
            has_no_isolated_nodes(m)
        };
        assert!(batch.iter().all(|(m, _)| skeleton_arcs(m)));
        assert_eq!(batch.len(), 5);
    }
}
