//! Black-box scenario tests from the testable-properties list (§8),
//! driven only through the crate's public API.

use spn_dataset_gen::{
    filter_spn, get_reachability_graph, spn_generate_random, ExactSolver, Outcome, SpnMatrix,
};

fn producer_consumer() -> SpnMatrix {
    SpnMatrix {
        places: 2,
        transitions: 2,
        t_in: vec![vec![1, 0], vec![0, 1]],
        t_out: vec![vec![0, 1], vec![1, 0]],
        m0: vec![1, 0],
    }
}

#[test]
fn producer_consumer_loop_reaches_two_states() {
    let net = producer_consumer();
    let graph = get_reachability_graph(&net, 10, 500);
    assert!(graph.bounded);
    assert_eq!(graph.v.len(), 2);
    assert_eq!(graph.e.len(), 2);
    assert!(graph.v.contains(&vec![1, 0]));
    assert!(graph.v.contains(&vec![0, 1]));
}

#[test]
fn unbounded_by_place_limit_via_sourceless_transition() {
    // A transition with no inputs and a nonzero output column grows the
    // marking without bound (§4.4 edge case); place_limit catches it.
    let net = SpnMatrix {
        places: 1,
        transitions: 1,
        t_in: vec![vec![0]],
        t_out: vec![vec![1]],
        m0: vec![0],
    };
    let graph = get_reachability_graph(&net, 5, 500);
    assert!(!graph.bounded);
}

#[test]
fn unbounded_by_mark_limit_five_place_shifter() {
    let places = 5;
    let transitions = 5;
    let mut t_in = vec![vec![0; transitions]; places];
    let mut t_out = vec![vec![0; transitions]; places];
    for t in 0..transitions {
        t_in[t][t] = 1;
        t_out[(t + 1) % places][t] = 1;
    }
    let net = SpnMatrix {
        places,
        transitions,
        t_in,
        t_out,
        m0: vec![1, 4, 0, 0, 0],
    };
    let graph = get_reachability_graph(&net, 10, 5);
    assert!(!graph.bounded);
}

#[test]
fn disconnected_spn_rejected_by_filter_spn() {
    // filter_spn([[1,0,0,1,1],[0,0,0,0,0]]): second place isolated.
    let matrix = SpnMatrix {
        places: 2,
        transitions: 2,
        t_in: vec![vec![1, 0], vec![0, 0]],
        t_out: vec![vec![0, 1], vec![0, 0]],
        m0: vec![1, 0],
    };
    let outcome = filter_spn(matrix, vec![1.0, 1.0], 10, 4, 500, &ExactSolver);
    assert!(!outcome.is_valid());
}

#[test]
fn valid_end_to_end_producer_consumer() {
    let net = producer_consumer();
    let outcome = filter_spn(net, vec![1.0, 1.0], 10, 4, 500, &ExactSolver);
    match outcome {
        Outcome::Valid(valid) => {
            assert_eq!(valid.states, 2);
            assert!((valid.mu[0] - 0.5).abs() < 1e-9);
            assert!((valid.mu[1] - 0.5).abs() < 1e-9);
            assert!((valid.mu_total - 1.0).abs() < 1e-9);
            for row in &valid.density {
                let sum: f64 = row.iter().sum();
                assert!((sum - 1.0).abs() < 1e-9);
            }
        }
        Outcome::Invalid(reason) => panic!("expected a valid SPN, got {reason:?}"),
    }
}

#[test]
fn spn_generate_random_produces_connected_nets() {
    let batch = spn_generate_random(4, 3, 0.25, 5, 10, false).unwrap();
    assert_eq!(batch.len(), 10);
    for (matrix, lambda) in &batch {
        assert_eq!(matrix.places, 4);
        assert_eq!(matrix.transitions, 3);
        assert_eq!(lambda.len(), 3);
        assert!(lambda.iter().all(|&r| (1.0..=5.0).contains(&r)));
    }
}
