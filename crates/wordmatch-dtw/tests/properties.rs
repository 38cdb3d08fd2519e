//! Seeded randomized checks of metric and alignment-path invariants.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wordmatch_dtw::{CostMatrix, DpMatcher, FeatureSequence, euclidean};

const DIM: usize = 4;

fn random_sequence(rng: &mut ChaCha8Rng, max_frames: usize) -> FeatureSequence {
    let frames = rng.gen_range(1..=max_frames);
    let values: Vec<f64> = (0..frames * DIM).map(|_| rng.gen_range(-5.0..5.0)).collect();
    FeatureSequence::from_flat(DIM, values).unwrap()
}

#[test]
fn local_distance_is_symmetric_with_zero_identity() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..200 {
        let a: Vec<f64> = (0..DIM).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let b: Vec<f64> = (0..DIM).map(|_| rng.gen_range(-10.0..10.0)).collect();
        assert_eq!(euclidean(&a, &b), euclidean(&b, &a));
        assert_eq!(euclidean(&a, &a), 0.0);
        assert!(euclidean(&a, &b) >= 0.0);
    }
}

#[test]
fn paths_are_monotone_and_span_the_matrix() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut workspace = CostMatrix::with_capacity(24);

    for round in 0..150 {
        let template = random_sequence(&mut rng, 24);
        let input = random_sequence(&mut rng, 24);
        let weight = [0.5, 1.0, 2.0][round % 3];
        let matcher = DpMatcher::new(weight).unwrap().with_path_tracking(true);

        let outcome = matcher
            .match_with(&mut workspace, template.as_view(), input.as_view())
            .unwrap();
        let path = outcome.path.expect("path tracking enabled");
        let steps = path.steps();

        let first = steps.first().unwrap();
        let last = steps.last().unwrap();
        assert_eq!((first.template, first.input), (0, 0));
        assert_eq!((last.template, last.input), (template.len() - 1, input.len() - 1));
        assert!(path.len() <= template.len() + input.len() - 1);
        assert!(path.len() >= template.len().max(input.len()));

        for pair in steps.windows(2) {
            let dt = pair[1].template - pair[0].template;
            let di = pair[1].input - pair[0].input;
            assert!(
                matches!((dt, di), (1, 0) | (0, 1) | (1, 1)),
                "round {round}: illegal step {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn distances_are_finite_and_non_negative() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    let matcher = DpMatcher::default();
    for _ in 0..100 {
        let a = random_sequence(&mut rng, 16);
        let b = random_sequence(&mut rng, 16);
        let d = matcher.distance(a.as_view(), b.as_view()).unwrap().value();
        assert!(d.is_finite() && d >= 0.0);
    }
}

#[test]
fn matching_is_deterministic() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let a = random_sequence(&mut rng, 30);
    let b = random_sequence(&mut rng, 30);
    let matcher = DpMatcher::default().with_path_tracking(true);
    let first = matcher.match_pair(a.as_view(), b.as_view()).unwrap();
    let second = matcher.match_pair(a.as_view(), b.as_view()).unwrap();
    assert_eq!(first.distance.value().to_bits(), second.distance.value().to_bits());
    assert_eq!(first.path, second.path);
}
