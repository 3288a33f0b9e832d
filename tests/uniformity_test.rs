// Statistical tests: sampled trees should be uniform over all spanning trees.
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wilson::random::{BufferedSource, RandomSource, RngSource};
use wilson::stats::{spanning_tree_count, TreeTally};
use wilson::{Graph, USTSampler, Vertex};

use rstest::rstest;
use test_fixtures::{complete, connected_fixture, cycle};

/// Upper 0.001 quantiles of the chi-squared distribution, by degrees of freedom.
fn chi_squared_critical(df: usize) -> f64 {
    match df {
        3 => 16.266,
        14 => 36.123,
        15 => 37.697,
        319 => 402.9,
        bad => panic!("No critical value for {} degrees of freedom", bad),
    }
}

/// Samples `samples_per_tree` times as many trees as `graph` has and
/// checks the tally against the uniform distribution.
fn check_uniform<V: Vertex, S: RandomSource>(graph: &Graph<V>, source: &mut S, samples_per_tree: usize) {
    let num_trees = spanning_tree_count(graph).unwrap().round() as usize;
    let mut sampler = USTSampler::new(graph.len());
    let mut tally = TreeTally::new();
    for _ in 0..(num_trees * samples_per_tree) {
        let tree = sampler.random_spanning_tree(graph, source).unwrap();
        tally.record(graph, &tree).unwrap();
    }
    assert_eq!(tally.distinct(), num_trees);
    let chi_squared = tally.chi_squared(num_trees);
    let critical = chi_squared_critical(num_trees - 1);
    assert!(
        chi_squared < critical,
        "chi-squared {} exceeds critical value {}",
        chi_squared,
        critical
    );
}

#[rstest]
fn four_cycle_is_uniform(#[values(1, 2, 3)] seed: u64) {
    let graph = cycle(4);
    let mut source = RngSource::new(SmallRng::seed_from_u64(seed));
    check_uniform(&graph, &mut source, 1000);
}

#[rstest]
fn complete_graph_is_uniform(#[values(1, 2)] seed: u64) {
    // Cayley: 4^2 = 16 trees.
    let graph = complete(4);
    let mut source = BufferedSource::new(SmallRng::seed_from_u64(seed));
    check_uniform(&graph, &mut source, 500);
}

#[test]
fn small_grid_is_uniform() {
    // 2x3 grid: 15 trees.
    let graph = Graph::grid(2, 3);
    let mut source = BufferedSource::new(SmallRng::seed_from_u64(42));
    check_uniform(&graph, &mut source, 500);
}

#[test]
fn wheel_is_uniform() {
    // Hub degree 6 and rim degree 3: uneven degrees exercise the walk.
    let graph = connected_fixture("wheel_6");
    let mut source = BufferedSource::new(SmallRng::seed_from_u64(1996));
    check_uniform(&graph, &mut source, 60);
}

#[test]
fn kirchhoff_counts_of_fixtures() {
    assert_eq!(spanning_tree_count(&connected_fixture("wheel_6")).unwrap().round(), 320.);
    assert_eq!(spanning_tree_count(&connected_fixture("grid_3x4")).unwrap().round(), 2415.);
    assert_eq!(spanning_tree_count(&connected_fixture("path_7")).unwrap().round(), 1.);
    assert_eq!(spanning_tree_count(&connected_fixture("cycle_9")).unwrap().round(), 9.);
}
