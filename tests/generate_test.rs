// Functional tests that verify spanning tree invariants of sampled trees.
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::io::Result as IOResult;
use std::sync::{Arc, Mutex};
use wilson::config::SampleParams;
use wilson::random::{BufferedSource, RecordingSource, RngSource};
use wilson::run::multi_sample;
use wilson::stats::{TreeWriter, WalkStats};
use wilson::{generate, generate_connected, Graph, ParentMap, USTSampler, UstError, Vertex};

use rstest::rstest;
use test_fixtures::{connected_fixture, path, two_components};

/// Verifies the tree properties independently of [ParentMap::verify]:
/// `|V| - 1` edges, every edge in the graph, and every vertex reaching
/// the root without revisiting a vertex.
fn assert_spanning_tree<V: Vertex>(graph: &Graph<V>, tree: &ParentMap<V>) {
    assert_eq!(tree.len(), graph.len() - 1);
    assert!(graph.vertices().contains(tree.root()));
    assert!(tree.parent(tree.root()).is_none());
    for (child, parent) in tree.iter() {
        let neighbors: Vec<&V> = graph.neighbors(child).unwrap().collect();
        assert!(neighbors.contains(&parent), "{:?} -> {:?} is not an edge", child, parent);
    }
    for v in graph.vertices() {
        let mut seen = HashSet::new();
        let mut cur = v.clone();
        while let Some(parent) = tree.parent(&cur) {
            assert!(seen.insert(cur.clone()), "cycle through {:?}", cur);
            cur = parent.clone();
        }
        assert_eq!(&cur, tree.root());
    }
}

#[rstest]
fn sampled_trees_span(
    #[values("path_7", "cycle_9", "complete_6", "grid_3x4", "wheel_6")] key: &str,
    #[values(1, 2, 3, 12345)] seed: u64,
) {
    let graph = connected_fixture(key);
    let mut source = RngSource::new(SmallRng::seed_from_u64(seed));
    let mut sampler = USTSampler::new(graph.len());
    for _ in 0..25 {
        let tree = sampler.random_spanning_tree(&graph, &mut source).unwrap();
        assert_spanning_tree(&graph, &tree);
        tree.verify(&graph).unwrap();
    }
}

#[rstest]
fn buffered_source_trees_span(#[values("grid_3x4", "wheel_6")] key: &str) {
    let graph = connected_fixture(key);
    let mut source = BufferedSource::new(SmallRng::seed_from_u64(77));
    for _ in 0..25 {
        let tree = generate(&graph, &mut source).unwrap();
        assert_spanning_tree(&graph, &tree);
    }
}

#[test]
fn path_graph_has_one_tree() {
    let graph = Graph::from_edges(vec!["A", "B", "C"], vec![("A", "B"), ("B", "C")]).unwrap();
    let expected: HashSet<Vec<usize>> = vec![vec![0, 1]].into_iter().collect();
    let mut source = RngSource::new(SmallRng::seed_from_u64(5));
    for _ in 0..20 {
        let tree = generate(&graph, &mut source).unwrap();
        let mut edges: Vec<(&str, &str)> = tree
            .edges()
            .into_iter()
            .map(|(c, p)| if c < p { (c, p) } else { (p, c) })
            .collect();
        edges.sort();
        assert_eq!(edges, vec![("A", "B"), ("B", "C")]);
        let key: HashSet<Vec<usize>> = vec![tree.edge_indices(&graph).unwrap()].into_iter().collect();
        assert_eq!(key, expected);
    }
}

#[test]
fn single_vertex_graph() {
    let graph = path(1);
    let mut source = RngSource::new(SmallRng::seed_from_u64(0));
    let tree = generate(&graph, &mut source).unwrap();
    assert_eq!(tree.root(), &0);
    assert!(tree.is_empty());
    assert_eq!(tree.parent(&0), None);
}

#[test]
fn recorded_choices_replay_exactly() {
    let graph = connected_fixture("grid_3x4");
    let mut recording = RecordingSource::new(RngSource::new(SmallRng::seed_from_u64(31)));
    let tree = generate(&graph, &mut recording).unwrap();
    let mut replay = recording.replay();
    let replayed = generate(&graph, &mut replay).unwrap();
    assert_eq!(tree, replayed);
    assert_eq!(replay.remaining(), 0);
}

#[test]
fn same_seed_same_trees() {
    let graph = connected_fixture("wheel_6");
    let draw = |seed: u64| -> Vec<ParentMap<usize>> {
        let mut source = BufferedSource::new(SmallRng::seed_from_u64(seed));
        let mut sampler = USTSampler::new(graph.len());
        (0..10)
            .map(|_| sampler.random_spanning_tree(&graph, &mut source).unwrap())
            .collect()
    };
    assert_eq!(draw(8), draw(8));
    assert_ne!(draw(8), draw(9));
}

#[test]
fn disconnected_graph_is_rejected_up_front() {
    let graph = two_components();
    let mut source = RngSource::new(SmallRng::seed_from_u64(0));
    match generate_connected(&graph, &mut source) {
        Err(UstError::Disconnected { components }) => assert_eq!(components, 2),
        other => panic!("expected Disconnected, got {:?}", other),
    }
}

#[test]
fn disconnected_graph_never_completes_under_step_limit() {
    let graph = two_components();
    let mut source = RngSource::new(SmallRng::seed_from_u64(0));
    let mut sampler = USTSampler::new(graph.len()).with_step_limit(10_000);
    for _ in 0..5 {
        let res = sampler.random_spanning_tree(&graph, &mut source);
        assert!(matches!(res, Err(UstError::StepLimitExceeded { limit: 10_000 })));
    }
}

#[test]
fn step_limit_does_not_affect_connected_samples() {
    // A generous limit never binds on a small connected graph, so the
    // limited sampler consumes the same choices and draws the same trees.
    let graph = connected_fixture("cycle_9");
    let mut unlimited = USTSampler::new(graph.len());
    let mut limited = USTSampler::new(graph.len()).with_step_limit(1_000_000);
    let mut a = RngSource::new(SmallRng::seed_from_u64(4));
    let mut b = RngSource::new(SmallRng::seed_from_u64(4));
    for _ in 0..10 {
        assert_eq!(
            unlimited.random_spanning_tree(&graph, &mut a).unwrap(),
            limited.random_spanning_tree(&graph, &mut b).unwrap()
        );
    }
}

/// A writer that collects trees in memory.
struct CollectingWriter {
    trees: Arc<Mutex<Vec<ParentMap<usize>>>>,
}

impl TreeWriter<usize> for CollectingWriter {
    fn init(&mut self, _graph: &Graph<usize>) -> IOResult<()> {
        Ok(())
    }

    fn tree(
        &mut self,
        _index: u64,
        _graph: &Graph<usize>,
        tree: &ParentMap<usize>,
        _stats: &WalkStats,
    ) -> IOResult<()> {
        self.trees.lock().unwrap().push(tree.clone());
        Ok(())
    }

    fn close(&mut self) -> IOResult<()> {
        Ok(())
    }
}

#[rstest]
fn multi_sample_trees_span(#[values(1, 2, 4)] n_threads: usize, #[values(1, 5)] batch_size: usize) {
    let graph = connected_fixture("grid_3x4");
    let trees = Arc::new(Mutex::new(vec![]));
    let writer = CollectingWriter {
        trees: trees.clone(),
    };
    let params = SampleParams {
        num_trees: 30,
        rng_seed: 2021,
        n_threads: n_threads,
        batch_size: batch_size,
        step_limit: None,
    };
    let summary = multi_sample(&graph, &params, Box::new(writer)).unwrap();
    assert_eq!(summary.num_trees, 30);
    let trees = trees.lock().unwrap();
    assert_eq!(trees.len(), 30);
    for tree in trees.iter() {
        assert_spanning_tree(&graph, tree);
    }
}
