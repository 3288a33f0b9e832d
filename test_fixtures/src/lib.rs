/// Graph fixtures shared by integration tests and benchmarks.
use std::path::PathBuf;
use wilson::graph::Graph;
use wilson::init::graph_from_networkx;

/// The location of the graph JSON data w.r.t. the project manifest.
const GRAPH_FIXTURES_DIR: &str = "graphs";

/// 3x4 grid graph (rook adjacency), node ids 100..112 in row-major order.
const GRID_FILENAME: &str = "grid_3x4.json";

/// Wheel graph: hub 0 joined to a 6-cycle 1..=6.
const WHEEL_FILENAME: &str = "wheel_6.json";

/// The path of a NetworkX graph fixture.
pub fn fixture_path(key: &str) -> String {
    let filename = match key {
        "grid_3x4" => GRID_FILENAME,
        "wheel_6" => WHEEL_FILENAME,
        bad => panic!("Unknown graph fixture '{}'", bad),
    };
    // stable dir: see https://stackoverflow.com/a/30004252
    let mut full_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    full_path.push(GRAPH_FIXTURES_DIR);
    full_path.push(filename);
    full_path.into_os_string().into_string().unwrap()
}

/// Loads a NetworkX graph fixture.
pub fn networkx_fixture(key: &str) -> Graph<usize> {
    graph_from_networkx(&fixture_path(key)).unwrap().0
}

/// The path graph 0 - 1 - ... - (n - 1).
pub fn path(n: usize) -> Graph<usize> {
    let edges = (1..n).map(|v| (v - 1, v));
    Graph::from_edges((0..n).collect(), edges).unwrap()
}

/// The cycle graph on `n >= 3` vertices.
pub fn cycle(n: usize) -> Graph<usize> {
    let edges = (0..n).map(|v| (v, (v + 1) % n));
    Graph::from_edges((0..n).collect(), edges).unwrap()
}

/// The complete graph on `n` vertices.
pub fn complete(n: usize) -> Graph<usize> {
    let edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
        .collect();
    Graph::from_edges((0..n).collect(), edges).unwrap()
}

/// Two disjoint edges `A - B` and `C - D`.
pub fn two_components() -> Graph<&'static str> {
    Graph::from_edges(vec!["A", "B", "C", "D"], vec![("A", "B"), ("C", "D")]).unwrap()
}

/// Connected test graphs of various shapes, keyed by name.
pub fn connected_fixture(key: &str) -> Graph<usize> {
    match key {
        "path_7" => path(7),
        "cycle_9" => cycle(9),
        "complete_6" => complete(6),
        "grid_3x4" | "wheel_6" => networkx_fixture(key),
        bad => panic!("Unknown graph fixture '{}'", bad),
    }
}
