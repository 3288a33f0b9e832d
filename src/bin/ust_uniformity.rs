//! Uniformity statistics of Wilson's algorithm on small grid graphs.
//!
//! Draws many trees of a grid small enough that every spanning tree is
//! likely to be seen, then compares the tally against the uniform
//! distribution over the Kirchhoff count of trees.
use mimalloc::MiMalloc;
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::{bail, Result};
use clap::{value_t, App, Arg};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;
use wilson::graph::Graph;
use wilson::random::BufferedSource;
use wilson::spanning_tree::USTSampler;
use wilson::stats::{spanning_tree_count, TreeTally, WalkStats};

fn main() -> Result<()> {
    let matches = App::new("ust-uniformity")
        .version("0.1.0")
        .author("Parker J. Rule <parker.rule@tufts.edu>")
        .about("Uniformity statistics of spanning trees on a small grid graph")
        .arg(
            Arg::with_name("num_trees")
                .long("num-trees")
                .takes_value(true)
                .required(true)
                .help("The number of trees to draw."),
        )
        .arg(
            Arg::with_name("rng_seed")
                .long("rng-seed")
                .takes_value(true)
                .required(true)
                .help("The seed of the RNG used to draw trees."),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .default_value("3")
                .help("The width of the grid."),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .default_value("3")
                .help("The height of the grid."),
        )
        .get_matches();

    let rng_seed = value_t!(matches.value_of("rng_seed"), u64).unwrap_or_else(|e| e.exit());
    let num_trees = value_t!(matches.value_of("num_trees"), u64).unwrap_or_else(|e| e.exit());
    let width = value_t!(matches.value_of("width"), usize).unwrap_or_else(|e| e.exit());
    let height = value_t!(matches.value_of("height"), usize).unwrap_or_else(|e| e.exit());
    if width == 0 || height == 0 {
        bail!("Grid dimensions must be positive");
    }

    let graph = Graph::grid(width, height);
    let expected = spanning_tree_count(&graph)?;
    if expected > 1e6 {
        bail!("A {}x{} grid has too many spanning trees ({:e}) to tally", width, height, expected);
    }
    let rng: SmallRng = SeedableRng::seed_from_u64(rng_seed);
    let mut source = BufferedSource::new(rng);
    let mut sampler = USTSampler::new(graph.len());
    let mut tally = TreeTally::new();
    let mut stats = WalkStats::default();
    for _ in 0..num_trees {
        let (tree, tree_stats) = sampler.random_spanning_tree_with_stats(&graph, &mut source)?;
        tally.record(&graph, &tree)?;
        stats += tree_stats;
    }

    let num_st = expected.round() as usize;
    println!(
        "{}",
        json!({
            "grid": [width, height],
            "rng_seed": rng_seed,
            "num_trees": num_trees,
            "spanning_trees": num_st,
            "distinct": tally.distinct(),
            "chi_squared": tally.chi_squared(num_st),
            "degrees_of_freedom": num_st.saturating_sub(1),
            "stats": stats,
            "erased_fraction": stats.erased_fraction(),
        })
    );
    Ok(())
}
