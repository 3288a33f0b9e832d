//! Main CLI for wilson.
use mimalloc::MiMalloc;
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::{bail, Context, Result};
use clap::{value_t, App, Arg};
use serde::Serialize;
use serde_json::json;
use sha3::{Digest, Sha3_256};
use std::path::PathBuf;
use std::{fs, io};
use wilson::config::{parse_sample_params, SampleParams};
use wilson::graph::{Graph, Vertex};
use wilson::init::graph_from_networkx;
use wilson::run::multi_sample;
use wilson::stats::{JSONLWriter, TSVWriter, TreeWriter};

/// Parses a grid size of the form `WxH`.
fn parse_grid(raw: &str) -> Result<(usize, usize)> {
    let (w, h) = raw
        .split_once('x')
        .with_context(|| format!("Grid size '{}' is not of the form WxH", raw))?;
    let width = w.trim().parse::<usize>().context("Invalid grid width")?;
    let height = h.trim().parse::<usize>().context("Invalid grid height")?;
    if width == 0 || height == 0 {
        bail!("Grid dimensions must be positive");
    }
    Ok((width, height))
}

fn make_writer<V: Vertex + Serialize>(kind: &str) -> Result<Box<dyn TreeWriter<V>>> {
    let writer: Box<dyn TreeWriter<V>> = match kind {
        "jsonl" => Box::new(JSONLWriter::stdout(false)),
        "jsonl-stats" => Box::new(JSONLWriter::stdout(true)),
        "tsv" => Box::new(TSVWriter::stdout()),
        bad => bail!("Parameter error: invalid writer '{}'", bad),
    };
    Ok(writer)
}

/// Samples trees of `graph`, reporting a summary on stderr.
fn run<V>(graph: &Graph<V>, params: &SampleParams, writer: &str, check_connected: bool) -> Result<()>
where
    V: Vertex + Serialize + Send + Sync,
{
    if check_connected {
        graph.check_connected()?;
    }
    let summary = multi_sample(graph, params, make_writer(writer)?)?;
    eprintln!(
        "{}",
        json!({ "summary": { "num_trees": summary.num_trees, "stats": summary.stats } })
    );
    Ok(())
}

fn main() -> Result<()> {
    let matches = App::new("ust")
        .version("0.1.0")
        .author("Parker J. Rule <parker.rule@tufts.edu>")
        .about("Uniform spanning trees via Wilson's algorithm")
        .arg(
            Arg::with_name("graph_json")
                .long("graph-json")
                .takes_value(true)
                .conflicts_with("grid")
                .required_unless("grid")
                .help("The path of the graph (in NetworkX adjacency format)."),
        )
        .arg(
            Arg::with_name("grid")
                .long("grid")
                .takes_value(true)
                .help("Sample trees of a WxH grid graph instead of a graph file."),
        )
        .arg(
            Arg::with_name("num_trees")
                .long("num-trees")
                .takes_value(true)
                .default_value("1")
                .help("The number of trees to draw."),
        )
        .arg(
            Arg::with_name("rng_seed")
                .long("rng-seed")
                .takes_value(true)
                .default_value("0")
                .help("The seed of the RNG used to draw trees."),
        )
        .arg(
            Arg::with_name("n_threads")
                .long("n-threads")
                .takes_value(true)
                .default_value("1")
                .help("The number of threads to use."),
        )
        .arg(
            Arg::with_name("batch_size")
                .long("batch-size")
                .takes_value(true)
                .default_value("1")
                .help("The number of trees per batch job."),
        )
        .arg(
            Arg::with_name("step_limit")
                .long("step-limit")
                .takes_value(true)
                .help("Abort after this many random walk steps per tree (diagnostic)."),
        )
        .arg(
            Arg::with_name("params_json")
                .long("params-json")
                .takes_value(true)
                .help("Sampling parameters as a JSON object (overrides the flags above)."),
        )
        .arg(
            Arg::with_name("writer")
                .long("writer")
                .takes_value(true)
                .default_value("jsonl"),
        ) // other options: jsonl-stats, tsv
        .arg(Arg::with_name("check_connected").long("check-connected"))
        .get_matches();

    let params = match matches.value_of("params_json") {
        Some(raw) => parse_sample_params(raw)?,
        None => {
            let params = SampleParams {
                num_trees: value_t!(matches.value_of("num_trees"), u64).unwrap_or_else(|e| e.exit()),
                rng_seed: value_t!(matches.value_of("rng_seed"), u64).unwrap_or_else(|e| e.exit()),
                n_threads: value_t!(matches.value_of("n_threads"), usize).unwrap_or_else(|e| e.exit()),
                batch_size: value_t!(matches.value_of("batch_size"), usize).unwrap_or_else(|e| e.exit()),
                step_limit: if matches.is_present("step_limit") {
                    Some(value_t!(matches.value_of("step_limit"), u64).unwrap_or_else(|e| e.exit()))
                } else {
                    None
                },
            };
            params.validate()?;
            params
        }
    };
    let writer = matches.value_of("writer").unwrap_or("jsonl");
    let check_connected = matches.is_present("check_connected");

    let mut meta = json!({
        "rng_seed": params.rng_seed,
        "num_trees": params.num_trees,
        "num_threads": params.n_threads,
        "batch_size": params.batch_size,
        "step_limit": params.step_limit,
        "parallel": params.n_threads > 1,
    });
    let fields = meta
        .as_object_mut()
        .context("Run metadata is not an object")?;

    if let Some(grid) = matches.value_of("grid") {
        let (width, height) = parse_grid(grid)?;
        fields.insert("grid".to_string(), json!([width, height]));
        println!("{}", json!({ "meta": meta }));
        run(&Graph::grid(width, height), &params, writer, check_connected)
    } else {
        let raw_path = matches.value_of("graph_json").context("No graph given")?;
        let graph_json = fs::canonicalize(PathBuf::from(raw_path))
            .with_context(|| format!("Could not find graph file {}", raw_path))?
            .into_os_string()
            .into_string()
            .map_err(|path| anyhow::anyhow!("Graph path {:?} is not valid UTF-8", path))?;
        let (graph, _) = graph_from_networkx(&graph_json)?;

        let mut graph_file = fs::File::open(&graph_json)?;
        let mut graph_hasher = Sha3_256::new();
        io::copy(&mut graph_file, &mut graph_hasher)?;
        let graph_hash = format!("{:x}", graph_hasher.finalize());
        fields.insert("graph_path".to_string(), json!(graph_json));
        fields.insert("graph_sha3".to_string(), json!(graph_hash));
        println!("{}", json!({ "meta": meta }));
        run(&graph, &params, writer, check_connected)
    }
}
