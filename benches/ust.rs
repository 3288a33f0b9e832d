/// Uniform spanning tree benchmarks.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io;
use std::time::Instant;
use wilson::config::SampleParams;
use wilson::graph::Graph;
use wilson::random::{BufferedSource, RngSource};
use wilson::run::multi_sample;
use wilson::spanning_tree::USTSampler;
use wilson::stats::{TSVWriter, TreeWriter};
use test_fixtures::networkx_fixture;

/// RNG seed for all benchmarks.
const RNG_SEED: u64 = 153434375;

/// Side length of the benchmark grid.
const SIDE: usize = 24;

fn grid_buffered_benchmark(c: &mut Criterion) {
    let graph = Graph::grid(SIDE, SIDE);
    let mut source = BufferedSource::new(SmallRng::seed_from_u64(RNG_SEED));
    let mut sampler = USTSampler::new(graph.len());
    c.bench_function("UST, 24x24 grid, buffered source", |b| {
        b.iter(|| black_box(sampler.random_spanning_tree(&graph, &mut source).unwrap()))
    });
}

fn grid_rng_benchmark(c: &mut Criterion) {
    let graph = Graph::grid(SIDE, SIDE);
    let mut source = RngSource::new(SmallRng::seed_from_u64(RNG_SEED));
    let mut sampler = USTSampler::new(graph.len());
    c.bench_function("UST, 24x24 grid, gen_range source", |b| {
        b.iter(|| black_box(sampler.random_spanning_tree(&graph, &mut source).unwrap()))
    });
}

fn wheel_benchmark(c: &mut Criterion) {
    let graph = networkx_fixture("wheel_6");
    let mut source = BufferedSource::new(SmallRng::seed_from_u64(RNG_SEED));
    let mut sampler = USTSampler::new(graph.len());
    c.bench_function("UST, 6-wheel", |b| {
        b.iter(|| black_box(sampler.random_spanning_tree(&graph, &mut source).unwrap()))
    });
}

fn grid_multi_thread_benchmark(c: &mut Criterion) {
    c.bench_function("UST, 24x24 grid, 4 threads", move |b| {
        b.iter_custom(|iters| {
            let graph = Graph::grid(SIDE, SIDE);
            let writer = Box::new(TSVWriter::new(Box::new(io::sink()))) as Box<dyn TreeWriter<(usize, usize)>>;
            let params = SampleParams {
                num_trees: iters,
                rng_seed: RNG_SEED,
                n_threads: 4,
                batch_size: 16,
                step_limit: None,
            };
            let start = Instant::now();
            multi_sample(&graph, &params, writer).unwrap();
            start.elapsed()
        })
    });
}

criterion_group!(
    benches,
    grid_buffered_benchmark,
    grid_rng_benchmark,
    wheel_benchmark,
    grid_multi_thread_benchmark
);
criterion_main!(benches);
