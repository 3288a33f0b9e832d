//! Runners for batches of spanning tree samples.
//!
//! A runner draws many independent trees of one graph, optionally in
//! parallel, and streams them to a [TreeWriter]. Each individual tree is
//! drawn by a single thread; parallelism is only across trees.
use crate::config::SampleParams;
use crate::error::{Result, UstError};
use crate::graph::{Graph, Vertex};
use crate::random::BufferedSource;
use crate::spanning_tree::{ParentMap, USTSampler};
use crate::stats::{TreeWriter, WalkStats};
use crossbeam::scope;
use crossbeam_channel::{bounded, unbounded, Sender};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::cmp::min;
use std::thread;

/// Determines how many trees the writer thread can lag behind by.
const WRITER_CHANNEL_CAPACITY: usize = 16;

/// A unit of multithreaded work.
struct JobPacket {
    /// The number of trees to sample.
    n_trees: usize,
    /// A sentinel used to kill the worker thread.
    terminate: bool,
}

/// The result of a unit of multithreaded work.
struct ResultPacket<V> {
    /// The worker that produced the trees.
    t_idx: usize,
    /// The sampled trees, or the first error.
    trees: Result<Vec<(ParentMap<V>, WalkStats)>>,
}

/// A sampled tree on its way to the writer thread.
struct TreePacket<V> {
    /// The index of the tree in the run.
    index: u64,
    /// The tree and its statistics (only `None` when the termination
    /// sentinel is set).
    tree: Option<(ParentMap<V>, WalkStats)>,
    /// A sentinel used to kill the writer thread.
    terminate: bool,
}

/// Reports a panicking worker to the main thread, which would otherwise
/// wait forever for that worker's batch.
struct PanicGuard<V> {
    t_idx: usize,
    res_s: Sender<ResultPacket<V>>,
}

impl<V> Drop for PanicGuard<V> {
    fn drop(&mut self) {
        if thread::panicking() {
            let _ = self.res_s.send(ResultPacket {
                t_idx: self.t_idx,
                trees: Err(UstError::WorkerPanicked),
            });
        }
    }
}

/// A summary of a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// The number of trees written.
    pub num_trees: u64,
    /// Walk statistics summed over all trees.
    pub stats: WalkStats,
}

/// Draws `params.num_trees` uniform spanning trees of `graph` using
/// `params.n_threads` worker threads, writing them with `writer`.
///
/// Worker `t` seeds its own RNG with `params.rng_seed + t + 1` (wrapping
/// on overflow). Work is
/// handed out in rounds of up to `params.batch_size` trees per worker,
/// and each round's trees are written in worker order, so output is
/// reproducible for a fixed seed, thread count and batch size.
///
/// # Arguments
///
/// * `graph` - The (connected) graph to sample spanning trees of.
/// * `params` - The parameters of the run.
/// * `writer` - The tree writer (run on its own thread).
pub fn multi_sample<V>(
    graph: &Graph<V>,
    params: &SampleParams,
    mut writer: Box<dyn TreeWriter<V>>,
) -> Result<RunSummary>
where
    V: Vertex + Send + Sync,
{
    if graph.is_empty() {
        return Err(UstError::EmptyGraph);
    }
    let n_threads = params.n_threads.max(1);
    let batch_size = params.batch_size.max(1);

    // Every channel end lives inside the scope closure, so a panic on any
    // thread drops the senders and unblocks the threads waiting on them.
    let outcome = scope(|scope| {
        let mut job_sends = vec![]; // main thread sends work to job threads
        let mut job_recvs = vec![]; // job threads receive work from main thread
        for _ in 0..n_threads {
            let (s, r) = unbounded::<JobPacket>();
            job_sends.push(s);
            job_recvs.push(r);
        }
        // All job threads send sampled trees back to the main thread.
        let (result_send, result_recv) = unbounded::<ResultPacket<V>>();
        // The writer thread receives trees from the main thread.
        let (tree_send, tree_recv) = bounded::<TreePacket<V>>(WRITER_CHANNEL_CAPACITY);

        // Start writer thread.
        let writer_handle = scope.spawn(move |_| -> Result<()> {
            writer.init(graph)?;
            while let Ok(next) = tree_recv.recv() {
                if next.terminate {
                    break;
                }
                if let Some((tree, stats)) = next.tree {
                    writer.tree(next.index, graph, &tree, &stats)?;
                }
            }
            writer.close()?;
            Ok(())
        });

        // Start job threads.
        for (t_idx, job_r) in job_recvs.into_iter().enumerate() {
            let res_s = result_send.clone();
            let step_limit = params.step_limit;
            let seed = params.rng_seed.wrapping_add(t_idx as u64 + 1);
            scope.spawn(move |_| {
                let _guard = PanicGuard {
                    t_idx: t_idx,
                    res_s: res_s.clone(),
                };
                let rng: SmallRng = SeedableRng::seed_from_u64(seed);
                let mut source = BufferedSource::new(rng);
                let mut sampler = USTSampler::new(graph.len());
                if let Some(limit) = step_limit {
                    sampler = sampler.with_step_limit(limit);
                }
                while let Ok(next) = job_r.recv() {
                    if next.terminate {
                        break;
                    }
                    let trees = (0..next.n_trees)
                        .map(|_| sampler.random_spanning_tree_with_stats(graph, &mut source))
                        .collect::<Result<Vec<_>>>();
                    if res_s.send(ResultPacket { t_idx, trees }).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_send);

        let mut summary = RunSummary::default();
        let mut failure: Option<UstError> = None;
        let mut remaining = params.num_trees;
        while remaining > 0 && failure.is_none() {
            let mut active = 0;
            for job in job_sends.iter() {
                let n_trees = min(batch_size as u64, remaining) as usize;
                if n_trees == 0 {
                    break;
                }
                remaining -= n_trees as u64;
                if job.send(JobPacket { n_trees, terminate: false }).is_err() {
                    failure = Some(UstError::WorkerPanicked);
                    break;
                }
                active += 1;
            }

            let mut packets = Vec::<ResultPacket<V>>::with_capacity(active);
            for _ in 0..active {
                match result_recv.recv() {
                    Ok(packet) => packets.push(packet),
                    Err(_) => {
                        failure = Some(UstError::WorkerPanicked);
                        break;
                    }
                }
            }
            packets.sort_by_key(|packet| packet.t_idx);

            for packet in packets {
                match packet.trees {
                    Ok(trees) => {
                        for (tree, stats) in trees {
                            summary.stats += stats;
                            let packet = TreePacket {
                                index: summary.num_trees,
                                tree: Some((tree, stats)),
                                terminate: false,
                            };
                            if tree_send.send(packet).is_err() {
                                // The writer failed; its error is reported on join.
                                remaining = 0;
                                break;
                            }
                            summary.num_trees += 1;
                        }
                    }
                    Err(err) => {
                        if failure.is_none() {
                            failure = Some(err);
                        }
                    }
                }
            }
        }

        // Terminate worker threads.
        for job in job_sends.iter() {
            let _ = job.send(JobPacket {
                n_trees: 0,
                terminate: true,
            });
        }
        let _ = tree_send.send(TreePacket {
            index: summary.num_trees,
            tree: None,
            terminate: true,
        });
        let written = match writer_handle.join() {
            Ok(res) => res,
            Err(_) => Err(UstError::WorkerPanicked),
        };
        match failure {
            Some(err) => Err(err),
            None => written.map(|_| summary),
        }
    });

    match outcome {
        Ok(res) => res,
        Err(_) => Err(UstError::WorkerPanicked),
    }
}
