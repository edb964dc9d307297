//! Runtime job queues and worker orchestration (engine-only).
#![forbid(unsafe_code)]

mod slices;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use hashbrown::HashSet;
use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_field::{GenError, GenResult};
use strata_mesh_cpu::extract;
use strata_world::config::RuntimeConfig;
use strata_world::{Chunk, ChunkCoord, ChunkDescriptor, ChunkPartitioner, World, WorldConfig, sample_chunk};

pub use slices::{MeshingPool, extract_parallel};
pub use strata_mesh_cpu::SliceAxis;

#[derive(Clone, Debug)]
pub struct ChunkJob {
    pub desc: ChunkDescriptor,
    pub config: Arc<WorldConfig>,
    pub rev: u64,
    pub job_id: u64,
}

#[derive(Debug)]
pub struct ChunkOut {
    pub result: GenResult<Chunk>,
    pub coord: ChunkCoord,
    pub index: usize,
    pub rev: u64,
    pub job_id: u64,
    pub t_total_ms: u32,
    pub t_gen_ms: u32,
    pub t_mesh_ms: u32,
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_chunk_job(job: ChunkJob, mesher: Option<&MeshingPool>, tx: &Sender<ChunkOut>) {
    let ChunkJob {
        desc,
        config,
        rev,
        job_id,
    } = job;
    let t_job_start = Instant::now();
    let sampled = sample_chunk(&desc, &config);
    let t_gen_ms = elapsed_ms(t_job_start);

    let t0 = Instant::now();
    let result = sampled.and_then(|field| {
        let mesh = match mesher {
            Some(pool) => pool.extract(&field, config.threshold, config.runtime.slice_axis)?,
            None => extract(&field, config.threshold)?,
        };
        Ok(Chunk {
            desc: desc.clone(),
            field,
            mesh,
        })
    });
    let t_mesh_ms = elapsed_ms(t0);

    let _ = tx.send(ChunkOut {
        result,
        coord: desc.coord,
        index: desc.index,
        rev,
        job_id,
        t_total_ms: elapsed_ms(t_job_start),
        t_gen_ms,
        t_mesh_ms,
    });
}

/// Chunk workers fed through a job channel, with results collected on a
/// second channel.
pub struct ChunkRuntime {
    job_tx: Sender<ChunkJob>,
    res_rx: Receiver<ChunkOut>,
    _pool: Arc<ThreadPool>,
    mesher: Option<Arc<MeshingPool>>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    next_job_id: AtomicU64,
    pub workers: usize,
}

impl ChunkRuntime {
    /// Starts `workers` chunk workers (0 = available parallelism). With
    /// `mesh_threads > 0` chunks are meshed slice-parallel on a shared
    /// [`MeshingPool`] of that size.
    pub fn new(workers: usize, mesh_threads: usize) -> GenResult<Self> {
        let workers = if workers == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            workers
        };
        let mesher = if mesh_threads > 0 {
            Some(Arc::new(MeshingPool::with_threads(mesh_threads)?))
        } else {
            None
        };

        let (job_tx, job_rx) = unbounded::<ChunkJob>();
        let (res_tx, res_rx) = unbounded::<ChunkOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("strata-chunk-{i}"))
                .build()
                .map_err(|e| GenError::WorkerPool(e.to_string()))?,
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            let mesher = mesher.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_chunk_job(job, mesher.as_deref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!(
            "chunk runtime: {} workers, {} mesh threads",
            workers,
            mesher.as_ref().map_or(0, |m| m.threads())
        );

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            mesher,
            queued,
            inflight,
            next_job_id: AtomicU64::new(1),
            workers,
        })
    }

    pub fn from_config(cfg: &RuntimeConfig) -> GenResult<Self> {
        Self::new(cfg.workers, cfg.mesh_threads)
    }

    pub fn mesh_threads(&self) -> usize {
        self.mesher.as_ref().map_or(0, |m| m.threads())
    }

    /// Queues one chunk and returns its job id.
    pub fn submit(&self, desc: ChunkDescriptor, config: Arc<WorldConfig>, rev: u64) -> u64 {
        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        self.queued.fetch_add(1, Ordering::Relaxed);
        let job = ChunkJob {
            desc,
            config,
            rev,
            job_id,
        };
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
            log::warn!("chunk job {job_id} dropped: workers are gone");
        }
        job_id
    }

    /// Finished jobs available right now, at most `max`.
    pub fn drain_results(&self, max: usize) -> Vec<ChunkOut> {
        self.res_rx.try_iter().take(max).collect()
    }

    pub fn queue_len(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    pub fn inflight_len(&self) -> usize {
        self.inflight.load(Ordering::Relaxed)
    }

    /// Generates every chunk of the world's current configuration and
    /// returns them in partition order.
    ///
    /// Results that belong to jobs submitted outside this call are discarded.
    /// A chunk failure is reported after all jobs of the batch have finished.
    pub fn regenerate(&mut self, world: &World) -> GenResult<Vec<Chunk>> {
        let cfg = world.config();
        let rev = world.revision();
        let part = ChunkPartitioner::from_config(&cfg)?;
        let t0 = Instant::now();

        let mut pending: HashSet<u64> = part
            .iter()
            .map(|desc| self.submit(desc, Arc::clone(&cfg), rev))
            .collect();
        let mut chunks = Vec::with_capacity(pending.len());
        let mut first_err = None;
        while !pending.is_empty() {
            let out = self
                .res_rx
                .recv()
                .map_err(|_| GenError::WorkerPool("result channel closed".to_string()))?;
            if !pending.remove(&out.job_id) {
                continue;
            }
            match out.result {
                Ok(chunk) => {
                    log::debug!(
                        "chunk {} rev {} total {}ms (gen {}ms, mesh {}ms)",
                        out.coord,
                        out.rev,
                        out.t_total_ms,
                        out.t_gen_ms,
                        out.t_mesh_ms
                    );
                    chunks.push(chunk);
                }
                Err(e) => {
                    log::warn!("chunk {} failed: {}", out.coord, e);
                    first_err.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_err {
            return Err(e);
        }
        chunks.sort_by_key(|c| c.desc.index);
        log::info!(
            "regenerated {} chunks (rev {}) in {:.1}ms",
            chunks.len(),
            rev,
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Ok(chunks)
    }
}
