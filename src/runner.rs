//! Execution engine: partitions input, aggregates partitions on workers, merges.
//!
//! A run has two phases separated by a full join barrier:
//!
//! 1. **Local**: the input is cut into contiguous partitions on line boundaries
//!    and every partition is folded into a private map by its own worker. No
//!    state is shared, so there are no locks or atomics on the hot path.
//! 2. **Merge**: after every worker has finished, the private maps are folded
//!    into one on the calling thread with [`CombineFn::merge`].
//!
//! If any partition fails, the parallel collect stops handing out work, every
//! partial map is dropped, and the first error is returned.
//!
//! The local phase either folds every value straight into its accumulator or,
//! with [`Runner::buffered`] set, buffers values per station and reduces them
//! in bulk through a [`LiftableCombiner`]. Both give the same report.

use crate::combiners::{CombineFn, LiftableCombiner, MinMeanMax};
use crate::config::RunConfig;
use crate::error::Result;
use crate::io::{split_partitions, ByteSource, ChunkReader, MappedFile};
use crate::metrics::{names, MetricsCollector};
use crate::partition::{aggregate_chunk, aggregate_chunk_lifted, Aggregation};
use crate::report::Report;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    /// One partition on the calling thread.
    Sequential,
    /// `partitions` partitions on a pool of `threads` workers. Both default to
    /// the number of available processors.
    Parallel {
        threads: Option<usize>,
        partitions: Option<usize>,
    },
}

pub struct Runner {
    pub mode: ExecMode,
    /// Bytes per chunk when streaming from a reader.
    pub chunk_size_hint: usize,
    /// Report runs buffer values per station and reduce them in bulk.
    pub buffered: bool,
    metrics: Option<MetricsCollector>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: None,
            },
            chunk_size_hint: RunConfig::DEFAULT_CHUNK_SIZE,
            buffered: false,
            metrics: None,
        }
    }
}

impl Runner {
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            mode: ExecMode::Sequential,
            ..Self::default()
        }
    }

    /// Parallel runner with `threads` workers and one partition per worker.
    #[must_use]
    pub fn parallel(threads: usize) -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: Some(threads),
                partitions: None,
            },
            ..Self::default()
        }
    }

    /// # Errors
    /// [`crate::Error::InvalidConfig`] if `cfg` does not validate.
    pub fn from_config(cfg: &RunConfig) -> Result<Self> {
        cfg.validate()?;
        let mode = if cfg.sequential {
            ExecMode::Sequential
        } else {
            ExecMode::Parallel {
                threads: Some(cfg.workers()),
                partitions: Some(cfg.partitions()),
            }
        };
        Ok(Self {
            mode,
            chunk_size_hint: cfg.chunk_size_hint,
            buffered: cfg.buffered,
            metrics: None,
        })
    }

    /// Bytes per chunk when streaming from a reader.
    #[must_use]
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size_hint = bytes.max(1);
        self
    }

    /// Use the buffered bulk-reduction path in the report entry points.
    #[must_use]
    pub fn with_buffering(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    /// Record timing and counters of every run into `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    #[must_use]
    pub fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics.as_ref()
    }

    /// Worker threads this runner uses.
    #[must_use]
    pub fn workers(&self) -> usize {
        match self.mode {
            ExecMode::Sequential => 1,
            ExecMode::Parallel { threads, .. } => threads.unwrap_or_else(num_cpus::get).max(1),
        }
    }

    /// Partitions a mapped input is cut into.
    #[must_use]
    pub fn partitions(&self) -> usize {
        match self.mode {
            ExecMode::Sequential => 1,
            ExecMode::Parallel { partitions, .. } => {
                partitions.unwrap_or_else(|| self.workers()).max(1)
            }
        }
    }

    /* ---------------- Report-producing entry points ---------------- */

    /// Aggregate a file and render its report.
    ///
    /// # Errors
    /// Read failures, malformed lines or values.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<Report> {
        let mapped = MappedFile::open(path)?;
        self.run_bytes(&mapped)
    }

    /// Aggregate an in-memory input and render its report.
    ///
    /// # Errors
    /// Malformed lines or values.
    pub fn run_bytes<S: ByteSource + ?Sized>(&self, source: &S) -> Result<Report> {
        let agg = if self.buffered {
            self.aggregate_bytes_lifted(source, &MinMeanMax)?
        } else {
            self.aggregate_bytes(source, &MinMeanMax)?
        };
        Ok(Report::from(agg.finish(&MinMeanMax)?))
    }

    /// Aggregate a stream and render its report.
    ///
    /// # Errors
    /// Read failures, malformed lines or values.
    pub fn run_reader<R: Read>(&self, reader: R) -> Result<Report> {
        let agg = if self.buffered {
            self.aggregate_reader_lifted(reader, &MinMeanMax)?
        } else {
            self.aggregate_reader(reader, &MinMeanMax)?
        };
        Ok(Report::from(agg.finish(&MinMeanMax)?))
    }

    /* ---------------- Generic aggregation ---------------- */

    /// Aggregate a whole in-memory input with any combiner.
    ///
    /// # Errors
    /// The first error raised by any partition.
    pub fn aggregate_bytes<S, C, A, O>(&self, source: &S, comb: &C) -> Result<Aggregation<A>>
    where
        S: ByteSource + ?Sized,
        C: CombineFn<f64, A, O>,
        A: Send,
    {
        self.aggregate_source(source.bytes(), comb, |part| aggregate_chunk(part, comb))
    }

    /// Like [`Runner::aggregate_bytes`], buffering values per station and
    /// reducing them with [`LiftableCombiner::build_from_group`].
    ///
    /// # Errors
    /// The first error raised by any partition.
    pub fn aggregate_bytes_lifted<S, C, A, O>(
        &self,
        source: &S,
        comb: &C,
    ) -> Result<Aggregation<A>>
    where
        S: ByteSource + ?Sized,
        C: LiftableCombiner<f64, A, O>,
        A: Send,
    {
        self.aggregate_source(source.bytes(), comb, |part| {
            aggregate_chunk_lifted(part, comb)
        })
    }

    /// Aggregate a stream with any combiner.
    ///
    /// The stream is read in chunks of `chunk_size_hint` bytes. Chunks are
    /// processed in waves of one chunk per partition; each wave is joined and
    /// merged before the next is read, which bounds memory to one wave.
    ///
    /// # Errors
    /// The first read or parse error.
    pub fn aggregate_reader<R, C, A, O>(&self, reader: R, comb: &C) -> Result<Aggregation<A>>
    where
        R: Read,
        C: CombineFn<f64, A, O>,
        A: Send,
    {
        self.aggregate_stream(reader, comb, |part| aggregate_chunk(part, comb))
    }

    /// Like [`Runner::aggregate_reader`], buffering values per station.
    ///
    /// # Errors
    /// The first read or parse error.
    pub fn aggregate_reader_lifted<R, C, A, O>(
        &self,
        reader: R,
        comb: &C,
    ) -> Result<Aggregation<A>>
    where
        R: Read,
        C: LiftableCombiner<f64, A, O>,
        A: Send,
    {
        self.aggregate_stream(reader, comb, |part| aggregate_chunk_lifted(part, comb))
    }

    /* ---------------- Drivers ---------------- */

    fn aggregate_source<C, A, O, F>(
        &self,
        bytes: &[u8],
        comb: &C,
        local: F,
    ) -> Result<Aggregation<A>>
    where
        C: CombineFn<f64, A, O>,
        A: Send,
        F: Fn(&[u8]) -> Result<Aggregation<A>> + Sync,
    {
        self.record_start();
        let parts = split_partitions(bytes, self.partitions());
        info!(
            workers = self.workers(),
            partitions = parts.len(),
            bytes = bytes.len(),
            buffered = self.buffered,
            "aggregation started"
        );

        let pool = self.pool()?;
        let merged = self
            .aggregate_partitions(pool.as_ref(), &parts, &local)
            .map(|partials| merge_partials(partials, comb))
            .inspect_err(|e| error!(error = %e, "aggregation aborted"))?;

        self.record_end(&merged, parts.len());
        Ok(merged)
    }

    fn aggregate_stream<R, C, A, O, F>(
        &self,
        reader: R,
        comb: &C,
        local: F,
    ) -> Result<Aggregation<A>>
    where
        R: Read,
        C: CombineFn<f64, A, O>,
        A: Send,
        F: Fn(&[u8]) -> Result<Aggregation<A>> + Sync,
    {
        self.record_start();
        let wave = self.partitions();
        info!(
            workers = self.workers(),
            wave,
            chunk_size = self.chunk_size_hint,
            buffered = self.buffered,
            "streaming aggregation started"
        );

        let pool = self.pool()?;
        let mut chunks = ChunkReader::new(reader, self.chunk_size_hint);
        let mut total = Aggregation::new();
        let mut partitions = 0;
        loop {
            let batch = chunks
                .by_ref()
                .take(wave)
                .collect::<Result<Vec<_>>>()
                .inspect_err(|e| error!(error = %e, "aggregation aborted"))?;
            if batch.is_empty() {
                break;
            }
            let slices: Vec<&[u8]> = batch.iter().map(Vec::as_slice).collect();
            let partials = self
                .aggregate_partitions(pool.as_ref(), &slices, &local)
                .inspect_err(|e| error!(error = %e, "aggregation aborted"))?;
            partitions += partials.len();
            total.merge(merge_partials(partials, comb), comb);
        }

        self.record_end(&total, partitions);
        Ok(total)
    }

    /* ---------------- Internals ---------------- */

    fn pool(&self) -> Result<Option<ThreadPool>> {
        match self.mode {
            ExecMode::Sequential => Ok(None),
            ExecMode::Parallel { .. } => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(self.workers())
                    .thread_name(|i| format!("ironbrc-worker-{i}"))
                    .build()?;
                Ok(Some(pool))
            }
        }
    }

    /// Local phase: one private aggregation per partition.
    fn aggregate_partitions<A, F>(
        &self,
        pool: Option<&ThreadPool>,
        parts: &[&[u8]],
        local: &F,
    ) -> Result<Vec<Aggregation<A>>>
    where
        A: Send,
        F: Fn(&[u8]) -> Result<Aggregation<A>> + Sync,
    {
        let run_one = |(idx, part): (usize, &&[u8])| -> Result<Aggregation<A>> {
            let agg = local(*part)?;
            debug!(
                partition = idx,
                lines = agg.lines,
                stations = agg.stations.len(),
                "partition finished"
            );
            Ok(agg)
        };

        match pool {
            None => parts.iter().enumerate().map(run_one).collect(),
            Some(pool) => pool.install(|| parts.par_iter().enumerate().map(run_one).collect()),
        }
    }

    fn record_start(&self) {
        if let Some(m) = &self.metrics {
            m.record_start();
            m.increment_counter(names::RUNS, 1);
        }
    }

    fn record_end<A>(&self, agg: &Aggregation<A>, partitions: usize) {
        info!(
            lines = agg.lines,
            bytes = agg.bytes,
            stations = agg.stations.len(),
            partitions,
            "aggregation finished"
        );
        if let Some(m) = &self.metrics {
            m.record_end();
            m.set_counter(names::LINES, agg.lines);
            m.set_counter(names::BYTES, agg.bytes);
            m.set_counter(names::STATIONS, agg.stations.len() as u64);
            m.set_counter(names::PARTITIONS, partitions as u64);
            m.set_counter(names::WORKERS, self.workers() as u64);
        }
    }
}

/// Merge phase: fold every partial aggregation into the first one.
fn merge_partials<C, A, O>(partials: Vec<Aggregation<A>>, comb: &C) -> Aggregation<A>
where
    C: CombineFn<f64, A, O>,
{
    partials
        .into_iter()
        .fold(Aggregation::new(), |mut acc, part| {
            acc.merge(part, comb);
            acc
        })
}
