//! # ironbrc
//!
//! Per-station **min / mean / max** over very large `<station>;<value>` text
//! files, computed in parallel with bounded memory and no per-line allocation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ironbrc::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let report = aggregate_file("measurements.txt", &RunConfig::default())?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ```
//! use ironbrc::Runner;
//!
//! let input = "Hamburg;12.0\nHamburg;8.0\nOslo;3.5\nOslo;3.5\n";
//! let report = Runner::parallel(2).run_bytes(input)?;
//! assert_eq!(report.to_string(), "{Hamburg=8.0/10.0/12.0, Oslo=3.5/3.5/3.5}");
//! # Ok::<(), ironbrc::Error>(())
//! ```
//!
//! ## Input
//!
//! One measurement per line: a non-empty station name, `;`, and a value with
//! exactly one digit after the decimal point (`-?digits.digit`). Any other
//! shape aborts the run with an error; there is no partial report.
//!
//! ## Core Concepts
//!
//! ### Combiners
//!
//! A [`CombineFn`] describes a mergeable per-key aggregation: create the
//! identity, fold a value, merge two accumulators, extract the output. The
//! built-in [`MinMeanMax`] folds into a [`StationStats`] and extracts a rounded
//! [`StationSummary`].
//!
//! ### Partitions
//!
//! The input is cut into contiguous partitions that never split a line. A
//! [`PartitionAggregator`] folds one partition into a private map on one
//! thread. A [`BufferedAggregator`] does the same but buffers each station's
//! values and reduces them in bulk; [`Runner::with_buffering`] selects it.
//!
//! ### Execution Modes
//!
//! - **Sequential** - [`Runner::sequential`] - one partition on the calling thread
//! - **Parallel** - [`Runner::parallel`] - one partition per worker on a Rayon pool
//!
//! Both produce the same report. Partitions share no mutable state; their maps
//! are merged on the calling thread after every worker has finished.
//!
//! ### Report
//!
//! A [`Report`] rounds every value half-up to one fractional digit and renders
//! `{a=min/mean/max, b=...}` sorted by station name.
//!
//! ## Module Overview
//!
//! - [`parse`] - fixed-point line parser
//! - [`combiners`] - accumulator contract and the station accumulator
//! - [`partition`] - single-threaded aggregation of one partition
//! - [`runner`] - partitioning, parallel execution and merge
//! - [`io`] - memory-mapped and streaming line sources
//! - [`report`] - rounding and rendering
//! - [`config`] - run configuration
//! - [`metrics`] - run timing and counters
//! - [`testing`] - generators, fixtures and assertions for tests

pub mod combiners;
pub mod config;
pub mod error;
pub mod io;
pub mod metrics;
pub mod parse;
pub mod partition;
pub mod report;
pub mod runner;
pub mod testing;

// General re-exports
pub use combiners::{CombineFn, LiftableCombiner, MinMeanMax, StationStats};
pub use config::RunConfig;
pub use error::{Error, Result};
pub use io::{ByteSource, ChunkReader, MappedFile};
pub use partition::{Aggregation, BufferedAggregator, PartitionAggregator};
pub use report::{Report, StationSummary};
pub use runner::{ExecMode, Runner};

use std::path::Path;

/// Aggregate the file at `path` with `config` and return its report.
///
/// # Errors
/// Invalid configuration, read failures, malformed lines or values.
pub fn aggregate_file(path: impl AsRef<Path>, config: &RunConfig) -> Result<Report> {
    Runner::from_config(config)?.run_file(path)
}
