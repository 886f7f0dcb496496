//! Testing utilities for aggregation runs.
//!
//! - **Fixtures**: a station list and the small hand-checked scenarios used in
//!   docs and tests.
//! - **Generator**: [`MeasurementGenerator`] produces reproducible
//!   `<station>;<value>` input of any size from a seed.
//! - **Reference**: [`reference_report`] recomputes a report the slow way, with
//!   the standard library float parser and a single map, for cross-checking.
//! - **Assertions**: compare reports with and without float tolerance.
//!
//! # Quick Start
//!
//! ```
//! use ironbrc::testing::*;
//! use ironbrc::Runner;
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = generate_measurements(10_000, 7);
//! let report = Runner::parallel(4).run_bytes(&input)?;
//! assert_reports_close(&report, &reference_report(&input)?);
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod generator;

pub use assertions::*;
pub use fixtures::*;
pub use generator::*;

use crate::combiners::StationStats;
use crate::error::{Error, Result};
use crate::report::Report;
use std::collections::HashMap;

/// Recompute the report line by line with `str::parse::<f64>`.
///
/// Accepts any float text the standard library accepts, so it is only a
/// reference for well-formed input.
///
/// # Errors
/// [`Error::MalformedLine`] or [`Error::MalformedValue`] for lines the
/// standard parser rejects.
pub fn reference_report(input: &str) -> Result<Report> {
    let mut stations: HashMap<String, StationStats> = HashMap::new();
    for line in input.lines() {
        let (name, value) = line
            .split_once(';')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| Error::malformed_line(line.as_bytes(), "missing `;` delimiter"))?;
        let value: f64 = value
            .parse()
            .map_err(|_| Error::malformed_value(value.as_bytes(), "not a number"))?;
        stations.entry(name.to_string()).or_default().fold(value);
    }
    Report::from_stats(stations)
}
