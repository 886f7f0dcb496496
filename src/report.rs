//! Rounding and rendering of the final station mapping.
//!
//! The report is `{<station>=<min>/<mean>/<max>, ...}` with stations sorted by
//! their UTF-8 bytes and every value shown with exactly one fractional digit.

use crate::combiners::StationStats;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// Round to one fractional digit, sending exact midpoints toward `+inf`.
///
/// This is `floor(x * 10 + 0.5) / 10` for every sign, so `-0.25` becomes `-0.2`
/// while `0.25` becomes `0.3`.
///
/// ```
/// use ironbrc::report::round_half_up;
///
/// assert_eq!(round_half_up(-0.25), -0.2);
/// assert_eq!(round_half_up(0.25), 0.3);
/// assert_eq!(round_half_up(1.05), 1.1);
/// ```
#[inline]
#[must_use]
pub fn round_half_up(x: f64) -> f64 {
    (x * 10.0 + 0.5).floor() / 10.0
}

/// Rounded statistics of one station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StationSummary {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl StationSummary {
    /// Round the min, mean and max of a non-empty accumulator.
    ///
    /// # Errors
    /// [`crate::Error::EmptyAccumulator`] if `stats` is the identity element.
    pub fn from_stats(stats: &StationStats) -> Result<Self> {
        let mean = stats.mean()?;
        Ok(Self {
            min: round_half_up(stats.min()),
            mean: round_half_up(mean),
            max: round_half_up(stats.max()),
        })
    }
}

impl fmt::Display for StationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}/{:.1}/{:.1}", self.min, self.mean, self.max)
    }
}

/// Final result: one rounded summary per observed station, sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    stations: BTreeMap<String, StationSummary>,
}

impl Report {
    /// Summarize merged accumulators.
    ///
    /// # Errors
    /// [`crate::Error::EmptyAccumulator`] if any accumulator is empty.
    pub fn from_stats<I>(stats: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, StationStats)>,
    {
        let stations = stats
            .into_iter()
            .map(|(name, s)| StationSummary::from_stats(&s).map(|summary| (name, summary)))
            .collect::<Result<_>>()?;
        Ok(Self { stations })
    }

    #[must_use]
    pub fn get(&self, station: &str) -> Option<&StationSummary> {
        self.stations.get(station)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Stations in report order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, StationSummary> {
        self.stations.iter()
    }
}

impl From<BTreeMap<String, StationSummary>> for Report {
    fn from(stations: BTreeMap<String, StationSummary>) -> Self {
        Self { stations }
    }
}

impl FromIterator<(String, StationSummary)> for Report {
    fn from_iter<I: IntoIterator<Item = (String, StationSummary)>>(iter: I) -> Self {
        Self {
            stations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = (&'a String, &'a StationSummary);
    type IntoIter = btree_map::Iter<'a, String, StationSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, summary)) in self.stations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={summary}")?;
        }
        f.write_str("}")
    }
}
