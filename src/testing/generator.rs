//! Reproducible measurement input.

use crate::testing::fixtures::STATIONS;
use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Measurements stay within this magnitude.
const LIMIT: f64 = 99.9;

/// Seeded generator of `<station>;<value>` lines.
///
/// Each value is the station's mean plus uniform noise of `±spread`, clamped to
/// `±99.9` and printed with one fractional digit.
pub struct MeasurementGenerator {
    rng: ChaCha8Rng,
    stations: Vec<(String, f64)>,
    spread: f64,
    half_steps: bool,
}

impl MeasurementGenerator {
    /// Generator over [`STATIONS`].
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_stations(
            seed,
            STATIONS.iter().map(|(name, mean)| ((*name).to_string(), *mean)),
        )
    }

    pub fn with_stations<I>(seed: u64, stations: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let stations: Vec<_> = stations.into_iter().collect();
        assert!(!stations.is_empty(), "generator needs at least one station");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            stations,
            spread: 15.0,
            half_steps: false,
        }
    }

    #[must_use]
    pub fn spread(mut self, spread: f64) -> Self {
        self.spread = spread.abs();
        self
    }

    /// Only emit multiples of `0.5`, whose sums are exact in any order.
    #[must_use]
    pub fn half_steps(mut self) -> Self {
        self.half_steps = true;
        self
    }

    /// Next `(station, value)` pair; `value` already has one fractional digit.
    pub fn next_measurement(&mut self) -> (&str, f64) {
        let idx = self.rng.gen_range(0..self.stations.len());
        let noise = self.rng.gen_range(-self.spread..=self.spread);
        let (name, mean) = &self.stations[idx];
        let raw = (mean + noise).clamp(-LIMIT, LIMIT);
        let value = if self.half_steps {
            (raw * 2.0).round() / 2.0
        } else {
            (raw * 10.0).round() / 10.0
        };
        // `+ 0.0` turns a rounded `-0.0` into `0.0`
        (name.as_str(), value.clamp(-LIMIT, LIMIT) + 0.0)
    }

    /// Write `rows` lines to `out`.
    ///
    /// # Errors
    /// If writing fails.
    pub fn write_lines<W: Write>(&mut self, out: &mut W, rows: u64) -> std::io::Result<()> {
        for _ in 0..rows {
            let (name, value) = self.next_measurement();
            writeln!(out, "{name};{value:.1}")?;
        }
        Ok(())
    }
}

/// `rows` lines over [`STATIONS`] as one string.
#[must_use]
pub fn generate_measurements(rows: u64, seed: u64) -> String {
    let mut out = Vec::new();
    MeasurementGenerator::new(seed)
        .write_lines(&mut out, rows)
        .expect("writing to a Vec cannot fail");
    String::from_utf8(out).expect("generated lines are UTF-8")
}

/// Write `rows` lines over [`STATIONS`] to `path`.
///
/// # Errors
/// If the file cannot be created or written.
pub fn write_measurements(path: impl AsRef<Path>, rows: u64, seed: u64) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    MeasurementGenerator::new(seed)
        .write_lines(&mut out, rows)
        .with_context(|| format!("write {}", path.display()))?;
    out.flush()?;
    Ok(())
}

/// Temporary file holding `rows` generated lines; deleted on drop.
///
/// # Errors
/// If the file cannot be created or written.
pub fn temp_measurements(rows: u64, seed: u64) -> Result<NamedTempFile> {
    let file = NamedTempFile::new().context("create temp measurements file")?;
    write_measurements(file.path(), rows, seed)?;
    Ok(file)
}

/// Temporary file holding exactly `contents`; deleted on drop.
///
/// # Errors
/// If the file cannot be created or written.
pub fn temp_input(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("create temp input file")?;
    file.write_all(contents.as_bytes())
        .context("write temp input file")?;
    file.flush()?;
    Ok(file)
}
