//! Single-threaded aggregation of one partition.
//!
//! A [`PartitionAggregator`] owns a private station map and folds lines into
//! it one after another. It is never shared between threads; the runner merges
//! the finished [`Aggregation`]s after every worker has joined.
//!
//! A [`BufferedAggregator`] is the lifted alternative: it buffers each
//! station's values and reduces a full buffer at once with
//! [`LiftableCombiner::build_from_group`].

use crate::combiners::{CombineFn, LiftableCombiner};
use crate::error::Result;
use crate::io::lines;
use crate::parse::parse_line;
use ahash::RandomState;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

/// Station name to accumulator.
pub type StationMap<A> = HashMap<String, A, RandomState>;

/// Accumulators for every station seen in some span of input, plus counters.
#[derive(Clone, Debug)]
pub struct Aggregation<A> {
    pub stations: StationMap<A>,
    pub lines: u64,
    pub bytes: u64,
}

impl<A> Default for Aggregation<A> {
    fn default() -> Self {
        Self {
            stations: StationMap::default(),
            lines: 0,
            bytes: 0,
        }
    }
}

impl<A> Aggregation<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another aggregation into this one.
    ///
    /// Stations missing on either side are taken over as they are; nothing is
    /// merged with an explicit identity.
    pub fn merge<C, O>(&mut self, other: Self, comb: &C)
    where
        C: CombineFn<f64, A, O>,
    {
        if self.stations.is_empty() {
            self.stations = other.stations;
        } else {
            for (name, acc) in other.stations {
                match self.stations.entry(name) {
                    Entry::Occupied(mut slot) => comb.merge(slot.get_mut(), acc),
                    Entry::Vacant(slot) => {
                        slot.insert(acc);
                    }
                }
            }
        }
        self.lines += other.lines;
        self.bytes += other.bytes;
    }

    /// Extract every station's output, sorted by station name.
    ///
    /// # Errors
    /// The first error returned by [`CombineFn::finish`].
    pub fn finish<C, O>(self, comb: &C) -> Result<BTreeMap<String, O>>
    where
        C: CombineFn<f64, A, O>,
    {
        self.stations
            .into_iter()
            .map(|(name, acc)| comb.finish(acc).map(|out| (name, out)))
            .collect()
    }
}

/// Folds the lines of one partition into a private station map.
pub struct PartitionAggregator<'c, C, A, O> {
    comb: &'c C,
    agg: Aggregation<A>,
    _out: PhantomData<fn() -> O>,
}

impl<'c, C, A, O> PartitionAggregator<'c, C, A, O>
where
    C: CombineFn<f64, A, O>,
{
    pub fn new(comb: &'c C) -> Self {
        Self {
            comb,
            agg: Aggregation::new(),
            _out: PhantomData,
        }
    }

    /// Parse one line (without its terminator) and fold it in.
    ///
    /// # Errors
    /// Parse errors from [`parse_line`]; the partition should be abandoned.
    #[inline]
    pub fn push_line(&mut self, line: &[u8]) -> Result<()> {
        let (station, value) = parse_line(line)?;
        if let Some(acc) = self.agg.stations.get_mut(station) {
            self.comb.add_input(acc, value);
        } else {
            let mut acc = self.comb.create();
            self.comb.add_input(&mut acc, value);
            self.agg.stations.insert(station.to_owned(), acc);
        }
        self.agg.lines += 1;
        Ok(())
    }

    /// Fold every line of a chunk of `\n`-terminated lines.
    ///
    /// # Errors
    /// The first parse error in the chunk.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        for line in lines(chunk) {
            self.push_line(line)?;
        }
        self.agg.bytes += chunk.len() as u64;
        Ok(())
    }

    /// Fold lines supplied one by one.
    ///
    /// # Errors
    /// The first parse error.
    pub fn push_lines<'l, I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = &'l [u8]>,
    {
        for line in lines {
            self.push_line(line)?;
            self.agg.bytes += line.len() as u64 + 1;
        }
        Ok(())
    }

    #[must_use]
    pub fn lines(&self) -> u64 {
        self.agg.lines
    }

    #[must_use]
    pub fn stations(&self) -> usize {
        self.agg.stations.len()
    }

    /// Hand over the finished map.
    #[must_use]
    pub fn finish(self) -> Aggregation<A> {
        self.agg
    }
}

/// Values buffered per station before they are reduced in bulk.
pub const GROUP_CAPACITY: usize = 1024;

/// Buffers each station's values and reduces them in groups of
/// [`GROUP_CAPACITY`].
///
/// Memory stays bounded by `stations * GROUP_CAPACITY` values whatever the
/// size of the partition.
pub struct BufferedAggregator<'c, C, A, O> {
    comb: &'c C,
    groups: StationMap<(A, Vec<f64>)>,
    lines: u64,
    bytes: u64,
    _out: PhantomData<fn() -> O>,
}

impl<'c, C, A, O> BufferedAggregator<'c, C, A, O>
where
    C: LiftableCombiner<f64, A, O>,
{
    pub fn new(comb: &'c C) -> Self {
        Self {
            comb,
            groups: StationMap::default(),
            lines: 0,
            bytes: 0,
            _out: PhantomData,
        }
    }

    /// Parse one line and buffer its value; reduces the station's buffer once
    /// it is full.
    ///
    /// # Errors
    /// Parse errors from [`parse_line`].
    #[inline]
    pub fn push_line(&mut self, line: &[u8]) -> Result<()> {
        let (station, value) = parse_line(line)?;
        if let Some((acc, values)) = self.groups.get_mut(station) {
            buffer(self.comb, acc, values, value);
        } else {
            let mut acc = self.comb.create();
            let mut values = Vec::with_capacity(GROUP_CAPACITY);
            buffer(self.comb, &mut acc, &mut values, value);
            self.groups.insert(station.to_owned(), (acc, values));
        }
        self.lines += 1;
        Ok(())
    }

    /// Buffer every line of a chunk of `\n`-terminated lines.
    ///
    /// # Errors
    /// The first parse error in the chunk.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        for line in lines(chunk) {
            self.push_line(line)?;
        }
        self.bytes += chunk.len() as u64;
        Ok(())
    }

    #[must_use]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Reduce what is left in every buffer and hand over the map.
    #[must_use]
    pub fn finish(self) -> Aggregation<A> {
        let comb = self.comb;
        let stations = self
            .groups
            .into_iter()
            .map(|(name, (mut acc, values))| {
                if !values.is_empty() {
                    comb.merge(&mut acc, comb.build_from_group(&values));
                }
                (name, acc)
            })
            .collect();
        Aggregation {
            stations,
            lines: self.lines,
            bytes: self.bytes,
        }
    }
}

#[inline]
fn buffer<C, A, O>(comb: &C, acc: &mut A, values: &mut Vec<f64>, value: f64)
where
    C: LiftableCombiner<f64, A, O>,
{
    values.push(value);
    if values.len() == GROUP_CAPACITY {
        comb.merge(acc, comb.build_from_group(values));
        values.clear();
    }
}

/// Aggregate one partition from start to finish.
///
/// # Errors
/// The first parse error in `chunk`.
pub fn aggregate_chunk<C, A, O>(chunk: &[u8], comb: &C) -> Result<Aggregation<A>>
where
    C: CombineFn<f64, A, O>,
{
    let mut part = PartitionAggregator::new(comb);
    part.push_chunk(chunk)?;
    Ok(part.finish())
}

/// Aggregate one partition through a [`BufferedAggregator`].
///
/// # Errors
/// The first parse error in `chunk`.
pub fn aggregate_chunk_lifted<C, A, O>(chunk: &[u8], comb: &C) -> Result<Aggregation<A>>
where
    C: LiftableCombiner<f64, A, O>,
{
    let mut part = BufferedAggregator::new(comb);
    part.push_chunk(chunk)?;
    Ok(part.finish())
}
