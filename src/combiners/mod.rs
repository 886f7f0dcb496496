//! Mergeable per-key accumulators.
//!
//! A combiner describes how values for one key are folded into an accumulator
//! `A`, how two accumulators built on different partitions are merged, and how
//! the final output `O` is extracted:
//!
//! - [`CombineFn::create`] returns the merge identity.
//! - [`CombineFn::add_input`] folds one value in.
//! - [`CombineFn::merge`] combines two accumulators; it must be associative and
//!   commutative so the partitioning of the input never changes the result.
//! - [`CombineFn::finish`] extracts the output once all partitions are merged.
//!
//! [`LiftableCombiner`] adds a bulk path that builds an accumulator from a
//! buffered slice of values in one pass.
//!
//! The built-in combiner is [`MinMeanMax`] over [`StationStats`].
//!
//! # Examples
//! ```
//! use ironbrc::combiners::{CombineFn, MinMeanMax};
//!
//! let comb = MinMeanMax;
//! let mut left = comb.create();
//! comb.add_input(&mut left, 3.0);
//! let mut right = comb.create();
//! comb.add_input(&mut right, 1.0);
//! comb.add_input(&mut right, 2.0);
//! comb.merge(&mut left, right);
//!
//! let summary = comb.finish(left)?;
//! assert_eq!(summary.to_string(), "1.0/2.0/3.0");
//! # Ok::<(), ironbrc::Error>(())
//! ```

mod station;

use crate::error::Result;

pub use station::{MinMeanMax, StationStats};

/// Fold/merge/extract contract for a per-key aggregation.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    /// The merge identity: merging it into anything leaves that thing unchanged.
    fn create(&self) -> A;

    /// Fold one value into `acc`.
    fn add_input(&self, acc: &mut A, v: V);

    /// Merge `other` into `acc`.
    fn merge(&self, acc: &mut A, other: A);

    /// Extract the output from a fully merged accumulator.
    ///
    /// # Errors
    /// Implementations fail when `acc` cannot produce an output, e.g. it is
    /// still the identity.
    fn finish(&self, acc: A) -> Result<O>;
}

/// Combiners that can build an accumulator straight from a buffered group.
pub trait LiftableCombiner<V, A, O>: CombineFn<V, A, O> {
    /// Equivalent to folding every value of `values` into [`CombineFn::create`].
    fn build_from_group(&self, values: &[V]) -> A;
}
