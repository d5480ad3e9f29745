//! Combining partial aggregation states.
//!
//! Every operation here is a sum over unordered contributions, so merging is
//! associative and commutative: integer counts come out identical in any
//! order, duration totals up to floating-point rounding.

use super::state::AggregateState;
use crate::utils::error::MergeError;
use log::debug;

impl AggregateState {
    /// Fold `other` into `self`, consuming it
    ///
    /// # Errors
    /// * `MergeError::BucketWidthMismatch` - the two states bucket time differently
    pub fn merge(&mut self, other: AggregateState) -> Result<(), MergeError> {
        if self.bucket_width() != other.bucket_width() {
            return Err(MergeError::BucketWidthMismatch {
                expected: self.bucket_width(),
                found: other.bucket_width(),
            });
        }

        for (key, bucket) in other.into_buckets() {
            self.add_bucket(key, bucket);
        }
        Ok(())
    }
}

/// Merge `src` into `dst` and return the union
///
/// **Public** - functional form of [`AggregateState::merge`]
pub fn merge(mut dst: AggregateState, src: AggregateState) -> Result<AggregateState, MergeError> {
    dst.merge(src)?;
    Ok(dst)
}

/// Fold any number of partial states, starting from an empty one
///
/// **Public** - the reduce step of a parallel run
pub fn merge_all<I>(bucket_width: f64, states: I) -> Result<AggregateState, MergeError>
where
    I: IntoIterator<Item = AggregateState>,
{
    let mut result = AggregateState::new(bucket_width)?;

    let mut merged = 0usize;
    for state in states {
        result.merge(state)?;
        merged += 1;
    }

    debug!("Merged {} partial states into {} buckets", merged, result.len());
    Ok(result)
}
