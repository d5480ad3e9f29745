//! The aggregation result: bucket key -> bucket, for one bucket width.

use super::bucket::{Bucket, BucketKey};
use crate::utils::error::ConfigError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashSet};

/// Per-bucket statistics built from one or more trace sources
///
/// Buckets iterate in ascending time order. Serializes as a JSON object keyed
/// by the bucket start label (see [`BucketKey::label`]).
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateState {
    bucket_width: f64,
    buckets: BTreeMap<BucketKey, Bucket>,
}

impl AggregateState {
    /// Create an empty state
    ///
    /// # Errors
    /// * `ConfigError::InvalidBucketWidth` - width is zero, negative, NaN or infinite
    pub fn new(bucket_width: f64) -> Result<Self, ConfigError> {
        validate_bucket_width(bucket_width)?;
        Ok(Self {
            bucket_width,
            buckets: BTreeMap::new(),
        })
    }

    pub fn bucket_width(&self) -> f64 {
        self.bucket_width
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: BucketKey) -> Option<&Bucket> {
        self.buckets.get(&key)
    }

    /// Look a bucket up by the start time it was labelled with
    pub fn get_by_start(&self, start: f64) -> Option<&Bucket> {
        self.buckets
            .get(&BucketKey::from_index((start / self.bucket_width).round() as i64))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BucketKey, &Bucket)> {
        self.buckets.iter().map(|(key, bucket)| (*key, bucket))
    }

    /// Bucket for `key`, created empty on first reference
    pub(crate) fn bucket_mut(&mut self, key: BucketKey) -> &mut Bucket {
        self.buckets.entry(key).or_default()
    }

    /// Add `bucket` under `key`, summing into any bucket already there
    pub fn add_bucket(&mut self, key: BucketKey, bucket: Bucket) {
        match self.buckets.get_mut(&key) {
            Some(existing) => existing.absorb(bucket),
            None => {
                self.buckets.insert(key, bucket);
            }
        }
    }

    pub(crate) fn into_buckets(self) -> BTreeMap<BucketKey, Bucket> {
        self.buckets
    }

    /// Distinct call names, in the order first seen walking buckets in time order
    pub fn call_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for bucket in self.buckets.values() {
            for name in bucket.calls.keys() {
                if seen.insert(name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }

    pub fn total_calls(&self) -> u64 {
        self.buckets.values().map(Bucket::total_calls).sum()
    }

    pub fn total_events(&self) -> u64 {
        self.buckets.values().map(Bucket::total_events).sum()
    }
}

impl Serialize for AggregateState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, bucket) in &self.buckets {
            map.serialize_entry(&key.label(self.bucket_width), bucket)?;
        }
        map.end()
    }
}

/// Reject bucket widths that cannot bucket anything
pub fn validate_bucket_width(bucket_width: f64) -> Result<(), ConfigError> {
    if bucket_width.is_finite() && bucket_width > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBucketWidth(bucket_width))
    }
}
