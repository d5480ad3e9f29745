//! Fixed-width time buckets and their per-bucket counters.
//!
//! A bucket is identified by how many whole bucket widths fit before its
//! start: `floor(timestamp / width)`. The start time itself is `index * width`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical bucket identifier: the bucket's index on the time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey(i64);

impl BucketKey {
    pub fn from_index(index: i64) -> Self {
        Self(index)
    }

    pub fn index(self) -> i64 {
        self.0
    }

    /// Start of the bucket in seconds
    pub fn start(self, bucket_width: f64) -> f64 {
        self.0 as f64 * bucket_width
    }

    /// Start of the bucket rendered as a decimal string (`0.0`, `300.0`, ...)
    ///
    /// This is the key used in JSON and CSV output. Plain decimal notation is
    /// kept at every magnitude, with at least one fractional digit.
    pub fn label(self, bucket_width: f64) -> String {
        let rendered = self.start(bucket_width).to_string();
        if rendered.contains('.') {
            rendered
        } else {
            format!("{}.0", rendered)
        }
    }
}

/// Map a timestamp to the bucket containing it
///
/// **Public** - the single place timestamps are bucketed
///
/// `bucket_width` must be positive; callers get that guarantee from
/// `AggregateState::new`.
pub fn bucket_key(timestamp: f64, bucket_width: f64) -> BucketKey {
    BucketKey((timestamp / bucket_width).floor() as i64)
}

/// Duration total and call count for one call name
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallStats {
    /// Sum of durations, in seconds
    pub total_duration: f64,

    /// Number of completed calls (never 0 once the entry exists)
    pub count: u64,
}

impl CallStats {
    pub fn new(duration: f64) -> Self {
        Self {
            total_duration: duration,
            count: 1,
        }
    }

    /// Mean duration per call
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_duration / self.count as f64
        }
    }

    pub fn absorb(&mut self, other: CallStats) {
        self.total_duration += other.total_duration;
        self.count += other.count;
    }
}

/// All counters for one time window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Signal name -> number of deliveries
    #[serde(default)]
    pub events: BTreeMap<String, u64>,

    /// Call name -> duration/count totals
    #[serde(default)]
    pub calls: BTreeMap<String, CallStats>,
}

impl Bucket {
    pub fn record_signal(&mut self, signal_name: &str) {
        match self.events.get_mut(signal_name) {
            Some(count) => *count += 1,
            None => {
                self.events.insert(signal_name.to_string(), 1);
            }
        }
    }

    pub fn record_call(&mut self, call_name: &str, duration: f64) {
        match self.calls.get_mut(call_name) {
            Some(stats) => stats.absorb(CallStats::new(duration)),
            None => {
                self.calls.insert(call_name.to_string(), CallStats::new(duration));
            }
        }
    }

    /// Add every counter of `other` into this bucket
    pub fn absorb(&mut self, other: Bucket) {
        for (name, count) in other.events {
            *self.events.entry(name).or_insert(0) += count;
        }
        for (name, stats) in other.calls {
            self.calls
                .entry(name)
                .and_modify(|existing| existing.absorb(stats))
                .or_insert(stats);
        }
    }

    pub fn total_calls(&self) -> u64 {
        self.calls.values().map(|s| s.count).sum()
    }

    pub fn total_events(&self) -> u64 {
        self.events.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_key_floors() {
        assert_eq!(bucket_key(305.2, 300.0).start(300.0), 300.0);
        assert_eq!(bucket_key(299.999, 300.0).start(300.0), 0.0);
        assert_eq!(bucket_key(300.0, 300.0).index(), 1);
        assert_eq!(bucket_key(0.0, 300.0).index(), 0);
    }

    #[test]
    fn test_bucket_key_label() {
        assert_eq!(bucket_key(1.0, 300.0).label(300.0), "0.0");
        assert_eq!(bucket_key(305.2, 300.0).label(300.0), "300.0");
        assert_eq!(bucket_key(1700000123.5, 300.0).label(300.0), "1700000100.0");
        assert_eq!(bucket_key(1.7, 0.5).label(0.5), "1.5");
        assert_eq!(bucket_key(-0.5, 300.0).label(300.0), "-300.0");
    }

    #[test]
    fn test_bucket_key_label_large_start_has_no_exponent() {
        let key = BucketKey::from_index(100_000_000_000_000);
        assert_eq!(key.label(300.0), "30000000000000000.0");
        assert_eq!(BucketKey::from_index(1).label(1e20), "100000000000000000000.0");
    }

    #[test]
    fn test_record_call_accumulates() {
        let mut bucket = Bucket::default();
        bucket.record_call("read", 0.5);
        bucket.record_call("read", 0.25);

        let stats = bucket.calls["read"];
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_duration, 0.75);
        assert_eq!(stats.mean(), 0.375);
    }

    #[test]
    fn test_absorb_adds_componentwise() {
        let mut a = Bucket::default();
        a.record_signal("SIGCHLD");
        a.record_call("read", 1.0);

        let mut b = Bucket::default();
        b.record_signal("SIGCHLD");
        b.record_signal("SIGPIPE");
        b.record_call("read", 2.0);
        b.record_call("write", 4.0);

        a.absorb(b);

        assert_eq!(a.events["SIGCHLD"], 2);
        assert_eq!(a.events["SIGPIPE"], 1);
        assert_eq!(a.calls["read"], CallStats { total_duration: 3.0, count: 2 });
        assert_eq!(a.calls["write"], CallStats { total_duration: 4.0, count: 1 });
        assert_eq!(a.total_calls(), 3);
        assert_eq!(a.total_events(), 3);
    }
}
