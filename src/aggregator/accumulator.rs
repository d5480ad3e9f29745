//! Per-worker accumulator.
//!
//! One accumulator is owned by exactly one worker for the whole of one
//! source. Its state only grows: buckets and names are added, counters go up.

use super::bucket::bucket_key;
use super::state::AggregateState;
use crate::parser::Record;
use crate::utils::error::ConfigError;

/// Folds parsed records into time buckets
#[derive(Debug, Clone)]
pub struct Accumulator {
    state: AggregateState,
}

impl Accumulator {
    /// Create an empty accumulator
    ///
    /// # Errors
    /// * `ConfigError::InvalidBucketWidth` - width is not a positive finite number
    pub fn new(bucket_width: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            state: AggregateState::new(bucket_width)?,
        })
    }

    /// Add one parse result. `None` (an unparsable line) is a no-op.
    pub fn record(&mut self, record: Option<&Record>) {
        let Some(record) = record else {
            return;
        };

        let key = bucket_key(record.timestamp(), self.state.bucket_width());
        let bucket = self.state.bucket_mut(key);

        match record {
            Record::Signal(signal) => bucket.record_signal(&signal.signal_name),
            Record::Call(call) => bucket.record_call(&call.call_name, call.duration),
        }
    }

    /// Read-only view of the buckets built so far
    pub fn snapshot(&self) -> &AggregateState {
        &self.state
    }

    /// Hand the state over for merging
    pub fn into_state(self) -> AggregateState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::bucket::BucketKey;
    use crate::parser::parse_line;

    #[test]
    fn test_record_none_is_noop() {
        let mut acc = Accumulator::new(300.0).unwrap();
        acc.record(None);
        assert!(acc.snapshot().is_empty());
    }

    #[test]
    fn test_records_land_in_their_buckets() {
        let mut acc = Accumulator::new(300.0).unwrap();
        for line in [
            "10.0 read(3, \"x\", 1) = 1 <0.5>",
            "20.0 read(3, \"x\", 1) = 1 <0.25>",
            "305.2 write(1, \"x\", 1) = 1 <1.0>",
            "306.0 --- SIGPIPE {si_signo=SIGPIPE, si_code=SI_USER, si_pid=7, si_uid=1000} ---",
            "garbage",
        ] {
            acc.record(parse_line(line).as_ref());
        }

        let state = acc.into_state();
        assert_eq!(state.len(), 2);

        let first = state.get(BucketKey::from_index(0)).unwrap();
        assert_eq!(first.calls["read"].count, 2);
        assert_eq!(first.calls["read"].total_duration, 0.75);
        assert!(first.events.is_empty());

        let second = state.get(BucketKey::from_index(1)).unwrap();
        assert_eq!(second.calls["write"].count, 1);
        assert_eq!(second.events["SIGPIPE"], 1);
    }

    #[test]
    fn test_invalid_width() {
        assert!(Accumulator::new(0.0).is_err());
    }
}
