//! Trace line parsing.
//!
//! This module handles:
//! - Recognizing signal and call-completion lines
//! - Extracting their fields into typed records

pub mod record;
pub mod strace_line;

// Re-export main types
pub use record::{CallRecord, Record, SignalRecord};
pub use strace_line::parse_line;
