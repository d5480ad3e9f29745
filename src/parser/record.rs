//! Typed trace records produced by the line parser.

/// A completed system call, as printed by `strace -ttt -T`
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// Wall-clock timestamp in seconds
    pub timestamp: f64,

    /// System call name (e.g. "open")
    pub call_name: String,

    /// Argument list exactly as printed, without the surrounding parentheses
    pub raw_args: String,

    /// Return token: decimal, hexadecimal or "?"
    pub return_code: String,

    /// Trailing annotation after the return value (e.g. "ENOENT (No such file or directory)")
    pub exit_state: Option<String>,

    /// Time spent in the call, in seconds
    pub duration: f64,
}

/// A delivered signal
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRecord {
    pub timestamp: f64,
    pub signal_name: String,
    pub si_signo: String,
    pub si_code: String,
    pub si_pid: u32,
    pub si_uid: u32,
}

/// One parsed trace line
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Call(CallRecord),
    Signal(SignalRecord),
}

impl Record {
    /// Timestamp shared by both variants, used for bucketing
    pub fn timestamp(&self) -> f64 {
        match self {
            Record::Call(call) => call.timestamp,
            Record::Signal(signal) => signal.timestamp,
        }
    }

    pub fn is_signal(&self) -> bool {
        matches!(self, Record::Signal(_))
    }
}
