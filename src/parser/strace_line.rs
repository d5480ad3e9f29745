//! Line parser for `strace -ttt -T` output.
//!
//! Two line shapes are recognized:
//! - signal delivery: `1.500 --- SIGCHLD {si_signo=SIGCHLD, si_code=CLD_EXITED, si_pid=100, si_uid=0} ---`
//! - call completion: `1.000 open("/tmp/a", O_RDONLY) = 3 <0.002>`
//!
//! Anything else (banners, `<unfinished ...>` halves, truncated or interleaved
//! output) yields `None`. That is the normal outcome for such lines, not an error.

use super::record::{CallRecord, Record, SignalRecord};
use regex::Regex;
use std::sync::LazyLock;

/// Signal grammar. Tried first.
static SIGNAL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([0-9]+\.[0-9]+) --- ([A-Z0-9_]+) ",
        r"\{si_signo=([A-Z0-9_]+), si_code=([A-Z0-9_]+), si_pid=([0-9]+), si_uid=([0-9]+)\}",
        r" --- *$",
    ))
    .expect("Invalid signal line regex pattern")
});

/// Call grammar. The optional fifth group keeps its leading space, which is
/// stripped before the annotation is stored.
static CALL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([0-9]+\.[0-9]+) ([a-zA-Z0-9_]+)\((.*)\) += ",
        r"(\?|-?0x[0-9a-fA-F]+|-?[0-9]+)",
        r"( [()a-zA-Z_0-9: ]+)?",
        r" <([0-9]+\.[0-9]+)>$",
    ))
    .expect("Invalid call line regex pattern")
});

/// Parse one raw trace line
///
/// **Public** - main entry point for parsing
///
/// A trailing `\n` / `\r\n` is ignored. Returns `None` when the line matches
/// neither grammar, including when a numeric field inside an otherwise matching
/// line does not fit its type.
pub fn parse_line(line: &str) -> Option<Record> {
    let line = line.trim_end_matches(['\n', '\r']);

    if let Some(caps) = SIGNAL_LINE_RE.captures(line) {
        return Some(Record::Signal(SignalRecord {
            timestamp: parse_seconds(&caps[1])?,
            signal_name: caps[2].to_string(),
            si_signo: caps[3].to_string(),
            si_code: caps[4].to_string(),
            si_pid: caps[5].parse().ok()?,
            si_uid: caps[6].parse().ok()?,
        }));
    }

    let caps = CALL_LINE_RE.captures(line)?;
    let exit_state = caps
        .get(5)
        .map(|m| strip_separator(m.as_str()).to_string());

    Some(Record::Call(CallRecord {
        timestamp: parse_seconds(&caps[1])?,
        call_name: caps[2].to_string(),
        raw_args: caps[3].to_string(),
        return_code: caps[4].to_string(),
        exit_state,
        duration: parse_seconds(&caps[6])?,
    }))
}

/// Parse a seconds field, rejecting values that overflow to infinity
///
/// **Private** - internal helper for parse_line
fn parse_seconds(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Drop the single separator character in front of a trailing annotation
///
/// **Private** - internal helper for parse_line
fn strip_separator(annotation: &str) -> &str {
    let mut chars = annotation.chars();
    chars.next();
    chars.as_str()
}
