//! Human-readable run summary for the terminal.

use crate::aggregator::{AggregateState, CallStats};
use chrono::DateTime;
use std::collections::BTreeMap;

/// Render a per-bucket overview plus the `top_n` calls by total duration
///
/// **Public** - printed by `analyze --summary`
///
/// Bucket starts are shown as UTC wall-clock times, since `strace -ttt`
/// timestamps are seconds since the Unix epoch.
pub fn render_summary(state: &AggregateState, top_n: usize) -> String {
    let mut lines = Vec::new();
    let width = state.bucket_width();

    lines.push(format!(
        "Buckets: {} x {}s | Calls: {} | Signals: {}",
        state.len(),
        width,
        state.total_calls(),
        state.total_events()
    ));
    lines.push(String::new());
    lines.push(format!(
        "  {:<20} {:>16} {:>10} {:>10}",
        "Bucket start (UTC)", "key", "calls", "signals"
    ));
    for (key, bucket) in state.iter() {
        lines.push(format!(
            "  {:<20} {:>16} {:>10} {:>10}",
            wall_clock(key.start(width)),
            key.label(width),
            bucket.total_calls(),
            bucket.total_events()
        ));
    }

    let top = top_calls(state, top_n);
    if !top.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "  {:<24} {:>10} {:>14} {:>14}",
            "Call", "count", "total (s)", "mean (s)"
        ));
        for (name, stats) in &top {
            lines.push(format!(
                "  {:<24} {:>10} {:>14.6} {:>14.6}",
                name,
                stats.count,
                stats.total_duration,
                stats.mean()
            ));
        }
    }

    lines.join("\n")
}

/// Calls summed over all buckets, largest total duration first
///
/// **Public** - also useful for ad-hoc reporting
pub fn top_calls(state: &AggregateState, top_n: usize) -> Vec<(String, CallStats)> {
    let mut totals: BTreeMap<&str, CallStats> = BTreeMap::new();
    for (_, bucket) in state.iter() {
        for (name, stats) in &bucket.calls {
            totals
                .entry(name.as_str())
                .and_modify(|total| total.absorb(*stats))
                .or_insert(*stats);
        }
    }

    let mut ranked: Vec<(String, CallStats)> = totals
        .into_iter()
        .map(|(name, stats)| (name.to_string(), stats))
        .collect();
    ranked.sort_by(|a, b| b.1.total_duration.total_cmp(&a.1.total_duration));
    ranked.truncate(top_n);
    ranked
}

/// Format epoch seconds as `YYYY-MM-DD HH:MM:SS`, or fall back to the raw number
///
/// **Private** - internal formatting
fn wall_clock(epoch_secs: f64) -> String {
    let secs = epoch_secs.floor();
    let nanos = ((epoch_secs - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("{}", epoch_secs))
}
