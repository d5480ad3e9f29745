use pretty_assertions::assert_eq;
use std::path::Path;
use strace_buckets::aggregator::{Accumulator, AggregateState};
use strace_buckets::output::{
    export, read_stats, stats_to_string, validate_path, write_csv, write_stats,
};
use strace_buckets::parser::parse_line;
use strace_buckets::utils::OutputError;
use tempfile::NamedTempFile;

fn create_test_state() -> AggregateState {
    let mut acc = Accumulator::new(300.0).unwrap();
    for line in [
        "1.000 open(\"/tmp/a\", O_RDONLY) = 3 <0.002>",
        "1.500 --- SIGCHLD {si_signo=SIGCHLD, si_code=CLD_EXITED, si_pid=100, si_uid=0} ---",
        "2.000 read(3, \"x\", 1) = 1 <0.5>",
        "310.000 read(3, \"x\", 1) = 1 <0.25>",
        "320.000 read(3, \"x\", 1) = 1 <0.75>",
        "900.000 write(1, \"x\", 1) = 1 <1.5>",
    ] {
        acc.record(parse_line(line).as_ref());
    }
    acc.into_state()
}

#[test]
fn test_write_and_read_stats() {
    let state = create_test_state();
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    write_stats(&state, path).unwrap();
    let loaded = read_stats(path, 300.0).unwrap();

    assert_eq!(loaded, state);
}

#[test]
fn test_read_stats_wrong_width() {
    let state = create_test_state();
    let temp_file = NamedTempFile::new().unwrap();
    write_stats(&state, temp_file.path()).unwrap();

    // 300.0 and 900.0 are not multiples of 600
    let err = read_stats(temp_file.path(), 600.0).unwrap_err();
    assert!(matches!(err, OutputError::InvalidBucketKey(_)));
}

#[test]
fn test_read_stats_bad_json() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "[1, 2, 3]").unwrap();
    assert!(matches!(
        read_stats(temp_file.path(), 300.0),
        Err(OutputError::SerializationFailed(_))
    ));
}

#[test]
fn test_stats_json_shape() {
    let json: serde_json::Value =
        serde_json::from_str(&stats_to_string(&create_test_state()).unwrap()).unwrap();

    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&"0.0"));
    assert!(keys.contains(&"300.0"));
    assert!(keys.contains(&"900.0"));
    assert_eq!(json["300.0"]["calls"]["read"]["count"], 2);
    assert_eq!(json["300.0"]["calls"]["read"]["total_duration"], 1.0);
}

#[test]
fn test_export_table() {
    let table = export(&create_test_state());

    assert_eq!(
        table.to_csv(),
        "timestamp,open,read,write\n\
         0.0,0.002,0.5,0\n\
         300.0,0,0.5,0\n\
         900.0,0,0,1.5\n"
    );
}

#[test]
fn test_export_is_idempotent() {
    let state = create_test_state();
    assert_eq!(export(&state), export(&state));
    assert_eq!(export(&state).to_csv(), export(&state).to_csv());
}

#[test]
fn test_export_after_round_trip_unchanged() {
    let state = create_test_state();
    let temp_file = NamedTempFile::new().unwrap();
    write_stats(&state, temp_file.path()).unwrap();

    let reloaded = read_stats(temp_file.path(), 300.0).unwrap();
    assert_eq!(export(&reloaded).to_csv(), export(&state).to_csv());
}

#[test]
fn test_write_csv_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/stats.csv");

    write_csv(&export(&create_test_state()), &nested_path).unwrap();

    let written = std::fs::read_to_string(&nested_path).unwrap();
    assert!(written.starts_with("timestamp,open,read,write\n"));
}

#[test]
fn test_validate_output_path_empty() {
    assert!(validate_path(Path::new("")).is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    assert!(validate_path(temp_dir.path()).is_err());
}
