use proptest::prelude::*;
use strace_buckets::parser::{parse_line, CallRecord, Record};

fn expect_call(line: &str) -> CallRecord {
    match parse_line(line) {
        Some(Record::Call(call)) => call,
        other => panic!("expected call record for {:?}, got {:?}", line, other),
    }
}

#[test]
fn test_signal_grammar_takes_precedence() {
    let rec = parse_line(
        "1.500 --- SIGCHLD {si_signo=SIGCHLD, si_code=CLD_EXITED, si_pid=100, si_uid=0} ---",
    )
    .unwrap();
    assert!(rec.is_signal());
    assert_eq!(rec.timestamp(), 1.5);
}

#[test]
fn test_signal_with_trailing_spaces() {
    assert!(parse_line(
        "7.25 --- SIGSEGV {si_signo=SIGSEGV, si_code=SEGV_MAPERR, si_pid=0, si_uid=0} ---   "
    )
    .is_some());
}

#[test]
fn test_signal_lowercase_name_rejected() {
    assert_eq!(
        parse_line("1.5 --- sigchld {si_signo=SIGCHLD, si_code=CLD_EXITED, si_pid=1, si_uid=0} ---"),
        None
    );
}

#[test]
fn test_call_with_nested_parens_in_args() {
    let rec = expect_call(
        "12.000001 wait4(-1, [{WIFEXITED(s) && WEXITSTATUS(s) == 0}], 0, NULL) = 4242 <0.013000>",
    );
    assert_eq!(rec.call_name, "wait4");
    assert_eq!(rec.raw_args, "-1, [{WIFEXITED(s) && WEXITSTATUS(s) == 0}], 0, NULL");
    assert_eq!(rec.return_code, "4242");
}

#[test]
fn test_call_with_flag_annotation() {
    let rec = expect_call("5.0 fcntl(3, F_GETFL) = 0x8002 (flags O_RDWR) <0.000004>");
    assert_eq!(rec.return_code, "0x8002");
    assert_eq!(rec.exit_state.as_deref(), Some("(flags O_RDWR)"));
}

#[test]
fn test_annotation_outside_alphabet_rejected() {
    // '|' cannot appear in a trailing annotation, so the whole line fails
    assert_eq!(
        parse_line("5.0 fcntl(3, F_GETFL) = 0x8002 (flags O_RDWR|O_LARGEFILE) <0.000004>"),
        None
    );
}

#[test]
fn test_call_with_restart_annotation() {
    let rec = expect_call("5.0 nanosleep({tv_sec=1, tv_nsec=0}, NULL) = ? ERESTART_RESTARTBLOCK (Interrupted by signal) <0.400000>");
    assert_eq!(rec.return_code, "?");
    assert_eq!(
        rec.exit_state.as_deref(),
        Some("ERESTART_RESTARTBLOCK (Interrupted by signal)")
    );
    assert_eq!(rec.duration, 0.4);
}

#[test]
fn test_unfinished_and_resumed_lines_skipped() {
    assert_eq!(parse_line("5.0 read(3,  <unfinished ...>"), None);
    assert_eq!(parse_line("5.1 <... read resumed>\"x\", 1) = 1 <0.1>"), None);
    assert_eq!(parse_line("5.2 +++ exited with 0 +++"), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_call_line_round_trip(
        secs in 0u64..2_000_000_000,
        micros in 0u32..1_000_000,
        call in "[a-z_][a-z0-9_]{0,15}",
        args in "[a-zA-Z0-9_\",/ ]{0,30}",
        ret in prop_oneof![
            Just("?".to_string()),
            (-4096i64..100_000).prop_map(|n| n.to_string()),
            (0u64..u64::MAX).prop_map(|n| format!("0x{:x}", n)),
        ],
        annotation in proptest::option::of("[A-Z]{3,10}( \\([a-zA-Z ]{1,20}\\))?"),
        dur_secs in 0u32..10,
        dur_micros in 0u32..1_000_000,
    ) {
        let timestamp = format!("{}.{:06}", secs, micros);
        let duration = format!("{}.{:06}", dur_secs, dur_micros);
        let suffix = annotation
            .as_ref()
            .map(|a| format!(" {}", a))
            .unwrap_or_default();
        let line = format!("{} {}({}) = {}{} <{}>", timestamp, call, args, ret, suffix, duration);

        let rec = expect_call(&line);
        prop_assert_eq!(rec.timestamp, timestamp.parse::<f64>().unwrap());
        prop_assert_eq!(&rec.call_name, &call);
        prop_assert_eq!(&rec.raw_args, &args);
        prop_assert_eq!(&rec.return_code, &ret);
        prop_assert_eq!(&rec.exit_state, &annotation);
        prop_assert_eq!(rec.duration, duration.parse::<f64>().unwrap());
    }

    #[test]
    fn prop_missing_duration_is_no_record(
        secs in 0u64..2_000_000_000,
        call in "[a-z_][a-z0-9_]{0,15}",
        ret in -100i64..100,
    ) {
        let line = format!("{}.000001 {}(3) = {}", secs, call, ret);
        prop_assert_eq!(parse_line(&line), None);
        let line = format!("{}.000001 {}(3) = {} <>", secs, call, ret);
        prop_assert_eq!(parse_line(&line), None);
    }

    #[test]
    fn prop_arbitrary_text_never_panics(line in "\\PC{0,120}") {
        let _ = parse_line(&line);
    }
}
