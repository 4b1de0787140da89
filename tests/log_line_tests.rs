//! Encoder round-trip tests through the public API.

use flashlog::{LogLine, Severity};

fn new_line() -> LogLine {
    LogLine::new(Severity::Info, "file.rs", "module", 7)
}

fn render(line: &LogLine) -> String {
    let mut out = String::new();
    line.format_into(&mut out, false);
    out
}

fn payload(line: &LogLine) -> String {
    render(line)
        .split_once("] ")
        .expect("header present")
        .1
        .trim_end_matches('\n')
        .to_string()
}

#[test]
fn test_header_shape() {
    let line = new_line();
    let rendered = render(&line);
    assert!(rendered.starts_with('['));
    assert!(rendered.contains("[Info]"));
    assert!(rendered.contains("[file.rs:module:7] "));
    assert!(rendered.ends_with('\n'));
}

#[test]
fn test_each_scalar_type_round_trips() {
    let mut line = new_line();
    line.push(-7i32);
    assert_eq!(payload(&line), "-7");

    let mut line = new_line();
    line.push(1234567890123i64);
    assert_eq!(payload(&line), "1234567890123");

    let mut line = new_line();
    line.push(7u32);
    assert_eq!(payload(&line), "7");

    let mut line = new_line();
    line.push(u64::MAX);
    assert_eq!(payload(&line), "18446744073709551615");

    let mut line = new_line();
    line.push(-0.25f64);
    assert_eq!(payload(&line), "-0.25");

    let mut line = new_line();
    line.push(b'%');
    assert_eq!(payload(&line), "%");
}

#[test]
fn test_literal_and_owned_strings() {
    let mut line = new_line();
    line.push("static ").push(String::from("owned"));
    assert_eq!(payload(&line), "static owned");
}

#[test]
fn test_streaming_order_is_preserved() {
    let mut line = new_line();
    line.push(1u32)
        .push(" ")
        .push(2i64)
        .push(" ")
        .push(3.5f64)
        .push(" ")
        .push(String::from("four"));
    assert_eq!(payload(&line), "1 2 3.5 four");
}

#[test]
fn test_boundary_growth_keeps_content() {
    // Grow through inline, first heap, and doubled heap; the decoded
    // payload must match the streamed content at every stage.
    let mut line = new_line();
    let mut expected = String::new();
    for (chunk, len) in [("a", 100), ("b", 200), ("c", 400), ("d", 800)] {
        let piece = chunk.repeat(len);
        expected.push_str(&piece);
        line.push(piece);
        assert_eq!(payload(&line), expected);
    }
    assert!(line.used_bytes() <= line.capacity());
}

#[test]
fn test_four_kib_owned_string() {
    let text = "z".repeat(4096);
    let mut line = new_line();
    line.push(text.clone());
    assert_eq!(payload(&line), text);
}

#[test]
fn test_severity_is_readable_from_record() {
    for level in [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ] {
        let line = LogLine::new(level, "file.rs", "module", 1);
        assert_eq!(line.severity(), level);
    }
}
