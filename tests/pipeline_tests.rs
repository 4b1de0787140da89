//! End-to-end pipeline tests: encode, queue, consume, write.

use std::sync::Arc;
use std::thread;

use flashlog::{Config, LogLine, Logger, Severity};
use tempfile::tempdir;

fn dir_prefix(dir: &tempfile::TempDir) -> String {
    format!("{}/", dir.path().display())
}

/// Read every output file in index order and return the raw lines.
fn read_all_lines(dir: &tempfile::TempDir, filename: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut index = 1;
    loop {
        let path = dir.path().join(format!("{}.{}.txt", filename, index));
        match std::fs::read_to_string(&path) {
            Ok(content) => lines.extend(content.lines().map(str::to_string)),
            Err(_) => break,
        }
        index += 1;
    }
    lines
}

fn payload(line: &str) -> &str {
    line.split_once("] ").expect("header present").1
}

#[test]
fn test_single_record() {
    let dir = tempdir().unwrap();
    let logger = Logger::new(Config::new(dir_prefix(&dir), "log", 1));
    let mut line = LogLine::new(Severity::Info, "pipeline.rs", "tests", 1);
    line.push("hello ").push(42i32);
    logger.submit(line);
    drop(logger);

    let lines = read_all_lines(&dir, "log");
    assert_eq!(lines.len(), 1);
    assert_eq!(payload(&lines[0]), "hello 42");
}

#[test]
fn test_sequential_records_survive_segment_rotation() {
    // More records than one queue segment holds, single producer.
    const COUNT: u64 = 100_000;

    let dir = tempdir().unwrap();
    let logger = Logger::new(Config::new(dir_prefix(&dir), "log", 64));
    for seq in 0..COUNT {
        let mut line = LogLine::new(Severity::Info, "pipeline.rs", "tests", 1);
        line.push("x-").push(seq);
        logger.submit(line);
    }
    drop(logger);

    let lines = read_all_lines(&dir, "log");
    assert_eq!(lines.len(), COUNT as usize);
    for (seq, line) in lines.iter().enumerate() {
        assert_eq!(payload(line), format!("x-{}", seq));
    }
}

#[test]
fn test_multi_producer_per_thread_fifo() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 25_000;

    let dir = tempdir().unwrap();
    let logger = Arc::new(Logger::new(Config::new(dir_prefix(&dir), "log", 64)));

    let mut handles = Vec::new();
    for producer in 0..PRODUCERS {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for seq in 0..PER_PRODUCER {
                let mut line = LogLine::new(Severity::Info, "pipeline.rs", "tests", 1);
                line.push(format!("p{}-{:06}", producer, seq));
                logger.submit(line);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    drop(
        Arc::try_unwrap(logger)
            .ok()
            .expect("all producers joined, sole owner"),
    );

    let lines = read_all_lines(&dir, "log");
    assert_eq!(lines.len(), PRODUCERS * PER_PRODUCER);

    // Partitioning by producer must give strictly increasing sequences.
    let mut next_seq = [0usize; PRODUCERS];
    for line in &lines {
        let text = payload(line);
        let (tag, seq) = text.split_once('-').expect("tagged payload");
        let producer: usize = tag[1..].parse().unwrap();
        let seq: usize = seq.parse().unwrap();
        assert_eq!(seq, next_seq[producer], "producer {} out of order", producer);
        next_seq[producer] += 1;
    }
    for count in next_seq {
        assert_eq!(count, PER_PRODUCER);
    }
}

#[test]
fn test_record_is_durable_after_drop() {
    let dir = tempdir().unwrap();
    let logger = Logger::new(Config::new(dir_prefix(&dir), "log", 1));
    let mut line = LogLine::new(Severity::Warn, "pipeline.rs", "tests", 1);
    line.push("last words");
    logger.submit(line);
    drop(logger);

    let lines = read_all_lines(&dir, "log");
    assert_eq!(lines.len(), 1);
    assert_eq!(payload(&lines[0]), "last words");
    assert!(lines[0].contains("[Warning]"));
}
