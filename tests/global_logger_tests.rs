//! Process-wide facade and macro tests.
//!
//! The global logger is shared process state, so everything here runs
//! inside one test function, sequentially.

use flashlog::{
    check, check_eq, check_p, check_streq, check_streq_case, check_t, flog_fatal, flog_info,
    flog_warn, Config,
};
use tempfile::tempdir;

fn payloads(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| {
            line.split_once("] ")
                .expect("header present")
                .1
                .to_string()
        })
        .collect()
}

#[test]
fn test_global_facade_end_to_end() {
    // Submitting with no logger installed must be a silent no-op.
    flog_info!("dropped on the floor");

    // Basic macro logging through init/shutdown.
    let dir = tempdir().unwrap();
    flashlog::init(Config::new(format!("{}/", dir.path().display()), "log", 1));
    flog_info!("hello ", 42);
    flog_warn!("count=", 3u32);
    flog_fatal!("not fatal to the process");
    flashlog::shutdown();

    let lines = payloads(&dir.path().join("log.1.txt"));
    assert_eq!(
        lines,
        vec![
            "hello 42".to_string(),
            "count=3".to_string(),
            "not fatal to the process".to_string(),
        ]
    );

    // The check family: passing checks are silent, failing checks log.
    let dir = tempdir().unwrap();
    flashlog::init(Config::new(format!("{}/", dir.path().display()), "log", 1));
    let two = 2;
    check!(two == 2);
    check!(two == 3);
    check_eq!(1, 2);
    check_streq!("abc", "abc");
    check_streq!("abc", "abd");
    check_streq_case!("Same", "sAME");
    check_streq_case!("same", "different");
    check_p!(Some(1));
    check_p!(Option::<i32>::None);
    check_t!(two, i32);
    flashlog::shutdown();

    let lines = payloads(&dir.path().join("log.1.txt"));
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "CHECK failed: two == 3");
    assert_eq!(lines[1], "CHECK_EQ failed: 1 != 2");
    assert_eq!(lines[2], "CHECK_STREQ failed: \"abc\" != \"abd\"");
    assert_eq!(
        lines[3],
        "CHECK_STREQ_CASE failed: \"same\" != \"different\""
    );
    assert!(lines[4].starts_with("CHECK_P failed: "));
    assert!(lines[4].ends_with(" is none"));

    // Re-init replaces the previous logger and starts over at file 1.
    let dir = tempdir().unwrap();
    let prefix = format!("{}/", dir.path().display());
    flashlog::init(Config::new(prefix.clone(), "log", 1));
    flog_info!("first run");
    flashlog::init(Config::new(prefix, "log", 1));
    flog_info!("second run");
    flashlog::shutdown();

    let lines = payloads(&dir.path().join("log.1.txt"));
    assert_eq!(lines, vec!["second run".to_string()]);

    // Submitting after shutdown is a silent no-op again.
    flog_info!("also dropped");
}
