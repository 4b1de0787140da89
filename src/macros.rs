//! Call-site logging and check macros.
//!
//! `flog!` captures the call site (`file!`, `module_path!`, `line!`),
//! streams its arguments into a fresh record, and submits it to the
//! process-wide logger. The per-severity wrappers and the `check_*`
//! family are thin layers over it.
//!
//! The `check_*_f!` variants drain the logger before aborting so the
//! failure record is on disk when the process dies.

/// Build a log line at the call site and hand it to the process-wide
/// logger.
///
/// # Example
///
/// ```ignore
/// flog!(Severity::Info, "answer: ", 42);
/// ```
#[macro_export]
macro_rules! flog {
    ($level:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut line = $crate::LogLine::new($level, file!(), module_path!(), line!());
        $( line.push($arg); )*
        $crate::logger::submit(line);
    }};
}

/// Log at Debug severity.
#[macro_export]
macro_rules! flog_debug {
    ($($arg:expr),* $(,)?) => {
        $crate::flog!($crate::Severity::Debug $(, $arg)*)
    };
}

/// Log at Info severity.
#[macro_export]
macro_rules! flog_info {
    ($($arg:expr),* $(,)?) => {
        $crate::flog!($crate::Severity::Info $(, $arg)*)
    };
}

/// Log at Warn severity.
#[macro_export]
macro_rules! flog_warn {
    ($($arg:expr),* $(,)?) => {
        $crate::flog!($crate::Severity::Warn $(, $arg)*)
    };
}

/// Log at Error severity.
#[macro_export]
macro_rules! flog_error {
    ($($arg:expr),* $(,)?) => {
        $crate::flog!($crate::Severity::Error $(, $arg)*)
    };
}

/// Log at Fatal severity. Does not terminate the process.
#[macro_export]
macro_rules! flog_fatal {
    ($($arg:expr),* $(,)?) => {
        $crate::flog!($crate::Severity::Fatal $(, $arg)*)
    };
}

/// Warn when a condition does not hold.
#[macro_export]
macro_rules! check {
    ($cond:expr) => {
        if !($cond) {
            $crate::flog!(
                $crate::Severity::Warn,
                "CHECK failed: ",
                stringify!($cond)
            );
        }
    };
}

/// Abort when a condition does not hold, after logging it at Fatal and
/// draining the logger.
#[macro_export]
macro_rules! check_f {
    ($cond:expr) => {
        if !($cond) {
            $crate::flog!(
                $crate::Severity::Fatal,
                "CHECK failed: ",
                stringify!($cond)
            );
            $crate::logger::shutdown();
            ::std::process::abort();
        }
    };
}

/// Warn when two values differ.
#[macro_export]
macro_rules! check_eq {
    ($a:expr, $b:expr) => {
        if ($a) != ($b) {
            $crate::flog!(
                $crate::Severity::Warn,
                "CHECK_EQ failed: ",
                stringify!($a),
                " != ",
                stringify!($b)
            );
        }
    };
}

/// Abort when two values differ, after logging at Fatal and draining.
#[macro_export]
macro_rules! check_eq_f {
    ($a:expr, $b:expr) => {
        if ($a) != ($b) {
            $crate::flog!(
                $crate::Severity::Fatal,
                "CHECK_EQ failed: ",
                stringify!($a),
                " != ",
                stringify!($b)
            );
            $crate::logger::shutdown();
            ::std::process::abort();
        }
    };
}

/// Warn when two strings differ.
#[macro_export]
macro_rules! check_streq {
    ($a:expr, $b:expr) => {{
        let a = $a;
        let b = $b;
        if a != b {
            let mut line = $crate::LogLine::new(
                $crate::Severity::Warn,
                file!(),
                module_path!(),
                line!(),
            );
            line.push("CHECK_STREQ failed: \"")
                .push(a.to_string())
                .push("\" != \"")
                .push(b.to_string())
                .push("\"");
            $crate::logger::submit(line);
        }
    }};
}

/// Abort when two strings differ, after logging at Fatal and draining.
#[macro_export]
macro_rules! check_streq_f {
    ($a:expr, $b:expr) => {{
        let a = $a;
        let b = $b;
        if a != b {
            let mut line = $crate::LogLine::new(
                $crate::Severity::Fatal,
                file!(),
                module_path!(),
                line!(),
            );
            line.push("CHECK_STREQ failed: \"")
                .push(a.to_string())
                .push("\" != \"")
                .push(b.to_string())
                .push("\"");
            $crate::logger::submit(line);
            $crate::logger::shutdown();
            ::std::process::abort();
        }
    }};
}

/// Warn when two strings differ ignoring ASCII case.
#[macro_export]
macro_rules! check_streq_case {
    ($a:expr, $b:expr) => {{
        let a = $a;
        let b = $b;
        if !a.eq_ignore_ascii_case(b) {
            let mut line = $crate::LogLine::new(
                $crate::Severity::Warn,
                file!(),
                module_path!(),
                line!(),
            );
            line.push("CHECK_STREQ_CASE failed: \"")
                .push(a.to_string())
                .push("\" != \"")
                .push(b.to_string())
                .push("\"");
            $crate::logger::submit(line);
        }
    }};
}

/// Abort when two strings differ ignoring ASCII case, after logging at
/// Fatal and draining.
#[macro_export]
macro_rules! check_streq_case_f {
    ($a:expr, $b:expr) => {{
        let a = $a;
        let b = $b;
        if !a.eq_ignore_ascii_case(b) {
            let mut line = $crate::LogLine::new(
                $crate::Severity::Fatal,
                file!(),
                module_path!(),
                line!(),
            );
            line.push("CHECK_STREQ_CASE failed: \"")
                .push(a.to_string())
                .push("\" != \"")
                .push(b.to_string())
                .push("\"");
            $crate::logger::submit(line);
            $crate::logger::shutdown();
            ::std::process::abort();
        }
    }};
}

/// Warn when an `Option` is `None`.
#[macro_export]
macro_rules! check_p {
    ($opt:expr) => {
        if ($opt).is_none() {
            $crate::flog!(
                $crate::Severity::Warn,
                "CHECK_P failed: ",
                stringify!($opt),
                " is none"
            );
        }
    };
}

/// Abort when an `Option` is `None`, after logging at Fatal and draining.
#[macro_export]
macro_rules! check_p_f {
    ($opt:expr) => {
        if ($opt).is_none() {
            $crate::flog!(
                $crate::Severity::Fatal,
                "CHECK_P failed: ",
                stringify!($opt),
                " is none"
            );
            $crate::logger::shutdown();
            ::std::process::abort();
        }
    };
}

/// Compile-time assertion that a value has the given type.
#[macro_export]
macro_rules! check_t {
    ($v:expr, $t:ty) => {{
        let _: &$t = &$v;
    }};
}
