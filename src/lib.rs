//! # FlashLog
//!
//! Asynchronous, low-latency, thread-safe file logger.
//!
//! Producer threads encode records into private binary buffers in
//! microseconds, without blocking on I/O or allocating for short lines,
//! and hand them to a single background consumer that formats and
//! appends them to rolling output files.
//!
//! ## Architecture
//!
//! ```text
//! producer ──▶ LogLine ──▶ LogQueue ──▶ consumer thread ──▶ FileWriter
//! threads      (encode)    (lock-free    (decode+format)     (roll at
//!                           segments)                         size cap)
//! ```
//!
//! Components are isolated: producers only touch the queue, the consumer
//! thread owns the writer outright, and the only shared state is a
//! handful of atomics.
//!
//! ## Usage
//!
//! ```ignore
//! use flashlog::{flog_info, Config};
//!
//! flashlog::init(Config::new("/var/log/myapp/", "app", 16));
//! flog_info!("started, answer = ", 42);
//! flashlog::shutdown(); // drains everything to disk
//! ```

pub mod colors;
pub mod config;
pub mod log_line;
pub mod log_time;
pub mod logger;
mod macros;
pub mod queue;
pub mod severity;
pub mod writer;

pub use config::Config;
pub use log_line::{Encode, LogLine};
pub use log_time::LogLineTime;
pub use logger::{init, shutdown, Logger};
pub use queue::{LogQueue, Segment};
pub use severity::Severity;
pub use writer::{FileWriter, WriteError};
