//! Logger composition root and the process-wide facade.
//!
//! A [`Logger`] ties together the queue, the background consumer thread,
//! and the file writer. Producers only ever touch the queue; the consumer
//! thread owns the writer outright.
//!
//! The free functions at the bottom manage the process-wide instance the
//! logging macros submit to.

use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::log_line::LogLine;
use crate::queue::LogQueue;
use crate::writer::FileWriter;

const STATE_INIT: u8 = 0;
const STATE_ENABLED: u8 = 1;
const STATE_DISABLED: u8 = 2;

struct Shared {
    state: AtomicU8,
    queue: LogQueue,
}

/// Asynchronous logger: MPSC queue + consumer thread + rolling file sink.
///
/// Dropping the logger disables intake, drains every record already
/// enqueued to disk, and joins the consumer thread.
pub struct Logger {
    shared: Arc<Shared>,
    consumer: Option<thread::JoinHandle<()>>,
}

impl Logger {
    /// Build the queue, open the first output file, and start the
    /// consumer thread.
    ///
    /// Allocation or thread-spawn failure here is unrecoverable and
    /// panics. An unwritable `config.dir` is not an error at this level:
    /// the writer goes quiet and records are discarded.
    pub fn new(config: Config) -> Self {
        let shared = Arc::new(Shared {
            state: AtomicU8::new(STATE_INIT),
            queue: LogQueue::new(),
        });
        let writer = FileWriter::new(&config.dir, &config.filename, config.roll_size_mb);
        let worker = Arc::clone(&shared);
        let consumer = thread::Builder::new()
            .name("flashlog-consumer".to_string())
            .spawn(move || consume(worker, writer))
            .expect("failed to spawn log consumer thread");
        shared.state.store(STATE_ENABLED, Ordering::Release);
        Self {
            shared,
            consumer: Some(consumer),
        }
    }

    /// Hand one encoded record to the background consumer.
    #[inline]
    pub fn submit(&self, line: LogLine) {
        self.shared.queue.push(line);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shared.state.store(STATE_DISABLED, Ordering::SeqCst);
        if let Some(consumer) = self.consumer.take() {
            let _ = consumer.join();
        }
    }
}

/// Consumer loop: drain the queue into the writer until disabled, then
/// drain whatever is left and flush.
fn consume(shared: Arc<Shared>, mut writer: FileWriter) {
    while shared.state.load(Ordering::Acquire) == STATE_INIT {
        std::hint::spin_loop();
    }

    // Idle back-off ladder: spin, then yield, then sleep with a doubling
    // interval capped at 1ms. Reset on every popped record so sustained
    // throughput never sleeps.
    let mut idle_rounds: u32 = 0;
    let mut sleep_us: u64 = 1;
    while shared.state.load(Ordering::SeqCst) == STATE_ENABLED {
        match shared.queue.pop() {
            Some(line) => {
                writer.write(&line);
                idle_rounds = 0;
                sleep_us = 1;
            }
            None => {
                idle_rounds = idle_rounds.saturating_add(1);
                if idle_rounds < 64 {
                    std::hint::spin_loop();
                } else if idle_rounds < 128 {
                    thread::yield_now();
                } else {
                    thread::sleep(Duration::from_micros(sleep_us));
                    sleep_us = (sleep_us * 2).min(1000);
                }
            }
        }
    }

    while let Some(line) = shared.queue.pop() {
        writer.write(&line);
    }
    writer.flush();
}

static LOGGER: AtomicPtr<Logger> = AtomicPtr::new(ptr::null_mut());

/// Install the process-wide logger, replacing (and draining) any previous
/// instance.
///
/// Must not race with concurrent submits or other `init`/`shutdown`
/// calls; call it once during startup before logging begins.
pub fn init(config: Config) {
    shutdown();
    let logger = Box::into_raw(Box::new(Logger::new(config)));
    LOGGER.store(logger, Ordering::SeqCst);
}

/// Forward one record to the process-wide logger.
///
/// Records submitted before [`init`] (or after [`shutdown`]) are dropped.
#[inline]
pub fn submit(line: LogLine) {
    let logger = LOGGER.load(Ordering::Acquire);
    if logger.is_null() {
        return;
    }
    // SAFETY: a non-null pointer was installed by `init` and stays live
    // until `shutdown` reclaims it; `init`/`shutdown` must not race with
    // submits.
    unsafe { (*logger).submit(line) };
}

/// Tear down the process-wide logger, draining queued records to disk.
pub fn shutdown() {
    let logger = LOGGER.swap(ptr::null_mut(), Ordering::SeqCst);
    if !logger.is_null() {
        // SAFETY: the pointer came from Box::into_raw in `init`; swapping
        // to null transfers ownership back exactly once.
        drop(unsafe { Box::from_raw(logger) });
    }
}
