//! Rolling file sink.
//!
//! Owned and driven by the consumer thread only: one writer, one thread,
//! no locking. Records are formatted into a scratch string and appended to
//! the current file; when the running byte count passes the roll threshold
//! the file is closed and the next numbered one is opened.

use std::fs::File;
use std::io::{BufWriter, Write};

use thiserror::Error;

use crate::log_line::LogLine;
use crate::severity::Severity;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Failure latched by the writer. The submit path never sees these; the
/// writer goes quiet and the error is kept for inspection.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-and-roll file writer.
///
/// `dir` is used as a verbatim path prefix: it must end with a path
/// separator and the directory must already exist. Output files are
/// `{dir}{filename}.{N}.txt` with `N` starting at 1.
pub struct FileWriter {
    path_prefix: String,
    roll_bytes: u64,
    bytes_written: u64,
    file_index: u32,
    stream: Option<BufWriter<File>>,
    last_error: Option<WriteError>,
}

impl FileWriter {
    /// Open the first output file. `roll_size_mb` below 1 is clamped to 1.
    pub fn new(dir: &str, filename: &str, roll_size_mb: u32) -> Self {
        let mut writer = Self {
            path_prefix: format!("{}{}", dir, filename),
            roll_bytes: u64::from(roll_size_mb.max(1)) * BYTES_PER_MB,
            bytes_written: 0,
            file_index: 0,
            stream: None,
            last_error: None,
        };
        writer.roll();
        writer
    }

    /// Format `line` and append it to the current file.
    ///
    /// Fatal records flush the stream after the newline. Once a write or
    /// open fails the writer drops everything silently; see
    /// [`FileWriter::last_error`].
    pub fn write(&mut self, line: &LogLine) {
        if self.last_error.is_some() {
            return;
        }

        let mut text = String::new();
        line.format_into(&mut text, false);

        #[cfg(feature = "console-out")]
        {
            let mut colored = String::new();
            line.format_into(&mut colored, true);
            print!("{}", colored);
        }

        let stream = match self.stream {
            Some(ref mut stream) => stream,
            None => return,
        };
        if let Err(err) = stream.write_all(text.as_bytes()) {
            self.last_error = Some(WriteError::Io(err));
            return;
        }
        self.bytes_written += text.len() as u64;
        if line.severity() == Severity::Fatal {
            let _ = stream.flush();
        }
        if self.bytes_written > self.roll_bytes {
            self.roll();
        }
    }

    /// Flush buffered output to the file.
    pub fn flush(&mut self) {
        if let Some(ref mut stream) = self.stream {
            let _ = stream.flush();
        }
    }

    /// Close the current file and open the next numbered one.
    fn roll(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.flush();
        }
        self.bytes_written = 0;
        self.file_index += 1;
        let path = format!("{}.{}.txt", self.path_prefix, self.file_index);
        match File::create(&path) {
            Ok(file) => self.stream = Some(BufWriter::new(file)),
            Err(source) => self.last_error = Some(WriteError::Open { path, source }),
        }
    }

    /// True once an open or write failure has silenced the writer.
    pub fn is_broken(&self) -> bool {
        self.last_error.is_some()
    }

    /// The failure that silenced the writer, if any.
    pub fn last_error(&self) -> Option<&WriteError> {
        self.last_error.as_ref()
    }

    /// Index of the file currently being written (1-based).
    pub fn file_index(&self) -> u32 {
        self.file_index
    }

    /// Configured roll threshold in bytes.
    pub fn roll_bytes(&self) -> u64 {
        self.roll_bytes
    }
}
