//! Log-line encoding and decoding.
//!
//! A [`LogLine`] is a self-contained binary record built on the producer
//! thread in a handful of stores, then moved through the queue and decoded
//! on the consumer. Formatting work never happens on the producer side.
//!
//! # Wire layout
//!
//! ```text
//! ┌──────────────────────────────┬────────────────────────────┐
//! │ fixed prefix (no tag bytes)  │ tagged arguments           │
//! │ time, tid, file, func,       │ (tag u8, value bytes)*     │
//! │ line, severity               │                            │
//! └──────────────────────────────┴────────────────────────────┘
//! ```
//!
//! Short records live entirely in the inline buffer; the first overflow
//! promotes to a 512-byte heap buffer which then doubles as needed.

use std::fmt::Write as _;
use std::mem;
use std::ptr;
use std::slice;
use std::str;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::colors;
use crate::log_time::LogLineTime;
use crate::severity::Severity;

/// Whole-record byte budget: bookkeeping plus inline payload.
const LINE_BYTES: usize = 256;

/// Inline payload capacity left after the bookkeeping fields.
pub(crate) const INLINE_CAP: usize =
    LINE_BYTES - mem::size_of::<usize>() - mem::size_of::<Option<Box<[u8]>>>();

/// First heap capacity after inline overflow.
const FIRST_HEAP_CAP: usize = 512;

// Argument tag bytes. Stable within a process; never persisted.
const TAG_CHAR: u8 = 0;
const TAG_STRING: u8 = 1;
const TAG_I32: u8 = 2;
const TAG_I64: u8 = 3;
const TAG_U32: u8 = 4;
const TAG_U64: u8 = 5;
const TAG_F64: u8 = 6;
const TAG_LITERAL: u8 = 7;

const BROKEN_RECORD: &str = "<broken record>";

/// Borrowed `'static` string stored in the payload as pointer + length.
#[derive(Clone, Copy)]
#[repr(C)]
struct StrLiteral {
    ptr: *const u8,
    len: usize,
}

impl StrLiteral {
    #[inline]
    fn new(s: &'static str) -> Self {
        Self {
            ptr: s.as_ptr(),
            len: s.len(),
        }
    }

    /// # Safety
    ///
    /// Must have been built by [`StrLiteral::new`], i.e. point at `'static`
    /// UTF-8 data of the recorded length.
    #[inline]
    unsafe fn as_str(self) -> &'static str {
        str::from_utf8_unchecked(slice::from_raw_parts(self.ptr, self.len))
    }
}

/// Size of the fixed, untagged record prefix.
pub(crate) const HEADER_BYTES: usize = mem::size_of::<LogLineTime>()
    + mem::size_of::<u64>()
    + 2 * mem::size_of::<StrLiteral>()
    + mem::size_of::<u32>()
    + mem::size_of::<u8>();

const SEVERITY_OFFSET: usize = HEADER_BYTES - 1;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Compact numeric id of the calling thread, assigned on first use.
#[inline]
fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// One encoded log record.
///
/// Created on a producer thread, mutated only by that producer, moved into
/// the queue at commit, consumed exactly once on the consumer side.
pub struct LogLine {
    used_bytes: usize,
    heap_buffer: Option<Box<[u8]>>,
    stack_buffer: [u8; INLINE_CAP],
}

// SAFETY: the raw pointers embedded in the payload only ever reference
// `'static` string data, so the record may move between threads.
unsafe impl Send for LogLine {}

impl LogLine {
    /// Capture the call site and timestamp and start a new record.
    ///
    /// The fixed prefix is written immediately; streamed arguments follow
    /// via [`LogLine::push`].
    pub fn new(level: Severity, file: &'static str, func: &'static str, line: u32) -> Self {
        let mut this = Self {
            used_bytes: 0,
            heap_buffer: None,
            stack_buffer: [0; INLINE_CAP],
        };
        this.encode_raw(&LogLineTime::now());
        this.encode_raw(&current_thread_id());
        this.encode_raw(&StrLiteral::new(file));
        this.encode_raw(&StrLiteral::new(func));
        this.encode_raw(&line);
        this.encode_raw(&(level as u8));
        this
    }

    /// Stream one value into the record.
    #[inline]
    pub fn push<T: Encode>(&mut self, value: T) -> &mut Self {
        value.encode(self);
        self
    }

    /// Bytes written so far (prefix + arguments).
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Current buffer capacity, inline or heap.
    #[inline]
    pub fn capacity(&self) -> usize {
        match self.heap_buffer {
            Some(ref heap) => heap.len(),
            None => INLINE_CAP,
        }
    }

    /// Severity recorded in the fixed prefix.
    #[inline]
    pub fn severity(&self) -> Severity {
        Severity::from_u8(self.bytes()[SEVERITY_OFFSET])
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        match self.heap_buffer {
            Some(ref heap) => heap,
            None => &self.stack_buffer,
        }
    }

    #[inline]
    fn write_ptr(&mut self) -> *mut u8 {
        let used = self.used_bytes;
        match self.heap_buffer {
            Some(ref mut heap) => heap[used..].as_mut_ptr(),
            None => self.stack_buffer[used..].as_mut_ptr(),
        }
    }

    /// Grow so that `additional` more bytes fit.
    ///
    /// Inline until the first overflow, then `max(512, required)`, then
    /// doubling. Existing content is carried over on every growth.
    fn reserve(&mut self, additional: usize) {
        let required = self.used_bytes + additional;
        if required <= self.capacity() {
            return;
        }
        let new_cap = match self.heap_buffer {
            None => required.max(FIRST_HEAP_CAP),
            Some(ref heap) => required.max(2 * heap.len()),
        };
        let mut heap = vec![0u8; new_cap].into_boxed_slice();
        heap[..self.used_bytes].copy_from_slice(&self.bytes()[..self.used_bytes]);
        self.heap_buffer = Some(heap);
    }

    /// Append the raw bytes of `value`, growing first if needed.
    #[inline]
    fn encode_raw<T: Copy>(&mut self, value: &T) {
        self.reserve(mem::size_of::<T>());
        // SAFETY: reserve guaranteed capacity; the destination is plain
        // bytes, so an unaligned store is fine.
        unsafe { ptr::write_unaligned(self.write_ptr() as *mut T, *value) };
        self.used_bytes += mem::size_of::<T>();
    }

    #[inline]
    fn encode_tagged<T: Copy>(&mut self, tag: u8, value: &T) {
        self.reserve(1 + mem::size_of::<T>());
        self.encode_raw(&tag);
        self.encode_raw(value);
    }

    /// Copy a string into the buffer: tag, bytes, NUL terminator.
    ///
    /// Empty strings encode nothing.
    fn encode_str_bytes(&mut self, s: &[u8]) {
        if s.is_empty() {
            return;
        }
        self.reserve(s.len() + 2);
        self.encode_raw(&TAG_STRING);
        // SAFETY: the reserve above guaranteed room for the bytes plus the
        // terminator.
        unsafe {
            let dst = self.write_ptr();
            ptr::copy_nonoverlapping(s.as_ptr(), dst, s.len());
            *dst.add(s.len()) = 0;
        }
        self.used_bytes += s.len() + 1;
    }

    /// Decode and format this record, appending one `\n`-terminated line.
    ///
    /// With `colored` set the severity and call site are wrapped in ANSI
    /// escapes for terminal output. An unknown tag or a truncated value
    /// truncates the payload and appends a marker; the surrounding stream
    /// continues with the next record.
    pub fn format_into(&self, out: &mut String, colored: bool) {
        let mut decoder = Decoder {
            data: &self.bytes()[..self.used_bytes],
            pos: 0,
        };

        let header = (|| {
            let time: LogLineTime = decoder.read()?;
            let thread_id: u64 = decoder.read()?;
            let file: StrLiteral = decoder.read()?;
            let func: StrLiteral = decoder.read()?;
            let line: u32 = decoder.read()?;
            let level: u8 = decoder.read()?;
            Some((time, thread_id, file, func, line, Severity::from_u8(level)))
        })();
        let (time, thread_id, file, func, line, level) = match header {
            Some(header) => header,
            None => {
                out.push_str(BROKEN_RECORD);
                out.push('\n');
                return;
            }
        };

        let _ = write!(
            out,
            "[{:04}-{:02}-{:02}-{:02}{:02}{:02}",
            time.year, time.month, time.day, time.hour, time.minute, time.second
        );
        if cfg!(feature = "with-millisec") {
            let _ = write!(out, "-{:06}", time.usec);
        }
        if cfg!(feature = "gmt-offset") {
            let _ = write!(out, "{:+}", time.gmtoff);
        }
        if cfg!(feature = "is-dst") {
            let _ = write!(out, "-DST{}", time.dst);
        }
        out.push(']');

        // SAFETY: both literals were captured from `&'static str` in the
        // constructor.
        let (file, func) = unsafe { (file.as_str(), func.as_str()) };
        if colored {
            let _ = write!(
                out,
                "[{}{}{}][{}][{}{}:{}:{}{}] ",
                colors::severity_color(level),
                level.as_str(),
                colors::TERM_RESET,
                thread_id,
                colors::TERM_BOLD,
                file,
                func,
                line,
                colors::TERM_RESET
            );
        } else {
            let _ = write!(
                out,
                "[{}][{}][{}:{}:{}] ",
                level.as_str(),
                thread_id,
                file,
                func,
                line
            );
        }

        while !decoder.done() {
            let ok = match decoder.read::<u8>() {
                Some(TAG_CHAR) => decoder.read::<u8>().map(|b| out.push(b as char)).is_some(),
                Some(TAG_STRING) => decoder
                    .read_cstr()
                    .map(|s| out.push_str(&String::from_utf8_lossy(s)))
                    .is_some(),
                Some(TAG_I32) => decoder
                    .read::<i32>()
                    .map(|v| {
                        let _ = write!(out, "{}", v);
                    })
                    .is_some(),
                Some(TAG_I64) => decoder
                    .read::<i64>()
                    .map(|v| {
                        let _ = write!(out, "{}", v);
                    })
                    .is_some(),
                Some(TAG_U32) => decoder
                    .read::<u32>()
                    .map(|v| {
                        let _ = write!(out, "{}", v);
                    })
                    .is_some(),
                Some(TAG_U64) => decoder
                    .read::<u64>()
                    .map(|v| {
                        let _ = write!(out, "{}", v);
                    })
                    .is_some(),
                Some(TAG_F64) => decoder
                    .read::<f64>()
                    .map(|v| {
                        let _ = write!(out, "{}", v);
                    })
                    .is_some(),
                Some(TAG_LITERAL) => decoder
                    .read::<StrLiteral>()
                    .map(|lit| {
                        // SAFETY: encoded from a `&'static str` by push.
                        out.push_str(unsafe { lit.as_str() });
                    })
                    .is_some(),
                _ => false,
            };
            if !ok {
                out.push_str(BROKEN_RECORD);
                break;
            }
        }
        out.push('\n');
    }
}

/// Bounds-checked cursor over an encoded payload.
struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Read one unaligned value, or `None` past the end of the payload.
    #[inline]
    fn read<T: Copy>(&mut self) -> Option<T> {
        let size = mem::size_of::<T>();
        if size > self.data.len() - self.pos {
            return None;
        }
        // SAFETY: bounds checked above; unaligned load from plain bytes.
        let value = unsafe { ptr::read_unaligned(self.data.as_ptr().add(self.pos) as *const T) };
        self.pos += size;
        Some(value)
    }

    /// Read up to and past the NUL terminator, returning the bytes before it.
    fn read_cstr(&mut self) -> Option<&'a [u8]> {
        let rest = &self.data[self.pos..];
        let nul = rest.iter().position(|&b| b == 0)?;
        self.pos += nul + 1;
        Some(&rest[..nul])
    }

    #[inline]
    fn done(&self) -> bool {
        self.pos >= self.data.len()
    }
}

/// Value types that can be streamed into a [`LogLine`].
pub trait Encode {
    fn encode(self, line: &mut LogLine);
}

impl Encode for u8 {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_tagged(TAG_CHAR, &self);
    }
}

impl Encode for i32 {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_tagged(TAG_I32, &self);
    }
}

impl Encode for i64 {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_tagged(TAG_I64, &self);
    }
}

impl Encode for u32 {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_tagged(TAG_U32, &self);
    }
}

impl Encode for u64 {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_tagged(TAG_U64, &self);
    }
}

impl Encode for f64 {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_tagged(TAG_F64, &self);
    }
}

impl Encode for &'static str {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_tagged(TAG_LITERAL, &StrLiteral::new(self));
    }
}

impl Encode for String {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_str_bytes(self.as_bytes());
    }
}

impl Encode for &String {
    #[inline]
    fn encode(self, line: &mut LogLine) {
        line.encode_str_bytes(self.as_bytes());
    }
}
