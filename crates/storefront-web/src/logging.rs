//! `tracing` output routed to the browser console.
//!
//! A fmt subscriber formats each event into a [`ConsoleWriter`], which hands
//! the finished line to a sink when dropped. In the browser the sink picks
//! `console.error`/`warn`/`info`/`debug` by level; tests plug in their own.

use std::io;

use tracing::{Level, Metadata};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Receives one formatted line per event.
pub type Sink = fn(Level, &str);

/// [`MakeWriter`] producing one [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleMakeWriter {
    sink: Sink,
}

impl ConsoleMakeWriter {
    #[must_use]
    pub const fn new(sink: Sink) -> Self {
        Self { sink }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO, self.sink)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level(), self.sink)
    }
}

/// Buffers one formatted event and flushes it to the sink on drop.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
    sink: Sink,
}

impl ConsoleWriter {
    fn new(level: Level, sink: Sink) -> Self {
        Self {
            level,
            buf: Vec::new(),
            sink,
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        (self.sink)(self.level, line.trim_end());
    }
}

/// Max level from a config string; unknown values fall back to `info`.
#[must_use]
pub fn level_filter(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::INFO)
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(level: &str, sink: Sink) -> bool {
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter::new(sink))
        .with_max_level(level_filter(level))
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init()
        .is_ok()
}
