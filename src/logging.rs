use std::io;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Line writer that hands each formatted event to the browser console.
///
/// Natively it writes to stderr so test output still shows up.
#[derive(Default)]
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();

        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&line.into());

        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{line}");

        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[derive(Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::default()
    }
}

pub(crate) fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(level: &str) {
    // wasm32 has no wall clock for the default timer.
    let result = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_writer(MakeConsoleWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();

    if result.is_err() {
        tracing::debug!("logging already initialised");
    }
}
