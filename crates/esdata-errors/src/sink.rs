use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Receives diagnostics produced while parsing or querying a tree.
///
/// `trace` holds already rendered lines ordered from the outermost ancestor
/// to the node that raised the diagnostic.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, message: Option<&str>, trace: Option<&[String]>);
}

/// Renders one diagnostic entry as newline-terminated text.
///
/// The message gets its own line. Every trace line is indented two spaces
/// deeper than the one before it, starting unindented.
pub fn format_entry(message: Option<&str>, trace: Option<&[String]>) -> String {
    let mut entry = String::new();
    if let Some(message) = message {
        entry.push_str(message);
        entry.push('\n');
    }
    for (depth, line) in trace.unwrap_or_default().iter().enumerate() {
        _ = writeln!(entry, "{:width$}{line}", "", width = depth * 2);
    }
    entry
}

/// Writes every entry straight to a console-like output.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Mutex::new(Box::new(out)) }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

impl DiagnosticSink for ConsoleSink {
    fn log(&self, message: Option<&str>, trace: Option<&[String]>) {
        tracing::debug!(
            text = message,
            depth = trace.map_or(0, <[String]>::len),
            "diagnostic logged"
        );

        let entry = format_entry(message, trace);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = out.write_all(entry.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(%error, "failed to write diagnostic");
        }
    }
}

#[derive(Debug, Default)]
struct Buffer {
    /// `None` once logging has been stopped or resources released.
    live: Option<String>,
    frozen: String,
}

/// Accumulates entries in memory until [`StringSink::stop_logging`] freezes them.
#[derive(Debug)]
pub struct StringSink {
    buffer: Mutex<Buffer>,
}

impl Default for StringSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StringSink {
    pub fn new() -> Self {
        Self { buffer: Mutex::new(Buffer { live: Some(String::new()), frozen: String::new() }) }
    }

    /// Everything logged so far, or the snapshot taken by `stop_logging`.
    pub fn contents(&self) -> String {
        let buffer = self.lock();
        buffer.live.clone().unwrap_or_else(|| buffer.frozen.clone())
    }

    pub fn is_logging(&self) -> bool {
        self.lock().live.is_some()
    }

    /// Snapshots the buffer. Later `log` calls are ignored.
    pub fn stop_logging(&self) {
        let mut buffer = self.lock();
        if let Some(live) = buffer.live.take() {
            buffer.frozen = live;
        }
    }

    /// Drops the buffer and the snapshot; `contents` is empty from now on.
    pub fn free_resources(&self) {
        let mut buffer = self.lock();
        buffer.live = None;
        buffer.frozen = String::new();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Buffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for StringSink {
    fn log(&self, message: Option<&str>, trace: Option<&[String]>) {
        let mut buffer = self.lock();
        if let Some(live) = buffer.live.as_mut() {
            live.push_str(&format_entry(message, trace));
        }
    }
}

impl std::fmt::Display for StringSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.contents())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn trace(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn entry_indents_each_trace_line_deeper() {
        let trace = trace(&["ship Bob", "  guns 2"]);
        let entry = format_entry(Some("oops"), Some(&trace));
        assert_eq!(entry, "oops\nship Bob\n    guns 2\n");
    }

    #[test]
    fn entry_without_message_or_trace_is_empty() {
        assert_eq!(format_entry(None, None), "");
        assert_eq!(format_entry(None, Some(&[])), "");
    }

    #[test]
    fn string_sink_accumulates() {
        let sink = StringSink::new();
        sink.log(Some("first"), None);
        sink.log(None, Some(&trace(&["a"])));
        assert_eq!(sink.contents(), "first\na\n");
        assert!(sink.is_logging());
    }

    #[test]
    fn stop_logging_freezes_contents() {
        let sink = StringSink::new();
        sink.log(Some("kept"), None);
        sink.stop_logging();
        sink.log(Some("dropped"), None);

        assert!(!sink.is_logging());
        assert_eq!(sink.contents(), "kept\n");
        assert_eq!(sink.to_string(), "kept\n");

        sink.stop_logging();
        assert_eq!(sink.contents(), "kept\n");
    }

    #[test]
    fn free_resources_clears_everything() {
        let sink = StringSink::new();
        sink.log(Some("gone"), None);
        sink.stop_logging();
        sink.free_resources();
        assert_eq!(sink.contents(), "");

        sink.log(Some("still gone"), None);
        assert_eq!(sink.contents(), "");
    }

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn console_sink_writes_immediately() {
        let out = Shared::default();
        let sink = ConsoleSink::new(out.clone());

        sink.log(Some("Cannot convert"), Some(&trace(&["L3:   outfit Laser"])));
        let written = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, "Cannot convert\nL3:   outfit Laser\n");
    }
}
