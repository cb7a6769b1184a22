//! Diagnostic reporting for parsed data files.
//!
//! Diagnostics are advisory: the parser and the node tree hand a message and a
//! rendered ancestor trace to a [`DiagnosticSink`] and carry on. The only hard
//! failure in the workspace is acquiring the input text, covered by [`Error`].

mod sink;

use camino::Utf8PathBuf;

pub use sink::{ConsoleSink, DiagnosticSink, StringSink, format_entry};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read `{path}`")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
