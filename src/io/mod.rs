//! io
//!
//! Polymorphic source/destination endpoints.
//!
//! A [`Source`] is exactly one `read() -> text`; a [`Destination`] is exactly
//! one `write(text) -> outcome`. Never both in the same value. Endpoints are
//! resolved from plain configuration values:
//!
//! - a single-line string naming an existing file resolves to a file source,
//! - any other non-empty text is an inline text source,
//! - `None` as a destination captures output into a string buffer,
//! - an explicit stream handle passes through unchanged.
//!
//! Re-assigning a source or destination always re-resolves the concrete
//! endpoint type; callers never hold a stale classification.
//!
//! # Example
//!
//! ```
//! use scriptoria::io::Source;
//!
//! // Not a path on disk, so this is inline text.
//! let mut source = Source::resolve("hello world");
//! assert_eq!(source.read().unwrap(), "hello world");
//! ```

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from endpoint resolution and I/O.
///
/// Surfaced immediately, never retried.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// A file source could not be read.
    #[error("unreadable source: {path}")]
    Unreadable {
        /// The path that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file destination could not be written.
    #[error("unwritable destination: {path}")]
    Unwritable {
        /// The path that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A stream source failed mid-read.
    #[error("stream read failed")]
    StreamRead {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A stream destination failed mid-write.
    #[error("stream write failed")]
    StreamWrite {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A destination value that resolves to no usable endpoint
    /// (empty, or text spanning multiple lines).
    #[error("cannot resolve destination from {value:?}")]
    UnresolvableDestination {
        /// The value that failed to resolve
        value: String,
    },
}

/// A content source: inline text, a file, or a reader stream.
pub enum Source {
    /// Inline text; `read` returns it unchanged.
    Text(String),
    /// A file on disk, read and decoded on demand.
    File(PathBuf),
    /// An arbitrary reader, drained on first `read`.
    Stream(Box<dyn Read>),
}

impl Source {
    /// Resolve a configuration value into a concrete source.
    ///
    /// A value containing no newline that names an existing file resolves to
    /// [`Source::File`]; any other text is [`Source::Text`]. A string that
    /// merely looks like a path but does not exist on disk is therefore
    /// treated as inline content.
    pub fn resolve(value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.contains('\n') && Path::new(&value).is_file() {
            Source::File(PathBuf::from(value))
        } else {
            Source::Text(value)
        }
    }

    /// Wrap an explicit reader handle.
    pub fn stream(reader: impl Read + 'static) -> Self {
        Source::Stream(Box::new(reader))
    }

    /// Read the source, returning decoded text.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::Unreadable`] / [`EndpointError::StreamRead`]
    /// if the underlying resource cannot be read or is not valid UTF-8.
    pub fn read(&mut self) -> Result<String, EndpointError> {
        match self {
            Source::Text(text) => Ok(text.clone()),
            Source::File(path) => fs::read_to_string(&*path).map_err(|source| {
                EndpointError::Unreadable {
                    path: path.clone(),
                    source,
                }
            }),
            Source::Stream(reader) => {
                let mut buf = String::new();
                reader
                    .read_to_string(&mut buf)
                    .map_err(|source| EndpointError::StreamRead { source })?;
                Ok(buf)
            }
        }
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Text(text) => f.debug_tuple("Source::Text").field(&text.len()).finish(),
            Source::File(path) => f.debug_tuple("Source::File").field(path).finish(),
            Source::Stream(_) => f.write_str("Source::Stream(..)"),
        }
    }
}

/// What a destination's `write` produced, in the endpoint's own terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The full output text, captured by a buffer destination.
    Captured(String),
    /// Byte count written by a file or stream destination.
    BytesWritten(u64),
}

impl WriteOutcome {
    /// The captured text, if this outcome came from a buffer destination.
    pub fn captured(&self) -> Option<&str> {
        match self {
            WriteOutcome::Captured(text) => Some(text),
            WriteOutcome::BytesWritten(_) => None,
        }
    }
}

/// A content destination: a capture buffer, a file, or a writer stream.
pub enum Destination {
    /// Captures the output and hands it back as [`WriteOutcome::Captured`].
    Buffer,
    /// A file on disk, created or truncated on write.
    File(PathBuf),
    /// An arbitrary writer.
    Stream(Box<dyn Write>),
}

impl Destination {
    /// Resolve a configuration value into a concrete destination.
    ///
    /// `None` resolves to [`Destination::Buffer`]. A non-empty single-line
    /// string resolves to [`Destination::File`] whether or not the file
    /// exists yet, so a publish can create its output file.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::UnresolvableDestination`] for an empty or
    /// multi-line value.
    pub fn resolve(value: Option<impl Into<String>>) -> Result<Self, EndpointError> {
        match value {
            None => Ok(Destination::Buffer),
            Some(value) => {
                let value = value.into();
                if value.is_empty() || value.contains('\n') {
                    return Err(EndpointError::UnresolvableDestination { value });
                }
                Ok(Destination::File(PathBuf::from(value)))
            }
        }
    }

    /// Wrap an explicit writer handle.
    pub fn stream(writer: impl Write + 'static) -> Self {
        Destination::Stream(Box::new(writer))
    }

    /// Write text to the destination.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::Unwritable`] / [`EndpointError::StreamWrite`]
    /// if the underlying resource rejects the write.
    pub fn write(&mut self, text: &str) -> Result<WriteOutcome, EndpointError> {
        match self {
            Destination::Buffer => Ok(WriteOutcome::Captured(text.to_string())),
            Destination::File(path) => {
                fs::write(&*path, text).map_err(|source| EndpointError::Unwritable {
                    path: path.clone(),
                    source,
                })?;
                Ok(WriteOutcome::BytesWritten(text.len() as u64))
            }
            Destination::Stream(writer) => {
                writer
                    .write_all(text.as_bytes())
                    .and_then(|()| writer.flush())
                    .map_err(|source| EndpointError::StreamWrite { source })?;
                Ok(WriteOutcome::BytesWritten(text.len() as u64))
            }
        }
    }
}

impl std::fmt::Debug for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Buffer => f.write_str("Destination::Buffer"),
            Destination::File(path) => f.debug_tuple("Destination::File").field(path).finish(),
            Destination::Stream(_) => f.write_str("Destination::Stream(..)"),
        }
    }
}
