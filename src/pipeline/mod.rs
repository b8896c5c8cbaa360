//! pipeline
//!
//! Read-transform-write orchestration for a single document.
//!
//! A [`DocumentPipeline`] composes a parser, a content model, and a writer
//! over one source/destination pair. `publish` reads the source once,
//! caches the parsed model, applies the requested transforms, and writes the
//! serialized result to the destination.
//!
//! # Caching
//!
//! Content is read and parsed on the first `publish` (or `read`) and cached;
//! later calls reuse it, which is what makes repeated publishes cumulative.
//! Only [`DocumentPipeline::reset`] drops the cache - reassigning the source
//! deliberately does not (see `set_source`).
//!
//! # Example
//!
//! ```
//! use scriptoria::content::Transform;
//! use scriptoria::pipeline::DocumentPipeline;
//!
//! let mut pipeline = DocumentPipeline::from_source("Title\n\nBody line\n");
//! let outcome = pipeline
//!     .publish(&[Transform::rename_title("New Title")])
//!     .unwrap();
//! assert_eq!(outcome.captured(), Some("New Title\n\nBody line\n"));
//! ```

use std::io::{Read, Write};

use thiserror::Error;
use tracing::debug;

use crate::content::{
    ContentModel, LineParser, LineWriter, Parse, ParseError, Transform, TransformError, Translate,
};
use crate::io::{Destination, EndpointError, Source, WriteOutcome};

/// Errors from publishing a document.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No source has been assigned to the pipeline.
    #[error("pipeline has no source")]
    MissingSource,

    /// Endpoint resolution or I/O failed.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// The source text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A transform's precondition was unmet.
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Transient per-document state composing parser, model, and writer.
///
/// Owned exclusively by the caller that constructs it; a pipeline is never
/// shared across concurrent documents. The same pipeline object can process
/// a second document after [`reset`](Self::reset).
pub struct DocumentPipeline {
    source: Option<Source>,
    destination: Destination,
    parser: Box<dyn Parse>,
    writer: Box<dyn Translate>,
    content: Option<ContentModel>,
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentPipeline {
    /// Create a pipeline with no source and a capture-buffer destination,
    /// using the default line parser and writer.
    pub fn new() -> Self {
        Self {
            source: None,
            destination: Destination::Buffer,
            parser: Box::new(LineParser),
            writer: Box::new(LineWriter),
            content: None,
        }
    }

    /// Create a pipeline from a source configuration value (inline text or
    /// an existing file path), capturing output into a buffer.
    pub fn from_source(value: impl Into<String>) -> Self {
        let mut pipeline = Self::new();
        pipeline.set_source(value);
        pipeline
    }

    /// Create a pipeline with injected parser and writer strategies.
    pub fn with_strategies(parser: Box<dyn Parse>, writer: Box<dyn Translate>) -> Self {
        Self {
            parser,
            writer,
            ..Self::new()
        }
    }

    /// Assign a new source, re-resolving the endpoint type.
    ///
    /// This does NOT invalidate already-cached content: a later `publish`
    /// still reuses the cache from the previous source. Call
    /// [`reset`](Self::reset) first when switching documents.
    pub fn set_source(&mut self, value: impl Into<String>) {
        self.source = Some(Source::resolve(value));
    }

    /// Assign an explicit stream source. Same caching caveat as
    /// [`set_source`](Self::set_source).
    pub fn set_source_stream(&mut self, reader: impl Read + 'static) {
        self.source = Some(Source::stream(reader));
    }

    /// Assign a new destination, re-resolving the endpoint type.
    /// `None` captures output into a string buffer.
    pub fn set_destination(
        &mut self,
        value: Option<impl Into<String>>,
    ) -> Result<(), EndpointError> {
        self.destination = Destination::resolve(value)?;
        Ok(())
    }

    /// Assign an explicit stream destination.
    pub fn set_destination_stream(&mut self, writer: impl Write + 'static) {
        self.destination = Destination::Stream(Box::new(writer));
    }

    /// The cached content model, if a read has happened.
    pub fn content(&self) -> Option<&ContentModel> {
        self.content.as_ref()
    }

    /// Read and parse the source, caching the model.
    ///
    /// A no-op if content is already cached.
    pub fn read(&mut self) -> Result<&mut ContentModel, PipelineError> {
        if self.content.is_none() {
            let source = self.source.as_mut().ok_or(PipelineError::MissingSource)?;
            let text = source.read()?;
            self.content = Some(self.parser.parse(&text)?);
        }
        // The branch above just filled it in; the fallback never runs.
        Ok(self.content.get_or_insert_with(ContentModel::new))
    }

    /// Publish the document: read once, apply the transforms in order,
    /// serialize, and write to the destination.
    ///
    /// An empty transform slice is a pass-through publish. Repeated calls
    /// without [`reset`](Self::reset) apply their transforms cumulatively to
    /// the same cached content and never re-read the source.
    ///
    /// # Errors
    ///
    /// Surfaces the first endpoint, parse, or transform failure; nothing is
    /// written when a transform fails.
    pub fn publish(&mut self, transforms: &[Transform]) -> Result<WriteOutcome, PipelineError> {
        self.read()?;
        // Borrow the cache field directly so the writer and destination
        // stay available alongside it.
        let content = self.content.get_or_insert_with(ContentModel::new);
        for transform in transforms {
            content.apply(transform)?;
        }

        debug!(
            transforms = transforms.len(),
            lines = content.len(),
            "publishing document"
        );

        let output = self.writer.translate(content);
        Ok(self.destination.write(&output)?)
    }

    /// Drop the cached content and restore the default parser and writer so
    /// the pipeline can process a different document.
    pub fn reset(&mut self) {
        self.reset_with(Box::new(LineParser), Box::new(LineWriter));
    }

    /// [`reset`](Self::reset), but with replacement strategies.
    pub fn reset_with(&mut self, parser: Box<dyn Parse>, writer: Box<dyn Translate>) {
        self.content = None;
        self.parser = parser;
        self.writer = writer;
    }
}

impl std::fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("cached", &self.content.is_some())
            .finish()
    }
}
