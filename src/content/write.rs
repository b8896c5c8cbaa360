//! content::write
//!
//! Serializing a [`ContentModel`] back to text.

use crate::io::{Destination, EndpointError, WriteOutcome};

use super::model::ContentModel;

/// Capability interface for writers, injected into a
/// [`DocumentPipeline`](crate::pipeline::DocumentPipeline).
pub trait Translate {
    /// Serialize the model's current line sequence to text.
    fn translate(&self, content: &ContentModel) -> String;
}

/// The default writer: join lines with `\n` and exactly one trailing
/// newline.
///
/// An empty model serializes to the empty string, so empty documents also
/// round-trip.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineWriter;

impl LineWriter {
    /// Serialize the content and hand it to the destination endpoint.
    pub fn write(
        &self,
        content: &ContentModel,
        destination: &mut Destination,
    ) -> Result<WriteOutcome, EndpointError> {
        let output = self.translate(content);
        destination.write(&output)
    }
}

impl Translate for LineWriter {
    fn translate(&self, content: &ContentModel) -> String {
        if content.is_empty() {
            return String::new();
        }
        let mut output = content.lines().join("\n");
        output.push('\n');
        output
    }
}
