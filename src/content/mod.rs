//! content
//!
//! Line-based document model, parser, writer, and transforms.
//!
//! A document is an ordered sequence of lines plus lazily derived structure:
//! the title (first heading-like construct) and the docstring block (leading
//! comment or string block). Transforms mutate the line sequence in place and
//! invalidate the derived caches; parsing and serialization are line-faithful
//! so that transforms operate on structure, never on raw text offsets.
//!
//! # Round-trip law
//!
//! For any text `t` with a single trailing newline,
//! `LineWriter.translate(LineParser.parse(t)) == t`. Text missing a trailing
//! newline gains exactly one; no other normalization happens.

mod model;
mod parse;
mod transform;
mod write;

pub use model::ContentModel;
pub use parse::{LineParser, Parse, ParseError};
pub use transform::{Transform, TransformError};
pub use write::{LineWriter, Translate};
