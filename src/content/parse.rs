//! content::parse
//!
//! Turning raw text into a [`ContentModel`].

use thiserror::Error;

use super::model::ContentModel;

/// Error from parsing raw text.
///
/// The default [`LineParser`] never fails: splitting on `\n` is total, and a
/// carriage return simply rides along at the end of its line. The type
/// exists for injected parsers with stricter grammars, which surface
/// malformed structure through it instead of recovering partially.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed document: {message}")]
pub struct ParseError {
    /// Description of the structure that could not be parsed
    pub message: String,
}

/// Capability interface for parsers, injected into a
/// [`DocumentPipeline`](crate::pipeline::DocumentPipeline).
pub trait Parse {
    /// Parse raw text into a content model.
    fn parse(&self, text: &str) -> Result<ContentModel, ParseError>;
}

/// The default parser: split on line boundaries, nothing else.
///
/// No normalization happens at parse time; all derived fields are computed
/// lazily on first access through the model. CRLF input keeps its `\r` as
/// the last character of each line, so it serializes back unchanged. A
/// single trailing newline is consumed here and restored by the writer,
/// which is what makes the round-trip law hold.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineParser;

impl Parse for LineParser {
    fn parse(&self, text: &str) -> Result<ContentModel, ParseError> {
        let mut lines: Vec<String> = text.split('\n').map(String::from).collect();
        // "a\nb\n" splits into ["a", "b", ""]; the empty tail is the trailing
        // newline the writer puts back.
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        Ok(ContentModel::from_lines(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_line_boundaries() {
        let model = LineParser.parse("a\nb\nc\n").unwrap();
        assert_eq!(model.lines(), ["a", "b", "c"]);
    }

    #[test]
    fn missing_trailing_newline_parses_the_same() {
        let model = LineParser.parse("a\nb\nc").unwrap();
        assert_eq!(model.lines(), ["a", "b", "c"]);
    }

    #[test]
    fn interior_blank_lines_are_preserved() {
        let model = LineParser.parse("a\n\n\nb\n").unwrap();
        assert_eq!(model.lines(), ["a", "", "", "b"]);
    }

    #[test]
    fn empty_text_parses_to_empty_model() {
        let model = LineParser.parse("").unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn lone_newline_is_one_empty_line() {
        let model = LineParser.parse("\n").unwrap();
        assert_eq!(model.lines(), [""]);
    }

    #[test]
    fn carriage_returns_ride_inside_lines() {
        let model = LineParser.parse("a\r\nb\r\n").unwrap();
        assert_eq!(model.lines(), ["a\r", "b\r"]);

        let model = LineParser.parse("mac\rstyle\n").unwrap();
        assert_eq!(model.lines(), ["mac\rstyle"]);
    }
}
