//! content::model
//!
//! The mutable in-memory document representation.
//!
//! Derived fields (title, docstring block) are computed on first access and
//! cached; a document never pays derivation cost it does not use. Every
//! mutation of the line sequence drops the caches.

use std::cell::OnceCell;

/// Location and text of the document title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Title {
    /// Zero-based index of the title line
    pub(crate) line: usize,
    /// The title text, stripped of markers and surrounding whitespace
    pub(crate) text: String,
}

/// Inclusive line range of the leading docstring block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DocBlock {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Structured, mutable representation of a document.
///
/// Created by a parser on `read()`, mutated in place by transforms, consumed
/// by a writer on `write()`.
///
/// # Derived structure
///
/// - **docstring block**: the leading triple-quoted string (`"""` / `'''`)
///   or the leading run of `#` / `//` comment lines, after any blank lines
///   and a shebang.
/// - **title**: the first non-empty line inside the docstring block, or the
///   first non-empty line of the document when there is no docstring.
/// - **body**: everything after the docstring block (or after the title line
///   when there is no docstring).
///
/// A document with no discernible title or docstring yields `None` for the
/// derived field; absence is not an error.
#[derive(Debug, Default)]
pub struct ContentModel {
    lines: Vec<String>,
    title: OnceCell<Option<Title>>,
    docstring: OnceCell<Option<DocBlock>>,
}

impl ContentModel {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from an existing line sequence.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    /// Replace the entire line sequence, dropping derived caches.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.invalidate();
    }

    /// The current line sequence.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The document title, if one can be derived.
    ///
    /// # Example
    ///
    /// ```
    /// use scriptoria::content::ContentModel;
    ///
    /// let model = ContentModel::from_lines(vec![
    ///     "Title".to_string(),
    ///     "".to_string(),
    ///     "Body line".to_string(),
    /// ]);
    /// assert_eq!(model.title(), Some("Title"));
    /// ```
    pub fn title(&self) -> Option<&str> {
        self.derived_title().as_ref().map(|t| t.text.as_str())
    }

    /// The lines of the leading docstring block, if the document has one.
    pub fn docstring(&self) -> Option<&[String]> {
        self.derived_docstring()
            .map(|block| &self.lines[block.start..=block.end])
    }

    /// The lines after the docstring block (or after the title line when
    /// there is no docstring). The whole document if neither exists.
    pub fn body(&self) -> &[String] {
        let after = match (self.derived_docstring(), self.derived_title()) {
            (Some(block), _) => block.end + 1,
            (None, Some(title)) => title.line + 1,
            (None, None) => 0,
        };
        &self.lines[after.min(self.lines.len())..]
    }

    pub(crate) fn derived_title(&self) -> &Option<Title> {
        self.title.get_or_init(|| derive_title(&self.lines, self.derived_docstring_inner()))
    }

    pub(crate) fn derived_docstring(&self) -> Option<DocBlock> {
        self.derived_docstring_inner()
    }

    fn derived_docstring_inner(&self) -> Option<DocBlock> {
        *self
            .docstring
            .get_or_init(|| derive_docstring(&self.lines))
    }

    /// Mutable access to the line sequence for transforms. Always paired
    /// with cache invalidation by the caller.
    pub(crate) fn lines_mut(&mut self) -> &mut Vec<String> {
        &mut self.lines
    }

    /// Drop cached derived fields after a mutation.
    pub(crate) fn invalidate(&mut self) {
        self.title = OnceCell::new();
        self.docstring = OnceCell::new();
    }
}

/// Locate the leading docstring block, if any.
fn derive_docstring(lines: &[String]) -> Option<DocBlock> {
    let mut idx = 0;

    // Skip a shebang and leading blank lines.
    if lines.first().is_some_and(|l| l.starts_with("#!")) {
        idx = 1;
    }
    while lines.get(idx).is_some_and(|l| l.trim().is_empty()) {
        idx += 1;
    }

    let first = lines.get(idx)?;
    let trimmed = first.trim_start();

    for delim in ["\"\"\"", "'''"] {
        if let Some(rest) = trimmed.strip_prefix(delim) {
            // Single-line docstring: """text"""
            if rest.trim_end().ends_with(delim) && !rest.trim_end().is_empty() {
                return Some(DocBlock {
                    start: idx,
                    end: idx,
                });
            }
            // Multi-line: scan for the closing delimiter.
            for (offset, line) in lines[idx + 1..].iter().enumerate() {
                if line.contains(delim) {
                    return Some(DocBlock {
                        start: idx,
                        end: idx + 1 + offset,
                    });
                }
            }
            // Unterminated block: no docstring rather than a parse failure.
            return None;
        }
    }

    // Leading comment run.
    if let Some(marker) = comment_marker(trimmed) {
        let mut end = idx;
        while lines
            .get(end + 1)
            .is_some_and(|l| comment_marker(l.trim_start()) == Some(marker))
        {
            end += 1;
        }
        return Some(DocBlock { start: idx, end });
    }

    None
}

fn comment_marker(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("//") {
        Some("//")
    } else if trimmed.starts_with('#') && !trimmed.starts_with("#!") {
        Some("#")
    } else {
        None
    }
}

/// Locate the title: first non-empty line inside the docstring block, or the
/// first non-blank line of the document.
fn derive_title(lines: &[String], docstring: Option<DocBlock>) -> Option<Title> {
    match docstring {
        Some(block) => {
            for (idx, line) in lines[block.start..=block.end].iter().enumerate() {
                let text = strip_markers(line);
                if !text.is_empty() {
                    return Some(Title {
                        line: block.start + idx,
                        text: text.to_string(),
                    });
                }
            }
            None
        }
        None => lines.iter().enumerate().find_map(|(idx, line)| {
            let text = line.trim();
            (!text.is_empty()).then(|| Title {
                line: idx,
                text: text.to_string(),
            })
        }),
    }
}

/// Strip docstring delimiters and comment markers from a line.
fn strip_markers(line: &str) -> &str {
    let mut text = line.trim();
    for delim in ["\"\"\"", "'''"] {
        text = text.strip_prefix(delim).unwrap_or(text);
        text = text.strip_suffix(delim).unwrap_or(text);
    }
    if let Some(rest) = text.strip_prefix("//") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix('#') {
        text = rest;
    }
    text.trim()
}
