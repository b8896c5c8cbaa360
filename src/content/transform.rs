//! content::transform
//!
//! Named mutations over a [`ContentModel`].
//!
//! Each transform rewrites the line sequence in place and drops the cached
//! derived fields. Preconditions are checked before any mutation, so a
//! failed transform leaves the document untouched.

use thiserror::Error;

use super::model::ContentModel;

/// Errors from applying a transform.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The document has no discernible title to rename.
    #[error("document has no title")]
    TitleMissing,

    /// The document has no docstring block.
    #[error("document has no docstring block")]
    DocstringMissing,

    /// The identifier to replace does not occur in the docstring block.
    #[error("identifier not found in docstring: {identifier}")]
    IdentifierNotFound {
        /// The identifier that was searched for
        identifier: String,
    },

    /// No author metadata line exists in the document.
    #[error("document has no author metadata")]
    AuthorNotFound,
}

/// A named mutation of a document.
///
/// # Example
///
/// ```
/// use scriptoria::content::{ContentModel, Transform};
///
/// let mut model = ContentModel::from_lines(vec![
///     "Title".to_string(),
///     "".to_string(),
///     "Body line".to_string(),
/// ]);
/// model.apply(&Transform::rename_title("New Title")).unwrap();
/// assert_eq!(model.title(), Some("New Title"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Rewrite the title line, resizing an RST-style underline if one
    /// directly follows it.
    RenameTitle {
        /// The replacement title text
        new_title: String,
    },

    /// Substitute every occurrence of an identifier inside the docstring
    /// block.
    ReplaceIdentifier {
        /// The identifier to replace
        old: String,
        /// The replacement
        new: String,
    },

    /// Rewrite author metadata lines (`__author__ = ...`, `:author: ...`,
    /// and the name in `:copyright: ... by NAME, ...`).
    SetAuthor {
        /// The replacement author
        author: String,
    },
}

impl Transform {
    /// Shorthand for [`Transform::RenameTitle`].
    pub fn rename_title(new_title: impl Into<String>) -> Self {
        Transform::RenameTitle {
            new_title: new_title.into(),
        }
    }

    /// Shorthand for [`Transform::ReplaceIdentifier`].
    pub fn replace_identifier(old: impl Into<String>, new: impl Into<String>) -> Self {
        Transform::ReplaceIdentifier {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Shorthand for [`Transform::SetAuthor`].
    pub fn set_author(author: impl Into<String>) -> Self {
        Transform::SetAuthor {
            author: author.into(),
        }
    }
}

impl ContentModel {
    /// Apply a named transform, invalidating cached derived fields.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformError`] when the transform's precondition is
    /// unmet; the document is left unmodified in that case.
    pub fn apply(&mut self, transform: &Transform) -> Result<(), TransformError> {
        match transform {
            Transform::RenameTitle { new_title } => self.rename_title(new_title),
            Transform::ReplaceIdentifier { old, new } => self.replace_identifier(old, new),
            Transform::SetAuthor { author } => self.set_author(author),
        }
    }

    fn rename_title(&mut self, new_title: &str) -> Result<(), TransformError> {
        let title = self
            .derived_title()
            .clone()
            .ok_or(TransformError::TitleMissing)?;

        let lines = self.lines_mut();
        let line = &mut lines[title.line];
        if let Some(pos) = line.find(&title.text) {
            line.replace_range(pos..pos + title.text.len(), new_title);
        }

        // Resize an RST-style underline (a run of one punctuation character
        // exactly as long as the old title) on the following line.
        if let Some(underline) = lines.get_mut(title.line + 1) {
            if let Some(ch) = underline_char(underline, title.text.chars().count()) {
                let indent: String = underline
                    .chars()
                    .take_while(|c| c.is_whitespace())
                    .collect();
                *underline = format!("{indent}{}", ch.to_string().repeat(new_title.chars().count()));
            }
        }

        self.invalidate();
        Ok(())
    }

    fn replace_identifier(&mut self, old: &str, new: &str) -> Result<(), TransformError> {
        let block = self
            .derived_docstring()
            .ok_or(TransformError::DocstringMissing)?;

        let occurrences: usize = self.lines()[block.start..=block.end]
            .iter()
            .map(|line| line.matches(old).count())
            .sum();
        if occurrences == 0 {
            return Err(TransformError::IdentifierNotFound {
                identifier: old.to_string(),
            });
        }

        for line in &mut self.lines_mut()[block.start..=block.end] {
            if line.contains(old) {
                *line = line.replace(old, new);
            }
        }

        self.invalidate();
        Ok(())
    }

    fn set_author(&mut self, author: &str) -> Result<(), TransformError> {
        let rewritten: Vec<(usize, String)> = self
            .lines()
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| rewrite_author_line(line, author).map(|l| (idx, l)))
            .collect();

        if rewritten.is_empty() {
            return Err(TransformError::AuthorNotFound);
        }

        let lines = self.lines_mut();
        for (idx, line) in rewritten {
            lines[idx] = line;
        }

        self.invalidate();
        Ok(())
    }
}

/// If the line is an underline of the expected width, return its character.
fn underline_char(line: &str, width: usize) -> Option<char> {
    const UNDERLINE_CHARS: &str = "=-~^\"'`#*+.:_";

    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !UNDERLINE_CHARS.contains(first) {
        return None;
    }
    if !chars.all(|c| c == first) {
        return None;
    }
    (trimmed.chars().count() == width).then_some(first)
}

/// Rewrite one line's author metadata, if it carries any.
fn rewrite_author_line(line: &str, author: &str) -> Option<String> {
    let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
    let trimmed = line.trim_start();

    if trimmed.starts_with("__author__") {
        return Some(format!("{indent}__author__ = \"{author}\""));
    }

    if trimmed.starts_with(":author:") {
        return Some(format!("{indent}:author: {author}"));
    }

    // ":copyright: Copyright 2017 by NAME, see AUTHORS for details."
    if trimmed.starts_with(":copyright:") {
        if let Some(by_pos) = trimmed.find(" by ") {
            let (head, rest) = trimmed.split_at(by_pos + " by ".len());
            let tail = rest.find(',').map(|p| &rest[p..]).unwrap_or("");
            return Some(format!("{indent}{head}{author}{tail}"));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(text: &str) -> ContentModel {
        ContentModel::from_lines(text.split('\n').map(String::from).collect())
    }

    fn rendered(model: &ContentModel) -> String {
        model.lines().join("\n")
    }

    #[test]
    fn rename_title_on_plain_document() {
        let mut m = model("Title\n\nBody line");
        m.apply(&Transform::rename_title("New Title")).unwrap();
        assert_eq!(rendered(&m), "New Title\n\nBody line");
        assert_eq!(m.title(), Some("New Title"));
    }

    #[test]
    fn rename_title_resizes_underline() {
        let mut m = model("\"\"\"\n    pkg.module\n    ~~~~~~~~~~\n\n    Summary.\n\"\"\"");
        m.apply(&Transform::rename_title("newpkg.module")).unwrap();
        assert_eq!(
            rendered(&m),
            "\"\"\"\n    newpkg.module\n    ~~~~~~~~~~~~~\n\n    Summary.\n\"\"\""
        );
    }

    #[test]
    fn rename_title_leaves_non_underline_next_line() {
        let mut m = model("Title\nnot an underline");
        m.apply(&Transform::rename_title("Renamed")).unwrap();
        assert_eq!(rendered(&m), "Renamed\nnot an underline");
    }

    #[test]
    fn rename_title_without_title_fails_untouched() {
        let mut m = model("\n\n");
        let err = m.apply(&Transform::rename_title("X")).unwrap_err();
        assert_eq!(err, TransformError::TitleMissing);
        assert_eq!(rendered(&m), "\n\n");
    }

    #[test]
    fn replace_identifier_inside_docstring_only() {
        let mut m = model("\"\"\"\n    old_pkg.git\n    ~~~~~~~~~~~\n\"\"\"\nimport old_pkg");
        m.apply(&Transform::replace_identifier("old_pkg", "new_pkg"))
            .unwrap();
        // The body import is outside the docstring block and stays put.
        assert_eq!(
            rendered(&m),
            "\"\"\"\n    new_pkg.git\n    ~~~~~~~~~~~\n\"\"\"\nimport old_pkg"
        );
    }

    #[test]
    fn replace_identifier_requires_docstring() {
        let mut m = model("plain text");
        assert_eq!(
            m.apply(&Transform::replace_identifier("a", "b")),
            Err(TransformError::DocstringMissing)
        );
    }

    #[test]
    fn replace_identifier_requires_occurrence() {
        let mut m = model("\"\"\"doc\"\"\"");
        assert_eq!(
            m.apply(&Transform::replace_identifier("absent", "b")),
            Err(TransformError::IdentifierNotFound {
                identifier: "absent".to_string()
            })
        );
    }

    #[test]
    fn set_author_rewrites_dunder_assignment() {
        let mut m = model("__author__ = \"Old Name\"\nprint()");
        m.apply(&Transform::set_author("New Name")).unwrap();
        assert_eq!(rendered(&m), "__author__ = \"New Name\"\nprint()");
    }

    #[test]
    fn set_author_rewrites_copyright_field() {
        let mut m = model(
            "\"\"\"\n    :copyright: Copyright 2017 by Old Name, see AUTHORS for details.\n\"\"\"",
        );
        m.apply(&Transform::set_author("New Name")).unwrap();
        assert_eq!(
            rendered(&m),
            "\"\"\"\n    :copyright: Copyright 2017 by New Name, see AUTHORS for details.\n\"\"\""
        );
    }

    #[test]
    fn set_author_rewrites_author_field() {
        let mut m = model("    :author: Somebody Else");
        m.apply(&Transform::set_author("New Name")).unwrap();
        assert_eq!(rendered(&m), "    :author: New Name");
    }

    #[test]
    fn set_author_without_metadata_fails() {
        let mut m = model("no metadata here");
        assert_eq!(
            m.apply(&Transform::set_author("X")),
            Err(TransformError::AuthorNotFound)
        );
    }

    #[test]
    fn transforms_invalidate_cached_title() {
        let mut m = model("Title\nbody");
        assert_eq!(m.title(), Some("Title"));
        m.apply(&Transform::rename_title("Other")).unwrap();
        assert_eq!(m.title(), Some("Other"));
    }
}
