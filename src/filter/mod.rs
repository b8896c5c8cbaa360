//! filter
//!
//! Gitignore-semantics pattern matching.
//!
//! A [`PatternSet`] holds an ordered list of glob patterns in ignore-file
//! syntax (`*`, `**`, directory-only trailing `/`, leading `!` negation) and
//! answers whether a slash-separated relative path matches. Evaluation is
//! last-match-wins: a later pattern overrides an earlier one for the same
//! path, exactly as a `.gitignore` line would.
//!
//! Matching is pure and deterministic, so a compiled set is safe to reuse as
//! a filter predicate across an entire traversal.
//!
//! # Example
//!
//! ```
//! use scriptoria::filter::PatternSet;
//!
//! let set = PatternSet::new(["*.py", "!excluded.py"]).unwrap();
//! assert!(set.matches("a.py"));
//! assert!(set.matches("sub/b.py"));
//! assert!(!set.matches("excluded.py"));
//! assert!(!set.matches("a.txt"));
//! ```

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use thiserror::Error;

/// Errors from pattern compilation.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A glob pattern could not be compiled.
    #[error("invalid glob pattern '{pattern}'")]
    InvalidGlob {
        /// The offending pattern
        pattern: String,
        /// The underlying compiler error
        #[source]
        source: ignore::Error,
    },
}

/// An ordered, compiled set of ignore-file-style glob patterns.
///
/// Patterns are evaluated in the order given. A non-negated pattern that
/// matches a path sets the result to "matched"; a negated pattern (leading
/// `!`) that matches sets it back to "not matched". The last applicable
/// rule wins. A pattern with a trailing `/` is directory-only and matches
/// every blob beneath that directory.
pub struct PatternSet {
    matcher: Gitignore,
    patterns: Vec<String>,
}

impl PatternSet {
    /// Compile an ordered list of patterns.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidGlob`] for a pattern the glob compiler
    /// rejects. The compiler is lenient the way git itself is: most
    /// malformed lines (an unclosed `[` bracket, say) are treated as
    /// literals or skipped rather than rejected, so compilation rarely
    /// fails in practice.
    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new("");
        let mut stored = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .map_err(|source| PatternError::InvalidGlob {
                    pattern: pattern.to_string(),
                    source,
                })?;
            stored.push(pattern.to_string());
        }

        let matcher = builder.build().map_err(|source| PatternError::InvalidGlob {
            pattern: stored.join(", "),
            source,
        })?;

        Ok(Self {
            matcher,
            patterns: stored,
        })
    }

    /// Compile a single pattern.
    pub fn single(pattern: &str) -> Result<Self, PatternError> {
        Self::new([pattern])
    }

    /// Check whether a slash-separated relative path matches the set.
    ///
    /// The path is treated as a file (blob) path; directory-only patterns
    /// match it through any of its parent directories.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher
            .matched_path_or_any_parents(Path::new(path), false)
            .is_ignore()
    }

    /// The patterns this set was built from, in evaluation order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl std::fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternSet")
            .field("patterns", &self.patterns)
            .finish()
    }
}
