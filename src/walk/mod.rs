//! walk
//!
//! Tree snapshot types and the depth-first blob walker.
//!
//! A traversal operates on a read-only [`TreeNode`] snapshot: ordered blobs
//! plus ordered child trees, the shape any tree provider (in practice the
//! [`repo`](crate::repo) module) hands over. The walker itself mutates
//! nothing and produces no value of its own; callers accumulate results
//! through their visitor.
//!
//! # Traversal order
//!
//! Depth-first: all blobs of the current level are visited before any child
//! tree is entered. Every child tree is descended unconditionally - filtering
//! applies at blob granularity only. A pattern may match files inside a
//! directory without matching the directory path itself, so subtrees are
//! never pruned.
//!
//! # Failure
//!
//! An error returned by a visitor propagates immediately as
//! [`WalkError::Visitor`] and aborts the remaining traversal. Callers that
//! need per-file resilience must catch inside their own visitor.
//!
//! Recursion is plain call-stack recursion; depth equals tree depth.

use tracing::trace;

use crate::filter::{PatternError, PatternSet};

mod error;

pub use error::{VisitorError, WalkError};

/// An immutable snapshot of one tracked file.
///
/// Holds the slash-separated path relative to the tree root and the raw
/// content bytes at snapshot time. Blobs are never mutated by a walk;
/// rewriting a file happens by publishing a new version through the I/O
/// boundary, outside the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    path: String,
    content: Vec<u8>,
}

impl Blob {
    /// Create a blob from a relative path and its content bytes.
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Slash-separated path relative to the tree root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Raw content bytes.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content decoded as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::InvalidUtf8`] for binary blobs.
    pub fn text(&self) -> Result<&str, WalkError> {
        std::str::from_utf8(&self.content).map_err(|_| WalkError::InvalidUtf8 {
            path: self.path.clone(),
        })
    }
}

/// A node in the tracked-file hierarchy.
///
/// Ordered child blobs and ordered child trees, read-only for the duration
/// of a walk. Tests build these directly; production snapshots come from
/// [`Repository::tree`](crate::repo::Repository::tree).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    blobs: Vec<Blob>,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blob at this level.
    pub fn push_blob(&mut self, blob: Blob) {
        self.blobs.push(blob);
    }

    /// Append a child tree.
    pub fn push_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    /// Blobs at this level, in order.
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Child trees, in order.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }
}

/// The filter surface accepted by [`visit`] and
/// [`Repository::collect_blobs`](crate::repo::Repository::collect_blobs).
///
/// One of: no filter, a compiled glob [`PatternSet`], or an arbitrary
/// predicate over blobs.
pub enum BlobFilter {
    /// Visit every blob.
    All,
    /// Visit blobs whose path matches the pattern set.
    Patterns(PatternSet),
    /// Visit blobs the predicate accepts.
    Predicate(Box<dyn Fn(&Blob) -> bool>),
}

impl BlobFilter {
    /// Build a filter from glob patterns in ignore-file syntax.
    pub fn patterns<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::Patterns(PatternSet::new(patterns)?))
    }

    /// Build a filter from a single glob pattern.
    pub fn pattern(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self::Patterns(PatternSet::single(pattern)?))
    }

    /// Build a filter from a predicate.
    pub fn predicate(f: impl Fn(&Blob) -> bool + 'static) -> Self {
        Self::Predicate(Box::new(f))
    }

    /// Whether a blob passes the filter.
    pub fn accepts(&self, blob: &Blob) -> bool {
        match self {
            BlobFilter::All => true,
            BlobFilter::Patterns(set) => set.matches(blob.path()),
            BlobFilter::Predicate(f) => f(blob),
        }
    }
}

impl From<PatternSet> for BlobFilter {
    fn from(set: PatternSet) -> Self {
        BlobFilter::Patterns(set)
    }
}

impl std::fmt::Debug for BlobFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlobFilter::All => f.write_str("BlobFilter::All"),
            BlobFilter::Patterns(set) => f.debug_tuple("BlobFilter::Patterns").field(set).finish(),
            BlobFilter::Predicate(_) => f.write_str("BlobFilter::Predicate(..)"),
        }
    }
}

/// An auxiliary argument for [`visit_with`], resolved per blob.
///
/// `Fixed` values are cloned through to every visitor invocation unchanged.
/// `PerBlob` values are computed by invoking the closure once per matching
/// blob, with that blob as its sole argument. This lets a single traversal
/// hand each visitor call a blob-specialized value (say, a parsed docstring)
/// without the caller writing its own loop.
pub enum BlobArg<T> {
    /// Passed through unchanged to every invocation.
    Fixed(T),
    /// Invoked once per matching blob.
    PerBlob(Box<dyn Fn(&Blob) -> T>),
}

impl<T: Clone> BlobArg<T> {
    /// Build a per-blob computed argument.
    pub fn per_blob(f: impl Fn(&Blob) -> T + 'static) -> Self {
        Self::PerBlob(Box::new(f))
    }

    /// Resolve the argument for one blob.
    pub fn resolve(&self, blob: &Blob) -> T {
        match self {
            BlobArg::Fixed(value) => value.clone(),
            BlobArg::PerBlob(f) => f(blob),
        }
    }
}

/// Visit every matching blob in the tree, depth-first.
///
/// Blobs of the current level are visited before any child tree is entered;
/// child trees are always descended, filtered or not. A visitor error aborts
/// the remaining traversal.
///
/// # Example
///
/// ```
/// use scriptoria::walk::{visit, Blob, BlobFilter, TreeNode};
///
/// let mut root = TreeNode::new();
/// root.push_blob(Blob::new("a.py", "pass\n"));
///
/// let mut seen = Vec::new();
/// visit(&root, &BlobFilter::All, |blob| {
///     seen.push(blob.path().to_string());
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(seen, ["a.py"]);
/// ```
pub fn visit<F>(tree: &TreeNode, filter: &BlobFilter, mut visitor: F) -> Result<(), WalkError>
where
    F: FnMut(&Blob) -> Result<(), VisitorError>,
{
    visit_with(tree, filter, &BlobArg::Fixed(()), |blob, ()| visitor(blob))
}

/// Visit every matching blob, resolving an auxiliary argument per blob.
///
/// See [`BlobArg`] for the resolution rule. The visitor receives the blob
/// and the resolved value.
pub fn visit_with<T, F>(
    tree: &TreeNode,
    filter: &BlobFilter,
    arg: &BlobArg<T>,
    mut visitor: F,
) -> Result<(), WalkError>
where
    T: Clone,
    F: FnMut(&Blob, T) -> Result<(), VisitorError>,
{
    visit_inner(tree, filter, arg, &mut visitor)
}

fn visit_inner<T, F>(
    tree: &TreeNode,
    filter: &BlobFilter,
    arg: &BlobArg<T>,
    visitor: &mut F,
) -> Result<(), WalkError>
where
    T: Clone,
    F: FnMut(&Blob, T) -> Result<(), VisitorError>,
{
    for blob in &tree.blobs {
        if filter.accepts(blob) {
            trace!(path = blob.path(), "visiting blob");
            let value = arg.resolve(blob);
            visitor(blob, value).map_err(|source| WalkError::Visitor {
                path: blob.path().to_string(),
                source,
            })?;
        }
    }

    for child in &tree.children {
        visit_inner(child, filter, arg, visitor)?;
    }

    Ok(())
}
