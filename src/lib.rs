//! Scriptoria - structured content transforms across a tracked git tree
//!
//! Scriptoria walks the committed tree of a git repository, selects tracked
//! files with gitignore-style filters, and rewrites each selected document
//! through a parse/transform/serialize pipeline. Callers supply the filter
//! and the transforms; the library guarantees that what gets written back is
//! the same document with only the requested mutations applied.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`filter`] - Gitignore-semantics pattern matching (pure, no I/O)
//! - [`walk`] - Tree snapshot types and the depth-first blob walker
//! - [`io`] - Polymorphic source/destination endpoints
//! - [`content`] - Line-based document model, parser, writer, transforms
//! - [`pipeline`] - Read-transform-write orchestration for one document
//! - [`repo`] - Single interface for all Git operations
//!
//! # Correctness Invariants
//!
//! Scriptoria maintains the following invariants:
//!
//! 1. Serializing a parsed document reproduces it byte for byte, up to a
//!    single normalized trailing newline
//! 2. Filters are evaluated in order with last-match-wins negation, exactly
//!    as ignore files are
//! 3. Traversal visits blobs of a tree level before descending, and never
//!    prunes a subtree based on a directory-level pattern match
//! 4. Every failure surfaces to the immediate caller; nothing is silently
//!    retried or recovered

pub mod content;
pub mod filter;
pub mod io;
pub mod pipeline;
pub mod repo;
pub mod walk;
