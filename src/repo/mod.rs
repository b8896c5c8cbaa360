//! repo
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. Repository reads and the thin
//! commit/push helpers flow through [`Repository`]; no other module imports
//! `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Materializing a committed tree into a [`TreeNode`](crate::walk::TreeNode)
//!   snapshot
//! - Filtered blob collection and visitation (delegating to [`crate::walk`])
//! - Thin helpers: commit-if-dirty, push, tag listing, commit listing,
//!   tracked-file rename
//!
//! # Invariants
//!
//! - The snapshot handed to the walker is read-only for the duration of a
//!   walk; mutating the working tree concurrently is undefined behavior of
//!   the caller, not something this module guards against
//! - All operations return strong types; git2 errors are normalized into
//!   [`RepoError`] categories
//!
//! # Example
//!
//! ```ignore
//! use scriptoria::repo::Repository;
//! use scriptoria::walk::BlobFilter;
//!
//! let repo = Repository::open(std::path::Path::new("."))?;
//! let sources = repo.collect_blobs(&BlobFilter::pattern("*.py")?)?;
//! ```

mod facade;

pub use facade::{CommitInfo, RepoError, Repository, TagInfo};
