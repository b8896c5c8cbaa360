//! walk::error
//!
//! Walker error types.

use thiserror::Error;

/// Boxed error returned by a visitor closure.
pub type VisitorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from a tree walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// A visitor failed while processing a blob.
    ///
    /// The traversal aborts at this point; blobs and subtrees not yet
    /// visited are skipped.
    #[error("visitor failed at {path}")]
    Visitor {
        /// Path of the blob being visited when the failure occurred
        path: String,
        /// The visitor's own error
        #[source]
        source: VisitorError,
    },

    /// Blob content is not valid UTF-8.
    #[error("blob is not valid UTF-8: {path}")]
    InvalidUtf8 {
        /// Path of the binary blob
        path: String,
    },
}
