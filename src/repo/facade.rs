//! repo::facade
//!
//! Repository facade implementation using git2.
//!
//! Wraps a discovered repository and exposes exactly what the rest of the
//! crate needs: a materialized snapshot of a committed tree, filtered blob
//! visitation, and the thin commit/push/tag helpers a caller composes into
//! its own publish-and-commit workflow.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::walk::{self, Blob, BlobFilter, TreeNode, VisitorError, WalkError};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Repository has no commits yet, so there is no tree to walk.
    #[error("repository has no commits")]
    EmptyRepository,

    /// A revision could not be resolved.
    #[error("revision not found: {rev}")]
    RevisionNotFound {
        /// The revision that was requested
        rev: String,
    },

    /// The named remote does not exist.
    #[error("remote not found: {name}")]
    NoRemote {
        /// The remote that was requested
        name: String,
    },

    /// A path is not in the index.
    #[error("path not tracked: {path}")]
    PathNotTracked {
        /// The untracked path
        path: String,
    },

    /// Filesystem error during a working-tree operation.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// A traversal failed (including visitor aborts).
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl RepoError {
    /// Create a RepoError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => RepoError::RevisionNotFound {
                rev: context.to_string(),
            },
            git2::ErrorCode::Locked => RepoError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => RepoError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for RepoError {
    fn from(err: git2::Error) -> Self {
        RepoError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// Information about a commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// The commit id (full hex)
    pub oid: String,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp
    pub author_time: DateTime<Utc>,
}

/// Information about a tag.
#[derive(Debug, Clone)]
pub struct TagInfo {
    /// The tag name (without `refs/tags/`)
    pub name: String,
    /// The commit id the tag resolves to
    pub target: String,
    /// Commit time of the tagged commit
    pub tagged_at: DateTime<Utc>,
}

/// The repository facade.
///
/// Obtains a committed tree and hands the walker filtered blobs; everything
/// else it offers is a thin helper over the same repository handle. A
/// successful publish produces text suitable to hand to
/// [`commit`](Self::commit) as a stage-and-commit step.
pub struct Repository {
    repo: git2::Repository,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Repository {
    // =========================================================================
    // Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotARepo`] if no repository is found
    /// - [`RepoError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, RepoError> {
        let repo = git2::Repository::discover(path).map_err(|_| RepoError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(RepoError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Path to the working directory.
    pub fn work_dir(&self) -> Result<&Path, RepoError> {
        self.repo.workdir().ok_or(RepoError::BareRepo)
    }

    // =========================================================================
    // Tree Snapshots
    // =========================================================================

    /// Materialize the HEAD tree into a read-only snapshot.
    ///
    /// # Errors
    ///
    /// - [`RepoError::EmptyRepository`] if the repository has no commits
    pub fn tree(&self) -> Result<TreeNode, RepoError> {
        let head = self.repo.head().map_err(|e| match e.code() {
            git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound => {
                RepoError::EmptyRepository
            }
            _ => RepoError::from_git2(e, "HEAD"),
        })?;
        let tree = head
            .peel_to_tree()
            .map_err(|e| RepoError::from_git2(e, "HEAD"))?;
        self.snapshot(&tree, "")
    }

    /// Materialize the tree of an arbitrary revision (tag name, branch,
    /// commit hash, or any rev-parse expression).
    pub fn tree_at(&self, rev: &str) -> Result<TreeNode, RepoError> {
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|e| RepoError::from_git2(e, rev))?;
        let commit = object
            .peel(git2::ObjectType::Commit)
            .map_err(|e| RepoError::from_git2(e, rev))?
            .into_commit()
            .map_err(|_| RepoError::RevisionNotFound {
                rev: rev.to_string(),
            })?;
        let tree = commit.tree().map_err(|e| RepoError::from_git2(e, rev))?;
        self.snapshot(&tree, "")
    }

    /// Recursively convert a git2 tree into a [`TreeNode`], preserving entry
    /// order and building slash-separated relative paths.
    fn snapshot(&self, tree: &git2::Tree<'_>, prefix: &str) -> Result<TreeNode, RepoError> {
        let mut node = TreeNode::new();

        for entry in tree.iter() {
            let name = entry.name().ok_or_else(|| RepoError::Internal {
                message: "tree entry name is not valid UTF-8".to_string(),
            })?;
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            };

            match entry.kind() {
                Some(git2::ObjectType::Blob) => {
                    let blob = self
                        .repo
                        .find_blob(entry.id())
                        .map_err(|e| RepoError::from_git2(e, &path))?;
                    node.push_blob(Blob::new(path, blob.content()));
                }
                Some(git2::ObjectType::Tree) => {
                    let subtree = self
                        .repo
                        .find_tree(entry.id())
                        .map_err(|e| RepoError::from_git2(e, &path))?;
                    node.push_child(self.snapshot(&subtree, &path)?);
                }
                // Submodule commits and anything exotic are not tracked files.
                _ => {}
            }
        }

        Ok(node)
    }

    // =========================================================================
    // Filtered Visitation
    // =========================================================================

    /// Collect every tracked blob matching the filter, in traversal order
    /// (blobs of a tree level before its subtrees).
    ///
    /// # Example
    ///
    /// ```ignore
    /// let blobs = repo.collect_blobs(&BlobFilter::pattern("*.py")?)?;
    /// for blob in &blobs {
    ///     println!("{}", blob.path());
    /// }
    /// ```
    pub fn collect_blobs(&self, filter: &BlobFilter) -> Result<Vec<Blob>, RepoError> {
        let mut blobs = Vec::new();
        self.for_each_blob(filter, |blob| {
            blobs.push(blob.clone());
            Ok(())
        })?;
        Ok(blobs)
    }

    /// Apply a visitor to every tracked blob matching the filter.
    ///
    /// A visitor error aborts the remaining traversal and surfaces as
    /// [`RepoError::Walk`].
    pub fn for_each_blob<F>(&self, filter: &BlobFilter, visitor: F) -> Result<(), RepoError>
    where
        F: FnMut(&Blob) -> Result<(), VisitorError>,
    {
        let tree = self.tree()?;
        walk::visit(&tree, filter, visitor)?;
        Ok(())
    }

    // =========================================================================
    // Thin Helpers
    // =========================================================================

    /// Whether the working tree has any changes (staged, unstaged, or
    /// untracked).
    pub fn is_dirty(&self) -> Result<bool, RepoError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true).include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| RepoError::from_git2(e, "status"))?;

        Ok(!statuses.is_empty())
    }

    /// Stage everything and commit, but only if the working tree is dirty.
    ///
    /// Returns `true` if a commit was created.
    pub fn commit(&self, message: &str) -> Result<bool, RepoError> {
        if !self.is_dirty()? {
            debug!("working tree clean, skipping commit");
            return Ok(false);
        }

        let mut index = self.repo.index()?;
        index.add_all(["*"], git2::IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree_oid = index.write_tree()?;
        let tree = self.repo.find_tree(tree_oid)?;
        let signature = self.repo.signature()?;

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        debug!(message, "created commit");
        Ok(true)
    }

    /// Push the current branch to `origin`, optionally with all tags.
    pub fn push(&self, push_tags: bool) -> Result<(), RepoError> {
        let mut remote = self
            .repo
            .find_remote("origin")
            .map_err(|_| RepoError::NoRemote {
                name: "origin".to_string(),
            })?;

        let head = self.repo.head()?;
        let branch_ref = head
            .name()
            .ok_or_else(|| RepoError::Internal {
                message: "HEAD ref name is not valid UTF-8".to_string(),
            })?
            .to_string();

        let mut refspecs = vec![format!("{branch_ref}:{branch_ref}")];
        if push_tags {
            for name in self.repo.tag_names(None)?.iter().flatten() {
                refspecs.push(format!("refs/tags/{name}:refs/tags/{name}"));
            }
        }

        remote
            .push(&refspecs, None)
            .map_err(|e| RepoError::from_git2(e, &branch_ref))
    }

    /// List tags ordered from most recent to oldest by the tagged commit's
    /// time.
    pub fn tags(&self) -> Result<Vec<TagInfo>, RepoError> {
        let mut tags = Vec::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let refname = format!("refs/tags/{name}");
            let object = self
                .repo
                .revparse_single(&refname)
                .map_err(|e| RepoError::from_git2(e, &refname))?;
            let commit = object
                .peel(git2::ObjectType::Commit)
                .map_err(|e| RepoError::from_git2(e, &refname))?
                .into_commit()
                .map_err(|_| RepoError::Internal {
                    message: format!("tag does not point at a commit: {name}"),
                })?;

            tags.push(TagInfo {
                name: name.to_string(),
                target: commit.id().to_string(),
                tagged_at: timestamp(commit.time()),
            });
        }

        tags.sort_by(|a, b| b.tagged_at.cmp(&a.tagged_at));
        Ok(tags)
    }

    /// List commits reachable from HEAD, newest first. When `since` is
    /// given, commits reachable from that revision are excluded
    /// (`since..HEAD`).
    pub fn commits_since(&self, since: Option<&str>) -> Result<Vec<CommitInfo>, RepoError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head().map_err(|e| match e.code() {
            git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound => {
                RepoError::EmptyRepository
            }
            _ => RepoError::from_git2(e, "HEAD"),
        })?;

        if let Some(rev) = since {
            let oid = self
                .repo
                .revparse_single(rev)
                .map_err(|e| RepoError::from_git2(e, rev))?
                .id();
            revwalk.hide(oid).map_err(|e| RepoError::from_git2(e, rev))?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| RepoError::from_git2(e, &oid.to_string()))?;

            commits.push(CommitInfo {
                oid: oid.to_string(),
                summary: commit.summary().unwrap_or("").to_string(),
                message: commit.message().unwrap_or("").to_string(),
                author_name: commit.author().name().unwrap_or("").to_string(),
                author_email: commit.author().email().unwrap_or("").to_string(),
                author_time: timestamp(commit.author().when()),
            });
        }

        Ok(commits)
    }

    /// Rename a tracked file in the working tree and the index
    /// (the `git mv` equivalent). The caller commits separately.
    ///
    /// # Errors
    ///
    /// - [`RepoError::PathNotTracked`] if `old` is not in the index
    pub fn rename(&self, old: &str, new: &str) -> Result<(), RepoError> {
        let work_dir = self.work_dir()?;

        let mut index = self.repo.index()?;
        if index.get_path(Path::new(old), 0).is_none() {
            return Err(RepoError::PathNotTracked {
                path: old.to_string(),
            });
        }

        let new_abs = work_dir.join(new);
        if let Some(parent) = new_abs.parent() {
            fs::create_dir_all(parent).map_err(|e| RepoError::AccessError {
                message: format!("cannot create {}: {e}", parent.display()),
            })?;
        }
        fs::rename(work_dir.join(old), &new_abs).map_err(|e| RepoError::AccessError {
            message: format!("cannot rename {old} to {new}: {e}"),
        })?;

        index.remove_path(Path::new(old))?;
        index.add_path(Path::new(new))?;
        index.write()?;

        debug!(old, new, "renamed tracked file");
        Ok(())
    }
}

/// Convert a git2 time to a UTC timestamp.
fn timestamp(time: git2::Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.seconds(), 0).unwrap_or(DateTime::UNIX_EPOCH)
}
