//! Integration tests for the repository facade and blob walker.
//!
//! These tests use real git repositories created via tempfile to verify
//! that snapshots, filtered traversal, and the thin helpers work against
//! actual git state.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use scriptoria::repo::{RepoError, Repository};
use scriptoria::walk::{BlobFilter, WalkError};

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit containing
    /// `{a.py, sub/b.py, sub/c.txt}`.
    fn new() -> Self {
        let repo = Self::empty();

        repo.write_file("a.py", "\"\"\"module a\"\"\"\n");
        repo.write_file("sub/b.py", "\"\"\"module b\"\"\"\n");
        repo.write_file("sub/c.txt", "notes\n");
        run_git(repo.path(), &["add", "."]);
        run_git(repo.path(), &["commit", "-m", "Initial commit"]);

        repo
    }

    /// Create an initialized repository with no commits.
    fn empty() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_file(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn open(&self) -> Repository {
        Repository::open(self.path()).expect("failed to open test repo")
    }

    fn commit_all(&self, message: &str) {
        run_git(self.path(), &["add", "."]);
        run_git(self.path(), &["commit", "-m", message]);
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn collect_blobs_with_glob_filter() {
    // The fixture owns the TempDir; it must outlive the opened repository.
    let test_repo = TestRepo::new();
    let repo = test_repo.open();

    let filter = BlobFilter::pattern("*.py").unwrap();
    let blobs = repo.collect_blobs(&filter).unwrap();

    let paths: Vec<&str> = blobs.iter().map(|b| b.path()).collect();
    assert_eq!(paths, ["a.py", "sub/b.py"]);
}

#[test]
fn unfiltered_collect_visits_every_tracked_file() {
    let test_repo = TestRepo::new();
    let repo = test_repo.open();

    let blobs = repo.collect_blobs(&BlobFilter::All).unwrap();
    let paths: Vec<&str> = blobs.iter().map(|b| b.path()).collect();
    assert_eq!(paths, ["a.py", "sub/b.py", "sub/c.txt"]);
}

#[test]
fn negated_pattern_excludes_path() {
    let test_repo = TestRepo::new();
    let repo = test_repo.open();

    let filter = BlobFilter::patterns(["*.py", "!sub/b.py"]).unwrap();
    let blobs = repo.collect_blobs(&filter).unwrap();
    let paths: Vec<&str> = blobs.iter().map(|b| b.path()).collect();
    assert_eq!(paths, ["a.py"]);
}

#[test]
fn blob_content_matches_committed_state() {
    let test_repo = TestRepo::new();
    let repo = test_repo.open();

    // Change the working tree without committing; the snapshot must still
    // reflect HEAD.
    test_repo.write_file("a.py", "\"\"\"dirty edit\"\"\"\n");

    let blobs = repo
        .collect_blobs(&BlobFilter::pattern("a.py").unwrap())
        .unwrap();
    assert_eq!(blobs[0].text().unwrap(), "\"\"\"module a\"\"\"\n");
}

#[test]
fn visitor_error_aborts_and_surfaces() {
    let test_repo = TestRepo::new();
    let repo = test_repo.open();

    let mut seen = Vec::new();
    let result = repo.for_each_blob(&BlobFilter::All, |blob| {
        seen.push(blob.path().to_string());
        if blob.path() == "sub/b.py" {
            return Err("visitor gave up".into());
        }
        Ok(())
    });

    assert!(matches!(
        result,
        Err(RepoError::Walk(WalkError::Visitor { ref path, .. })) if path == "sub/b.py"
    ));
    assert_eq!(seen, ["a.py", "sub/b.py"]);
}

#[test]
fn binary_blob_is_walked_but_not_text() {
    let test_repo = TestRepo::new();
    std::fs::write(test_repo.path().join("logo.bin"), [0u8, 159, 146, 150]).unwrap();
    test_repo.commit_all("Add binary file");

    let repo = test_repo.open();
    let blobs = repo
        .collect_blobs(&BlobFilter::pattern("*.bin").unwrap())
        .unwrap();
    assert_eq!(blobs.len(), 1);
    assert!(matches!(
        blobs[0].text(),
        Err(WalkError::InvalidUtf8 { .. })
    ));
}

#[test]
fn empty_repository_has_no_tree() {
    let test_repo = TestRepo::empty();
    let repo = test_repo.open();
    assert!(matches!(repo.tree(), Err(RepoError::EmptyRepository)));
}

#[test]
fn tree_at_resolves_tags_and_revisions() {
    let test_repo = TestRepo::new();
    run_git(test_repo.path(), &["tag", "v0.1.0"]);

    test_repo.write_file("later.txt", "added later\n");
    test_repo.commit_all("Add later.txt");

    let repo = test_repo.open();

    let tagged = repo.tree_at("v0.1.0").unwrap();
    let head = repo.tree().unwrap();
    assert_eq!(tagged.blobs().len(), 1); // a.py only at root
    assert_eq!(head.blobs().len(), 2); // a.py + later.txt
}

#[test]
fn commit_helper_skips_clean_worktree() {
    let test_repo = TestRepo::new();
    let repo = test_repo.open();

    assert!(!repo.commit("nothing to do").unwrap());

    test_repo.write_file("a.py", "\"\"\"edited\"\"\"\n");
    assert!(repo.commit("refactor(all): edit a.py").unwrap());
    assert!(!repo.is_dirty().unwrap());

    let commits = repo.commits_since(None).unwrap();
    assert_eq!(commits[0].summary, "refactor(all): edit a.py");
}

#[test]
fn commits_since_excludes_older_history() {
    let test_repo = TestRepo::new();
    run_git(test_repo.path(), &["tag", "v0.1.0"]);

    test_repo.write_file("one.txt", "1\n");
    test_repo.commit_all("Add one");
    test_repo.write_file("two.txt", "2\n");
    test_repo.commit_all("Add two");

    let repo = test_repo.open();

    let all = repo.commits_since(None).unwrap();
    assert_eq!(all.len(), 3);

    let recent = repo.commits_since(Some("v0.1.0")).unwrap();
    let summaries: Vec<&str> = recent.iter().map(|c| c.summary.as_str()).collect();
    assert_eq!(summaries, ["Add two", "Add one"]);
}

#[test]
fn tags_are_ordered_most_recent_first() {
    let test_repo = TestRepo::new();
    run_git(test_repo.path(), &["tag", "v0.1.0"]);

    test_repo.write_file("next.txt", "next\n");
    run_git(test_repo.path(), &["add", "."]);
    // Commit times have one-second resolution; force a distinct timestamp.
    let output = Command::new("git")
        .args(["commit", "-m", "Second"])
        .env("GIT_COMMITTER_DATE", "2030-01-01T00:00:00")
        .env("GIT_AUTHOR_DATE", "2030-01-01T00:00:00")
        .current_dir(test_repo.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    run_git(test_repo.path(), &["tag", "v0.2.0"]);

    let repo = test_repo.open();
    let tags = repo.tags().unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["v0.2.0", "v0.1.0"]);
}

#[test]
fn rename_moves_file_and_updates_index() {
    let test_repo = TestRepo::new();
    let repo = test_repo.open();

    repo.rename("a.py", "renamed/a.py").unwrap();

    assert!(!test_repo.path().join("a.py").exists());
    assert!(test_repo.path().join("renamed/a.py").exists());

    run_git(test_repo.path(), &["commit", "-m", "Rename a.py"]);
    let blobs = tracked_paths(&repo);
    assert!(blobs.contains(&"renamed/a.py".to_string()));
    assert!(!blobs.contains(&"a.py".to_string()));
}

#[test]
fn rename_requires_tracked_path() {
    let test_repo = TestRepo::new();
    let repo = test_repo.open();
    assert!(matches!(
        repo.rename("ghost.py", "other.py"),
        Err(RepoError::PathNotTracked { .. })
    ));
}

#[test]
fn open_rejects_non_repository() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Repository::open(dir.path()),
        Err(RepoError::NotARepo { .. })
    ));
}

/// Collect tracked paths at HEAD; helper for the rename test.
fn tracked_paths(repo: &Repository) -> Vec<String> {
    repo.collect_blobs(&BlobFilter::All)
        .unwrap()
        .iter()
        .map(|b| b.path().to_string())
        .collect()
}
