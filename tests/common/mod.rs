// Shared test fixtures for integration tests
// Functions here are used across different test files
#![allow(dead_code)]

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create an empty workspace directory
pub fn create_workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    (dir, root)
}

/// Initialize a repository named `name` under `root`, HEAD on `main`
pub fn init_repo(root: &Path, name: &str) -> Repository {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(root.join(name), &opts).unwrap();

    // Configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    repo
}

fn signature() -> Signature<'static> {
    Signature::now("Test User", "test@example.com").unwrap()
}

fn head_parent(repo: &Repository) -> Option<git2::Commit<'_>> {
    repo.head().ok().and_then(|h| h.peel_to_commit().ok())
}

fn commit_index(repo: &Repository, message: &str, extra_parent: Option<Oid>) -> Oid {
    let sig = signature();
    let mut index = repo.index().unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let mut parents = Vec::new();
    if let Some(parent) = head_parent(repo) {
        parents.push(parent);
    }
    if let Some(oid) = extra_parent {
        parents.push(repo.find_commit(oid).unwrap());
    }
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

fn write_files(repo: &Repository, files: &[(&str, &[u8])]) {
    let mut index = repo.index().unwrap();
    for (path, content) in files {
        // Write file to working directory
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();

        // Add to index
        index.add_path(Path::new(path)).unwrap();
    }
    index.write().unwrap();
}

/// Add files to the repository and create a commit on HEAD
pub fn add_commit(repo: &Repository, files: &[(&str, &[u8])], message: &str) -> Oid {
    write_files(repo, files);
    commit_index(repo, message, None)
}

/// Remove a file from the repository and create a commit
pub fn remove_file_commit(repo: &Repository, path: &str, message: &str) -> Oid {
    let full_path = repo.workdir().unwrap().join(path);
    if full_path.exists() {
        std::fs::remove_file(&full_path).unwrap();
    }

    let mut index = repo.index().unwrap();
    index.remove_path(Path::new(path)).unwrap();
    index.write().unwrap();

    commit_index(repo, message, None)
}

/// Move a file to a new path without changing its content
pub fn rename_file_commit(repo: &Repository, from: &str, to: &str, message: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    let content = std::fs::read(workdir.join(from)).unwrap();
    std::fs::remove_file(workdir.join(from)).unwrap();

    let mut index = repo.index().unwrap();
    index.remove_path(Path::new(from)).unwrap();
    index.write().unwrap();

    add_commit(repo, &[(to, &content)], message)
}

/// Commit `files` on HEAD with `other` as second parent
pub fn merge_commit(repo: &Repository, other: Oid, files: &[(&str, &[u8])], message: &str) -> Oid {
    write_files(repo, files);
    commit_index(repo, message, Some(other))
}

/// Create a local branch pointing at `target`
pub fn create_branch(repo: &Repository, name: &str, target: Oid) {
    let commit = repo.find_commit(target).unwrap();
    repo.branch(name, &commit, false).unwrap();
}

/// Point HEAD at a local branch and check it out
pub fn checkout_branch(repo: &Repository, name: &str) {
    repo.set_head(&format!("refs/heads/{}", name)).unwrap();
    repo.checkout_head(Some(git2::build::CheckoutBuilder::new().force()))
        .unwrap();
}

/// Detach HEAD at `target`
pub fn detach_head(repo: &Repository, target: Oid) {
    repo.set_head_detached(target).unwrap();
}

/// Create a remote-tracking ref `refs/remotes/<remote>/<name>`
pub fn create_remote_branch(repo: &Repository, remote: &str, name: &str, target: Oid) {
    repo.reference(
        &format!("refs/remotes/{}/{}", remote, name),
        target,
        true,
        "test remote branch",
    )
    .unwrap();
}

pub fn lightweight_tag(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

pub fn annotated_tag(repo: &Repository, name: &str, target: Oid) {
    let object = repo.find_object(target, None).unwrap();
    repo.tag(name, &object, &signature(), "release", false)
        .unwrap();
}

/// Create `count` commits on HEAD touching `log.txt`; returns ids oldest first
pub fn linear_history(repo: &Repository, count: usize) -> Vec<Oid> {
    (1..=count)
        .map(|i| {
            let content = format!("entry {}\n", i);
            add_commit(repo, &[("log.txt", content.as_bytes())], &format!("Commit {}", i))
        })
        .collect()
}

/// Text with `n` numbered lines
pub fn numbered_lines(n: usize) -> String {
    (1..=n).map(|i| format!("line {}\n", i)).collect()
}
