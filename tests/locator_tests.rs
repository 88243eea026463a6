// Workspace scanning tests
// Builds workspaces of real (temporary) repositories and scans them

mod common;

use git_atlas::AppError;
use git_atlas::git::locator::{list_repositories, setup};
use git_atlas::models::DETACHED_HEAD;

#[test]
fn test_lists_only_repositories_sorted_by_name() {
    let (_dir, root) = common::create_workspace();

    let repo_b = common::init_repo(&root, "repoB");
    common::add_commit(&repo_b, &[("b.txt", b"b")], "init b");
    let repo_a = common::init_repo(&root, "repoA");
    common::add_commit(&repo_a, &[("a.txt", b"a")], "init a");

    std::fs::create_dir(root.join("not-a-repo")).unwrap();
    std::fs::write(root.join("notes.txt"), "plain file").unwrap();
    common::init_repo(&root, ".hidden");

    let repos = list_repositories(&root).unwrap();
    let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["repoA", "repoB"]);

    let repo_a = &repos[0];
    assert_eq!(repo_a.current_branch, "main");
    assert!(!repo_a.is_detached);
    assert_eq!(repo_a.branch_count, 1);
    assert!(repo_a.last_commit_date.is_some());

    let expected = std::fs::canonicalize(root.join("repoA")).unwrap();
    assert_eq!(repo_a.path, expected.to_string_lossy());
}

#[test]
fn test_repository_without_commits_has_no_date() {
    let (_dir, root) = common::create_workspace();
    common::init_repo(&root, "fresh");

    let repos = list_repositories(&root).unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "fresh");
    assert_eq!(repos[0].current_branch, "main");
    assert_eq!(repos[0].branch_count, 0);
    assert_eq!(repos[0].last_commit_date, None);
}

#[test]
fn test_branch_count_counts_local_branches_only() {
    let (_dir, root) = common::create_workspace();
    let repo = common::init_repo(&root, "project");
    let first = common::add_commit(&repo, &[("a.txt", b"a")], "init");
    common::create_branch(&repo, "feature", first);
    common::create_branch(&repo, "hotfix", first);
    common::create_remote_branch(&repo, "origin", "main", first);

    let repos = list_repositories(&root).unwrap();
    assert_eq!(repos[0].branch_count, 3);
}

#[test]
fn test_detached_head_is_reported() {
    let (_dir, root) = common::create_workspace();
    let repo = common::init_repo(&root, "project");
    let first = common::add_commit(&repo, &[("a.txt", b"1")], "first");
    common::add_commit(&repo, &[("a.txt", b"2")], "second");
    common::detach_head(&repo, first);

    let repos = list_repositories(&root).unwrap();
    assert_eq!(repos[0].current_branch, DETACHED_HEAD);
    assert!(repos[0].is_detached);
    assert!(repos[0].last_commit_date.is_some());
}

#[test]
fn test_empty_workspace_lists_nothing() {
    let (_dir, root) = common::create_workspace();
    assert!(list_repositories(&root).unwrap().is_empty());
}

#[test]
fn test_missing_root_is_not_found() {
    let (_dir, root) = common::create_workspace();
    let err = list_repositories(&root.join("missing")).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_root_that_is_a_file_is_not_found() {
    let (_dir, root) = common::create_workspace();
    let file = root.join("file.txt");
    std::fs::write(&file, "x").unwrap();

    let err = list_repositories(&file).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_scan_does_not_descend_into_plain_directories() {
    let (_dir, root) = common::create_workspace();
    let group = root.join("group");
    std::fs::create_dir(&group).unwrap();
    let nested = common::init_repo(&group, "nested");
    common::add_commit(&nested, &[("a.txt", b"a")], "init");

    assert!(list_repositories(&root).unwrap().is_empty());
}

#[test]
fn test_setup_creates_missing_directory() {
    let (_dir, root) = common::create_workspace();
    let target = root.join("workspace").join("inner");

    let response = setup(&target).unwrap();
    assert!(response.created);
    assert!(target.is_dir());

    let again = setup(&target).unwrap();
    assert!(!again.created);
    assert_eq!(again.path, response.path);
}

#[test]
fn test_setup_rejects_existing_file() {
    let (_dir, root) = common::create_workspace();
    let file = root.join("taken");
    std::fs::write(&file, "x").unwrap();

    let err = setup(&file).unwrap_err();
    assert!(matches!(err, AppError::InvalidPath(_)));
}

#[test]
fn test_broken_repositories_are_skipped() {
    let (_dir, root) = common::create_workspace();
    let good = common::init_repo(&root, "good");
    common::add_commit(&good, &[("a.txt", b"a")], "init");

    // `.git` as an empty file is not a valid gitlink.
    let empty_gitfile = root.join("empty-gitfile");
    std::fs::create_dir(&empty_gitfile).unwrap();
    std::fs::write(empty_gitfile.join(".git"), "").unwrap();

    let garbage_head = common::init_repo(&root, "garbage-head");
    common::add_commit(&garbage_head, &[("b.txt", b"b")], "init");
    let head_file = root.join("garbage-head").join(".git").join("HEAD");
    std::fs::write(head_file, "not a ref\n").unwrap();

    let repos = list_repositories(&root).unwrap();
    let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["good"]);
}
