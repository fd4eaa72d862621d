use crate::test_helpers::TestRepo;

/// One commit on main, one more on a feature branch, back on main.
fn diverged_repo() -> TestRepo {
    let test_repo = TestRepo::new();
    test_repo.write_file("a.txt", "hello\n");
    test_repo.commit_all("one");

    crate::branch::run_in(&test_repo.root, Some("feature")).unwrap();
    crate::checkout::run_in(&test_repo.root, "feature").unwrap();
    test_repo.write_file("b.txt", "x");
    test_repo.commit_all("two");
    crate::checkout::run_in(&test_repo.root, "main").unwrap();
    test_repo
}

#[test]
fn merge_fast_path_combines_branches() {
    let test_repo = diverged_repo();
    let main_tip = test_repo.tip();
    let repo = test_repo.open();
    let feature_tip = repo.branches.get_tip("feature");
    drop(repo);

    super::run_in(&test_repo.root, "feature").unwrap();

    assert_eq!(test_repo.read_file("a.txt"), "hello\n");
    assert_eq!(test_repo.read_file("b.txt"), "x");

    let repo = test_repo.open();
    let merge_id = repo.branches.current_tip();
    let commit = repo.store.get(&merge_id).expect("merge commit must exist");
    assert_eq!(commit.parent_ids, vec![main_tip, feature_tip]);
    assert_eq!(commit.message, "Merge branch 'feature'");
}

#[test]
fn merge_conflict_writes_markers() {
    let test_repo = TestRepo::new();
    test_repo.write_file("a.txt", "base\n");
    test_repo.commit_all("base");

    crate::branch::run_in(&test_repo.root, Some("b")).unwrap();
    test_repo.write_file("a.txt", "main\n");
    test_repo.commit_all("m");

    crate::checkout::run_in(&test_repo.root, "b").unwrap();
    test_repo.write_file("a.txt", "feat\n");
    test_repo.commit_all("f");

    crate::checkout::run_in(&test_repo.root, "main").unwrap();
    super::run_in(&test_repo.root, "b").unwrap();

    assert_eq!(
        test_repo.read_file("a.txt"),
        "<<<<<<< HEAD\nmain\n=======\nfeat\n>>>>>>> b\n"
    );
}

#[test]
fn merge_keeps_target_change_when_source_matches_base() {
    let test_repo = TestRepo::new();
    test_repo.write_file("a.txt", "v1\n");
    test_repo.commit_all("base");

    crate::branch::run_in(&test_repo.root, Some("feature")).unwrap();
    test_repo.write_file("a.txt", "v2\n");
    test_repo.commit_all("main change");

    crate::checkout::run_in(&test_repo.root, "feature").unwrap();
    test_repo.write_file("b.txt", "added\n");
    test_repo.commit_all("feature addition");

    crate::checkout::run_in(&test_repo.root, "main").unwrap();
    super::run_in(&test_repo.root, "feature").unwrap();

    assert_eq!(test_repo.read_file("a.txt"), "v2\n");
    assert_eq!(test_repo.read_file("b.txt"), "added\n");
}

#[test]
fn merge_snapshot_is_stored_raw() {
    let test_repo = diverged_repo();
    super::run_in(&test_repo.root, "feature").unwrap();

    let repo = test_repo.open();
    let merge_id = repo.branches.current_tip();
    let data_dir = test_repo
        .root
        .join(".vcs/commits")
        .join(&merge_id)
        .join("data");
    assert!(data_dir.join("a.txt").is_file());
    assert!(!data_dir.join("a.txt.huff").exists());
}

#[test]
fn merge_advances_only_the_current_branch() {
    let test_repo = diverged_repo();
    let repo = test_repo.open();
    let feature_tip = repo.branches.get_tip("feature");
    drop(repo);

    super::run_in(&test_repo.root, "feature").unwrap();

    let repo = test_repo.open();
    assert_eq!(repo.branches.get_tip("feature"), feature_tip);
    assert_ne!(repo.branches.current_tip(), feature_tip);
}

#[test]
fn merge_rejects_self_merge() {
    let test_repo = TestRepo::new();
    let result = super::run_in(&test_repo.root, "main");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("into itself"),
        "Expected self-merge error, got: {}",
        err
    );
}

#[test]
fn merge_rejects_unknown_branch() {
    let test_repo = TestRepo::new();
    let result = super::run_in(&test_repo.root, "ghost");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("does not exist"),
        "Expected unknown branch error, got: {}",
        err
    );
}

#[test]
fn merge_rejects_branch_without_commits() {
    let test_repo = TestRepo::new();
    test_repo.write_file("a.txt", "hello\n");
    test_repo.commit_all("one");

    let mut repo = test_repo.open();
    repo.branches.create("empty", "").unwrap();
    drop(repo);

    let result = super::run_in(&test_repo.root, "empty");
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("no commits"),
        "Expected no-commits error, got: {}",
        err
    );
}
