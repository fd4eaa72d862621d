use crate::test_helpers::TestRepo;

#[test]
fn branch_creates_at_current_tip() {
    let test_repo = TestRepo::new();
    test_repo.write_file("a.txt", "hello\n");
    let tip = test_repo.commit_all("one");

    super::run_in(&test_repo.root, Some("feature")).unwrap();

    let repo = test_repo.open();
    assert!(repo.branches.exists("feature"));
    assert_eq!(repo.branches.get_tip("feature"), tip);
    assert_eq!(repo.branches.current(), "main", "creating must not switch");
}

#[test]
fn branch_on_fresh_repository_has_empty_tip() {
    let test_repo = TestRepo::new();
    super::run_in(&test_repo.root, Some("feature")).unwrap();

    let repo = test_repo.open();
    assert_eq!(repo.branches.get_tip("feature"), "");
}

#[test]
fn branch_duplicate_name_fails() {
    let test_repo = TestRepo::new();
    let result = super::run_in(&test_repo.root, Some("main"));
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("already exists"),
        "Expected 'already exists' error, got: {}",
        err
    );
}

#[test]
fn branch_empty_name_fails() {
    let test_repo = TestRepo::new();
    let result = super::run_in(&test_repo.root, Some("   "));
    assert!(result.is_err());
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("empty"),
        "Expected empty name error, got: {}",
        err
    );
}

#[test]
fn branch_listing_requires_initialized_repository() {
    let test_repo = TestRepo::new_empty();
    let result = super::run_in(&test_repo.root, None);
    assert!(result.is_err());
}
