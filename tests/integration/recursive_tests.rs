use super::common::{remaining, trim, write_file};
use std::fs;
use tempfile::tempdir;
use twintrim::options::Options;

#[test]
fn test_non_recursive_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write_file(&sub, "foo.txt", "foo\n");
    write_file(&sub, "foo (1).txt", "foo\n");

    let (summary, _) = trim(dir.path(), &Options::default());

    assert_eq!(summary.files_scanned, 0);
    assert_eq!(remaining(&sub).len(), 2);
}

#[test]
fn test_recursive_trims_each_directory() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    let deeper = sub.join("deeper");
    fs::create_dir_all(&deeper).unwrap();
    for d in [dir.path(), sub.as_path(), deeper.as_path()] {
        write_file(d, "foo.txt", "foo\n");
        write_file(d, "foo (1).txt", "foo\n");
    }
    let options = Options {
        recursive: true,
        ..Options::default()
    };

    let (summary, _) = trim(dir.path(), &options);

    assert_eq!(summary.files_scanned, 6);
    assert_eq!(summary.duplicate_groups, 3);
    assert_eq!(summary.removed, 3);
    for d in [dir.path(), sub.as_path(), deeper.as_path()] {
        assert_eq!(remaining(d), vec!["foo.txt"]);
    }
}

#[test]
fn test_recursive_never_merges_across_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    write_file(dir.path(), "foo.txt", "foo\n");
    write_file(&sub, "foo (1).txt", "foo\n");
    let options = Options {
        recursive: true,
        skip_regex: true,
        ..Options::default()
    };

    let (summary, _) = trim(dir.path(), &options);

    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(remaining(dir.path()), vec!["foo.txt"]);
    assert_eq!(remaining(&sub), vec!["foo (1).txt"]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_candidates() {
    let dir = tempdir().unwrap();
    let target = write_file(dir.path(), "foo.txt", "foo\n");
    std::os::unix::fs::symlink(&target, dir.path().join("foo (1).txt")).unwrap();

    let (summary, _) = trim(dir.path(), &Options::default());

    assert_eq!(summary.files_scanned, 1);
    assert!(fs::symlink_metadata(dir.path().join("foo (1).txt")).is_ok());
}
