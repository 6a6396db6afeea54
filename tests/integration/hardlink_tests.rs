//! Hard link safety and link recreation.

#![cfg(unix)]

use super::common::{remaining, trim, write_file};
use std::fs;
use tempfile::tempdir;
use twintrim::events::Event;
use twintrim::options::Options;
use twintrim::scanner::hardlink::same_file;

#[test]
fn test_linked_pair_untouched_without_remove_links() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "foo.txt", "foo\n");
    fs::hard_link(&original, dir.path().join("foo (1).txt")).unwrap();

    let (summary, sink) = trim(dir.path(), &Options::default());

    assert_eq!(remaining(dir.path()), vec!["foo (1).txt", "foo.txt"]);
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.skipped_links, 1);
    assert_eq!(
        sink.paths_where(|e| matches!(e, Event::HardlinkSkipped { .. })),
        vec![dir.path().join("foo (1).txt")]
    );
}

#[test]
fn test_linked_pair_loses_one_name_with_remove_links() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "foo.txt", "foo\n");
    fs::hard_link(&original, dir.path().join("foo (1).txt")).unwrap();
    let options = Options {
        remove_links: true,
        ..Options::default()
    };

    let (summary, _) = trim(dir.path(), &options);

    assert_eq!(summary.removed, 1);
    assert_eq!(remaining(dir.path()), vec!["foo.txt"]);
    assert_eq!(fs::read_to_string(&original).unwrap(), "foo\n");
}

#[test]
fn test_only_linked_member_is_skipped() {
    let dir = tempdir().unwrap();
    let original = write_file(dir.path(), "foo.txt", "foo\n");
    fs::hard_link(&original, dir.path().join("foo (1).txt")).unwrap();
    write_file(dir.path(), "foo (2).txt", "foo\n");

    let (summary, _) = trim(dir.path(), &Options::default());

    assert_eq!(summary.skipped_links, 1);
    assert_eq!(summary.removed, 1);
    assert_eq!(remaining(dir.path()), vec!["foo (1).txt", "foo.txt"]);
}

#[test]
fn test_make_links_recreates_discards() {
    let dir = tempdir().unwrap();
    let kept = write_file(dir.path(), "foo.txt", "foo\n");
    let copy1 = write_file(dir.path(), "foo (1).txt", "foo\n");
    let copy2 = write_file(dir.path(), "foo (2).txt", "foo\n");
    let options = Options {
        make_links: true,
        ..Options::default()
    };

    let (summary, sink) = trim(dir.path(), &options);

    assert_eq!(summary.removed, 2);
    assert_eq!(summary.links_created, 2);
    for copy in [&copy1, &copy2] {
        assert!(same_file(&kept, copy).unwrap());
        assert_eq!(fs::read_to_string(copy).unwrap(), "foo\n");
    }
    assert_eq!(
        sink.events()
            .iter()
            .filter(|e| matches!(e, Event::LinkCreated { .. }))
            .count(),
        2
    );
}

#[test]
fn test_make_links_rerun_skips_created_links() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "foo.txt", "foo\n");
    write_file(dir.path(), "foo (1).txt", "foo\n");
    let options = Options {
        make_links: true,
        ..Options::default()
    };

    trim(dir.path(), &options);
    let (second, _) = trim(dir.path(), &options);

    assert_eq!(second.removed, 0);
    assert_eq!(second.skipped_links, 1);
    assert!(!second.has_errors());
    assert_eq!(remaining(dir.path()), vec!["foo (1).txt", "foo.txt"]);
}

#[test]
fn test_relink_rerun_with_remove_links_is_a_no_op() {
    let dir = tempdir().unwrap();
    let kept = write_file(dir.path(), "foo.txt", "foo\n");
    let copy = write_file(dir.path(), "foo (1).txt", "foo\n");
    let options = Options {
        make_links: true,
        remove_links: true,
        ..Options::default()
    };

    let (first, _) = trim(dir.path(), &options);
    assert_eq!(first.removed, 1);
    assert_eq!(first.links_created, 1);

    for _ in 0..2 {
        let (rerun, sink) = trim(dir.path(), &options);
        assert_eq!(rerun.removed, 0);
        assert_eq!(rerun.links_created, 0);
        assert_eq!(rerun.skipped_links, 1);
        assert!(sink
            .events()
            .iter()
            .all(|e| !matches!(e, Event::Deleted { .. } | Event::LinkCreated { .. })));
    }
    assert!(same_file(&kept, &copy).unwrap());
}
