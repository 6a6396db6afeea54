use super::common::{trim, write_file};
use std::collections::BTreeSet;
use tempfile::tempdir;
use twintrim::actions::{RemovalError, Remover};
use twintrim::clumping::{ClassificationError, ClumpKey, Clumper, Clumps, HashClumper};
use twintrim::events::{Event, MemorySink};
use twintrim::options::Options;
use twintrim::scanner::FileRecord;
use twintrim::sifting::Selection;

#[test]
fn test_missing_files_are_isolated_at_checksum_stage() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", "foo\n");
    write_file(dir.path(), "b.txt", "foo\n");
    let clumps: Clumps = ["a.txt", "b.txt", "gone_1.txt", "gone_2.txt"]
        .into_iter()
        .map(|n| (ClumpKey::new(), FileRecord::new(dir.path(), n)))
        .collect();

    let outcome = HashClumper::default().dump(clumps);

    assert_eq!(outcome.errors.len(), 2);
    for err in &outcome.errors {
        match err {
            ClassificationError::Unreadable { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected Unreadable, got: {:?}", other),
        }
    }
    assert_eq!(outcome.clumps.duplicates().count(), 1);
}

#[test]
fn test_removal_failure_does_not_stop_other_files() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", "foo\n");
    write_file(dir.path(), "c.txt", "foo\n");
    std::fs::create_dir(dir.path().join("b.txt")).unwrap();
    let selection = Selection {
        keep: FileRecord::new(dir.path(), "a.txt"),
        discard: ["b.txt", "c.txt"]
            .into_iter()
            .map(|n| FileRecord::new(dir.path(), n))
            .collect::<BTreeSet<_>>(),
    };
    let options = Options {
        remove_links: true,
        ..Options::default()
    };
    let sink = MemorySink::new();

    let report = Remover::new(&options, &sink).remove(&selection);

    assert_eq!(report.removed, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0], RemovalError::Remove { .. }));
    assert_eq!(report.failures[0].path(), dir.path().join("b.txt"));
    assert!(!dir.path().join("c.txt").exists());
    assert!(sink
        .events()
        .iter()
        .any(|e| matches!(e, Event::RemovalFailed { .. })));
}

#[test]
fn test_already_deleted_discard_is_resolved() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "foo.txt", "foo\n");
    let selection = Selection {
        keep: FileRecord::new(dir.path(), "foo.txt"),
        discard: [FileRecord::new(dir.path(), "foo (1).txt")].into_iter().collect(),
    };

    for remove_links in [false, true] {
        let options = Options {
            remove_links,
            ..Options::default()
        };
        let sink = MemorySink::new();
        let report = Remover::new(&options, &sink).remove(&selection);

        assert!(report.all_succeeded());
        assert_eq!(report.already_absent, 1);
    }
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_reported_and_kept() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_file(dir.path(), "foo.txt", "foo\n");
    write_file(dir.path(), "foo (1).txt", "foo\n");
    let locked = write_file(dir.path(), "foo (2).txt", "foo\n");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read the file anyway
    if std::fs::File::open(&locked).is_ok() {
        return;
    }

    let (summary, sink) = trim(dir.path(), &Options::default());

    assert_eq!(summary.classification_errors.len(), 1);
    assert_eq!(summary.classification_errors[0].path(), locked.as_path());
    assert_eq!(summary.removed, 1);
    assert!(locked.exists());
    assert!(dir.path().join("foo.txt").exists());
    assert_eq!(
        sink.paths_where(|e| matches!(e, Event::ClassificationFailed { .. })),
        vec![locked]
    );
}
