use super::common::{remaining, trim, write_file};
use twintrim::events::Event;
use twintrim::options::Options;
use twintrim::scanner::HashAlgorithm;
use tempfile::tempdir;

fn scenario_a(dir: &std::path::Path) {
    write_file(dir, "foo.txt", "foo\n");
    write_file(dir, "foo (1).txt", "foo\n");
    write_file(dir, "foo (2).txt", "foo\n");
    write_file(dir, "foo (3).txt", "foobaz\n");
}

#[test]
fn test_scenario_a_removes_numbered_copies() {
    let dir = tempdir().unwrap();
    scenario_a(dir.path());
    let options = Options {
        remove_links: true,
        ..Options::default()
    };

    let (summary, sink) = trim(dir.path(), &options);

    assert_eq!(remaining(dir.path()), vec!["foo (3).txt", "foo.txt"]);
    assert_eq!(summary.files_scanned, 4);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.removed, 2);
    assert!(!summary.has_errors());
    assert_eq!(
        sink.paths_where(|e| matches!(e, Event::Kept { .. })),
        vec![dir.path().join("foo.txt")]
    );
}

#[test]
fn test_scenario_b_dry_run_changes_nothing() {
    let dir = tempdir().unwrap();
    scenario_a(dir.path());
    let options = Options {
        dry_run: true,
        remove_links: true,
        ..Options::default()
    };

    let (summary, sink) = trim(dir.path(), &options);

    assert_eq!(
        remaining(dir.path()),
        vec!["foo (1).txt", "foo (2).txt", "foo (3).txt", "foo.txt"]
    );
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.would_remove, 2);
    let mut reported = sink.paths_where(|e| matches!(e, Event::WouldDelete { .. }));
    reported.sort();
    assert_eq!(
        reported,
        vec![dir.path().join("foo (1).txt"), dir.path().join("foo (2).txt")]
    );
    assert!(sink
        .events()
        .iter()
        .all(|e| !matches!(e, Event::Deleted { .. })));
}

#[test]
fn test_scenario_c_custom_pattern() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "file.txt", "same\n");
    write_file(dir.path(), "file__1.txt", "same\n");
    let options = Options {
        regex_pattern: Some(r"(.+?)(?:__\d)*\..*".to_string()),
        ..Options::default()
    };

    let (summary, _) = trim(dir.path(), &options);

    assert_eq!(remaining(dir.path()), vec!["file.txt"]);
    assert_eq!(summary.removed, 1);
}

#[test]
fn test_every_hash_function_finds_the_same_duplicates() {
    for algorithm in HashAlgorithm::ALL {
        let dir = tempdir().unwrap();
        scenario_a(dir.path());
        let options = Options {
            hash_algorithm: algorithm,
            ..Options::default()
        };

        let (summary, _) = trim(dir.path(), &options);

        assert_eq!(summary.removed, 2, "{}", algorithm);
        assert_eq!(remaining(dir.path()), vec!["foo (3).txt", "foo.txt"]);
    }
}

#[test]
fn test_rerun_is_idempotent() {
    let dir = tempdir().unwrap();
    scenario_a(dir.path());
    let options = Options::default();

    let (first, _) = trim(dir.path(), &options);
    let after_first = remaining(dir.path());
    let (second, _) = trim(dir.path(), &options);

    assert_eq!(first.removed, 2);
    assert_eq!(second.removed, 0);
    assert_eq!(second.duplicate_groups, 0);
    assert!(!second.has_errors());
    assert_eq!(remaining(dir.path()), after_first);
}

#[test]
fn test_name_stage_prevents_content_only_matches() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "report.txt", "same\n");
    write_file(dir.path(), "notes.txt", "same\n");

    let (summary, _) = trim(dir.path(), &Options::default());
    assert_eq!(summary.removed, 0);

    let options = Options {
        skip_regex: true,
        ..Options::default()
    };
    let (summary, _) = trim(dir.path(), &options);
    assert_eq!(summary.removed, 1);
    assert_eq!(remaining(dir.path()), vec!["notes.txt"]);
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();

    let (summary, sink) = trim(dir.path(), &Options::default());

    assert_eq!(summary.files_scanned, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert!(sink.events().is_empty());
}

#[test]
fn test_keep_oldest_overrides_shortest_name() {
    use filetime::{set_file_mtime, FileTime};

    let dir = tempdir().unwrap();
    let short = write_file(dir.path(), "foo.txt", "foo\n");
    let old = write_file(dir.path(), "foo (1).txt", "foo\n");
    set_file_mtime(&short, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();
    set_file_mtime(&old, FileTime::from_unix_time(1_500_000_000, 0)).unwrap();
    let options = Options {
        keep_oldest: true,
        ..Options::default()
    };

    trim(dir.path(), &options);

    assert_eq!(remaining(dir.path()), vec!["foo (1).txt"]);
}
