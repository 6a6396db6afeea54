use super::common::{remaining, trim, write_file};
use tempfile::tempdir;
use twintrim::clumping::{Clumper, RegexClumper, DEFAULT_PATTERN};
use twintrim::options::{ConfigurationError, Options};
use twintrim::pipeline::Trimmer;
use twintrim::events::MemorySink;
use twintrim::scanner::FileRecord;

#[test]
fn test_default_pattern_keys() {
    let clumper = RegexClumper::new(DEFAULT_PATTERN, None).unwrap();

    assert_eq!(clumper.key_for_name("foo.txt").as_deref(), Some("foo.txt"));
    assert_eq!(clumper.key_for_name("foo (1).txt").as_deref(), Some("foo.txt"));
    assert_eq!(
        clumper.key_for_name("foo (1) (2).txt").as_deref(),
        Some("foo.txt")
    );
    assert_eq!(
        clumper.key_for_name("archive.tar.gz").as_deref(),
        Some("archive.tar.gz")
    );
    assert_eq!(clumper.key_for_name("README"), None);
}

#[test]
fn test_unmatched_names_are_excluded_not_fatal() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "Makefile", "same\n");
    write_file(dir.path(), "LICENSE", "same\n");
    write_file(dir.path(), "foo.txt", "foo\n");
    write_file(dir.path(), "foo (1).txt", "foo\n");

    let (summary, _) = trim(dir.path(), &Options::default());

    assert_eq!(summary.classification_errors.len(), 2);
    assert!(!summary.has_errors());
    assert_eq!(summary.removed, 1);
    assert_eq!(remaining(dir.path()), vec!["LICENSE", "Makefile", "foo.txt"]);
}

#[test]
fn test_explicit_key_groups() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "photo_001.jpg", "pixels");
    write_file(dir.path(), "photo_002.jpg", "pixels");
    write_file(dir.path(), "photo_003.png", "pixels");
    let options = Options {
        regex_pattern: Some(r"(.+?)_(\d+)(\..+)$".to_string()),
        key_groups: Some(vec![1, 3]),
        ..Options::default()
    };

    let (summary, _) = trim(dir.path(), &options);

    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(remaining(dir.path()), vec!["photo_001.jpg", "photo_003.png"]);
}

#[test]
fn test_custom_pattern_uses_all_groups_by_default() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "photo_001.jpg", "pixels");
    write_file(dir.path(), "photo_002.jpg", "pixels");
    let options = Options {
        regex_pattern: Some(r"(.+?)_(\d+)(\..+)$".to_string()),
        ..Options::default()
    };

    let (summary, _) = trim(dir.path(), &options);

    // The counter is part of the key, so the names never clump
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(remaining(dir.path()).len(), 2);
}

#[test]
fn test_pattern_is_anchored_at_start() {
    let clumper = RegexClumper::new(r"(\d+)", None).unwrap();

    assert_eq!(clumper.key_for_name("123abc").as_deref(), Some("123"));
    assert_eq!(clumper.key_for_name("abc123"), None);

    let record = FileRecord::new(std::path::Path::new("/d"), "abc123");
    assert!(clumper.make_key(&record).is_err());
}

#[test]
fn test_invalid_key_group_rejected_before_scan() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "foo.txt", "foo\n");
    write_file(dir.path(), "foo (1).txt", "foo\n");
    let options = Options {
        regex_pattern: Some(r"(.+)\.txt".to_string()),
        key_groups: Some(vec![2]),
        ..Options::default()
    };
    let sink = MemorySink::new();

    let result = Trimmer::new(dir.path(), &options, &sink);

    assert!(matches!(
        result,
        Err(ConfigurationError::InvalidKeyGroup {
            group: 2,
            available: 1
        })
    ));
    assert_eq!(remaining(dir.path()).len(), 2);
}

#[test]
fn test_whole_match_key_group_rejected_before_scan() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "foo.txt", "foo\n");
    write_file(dir.path(), "foo (1).txt", "foo\n");
    let options = Options {
        regex_pattern: Some(DEFAULT_PATTERN.to_string()),
        key_groups: Some(vec![0]),
        ..Options::default()
    };
    let sink = MemorySink::new();

    assert!(matches!(
        Trimmer::new(dir.path(), &options, &sink),
        Err(ConfigurationError::InvalidKeyGroup { group: 0, .. })
    ));
    assert_eq!(remaining(dir.path()).len(), 2);
}

#[test]
fn test_pattern_with_only_checksum_rejected_before_scan() {
    let dir = tempdir().unwrap();
    let options = Options {
        regex_pattern: Some(r"(.+?)(?:__\d)*\..*".to_string()),
        skip_regex: true,
        ..Options::default()
    };
    let sink = MemorySink::new();

    assert!(matches!(
        Trimmer::new(dir.path(), &options, &sink),
        Err(ConfigurationError::PatternWithSkipRegex)
    ));
}
