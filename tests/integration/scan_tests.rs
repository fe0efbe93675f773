use dupescan::config::ScanRoot;
use dupescan::duplicates::{
    DuplicateFinder, DuplicateGroup, FinderConfig, FinderError, GroupKey, KeepPolicy, NameKey,
    ScanMode, ScanResult,
};
use dupescan::output::RemovalPlan;
use dupescan::scanner::{ScanError, WalkerConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scan(root: &Path, config: FinderConfig) -> ScanResult {
    let root = ScanRoot::new(root).unwrap();
    DuplicateFinder::new(config).scan(&root).unwrap()
}

fn rel_paths(result: &ScanResult, group: &DuplicateGroup) -> Vec<String> {
    group
        .files
        .iter()
        .map(|f| {
            f.path
                .strip_prefix(&result.root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn removal_paths(result: &ScanResult) -> Vec<String> {
    RemovalPlan::from_result(result)
        .removals()
        .iter()
        .map(|r| {
            r.path
                .strip_prefix(&result.root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let result = scan(dir.path(), FinderConfig::default());

    assert!(result.name_groups.is_empty());
    assert!(result.content_groups.is_empty());
    assert_eq!(result.summary.total_files, 0);
    assert!(RemovalPlan::from_result(&result).is_empty());
}

#[test]
fn test_same_name_in_two_subdirectories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x/report.pdf", b"one");
    write(dir.path(), "y/report.pdf", b"second");
    write(dir.path(), "y/other.pdf", b"third");

    let result = scan(dir.path(), FinderConfig::default());

    assert_eq!(result.name_groups.len(), 1);
    assert_eq!(
        rel_paths(&result, &result.name_groups[0]),
        ["x/report.pdf", "y/report.pdf"]
    );
}

#[test]
fn test_same_name_same_content_one_command() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/song.mp3", b"XXXX");
    write(dir.path(), "b/song.mp3", b"XXXX");

    let result = scan(dir.path(), FinderConfig::default());

    assert_eq!(result.name_groups.len(), 1);
    assert_eq!(result.content_groups.len(), 1);
    assert_eq!(removal_paths(&result), ["b/song.mp3"]);
}

#[test]
fn test_different_name_same_content() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/1.txt", b"foo");
    write(dir.path(), "b/2.txt", b"foo");

    let result = scan(dir.path(), FinderConfig::default());

    assert!(result.name_groups.is_empty());
    assert_eq!(result.content_groups.len(), 1);
    assert_eq!(removal_paths(&result), ["b/2.txt"]);
}

#[test]
fn test_same_name_different_content() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/1.txt", b"foo");
    write(dir.path(), "b/1.txt", b"bar");

    let result = scan(dir.path(), FinderConfig::default());

    assert_eq!(result.name_groups.len(), 1);
    assert!(result.content_groups.is_empty());
    assert_eq!(removal_paths(&result), ["b/1.txt"]);
}

#[test]
fn test_equal_size_different_content_never_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.bin", b"abcd");
    write(dir.path(), "b.bin", b"abce");
    write(dir.path(), "c.bin", b"abcd");

    let result = scan(dir.path(), FinderConfig::default());

    assert_eq!(result.summary.hashed_files, 3);
    assert_eq!(result.content_groups.len(), 1);
    assert_eq!(rel_paths(&result, &result.content_groups[0]), ["a.bin", "c.bin"]);
    assert!(matches!(result.content_groups[0].key, GroupKey::Content(_)));
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "m/z.txt", b"same");
    write(dir.path(), "b/z.txt", b"same");
    write(dir.path(), "k/q.txt", b"same");
    write(dir.path(), "a/q.txt", b"diff");

    let first = scan(dir.path(), FinderConfig::default());
    let second = scan(dir.path(), FinderConfig::default());

    assert_eq!(first.name_groups, second.name_groups);
    assert_eq!(first.content_groups, second.content_groups);
    assert_eq!(removal_paths(&first), removal_paths(&second));

    // Sorted walk: b/ before m/, a/ before k/
    assert_eq!(rel_paths(&first, &first.name_groups[0]), ["a/q.txt", "k/q.txt"]);
    assert_eq!(rel_paths(&first, &first.name_groups[1]), ["b/z.txt", "m/z.txt"]);
}

#[test]
fn test_stem_key_with_extension_filter() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/track.mp3", b"small");
    write(dir.path(), "b/track.M4A", b"much bigger");
    write(dir.path(), "a/notes.txt", b"1");
    write(dir.path(), "b/notes.md", b"2");

    let config = FinderConfig::default()
        .with_mode(ScanMode::Name)
        .with_name_key(NameKey::Stem)
        .with_name_extensions(vec!["mp3".into(), "m4a".into(), "3gp".into()])
        .with_keep(KeepPolicy::Largest);
    let result = scan(dir.path(), config);

    assert_eq!(result.name_groups.len(), 1);
    assert_eq!(result.name_groups[0].key, GroupKey::Name("track".into()));
    assert_eq!(
        rel_paths(&result, &result.name_groups[0]),
        ["b/track.M4A", "a/track.mp3"]
    );
    assert_eq!(removal_paths(&result), ["a/track.mp3"]);
}

#[test]
fn test_name_original_survives_content_pass() {
    let dir = tempdir().unwrap();
    write(dir.path(), "0/z.txt", b"foo");
    write(dir.path(), "a/x.txt", b"foo");
    write(dir.path(), "b/x.txt", b"bar");

    let result = scan(dir.path(), FinderConfig::default());

    assert_eq!(rel_paths(&result, &result.name_groups[0]), ["a/x.txt", "b/x.txt"]);
    assert_eq!(rel_paths(&result, &result.content_groups[0]), ["0/z.txt", "a/x.txt"]);
    assert_eq!(removal_paths(&result), ["b/x.txt"]);
}

#[test]
fn test_keep_smallest() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.dat", b"bigger one");
    write(dir.path(), "b/x.dat", b"small");

    let config = FinderConfig::default().with_keep(KeepPolicy::Smallest);
    let result = scan(dir.path(), config);

    assert_eq!(removal_paths(&result), ["a/x.dat"]);
}

#[test]
fn test_empty_files_group_by_content_unless_skipped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/empty1", b"");
    write(dir.path(), "b/empty2", b"");

    let result = scan(dir.path(), FinderConfig::default());
    assert_eq!(result.content_groups.len(), 1);

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(false, true, None));
    let result = scan(dir.path(), config);
    assert_eq!(result.summary.total_files, 0);
    assert!(result.content_groups.is_empty());
}

#[test]
fn test_min_size_filter() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/small.txt", b"ab");
    write(dir.path(), "b/small.txt", b"ab");
    write(dir.path(), "a/large.txt", b"0123456789");
    write(dir.path(), "b/large.txt", b"0123456789");

    let config =
        FinderConfig::default().with_walker_config(WalkerConfig::new(false, false, Some(5)));
    let result = scan(dir.path(), config);

    assert_eq!(result.summary.total_files, 2);
    assert_eq!(result.name_groups.len(), 1);
    assert_eq!(result.name_groups[0].key, GroupKey::Name("large.txt".into()));
}

#[test]
fn test_scan_path_not_a_directory() {
    let dir = tempdir().unwrap();
    write(dir.path(), "file.txt", b"x");

    let err = DuplicateFinder::with_defaults()
        .scan_path(&dir.path().join("file.txt"))
        .unwrap_err();
    assert!(matches!(err, FinderError::Config(_)));
}

#[test]
fn test_free_scan_function() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/song.mp3", b"XXXX");
    write(dir.path(), "b/song.mp3", b"XXXX");

    let (names, contents) = dupescan::duplicates::scan(dir.path()).unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(contents.len(), 1);
}

#[cfg(unix)]
fn running_as_root() -> bool {
    // Root ignores file permission bits
    let scratch = tempdir().unwrap();
    let path = scratch.path().join("locked");
    fs::write(&path, b"x").unwrap();
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
    fs::File::open(&path).is_ok()
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_excluded_from_all_groups() {
    use std::os::unix::fs::PermissionsExt;

    if running_as_root() {
        return;
    }

    let dir = tempdir().unwrap();
    write(dir.path(), "a/song.mp3", b"XXXX");
    write(dir.path(), "b/song.mp3", b"XXXX");
    write(dir.path(), "c/song.mp3", b"XXXX");
    let locked = dir.path().join("b/song.mp3");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let result = scan(dir.path(), FinderConfig::default());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(result.summary.skipped_files, 1);
    assert!(matches!(result.skipped[0], ScanError::Hash(_)));
    assert_eq!(rel_paths(&result, &result.name_groups[0]), ["a/song.mp3", "c/song.mp3"]);
    assert_eq!(rel_paths(&result, &result.content_groups[0]), ["a/song.mp3", "c/song.mp3"]);
    assert_eq!(removal_paths(&result), ["c/song.mp3"]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_unique_file_excluded_from_name_groups() {
    use std::os::unix::fs::PermissionsExt;

    if running_as_root() {
        return;
    }

    let dir = tempdir().unwrap();
    write(dir.path(), "a/notes.txt", b"short");
    write(dir.path(), "b/notes.txt", b"a bit longer");
    let locked = dir.path().join("b/notes.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let result = scan(dir.path(), FinderConfig::default());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(result.summary.hashed_files, 0);
    assert_eq!(result.skipped.len(), 1);
    assert!(result.name_groups.is_empty());
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    if running_as_root() {
        return;
    }

    let dir = tempdir().unwrap();
    write(dir.path(), "open/1.txt", b"foo");
    write(dir.path(), "other/2.txt", b"foo");
    write(dir.path(), "locked/3.txt", b"foo");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let result = scan(dir.path(), FinderConfig::default());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(result
        .skipped
        .iter()
        .any(|e| matches!(e, ScanError::PermissionDenied(_))));
    assert_eq!(rel_paths(&result, &result.content_groups[0]), ["open/1.txt", "other/2.txt"]);
}

#[cfg(unix)]
#[test]
fn test_distinct_non_utf8_names_do_not_group() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    if fs::write(dir.path().join("a").join(OsStr::from_bytes(b"\xff.txt")), b"one").is_err() {
        // Filesystem rejects non-UTF-8 names
        return;
    }
    fs::write(dir.path().join("b").join(OsStr::from_bytes(b"\xfe.txt")), b"other").unwrap();
    fs::write(dir.path().join("b").join(OsStr::from_bytes(b"\xff.txt")), b"third").unwrap();

    let result = scan(dir.path(), FinderConfig::default());

    assert_eq!(result.name_groups.len(), 1);
    assert_eq!(
        result.name_groups[0].key,
        GroupKey::Name(OsStr::from_bytes(b"\xff.txt").into())
    );
    assert_eq!(removal_paths(&result).len(), 1);
    assert!(RemovalPlan::from_result(&result)
        .removals()
        .iter()
        .all(|r| r.path.ends_with(Path::new("b").join(OsStr::from_bytes(b"\xff.txt")))));
}
