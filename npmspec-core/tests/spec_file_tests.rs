//! On-disk spec file and change-log integration tests.

use assert_fs::prelude::*;
use chrono::{TimeZone, Utc};
use npmspec_core::{changes, ChangeEntry, CoreError, SpecFile};
use predicates::prelude::predicate;

/// Multi-package spec: the sub-package repeats `Version:` and `Summary:`.
const MULTI_PACKAGE: &str = "\
#
# spec file for package nodejs-foo
#

Name:           nodejs-foo
Version:        1.0.0
Release:        0
Summary:        Foo for node
License:        MIT
Url:            https://foo.example
Source:         https://registry.npmjs.org/foo/-/foo-1.0.0.tgz
BuildArch:      noarch

%package -n foo-cli
Version:        7.7.7
Summary:        Command line tool

%description
Foo for node.

%description -n foo-cli
Version: should never be touched

%changelog
";

// ---------------------------------------------------------------------------
// 1. Read / write
// ---------------------------------------------------------------------------

#[test]
fn read_write_without_edits_is_byte_identical() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("nodejs-foo.spec");
    file.write_str(MULTI_PACKAGE).expect("write");

    let spec = SpecFile::read(file.path()).expect("read");
    spec.write(file.path()).expect("write back");

    file.assert(MULTI_PACKAGE);
}

#[test]
fn version_bump_touches_one_line() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("nodejs-foo.spec");
    file.write_str(MULTI_PACKAGE).expect("write");

    let mut spec = SpecFile::read(file.path()).expect("read");
    assert_eq!(spec.get("Version"), Some("1.0.0"));
    assert!(spec.set("Version", "1.1.0"));
    spec.write(file.path()).expect("write back");

    let expected = MULTI_PACKAGE.replacen("Version:        1.0.0", "Version:        1.1.0", 1);
    file.assert(predicate::str::diff(expected));
    file.assert(predicate::str::contains("Version:        7.7.7"));
    file.assert(predicate::str::contains("Version: should never be touched"));
}

#[test]
fn subpackage_tags_are_invisible() {
    let spec = SpecFile::parse(MULTI_PACKAGE);
    assert_eq!(spec.get("Summary"), Some("Foo for node"));
    assert_eq!(spec.get("Group"), None);
}

#[test]
fn read_missing_file_reports_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = SpecFile::read(&dir.path().join("absent.spec")).unwrap_err();
    assert!(matches!(err, CoreError::Io { .. }), "got: {err}");
    assert!(err.to_string().contains("absent.spec"));
}

// ---------------------------------------------------------------------------
// 2. Change-log
// ---------------------------------------------------------------------------

#[test]
fn changelog_entries_are_prepended() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("nodejs-foo.changes");
    file.write_str("-------------------------------------------------------------------\nold entry\n")
        .expect("seed");

    let entry = ChangeEntry {
        timestamp: Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap(),
        author: "packager@example.org".to_string(),
        version: "1.1.0".to_string(),
    };
    changes::prepend_entry(file.path(), &entry).expect("prepend");

    file.assert(predicate::str::starts_with(entry.render()));
    file.assert(predicate::str::ends_with("old entry\n"));
    file.assert(predicate::str::contains("Sat Oct 17 12:00:00 UTC 2026 - packager@example.org"));
    dir.child("nodejs-foo.changes.new").assert(predicate::path::missing());
}
