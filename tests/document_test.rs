//! Tests for document load/save and find/replace.

use tokenz::TokenzError;
use tokenz::document::{find, load, replace_all, save};

#[test]
fn save_then_load_preserves_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");

    save(&path, "héllo\nwörld\n").unwrap();
    assert_eq!(load(&path).unwrap(), "héllo\nwörld\n");

    save(&path, "replaced").unwrap();
    assert_eq!(load(&path).unwrap(), "replaced");
}

#[test]
fn loading_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let err = load(&path).unwrap_err();
    match &err {
        TokenzError::Io { path: p, .. } => assert_eq!(p, &path),
        other => panic!("expected Io error, got {other:?}"),
    }
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn find_returns_character_span() {
    let text = "größe und größe";
    assert_eq!(find(text, "größe", 0), Some((0, 5)));
    assert_eq!(find(text, "größe", 1), Some((10, 15)));
    assert_eq!(find(text, "und", 0), Some((6, 9)));
}

#[test]
fn find_does_not_wrap_around() {
    let text = "abc abc";
    assert_eq!(find(text, "abc", 5), None);
    assert_eq!(find(text, "abc", 7), None);
    assert_eq!(find(text, "abc", 100), None);
}

#[test]
fn find_empty_needle_is_none() {
    assert_eq!(find("anything", "", 0), None);
}

#[test]
fn replace_all_counts_replacements() {
    let (text, count) = replace_all("the cat sat on the mat", "the", "a");
    assert_eq!(text, "a cat sat on a mat");
    assert_eq!(count, 2);
}

#[test]
fn replace_all_without_match_is_unchanged() {
    let (text, count) = replace_all("hello", "bye", "hi");
    assert_eq!(text, "hello");
    assert_eq!(count, 0);
}

#[test]
fn replace_all_requires_needle_and_replacement() {
    assert_eq!(replace_all("aaa", "", "b"), ("aaa".to_string(), 0));
    assert_eq!(replace_all("aaa", "a", ""), ("aaa".to_string(), 0));
}
