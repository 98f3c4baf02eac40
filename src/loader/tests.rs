use std::fs;

use tempfile::TempDir;

use super::*;

#[test]
fn missing_repository_yields_no_documents() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("does-not-exist");

    let documents = load_documents(&missing).expect("missing dir is not an error");
    assert!(documents.is_empty());
}

#[test]
fn empty_repository_yields_no_documents() {
    let temp = TempDir::new().expect("temp dir");

    let documents = load_documents(temp.path()).expect("load");
    assert!(documents.is_empty());
}

#[test]
fn loads_text_files_recursively() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("a.txt"), "alpha").expect("write");
    fs::create_dir(temp.path().join("nested")).expect("mkdir");
    fs::write(temp.path().join("nested").join("b.txt"), "beta").expect("write");

    let documents = load_documents(temp.path()).expect("load");

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].text, "alpha");
    assert_eq!(documents[0].metadata.page, None);
    assert!(documents[0].metadata.source.ends_with("a.txt"));
    assert_eq!(documents[1].text, "beta");
    assert!(documents[1].metadata.source.ends_with("b.txt"));
}

#[test]
fn skips_unsupported_extensions() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("notes.md"), "markdown").expect("write");
    fs::write(temp.path().join("data.csv"), "1,2,3").expect("write");
    fs::write(temp.path().join("keep.txt"), "kept").expect("write");

    let documents = load_documents(temp.path()).expect("load");

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].text, "kept");
}

#[test]
fn extension_matching_is_case_insensitive() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("UPPER.TXT"), "upper").expect("write");

    let documents = load_documents(temp.path()).expect("load");

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].text, "upper");
}

#[test]
fn visits_files_in_sorted_order() {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("c.txt"), "c").expect("write");
    fs::write(temp.path().join("a.txt"), "a").expect("write");
    fs::write(temp.path().join("b.txt"), "b").expect("write");

    let documents = load_documents(temp.path()).expect("load");

    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}
