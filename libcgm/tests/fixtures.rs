//! Test harness for the CGM parser against fixture files.
//!
//! Every .cgm file under test/cgm/ must parse, and its XML encoding must match
//! the file of the same name under test/xml/. Every .cgm file under test/bad/
//! must fail with the message stored in the matching .error file.

use std::fs;
use std::path::{Path, PathBuf};

use libcgm::{encode, encode_cgm_bytes, parse, parse_with_filename, Document, Format};
use pretty_assertions::assert_eq;

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// All .cgm files in a subdirectory of test/, sorted.
fn get_cgm_files(subdir: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(subdir).join("*.cgm");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .flatten()
        .collect();
    files.sort();
    files
}

/// Read a sibling fixture with the same stem from another subdirectory.
fn read_expected(cgm_path: &Path, subdir: &str, ext: &str) -> Option<String> {
    let stem = cgm_path.file_stem().unwrap().to_string_lossy();
    let path = test_root().join(subdir).join(format!("{}.{}", stem, ext));
    fs::read_to_string(path).ok()
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

/// Shape of a document as (depth, content) pairs in document order.
fn shape(doc: &Document) -> Vec<(usize, Vec<u8>)> {
    doc.descendants()
        .map(|(depth, id)| (depth, doc[id].content().to_vec()))
        .collect()
}

/// Run a single good fixture.
fn run_good_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content = fs::read(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    let doc = parse(&content).map_err(|e| format!("{}: Unexpected parse error: {}", filename, e))?;

    let actual = encode(&doc, Format::Xml);
    match read_expected(path, "xml", "xml") {
        Some(expected) if expected != actual => {
            return Err(format!(
                "{}: Output mismatch\n    expected: {}\n    actual:   {}",
                filename, expected, actual
            ));
        }
        Some(_) => println!("  {} => {} nodes", filename, doc.len()),
        None => println!("  {} => {:?} (no expected output)", filename, doc),
    }

    // The canonical re-encoding must describe the same tree.
    let again = parse(&encode_cgm_bytes(&doc))
        .map_err(|e| format!("{}: Canonical form does not parse: {}", filename, e))?;
    if shape(&again) != shape(&doc) {
        return Err(format!("{}: Canonical form changes the tree", filename));
    }

    Ok(())
}

/// Run a single bad fixture.
fn run_bad_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content = fs::read(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    match parse_with_filename(&content, Some(&filename)) {
        Ok(doc) => Err(format!(
            "{}: Expected parse error, but got success: {:?}",
            filename, doc
        )),
        Err(e) => {
            let actual = e.to_string();
            match read_expected(path, "bad", "error") {
                Some(expected) if expected.trim() == actual => {
                    println!("  {} => error (as expected)", filename);
                    Ok(())
                }
                Some(expected) => Err(format!(
                    "{}: Error mismatch\n    expected: {}\n    actual:   {}",
                    filename,
                    expected.trim(),
                    actual
                )),
                None => {
                    println!("  {} => error: {} (no .error file to compare)", filename, actual);
                    Ok(())
                }
            }
        }
    }
}

fn run_all(subdir: &str, run: fn(&Path) -> Result<(), String>) {
    let files = get_cgm_files(subdir);
    assert!(!files.is_empty(), "no fixtures found in test/{}", subdir);

    println!("\nRunning {} test/{} files:", files.len(), subdir);

    let errors: Vec<String> = files.iter().filter_map(|f| run(f).err()).collect();

    println!(
        "\nResults: {} passed, {} failed",
        files.len() - errors.len(),
        errors.len()
    );
    for error in &errors {
        println!("  - {}", error);
    }

    assert!(errors.is_empty(), "{} test/{} fixtures failed", errors.len(), subdir);
}

#[test]
fn test_all_good_fixtures() {
    run_all("cgm", run_good_test);
}

#[test]
fn test_all_bad_fixtures() {
    run_all("bad", run_bad_test);
}

#[test]
fn test_scenario_fixture_tree() {
    let content = fs::read(test_root().join("cgm").join("scenario.cgm")).unwrap();
    let doc = parse(&content).unwrap();
    let texts: Vec<(usize, String)> = doc
        .descendants()
        .map(|(depth, id)| (depth, doc[id].text_lossy().into_owned()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (1, "a".to_string()),
            (2, "b".to_string()),
            (3, "c".to_string()),
            (2, "d".to_string()),
        ]
    );
}

#[test]
fn test_fixture_via_mapped_source() {
    let path = test_root().join("cgm").join("tabs-and-spaces.cgm");
    let source = libcgm::Source::open(&path).unwrap();
    let doc = parse_with_filename(&source, Some("tabs-and-spaces.cgm")).unwrap();
    drop(source);
    // Content is owned by the tree, so it outlives the mapping.
    let first = doc.children(doc.root())[0];
    assert_eq!(doc[first].text(), Some("Grocery list"));
    assert_eq!(doc.children(first).len(), 2);
}
