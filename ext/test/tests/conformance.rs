//! Conformance tests that run YAML pattern fixtures against clausal
//!
//! Run with: cargo test -p clausal-test --test conformance --features clausal-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use clausal_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the fixtures directory at the workspace root
fn fixtures_dir() -> PathBuf {
    // The manifest dir is ext/test; fixtures live two levels up
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let ext_test = Path::new(manifest_dir);

    let workspace_root = ext_test
        .parent() // ext
        .and_then(|p| p.parent()) // workspace
        .expect("Could not find workspace root");

    workspace_root.join("fixtures")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    if !dir.exists() {
        panic!("Fixtures directory does not exist: {}", dir.display());
    }

    for entry in fs::read_dir(dir).expect("read dir") {
        let entry = entry.expect("dir entry");
        let path = entry.path();

        if path
            .extension()
            .map_or(false, |e| e == "yaml" || e == "yml")
        {
            println!("Running fixture: {}", path.display());

            let yaml = fs::read_to_string(&path).expect("read yaml");

            // Parse potentially multiple fixtures (separated by ---)
            let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
                panic!("Failed to parse {}: {}", path.display(), e);
            });

            for fixture in fixtures {
                println!("  Running: {}", fixture.name);
                fixture.run_and_assert();
            }
        }
    }
}

#[test]
fn test_basic_patterns() {
    run_fixtures_in_dir(&fixtures_dir().join("01_basic"));
}

#[test]
fn test_structural_patterns() {
    run_fixtures_in_dir(&fixtures_dir().join("02_structural"));
}

#[test]
fn test_bitstrings() {
    run_fixtures_in_dir(&fixtures_dir().join("03_bitstring"));
}

#[test]
fn test_invalid_patterns() {
    run_fixtures_in_dir(&fixtures_dir().join("04_invalid"));
}
