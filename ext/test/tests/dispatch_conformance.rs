//! Dispatch conformance tests: clause selection, arity buckets, defaults.
//!
//! Run with: cargo test -p clausal-test --test dispatch_conformance --features clausal-test/fixtures

#![cfg(feature = "fixtures")]

use clausal_test::dispatch_fixture::DispatchFixture;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the dispatch fixtures directory relative to the workspace root.
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent() // ext
        .and_then(|p| p.parent()) // workspace
        .expect("Could not find workspace root")
        .join("fixtures")
        .join("05_dispatch")
}

#[test]
fn test_dispatch_conformance() {
    let dir = fixtures_dir();
    assert!(
        dir.exists(),
        "Dispatch fixtures directory does not exist: {}",
        dir.display()
    );

    for entry in fs::read_dir(&dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if !path
            .extension()
            .map_or(false, |e| e == "yaml" || e == "yml")
        {
            continue;
        }

        println!("Loading dispatch fixture: {}", path.display());
        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = DispatchFixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}
