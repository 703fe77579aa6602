//! Compile benchmarks: pattern → matcher construction.
//!
//! Measures the one-time cost of building matchers, including bitstring
//! layout validation and scaling with pattern size.

use clausal::prelude::*;

fn main() {
    divan::main();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Single patterns
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench]
fn compile_literal(bencher: divan::Bencher) {
    let pattern = literal("GET");
    bencher.bench_local(|| build_match(&pattern));
}

#[divan::bench]
fn compile_nested(bencher: divan::Bencher) {
    let pattern = map([
        ("user", map([("id", named("id")), ("tags", head_tail())])),
        ("kind", bound("login")),
        ("raw", capture(starts_with("Bearer "))),
    ]);
    bencher.bench_local(|| build_match(&pattern));
}

#[divan::bench]
fn compile_bitstring(bencher: divan::Bencher) {
    let pattern = bitstring(vec![
        Segment::literal(SegmentType::Integer, 0x89).size(8),
        Segment::free(SegmentType::Integer).size(16).little(),
        Segment::free(SegmentType::Float).size(32),
        Segment::free(SegmentType::Binary),
    ]);
    bencher.bench_local(|| build_match(&pattern));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scaling
// ═══════════════════════════════════════════════════════════════════════════════

#[divan::bench(args = [1, 10, 100, 1000])]
fn compile_list_scaling(bencher: divan::Bencher, n: usize) {
    let pattern = list((0..n).map(|i| if i % 2 == 0 { variable() } else { wildcard() }));
    bencher.bench_local(|| build_match(&pattern));
}

#[divan::bench(args = [1, 10, 100])]
fn defmatch_scaling(bencher: divan::Bencher, n: usize) {
    bencher.bench_local(|| {
        defmatch((0..n).map(|i| {
            let arity = i % 4;
            clause((0..arity).map(|_| variable()), move |_| i).unwrap()
        }))
    });
}

#[divan::bench(args = [16, 32, 64])]
fn compile_depth(bencher: divan::Bencher, depth: usize) {
    let mut pattern = variable();
    for _ in 1..depth {
        pattern = list([pattern]);
    }
    bencher.bench_local(|| build_match(&pattern));
}
