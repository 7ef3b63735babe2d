//! Benchmarks for the diff engine
//!
//! Performance-critical paths:
//! - `DiffEngine::compute`: line alignment plus refinement of changed lines
//! - `MyersDiff` vs `LcsDiff` on token sequences of growing size
//! - Refinement budget: whole-region fallback on very large rewrites

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mosaic_diff::{
    Algorithm, DiffAlgorithm, DiffEngine, DiffOptions, Granularity, LcsDiff, MyersDiff, Tokens,
};

const WORDS: [&str; 12] = [
    "garden", "Grandma", "roses", "spring", "the", "house", "planted", "secret", "kept", "old",
    "neighbours", "marigolds",
];

/// Deterministic story of `lines` lines.
fn story(lines: usize) -> String {
    (0..lines)
        .map(|line| {
            let words: Vec<&str> = (0..10).map(|w| WORDS[(line * 7 + w * 3) % WORDS.len()]).collect();
            format!("{}.\n", words.join(" "))
        })
        .collect()
}

/// Rewrites every `every`-th line by swapping one word.
fn edit(text: &str, every: usize) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i % every == 0 {
                format!("{}\n", line.replacen("the", "a", 1))
            } else {
                format!("{line}\n")
            }
        })
        .collect()
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_diff/story");

    for lines in [10usize, 100, 1000] {
        let original = story(lines);
        let rewrite = edit(&original, 5);
        group.throughput(Throughput::Bytes((original.len() + rewrite.len()) as u64));

        for (name, granularity) in [("word", Granularity::Word), ("char", Granularity::Char)] {
            let engine = DiffEngine::new(DiffOptions::new().with_granularity(granularity));
            group.bench_with_input(
                BenchmarkId::new(name, lines),
                &(&original, &rewrite),
                |b, (original, rewrite)| b.iter(|| engine.compute(black_box(original), black_box(rewrite))),
            );
        }
    }

    group.finish();
}

fn bench_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_diff/algorithm");

    for lines in [20usize, 200] {
        let original = story(lines);
        let rewrite = edit(&original, 3);
        let old = Tokens::words(&original);
        let new = Tokens::words(&rewrite);

        group.bench_function(BenchmarkId::new("myers", lines), |b| {
            b.iter(|| MyersDiff::new().edit_script(black_box(old.pieces()), black_box(new.pieces())));
        });
        group.bench_function(BenchmarkId::new("lcs", lines), |b| {
            let lcs = LcsDiff::default();
            b.iter(|| lcs.edit_script(black_box(old.pieces()), black_box(new.pieces())));
        });
    }

    group.finish();
}

fn bench_rewrite_everything(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_diff/full_rewrite");

    let original = story(300);
    let rewrite: String = original.chars().rev().collect();
    for algorithm in [Algorithm::Myers, Algorithm::Lcs] {
        let engine = DiffEngine::new(DiffOptions::new().with_algorithm(algorithm));
        group.bench_function(format!("{algorithm:?}"), |b| {
            b.iter(|| engine.compute(black_box(&original), black_box(&rewrite)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute,
    bench_algorithms,
    bench_rewrite_everything
);
criterion_main!(benches);
