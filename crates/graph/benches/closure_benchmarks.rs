//! Benchmarks for closure walks
//!
//! Run with: cargo bench -p okclosure-graph

#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use okclosure_graph::{BuildDir, DependencySource, ExtractMode, Result, closure, extract_from_str};
use std::collections::HashMap;
use std::fmt::Write;
use std::hint::black_box;

/// In-memory adjacency used as the walk's dependency source
#[derive(Clone, Default)]
struct BenchSource {
    edges: HashMap<String, Vec<String>>,
}

impl DependencySource for BenchSource {
    fn dependencies(&mut self, base: &str) -> Result<Vec<String>> {
        Ok(self.edges.get(base).cloned().unwrap_or_default())
    }
}

/// Linear chain: unit_0 -> unit_1 -> ... -> unit_{depth-1}
fn generate_deep_chain(depth: usize) -> BenchSource {
    let mut source = BenchSource::default();
    for i in 1..depth {
        source
            .edges
            .insert(format!("unit_{}", i - 1), vec![format!("unit_{i}")]);
    }
    source
}

/// Layers of `width` units, each depending on every unit of the next layer
fn generate_diamond(width: usize, depth: usize) -> BenchSource {
    let mut source = BenchSource::default();
    let mut prev_level = vec!["root".to_string()];

    for level in 0..depth {
        let current_level: Vec<String> = (0..width)
            .map(|w| format!("level_{level}_unit_{w}"))
            .collect();
        for name in &prev_level {
            source.edges.insert(name.clone(), current_level.clone());
        }
        prev_level = current_level;
    }

    source
}

/// Depfile text with `rules` rule lines, one of them per edge of `main`
fn generate_depfile(rules: usize) -> String {
    let mut text = String::new();
    for i in 0..rules {
        let target = if i % 4 == 0 { "main" } else { "other" };
        let _ = writeln!(text, "_build/exe/{target}.ok: _build/exe/dep_{i}.ok");
    }
    text
}

fn benchmark_deep_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_chain_closure");

    for depth in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let source = generate_deep_chain(depth);
            b.iter(|| black_box(closure(&mut source.clone(), "unit_0").unwrap()));
        });
    }

    group.finish();
}

fn benchmark_diamond(c: &mut Criterion) {
    let mut group = c.benchmark_group("diamond_closure");

    for (width, depth) in [(5, 5), (10, 5), (5, 10), (10, 10)] {
        let label = format!("w{width}_d{depth}");
        group.bench_with_input(
            BenchmarkId::from_parameter(&label),
            &(width, depth),
            |b, &(width, depth)| {
                let source = generate_diamond(width, depth);
                b.iter(|| black_box(closure(&mut source.clone(), "root").unwrap()));
            },
        );
    }

    group.finish();
}

fn benchmark_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_targets");
    let build_dir = BuildDir::new("_build/exe").unwrap();

    for rules in [10, 100, 1_000] {
        let text = generate_depfile(rules);
        for mode in [ExtractMode::Anchored, ExtractMode::Rule] {
            let label = format!("{mode:?}_{rules}");
            group.bench_with_input(BenchmarkId::from_parameter(&label), &text, |b, text| {
                b.iter(|| black_box(extract_from_str(&build_dir, text, "main", mode).unwrap()));
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_deep_chain,
    benchmark_diamond,
    benchmark_extraction,
);

criterion_main!(benches);
