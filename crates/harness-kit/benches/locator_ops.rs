//! Locator Operations Benchmarks
//!
//! Benchmarks for selector splitting, mock selector matching and harness lookups.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use futures::executor::block_on;
use harness_kit::prelude::*;
use harness_kit::testing::{MockDocument, SelectorList};
use harness_kit::{combine_selectors, split_selector_groups};

fn bench_selector_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_parsing");

    let selectors = vec![
        ("simple_id", "#my-button"),
        ("simple_class", ".btn-primary"),
        ("tag", "button"),
        ("attribute", "[data-testid=\"submit\"]"),
        ("complex", "div.container > button.btn-primary:first-child"),
        ("multiple_classes", ".btn.btn-lg.btn-primary"),
        ("descendant", "form input[type=\"text\"]"),
        ("group", ".ui-button, .ui-raised-button, .ui-fab"),
    ];

    for (name, selector) in selectors {
        group.bench_with_input(BenchmarkId::from_parameter(name), &selector, |bench, sel| {
            bench.iter(|| {
                let parsed = SelectorList::parse(black_box(sel)).unwrap();
                black_box(parsed);
            });
        });
    }

    group.finish();
}

fn bench_selector_combination(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_combination");

    for width in [1usize, 2, 4, 8] {
        let list: Vec<String> = (0..width).map(|i| format!(".c{i}")).collect();
        let list = list.join(", ");
        group.bench_with_input(BenchmarkId::from_parameter(width), &list, |bench, list| {
            bench.iter(|| {
                let combined = combine_selectors(black_box(list), black_box(list)).unwrap();
                black_box(split_selector_groups(&combined).unwrap());
            });
        });
    }

    group.finish();
}

fn button_page(count: usize) -> MockDocument {
    let html: String = (0..count)
        .map(|i| {
            let text = if i % 2 == 0 { "Save" } else { "Cancel" };
            format!("<div class='row'><button class='ui-button'>{text}</button></div>")
        })
        .collect();
    MockDocument::from_html(&html).unwrap()
}

fn bench_harness_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("harness_lookup");

    for count in [10usize, 100, 500] {
        let document = button_page(count);
        let loader = document.loader();
        group.bench_with_input(BenchmarkId::new("all", count), &loader, |bench, loader| {
            bench.iter(|| {
                let found = block_on(loader.get_all_harnesses(ButtonHarness::query())).unwrap();
                black_box(found);
            });
        });
        group.bench_with_input(BenchmarkId::new("text_filter", count), &loader, |bench, loader| {
            bench.iter(|| {
                let query = ButtonHarness::with(ButtonFilters {
                    text: Some("Save".into()),
                    ..Default::default()
                });
                let found = block_on(loader.get_all_harnesses(query)).unwrap();
                black_box(found);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_selector_parsing,
    bench_selector_combination,
    bench_harness_lookup
);
criterion_main!(benches);
