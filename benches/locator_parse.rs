//! Locator benchmark suite.
//!
//! Measures the per-call cost paid before any session round trip:
//! - Parsing `<strategy>=<value>` strings
//! - Expanding and binding `%s` templates
//!
//! Run with: cargo bench --bench locator_parse
//! Results saved to: target/criterion/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use page_engine::{By, LocatorTemplate};

// ============================================================================
// Benchmark Inputs
// ============================================================================

const RAW_LOCATORS: &[(&str, &str)] = &[
    ("id", "id=username"),
    ("css", "css=div.catalog > ul li:nth-child(2) a[href^='/p/']"),
    ("xpath", "XPATH=//table[@id='cart']//tr[td[1][normalize-space()='A-17']]/td[3]"),
];

const TEMPLATE: &str = "xpath=//table[@id='%s']//tr[%s]/td[%s]";

// ============================================================================
// Benchmark: Parse
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &(name, raw) in RAW_LOCATORS {
        group.bench_with_input(BenchmarkId::from_parameter(name), raw, |b, raw| {
            b.iter(|| By::parse(black_box(raw)));
        });
    }

    group.bench_function("unsupported", |b| {
        b.iter(|| By::parse(black_box("link=Home")));
    });

    group.finish();
}

// ============================================================================
// Benchmark: Templates
// ============================================================================

fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("template");
    let template = LocatorTemplate::new(TEMPLATE);
    let args = ["cart", "4", "3"];

    group.bench_function("expand", |b| {
        b.iter(|| template.expand(black_box(&args)));
    });

    group.bench_function("bind", |b| {
        b.iter(|| template.bind(black_box(&args)));
    });

    group.bench_function("mismatch", |b| {
        b.iter(|| template.expand(black_box(&["cart"])));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_template);
criterion_main!(benches);
