//! Rendering benchmarks
//!
//! Benchmarks for item rendering and in-memory queries over a synthetic
//! contact set.

use criterion::{criterion_group, criterion_main, Criterion};
use sitehits::backend::{InMemoryBackend, SearchBackend, SearchRequest};
use sitehits::config::FieldSpec;
use sitehits::record::ResultRecord;
use sitehits::render::render_item;
use sitehits::render::{html::item_html, text::item_text};

fn contact(i: usize) -> ResultRecord {
    ResultRecord::new()
        .with_field("domain", format!("company{}.com", i))
        .with_field("Company Legal Name", format!("Company {} Holdings LLC", i))
        .with_field("addresses", format!("{} Main Street, Springfield, IL 62701", i))
        .with_field("phone_numbers", format!("555-{:03}-{:04}", i % 1000, i))
        .with_matches("domain", [(0, 7)])
        .with_matches("Company Legal Name", [(0, 7), (8, 1)])
}

fn benchmark_render_item(c: &mut Criterion) {
    let spec = FieldSpec::default();
    let records: Vec<ResultRecord> = (0..5).map(contact).collect();

    c.bench_function("render_page_html", |b| {
        b.iter(|| {
            records
                .iter()
                .map(|r| item_html(&render_item(r, &spec)))
                .collect::<Vec<_>>()
        });
    });

    c.bench_function("render_page_text", |b| {
        b.iter(|| {
            records
                .iter()
                .map(|r| item_text(&render_item(r, &spec)))
                .collect::<Vec<_>>()
        });
    });
}

fn benchmark_memory_query(c: &mut Criterion) {
    let backend = InMemoryBackend::new((0..2000).map(contact).collect());
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(_) => {
            println!("Skipping memory query benchmark: could not start runtime");
            return;
        }
    };

    const TEST_QUERIES: &[&str] = &["company", "springfield", "555", "holdings llc", "zzz"];

    c.bench_function("memory_query_throughput", |b| {
        let mut query_idx = 0;
        b.iter(|| {
            let query = TEST_QUERIES[query_idx % TEST_QUERIES.len()];
            let request = SearchRequest::new("contacts", query, 5);
            let _ = runtime.block_on(backend.query(&request));
            query_idx += 1;
        });
    });
}

criterion_group!(benches, benchmark_render_item, benchmark_memory_query);
criterion_main!(benches);
