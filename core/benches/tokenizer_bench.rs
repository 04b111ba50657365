use criterion::{criterion_group, criterion_main, Criterion};
use textdex_core::freq::index_document;
use textdex_core::tokenizer::normalize_pair;

fn bench_tokenize(c: &mut Criterion) {
    let text = "The placebo effect was noted near the big oak table, twice over. ".repeat(500);
    c.bench_function("normalize_pair", |b| b.iter(|| normalize_pair(&text)));
    c.bench_function("index_document", |b| b.iter(|| index_document(&text, 10)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
