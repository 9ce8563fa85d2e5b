use criterion::{black_box, criterion_group, criterion_main, Criterion};
use livepage_dom::parse;
use livepage_runtime::{inject_runtime, serialize_clean, BlockLayout, Geometry, Point};

fn page() -> String {
    let mut body = String::new();
    for i in 0..200 {
        body.push_str(&format!(
            "<section class=\"bg-gray-100 p-4\"><h2>Section {i}</h2><p style=\"color: #333;\">Body copy for section {i}.</p></section>"
        ));
    }
    inject_runtime(&format!(
        "<!DOCTYPE html>\n<html><head><title>Bench</title></head><body>{body}</body></html>"
    ))
}

fn bench_serialize_clean(c: &mut Criterion) {
    let doc = parse(&page());
    c.bench_function("serialize_clean_200_sections", |b| {
        b.iter(|| serialize_clean(black_box(&doc)))
    });
}

fn bench_reflow_and_hit_test(c: &mut Criterion) {
    let doc = parse(&page());
    let mut layout = BlockLayout::new(1280.0);
    c.bench_function("reflow_then_hit_test", |b| {
        b.iter(|| {
            layout.reflow(black_box(&doc));
            layout.hit_test(&doc, Point::new(40.0, 4000.0))
        })
    });
}

criterion_group!(benches, bench_serialize_clean, bench_reflow_and_hit_test);
criterion_main!(benches);
