use criterion::{black_box, criterion_group, criterion_main, Criterion};
use livepage_dom::{parse, serialize};

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Landing</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50">
  <header class="p-4 bg-blue-600 text-white"><h1 class="text-2xl">Acme</h1></header>
  <main class="p-8">
    <section class="grid gap-4">
      <div class="p-4 bg-white"><h2>Fast</h2><p>Ship in minutes &amp; iterate.</p></div>
      <div class="p-4 bg-white"><h2>Safe</h2><p>Everything stays in the sandbox.</p></div>
      <div class="p-4 bg-white"><h2>Simple</h2><p>Drag, click, type.</p></div>
    </section>
    <ul><li>One</li><li>Two</li><li>Three</li></ul>
  </main>
  <script>document.querySelector('h1').addEventListener('click', () => alert(1 < 2));</script>
</body>
</html>"#;

fn parse_landing_page(c: &mut Criterion) {
    c.bench_function("parse_landing_page", |b| {
        b.iter(|| parse(black_box(LANDING_PAGE)))
    });
}

fn serialize_landing_page(c: &mut Criterion) {
    let doc = parse(LANDING_PAGE);
    c.bench_function("serialize_landing_page", |b| {
        b.iter(|| serialize(black_box(&doc)))
    });
}

criterion_group!(benches, parse_landing_page, serialize_landing_page);
criterion_main!(benches);
