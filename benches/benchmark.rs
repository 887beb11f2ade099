//! Performance benchmarks for webscope.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use webscope::bridge::DomBridge;
use webscope::{extract_with_scope, Format, Scope};

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Article</title>
    <meta name="author" content="John Doe">
    <meta name="description" content="A sample article for benchmarking.">
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/about">About</a>
    </nav>
    <article>
        <h1>Sample Article Title</h1>
        <p class="byline">By John Doe</p>
        <p>This is the first paragraph of the article. It contains some meaningful
        content that should be extracted by the extraction engine.</p>
        <p>Here is a second paragraph with more content. The extraction should
        preserve the text while removing navigation and other boilerplate.</p>
        <p>A third paragraph ensures we have enough content for meaningful
        benchmarking of the extraction performance.</p>
    </article>
    <aside>
        <h3>Related Articles</h3>
        <ul>
            <li>Related article 1</li>
            <li>Related article 2</li>
        </ul>
    </aside>
    <footer>
        <p>Copyright 2024</p>
    </footer>
</body>
</html>
"#;

fn bench_bridge_construction(c: &mut Criterion) {
    c.bench_function("bridge_construction", |b| {
        b.iter(|| DomBridge::new(black_box(SAMPLE_HTML)));
    });
}

fn bench_main_scope_html(c: &mut Criterion) {
    c.bench_function("main_scope_html", |b| {
        b.iter(|| {
            extract_with_scope(
                black_box(SAMPLE_HTML),
                &Scope::Main,
                Format::Html,
                "https://example.com/",
                None,
            )
        });
    });
}

fn bench_main_scope_markdown(c: &mut Criterion) {
    c.bench_function("main_scope_markdown", |b| {
        b.iter(|| {
            extract_with_scope(
                black_box(SAMPLE_HTML),
                &Scope::Main,
                Format::Markdown,
                "https://example.com/",
                None,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_bridge_construction,
    bench_main_scope_html,
    bench_main_scope_markdown
);
criterion_main!(benches);
