extern crate criterion;

use criterion::{criterion_group, criterion_main, Criterion};

use stylescope_lib::page::{NoLoader, Page};
use stylescope_lib::{inspect_element, InspectorConfig};

fn large_page() -> String {
    let mut html = String::with_capacity(4_000_000);
    html.push_str("<html><head><style>");
    for i in 0..2_000 {
        html.push_str(&format!(
            ".item-{i} {{ width: {i}px; color: red }} \
             .list .item-{i}:hover {{ color: green }} \
             @media print {{ .item-{i} {{ display: none }} }}\n"
        ));
    }
    html.push_str("div p { margin: 0 } #target.item-7 { padding: 4px }");
    html.push_str("</style></head><body><div class=\"list\">");
    for i in 0..20_000 {
        html.push_str(&format!("<p class=\"item-{}\">Item</p>", i % 2_000));
    }
    html.push_str("<p id=\"target\" class=\"item-7\" style=\"font-size: 20px\">Target</p></div></body></html>");
    html
}

fn bench_parse_page(c: &mut Criterion) {
    let html = large_page();
    c.bench_function("parse_page", |b| {
        b.iter(|| Page::parse(&html, None, &NoLoader))
    });
}

fn bench_inspect_element(c: &mut Criterion) {
    let Ok(page) = Page::parse(&large_page(), None, &NoLoader) else {
        return;
    };
    let Some(target) = page.element_by_id("target") else {
        return;
    };
    let config = InspectorConfig::default();

    c.bench_function("inspect_element", |b| {
        b.iter(|| inspect_element(&page, &target, &config))
    });
}

fn bench_deep_nesting(c: &mut Criterion) {
    let mut html = String::from("<style>div div span { color: red } div > span { width: 1px }</style>");
    for _ in 0..1000 {
        html.push_str("<div>");
    }
    html.push_str("<span id=\"leaf\">Content</span>");
    for _ in 0..1000 {
        html.push_str("</div>");
    }
    let Ok(page) = Page::parse(&html, None, &NoLoader) else {
        return;
    };
    let Some(leaf) = page.element_by_id("leaf") else {
        return;
    };
    let config = InspectorConfig::default();

    c.bench_function("deep_nesting", |b| {
        b.iter(|| inspect_element(&page, &leaf, &config))
    });
}

criterion_group!(benches, bench_parse_page, bench_inspect_element, bench_deep_nesting);
criterion_main!(benches);
