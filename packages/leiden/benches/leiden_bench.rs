use annotator_leiden::{from_display, render, render_html, visible_text};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_transcription(lines: usize) -> String {
    let mut source = String::new();
    for i in 0..lines {
        source.push_str(&format!(
            r#"<w id="{}" type="person" part="I">Titi<ex>us</ex></w> <del rend="erasure">dedit</del> <supplied reason="lost" cert="low">Ro</supplied>ma <gap reason="lost" quantity="3"/><g type="cross"/><lb/>"#,
            i + 1
        ));
        source.push('\n');
    }
    source
}

fn render_line(c: &mut Criterion) {
    let source = build_transcription(1);
    c.bench_function("render_single_line", |b| b.iter(|| render(black_box(&source))));
}

fn render_page(c: &mut Criterion) {
    let source = build_transcription(500);
    c.bench_function("render_500_lines", |b| b.iter(|| render(black_box(&source))));
}

fn round_trip_page(c: &mut Criterion) {
    let source = build_transcription(500);
    c.bench_function("round_trip_500_lines", |b| {
        b.iter(|| from_display(&render(black_box(&source))))
    });
}

fn text_and_html_page(c: &mut Criterion) {
    let nodes = render(&build_transcription(500));
    c.bench_function("visible_text_500_lines", |b| {
        b.iter(|| visible_text(black_box(&nodes)))
    });
    c.bench_function("render_html_500_lines", |b| {
        b.iter(|| render_html(black_box(&nodes)))
    });
}

criterion_group!(
    benches,
    render_line,
    render_page,
    round_trip_page,
    text_and_html_page
);
criterion_main!(benches);
