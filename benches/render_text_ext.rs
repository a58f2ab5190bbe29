// Run with:  cargo bench --bench render_text_ext

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tm1640_chain::font::Font5x7;
use tm1640_chain::frame::ExtendedFrame;
use tm1640_chain::mapping::Orientation;
use tm1640_chain::text::draw_text;
use tm1640_chain::{
    compute_extended_height, compute_extended_width, compute_plane_bytes, Color,
};

const MODULES: usize = 5;
const MARGIN: usize = 8;
const EXT_W: usize = compute_extended_width(Orientation::Horizontal, MODULES, MARGIN);
const EXT_H: usize = compute_extended_height(Orientation::Horizontal, MODULES, MODULES, MARGIN);
const PLANE_BYTES: usize = compute_plane_bytes(EXT_W, EXT_H);

type BenchFrame = ExtendedFrame<EXT_W, EXT_H, PLANE_BYTES>;

// Three representative strings of different lengths; the longer ones run
// mostly off the right edge and exercise the clipping path.
const TEST_STRINGS: &[(&str, &str)] = &[
    ("short", "HI"),
    ("medium", "HELLO"),
    ("long", "THE QUICK BROWN FOX"),
];

fn render_text_ext(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_text_ext");

    for (case, text) in TEST_STRINGS {
        // 5x7 cell plus the inter-character gap
        group.throughput(Throughput::Elements(text.len() as u64 * 6 * 7));

        group.bench_with_input(BenchmarkId::new("draw_text", case), text, |b, text| {
            let mut frame = BenchFrame::new();
            b.iter(|| {
                frame.clear();
                black_box(draw_text(
                    black_box(&mut frame),
                    black_box(&Font5x7),
                    black_box(text),
                    black_box(MARGIN as i32),
                    black_box(MARGIN as i32),
                    black_box(Color::Red),
                ));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, render_text_ext);
criterion_main!(benches);
