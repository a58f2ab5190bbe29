// Run with:  cargo bench --bench set_pixel_ext

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use tm1640_chain::frame::ExtendedFrame;
use tm1640_chain::mapping::Orientation;
use tm1640_chain::{
    compute_extended_height, compute_extended_width, compute_plane_bytes, Color,
};

// 5-module horizontal chain with a one-module margin
const MODULES: usize = 5;
const MARGIN: usize = 8;
const EXT_W: usize = compute_extended_width(Orientation::Horizontal, MODULES, MARGIN);
const EXT_H: usize = compute_extended_height(Orientation::Horizontal, MODULES, MODULES, MARGIN);
const PLANE_BYTES: usize = compute_plane_bytes(EXT_W, EXT_H);

fn set_pixel_ext(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_pixel_ext");
    group.throughput(Throughput::Elements((EXT_W * EXT_H) as u64));

    group.bench_function("extended_frame", |b| {
        let mut frame = ExtendedFrame::<EXT_W, EXT_H, PLANE_BYTES>::new();

        b.iter(|| {
            for y in 0..EXT_H {
                for x in 0..EXT_W {
                    black_box(&mut frame).set_pixel(
                        black_box(x as i32),
                        black_box(y as i32),
                        black_box(Color::Orange),
                    );
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, set_pixel_ext);
criterion_main!(benches);
