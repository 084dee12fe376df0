//! Benchmarks for the convolution kernels.
//!
//! Run with: cargo bench -p clipforge-ops

use clipforge_core::frame::test_pattern;
use clipforge_ops::{filter, kernel, Kernel};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_gaussian_blur(c: &mut Criterion) {
    let frames = vec![test_pattern(640, 360)];

    c.bench_function("blur_k15_640x360", |bencher| {
        bencher.iter(|| filter::blur(black_box(&frames), 15));
    });

    let taps = kernel::gaussian_kernel(15, kernel::default_sigma(15));
    c.bench_function("separable_k15_640x360", |bencher| {
        bencher.iter(|| kernel::separable_filter(black_box(&frames[0]), &taps, &taps));
    });
}

fn bench_filter2d(c: &mut Criterion) {
    let frame = test_pattern(640, 360);
    let sharpen = Kernel::square3([-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0]);

    c.bench_function("filter2d_3x3_640x360", |bencher| {
        bencher.iter(|| kernel::filter2d(black_box(&frame), &sharpen));
    });

    let motion = filter::motion_kernel(15, 30.0);
    if let Ok(motion) = motion {
        c.bench_function("filter2d_motion15_640x360", |bencher| {
            bencher.iter(|| kernel::filter2d(black_box(&frame), &motion));
        });
    }
}

criterion_group!(benches, bench_gaussian_blur, bench_filter2d);
criterion_main!(benches);
