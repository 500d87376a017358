use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use num_complex::Complex64;
use strided_fft::{FftOptions, fft_in_place, transform_split_in_place};

fn signal(n: usize) -> Vec<Complex64> {
    (0..n)
        .map(|k| {
            let t = k as f64 * 0.37;
            Complex64::new(t.sin(), (t * 1.7).cos())
        })
        .collect()
}

fn bench_pow2(c: &mut Criterion) {
    let mut group = c.benchmark_group("pow2");
    for log2n in [8u32, 10, 12, 14, 16] {
        let n = 1usize << log2n;
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut data = signal(n);
            b.iter(|| fft_in_place(&mut data, 1.0).unwrap());
        });
    }
    group.finish();
}

fn bench_pow2_scalar_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("pow2_scalar");
    let opts = FftOptions { feature_mask: Some(0), multipass_hook: None };
    for log2n in [10u32, 14] {
        let n = 1usize << log2n;
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut re: Vec<f64> = (0..n).map(|k| (k as f64 * 0.37).sin()).collect();
            let mut im = vec![0.0f64; n];
            b.iter(|| {
                transform_split_in_place(
                    strided_fft::Direction::Forward,
                    &mut re,
                    &mut im,
                    1.0,
                    &opts,
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_bluestein(c: &mut Criterion) {
    let mut group = c.benchmark_group("bluestein");
    for n in [1000usize, 1009, 10007] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut data = signal(n);
            b.iter(|| fft_in_place(&mut data, 1.0).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pow2, bench_pow2_scalar_only, bench_bluestein);
criterion_main!(benches);
