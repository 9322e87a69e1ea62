use colorkmeans_rs::{ColorKMeans, ConvergenceMode, InitMode, PixelGrid, QuantizeConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

fn random_image(side: usize, seed: u64) -> PixelGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pixels = (0..side * side)
        .map(|_| 0xFF00_0000 | rng.gen_range(0..0x0100_0000u32))
        .collect();
    PixelGrid::new(side, side, pixels).unwrap()
}

fn benchmark_varying_pixels(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_pixels");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let k = 16;
    // 64x64 stays below the parallel threshold, the others go through rayon
    let sides = [32, 64, 128, 256];

    for side in sides.iter() {
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, &side| {
            let image = random_image(side, 42);
            let config = QuantizeConfig::new(k).with_max_iters(5).with_seed(42);

            b.iter(|| {
                let mut kmeans = ColorKMeans::with_config(config.clone());
                kmeans.train(black_box(&image)).unwrap();
                kmeans
            });
        });
    }
    group.finish();
}

fn benchmark_varying_colors(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_colors");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let image = random_image(128, 7);
    let color_counts = [4, 16, 64];

    for k in color_counts.iter() {
        group.throughput(Throughput::Elements(*k as u64));
        group.bench_with_input(BenchmarkId::from_parameter(k), k, |b, &k| {
            let config = QuantizeConfig::new(k).with_max_iters(5).with_seed(42);

            b.iter(|| {
                let mut kmeans = ColorKMeans::with_config(config.clone());
                kmeans.train(black_box(&image)).unwrap();
                kmeans
            });
        });
    }
    group.finish();
}

fn benchmark_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_strategies");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let image = random_image(96, 11);

    for init in InitMode::ALL {
        for convergence in ConvergenceMode::ALL {
            let name = format!("{}_{}", init, convergence);
            let config = QuantizeConfig::new(12)
                .with_init_mode(init)
                .with_convergence_mode(convergence)
                .with_threshold(1e-4)
                .with_max_iters(8)
                .with_seed(42);

            group.bench_function(name, |b| {
                b.iter(|| {
                    let mut kmeans = ColorKMeans::with_config(config.clone());
                    kmeans.train(black_box(&image)).unwrap();
                    kmeans
                });
            });
        }
    }
    group.finish();
}

fn benchmark_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize_predict");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    // Pre-train the palette
    let train_image = random_image(64, 3);
    let mut kmeans = ColorKMeans::with_config(QuantizeConfig::new(32).with_max_iters(10).with_seed(42));
    kmeans.train(&train_image).unwrap();

    let sides = [64, 256];
    for side in sides.iter() {
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, &side| {
            let image = random_image(side, 5);

            b.iter(|| kmeans.predict(black_box(&image)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_varying_pixels,
    benchmark_varying_colors,
    benchmark_strategies,
    benchmark_predict,
);
criterion_main!(benches);
