//! Basic example demonstrating colorkmeans-rs usage
//!
//! Run with: cargo run --example basic --release

use colorkmeans_rs::{
    ColorKMeans, ConvergenceMode, ImageSource, InitMode, PixelGrid, QuantizeConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("=== colorkmeans-rs example ===\n");

    // Synthetic 48x48 image: pixels scattered around three base colors
    let width = 48;
    let height = 48;
    let centers = [[200u8, 40, 40], [40, 160, 60], [50, 60, 210]];
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let pixels: Vec<u32> = (0..width * height)
        .map(|i| {
            let [r, g, b] = centers[(i / width * 3) / height];
            let mut jitter = |c: u8| (c as i32 + rng.gen_range(-12..=12)).clamp(0, 255) as u32;
            0xFF00_0000 | jitter(r) << 16 | jitter(g) << 8 | jitter(b)
        })
        .collect();
    let image = PixelGrid::new(width, height, pixels).expect("Invalid image");

    println!("Base colors:");
    for (i, [r, g, b]) in centers.iter().enumerate() {
        println!("  Color {}: #{:02X}{:02X}{:02X}", i, r, g, b);
    }
    println!("Distinct colors in the image: {}\n", image.distinct_colors());

    let config = QuantizeConfig::new(centers.len())
        .with_init_mode(InitMode::StratifiedSampling)
        .with_convergence_mode(ConvergenceMode::Stability)
        .with_threshold(1e-3)
        .with_max_iters(30)
        .with_seed(42);

    println!("Running k-means with k={}...\n", config.k);

    let mut kmeans = ColorKMeans::with_config(config);
    let filtered = kmeans.fit_predict(&image).expect("Quantization failed");
    let report = kmeans.report().expect("Missing report");

    println!("\nLearned palette after {} iterations:", report.iterations);
    for (i, centroid) in report.palette.iter().enumerate() {
        println!(
            "  Centroid {}: #{:06X} ({:.3}, {:.3}, {:.3})",
            i,
            centroid.index() & 0x00FF_FFFF,
            centroid.red(),
            centroid.green(),
            centroid.blue()
        );
    }
    println!();

    // Count pixels per palette color
    let palette = report.palette_indices();
    let mut counts = vec![0usize; palette.len()];
    for pixel in filtered.pixels() {
        if let Some(slot) = palette.iter().position(|p| p == pixel) {
            counts[slot] += 1;
        }
    }

    println!("Pixel distribution:");
    for (i, count) in counts.iter().enumerate() {
        println!(
            "  Centroid {}: {} pixels ({:.1}%)",
            i,
            count,
            (*count as f64 / filtered.len() as f64) * 100.0
        );
    }

    println!("\n=== Done! ===");
}
