//! Quantize the colors of an image file with k-means.
//!
//! Usage: `colorkmeans <input> -o <output> -k <colors> [--init uniform] [--convergence noise --threshold 40]`

use clap::{Parser, ValueEnum};
use colorkmeans_rs::{
    ClusterReport, ColorKMeans, ConvergenceMode, ImageSource, InitMode, PixelGrid,
    QuantizeConfig,
};
use log::info;
use std::fmt::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum InitArg {
    Random,
    Uniform,
    Stratified,
}

impl From<InitArg> for InitMode {
    fn from(arg: InitArg) -> Self {
        match arg {
            InitArg::Random => InitMode::RandomSampling,
            InitArg::Uniform => InitMode::UniformSelection,
            InitArg::Stratified => InitMode::StratifiedSampling,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConvergenceArg {
    Iterations,
    Stability,
    Noise,
}

impl From<ConvergenceArg> for ConvergenceMode {
    fn from(arg: ConvergenceArg) -> Self {
        match arg {
            ConvergenceArg::Iterations => ConvergenceMode::IterationLimit,
            ConvergenceArg::Stability => ConvergenceMode::Stability,
            ConvergenceArg::Noise => ConvergenceMode::NoiseRatio,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "colorkmeans", version, about = "Reduce the palette of an image with k-means.")]
struct Args {
    /// Input image
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output image; the format follows the extension
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Number of colors in the output palette
    #[arg(short = 'k', long = "colors", default_value_t = 8)]
    colors: usize,

    /// Centroid initialization strategy
    #[arg(long, value_enum, default_value_t = InitArg::Random)]
    init: InitArg,

    /// Stopping strategy
    #[arg(long, value_enum, default_value_t = ConvergenceArg::Iterations)]
    convergence: ConvergenceArg,

    /// Maximum number of iterations
    #[arg(long, default_value_t = 25)]
    max_iters: usize,

    /// Threshold for the stability and noise strategies
    #[arg(long, default_value_t = 0.0)]
    threshold: f64,

    /// Random seed; omit for a non-reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Log every iteration
    #[arg(short, long)]
    verbose: bool,
}

/// Summary printed after a run: time, iterations, measure, color counts and
/// the palette.
fn render_report(
    report: &ClusterReport,
    colors_before: usize,
    colors_after: usize,
    elapsed: Duration,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "time:               {:.3}s", elapsed.as_secs_f64());
    let _ = writeln!(out, "iterations:         {}", report.iterations);
    let _ = writeln!(
        out,
        "{} measure: {:.6}",
        report.convergence_mode, report.convergence_measure
    );
    let _ = writeln!(out, "colors:             {} -> {}", colors_before, colors_after);
    for centroid in &report.palette {
        let _ = writeln!(out, "  #{:06X}", centroid.index() & 0x00FF_FFFF);
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let image = PixelGrid::open(&args.input)?;
    info!(
        "Loaded {}: {}x{}, {} distinct colors",
        args.input.display(),
        image.width(),
        image.height(),
        image.distinct_colors()
    );

    let config = QuantizeConfig {
        k: args.colors,
        init_mode: args.init.into(),
        convergence_mode: args.convergence.into(),
        max_iters: args.max_iters,
        threshold: args.threshold,
        seed: args.seed,
    };

    let mut kmeans = ColorKMeans::with_config(config);
    let start = Instant::now();
    let filtered = kmeans.fit_predict(&image)?;
    let elapsed = start.elapsed();
    let report = kmeans.report().ok_or("No report after training")?;

    print!(
        "{}",
        render_report(report, image.distinct_colors(), filtered.distinct_colors(), elapsed)
    );

    filtered.save(&args.output)?;
    info!("Saved {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_includes_elapsed_time() {
        let report = ClusterReport {
            palette: vec![colorkmeans_rs::ColorSample::from_index(0xFFFF_0000)],
            iterations: 3,
            convergence_measure: 3.0,
            init_mode: InitMode::UniformSelection,
            convergence_mode: ConvergenceMode::IterationLimit,
        };

        let text = render_report(&report, 5, 1, Duration::from_millis(1250));

        assert!(text.contains("time:               1.250s"));
        assert!(text.contains("iterations:         3"));
        assert!(text.contains("colors:             5 -> 1"));
        assert!(text.contains("#FF0000"));
    }
}
