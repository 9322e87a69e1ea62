use colorkmeans_rs::{
    pack_channels, ClusteringEngine, ColorSample, ConvergenceMode, EngineState, InitMode,
    InitializationStrategy, PixelGrid, QuantizeConfig,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn opaque_pixels(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..0x0100_0000, 1..=max_len)
        .prop_map(|colors| colors.into_iter().map(|c| 0xFF00_0000 | c).collect())
}

fn init_mode() -> impl Strategy<Value = InitMode> {
    prop::sample::select(InitMode::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_packing_is_idempotent(index in 0u32..0x0100_0000) {
        let index = 0xFF00_0000 | index;
        let sample = ColorSample::from_index(index);
        prop_assert_eq!(pack_channels(sample.red(), sample.green(), sample.blue()), index);
    }

    #[test]
    fn prop_packed_alpha_is_opaque(r in -1.0f64..2.0, g in -1.0f64..2.0, b in -1.0f64..2.0) {
        prop_assert_eq!(ColorSample::from_channels(r, g, b).alpha(), 255);
    }

    #[test]
    fn prop_distance_is_reflexive_and_symmetric(a in any::<u32>(), b in any::<u32>()) {
        let a = ColorSample::from_index(a);
        let b = ColorSample::from_index(b);
        prop_assert_eq!(a.distance_squared(&a), 0.0);
        prop_assert_eq!(a.distance_squared(&b), b.distance_squared(&a));
    }

    #[test]
    fn prop_single_candidate_is_nearest(a in any::<u32>(), b in any::<u32>()) {
        let candidate = [ColorSample::from_index(b)];
        prop_assert_eq!(ColorSample::from_index(a).nearest_index(&candidate).unwrap(), 0);
    }

    #[test]
    fn prop_initialization_returns_k_centroids(
        pixels in opaque_pixels(64),
        k in 2usize..8,
        mode in init_mode(),
        seed in any::<u64>(),
    ) {
        prop_assume!(pixels.len() >= k);
        let population: Vec<ColorSample> = pixels.iter().map(|&p| ColorSample::from_index(p)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let centroids = mode.strategy().select(&population, k, &mut rng).unwrap();

        prop_assert_eq!(centroids.len(), k);
    }

    #[test]
    fn prop_classification_partitions_samples(
        pixels in opaque_pixels(64),
        k in 1usize..6,
        mode in init_mode(),
        seed in any::<u64>(),
    ) {
        prop_assume!(pixels.len() >= k);
        prop_assume!(mode != InitMode::UniformSelection || k >= 2);
        let len = pixels.len();
        let image = PixelGrid::new(len, 1, pixels).unwrap();
        let config = QuantizeConfig::new(k).with_init_mode(mode).with_max_iters(3);
        let mut engine = ClusteringEngine::new(&config, &image).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        engine.run(&mut rng).unwrap();

        let mut seen: Vec<usize> = engine.classification().iter().flatten().copied().collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..len).collect::<Vec<_>>());
        prop_assert_eq!(engine.classification().len(), k);
        prop_assert_eq!(engine.centroids().len(), k);
    }

    #[test]
    fn prop_iteration_limit_is_exact(
        pixels in opaque_pixels(32),
        max_iters in 1usize..10,
        seed in any::<u64>(),
    ) {
        let len = pixels.len();
        let image = PixelGrid::new(len, 1, pixels).unwrap();
        let config = QuantizeConfig::new(1)
            .with_convergence_mode(ConvergenceMode::IterationLimit)
            .with_max_iters(max_iters);
        let mut engine = ClusteringEngine::new(&config, &image).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        engine.run(&mut rng).unwrap();

        prop_assert_eq!(engine.state(), EngineState::Converged);
        prop_assert_eq!(engine.iterations(), max_iters);
    }

    #[test]
    fn prop_threshold_strategies_never_exceed_limit(
        pixels in opaque_pixels(32),
        threshold in 0.0f64..100.0,
        max_iters in 1usize..8,
        use_noise in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let k = pixels.len().min(3);
        let len = pixels.len();
        let image = PixelGrid::new(len, 1, pixels).unwrap();
        let mode = if use_noise { ConvergenceMode::NoiseRatio } else { ConvergenceMode::Stability };
        let config = QuantizeConfig::new(k)
            .with_convergence_mode(mode)
            .with_threshold(threshold)
            .with_max_iters(max_iters);
        let mut engine = ClusteringEngine::new(&config, &image).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        engine.run(&mut rng).unwrap();

        prop_assert!(engine.iterations() >= 1 && engine.iterations() <= max_iters);
    }
}
