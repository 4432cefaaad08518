use cumulus::{
    CancelToken, PerlinField, PipelineConfig, build_circle_chain, generate_noise_path,
    geom::heading_deg, run_cloud_pipeline,
};
use kurbo::Point;
use rand::{SeedableRng, rngs::StdRng};

fn noisy_baseline(seed: u64) -> Vec<Point> {
    let field = PerlinField::new(seed as u32);
    let token = CancelToken::new();
    generate_noise_path(
        Point::new(-50.0, 400.0),
        Point::new(1650.0, 400.0),
        0.002,
        180.0,
        &field,
        &token,
    )
}

#[test]
fn every_chain_from_noisy_baselines_keeps_the_overlap_invariant() {
    let token = CancelToken::new();
    for seed in 0..8 {
        let baseline = noisy_baseline(seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let chain = build_circle_chain(&baseline, 30.0, 240.0, &mut rng, &token).unwrap();

        assert!(chain.len() >= 2, "seed {seed} produced a short chain");
        for (i, pair) in chain.windows(2).enumerate() {
            let d = pair[0].center.distance(pair[1].center);
            assert!(
                d <= pair[0].radius + pair[1].radius + 1e-9,
                "seed {seed}: circles {i},{} are {d} apart",
                i + 1
            );
        }
    }
}

#[test]
fn final_circle_extends_along_the_baseline_exit() {
    let token = CancelToken::new();
    for seed in 0..8 {
        let baseline = noisy_baseline(seed);
        let end = *baseline.last().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let chain = build_circle_chain(&baseline, 30.0, 240.0, &mut rng, &token).unwrap();

        let prev = chain[chain.len() - 2];
        let last = chain[chain.len() - 1];
        let expected = heading_deg(prev.center, end);
        let actual = heading_deg(prev.center, last.center);
        assert!(
            (expected - actual).abs() < 1e-6,
            "seed {seed}: exit heading {actual} != {expected}"
        );
    }
}

#[test]
fn both_pipeline_passes_satisfy_the_invariant() {
    let mut cfg = PipelineConfig::new(800.0, 600.0, 40.0);
    cfg.layer_count = 3;
    cfg.capture_debug = true;

    let field = PerlinField::new(21);
    let mut rng = StdRng::seed_from_u64(21);
    let token = CancelToken::new();
    let clouds = run_cloud_pipeline(&cfg, &field, &mut rng, &token).unwrap();

    for layer in clouds.debug.unwrap() {
        for chain in [&layer.coarse_circles, &layer.fine_circles] {
            for pair in chain.windows(2) {
                assert!(pair[0].overlaps(&pair[1]));
            }
        }
    }
}
