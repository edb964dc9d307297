use proptest::prelude::*;
use strata_noise::{BlueNoiseParams, blue_noise_points};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // No two accepted points are closer than min_distance, and all lie in bounds
    #[test]
    fn accepted_points_respect_min_distance(
        seed in any::<i64>(),
        min_distance in 1.5f32..6.0,
        max_attempts in 1u32..24,
        w in 4usize..40,
        h in 4usize..40,
    ) {
        let params = BlueNoiseParams { seed, min_distance, max_attempts };
        let pts = blue_noise_points(&params, w, h).unwrap();
        prop_assert!(!pts.is_empty());
        let min_sq = min_distance * min_distance;
        for (i, a) in pts.iter().enumerate() {
            prop_assert!(a.x >= 0.0 && a.x < w as f32 && a.y >= 0.0 && a.y < h as f32);
            for b in &pts[i + 1..] {
                prop_assert!(a.distance_sq(*b) >= min_sq * (1.0 - 1e-5));
            }
        }
    }

    // Same seed, same points
    #[test]
    fn dart_throwing_is_deterministic(seed in any::<i64>()) {
        let params = BlueNoiseParams { seed, min_distance: 2.0, max_attempts: 16 };
        prop_assert_eq!(
            blue_noise_points(&params, 24, 24).unwrap(),
            blue_noise_points(&params, 24, 24).unwrap()
        );
    }
}
