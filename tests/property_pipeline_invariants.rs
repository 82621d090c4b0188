use proptest::prelude::*;

use fatiguetracking::{
    decode, FeatureNormalizer, Landmark, LandmarkSet, PipelineConfig, TemporalWindow,
};

fn landmark() -> impl Strategy<Value = Landmark> {
    (-0.5_f32..1.5, -0.5_f32..1.5).prop_map(|(x, y)| Landmark::new(x, y))
}

proptest! {
    #[test]
    fn pt_feature_vector_is_always_2k(
        points in prop::collection::vec(landmark(), 0..500),
        present in any::<bool>(),
    ) {
        let normalizer = FeatureNormalizer::from_config(&PipelineConfig::default()).unwrap();
        let face = LandmarkSet::new(points);
        let features = normalizer.normalize(present.then_some(&face));

        prop_assert_eq!(features.len(), 2 * normalizer.selector().len());
        prop_assert!(features.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn pt_window_never_exceeds_capacity(capacity in 1_usize..64, pushes in 0_usize..200) {
        let mut window = TemporalWindow::new(capacity, 4);
        for i in 0..pushes {
            window.push(&[i as f32; 4]).unwrap();
            prop_assert!(window.len() <= capacity);
        }
        prop_assert_eq!(window.len(), pushes.min(capacity));
        prop_assert_eq!(window.is_ready(), pushes >= capacity);
    }

    #[test]
    fn pt_window_keeps_the_newest_in_order(capacity in 1_usize..32, extra in 1_usize..100) {
        let pushes = capacity + extra;
        let mut window = TemporalWindow::new(capacity, 2);
        for i in 0..pushes {
            window.push(&[i as f32, 0.0]).unwrap();
        }

        let expected: Vec<f32> = ((pushes - capacity)..pushes).map(|i| i as f32).collect();
        prop_assert_eq!(window.snapshot().column(0).to_vec(), expected);
    }

    #[test]
    fn pt_coincident_fiducials_leave_offsets_unscaled(
        anchor in landmark(),
        corner in landmark(),
        feature in landmark(),
    ) {
        let mut points = vec![Landmark::new(0.0, 0.0); 468];
        points[1] = anchor;
        points[33] = corner;
        points[263] = corner;
        points[0] = feature;
        let face = LandmarkSet::new(points);

        let normalizer = FeatureNormalizer::from_config(&PipelineConfig::default()).unwrap();
        prop_assert_eq!(normalizer.reference_scale(&face), 1.0);

        // index 0 is the first selected landmark
        let features = normalizer.normalize(Some(&face));
        prop_assert!((features[0] - (feature.x - anchor.x)).abs() < 1e-6);
        prop_assert!((features[1] - (feature.y - anchor.y)).abs() < 1e-6);
    }

    #[test]
    fn pt_eye_distance_below_epsilon_is_unscaled(
        anchor in landmark(),
        corner in landmark(),
        gap in 0.0_f32..5e-6,
        feature in landmark(),
    ) {
        let mut points = vec![Landmark::new(0.0, 0.0); 468];
        points[1] = anchor;
        points[33] = corner;
        points[263] = Landmark::new(corner.x + gap, corner.y);
        points[0] = feature;
        let face = LandmarkSet::new(points);

        let normalizer = FeatureNormalizer::from_config(&PipelineConfig::default()).unwrap();
        prop_assert_eq!(normalizer.reference_scale(&face), 1.0);
        prop_assert!(normalizer.normalize(Some(&face)).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn pt_argmax_returns_first_maximum(scores in prop::collection::vec(-10.0_f32..10.0, 2..16)) {
        let best = decode(&scores).unwrap();
        let max = scores.iter().cloned().fold(f32::MIN, f32::max);

        prop_assert_eq!(scores[best], max);
        prop_assert!(scores[..best].iter().all(|&s| s < max));
    }
}
