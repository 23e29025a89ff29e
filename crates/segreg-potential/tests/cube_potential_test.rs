use std::sync::Arc;

use burn::tensor::{Tensor, TensorData};
use burn_ndarray::NdArray;
use proptest::prelude::*;
use segreg_core::image::Image;
use segreg_core::spatial::{Direction3, Point3, Spacing3, Vector3};
use segreg_potential::{
    PairwisePotentialEvaluator, PotentialConfig, PotentialError, ReferenceFields, FORBIDDEN_COST,
};

type B = NdArray<f32>;

fn volume(d: usize, label_of: impl Fn(usize, usize, usize) -> f32) -> Image<B, 3> {
    let device = Default::default();
    let mut values = Vec::with_capacity(d * d * d);
    for z in 0..d {
        for y in 0..d {
            for x in 0..d {
                values.push(label_of(x, y, z));
            }
        }
    }
    let data = Tensor::<B, 3>::from_data(TensorData::new(values, [d, d, d]), &device);
    Image::new(
        data,
        Point3::origin(),
        Spacing3::from([1.0, 1.0, 1.0]),
        Direction3::identity(),
    )
}

/// 10x10x10 volume with a 3x3x3 cube of label 1 at indices 1..=3.
fn cube_volume() -> Image<B, 3> {
    volume(10, |x, y, z| {
        let inside = (1..=3).contains(&x) && (1..=3).contains(&y) && (1..=3).contains(&z);
        if inside {
            1.0
        } else {
            0.0
        }
    })
}

/// Cube of label 1 at indices 1..=3 and a block of label 2 at indices 6..=8.
fn three_class_volume() -> Image<B, 3> {
    volume(10, |x, y, z| {
        let within = |lo: usize, hi: usize| [x, y, z].iter().all(|c| (lo..=hi).contains(c));
        if within(1, 3) {
            1.0
        } else if within(6, 8) {
            2.0
        } else {
            0.0
        }
    })
}

/// Same reference with every distance field and its spread multiplied by `k`.
fn scaled_evaluator(
    evaluator: &PairwisePotentialEvaluator<3>,
    k: f64,
) -> PairwisePotentialEvaluator<3> {
    let reference = evaluator.reference();
    let scaled = ReferenceFields::from_parts(
        reference.labels().clone(),
        *reference.metadata(),
        reference.foreground().map(|f| f.scaled(k)),
        reference.secondary().map(|f| f.scaled(k)),
        None,
    )
    .unwrap();
    PairwisePotentialEvaluator::new(evaluator.config().clone(), Arc::new(scaled)).unwrap()
}

fn cube_evaluator(config: PotentialConfig) -> PairwisePotentialEvaluator<3> {
    PairwisePotentialEvaluator::from_segmentation(config, &cube_volume(), None, 1.0).unwrap()
}

#[test]
fn test_cube_distance_field() {
    let evaluator = cube_evaluator(PotentialConfig::default());
    let field = evaluator.distance_field().unwrap();
    let expected = (3.0f64 * 36.0).sqrt();
    assert!((field.sample(&Point3::from([9.0, 9.0, 9.0])) - expected).abs() < 1e-4);
}

#[test]
fn test_agreement_inside_cube_is_free() {
    let evaluator = cube_evaluator(PotentialConfig::default());
    assert_eq!(evaluator.evaluate([2, 2, 1], [2, 2, 2], &Vector3::zeros(), 1), 0.0);
}

#[test]
fn test_threshold_exceeded_is_forbidden() {
    let evaluator = cube_evaluator(PotentialConfig::default().with_threshold(3.0));
    assert_eq!(evaluator.evaluate([7, 2, 2], [8, 2, 2], &Vector3::zeros(), 1), FORBIDDEN_COST);
    // within the threshold the cost is finite
    let near = evaluator.evaluate([6, 2, 2], [5, 2, 2], &Vector3::zeros(), 1);
    assert!(near > 0.0 && near < FORBIDDEN_COST);
}

#[test]
fn test_displacement_equals_shifted_query() {
    let evaluator = cube_evaluator(PotentialConfig::default());
    for label in 0..2 {
        let shifted = evaluator.evaluate([3, 2, 2], [4, 2, 2], &Vector3::from([4.0, 0.0, 0.0]), label);
        let direct = evaluator.evaluate([7, 2, 2], [8, 2, 2], &Vector3::zeros(), label);
        assert_eq!(shifted, direct);
    }
}

#[test]
fn test_out_of_domain_queries_clamp() {
    let evaluator = cube_evaluator(PotentialConfig::default());
    for label in 0..2 {
        let below = evaluator.evaluate([1, 5, 5], [0, 5, 5], &Vector3::from([-1.0, 0.0, 0.0]), label);
        assert_eq!(below, evaluator.evaluate([1, 5, 5], [0, 5, 5], &Vector3::zeros(), label));

        let above = evaluator.evaluate([8, 5, 5], [9, 5, 5], &Vector3::from([1.0, 0.0, 0.0]), label);
        assert_eq!(above, evaluator.evaluate([8, 5, 5], [9, 5, 5], &Vector3::zeros(), label));
    }
}

#[test]
fn test_resolution_change_replaces_fields() {
    let mut evaluator = cube_evaluator(PotentialConfig::default());
    assert_eq!(evaluator.reference().size(), [10, 10, 10]);

    evaluator.set_reference_segmentation(&cube_volume(), None, 0.5).unwrap();
    assert_eq!(evaluator.reference().size(), [5, 5, 5]);
    assert!(evaluator.distance_field().is_some());

    // a volume without the foreground label is rejected and the fields stay put
    let empty = volume(4, |_, _, _| 0.0);
    let err = evaluator.set_reference_segmentation(&empty, None, 1.0).unwrap_err();
    assert!(matches!(err, PotentialError::EmptyLabel(1)));
    assert_eq!(evaluator.reference().size(), [5, 5, 5]);
}

proptest! {
    #[test]
    fn test_costs_are_bounded(
        x in 0usize..10, y in 0usize..10, z in 0usize..10,
        dx in -12.0f64..12.0, dy in -12.0f64..12.0, dz in -12.0f64..12.0,
        label in 0u32..2,
        threshold in 0.5f64..20.0
    ) {
        let evaluator = cube_evaluator(PotentialConfig::default().with_threshold(threshold));
        let cost = evaluator.evaluate([x, y, z], [x, y, z], &Vector3::from([dx, dy, dz]), label);
        prop_assert!(cost.is_finite());
        prop_assert!((0.0..=FORBIDDEN_COST).contains(&cost));
    }

    #[test]
    fn test_generic_costs_are_scale_invariant(
        x in 0usize..10, y in 0usize..10, z in 0usize..10,
        label in 0u32..2,
        k in 0.1f64..10.0
    ) {
        let evaluator = cube_evaluator(PotentialConfig::default());
        let scaled = scaled_evaluator(&evaluator, k);

        let expected = evaluator.evaluate([x, y, z], [x, y, z], &Vector3::zeros(), label);
        let actual = scaled.evaluate([x, y, z], [x, y, z], &Vector3::zeros(), label);
        prop_assert!((actual - expected).abs() <= 1e-5 * expected.max(1.0));
    }

    #[test]
    fn test_three_class_costs_are_scale_invariant(
        x in 0usize..10, y in 0usize..10, z in 0usize..10,
        label in 0u32..3,
        k in 0.1f64..10.0
    ) {
        let config = PotentialConfig::default().with_label_count(3);
        let evaluator =
            PairwisePotentialEvaluator::from_segmentation(config, &three_class_volume(), None, 1.0).unwrap();
        prop_assert!(evaluator.reference().secondary().is_some());
        let scaled = scaled_evaluator(&evaluator, k);

        let expected = evaluator.evaluate([x, y, z], [x, y, z], &Vector3::zeros(), label);
        let actual = scaled.evaluate([x, y, z], [x, y, z], &Vector3::zeros(), label);
        prop_assert!((actual - expected).abs() <= 1e-5 * expected.max(1.0));
    }
}
