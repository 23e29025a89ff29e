//! Synthetic Cube Example
//!
//! Builds a 32^3 atlas with a cube of foreground label, prepares the
//! potential at half resolution and prints costs for a few candidate
//! displacements along one image row.
//!
//! Usage:
//!   cargo run --example synthetic_cube

use burn::tensor::{Tensor, TensorData};
use burn_ndarray::NdArray;
use segreg_core::image::Image;
use segreg_core::spatial::{Direction3, Point3, Spacing3, Vector3};
use segreg_potential::{CandidateAssignment, CouplingPolicy, PairwisePotentialEvaluator, PotentialConfig};

type Backend = NdArray<f32>;

const SIZE: usize = 32;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let device = Default::default();

    // 1. Atlas: label 1 inside [8, 16) on every axis
    let mut values = Vec::with_capacity(SIZE * SIZE * SIZE);
    for z in 0..SIZE {
        for y in 0..SIZE {
            for x in 0..SIZE {
                let inside = [x, y, z].iter().all(|c| (8..16).contains(c));
                values.push(if inside { 1.0 } else { 0.0 });
            }
        }
    }
    let data = Tensor::<Backend, 3>::from_data(TensorData::new(values, [SIZE, SIZE, SIZE]), &device);
    let atlas = Image::new(
        data,
        Point3::origin(),
        Spacing3::from([1.0, 1.0, 1.5]),
        Direction3::identity(),
    );

    // 2. Evaluator at half resolution
    let config = PotentialConfig::default().with_threshold(6.0);
    let evaluator = PairwisePotentialEvaluator::from_segmentation(config, &atlas, None, 0.5)?;
    let field = evaluator
        .distance_field()
        .ok_or_else(|| anyhow::anyhow!("generic potential has no distance field"))?;
    println!(
        "Policy: {}, working grid {:?}, distance mean {:.3}, spread {:.3}",
        evaluator.policy().name(),
        evaluator.reference().size(),
        field.statistics().mean(),
        field.statistics().spread()
    );

    // 3. Score foreground/background along a row through the cube
    let row = evaluator.reference().size()[0];
    let assignments: Vec<_> = (0..row)
        .flat_map(|x| {
            [0u32, 1].into_iter().map(move |label| {
                CandidateAssignment::new([x, 5, 6], [x, 5, 6], Vector3::from([1.0, 0.0, 0.0]), label)
            })
        })
        .collect();
    let costs = evaluator.evaluate_batch(&assignments);

    println!("{:>4} {:>14} {:>14}", "x", "background", "foreground");
    for (x, pair) in costs.chunks(2).enumerate() {
        println!("{:>4} {:>14.4} {:>14.4e}", x, pair[0], pair[1]);
    }

    Ok(())
}
