//! Exact Euclidean distance maps of label volumes.
//!
//! For every voxel the map holds the physical distance (voxel spacing
//! applied) to the nearest voxel carrying a target label. Voxels of the
//! target label map to zero.
//!
//! The squared distance is computed axis by axis with the lower envelope of
//! parabolas of Felzenszwalb & Huttenlocher, which is exact for anisotropic
//! spacing; the square root is taken once at the end.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use rayon::prelude::*;

use crate::error::{ImageError, Result};
use crate::image::Image;
use crate::sampler::VoxelBuffer;
use crate::spatial::spacing::is_valid_spacing;
use crate::spatial::Spacing;

/// Distance map filter for one target label.
///
/// # Type Parameters
/// * `B` - The Burn backend
pub struct DistanceMapFilter<B: Backend> {
    label: u32,
    _b: PhantomData<B>,
}

impl<B: Backend> DistanceMapFilter<B> {
    /// Create a filter measuring distances to voxels equal to `label`.
    pub fn new(label: u32) -> Self {
        Self {
            label,
            _b: PhantomData,
        }
    }

    /// Apply the filter to a label image.
    ///
    /// # Errors
    /// Fails if the label does not occur or the spacing is degenerate.
    pub fn apply<const D: usize>(&self, labels: &Image<B, D>) -> Result<Image<B, D>> {
        let buffer = labels.to_buffer()?;
        let field = distance_map(&buffer, labels.spacing(), self.label)?;
        Ok(Image::from_buffer(&field, *labels.metadata(), &labels.data().device()))
    }
}

/// Distance map of a host label buffer.
///
/// Label values are compared after rounding to the nearest integer.
pub fn distance_map<const D: usize>(
    labels: &VoxelBuffer<D>,
    spacing: &Spacing<D>,
    label: u32,
) -> Result<VoxelBuffer<D>> {
    if !is_valid_spacing(spacing) {
        return Err(ImageError::invalid_spacing(format!("{:?}", spacing.as_slice())));
    }

    let target = label as f32;
    let mut squared: Vec<f64> = labels
        .values()
        .iter()
        .map(|&v| if v.round() == target { 0.0 } else { f64::INFINITY })
        .collect();
    if !squared.iter().any(|&d| d == 0.0) {
        return Err(ImageError::LabelNotFound(label));
    }

    let size = labels.size();
    let strides = labels.strides();
    for a in 0..D {
        let n = size[a];
        if n < 2 {
            continue;
        }
        let stride = strides[a];
        let axis_spacing = spacing[a];

        let starts: Vec<usize> = (0..squared.len())
            .filter(|&offset| (offset / stride) % n == 0)
            .collect();
        let lines: Vec<Vec<f64>> = starts
            .par_iter()
            .map(|&start| {
                let line: Vec<f64> = (0..n).map(|i| squared[start + i * stride]).collect();
                lower_envelope(&line, axis_spacing)
            })
            .collect();
        for (start, line) in starts.iter().zip(lines) {
            for (i, value) in line.into_iter().enumerate() {
                squared[start + i * stride] = value;
            }
        }
    }

    let values = squared.into_iter().map(|d| d.sqrt() as f32).collect();
    VoxelBuffer::new(values, labels.dims())
}

/// One-dimensional squared distance transform of sampled function `f`.
///
/// Only finite samples contribute parabolas; a line without any finite
/// sample stays infinite and is resolved by a later axis.
fn lower_envelope(f: &[f64], spacing: f64) -> Vec<f64> {
    let n = f.len();
    let mut out = vec![f64::INFINITY; n];
    let sites: Vec<usize> = (0..n).filter(|&q| f[q].is_finite()).collect();
    if sites.is_empty() {
        return out;
    }

    let pos = |q: usize| q as f64 * spacing;
    let intersect = |p: usize, q: usize| {
        ((f[q] + pos(q) * pos(q)) - (f[p] + pos(p) * pos(p))) / (2.0 * (pos(q) - pos(p)))
    };

    // v: parabola apexes of the envelope, z: boundaries between them
    let mut v = vec![sites[0]];
    let mut z = vec![f64::NEG_INFINITY, f64::INFINITY];
    for &q in &sites[1..] {
        let mut s = intersect(v[v.len() - 1], q);
        while s <= z[v.len() - 1] {
            v.pop();
            z.pop();
            s = intersect(v[v.len() - 1], q);
        }
        let k = v.len();
        z[k] = s;
        z.push(f64::INFINITY);
        v.push(q);
    }

    let mut k = 0;
    for (q, slot) in out.iter_mut().enumerate() {
        while z[k + 1] < pos(q) {
            k += 1;
        }
        let d = pos(q) - pos(v[k]);
        *slot = d * d + f[v[k]];
    }
    out
}
