//! Interpolation of voxel buffers at continuous indices.
//!
//! Nearest-neighbour sampling is used for label data, linear sampling for
//! scalar fields such as distance maps and intensities.

pub mod trait_;
pub mod linear;
pub mod nearest;

pub use trait_::{Interpolation, Interpolator};
pub use linear::LinearInterpolator;
pub use nearest::NearestNeighborInterpolator;
