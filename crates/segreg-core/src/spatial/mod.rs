//! Spatial types for points, vectors, spacing and direction matrices.
//!
//! All types are plain nalgebra aliases so the usual linear algebra
//! operators apply directly. Components are ordered by index axis
//! (x first), independent of the tensor layout of image data.

pub mod spacing;

use nalgebra::{Point as NaPoint, SMatrix, SVector};

pub type Point<const D: usize> = NaPoint<f64, D>;
pub type Vector<const D: usize> = SVector<f64, D>;
pub type Spacing<const D: usize> = SVector<f64, D>;
pub type Direction<const D: usize> = SMatrix<f64, D, D>;

pub use spacing::{min_spacing, uniform_spacing};

// Common aliases
pub type Point2 = Point<2>;
pub type Point3 = Point<3>;
pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;
pub type Spacing2 = Spacing<2>;
pub type Spacing3 = Spacing<3>;
pub type Direction2 = Direction<2>;
pub type Direction3 = Direction<3>;

/// Integer voxel position in index order (x first).
pub type GridIndex<const D: usize> = [usize; D];
