//! Image metadata types.
//!
//! Metadata describes how voxel indices map to physical coordinates:
//! `point = origin + Direction * (index * spacing)`.

use crate::error::{ImageError, Result};
use crate::spatial::{spacing, Direction, Point, Spacing, Vector};

/// Image metadata containing physical space information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetadata<const D: usize> {
    /// Physical coordinate of the first voxel (index 0, 0, ...).
    origin: Point<D>,
    /// Physical distance between voxels along each index axis.
    spacing: Spacing<D>,
    /// Orientation of the image axes (column i is axis i).
    direction: Direction<D>,
}

impl<const D: usize> ImageMetadata<D> {
    /// Create new image metadata.
    pub fn new(origin: Point<D>, spacing: Spacing<D>, direction: Direction<D>) -> Self {
        Self {
            origin,
            spacing,
            direction,
        }
    }

    /// Get the origin.
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Get the spacing.
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Get the direction.
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Same origin and direction with a different spacing.
    pub fn with_spacing(mut self, spacing: Spacing<D>) -> Self {
        self.spacing = spacing;
        self
    }

    /// Check that spacing is usable and the direction is invertible.
    pub fn validate(&self) -> Result<()> {
        if !spacing::is_valid_spacing(&self.spacing) {
            return Err(ImageError::invalid_spacing(format!("{:?}", self.spacing.as_slice())));
        }
        if self.direction.try_inverse().is_none() {
            return Err(ImageError::SingularDirection);
        }
        Ok(())
    }

    /// Convert a continuous index to a physical point.
    pub fn continuous_index_to_physical_point(&self, index: &Point<D>) -> Point<D> {
        let scaled = Vector::<D>::from_fn(|i, _| index[i] * self.spacing[i]);
        self.origin + self.direction * scaled
    }

    /// Inverse of the direction matrix.
    ///
    /// # Errors
    /// Fails if the direction matrix is singular.
    pub fn inverse_direction(&self) -> Result<Direction<D>> {
        self.direction.try_inverse().ok_or(ImageError::SingularDirection)
    }

    /// Convert a physical point to a continuous index.
    ///
    /// `index = (Direction^-1 * (point - origin)) / spacing`
    pub fn physical_point_to_continuous_index(&self, point: &Point<D>) -> Result<Point<D>> {
        let inverse = self.inverse_direction()?;
        Ok(self.continuous_index_with_inverse(&inverse, point))
    }

    /// Convert a physical point to a continuous index with a precomputed
    /// [`inverse_direction`](Self::inverse_direction), for mapping many points.
    pub fn continuous_index_with_inverse(&self, inverse: &Direction<D>, point: &Point<D>) -> Point<D> {
        let rotated = inverse * (*point - self.origin);
        let mut index = Point::<D>::origin();
        for i in 0..D {
            index[i] = rotated[i] / self.spacing[i];
        }
        index
    }
}

impl<const D: usize> Default for ImageMetadata<D> {
    fn default() -> Self {
        Self {
            origin: Point::origin(),
            spacing: spacing::uniform_spacing(1.0),
            direction: Direction::identity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Direction3, Point3, Spacing3};

    #[test]
    fn test_metadata_default() {
        let metadata = ImageMetadata::<3>::default();
        assert_eq!(metadata.origin(), &Point3::origin());
        assert_eq!(metadata.spacing(), &Spacing3::from([1.0, 1.0, 1.0]));
        assert_eq!(metadata.direction(), &Direction3::identity());
        assert!(metadata.validate().is_ok());
    }

    #[test]
    fn test_index_physical_roundtrip() {
        let metadata = ImageMetadata::new(
            Point3::from([10.0, 20.0, 30.0]),
            Spacing3::from([2.0, 0.5, 1.5]),
            Direction3::identity(),
        );
        let index = Point3::from([3.5, 4.0, 1.25]);
        let point = metadata.continuous_index_to_physical_point(&index);
        assert!((point[0] - 17.0).abs() < 1e-12);
        assert!((point[1] - 22.0).abs() < 1e-12);
        assert!((point[2] - 31.875).abs() < 1e-12);

        let back = metadata.physical_point_to_continuous_index(&point).unwrap();
        for i in 0..3 {
            assert!((back[i] - index[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_precomputed_inverse_matches_direct_mapping() {
        // 90 degree rotation about z
        let direction = Direction3::from_row_slice(&[0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        let metadata = ImageMetadata::new(Point3::from([5.0, -3.0, 1.0]), Spacing3::from([2.0, 1.0, 0.5]), direction);
        let inverse = metadata.inverse_direction().unwrap();

        let point = Point3::from([1.5, 7.0, -2.0]);
        let direct = metadata.physical_point_to_continuous_index(&point).unwrap();
        let hoisted = metadata.continuous_index_with_inverse(&inverse, &point);
        for i in 0..3 {
            assert!((direct[i] - hoisted[i]).abs() < 1e-12);
        }

        let singular = ImageMetadata::new(Point3::origin(), Spacing3::from([1.0, 1.0, 1.0]), Direction3::zeros());
        assert!(matches!(singular.inverse_direction(), Err(ImageError::SingularDirection)));
    }

    #[test]
    fn test_validate_rejects_degenerate_geometry() {
        let zero_spacing = ImageMetadata::new(
            Point3::origin(),
            Spacing3::from([1.0, 0.0, 1.0]),
            Direction3::identity(),
        );
        assert!(matches!(zero_spacing.validate(), Err(ImageError::InvalidSpacing(_))));

        let singular = ImageMetadata::new(
            Point3::origin(),
            Spacing3::from([1.0, 1.0, 1.0]),
            Direction3::zeros(),
        );
        assert!(matches!(singular.validate(), Err(ImageError::SingularDirection)));
    }
}
