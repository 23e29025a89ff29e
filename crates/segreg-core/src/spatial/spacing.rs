//! Helpers for voxel spacing vectors.

use super::Spacing;

/// Spacing with the same value along every axis.
pub fn uniform_spacing<const D: usize>(value: f64) -> Spacing<D> {
    Spacing::<D>::repeat(value)
}

/// Smallest spacing component.
pub fn min_spacing<const D: usize>(spacing: &Spacing<D>) -> f64 {
    spacing.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Whether every component is finite and strictly positive.
pub fn is_valid_spacing<const D: usize>(spacing: &Spacing<D>) -> bool {
    spacing.iter().all(|s| s.is_finite() && *s > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Spacing3;

    #[test]
    fn test_uniform_spacing() {
        let s: Spacing3 = uniform_spacing(1.5);
        assert_eq!(s, Spacing3::from([1.5, 1.5, 1.5]));
    }

    #[test]
    fn test_min_spacing() {
        let s = Spacing3::from([2.0, 0.5, 3.0]);
        assert_eq!(min_spacing(&s), 0.5);
    }

    #[test]
    fn test_spacing_validity() {
        assert!(is_valid_spacing(&Spacing3::from([1.0, 1.0, 1.0])));
        assert!(!is_valid_spacing(&Spacing3::from([1.0, 0.0, 1.0])));
        assert!(!is_valid_spacing(&Spacing3::from([1.0, f64::NAN, 1.0])));
    }
}
