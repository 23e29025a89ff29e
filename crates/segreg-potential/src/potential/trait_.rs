//! Coupling policy trait and the sampled target site it scores.

use segreg_core::Point;

use crate::query::ReferenceLabel;
use crate::reference::ReferenceFields;

/// Deformed query position with lazy access to the reference fields.
///
/// The index is already clamped into the sampling domain; the reference
/// label is sampled eagerly since every policy needs it.
pub struct TargetSite<'a, const D: usize> {
    reference: &'a ReferenceFields<D>,
    index: Point<D>,
    label: ReferenceLabel,
}

impl<'a, const D: usize> TargetSite<'a, D> {
    pub fn new(reference: &'a ReferenceFields<D>, index: Point<D>) -> Self {
        let label = reference.label_at(&index);
        Self {
            reference,
            index,
            label,
        }
    }

    /// Reference label at the site.
    pub fn reference_label(&self) -> ReferenceLabel {
        self.label
    }

    /// Distance to the foreground label; zero without a foreground field.
    pub fn foreground_distance(&self) -> f64 {
        self.reference
            .foreground()
            .map_or(0.0, |field| field.sample(&self.index))
    }

    /// Distance to the secondary label, falling back to the foreground field.
    pub fn secondary_distance(&self) -> f64 {
        match self.reference.secondary() {
            Some(field) => field.sample(&self.index),
            None => self.foreground_distance(),
        }
    }

    /// Moving-image intensity; zero without an intensity image.
    pub fn intensity(&self) -> f64 {
        self.reference.intensity_at(&self.index).unwrap_or(0.0)
    }
}

/// Cost policy coupling the deformed reference segmentation to a label.
///
/// Implementations return a value in `[0, FORBIDDEN_COST]`.
pub trait CouplingPolicy {
    /// Cost of assigning `label` at `site`.
    fn cost<const D: usize>(&self, site: &TargetSite<'_, D>, label: u32) -> f64;

    /// Get the name of this policy.
    fn name(&self) -> &'static str;
}
