//! Fixed-cost policy that only looks at the reference label.

use super::trait_::{CouplingPolicy, TargetSite};
use crate::config::{PotentialConfig, BINARY_COST_SCALE};
use crate::query::ReferenceLabel;

/// Binary policy: one unit per disagreement, two when the query is the
/// foreground label, scaled by [`BINARY_COST_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryPolicy {
    foreground: u32,
}

impl BinaryPolicy {
    pub fn new(foreground: u32) -> Self {
        Self { foreground }
    }

    pub fn from_config(config: &PotentialConfig) -> Self {
        Self::new(config.foreground_label())
    }

    fn units(&self, reference: ReferenceLabel, label: u32) -> f64 {
        let penalty = if label == self.foreground { 2.0 } else { 1.0 };
        match reference {
            ReferenceLabel::Label(n) if n == label => 0.0,
            ReferenceLabel::Label(_) => penalty,
            ReferenceLabel::Unlabeled if label == 0 => 0.0,
            ReferenceLabel::Unlabeled => penalty,
        }
    }
}

impl CouplingPolicy for BinaryPolicy {
    fn cost<const D: usize>(&self, site: &TargetSite<'_, D>, label: u32) -> f64 {
        self.units(site.reference_label(), label) * BINARY_COST_SCALE
    }

    fn name(&self) -> &'static str {
        "binary"
    }
}
