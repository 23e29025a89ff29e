//! Two-class policy that forbids configurations based on bone intensity.

use super::trait_::{CouplingPolicy, TargetSite};
use crate::config::{IntensityThresholds, PotentialConfig, FORBIDDEN_COST};
use crate::error::{PotentialError, Result};
use crate::reference::ReferenceFields;

/// Anatomy-aware policy.
///
/// Costs are normalised by the foreground field's spread alone. Labels
/// other than background and foreground are decided by whether the moving
/// image looks like bone at the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnatomyAwarePolicy {
    foreground: u32,
    threshold: f64,
    spread: f64,
    thresholds: IntensityThresholds,
}

impl AnatomyAwarePolicy {
    pub fn new(foreground: u32, threshold: f64, spread: f64, thresholds: IntensityThresholds) -> Self {
        Self {
            foreground,
            threshold,
            spread,
            thresholds,
        }
    }

    /// # Errors
    /// Fails without a foreground distance field or a moving intensity image.
    pub fn from_reference<const D: usize>(
        config: &PotentialConfig,
        reference: &ReferenceFields<D>,
    ) -> Result<Self> {
        let foreground = reference.foreground().ok_or_else(|| {
            PotentialError::missing_field("anatomy-aware potential needs a foreground distance field")
        })?;
        if reference.intensity().is_none() {
            return Err(PotentialError::missing_field(
                "anatomy-aware potential needs a moving intensity image",
            ));
        }
        Ok(Self::new(
            config.foreground_label(),
            config.threshold,
            foreground.statistics().spread(),
            config.intensity,
        ))
    }
}

impl CouplingPolicy for AnatomyAwarePolicy {
    fn cost<const D: usize>(&self, site: &TargetSite<'_, D>, label: u32) -> f64 {
        let labeled = site.reference_label().is_labeled();
        if label == 0 {
            return if labeled {
                site.foreground_distance() / self.spread
            } else {
                0.0
            };
        }
        if label == self.foreground {
            if labeled {
                return 0.0;
            }
            let distance = site.foreground_distance();
            return if distance > self.threshold {
                FORBIDDEN_COST
            } else {
                distance / self.spread
            };
        }

        let is_bone = self.thresholds.is_bone(site.intensity());
        match (labeled, is_bone) {
            (true, true) | (false, false) => FORBIDDEN_COST,
            _ => 0.0,
        }
    }

    fn name(&self) -> &'static str {
        "anatomy-aware"
    }
}
