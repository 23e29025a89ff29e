//! Multi-label distance-field policy.

use super::trait_::{CouplingPolicy, TargetSite};
use crate::config::{PotentialConfig, FORBIDDEN_COST};
use crate::error::{PotentialError, Result};
use crate::query::ReferenceLabel;
use crate::reference::ReferenceFields;

/// Generic policy.
///
/// Disagreement with the deformed reference costs the distance to the
/// relevant label divided by the mean spread of the distance fields. When
/// the atlas is unlabelled, foreground queries farther than the threshold
/// are forbidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenericPolicy {
    foreground: u32,
    threshold: f64,
    average_spread: f64,
}

impl GenericPolicy {
    pub fn new(foreground: u32, threshold: f64, average_spread: f64) -> Self {
        Self {
            foreground,
            threshold,
            average_spread,
        }
    }

    /// Derive the policy from a configuration and the fields built for it.
    ///
    /// # Errors
    /// Fails without a foreground distance field.
    pub fn from_reference<const D: usize>(
        config: &PotentialConfig,
        reference: &ReferenceFields<D>,
    ) -> Result<Self> {
        let foreground = reference
            .foreground()
            .ok_or_else(|| PotentialError::missing_field("generic potential needs a foreground distance field"))?;
        let spreads: Vec<f64> = std::iter::once(foreground)
            .chain(reference.secondary())
            .map(|field| field.statistics().spread())
            .collect();
        let average_spread = spreads.iter().sum::<f64>() / spreads.len() as f64;
        Ok(Self::new(config.foreground_label(), config.threshold, average_spread))
    }

    pub fn average_spread(&self) -> f64 {
        self.average_spread
    }
}

impl CouplingPolicy for GenericPolicy {
    fn cost<const D: usize>(&self, site: &TargetSite<'_, D>, label: u32) -> f64 {
        match site.reference_label() {
            ReferenceLabel::Label(n) if n == label => 0.0,
            ReferenceLabel::Label(n) if label == 0 => {
                let distance = if n == self.foreground {
                    site.foreground_distance()
                } else {
                    site.secondary_distance()
                };
                distance / self.average_spread
            }
            // Conflicting non-background labels: no threshold on this branch
            ReferenceLabel::Label(_) => {
                (site.secondary_distance() + site.foreground_distance()) / self.average_spread
            }
            ReferenceLabel::Unlabeled if label == 0 => 0.0,
            ReferenceLabel::Unlabeled if label == self.foreground => {
                let distance = site.foreground_distance();
                if distance > self.threshold {
                    FORBIDDEN_COST
                } else {
                    distance / self.average_spread
                }
            }
            ReferenceLabel::Unlabeled => site.secondary_distance() / self.average_spread,
        }
    }

    fn name(&self) -> &'static str {
        "generic"
    }
}
