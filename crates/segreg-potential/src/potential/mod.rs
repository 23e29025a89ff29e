//! Cost policies.
//!
//! Each policy maps a sampled [`TargetSite`] and a queried label to a cost.
//! [`Policy`] selects one of them from the configured [`PotentialKind`].

pub mod trait_;
pub mod anatomy;
pub mod binary;
pub mod generic;

pub use trait_::{CouplingPolicy, TargetSite};
pub use anatomy::AnatomyAwarePolicy;
pub use binary::BinaryPolicy;
pub use generic::GenericPolicy;

use crate::config::{PotentialConfig, PotentialKind};
use crate::error::Result;
use crate::reference::ReferenceFields;

/// Policy selected by [`PotentialKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    Generic(GenericPolicy),
    AnatomyAware(AnatomyAwarePolicy),
    Binary(BinaryPolicy),
}

impl Policy {
    /// Build the configured policy, checking that `reference` holds the
    /// fields it samples.
    pub fn from_reference<const D: usize>(
        config: &PotentialConfig,
        reference: &ReferenceFields<D>,
    ) -> Result<Self> {
        Ok(match config.kind {
            PotentialKind::Generic => Self::Generic(GenericPolicy::from_reference(config, reference)?),
            PotentialKind::AnatomyAware => {
                Self::AnatomyAware(AnatomyAwarePolicy::from_reference(config, reference)?)
            }
            PotentialKind::Binary => Self::Binary(BinaryPolicy::from_config(config)),
        })
    }
}

impl CouplingPolicy for Policy {
    fn cost<const D: usize>(&self, site: &TargetSite<'_, D>, label: u32) -> f64 {
        match self {
            Self::Generic(policy) => policy.cost(site, label),
            Self::AnatomyAware(policy) => policy.cost(site, label),
            Self::Binary(policy) => policy.cost(site, label),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Generic(policy) => policy.name(),
            Self::AnatomyAware(policy) => policy.name(),
            Self::Binary(policy) => policy.name(),
        }
    }
}
