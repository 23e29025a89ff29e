//! Cross-modality pairwise potentials for joint segmentation and registration.
//!
//! A discrete optimizer assigns every voxel a displacement and a
//! segmentation label. The [`PairwisePotentialEvaluator`] scores one
//! candidate per edge by deforming the atlas segmentation with the candidate
//! displacement and comparing the atlas label found there with the proposed
//! label, using distance fields to grade the disagreement.

pub mod config;
pub mod displacement;
pub mod error;
pub mod evaluator;
pub mod potential;
pub mod query;
pub mod reference;

pub use config::{
    IntensityThresholds, PotentialConfig, PotentialKind, TissueClass, BINARY_COST_SCALE,
    DEFAULT_THRESHOLD, FORBIDDEN_COST,
};
pub use displacement::BaseDisplacementField;
pub use error::{PotentialError, Result};
pub use evaluator::PairwisePotentialEvaluator;
pub use potential::{CouplingPolicy, Policy};
pub use query::{CandidateAssignment, ReferenceLabel};
pub use reference::{DistanceField, ReferenceFields};
