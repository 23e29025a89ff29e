//! Pairwise potential evaluator.
//!
//! The evaluator owns read-only views of the reference fields and answers
//! cost queries from the discrete optimizer. Queries never fail: targets
//! outside the grid are clamped onto its boundary and forbidden
//! configurations come back as [`FORBIDDEN_COST`](crate::config::FORBIDDEN_COST).
//!
//! Setup methods take `&mut self`, so no query can be in flight while the
//! fields are replaced; after setup the evaluator is `Send + Sync` and may be
//! queried from any number of threads.

use std::sync::Arc;

use burn::tensor::backend::Backend;
use rayon::prelude::*;
use segreg_core::{GridIndex, Image, Point, Vector};

use crate::config::PotentialConfig;
use crate::displacement::BaseDisplacementField;
use crate::error::{PotentialError, Result};
use crate::potential::{CouplingPolicy, Policy, TargetSite};
use crate::query::CandidateAssignment;
use crate::reference::{DistanceField, ReferenceFields};

/// Cross-modality pairwise potential.
///
/// # Type Parameters
/// * `D` - The spatial dimensionality (2 or 3)
#[derive(Debug, Clone)]
pub struct PairwisePotentialEvaluator<const D: usize> {
    config: PotentialConfig,
    reference: Arc<ReferenceFields<D>>,
    base_displacement: Option<Arc<BaseDisplacementField<D>>>,
    policy: Policy,
}

impl<const D: usize> PairwisePotentialEvaluator<D> {
    /// Create an evaluator over prepared reference fields.
    ///
    /// # Errors
    /// Fails if the configuration is invalid or `reference` lacks a field the
    /// configured policy samples.
    pub fn new(config: PotentialConfig, reference: Arc<ReferenceFields<D>>) -> Result<Self> {
        config.validate()?;
        let policy = Policy::from_reference(&config, &reference)?;
        tracing::info!(policy = policy.name(), labels = config.label_count, "Potential evaluator ready");
        Ok(Self {
            config,
            reference,
            base_displacement: None,
            policy,
        })
    }

    /// Build the reference fields from an atlas segmentation and create an evaluator.
    ///
    /// # Arguments
    /// * `config` - Potential configuration
    /// * `segmentation` - Atlas label volume
    /// * `moving` - Moving intensity image on the atlas grid (anatomy-aware policy only)
    /// * `scale` - Working resolution factor
    pub fn from_segmentation<B: Backend>(
        config: PotentialConfig,
        segmentation: &Image<B, D>,
        moving: Option<&Image<B, D>>,
        scale: f64,
    ) -> Result<Self> {
        config.validate()?;
        let reference = ReferenceFields::build(&config, segmentation, moving, scale)?;
        Self::new(config, Arc::new(reference))
    }

    /// Rebuild the reference fields for a new resolution level.
    ///
    /// On error the evaluator keeps its previous state. A base displacement
    /// whose grid no longer matches the reference is removed.
    pub fn set_reference_segmentation<B: Backend>(
        &mut self,
        segmentation: &Image<B, D>,
        moving: Option<&Image<B, D>>,
        scale: f64,
    ) -> Result<()> {
        let reference = ReferenceFields::build(&self.config, segmentation, moving, scale)?;
        self.set_reference_fields(Arc::new(reference))
    }

    /// Replace the reference fields.
    pub fn set_reference_fields(&mut self, reference: Arc<ReferenceFields<D>>) -> Result<()> {
        let policy = Policy::from_reference(&self.config, &reference)?;
        if let Some(base) = &self.base_displacement {
            if base.dims() != reference.labels().dims() {
                tracing::warn!(
                    base = ?base.size(),
                    reference = ?reference.size(),
                    "Base displacement does not match the new reference grid, removing it"
                );
                self.base_displacement = None;
            }
        }
        self.reference = reference;
        self.policy = policy;
        Ok(())
    }

    /// Install or remove the bulk pre-displacement.
    ///
    /// # Errors
    /// Fails if the field is not defined on the reference grid.
    pub fn set_base_displacement(&mut self, field: Option<Arc<BaseDisplacementField<D>>>) -> Result<()> {
        if let Some(base) = &field {
            let expected = self.reference.labels().dims();
            if base.dims() != expected {
                return Err(PotentialError::shape_mismatch(&expected, &base.dims()));
            }
        }
        self.base_displacement = field;
        Ok(())
    }

    /// Currently installed bulk pre-displacement.
    pub fn base_displacement(&self) -> Option<&Arc<BaseDisplacementField<D>>> {
        self.base_displacement.as_ref()
    }

    /// Continuous target index of a query, clamped into the sampling domain.
    pub fn target_index(&self, pos_b: GridIndex<D>, displacement: &Vector<D>) -> Point<D> {
        let mut total = *displacement;
        if let Some(base) = &self.base_displacement {
            total += base.at(pos_b);
        }
        let mut target = Point::<D>::origin();
        for a in 0..D {
            target[a] = pos_b[a] as f64 + total[a];
        }
        self.reference.labels().clamp_to_buffer(target)
    }

    /// Cost of assigning `displacement` and `label` across the edge `(pos_a, pos_b)`.
    ///
    /// Only `pos_b` determines the sampled position.
    pub fn evaluate(
        &self,
        _pos_a: GridIndex<D>,
        pos_b: GridIndex<D>,
        displacement: &Vector<D>,
        label: u32,
    ) -> f64 {
        let index = self.target_index(pos_b, displacement);
        let site = TargetSite::new(&self.reference, index);
        self.policy.cost(&site, label)
    }

    pub fn evaluate_assignment(&self, assignment: &CandidateAssignment<D>) -> f64 {
        self.evaluate(
            assignment.pos_a,
            assignment.pos_b,
            &assignment.displacement,
            assignment.label,
        )
    }

    /// Score many assignments in parallel; results keep the input order.
    pub fn evaluate_batch(&self, assignments: &[CandidateAssignment<D>]) -> Vec<f64> {
        tracing::debug!(count = assignments.len(), "Evaluating assignment batch");
        assignments
            .par_iter()
            .map(|assignment| self.evaluate_assignment(assignment))
            .collect()
    }

    /// `1 - asymmetry_weight`, for the outer energy assembly.
    pub fn asymmetry_factor(&self) -> f64 {
        self.config.asymmetry_factor()
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    pub fn config(&self) -> &PotentialConfig {
        &self.config
    }

    pub fn reference(&self) -> &Arc<ReferenceFields<D>> {
        &self.reference
    }

    /// Foreground distance field, if the policy uses one.
    pub fn distance_field(&self) -> Option<&DistanceField<D>> {
        self.reference.foreground()
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}
