//! Configuration for pairwise potential evaluation.
//!
//! A [`PotentialConfig`] is an immutable value handed to the evaluator at
//! construction; there is no window in which evaluation can observe a
//! partially configured state.

use serde::{Deserialize, Serialize};

use crate::error::{PotentialError, Result};

/// Cost returned for configurations that must never be chosen.
pub const FORBIDDEN_COST: f64 = 1e11;

/// Default distance ceiling; large enough to never trigger.
pub const DEFAULT_THRESHOLD: f64 = 9_999_999_999.0;

/// Multiplier that puts binary costs on the order of the distance-based ones.
pub const BINARY_COST_SCALE: f64 = 1000.0;

/// Cost policy coupling the deformed reference segmentation to a queried label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PotentialKind {
    /// Multi-label policy driven by one or two distance fields.
    #[default]
    Generic,
    /// Two-class policy that consults moving-image intensity for bone.
    AnatomyAware,
    /// Fixed unit costs, no distance fields.
    Binary,
}

impl PotentialKind {
    /// Whether the policy samples distance fields.
    pub fn uses_distance_fields(&self) -> bool {
        !matches!(self, Self::Binary)
    }

    /// Whether the policy samples a moving intensity image.
    pub fn uses_intensity(&self) -> bool {
        matches!(self, Self::AnatomyAware)
    }
}

/// Coarse tissue class of a moving-image intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TissueClass {
    Bone,
    SoftTissue,
    Other,
}

/// Intensity thresholds on the windowed (`[0, 255]`) moving image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityThresholds {
    /// Intensities strictly above this are bone.
    pub bone: f64,
    /// Intensities strictly above this (and not bone) are soft tissue.
    pub soft_tissue: f64,
}

impl Default for IntensityThresholds {
    fn default() -> Self {
        Self::from_hounsfield(300.0, -500.0)
    }
}

impl IntensityThresholds {
    pub fn new(bone: f64, soft_tissue: f64) -> Self {
        Self { bone, soft_tissue }
    }

    /// Thresholds from Hounsfield units, mapped through the CT window
    /// `[-1000, 1000] -> [0, 255]` and truncated.
    pub fn from_hounsfield(bone_hu: f64, soft_tissue_hu: f64) -> Self {
        let window = |hu: f64| ((hu + 1000.0) * 255.0 / 2000.0).trunc();
        Self::new(window(bone_hu), window(soft_tissue_hu))
    }

    /// Classify an intensity.
    pub fn classify(&self, intensity: f64) -> TissueClass {
        if intensity > self.bone {
            TissueClass::Bone
        } else if intensity > self.soft_tissue {
            TissueClass::SoftTissue
        } else {
            TissueClass::Other
        }
    }

    pub fn is_bone(&self, intensity: f64) -> bool {
        self.classify(intensity) == TissueClass::Bone
    }
}

/// Potential configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialConfig {
    /// Cost policy.
    pub kind: PotentialKind,
    /// Number of segmentation labels N; label `N - 1` is the foreground.
    pub label_count: u32,
    /// Distance ceiling beyond which foreground queries are forbidden.
    pub threshold: f64,
    /// Weight of the complementary unary term; the evaluator exposes `1 - w`.
    pub asymmetry_weight: f64,
    /// Bone/soft-tissue thresholds for the anatomy-aware policy.
    pub intensity: IntensityThresholds,
}

impl Default for PotentialConfig {
    fn default() -> Self {
        Self {
            kind: PotentialKind::Generic,
            label_count: 2,
            threshold: DEFAULT_THRESHOLD,
            asymmetry_weight: 0.0,
            intensity: IntensityThresholds::default(),
        }
    }
}

impl PotentialConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cost policy.
    pub fn with_kind(mut self, kind: PotentialKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the number of segmentation labels.
    pub fn with_label_count(mut self, label_count: u32) -> Self {
        self.label_count = label_count;
        self
    }

    /// Set the hard distance ceiling.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the asymmetry weight.
    pub fn with_asymmetry_weight(mut self, weight: f64) -> Self {
        self.asymmetry_weight = weight;
        self
    }

    /// Set the intensity thresholds.
    pub fn with_intensity_thresholds(mut self, thresholds: IntensityThresholds) -> Self {
        self.intensity = thresholds;
        self
    }

    /// `1 - asymmetry_weight`.
    pub fn asymmetry_factor(&self) -> f64 {
        1.0 - self.asymmetry_weight
    }

    /// Foreground (terminal) label, `N - 1`.
    pub fn foreground_label(&self) -> u32 {
        self.label_count.saturating_sub(1)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.label_count < 2 {
            return Err(PotentialError::invalid_configuration(format!(
                "label count must be at least 2, got {}",
                self.label_count
            )));
        }
        if self.kind == PotentialKind::AnatomyAware && self.label_count != 2 {
            return Err(PotentialError::invalid_configuration(format!(
                "anatomy-aware potential is two-class, got {} labels",
                self.label_count
            )));
        }
        if self.threshold.is_nan() || self.threshold <= 0.0 {
            return Err(PotentialError::invalid_configuration(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }
        if !self.asymmetry_weight.is_finite() {
            return Err(PotentialError::invalid_configuration(
                "asymmetry weight must be finite",
            ));
        }
        let IntensityThresholds { bone, soft_tissue } = self.intensity;
        if !bone.is_finite() || !soft_tissue.is_finite() || soft_tissue > bone {
            return Err(PotentialError::invalid_configuration(format!(
                "intensity thresholds must be finite with soft tissue <= bone, got bone {} soft tissue {}",
                bone, soft_tissue
            )));
        }
        Ok(())
    }
}
