//! Query types exchanged with the discrete optimizer.

use segreg_core::{GridIndex, Vector};

/// Reference segmentation value at a deformed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceLabel {
    /// The atlas carries no label here.
    Unlabeled,
    /// The atlas assigns label `n` (always non-zero).
    Label(u32),
}

impl ReferenceLabel {
    /// Interpret a sampled label value. Values are truncated toward zero and
    /// anything `<= 0` means the atlas has no information.
    pub fn from_sample(value: f64) -> Self {
        let n = value.trunc();
        if n.is_nan() || n <= 0.0 {
            Self::Unlabeled
        } else {
            Self::Label(n as u32)
        }
    }

    pub fn is_labeled(&self) -> bool {
        matches!(self, Self::Label(_))
    }

    /// Label number, if any.
    pub fn label(&self) -> Option<u32> {
        match self {
            Self::Unlabeled => None,
            Self::Label(n) => Some(*n),
        }
    }
}

/// One edge/label combination to be scored.
///
/// `pos_a` is carried for the optimizer's bookkeeping; costs depend only on
/// `pos_b`, the displacement and the label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateAssignment<const D: usize> {
    pub pos_a: GridIndex<D>,
    pub pos_b: GridIndex<D>,
    pub displacement: Vector<D>,
    pub label: u32,
}

impl<const D: usize> CandidateAssignment<D> {
    pub fn new(pos_a: GridIndex<D>, pos_b: GridIndex<D>, displacement: Vector<D>, label: u32) -> Self {
        Self {
            pos_a,
            pos_b,
            displacement,
            label,
        }
    }
}
