pub mod distance;
pub mod intensity;
pub mod resample;
pub mod statistics;

pub use distance::{distance_map, DistanceMapFilter};
pub use intensity::{RescaleIntensityFilter, ThresholdOutsideFilter};
pub use resample::IsotropicResampleFilter;
pub use statistics::{FieldStatistics, MIN_SPREAD};
