pub mod fix;
pub mod geometry;
pub mod point;
pub mod record;
pub mod suppression;

pub use fix::{Fix, Match};
pub use geometry::Coordinate;
pub use point::{DroppedRecord, LoadReport, PointOfInterest, PointOfInterestSet, POINTS_KEY};
pub use record::RawRecord;
pub use suppression::{GatePolicy, SuppressionEntry, SuppressionState, SUPPRESSION_KEY};
