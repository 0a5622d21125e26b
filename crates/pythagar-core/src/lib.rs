pub mod contracts;
pub mod markers;
pub mod math;
pub mod session;
pub mod tracking;

pub use contracts::{HitCandidate, HitTester, ScreenPoint};
pub use markers::{Marker, MarkerStore};
pub use math::{Point3, Transform4x4};
pub use session::{MAX_DECIMAL_PLACES, MeasureConfig, MeasureSession, TapOutcome};
pub use tracking::{LimitedReason, TrackingState};
