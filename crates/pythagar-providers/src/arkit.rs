use log::trace;
use pythagar_core::math::{Transform4x4, transform_from_column_major_f32};
use pythagar_core::{HitCandidate, HitTester, LimitedReason, ScreenPoint, TrackingState};

/// Mirror of `ARHitTestResult.ResultType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArKitHitResultType {
    FeaturePoint,
    EstimatedHorizontalPlane,
    EstimatedVerticalPlane,
    ExistingPlane,
    ExistingPlaneUsingExtent,
    ExistingPlaneUsingGeometry,
}

/// Hit-test result as ARKit reports it: `simd_float4x4` stored column-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArKitHitResult {
    pub kind: ArKitHitResultType,
    pub distance: f32,
    pub world_transform: [f32; 16],
}

impl ArKitHitResult {
    pub fn transform(&self) -> Transform4x4 {
        transform_from_column_major_f32(&self.world_transform)
    }
}

impl From<&ArKitHitResult> for HitCandidate {
    fn from(value: &ArKitHitResult) -> Self {
        HitCandidate::new(value.transform())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArKitLimitedReason {
    Initializing,
    ExcessiveMotion,
    InsufficientFeatures,
    Relocalizing,
}

impl From<ArKitLimitedReason> for LimitedReason {
    fn from(value: ArKitLimitedReason) -> Self {
        match value {
            ArKitLimitedReason::Initializing => LimitedReason::Initializing,
            ArKitLimitedReason::ExcessiveMotion => LimitedReason::ExcessiveMotion,
            ArKitLimitedReason::InsufficientFeatures => LimitedReason::InsufficientFeatures,
            ArKitLimitedReason::Relocalizing => LimitedReason::Relocalizing,
        }
    }
}

/// Mirror of `ARCamera.TrackingState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArKitTrackingState {
    NotAvailable,
    Limited(ArKitLimitedReason),
    Normal,
}

impl From<ArKitTrackingState> for TrackingState {
    fn from(value: ArKitTrackingState) -> Self {
        match value {
            ArKitTrackingState::NotAvailable => TrackingState::NotAvailable,
            ArKitTrackingState::Limited(reason) => TrackingState::Limited(Some(reason.into())),
            ArKitTrackingState::Normal => TrackingState::Normal,
        }
    }
}

/// Adapts an ARKit-style hit-test query into the core [`HitTester`].
///
/// Only results whose kind is in `accepted` are forwarded, nearest first by
/// their reported camera distance. Equal distances keep ARKit's order.
pub struct ArKitHitTester<Q> {
    query: Q,
    accepted: Vec<ArKitHitResultType>,
}

impl<Q> ArKitHitTester<Q>
where
    Q: FnMut(ScreenPoint) -> Vec<ArKitHitResult>,
{
    /// Accepts detected feature points only.
    pub fn feature_points(query: Q) -> Self {
        Self::with_types(query, vec![ArKitHitResultType::FeaturePoint])
    }

    pub fn with_types(query: Q, accepted: Vec<ArKitHitResultType>) -> Self {
        Self { query, accepted }
    }
}

impl<Q> HitTester for ArKitHitTester<Q>
where
    Q: FnMut(ScreenPoint) -> Vec<ArKitHitResult>,
{
    fn hit_test(&mut self, point: ScreenPoint) -> Vec<HitCandidate> {
        let results = (self.query)(point);
        let total = results.len();
        let mut accepted: Vec<&ArKitHitResult> = results
            .iter()
            .filter(|result| self.accepted.contains(&result.kind))
            .collect();
        accepted.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let candidates: Vec<HitCandidate> =
            accepted.into_iter().map(HitCandidate::from).collect();
        trace!(
            target: "pythagar_providers::arkit",
            "hit test kept {}/{} results",
            candidates.len(),
            total
        );
        candidates
    }
}
