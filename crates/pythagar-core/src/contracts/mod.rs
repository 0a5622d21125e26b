use nalgebra::Point2;

use crate::math::{Point3, Transform4x4, position_from_transform};

/// Tap location in the host view's coordinate system (points, origin top-left).
pub type ScreenPoint = Point2<f64>;

/// One world-space candidate returned by a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCandidate {
    pub world_transform: Transform4x4,
}

impl HitCandidate {
    pub fn new(world_transform: Transform4x4) -> Self {
        Self { world_transform }
    }

    pub fn position(&self) -> Point3 {
        position_from_transform(&self.world_transform)
    }
}

/// Maps a 2D screen location to zero or more 3D candidates, nearest first.
pub trait HitTester {
    fn hit_test(&mut self, point: ScreenPoint) -> Vec<HitCandidate>;
}

impl<F> HitTester for F
where
    F: FnMut(ScreenPoint) -> Vec<HitCandidate>,
{
    fn hit_test(&mut self, point: ScreenPoint) -> Vec<HitCandidate> {
        self(point)
    }
}

/// Hit tester over candidates the host already resolved for the current tap.
#[derive(Debug, Clone, Default)]
pub struct ResolvedHits {
    candidates: Vec<HitCandidate>,
}

impl ResolvedHits {
    pub fn new(candidates: Vec<HitCandidate>) -> Self {
        Self { candidates }
    }
}

impl HitTester for ResolvedHits {
    fn hit_test(&mut self, _point: ScreenPoint) -> Vec<HitCandidate> {
        std::mem::take(&mut self.candidates)
    }
}
