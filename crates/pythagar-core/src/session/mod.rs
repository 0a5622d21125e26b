use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::contracts::{HitTester, ScreenPoint};
use crate::markers::{Marker, MarkerStore};
use crate::math::distance;
use crate::tracking::{self, TrackingState};

/// Readouts never show more digits than this, whatever the config asks for.
pub const MAX_DECIMAL_PLACES: usize = 9;

/// Display tunables for measurement readouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    pub decimal_places: usize,
    pub unit_label: String,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            unit_label: "meters".to_string(),
        }
    }
}

impl MeasureConfig {
    /// Digits after the decimal point, capped at [`MAX_DECIMAL_PLACES`].
    pub fn precision(&self) -> usize {
        self.decimal_places.min(MAX_DECIMAL_PLACES)
    }

    pub fn format_distance(&self, meters: f64) -> String {
        format!(
            "Distance: {:.*} {}",
            self.precision(),
            meters,
            self.unit_label
        )
    }
}

/// Result of a tap that landed on a feature point.
#[derive(Debug, Clone, PartialEq)]
pub struct TapOutcome {
    pub marker: Marker,
    /// Distance to the previously placed marker, if there was one.
    pub distance: Option<f64>,
    /// Label text to show; `None` leaves the current label untouched.
    pub status: Option<String>,
}

/// Measurement state for one AR session: markers plus readout formatting.
///
/// Events are expected one at a time from the host's UI thread.
#[derive(Debug, Default, Clone)]
pub struct MeasureSession {
    config: MeasureConfig,
    markers: MarkerStore,
}

impl MeasureSession {
    pub fn new(config: MeasureConfig) -> Self {
        Self {
            config,
            markers: MarkerStore::new(),
        }
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    /// Hit-tests `point`, drops a marker on the first candidate and measures
    /// from the previous marker.
    ///
    /// Returns `None` without touching any state when nothing was hit.
    pub fn on_tap<H>(&mut self, point: ScreenPoint, hit_tester: &mut H) -> Option<TapOutcome>
    where
        H: HitTester + ?Sized,
    {
        let Some(hit) = hit_tester.hit_test(point).into_iter().next() else {
            debug!(
                target: "pythagar_core::session",
                "No feature point under tap at ({:.1}, {:.1})",
                point.x,
                point.y
            );
            return None;
        };

        let previous = self.markers.last().copied();
        let marker = self.markers.append(hit.position());
        let measured = previous.map(|prev| distance(&prev.position, &marker.position));
        let status = measured.map(|d| self.config.format_distance(d));

        if let Some(d) = measured {
            debug!(
                target: "pythagar_core::session",
                "Marker {} is {:.4} m from marker {}",
                marker.index,
                d,
                marker.index.saturating_sub(1)
            );
        }

        Some(TapOutcome {
            marker,
            distance: measured,
            status,
        })
    }

    pub fn on_tracking_state_changed(&self, state: Option<TrackingState>) -> &'static str {
        let text = tracking::status_text(state);
        debug!(target: "pythagar_core::session", "Tracking state {:?} -> {}", state, text);
        text
    }

    /// Forgets every marker; called when the AR session restarts tracking.
    pub fn on_session_reset(&mut self) {
        info!(
            target: "pythagar_core::session",
            "Session reset, discarding {} markers",
            self.markers.count()
        );
        self.markers.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{HitCandidate, ResolvedHits};
    use crate::math::Point3;
    use approx::assert_relative_eq;
    use nalgebra::Translation3;

    fn hit_at(x: f64, y: f64, z: f64) -> ResolvedHits {
        ResolvedHits::new(vec![HitCandidate::new(
            Translation3::new(x, y, z).to_homogeneous(),
        )])
    }

    fn tap() -> ScreenPoint {
        ScreenPoint::new(187.5, 406.0)
    }

    #[test]
    fn first_tap_places_marker_without_status() {
        let mut session = MeasureSession::default();
        let outcome = session
            .on_tap(tap(), &mut hit_at(0.0, 0.0, 0.0))
            .expect("hit");

        assert_eq!(outcome.marker.index, 0);
        assert!(outcome.distance.is_none());
        assert!(outcome.status.is_none());
        assert_eq!(session.markers().count(), 1);
    }

    #[test]
    fn second_tap_reports_distance() {
        let mut session = MeasureSession::default();
        session.on_tap(tap(), &mut hit_at(0.0, 0.0, 0.0));
        let outcome = session
            .on_tap(tap(), &mut hit_at(3.0, 4.0, 0.0))
            .expect("hit");

        assert_relative_eq!(outcome.distance.unwrap(), 5.0, epsilon = 1e-12);
        assert_eq!(outcome.status.as_deref(), Some("Distance: 5.00 meters"));
    }

    #[test]
    fn repeated_point_reports_zero() {
        let mut session = MeasureSession::default();
        session.on_tap(tap(), &mut hit_at(1.0, 1.0, 1.0));
        let outcome = session
            .on_tap(tap(), &mut hit_at(1.0, 1.0, 1.0))
            .expect("hit");
        assert_eq!(outcome.distance, Some(0.0));
        assert_eq!(outcome.status.as_deref(), Some("Distance: 0.00 meters"));
    }

    #[test]
    fn miss_is_a_no_op() {
        let mut session = MeasureSession::default();
        session.on_tap(tap(), &mut hit_at(0.5, 0.0, -1.0));

        let mut nothing = ResolvedHits::default();
        assert!(session.on_tap(tap(), &mut nothing).is_none());
        assert_eq!(session.markers().count(), 1);
        assert_eq!(
            session.markers().last().map(|m| m.position),
            Some(Point3::new(0.5, 0.0, -1.0))
        );
    }

    #[test]
    fn only_first_candidate_is_used() {
        let mut session = MeasureSession::default();
        let mut hits = ResolvedHits::new(vec![
            HitCandidate::new(Translation3::new(0.1, 0.0, -0.4).to_homogeneous()),
            HitCandidate::new(Translation3::new(9.0, 9.0, 9.0).to_homogeneous()),
        ]);
        session.on_tap(tap(), &mut hits);

        assert_eq!(session.markers().count(), 1);
        assert_eq!(
            session.markers().last().unwrap().position,
            Point3::new(0.1, 0.0, -0.4)
        );
    }

    #[test]
    fn distance_is_between_last_two_only() {
        let mut session = MeasureSession::default();
        session.on_tap(tap(), &mut hit_at(0.0, 0.0, 0.0));
        session.on_tap(tap(), &mut hit_at(10.0, 0.0, 0.0));
        let outcome = session
            .on_tap(tap(), &mut hit_at(10.0, 2.0, 0.0))
            .expect("hit");
        assert_relative_eq!(outcome.distance.unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn reset_clears_markers() {
        let mut session = MeasureSession::default();
        session.on_tap(tap(), &mut hit_at(0.0, 0.0, 0.0));
        session.on_tap(tap(), &mut hit_at(0.0, 0.0, 1.0));
        session.on_session_reset();

        assert_eq!(session.markers().count(), 0);
        assert!(session.markers().last().is_none());

        let outcome = session
            .on_tap(tap(), &mut hit_at(0.0, 0.0, 2.0))
            .expect("hit");
        assert!(outcome.distance.is_none());
        assert_eq!(outcome.marker.index, 0);
    }

    #[test]
    fn tracking_labels_pass_through() {
        let session = MeasureSession::default();
        assert_eq!(session.on_tracking_state_changed(None), "Loading...");
        assert_eq!(
            session.on_tracking_state_changed(Some(TrackingState::Normal)),
            "Ready"
        );
    }

    #[test]
    fn config_controls_formatting() {
        let config = MeasureConfig {
            decimal_places: 3,
            unit_label: "m".to_string(),
        };
        assert_eq!(config.format_distance(1.23456), "Distance: 1.235 m");
        assert_eq!(
            MeasureConfig::default().format_distance(0.456),
            "Distance: 0.46 meters"
        );
    }

    #[test]
    fn oversized_precision_is_capped() {
        let config: MeasureConfig =
            serde_json::from_str(r#"{"decimal_places": 70000}"#).expect("config parses");
        assert_eq!(config.decimal_places, 70000);
        assert_eq!(config.precision(), MAX_DECIMAL_PLACES);

        let mut session = MeasureSession::new(config);
        session.on_tap(tap(), &mut hit_at(0.0, 0.0, 0.0));
        let outcome = session
            .on_tap(tap(), &mut hit_at(3.0, 4.0, 0.0))
            .expect("hit");
        assert_eq!(
            outcome.status.as_deref(),
            Some("Distance: 5.000000000 meters")
        );
    }
}
