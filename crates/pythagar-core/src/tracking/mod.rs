use serde::{Deserialize, Serialize};

pub const STATUS_LOADING: &str = "Loading...";
pub const STATUS_NOT_AVAILABLE: &str = "Not available";
pub const STATUS_ANALYZING: &str = "Analyzing...";
pub const STATUS_READY: &str = "Ready";

/// Why the camera pose is only partially trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitedReason {
    Initializing,
    ExcessiveMotion,
    InsufficientFeatures,
    Relocalizing,
}

impl LimitedReason {
    fn from_raw(code: i32) -> Option<Self> {
        match code {
            0 => Some(LimitedReason::Initializing),
            1 => Some(LimitedReason::ExcessiveMotion),
            2 => Some(LimitedReason::InsufficientFeatures),
            3 => Some(LimitedReason::Relocalizing),
            _ => None,
        }
    }
}

/// Camera tracking quality reported by the AR session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingState {
    NotAvailable,
    Limited(Option<LimitedReason>),
    Normal,
}

impl TrackingState {
    /// Decodes the integer pair the host passes across the C boundary.
    ///
    /// `0` = not available, `1` = limited (with `reason`), `2` = normal.
    /// Unknown codes yield `None`.
    pub fn from_raw(code: i32, reason: i32) -> Option<Self> {
        match code {
            0 => Some(TrackingState::NotAvailable),
            1 => Some(TrackingState::Limited(LimitedReason::from_raw(reason))),
            2 => Some(TrackingState::Normal),
            _ => None,
        }
    }

    pub fn status_text(self) -> &'static str {
        match self {
            TrackingState::NotAvailable => STATUS_NOT_AVAILABLE,
            TrackingState::Limited(_) => STATUS_ANALYZING,
            TrackingState::Normal => STATUS_READY,
        }
    }
}

/// Label text for a tracking state; anything not yet reported reads as loading.
pub fn status_text(state: Option<TrackingState>) -> &'static str {
    state.map_or(STATUS_LOADING, TrackingState::status_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_state_to_label() {
        assert_eq!(status_text(Some(TrackingState::NotAvailable)), "Not available");
        assert_eq!(
            status_text(Some(TrackingState::Limited(None))),
            "Analyzing..."
        );
        assert_eq!(status_text(Some(TrackingState::Normal)), "Ready");
        assert_eq!(status_text(None), "Loading...");
    }

    #[test]
    fn limited_reason_does_not_change_label() {
        for reason in [
            LimitedReason::Initializing,
            LimitedReason::ExcessiveMotion,
            LimitedReason::InsufficientFeatures,
            LimitedReason::Relocalizing,
        ] {
            assert_eq!(
                status_text(Some(TrackingState::Limited(Some(reason)))),
                STATUS_ANALYZING
            );
        }
    }

    #[test]
    fn raw_codes_decode() {
        assert_eq!(TrackingState::from_raw(0, -1), Some(TrackingState::NotAvailable));
        assert_eq!(
            TrackingState::from_raw(1, 2),
            Some(TrackingState::Limited(Some(
                LimitedReason::InsufficientFeatures
            )))
        );
        assert_eq!(
            TrackingState::from_raw(1, 99),
            Some(TrackingState::Limited(None))
        );
        assert_eq!(TrackingState::from_raw(2, 0), Some(TrackingState::Normal));
        assert_eq!(TrackingState::from_raw(7, 0), None);
        assert_eq!(status_text(TrackingState::from_raw(-1, 0)), STATUS_LOADING);
    }
}
