mod arkit;

pub use arkit::{
    ArKitHitResult, ArKitHitResultType, ArKitHitTester, ArKitLimitedReason, ArKitTrackingState,
};
