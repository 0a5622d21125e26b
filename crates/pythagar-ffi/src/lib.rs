use std::ffi::{CStr, c_char};
use std::ptr;
use std::slice;

use log::{debug, info, warn};
use pythagar_core::math::{self, transform_from_column_major_f32};
use pythagar_core::{Marker, MeasureConfig, MeasureSession, Point3, ScreenPoint, TrackingState};
use pythagar_providers::{ArKitHitResult, ArKitHitResultType, ArKitHitTester};

struct SessionContext {
    session: MeasureSession,
    last_status: Option<String>,
}

impl SessionContext {
    fn new(config: MeasureConfig) -> Self {
        Self {
            session: MeasureSession::new(config),
            last_status: None,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(MeasureConfig::default())
    }
}

/// Column-major `simd_float4x4`, laid out exactly as Swift stores it.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct PythagarTransform {
    pub elements: [f32; 16],
}

impl Default for PythagarTransform {
    fn default() -> Self {
        Self {
            elements: [0.0; 16],
        }
    }
}

/// Mirror of `ARHitTestResult.ResultType`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PythagarHitKind {
    FeaturePoint = 0,
    EstimatedHorizontalPlane = 1,
    EstimatedVerticalPlane = 2,
    ExistingPlane = 3,
    ExistingPlaneUsingExtent = 4,
    ExistingPlaneUsingGeometry = 5,
}

impl From<PythagarHitKind> for ArKitHitResultType {
    fn from(value: PythagarHitKind) -> Self {
        match value {
            PythagarHitKind::FeaturePoint => ArKitHitResultType::FeaturePoint,
            PythagarHitKind::EstimatedHorizontalPlane => {
                ArKitHitResultType::EstimatedHorizontalPlane
            }
            PythagarHitKind::EstimatedVerticalPlane => ArKitHitResultType::EstimatedVerticalPlane,
            PythagarHitKind::ExistingPlane => ArKitHitResultType::ExistingPlane,
            PythagarHitKind::ExistingPlaneUsingExtent => {
                ArKitHitResultType::ExistingPlaneUsingExtent
            }
            PythagarHitKind::ExistingPlaneUsingGeometry => {
                ArKitHitResultType::ExistingPlaneUsingGeometry
            }
        }
    }
}

/// One `ARHitTestResult` as the host received it.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct PythagarHitResult {
    pub kind: PythagarHitKind,
    pub distance: f32,
    pub world_transform: PythagarTransform,
}

impl From<&PythagarHitResult> for ArKitHitResult {
    fn from(value: &PythagarHitResult) -> Self {
        ArKitHitResult {
            kind: value.kind.into(),
            distance: value.distance,
            world_transform: value.world_transform.elements,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PythagarPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Point3> for PythagarPoint {
    fn from(value: Point3) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
        }
    }
}

impl From<PythagarPoint> for Point3 {
    fn from(value: PythagarPoint) -> Self {
        Point3::new(value.x, value.y, value.z)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PythagarMarker {
    pub index: u64,
    pub position: PythagarPoint,
}

impl From<&Marker> for PythagarMarker {
    fn from(value: &Marker) -> Self {
        Self {
            index: value.index,
            position: value.position.into(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PythagarTapResult {
    pub marker: PythagarMarker,
    pub has_distance: bool,
    pub distance: f64,
}

/// Display settings; a null `unit_label` keeps the default ("meters").
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct PythagarConfig {
    pub decimal_places: u32,
    pub unit_label: *const c_char,
}

impl PythagarConfig {
    fn to_config(&self) -> MeasureConfig {
        let mut config = MeasureConfig {
            decimal_places: self.decimal_places as usize,
            ..MeasureConfig::default()
        };
        if !self.unit_label.is_null() {
            let label = unsafe { CStr::from_ptr(self.unit_label) };
            match label.to_str() {
                Ok(label) => config.unit_label = label.to_string(),
                Err(err) => warn!("Ignoring non UTF-8 unit label: {err}"),
            }
        }
        config
    }
}

/// Opaque handle for a measurement session
#[repr(C)]
pub struct PythagarSessionHandle {
    _private: [u8; 0],
}

fn handle_to_context<'a>(handle: *mut PythagarSessionHandle) -> &'a mut SessionContext {
    unsafe { &mut *(handle as *mut SessionContext) }
}

fn context_to_handle(ctx: *mut SessionContext) -> *mut PythagarSessionHandle {
    ctx as *mut PythagarSessionHandle
}

/// Copies `text` plus a NUL terminator into a caller buffer.
///
/// `out_written` always receives the required size so callers can retry.
unsafe fn write_c_string(
    text: &str,
    out_buffer: *mut c_char,
    buffer_len: usize,
    out_written: *mut usize,
) -> bool {
    let required = text.len() + 1;
    if !out_written.is_null() {
        unsafe {
            *out_written = required;
        }
    }
    if out_buffer.is_null() || buffer_len < required {
        return false;
    }
    unsafe {
        ptr::copy_nonoverlapping(text.as_ptr() as *const c_char, out_buffer, text.len());
        *out_buffer.add(text.len()) = 0;
    }
    true
}

#[unsafe(no_mangle)]
pub extern "C" fn pythagar_init_logging() {
    match env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .try_init()
    {
        Ok(()) => info!("PythagAR logging initialized"),
        Err(err) => debug!("Keeping existing logger: {err}"),
    }
}

/// Creates a session with default display settings
#[unsafe(no_mangle)]
pub extern "C" fn pythagar_session_create() -> *mut PythagarSessionHandle {
    let ctx = Box::new(SessionContext::default());
    context_to_handle(Box::into_raw(ctx))
}

/// Creates a session with custom display settings
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_session_create_with_config(
    config: *const PythagarConfig,
) -> *mut PythagarSessionHandle {
    if config.is_null() {
        return pythagar_session_create();
    }
    let config = unsafe { &*config };
    let ctx = Box::new(SessionContext::new(config.to_config()));
    context_to_handle(Box::into_raw(ctx))
}

/// Destroys a session
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_session_destroy(handle: *mut PythagarSessionHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(handle as *mut SessionContext));
    }
}

/// Handles a single-finger tap.
///
/// `results` holds the host's ARKit hit-test results for the tap location.
/// Only feature points are used, nearest first. Returns `false` when there
/// was nothing to place a marker on; the session is left unchanged then.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_handle_tap(
    handle: *mut PythagarSessionHandle,
    screen_x: f64,
    screen_y: f64,
    results: *const PythagarHitResult,
    result_count: usize,
    out_result: *mut PythagarTapResult,
) -> bool {
    if handle.is_null() {
        return false;
    }

    let context = handle_to_context(handle);
    let mut hits: Vec<ArKitHitResult> = if results.is_null() || result_count == 0 {
        Vec::new()
    } else {
        let raw = unsafe { slice::from_raw_parts(results, result_count) };
        raw.iter().map(ArKitHitResult::from).collect()
    };

    let mut tester = ArKitHitTester::feature_points(move |_point: ScreenPoint| {
        std::mem::take(&mut hits)
    });
    let Some(outcome) = context
        .session
        .on_tap(ScreenPoint::new(screen_x, screen_y), &mut tester)
    else {
        return false;
    };

    if outcome.status.is_some() {
        context.last_status = outcome.status.clone();
    }

    if !out_result.is_null() {
        unsafe {
            *out_result = PythagarTapResult {
                marker: PythagarMarker::from(&outcome.marker),
                has_distance: outcome.distance.is_some(),
                distance: outcome.distance.unwrap_or(0.0),
            };
        }
    }
    true
}

/// Copies the most recent distance readout, if any tap produced one.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_last_status(
    handle: *mut PythagarSessionHandle,
    out_buffer: *mut c_char,
    buffer_len: usize,
    out_written: *mut usize,
) -> bool {
    if handle.is_null() {
        return false;
    }

    let context = handle_to_context(handle);
    let Some(status) = context.last_status.as_deref() else {
        return false;
    };
    unsafe { write_c_string(status, out_buffer, buffer_len, out_written) }
}

/// Maps a camera tracking state to label text.
///
/// `state`: 0 = not available, 1 = limited, 2 = normal; `reason` is the
/// limited reason (0 initializing, 1 excessive motion, 2 insufficient
/// features, 3 relocalizing). Unknown states produce "Loading...".
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_tracking_changed(
    handle: *mut PythagarSessionHandle,
    state: i32,
    reason: i32,
    out_buffer: *mut c_char,
    buffer_len: usize,
    out_written: *mut usize,
) -> bool {
    if handle.is_null() {
        return false;
    }

    let context = handle_to_context(handle);
    let text = context
        .session
        .on_tracking_state_changed(TrackingState::from_raw(state, reason));
    unsafe { write_c_string(text, out_buffer, buffer_len, out_written) }
}

/// Clears every marker after the AR session restarts tracking
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_session_reset(handle: *mut PythagarSessionHandle) -> bool {
    if handle.is_null() {
        return false;
    }

    let context = handle_to_context(handle);
    context.session.on_session_reset();
    context.last_status = None;
    true
}

/// Number of markers placed since the last reset
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_marker_count(handle: *mut PythagarSessionHandle) -> usize {
    if handle.is_null() {
        return 0;
    }
    handle_to_context(handle).session.markers().count()
}

/// Gets the most recently placed marker
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_last_marker(
    handle: *mut PythagarSessionHandle,
    out_marker: *mut PythagarMarker,
) -> bool {
    if handle.is_null() || out_marker.is_null() {
        return false;
    }

    let context = handle_to_context(handle);
    let Some(marker) = context.session.markers().last() else {
        return false;
    };
    unsafe {
        *out_marker = PythagarMarker::from(marker);
    }
    true
}

/// Lists markers in placement order
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_list_markers(
    handle: *mut PythagarSessionHandle,
    out_markers: *mut PythagarMarker,
    max_markers: usize,
) -> usize {
    if handle.is_null() || out_markers.is_null() || max_markers == 0 {
        return 0;
    }

    let context = handle_to_context(handle);
    let markers = context.session.markers().markers();
    let count = markers.len().min(max_markers);
    let dest = unsafe { slice::from_raw_parts_mut(out_markers, count) };
    for (dst, marker) in dest.iter_mut().zip(markers.iter()) {
        *dst = PythagarMarker::from(marker);
    }
    count
}

/// Length of the path through every placed marker
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pythagar_path_length(handle: *mut PythagarSessionHandle) -> f64 {
    if handle.is_null() {
        return 0.0;
    }
    handle_to_context(handle).session.markers().total_path_length()
}

/// Translation column of a world transform
#[unsafe(no_mangle)]
pub extern "C" fn pythagar_position_from_transform(transform: PythagarTransform) -> PythagarPoint {
    let matrix = transform_from_column_major_f32(&transform.elements);
    math::position_from_transform(&matrix).into()
}

/// Euclidean distance between two world points
#[unsafe(no_mangle)]
pub extern "C" fn pythagar_distance(a: PythagarPoint, b: PythagarPoint) -> f64 {
    math::distance(&a.into(), &b.into())
}
