use nalgebra::Matrix4;
use thiserror::Error;

/// World-space position in the frame established by the AR session.
pub type Point3 = nalgebra::Point3<f64>;

/// Homogeneous world transform attached to a hit-test result.
pub type Transform4x4 = Matrix4<f64>;

const TRANSFORM_ELEMENTS: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("transform needs {expected} elements, got {actual}")]
    ElementCount { expected: usize, actual: usize },
}

/// Returns the translation column (x, y, z of column 3) of a homogeneous transform.
///
/// Nothing about the rest of the matrix is checked; non-finite values are
/// returned as-is.
pub fn position_from_transform(transform: &Transform4x4) -> Point3 {
    let position = Point3::new(transform[(0, 3)], transform[(1, 3)], transform[(2, 3)]);
    log::trace!(target: "pythagar_core::math", "hit position: {:.4?}", position);
    position
}

/// Euclidean distance between two world points.
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Builds a transform from 16 column-major elements (simd `float4x4` layout).
pub fn transform_from_column_major(elements: &[f64]) -> Result<Transform4x4, GeometryError> {
    if elements.len() != TRANSFORM_ELEMENTS {
        return Err(GeometryError::ElementCount {
            expected: TRANSFORM_ELEMENTS,
            actual: elements.len(),
        });
    }
    Ok(Transform4x4::from_column_slice(elements))
}

/// Widens an ARKit `matrix_float4x4` into the `f64` transform used by the core.
pub fn transform_from_column_major_f32(elements: &[f32; 16]) -> Transform4x4 {
    Transform4x4::from_iterator(elements.iter().map(|value| f64::from(*value)))
}
