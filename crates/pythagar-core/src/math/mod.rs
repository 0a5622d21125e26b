pub mod geometry;

pub use geometry::{
    GeometryError, Point3, Transform4x4, distance, position_from_transform,
    transform_from_column_major, transform_from_column_major_f32,
};
