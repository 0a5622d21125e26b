//! Swift packaging layer for the PythagAR FFI.
//!
//! Builds `pythagar-ffi` as a single static library for the XCFramework the
//! iOS app links. The view controller keeps ownership of ARKit, SceneKit and
//! the label; it forwards taps (with its feature-point hit-test transforms)
//! and camera tracking changes through the re-exported C functions.

#![deny(unused_must_use)]

pub use pythagar_ffi::*;
