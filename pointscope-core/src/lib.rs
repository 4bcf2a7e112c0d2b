//! Core data structures for pointscope
//!
//! This crate provides the fundamental types of a point cloud editing
//! session: points, point clouds, individually lockable samples, the
//! ordered sample set, and scene transforms.

pub mod color;
pub mod error;
pub mod point;
pub mod point_cloud;
pub mod sample;
pub mod sample_set;
pub mod transform;

pub use color::*;
pub use error::*;
pub use point::*;
pub use point_cloud::*;
pub use sample::*;
pub use sample_set::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};

/// Common result type for pointscope operations
pub type Result<T> = std::result::Result<T, Error>;
