//! Point types and related functionality

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// One vertex of a loaded sample
///
/// Carries everything the three color modes can render from: the
/// position, a per-vertex color, a normal and a cluster label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub position: Point3f,
    pub normal: Vector3f,
    pub color: [f32; 3],
    pub label: u32,
}

impl SamplePoint {
    /// Create a point at the given position with default attributes
    pub fn new(position: Point3f) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a point with a normal
    pub fn with_normal(position: Point3f, normal: Vector3f) -> Self {
        Self {
            position,
            normal,
            ..Default::default()
        }
    }
}

impl Default for SamplePoint {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            normal: Vector3f::new(0.0, 0.0, 1.0),
            color: [1.0, 1.0, 1.0],
            label: 0,
        }
    }
}
