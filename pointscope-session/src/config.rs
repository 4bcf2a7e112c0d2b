//! Paint parameters for the render pass
//!
//! Owned by the canvas and passed explicitly into draw calls; mutation goes
//! through validated setters rather than global state.

use pointscope_core::Vector3f;
use serde::{Deserialize, Serialize};

/// Wheel increment applied to the point size per scroll step
const POINT_SIZE_INCREMENT: f32 = 1.0;

/// Wheel increment applied to a step-offset axis per scroll step
const STEP_INCREMENT: f32 = 0.1;

/// A coordinate axis of the step offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Paint parameters: point size and the per-sample step offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintConfig {
    point_size: f32,
    step: Vector3f,
}

impl PaintConfig {
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Set the point size, clamped to be non-negative
    pub fn set_point_size(&mut self, point_size: f32) {
        self.point_size = point_size.max(0.0);
    }

    /// Per-axis spacing inserted between consecutive samples
    pub fn step(&self) -> Vector3f {
        self.step
    }

    pub fn set_step(&mut self, step: Vector3f) {
        self.step = step;
    }

    /// Scene-space offset applied to the sample at the given index
    pub fn offset_for(&self, sample_idx: usize) -> Vector3f {
        self.step * sample_idx as f32
    }

    /// Adjust the point size by a number of wheel steps
    pub fn nudge_point_size(&mut self, steps: i32) {
        self.set_point_size(self.point_size + POINT_SIZE_INCREMENT * steps as f32);
    }

    /// Adjust one step-offset axis by a number of wheel steps
    pub fn nudge_step_axis(&mut self, axis: Axis, steps: i32) {
        let delta = STEP_INCREMENT * steps as f32;
        match axis {
            Axis::X => self.step.x += delta,
            Axis::Y => self.step.y += delta,
            Axis::Z => self.step.z += delta,
        }
    }
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            point_size: 2.0,
            step: Vector3f::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_size_clamped_at_zero() {
        let mut config = PaintConfig::default();
        config.nudge_point_size(-100);
        assert_eq!(config.point_size(), 0.0);
        config.nudge_point_size(3);
        assert_eq!(config.point_size(), 3.0);
    }

    #[test]
    fn test_step_nudges_one_axis() {
        let mut config = PaintConfig::default();
        config.nudge_step_axis(Axis::Z, 2);
        assert!((config.step().z - 0.2).abs() < 1e-6);
        assert_eq!(config.step().x, 0.0);
        assert_eq!(config.step().y, 0.0);
    }

    #[test]
    fn test_offset_scales_with_index() {
        let mut config = PaintConfig::default();
        config.set_step(Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(config.offset_for(0), Vector3f::zeros());
        assert_eq!(config.offset_for(3), Vector3f::new(0.0, 0.0, 3.0));
    }
}
