//! Samples: individually lockable point clouds
//!
//! A [`Sample`] is one loaded point cloud together with its object color,
//! visibility and selection flags, and the transform from sample-local to
//! scene coordinates. All mutable state sits behind a single mutex; render
//! and worker code take the lock only for the duration of one read or
//! mutation (lock, operate, unlock) so that no two samples are ever locked
//! at once by the render pass.

use crate::color::{label_color, Rgb};
use crate::error::{Error, Result};
use crate::point::{Point3f, SamplePoint, Vector3f};
use crate::point_cloud::PointCloud;
use crate::transform::Transform3D;
use std::sync::{Mutex, MutexGuard};

/// Which vertex attribute drives per-point rendering color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Vertex,
    Object,
    Label,
}

/// The point data a draw pass produces for one sample
#[derive(Debug, Clone)]
pub struct RenderBatch {
    pub sample_idx: usize,
    pub positions: Vec<Point3f>,
    pub colors: Vec<Rgb>,
    pub point_size: f32,
}

#[derive(Debug)]
struct SampleData {
    points: PointCloud<SamplePoint>,
    color: Rgb,
    visible: bool,
    selected: bool,
    transform: Transform3D,
}

/// One loaded point cloud sample with its own exclusive lock
#[derive(Debug)]
pub struct Sample {
    id: usize,
    name: String,
    data: Mutex<SampleData>,
}

impl Sample {
    /// Create a sample from a loaded cloud
    pub fn new(id: usize, name: impl Into<String>, points: PointCloud<SamplePoint>, color: Rgb) -> Self {
        Self {
            id,
            name: name.into(),
            data: Mutex::new(SampleData {
                points,
                color,
                visible: true,
                selected: false,
                transform: Transform3D::identity(),
            }),
        }
    }

    /// Stable index of this sample within its set
    pub fn id(&self) -> usize {
        self.id
    }

    /// Name the sample was imported under (usually the file stem)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire this sample's exclusive lock
    ///
    /// A poisoned lock is recovered rather than propagated; a worker that
    /// panicked mid-mutation leaves the geometry in its last written state.
    pub fn lock(&self) -> SampleGuard<'_> {
        let data = match self.data.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        SampleGuard { id: self.id, data }
    }
}

/// Exclusive access to a sample's mutable state
pub struct SampleGuard<'a> {
    id: usize,
    data: MutexGuard<'a, SampleData>,
}

impl SampleGuard<'_> {
    pub fn num_vertices(&self) -> usize {
        self.data.points.len()
    }

    pub fn points(&self) -> &PointCloud<SamplePoint> {
        &self.data.points
    }

    /// Snapshot of the vertex positions in sample-local coordinates
    pub fn positions(&self) -> Vec<Point3f> {
        self.data.points.iter().map(|p| p.position).collect()
    }

    pub fn color(&self) -> Rgb {
        self.data.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.data.color = color;
    }

    pub fn visible(&self) -> bool {
        self.data.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.data.visible = visible;
    }

    pub fn selected(&self) -> bool {
        self.data.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.data.selected = selected;
    }

    /// Transform from sample-local to scene coordinates
    pub fn matrix_to_scene_coord(&self) -> Transform3D {
        self.data.transform
    }

    pub fn set_transform(&mut self, transform: Transform3D) {
        self.data.transform = transform;
    }

    /// Index of the vertex nearest to a point in sample-local coordinates
    ///
    /// Linear scan; `None` when the sample has no geometry.
    pub fn closest_vtx(&self, query: &Point3f) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, point) in self.data.points.iter().enumerate() {
            let d = (point.position - query).norm_squared();
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((idx, d));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Remove the given vertex indices
    ///
    /// Duplicate indices count once and out-of-range indices are ignored.
    /// The relative order of the surviving vertices is preserved. Returns
    /// the number of vertices actually removed.
    pub fn delete_vertex_group(&mut self, indices: &[usize]) -> usize {
        let len = self.data.points.len();
        let mut doomed = vec![false; len];
        for &idx in indices {
            if idx < len {
                doomed[idx] = true;
            }
        }
        let removed = doomed.iter().filter(|&&d| d).count();
        if removed == 0 {
            return 0;
        }
        let mut keep = doomed.iter().map(|&d| !d);
        self.data.points.points.retain(|_| keep.next().unwrap_or(true));
        removed
    }

    /// Produce the point batch for one render pass
    ///
    /// Read-only: positions are mapped through the scene transform and the
    /// per-sample step offset, colors are selected by the color mode.
    pub fn draw(&self, mode: ColorMode, offset: Vector3f, point_size: f32) -> RenderBatch {
        let to_scene = self.data.transform;
        let positions = self
            .data
            .points
            .iter()
            .map(|p| to_scene.transform_point(&p.position) + offset)
            .collect();
        let colors = match mode {
            ColorMode::Vertex => self.data.points.iter().map(|p| p.color).collect(),
            ColorMode::Object => vec![self.data.color; self.data.points.len()],
            ColorMode::Label => self.data.points.iter().map(|p| label_color(p.label)).collect(),
        };
        RenderBatch {
            sample_idx: self.id,
            positions,
            colors,
            point_size,
        }
    }

    /// Overwrite per-vertex cluster labels
    pub fn set_labels(&mut self, labels: &[u32]) -> Result<()> {
        if labels.len() != self.data.points.len() {
            return Err(Error::InvalidData(format!(
                "label count {} does not match vertex count {}",
                labels.len(),
                self.data.points.len()
            )));
        }
        for (point, &label) in self.data.points.iter_mut().zip(labels) {
            point.label = label;
        }
        Ok(())
    }

    /// Overwrite per-vertex normals
    pub fn set_normals(&mut self, normals: &[Vector3f]) -> Result<()> {
        if normals.len() != self.data.points.len() {
            return Err(Error::InvalidData(format!(
                "normal count {} does not match vertex count {}",
                normals.len(),
                self.data.points.len()
            )));
        }
        for (point, &normal) in self.data.points.iter_mut().zip(normals) {
            point.normal = normal;
        }
        Ok(())
    }
}
