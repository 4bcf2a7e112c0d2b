//! Trajectory tracer
//!
//! A process-wide record of directed edges linking a vertex in one sample
//! to a vertex in the next. Rebuilt in one shot (clear, then adds) per
//! trajectory-selection event and drawn as an overlay.

use crate::canvas::LineSegment;
use crate::config::PaintConfig;
use pointscope_core::{trajectory_color, Point3f, SampleSet};
use serde::{Deserialize, Serialize};

/// One directed trajectory edge between vertices of two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub from_sample: usize,
    pub from_vertex: usize,
    pub to_sample: usize,
    pub to_vertex: usize,
}

/// The record of trajectory edges drawn as an overlay
#[derive(Debug, Clone, Default)]
pub struct Tracer {
    records: Vec<TraceRecord>,
}

impl Tracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the edge list
    pub fn clear_records(&mut self) {
        self.records.clear();
    }

    /// Append one edge
    pub fn add_record(
        &mut self,
        from_sample: usize,
        from_vertex: usize,
        to_sample: usize,
        to_vertex: usize,
    ) {
        self.records.push(TraceRecord {
            from_sample,
            from_vertex,
            to_sample,
            to_vertex,
        });
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve the current edges to scene-space line segments
    ///
    /// Each endpoint sample is locked briefly and individually. Records
    /// whose sample or vertex no longer exists (after a reset or a vertex
    /// deletion) are skipped rather than treated as errors.
    pub fn draw(&self, set: &SampleSet, config: &PaintConfig) -> Vec<LineSegment> {
        self.records
            .iter()
            .filter_map(|record| {
                let start = resolve_endpoint(set, config, record.from_sample, record.from_vertex)?;
                let end = resolve_endpoint(set, config, record.to_sample, record.to_vertex)?;
                Some(LineSegment {
                    start,
                    end,
                    color: trajectory_color(record.from_vertex),
                })
            })
            .collect()
    }
}

fn resolve_endpoint(
    set: &SampleSet,
    config: &PaintConfig,
    sample_idx: usize,
    vertex_idx: usize,
) -> Option<Point3f> {
    let sample = set.get(sample_idx).ok()?;
    let guard = sample.lock();
    if vertex_idx >= guard.num_vertices() {
        return None;
    }
    let local = guard.points()[vertex_idx].position;
    let scene = guard.matrix_to_scene_coord().transform_point(&local);
    Some(scene + config.offset_for(sample_idx))
}
