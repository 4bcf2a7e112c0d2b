//! Canvas: frame assembly and input routing
//!
//! The render/input half of the session. Each frame starts with a corner
//! orientation gizmo; then either the active tool draws its bound sample,
//! or every visible sample is drawn under its own lock (lock, draw,
//! unlock, one sample at a time); finally the tracer overlay is appended
//! when enabled. Input events go to the Select tool when one is active and
//! fall through to camera navigation otherwise.

use crate::camera::Camera;
use crate::config::{Axis, PaintConfig};
use crate::tool::{Tool, ToolKind};
use crate::tracer::Tracer;
use log::warn;
use pointscope_core::{ColorMode, Point3f, Result, Rgb, RenderBatch, SampleSet, Vector3f};

/// Radians of orbit per pixel of drag
const ORBIT_SENSITIVITY: f32 = 0.01;

/// Camera zoom distance per unmodified wheel step
const ZOOM_PER_STEP: f32 = 0.1;

/// Scene-space length of the normal overlay whiskers
const NORMAL_OVERLAY_LENGTH: f32 = 0.1;

const NORMAL_OVERLAY_COLOR: Rgb = [0.15, 0.85, 0.30];
const PICK_HIGHLIGHT_COLOR: Rgb = [1.0, 0.2, 0.1];

/// Modifier-key state accompanying a wheel event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };
}

/// A mouse event over the canvas
///
/// `world` is the scene-space point under the cursor when geometry is hit,
/// the way a viewport reports "point under pixel".
#[derive(Debug, Clone, Copy)]
pub struct CursorEvent {
    pub screen: (f32, f32),
    pub world: Option<Point3f>,
}

/// A colored line segment of an overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point3f,
    pub end: Point3f,
    pub color: Rgb,
}

/// Fixed-size orientation gizmo drawn in a corner viewport
#[derive(Debug, Clone, Copy)]
pub struct CornerGizmo {
    /// Side length of the corner viewport, in pixels
    pub viewport_size: u32,
    /// World axes expressed in view space
    pub x_axis: Vector3f,
    pub y_axis: Vector3f,
    pub z_axis: Vector3f,
}

/// Everything one render pass produces
#[derive(Debug, Clone)]
pub struct Frame {
    pub gizmo: CornerGizmo,
    pub batches: Vec<RenderBatch>,
    pub overlay: Vec<LineSegment>,
}

/// Owns the camera, the active tool and the paint parameters
#[derive(Debug)]
pub struct Canvas {
    pub camera: Camera,
    color_mode: ColorMode,
    config: PaintConfig,
    tool: Tool,
    show_trajectory: bool,
    gizmo_size: u32,
    last_cursor: Option<(f32, f32)>,
    nav_dragging: bool,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            camera: Camera::default(),
            color_mode: ColorMode::Vertex,
            config: PaintConfig::default(),
            tool: Tool::Empty,
            show_trajectory: false,
            gizmo_size: 150,
            last_cursor: None,
            nav_dragging: false,
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    pub fn config(&self) -> &PaintConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PaintConfig {
        &mut self.config
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Replace the active tool, dropping the previous one and its state
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn show_trajectory(&self) -> bool {
        self.show_trajectory
    }

    pub fn set_show_trajectory(&mut self, show: bool) {
        self.show_trajectory = show;
    }

    /// Map a world-space cursor point to the nearest vertex of a sample
    ///
    /// Subtracts the sample's step offset and applies the inverse scene
    /// transform before the nearest-vertex scan, mirroring the status-bar
    /// coordinate path.
    pub fn pick_vertex(
        &self,
        set: &SampleSet,
        sample_idx: usize,
        world: Option<Point3f>,
    ) -> Option<usize> {
        let world = world?;
        let sample = set.get(sample_idx).ok()?;
        let guard = sample.lock();
        let unstepped = world - self.config.offset_for(sample_idx);
        let local = guard
            .matrix_to_scene_coord()
            .inverse()?
            .transform_point(&unstepped);
        guard.closest_vtx(&local)
    }

    pub fn handle_mouse_press(&mut self, set: &SampleSet, event: &CursorEvent) {
        self.last_cursor = Some(event.screen);
        if let Some(sample_idx) = self.tool.as_select().map(|s| s.sample_idx()) {
            let pick = self.pick_vertex(set, sample_idx, event.world);
            if let Some(select) = self.tool.as_select_mut() {
                select.begin_drag(pick);
            }
        } else {
            self.nav_dragging = true;
        }
    }

    pub fn handle_mouse_move(&mut self, set: &SampleSet, event: &CursorEvent) {
        if let Some(sample_idx) = self.tool.as_select().map(|s| s.sample_idx()) {
            let pick = self.pick_vertex(set, sample_idx, event.world);
            if let Some(select) = self.tool.as_select_mut() {
                select.extend_drag(pick);
            }
        } else if self.nav_dragging {
            if let Some((last_x, last_y)) = self.last_cursor {
                let dx = event.screen.0 - last_x;
                let dy = event.screen.1 - last_y;
                self.camera
                    .orbit(-dx * ORBIT_SENSITIVITY, -dy * ORBIT_SENSITIVITY);
            }
        }
        self.last_cursor = Some(event.screen);
    }

    pub fn handle_mouse_release(&mut self, set: &SampleSet, event: &CursorEvent) {
        if let Some(sample_idx) = self.tool.as_select().map(|s| s.sample_idx()) {
            let pick = self.pick_vertex(set, sample_idx, event.world);
            if let Some(select) = self.tool.as_select_mut() {
                select.end_drag(pick);
            }
        } else {
            self.nav_dragging = false;
        }
        self.last_cursor = Some(event.screen);
    }

    /// Wheel input: modifier chords adjust paint parameters, an
    /// unmodified wheel zooms the camera
    pub fn handle_wheel(&mut self, steps: i32, modifiers: Modifiers) {
        match (modifiers.ctrl, modifiers.alt, modifiers.shift) {
            (true, false, false) => self.config.nudge_point_size(steps),
            (false, true, false) => self.config.nudge_step_axis(Axis::Z, steps),
            (true, true, false) => self.config.nudge_step_axis(Axis::Y, steps),
            (true, true, true) => self.config.nudge_step_axis(Axis::X, steps),
            _ => self.camera.zoom(steps as f32 * ZOOM_PER_STEP),
        }
    }

    /// Delete the Select tool's accumulated picks from its bound sample
    ///
    /// No-op returning `Ok(0)` unless a Select tool with picks is active.
    /// The pick set is cleared afterwards since the indices no longer
    /// refer to the same vertices.
    pub fn delete_selected_vertices(&mut self, set: &SampleSet) -> Result<usize> {
        let Some(select) = self.tool.as_select_mut() else {
            return Ok(0);
        };
        if select.picked().is_empty() {
            return Ok(0);
        }
        let sample = set.get(select.sample_idx())?;
        let mut guard = sample.lock();
        let removed = guard.delete_vertex_group(select.picked());
        select.clear_picks();
        Ok(removed)
    }

    /// Assemble the frame data for one render pass
    pub fn render(&self, set: &SampleSet, tracer: &Tracer) -> Frame {
        let mut frame = Frame {
            gizmo: self.corner_gizmo(),
            batches: Vec::new(),
            overlay: Vec::new(),
        };

        // tool mode: the tool draws its bound sample and nothing else
        if self.tool.kind() != ToolKind::Empty {
            self.render_tool(set, &mut frame);
            return frame;
        }

        for sample in set.iter() {
            let guard = sample.lock();
            if !guard.visible() {
                continue;
            }
            let offset = self.config.offset_for(sample.id());
            frame
                .batches
                .push(guard.draw(self.color_mode, offset, self.config.point_size()));
        }

        if self.show_trajectory {
            frame.overlay.extend(tracer.draw(set, &self.config));
        }

        frame
    }

    fn render_tool(&self, set: &SampleSet, frame: &mut Frame) {
        let Some(sample_idx) = self.tool.sample_idx() else {
            return;
        };
        let sample = match set.get(sample_idx) {
            Ok(sample) => sample,
            Err(_) => {
                warn!("tool bound to missing sample {sample_idx}");
                return;
            }
        };

        let guard = sample.lock();
        let offset = self.config.offset_for(sample_idx);
        let batch = guard.draw(self.color_mode, offset, self.config.point_size());

        match &self.tool {
            Tool::ShowNormal { .. } => {
                let to_scene = guard.matrix_to_scene_coord();
                for point in guard.points().iter() {
                    let start = to_scene.transform_point(&point.position) + offset;
                    let direction = to_scene.transform_vector(&point.normal);
                    let norm = direction.norm();
                    if norm <= 0.0 {
                        continue;
                    }
                    frame.overlay.push(LineSegment {
                        start,
                        end: start + direction / norm * NORMAL_OVERLAY_LENGTH,
                        color: NORMAL_OVERLAY_COLOR,
                    });
                }
            }
            Tool::Select(select) => {
                let picked: Vec<Point3f> = select
                    .picked()
                    .iter()
                    .filter(|&&idx| idx < batch.positions.len())
                    .map(|&idx| batch.positions[idx])
                    .collect();
                if !picked.is_empty() {
                    let count = picked.len();
                    frame.batches.push(RenderBatch {
                        sample_idx,
                        positions: picked,
                        colors: vec![PICK_HIGHLIGHT_COLOR; count],
                        point_size: self.config.point_size() + 2.0,
                    });
                }
            }
            Tool::Empty => {}
        }

        frame.batches.insert(0, batch);
    }

    fn corner_gizmo(&self) -> CornerGizmo {
        let view = self.camera.view_matrix();
        let rotation = view.fixed_view::<3, 3>(0, 0);
        CornerGizmo {
            viewport_size: self.gizmo_size,
            x_axis: rotation * Vector3f::x(),
            y_axis: rotation * Vector3f::y(),
            z_axis: rotation * Vector3f::z(),
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}
