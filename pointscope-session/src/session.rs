//! The editing session
//!
//! Owns the sample set, the canvas, the tracer and the selection
//! bookkeeping, and is the only place that changes the set's structure.
//! Worker threads report back over a channel; `poll_events` drains it
//! without blocking, so nothing on the render path ever waits on a worker.

use crate::canvas::{Canvas, CursorEvent, Frame, Modifiers};
use crate::tool::{SelectTool, Tool, ToolKind};
use crate::tracer::Tracer;
use crate::worker::{self, WorkerMessage};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};
use pointscope_core::{object_color, Error, Point3f, Result, Rgb, Sample, SampleSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

/// One row of the sample list view
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub index: usize,
    pub color: Rgb,
    pub vertex_count: usize,
}

/// Status readout for the cursor position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorStatus {
    /// World coordinate under the cursor, if any geometry is there
    pub world: Option<Point3f>,
    /// Nearest vertex of the selected sample, if one is selected
    pub vertex: Option<usize>,
}

/// What `poll_events` applied and reports to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SamplesScanned { added: usize },
    ClusteringFinished { sample_idx: usize, clusters: usize },
    NormalsFinished { sample_idx: usize },
    WorkerFailed { sample_idx: Option<usize>, message: String },
}

/// A point cloud editing session
#[derive(Debug)]
pub struct Session {
    set: SampleSet,
    canvas: Canvas,
    tracer: Tracer,
    cur_select: Option<usize>,
    last_select: Option<usize>,
    events_tx: Sender<WorkerMessage>,
    events_rx: Receiver<WorkerMessage>,
}

impl Session {
    pub fn new() -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            set: SampleSet::new(),
            canvas: Canvas::new(),
            tracer: Tracer::new(),
            cur_select: None,
            last_select: None,
            events_tx,
            events_rx,
        }
    }

    pub fn sample_set(&self) -> &SampleSet {
        &self.set
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn selected_sample(&self) -> Option<usize> {
        self.cur_select
    }

    /// Drop all samples and every piece of per-session state
    pub fn reset(&mut self) {
        self.set.clear();
        self.cur_select = None;
        self.last_select = None;
        self.tracer.clear_records();
        self.canvas.set_show_trajectory(false);
        self.canvas.set_tool(Tool::Empty);
    }

    /// Import every recognized file under `dir`, replacing the session
    ///
    /// Files that fail to load are skipped without advancing the index
    /// counter, so sample indices stay dense from 0. A missing directory
    /// aborts before any state changes. Returns the number imported.
    pub fn import_directory(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(Error::InvalidData(format!(
                "not a directory: {}",
                dir.display()
            )));
        }
        let candidates = pointscope_io::list_import_candidates(dir)?;

        self.reset();
        let mut sample_idx = 0;
        for path in candidates {
            match pointscope_io::read_sample_cloud(&path) {
                Ok(cloud) => {
                    let name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("sample")
                        .to_string();
                    self.set.push_back(Arc::new(Sample::new(
                        sample_idx,
                        name,
                        cloud,
                        object_color(sample_idx),
                    )));
                    sample_idx += 1;
                }
                Err(e) => warn!("import: skipping {}: {e}", path.display()),
            }
        }

        info!("imported {} samples from {}", sample_idx, dir.display());
        Ok(sample_idx)
    }

    /// Write every sample to `dir`, one XYZ file per sample
    pub fn save_to_directory(&self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(Error::InvalidData(format!(
                "not a directory: {}",
                dir.display()
            )));
        }
        for sample in self.set.iter() {
            let cloud = sample.lock().points().clone();
            let path = dir.join(format!("{}.xyz", sample.name()));
            pointscope_io::write_sample_cloud(&cloud, &path)?;
        }
        info!("saved {} samples to {}", self.set.len(), dir.display());
        Ok(())
    }

    /// Mark one sample selected, clearing the previous selection first
    ///
    /// Idempotent when the same row is selected twice; at most one sample
    /// carries the selected flag at any time.
    pub fn select_sample(&mut self, index: usize) -> Result<()> {
        self.set.get(index)?;
        if self.cur_select == Some(index) {
            self.set.get(index)?.lock().set_selected(true);
            return Ok(());
        }

        self.last_select = self.cur_select;
        if let Some(previous) = self.last_select {
            if let Ok(sample) = self.set.get(previous) {
                sample.lock().set_selected(false);
            }
        }
        self.set.get(index)?.lock().set_selected(true);
        self.cur_select = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        if let Some(current) = self.cur_select {
            if let Ok(sample) = self.set.get(current) {
                sample.lock().set_selected(false);
            }
        }
        self.last_select = self.cur_select.take();
    }

    /// Switch the tool mode
    ///
    /// Select and ShowNormal bind to the currently selected sample and are
    /// refused (returning false, no state change) when nothing is
    /// selected. The previous tool and its state are dropped.
    pub fn set_tool_mode(&mut self, kind: ToolKind) -> bool {
        match kind {
            ToolKind::Empty => {
                self.canvas.set_tool(Tool::Empty);
                true
            }
            ToolKind::Select => match self.cur_select {
                Some(sample_idx) => {
                    self.canvas.set_tool(Tool::Select(SelectTool::new(sample_idx)));
                    true
                }
                None => {
                    debug!("select tool refused: no sample selected");
                    false
                }
            },
            ToolKind::ShowNormal => match self.cur_select {
                Some(sample_idx) => {
                    self.canvas.set_tool(Tool::ShowNormal { sample_idx });
                    true
                }
                None => {
                    debug!("show-normal tool refused: no sample selected");
                    false
                }
            },
        }
    }

    /// Status-bar readout for a cursor position
    pub fn cursor_status(&self, world: Option<Point3f>) -> CursorStatus {
        let vertex = match (world, self.cur_select) {
            (Some(point), Some(sample_idx)) => {
                self.canvas.pick_vertex(&self.set, sample_idx, Some(point))
            }
            _ => None,
        };
        CursorStatus { world, vertex }
    }

    /// Rows for the sample list view: index, color swatch, vertex count
    pub fn rows(&self) -> Vec<SampleRow> {
        self.set
            .iter()
            .map(|sample| {
                let guard = sample.lock();
                SampleRow {
                    index: sample.id(),
                    color: guard.color(),
                    vertex_count: guard.num_vertices(),
                }
            })
            .collect()
    }

    pub fn set_sample_visible(&mut self, index: usize, visible: bool) -> Result<()> {
        self.set.get(index)?.lock().set_visible(visible);
        Ok(())
    }

    /// Rebuild the tracer from the Select tool's picks and show it
    ///
    /// The rebuild is one-shot: once a Select tool is active the previous
    /// records are dropped, even when nothing new gets traced.
    ///
    /// Trajectories assume the identity vertex correspondence across
    /// samples. That assumption only makes sense when every sample has the
    /// same vertex count, so it is verified here instead of silently
    /// producing nonsense edges.
    pub fn show_selected_trajectory(&mut self) -> Result<()> {
        let Some(select) = self.canvas.tool().as_select() else {
            return Ok(());
        };
        let picked: Vec<usize> = select.picked().to_vec();
        self.tracer.clear_records();
        let sample_count = self.set.len();
        if sample_count < 2 || picked.is_empty() {
            self.canvas.set_show_trajectory(true);
            return Ok(());
        }

        let vertex_count = self.set.get(0)?.lock().num_vertices();
        for sample in self.set.iter().skip(1) {
            let n = sample.lock().num_vertices();
            if n != vertex_count {
                return Err(Error::InvalidData(format!(
                    "cannot trace trajectories: sample {} has {} vertices, sample 0 has {}",
                    sample.id(),
                    n,
                    vertex_count
                )));
            }
        }

        for &vertex in &picked {
            if vertex >= vertex_count {
                continue;
            }
            for from in 0..sample_count - 1 {
                self.tracer.add_record(from, vertex, from + 1, vertex);
            }
        }
        self.canvas.set_show_trajectory(true);
        Ok(())
    }

    /// Hide the trajectory overlay and drop its records
    pub fn clear_trajectory(&mut self) {
        self.canvas.set_show_trajectory(false);
        self.tracer.clear_records();
    }

    /// Delete the Select tool's picked vertices from its bound sample
    pub fn delete_picked_vertices(&mut self) -> Result<usize> {
        self.canvas.delete_selected_vertices(&self.set)
    }

    /// Assemble the frame data for one render pass
    pub fn render(&self) -> Frame {
        self.canvas.render(&self.set, &self.tracer)
    }

    pub fn handle_mouse_press(&mut self, event: &CursorEvent) {
        self.canvas.handle_mouse_press(&self.set, event);
    }

    pub fn handle_mouse_move(&mut self, event: &CursorEvent) {
        self.canvas.handle_mouse_move(&self.set, event);
    }

    pub fn handle_mouse_release(&mut self, event: &CursorEvent) {
        self.canvas.handle_mouse_release(&self.set, event);
    }

    pub fn handle_wheel(&mut self, steps: i32, modifiers: Modifiers) {
        self.canvas.handle_wheel(steps, modifiers);
    }

    /// Cluster the selected sample on a worker thread
    ///
    /// No-op returning `None` when nothing is selected.
    pub fn spawn_clustering(&self, clusters: usize) -> Option<JoinHandle<()>> {
        let sample_idx = self.cur_select?;
        let sample = self.set.get(sample_idx).ok()?;
        Some(worker::spawn_clustering(
            sample.clone(),
            clusters,
            None,
            self.events_tx.clone(),
        ))
    }

    /// Estimate the selected sample's normals on a worker thread
    ///
    /// Normals are oriented toward the current camera view direction.
    pub fn spawn_normal_estimation(&self, k: usize) -> Option<JoinHandle<()>> {
        let sample_idx = self.cur_select?;
        let sample = self.set.get(sample_idx).ok()?;
        Some(worker::spawn_normal_estimation(
            sample.clone(),
            k,
            self.canvas.camera.view_direction(),
            self.events_tx.clone(),
        ))
    }

    /// Load a directory's clouds on a worker thread
    ///
    /// The loaded clouds arrive through `poll_events`, which appends them
    /// to the set on this thread.
    pub fn spawn_directory_scan(&self, dir: PathBuf) -> JoinHandle<()> {
        worker::spawn_directory_scan(dir, self.events_tx.clone())
    }

    /// Drain worker completions without blocking and apply follow-ups
    pub fn poll_events(&mut self) -> Vec<SessionEvent> {
        let messages: Vec<WorkerMessage> = self.events_rx.try_iter().collect();
        let mut events = Vec::with_capacity(messages.len());

        for message in messages {
            match message {
                WorkerMessage::ScanFinished { clouds } => {
                    let mut added = 0;
                    for (name, cloud) in clouds {
                        let index = self.set.len();
                        self.set.push_back(Arc::new(Sample::new(
                            index,
                            name,
                            cloud,
                            object_color(index),
                        )));
                        added += 1;
                    }
                    info!("scan appended {added} samples");
                    events.push(SessionEvent::SamplesScanned { added });
                }
                WorkerMessage::ClusteringFinished { sample_idx, clusters } => {
                    info!("clustering of sample {sample_idx} into {clusters} clusters finished");
                    events.push(SessionEvent::ClusteringFinished { sample_idx, clusters });
                }
                WorkerMessage::NormalsFinished { sample_idx } => {
                    info!("normal estimation for sample {sample_idx} finished");
                    events.push(SessionEvent::NormalsFinished { sample_idx });
                }
                WorkerMessage::WorkerFailed { sample_idx, message } => {
                    warn!("worker failed (sample {sample_idx:?}): {message}");
                    events.push(SessionEvent::WorkerFailed { sample_idx, message });
                }
            }
        }

        events
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
