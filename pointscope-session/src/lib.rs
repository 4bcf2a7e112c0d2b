//! Interactive session model for pointscope
//!
//! This crate is the UI-thread side of the system without the UI toolkit:
//! the [`Session`] owns the sample set and selection bookkeeping, the
//! [`Canvas`] turns input events into tool or camera actions and assembles
//! frame data, and worker threads report back over a channel instead of a
//! widget signal.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod session;
pub mod tool;
pub mod tracer;
pub mod worker;

pub use camera::Camera;
pub use canvas::{Canvas, CornerGizmo, CursorEvent, Frame, LineSegment, Modifiers};
pub use config::{Axis, PaintConfig};
pub use session::{CursorStatus, SampleRow, Session, SessionEvent};
pub use tool::{SelectTool, Tool, ToolKind};
pub use tracer::{TraceRecord, Tracer};
pub use worker::WorkerMessage;
