//! Background workers
//!
//! Long-running operations run on plain threads and report completion over
//! a channel the session drains on its own thread. Workers never touch the
//! sample set structure; they hold one sample's lock only while snapshotting
//! or writing back, and run the computation unlocked. There is no
//! cancellation: a worker runs to completion and then signals done.

use crossbeam_channel::Sender;
use log::{info, warn};
use pointscope_algorithms::{estimate_normals, kmeans_labels};
use pointscope_core::{PointCloud, Sample, SamplePoint, Vector3f};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Iteration cap for background clustering runs
const CLUSTER_MAX_ITERS: usize = 100;

/// Completion message a worker sends back to the session thread
#[derive(Debug)]
pub enum WorkerMessage {
    /// A directory scan finished; the session appends the loaded clouds
    ScanFinished {
        clouds: Vec<(String, PointCloud<SamplePoint>)>,
    },
    /// Cluster labels were written into the sample
    ClusteringFinished { sample_idx: usize, clusters: usize },
    /// Normals were written into the sample
    NormalsFinished { sample_idx: usize },
    /// The worker gave up; no state was changed beyond what it reports
    WorkerFailed {
        sample_idx: Option<usize>,
        message: String,
    },
}

/// Cluster a sample's vertices on a worker thread
pub fn spawn_clustering(
    sample: Arc<Sample>,
    k: usize,
    seed: Option<u64>,
    tx: Sender<WorkerMessage>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let sample_idx = sample.id();
        let positions = sample.lock().positions();

        let message = match kmeans_labels(&positions, k, CLUSTER_MAX_ITERS, seed) {
            Ok(labels) => {
                let mut guard = sample.lock();
                match guard.set_labels(&labels) {
                    Ok(()) => WorkerMessage::ClusteringFinished {
                        sample_idx,
                        clusters: k,
                    },
                    // geometry changed while we were computing
                    Err(e) => WorkerMessage::WorkerFailed {
                        sample_idx: Some(sample_idx),
                        message: e.to_string(),
                    },
                }
            }
            Err(e) => WorkerMessage::WorkerFailed {
                sample_idx: Some(sample_idx),
                message: e.to_string(),
            },
        };

        // a dropped receiver just means the session is gone
        let _ = tx.send(message);
    })
}

/// Estimate a sample's normals on a worker thread
///
/// `orient_toward` is typically the camera view direction at the time the
/// operation was requested.
pub fn spawn_normal_estimation(
    sample: Arc<Sample>,
    k: usize,
    orient_toward: Vector3f,
    tx: Sender<WorkerMessage>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let sample_idx = sample.id();
        let positions = sample.lock().positions();

        let message = match estimate_normals(&positions, k, orient_toward) {
            Ok(normals) => {
                let mut guard = sample.lock();
                match guard.set_normals(&normals) {
                    Ok(()) => WorkerMessage::NormalsFinished { sample_idx },
                    Err(e) => WorkerMessage::WorkerFailed {
                        sample_idx: Some(sample_idx),
                        message: e.to_string(),
                    },
                }
            }
            Err(e) => WorkerMessage::WorkerFailed {
                sample_idx: Some(sample_idx),
                message: e.to_string(),
            },
        };

        let _ = tx.send(message);
    })
}

/// Load every recognized file under a directory on a worker thread
///
/// Failed loads are skipped with a warning, as in the synchronous import
/// path. The session appends the loaded clouds when it drains the channel,
/// keeping structural mutation on its own thread.
pub fn spawn_directory_scan(dir: PathBuf, tx: Sender<WorkerMessage>) -> JoinHandle<()> {
    thread::spawn(move || {
        let message = match pointscope_io::list_import_candidates(&dir) {
            Ok(candidates) => {
                let mut clouds = Vec::new();
                for path in candidates {
                    match pointscope_io::read_sample_cloud(&path) {
                        Ok(cloud) => {
                            let name = path
                                .file_stem()
                                .and_then(|s| s.to_str())
                                .unwrap_or("sample")
                                .to_string();
                            clouds.push((name, cloud));
                        }
                        Err(e) => warn!("scan: skipping {}: {e}", path.display()),
                    }
                }
                info!("scan of {} found {} clouds", dir.display(), clouds.len());
                WorkerMessage::ScanFinished { clouds }
            }
            Err(e) => WorkerMessage::WorkerFailed {
                sample_idx: None,
                message: e.to_string(),
            },
        };

        let _ = tx.send(message);
    })
}
