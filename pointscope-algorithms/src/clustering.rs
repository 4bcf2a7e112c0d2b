//! Point clustering
//!
//! K-means over vertex positions. This is the workload the session runs on
//! a worker thread and writes back into a sample's per-vertex labels.

use pointscope_core::{Error, Point3f, Result, Vector3f};
use rand::prelude::*;
use rayon::prelude::*;
use std::collections::HashSet;

/// Cluster points into `k` groups and return one label per point
///
/// # Arguments
/// * `points` - Input positions
/// * `k` - Number of clusters, 1 ..= points.len()
/// * `max_iters` - Iteration cap; the loop also stops once labels settle
/// * `seed` - Fixed seed for reproducible runs, or `None` for a random one
///
/// # Returns
/// * `Result<Vec<u32>>` - Cluster label per input point
pub fn kmeans_labels(
    points: &[Point3f],
    k: usize,
    max_iters: usize,
    seed: Option<u64>,
) -> Result<Vec<u32>> {
    if k == 0 {
        return Err(Error::InvalidData("cluster count must be positive".to_string()));
    }
    if points.len() < k {
        return Err(Error::InvalidData(format!(
            "cannot form {} clusters from {} points",
            k,
            points.len()
        )));
    }
    if max_iters == 0 {
        return Err(Error::InvalidData("max iterations must be positive".to_string()));
    }

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    // Seed centroids from k distinct input points
    let mut chosen = HashSet::new();
    while chosen.len() < k {
        chosen.insert(rng.gen_range(0..points.len()));
    }
    let mut centroids: Vec<Point3f> = chosen.into_iter().map(|idx| points[idx]).collect();

    let mut labels = vec![0u32; points.len()];
    for _iteration in 0..max_iters {
        let new_labels: Vec<u32> = points
            .par_iter()
            .map(|point| nearest_centroid(point, &centroids))
            .collect();

        let settled = new_labels == labels;
        labels = new_labels;
        if settled {
            break;
        }

        // Recompute centroids; empty clusters keep their previous centroid
        let mut sums = vec![Vector3f::zeros(); k];
        let mut counts = vec![0usize; k];
        for (point, &label) in points.iter().zip(&labels) {
            sums[label as usize] += point.coords;
            counts[label as usize] += 1;
        }
        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            if counts[cluster] > 0 {
                *centroid = Point3f::from(sums[cluster] / counts[cluster] as f32);
            }
        }
    }

    Ok(labels)
}

fn nearest_centroid(point: &Point3f, centroids: &[Point3f]) -> u32 {
    let mut best = 0usize;
    let mut best_distance = f32::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let distance = (point - centroid).norm_squared();
        if distance < best_distance {
            best_distance = distance;
            best = idx;
        }
    }
    best as u32
}
