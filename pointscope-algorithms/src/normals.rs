//! Normal estimation
//!
//! PCA over k-nearest neighborhoods. Each normal is the eigenvector of the
//! neighborhood covariance with the smallest eigenvalue, flipped so it
//! faces the given orientation vector (the session passes the camera view
//! direction, matching how computed normals are displayed).

use crate::nearest_neighbor::{BruteForceSearch, NearestNeighborSearch};
use nalgebra::{Matrix3, SymmetricEigen};
use pointscope_core::{Error, Point3f, Result, Vector3f};
use rayon::prelude::*;

/// Estimate one normal per input point
///
/// # Arguments
/// * `points` - Sample positions in local coordinates
/// * `k` - Neighborhood size, at least 3
/// * `orient_toward` - Vector every normal is flipped to face
///
/// # Returns
/// * `Result<Vec<Vector3f>>` - Unit normals, one per input point
pub fn estimate_normals(
    points: &[Point3f],
    k: usize,
    orient_toward: Vector3f,
) -> Result<Vec<Vector3f>> {
    if points.is_empty() {
        return Ok(Vec::new());
    }
    if k < 3 {
        return Err(Error::InvalidData(
            "neighborhood size must be at least 3".to_string(),
        ));
    }

    let search = BruteForceSearch::new(points);
    let orientation = if orient_toward.norm_squared() > 0.0 {
        orient_toward.normalize()
    } else {
        Vector3f::new(0.0, 0.0, 1.0)
    };

    let normals = points
        .par_iter()
        .map(|point| {
            let neighbors = search.find_k_nearest(point, k);
            estimate_one(points, &neighbors, orientation)
        })
        .collect();

    Ok(normals)
}

fn estimate_one(points: &[Point3f], neighbors: &[(usize, f32)], orientation: Vector3f) -> Vector3f {
    let n = neighbors.len() as f32;

    let mut centroid = Vector3f::zeros();
    for &(idx, _) in neighbors {
        centroid += points[idx].coords;
    }
    centroid /= n;

    let mut covariance = Matrix3::zeros();
    for &(idx, _) in neighbors {
        let d = points[idx].coords - centroid;
        covariance += d * d.transpose();
    }
    covariance /= n;

    let eigen = SymmetricEigen::new(covariance);
    let mut min_idx = 0;
    for i in 1..3 {
        if eigen.eigenvalues[i] < eigen.eigenvalues[min_idx] {
            min_idx = i;
        }
    }

    let mut normal: Vector3f = eigen.eigenvectors.column(min_idx).into();
    let norm = normal.norm();
    if norm > 0.0 {
        normal /= norm;
    } else {
        normal = orientation;
    }
    if normal.dot(&orientation) < 0.0 {
        normal = -normal;
    }
    normal
}
