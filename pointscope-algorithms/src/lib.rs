//! Algorithms for pointscope
//!
//! The long-running workloads a session hands to worker threads:
//! nearest-neighbor queries, normal estimation and clustering.

pub mod clustering;
pub mod nearest_neighbor;
pub mod normals;

pub use clustering::*;
pub use nearest_neighbor::*;
pub use normals::*;
