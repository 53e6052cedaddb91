//! Parallel nearest-center assignment for trajectory clustering.
//!
//! Labels every frame (a row of a dense `f32` matrix) with the index of its
//! closest cluster center, under either a Euclidean or a minimum-RMSD metric.
//!
//! # Usage
//!
//! ```
//! use chainsaw_clustering::{Matrix, assign_to_vec};
//!
//! let frames = [0.0, 0.0, 5.0, 5.0, 10.0, 0.0];
//! let centers = [0.0, 0.0, 10.0, 0.0];
//! let frames = Matrix::from_flat(&frames, 2).unwrap();
//! let centers = Matrix::from_flat(&centers, 2).unwrap();
//!
//! let labels = assign_to_vec(&frames, &centers, "euclidean", 0).unwrap();
//! assert_eq!(labels, vec![0, 0, 1]);
//! ```
//!
//! # Design
//!
//! Frames are split into contiguous, block-aligned ranges (see [`partition`]),
//! one per worker. Workers never talk to each other and each owns its own
//! [`Scratch`] pair, so the result does not depend on the thread count.
//! Ties go to the lowest center index.

mod assign;
mod config;
mod error;
mod matrix;
mod metric;
mod partition;
mod scratch;

pub use assign::{assign, assign_checked, assign_to_vec, Assigner};
pub use config::{resolve_threads, AssignConfig, NUM_THREADS_ENV};
pub use error::{AssignError, Result};
pub use matrix::{flatten_rows, Matrix};
pub use metric::{center_and_trace, euclidean_distance, min_rmsd_distance, Metric};
pub use partition::{partition, BLOCK_SIZE};
pub use scratch::Scratch;
