//! Assignment request loading.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use chainsaw_clustering::{AssignError, Metric, flatten_rows};
use serde::Deserialize;
use thiserror::Error;

/// Error type for request loading.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse request (tried JSON and YAML)")]
    ParseFailed,
}

/// Frames, centers and optional settings, as read from a request file.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRequest {
    pub frames: Vec<Vec<f32>>,
    pub centers: Vec<Vec<f32>>,
    #[serde(default)]
    pub metric: Option<Metric>,
    #[serde(default)]
    pub n_threads: Option<i32>,
}

/// Row-major buffers ready to be wrapped in [`chainsaw_clustering::Matrix`].
#[derive(Debug)]
pub struct FlatData {
    pub frames: Vec<f32>,
    pub centers: Vec<f32>,
    pub dim: usize,
}

impl AssignRequest {
    /// Flattens frames and centers, taking the dimension from the first
    /// center. Rows that disagree are rejected.
    pub fn flatten(&self) -> Result<FlatData, AssignError> {
        let dim = self.centers.first().ok_or(AssignError::NoCenters)?.len();
        if dim == 0 {
            return Err(AssignError::EmptyDimension);
        }
        let centers = flatten_rows(&self.centers, dim)?;
        let frames = flatten_rows(&self.frames, dim).map_err(|e| match e {
            AssignError::RaggedRow { got, .. } => AssignError::DimensionMismatch {
                expected: dim,
                got,
            },
            other => other,
        })?;
        Ok(FlatData {
            frames,
            centers,
            dim,
        })
    }
}

/// Loads a request from a path, or from stdin when the path is `-`.
pub fn load_request(path: &str) -> Result<AssignRequest, RequestError> {
    if path == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return parse_request(&data, path);
    }
    let data = fs::read(path)?;
    parse_request(&data, path)
}

/// Parses request data, picking the format from the file extension.
pub fn parse_request(data: &[u8], path: impl AsRef<Path>) -> Result<AssignRequest, RequestError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => {
            if let Ok(v) = serde_json::from_slice(data) {
                return Ok(v);
            }
            if let Ok(v) = serde_yaml::from_slice(data) {
                return Ok(v);
            }
            Err(RequestError::ParseFailed)
        }
    }
}
