use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::AssignError;
use crate::scratch::Scratch;

/// Distance metric used to compare a frame against a cluster center.
///
/// The set is closed: dispatch happens through a `match` at every call site,
/// and [`Metric::needs_scratch`] tells the engine whether each worker has to
/// own a [`Scratch`] pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Metric {
    /// Plain Euclidean norm of the difference vector.
    #[default]
    #[serde(rename = "euclidean")]
    Euclidean,

    /// Minimum RMSD between two 3-D point sets after removing translation
    /// and optimal rotation. Vectors are read atom-major (`x0 y0 z0 x1 ...`).
    #[serde(rename = "minRMSD")]
    MinRmsd,
}

impl Metric {
    /// Every supported metric, in canonical order.
    pub const ALL: [Metric; 2] = [Metric::Euclidean, Metric::MinRmsd];

    /// Returns the canonical metric name.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::MinRmsd => "minRMSD",
        }
    }

    /// Reports whether the metric needs a private [`Scratch`] pair per worker.
    pub fn needs_scratch(self) -> bool {
        match self {
            Metric::Euclidean => false,
            Metric::MinRmsd => true,
        }
    }

    /// Computes the distance between `a` and `b`.
    ///
    /// `scratch` is only touched by metrics that need it; for the others an
    /// empty [`Scratch::none`] is fine.
    #[inline]
    pub fn distance(self, a: &[f32], b: &[f32], scratch: &mut Scratch) -> f32 {
        match self {
            Metric::Euclidean => euclidean_distance(a, b),
            Metric::MinRmsd => min_rmsd_distance(a, b, scratch),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = AssignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AssignError::InvalidMetric(s.to_string()))
    }
}

/// Euclidean distance between two vectors.
/// Accumulates in f64 to keep long vectors accurate.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut sum: f64 = 0.0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let d = x as f64 - y as f64;
        sum += d * d;
    }
    sum.sqrt() as f32
}

/// Moves the centroid of an atom-major point set to the origin in-place.
///
/// Returns the trace of the centered set (sum of squared coordinates).
/// Coordinates past the last whole atom are left untouched.
pub fn center_and_trace(coords: &mut [f32]) -> f64 {
    let n_atoms = coords.len() / 3;
    if n_atoms == 0 {
        return 0.0;
    }
    let atoms = &mut coords[..n_atoms * 3];

    let mut c = [0.0f64; 3];
    for p in atoms.chunks_exact(3) {
        c[0] += p[0] as f64;
        c[1] += p[1] as f64;
        c[2] += p[2] as f64;
    }
    let n = n_atoms as f64;
    let c = [(c[0] / n) as f32, (c[1] / n) as f32, (c[2] / n) as f32];

    let mut trace: f64 = 0.0;
    for p in atoms.chunks_exact_mut(3) {
        for k in 0..3 {
            p[k] -= c[k];
            trace += (p[k] as f64) * (p[k] as f64);
        }
    }
    trace
}

/// Minimum RMSD between two atom-major point sets.
///
/// Both inputs are copied into `scratch` before centering, so `a` and `b`
/// are never modified.
pub fn min_rmsd_distance(a: &[f32], b: &[f32], scratch: &mut Scratch) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "minRMSD: vector lengths differ");
    debug_assert_eq!(a.len() % 3, 0, "minRMSD: length is not a multiple of 3");

    let n_atoms = a.len().min(b.len()) / 3;
    if n_atoms == 0 {
        return 0.0;
    }

    let (xa, xb) = scratch.load(&a[..n_atoms * 3], &b[..n_atoms * 3]);
    let trace_a = center_and_trace(xa);
    let trace_b = center_and_trace(xb);
    msd_centered(xa, xb, trace_a, trace_b).sqrt() as f32
}

/// Mean squared displacement of two centered point sets after optimal
/// rotation, given their traces.
///
/// The optimal overlap is the sum of singular values of the correlation
/// matrix, with the smallest one flipped when the best orthogonal transform
/// would be a reflection.
fn msd_centered(xa: &[f32], xb: &[f32], trace_a: f64, trace_b: f64) -> f64 {
    let mut h = Matrix3::<f64>::zeros();
    for (pa, pb) in xa.chunks_exact(3).zip(xb.chunks_exact(3)) {
        let va = Vector3::new(pa[0] as f64, pa[1] as f64, pa[2] as f64);
        let vb = Vector3::new(pb[0] as f64, pb[1] as f64, pb[2] as f64);
        h += va * vb.transpose();
    }

    let det = h.determinant();
    let sv = h.svd(false, false).singular_values;
    let mut overlap = sv[0] + sv[1] + sv[2];
    if det < 0.0 {
        overlap -= 2.0 * sv.min();
    }

    let n = (xa.len() / 3) as f64;
    let msd = (trace_a + trace_b - 2.0 * overlap) / n;
    if msd <= 0.0 { 0.0 } else { msd }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotate_z(coords: &[f32], theta: f32) -> Vec<f32> {
        let (s, c) = theta.sin_cos();
        coords
            .chunks_exact(3)
            .flat_map(|p| [c * p[0] - s * p[1], s * p[0] + c * p[1], p[2]])
            .collect()
    }

    // Four atoms with six distinct pairwise distances, so the set is chiral.
    const TETRA: [f32; 12] = [
        0.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 2.0, 0.0, //
        0.0, 0.0, 3.0,
    ];

    #[test]
    fn euclidean_basic() {
        let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-6, "expected 5, got {d}");
    }

    #[test]
    fn euclidean_symmetric() {
        let a = [0.3, -1.2, 7.5, 2.25];
        let b = [-4.0, 0.5, 1.0, 9.0];
        let ab = euclidean_distance(&a, &b);
        let ba = euclidean_distance(&b, &a);
        assert!((ab - ba).abs() < 1e-6, "{ab} != {ba}");
    }

    #[test]
    fn euclidean_identical_is_zero() {
        let a = [1.5, 2.5, 3.5];
        assert_eq!(euclidean_distance(&a, &a), 0.0);
    }

    #[test]
    fn center_and_trace_removes_centroid() {
        let mut coords = [0.0, 0.0, 0.0, 2.0, 4.0, 6.0];
        let trace = center_and_trace(&mut coords);
        assert_eq!(coords, [-1.0, -2.0, -3.0, 1.0, 2.0, 3.0]);
        assert!((trace - 28.0).abs() < 1e-9, "trace = {trace}");
    }

    #[test]
    fn center_and_trace_empty() {
        let mut coords: [f32; 0] = [];
        assert_eq!(center_and_trace(&mut coords), 0.0);
    }

    #[test]
    fn min_rmsd_translation_invariant() {
        let shifted: Vec<f32> = TETRA
            .chunks_exact(3)
            .flat_map(|p| [p[0] + 10.0, p[1] - 3.0, p[2] + 0.5])
            .collect();
        let mut scratch = Scratch::new(TETRA.len()).unwrap();
        let d = min_rmsd_distance(&TETRA, &shifted, &mut scratch);
        assert!(d < 1e-2, "translated copy should be ~0, got {d}");
    }

    #[test]
    fn min_rmsd_rotation_invariant() {
        let rotated = rotate_z(&TETRA, 0.7);
        let mut scratch = Scratch::new(TETRA.len()).unwrap();
        let d = min_rmsd_distance(&TETRA, &rotated, &mut scratch);
        assert!(d < 1e-2, "rotated copy should be ~0, got {d}");
    }

    #[test]
    fn min_rmsd_does_not_mutate_inputs() {
        let a = TETRA;
        let b = rotate_z(&TETRA, 1.1);
        let b_before = b.clone();
        let mut scratch = Scratch::new(a.len()).unwrap();
        let _ = min_rmsd_distance(&a, &b, &mut scratch);
        assert_eq!(a, TETRA);
        assert_eq!(b, b_before);
    }

    #[test]
    fn min_rmsd_not_larger_than_plain_rmsd() {
        let b: Vec<f32> = TETRA.iter().enumerate().map(|(i, &x)| x + 0.1 * (i as f32)).collect();
        let mut scratch = Scratch::new(TETRA.len()).unwrap();
        let d = min_rmsd_distance(&TETRA, &b, &mut scratch);
        let plain = euclidean_distance(&TETRA, &b) / (4.0f32).sqrt();
        assert!(d > 0.0);
        assert!(d <= plain + 1e-5, "aligned {d} should not exceed unaligned {plain}");
    }

    #[test]
    fn min_rmsd_mirror_image_is_not_zero() {
        let mirrored: Vec<f32> = TETRA
            .chunks_exact(3)
            .flat_map(|p| [-p[0], p[1], p[2]])
            .collect();
        let mut scratch = Scratch::new(TETRA.len()).unwrap();
        let d = min_rmsd_distance(&TETRA, &mirrored, &mut scratch);
        assert!(d > 1e-2, "mirror image should not align, got {d}");
    }

    #[test]
    fn metric_parse_and_display() {
        assert_eq!("euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!("minRMSD".parse::<Metric>().unwrap(), Metric::MinRmsd);
        assert_eq!(Metric::MinRmsd.to_string(), "minRMSD");

        let err = "manhattan".parse::<Metric>().unwrap_err();
        assert_eq!(err, AssignError::InvalidMetric("manhattan".into()));
    }

    #[test]
    fn metric_names_are_case_sensitive() {
        assert!("MINRMSD".parse::<Metric>().is_err());
        assert!("Euclidean".parse::<Metric>().is_err());
    }

    #[test]
    fn metric_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Metric::MinRmsd).unwrap();
        assert_eq!(json, "\"minRMSD\"");
        let m: Metric = serde_json::from_str("\"euclidean\"").unwrap();
        assert_eq!(m, Metric::Euclidean);
    }

    #[test]
    fn scratch_requirement() {
        assert!(!Metric::Euclidean.needs_scratch());
        assert!(Metric::MinRmsd.needs_scratch());
    }
}
