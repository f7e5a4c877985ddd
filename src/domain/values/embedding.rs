use crate::domain::error::DomainError;

/// Maximum allowed deviation of a vector's L2 norm from 1.
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-3;

/// Width of all-MiniLM-L6-v2 sentence embeddings.
pub const DEFAULT_DIMENSION: usize = 384;

/// A unit-length embedding. The only ways to build one are [`normalize`]
/// and [`from_unit`], so every instance satisfies `|norm - 1| <= tolerance`.
///
/// [`normalize`]: EmbeddingVector::normalize
/// [`from_unit`]: EmbeddingVector::from_unit
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    /// Scale `raw` to unit length. Zero, empty and non-finite vectors have no
    /// direction and are rejected.
    pub fn normalize(raw: Vec<f32>) -> Result<Self, DomainError> {
        let norm = l2_norm(&raw);
        if !norm.is_finite() || norm == 0.0 {
            return Err(DomainError::Normalization { norm });
        }
        let scaled: Vec<f32> = raw.into_iter().map(|x| (x as f64 / norm) as f32).collect();
        Self::from_unit(scaled, DEFAULT_NORM_TOLERANCE)
    }

    /// Accept a vector that is expected to be unit length already (e.g. read
    /// back from storage). Anything outside `tolerance` is an input-data error.
    pub fn from_unit(values: Vec<f32>, tolerance: f64) -> Result<Self, DomainError> {
        let norm = l2_norm(&values);
        if !norm.is_finite() || (norm - 1.0).abs() > tolerance {
            return Err(DomainError::Normalization { norm });
        }
        Ok(Self(values))
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn norm(&self) -> f64 {
        l2_norm(&self.0)
    }

    /// Cosine similarity with another unit vector.
    pub fn cosine(&self, other: &EmbeddingVector) -> f32 {
        cosine(&self.0, &other.0)
    }
}

impl AsRef<[f32]> for EmbeddingVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

fn l2_norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

/// Inner product of two unit vectors, clamped to [-1, 1] so rounding never
/// pushes a score out of range.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    dot.clamp(-1.0, 1.0) as f32
}
