// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Scoring functions for knowledge graph embeddings.
//!
//! | Geometry | Models | Vector layout |
//! |----------|--------|---------------|
//! | Translation | TransE | real |
//! | Bilinear | DistMult | real |
//! | Rotation | RotatE | complex, (re, im) interleaved |
//! | Bilinear | ComplEx | complex, (re, im) interleaved |
//! | Hypercomplex rotation | QuatE | quaternion, (r, i, j, k) interleaved |
//!
//! Higher scores are more plausible. Scales differ per function, which is
//! why the ranker normalizes every criterion on its own.

use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scoring function of a fitted model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringFunction {
    /// -||h + r - t||
    TransE,
    /// <h, r, t>
    DistMult,
    /// -||h ∘ r - t|| in complex space
    RotatE,
    /// Re(<h, r, conj(t)>)
    ComplEx,
    /// <h ⊗ r/|r|, t> in quaternion space
    QuatE,
}

impl ScoringFunction {
    pub const ALL: [ScoringFunction; 5] = [
        ScoringFunction::TransE,
        ScoringFunction::DistMult,
        ScoringFunction::RotatE,
        ScoringFunction::ComplEx,
        ScoringFunction::QuatE,
    ];

    /// Number of reals per embedding coordinate; the dimension must be a
    /// multiple of it
    pub fn components(&self) -> usize {
        match self {
            Self::TransE | Self::DistMult => 1,
            Self::RotatE | Self::ComplEx => 2,
            Self::QuatE => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransE => "transe",
            Self::DistMult => "distmult",
            Self::RotatE => "rotate",
            Self::ComplEx => "complex",
            Self::QuatE => "quate",
        }
    }

    /// Score a triple; all slices have the model dimension
    pub fn score(&self, head: &[f32], relation: &[f32], tail: &[f32]) -> f32 {
        match self {
            Self::TransE => score_transe(head, relation, tail),
            Self::DistMult => score_distmult(head, relation, tail),
            Self::RotatE => score_rotate(head, relation, tail),
            Self::ComplEx => score_complex(head, relation, tail),
            Self::QuatE => score_quate(head, relation, tail),
        }
    }
}

impl fmt::Display for ScoringFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringFunction {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| IndexError::UnknownScoring(s.to_string()))
    }
}

fn score_transe(head: &[f32], relation: &[f32], tail: &[f32]) -> f32 {
    let sum_sq: f32 = head
        .iter()
        .zip(relation)
        .zip(tail)
        .map(|((h, r), t)| {
            let diff = h + r - t;
            diff * diff
        })
        .sum();
    -sum_sq.sqrt()
}

fn score_distmult(head: &[f32], relation: &[f32], tail: &[f32]) -> f32 {
    head.iter()
        .zip(relation)
        .zip(tail)
        .map(|((h, r), t)| h * r * t)
        .sum()
}

fn score_rotate(head: &[f32], relation: &[f32], tail: &[f32]) -> f32 {
    let mut sum_sq = 0.0;
    for ((h, r), t) in head
        .chunks_exact(2)
        .zip(relation.chunks_exact(2))
        .zip(tail.chunks_exact(2))
    {
        // (a+bi)(c+di) = (ac-bd) + (ad+bc)i
        let rot_re = h[0] * r[0] - h[1] * r[1];
        let rot_im = h[0] * r[1] + h[1] * r[0];
        let diff_re = rot_re - t[0];
        let diff_im = rot_im - t[1];
        sum_sq += diff_re * diff_re + diff_im * diff_im;
    }
    -sum_sq.sqrt()
}

fn score_complex(head: &[f32], relation: &[f32], tail: &[f32]) -> f32 {
    let mut score = 0.0;
    for ((h, r), t) in head
        .chunks_exact(2)
        .zip(relation.chunks_exact(2))
        .zip(tail.chunks_exact(2))
    {
        let x = h[0] * r[0] - h[1] * r[1];
        let y = h[0] * r[1] + h[1] * r[0];
        score += x * t[0] + y * t[1];
    }
    score
}

fn score_quate(head: &[f32], relation: &[f32], tail: &[f32]) -> f32 {
    let mut score = 0.0;
    for ((h, r), t) in head
        .chunks_exact(4)
        .zip(relation.chunks_exact(4))
        .zip(tail.chunks_exact(4))
    {
        let norm = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2] + r[3] * r[3]).sqrt();
        if norm == 0.0 {
            continue;
        }
        let (a2, b2, c2, d2) = (r[0] / norm, r[1] / norm, r[2] / norm, r[3] / norm);
        let (a1, b1, c1, d1) = (h[0], h[1], h[2], h[3]);

        // Hamilton product h ⊗ r
        let a = a1 * a2 - b1 * b2 - c1 * c2 - d1 * d2;
        let b = a1 * b2 + b1 * a2 + c1 * d2 - d1 * c2;
        let c = a1 * c2 - b1 * d2 + c1 * a2 + d1 * b2;
        let d = a1 * d2 + b1 * c2 - c1 * b2 + d1 * a2;

        score += a * t[0] + b * t[1] + c * t[2] + d * t[3];
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transe_prefers_translation() {
        let h = [1.0, 0.0];
        let r = [0.0, 1.0];
        let good = [1.0, 1.0];
        let bad = [-1.0, -1.0];
        let f = ScoringFunction::TransE;
        assert_eq!(f.score(&h, &r, &good), 0.0);
        assert!(f.score(&h, &r, &good) > f.score(&h, &r, &bad));
    }

    #[test]
    fn test_rotate_identity_rotation() {
        // r = 1 + 0i leaves h unchanged
        let h = [0.3, -0.4];
        let r = [1.0, 0.0];
        assert_eq!(ScoringFunction::RotatE.score(&h, &r, &h), 0.0);
    }

    #[test]
    fn test_complex_matches_hand_computation() {
        // h = 1+i, r = i, t = 1  ->  h*r = -1+i, Re((-1+i) * conj(1)) = -1
        let score = ScoringFunction::ComplEx.score(&[1.0, 1.0], &[0.0, 1.0], &[1.0, 0.0]);
        assert_eq!(score, -1.0);
    }

    #[test]
    fn test_quate_identity_is_dot_product() {
        let h = [1.0, 2.0, 3.0, 4.0];
        let t = [0.5, 0.5, 0.5, 0.5];
        let score = ScoringFunction::QuatE.score(&h, &[2.0, 0.0, 0.0, 0.0], &t);
        assert!((score - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("TransE".parse::<ScoringFunction>().unwrap(), ScoringFunction::TransE);
        assert_eq!("quate".parse::<ScoringFunction>().unwrap(), ScoringFunction::QuatE);
        assert!("boxe".parse::<ScoringFunction>().is_err());
    }
}
