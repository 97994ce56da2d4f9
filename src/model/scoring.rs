//! Scoring functions for the built-in model classes

use super::hyperparams::Hyperparams;
use crate::{Error, Result};
use ndarray::ArrayView1;

/// Triple scoring function of a built-in model class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringFunction {
    /// Translation distance `-||s + p - o||`
    TransE { norm: u32 },
    /// Trilinear product
    DistMult,
    /// Trilinear product over complex embeddings
    ComplEx,
    /// Holographic embeddings (circular correlation)
    HolE,
}

impl ScoringFunction {
    /// Class names of the built-in models, in registration order
    pub const CLASS_NAMES: [&'static str; 4] = ["TransE", "DistMult", "ComplEx", "HolE"];

    /// Resolve a class name and its hyperparameters to a scoring function
    pub fn from_class_name(class_name: &str, params: &Hyperparams) -> Result<Self> {
        match class_name {
            "TransE" => {
                let norm = match params.embedding_model_param("norm") {
                    None => 1,
                    Some(v) => match v.as_u64() {
                        Some(n @ (1 | 2)) => n as u32,
                        _ => {
                            return Err(Error::InvalidParameter(format!(
                                "TransE norm must be 1 or 2, got {v}"
                            )))
                        }
                    },
                };
                Ok(ScoringFunction::TransE { norm })
            }
            "DistMult" => Ok(ScoringFunction::DistMult),
            "ComplEx" => Ok(ScoringFunction::ComplEx),
            "HolE" => Ok(ScoringFunction::HolE),
            other => Err(Error::UnknownModelClass(other.to_string())),
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ScoringFunction::TransE { .. } => "TransE",
            ScoringFunction::DistMult => "DistMult",
            ScoringFunction::ComplEx => "ComplEx",
            ScoringFunction::HolE => "HolE",
        }
    }

    /// Width of an embedding vector for embedding size `k`
    pub fn embedding_width(&self, k: usize) -> usize {
        match self {
            ScoringFunction::ComplEx => 2 * k,
            _ => k,
        }
    }

    /// Score one triple given its subject, predicate and object embeddings
    pub fn score(&self, s: ArrayView1<f32>, p: ArrayView1<f32>, o: ArrayView1<f32>) -> f32 {
        match self {
            ScoringFunction::TransE { norm } => {
                let diff = &s + &p - &o;
                let dist = if *norm == 1 {
                    diff.iter().map(|x| x.abs()).sum::<f32>()
                } else {
                    diff.iter().map(|x| x * x).sum::<f32>().sqrt()
                };
                -dist
            }
            ScoringFunction::DistMult => (&s * &p * &o).sum(),
            ScoringFunction::ComplEx => {
                let k = s.len() / 2;
                let (s_re, s_im) = (s.slice(ndarray::s![..k]), s.slice(ndarray::s![k..]));
                let (p_re, p_im) = (p.slice(ndarray::s![..k]), p.slice(ndarray::s![k..]));
                let (o_re, o_im) = (o.slice(ndarray::s![..k]), o.slice(ndarray::s![k..]));
                (&p_re * &s_re * &o_re).sum()
                    + (&p_re * &s_im * &o_im).sum()
                    + (&p_im * &s_re * &o_im).sum()
                    - (&p_im * &s_im * &o_re).sum()
            }
            ScoringFunction::HolE => {
                let k = s.len();
                let mut total = 0.0;
                for i in 0..k {
                    let corr: f32 = (0..k).map(|j| s[j] * o[(i + j) % k]).sum();
                    total += p[i] * corr;
                }
                total
            }
        }
    }
}
