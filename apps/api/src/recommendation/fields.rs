//! Embedding fields, the field weight table, and per-field scoring.
//!
//! The set of fields and their weights are data (`DEFAULT_WEIGHT_TABLE`), validated
//! once at startup into an immutable `FieldWeights`. Ranking code iterates the
//! table and never branches on individual field names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommendation::models::EmbeddingSet;
use crate::recommendation::similarity::cosine_similarity;

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ────────────────────────────────────────────────────────────────────────────
// Field enumeration
// ────────────────────────────────────────────────────────────────────────────

/// A named embedding view of a job description or resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingField {
    Phrases,
    FullText,
    Skills,
    Experience,
    Education,
    Certifications,
}

impl EmbeddingField {
    pub const COUNT: usize = 6;

    pub const ALL: [EmbeddingField; Self::COUNT] = [
        EmbeddingField::Phrases,
        EmbeddingField::FullText,
        EmbeddingField::Skills,
        EmbeddingField::Experience,
        EmbeddingField::Education,
        EmbeddingField::Certifications,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmbeddingField::Phrases => "phrases",
            EmbeddingField::FullText => "full_text",
            EmbeddingField::Skills => "skills",
            EmbeddingField::Experience => "experience",
            EmbeddingField::Education => "education",
            EmbeddingField::Certifications => "certifications",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Weight table
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldWeight {
    pub field: EmbeddingField,
    pub weight: f64,
}

/// Reranking weights. Phrases and full text dominate; the structured sections
/// act as tie-breaking signal.
pub const DEFAULT_WEIGHT_TABLE: [FieldWeight; EmbeddingField::COUNT] = [
    FieldWeight {
        field: EmbeddingField::Phrases,
        weight: 0.45,
    },
    FieldWeight {
        field: EmbeddingField::FullText,
        weight: 0.35,
    },
    FieldWeight {
        field: EmbeddingField::Skills,
        weight: 0.10,
    },
    FieldWeight {
        field: EmbeddingField::Experience,
        weight: 0.05,
    },
    FieldWeight {
        field: EmbeddingField::Education,
        weight: 0.03,
    },
    FieldWeight {
        field: EmbeddingField::Certifications,
        weight: 0.02,
    },
];

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error("field '{0}' appears more than once in the weight table")]
    DuplicateField(&'static str),

    #[error("field '{0}' has no weight")]
    MissingField(&'static str),

    #[error("weight for '{field}' must be finite and non-negative, got {weight}")]
    InvalidWeight { field: &'static str, weight: f64 },

    #[error("weights must sum to 1.0, got {0}")]
    BadSum(f64),
}

/// Validated, immutable weight table covering every `EmbeddingField`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeights {
    weights: [f64; EmbeddingField::COUNT],
}

impl FieldWeights {
    pub fn new(table: &[FieldWeight]) -> Result<Self, WeightsError> {
        let mut weights: [Option<f64>; EmbeddingField::COUNT] = [None; EmbeddingField::COUNT];

        for entry in table {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(WeightsError::InvalidWeight {
                    field: entry.field.as_str(),
                    weight: entry.weight,
                });
            }
            let slot = &mut weights[entry.field.index()];
            if slot.is_some() {
                return Err(WeightsError::DuplicateField(entry.field.as_str()));
            }
            *slot = Some(entry.weight);
        }

        let mut resolved = [0.0; EmbeddingField::COUNT];
        for field in EmbeddingField::ALL {
            resolved[field.index()] =
                weights[field.index()].ok_or(WeightsError::MissingField(field.as_str()))?;
        }

        let sum: f64 = resolved.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum(sum));
        }

        Ok(Self { weights: resolved })
    }

    pub fn get(&self, field: EmbeddingField) -> f64 {
        self.weights[field.index()]
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldWeight> + '_ {
        EmbeddingField::ALL.into_iter().map(|field| FieldWeight {
            field,
            weight: self.get(field),
        })
    }

    /// Σ weight[f] × similarity[f] over every field.
    pub fn weighted_sum(&self, similarities: &FieldSimilarities) -> f64 {
        self.iter()
            .map(|fw| fw.weight * similarities.get(fw.field))
            .sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field scorer
// ────────────────────────────────────────────────────────────────────────────

/// Per-field cosine similarities for one (job, candidate) pair.
/// Always holds a value for every field; missing data reads as 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldSimilarities([f64; EmbeddingField::COUNT]);

impl FieldSimilarities {
    pub fn get(&self, field: EmbeddingField) -> f64 {
        self.0[field.index()]
    }
}

pub fn score_fields(job: &EmbeddingSet, candidate: &EmbeddingSet) -> FieldSimilarities {
    let mut scores = [0.0; EmbeddingField::COUNT];
    for field in EmbeddingField::ALL {
        scores[field.index()] = cosine_similarity(job.get(field), candidate.get(field));
    }
    FieldSimilarities(scores)
}
