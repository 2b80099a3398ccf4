use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::recommendation::fields::EmbeddingField;

/// Stored JSON shape of an embedding set: `{ "full_text": [..], "skills": null, .. }`.
/// Only known fields holding an array of finite numbers survive conversion; anything
/// else reads as an absent field and scores 0.
type RawEmbeddings = BTreeMap<String, Value>;

/// Named embedding vectors for one job or resume. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEmbeddings", into = "RawEmbeddings")]
pub struct EmbeddingSet(BTreeMap<EmbeddingField, Vec<f32>>);

impl EmbeddingSet {
    pub fn get(&self, field: EmbeddingField) -> Option<&[f32]> {
        self.0.get(&field).map(Vec::as_slice)
    }
}

impl FromIterator<(EmbeddingField, Vec<f32>)> for EmbeddingSet {
    fn from_iter<I: IntoIterator<Item = (EmbeddingField, Vec<f32>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<RawEmbeddings> for EmbeddingSet {
    fn from(raw: RawEmbeddings) -> Self {
        raw.into_iter()
            .filter_map(|(name, value)| {
                let field = EmbeddingField::from_name(&name)?;
                match numeric_vector(&value) {
                    Some(vector) => Some((field, vector)),
                    None => {
                        if !value.is_null() {
                            debug!(field = %name, "dropping non-numeric embedding field");
                        }
                        None
                    }
                }
            })
            .collect()
    }
}

impl From<EmbeddingSet> for RawEmbeddings {
    fn from(set: EmbeddingSet) -> Self {
        set.0
            .into_iter()
            .map(|(field, vector)| (field.as_str().to_string(), Value::from(vector)))
            .collect()
    }
}

/// `Some` only for an array whose every element is a number finite in `f32`.
fn numeric_vector(value: &Value) -> Option<Vec<f32>> {
    value
        .as_array()?
        .iter()
        .map(|element| {
            let x = element.as_f64()? as f32;
            x.is_finite().then_some(x)
        })
        .collect()
}

/// A job requirement as read by the recommendation engine.
#[derive(Debug, Clone)]
pub struct JobRequirement {
    pub id: Uuid,
    /// `None` when embeddings were never generated for the job.
    pub embeddings: Option<EmbeddingSet>,
}

impl JobRequirement {
    /// The retrieval query vector, if present and non-empty.
    pub fn full_text_embedding(&self) -> Option<&[f32]> {
        self.embeddings
            .as_ref()?
            .get(EmbeddingField::FullText)
            .filter(|v| !v.is_empty())
    }
}

/// A parsed resume returned by the retrieval stage.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub id: Uuid,
    pub filename: String,
    pub parsed_data: Value,
    pub embeddings: EmbeddingSet,
    /// ANN similarity used to form the pool. Not an input to reranking.
    pub retrieval_score: f64,
}

/// Displayed per-field breakdown, integer percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub phrases: u8,
    pub full_text: u8,
    pub skills: u8,
    pub experience: u8,
}

/// One shortlisted candidate in the recommendation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub id: Uuid,
    pub filename: String,
    pub parsed_data: Value,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "matchDetails")]
    pub match_details: MatchDetails,
}
