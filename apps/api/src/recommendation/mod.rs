// Candidate recommendation engine.
// Retrieval narrows the resume collection to a pool by full_text similarity;
// the hybrid ranker rescores that pool across every embedding field.

pub mod fields;
pub mod handlers;
pub mod models;
pub mod ranker;
pub mod service;
pub mod similarity;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
