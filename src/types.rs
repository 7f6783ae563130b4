//! Data model for capability matching.
//!
//! Descriptors arrive from the upstream discovery collaborator (decoded from
//! wherever action advertisements are published); the engine consumes them
//! read-only and hands back ephemeral match results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::MatchError;

/// Deduplicated, order-irrelevant set of normalized terms.
pub type TermSet = HashSet<String>;

/// A discovery request: what the caller is looking for.
///
/// Optional criteria are empty vectors; a scorer whose criterion is empty
/// simply omits that field from the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Free-form search terms matched against name, description and similes.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Capability tags the matched action must advertise.
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Reserved for future scoring extensions; not consulted today.
    #[serde(default)]
    pub context_terms: Vec<String>,
}

/// One advertised action's metadata, as published by another agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name: String,
    pub description: String,
    /// Alternate names for the action.
    #[serde(default)]
    pub similes: Vec<String>,
    /// Advertised capability tags. When empty, the effective set is derived
    /// from the name and description at scoring time.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl Descriptor {
    /// Boundary validation: required text fields must carry actual content.
    ///
    /// Checked once per scoring call rather than ad hoc at each field access.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.name.trim().is_empty() {
            return Err(MatchError::MalformedDescriptor {
                name: self.name.clone(),
                reason: "name is empty",
            });
        }
        if self.description.trim().is_empty() {
            return Err(MatchError::MalformedDescriptor {
                name: self.name.clone(),
                reason: "description is empty",
            });
        }
        Ok(())
    }
}

/// Per-field similarity scores for one descriptor/query pair.
///
/// `description` and `similes` hold the already-discounted value (raw Jaccard
/// times 0.8 and 0.6 respectively). A `None` field means the query supplied
/// no relevant criterion for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldScores {
    pub name: Option<f64>,
    pub description: Option<f64>,
    pub similes: Option<f64>,
    pub capabilities: Option<f64>,
}

impl FieldScores {
    /// Weighted sum over the fields actually present.
    ///
    /// Absent fields are skipped, and weights are not renormalized when
    /// fields are missing, so a match with a single applicable field tops out
    /// at that field's weight.
    pub fn weighted_total(&self) -> f64 {
        let mut total = 0.0;
        if let Some(score) = self.name {
            total += score * config::NAME_WEIGHT;
        }
        if let Some(score) = self.description {
            total += score * config::DESCRIPTION_WEIGHT;
        }
        if let Some(score) = self.similes {
            total += score * config::SIMILE_WEIGHT;
        }
        if let Some(score) = self.capabilities {
            total += score * config::CAPABILITY_WEIGHT;
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.similes.is_none()
            && self.capabilities.is_none()
    }
}

/// Outcome of scoring one descriptor against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub descriptor: Descriptor,
    pub field_scores: FieldScores,
    pub composite_score: f64,
}

impl MatchResult {
    /// The contained-failure result: empty field scores, composite 0.0.
    pub fn zero(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            field_scores: FieldScores::default(),
            composite_score: 0.0,
        }
    }
}
