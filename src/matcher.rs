//! Fuzzy matching between discovery queries and advertised action descriptors.
//!
//! This module is the whole engine: text normalization, the similarity
//! primitives, the per-field scorers, the composite scorer and the batch
//! ranker. Scoring one descriptor is a pure function of the descriptor and
//! the query; the ranker fans it out over a catalog and reduces to a sorted
//! shortlist.

use std::cmp::Ordering;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use rayon::prelude::*;

use crate::config::{self, RankOptions};
use crate::error::MatchError;
use crate::types::{Descriptor, FieldScores, MatchResult, Query, TermSet};

// ============================================================================
// Text Normalizer
// ============================================================================

/// Turn free text into a normalized term set.
///
/// Lowercases, strips every character that is neither a word character
/// (alphanumeric or `_`) nor whitespace, splits on whitespace runs, drops
/// tokens of length <= 2 and deduplicates. Empty or whitespace-only input
/// yields an empty set.
pub fn normalize(text: &str) -> TermSet {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > config::MIN_TERM_LEN)
        .map(str::to_string)
        .collect()
}

/// Memoized normalization, keyed by exact input string.
///
/// Normalization is referentially transparent, so the cache never changes
/// observable results; it only spares recomputation when the same catalog is
/// re-ranked across many queries. Entries past the cap are computed but not
/// inserted.
static NORMALIZE_CACHE: Lazy<DashMap<String, Arc<TermSet>>> = Lazy::new(DashMap::new);

fn normalize_cached(text: &str) -> Arc<TermSet> {
    if let Some(hit) = NORMALIZE_CACHE.get(text) {
        return Arc::clone(hit.value());
    }
    let terms = Arc::new(normalize(text));
    if NORMALIZE_CACHE.len() < config::NORMALIZE_CACHE_CAP {
        NORMALIZE_CACHE.insert(text.to_string(), Arc::clone(&terms));
    }
    terms
}

// ============================================================================
// Similarity Primitives
// ============================================================================

/// Classic dynamic-programming edit distance over chars, two-row rolling.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Prefix similarity: longest common prefix of the lowercased inputs divided
/// by the longer length.
///
/// A deliberately cheap stand-in for semantic similarity. It rewards shared
/// stems ("trade" vs "trading") and nothing else; synonyms with no common
/// prefix score 0. Matching behavior depends on keeping it exactly this
/// crude.
pub fn word_similarity(w1: &str, w2: &str) -> f64 {
    let a: Vec<char> = w1.to_lowercase().chars().collect();
    let b: Vec<char> = w2.to_lowercase().chars().collect();
    let longer = a.len().max(b.len());
    if longer == 0 {
        return 1.0;
    }
    let prefix = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    prefix as f64 / longer as f64
}

/// Jaccard similarity of two term sets: |A ∩ B| / |A ∪ B|.
///
/// 0.0 when both sets are empty (the union has size zero).
pub fn jaccard(a: &TermSet, b: &TermSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

// ============================================================================
// Field Scorers
// ============================================================================

/// The capability set a descriptor is matched on: the advertised tags, or
/// terms derived from name + description when none are advertised.
fn effective_capabilities(descriptor: &Descriptor) -> Vec<String> {
    if !descriptor.capabilities.is_empty() {
        descriptor.capabilities.clone()
    } else {
        let combined = format!("{} {}", descriptor.name, descriptor.description);
        normalize(&combined).into_iter().collect()
    }
}

/// Mean best-similarity over matched query tags.
///
/// A query tag counts as matched only when its best prefix similarity
/// against any descriptor tag is strictly greater than the acceptance
/// threshold. Unmatched tags are dropped from the denominator rather than
/// penalized, so one strong match among many queried tags still scores high.
fn capability_score(query_tags: &[String], descriptor_tags: &[String]) -> f64 {
    let mut matched: Vec<f64> = Vec::new();
    for tag in query_tags {
        let best = descriptor_tags
            .iter()
            .map(|candidate| word_similarity(tag, candidate))
            .fold(0.0f64, f64::max);
        if best > config::CAPABILITY_THRESHOLD {
            matched.push(best);
        }
    }
    if matched.is_empty() {
        0.0
    } else {
        matched.iter().sum::<f64>() / matched.len() as f64
    }
}

/// Compute the per-field scores for one descriptor/query pair.
///
/// Fields whose query criterion is absent stay `None`; `description` and
/// `similes` store their discounted value.
fn score_fields(descriptor: &Descriptor, query: &Query) -> FieldScores {
    let mut scores = FieldScores::default();

    if !query.keywords.is_empty() {
        let query_terms = normalize_cached(&query.keywords.join(" "));
        let name_terms = normalize_cached(&descriptor.name);
        scores.name = Some(jaccard(&name_terms, &query_terms));

        let description_terms = normalize_cached(&descriptor.description);
        scores.description =
            Some(jaccard(&description_terms, &query_terms) * config::DESCRIPTION_DISCOUNT);

        if !descriptor.similes.is_empty() {
            let simile_terms = normalize_cached(&descriptor.similes.join(" "));
            scores.similes = Some(jaccard(&simile_terms, &query_terms) * config::SIMILE_DISCOUNT);
        }
    }

    if !query.capabilities.is_empty() {
        let tags = effective_capabilities(descriptor);
        scores.capabilities = Some(capability_score(&query.capabilities, &tags));
    }

    scores
}

// ============================================================================
// Composite Scorer & Entry Points
// ============================================================================

/// Score one descriptor, surfacing the failure path.
///
/// This is the type-visible form of scoring: a malformed descriptor comes
/// back as `Err` instead of silently collapsing to zero.
pub fn try_score_one(descriptor: &Descriptor, query: &Query) -> Result<MatchResult, MatchError> {
    descriptor.validate()?;
    let field_scores = score_fields(descriptor, query);
    let composite_score = field_scores.weighted_total();
    Ok(MatchResult {
        descriptor: descriptor.clone(),
        field_scores,
        composite_score,
    })
}

/// Score one descriptor against a query.
///
/// Per-item faults are contained here, same policy as the batch boundary: a
/// malformed descriptor yields a zero-score result with empty field scores so
/// one bad catalog entry never fails a ranking call.
pub fn score_one(descriptor: &Descriptor, query: &Query) -> MatchResult {
    try_score_one(descriptor, query).unwrap_or_else(|err| {
        log::warn!("scoring '{}' failed: {}", descriptor.name, err);
        MatchResult::zero(descriptor.clone())
    })
}

/// Whether a descriptor scores at or above `threshold` for the query.
pub fn is_match(descriptor: &Descriptor, query: &Query, threshold: f64) -> bool {
    score_one(descriptor, query).composite_score >= threshold
}

// ============================================================================
// Batch Ranker
// ============================================================================

/// Score a whole catalog and reduce to a sorted shortlist.
///
/// Every descriptor is scored independently (in parallel for large catalogs;
/// order of collected results is the catalog order either way), results below
/// `min_score` are discarded, the rest are stable-sorted by composite score
/// descending and truncated to `max_results`. Equal scores keep catalog
/// order, so two invocations over the same inputs produce identical output.
pub fn rank(
    catalog: &[Descriptor],
    query: &Query,
    options: &RankOptions,
) -> Result<Vec<MatchResult>, MatchError> {
    options.validate()?;

    let mut results: Vec<MatchResult> = if catalog.len() >= config::PARALLEL_THRESHOLD {
        catalog
            .par_iter()
            .map(|descriptor| score_one(descriptor, query))
            .collect()
    } else {
        catalog
            .iter()
            .map(|descriptor| score_one(descriptor, query))
            .collect()
    };

    results.retain(|result| result.composite_score >= options.min_score);
    let retained = results.len();
    results.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(options.max_results);

    log::debug!(
        "ranked {} descriptors: {} at or above {:.2}, returning {}",
        catalog.len(),
        retained,
        options.min_score,
        results.len()
    );
    Ok(results)
}
