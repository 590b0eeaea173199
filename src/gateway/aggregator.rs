//! Result Aggregation & Ranking
//!
//! Merges the per-shard result envelopes into one ranked list:
//!
//! 1. **Score**: every record is scored against the full query term list.
//!    The base score is the fraction of terms that match anywhere in the
//!    record, scaled to 100; field-position bonuses reward matches in more
//!    significant fields (street > city > postcode), and complete records
//!    earn a small completeness bonus.
//! 2. **Deduplicate**: the same address can live on several shards. Two
//!    records are duplicates when number, street, city and postcode are all
//!    equal (unit is ignored); the higher-scored copy survives, first seen
//!    winning ties.
//! 3. **Sort & truncate**: descending by score, then cut to `max_results`.
//!
//! Query terms are normalized before comparison, so a lowercase query earns
//! the same bonuses as the UPPERCASE form stored on the records.

use crate::ingest::normalizer::normalize;

use super::types::{DataNodeResult, ScoredRecord};
use crate::node::protocol::WireAddressRecord;

/// Relevance score of one record against the (normalized) query terms.
pub fn relevance_score(record: &WireAddressRecord, normalized_terms: &[String]) -> f64 {
    let mut score = 0.0;

    let fields = [
        record.street.as_str(),
        record.city.as_str(),
        record.postcode.as_str(),
        record.number.as_str(),
    ];

    let matching_terms = normalized_terms
        .iter()
        .filter(|term| fields.iter().any(|field| field.contains(term.as_str())))
        .count();

    // Base: percentage of query terms that match anywhere in the record.
    if !normalized_terms.is_empty() {
        score += (matching_terms as f64 / normalized_terms.len() as f64) * 100.0;
    }

    // Position bonuses, accumulated independently per term.
    for term in normalized_terms {
        if record.street.contains(term.as_str()) {
            score += if record.street.starts_with(term.as_str()) { 15.0 } else { 10.0 };
        }
        if record.city.contains(term.as_str()) {
            score += if record.city.starts_with(term.as_str()) { 8.0 } else { 5.0 };
        }
        if record.postcode.contains(term.as_str()) {
            score += 3.0;
        }
        if record.number.contains(term.as_str()) {
            score += 5.0;
        }
    }

    // Completeness: 2 points per filled field, up to 10.
    let completeness = [
        &record.number,
        &record.street,
        &record.unit,
        &record.city,
        &record.postcode,
    ]
    .iter()
    .filter(|field| !field.is_empty())
    .count();
    score += completeness as f64 * 2.0;

    score
}

fn is_duplicate(a: &WireAddressRecord, b: &WireAddressRecord) -> bool {
    // Unit is ignored: formatting of unit numbers differs between sources.
    a.number == b.number && a.street == b.street && a.city == b.city && a.postcode == b.postcode
}

/// Scores, deduplicates, sorts and truncates the merged shard results.
pub fn aggregate_and_rank(
    results: &[DataNodeResult],
    query_terms: &[String],
    max_results: usize,
) -> Vec<ScoredRecord> {
    let normalized_terms: Vec<String> = query_terms.iter().map(|t| normalize(t)).collect();

    let mut scored_records: Vec<ScoredRecord> = Vec::new();

    for result in results.iter().filter(|r| r.success) {
        for record in &result.records {
            let score = relevance_score(record, &normalized_terms);

            match scored_records
                .iter_mut()
                .find(|existing| is_duplicate(&existing.record, record))
            {
                Some(existing) => {
                    // Keep the higher-scored copy; the first seen wins ties.
                    if score > existing.relevance_score {
                        tracing::debug!(
                            "Duplicate address, replacing score {} with {}",
                            existing.relevance_score,
                            score
                        );
                        existing.record = record.clone();
                        existing.shard_id = result.shard_id;
                        existing.relevance_score = score;
                    }
                }
                None => scored_records.push(ScoredRecord {
                    record: record.clone(),
                    shard_id: result.shard_id,
                    relevance_score: score,
                }),
            }
        }
    }

    tracing::debug!("{} unique record(s) after deduplication", scored_records.len());

    // Stable sort: equal scores keep their shard-order position.
    scored_records.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored_records.truncate(max_results);

    scored_records
}
