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

//! Score Normalizer & Merger
//!
//! ```text
//! criteria ──► one oracle task per criterion (bounded by a timeout)
//!                 │
//!                 ▼
//!          per-criterion min-max ──► × weight
//!                 │
//!                 ▼
//!          strict-AND intersection, contributions summed
//!                 │
//!                 ▼
//!          known-recipe filter ──► sort (score desc, entity asc)
//! ```
//!
//! The first failing criterion aborts the whole ranking and cancels the
//! remaining oracle tasks. Dropping the ranking future cancels them too.

use crate::config::RankingConfig;
use crate::criteria::Criterion;
use crate::entities::Entity;
use crate::error::{RecipeGraphError, Result};
use crate::oracle::{LinkPredictor, OracleError, Prediction};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::debug;

/// One candidate of one criterion after normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub entity: Entity,
    pub raw_score: f64,
    /// In `[0, 1]`
    pub normalized_score: f64,
    pub weighted_score: f64,
}

/// A ranked recipe with its summed weighted score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecipe {
    pub entity: Entity,
    pub score: f64,
}

/// Min-max normalize one criterion's predictions and apply its weight.
///
/// Repeated heads keep their highest raw score. When every raw score is
/// equal (including a single candidate) the normalized score is `0`.
/// Output is ordered by entity.
pub fn normalize_min_max(
    predictions: Vec<Prediction>,
    weight: f64,
) -> std::result::Result<Vec<ScoredCandidate>, OracleError> {
    let mut best: BTreeMap<Entity, f64> = BTreeMap::new();
    for prediction in predictions {
        if !prediction.score.is_finite() {
            return Err(OracleError::NonFiniteScore {
                head: prediction.head.into_string(),
            });
        }
        best.entry(prediction.head)
            .and_modify(|s| *s = s.max(prediction.score))
            .or_insert(prediction.score);
    }

    let min = best.values().copied().fold(f64::INFINITY, f64::min);
    let max = best.values().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(best
        .into_iter()
        .map(|(entity, raw_score)| {
            let normalized_score = scale(raw_score, min, max);
            ScoredCandidate {
                entity,
                raw_score,
                normalized_score,
                weighted_score: normalized_score * weight,
            }
        })
        .collect())
}

/// Position of `raw` in `[min, max]`, in `[0, 1]`; `0` for an empty range
fn scale(raw: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    let scaled = if range.is_finite() {
        if range > 0.0 {
            (raw - min) / range
        } else {
            0.0
        }
    } else {
        // Spans wider than f64::MAX overflow; halved operands cannot
        (raw / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
    };
    scaled.clamp(0.0, 1.0)
}

/// Strict-AND merge of per-criterion candidates.
///
/// Keeps only entities present in every list. Each survivor's score is the
/// sum of its weighted scores, added in ascending order so the result does
/// not depend on criterion order. Output is ordered by entity.
pub fn merge_intersection(mut per_criterion: Vec<Vec<ScoredCandidate>>) -> Vec<RankedRecipe> {
    if per_criterion.is_empty() {
        return Vec::new();
    }

    // Fold from the smallest set; the intersection is the same in any order
    per_criterion.sort_by_key(|c| c.len());
    let mut lists = per_criterion.into_iter();
    let mut merged: HashMap<Entity, Vec<f64>> = match lists.next() {
        Some(first) => first
            .into_iter()
            .map(|c| (c.entity, vec![c.weighted_score]))
            .collect(),
        None => return Vec::new(),
    };

    for list in lists {
        if merged.is_empty() {
            break;
        }
        let scores: HashMap<Entity, f64> = list
            .into_iter()
            .map(|c| (c.entity, c.weighted_score))
            .collect();
        merged.retain(|entity, contributions| match scores.get(entity) {
            Some(&score) => {
                contributions.push(score);
                true
            }
            None => false,
        });
    }

    let mut out: Vec<RankedRecipe> = merged
        .into_iter()
        .map(|(entity, mut contributions)| {
            contributions.sort_by(f64::total_cmp);
            RankedRecipe {
                entity,
                score: contributions.iter().sum(),
            }
        })
        .collect();
    out.sort_by(|a, b| a.entity.cmp(&b.entity));
    out
}

/// Aborts the oracle tasks when the ranking future finishes or is dropped
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Descending by score, then ascending by entity
fn by_score_desc(a: &RankedRecipe, b: &RankedRecipe) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.entity.cmp(&b.entity))
}

async fn query_criterion(
    oracle: &dyn LinkPredictor,
    criterion: &Criterion,
    timeout: Duration,
) -> Result<Vec<ScoredCandidate>> {
    debug!(
        "Querying {} for ({}, {})",
        oracle.name(),
        criterion.relation,
        criterion.target
    );

    let predictions = tokio::time::timeout(
        timeout,
        oracle.predict(criterion.relation, &criterion.target),
    )
    .await
    .map_err(|_| RecipeGraphError::OracleTimeout {
        relation: criterion.relation.to_string(),
        tail: criterion.target.to_string(),
        elapsed: timeout,
    })?
    .and_then(|predictions| normalize_min_max(predictions, criterion.weight))
    .map_err(|source| RecipeGraphError::Oracle {
        relation: criterion.relation.to_string(),
        tail: criterion.target.to_string(),
        source,
    })?;

    debug!(
        "Criterion ({}, {}) returned {} candidates",
        criterion.relation,
        criterion.target,
        predictions.len()
    );
    Ok(predictions)
}

/// Rank known recipes against the criteria, keeping scores
pub async fn rank_scored(
    criteria: &[Criterion],
    oracle: Arc<dyn LinkPredictor>,
    valid: &HashSet<Entity>,
    config: &RankingConfig,
) -> Result<Vec<RankedRecipe>> {
    if criteria.is_empty() {
        return Ok(Vec::new());
    }

    let timeout = config.oracle_timeout();
    let handles: Vec<_> = criteria
        .iter()
        .cloned()
        .map(|criterion| {
            let oracle = Arc::clone(&oracle);
            tokio::spawn(async move { query_criterion(oracle.as_ref(), &criterion, timeout).await })
        })
        .collect();
    let _aborts = AbortOnDrop(handles.iter().map(|h| h.abort_handle()).collect());

    let per_criterion = futures::future::try_join_all(handles.into_iter().map(|handle| async move {
        match handle.await {
            Ok(result) => result,
            Err(e) => Err(RecipeGraphError::TaskAborted(e.to_string())),
        }
    }))
    .await?;

    let mut ranked: Vec<RankedRecipe> = merge_intersection(per_criterion)
        .into_iter()
        .filter(|r| valid.contains(&r.entity))
        .collect();
    ranked.sort_by(by_score_desc);

    if let Some(limit) = config.max_results {
        ranked.truncate(limit);
    }
    Ok(ranked)
}

/// Rank known recipes against the criteria, highest confidence first
pub async fn rank(
    criteria: &[Criterion],
    oracle: Arc<dyn LinkPredictor>,
    valid: &HashSet<Entity>,
    config: &RankingConfig,
) -> Result<Vec<Entity>> {
    Ok(rank_scored(criteria, oracle, valid, config)
        .await?
        .into_iter()
        .map(|r| r.entity)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Relation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};

    fn e(s: &str) -> Entity {
        Entity::new(s)
    }

    fn preds(items: &[(&str, f64)]) -> Vec<Prediction> {
        items.iter().map(|(h, s)| Prediction::new(e(h), *s)).collect()
    }

    fn candidates(items: &[(&str, f64)]) -> Vec<ScoredCandidate> {
        items
            .iter()
            .map(|(h, s)| ScoredCandidate {
                entity: e(h),
                raw_score: *s,
                normalized_score: *s,
                weighted_score: *s,
            })
            .collect()
    }

    /// Answers from a fixed table keyed by tail
    struct TableOracle {
        table: HashMap<Entity, Vec<Prediction>>,
        calls: AtomicUsize,
    }

    impl TableOracle {
        fn new(entries: Vec<(&str, Vec<Prediction>)>) -> Self {
            Self {
                table: entries.into_iter().map(|(t, p)| (e(t), p)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LinkPredictor for TableOracle {
        async fn predict(
            &self,
            _relation: Relation,
            tail: &Entity,
        ) -> std::result::Result<Vec<Prediction>, OracleError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.table
                .get(tail)
                .cloned()
                .ok_or_else(|| OracleError::UnknownEntity(tail.to_string()))
        }
    }

    struct SlowOracle;

    #[async_trait]
    impl LinkPredictor for SlowOracle {
        async fn predict(
            &self,
            _relation: Relation,
            _tail: &Entity,
        ) -> std::result::Result<Vec<Prediction>, OracleError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn criterion(target: &str, weight: f64) -> Criterion {
        Criterion {
            target: e(target),
            relation: Relation::Contains,
            weight,
        }
    }

    fn valid(names: &[&str]) -> HashSet<Entity> {
        names.iter().map(|n| e(n)).collect()
    }

    #[test]
    fn test_min_max_bounds() {
        let out = normalize_min_max(preds(&[("a", -3.0), ("b", 1.0), ("c", 5.0)]), 2.0).unwrap();
        assert_eq!(out[0].normalized_score, 0.0);
        assert_eq!(out[1].normalized_score, 0.5);
        assert_eq!(out[2].normalized_score, 1.0);
        assert_eq!(out[2].weighted_score, 2.0);
    }

    #[test]
    fn test_singleton_normalizes_to_zero() {
        let out = normalize_min_max(preds(&[("only", 42.0)]), 1.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].normalized_score, 0.0);
        assert!(!out[0].weighted_score.is_nan());
    }

    #[test]
    fn test_min_max_survives_overflowing_range() {
        let out = normalize_min_max(
            preds(&[("hi", f64::MAX), ("lo", -f64::MAX), ("mid", 0.0)]),
            1.0,
        )
        .unwrap();
        let norm: HashMap<&str, f64> = out
            .iter()
            .map(|c| (c.entity.as_str(), c.normalized_score))
            .collect();

        assert_eq!(norm["lo"], 0.0);
        assert_eq!(norm["mid"], 0.5);
        assert_eq!(norm["hi"], 1.0);
        assert!(out.iter().all(|c| (0.0..=1.0).contains(&c.normalized_score)));
    }

    #[test]
    fn test_duplicate_heads_keep_max() {
        let out = normalize_min_max(preds(&[("a", 1.0), ("a", 3.0), ("b", 2.0)]), 1.0).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].raw_score, 3.0);
        assert_eq!(out[0].normalized_score, 1.0);
    }

    #[test]
    fn test_non_finite_score_rejected() {
        let err = normalize_min_max(preds(&[("a", f64::NAN)]), 1.0).unwrap_err();
        assert!(matches!(err, OracleError::NonFiniteScore { .. }));
    }

    #[test]
    fn test_merge_is_strict_intersection() {
        let merged = merge_intersection(vec![
            candidates(&[("x", 0.9), ("y", 0.2)]),
            candidates(&[("y", 0.5)]),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].entity, e("y"));
        assert!((merged[0].score - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_merge_with_empty_criterion_is_empty() {
        let merged = merge_intersection(vec![candidates(&[("x", 0.9)]), Vec::new()]);
        assert!(merged.is_empty());
    }

    #[tokio::test]
    async fn test_empty_criteria_makes_no_calls() {
        let oracle = Arc::new(TableOracle::new(vec![]));
        let out = rank(&[], oracle.clone(), &valid(&["a"]), &RankingConfig::default())
            .await
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(oracle.calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rank_filters_invalid_and_sorts() {
        let oracle = Arc::new(TableOracle::new(vec![
            ("egg", preds(&[("ghost", 10.0), ("a", 5.0), ("b", 1.0), ("c", 5.0)])),
        ]));
        let out = rank_scored(
            &[criterion("egg", 1.0)],
            oracle,
            &valid(&["a", "b", "c"]),
            &RankingConfig::default(),
        )
        .await
        .unwrap();

        let names: Vec<&str> = out.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_rank_truncates_to_max_results() {
        let oracle = Arc::new(TableOracle::new(vec![(
            "egg",
            preds(&[("a", 3.0), ("b", 2.0), ("c", 1.0)]),
        )]));
        let config = RankingConfig {
            max_results: Some(2),
            ..Default::default()
        };
        let out = rank(&[criterion("egg", 1.0)], oracle, &valid(&["a", "b", "c"]), &config)
            .await
            .unwrap();
        assert_eq!(out, vec![e("a"), e("b")]);
    }

    #[tokio::test]
    async fn test_oracle_error_aborts_request() {
        let oracle = Arc::new(TableOracle::new(vec![("egg", preds(&[("a", 1.0)]))]));
        let err = rank(
            &[criterion("egg", 1.0), criterion("dragon_fruit", 1.0)],
            oracle,
            &valid(&["a"]),
            &RankingConfig::default(),
        )
        .await
        .unwrap_err();

        match err {
            RecipeGraphError::Oracle { tail, source, .. } => {
                assert_eq!(tail, "dragon_fruit");
                assert!(matches!(source, OracleError::UnknownEntity(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_oracle_answer_ranks_nothing() {
        let oracle = Arc::new(TableOracle::new(vec![("egg", vec![])]));
        let out = rank(
            &[criterion("egg", 1.0)],
            oracle.clone(),
            &valid(&["a"]),
            &RankingConfig::default(),
        )
        .await;

        assert_eq!(out.unwrap(), Vec::<Entity>::new());
        assert_eq!(oracle.calls.load(AtomicOrdering::SeqCst), 1);
    }

    /// Never answers; records when its in-flight query is dropped
    struct HangingOracle {
        started: Arc<AtomicBool>,
        dropped: Arc<AtomicBool>,
    }

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, AtomicOrdering::SeqCst);
        }
    }

    #[async_trait]
    impl LinkPredictor for HangingOracle {
        async fn predict(
            &self,
            _relation: Relation,
            _tail: &Entity,
        ) -> std::result::Result<Vec<Prediction>, OracleError> {
            let _guard = SetOnDrop(Arc::clone(&self.dropped));
            self.started.store(true, AtomicOrdering::SeqCst);
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_dropping_rank_cancels_oracle_tasks() {
        let started = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicBool::new(false));
        let oracle = Arc::new(HangingOracle {
            started: Arc::clone(&started),
            dropped: Arc::clone(&dropped),
        });

        let ranking = tokio::spawn(async move {
            rank(&[criterion("egg", 1.0)], oracle, &valid(&["a"]), &RankingConfig::default()).await
        });
        for _ in 0..100 {
            if started.load(AtomicOrdering::SeqCst) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(started.load(AtomicOrdering::SeqCst));

        ranking.abort();
        assert!(ranking.await.unwrap_err().is_cancelled());

        for _ in 0..100 {
            if dropped.load(AtomicOrdering::SeqCst) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(dropped.load(AtomicOrdering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oracle_timeout_fails_request() {
        let config = RankingConfig {
            oracle_timeout_ms: 50,
            max_results: None,
        };
        let err = rank(&[criterion("egg", 1.0)], Arc::new(SlowOracle), &valid(&["a"]), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeGraphError::OracleTimeout { .. }));
        assert!(err.is_oracle_failure());
    }
}
