//! Volume Capacity Scorer
//!
//! Scores a node from the per-class storage it would have to serve, routing
//! each class's utilization through a configured shape and averaging the
//! per-class scores.

use super::resource::{ClassResourceMap, StorageResource};
use super::shape::{BrokenLinearFunction, FunctionShape};
use super::weights::{ClassWeigher, UniformWeights};
use super::{Score, MAX_UTILIZATION};
use std::sync::Arc;
use tracing::debug;

/// Shaped utilization scorer
///
/// Built once from configuration and shared read-only by every scoring call.
#[derive(Clone)]
pub struct VolumeCapacityScorer {
    function: BrokenLinearFunction,
    weigher: Arc<dyn ClassWeigher>,
}

impl std::fmt::Debug for VolumeCapacityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeCapacityScorer")
            .field("shape", self.function.shape())
            .finish_non_exhaustive()
    }
}

impl VolumeCapacityScorer {
    /// Create a scorer that weights all classes equally
    pub fn new(shape: FunctionShape) -> Self {
        Self::with_weigher(shape, Arc::new(UniformWeights))
    }

    /// Create a scorer with a custom class weighting strategy
    pub fn with_weigher(shape: FunctionShape, weigher: Arc<dyn ClassWeigher>) -> Self {
        Self {
            function: BrokenLinearFunction::new(shape),
            weigher,
        }
    }

    /// Utilization percentage fed to the shape, saturated at 100
    pub fn scaled_utilization(resource: &StorageResource) -> i64 {
        if resource.is_saturated() {
            return MAX_UTILIZATION;
        }
        let scaled = u128::from(resource.requested) * MAX_UTILIZATION as u128
            / u128::from(resource.capacity);
        scaled as i64
    }

    /// Shape score for a single class
    pub fn class_score(&self, resource: &StorageResource) -> Score {
        self.function.evaluate(Self::scaled_utilization(resource))
    }

    /// Weighted mean of per-class scores, rounded half away from zero
    pub fn score(&self, classes: &ClassResourceMap) -> Score {
        if classes.is_empty() {
            return 0;
        }

        let mut weighted_sum: i128 = 0;
        let mut weight_sum: u128 = 0;
        for (class, resource) in classes {
            let class_score = self.class_score(resource);
            let weight = self.weigher.weight(class, resource);
            debug!(
                class = %class,
                requested = resource.requested,
                capacity = resource.capacity,
                score = class_score,
                weight,
                "scored storage class"
            );
            weighted_sum += i128::from(class_score) * i128::from(weight);
            weight_sum += u128::from(weight);
        }

        if weight_sum == 0 {
            return 0;
        }
        (weighted_sum as f64 / weight_sum as f64).round() as Score
    }
}

/// Build a reusable scoring function from a shape
pub fn build_scorer_function(
    shape: FunctionShape,
) -> impl Fn(&ClassResourceMap) -> Score + Send + Sync + Clone {
    let scorer = VolumeCapacityScorer::new(shape);
    move |classes: &ClassResourceMap| scorer.score(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::weights::ClassWeights;
    use std::collections::BTreeMap;

    fn identity() -> FunctionShape {
        vec![(0, 0), (100, 100)].into()
    }

    fn classes(entries: &[(&str, u64, u64)]) -> ClassResourceMap {
        entries
            .iter()
            .map(|(class, requested, capacity)| {
                (class.to_string(), StorageResource::new(*requested, *capacity))
            })
            .collect()
    }

    #[test]
    fn test_empty_map_scores_zero() {
        let scorer = build_scorer_function(vec![(0, 50), (100, 100)].into());
        assert_eq!(scorer(&ClassResourceMap::new()), 0);
    }

    #[test]
    fn test_mixed_classes() {
        let scorer = build_scorer_function(identity());
        let map = classes(&[("gold", 50, 100), ("silver", 100, 50)]);
        assert_eq!(scorer(&map), 75);
    }

    #[test]
    fn test_saturation() {
        let r = StorageResource::new(10, 0);
        assert_eq!(VolumeCapacityScorer::scaled_utilization(&r), 100);
        let r = StorageResource::new(0, 0);
        assert_eq!(VolumeCapacityScorer::scaled_utilization(&r), 100);
        let r = StorageResource::new(201, 200);
        assert_eq!(VolumeCapacityScorer::scaled_utilization(&r), 100);

        // Saturation holds for any shape
        let scorer = VolumeCapacityScorer::new(vec![(0, 100), (100, 0)].into());
        assert_eq!(scorer.class_score(&StorageResource::new(5, 0)), 0);
    }

    #[test]
    fn test_scaled_utilization_truncates() {
        let r = StorageResource::new(1, 3);
        assert_eq!(VolumeCapacityScorer::scaled_utilization(&r), 33);
        let r = StorageResource::new(2, 3);
        assert_eq!(VolumeCapacityScorer::scaled_utilization(&r), 66);
        let r = StorageResource::new(u64::MAX, u64::MAX);
        assert_eq!(VolumeCapacityScorer::scaled_utilization(&r), 100);
    }

    #[test]
    fn test_monotonic_in_utilization() {
        let scorer = VolumeCapacityScorer::new(vec![(0, 0), (30, 10), (70, 40), (100, 100)].into());
        let mut last = i64::MIN;
        for requested in 0..=1000 {
            let score = scorer.class_score(&StorageResource::new(requested, 1000));
            assert!(score >= last, "score dropped at requested={}", requested);
            last = score;
        }
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let scorer = VolumeCapacityScorer::new(identity());
        // (50 + 51) / 2 = 50.5
        let map = classes(&[("a", 50, 100), ("b", 51, 100)]);
        assert_eq!(scorer.score(&map), 51);
        // (10 + 10 + 11) / 3 = 10.33
        let map = classes(&[("a", 10, 100), ("b", 10, 100), ("c", 11, 100)]);
        assert_eq!(scorer.score(&map), 10);
    }

    #[test]
    fn test_order_independent() {
        let scorer = VolumeCapacityScorer::new(identity());
        let forward = classes(&[("a", 13, 70), ("b", 1, 3), ("c", 99, 100)]);
        let backward = classes(&[("c", 99, 100), ("b", 1, 3), ("a", 13, 70)]);
        assert_eq!(scorer.score(&forward), scorer.score(&backward));
    }

    #[test]
    fn test_class_weights() {
        let weights = ClassWeights::new(BTreeMap::from([("gold".to_string(), 3)]));
        let scorer = VolumeCapacityScorer::with_weigher(identity(), Arc::new(weights));
        // (3 * 20 + 1 * 100) / 4 = 40
        let map = classes(&[("gold", 20, 100), ("silver", 0, 0)]);
        assert_eq!(scorer.score(&map), 40);
    }

    #[test]
    fn test_zero_total_weight() {
        let weights = ClassWeights::new(BTreeMap::new()).with_default_weight(0);
        let scorer = VolumeCapacityScorer::with_weigher(identity(), Arc::new(weights));
        let map = classes(&[("gold", 20, 100)]);
        assert_eq!(scorer.score(&map), 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let scorer = VolumeCapacityScorer::new(identity());
        let maps: Vec<_> = (0..8u64)
            .map(|i| classes(&[("gold", i * 10, 100)]))
            .collect();

        let scores: Vec<Score> = std::thread::scope(|s| {
            let handles: Vec<_> = maps
                .iter()
                .map(|map| {
                    let scorer = &scorer;
                    s.spawn(move || scorer.score(map))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(scores, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }
}
