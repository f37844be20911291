//! Range filter for report generation.

use crate::model::observation::{GrowthStage, TreeObservation};
use serde::{Deserialize, Serialize};

/// Optional bounds for narrowing a report.
///
/// Every bound is inclusive. `None` means "no constraint", which is distinct
/// from a zero bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub min_tree_count: Option<u64>,
    pub max_tree_count: Option<u64>,
    pub growth_stage: Option<GrowthStage>,
    pub min_longitude: Option<f64>,
    pub max_longitude: Option<f64>,
    pub min_latitude: Option<f64>,
    pub max_latitude: Option<f64>,
}

impl FilterCriteria {
    /// Criteria with no bounds; matches every observation.
    pub fn show_all() -> Self {
        Self::default()
    }

    /// Returns whether no bound is set.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Returns whether `observation` satisfies every present bound.
    pub fn matches(&self, observation: &TreeObservation) -> bool {
        let location = &observation.location;
        within(
            observation.tree_count,
            self.min_tree_count,
            self.max_tree_count,
        ) && self
            .growth_stage
            .map_or(true, |stage| stage == observation.growth_stage)
            && within(location.longitude, self.min_longitude, self.max_longitude)
            && within(location.latitude, self.min_latitude, self.max_latitude)
    }
}

fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

/// Returns the observations matching `criteria`, in input order.
///
/// With unconstrained criteria the result equals `records`.
pub fn filter(records: &[TreeObservation], criteria: &FilterCriteria) -> Vec<TreeObservation> {
    records
        .iter()
        .filter(|observation| criteria.matches(observation))
        .cloned()
        .collect()
}
