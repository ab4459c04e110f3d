//! Cross-operator station reconciliation
//!
//! Both operators sometimes run a dock at the same physical location. Their
//! records are merged so the user sees one row per place.
//!
//! Matching is greedy first-fit: every station of the first list, in order,
//! takes the first unconsumed station of the second list that either has the
//! same name (case-insensitive) or lies within the merge threshold. This is
//! not an optimal bipartite matching; pairings depend on input order.

use domain::{
    MergedStation, Operator, Ranked, Station, sort_by_battery, sort_by_distance,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest separation at which two records are considered the same station.
/// The largest true positive observed so far was about 11 m.
pub const DEFAULT_MERGE_THRESHOLD_METERS: f64 = 12.0;

/// Merge policy for stations reported by two operators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciler {
    /// Maximum distance between two records of the same station
    #[serde(default = "default_merge_threshold_meters")]
    pub merge_threshold_meters: f64,
    /// Operator whose identity, name and position win in a merge
    #[serde(default = "default_preferred_operator")]
    pub preferred_operator: Operator,
}

const fn default_merge_threshold_meters() -> f64 {
    DEFAULT_MERGE_THRESHOLD_METERS
}

const fn default_preferred_operator() -> Operator {
    Operator::Velospot
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            merge_threshold_meters: DEFAULT_MERGE_THRESHOLD_METERS,
            preferred_operator: default_preferred_operator(),
        }
    }
}

impl Reconciler {
    /// Create a reconciler
    #[must_use]
    pub const fn new(merge_threshold_meters: f64, preferred_operator: Operator) -> Self {
        Self {
            merge_threshold_meters,
            preferred_operator,
        }
    }

    /// Merge two operators' ranked stations into one distance-ordered list
    ///
    /// Every input station appears exactly once in the output, either on its
    /// own or inside a merged record. Never fails.
    #[must_use]
    pub fn reconcile(
        &self,
        a: Vec<Ranked<Station>>,
        b: Vec<Ranked<Station>>,
    ) -> Vec<Ranked<MergedStation>> {
        let mut a_slots: Vec<Option<Ranked<Station>>> = a.into_iter().map(Some).collect();
        let mut b_slots: Vec<Option<Ranked<Station>>> = b.into_iter().map(Some).collect();
        let mut output = Vec::with_capacity(a_slots.len() + b_slots.len());

        for a_slot in &mut a_slots {
            let matched = a_slot.as_ref().and_then(|left| {
                b_slots.iter().position(|slot| {
                    slot.as_ref()
                        .is_some_and(|right| self.is_same_station(&left.item, &right.item))
                })
            });

            let Some(j) = matched else {
                continue;
            };

            if let (Some(left), Some(right)) =
                (a_slot.take(), b_slots.get_mut(j).and_then(Option::take))
            {
                debug!(
                    left = %left.item.key(),
                    right = %right.item.key(),
                    "Merging stations"
                );
                output.push(self.merge(left, right));
            }
        }

        output.extend(
            a_slots
                .into_iter()
                .chain(b_slots)
                .flatten()
                .map(|ranked| ranked.map(MergedStation::from)),
        );

        sort_by_distance(&mut output);
        output
    }

    /// Whether two operator records describe the same physical station
    #[must_use]
    pub fn is_same_station(&self, left: &Station, right: &Station) -> bool {
        left.name().to_lowercase() == right.name().to_lowercase()
            || left.coordinate().distance_meters(&right.coordinate())
                <= self.merge_threshold_meters
    }

    /// Combine a matched pair
    ///
    /// Identity, name, position and distance come from the preferred
    /// operator's record (the second one when neither or both are preferred);
    /// the bike count comes from the other record.
    fn merge(&self, left: Ranked<Station>, right: Ranked<Station>) -> Ranked<MergedStation> {
        let left_preferred = left.item.operator() == self.preferred_operator
            && right.item.operator() != self.preferred_operator;
        let (primary, secondary) = if left_preferred {
            (left, right)
        } else {
            (right, left)
        };

        let distance_meters = primary.distance_meters;
        let primary = primary.item;
        let secondary = secondary.item;

        let key = primary.key().clone();
        let name = primary.name().to_string();
        let coordinate = primary.coordinate();
        let bikes = secondary.bikes();
        let sources = vec![key.clone(), secondary.key().clone()];

        let mut ebikes = primary.into_ebikes();
        ebikes.extend(secondary.into_ebikes());
        sort_by_battery(&mut ebikes);

        Ranked::new(
            MergedStation {
                key,
                name,
                coordinate,
                bikes,
                ebikes,
                sources,
            },
            distance_meters,
        )
    }
}
