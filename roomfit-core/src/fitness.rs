//! Correlation of fitness-check results with the placements they describe.
//!
//! The service reports results keyed by `furniture_id`, which names a catalog
//! template rather than a placement. When a template is placed more than once
//! the k-th result carrying that id is bound to the k-th placement of that
//! template in request order, and the binding is flagged as ambiguous so the
//! caller can say so instead of presenting it as certain.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use crate::model::{FitnessReport, FitnessResult, FurnitureId, PlacementId};
use crate::store::{PlacementStore, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    index: usize,
    ambiguous: bool,
}

/// What is known about one placement after a check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback<'a> {
    /// The service returned nothing for this placement (or it was never checked).
    NoResult,
    Result {
        result: &'a FitnessResult,
        ambiguous: bool,
    },
}

impl Feedback<'_> {
    pub fn status(&self) -> FeedbackStatus {
        match self {
            Feedback::NoResult => FeedbackStatus::Unchecked,
            Feedback::Result { result, .. } if result.is_clear() => FeedbackStatus::Clear,
            Feedback::Result { .. } => FeedbackStatus::Problem,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStatus {
    Unchecked,
    Clear,
    Problem,
}

/// A fitness report bound to placement ids.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessFeedback {
    revision: u64,
    report: FitnessReport,
    bindings: HashMap<PlacementId, Binding>,
}

impl FitnessFeedback {
    /// Binds `report` to the placements of the snapshot the request was built from.
    pub fn correlate(snapshot: &Snapshot, report: FitnessReport) -> Self {
        let mut queues: HashMap<FurnitureId, VecDeque<usize>> = HashMap::new();
        for (index, result) in report.results.iter().enumerate() {
            queues.entry(result.furniture_id).or_default().push_back(index);
        }

        let mut placed: HashMap<FurnitureId, usize> = HashMap::new();
        for item in snapshot {
            *placed.entry(item.furniture_id()).or_default() += 1;
        }

        let ambiguous_ids: Vec<FurnitureId> = placed
            .iter()
            .filter(|&(fid, count)| *count > 1 || queues.get(fid).is_some_and(|q| q.len() > 1))
            .map(|(fid, _)| *fid)
            .collect();

        let mut bindings = HashMap::new();
        for item in snapshot {
            let fid = item.furniture_id();
            let Some(index) = queues.get_mut(&fid).and_then(VecDeque::pop_front) else {
                debug!(id = %item.id, furniture_id = fid, "no fitness result for placement");
                continue;
            };
            let ambiguous = ambiguous_ids.contains(&fid);
            if ambiguous {
                warn!(id = %item.id, furniture_id = fid, "fitness result bound by order among duplicates");
            }
            bindings.insert(item.id, Binding { index, ambiguous });
        }

        let unbound: usize = queues.values().map(VecDeque::len).sum();
        if unbound > 0 {
            debug!(unbound, "ignoring fitness results with no matching placement");
        }

        Self {
            revision: snapshot.revision(),
            report,
            bindings,
        }
    }

    pub fn for_placement(&self, id: PlacementId) -> Feedback<'_> {
        match self.bindings.get(&id) {
            Some(binding) => Feedback::Result {
                result: &self.report.results[binding.index],
                ambiguous: binding.ambiguous,
            },
            None => Feedback::NoResult,
        }
    }

    /// Drops the result for a placement that no longer exists.
    pub fn discard(&mut self, id: PlacementId) {
        self.bindings.remove(&id);
    }

    /// Drops every result whose placement is gone from `store`.
    pub fn retain_present(&mut self, store: &PlacementStore) {
        self.bindings.retain(|id, _| store.contains(*id));
    }

    /// Store revision of the snapshot that was checked.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of placements that received a result.
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn report(&self) -> &FitnessReport {
        &self.report
    }

    pub fn all_fits(&self) -> bool {
        self.report.all_fits
    }

    pub fn overall_message(&self) -> &str {
        &self.report.overall_message
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{FurnitureKind, FurnitureTemplate};

    fn template(id: u64, name: &str) -> Arc<FurnitureTemplate> {
        Arc::new(FurnitureTemplate {
            id,
            name: name.to_string(),
            kind: FurnitureKind::Chair,
            width: 2.0,
            depth: 2.0,
        })
    }

    fn result(furniture_id: u64, fits: bool, message: &str) -> FitnessResult {
        FitnessResult {
            furniture_id,
            furniture_name: String::new(),
            fits,
            collisions: vec![],
            adequate_space: true,
            walking_space_x: 3.0,
            walking_space_y: 3.0,
            message: message.to_string(),
        }
    }

    fn report(results: Vec<FitnessResult>) -> FitnessReport {
        FitnessReport {
            all_fits: results.iter().all(|r| r.fits),
            overall_message: String::new(),
            results,
        }
    }

    #[test]
    fn binds_by_furniture_id() {
        let mut store = PlacementStore::new();
        let chair = store.add(template(1, "Chair"));
        let desk = store.add(template(2, "Desk"));

        let feedback = FitnessFeedback::correlate(
            &store.snapshot(),
            report(vec![result(2, false, "desk"), result(1, true, "chair")]),
        );

        match feedback.for_placement(chair.id) {
            Feedback::Result { result, ambiguous } => {
                assert_eq!(result.message, "chair");
                assert!(!ambiguous);
            }
            Feedback::NoResult => panic!("expected a result for the chair"),
        }
        assert_eq!(feedback.for_placement(desk.id).status(), FeedbackStatus::Problem);
    }

    #[test]
    fn missing_result_is_not_a_pass() {
        let mut store = PlacementStore::new();
        let chair = store.add(template(1, "Chair"));
        let desk = store.add(template(2, "Desk"));

        let feedback =
            FitnessFeedback::correlate(&store.snapshot(), report(vec![result(1, true, "chair")]));

        assert_eq!(feedback.for_placement(chair.id).status(), FeedbackStatus::Clear);
        assert_eq!(feedback.for_placement(desk.id), Feedback::NoResult);
        assert_eq!(feedback.for_placement(desk.id).status(), FeedbackStatus::Unchecked);
    }

    #[test]
    fn duplicates_bind_in_order_and_are_flagged() {
        let mut store = PlacementStore::new();
        let chair = template(1, "Chair");
        let first = store.add(Arc::clone(&chair));
        let second = store.add(chair);

        let feedback = FitnessFeedback::correlate(
            &store.snapshot(),
            report(vec![result(1, true, "first"), result(1, false, "second")]),
        );

        let Feedback::Result { result, ambiguous } = feedback.for_placement(first.id) else {
            panic!("first chair unbound");
        };
        assert_eq!(result.message, "first");
        assert!(ambiguous);

        let Feedback::Result { result, ambiguous } = feedback.for_placement(second.id) else {
            panic!("second chair unbound");
        };
        assert_eq!(result.message, "second");
        assert!(ambiguous);
    }

    #[test]
    fn fewer_results_than_duplicates() {
        let mut store = PlacementStore::new();
        let chair = template(1, "Chair");
        let first = store.add(Arc::clone(&chair));
        let second = store.add(chair);

        let feedback =
            FitnessFeedback::correlate(&store.snapshot(), report(vec![result(1, true, "only")]));

        assert!(matches!(
            feedback.for_placement(first.id),
            Feedback::Result { ambiguous: true, .. }
        ));
        assert_eq!(feedback.for_placement(second.id), Feedback::NoResult);
    }

    #[test]
    fn results_for_removed_placements_are_discarded() {
        let mut store = PlacementStore::new();
        let chair = store.add(template(1, "Chair"));
        let desk = store.add(template(2, "Desk"));

        let mut feedback = FitnessFeedback::correlate(
            &store.snapshot(),
            report(vec![result(1, true, "chair"), result(2, true, "desk")]),
        );
        assert_eq!(feedback.revision(), store.revision());
        store.remove(desk.id);
        feedback.retain_present(&store);
        assert!(feedback.revision() < store.revision());

        assert_eq!(feedback.bound_count(), 1);
        assert_eq!(feedback.for_placement(desk.id), Feedback::NoResult);
        assert_ne!(feedback.for_placement(chair.id), Feedback::NoResult);
    }

    #[test]
    fn extra_results_are_ignored() {
        let mut store = PlacementStore::new();
        let chair = store.add(template(1, "Chair"));

        let feedback = FitnessFeedback::correlate(
            &store.snapshot(),
            report(vec![result(1, true, "chair"), result(99, false, "ghost")]),
        );

        assert_eq!(feedback.bound_count(), 1);
        assert!(matches!(
            feedback.for_placement(chair.id),
            Feedback::Result { ambiguous: false, .. }
        ));
    }
}
