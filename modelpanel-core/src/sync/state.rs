//! Per-family synchronization state machine.
//!
//! `Idle → Loading → {Ready, Errored}`, and back to `Loading` from either
//! terminal state when a new request is issued.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::ModelCatalog;

/// Monotonic id of a catalog request within one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle phase of one family's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored,
}

/// Result of applying a host response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Response belonged to a superseded request and was dropped.
    Stale,
}

/// Catalog, phase and error of one provider family.
///
/// Transitions consume the old value and produce a new one so a reader never
/// sees a half-applied update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FamilySync {
    phase: SyncPhase,
    error: Option<String>,
    catalog: ModelCatalog,
    latest_request: RequestId,
}

impl FamilySync {
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SyncPhase::Loading
    }

    /// Raw error message of the last failed fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }

    /// Start a new fetch. Clears any previous error and keeps the catalog.
    pub(crate) fn begin(self) -> (Self, RequestId) {
        let request = self.latest_request.next();
        let next = Self {
            phase: SyncPhase::Loading,
            error: None,
            latest_request: request,
            ..self
        };
        (next, request)
    }

    fn accepts(&self, request: Option<RequestId>) -> bool {
        request.map_or(true, |id| id >= self.latest_request)
    }

    fn adopt(&self, request: Option<RequestId>) -> RequestId {
        request.map_or(self.latest_request, |id| id.max(self.latest_request))
    }

    /// Replace the catalog and finish loading.
    pub(crate) fn complete(self, catalog: ModelCatalog, request: Option<RequestId>) -> (Self, ApplyOutcome) {
        if !self.accepts(request) {
            return (self, ApplyOutcome::Stale);
        }
        let next = Self {
            phase: SyncPhase::Ready,
            error: None,
            catalog,
            latest_request: self.adopt(request),
        };
        (next, ApplyOutcome::Applied)
    }

    /// Record a failure and finish loading. The previous catalog is kept.
    pub(crate) fn fail(self, message: String, request: Option<RequestId>) -> (Self, ApplyOutcome) {
        if !self.accepts(request) {
            return (self, ApplyOutcome::Stale);
        }
        let latest_request = self.adopt(request);
        let next = Self {
            phase: SyncPhase::Errored,
            error: Some(message),
            latest_request,
            ..self
        };
        (next, ApplyOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(ids: &[&str]) -> ModelCatalog {
        ModelCatalog::from_names(ids.iter().copied())
    }

    #[test]
    fn test_initial_state_is_idle() {
        let sync = FamilySync::default();
        assert_eq!(sync.phase(), SyncPhase::Idle);
        assert!(!sync.is_loading());
        assert!(sync.error().is_none());
        assert!(sync.catalog().is_empty());
    }

    #[test]
    fn test_begin_issues_increasing_ids() {
        let (sync, first) = FamilySync::default().begin();
        let (sync, second) = sync.begin();
        assert!(second > first);
        assert_eq!(sync.latest_request(), second);
        assert!(sync.is_loading());
    }

    #[test]
    fn test_complete_replaces_catalog() {
        let (sync, id) = FamilySync::default().begin();
        let (sync, outcome) = sync.complete(catalog(&["a", "b"]), Some(id));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(sync.phase(), SyncPhase::Ready);

        let (sync, _) = sync.complete(catalog(&["c"]), None);
        assert_eq!(sync.catalog().ids().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_fail_keeps_previous_catalog() {
        let (sync, _) = FamilySync::default().complete(catalog(&["a"]), None);
        let (sync, id) = sync.begin();
        let (sync, outcome) = sync.fail("boom".to_string(), Some(id));

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(sync.phase(), SyncPhase::Errored);
        assert!(!sync.is_loading());
        assert_eq!(sync.error(), Some("boom"));
        assert!(sync.catalog().contains("a"));
    }

    #[test]
    fn test_begin_clears_error() {
        let (sync, _) = FamilySync::default().fail("boom".to_string(), None);
        let (sync, _) = sync.begin();
        assert!(sync.error().is_none());
        assert!(sync.is_loading());
    }

    #[test]
    fn test_stale_responses_are_dropped() {
        let (sync, old) = FamilySync::default().begin();
        let (sync, new) = sync.begin();

        let (sync, outcome) = sync.complete(catalog(&["old"]), Some(old));
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert!(sync.is_loading());
        assert!(sync.catalog().is_empty());

        let (sync, outcome) = sync.fail("old failure".to_string(), Some(old));
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert!(sync.error().is_none());

        let (sync, outcome) = sync.complete(catalog(&["new"]), Some(new));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert!(sync.catalog().contains("new"));
    }

    #[test]
    fn test_untagged_push_counts_as_latest() {
        let (sync, pending) = FamilySync::default().begin();

        let (sync, outcome) = sync.complete(catalog(&["pushed"]), None);
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(sync.phase(), SyncPhase::Ready);
        assert!(sync.catalog().contains("pushed"));
        assert_eq!(sync.latest_request(), pending);

        // The in-flight answer is still current and replaces the pushed list
        let (sync, outcome) = sync.complete(catalog(&["fetched"]), Some(pending));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert!(sync.catalog().contains("fetched"));
        assert!(!sync.catalog().contains("pushed"));
    }

    #[test]
    fn test_untagged_error_ends_pending_load() {
        let (sync, pending) = FamilySync::default().begin();
        let (sync, outcome) = sync.fail("host restarted".to_string(), None);
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert!(!sync.is_loading());
        assert_eq!(sync.error(), Some("host restarted"));
        assert_eq!(sync.latest_request(), pending);
    }
}
