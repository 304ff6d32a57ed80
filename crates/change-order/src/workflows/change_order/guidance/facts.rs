use super::super::clauses::ClauseSet;
use super::super::domain::{Case, CaseStatus, ResolutionOutcome, TrackKind};
use super::super::evaluation::{EvaluationEngine, GroundsResolution, TrackEvaluation};

/// Derived view of a case, computed once per guidance call so each rule
/// predicate is a cheap lookup.
#[derive(Debug, Clone)]
pub(crate) struct CaseFacts {
    pub(crate) status: CaseStatus,
    pub(crate) clauses: ClauseSet,
    /// Sent tracks with no answer to their latest version.
    pub(crate) awaiting_response: Vec<TrackKind>,
    /// Subset of `awaiting_response` that were answered before and then updated.
    pub(crate) updated_awaiting: Vec<TrackKind>,
    /// Answered tracks the claimant has neither accepted nor updated.
    pub(crate) responses_to_review: Vec<TrackKind>,
    pub(crate) grounds: Option<GroundsResolution>,
    pub(crate) grounds_precluded: bool,
    pub(crate) compensation: Option<TrackEvaluation>,
    pub(crate) time_extension: Option<TrackEvaluation>,
}

impl CaseFacts {
    pub(crate) fn gather(case: &Case) -> Self {
        let engine = EvaluationEngine::new(case);

        let mut awaiting_response = Vec::new();
        let mut updated_awaiting = Vec::new();
        let mut responses_to_review = Vec::new();
        for track in case.tracks() {
            if track.awaiting_response() {
                awaiting_response.push(track.kind());
                if track.versions().has_unanswered_update() {
                    updated_awaiting.push(track.kind());
                }
            } else if track.response_received() && !track.is_settled() {
                responses_to_review.push(track.kind());
            }
        }

        Self {
            status: case.status(),
            clauses: *engine.clauses(),
            awaiting_response,
            updated_awaiting,
            responses_to_review,
            grounds: engine.grounds(),
            grounds_precluded: engine.grounds_precluded(),
            compensation: engine.compensation(),
            time_extension: engine.time_extension(),
        }
    }

    pub(crate) fn grounds_outcome(&self) -> Option<ResolutionOutcome> {
        self.grounds.map(|resolution| resolution.principal)
    }

    pub(crate) fn grounds_rejected(&self) -> bool {
        self.grounds_outcome() == Some(ResolutionOutcome::Rejected)
    }

    /// Grounds rejected and the rejection still stands unanswered by the claimant.
    pub(crate) fn grounds_dispute_open(&self) -> bool {
        self.grounds_rejected() && self.to_review(TrackKind::Grounds)
    }

    pub(crate) fn awaiting(&self, kind: TrackKind) -> bool {
        self.awaiting_response.contains(&kind)
    }

    pub(crate) fn updated(&self, kind: TrackKind) -> bool {
        self.updated_awaiting.contains(&kind)
    }

    pub(crate) fn to_review(&self, kind: TrackKind) -> bool {
        self.responses_to_review.contains(&kind)
    }

    pub(crate) fn evaluation(&self, kind: TrackKind) -> Option<&TrackEvaluation> {
        match kind {
            TrackKind::Grounds => None,
            TrackKind::Compensation => self.compensation.as_ref(),
            TrackKind::TimeExtension => self.time_extension.as_ref(),
        }
    }

    /// Dependent tracks whose response carries a subsidiary evaluation.
    pub(crate) fn subsidiary_tracks(&self) -> Vec<TrackKind> {
        TrackKind::dependents()
            .into_iter()
            .filter(|kind| {
                self.evaluation(*kind)
                    .is_some_and(TrackEvaluation::shows_subsidiary)
            })
            .collect()
    }
}
