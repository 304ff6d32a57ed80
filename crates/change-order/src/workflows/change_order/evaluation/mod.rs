mod preclusion;
mod resolution;
mod subsidiary;
mod totals;

pub use preclusion::{
    compensation_preclusion, grounds_precluded, time_extension_notice, CompensationPreclusion,
    NoticeRuling, TimeExtensionNotice,
};
pub use resolution::{
    classify_grounds, classify_principal, classify_subsidiary, GroundsResolution,
    APPROVAL_THRESHOLD,
};
pub use subsidiary::{compensation_triggers, time_extension_triggers, SubsidiaryTrigger};
pub use totals::{
    compensation_lines, compensation_totals, compute_totals, method_change, time_extension_line,
    time_extension_totals, LineEvaluation, LineKind, Totals,
};

use serde::{Deserialize, Serialize};

use super::clauses::ClauseSet;
use super::domain::{
    Case, CompensationAssessment, ResolutionOutcome, TimeExtensionAssessment, TrackKind,
};

/// Principal and subsidiary resolution of one monetary or schedule track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvaluation {
    pub track: TrackKind,
    pub totals: Totals,
    pub principal: ResolutionOutcome,
    /// Present exactly when `triggers` is non-empty.
    pub subsidiary: Option<ResolutionOutcome>,
    pub triggers: Vec<SubsidiaryTrigger>,
}

impl TrackEvaluation {
    pub fn shows_subsidiary(&self) -> bool {
        self.subsidiary.is_some()
    }
}

/// Stateless evaluator applying the case's clause set to its tracks.
pub struct EvaluationEngine<'a> {
    case: &'a Case,
    clauses: ClauseSet,
}

impl<'a> EvaluationEngine<'a> {
    pub fn new(case: &'a Case) -> Self {
        Self {
            case,
            clauses: case.clauses(),
        }
    }

    pub fn clauses(&self) -> &ClauseSet {
        &self.clauses
    }

    pub fn grounds_precluded(&self) -> bool {
        grounds_precluded(&self.case.grounds, &self.clauses)
    }

    pub fn grounds(&self) -> Option<GroundsResolution> {
        let assessment = self.case.grounds.response.as_ref()?;
        classify_grounds(assessment, &self.clauses, self.grounds_precluded())
    }

    /// Grounds rejected on their merits or through preclusion.
    pub fn grounds_rejected(&self) -> bool {
        self.grounds()
            .is_some_and(|resolution| resolution.principal == ResolutionOutcome::Rejected)
    }

    /// Evaluation of the submitted compensation response, if any.
    pub fn compensation(&self) -> Option<TrackEvaluation> {
        self.case
            .compensation
            .response
            .as_ref()
            .map(|assessment| self.compensation_with(assessment))
    }

    /// Evaluate a compensation response form against the case's claim.
    pub fn compensation_with(&self, assessment: &CompensationAssessment) -> TrackEvaluation {
        let claim = &self.case.compensation;
        let preclusion = compensation_preclusion(claim, assessment, &self.clauses);
        let totals = compensation_totals(claim, assessment, &preclusion);
        let grounds_rejected = self.grounds_rejected();
        let inherited = self.clauses.inherits_grounds_preclusion && self.grounds_precluded();
        let triggers = compensation_triggers(
            grounds_rejected,
            inherited,
            &preclusion,
            claim,
            assessment,
            totals.method_change,
        );

        let mut principal = classify_principal(&totals);
        if (grounds_rejected || inherited) && principal != ResolutionOutcome::Withheld {
            principal = ResolutionOutcome::Rejected;
        }

        TrackEvaluation {
            track: TrackKind::Compensation,
            subsidiary: (!triggers.is_empty()).then(|| classify_subsidiary(&totals)),
            totals,
            principal,
            triggers,
        }
    }

    /// Evaluation of the submitted time-extension response, if any.
    pub fn time_extension(&self) -> Option<TrackEvaluation> {
        self.case
            .time_extension
            .response
            .as_ref()
            .map(|assessment| self.time_extension_with(assessment))
    }

    pub fn time_extension_with(&self, assessment: &TimeExtensionAssessment) -> TrackEvaluation {
        let claim = &self.case.time_extension;
        let notice = time_extension_notice(claim, assessment);
        let totals = time_extension_totals(claim, assessment, &notice);
        let grounds_rejected = self.grounds_rejected();
        let triggers = time_extension_triggers(grounds_rejected, &notice, assessment);

        let principal = if grounds_rejected || assessment.hindrance_caused_delay == Some(false) {
            ResolutionOutcome::Rejected
        } else {
            classify_principal(&totals)
        };

        TrackEvaluation {
            track: TrackKind::TimeExtension,
            subsidiary: (!triggers.is_empty()).then(|| classify_subsidiary(&totals)),
            totals,
            principal,
            triggers,
        }
    }

    /// Evaluation for the given dependent track; `None` for grounds or when no
    /// response has been recorded.
    pub fn track(&self, kind: TrackKind) -> Option<TrackEvaluation> {
        match kind {
            TrackKind::Grounds => None,
            TrackKind::Compensation => self.compensation(),
            TrackKind::TimeExtension => self.time_extension(),
        }
    }
}
