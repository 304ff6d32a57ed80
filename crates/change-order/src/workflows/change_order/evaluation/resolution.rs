use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::clauses::ClauseSet;
use super::super::domain::{GroundsAssessment, ResolutionOutcome};
use super::totals::Totals;

/// Approval ratio at or above which a claim counts as fully approved. Sits
/// below 1.0 so rounding on partial lines does not demote an approval.
pub const APPROVAL_THRESHOLD: f64 = 0.99;

fn classify(approved: f64, requested: f64, method_change: bool) -> ResolutionOutcome {
    if approved == 0.0 {
        return ResolutionOutcome::Rejected;
    }

    let ratio = approved / requested;
    if ratio >= APPROVAL_THRESHOLD && !method_change {
        ResolutionOutcome::Approved
    } else {
        ResolutionOutcome::PartiallyApproved
    }
}

/// Principal outcome: precluded lines count as zero approved, but the ratio is
/// taken against everything claimed.
pub fn classify_principal(totals: &Totals) -> ResolutionOutcome {
    if totals.withhold_payment {
        return ResolutionOutcome::Withheld;
    }

    let outcome = classify(
        totals.total_approved,
        totals.total_requested_incl_precluded,
        totals.method_change,
    );
    debug!(
        approved = totals.total_approved,
        requested = totals.total_requested_incl_precluded,
        outcome = outcome.label(),
        "classified principal outcome"
    );
    outcome
}

/// Subsidiary outcome: as if no preclusion applied. The withhold flag does not
/// apply to the subsidiary evaluation.
pub fn classify_subsidiary(totals: &Totals) -> ResolutionOutcome {
    classify(
        totals.total_approved_incl_precluded,
        totals.total_requested_incl_precluded,
        totals.method_change,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundsResolution {
    pub principal: ResolutionOutcome,
    /// Present when preclusion overrides the verdict.
    pub subsidiary: Option<ResolutionOutcome>,
}

/// `None` until the respondent has given a verdict.
pub fn classify_grounds(
    assessment: &GroundsAssessment,
    clauses: &ClauseSet,
    precluded: bool,
) -> Option<GroundsResolution> {
    let verdict = clauses.normalize_verdict(assessment.verdict?);
    let outcome = verdict.outcome();

    Some(if precluded {
        GroundsResolution {
            principal: ResolutionOutcome::Rejected,
            subsidiary: Some(outcome),
        }
    } else {
        GroundsResolution {
            principal: outcome,
            subsidiary: None,
        }
    })
}
