use serde::{Deserialize, Serialize};
use tracing::trace;

use super::super::domain::{
    CompensationAssessment, CompensationTrack, LineAssessment, LineVerdict,
    TimeExtensionAssessment, TimeExtensionTrack,
};
use super::preclusion::{CompensationPreclusion, TimeExtensionNotice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    MainClaim,
    SiteOverhead,
    ProductivityLoss,
    TimeExtension,
}

impl LineKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::MainClaim => "main",
            Self::SiteOverhead => "site_overhead",
            Self::ProductivityLoss => "productivity_loss",
            Self::TimeExtension => "days",
        }
    }
}

/// One claim line as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineEvaluation {
    pub kind: LineKind,
    pub claimed: f64,
    pub verdict: Option<LineVerdict>,
    pub partial_value: Option<f64>,
    pub precluded: bool,
}

impl LineEvaluation {
    fn from_assessment(
        kind: LineKind,
        claimed: f64,
        assessment: &LineAssessment,
        precluded: bool,
    ) -> Self {
        Self {
            kind,
            claimed,
            verdict: assessment.verdict,
            partial_value: assessment.approved_amount,
            precluded,
        }
    }

    /// Value the respondent's verdict assigns to the line, ignoring preclusion.
    /// A partial verdict without an entered value counts as zero and never
    /// exceeds the claimed value.
    pub fn evaluated_value(&self) -> f64 {
        match self.verdict {
            Some(LineVerdict::Approved) => self.claimed,
            Some(LineVerdict::Partial) => self.partial_value.unwrap_or(0.0).min(self.claimed),
            Some(LineVerdict::Rejected) | None => 0.0,
        }
    }
}

/// Requested and approved sums for one track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub total_requested: f64,
    pub total_requested_incl_precluded: f64,
    pub total_approved: f64,
    pub total_approved_incl_precluded: f64,
    pub method_change: bool,
    pub has_precluded_claim: bool,
    pub withhold_payment: bool,
}

pub fn compute_totals(
    lines: &[LineEvaluation],
    method_change: bool,
    withhold_payment: bool,
) -> Totals {
    let mut totals = Totals {
        method_change,
        withhold_payment,
        ..Totals::default()
    };

    for line in lines {
        let value = line.evaluated_value();
        trace!(
            line = line.kind.code(),
            claimed = line.claimed,
            value,
            precluded = line.precluded,
            "aggregating claim line"
        );

        totals.total_requested_incl_precluded += line.claimed;
        totals.total_approved_incl_precluded += value;

        if line.precluded {
            totals.has_precluded_claim = true;
        } else {
            totals.total_requested += line.claimed;
            totals.total_approved += value;
        }
    }

    totals
}

/// Main line plus every special line present in the claim.
pub fn compensation_lines(
    claim: &CompensationTrack,
    assessment: &CompensationAssessment,
    preclusion: &CompensationPreclusion,
) -> Vec<LineEvaluation> {
    let mut lines = vec![LineEvaluation::from_assessment(
        LineKind::MainClaim,
        claim.main.amount,
        &assessment.main,
        preclusion.main,
    )];

    if let Some(line) = &claim.site_overhead {
        lines.push(LineEvaluation::from_assessment(
            LineKind::SiteOverhead,
            line.amount,
            &assessment.site_overhead,
            preclusion.site_overhead,
        ));
    }

    if let Some(line) = &claim.productivity_loss {
        lines.push(LineEvaluation::from_assessment(
            LineKind::ProductivityLoss,
            line.amount,
            &assessment.productivity_loss,
            preclusion.productivity_loss,
        ));
    }

    lines
}

/// The respondent proposes a method other than the one claimed.
pub fn method_change(claim: &CompensationTrack, assessment: &CompensationAssessment) -> bool {
    assessment
        .proposed_method
        .is_some_and(|proposed| claim.method != Some(proposed))
}

pub fn compensation_totals(
    claim: &CompensationTrack,
    assessment: &CompensationAssessment,
    preclusion: &CompensationPreclusion,
) -> Totals {
    let lines = compensation_lines(claim, assessment, preclusion);
    compute_totals(
        &lines,
        method_change(claim, assessment),
        assessment.withhold_payment,
    )
}

pub fn time_extension_line(
    claim: &TimeExtensionTrack,
    assessment: &TimeExtensionAssessment,
    notice: &TimeExtensionNotice,
) -> LineEvaluation {
    LineEvaluation {
        kind: LineKind::TimeExtension,
        claimed: f64::from(claim.claimed_days()),
        verdict: assessment.verdict,
        partial_value: assessment.approved_days.map(f64::from),
        precluded: notice.is_precluded(),
    }
}

pub fn time_extension_totals(
    claim: &TimeExtensionTrack,
    assessment: &TimeExtensionAssessment,
    notice: &TimeExtensionNotice,
) -> Totals {
    compute_totals(&[time_extension_line(claim, assessment, notice)], false, false)
}
