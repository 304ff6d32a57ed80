use serde::{Deserialize, Serialize};

use super::super::domain::{CompensationAssessment, CompensationTrack, TimeExtensionAssessment};
use super::preclusion::{CompensationPreclusion, TimeExtensionNotice};

/// Reason a subsidiary evaluation is shown next to the principal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsidiaryTrigger {
    PreclusionOnGrounds,
    PreclusionOnMainClaim,
    PreclusionOnSiteOverhead,
    PreclusionOnProductivityLoss,
    ReductionOnRateAdjustment,
    MethodRejected,
    GroundsRejected,
    PreclusionOnPreliminaryNotice,
    PreclusionOnRequestReply,
    ReductionOnSpecifiedClaim,
    NoCausalLink,
}

impl SubsidiaryTrigger {
    pub const fn code(self) -> &'static str {
        match self {
            Self::PreclusionOnGrounds => "preclusion_on_grounds",
            Self::PreclusionOnMainClaim => "preclusion_on_main_claim",
            Self::PreclusionOnSiteOverhead => "preclusion_on_site_overhead",
            Self::PreclusionOnProductivityLoss => "preclusion_on_productivity_loss",
            Self::ReductionOnRateAdjustment => "reduction_on_rate_adjustment",
            Self::MethodRejected => "method_rejected",
            Self::GroundsRejected => "grounds_rejected",
            Self::PreclusionOnPreliminaryNotice => "preclusion_on_preliminary_notice",
            Self::PreclusionOnRequestReply => "preclusion_on_request_reply",
            Self::ReductionOnSpecifiedClaim => "reduction_on_specified_claim",
            Self::NoCausalLink => "no_causal_link",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PreclusionOnGrounds => "grounds notice given late",
            Self::PreclusionOnMainClaim => "compensation claim notified late",
            Self::PreclusionOnSiteOverhead => "site overhead notified late",
            Self::PreclusionOnProductivityLoss => "productivity loss notified late",
            Self::ReductionOnRateAdjustment => "late reply on rate adjustment",
            Self::MethodRejected => "claimed method rejected",
            Self::GroundsRejected => "grounds rejected",
            Self::PreclusionOnPreliminaryNotice => "time claim notified late",
            Self::PreclusionOnRequestReply => "late reply to request for specification",
            Self::ReductionOnSpecifiedClaim => "time claim specified late",
            Self::NoCausalLink => "hindrance did not delay the works",
        }
    }
}

/// Triggers for the compensation track, in fixed audit order. An inherited
/// grounds preclusion already names why the grounds fell, so it replaces the
/// plain grounds-rejected tag.
pub fn compensation_triggers(
    grounds_rejected: bool,
    grounds_preclusion_inherited: bool,
    preclusion: &CompensationPreclusion,
    claim: &CompensationTrack,
    assessment: &CompensationAssessment,
    method_change: bool,
) -> Vec<SubsidiaryTrigger> {
    let mut triggers = Vec::new();

    if grounds_preclusion_inherited {
        triggers.push(SubsidiaryTrigger::PreclusionOnGrounds);
    } else if grounds_rejected {
        triggers.push(SubsidiaryTrigger::GroundsRejected);
    }
    if preclusion.main {
        triggers.push(SubsidiaryTrigger::PreclusionOnMainClaim);
    }
    if preclusion.site_overhead {
        triggers.push(SubsidiaryTrigger::PreclusionOnSiteOverhead);
    }
    if preclusion.productivity_loss {
        triggers.push(SubsidiaryTrigger::PreclusionOnProductivityLoss);
    }
    if claim.rate_adjustment.is_some() && assessment.rate_adjustment_reply_in_time == Some(false) {
        triggers.push(SubsidiaryTrigger::ReductionOnRateAdjustment);
    }
    if method_change {
        triggers.push(SubsidiaryTrigger::MethodRejected);
    }

    triggers
}

/// Triggers for the time-extension track, in fixed audit order.
pub fn time_extension_triggers(
    grounds_rejected: bool,
    notice: &TimeExtensionNotice,
    assessment: &TimeExtensionAssessment,
) -> Vec<SubsidiaryTrigger> {
    let mut triggers = Vec::new();

    if grounds_rejected {
        triggers.push(SubsidiaryTrigger::GroundsRejected);
    }
    if notice.preliminary.is_precluded() || notice.specified.is_precluded() {
        triggers.push(SubsidiaryTrigger::PreclusionOnPreliminaryNotice);
    }
    if notice.request_reply.is_precluded() {
        triggers.push(SubsidiaryTrigger::PreclusionOnRequestReply);
    }
    if notice.specified.is_reduced() {
        triggers.push(SubsidiaryTrigger::ReductionOnSpecifiedClaim);
    }
    if assessment.hindrance_caused_delay == Some(false) {
        triggers.push(SubsidiaryTrigger::NoCausalLink);
    }

    triggers
}
