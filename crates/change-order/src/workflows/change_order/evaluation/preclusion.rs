use serde::{Deserialize, Serialize};

use super::super::clauses::ClauseSet;
use super::super::domain::{
    CompensationAssessment, CompensationTrack, GroundsTrack, TimeExtensionAssessment,
    TimeExtensionTrack,
};

/// Ruling on a single notice step. One value per step, so a step can never be
/// both precluded and reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeRuling {
    #[default]
    NotAssessed,
    Timely,
    Precluded,
    Reduced,
}

impl NoticeRuling {
    pub const fn is_precluded(self) -> bool {
        matches!(self, Self::Precluded)
    }

    pub const fn is_reduced(self) -> bool {
        matches!(self, Self::Reduced)
    }
}

/// Per-line preclusion flags for the compensation track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompensationPreclusion {
    pub main: bool,
    pub site_overhead: bool,
    pub productivity_loss: bool,
}

impl CompensationPreclusion {
    pub fn any(&self) -> bool {
        self.main || self.site_overhead || self.productivity_loss
    }
}

/// Notice rulings for each step of the time-extension track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeExtensionNotice {
    pub preliminary: NoticeRuling,
    pub specified: NoticeRuling,
    pub request_reply: NoticeRuling,
}

impl TimeExtensionNotice {
    pub fn is_precluded(&self) -> bool {
        self.preliminary.is_precluded()
            || self.specified.is_precluded()
            || self.request_reply.is_precluded()
    }
}

/// Grounds are precluded only where the category's general notice clause applies
/// and the respondent explicitly found the notice late.
pub fn grounds_precluded(grounds: &GroundsTrack, clauses: &ClauseSet) -> bool {
    clauses.grounds_notice
        && grounds
            .response
            .as_ref()
            .is_some_and(|response| response.notified_in_time == Some(false))
}

pub fn compensation_preclusion(
    claim: &CompensationTrack,
    assessment: &CompensationAssessment,
    clauses: &ClauseSet,
) -> CompensationPreclusion {
    let main = clauses.compensation_notice && assessment.main.notified_in_time == Some(false);

    let site_overhead = clauses.special_line_notice
        && claim.site_overhead.is_some()
        && assessment.site_overhead.notified_in_time == Some(false);

    let productivity_loss = clauses.special_line_notice
        && claim.productivity_loss.is_some()
        && assessment.productivity_loss.notified_in_time == Some(false);

    CompensationPreclusion {
        main,
        site_overhead,
        productivity_loss,
    }
}

pub fn time_extension_notice(
    claim: &TimeExtensionTrack,
    assessment: &TimeExtensionAssessment,
) -> TimeExtensionNotice {
    let preliminary = match (&claim.preliminary_notice, assessment.preliminary_notice_in_time) {
        (None, _) | (Some(_), None) => NoticeRuling::NotAssessed,
        (Some(_), Some(true)) => NoticeRuling::Timely,
        (Some(_), Some(false)) => NoticeRuling::Precluded,
    };

    let specified = if claim.specified_claim.is_none() || preliminary.is_precluded() {
        NoticeRuling::NotAssessed
    } else {
        match assessment.specified_claim_in_time {
            None => NoticeRuling::NotAssessed,
            Some(true) => NoticeRuling::Timely,
            // A timely preliminary notice softens a late specification to a reduction.
            Some(false) if claim.preliminary_notice.is_some() => NoticeRuling::Reduced,
            // Without a preliminary notice the specified claim is the notice itself.
            Some(false) => NoticeRuling::Precluded,
        }
    };

    let request_reply = match (&claim.specification_request, assessment.request_reply_in_time) {
        (Some(request), Some(false)) if request.reply.is_some() => NoticeRuling::Precluded,
        (Some(request), Some(true)) if request.reply.is_some() => NoticeRuling::Timely,
        _ => NoticeRuling::NotAssessed,
    };

    TimeExtensionNotice {
        preliminary,
        specified,
        request_reply,
    }
}
