use chrono::NaiveDate;

use crate::workflows::change_order::domain::{
    Case, Category, ClaimLine, CompensationAssessment, CompensationMethod, GroundsAssessment,
    GroundsVerdict, LineAssessment, LineVerdict, NoticeMethod, NoticeRecord, Role,
    SpecifiedClaim, TimeExtensionAssessment, TrackKind, TrackStatus,
};
use crate::workflows::change_order::guidance::{
    select_message, GuidanceContext, GuidanceMessage, Permissions,
};
use crate::workflows::change_order::lifecycle::{apply, TrackEvent};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn notice(year: i32, month: u32, day: u32) -> NoticeRecord {
    NoticeRecord::new(date(year, month, day), vec![NoticeMethod::Email])
}

/// Fully drafted case: 100 000 claimed on unit rates and 20 days specified
/// after a preliminary notice. Nothing sent yet.
pub(super) fn draft_case(category: Category) -> Case {
    let mut case = Case::new("CO-1042", "Relocated drainage trench");
    case.grounds.category = Some(category);
    case.grounds.discovered_on = Some(date(2025, 3, 3));
    case.grounds.notice = Some(notice(2025, 3, 5));
    case.compensation.method = Some(CompensationMethod::UnitRates);
    case.compensation.main = ClaimLine {
        amount: 100_000.0,
        notice: Some(notice(2025, 3, 10)),
    };
    case.time_extension.preliminary_notice = Some(notice(2025, 3, 6));
    case.time_extension.specified_claim = Some(SpecifiedClaim {
        days: 20,
        notice: notice(2025, 3, 20),
    });
    case
}

pub(super) fn send(case: &Case, track: TrackKind) -> Case {
    apply(case, TrackEvent::Send { track }).expect("track sends")
}

/// Every available track sent, no responses yet.
pub(super) fn sent_case(category: Category) -> Case {
    let mut case = send(&draft_case(category), TrackKind::Grounds);
    if case.compensation.status == TrackStatus::Draft {
        case = send(&case, TrackKind::Compensation);
    }
    send(&case, TrackKind::TimeExtension)
}

pub(super) fn grounds_assessment(
    verdict: GroundsVerdict,
    notified_in_time: Option<bool>,
) -> GroundsAssessment {
    GroundsAssessment {
        verdict: Some(verdict),
        notified_in_time,
    }
}

pub(super) fn respond_grounds(case: &Case, verdict: GroundsVerdict, in_time: bool) -> Case {
    apply(
        case,
        TrackEvent::RespondGrounds {
            assessment: grounds_assessment(verdict, Some(in_time)),
        },
    )
    .expect("grounds response recorded")
}

pub(super) fn approved_line() -> LineAssessment {
    LineAssessment {
        verdict: Some(LineVerdict::Approved),
        approved_amount: None,
        notified_in_time: Some(true),
    }
}

pub(super) fn late_line(verdict: LineVerdict) -> LineAssessment {
    LineAssessment {
        verdict: Some(verdict),
        approved_amount: None,
        notified_in_time: Some(false),
    }
}

pub(super) fn partial_line(amount: f64) -> LineAssessment {
    LineAssessment {
        verdict: Some(LineVerdict::Partial),
        approved_amount: Some(amount),
        notified_in_time: Some(true),
    }
}

pub(super) fn approved_compensation() -> CompensationAssessment {
    CompensationAssessment {
        main: approved_line(),
        ..CompensationAssessment::default()
    }
}

pub(super) fn respond_compensation(case: &Case, assessment: CompensationAssessment) -> Case {
    apply(case, TrackEvent::RespondCompensation { assessment })
        .expect("compensation response recorded")
}

pub(super) fn timely_time_extension(verdict: LineVerdict) -> TimeExtensionAssessment {
    TimeExtensionAssessment {
        preliminary_notice_in_time: Some(true),
        specified_claim_in_time: Some(true),
        hindrance_caused_delay: Some(true),
        verdict: Some(verdict),
        ..TimeExtensionAssessment::default()
    }
}

pub(super) fn respond_time_extension(case: &Case, assessment: TimeExtensionAssessment) -> Case {
    apply(case, TrackEvent::RespondTimeExtension { assessment })
        .expect("time extension response recorded")
}

pub(super) fn with_site_overhead(mut case: Case, amount: f64) -> Case {
    case.compensation.site_overhead = Some(ClaimLine {
        amount,
        notice: Some(notice(2025, 4, 2)),
    });
    case
}

pub(super) fn message_for(
    case: &Case,
    role: Role,
    context: &GuidanceContext,
) -> Option<GuidanceMessage> {
    let permissions = Permissions::derive(case, role);
    select_message(case, role, &permissions, context)
}

/// Rule id of the message selected with derived permissions and an empty context.
pub(super) fn rule_for(case: &Case, role: Role) -> Option<&'static str> {
    message_for(case, role, &GuidanceContext::default()).map(|message| message.rule)
}
