use super::common::*;
use crate::workflows::change_order::clauses::ClauseSet;
use crate::workflows::change_order::domain::{
    Category, ClaimLine, CompensationAssessment, GroundsVerdict, LineVerdict,
    SpecificationRequest, TimeExtensionAssessment,
};
use crate::workflows::change_order::evaluation::{
    compensation_preclusion, grounds_precluded, time_extension_notice, NoticeRuling,
};

#[test]
fn unassessed_grounds_notice_is_never_precluded() {
    let mut case = sent_case(Category::Variation);
    case.grounds.response = Some(grounds_assessment(GroundsVerdict::Approved, None));

    assert!(!grounds_precluded(&case.grounds, &case.clauses()));
}

#[test]
fn late_grounds_notice_precludes_only_under_general_notice_clause() {
    for category in [
        Category::Variation,
        Category::VariationByChangeOrder,
        Category::DefectOrOther,
        Category::ForceMajeure,
        Category::MandatoryInstruction,
    ] {
        let mut case = sent_case(category);
        case.grounds.response = Some(grounds_assessment(GroundsVerdict::Approved, Some(false)));

        assert_eq!(
            grounds_precluded(&case.grounds, &case.clauses()),
            category == Category::Variation,
            "{category}"
        );
    }
}

#[test]
fn variation_never_precludes_the_main_line_directly() {
    let case = sent_case(Category::Variation);
    let assessment = CompensationAssessment {
        main: late_line(LineVerdict::Approved),
        ..CompensationAssessment::default()
    };

    let preclusion = compensation_preclusion(&case.compensation, &assessment, &case.clauses());

    assert!(!preclusion.main);
    assert!(!preclusion.any());
}

#[test]
fn special_line_flags_are_ignored_when_the_line_is_not_claimed() {
    let case = sent_case(Category::DefectOrOther);
    let assessment = CompensationAssessment {
        main: approved_line(),
        site_overhead: late_line(LineVerdict::Approved),
        productivity_loss: late_line(LineVerdict::Approved),
        ..CompensationAssessment::default()
    };

    let preclusion = compensation_preclusion(&case.compensation, &assessment, &case.clauses());

    assert!(!preclusion.site_overhead);
    assert!(!preclusion.productivity_loss);
}

#[test]
fn special_lines_carry_their_own_notice_regardless_of_category() {
    let mut case = with_site_overhead(sent_case(Category::MandatoryInstruction), 30_000.0);
    case.compensation.productivity_loss = Some(ClaimLine::new(8_000.0));
    let assessment = CompensationAssessment {
        main: approved_line(),
        site_overhead: approved_line(),
        productivity_loss: late_line(LineVerdict::Partial),
        ..CompensationAssessment::default()
    };

    let preclusion =
        compensation_preclusion(&case.compensation, &assessment, &ClauseSet::resolve(None));

    assert!(!preclusion.main);
    assert!(!preclusion.site_overhead);
    assert!(preclusion.productivity_loss);
}

#[test]
fn late_preliminary_notice_skips_the_specified_step() {
    let case = sent_case(Category::DefectOrOther);
    let assessment = TimeExtensionAssessment {
        preliminary_notice_in_time: Some(false),
        specified_claim_in_time: Some(false),
        ..TimeExtensionAssessment::default()
    };

    let notice = time_extension_notice(&case.time_extension, &assessment);

    assert_eq!(notice.preliminary, NoticeRuling::Precluded);
    assert_eq!(notice.specified, NoticeRuling::NotAssessed);
    assert!(notice.is_precluded());
}

#[test]
fn late_specification_after_timely_preliminary_notice_is_reduced_not_precluded() {
    let case = sent_case(Category::DefectOrOther);
    let assessment = TimeExtensionAssessment {
        preliminary_notice_in_time: Some(true),
        specified_claim_in_time: Some(false),
        ..TimeExtensionAssessment::default()
    };

    let notice = time_extension_notice(&case.time_extension, &assessment);

    assert_eq!(notice.preliminary, NoticeRuling::Timely);
    assert_eq!(notice.specified, NoticeRuling::Reduced);
    assert!(!notice.is_precluded());
}

#[test]
fn late_reply_to_specification_request_is_precluded() {
    let mut case = sent_case(Category::DefectOrOther);
    case.time_extension.specification_request = Some(SpecificationRequest {
        sent: notice(2025, 3, 12),
        reply: Some(notice(2025, 4, 30)),
    });
    let assessment = TimeExtensionAssessment {
        preliminary_notice_in_time: Some(true),
        specified_claim_in_time: Some(true),
        request_reply_in_time: Some(false),
        ..TimeExtensionAssessment::default()
    };

    let notice = time_extension_notice(&case.time_extension, &assessment);

    assert_eq!(notice.request_reply, NoticeRuling::Precluded);
    assert!(notice.is_precluded());
}

#[test]
fn reply_flag_without_a_reply_on_record_is_not_assessed() {
    let mut case = sent_case(Category::DefectOrOther);
    case.time_extension.specification_request = Some(SpecificationRequest {
        sent: notice(2025, 3, 12),
        reply: None,
    });
    let assessment = TimeExtensionAssessment {
        request_reply_in_time: Some(false),
        ..TimeExtensionAssessment::default()
    };

    let notice = time_extension_notice(&case.time_extension, &assessment);

    assert_eq!(notice.request_reply, NoticeRuling::NotAssessed);
}

#[test]
fn notice_record_counts_days_from_reference() {
    let record = notice(2025, 3, 20);

    assert_eq!(record.days_after(date(2025, 3, 3)), 17);
}
