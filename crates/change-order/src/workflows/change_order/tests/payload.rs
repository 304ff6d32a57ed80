use serde_json::{json, Value};

use super::common::*;
use crate::workflows::change_order::domain::{
    Category, CompensationAssessment, GroundsVerdict, LineVerdict, TimeExtensionAssessment,
    TrackKind,
};
use crate::workflows::change_order::lifecycle::{apply, TrackEvent};
use crate::workflows::change_order::payload::{
    compensation_response_payload, grounds_response_payload, time_extension_response_payload,
    EventType, Justification, SUBSIDIARY_OUTCOME, SUBSIDIARY_TOTAL_APPROVED, SUBSIDIARY_TRIGGERS,
};

#[test]
fn subsidiary_keys_are_absent_without_triggers() {
    let case = respond_grounds(
        &sent_case(Category::MandatoryInstruction),
        GroundsVerdict::Approved,
        true,
    );

    let payload =
        compensation_response_payload(&case, &approved_compensation(), &Justification::default());
    let serialized = serde_json::to_value(&payload).expect("payload serializes");

    assert_eq!(payload.event_type, EventType::CompensationResponse);
    for key in [
        SUBSIDIARY_OUTCOME,
        SUBSIDIARY_TOTAL_APPROVED,
        SUBSIDIARY_TRIGGERS,
    ] {
        assert!(!payload.contains(key), "{key} should be omitted");
        assert!(serialized.get(key).is_none(), "{key} should not serialize");
    }
    assert_eq!(serialized["outcome"], json!("approved"));
    assert_eq!(serialized["event_type"], json!("compensation_response"));
}

#[test]
fn subsidiary_keys_are_present_with_triggers() {
    let case = with_site_overhead(sent_case(Category::MandatoryInstruction), 30_000.0);
    let case = respond_grounds(&case, GroundsVerdict::Approved, true);
    let assessment = CompensationAssessment {
        main: approved_line(),
        site_overhead: late_line(LineVerdict::Approved),
        ..CompensationAssessment::default()
    };

    let payload = compensation_response_payload(&case, &assessment, &Justification::default());

    assert_eq!(payload.get("outcome"), Some(&json!("partially approved")));
    assert_eq!(payload.get(SUBSIDIARY_OUTCOME), Some(&json!("approved")));
    assert_eq!(payload.get(SUBSIDIARY_TOTAL_APPROVED), Some(&json!(130_000.0)));
    assert_eq!(
        payload.get(SUBSIDIARY_TRIGGERS),
        Some(&json!(["preclusion_on_site_overhead"]))
    );
    assert_eq!(payload.get("site_overhead_notified_in_time"), Some(&json!(false)));
    assert!(!payload.contains("productivity_loss_verdict"));
}

#[test]
fn payload_records_the_version_being_answered() {
    let case = respond_grounds(
        &sent_case(Category::DefectOrOther),
        GroundsVerdict::Rejected,
        true,
    );
    let case = apply(
        &case,
        TrackEvent::Update {
            track: TrackKind::Grounds,
        },
    )
    .expect("update accepted");

    let payload = grounds_response_payload(
        &case,
        &grounds_assessment(GroundsVerdict::Approved, Some(true)),
        &Justification::default(),
    );

    assert_eq!(payload.get("responded_version"), Some(&json!(2)));
    assert_eq!(payload.get("outcome"), Some(&json!("approved")));
}

#[test]
fn precluded_grounds_carry_subsidiary_verdict() {
    let case = sent_case(Category::Variation);

    let payload = grounds_response_payload(
        &case,
        &grounds_assessment(GroundsVerdict::PartiallyApproved, Some(false)),
        &Justification::default(),
    );

    assert_eq!(payload.get("precluded"), Some(&json!(true)));
    assert_eq!(payload.get("outcome"), Some(&json!("rejected")));
    assert_eq!(
        payload.get(SUBSIDIARY_OUTCOME),
        Some(&json!("partially approved"))
    );
    assert!(!payload.contains(SUBSIDIARY_TOTAL_APPROVED));
}

#[test]
fn edited_justification_is_kept_verbatim() {
    let case = respond_grounds(
        &sent_case(Category::DefectOrOther),
        GroundsVerdict::Approved,
        true,
    );
    let justification = Justification::edited("Quantities verified on site 12 May.");

    let payload = compensation_response_payload(&case, &approved_compensation(), &justification);

    assert_eq!(
        payload.get("justification"),
        Some(&json!("Quantities verified on site 12 May."))
    );
}

#[test]
fn untouched_justification_is_generated_from_totals() {
    let case = respond_grounds(
        &sent_case(Category::DefectOrOther),
        GroundsVerdict::Approved,
        true,
    );
    let justification = Justification {
        text: "stale draft".to_string(),
        edited_by_user: false,
    };
    let assessment = TimeExtensionAssessment {
        specified_claim_in_time: Some(false),
        approved_days: Some(12),
        ..timely_time_extension(LineVerdict::Partial)
    };

    let payload = time_extension_response_payload(&case, &assessment, &justification);

    let text = match payload.get("justification") {
        Some(Value::String(text)) => text.clone(),
        other => panic!("expected justification text, got {other:?}"),
    };
    assert!(text.starts_with("The time extension claim is partially approved: 12 of 20 days"));
    assert!(text.contains("time claim specified late"));
    assert_eq!(payload.get("claimed_days"), Some(&json!(20)));
    assert_eq!(
        payload.get("notice_rulings"),
        Some(&json!({
            "preliminary": "timely",
            "specified": "reduced",
            "request_reply": "not_assessed",
        }))
    );
}
