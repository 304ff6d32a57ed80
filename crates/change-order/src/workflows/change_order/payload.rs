//! Flat event payloads handed to the persistence layer when a response is submitted.
//!
//! Field presence is part of the wire contract: the subsidiary keys are left out
//! entirely when no subsidiary evaluation applies, never written as `null`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::domain::{
    Case, CompensationAssessment, GroundsAssessment, LineAssessment, TimeExtensionAssessment,
    TrackKind,
};
use super::evaluation::{
    classify_grounds, grounds_precluded, time_extension_notice, EvaluationEngine,
    SubsidiaryTrigger, TrackEvaluation,
};

pub const SUBSIDIARY_OUTCOME: &str = "subsidiary_outcome";
pub const SUBSIDIARY_TOTAL_APPROVED: &str = "subsidiary_total_approved";
pub const SUBSIDIARY_TRIGGERS: &str = "subsidiary_triggers";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    GroundsResponse,
    CompensationResponse,
    TimeExtensionResponse,
}

impl EventType {
    pub const fn for_track(track: TrackKind) -> Self {
        match track {
            TrackKind::Grounds => Self::GroundsResponse,
            TrackKind::Compensation => Self::CompensationResponse,
            TrackKind::TimeExtension => Self::TimeExtensionResponse,
        }
    }
}

/// Event payload serialized as one flat JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    pub event_type: EventType,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl EventPayload {
    fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            fields: BTreeMap::new(),
        }
    }

    fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    fn insert_opt<T: Into<Value>>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

/// Free-text justification from the response form. Whether the user touched the
/// field is tracked by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub edited_by_user: bool,
}

impl Justification {
    pub fn edited(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            edited_by_user: true,
        }
    }

    fn resolve(&self, auto: impl FnOnce() -> String) -> String {
        if self.edited_by_user {
            self.text.clone()
        } else {
            auto()
        }
    }
}

fn trigger_codes(triggers: &[SubsidiaryTrigger]) -> Value {
    Value::Array(
        triggers
            .iter()
            .map(|trigger| Value::from(trigger.code()))
            .collect(),
    )
}

fn insert_line(payload: &mut EventPayload, prefix: &str, line: &LineAssessment) {
    payload.insert_opt(
        &format!("{prefix}_verdict"),
        line.verdict.map(|verdict| verdict.code()),
    );
    payload.insert_opt(&format!("{prefix}_approved_amount"), line.approved_amount);
    payload.insert_opt(&format!("{prefix}_notified_in_time"), line.notified_in_time);
}

fn insert_evaluation(payload: &mut EventPayload, evaluation: &TrackEvaluation) {
    let totals = &evaluation.totals;
    payload.insert("outcome", evaluation.principal.label());
    payload.insert("total_requested", totals.total_requested);
    payload.insert(
        "total_requested_incl_precluded",
        totals.total_requested_incl_precluded,
    );
    payload.insert("total_approved", totals.total_approved);
    payload.insert("has_precluded_claim", totals.has_precluded_claim);

    if let Some(subsidiary) = evaluation.subsidiary {
        payload.insert(SUBSIDIARY_OUTCOME, subsidiary.label());
        payload.insert(
            SUBSIDIARY_TOTAL_APPROVED,
            totals.total_approved_incl_precluded,
        );
        payload.insert(SUBSIDIARY_TRIGGERS, trigger_codes(&evaluation.triggers));
    }
}

/// Summary used when the user left the justification untouched.
pub fn auto_justification(evaluation: &TrackEvaluation, unit: &str) -> String {
    let totals = &evaluation.totals;
    let mut summary = format!(
        "The {} claim is {}: {:.0} of {:.0} {unit} approved.",
        evaluation.track,
        evaluation.principal.label(),
        totals.total_approved,
        totals.total_requested_incl_precluded,
    );
    if let Some(subsidiary) = evaluation.subsidiary {
        let reasons: Vec<&str> = evaluation
            .triggers
            .iter()
            .map(|trigger| trigger.label())
            .collect();
        summary.push_str(&format!(
            " In the alternative ({}) the claim is {}: {:.0} {unit}.",
            reasons.join("; "),
            subsidiary.label(),
            totals.total_approved_incl_precluded,
        ));
    }
    summary
}

pub fn grounds_response_payload(
    case: &Case,
    assessment: &GroundsAssessment,
    justification: &Justification,
) -> EventPayload {
    let clauses = case.clauses();
    let mut grounds = case.grounds.clone();
    grounds.response = Some(assessment.clone());
    let precluded = grounds_precluded(&grounds, &clauses);
    let resolution = classify_grounds(assessment, &clauses, precluded);

    let mut payload = EventPayload::new(EventType::GroundsResponse);
    payload.insert("case_id", case.id.0.as_str());
    payload.insert("responded_version", case.grounds.versions.total_versions);
    payload.insert_opt(
        "category",
        case.grounds.category.map(|category| category.label()),
    );
    payload.insert_opt(
        "verdict",
        assessment
            .verdict
            .map(|verdict| clauses.normalize_verdict(verdict).outcome().label()),
    );
    payload.insert_opt("notified_in_time", assessment.notified_in_time);
    payload.insert("precluded", precluded);

    if let Some(resolution) = resolution {
        payload.insert("outcome", resolution.principal.label());
        if let Some(subsidiary) = resolution.subsidiary {
            payload.insert(SUBSIDIARY_OUTCOME, subsidiary.label());
            payload.insert(
                SUBSIDIARY_TRIGGERS,
                trigger_codes(&[SubsidiaryTrigger::PreclusionOnGrounds]),
            );
        }
    }

    let text = justification.resolve(|| match resolution {
        Some(resolution) => match resolution.subsidiary {
            Some(subsidiary) => format!(
                "The grounds are rejected because the circumstance was notified late. In the alternative they are {}.",
                subsidiary.label()
            ),
            None => format!("The grounds are {}.", resolution.principal.label()),
        },
        None => "The grounds have not been assessed.".to_string(),
    });
    payload.insert("justification", text);

    debug!(case = %case.id.0, fields = payload.fields.len(), "built grounds response payload");
    payload
}

pub fn compensation_response_payload(
    case: &Case,
    assessment: &CompensationAssessment,
    justification: &Justification,
) -> EventPayload {
    let evaluation = EvaluationEngine::new(case).compensation_with(assessment);
    let claim = &case.compensation;

    let mut payload = EventPayload::new(EventType::CompensationResponse);
    payload.insert("case_id", case.id.0.as_str());
    payload.insert("responded_version", claim.versions.total_versions);
    insert_line(&mut payload, "main", &assessment.main);
    if claim.site_overhead.is_some() {
        insert_line(&mut payload, "site_overhead", &assessment.site_overhead);
    }
    if claim.productivity_loss.is_some() {
        insert_line(&mut payload, "productivity_loss", &assessment.productivity_loss);
    }
    payload.insert_opt(
        "proposed_method",
        assessment.proposed_method.map(|method| method.code()),
    );
    payload.insert("method_change", evaluation.totals.method_change);
    payload.insert("withhold_payment", assessment.withhold_payment);
    payload.insert_opt(
        "rate_adjustment_reply_in_time",
        assessment.rate_adjustment_reply_in_time,
    );
    insert_evaluation(&mut payload, &evaluation);
    payload.insert(
        "justification",
        justification.resolve(|| auto_justification(&evaluation, "in compensation")),
    );

    debug!(
        case = %case.id.0,
        subsidiary = evaluation.shows_subsidiary(),
        "built compensation response payload"
    );
    payload
}

pub fn time_extension_response_payload(
    case: &Case,
    assessment: &TimeExtensionAssessment,
    justification: &Justification,
) -> EventPayload {
    let evaluation = EvaluationEngine::new(case).time_extension_with(assessment);
    let claim = &case.time_extension;
    let notice = time_extension_notice(claim, assessment);

    let mut payload = EventPayload::new(EventType::TimeExtensionResponse);
    payload.insert("case_id", case.id.0.as_str());
    payload.insert("responded_version", claim.versions.total_versions);
    payload.insert("claimed_days", claim.claimed_days());
    payload.insert_opt("verdict", assessment.verdict.map(|verdict| verdict.code()));
    payload.insert_opt("approved_days", assessment.approved_days);
    payload.insert_opt("hindrance_caused_delay", assessment.hindrance_caused_delay);
    payload.insert(
        "notice_rulings",
        json!({
            "preliminary": notice.preliminary,
            "specified": notice.specified,
            "request_reply": notice.request_reply,
        }),
    );
    insert_evaluation(&mut payload, &evaluation);
    payload.insert(
        "justification",
        justification.resolve(|| auto_justification(&evaluation, "days")),
    );

    debug!(
        case = %case.id.0,
        subsidiary = evaluation.shows_subsidiary(),
        "built time extension response payload"
    );
    payload
}
