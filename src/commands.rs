use change_order::error::AppError;
use change_order::workflows::change_order::{
    apply, compensation_response_payload, grounds_response_payload, select_message,
    time_extension_response_payload, Case, CaseStatus, EvaluationEngine, EventPayload,
    GroundsResolution, GuidanceContext, GuidanceMessage, Justification, Permissions, Role,
    TrackEvaluation, TrackEvent, TrackKind, TrackStatus,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = raw.len(), "read snapshot");
    Ok(serde_json::from_str(&raw)?)
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub(crate) case_id: String,
    pub(crate) title: String,
    pub(crate) status: CaseStatus,
    pub(crate) awaiting_response: Vec<TrackKind>,
    pub(crate) tracks: Vec<TrackStatusView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrackStatusView {
    pub(crate) track: TrackKind,
    pub(crate) status: TrackStatus,
    pub(crate) total_versions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) responded_version: Option<u32>,
    pub(crate) response_received: bool,
    pub(crate) settled: bool,
}

pub(crate) fn status(case: &Case) -> StatusReport {
    let tracks = case
        .tracks()
        .map(|track| TrackStatusView {
            track: track.kind(),
            status: track.status(),
            total_versions: track.versions().total_versions,
            responded_version: track.versions().responded_version,
            response_received: track.response_received(),
            settled: track.is_settled(),
        })
        .collect();

    StatusReport {
        case_id: case.id.0.clone(),
        title: case.title.clone(),
        status: case.status(),
        awaiting_response: case.awaiting_response(),
        tracks,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationReport {
    pub(crate) case_id: String,
    pub(crate) track: TrackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) grounds: Option<GroundsResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) evaluation: Option<TrackEvaluation>,
}

/// Evaluate the response recorded on `track`.
pub(crate) fn evaluate(case: &Case, track: TrackKind) -> Result<EvaluationReport, AppError> {
    let engine = EvaluationEngine::new(case);
    let (grounds, evaluation) = match track {
        TrackKind::Grounds => (engine.grounds(), None),
        TrackKind::Compensation | TrackKind::TimeExtension => (None, engine.track(track)),
    };
    if grounds.is_none() && evaluation.is_none() {
        return Err(AppError::MissingResponse(track));
    }

    Ok(EvaluationReport {
        case_id: case.id.0.clone(),
        track,
        grounds,
        evaluation,
    })
}

#[derive(Debug, Serialize)]
pub(crate) struct GuidanceReport {
    pub(crate) case_id: String,
    pub(crate) role: Role,
    pub(crate) message: Option<GuidanceMessage>,
}

pub(crate) fn guidance(
    case: &Case,
    role: Role,
    permissions: Option<Permissions>,
    context: &GuidanceContext,
) -> GuidanceReport {
    let permissions = permissions.unwrap_or_else(|| Permissions::derive(case, role));

    GuidanceReport {
        case_id: case.id.0.clone(),
        role,
        message: select_message(case, role, &permissions, context),
    }
}

/// Event payload for the response recorded on `track`.
pub(crate) fn payload(
    case: &Case,
    track: TrackKind,
    justification: Option<String>,
) -> Result<EventPayload, AppError> {
    let justification = justification
        .map(Justification::edited)
        .unwrap_or_default();
    let missing = || AppError::MissingResponse(track);

    let payload = match track {
        TrackKind::Grounds => {
            let assessment = case.grounds.response.as_ref().ok_or_else(missing)?;
            grounds_response_payload(case, assessment, &justification)
        }
        TrackKind::Compensation => {
            let assessment = case.compensation.response.as_ref().ok_or_else(missing)?;
            compensation_response_payload(case, assessment, &justification)
        }
        TrackKind::TimeExtension => {
            let assessment = case.time_extension.response.as_ref().ok_or_else(missing)?;
            time_extension_response_payload(case, assessment, &justification)
        }
    };
    Ok(payload)
}

pub(crate) fn apply_event(case: &Case, event: TrackEvent) -> Result<Case, AppError> {
    let name = event.name();
    let next = apply(case, event)?;
    debug!(case = %next.id.0, event = name, status = next.status().label(), "event applied");
    Ok(next)
}
