//! Forward-only track transitions.
//!
//! `apply` never mutates its input: it returns the next snapshot or a
//! [`TransitionError`]. The only backwards-looking event is `Update`, which opens
//! a new claim version while the previous response stays linked through
//! [`Versioning::responded_version`](super::domain::Versioning).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{
    Case, Category, CompensationAssessment, FinalOrderRecord, GroundsAssessment,
    NoticeRecord, SpecificationRequest, SpecifiedClaim, TimeExtensionAssessment, TrackKind,
    TrackStatus, Versioning,
};
use super::evaluation::EvaluationEngine;

/// Events the surrounding layer submits against a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackEvent {
    Send { track: TrackKind },
    Update { track: TrackKind },
    Withdraw { track: TrackKind },
    MarkNotApplicable { track: TrackKind },
    AcceptResponse { track: TrackKind },
    RespondGrounds { assessment: GroundsAssessment },
    RespondCompensation { assessment: CompensationAssessment },
    RespondTimeExtension { assessment: TimeExtensionAssessment },
    RequestSpecification { notice: NoticeRecord },
    ReplyToSpecificationRequest { notice: NoticeRecord, days: u32 },
    IssueFinalOrder { order: FinalOrderRecord },
}

impl TrackEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Send { .. } => "send",
            Self::Update { .. } => "update",
            Self::Withdraw { .. } => "withdraw",
            Self::MarkNotApplicable { .. } => "mark_not_applicable",
            Self::AcceptResponse { .. } => "accept_response",
            Self::RespondGrounds { .. } => "respond_grounds",
            Self::RespondCompensation { .. } => "respond_compensation",
            Self::RespondTimeExtension { .. } => "respond_time_extension",
            Self::RequestSpecification { .. } => "request_specification",
            Self::ReplyToSpecificationRequest { .. } => "reply_to_specification_request",
            Self::IssueFinalOrder { .. } => "issue_final_order",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("{track} track cannot {event} from status {from}")]
    InvalidTransition {
        track: TrackKind,
        from: TrackStatus,
        event: &'static str,
    },
    #[error("grounds must be sent before the {0} track")]
    GroundsNotSent(TrackKind),
    #[error("grounds category must be chosen before sending")]
    MissingCategory,
    #[error("compensation is not available for {0}")]
    CompensationNotAvailable(Category),
    #[error("{0} track has no response to accept")]
    NoResponse(TrackKind),
    #[error("a request for specification has already been sent")]
    SpecificationAlreadyRequested,
    #[error("no outstanding request for specification")]
    NoSpecificationRequest,
    #[error("a final order has already been issued")]
    FinalOrderExists,
    #[error("a final order requires resolved grounds")]
    GroundsUnresolved,
}

/// Apply `event` to `case`, returning the next snapshot.
pub fn apply(case: &Case, event: TrackEvent) -> Result<Case, TransitionError> {
    let name = event.name();
    let mut next = case.clone();

    match event {
        TrackEvent::Send { track } => send(&mut next, track)?,
        TrackEvent::Update { track } => update(&mut next, track)?,
        TrackEvent::Withdraw { track } => withdraw(&mut next, track)?,
        TrackEvent::MarkNotApplicable { track } => mark_not_applicable(&mut next, track)?,
        TrackEvent::AcceptResponse { track } => accept(&mut next, track)?,
        TrackEvent::RespondGrounds { assessment } => {
            ensure_awaiting(&next, TrackKind::Grounds, name)?;
            next.grounds.response = Some(assessment);
            let status = EvaluationEngine::new(&next)
                .grounds()
                .map(|resolution| resolution.principal.track_status())
                .unwrap_or(TrackStatus::UnderReview);
            record_response(&mut next, TrackKind::Grounds, status);
            refresh_dependent_statuses(&mut next);
        }
        TrackEvent::RespondCompensation { assessment } => {
            ensure_awaiting(&next, TrackKind::Compensation, name)?;
            let status = EvaluationEngine::new(&next)
                .compensation_with(&assessment)
                .principal
                .track_status();
            next.compensation.response = Some(assessment);
            record_response(&mut next, TrackKind::Compensation, status);
        }
        TrackEvent::RespondTimeExtension { assessment } => {
            ensure_awaiting(&next, TrackKind::TimeExtension, name)?;
            let status = EvaluationEngine::new(&next)
                .time_extension_with(&assessment)
                .principal
                .track_status();
            next.time_extension.response = Some(assessment);
            record_response(&mut next, TrackKind::TimeExtension, status);
        }
        TrackEvent::RequestSpecification { notice } => {
            let track = &next.time_extension;
            if !track.status.is_sent() {
                return Err(invalid(TrackKind::TimeExtension, track.status, name));
            }
            if track.specification_request.is_some() {
                return Err(TransitionError::SpecificationAlreadyRequested);
            }
            next.time_extension.specification_request = Some(SpecificationRequest {
                sent: notice,
                reply: None,
            });
        }
        TrackEvent::ReplyToSpecificationRequest { notice, days } => {
            if !next.time_extension.specification_reply_outstanding() {
                return Err(TransitionError::NoSpecificationRequest);
            }
            update(&mut next, TrackKind::TimeExtension)?;
            let track = &mut next.time_extension;
            if let Some(request) = track.specification_request.as_mut() {
                request.reply = Some(notice.clone());
            }
            track.specified_claim = Some(SpecifiedClaim { days, notice });
        }
        TrackEvent::IssueFinalOrder { order } => {
            if next.final_order.is_some() {
                return Err(TransitionError::FinalOrderExists);
            }
            if !next.grounds.status.is_resolved() {
                return Err(TransitionError::GroundsUnresolved);
            }
            next.final_order = Some(order);
        }
    }

    debug!(
        case = %next.id.0,
        event = name,
        status = next.status().label(),
        "applied track event"
    );
    Ok(next)
}

fn invalid(track: TrackKind, from: TrackStatus, event: &'static str) -> TransitionError {
    TransitionError::InvalidTransition { track, from, event }
}

fn status_mut(case: &mut Case, track: TrackKind) -> &mut TrackStatus {
    match track {
        TrackKind::Grounds => &mut case.grounds.status,
        TrackKind::Compensation => &mut case.compensation.status,
        TrackKind::TimeExtension => &mut case.time_extension.status,
    }
}

fn versions_mut(case: &mut Case, track: TrackKind) -> &mut Versioning {
    match track {
        TrackKind::Grounds => &mut case.grounds.versions,
        TrackKind::Compensation => &mut case.compensation.versions,
        TrackKind::TimeExtension => &mut case.time_extension.versions,
    }
}

fn accepted_mut(case: &mut Case, track: TrackKind) -> &mut bool {
    match track {
        TrackKind::Grounds => &mut case.grounds.accepted_by_claimant,
        TrackKind::Compensation => &mut case.compensation.accepted_by_claimant,
        TrackKind::TimeExtension => &mut case.time_extension.accepted_by_claimant,
    }
}

fn ensure_awaiting(
    case: &Case,
    track: TrackKind,
    event: &'static str,
) -> Result<(), TransitionError> {
    let view = case.track(track);
    if view.awaiting_response() {
        Ok(())
    } else {
        Err(invalid(track, view.status(), event))
    }
}

fn send(case: &mut Case, track: TrackKind) -> Result<(), TransitionError> {
    let from = case.track(track).status();
    if from != TrackStatus::Draft {
        return Err(invalid(track, from, "send"));
    }

    match track {
        TrackKind::Grounds => {
            let category = case.grounds.category.ok_or(TransitionError::MissingCategory)?;
            if !case.clauses().compensation_available
                && case.compensation.status == TrackStatus::Draft
            {
                case.compensation.status = TrackStatus::NotApplicable;
                debug!(
                    category = category.label(),
                    "compensation not applicable for category"
                );
            }
        }
        TrackKind::Compensation => {
            if !case.grounds.status.is_sent() {
                return Err(TransitionError::GroundsNotSent(track));
            }
            if let Some(category) = case.grounds.category {
                if !case.clauses().compensation_available {
                    return Err(TransitionError::CompensationNotAvailable(category));
                }
            }
        }
        TrackKind::TimeExtension => {
            if !case.grounds.status.is_sent() {
                return Err(TransitionError::GroundsNotSent(track));
            }
        }
    }

    *status_mut(case, track) = TrackStatus::Sent;
    versions_mut(case, track).total_versions = 1;
    Ok(())
}

fn update(case: &mut Case, track: TrackKind) -> Result<(), TransitionError> {
    let from = case.track(track).status();
    if !from.is_sent() {
        return Err(invalid(track, from, "update"));
    }

    versions_mut(case, track).total_versions += 1;
    *status_mut(case, track) = TrackStatus::Sent;
    *accepted_mut(case, track) = false;
    Ok(())
}

fn withdraw(case: &mut Case, track: TrackKind) -> Result<(), TransitionError> {
    let from = case.track(track).status();
    if !from.is_sent() {
        return Err(invalid(track, from, "withdraw"));
    }
    *status_mut(case, track) = TrackStatus::Withdrawn;

    match track {
        TrackKind::Grounds => {
            for dependent in TrackKind::dependents() {
                let status = status_mut(case, dependent);
                if status.is_active() {
                    *status = TrackStatus::Withdrawn;
                }
            }
        }
        TrackKind::Compensation | TrackKind::TimeExtension => {
            let all_closed = TrackKind::dependents()
                .into_iter()
                .all(|dependent| !case.track(dependent).status().is_active());
            if all_closed && case.grounds.status.is_active() {
                debug!(case = %case.id.0, "all dependent tracks withdrawn; withdrawing grounds");
                case.grounds.status = TrackStatus::Withdrawn;
            }
        }
    }
    Ok(())
}

fn mark_not_applicable(case: &mut Case, track: TrackKind) -> Result<(), TransitionError> {
    let from = case.track(track).status();
    if track == TrackKind::Grounds || from != TrackStatus::Draft {
        return Err(invalid(track, from, "mark_not_applicable"));
    }
    *status_mut(case, track) = TrackStatus::NotApplicable;
    Ok(())
}

fn accept(case: &mut Case, track: TrackKind) -> Result<(), TransitionError> {
    if !case.track(track).response_received() {
        return Err(TransitionError::NoResponse(track));
    }
    *accepted_mut(case, track) = true;
    Ok(())
}

fn record_response(case: &mut Case, track: TrackKind, status: TrackStatus) {
    let versions = versions_mut(case, track);
    versions.responded_version = Some(versions.total_versions);
    *status_mut(case, track) = status;
    *accepted_mut(case, track) = false;
}

/// Re-derive the status of answered dependent tracks from the current grounds
/// resolution. An outcome that changes also drops the claimant's acceptance.
fn refresh_dependent_statuses(case: &mut Case) {
    let engine = EvaluationEngine::new(case);
    let refreshed: Vec<(TrackKind, TrackStatus)> = TrackKind::dependents()
        .into_iter()
        .filter(|kind| case.track(*kind).response_received())
        .filter_map(|kind| {
            engine
                .track(kind)
                .map(|evaluation| (kind, evaluation.principal.track_status()))
        })
        .collect();

    for (track, status) in refreshed {
        let from = case.track(track).status();
        if from == status {
            continue;
        }
        debug!(
            case = %case.id.0,
            track = track.label(),
            from = from.label(),
            to = status.label(),
            "dependent track status re-derived"
        );
        *status_mut(case, track) = status;
        *accepted_mut(case, track) = false;
    }
}
