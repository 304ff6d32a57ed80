use super::super::domain::{ClaimTrack, ResolutionOutcome, TrackKind, TrackStatus};
use super::{amount, track_list, GuidanceMessage, GuidanceRule, RuleInput, Severity, SuggestedAction};

pub(super) static RULES: &[GuidanceRule] = &[
    GuidanceRule {
        id: "respondent.grounds_not_sent",
        applies: grounds_not_sent,
        render: render_grounds_not_sent,
    },
    GuidanceRule {
        id: "respondent.multiple_pending",
        applies: multiple_pending,
        render: render_multiple_pending,
    },
    GuidanceRule {
        id: "respondent.grounds_update",
        applies: grounds_update,
        render: render_grounds_update,
    },
    GuidanceRule {
        id: "respondent.grounds_pending",
        applies: grounds_pending,
        render: render_grounds_pending,
    },
    GuidanceRule {
        id: "respondent.compensation_update",
        applies: compensation_update,
        render: render_compensation_update,
    },
    GuidanceRule {
        id: "respondent.compensation_pending_subsidiary",
        applies: compensation_pending_subsidiary,
        render: render_compensation_pending_subsidiary,
    },
    GuidanceRule {
        id: "respondent.compensation_pending",
        applies: compensation_pending,
        render: render_compensation_pending,
    },
    GuidanceRule {
        id: "respondent.time_extension_update",
        applies: time_extension_update,
        render: render_time_extension_update,
    },
    GuidanceRule {
        id: "respondent.time_extension_pending_subsidiary",
        applies: time_extension_pending_subsidiary,
        render: render_time_extension_pending_subsidiary,
    },
    GuidanceRule {
        id: "respondent.time_extension_pending",
        applies: time_extension_pending,
        render: render_time_extension_pending,
    },
    GuidanceRule {
        id: "respondent.request_specification",
        applies: request_specification,
        render: render_request_specification,
    },
    GuidanceRule {
        id: "respondent.specification_reply_outstanding",
        applies: specification_reply_outstanding,
        render: render_specification_reply_outstanding,
    },
    GuidanceRule {
        id: "respondent.estimate_outstanding",
        applies: estimate_outstanding,
        render: render_estimate_outstanding,
    },
    GuidanceRule {
        id: "respondent.issue_final_order",
        applies: issue_final_order,
        render: render_issue_final_order,
    },
    GuidanceRule {
        id: "respondent.escalation_open",
        applies: escalation_open,
        render: render_escalation_open,
    },
    GuidanceRule {
        id: "respondent.awaiting_claimant",
        applies: awaiting_claimant,
        render: render_awaiting_claimant,
    },
];

/// Tracks waiting for an answer that this user may respond to.
fn respondable(input: &RuleInput<'_>) -> Vec<TrackKind> {
    input
        .facts
        .awaiting_response
        .iter()
        .copied()
        .filter(|kind| respondable_track(input, *kind))
        .collect()
}

/// A time claim backed only by a preliminary notice has nothing to assess yet.
fn respondable_track(input: &RuleInput<'_>, kind: TrackKind) -> bool {
    input.facts.awaiting(kind)
        && input.permissions.track(kind).respond
        && (kind != TrackKind::TimeExtension || input.case.time_extension.specified_claim.is_some())
}

fn grounds_not_sent(input: &RuleInput<'_>) -> bool {
    input.case.grounds.status == TrackStatus::Draft
}

fn render_grounds_not_sent(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Claim not yet notified",
        "The claimant has not sent the grounds notice. Nothing is required from you yet.",
    )
}

fn multiple_pending(input: &RuleInput<'_>) -> bool {
    respondable(input).len() >= 2
}

fn render_multiple_pending(input: &RuleInput<'_>) -> GuidanceMessage {
    let tracks = respondable(input);
    let message = GuidanceMessage::new(
        Severity::Action,
        format!("{} claims awaiting your response", tracks.len()),
        format!(
            "The {} claims are waiting for your response. Start with the grounds, since the other claims depend on them.",
            track_list(&tracks)
        ),
    );
    match tracks.first() {
        Some(first) => message.with_action(SuggestedAction::Respond(*first)),
        None => message,
    }
}

fn grounds_update(input: &RuleInput<'_>) -> bool {
    respondable_track(input, TrackKind::Grounds) && input.facts.updated(TrackKind::Grounds)
}

fn render_grounds_update(input: &RuleInput<'_>) -> GuidanceMessage {
    update_message(
        TrackKind::Grounds,
        input.case.grounds.versions.total_versions,
    )
}

fn grounds_pending(input: &RuleInput<'_>) -> bool {
    respondable_track(input, TrackKind::Grounds)
}

fn render_grounds_pending(input: &RuleInput<'_>) -> GuidanceMessage {
    let body = if input.facts.clauses.grounds_notice {
        "Assess whether the claimant is entitled in principle. State whether the circumstance was notified without undue delay; a late notice forfeits the claim."
    } else {
        "Assess whether the claimant is entitled in principle."
    };
    GuidanceMessage::new(Severity::Action, "Respond to the grounds", body)
        .with_action(SuggestedAction::Respond(TrackKind::Grounds))
}

fn compensation_update(input: &RuleInput<'_>) -> bool {
    respondable_track(input, TrackKind::Compensation)
        && input.facts.updated(TrackKind::Compensation)
}

fn render_compensation_update(input: &RuleInput<'_>) -> GuidanceMessage {
    update_message(
        TrackKind::Compensation,
        input.case.compensation.versions.total_versions,
    )
}

fn compensation_pending_subsidiary(input: &RuleInput<'_>) -> bool {
    respondable_track(input, TrackKind::Compensation) && input.facts.grounds_rejected()
}

fn render_compensation_pending_subsidiary(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        "Evaluate the compensation in the alternative",
        "You rejected the grounds, so the compensation claim is rejected principally. Evaluate the amounts anyway so a subsidiary result is on record if the rejection does not hold.",
    )
    .with_action(SuggestedAction::Respond(TrackKind::Compensation))
}

fn compensation_pending(input: &RuleInput<'_>) -> bool {
    respondable_track(input, TrackKind::Compensation)
}

fn render_compensation_pending(input: &RuleInput<'_>) -> GuidanceMessage {
    let claim = &input.case.compensation;
    let claimed = claim.main.amount
        + claim.site_overhead.as_ref().map_or(0.0, |line| line.amount)
        + claim.productivity_loss.as_ref().map_or(0.0, |line| line.amount);
    GuidanceMessage::new(
        Severity::Action,
        "Respond to the compensation claim",
        format!(
            "The claimant asks for {} in compensation. Assess each claim line and whether it was notified in time.",
            amount(claimed)
        ),
    )
    .with_action(SuggestedAction::Respond(TrackKind::Compensation))
}

fn time_extension_update(input: &RuleInput<'_>) -> bool {
    respondable_track(input, TrackKind::TimeExtension)
        && input.facts.updated(TrackKind::TimeExtension)
}

fn render_time_extension_update(input: &RuleInput<'_>) -> GuidanceMessage {
    update_message(
        TrackKind::TimeExtension,
        input.case.time_extension.versions.total_versions,
    )
}

fn time_extension_pending_subsidiary(input: &RuleInput<'_>) -> bool {
    respondable_track(input, TrackKind::TimeExtension) && input.facts.grounds_rejected()
}

fn render_time_extension_pending_subsidiary(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        "Evaluate the time claim in the alternative",
        "You rejected the grounds, so the time claim is rejected principally. Evaluate the days anyway so a subsidiary result is on record.",
    )
    .with_action(SuggestedAction::Respond(TrackKind::TimeExtension))
}

fn time_extension_pending(input: &RuleInput<'_>) -> bool {
    respondable_track(input, TrackKind::TimeExtension)
}

fn render_time_extension_pending(input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        "Respond to the time claim",
        format!(
            "The claimant asks for {} days of extension. Assess the notices and whether the hindrance delayed the works.",
            input.case.time_extension.claimed_days()
        ),
    )
    .with_action(SuggestedAction::Respond(TrackKind::TimeExtension))
}

fn request_specification(input: &RuleInput<'_>) -> bool {
    let track = &input.case.time_extension;
    track.awaiting_response()
        && track.preliminary_notice.is_some()
        && track.specified_claim.is_none()
        && track.specification_request.is_none()
}

fn render_request_specification(input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        "Request a specified time claim",
        "The claimant has only given a preliminary notice. You may request that the time claim be specified; a late reply forfeits it.",
    )
    .with_action_if(
        input.permissions.time_extension.respond,
        SuggestedAction::RequestSpecification,
    )
}

fn specification_reply_outstanding(input: &RuleInput<'_>) -> bool {
    input.case.time_extension.status.is_sent()
        && input.case.time_extension.specification_reply_outstanding()
}

fn render_specification_reply_outstanding(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Waiting for the specified time claim",
        "You have requested a specified time claim. The claimant has not replied yet.",
    )
}

fn estimate_outstanding(input: &RuleInput<'_>) -> bool {
    input.facts.to_review(TrackKind::Compensation)
        && input
            .facts
            .compensation
            .as_ref()
            .is_some_and(|evaluation| evaluation.principal == ResolutionOutcome::Withheld)
}

fn render_estimate_outstanding(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Waiting for an estimate",
        "Payment is withheld until the claimant provides an estimate of the compensation.",
    )
}

fn issue_final_order(input: &RuleInput<'_>) -> bool {
    let dependents_answered = TrackKind::dependents().into_iter().all(|kind| {
        let track = input.case.track(kind);
        !track.status().is_active() || track.response_received()
    });
    input.permissions.issue_final_order
        && input.case.final_order.is_none()
        && !input.context.final_order_exists
        && input.case.grounds.status.is_resolved()
        && input.facts.awaiting_response.is_empty()
        && dependents_answered
}

fn render_issue_final_order(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        "Issue the final change order",
        "Every claim has been answered. Issue a final change order to settle the case on the basis of your responses.",
    )
    .with_action(SuggestedAction::IssueFinalOrder)
}

fn escalation_open(input: &RuleInput<'_>) -> bool {
    input.context.escalation_case_exists
}

fn render_escalation_open(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Disagreement escalated",
        "The claimant has escalated the disagreement. It is handled in the related escalation case.",
    )
}

fn awaiting_claimant(input: &RuleInput<'_>) -> bool {
    !input.facts.responses_to_review.is_empty()
}

fn render_awaiting_claimant(input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Waiting for the claimant",
        format!(
            "Your response on the {} claim is with the claimant.",
            track_list(&input.facts.responses_to_review)
        ),
    )
}

fn update_message(track: TrackKind, version: u32) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        format!("Updated {track} claim"),
        format!(
            "The claimant has sent version {version} of the {track} claim after your response. Review the changes and respond again."
        ),
    )
    .with_action(SuggestedAction::Respond(track))
}
