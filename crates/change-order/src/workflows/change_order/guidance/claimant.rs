use super::super::domain::{ResolutionOutcome, TrackKind, TrackStatus};
use super::{amount, track_list, GuidanceMessage, GuidanceRule, RuleInput, Severity, SuggestedAction};

pub(super) static RULES: &[GuidanceRule] = &[
    GuidanceRule {
        id: "claimant.grounds_not_sent",
        applies: grounds_not_sent,
        render: render_grounds_not_sent,
    },
    GuidanceRule {
        id: "claimant.final_order_pending",
        applies: final_order_pending,
        render: render_final_order_pending,
    },
    GuidanceRule {
        id: "claimant.multiple_responses",
        applies: multiple_responses,
        render: render_multiple_responses,
    },
    GuidanceRule {
        id: "claimant.grounds_rejected_escalated",
        applies: grounds_rejected_escalated,
        render: render_grounds_rejected_escalated,
    },
    GuidanceRule {
        id: "claimant.grounds_rejected_with_subsidiary",
        applies: grounds_rejected_with_subsidiary,
        render: render_grounds_rejected_with_subsidiary,
    },
    GuidanceRule {
        id: "claimant.grounds_precluded",
        applies: grounds_precluded,
        render: render_grounds_precluded,
    },
    GuidanceRule {
        id: "claimant.grounds_rejected",
        applies: grounds_rejected,
        render: render_grounds_rejected,
    },
    GuidanceRule {
        id: "claimant.specification_requested",
        applies: specification_requested,
        render: render_specification_requested,
    },
    GuidanceRule {
        id: "claimant.payment_withheld",
        applies: payment_withheld,
        render: render_payment_withheld,
    },
    GuidanceRule {
        id: "claimant.compensation_subsidiary_only",
        applies: compensation_subsidiary_only,
        render: render_compensation_subsidiary_only,
    },
    GuidanceRule {
        id: "claimant.compensation_response",
        applies: compensation_response,
        render: render_compensation_response,
    },
    GuidanceRule {
        id: "claimant.time_extension_response",
        applies: time_extension_response,
        render: render_time_extension_response,
    },
    GuidanceRule {
        id: "claimant.grounds_partially_approved",
        applies: grounds_partially_approved,
        render: render_grounds_partially_approved,
    },
    GuidanceRule {
        id: "claimant.compensation_not_sent",
        applies: compensation_not_sent,
        render: render_compensation_not_sent,
    },
    GuidanceRule {
        id: "claimant.time_extension_not_sent",
        applies: time_extension_not_sent,
        render: render_time_extension_not_sent,
    },
    GuidanceRule {
        id: "claimant.specify_time_claim",
        applies: specify_time_claim,
        render: render_specify_time_claim,
    },
    GuidanceRule {
        id: "claimant.awaiting_response",
        applies: awaiting_response,
        render: render_awaiting_response,
    },
];

fn grounds_not_sent(input: &RuleInput<'_>) -> bool {
    input.case.grounds.status == TrackStatus::Draft && input.permissions.grounds.send
}

fn render_grounds_not_sent(input: &RuleInput<'_>) -> GuidanceMessage {
    if !input.facts.clauses.grounds_notice {
        return GuidanceMessage::new(
            Severity::Action,
            "Send the grounds notice",
            "Send the grounds notice to open the case with the respondent.",
        )
        .with_action(SuggestedAction::Send(TrackKind::Grounds));
    }

    let mut body = String::from(
        "Notify the respondent without undue delay. A late notice of a variation forfeits the claim.",
    );
    let known_for = input
        .case
        .grounds
        .discovered_on
        .zip(input.context.today)
        .map(|(discovered, today)| (today - discovered).num_days())
        .filter(|elapsed| *elapsed >= 0);
    if let Some(elapsed) = known_for {
        body.push_str(&format!(
            " The circumstance has been known for {}.",
            day_count(elapsed)
        ));
    }
    GuidanceMessage::new(Severity::Action, "Send the grounds notice", body)
        .with_action(SuggestedAction::Send(TrackKind::Grounds))
}

fn final_order_pending(input: &RuleInput<'_>) -> bool {
    input.context.final_order_exists && input.case.final_order.is_none()
}

fn render_final_order_pending(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Final change order in preparation",
        "The respondent is preparing a final change order covering this case. No action is needed until it is issued.",
    )
}

fn multiple_responses(input: &RuleInput<'_>) -> bool {
    input.facts.responses_to_review.len() >= 2
}

fn render_multiple_responses(input: &RuleInput<'_>) -> GuidanceMessage {
    let tracks = &input.facts.responses_to_review;
    GuidanceMessage::new(
        Severity::Action,
        format!("Responses received on {} claims", tracks.len()),
        format!(
            "The respondent has answered the {} claims. Review each response and accept it or send an update.",
            track_list(tracks)
        ),
    )
}

fn grounds_rejected_escalated(input: &RuleInput<'_>) -> bool {
    input.facts.grounds_dispute_open() && input.context.escalation_case_exists
}

fn render_grounds_rejected_escalated(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Disagreement escalated",
        "The rejected grounds are being handled in the related escalation case.",
    )
}

fn grounds_rejected_with_subsidiary(input: &RuleInput<'_>) -> bool {
    input.facts.grounds_dispute_open() && !input.facts.subsidiary_tracks().is_empty()
}

fn render_grounds_rejected_with_subsidiary(input: &RuleInput<'_>) -> GuidanceMessage {
    let tracks = input.facts.subsidiary_tracks();
    GuidanceMessage::new(
        Severity::Warning,
        "Grounds rejected, subsidiary evaluation given",
        format!(
            "The respondent rejects the grounds but has evaluated the {} claim in the alternative. Review the subsidiary result before deciding whether to update or escalate.",
            track_list(&tracks)
        ),
    )
    .with_action_if(
        input.permissions.grounds.update,
        SuggestedAction::Update(TrackKind::Grounds),
    )
}

fn grounds_precluded(input: &RuleInput<'_>) -> bool {
    input.facts.grounds_dispute_open() && input.facts.grounds_precluded
}

fn render_grounds_precluded(input: &RuleInput<'_>) -> GuidanceMessage {
    let grounds = &input.case.grounds;
    let delay = match (&grounds.notice, grounds.discovered_on) {
        (Some(notice), Some(discovered)) => format!(
            " The notice went out {} after the circumstance became known.",
            day_count(notice.days_after(discovered))
        ),
        _ => String::new(),
    };
    GuidanceMessage::new(
        Severity::Warning,
        "Grounds notice considered late",
        format!(
            "The respondent considers the grounds notice late, which forfeits the claim.{delay} Document when the circumstance became known if you disagree."
        ),
    )
    .with_action_if(
        input.permissions.grounds.update,
        SuggestedAction::Update(TrackKind::Grounds),
    )
}

fn grounds_rejected(input: &RuleInput<'_>) -> bool {
    input.facts.grounds_dispute_open()
}

fn render_grounds_rejected(input: &RuleInput<'_>) -> GuidanceMessage {
    let message = GuidanceMessage::new(
        Severity::Action,
        "Grounds rejected",
        "The respondent rejects the grounds. Update the claim with further documentation or accept the rejection.",
    );
    if input.permissions.grounds.update {
        message.with_action(SuggestedAction::Update(TrackKind::Grounds))
    } else {
        message.with_action_if(
            input.permissions.grounds.accept,
            SuggestedAction::Accept(TrackKind::Grounds),
        )
    }
}

fn specification_requested(input: &RuleInput<'_>) -> bool {
    let track = &input.case.time_extension;
    track.status.is_sent() && track.specification_reply_outstanding()
}

fn render_specification_requested(input: &RuleInput<'_>) -> GuidanceMessage {
    let sent = input
        .case
        .time_extension
        .specification_request
        .as_ref()
        .map(|request| format!(" on {}", request.sent.date_sent))
        .unwrap_or_default();
    GuidanceMessage::new(
        Severity::Warning,
        "Specify the time claim",
        format!(
            "The respondent requested a specified time claim{sent}. Reply without undue delay; a late reply forfeits the claim."
        ),
    )
    .with_action_if(
        input.permissions.time_extension.update,
        SuggestedAction::ReplyToSpecificationRequest,
    )
}

fn payment_withheld(input: &RuleInput<'_>) -> bool {
    input.facts.to_review(TrackKind::Compensation)
        && input
            .facts
            .compensation
            .as_ref()
            .is_some_and(|evaluation| evaluation.principal == ResolutionOutcome::Withheld)
}

fn render_payment_withheld(input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        "Payment withheld pending estimate",
        "The respondent withholds payment until an estimate of the compensation is provided. Update the compensation claim with an estimate.",
    )
    .with_action_if(
        input.permissions.compensation.update,
        SuggestedAction::Update(TrackKind::Compensation),
    )
}

fn compensation_subsidiary_only(input: &RuleInput<'_>) -> bool {
    input.facts.to_review(TrackKind::Compensation)
        && input.facts.compensation.as_ref().is_some_and(|evaluation| {
            evaluation.principal == ResolutionOutcome::Rejected && evaluation.shows_subsidiary()
        })
}

fn render_compensation_subsidiary_only(input: &RuleInput<'_>) -> GuidanceMessage {
    let (subsidiary, reasons, approved) = input
        .facts
        .compensation
        .as_ref()
        .map(|evaluation| {
            let reasons: Vec<&str> = evaluation
                .triggers
                .iter()
                .map(|trigger| trigger.label())
                .collect();
            (
                evaluation
                    .subsidiary
                    .map(|outcome| outcome.label())
                    .unwrap_or("not given"),
                reasons.join("; "),
                amount(evaluation.totals.total_approved_incl_precluded),
            )
        })
        .unwrap_or(("not given", String::new(), amount(0.0)));
    GuidanceMessage::new(
        Severity::Info,
        "Compensation rejected, subsidiary evaluation given",
        format!(
            "Compensation is rejected principally ({reasons}). In the alternative the respondent finds it {subsidiary} at {approved}."
        ),
    )
}

fn compensation_response(input: &RuleInput<'_>) -> bool {
    input.facts.to_review(TrackKind::Compensation)
}

fn render_compensation_response(input: &RuleInput<'_>) -> GuidanceMessage {
    let summary = input
        .facts
        .compensation
        .as_ref()
        .map(|evaluation| {
            format!(
                "The respondent finds the compensation claim {}: {} of {} approved.",
                evaluation.principal.label(),
                amount(evaluation.totals.total_approved),
                amount(evaluation.totals.total_requested_incl_precluded)
            )
        })
        .unwrap_or_else(|| "The respondent has answered the compensation claim.".to_string());
    review_message(
        input,
        TrackKind::Compensation,
        "Review the compensation response",
        summary,
    )
}

fn time_extension_response(input: &RuleInput<'_>) -> bool {
    input.facts.to_review(TrackKind::TimeExtension)
}

fn render_time_extension_response(input: &RuleInput<'_>) -> GuidanceMessage {
    let summary = input
        .facts
        .time_extension
        .as_ref()
        .map(|evaluation| {
            format!(
                "The respondent finds the time claim {}: {} of {} days approved.",
                evaluation.principal.label(),
                amount(evaluation.totals.total_approved),
                amount(evaluation.totals.total_requested_incl_precluded)
            )
        })
        .unwrap_or_else(|| "The respondent has answered the time claim.".to_string());
    review_message(
        input,
        TrackKind::TimeExtension,
        "Review the time extension response",
        summary,
    )
}

fn grounds_partially_approved(input: &RuleInput<'_>) -> bool {
    input.facts.to_review(TrackKind::Grounds)
        && input.facts.grounds_outcome() == Some(ResolutionOutcome::PartiallyApproved)
}

fn render_grounds_partially_approved(input: &RuleInput<'_>) -> GuidanceMessage {
    review_message(
        input,
        TrackKind::Grounds,
        "Grounds partially approved",
        "The respondent accepts the grounds only in part.".to_string(),
    )
}

fn review_message(
    input: &RuleInput<'_>,
    track: TrackKind,
    title: &str,
    summary: String,
) -> GuidanceMessage {
    let capabilities = input.permissions.track(track);
    let message = GuidanceMessage::new(
        Severity::Action,
        title,
        format!("{summary} Accept the response or send an update."),
    );
    if capabilities.accept {
        message.with_action(SuggestedAction::Accept(track))
    } else {
        message.with_action_if(capabilities.update, SuggestedAction::Update(track))
    }
}

fn compensation_not_sent(input: &RuleInput<'_>) -> bool {
    input.case.grounds.status.is_sent()
        && input.case.compensation.status == TrackStatus::Draft
        && input.permissions.compensation.send
}

fn render_compensation_not_sent(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        "Send the compensation claim",
        "The grounds have been notified. Quantify the cost impact and send the compensation claim; site overhead and productivity loss must be notified separately.",
    )
    .with_action(SuggestedAction::Send(TrackKind::Compensation))
}

fn time_extension_not_sent(input: &RuleInput<'_>) -> bool {
    input.case.grounds.status.is_sent()
        && input.case.time_extension.status == TrackStatus::Draft
        && input.permissions.time_extension.send
}

fn render_time_extension_not_sent(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Action,
        "Notify the time claim",
        "Send a preliminary notice of the time claim without undue delay, or a specified claim if the delay is already known.",
    )
    .with_action(SuggestedAction::Send(TrackKind::TimeExtension))
}

fn specify_time_claim(input: &RuleInput<'_>) -> bool {
    let track = &input.case.time_extension;
    track.status.is_sent()
        && track.preliminary_notice.is_some()
        && track.specified_claim.is_none()
        && track.specification_request.is_none()
        && input.permissions.time_extension.update
}

fn render_specify_time_claim(_input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Specify the time claim",
        "Only a preliminary notice has been given. Specify the number of days once there is a basis to calculate the delay.",
    )
    .with_action(SuggestedAction::Update(TrackKind::TimeExtension))
}

fn awaiting_response(input: &RuleInput<'_>) -> bool {
    !input.facts.awaiting_response.is_empty()
}

fn render_awaiting_response(input: &RuleInput<'_>) -> GuidanceMessage {
    GuidanceMessage::new(
        Severity::Info,
        "Awaiting the respondent",
        format!(
            "The {} claim is with the respondent for a response.",
            track_list(&input.facts.awaiting_response)
        ),
    )
}

fn day_count(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}
