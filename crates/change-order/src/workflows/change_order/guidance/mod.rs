//! Status guidance: picks the single most relevant message for a user.
//!
//! Each role has an ordered catalogue of `(predicate, renderer)` pairs. The
//! catalogue is scanned front to back and the first matching rule renders the
//! message; later rules are unreachable once an earlier one matches. The order
//! of the catalogues is the priority contract and must not be reshuffled.

mod claimant;
mod context;
mod facts;
mod respondent;

pub use context::{GuidanceContext, Permissions, TrackCapabilities};

use serde::Serialize;
use tracing::debug;

use super::domain::{Case, CaseStatus, Role, TrackKind};
use facts::CaseFacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Action,
    Warning,
    Success,
}

/// What the message suggests the user does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "action", content = "track", rename_all = "snake_case")]
pub enum SuggestedAction {
    Send(TrackKind),
    Respond(TrackKind),
    Update(TrackKind),
    Accept(TrackKind),
    ReplyToSpecificationRequest,
    RequestSpecification,
    IssueFinalOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidanceMessage {
    /// Identifier of the rule that produced the message.
    pub rule: &'static str,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<SuggestedAction>,
}

impl GuidanceMessage {
    /// Message without a rule id; [`select_message`] stamps the id of the rule
    /// that rendered it.
    pub(crate) fn new(
        severity: Severity,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            rule: "",
            severity,
            title: title.into(),
            body: body.into(),
            action: None,
        }
    }

    pub(crate) fn for_rule(mut self, rule: &'static str) -> Self {
        self.rule = rule;
        self
    }

    pub(crate) fn with_action(mut self, action: SuggestedAction) -> Self {
        self.action = Some(action);
        self
    }

    pub(crate) fn with_action_if(self, allowed: bool, action: SuggestedAction) -> Self {
        if allowed {
            self.with_action(action)
        } else {
            self
        }
    }
}

/// Everything a rule may look at.
pub(crate) struct RuleInput<'a> {
    pub(crate) case: &'a Case,
    pub(crate) permissions: &'a Permissions,
    pub(crate) context: &'a GuidanceContext,
    pub(crate) facts: CaseFacts,
}

pub(crate) struct GuidanceRule {
    pub(crate) id: &'static str,
    pub(crate) applies: fn(&RuleInput<'_>) -> bool,
    pub(crate) render: fn(&RuleInput<'_>) -> GuidanceMessage,
}

const AGREED_RULE: &str = "case.agreed";

fn catalogue(role: Role) -> &'static [GuidanceRule] {
    match role {
        Role::Claimant => claimant::RULES,
        Role::Respondent => respondent::RULES,
    }
}

/// Rule identifiers for `role` in evaluation order.
pub fn rule_ids(role: Role) -> Vec<&'static str> {
    catalogue(role).iter().map(|rule| rule.id).collect()
}

/// Select the guidance message for `role`, or `None` when nothing applies.
pub fn select_message(
    case: &Case,
    role: Role,
    permissions: &Permissions,
    context: &GuidanceContext,
) -> Option<GuidanceMessage> {
    let input = RuleInput {
        case,
        permissions,
        context,
        facts: CaseFacts::gather(case),
    };

    match input.facts.status {
        CaseStatus::Closed | CaseStatus::ClosedWithdrawn => return None,
        CaseStatus::Agreed => {
            return Some(
                GuidanceMessage::new(
                    Severity::Success,
                    "Case agreed",
                    "All claims in the case have been agreed between the parties.",
                )
                .for_rule(AGREED_RULE),
            )
        }
        CaseStatus::Draft | CaseStatus::Sent | CaseStatus::Negotiating => {}
    }

    let matched = catalogue(role)
        .iter()
        .find(|rule| (rule.applies)(&input))?;
    debug!(case = %case.id.0, ?role, rule = matched.id, "guidance rule matched");
    Some((matched.render)(&input).for_rule(matched.id))
}

pub(crate) fn track_list(tracks: &[TrackKind]) -> String {
    let labels: Vec<&str> = tracks.iter().map(|kind| kind.label()).collect();
    match labels.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

pub(crate) fn amount(value: f64) -> String {
    format!("{value:.0}")
}
