use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{Case, Role, TrackKind, TrackStatus};

/// Capabilities a user holds on one track. Computed outside the core and
/// consumed as opaque booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackCapabilities {
    #[serde(default)]
    pub send: bool,
    #[serde(default)]
    pub respond: bool,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub withdraw: bool,
    #[serde(default)]
    pub accept: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub grounds: TrackCapabilities,
    #[serde(default)]
    pub compensation: TrackCapabilities,
    #[serde(default)]
    pub time_extension: TrackCapabilities,
    #[serde(default)]
    pub issue_final_order: bool,
}

impl Permissions {
    pub fn track(&self, kind: TrackKind) -> &TrackCapabilities {
        match kind {
            TrackKind::Grounds => &self.grounds,
            TrackKind::Compensation => &self.compensation,
            TrackKind::TimeExtension => &self.time_extension,
        }
    }

    /// Default capability set for `role`, derived from the snapshot alone. Callers
    /// with their own access model pass their own [`Permissions`] instead.
    pub fn derive(case: &Case, role: Role) -> Self {
        let capabilities = |kind: TrackKind| {
            let track = case.track(kind);
            let status = track.status();
            match role {
                Role::Claimant => TrackCapabilities {
                    send: status == TrackStatus::Draft
                        && (kind == TrackKind::Grounds || case.grounds.status.is_sent()),
                    respond: false,
                    update: status.is_sent(),
                    withdraw: status.is_sent(),
                    accept: track.response_received() && !track.is_settled(),
                },
                Role::Respondent => TrackCapabilities {
                    respond: track.awaiting_response(),
                    ..TrackCapabilities::default()
                },
            }
        };

        Self {
            grounds: capabilities(TrackKind::Grounds),
            compensation: capabilities(TrackKind::Compensation),
            time_extension: capabilities(TrackKind::TimeExtension),
            issue_final_order: role == Role::Respondent,
        }
    }
}

/// Facts that cannot be derived from the case snapshot itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceContext {
    /// A related escalation (dispute) case has been opened.
    #[serde(default)]
    pub escalation_case_exists: bool,
    /// The case is already covered by a final change order in preparation.
    #[serde(default)]
    pub final_order_exists: bool,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}
