//! Change-order cases: a grounds track plus dependent compensation and
//! time-extension tracks, each with its own notice, response, and resolution.
//!
//! Everything in this module is synchronous and free of I/O. Inputs are
//! borrowed snapshots and every calculator returns a fresh value.

pub mod clauses;
pub mod domain;
pub mod evaluation;
pub mod guidance;
pub mod lifecycle;
pub mod payload;

#[cfg(test)]
mod tests;

pub use clauses::ClauseSet;
pub use domain::{
    Case, CaseId, CaseStatus, Category, ClaimLine, ClaimTrack, CompensationAssessment,
    CompensationMethod, CompensationTrack, FinalOrderRecord, GroundsAssessment, GroundsTrack,
    GroundsVerdict, LineAssessment, LineVerdict, NoticeMethod, NoticeRecord, ResolutionOutcome,
    Role, SpecificationRequest, SpecifiedClaim, TimeExtensionAssessment, TimeExtensionTrack,
    TrackKind, TrackStatus, Versioning,
};
pub use evaluation::{
    EvaluationEngine, GroundsResolution, NoticeRuling, SubsidiaryTrigger, Totals, TrackEvaluation,
    APPROVAL_THRESHOLD,
};
pub use guidance::{
    rule_ids, select_message, GuidanceContext, GuidanceMessage, Permissions, Severity,
    SuggestedAction, TrackCapabilities,
};
pub use lifecycle::{apply, TrackEvent, TransitionError};
pub use payload::{
    compensation_response_payload, grounds_response_payload, time_extension_response_payload,
    EventPayload, EventType, Justification,
};
