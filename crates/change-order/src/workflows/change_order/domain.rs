use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::clauses::ClauseSet;

/// Identifier wrapper for change-order cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// The three parallel claim tracks carried by every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Grounds,
    Compensation,
    TimeExtension,
}

impl TrackKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Grounds, Self::Compensation, Self::TimeExtension]
    }

    pub const fn dependents() -> [Self; 2] {
        [Self::Compensation, Self::TimeExtension]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Grounds => "grounds",
            Self::Compensation => "compensation",
            Self::TimeExtension => "time extension",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Party the caller acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Claimant,
    Respondent,
}

/// Classification of the grounds track; selects the applicable clause set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Irregular variation instructed outside a formal change order.
    Variation,
    /// Variation issued through a formal change order; exempt from grounds notice.
    VariationByChangeOrder,
    DefectOrOther,
    ForceMajeure,
    /// Change mandated by public authority or legislation.
    MandatoryInstruction,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Variation => "variation",
            Self::VariationByChangeOrder => "variation by change order",
            Self::DefectOrOther => "defect or other circumstance",
            Self::ForceMajeure => "force majeure",
            Self::MandatoryInstruction => "mandatory instruction",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeMethod {
    Email,
    Letter,
    SiteMeetingMinutes,
    ProjectPortal,
    Other,
}

/// A notice given by one party. Absence of the record means "not yet sent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeRecord {
    pub date_sent: NaiveDate,
    #[serde(default)]
    pub methods: Vec<NoticeMethod>,
}

impl NoticeRecord {
    pub fn new(date_sent: NaiveDate, methods: Vec<NoticeMethod>) -> Self {
        Self { date_sent, methods }
    }

    /// Whole days between `reference` and the date the notice was sent.
    pub fn days_after(&self, reference: NaiveDate) -> i64 {
        (self.date_sent - reference).num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    #[default]
    Draft,
    Sent,
    UnderReview,
    Approved,
    PartiallyApproved,
    Rejected,
    Withdrawn,
    NotApplicable,
}

impl TrackStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::PartiallyApproved => "partially_approved",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
            Self::NotApplicable => "not_applicable",
        }
    }

    pub const fn is_resolved(self) -> bool {
        matches!(
            self,
            Self::Approved | Self::PartiallyApproved | Self::Rejected
        )
    }

    /// Withdrawn and not-applicable tracks take no further part in the case.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Withdrawn | Self::NotApplicable)
    }

    pub const fn is_sent(self) -> bool {
        !matches!(self, Self::Draft) && self.is_active()
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Claim version counters. An update after a response bumps `total_versions`
/// while `responded_version` keeps pointing at the version that was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Versioning {
    pub total_versions: u32,
    #[serde(default)]
    pub responded_version: Option<u32>,
}

impl Versioning {
    pub fn has_unanswered_update(&self) -> bool {
        matches!(self.responded_version, Some(version) if version < self.total_versions)
    }
}

/// Overall case status. Always derived from the tracks, see [`Case::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Draft,
    Sent,
    Negotiating,
    Agreed,
    Closed,
    ClosedWithdrawn,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Negotiating => "negotiating",
            Self::Agreed => "agreed",
            Self::Closed => "closed",
            Self::ClosedWithdrawn => "closed_withdrawn",
        }
    }
}

/// Resolution of a track, principal or subsidiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Approved,
    PartiallyApproved,
    Rejected,
    /// Payment withheld until the claimant provides an estimate.
    Withheld,
}

impl ResolutionOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::PartiallyApproved => "partially approved",
            Self::Rejected => "rejected",
            Self::Withheld => "withheld pending estimate",
        }
    }

    /// Ordering used for monotonicity checks; withheld sits outside the ranking.
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Rejected => Some(0),
            Self::PartiallyApproved => Some(1),
            Self::Approved => Some(2),
            Self::Withheld => None,
        }
    }

    /// Track status after a response with this outcome. A withheld payment keeps
    /// the track under review until the estimate arrives.
    pub const fn track_status(self) -> TrackStatus {
        match self {
            Self::Approved => TrackStatus::Approved,
            Self::PartiallyApproved => TrackStatus::PartiallyApproved,
            Self::Rejected => TrackStatus::Rejected,
            Self::Withheld => TrackStatus::UnderReview,
        }
    }
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Respondent's judgment on a single claim line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineVerdict {
    Approved,
    Partial,
    Rejected,
}

impl LineVerdict {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Partial => "partial",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundsVerdict {
    Approved,
    PartiallyApproved,
    Rejected,
}

impl GroundsVerdict {
    pub const fn outcome(self) -> ResolutionOutcome {
        match self {
            Self::Approved => ResolutionOutcome::Approved,
            Self::PartiallyApproved => ResolutionOutcome::PartiallyApproved,
            Self::Rejected => ResolutionOutcome::Rejected,
        }
    }
}

/// Respondent's response to the grounds claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundsAssessment {
    #[serde(default)]
    pub verdict: Option<GroundsVerdict>,
    /// Whether the claimant notified the circumstance in time. `None` means not assessed.
    #[serde(default)]
    pub notified_in_time: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundsTrack {
    #[serde(default)]
    pub status: TrackStatus,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub discovered_on: Option<NaiveDate>,
    #[serde(default)]
    pub notice: Option<NoticeRecord>,
    #[serde(default)]
    pub response: Option<GroundsAssessment>,
    #[serde(default)]
    pub versions: Versioning,
    #[serde(default)]
    pub accepted_by_claimant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationMethod {
    UnitRates,
    AdjustedUnitRates,
    CostReimbursable,
    LumpSum,
}

impl CompensationMethod {
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnitRates => "unit_rates",
            Self::AdjustedUnitRates => "adjusted_unit_rates",
            Self::CostReimbursable => "cost_reimbursable",
            Self::LumpSum => "lump_sum",
        }
    }
}

/// Claimed amount for one compensation line together with its own notice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimLine {
    pub amount: f64,
    #[serde(default)]
    pub notice: Option<NoticeRecord>,
}

impl ClaimLine {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            notice: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineAssessment {
    #[serde(default)]
    pub verdict: Option<LineVerdict>,
    /// Value entered for a partial verdict.
    #[serde(default)]
    pub approved_amount: Option<f64>,
    #[serde(default)]
    pub notified_in_time: Option<bool>,
}

/// Respondent's compensation response. Also used as the in-progress form state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompensationAssessment {
    #[serde(default)]
    pub main: LineAssessment,
    #[serde(default)]
    pub site_overhead: LineAssessment,
    #[serde(default)]
    pub productivity_loss: LineAssessment,
    #[serde(default)]
    pub proposed_method: Option<CompensationMethod>,
    #[serde(default)]
    pub withhold_payment: bool,
    #[serde(default)]
    pub rate_adjustment_reply_in_time: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompensationTrack {
    #[serde(default)]
    pub status: TrackStatus,
    #[serde(default)]
    pub method: Option<CompensationMethod>,
    #[serde(default)]
    pub main: ClaimLine,
    #[serde(default)]
    pub site_overhead: Option<ClaimLine>,
    #[serde(default)]
    pub productivity_loss: Option<ClaimLine>,
    /// Claimant's reply demanding adjusted unit rates.
    #[serde(default)]
    pub rate_adjustment: Option<NoticeRecord>,
    #[serde(default)]
    pub response: Option<CompensationAssessment>,
    #[serde(default)]
    pub versions: Versioning,
    #[serde(default)]
    pub accepted_by_claimant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecifiedClaim {
    pub days: u32,
    pub notice: NoticeRecord,
}

/// Respondent's request that the claimant specify the time claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationRequest {
    pub sent: NoticeRecord,
    #[serde(default)]
    pub reply: Option<NoticeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeExtensionAssessment {
    #[serde(default)]
    pub preliminary_notice_in_time: Option<bool>,
    #[serde(default)]
    pub specified_claim_in_time: Option<bool>,
    #[serde(default)]
    pub request_reply_in_time: Option<bool>,
    /// `Some(false)` when the respondent denies that the hindrance delayed the works.
    #[serde(default)]
    pub hindrance_caused_delay: Option<bool>,
    #[serde(default)]
    pub verdict: Option<LineVerdict>,
    #[serde(default)]
    pub approved_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeExtensionTrack {
    #[serde(default)]
    pub status: TrackStatus,
    #[serde(default)]
    pub preliminary_notice: Option<NoticeRecord>,
    #[serde(default)]
    pub specified_claim: Option<SpecifiedClaim>,
    #[serde(default)]
    pub specification_request: Option<SpecificationRequest>,
    #[serde(default)]
    pub response: Option<TimeExtensionAssessment>,
    #[serde(default)]
    pub versions: Versioning,
    #[serde(default)]
    pub accepted_by_claimant: bool,
}

impl TimeExtensionTrack {
    pub fn claimed_days(&self) -> u32 {
        self.specified_claim
            .as_ref()
            .map(|claim| claim.days)
            .unwrap_or(0)
    }

    pub fn specification_reply_outstanding(&self) -> bool {
        self.specification_request
            .as_ref()
            .is_some_and(|request| request.reply.is_none())
    }
}

/// Record of a final change order closing the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalOrderRecord {
    pub reference: String,
    pub issued_on: NaiveDate,
}

/// Shared view over the three tracks so status derivation and guidance can
/// treat them uniformly.
pub trait ClaimTrack {
    fn kind(&self) -> TrackKind;
    fn status(&self) -> TrackStatus;
    fn versions(&self) -> &Versioning;
    fn has_response(&self) -> bool;
    fn accepted_by_claimant(&self) -> bool;

    /// Sent and active, with no response to the latest version.
    fn awaiting_response(&self) -> bool {
        if !self.status().is_sent() {
            return false;
        }
        match self.versions().responded_version {
            Some(version) => version < self.versions().total_versions,
            None => true,
        }
    }

    /// Responded on the latest version, so the next move is the claimant's.
    fn response_received(&self) -> bool {
        self.status().is_sent() && self.has_response() && !self.awaiting_response()
    }

    /// Fully approved, or a response the claimant has accepted.
    fn is_settled(&self) -> bool {
        self.response_received()
            && (self.status() == TrackStatus::Approved || self.accepted_by_claimant())
    }
}

macro_rules! claim_track {
    ($ty:ty, $kind:expr) => {
        impl ClaimTrack for $ty {
            fn kind(&self) -> TrackKind {
                $kind
            }

            fn status(&self) -> TrackStatus {
                self.status
            }

            fn versions(&self) -> &Versioning {
                &self.versions
            }

            fn has_response(&self) -> bool {
                self.response.is_some()
            }

            fn accepted_by_claimant(&self) -> bool {
                self.accepted_by_claimant
            }
        }
    };
}

claim_track!(GroundsTrack, TrackKind::Grounds);
claim_track!(CompensationTrack, TrackKind::Compensation);
claim_track!(TimeExtensionTrack, TrackKind::TimeExtension);

/// Read-only snapshot of a change-order case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub title: String,
    #[serde(default)]
    pub grounds: GroundsTrack,
    #[serde(default)]
    pub compensation: CompensationTrack,
    #[serde(default)]
    pub time_extension: TimeExtensionTrack,
    #[serde(default)]
    pub final_order: Option<FinalOrderRecord>,
}

impl Case {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: CaseId(id.into()),
            title: title.into(),
            grounds: GroundsTrack::default(),
            compensation: CompensationTrack::default(),
            time_extension: TimeExtensionTrack::default(),
            final_order: None,
        }
    }

    pub fn track(&self, kind: TrackKind) -> &dyn ClaimTrack {
        match kind {
            TrackKind::Grounds => &self.grounds,
            TrackKind::Compensation => &self.compensation,
            TrackKind::TimeExtension => &self.time_extension,
        }
    }

    pub fn tracks(&self) -> impl Iterator<Item = &dyn ClaimTrack> + '_ {
        TrackKind::ordered()
            .into_iter()
            .map(move |kind| self.track(kind))
    }

    pub fn clauses(&self) -> ClauseSet {
        ClauseSet::resolve(self.grounds.category)
    }

    /// Tracks sent to the respondent and still waiting for an answer.
    pub fn awaiting_response(&self) -> Vec<TrackKind> {
        self.tracks()
            .filter(|track| track.awaiting_response())
            .map(|track| track.kind())
            .collect()
    }

    pub fn status(&self) -> CaseStatus {
        let dependents_closed = TrackKind::dependents()
            .into_iter()
            .all(|kind| !self.track(kind).status().is_active());
        if self.grounds.status == TrackStatus::Withdrawn && dependents_closed {
            return CaseStatus::ClosedWithdrawn;
        }

        if self.final_order.is_some() {
            return CaseStatus::Closed;
        }

        if self.grounds.status == TrackStatus::Draft {
            return CaseStatus::Draft;
        }

        let active: Vec<&dyn ClaimTrack> = self
            .tracks()
            .filter(|track| track.status().is_active())
            .collect();

        if active.is_empty() {
            return CaseStatus::ClosedWithdrawn;
        }

        if active.iter().all(|track| track.is_settled()) {
            return CaseStatus::Agreed;
        }

        if active.iter().any(|track| track.has_response()) {
            CaseStatus::Negotiating
        } else {
            CaseStatus::Sent
        }
    }
}
