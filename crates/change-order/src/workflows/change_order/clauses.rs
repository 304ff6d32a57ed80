//! Category → clause dispatch.
//!
//! Every category-dependent rule in the evaluation core reads from [`ClauseSet`];
//! no other module matches on [`Category`] to decide which clause applies.

use serde::Serialize;

use super::domain::{Category, GroundsVerdict};

const GRADED_VERDICTS: &[GroundsVerdict] = &[
    GroundsVerdict::Approved,
    GroundsVerdict::PartiallyApproved,
    GroundsVerdict::Rejected,
];

const BINARY_VERDICTS: &[GroundsVerdict] = &[GroundsVerdict::Approved, GroundsVerdict::Rejected];

/// Clauses and verdict options that apply to a case of a given category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClauseSet {
    /// General notice clause: late notice of the circumstance precludes the grounds.
    pub grounds_notice: bool,
    /// Separate notice clause for the compensation main line.
    pub compensation_notice: bool,
    /// Special lines (site overhead, productivity loss) carry their own notice clause.
    pub special_line_notice: bool,
    /// Compensation inherits a grounds preclusion through subsidiary propagation.
    pub inherits_grounds_preclusion: bool,
    /// Whether the category entitles the claimant to compensation at all.
    pub compensation_available: bool,
    pub grounds_verdicts: &'static [GroundsVerdict],
}

impl ClauseSet {
    pub const fn for_category(category: Category) -> Self {
        match category {
            Category::Variation => Self {
                grounds_notice: true,
                compensation_notice: false,
                special_line_notice: true,
                inherits_grounds_preclusion: true,
                compensation_available: true,
                grounds_verdicts: GRADED_VERDICTS,
            },
            Category::VariationByChangeOrder => Self {
                grounds_notice: false,
                compensation_notice: false,
                special_line_notice: true,
                inherits_grounds_preclusion: true,
                compensation_available: true,
                grounds_verdicts: GRADED_VERDICTS,
            },
            Category::DefectOrOther => Self {
                grounds_notice: false,
                compensation_notice: true,
                special_line_notice: true,
                inherits_grounds_preclusion: false,
                compensation_available: true,
                grounds_verdicts: GRADED_VERDICTS,
            },
            Category::ForceMajeure => Self {
                grounds_notice: false,
                compensation_notice: false,
                special_line_notice: true,
                inherits_grounds_preclusion: false,
                compensation_available: false,
                grounds_verdicts: BINARY_VERDICTS,
            },
            Category::MandatoryInstruction => Self {
                grounds_notice: false,
                compensation_notice: false,
                special_line_notice: true,
                inherits_grounds_preclusion: false,
                compensation_available: true,
                grounds_verdicts: GRADED_VERDICTS,
            },
        }
    }

    /// Clause set for a case whose category has not been chosen yet: no
    /// category-specific notice clause applies.
    pub const fn uncategorised() -> Self {
        Self {
            grounds_notice: false,
            compensation_notice: false,
            special_line_notice: true,
            inherits_grounds_preclusion: false,
            compensation_available: true,
            grounds_verdicts: GRADED_VERDICTS,
        }
    }

    pub fn resolve(category: Option<Category>) -> Self {
        category
            .map(Self::for_category)
            .unwrap_or_else(Self::uncategorised)
    }

    pub fn allows_verdict(&self, verdict: GroundsVerdict) -> bool {
        self.grounds_verdicts.contains(&verdict)
    }

    /// Verdicts outside the category's options fall through to `Rejected`.
    pub fn normalize_verdict(&self, verdict: GroundsVerdict) -> GroundsVerdict {
        if self.allows_verdict(verdict) {
            verdict
        } else {
            GroundsVerdict::Rejected
        }
    }
}
