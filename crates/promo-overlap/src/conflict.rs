//! Detect campaigns that would stack with a candidate.
//!
//! Compares a candidate against every existing campaign. A conflict needs
//! both an intersecting period and an intersecting scope. Every conflict is
//! collected; evaluation never stops at the first hit.

use serde::Serialize;
use tracing::debug;

use crate::catalog::ProductIndex;
use crate::model::{Campaign, CampaignKind, CampaignRef};
use crate::report::OverlapReport;
use crate::response::{CampaignRecord, ProductRecord};
use crate::scope;

/// A detected conflict between the candidate and one existing campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Conflict {
    /// Both apply to every order.
    WholeOrder { existing: CampaignRef },
    /// Both target the same category.
    SameCategory {
        existing: CampaignRef,
        category: String,
    },
    /// Both target some of the same products.
    SharedProducts {
        existing: CampaignRef,
        products: Vec<String>,
    },
    /// The candidate's category holds products the existing campaign targets.
    CategoryViaProducts {
        existing: CampaignRef,
        category: String,
        products: Vec<String>,
    },
    /// The candidate's products sit in the existing campaign's category.
    ProductsInCategory {
        existing: CampaignRef,
        category: String,
        products: Vec<String>,
    },
}

impl Conflict {
    pub fn existing(&self) -> &CampaignRef {
        match self {
            Conflict::WholeOrder { existing }
            | Conflict::SameCategory { existing, .. }
            | Conflict::SharedProducts { existing, .. }
            | Conflict::CategoryViaProducts { existing, .. }
            | Conflict::ProductsInCategory { existing, .. } => existing,
        }
    }

    /// Position of this conflict's rule in report output.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Conflict::WholeOrder { .. } => 0,
            Conflict::SameCategory { .. } => 1,
            Conflict::SharedProducts { .. } => 2,
            Conflict::CategoryViaProducts { .. } => 3,
            Conflict::ProductsInCategory { .. } => 4,
        }
    }

    /// One human-readable line describing the conflict.
    pub fn describe(&self, kind: CampaignKind) -> String {
        let existing = self.existing();
        let by = format!(
            "{} \"{}\" (code: {})",
            kind.noun(),
            existing.name,
            existing.code
        );
        match self {
            Conflict::WholeOrder { .. } => {
                format!("The {by} already applies to the whole order during this period.")
            }
            Conflict::SameCategory { category, .. } => {
                format!("Category \"{category}\" is already covered by the {by} during this period.")
            }
            Conflict::SharedProducts { products, .. } => format!(
                "Products \"{}\" are already covered by the {by} during this period.",
                products.join(", ")
            ),
            Conflict::CategoryViaProducts {
                category, products, ..
            } => format!(
                "Category \"{category}\" is already covered by the {by} through products \"{}\" during this period.",
                products.join(", ")
            ),
            Conflict::ProductsInCategory {
                category, products, ..
            } => format!(
                "Products \"{}\" in category \"{category}\" are already covered by the {by} during this period.",
                products.join(", ")
            ),
        }
    }
}

/// Find every conflict between `candidate` and `existing`.
///
/// An existing campaign with the candidate's own id is ignored, so updating
/// a campaign never conflicts with its stored version.
pub fn find_overlaps(
    candidate: &Campaign,
    existing: &[Campaign],
    index: &ProductIndex,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for other in existing {
        if candidate.same_record(other) {
            continue;
        }
        if !candidate.period.intersects(&other.period) {
            continue;
        }
        if let Some(conflict) = scope::compare(candidate, other, index) {
            conflicts.push(conflict);
        }
    }

    conflicts
}

/// Normalize raw records, then run [`find_overlaps`] and build a report.
///
/// Records that fail normalization (missing dates, unknown scope, no
/// targets) are skipped and counted in [`OverlapReport::skipped`].
pub fn check_records(
    kind: CampaignKind,
    candidate: &Campaign,
    records: Vec<CampaignRecord>,
    products: &[ProductRecord],
) -> OverlapReport {
    let total = records.len();
    let mut existing = Vec::with_capacity(total);

    for record in records {
        let id = record.id.clone();
        match Campaign::try_from(record) {
            Ok(campaign) => existing.push(campaign),
            Err(reason) => debug!(?id, %reason, "skipping existing {}", kind.noun()),
        }
    }

    let skipped = total - existing.len();
    let index = ProductIndex::from_products(products);
    let conflicts = find_overlaps(candidate, &existing, &index);

    debug!(
        compared = existing.len(),
        skipped,
        indexed_products = index.len(),
        conflicts = conflicts.len(),
        "overlap pass finished"
    );

    OverlapReport::from_conflicts(kind, conflicts, skipped)
}
