//! Load existing campaigns and products, then run the overlap pass.
//!
//! Loading happens in three sequential steps (active campaigns, pending
//! campaigns, active products). A failure in any step is handled according
//! to a [`FailurePolicy`].

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::conflict::check_records;
use crate::error::{OverlapError, Result};
use crate::model::{Campaign, CampaignKind};
use crate::report::OverlapReport;
use crate::response::{CampaignRecord, ProductRecord};

/// Where existing campaigns and the product catalog come from.
pub trait CampaignSource {
    type Error: Display;

    fn active_campaigns(&self, kind: CampaignKind) -> std::result::Result<Vec<CampaignRecord>, Self::Error>;

    fn pending_campaigns(&self, kind: CampaignKind) -> std::result::Result<Vec<CampaignRecord>, Self::Error>;

    fn active_products(&self) -> std::result::Result<Vec<ProductRecord>, Self::Error>;
}

/// What to do when existing campaigns cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and report "no overlap"; the backend rejects genuine
    /// conflicts when the campaign is persisted.
    #[default]
    Open,
    /// Return the failure to the caller so submission is blocked.
    Closed,
}

/// Fetch everything the check needs from `source` and evaluate `candidate`.
pub fn check_overlaps<S: CampaignSource>(
    source: &S,
    kind: CampaignKind,
    candidate: &Campaign,
    policy: FailurePolicy,
) -> Result<OverlapReport> {
    match load(source, kind) {
        Ok((records, products)) => {
            debug!(
                records = records.len(),
                products = products.len(),
                "loaded existing {}s",
                kind.noun()
            );
            Ok(check_records(kind, candidate, records, &products))
        }
        Err(reason) => match policy {
            FailurePolicy::Open => {
                warn!(%reason, "overlap check skipped, allowing submission");
                Ok(OverlapReport::unchecked())
            }
            FailurePolicy::Closed => Err(OverlapError::Source(reason)),
        },
    }
}

fn load<S: CampaignSource>(
    source: &S,
    kind: CampaignKind,
) -> std::result::Result<(Vec<CampaignRecord>, Vec<ProductRecord>), String> {
    let mut records = source
        .active_campaigns(kind)
        .map_err(|e| format!("active {}s: {e}", kind.noun()))?;
    let pending = source
        .pending_campaigns(kind)
        .map_err(|e| format!("pending {}s: {e}", kind.noun()))?;
    records.extend(pending);
    let products = source
        .active_products()
        .map_err(|e| format!("active products: {e}"))?;
    Ok((records, products))
}

/// A source backed by records already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub active: Vec<CampaignRecord>,
    pub pending: Vec<CampaignRecord>,
    pub products: Vec<ProductRecord>,
}

impl CampaignSource for StaticSource {
    type Error = std::convert::Infallible;

    fn active_campaigns(&self, _kind: CampaignKind) -> std::result::Result<Vec<CampaignRecord>, Self::Error> {
        Ok(self.active.clone())
    }

    fn pending_campaigns(&self, _kind: CampaignKind) -> std::result::Result<Vec<CampaignRecord>, Self::Error> {
        Ok(self.pending.clone())
    }

    fn active_products(&self) -> std::result::Result<Vec<ProductRecord>, Self::Error> {
        Ok(self.products.clone())
    }
}
