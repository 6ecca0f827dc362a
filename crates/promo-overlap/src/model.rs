//! Normalized campaign model shared by every check.
//!
//! Raw backend records live in [`crate::response`]; everything here has
//! already passed through that boundary, so scope targets and date ranges
//! are guaranteed present.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::range::DateRange;

/// Granularity at which a promotion or voucher discount applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplyScope {
    /// Applies to every order.
    #[default]
    Order,
    /// Applies to products of a single category.
    Category,
    /// Applies to an explicit list of products.
    Product,
}

impl ApplyScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplyScope::Order => "ORDER",
            ApplyScope::Category => "CATEGORY",
            ApplyScope::Product => "PRODUCT",
        }
    }
}

impl fmt::Display for ApplyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplyScope {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ORDER" => Ok(ApplyScope::Order),
            "CATEGORY" => Ok(ApplyScope::Category),
            "PRODUCT" => Ok(ApplyScope::Product),
            _ => Err(RecordError::UnknownScope(s.to_string())),
        }
    }
}

/// Which family of discount a check is running for.
///
/// Promotions and vouchers share the same record shape and overlap rules but
/// live under different REST paths and read differently in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignKind {
    #[default]
    Promotion,
    Voucher,
}

impl CampaignKind {
    /// REST collection segment, e.g. `promotions` in `/promotions/active`.
    pub fn path_segment(self) -> &'static str {
        match self {
            CampaignKind::Promotion => "promotions",
            CampaignKind::Voucher => "vouchers",
        }
    }

    /// Noun used in human-readable conflict lines.
    pub fn noun(self) -> &'static str {
        match self {
            CampaignKind::Promotion => "promotion",
            CampaignKind::Voucher => "voucher",
        }
    }
}

/// A category or product referenced by a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ScopeRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    /// The display name, or the id when no usable name is known.
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.id,
        }
    }
}

/// What a campaign applies to. Exactly one target exists per scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "target", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplyTarget {
    Order,
    Category(ScopeRef),
    /// Non-empty, unique by id, in the order the record listed them.
    Product(Vec<ScopeRef>),
}

impl ApplyTarget {
    pub fn scope(&self) -> ApplyScope {
        match self {
            ApplyTarget::Order => ApplyScope::Order,
            ApplyTarget::Category(_) => ApplyScope::Category,
            ApplyTarget::Product(_) => ApplyScope::Product,
        }
    }

    /// Build a product target, dropping repeated ids.
    ///
    /// Returns `None` when no products remain.
    pub fn products(items: impl IntoIterator<Item = ScopeRef>) -> Option<Self> {
        let mut unique: Vec<ScopeRef> = Vec::new();
        for item in items {
            if !unique.iter().any(|seen| seen.id == item.id) {
                unique.push(item);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(ApplyTarget::Product(unique))
        }
    }
}

/// A promotion or voucher ready for comparison.
///
/// Used both for the candidate being submitted and for the existing
/// active/pending records it is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Absent for a campaign that has not been persisted yet.
    pub id: Option<String>,
    pub code: String,
    pub name: String,
    pub target: ApplyTarget,
    pub period: DateRange,
}

impl Campaign {
    pub fn scope(&self) -> ApplyScope {
        self.target.scope()
    }

    /// True when both campaigns carry the same persisted id.
    pub fn same_record(&self, other: &Campaign) -> bool {
        matches!((&self.id, &other.id), (Some(a), Some(b)) if a == b)
    }
}

/// Identifies the existing campaign a conflict was found against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub code: String,
}

impl From<&Campaign> for CampaignRef {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            code: c.code.clone(),
        }
    }
}
