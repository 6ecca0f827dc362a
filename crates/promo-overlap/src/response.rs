//! Wire records and the single normalization boundary.
//!
//! The backend wraps most list endpoints in `{code, message, result}` but a
//! few return a bare array, and every field on a record may be missing. All
//! of that is absorbed here; the rest of the crate only sees [`Campaign`],
//! [`ProductRecord`] and [`crate::voucher::Voucher`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RecordError, Result};
use crate::model::{ApplyScope, ApplyTarget, Campaign, ScopeRef};
use crate::range::{parse_date, DateRange};

/// Raw promotion/voucher record as the backend sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignRecord {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub apply_scope: Option<String>,
    pub start_date: Option<String>,
    pub expiry_date: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub category_names: Option<Vec<String>>,
    pub product_ids: Option<Vec<String>>,
    pub product_names: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Raw entry from `GET /products/active`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
}

/// A scope reference that is either a bare id or an object carrying one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Plain(String),
    Object { id: String },
    Other(Value),
}

impl IdRef {
    /// The referenced id. Numbers are stringified; anything else has no id.
    pub fn id(&self) -> Option<String> {
        match self {
            IdRef::Plain(id) | IdRef::Object { id } => Some(id.clone()),
            IdRef::Other(Value::Number(n)) => Some(n.to_string()),
            IdRef::Other(_) => None,
        }
    }
}

/// Raw voucher as returned to the storefront checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoucherRecord {
    pub id: Option<String>,
    pub code: Option<String>,
    pub is_active: Option<bool>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub expiry_date: Option<String>,
    pub usage_limit: Option<u32>,
    pub usage_count: Option<u32>,
    pub min_order_value: Option<f64>,
    pub max_order_value: Option<f64>,
    pub apply_scope: Option<String>,
    pub product_apply: Option<Vec<IdRef>>,
    pub product_ids: Option<Vec<IdRef>>,
    pub category_apply: Option<Vec<IdRef>>,
    pub category_ids: Option<Vec<IdRef>>,
    pub discount_value_type: Option<String>,
    pub discount_value: Option<f64>,
    pub max_discount_value: Option<f64>,
}

/// Extract a list from a response body.
///
/// Accepts `{"result": [...]}` or a bare `[...]`. Any other shape yields an
/// empty list; only invalid JSON or mistyped entries are errors.
pub fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(body)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("result") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };
    Ok(serde_json::from_value(Value::Array(items))?)
}

fn non_blank(id: &str) -> bool {
    !id.trim().is_empty()
}

impl TryFrom<CampaignRecord> for Campaign {
    type Error = RecordError;

    fn try_from(record: CampaignRecord) -> std::result::Result<Self, Self::Error> {
        let start = record
            .start_date
            .as_deref()
            .filter(|s| non_blank(s))
            .ok_or(RecordError::MissingStartDate)
            .and_then(parse_date)?;
        let end = record
            .expiry_date
            .as_deref()
            .filter(|s| non_blank(s))
            .ok_or(RecordError::MissingExpiryDate)
            .and_then(parse_date)?;

        let scope: ApplyScope = record
            .apply_scope
            .as_deref()
            .filter(|s| non_blank(s))
            .ok_or(RecordError::MissingScope)?
            .parse()?;

        let target = match scope {
            ApplyScope::Order => ApplyTarget::Order,
            ApplyScope::Category => {
                let names = record.category_names.unwrap_or_default();
                let id = record
                    .category_ids
                    .unwrap_or_default()
                    .into_iter()
                    .find(|id| non_blank(id))
                    .ok_or(RecordError::MissingTarget(scope))?;
                ApplyTarget::Category(ScopeRef {
                    id,
                    name: names.into_iter().next(),
                })
            }
            ApplyScope::Product => {
                let names = record.product_names.unwrap_or_default();
                let items = record
                    .product_ids
                    .unwrap_or_default()
                    .into_iter()
                    .enumerate()
                    .filter(|(_, id)| non_blank(id))
                    .map(|(i, id)| ScopeRef {
                        id,
                        name: names.get(i).cloned(),
                    });
                ApplyTarget::products(items).ok_or(RecordError::MissingTarget(scope))?
            }
        };

        Ok(Campaign {
            id: record.id.filter(|id| non_blank(id)),
            code: record.code.unwrap_or_default(),
            name: record.name.unwrap_or_default(),
            target,
            period: DateRange::new(start, end),
        })
    }
}
