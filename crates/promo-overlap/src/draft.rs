//! Field validation for a campaign form before it is checked for overlaps.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{ApplyScope, ApplyTarget, Campaign, ScopeRef};
use crate::range::{parse_date, DateRange};

/// Raw form input for a new or edited campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignDraft {
    pub id: Option<String>,
    pub name: String,
    pub code: String,
    /// Free text or a number, e.g. `"15%"` or `50000`.
    pub discount_value: Option<Value>,
    pub apply_scope: ApplyScope,
    pub category_ids: Vec<String>,
    pub category_names: Vec<String>,
    pub product_ids: Vec<String>,
    pub product_names: Vec<String>,
    pub start_date: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Name,
    Code,
    DiscountValue,
    StartDate,
    ExpiryDate,
    CategoryIds,
    ProductIds,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DraftField::Name => "name",
            DraftField::Code => "code",
            DraftField::DiscountValue => "discountValue",
            DraftField::StartDate => "startDate",
            DraftField::ExpiryDate => "expiryDate",
            DraftField::CategoryIds => "categoryIds",
            DraftField::ProductIds => "productIds",
        };
        f.write_str(name)
    }
}

/// Per-field messages for a rejected draft. At most one message per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftErrors(pub BTreeMap<DraftField, String>);

impl DraftErrors {
    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for DraftErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DraftErrors {}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedDraft {
    pub campaign: Campaign,
    pub discount_value: Decimal,
}

/// `[A-Z0-9_-]+`
pub(crate) fn is_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn parse_discount(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(&digits).ok()
}

impl CampaignDraft {
    /// Validate every field against `today`.
    ///
    /// When several checks fail on the same field the later one wins, so an
    /// expiry date that is both in the past and before the start date reports
    /// the ordering problem.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedDraft, DraftErrors> {
        let mut errors = BTreeMap::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(DraftField::Name, "Please enter a name".to_string());
        }

        let code = self.code.trim();
        if code.is_empty() {
            errors.insert(DraftField::Code, "Please enter a code".to_string());
        } else if !is_code(code) {
            errors.insert(
                DraftField::Code,
                "Code may only contain upper-case letters, digits, '-' and '_'".to_string(),
            );
        }

        let discount = self
            .discount_value
            .as_ref()
            .and_then(parse_discount)
            .filter(|d| *d > Decimal::ZERO);
        if discount.is_none() {
            errors.insert(
                DraftField::DiscountValue,
                "Discount value must be greater than 0".to_string(),
            );
        }

        let start = date_field(&self.start_date, DraftField::StartDate, "start", &mut errors);
        let end = date_field(&self.expiry_date, DraftField::ExpiryDate, "expiry", &mut errors);

        if start.is_some_and(|s| s < today) {
            errors.insert(
                DraftField::StartDate,
                "Start date cannot be before today".to_string(),
            );
        }
        if end.is_some_and(|e| e < today) {
            errors.insert(
                DraftField::ExpiryDate,
                "Expiry date cannot be before today".to_string(),
            );
        }
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                errors.insert(
                    DraftField::ExpiryDate,
                    "Expiry date must be on or after the start date".to_string(),
                );
            }
        }

        let target = self.target();
        if target.is_none() {
            match self.apply_scope {
                ApplyScope::Category => {
                    errors.insert(DraftField::CategoryIds, "Please choose a category".to_string());
                }
                ApplyScope::Product => {
                    errors.insert(
                        DraftField::ProductIds,
                        "Please choose at least one product".to_string(),
                    );
                }
                ApplyScope::Order => {}
            }
        }

        match (start, end, target, discount) {
            (Some(start), Some(end), Some(target), Some(discount_value)) if errors.is_empty() => {
                Ok(ValidatedDraft {
                    campaign: Campaign {
                        id: self.id.clone().filter(|id| !id.trim().is_empty()),
                        code: code.to_ascii_uppercase(),
                        name: name.to_string(),
                        target,
                        period: DateRange::new(start, end),
                    },
                    discount_value,
                })
            }
            _ => Err(DraftErrors(errors)),
        }
    }

    fn target(&self) -> Option<ApplyTarget> {
        match self.apply_scope {
            ApplyScope::Order => Some(ApplyTarget::Order),
            ApplyScope::Category => {
                let (i, id) = self
                    .category_ids
                    .iter()
                    .enumerate()
                    .find(|(_, id)| !id.trim().is_empty())?;
                Some(ApplyTarget::Category(ScopeRef {
                    id: id.clone(),
                    name: self.category_names.get(i).cloned(),
                }))
            }
            ApplyScope::Product => ApplyTarget::products(
                self.product_ids
                    .iter()
                    .enumerate()
                    .filter(|(_, id)| !id.trim().is_empty())
                    .map(|(i, id)| ScopeRef {
                        id: id.clone(),
                        name: self.product_names.get(i).cloned(),
                    }),
            ),
        }
    }
}

fn date_field(
    raw: &Option<String>,
    field: DraftField,
    label: &str,
    errors: &mut BTreeMap<DraftField, String>,
) -> Option<NaiveDate> {
    match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => {
            errors.insert(field, format!("Please choose a {label} date"));
            None
        }
        Some(s) => match parse_date(s) {
            Ok(date) => Some(date),
            Err(e) => {
                errors.insert(field, format!("Invalid {label} date: {e}"));
                None
            }
        },
    }
}
