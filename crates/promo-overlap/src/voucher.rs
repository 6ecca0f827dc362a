//! Voucher applicability and discount computation at checkout.
//!
//! Amounts are in whole currency units (VND has no minor unit), so computed
//! discounts are rounded to integers.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

use crate::draft::is_code;
use crate::model::ApplyScope;
use crate::range::parse_date;
use crate::response::{IdRef, VoucherRecord};

const APPROVED: &str = "APPROVED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

/// Which basket lines a voucher may be used against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VoucherScope {
    Order,
    /// Allowed product ids. May be empty, which makes the voucher unusable.
    Products(BTreeSet<String>),
    /// Allowed category ids. May be empty, which makes the voucher unusable.
    Categories(BTreeSet<String>),
}

/// A voucher after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voucher {
    pub code: String,
    pub is_active: bool,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
    pub min_order_value: Option<Decimal>,
    pub max_order_value: Option<Decimal>,
    pub scope: VoucherScope,
    pub discount_kind: DiscountKind,
    pub discount_value: Decimal,
    pub max_discount_value: Option<Decimal>,
}

/// Product and category ids present in the current basket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Basket {
    pub product_ids: BTreeSet<String>,
    pub category_ids: BTreeSet<String>,
}

impl Basket {
    pub fn new<P, C>(product_ids: P, category_ids: C) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            product_ids: product_ids.into_iter().map(Into::into).collect(),
            category_ids: category_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Why a voucher cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoucherRejection {
    #[error("Voucher code must not be empty")]
    EmptyCode,

    #[error("Voucher code may only contain letters, digits, '-' and '_'")]
    InvalidCode,

    #[error("Voucher \"{0}\" is no longer active")]
    Inactive(String),

    #[error("Voucher \"{0}\" has not been approved or was rejected")]
    NotApproved(String),

    #[error("Voucher \"{code}\" is not valid yet. Start date: {start}")]
    NotStarted { code: String, start: NaiveDate },

    #[error("Voucher \"{0}\" has expired")]
    Expired(String),

    #[error("Voucher \"{0}\" has no uses left")]
    UsageExhausted(String),

    #[error("Order total must be greater than 0 to apply a voucher")]
    EmptyOrder,

    #[error("Voucher \"{code}\" needs an order of at least {minimum} VND. Current order: {total} VND")]
    BelowMinimum {
        code: String,
        minimum: Decimal,
        total: Decimal,
    },

    #[error("Voucher \"{code}\" applies to orders up to {maximum} VND. Current order: {total} VND")]
    AboveMaximum {
        code: String,
        maximum: Decimal,
        total: Decimal,
    },

    #[error("Voucher \"{0}\" does not apply to the selected products")]
    ProductsNotEligible(String),

    #[error("Voucher \"{0}\" has no eligible products")]
    NoEligibleProducts(String),

    #[error("Voucher \"{0}\" does not apply to the categories of the selected products")]
    CategoriesNotEligible(String),

    #[error("Voucher \"{0}\" has no eligible categories")]
    NoEligibleCategories(String),
}

/// Trim and upper-case a code typed by a shopper, rejecting malformed input.
pub fn normalize_code(code: &str) -> Result<String, VoucherRejection> {
    let normalized = code.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(VoucherRejection::EmptyCode);
    }
    if !is_code(&normalized) {
        return Err(VoucherRejection::InvalidCode);
    }
    Ok(normalized)
}

fn money(value: Option<f64>) -> Option<Decimal> {
    value.and_then(|v| Decimal::try_from(v).ok())
}

/// A positive bound, or `None` when the bound is absent or disabled (`<= 0`).
fn bound(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

fn ids(primary: Option<Vec<IdRef>>, fallback: Option<Vec<IdRef>>) -> BTreeSet<String> {
    primary
        .or(fallback)
        .unwrap_or_default()
        .iter()
        .filter_map(IdRef::id)
        .collect()
}

impl From<VoucherRecord> for Voucher {
    fn from(r: VoucherRecord) -> Self {
        let scope = match r.apply_scope.as_deref().map(str::parse::<ApplyScope>) {
            Some(Ok(ApplyScope::Product)) => VoucherScope::Products(ids(r.product_apply, r.product_ids)),
            Some(Ok(ApplyScope::Category)) => {
                VoucherScope::Categories(ids(r.category_apply, r.category_ids))
            }
            _ => VoucherScope::Order,
        };
        let discount_kind = match r.discount_value_type.as_deref() {
            Some(kind) if kind.eq_ignore_ascii_case("PERCENTAGE") => DiscountKind::Percentage,
            _ => DiscountKind::Fixed,
        };

        Self {
            code: r.code.unwrap_or_default(),
            is_active: r.is_active.unwrap_or(true),
            status: r.status,
            start_date: r.start_date.as_deref().and_then(|s| parse_date(s).ok()),
            expiry_date: r.expiry_date.as_deref().and_then(|s| parse_date(s).ok()),
            usage_limit: r.usage_limit,
            usage_count: r.usage_count.unwrap_or(0),
            min_order_value: money(r.min_order_value),
            max_order_value: money(r.max_order_value),
            scope,
            discount_kind,
            discount_value: money(r.discount_value).unwrap_or_default(),
            max_discount_value: money(r.max_discount_value),
        }
    }
}

impl Voucher {
    /// Status, validity window and usage checks. Dates are compared by day:
    /// a voucher is usable on its start and expiry dates.
    pub fn check_active(&self, today: NaiveDate) -> Result<(), VoucherRejection> {
        if !self.is_active {
            return Err(VoucherRejection::Inactive(self.code.clone()));
        }
        if self.status.as_deref().is_some_and(|s| s != APPROVED) {
            return Err(VoucherRejection::NotApproved(self.code.clone()));
        }
        if let Some(start) = self.start_date.filter(|start| today < *start) {
            return Err(VoucherRejection::NotStarted {
                code: self.code.clone(),
                start,
            });
        }
        if self.expiry_date.is_some_and(|expiry| today > expiry) {
            return Err(VoucherRejection::Expired(self.code.clone()));
        }
        if let Some(limit) = self.usage_limit.filter(|l| *l > 0) {
            if self.usage_count >= limit {
                return Err(VoucherRejection::UsageExhausted(self.code.clone()));
            }
        }
        Ok(())
    }

    /// Whether the voucher can be applied to an order of `order_total`
    /// containing `basket`.
    pub fn validate(
        &self,
        order_total: Decimal,
        basket: &Basket,
        today: NaiveDate,
    ) -> Result<(), VoucherRejection> {
        self.check_active(today)?;

        if order_total <= Decimal::ZERO {
            return Err(VoucherRejection::EmptyOrder);
        }
        if let Some(minimum) = bound(self.min_order_value) {
            if order_total < minimum {
                return Err(VoucherRejection::BelowMinimum {
                    code: self.code.clone(),
                    minimum,
                    total: order_total,
                });
            }
        }
        if let Some(maximum) = bound(self.max_order_value) {
            if order_total > maximum {
                return Err(VoucherRejection::AboveMaximum {
                    code: self.code.clone(),
                    maximum,
                    total: order_total,
                });
            }
        }

        match &self.scope {
            VoucherScope::Order => Ok(()),
            VoucherScope::Products(allowed) if allowed.is_empty() => {
                Err(VoucherRejection::NoEligibleProducts(self.code.clone()))
            }
            VoucherScope::Products(allowed) => {
                if basket.product_ids.iter().any(|id| allowed.contains(id)) {
                    Ok(())
                } else {
                    Err(VoucherRejection::ProductsNotEligible(self.code.clone()))
                }
            }
            VoucherScope::Categories(allowed) if allowed.is_empty() => {
                Err(VoucherRejection::NoEligibleCategories(self.code.clone()))
            }
            VoucherScope::Categories(allowed) => {
                if basket.category_ids.iter().any(|id| allowed.contains(id)) {
                    Ok(())
                } else {
                    Err(VoucherRejection::CategoriesNotEligible(self.code.clone()))
                }
            }
        }
    }

    /// Discount for an order of `order_total`, never more than the total.
    pub fn discount(&self, order_total: Decimal) -> Decimal {
        if order_total <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let raw = match self.discount_kind {
            DiscountKind::Percentage => {
                if self.discount_value <= Decimal::ZERO {
                    return Decimal::ZERO;
                }
                // A product too large for a Decimal is above the total anyway.
                let pct = order_total
                    .checked_mul(self.discount_value)
                    .map(|v| v / Decimal::ONE_HUNDRED)
                    .or_else(|| (order_total / Decimal::ONE_HUNDRED).checked_mul(self.discount_value))
                    .unwrap_or(order_total);
                match bound(self.max_discount_value) {
                    Some(cap) => pct.min(cap),
                    None => pct,
                }
            }
            DiscountKind::Fixed => self.discount_value,
        };
        raw.min(order_total)
            .max(Decimal::ZERO)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Vouchers from `vouchers` that can be applied to the order.
pub fn filter_applicable<'a>(
    vouchers: &'a [Voucher],
    order_total: Decimal,
    basket: &Basket,
    today: NaiveDate,
) -> Vec<&'a Voucher> {
    if order_total <= Decimal::ZERO {
        return Vec::new();
    }
    vouchers
        .iter()
        .filter(|v| v.validate(order_total, basket, today).is_ok())
        .collect()
}
