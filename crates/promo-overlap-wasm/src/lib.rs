//! WASM bindings for promo-overlap.
//!
//! Exposes overlap checks, form draft validation and voucher eligibility to
//! the admin and checkout pages via `wasm-bindgen`. The page fetches backend
//! responses itself and passes the raw bodies in; all complex types cross the
//! boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p promo-overlap-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/promo-overlap-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/promo_overlap_wasm.wasm
//! ```

use chrono::NaiveDate;
use promo_overlap::range::parse_date;
use promo_overlap::{
    check_records, filter_applicable, parse_list, Basket, Campaign, CampaignDraft, CampaignKind,
    CampaignRecord, ProductRecord, Voucher, VoucherRecord,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Basket contents sent from the checkout page.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct BasketInput {
    product_ids: Vec<String>,
    category_ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoucherCheckDto {
    applicable: bool,
    message: Option<String>,
    discount: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftCheckDto<T: Serialize> {
    valid: bool,
    #[serde(flatten)]
    body: T,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {e}"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_err("Serialization error", e))
}

fn parse_kind(kind: &str) -> Result<CampaignKind, JsValue> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "" | "promotion" | "promotions" => Ok(CampaignKind::Promotion),
        "voucher" | "vouchers" => Ok(CampaignKind::Voucher),
        other => Err(JsValue::from_str(&format!("Unknown campaign kind '{other}'"))),
    }
}

fn parse_today(today: &str) -> Result<NaiveDate, JsValue> {
    parse_date(today).map_err(|e| js_err("Invalid today", e))
}

fn parse_total(order_total: &str) -> Result<Decimal, JsValue> {
    order_total
        .trim()
        .parse()
        .map_err(|e| js_err("Invalid order total", e))
}

fn parse_voucher(voucher_json: &str) -> Result<Voucher, JsValue> {
    let record: VoucherRecord =
        serde_json::from_str(voucher_json).map_err(|e| js_err("Invalid voucher JSON", e))?;
    Ok(Voucher::from(record))
}

fn parse_basket(basket_json: &str) -> Result<Basket, JsValue> {
    let input: BasketInput =
        serde_json::from_str(basket_json).map_err(|e| js_err("Invalid basket JSON", e))?;
    Ok(Basket::new(input.product_ids, input.category_ids))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Check a candidate promotion or voucher against existing ones.
///
/// # Arguments
/// - `kind` -- `"promotion"` or `"voucher"`
/// - `candidate_json` -- the record being created or edited
/// - `active_json`, `pending_json` -- raw `/{kind}/active` and `/{kind}/pending`
///   bodies (envelope or bare array)
/// - `products_json` -- raw `/products/active` body; pass `"[]"` when unavailable
///
/// Returns the overlap report as a JSON string.
#[wasm_bindgen(js_name = "checkOverlaps")]
pub fn check_overlaps(
    kind: &str,
    candidate_json: &str,
    active_json: &str,
    pending_json: &str,
    products_json: &str,
) -> Result<String, JsValue> {
    let kind = parse_kind(kind)?;
    let record: CampaignRecord =
        serde_json::from_str(candidate_json).map_err(|e| js_err("Invalid candidate JSON", e))?;
    let candidate = Campaign::try_from(record).map_err(|e| js_err("Invalid candidate", e))?;

    let mut records: Vec<CampaignRecord> =
        parse_list(active_json).map_err(|e| js_err("Invalid active list", e))?;
    records.extend(
        parse_list::<CampaignRecord>(pending_json)
            .map_err(|e| js_err("Invalid pending list", e))?,
    );
    let products: Vec<ProductRecord> =
        parse_list(products_json).map_err(|e| js_err("Invalid product list", e))?;

    to_json(&check_records(kind, &candidate, records, &products))
}

/// Validate a campaign form draft against `today` (`YYYY-MM-DD`).
///
/// Returns `{"valid": true, "campaign": ..., "discountValue": ...}` or
/// `{"valid": false, "<field>": "<message>", ...}`.
#[wasm_bindgen(js_name = "validateCampaignDraft")]
pub fn validate_campaign_draft(draft_json: &str, today: &str) -> Result<String, JsValue> {
    let draft: CampaignDraft =
        serde_json::from_str(draft_json).map_err(|e| js_err("Invalid draft JSON", e))?;
    let today = parse_today(today)?;

    match draft.validate(today) {
        Ok(validated) => to_json(&DraftCheckDto {
            valid: true,
            body: validated,
        }),
        Err(errors) => to_json(&DraftCheckDto {
            valid: false,
            body: errors,
        }),
    }
}

/// Check whether a voucher applies to an order and compute its discount.
///
/// `order_total` is a decimal string so large VND amounts survive the trip.
/// `basket_json` is `{"productIds": [...], "categoryIds": [...]}`.
#[wasm_bindgen(js_name = "validateVoucher")]
pub fn validate_voucher(
    voucher_json: &str,
    order_total: &str,
    basket_json: &str,
    today: &str,
) -> Result<String, JsValue> {
    let voucher = parse_voucher(voucher_json)?;
    let total = parse_total(order_total)?;
    let basket = parse_basket(basket_json)?;
    let today = parse_today(today)?;

    let dto = match voucher.validate(total, &basket, today) {
        Ok(()) => VoucherCheckDto {
            applicable: true,
            message: None,
            discount: voucher.discount(total).to_string(),
        },
        Err(rejection) => VoucherCheckDto {
            applicable: false,
            message: Some(rejection.to_string()),
            discount: Decimal::ZERO.to_string(),
        },
    };
    to_json(&dto)
}

/// Discount a voucher gives on `order_total`, ignoring eligibility.
#[wasm_bindgen(js_name = "calculateVoucherDiscount")]
pub fn calculate_voucher_discount(voucher_json: &str, order_total: &str) -> Result<String, JsValue> {
    let voucher = parse_voucher(voucher_json)?;
    let total = parse_total(order_total)?;
    Ok(voucher.discount(total).to_string())
}

/// Codes of the vouchers in `vouchers_json` (envelope or bare array) that
/// can be applied to the order, as a JSON array.
#[wasm_bindgen(js_name = "applicableVouchers")]
pub fn applicable_vouchers(
    vouchers_json: &str,
    order_total: &str,
    basket_json: &str,
    today: &str,
) -> Result<String, JsValue> {
    let vouchers: Vec<Voucher> = parse_list::<VoucherRecord>(vouchers_json)
        .map_err(|e| js_err("Invalid voucher list", e))?
        .into_iter()
        .map(Voucher::from)
        .collect();
    let total = parse_total(order_total)?;
    let basket = parse_basket(basket_json)?;
    let today = parse_today(today)?;

    let codes: Vec<&str> = filter_applicable(&vouchers, total, &basket, today)
        .into_iter()
        .map(|v| v.code.as_str())
        .collect();
    to_json(&codes)
}
