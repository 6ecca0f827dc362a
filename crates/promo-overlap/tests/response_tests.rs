//! Tests for response envelopes and record normalization.

use chrono::NaiveDate;
use promo_overlap::response::IdRef;
use promo_overlap::{
    parse_list, ApplyScope, ApplyTarget, Campaign, CampaignRecord, OverlapError, ProductRecord,
    RecordError, ScopeRef,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dated(scope: &str) -> CampaignRecord {
    CampaignRecord {
        id: Some("p-1".to_string()),
        code: Some("SUMMER".to_string()),
        name: Some("Summer".to_string()),
        apply_scope: Some(scope.to_string()),
        start_date: Some("2024-06-01".to_string()),
        expiry_date: Some("2024-06-30".to_string()),
        ..Default::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn parses_wrapped_result() {
    let body = r#"{"code":1000,"message":null,"result":[{"id":"a","applyScope":"ORDER"}]}"#;

    let records: Vec<CampaignRecord> = parse_list(body).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_deref(), Some("a"));
    assert_eq!(records[0].apply_scope.as_deref(), Some("ORDER"));
}

#[test]
fn parses_bare_array() {
    let body = r#"[{"id":"p1","name":"Rose","categoryId":"c1","categoryName":"Lipstick"}]"#;

    let products: Vec<ProductRecord> = parse_list(body).unwrap();

    assert_eq!(
        products,
        vec![ProductRecord {
            id: Some("p1".to_string()),
            name: Some("Rose".to_string()),
            category_id: Some("c1".to_string()),
            category_name: Some("Lipstick".to_string()),
        }]
    );
}

#[test]
fn non_array_result_is_empty() {
    let records: Vec<CampaignRecord> = parse_list(r#"{"result":{"id":"x"}}"#).unwrap();
    assert!(records.is_empty());

    let records: Vec<CampaignRecord> = parse_list(r#"{"message":"ok"}"#).unwrap();
    assert!(records.is_empty());

    let records: Vec<CampaignRecord> = parse_list("42").unwrap();
    assert!(records.is_empty());
}

#[test]
fn invalid_json_is_an_error() {
    let err = parse_list::<CampaignRecord>("{not json").unwrap_err();
    assert!(matches!(err, OverlapError::Body(_)));
}

#[test]
fn unknown_fields_are_ignored() {
    let body = r#"[{"id":"a","discountValue":10.5,"submittedByName":"Lan","usageCount":3}]"#;
    let records: Vec<CampaignRecord> = parse_list(body).unwrap();
    assert_eq!(records[0].id.as_deref(), Some("a"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Campaign normalization
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn order_record_normalizes() {
    let campaign = Campaign::try_from(dated("ORDER")).unwrap();

    assert_eq!(campaign.id.as_deref(), Some("p-1"));
    assert_eq!(campaign.target, ApplyTarget::Order);
    assert_eq!(campaign.period.start, date("2024-06-01"));
    assert_eq!(campaign.period.end, date("2024-06-30"));
}

#[test]
fn missing_scope_is_rejected() {
    let record = CampaignRecord {
        apply_scope: None,
        ..dated("ORDER")
    };
    assert_eq!(Campaign::try_from(record), Err(RecordError::MissingScope));

    let blank = CampaignRecord {
        apply_scope: Some("  ".to_string()),
        ..dated("ORDER")
    };
    assert_eq!(Campaign::try_from(blank), Err(RecordError::MissingScope));
}

#[test]
fn category_takes_first_id_and_name() {
    let record = CampaignRecord {
        category_ids: Some(vec!["c1".to_string(), "c2".to_string()]),
        category_names: Some(vec!["Lipstick".to_string()]),
        ..dated("CATEGORY")
    };

    let campaign = Campaign::try_from(record).unwrap();

    assert_eq!(
        campaign.target,
        ApplyTarget::Category(ScopeRef::named("c1", "Lipstick"))
    );
}

#[test]
fn products_zip_parallel_names_and_drop_duplicates() {
    let record = CampaignRecord {
        product_ids: Some(vec!["p1".into(), "p2".into(), "p1".into(), " ".into()]),
        product_names: Some(vec!["Rose".into()]),
        ..dated("PRODUCT")
    };

    let campaign = Campaign::try_from(record).unwrap();

    assert_eq!(
        campaign.target,
        ApplyTarget::Product(vec![ScopeRef::named("p1", "Rose"), ScopeRef::new("p2")])
    );
}

#[test]
fn scope_without_targets_is_rejected() {
    assert_eq!(
        Campaign::try_from(dated("CATEGORY")),
        Err(RecordError::MissingTarget(ApplyScope::Category))
    );
    let record = CampaignRecord {
        product_ids: Some(vec![]),
        ..dated("PRODUCT")
    };
    assert_eq!(
        Campaign::try_from(record),
        Err(RecordError::MissingTarget(ApplyScope::Product))
    );
}

#[test]
fn missing_or_bad_dates_are_rejected() {
    let no_start = CampaignRecord {
        start_date: None,
        ..dated("ORDER")
    };
    assert_eq!(Campaign::try_from(no_start), Err(RecordError::MissingStartDate));

    let blank_expiry = CampaignRecord {
        expiry_date: Some("".to_string()),
        ..dated("ORDER")
    };
    assert_eq!(Campaign::try_from(blank_expiry), Err(RecordError::MissingExpiryDate));

    let garbled = CampaignRecord {
        expiry_date: Some("30/06/2024".to_string()),
        ..dated("ORDER")
    };
    assert_eq!(
        Campaign::try_from(garbled),
        Err(RecordError::InvalidDate("30/06/2024".to_string()))
    );
}

#[test]
fn unknown_scope_is_rejected() {
    assert_eq!(
        Campaign::try_from(dated("SHIPPING")),
        Err(RecordError::UnknownScope("SHIPPING".to_string()))
    );
}

#[test]
fn scope_parsing_is_case_insensitive() {
    assert_eq!("category".parse::<ApplyScope>(), Ok(ApplyScope::Category));
    assert_eq!(ApplyScope::Product.to_string(), "PRODUCT");
}

// ─────────────────────────────────────────────────────────────────────────────
// Id references
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn id_refs_accept_strings_objects_and_numbers() {
    let refs: Vec<IdRef> =
        serde_json::from_str(r#"["p1", {"id":"p2","name":"Rose"}, 7, true]"#).unwrap();

    let ids: Vec<Option<String>> = refs.iter().map(IdRef::id).collect();

    assert_eq!(
        ids,
        vec![Some("p1".to_string()), Some("p2".to_string()), Some("7".to_string()), None]
    );
}
