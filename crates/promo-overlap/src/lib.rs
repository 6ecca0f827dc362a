//! # promo-overlap
//!
//! Decides whether a proposed promotion or voucher would stack with one that
//! is already active or awaiting approval.
//!
//! A conflict needs two things: the campaigns' date ranges intersect (both
//! ends inclusive), and their scopes can hit the same purchase. Scopes are
//! `ORDER`, `CATEGORY` (one category) or `PRODUCT` (a list of products);
//! category/product pairs are resolved through the active product catalog.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use promo_overlap::{check_records, ApplyTarget, Campaign, CampaignKind, CampaignRecord, DateRange};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
//! let candidate = Campaign {
//!     id: None,
//!     code: "SUMMER".into(),
//!     name: "Summer sale".into(),
//!     target: ApplyTarget::Order,
//!     period: DateRange::new(day(1), day(30)),
//! };
//! let existing = CampaignRecord {
//!     name: Some("Flash".into()),
//!     code: Some("FLASH".into()),
//!     apply_scope: Some("ORDER".into()),
//!     start_date: Some("2024-06-30".into()),
//!     expiry_date: Some("2024-07-02".into()),
//!     ..Default::default()
//! };
//!
//! let report = check_records(CampaignKind::Promotion, &candidate, vec![existing], &[]);
//! assert!(report.has_overlap);
//! ```
//!
//! ## Modules
//!
//! - [`model`]: normalized campaigns, scopes and targets
//! - [`response`]: backend wire records and the normalization boundary
//! - [`range`]: inclusive date ranges and their intersection test
//! - [`catalog`]: product → category index
//! - [`scope`]: per-pair scope comparison
//! - [`conflict`]: conflict records and the evaluation pass
//! - [`report`]: human-readable aggregation
//! - [`source`]: loading existing campaigns with a failure policy
//! - [`draft`]: campaign form validation
//! - [`voucher`]: checkout-time voucher applicability and discounts
//! - [`error`]: error types

pub mod catalog;
pub mod conflict;
pub mod draft;
pub mod error;
pub mod model;
pub mod range;
pub mod report;
pub mod response;
pub mod scope;
pub mod source;
pub mod voucher;

pub use catalog::ProductIndex;
pub use conflict::{check_records, find_overlaps, Conflict};
pub use draft::{CampaignDraft, DraftErrors, DraftField, ValidatedDraft};
pub use error::{OverlapError, RecordError};
pub use model::{ApplyScope, ApplyTarget, Campaign, CampaignKind, CampaignRef, ScopeRef};
pub use range::DateRange;
pub use report::OverlapReport;
pub use response::{parse_list, CampaignRecord, ProductRecord, VoucherRecord};
pub use source::{check_overlaps, CampaignSource, FailurePolicy, StaticSource};
pub use voucher::{filter_applicable, normalize_code, Basket, Voucher, VoucherRejection};
