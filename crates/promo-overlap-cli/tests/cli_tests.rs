//! Integration tests for the `promo-check` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the check,
//! validate and voucher subcommands through the actual binary, including
//! exit codes, JSON output and backend failure handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to a fixture file.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

/// Helper: the binary with a clean logging environment.
fn promo_check() -> Command {
    let mut cmd = Command::cargo_bin("promo-check").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("PROMO_LOG_LEVEL")
        .env_remove("PROMO_LOG_FORMAT")
        .env_remove("PROMO_API_URL")
        .env_remove("PROMO_API_TOKEN");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Check subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_order_overlap_exits_two() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_order.json")])
        .args(["--existing", &fixture("existing.json")])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "The promotion \"July kickoff\" (code: JULY) already applies to the whole order during this period.",
        ));
}

#[test]
fn check_reports_skipped_records() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_order.json")])
        .args(["--existing", &fixture("existing.json")])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("1 existing record(s) skipped"));
}

#[test]
fn check_no_overlap_exits_zero() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_order.json")])
        .args(["--existing", &fixture("existing_clear.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("No overlapping promotions found."));
}

#[test]
fn check_without_existing_files_is_clear() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_order.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("No overlapping promotions found."));
}

#[test]
fn check_product_in_category_uses_catalog() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_product.json")])
        .args(["--existing", &fixture("existing.json")])
        .args(["--products", &fixture("products.json")])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "Products \"Vitamin C serum\" in category \"Skincare\" are already covered by the promotion \"Skincare month\" (code: SKIN) during this period.",
        ));
}

#[test]
fn check_product_without_catalog_misses_category_link() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_product.json")])
        .args(["--existing", &fixture("existing.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("No overlapping promotions found."));
}

#[test]
fn check_voucher_kind_uses_voucher_wording() {
    promo_check()
        .args(["check", "--kind", "voucher"])
        .args(["--candidate", &fixture("candidate_order.json")])
        .args(["--existing", &fixture("existing.json")])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("The voucher \"July kickoff\""));
}

#[test]
fn check_json_output() {
    let output = promo_check()
        .args(["check", "--json", "--candidate", &fixture("candidate_order.json")])
        .args(["--existing", &fixture("existing.json")])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["checked"], true);
    assert_eq!(report["has_overlap"], true);
    assert_eq!(report["skipped"], 1);
    assert_eq!(report["conflicts"][0]["rule"], "whole_order");
}

#[test]
fn check_invalid_candidate_is_an_error() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_invalid.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid candidate"));
}

#[test]
fn check_missing_candidate_file() {
    promo_check()
        .args(["check", "--candidate", "/nonexistent/candidate.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn check_unreadable_existing_file_is_an_error() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_order.json")])
        .args(["--existing", "/nonexistent/existing.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Overlap check skipped").not())
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn check_malformed_products_file_is_an_error() {
    promo_check()
        .args(["check", "--candidate", &fixture("candidate_order.json")])
        .args(["--existing", &fixture("existing.json")])
        .args(["--products", &fixture("malformed.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse file"));
}

#[test]
fn check_unreachable_backend_fails_open() {
    promo_check()
        .args(["check", "--remote", "--api-url", "http://127.0.0.1:9"])
        .args(["--candidate", &fixture("candidate_order.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overlap check skipped"));
}

#[test]
fn check_unreachable_backend_fails_closed() {
    promo_check()
        .args(["check", "--remote", "--fail-closed"])
        .args(["--candidate", &fixture("candidate_order.json")])
        .env("PROMO_API_URL", "http://127.0.0.1:9")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("active promotions"));
}

#[test]
fn check_remote_conflicts_with_local_files() {
    promo_check()
        .args(["check", "--remote", "--candidate", &fixture("candidate_order.json")])
        .args(["--existing", &fixture("existing.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Validate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_accepts_good_draft() {
    promo_check()
        .args(["validate", "--today", "2024-05-20"])
        .args(["--draft", &fixture("draft_valid.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft OK: Serum week (SERUM5) PRODUCT"));
}

#[test]
fn validate_rejects_past_start_date() {
    promo_check()
        .args(["validate", "--today", "2024-06-12"])
        .args(["--draft", &fixture("draft_valid.json")])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "startDate: Start date cannot be before today",
        ));
}

#[test]
fn validate_lists_every_bad_field() {
    promo_check()
        .args(["validate", "--today", "2024-05-20"])
        .args(["--draft", &fixture("draft_invalid.json")])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("name: Please enter a name"))
        .stdout(predicate::str::contains("code: Code may only contain"))
        .stdout(predicate::str::contains(
            "discountValue: Discount value must be greater than 0",
        ))
        .stdout(predicate::str::contains(
            "expiryDate: Expiry date must be on or after the start date",
        ))
        .stdout(predicate::str::contains("categoryIds: Please choose a category"));
}

#[test]
fn validate_json_output() {
    let output = promo_check()
        .args(["validate", "--json", "--today", "2024-05-20"])
        .args(["--draft", &fixture("draft_invalid.json")])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let errors: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(errors["name"], "Please enter a name");
    assert!(errors.get("startDate").is_none());
}

#[test]
fn validate_rejects_bad_today() {
    promo_check()
        .args(["validate", "--today", "20/05/2024"])
        .args(["--draft", &fixture("draft_valid.json")])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid --today value"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Voucher subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn voucher_applies_with_capped_percentage() {
    promo_check()
        .args(["voucher", "--voucher", &fixture("voucher.json")])
        .args(["--total", "350000", "--product", "p-serum", "--today", "2024-06-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Voucher \"WELCOME\" applies. Discount: 35000",
        ));
}

#[test]
fn voucher_rejected_below_minimum() {
    promo_check()
        .args(["voucher", "--voucher", &fixture("voucher.json")])
        .args(["--total", "150000", "--product", "p-serum", "--today", "2024-06-15"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("needs an order of at least"));
}

#[test]
fn voucher_rejected_for_other_products() {
    promo_check()
        .args(["voucher", "--voucher", &fixture("voucher.json")])
        .args(["--total", "350000", "--product", "p-lip", "--today", "2024-06-15"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "Voucher \"WELCOME\" does not apply to the selected products",
        ));
}

#[test]
fn voucher_rejected_after_expiry() {
    promo_check()
        .args(["voucher", "--voucher", &fixture("voucher.json")])
        .args(["--total", "350000", "--product", "p-serum", "--today", "2024-07-01"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Voucher \"WELCOME\" has expired"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    promo_check()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("voucher"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    promo_check().assert().failure();
}
