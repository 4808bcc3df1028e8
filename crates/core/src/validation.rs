// crates/core/src/validation.rs
//! Input validation for partner/work-package fields and user-supplied paths.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{BudgetError, Result};
use crate::partner::{MAX_PARTNER_NUMBER, MIN_PARTNER_NUMBER, Partner};
use crate::workpackage::WorkPackage;

static ACRONYM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("acronym pattern"));

static WP_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^WP[0-9]+$").expect("work package id pattern"));

fn invalid(field: &str, reason: impl Into<String>) -> BudgetError {
    BudgetError::Validation {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// A monetary amount must be finite and non-negative.
pub fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(invalid(field, "amount must be a finite number"));
    }
    if value < 0.0 {
        return Err(invalid(field, format!("amount must not be negative (got {value})")));
    }
    Ok(())
}

/// Parse a user-entered amount. Thousands separators are tolerated.
pub fn parse_amount(field: &str, raw: &str) -> Result<f64> {
    let cleaned = raw.trim().replace(',', "");
    let value: f64 = cleaned
        .parse()
        .map_err(|_| invalid(field, format!("'{raw}' is not a number")))?;
    validate_amount(field, value)?;
    Ok(value)
}

pub fn validate_partner(partner: &Partner) -> Result<()> {
    if !(MIN_PARTNER_NUMBER..=MAX_PARTNER_NUMBER).contains(&partner.number) {
        return Err(invalid(
            "number",
            format!(
                "partner number must be between {MIN_PARTNER_NUMBER} and {MAX_PARTNER_NUMBER} \
                 (got {})",
                partner.number
            ),
        ));
    }
    if !ACRONYM_PATTERN.is_match(&partner.acronym) {
        return Err(invalid(
            "acronym",
            format!("'{}' must be alphanumeric with '-' or '_'", partner.acronym),
        ));
    }
    if partner.name.trim().is_empty() {
        return Err(invalid("name", "partner name must not be empty"));
    }
    validate_amount("personnel", partner.budget.personnel)?;
    validate_amount("equipment", partner.budget.equipment)?;
    validate_amount("travel", partner.budget.travel)?;
    validate_amount("subcontracting", partner.budget.subcontracting)?;
    validate_amount("other", partner.budget.other)?;
    Ok(())
}

pub fn validate_workpackage(wp: &WorkPackage) -> Result<()> {
    if !WP_ID_PATTERN.is_match(&wp.id) {
        return Err(invalid(
            "id",
            format!("'{}' must look like WP1, WP2, ...", wp.id),
        ));
    }
    if wp.title.trim().is_empty() {
        return Err(invalid("title", "work package title must not be empty"));
    }
    if wp.start_month == 0 {
        return Err(invalid("start", "months are counted from 1"));
    }
    if wp.end_month < wp.start_month {
        return Err(invalid(
            "end",
            format!(
                "end month {} is before start month {}",
                wp.end_month, wp.start_month
            ),
        ));
    }
    validate_amount("pm", wp.person_months)?;
    Ok(())
}

/// Quick filesystem-free check that a path cannot escape its root.
///
/// Rejects null bytes and any `..` sequence that would climb above the
/// path's starting point. Going up and back down within the path is fine.
pub fn is_path_safe(path: &Path) -> bool {
    if path.to_string_lossy().contains('\0') {
        return false;
    }
    let mut depth: isize = 0;
    for component in path.components() {
        match component {
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            Component::Normal(_) => depth += 1,
            _ => {}
        }
    }
    true
}

/// [`is_path_safe`] as a guard for fallible pipelines.
pub fn checked_path(path: &Path) -> Result<&Path> {
    if is_path_safe(path) {
        Ok(path)
    } else {
        Err(BudgetError::UnsafePath {
            path: path.to_path_buf(),
            reason: "path escapes its root or contains null bytes".into(),
        })
    }
}
