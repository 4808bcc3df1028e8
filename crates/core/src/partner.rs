// crates/core/src/partner.rs
//! Partner records and their workbook representation.
//!
//! Each partner lives on its own sheet named `P{number} {acronym}`, as a
//! column of labeled rows. Partner 1 is the coordinator and is managed
//! outside this tool, so editable partners start at 2.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, Result};
use crate::sheet::{CellValue, Sheet, Workbook};
use crate::validation;

pub const MIN_PARTNER_NUMBER: u16 = 2;
pub const MAX_PARTNER_NUMBER: u16 = 20;

static PARTNER_SHEET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P([0-9]+) ").expect("partner sheet pattern"));

const LABEL_NUMBER: &str = "Partner_Number";
const LABEL_ACRONYM: &str = "Acronym";
const LABEL_NAME: &str = "Name";
const LABEL_COUNTRY: &str = "Country";
const LABEL_PERSONNEL: &str = "Personnel";
const LABEL_EQUIPMENT: &str = "Equipment";
const LABEL_TRAVEL: &str = "Travel";
const LABEL_SUBCONTRACTING: &str = "Subcontracting";
const LABEL_OTHER: &str = "Other";

/// Direct cost lines of one partner's budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetLines {
    pub personnel: f64,
    pub equipment: f64,
    pub travel: f64,
    pub subcontracting: f64,
    pub other: f64,
}

impl BudgetLines {
    pub fn total(&self) -> f64 {
        self.personnel + self.equipment + self.travel + self.subcontracting + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub number: u16,
    pub acronym: String,
    pub name: String,
    pub country: String,
    pub budget: BudgetLines,
}

impl Partner {
    pub fn sheet_name(&self) -> String {
        format!("P{} {}", self.number, self.acronym)
    }

    fn to_sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(self.sheet_name());
        let rows: [(&str, CellValue); 9] = [
            (LABEL_NUMBER, CellValue::number(f64::from(self.number))),
            (LABEL_ACRONYM, CellValue::text(&*self.acronym)),
            (LABEL_NAME, CellValue::text(&*self.name)),
            (LABEL_COUNTRY, CellValue::text(&*self.country)),
            (LABEL_PERSONNEL, CellValue::number(self.budget.personnel)),
            (LABEL_EQUIPMENT, CellValue::number(self.budget.equipment)),
            (LABEL_TRAVEL, CellValue::number(self.budget.travel)),
            (
                LABEL_SUBCONTRACTING,
                CellValue::number(self.budget.subcontracting),
            ),
            (LABEL_OTHER, CellValue::number(self.budget.other)),
        ];
        for (label, value) in rows {
            sheet.append_row(vec![CellValue::text(label), value]);
        }
        sheet
    }

    /// Rebuild a partner from its sheet.
    ///
    /// # Errors
    ///
    /// Fails when a labeled row is missing or holds the wrong cell type.
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let number = labeled_number(sheet, LABEL_NUMBER)?;
        if number < 0.0 || number > f64::from(u16::MAX) || number.fract() != 0.0 {
            return Err(malformed(sheet, LABEL_NUMBER, "not a partner number"));
        }
        Ok(Self {
            number: number as u16,
            acronym: labeled_text(sheet, LABEL_ACRONYM)?,
            name: labeled_text(sheet, LABEL_NAME)?,
            country: labeled_text(sheet, LABEL_COUNTRY)?,
            budget: BudgetLines {
                personnel: labeled_number(sheet, LABEL_PERSONNEL)?,
                equipment: labeled_number(sheet, LABEL_EQUIPMENT)?,
                travel: labeled_number(sheet, LABEL_TRAVEL)?,
                subcontracting: labeled_number(sheet, LABEL_SUBCONTRACTING)?,
                other: labeled_number(sheet, LABEL_OTHER)?,
            },
        })
    }
}

fn malformed(sheet: &Sheet, label: &str, reason: &str) -> BudgetError {
    BudgetError::MalformedRow {
        sheet: sheet.name.clone(),
        row: sheet.find_label(label).unwrap_or(0),
        reason: format!("{label}: {reason}"),
    }
}

fn labeled_cell<'a>(sheet: &'a Sheet, label: &str) -> Result<&'a CellValue> {
    let row = sheet
        .find_label(label)
        .ok_or_else(|| malformed(sheet, label, "row missing"))?;
    sheet
        .cell(row, 1)
        .ok_or_else(|| malformed(sheet, label, "value cell missing"))
}

fn labeled_text(sheet: &Sheet, label: &str) -> Result<String> {
    labeled_cell(sheet, label)?
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| malformed(sheet, label, "expected text"))
}

fn labeled_number(sheet: &Sheet, label: &str) -> Result<f64> {
    labeled_cell(sheet, label)?
        .as_number()
        .ok_or_else(|| malformed(sheet, label, "expected a number"))
}

/// Add a partner to the workbook as a new sheet.
///
/// # Errors
///
/// Fails on invalid fields or when the partner number is already taken.
pub fn add_partner(workbook: &mut Workbook, partner: &Partner) -> Result<()> {
    validation::validate_partner(partner)?;
    if find_partner(workbook, partner.number).is_some() {
        return Err(BudgetError::DuplicatePartner(partner.number));
    }
    workbook.add_sheet(partner.to_sheet())?;
    log::info!("added partner P{} ({})", partner.number, partner.acronym);
    Ok(())
}

/// Replace the stored record for `partner.number` with `partner`.
pub fn update_partner(workbook: &mut Workbook, partner: &Partner) -> Result<()> {
    validation::validate_partner(partner)?;
    let existing = remove_partner(workbook, partner.number)?;
    // The acronym can change, which renames the sheet.
    if let Err(e) = workbook.add_sheet(partner.to_sheet()) {
        // Put the previous record back so a name clash is not destructive.
        workbook.add_sheet(existing.to_sheet())?;
        return Err(e);
    }
    Ok(())
}

/// Remove a partner's sheet, returning the removed record.
pub fn remove_partner(workbook: &mut Workbook, number: u16) -> Result<Partner> {
    let partner =
        find_partner(workbook, number).ok_or(BudgetError::PartnerNotFound(number))?;
    workbook.remove_sheet(&partner.sheet_name());
    Ok(partner)
}

/// All partners in the workbook, in sheet order. Sheets whose name merely
/// resembles a partner sheet but fails to parse are skipped.
pub fn list_partners(workbook: &Workbook) -> Vec<Partner> {
    workbook
        .sheets()
        .iter()
        .filter(|s| PARTNER_SHEET_PATTERN.is_match(&s.name))
        .filter_map(|s| Partner::from_sheet(s).ok())
        .collect()
}

pub fn find_partner(workbook: &Workbook, number: u16) -> Option<Partner> {
    list_partners(workbook).into_iter().find(|p| p.number == number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Partner {
        Partner {
            number: 2,
            acronym: "ACME".into(),
            name: "ACME Industries".into(),
            country: "DE".into(),
            budget: BudgetLines {
                personnel: 120_000.0,
                travel: 8_000.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn sheet_roundtrip() {
        let partner = acme();
        let sheet = partner.to_sheet();
        assert_eq!(sheet.name, "P2 ACME");
        assert_eq!(Partner::from_sheet(&sheet).unwrap(), partner);
    }

    #[test]
    fn add_and_find() {
        let mut wb = Workbook::new();
        add_partner(&mut wb, &acme()).unwrap();
        let found = find_partner(&wb, 2).unwrap();
        assert_eq!(found.budget.total(), 128_000.0);
        assert!(find_partner(&wb, 3).is_none());
    }

    #[test]
    fn duplicate_number_rejected() {
        let mut wb = Workbook::new();
        add_partner(&mut wb, &acme()).unwrap();
        let mut again = acme();
        again.acronym = "OTHER".into();
        let err = add_partner(&mut wb, &again).unwrap_err();
        assert!(matches!(err, BudgetError::DuplicatePartner(2)));
    }

    #[test]
    fn update_renames_sheet() {
        let mut wb = Workbook::new();
        add_partner(&mut wb, &acme()).unwrap();
        let mut renamed = acme();
        renamed.acronym = "ACME-EU".into();
        update_partner(&mut wb, &renamed).unwrap();
        assert!(wb.sheet("P2 ACME").is_none());
        assert!(wb.sheet("P2 ACME-EU").is_some());
    }

    #[test]
    fn remove_missing_partner_errors() {
        let mut wb = Workbook::new();
        let err = remove_partner(&mut wb, 5).unwrap_err();
        assert!(matches!(err, BudgetError::PartnerNotFound(5)));
    }
}
