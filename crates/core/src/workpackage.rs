// crates/core/src/workpackage.rs
//! Work packages, stored as rows of the shared `Workpackages` sheet.
//!
//! The sheet carries one fixed header row followed by one row per work
//! package, keyed by the id in the first column.

use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, Result};
use crate::sheet::{CellValue, Sheet, Workbook};
use crate::validation;

pub const WORKPACKAGES_SHEET: &str = "Workpackages";

const HEADER: [&str; 6] = [
    "ID",
    "Title",
    "Lead Partner",
    "Start Month",
    "End Month",
    "Person Months",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPackage {
    pub id: String,
    pub title: String,
    pub lead_partner: u16,
    pub start_month: u32,
    pub end_month: u32,
    pub person_months: f64,
}

impl WorkPackage {
    fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(&*self.id),
            CellValue::text(&*self.title),
            CellValue::number(f64::from(self.lead_partner)),
            CellValue::number(f64::from(self.start_month)),
            CellValue::number(f64::from(self.end_month)),
            CellValue::number(self.person_months),
        ]
    }

    fn from_row(sheet_name: &str, index: usize, row: &[CellValue]) -> Result<Self> {
        let malformed = |reason: &str| BudgetError::MalformedRow {
            sheet: sheet_name.to_string(),
            row: index,
            reason: reason.to_string(),
        };
        let text = |col: usize, what: &str| {
            row.get(col)
                .and_then(CellValue::as_text)
                .map(str::to_string)
                .ok_or_else(|| malformed(what))
        };
        let number = |col: usize, what: &str| {
            row.get(col)
                .and_then(CellValue::as_number)
                .ok_or_else(|| malformed(what))
        };
        let integer = |col: usize, what: &str| -> Result<u32> {
            let n = number(col, what)?;
            if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
                return Err(malformed(what));
            }
            Ok(n as u32)
        };
        let lead = integer(2, "lead partner is not a partner number")?;
        Ok(Self {
            id: text(0, "missing id")?,
            title: text(1, "missing title")?,
            lead_partner: u16::try_from(lead)
                .map_err(|_| malformed("lead partner is not a partner number"))?,
            start_month: integer(3, "start month is not a month")?,
            end_month: integer(4, "end month is not a month")?,
            person_months: number(5, "person months is not a number")?,
        })
    }
}

fn sheet_with_header(workbook: &mut Workbook) -> &mut Sheet {
    if workbook.sheet(WORKPACKAGES_SHEET).is_none() {
        let mut sheet = Sheet::new(WORKPACKAGES_SHEET);
        sheet.append_row(HEADER.iter().map(|h| CellValue::text(*h)));
        // Only fails on a duplicate name, which the guard above rules out.
        let _ = workbook.add_sheet(sheet);
    }
    workbook
        .sheet_mut(WORKPACKAGES_SHEET)
        .unwrap_or_else(|| unreachable!("sheet created above"))
}

fn find_row(sheet: &Sheet, id: &str) -> Option<usize> {
    (1..sheet.row_count()).find(|&i| {
        sheet.cell(i, 0).and_then(CellValue::as_text) == Some(id)
    })
}

/// Append a work package, creating the sheet (with header) on first use.
///
/// # Errors
///
/// Fails on invalid fields or a duplicate id.
pub fn add_workpackage(workbook: &mut Workbook, wp: &WorkPackage) -> Result<()> {
    validation::validate_workpackage(wp)?;
    let sheet = sheet_with_header(workbook);
    if find_row(sheet, &wp.id).is_some() {
        return Err(BudgetError::DuplicateWorkPackage(wp.id.clone()));
    }
    sheet.append_row(wp.to_row());
    log::info!("added work package {} ({})", wp.id, wp.title);
    Ok(())
}

/// Rewrite the row for `wp.id` in place.
pub fn update_workpackage(workbook: &mut Workbook, wp: &WorkPackage) -> Result<()> {
    validation::validate_workpackage(wp)?;
    let sheet = workbook
        .sheet_mut(WORKPACKAGES_SHEET)
        .ok_or_else(|| BudgetError::WorkPackageNotFound(wp.id.clone()))?;
    let row = find_row(sheet, &wp.id)
        .ok_or_else(|| BudgetError::WorkPackageNotFound(wp.id.clone()))?;
    for (col, value) in wp.to_row().into_iter().enumerate() {
        sheet.set_cell(row, col, value);
    }
    Ok(())
}

/// Remove the row for `id`, returning the removed record.
pub fn remove_workpackage(workbook: &mut Workbook, id: &str) -> Result<WorkPackage> {
    let sheet = workbook
        .sheet_mut(WORKPACKAGES_SHEET)
        .ok_or_else(|| BudgetError::WorkPackageNotFound(id.to_string()))?;
    let row = find_row(sheet, id)
        .ok_or_else(|| BudgetError::WorkPackageNotFound(id.to_string()))?;
    let cells = sheet
        .remove_row(row)
        .unwrap_or_else(|| unreachable!("row index from find_row"));
    WorkPackage::from_row(WORKPACKAGES_SHEET, row, &cells)
}

/// All work packages in sheet order. A missing sheet means none yet.
///
/// # Errors
///
/// Fails on rows that do not parse; the sheet is user-visible data and a
/// silently skipped row would hide corruption.
pub fn list_workpackages(workbook: &Workbook) -> Result<Vec<WorkPackage>> {
    let Some(sheet) = workbook.sheet(WORKPACKAGES_SHEET) else {
        return Ok(Vec::new());
    };
    (1..sheet.row_count())
        .map(|i| {
            let row = sheet.row(i).unwrap_or_default();
            WorkPackage::from_row(&sheet.name, i, row)
        })
        .collect()
}
