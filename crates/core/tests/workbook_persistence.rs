use budgetinator_core::partner::{self, BudgetLines, Partner};
use budgetinator_core::schema::ensure_current;
use budgetinator_core::storage::{SUMMARY_SHEET, load_workbook, new_workbook, save_workbook};
use budgetinator_core::workpackage::{self, WorkPackage};
use budgetinator_core::{SchemaVersion, UpgradeRegistry, VersionInfo};

fn sample_partner() -> Partner {
    Partner {
        number: 3,
        acronym: "UNI-X".into(),
        name: "University of Example".into(),
        country: "FR".into(),
        budget: BudgetLines {
            personnel: 95_000.0,
            travel: 4_500.0,
            ..Default::default()
        },
    }
}

#[test]
fn edited_workbook_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");

    let mut wb = new_workbook(&VersionInfo::current());
    partner::add_partner(&mut wb, &sample_partner()).unwrap();
    workpackage::add_workpackage(
        &mut wb,
        &WorkPackage {
            id: "WP2".into(),
            title: "Dissemination".into(),
            lead_partner: 3,
            start_month: 4,
            end_month: 30,
            person_months: 7.5,
        },
    )
    .unwrap();

    save_workbook(&path, &wb).unwrap();
    let loaded = load_workbook(&path).unwrap();
    assert_eq!(loaded, wb);
    assert_eq!(partner::list_partners(&loaded).len(), 1);
    assert_eq!(workpackage::list_workpackages(&loaded).unwrap().len(), 1);
}

#[test]
fn upgraded_workbook_persists_the_new_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");

    let mut wb = new_workbook(&VersionInfo::current());
    let v2_build = VersionInfo::new("1.1.0", SchemaVersion::new("v2"));
    let registry = UpgradeRegistry::builtin();

    let summary = wb.sheet_mut(SUMMARY_SHEET).unwrap();
    let report = ensure_current(summary, &v2_build, &registry).unwrap();
    assert!(report.upgraded());

    save_workbook(&path, &wb).unwrap();
    let loaded = load_workbook(&path).unwrap();
    let summary = loaded.sheet(SUMMARY_SHEET).unwrap();
    assert_eq!(
        budgetinator_core::schema::recorded_version(summary),
        Some(SchemaVersion::new("v2"))
    );
}
