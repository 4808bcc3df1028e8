use budgetinator_core::schema::{ensure_current, recorded_version, upgrade_v1_to_v2};
use budgetinator_core::{
    CellValue, SchemaVersion, Sheet, UpgradeOutcome, UpgradeRegistry, VersionInfo,
};
use proptest::prelude::*;

fn v1_summary() -> Sheet {
    Sheet::with_rows(
        "Summary",
        vec![
            vec![CellValue::text("Setting"), CellValue::text("Value")],
            vec![CellValue::text("Schema_Version"), CellValue::text("v1")],
        ],
    )
}

#[test]
fn ensure_current_upgrades_to_the_build_schema() {
    // A build that expects v2 upgrades a v1 workbook on sight.
    let info = VersionInfo::new("1.1.0", SchemaVersion::new("v2"));
    let registry = UpgradeRegistry::builtin();
    let mut sheet = v1_summary();

    let report = ensure_current(&mut sheet, &info, &registry).unwrap();
    assert!(report.upgraded());
    assert_eq!(report.message, "Schema upgraded: v1 ➜ v2");
    assert_eq!(recorded_version(&sheet), Some(SchemaVersion::new("v2")));
    assert_eq!(
        sheet.last_row().unwrap().first().and_then(CellValue::as_text),
        Some("Data_Hash")
    );
}

#[test]
fn ensure_current_on_a_current_workbook_is_a_noop() {
    let info = VersionInfo::current();
    let registry = UpgradeRegistry::builtin();
    let mut sheet = v1_summary();
    let before = sheet.clone();

    let report = ensure_current(&mut sheet, &info, &registry).unwrap();
    assert_eq!(report.outcome, UpgradeOutcome::AlreadyCurrent);
    assert_eq!(sheet, before);
}

#[test]
fn transform_survives_extra_rows_below_the_version_row() {
    let mut sheet = v1_summary();
    sheet.append_row(vec![CellValue::text("Project"), CellValue::text("Demo")]);
    upgrade_v1_to_v2(&mut sheet).unwrap();
    assert_eq!(recorded_version(&sheet), Some(SchemaVersion::new("v2")));
}

proptest! {
    // Any pair without a registered transform leaves the sheet alone and
    // reports the no-path message.
    #[test]
    fn unregistered_pairs_are_noops(
        from in "[a-z][a-z0-9]{0,6}",
        to in "[a-z][a-z0-9]{0,6}",
    ) {
        prop_assume!(!(from == "v1" && to == "v2"));
        let registry = UpgradeRegistry::builtin();
        let mut sheet = v1_summary();
        let before = sheet.clone();

        let report = registry
            .apply(
                &mut sheet,
                &SchemaVersion::new(from.as_str()),
                &SchemaVersion::new(to.as_str()),
            )
            .unwrap();
        prop_assert!(report.message.contains("No upgrade path"));
        prop_assert_ne!(report.outcome, UpgradeOutcome::Upgraded);
        prop_assert_eq!(&sheet, &before);
    }
}
