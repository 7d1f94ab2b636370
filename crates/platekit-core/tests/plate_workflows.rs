use platekit::core::io::layout::{build_from_text_tables, read_layout};
use platekit::core::io::sheet::SheetDirSink;
use platekit::core::io::traits::ExportSink;
use platekit::core::models::address::WellAddress;
use platekit::core::models::category::Category;
use platekit::core::models::well::WellResult;
use platekit::core::store::PlateStore;
use platekit::engine::assign::{assign, assign_selection, assign_text};
use platekit::engine::config::{ClassificationConfigBuilder, ThresholdMethod};
use platekit::engine::error::EngineError;
use platekit::engine::progress::ProgressReporter;
use platekit::workflows::{analyze, save};
use tempfile::tempdir;

fn addr(text: &str) -> WellAddress {
    WellAddress::parse(text).unwrap()
}

const NAMES: &str = "blank blank ctrl ctrl donor-1 donor-2\nkpos buffer";
const VALUES: &str = "0.2 0.2 0.3 0.5 0.9 0.35\n2.0 0.25";

#[test]
fn pasted_tables_are_categorized_analyzed_saved_and_fetched() {
    let mut plate = build_from_text_tables("run-1", NAMES, VALUES).unwrap();
    assign_text(&mut plate, Category::SubstrateBlank, "A1 A2", None);
    assign_text(&mut plate, Category::NegativeHealthy, "A3, A4", Some("pool-7"));
    assign_text(&mut plate, Category::PositiveControl, "B1", None);
    assign_text(&mut plate, Category::NegativeBuffer, "B2", None);

    let config = ClassificationConfigBuilder::new()
        .method(ThresholdMethod::StandardDeviation)
        .multiplier_text("")
        .build()
        .unwrap();
    let summary = analyze::run(&mut plate, &config, &ProgressReporter::new()).unwrap();

    // Controls normalize to 0.1 and 0.3: mean 0.2, sample sd ~0.1414.
    assert!((summary.normalization.blank - 0.2).abs() < 1e-9);
    assert!((summary.threshold - (0.2 + 0.02f64.sqrt())).abs() < 1e-9);
    assert_eq!(plate.well(addr("A5")).result(), Some(WellResult::Positive));
    assert_eq!(plate.well(addr("A6")).result(), Some(WellResult::Negative));
    assert_eq!(plate.well(addr("B1")).result(), Some(WellResult::Positive));
    assert_eq!(plate.well(addr("C1")).result(), None);

    let dir = tempdir().unwrap();
    let mut store = PlateStore::open(dir.path().join("elisa.db")).unwrap();
    let sheet = SheetDirSink::new(dir.path().join("sheets"));
    let sinks: [&dyn ExportSink; 1] = [&sheet];
    let report = save::run(&plate, &mut store, &sinks, true, &ProgressReporter::new()).unwrap();

    assert!(report.warnings.is_empty());
    let csv = std::fs::read_to_string(&report.exports[0].location).unwrap();
    assert!(csv.starts_with("plate,well,sample,value,category,serum,normalized,result\n"));
    assert!(csv.contains("run-1,A3,ctrl,0.3,K- healthy,pool-7,"));

    let stored = store.fetch_latest("run-1").unwrap().unwrap();
    assert_eq!(stored.id, report.plate_id);
    assert_eq!(stored.plate, plate);
}

#[test]
fn later_assignments_override_earlier_ones_and_reset_results() {
    let mut plate = build_from_text_tables("run-2", NAMES, VALUES).unwrap();
    assign_text(&mut plate, Category::SubstrateBlank, "A1 A2", None);
    assign_text(&mut plate, Category::NegativeHealthy, "A3 A4", None);
    let config = ClassificationConfigBuilder::new()
        .method(ThresholdMethod::Multiplier)
        .multiplier(2.0)
        .build()
        .unwrap();
    analyze::run(&mut plate, &config, &ProgressReporter::new()).unwrap();
    assert!(plate.has_results());

    // Selecting A4 as a positive control moves it out of the negative-control set.
    assign_selection(&mut plate, Category::PositiveControl, [(0, 3)], None);

    assert_eq!(plate.well(addr("A4")).category(), Category::PositiveControl);
    assert!(!plate.has_results());
    assert!(!plate.has_normalized_values());

    let summary = analyze::run(&mut plate, &config, &ProgressReporter::new()).unwrap();
    assert_eq!(summary.control_count, 1);
    assert!((summary.threshold - 0.2).abs() < 1e-9);
}

#[test]
fn analysis_without_negative_controls_reports_no_control_data() {
    let mut plate = build_from_text_tables("run-3", NAMES, VALUES).unwrap();
    assign(&mut plate, Category::SubstrateBlank, [addr("A1")], None);
    let config = ClassificationConfigBuilder::new()
        .method(ThresholdMethod::StandardDeviation)
        .build()
        .unwrap();

    let result = analyze::run(&mut plate, &config, &ProgressReporter::new());

    assert_eq!(result, Err(EngineError::NoControlData));
    assert!(!plate.has_results());
}

#[test]
fn csv_layout_assignments_feed_the_analysis() {
    let csv = "well,sample,value,category,serum\n\
               A1,blank,0.1,substrate blank,\n\
               A2,ctrl,0.2,K- healthy,\n\
               A3,ctrl,0.4,K- healthy,\n\
               A4,donor,1.1,,D-17\n";
    let (mut plate, assignments) = read_layout(csv.as_bytes()).unwrap().into_plate("layout");
    for a in &assignments {
        assign(&mut plate, a.category, [a.well], a.label.as_deref());
    }

    let config = ClassificationConfigBuilder::new()
        .method(ThresholdMethod::StandardDeviation)
        .multiplier(3.0)
        .build()
        .unwrap();
    analyze::run(&mut plate, &config, &ProgressReporter::new()).unwrap();

    assert_eq!(plate.well(addr("A4")).label(), Some("D-17"));
    assert_eq!(plate.well(addr("A4")).category(), Category::Unassigned);
    assert_eq!(plate.well(addr("A4")).result(), Some(WellResult::Positive));
}
