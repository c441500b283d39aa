use pretty_assertions::assert_eq;
use sum_parameters::export::{export_csv, export_json, SummaryReport};
use sum_parameters::headless::build_selection;
use sum_parameters::model::{IfcProject, Selection};
use sum_parameters::parser::parse_ifc_str;
use sum_parameters::settings::{Settings, SettingsStore};
use sum_parameters::sum::SumSession;

const SAMPLE: &str = include_str!("fixtures/sample.ifc");

fn project() -> IfcProject {
    parse_ifc_str(SAMPLE, "sample.ifc").unwrap()
}

fn session_for(project: &IfcProject, ids: &[u64]) -> SumSession {
    let selection = Selection::from_ids(ids.iter().copied());
    let mut session = SumSession::new(Settings::default());
    session.refresh_from(&selection.view(project));
    session
}

fn rows(session: &SumSession) -> Vec<(String, String, String)> {
    session
        .summaries()
        .iter()
        .map(|s| (s.name.clone(), session.format_sum(s), s.unit_label.clone()))
        .collect()
}

fn row(name: &str, sum: &str, unit: &str) -> (String, String, String) {
    (name.to_string(), sum.to_string(), unit.to_string())
}

#[test]
fn sums_quantities_shared_by_two_walls() {
    let project = project();
    let session = session_for(&project, &[100, 101]);

    assert_eq!(
        rows(&session),
        vec![
            row("Length", "8000.00", "mm"),
            row("NetSideArea", "24.00", "m²"),
            row("NetVolume", "7.20", "m³"),
            row("ThermalTransmittance", "0.48", ""),
        ]
    );
}

#[test]
fn third_wall_narrows_common_parameters() {
    let project = project();
    let session = session_for(&project, &[100, 101, 102]);

    assert_eq!(
        rows(&session),
        vec![
            row("Length", "10500.00", "mm"),
            row("NetSideArea", "31.50", "m²"),
        ]
    );
}

#[test]
fn door_and_wall_share_no_numeric_parameter() {
    let project = project();
    let session = session_for(&project, &[110, 100]);
    assert!(session.summaries().is_empty());
}

#[test]
fn ratio_rescales_without_reading_elements() {
    let project = project();
    let mut session = session_for(&project, &[100, 101]);

    assert!(session.set_ratio(0.001));
    let length = &session.summaries()[0];
    assert_eq!(length.display_sum, 8000.0);
    assert_eq!(session.format_coefficient(length), "8.00000");
}

#[test]
fn entity_filter_selects_all_walls() {
    let project = project();
    let selection = build_selection(&project, &[], &["IfcWall".to_string()]);
    assert_eq!(selection.ids(), &[100, 101, 102]);
}

#[test]
fn exports_summary_table() {
    let project = project();
    let ids = [100, 101];
    let session = session_for(&project, &ids);
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("summary.csv");
    export_csv(&session, &csv_path).unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(vec!["Parameter", "Sum", "Unit", "Ratio", "Coefficient"])
    );
    assert_eq!(records.len(), 4);
    assert_eq!(
        records[0],
        csv::StringRecord::from(vec!["Length", "8000.00", "mm", "1", "8000.00"])
    );

    let json_path = dir.path().join("summary.json");
    let report = SummaryReport::new("sample.ifc", &ids, &session);
    export_json(&report, &json_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["source"], "sample.ifc");
    assert_eq!(json["elementIds"], serde_json::json!([100, 101]));
    assert_eq!(json["selectedRatio"], 1.0);
    assert_eq!(json["valueRounding"], 2);
    assert_eq!(json["parameters"][1]["name"], "NetSideArea");
    assert_eq!(json["parameters"][1]["unitLabel"], "m²");
}

#[test]
fn settings_survive_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));
    assert_eq!(store.load().unwrap(), None);

    let mut session = SumSession::new(Settings::default());
    session.next_ratio();
    session.set_rounding(4);
    store.save(&session.settings()).unwrap();

    let restored = SumSession::new(store.load().unwrap().unwrap_or_default());
    assert_eq!(restored.ratio(), 10.0);
    assert_eq!(restored.rounding(), 4);
}
