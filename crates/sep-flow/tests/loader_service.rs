use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use tempfile::tempdir;

use sep_core::{RngHandle, SepError};
use sep_flow::service::{
    estimate_cost, optimize_flowsheet, run_speciation, simulate_flowsheet, Response, Speciator,
};
use sep_flow::{
    estimate_co2e, load_flowsheet, parse_description, DescriptionFormat, Orchestrator, Phase,
    Stream,
};

const MINIMAL_YAML: &str = r#"
units:
  - id: mill_1
    type: mill
    params: {fineness_factor: 0.5}
    inputs: [feed]
    outputs: [product]
streams:
  - name: feed
    phase: solid
    psd: {bins_um: [100.0, 50.0], mass_frac: [0.5, 0.5]}
  - name: product
    phase: solid
"#;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos/steel_slag_minimal.yaml")
}

#[test]
fn demo_flowsheet_loads_and_runs() {
    let fs = load_flowsheet(&demo_path()).unwrap();
    assert_eq!(fs.name, "steel_slag_minimal");
    let summary = fs.validate_graph().unwrap();
    assert_eq!(summary.feeds, vec!["slag_feed"]);
    let report = Orchestrator::new().run_once(&fs);
    let run = report.summary().expect("demo should run");
    assert!(run.skipped().is_empty());
    assert_eq!(run.kpis["mill_1.E_specific_kWhpt"], 12.0);
    assert_eq!(run.streams["thk_underflow"].solids_wtfrac, Some(0.55));
}

#[test]
fn json_and_yaml_files_load_identically() {
    let dir = tempdir().unwrap();
    let yaml_path = dir.path().join("fs.yaml");
    fs::write(&yaml_path, MINIMAL_YAML).unwrap();
    let from_yaml = load_flowsheet(&yaml_path).unwrap();
    assert_eq!(from_yaml.name, "fs");

    let json_path = dir.path().join("fs.json");
    fs::write(&json_path, serde_json::to_string(&from_yaml).unwrap()).unwrap();
    let from_json = load_flowsheet(&json_path).unwrap();
    assert_eq!(from_yaml.units, from_json.units);
    assert_eq!(
        from_yaml.stream("feed").unwrap().psd,
        from_json.stream("feed").unwrap().psd
    );
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempdir().unwrap();
    let err = load_flowsheet(&dir.path().join("absent.yaml")).unwrap_err();
    assert_eq!(err.code(), "io-read");
}

#[test]
fn format_follows_extension() {
    assert_eq!(
        DescriptionFormat::from_path(std::path::Path::new("a/b.JSON")),
        DescriptionFormat::Json
    );
    assert_eq!(
        DescriptionFormat::from_path(std::path::Path::new("a/b.yml")),
        DescriptionFormat::Yaml
    );
}

#[test]
fn simulate_surface_maps_errors_to_status() {
    let orchestrator = Orchestrator::new();
    let ok = simulate_flowsheet(&orchestrator, MINIMAL_YAML, DescriptionFormat::Yaml);
    assert!(ok.is_ok());

    let missing = simulate_flowsheet(&orchestrator, "  ", DescriptionFormat::Yaml);
    assert_eq!(
        missing,
        Response::Error {
            error: "flowsheet description missing".into()
        }
    );

    let bad = MINIMAL_YAML.replace("fineness_factor", "fineness");
    let response = simulate_flowsheet(&orchestrator, &bad, DescriptionFormat::Yaml);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("mill_1"));
}

#[test]
fn optimize_surface_returns_perturbed_flowsheet() {
    let desc = parse_description(MINIMAL_YAML, DescriptionFormat::Yaml).unwrap();
    let response = optimize_flowsheet(&Orchestrator::new(), desc, &mut RngHandle::from_seed(5));
    let Response::Ok(payload) = response else {
        panic!("expected ok response");
    };
    let factor = payload.flowsheet.units[0].params["fineness_factor"]
        .as_f64()
        .unwrap();
    assert!((0.45..=0.55).contains(&factor));
}

#[test]
fn cost_surface_reports_opex_and_co2e() {
    let mut kpis = IndexMap::new();
    kpis.insert("mill_1.E_specific_kWhpt".to_string(), 10.0);
    kpis.insert("lims_1.mag_rec".to_string(), 0.8);
    let json = serde_json::to_value(estimate_cost(&kpis)).unwrap();
    assert_eq!(json["status"], "ok");
    assert!((json["OPEX"].as_f64().unwrap() - 10.8).abs() < 1e-12);
    assert!((json["CO2e"].as_f64().unwrap() - 4.0).abs() < 1e-12);
    assert_eq!(estimate_co2e(&kpis, 0.0), 0.0);
}

struct Neutralizer;

impl Speciator for Neutralizer {
    fn speciate(&self, stream: &Stream) -> Result<Stream, SepError> {
        let mut out = stream.clone();
        out.ph = Some(7.0);
        Ok(out)
    }
}

#[test]
fn speciation_requires_a_collaborator() {
    let stream = Stream::new("pls", Phase::Liquid);
    assert_eq!(
        run_speciation(&stream, None),
        Response::Error {
            error: "speciation collaborator not configured".into()
        }
    );
    let Response::Ok(payload) = run_speciation(&stream, Some(&Neutralizer)) else {
        panic!("expected speciated stream");
    };
    assert_eq!(payload.stream_out.ph, Some(7.0));
}
