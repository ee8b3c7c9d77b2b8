//! End-to-end tests for the `medirec` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use medirec_index::{ClassId, DiseaseLabelIndex, SymptomIndex};
use medirec_model::{LinearModel, LinearOneVsRest, ModelExport};
use tempfile::tempdir;

fn medirec(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_medirec"))
        .args(args)
        .env_remove("MEDIREC_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run medirec")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

/// Fungal infection (15) wins on itching/skin_rash; everything else ties at 0
/// and falls to class 0.
fn export() -> ModelExport {
    let symptoms = SymptomIndex::builtin();
    let classes: Vec<ClassId> = DiseaseLabelIndex::builtin().iter().map(|(id, _)| id).collect();
    let mut weights = vec![vec![0.0; symptoms.len()]; classes.len()];
    weights[15][0] = 1.0;
    weights[15][1] = 1.0;
    ModelExport {
        name: "cli-fixture".to_string(),
        model: LinearModel::OneVsRest(LinearOneVsRest {
            intercepts: vec![0.0; classes.len()],
            classes,
            weights,
        }),
    }
}

fn write_dataset(dir: &Path) {
    fs::write(
        dir.join("description.csv"),
        "Disease,Description\nFungal infection,Fungal infection is a common skin condition caused by fungi.\n",
    )
    .unwrap();
    fs::write(
        dir.join("precautions_df.csv"),
        ",Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4\n0,Fungal infection,bath twice,,keep infected area dry,use clean cloths\n",
    )
    .unwrap();
    fs::write(dir.join("medications.csv"), "Disease,Medication\nFungal infection,Fluconazole\n").unwrap();
    fs::write(dir.join("diets.csv"), "Disease,Diet\nFungal infection,Probiotics\n").unwrap();
    fs::write(dir.join("workout_df.csv"), ",disease,workout\n0,Fungal infection,Avoid sugary foods\n").unwrap();
}

/// Returns (data dir, artifact path) after packing through the CLI.
fn setup(root: &Path) -> (String, String) {
    let data = root.join("dataset");
    fs::create_dir_all(&data).unwrap();
    write_dataset(&data);

    let export_path = root.join("export.json");
    fs::write(&export_path, serde_json::to_string(&export()).unwrap()).unwrap();
    let artifact = root.join("svc.mrxa");

    let out = medirec(&[
        "model",
        "pack",
        export_path.to_str().unwrap(),
        "--out",
        artifact.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "pack failed: {}", String::from_utf8_lossy(&out.stderr));
    assert!(artifact.exists());

    (
        data.to_str().unwrap().to_string(),
        artifact.to_str().unwrap().to_string(),
    )
}

#[test]
fn predict_json_reports_the_recommendation() {
    let dir = tempdir().unwrap();
    let (data, model) = setup(dir.path());

    let out = medirec(&[
        "--data-dir",
        &data,
        "--model",
        &model,
        "predict",
        "itching, skin_rash, purple_toes",
        "--json",
        "--explain",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["status"], "recommended");
    assert_eq!(json["disease"], "Fungal infection");
    assert_eq!(
        json["precautions"],
        serde_json::json!(["bath twice", "keep infected area dry", "use clean cloths"])
    );
    assert_eq!(json["workouts"], serde_json::json!(["Avoid sugary foods"]));
    assert_eq!(json["encoding"]["ignored"], serde_json::json!(["purple_toes"]));
}

#[test]
fn predict_placeholder_prints_the_validation_message() {
    let dir = tempdir().unwrap();
    let (data, model) = setup(dir.path());

    let out = medirec(&["--data-dir", &data, "--model", &model, "predict", "Symptoms"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Please provide valid symptoms."));
}

#[test]
fn check_fails_without_an_artifact() {
    let dir = tempdir().unwrap();
    let (data, _model) = setup(dir.path());
    let missing = dir.path().join("nope.mrxa");

    let out = medirec(&["--data-dir", &data, "--model", missing.to_str().unwrap(), "check"]);
    assert!(!out.status.success());
}

#[test]
fn check_reports_loaded_tables() {
    let dir = tempdir().unwrap();
    let (data, model) = setup(dir.path());

    let out = medirec(&["--data-dir", &data, "--model", &model, "check"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("symptoms:  132"));
    assert!(text.contains("workouts:"));
}

#[test]
fn config_file_supplies_paths() {
    let dir = tempdir().unwrap();
    let (data, model) = setup(dir.path());
    let config = dir.path().join("medirec.json");
    fs::write(
        &config,
        serde_json::json!({ "data_dir": data, "model_path": model }).to_string(),
    )
    .unwrap();

    let out = medirec(&["--config", config.to_str().unwrap(), "predict", "itching", "--json"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["disease"], "Fungal infection");
}

#[test]
fn inspect_verifies_against_indices() {
    let dir = tempdir().unwrap();
    let (_data, model) = setup(dir.path());

    let out = medirec(&["model", "inspect", &model, "--check-indices"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("cli-fixture"));
    assert!(text.contains("Indices match"));
}

#[test]
fn symptoms_lists_the_vocabulary_in_order() {
    let out = medirec(&["symptoms", "--json"]);
    assert!(out.status.success());
    let names: Vec<String> = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(names.len(), 132);
    assert_eq!(names[0], "itching");
    assert_eq!(names[131], "yellow_crust_ooze");
}
