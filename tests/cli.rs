use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tabtype::descriptor::FeatureSet;
use tabtype::kind::DataKind;
use tempfile::tempdir;

#[test]
fn probe_writes_a_loadable_feature_file() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("orders.csv");
    fs::write(&input, "id,amount,flag\n1,10.5,true\n2,11.25,false\n").expect("write input");
    let output = temp.path().join("orders-features.yml");

    cargo_bin_cmd!("tabtype")
        .args([
            "probe",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let set = FeatureSet::load(&output).expect("load features");
    let names: Vec<&str> = set.columns.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["id", "amount", "flag"]);
    assert_eq!(set.columns[1].kind(), DataKind::Float);
    assert_eq!(set.columns[2].kind(), DataKind::Boolean);
}

#[test]
fn probe_emits_json_on_request() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("plain.csv");
    fs::write(&input, "a,b\n1,x\n").expect("write input");

    let assert = cargo_bin_cmd!("tabtype")
        .args(["probe", "-i", input.to_str().unwrap(), "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8 stdout");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["columns"][1]["kind"], "string");
}

#[test]
fn probe_rejects_ragged_input() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("ragged.csv");
    fs::write(&input, "a,b\n1,2\n3\n").expect("write input");

    cargo_bin_cmd!("tabtype")
        .args(["probe", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cell(s)"));
}

#[test]
fn columns_lists_a_saved_feature_file() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("orders.csv");
    fs::write(&input, "id,amount\n1,10.5\n").expect("write input");
    let output = temp.path().join("orders-features.yml");

    cargo_bin_cmd!("tabtype")
        .args([
            "probe",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    cargo_bin_cmd!("tabtype")
        .args(["columns", "-s", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("amount").and(predicate::str::contains("float")));
}

#[test]
fn kinds_reports_masks_and_best_guesses() {
    cargo_bin_cmd!("tabtype")
        .args(["kinds", "1", "1.1", "true", "zebra"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("integer")
                .and(predicate::str::contains("double"))
                .and(predicate::str::contains("boolean"))
                .and(predicate::str::contains("zebra")),
        );
}

#[test]
fn preview_renders_converted_rows() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("orders.csv");
    fs::write(&input, "id,amount\n1,10.5\n2,11.25\n").expect("write input");

    cargo_bin_cmd!("tabtype")
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("amount")
                .and(predicate::str::contains("10.5"))
                .and(predicate::str::contains("11.25").not()),
        );
}
