use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const GRAPH_JSON: &str = r#"{
    "neurons": [
        {"id": 0, "threshold": 10, "leak": -1},
        {"id": 1, "threshold": 8},
        {"id": 2}
    ],
    "synapses": [
        {"id": 0, "source": 0, "target": 1, "weight": 5, "delay": 1},
        {"id": 1, "source": 1, "target": 2, "weight": -3, "delay": 2}
    ]
}"#;

const HARDWARE_TOML: &str = r#"
[[core]]
id = 0
neuron_capacity = 8
synapse_rows = 16
max_fanout_cores = 4

[[core]]
id = 1
neuron_capacity = 8
synapse_rows = 16
max_fanout_cores = 4
"#;

fn write_inputs(dir: &Path) -> Result<(std::path::PathBuf, std::path::PathBuf), Box<dyn Error>> {
    let graph = dir.join("graph.json");
    let hardware = dir.join("hardware.toml");
    fs::write(&graph, GRAPH_JSON)?;
    fs::write(&hardware, HARDWARE_TOML)?;
    Ok((graph, hardware))
}

#[test]
fn compile_verify_inspect() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let (graph, hardware) = write_inputs(tmp.path())?;
    let output = tmp.path().join("program.bpu");
    let report = tmp.path().join("mapping.json");

    let mut compile = Command::cargo_bin("bpuc")?;
    compile.args([
        "compile",
        graph.to_str().expect("temp path to UTF-8"),
        "--hardware",
        hardware.to_str().expect("temp path to UTF-8"),
        "--profile",
        "bpu40-32bit",
        "--output",
        output.to_str().expect("temp path to UTF-8"),
        "--report",
        report.to_str().expect("temp path to UTF-8"),
    ]);
    compile
        .assert()
        .success()
        .stdout(predicate::str::contains("5 words"));

    assert!(output.exists(), "stream file should exist");
    assert!(report.exists(), "mapping report should exist");

    let mut verify = Command::cargo_bin("bpuc")?;
    verify.args([
        "verify",
        graph.to_str().expect("temp path to UTF-8"),
        "--hardware",
        hardware.to_str().expect("temp path to UTF-8"),
        "--profile",
        "bpu40-32bit",
    ]);
    verify
        .assert()
        .success()
        .stdout(predicate::str::contains("ok for bpu40-32bit"));

    let mut inspect = Command::cargo_bin("bpuc")?;
    inspect.args(["inspect", &output.to_string_lossy()]);
    inspect
        .assert()
        .success()
        .stdout(predicate::str::contains("neuron-cfg"))
        .stdout(predicate::str::contains("synapse"));

    Ok(())
}

#[test]
fn compile_is_deterministic() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let (graph, hardware) = write_inputs(tmp.path())?;
    let first = tmp.path().join("a.bpu");
    let second = tmp.path().join("b.bpu");

    for output in [&first, &second] {
        let mut cmd = Command::cargo_bin("bpuc")?;
        cmd.args([
            "compile",
            graph.to_str().expect("temp path to UTF-8"),
            "--hardware",
            hardware.to_str().expect("temp path to UTF-8"),
            "--profile",
            "bpu28-64bit",
            "--output",
            output.to_str().expect("temp path to UTF-8"),
        ]);
        cmd.assert().success();
    }

    assert_eq!(fs::read(&first)?, fs::read(&second)?);
    Ok(())
}

#[test]
fn unknown_profile_leaves_no_output() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let (graph, hardware) = write_inputs(tmp.path())?;
    let output = tmp.path().join("program.bpu");

    let mut cmd = Command::cargo_bin("bpuc")?;
    cmd.args([
        "compile",
        graph.to_str().expect("temp path to UTF-8"),
        "--hardware",
        hardware.to_str().expect("temp path to UTF-8"),
        "--profile",
        "48bit",
        "--output",
        output.to_str().expect("temp path to UTF-8"),
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown target profile"));

    assert!(!output.exists(), "failed compile must not leave output");
    Ok(())
}

#[test]
fn profiles_lists_all_targets() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("bpuc")?;
    cmd.args(["profiles", "--detailed"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bpu40-32bit"))
        .stdout(predicate::str::contains("bpu28-64bit"))
        .stdout(predicate::str::contains("bpu28-96bit"))
        .stdout(predicate::str::contains("weight"));

    Ok(())
}

#[test]
fn capacity_error_names_core() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let graph = tmp.path().join("graph.json");
    let hardware = tmp.path().join("hardware.toml");
    fs::write(&graph, GRAPH_JSON)?;
    fs::write(
        &hardware,
        r#"
        [[core]]
        id = 0
        neuron_capacity = 1
        synapse_rows = 16
        max_fanout_cores = 4
        "#,
    )?;

    let mut cmd = Command::cargo_bin("bpuc")?;
    cmd.args([
        "compile",
        graph.to_str().expect("temp path to UTF-8"),
        "--hardware",
        hardware.to_str().expect("temp path to UTF-8"),
        "--profile",
        "bpu40-32bit",
    ]);
    cmd.current_dir(tmp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("capacity"));

    Ok(())
}
