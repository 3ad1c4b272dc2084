use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BASE_ANSWER: &str = "0) Nom de la société : Acme Re\n\
                           1) SCR : 1 234,5 M€\n\
                           2) MCR : Non disponible\n\
                           3) Ratio de solvabilité : 215,4 %\n";

fn sfcr() -> Command {
    Command::cargo_bin("sfcr").unwrap()
}

fn write_answer(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn parse_base_answer_as_text() {
    let dir = TempDir::new().unwrap();
    let answer = write_answer(&dir, "base.txt", BASE_ANSWER);

    sfcr()
        .args(["parse", "--schema", "base"])
        .arg(&answer)
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Re"))
        .stdout(predicate::str::contains("1 234 500 000,00 €"))
        .stdout(predicate::str::contains("215,40 %"))
        .stdout(predicate::str::is_match(r"MCR \(€\)\s+-\n").unwrap());
}

#[test]
fn parse_uses_configured_unavailable_marker() {
    let dir = TempDir::new().unwrap();
    let answer = write_answer(&dir, "base.txt", BASE_ANSWER);
    let config = write_answer(&dir, "config.json", r#"{"report": {"unavailable_marker": "N/D"}}"#);

    sfcr()
        .arg("--config")
        .arg(&config)
        .args(["parse", "--schema", "base"])
        .arg(&answer)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"MCR \(€\)\s+N/D\n").unwrap());
}

#[test]
fn parse_base_answer_as_json() {
    let dir = TempDir::new().unwrap();
    let answer = write_answer(&dir, "base.txt", BASE_ANSWER);

    sfcr()
        .args(["parse", "--schema", "base_metrics", "--format", "json"])
        .arg(&answer)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scr\": \"1234500000\""))
        .stdout(predicate::str::contains("\"scr\": \"strict\""));
}

#[test]
fn parse_from_stdin_as_csv() {
    sfcr()
        .args(["parse", "--schema", "assets", "--format", "csv", "-"])
        .write_stdin("2) Obligations : 100 €\n6) Immobilier : 50 €\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total des actifs (€)"))
        .stdout(predicate::str::contains(",150,100,"));
}

#[test]
fn parse_reports_malformed_amounts() {
    let dir = TempDir::new().unwrap();
    let answer = write_answer(&dir, "assets.txt", "2) Obligations : 1.234.567 €\n");

    sfcr()
        .args(["parse", "--schema", "actifs"])
        .arg(&answer)
        .assert()
        .success()
        .stdout(predicate::str::contains("unparseable amount"))
        .stderr(predicate::str::contains("1 warning(s)"));
}

#[test]
fn parse_rejects_unknown_schema() {
    sfcr()
        .args(["parse", "--schema", "bilan", "-"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown schema"));
}

#[test]
fn parse_missing_file_fails() {
    sfcr()
        .args(["parse", "--schema", "scr", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn ask_lists_presets_offline() {
    sfcr()
        .args(["ask", "--list-presets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyse du ratio de solvabilité"));
}

#[test]
fn process_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    let pdf = write_answer(&dir, "rapport.pdf", "%PDF-1.4");
    let config = write_answer(
        &dir,
        "config.json",
        r#"{"service": {"api_key_env": "SFCR_CLI_TEST_NO_SUCH_KEY"}}"#,
    );

    sfcr()
        .arg("--config")
        .arg(&config)
        .arg("process")
        .arg(&pdf)
        .env_remove("SFCR_CLI_TEST_NO_SUCH_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing API key"));
}
