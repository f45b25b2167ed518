//! Integration tests for the veriflash binary.
//!
//! These tests verify end-to-end behavior including:
//! - Catalog editing and persistence
//! - Scripted quiz and recall sessions
//! - Backup import/export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from the user's config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("veriflash"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

/// Import a catalog given as JSON text
fn import_json(temp_dir: &TempDir, json: &str) {
    let backup = temp_dir.path().join("backup.json");
    fs::write(&backup, json).unwrap();
    cli(temp_dir).arg("import").arg(&backup).assert().success();
}

fn read_catalog(temp_dir: &TempDir) -> serde_json::Value {
    let path = temp_dir.path().join("data").join("catalog.json");
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

const PARIS_ONLY: &str =
    r#"[{"id": "col-1", "title": "Capital of France", "words": [{"id": "w-2", "text": "Paris", "isRight": true}]}]"#;

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("spot the right answer"));
}

#[test]
fn test_config_messages_are_logged() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .env("RUST_LOG", "info")
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("No config file found"));
}

#[test]
fn test_config_log_level_applies() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config").join("veriflash");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[log]\nlevel = \"info\"\n").unwrap();

    cli(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("No catalog file found"));

    // The default level stays quiet
    fs::remove_file(config_dir.join("config.toml")).unwrap();
    cli(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_list_shows_default_catalog() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Capital of France"))
        .stdout(predicate::str::contains("✓ Paris"))
        .stdout(predicate::str::contains("Fastest Land Animal"));
}

#[test]
fn test_add_category_persists() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("add-category")
        .arg("Largest Ocean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added category 'Largest Ocean'"));

    let catalog = read_catalog(&temp_dir);
    let categories = catalog.as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[2]["title"], "Largest Ocean");
    assert_eq!(categories[2]["words"][0]["isRight"], true);

    cli(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Option 1"));
}

#[test]
fn test_set_correct_clears_siblings() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["set-correct", "Capital of France", "lyon"])
        .assert()
        .success();

    let catalog = read_catalog(&temp_dir);
    let words = catalog[0]["words"].as_array().unwrap();
    let flagged: Vec<_> = words
        .iter()
        .filter(|w| w["isRight"] == true)
        .map(|w| w["text"].as_str().unwrap())
        .collect();
    assert_eq!(flagged, vec!["Lyon"]);
}

#[test]
fn test_word_editing() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["add-word", "col-2", "Horse"])
        .assert()
        .success();
    cli(&temp_dir)
        .args(["remove-word", "col-2", "Lion"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'Lion'"));

    let catalog = read_catalog(&temp_dir);
    let texts: Vec<_> = catalog[1]["words"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, vec!["Cheetah", "Horse"]);
}

#[test]
fn test_unknown_category_fails() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["remove-category", "Largest Desert"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnknownCategory"));

    // Nothing was written for the failed edit
    assert!(!temp_dir.path().join("data").join("catalog.json").exists());
}

#[test]
fn test_edit_refuses_corrupted_catalog() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    let path = data_dir.join("catalog.json");
    let contents = r#"[{"id": "mine", "title": "My 300 cards", "words": [],}]"#;
    fs::write(&path, contents).unwrap();

    cli(&temp_dir)
        .args(["add-word", "col-2", "Horse"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Json"));
    assert_eq!(fs::read_to_string(&path).unwrap(), contents);

    // Importing over it keeps the damaged file aside
    import_json(&temp_dir, PARIS_ONLY);
    assert_eq!(
        fs::read_to_string(data_dir.join("catalog.json.corrupt")).unwrap(),
        contents
    );
}

#[test]
fn test_quiz_single_card() {
    let temp_dir = setup_test_dir();
    import_json(&temp_dir, PARIS_ONLY);

    cli(&temp_dir)
        .arg("quiz")
        .write_stdin("y\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Category: Capital of France"))
        .stdout(predicate::str::contains("Cards remaining: 1 / 1"))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Session Complete!"))
        .stdout(predicate::str::contains("Score: 100%"));
}

#[test]
fn test_quiz_wrong_answer_repeats_card() {
    let temp_dir = setup_test_dir();
    import_json(&temp_dir, PARIS_ONLY);

    cli(&temp_dir)
        .arg("quiz")
        .write_stdin("n\n\ny\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Oops!"))
        .stdout(predicate::str::contains("The correct answer is Paris"))
        .stdout(predicate::str::contains("Score: 50%"))
        .stdout(predicate::str::contains("Streak: 1"));
}

#[test]
fn test_quiz_restart() {
    let temp_dir = setup_test_dir();
    import_json(&temp_dir, PARIS_ONLY);

    let output = cli(&temp_dir)
        .arg("quiz")
        .write_stdin("y\n\nr\ny\n\n\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8_lossy(&output);
    assert_eq!(stdout.matches("Session Complete!").count(), 2);
}

#[test]
fn test_quiz_stops_at_end_of_input() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["--seed", "7", "quiz"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cards remaining: 5 / 5"));
}

#[test]
fn test_quiz_without_data() {
    let temp_dir = setup_test_dir();
    import_json(&temp_dir, "[]");

    cli(&temp_dir)
        .arg("quiz")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not enough data"));
}

#[test]
fn test_recall_with_hint() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["recall", "--category", "capital of france"])
        .write_stdin("?\nLille\n paris \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Capital of France: type the 1 right answer(s)"))
        .stdout(predicate::str::contains("Maybe..."))
        .stdout(predicate::str::contains("Not an answer"))
        .stdout(predicate::str::contains("All answers recalled: Paris"));
}

#[test]
fn test_recall_rejects_category_without_answer() {
    let temp_dir = setup_test_dir();
    import_json(
        &temp_dir,
        r#"[{"title": "Unanswered", "words": [{"text": "Maybe"}]}]"#,
    );

    cli(&temp_dir)
        .args(["recall", "--category", "Unanswered"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no correct word"));
}

#[test]
fn test_import_rejects_non_array() {
    let temp_dir = setup_test_dir();
    let backup = temp_dir.path().join("backup.json");
    fs::write(&backup, r#"{"title": "Not a list"}"#).unwrap();

    cli(&temp_dir)
        .arg("import")
        .arg(&backup)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be an array"));
}

#[test]
fn test_import_assigns_ids() {
    let temp_dir = setup_test_dir();
    import_json(
        &temp_dir,
        r#"[{"title": "Largest Planet", "words": [{"text": "Jupiter", "isRight": true}]}]"#,
    );

    let catalog = read_catalog(&temp_dir);
    assert!(!catalog[0]["id"].as_str().unwrap().is_empty());
    assert!(!catalog[0]["words"][0]["id"].as_str().unwrap().is_empty());
}

#[test]
fn test_export_writes_dated_backup() {
    let temp_dir = setup_test_dir();
    let out_dir = temp_dir.path().join("backups");

    cli(&temp_dir)
        .arg("export")
        .arg("--dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("veriflash-backup-"));

    let backups: Vec<_> = fs::read_dir(&out_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    assert_eq!(backups.len(), 1);
    assert!(is_catalog_file(&backups[0]));
}

fn is_catalog_file(path: &Path) -> bool {
    let contents = fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    value.as_array().map_or(false, |a| a.len() == 2)
}
