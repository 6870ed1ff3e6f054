use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_direct_token_config(config_home: &Path) {
    fs::create_dir_all(config_home.join("boxup")).unwrap();
    fs::write(
        config_home.join("boxup").join("config.json"),
        r#"{ "access_token": "test-token" }"#,
    )
    .unwrap();
}

#[test]
fn generate_prints_a_sample_backup_list() {
    Command::cargo_bin("boxup")
        .unwrap()
        .arg("--generate")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("dirname")
                .and(predicate::str::contains("files"))
                .and(predicate::str::contains("ignore")),
        );
}

#[test]
fn help_prints_usage() {
    Command::cargo_bin("boxup")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn no_arguments_prints_usage_and_succeeds() {
    Command::cargo_bin("boxup")
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn an_empty_backup_list_completes_successfully() {
    let config_home = tempdir().unwrap();
    write_direct_token_config(config_home.path());

    let lists = tempdir().unwrap();
    let list_path = lists.path().join("backup_list.json");
    fs::write(&list_path, r#"{ "dirname": "backups", "files": [] }"#).unwrap();

    Command::cargo_bin("boxup")
        .unwrap()
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg(&list_path)
        .assert()
        .success();
}

#[test]
fn a_missing_backup_list_is_fatal() {
    let config_home = tempdir().unwrap();
    write_direct_token_config(config_home.path());

    Command::cargo_bin("boxup")
        .unwrap()
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg("/definitely/not/a/backup_list.json")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn a_missing_config_is_fatal() {
    let config_home = tempdir().unwrap();

    Command::cargo_bin("boxup")
        .unwrap()
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg("backup_list.json")
        .assert()
        .failure()
        .code(1);
}
