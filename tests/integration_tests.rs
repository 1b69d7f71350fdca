use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::path::Path;

mod common;
use common::{init_lodge, rti, setup_test_db, temp_out};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("init_creates_database");

    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(Path::new(&db_path).exists());
}

#[test]
fn test_init_twice_applies_no_new_migrations() {
    let db_path = setup_test_db("init_twice");

    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("(0 migrations applied)"));
}

#[test]
fn test_brother_add_and_list() {
    let db_path = setup_test_db("brother_add_list");
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "brother", "list"])
        .assert()
        .success()
        .stdout(contains("Joao Silva"))
        .stdout(contains("pedro@loja.org"))
        .stdout(contains("Tiago Lima"));
}

#[test]
fn test_brother_duplicate_email_is_rejected() {
    let db_path = setup_test_db("brother_duplicate_email");
    init_lodge(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "brother",
            "add",
            "Outro Joao",
            "--email",
            "JOAO@loja.org",
        ])
        .assert()
        .failure()
        .stderr(contains("ja cadastrado"));
}

#[test]
fn test_deactivated_brother_is_hidden_from_default_list() {
    let db_path = setup_test_db("brother_deactivate");
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "brother", "deactivate", "tiago@loja.org"])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "brother", "list"])
        .assert()
        .success()
        .stdout(contains("Tiago Lima").not());

    rti()
        .args(["--db", &db_path, "brother", "list", "--all"])
        .assert()
        .success()
        .stdout(contains("Tiago Lima"));
}

#[test]
fn test_db_check_and_info() {
    let db_path = setup_test_db("db_check_info");
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "db", "--check", "--info"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"))
        .stdout(contains("Brothers:"));
}

#[test]
fn test_log_records_operations() {
    let db_path = setup_test_db("log_records_operations");
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("brother_add"))
        .stdout(contains("migration_applied"));
}

#[test]
fn test_backup_refuses_to_overwrite_without_force() {
    let db_path = setup_test_db("backup_force");
    let backup = temp_out("backup_force", "sqlite");
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "backup", "--file", &backup])
        .assert()
        .success()
        .stdout(contains("Backup created"));
    assert!(Path::new(&backup).exists());

    rti()
        .args(["--db", &db_path, "backup", "--file", &backup])
        .assert()
        .failure()
        .stderr(contains("--force"));

    rti()
        .args(["--db", &db_path, "backup", "--file", &backup, "--force"])
        .assert()
        .success();
}

#[test]
fn test_backup_compressed() {
    let db_path = setup_test_db("backup_zip");
    let backup = temp_out("backup_zip", "sqlite");
    std::fs::remove_file(Path::new(&backup).with_extension("zip")).ok();
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "backup", "--file", &backup, "--compress"])
        .assert()
        .success();

    assert!(Path::new(&backup).with_extension("zip").exists());
}

#[test]
fn test_compressed_backup_keeps_existing_file_at_target() {
    let db_path = setup_test_db("backup_zip_keep");
    let target = temp_out("backup_zip_keep", "sqlite");
    std::fs::remove_file(Path::new(&target).with_extension("zip")).ok();
    std::fs::write(&target, "not a backup").unwrap();
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "backup", "--file", &target, "--compress"])
        .assert()
        .success();

    assert!(Path::new(&target).with_extension("zip").exists());
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "not a backup");
}

#[test]
fn test_backup_onto_the_database_is_refused() {
    let db_path = setup_test_db("backup_onto_db");
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "backup", "--file", &db_path, "--force"])
        .assert()
        .failure()
        .stderr(contains("the database itself"));

    rti()
        .args(["--db", &db_path, "brother", "list"])
        .assert()
        .success()
        .stdout(contains("Joao Silva"));
}
