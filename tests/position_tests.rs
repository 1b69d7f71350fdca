use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_lodge, rti, rti_in, setup_test_db, temp_home};

fn assign(db_path: &str, position: &str, holder: &str) {
    rti()
        .args([
            "--db",
            db_path,
            "position",
            "assign",
            position,
            holder,
            "--from",
            "2025-01-01",
            "--to",
            "2099-12-31",
        ])
        .assert()
        .success();
}

#[test]
fn test_assign_and_list_positions() {
    let db_path = setup_test_db("position_assign_list");
    init_lodge(&db_path);
    assign(&db_path, "secretario", "pedro@loja.org");
    assign(&db_path, "veneravel-mestre", "joao@loja.org");

    rti()
        .args(["--db", &db_path, "position", "list"])
        .assert()
        .success()
        .stdout(contains("Secretario"))
        .stdout(contains("Pedro Souza"))
        .stdout(contains("Veneravel Mestre"))
        .stdout(contains("Joao Silva"));
}

#[test]
fn test_reassign_archives_previous_holder() {
    let db_path = setup_test_db("position_reassign");
    init_lodge(&db_path);
    assign(&db_path, "secretario", "pedro@loja.org");
    assign(&db_path, "secretario", "tiago@loja.org");

    rti()
        .args(["--db", &db_path, "position", "list"])
        .assert()
        .success()
        .stdout(contains("Tiago Lima"))
        .stdout(contains("Pedro Souza").not());

    rti()
        .args(["--db", &db_path, "position", "list", "--history"])
        .assert()
        .success()
        .stdout(contains("Pedro Souza"));

    rti()
        .args(["--db", &db_path, "--user", "pedro@loja.org", "access", "secretaria"])
        .assert()
        .failure();
}

#[test]
fn test_assign_rejects_inverted_dates() {
    let db_path = setup_test_db("position_inverted_dates");
    init_lodge(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "position",
            "assign",
            "tesoureiro",
            "joao@loja.org",
            "--from",
            "2025-12-31",
            "--to",
            "2025-01-01",
        ])
        .assert()
        .failure()
        .stderr(contains("precedes start date"));
}

#[test]
fn test_assign_rejects_unknown_office() {
    let db_path = setup_test_db("position_unknown_office");
    init_lodge(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "position",
            "assign",
            "grao_mestre",
            "joao@loja.org",
            "--from",
            "2025-01-01",
            "--to",
            "2025-12-31",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid position type"));
}

#[test]
fn test_access_follows_position_permissions() {
    let db_path = setup_test_db("access_by_position");
    init_lodge(&db_path);
    assign(&db_path, "secretario", "pedro@loja.org");

    rti()
        .args(["--db", &db_path, "--user", "pedro@loja.org", "access", "secretaria"])
        .assert()
        .success()
        .stdout(contains("granted"));

    rti()
        .args(["--db", &db_path, "--user", "pedro@loja.org", "access", "tesouraria"])
        .assert()
        .failure()
        .stderr(contains("Access denied to module 'tesouraria'"));
}

#[test]
fn test_access_is_evaluated_on_the_given_date() {
    let db_path = setup_test_db("access_by_date");
    init_lodge(&db_path);
    assign(&db_path, "tesoureiro", "joao@loja.org");

    rti()
        .args([
            "--db",
            &db_path,
            "--user",
            "joao@loja.org",
            "access",
            "tesouraria",
            "--date",
            "2024-06-01",
        ])
        .assert()
        .failure();
}

#[test]
fn test_commands_are_guarded_by_module() {
    let db_path = setup_test_db("commands_guarded");
    init_lodge(&db_path);
    assign(&db_path, "secretario", "pedro@loja.org");

    // Secretario reaches the members module but not the positions one.
    rti()
        .args(["--db", &db_path, "--user", "pedro@loja.org", "brother", "list"])
        .assert()
        .success()
        .stdout(contains("Joao Silva"));

    rti()
        .args(["--db", &db_path, "--user", "pedro@loja.org", "position", "list"])
        .assert()
        .failure()
        .stderr(contains("Access denied to module 'cargos'"));

    // No position at all.
    rti()
        .args(["--db", &db_path, "--user", "tiago@loja.org", "session", "list"])
        .assert()
        .failure()
        .stderr(contains("Access denied to module 'chancelaria'"));
}

#[test]
fn test_admin_role_bypasses_positions() {
    let db_path = setup_test_db("admin_bypass");
    init_lodge(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "--user",
            "tiago@loja.org",
            "--admin",
            "position",
            "list",
        ])
        .assert()
        .success();
}

#[test]
fn test_master_admin_email_bypasses_positions() {
    let db_path = setup_test_db("master_admin");
    let home = temp_home("master_admin", &["Grao@Loja.org"]);

    rti_in(&home)
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rti_in(&home)
        .args(["--db", &db_path, "--user", "grao@loja.org", "access", "cargos"])
        .assert()
        .success();

    rti_in(&home)
        .args(["--db", &db_path, "--user", "other@loja.org", "access", "cargos"])
        .assert()
        .failure();
}

#[test]
fn test_whoami_reports_office_and_modules() {
    let db_path = setup_test_db("whoami");
    init_lodge(&db_path);
    assign(&db_path, "tesoureiro", "joao@loja.org");

    rti()
        .args(["--db", &db_path, "--user", "joao@loja.org", "position", "whoami"])
        .assert()
        .success()
        .stdout(contains("Tesoureiro"))
        .stdout(contains("2025-01-01 → 2099-12-31"))
        .stdout(contains("tesouraria"));

    rti()
        .args(["--db", &db_path, "--user", "tiago@loja.org", "position", "whoami"])
        .assert()
        .success()
        .stdout(contains("No position held"));
}

#[test]
fn test_remove_position_by_id() {
    let db_path = setup_test_db("position_remove");
    init_lodge(&db_path);

    let out = rti()
        .args([
            "--db",
            &db_path,
            "position",
            "assign",
            "orador",
            "tiago@loja.org",
            "--from",
            "2025-01-01",
            "--to",
            "2099-12-31",
        ])
        .output()
        .expect("run assign");
    assert!(out.status.success());
    let id = common::bracketed_id(&out.stdout);

    rti()
        .args(["--db", &db_path, "position", "remove", &id])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "position", "remove", &id])
        .assert()
        .failure()
        .stderr(contains("not found"));

    rti()
        .args(["--db", &db_path, "--user", "tiago@loja.org", "access", "atas"])
        .assert()
        .failure();
}
