use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{bracketed_id, init_lodge, rti, setup_test_db};

const EVENT: &str = "sessao-2025-03-10";

fn start(db_path: &str) {
    rti()
        .args(["--db", db_path, "session", "start", EVENT, "--date", "2025-03-10"])
        .assert()
        .success();
}

#[test]
fn test_start_session_is_idempotent() {
    let db_path = setup_test_db("session_idempotent");
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "session", "start", EVENT, "--date", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("Session started"));

    rti()
        .args(["--db", &db_path, "session", "start", EVENT])
        .assert()
        .success()
        .stdout(contains("already started"));

    rti()
        .args(["--db", &db_path, "session", "list"])
        .assert()
        .success()
        .stdout(contains(EVENT))
        .stdout(contains("2025-03-10"))
        .stdout(contains("Pendente"));
}

#[test]
fn test_toggle_flips_between_present_and_absent() {
    let db_path = setup_test_db("attendance_toggle");
    init_lodge(&db_path);
    start(&db_path);

    rti()
        .args(["--db", &db_path, "attendance", "toggle", EVENT, "joao@loja.org"])
        .assert()
        .success()
        .stdout(contains("Joao Silva: Presente"));

    rti()
        .args(["--db", &db_path, "attendance", "toggle", EVENT, "joao@loja.org"])
        .assert()
        .success()
        .stdout(contains("Joao Silva: Ausente"));
}

#[test]
fn test_quorum_counts_present_and_justified() {
    let db_path = setup_test_db("attendance_quorum");
    init_lodge(&db_path);
    start(&db_path);

    rti()
        .args(["--db", &db_path, "attendance", "toggle", EVENT, "joao@loja.org"])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "session", "quorum", EVENT])
        .assert()
        .success()
        .stdout(contains("1/3 (33.3%)"));

    rti()
        .args(["--db", &db_path, "attendance", "justify", EVENT, "pedro@loja.org"])
        .assert()
        .success()
        .stdout(contains("Pedro Souza: Justificado"));

    rti()
        .args(["--db", &db_path, "session", "quorum", EVENT, "--json"])
        .assert()
        .success()
        .stdout(contains("\"present_count\": 2"))
        .stdout(contains("\"active_member_count\": 3"));

    rti()
        .args(["--db", &db_path, "attendance", "list", EVENT])
        .assert()
        .success()
        .stdout(contains("Tiago Lima"))
        .stdout(contains("Ausente"));
}

#[test]
fn test_quorum_without_members_is_zero() {
    let db_path = setup_test_db("attendance_quorum_zero");
    init_lodge(&db_path);
    start(&db_path);

    rti()
        .args(["--db", &db_path, "session", "quorum", EVENT, "--members", "0"])
        .assert()
        .success()
        .stdout(contains("0/0 (0.0%)"));
}

#[test]
fn test_finalized_session_rejects_changes() {
    let db_path = setup_test_db("session_finalized");
    init_lodge(&db_path);
    start(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "session",
            "finalize",
            EVENT,
            "--charity",
            "150.5",
            "--notes",
            "Sessao ordinaria",
        ])
        .assert()
        .success()
        .stdout(contains("finalized"));

    rti()
        .args(["--db", &db_path, "attendance", "toggle", EVENT, "joao@loja.org"])
        .assert()
        .failure()
        .stderr(contains("finalized"));

    rti()
        .args(["--db", &db_path, "session", "list"])
        .assert()
        .success()
        .stdout(contains("Finalizada"));
}

#[test]
fn test_unknown_session_is_reported() {
    let db_path = setup_test_db("session_unknown");
    init_lodge(&db_path);

    rti()
        .args(["--db", &db_path, "attendance", "toggle", "nope", "joao@loja.org"])
        .assert()
        .failure()
        .stderr(contains("Session 'nope' not found"));
}

#[test]
fn test_invalid_visitor_lists_every_problem() {
    let db_path = setup_test_db("visitor_invalid");
    init_lodge(&db_path);
    start(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "visitor",
            "add",
            EVENT,
            "--name",
            "Al",
            "--lodge",
            "Luz do Oriente",
            "--lodge-number",
            "12a",
            "--obedience",
            "GOB",
        ])
        .assert()
        .failure()
        .stderr(contains("Nome do visitante precisa ter pelo menos 3 caracteres."))
        .stderr(contains("Numero da loja deve conter apenas digitos."));

    rti()
        .args(["--db", &db_path, "visitor", "list", EVENT])
        .assert()
        .success()
        .stdout(contains("No visitors"));
}

#[test]
fn test_visitor_add_list_and_remove() {
    let db_path = setup_test_db("visitor_add_remove");
    init_lodge(&db_path);
    start(&db_path);

    let out = rti()
        .args([
            "--db",
            &db_path,
            "visitor",
            "add",
            EVENT,
            "--name",
            "  Carlos   Mendes ",
            "--degree",
            "Mestre",
            "--lodge",
            "Luz do Oriente",
            "--lodge-number",
            "1234",
            "--obedience",
            "GOB",
            "--masonic-number",
            "12.345-6",
        ])
        .output()
        .expect("run visitor add");
    assert!(out.status.success());
    let visitor_id = bracketed_id(&out.stdout);

    rti()
        .args(["--db", &db_path, "visitor", "list", EVENT])
        .assert()
        .success()
        .stdout(contains("Carlos Mendes"))
        .stdout(contains("Luz do Oriente"));

    rti()
        .args(["--db", &db_path, "visitor", "remove", EVENT, &visitor_id])
        .assert()
        .success()
        .stdout(contains("Visitor removed: Carlos Mendes"));

    rti()
        .args(["--db", &db_path, "visitor", "list", EVENT])
        .assert()
        .success()
        .stdout(contains("Carlos Mendes").not());
}
