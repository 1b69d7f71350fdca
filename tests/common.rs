#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Configuration directory shared by tests that need no config file.
fn default_home() -> PathBuf {
    env::temp_dir().join("rlodge_test_home")
}

pub fn rti() -> Command {
    rti_in(&default_home())
}

/// Run the binary with `home` as its configuration directory.
pub fn rti_in(home: &PathBuf) -> Command {
    let mut cmd = cargo_bin_cmd!("rlodge");
    cmd.env("RLODGE_HOME", home).env_remove("RUST_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rlodge.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh configuration directory whose config file names the master admins.
pub fn temp_home(name: &str, master_admins: &[&str]) -> PathBuf {
    let home = env::temp_dir().join(format!("{}_rlodge_home", name));
    fs::remove_dir_all(&home).ok();
    fs::create_dir_all(&home).expect("create home");

    let mut conf = format!(
        "database: {}\nmaster_admin_emails:\n",
        home.join("rlodge.sqlite").display()
    );
    for email in master_admins {
        conf.push_str(&format!("  - {email}\n"));
    }
    fs::write(home.join("rlodge.conf"), conf).expect("write config");
    home
}

/// Initialize DB and register three brothers:
/// joao@loja.org, pedro@loja.org and tiago@loja.org
pub fn init_lodge(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for (name, email) in [
        ("Joao Silva", "joao@loja.org"),
        ("Pedro Souza", "pedro@loja.org"),
        ("Tiago Lima", "tiago@loja.org"),
    ] {
        rti()
            .args(["--db", db_path, "brother", "add", name, "--email", email])
            .assert()
            .success();
    }
}

/// Text between the last `[` and `]` of the command output (printed record ids).
pub fn bracketed_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let start = text.rfind('[').expect("an opening bracket") + 1;
    let end = text[start..].find(']').expect("a closing bracket") + start;
    text[start..end].to_string()
}
