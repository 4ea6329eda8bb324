use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{rtb, setup_test_db};

/// Monday of the fixture week; the window runs 2025-10-06 → 2025-10-26.
const NOW: &str = "2025-10-06 08:00";

fn init(db_path: &str) {
    rtb()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

fn add(db_path: &str, date: &str, start: &str, end: &str, desc: &str) {
    rtb()
        .args(["--db", db_path, "add", date, start, end, desc])
        .assert()
        .success();
}

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    rtb()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_add_and_list() {
    let db_path = setup_test_db("cli_add_list");
    init(&db_path);

    rtb()
        .args([
            "--db",
            &db_path,
            "add",
            "2025-10-07",
            "09:00",
            "10:30",
            "Write report",
            "--category",
            "shallow",
        ])
        .assert()
        .success()
        .stdout(contains("Added task #1"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "list"])
        .assert()
        .success()
        .stdout(contains("Write report"))
        .stdout(contains("2025-10-07"))
        .stdout(contains("shallow"))
        .stdout(contains("01h 30m"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "list", "--week", "1"])
        .assert()
        .success()
        .stdout(contains("No tasks scheduled"));
}

#[test]
fn test_list_json() {
    let db_path = setup_test_db("cli_list_json");
    init(&db_path);
    add(&db_path, "2025-10-08", "14:00", "15:00", "Review");

    rtb()
        .args(["--db", &db_path, "--now", NOW, "list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"description\": \"Review\""))
        .stdout(contains("\"category\": \"deep\""))
        .stdout(contains("\"date\": \"2025-10-08\""));
}

#[test]
fn test_add_rejects_overlap_and_bad_input() {
    let db_path = setup_test_db("cli_add_overlap");
    init(&db_path);
    add(&db_path, "2025-10-07", "09:00", "10:00", "First");

    rtb()
        .args(["--db", &db_path, "add", "2025-10-07", "09:30", "10:30", "Second"])
        .assert()
        .failure()
        .stderr(contains("occupied"));

    rtb()
        .args(["--db", &db_path, "add", "2025-10-07", "11:00", "10:30", "Backwards"])
        .assert()
        .failure()
        .stderr(contains("Invalid time format"));

    rtb()
        .args(["--db", &db_path, "add", "2025-10-07", "10:00", "10:10", "Short"])
        .assert()
        .failure()
        .stderr(contains("15-minute boundary"));

    rtb()
        .args(["--db", &db_path, "add", "2025-10-07", "11:00", "12:00", "X", "-c", "urgent"])
        .assert()
        .failure()
        .stderr(contains("Invalid category"));
}

#[test]
fn test_edit_grow_is_saved() {
    let db_path = setup_test_db("cli_edit_grow");
    init(&db_path);
    add(&db_path, "2025-10-07", "09:00", "10:00", "First");
    add(&db_path, "2025-10-07", "10:00", "11:00", "Second");

    rtb()
        .args(["--db", &db_path, "--now", NOW, "edit", "grow", "1"])
        .assert()
        .success()
        .stdout(contains("Saved: 2 task(s) moved"))
        .stdout(contains("2025-10-07"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "list"])
        .assert()
        .success()
        .stdout(contains("10:15").and(contains("11:15")));
}

#[test]
fn test_edit_dry_run_saves_nothing() {
    let db_path = setup_test_db("cli_edit_dry_run");
    init(&db_path);
    add(&db_path, "2025-10-07", "09:00", "10:00", "First");

    rtb()
        .args([
            "--db", &db_path, "--now", NOW, "edit", "move", "1", "right", "--dry-run",
        ])
        .assert()
        .success()
        .stdout(contains("2025-10-08"))
        .stdout(contains("Dry run"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "list"])
        .assert()
        .success()
        .stdout(contains("2025-10-07"))
        .stdout(contains("2025-10-08").not());
}

#[test]
fn test_edit_rejects_started_tasks_and_bad_ops() {
    let db_path = setup_test_db("cli_edit_errors");
    init(&db_path);
    add(&db_path, "2025-10-06", "07:00", "09:00", "Running");

    rtb()
        .args(["--db", &db_path, "--now", NOW, "edit", "shrink", "1"])
        .assert()
        .failure()
        .stderr(contains("already started"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "edit", "jump", "1"])
        .assert()
        .failure()
        .stderr(contains("Invalid edit operation"));
}

#[test]
fn test_show_week() {
    let db_path = setup_test_db("cli_show");
    init(&db_path);
    add(&db_path, "2025-10-07", "09:00", "10:00", "Focus");

    rtb()
        .args(["--db", &db_path, "--now", NOW, "show"])
        .assert()
        .success()
        .stdout(contains("Tue 07/10"))
        .stdout(contains("#1 Focus"))
        .stdout(contains("09:00"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "show", "--task", "1"])
        .assert()
        .success()
        .stdout(contains("\x1b[1m"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "show", "--week", "5"])
        .assert()
        .failure();
}

#[test]
fn test_status_and_delete() {
    let db_path = setup_test_db("cli_status_del");
    init(&db_path);
    add(&db_path, "2025-10-07", "09:00", "10:00", "Maybe");
    add(&db_path, "2025-10-08", "09:00", "10:00", "Surely");

    rtb()
        .args(["--db", &db_path, "status", "1", "postponed"])
        .assert()
        .success()
        .stdout(contains("now postponed"));

    rtb()
        .args(["--db", &db_path, "del", "2", "--yes"])
        .assert()
        .success()
        .stdout(contains("has been deleted"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "list"])
        .assert()
        .success()
        .stdout(contains("No tasks scheduled"));

    rtb()
        .args(["--db", &db_path, "del", "2", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Task 2 not found"));
}

#[test]
fn test_delete_asks_for_confirmation() {
    let db_path = setup_test_db("cli_del_confirm");
    init(&db_path);
    add(&db_path, "2025-10-07", "09:00", "10:00", "Keep me");

    rtb()
        .args(["--db", &db_path, "del", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    rtb()
        .args(["--db", &db_path, "--now", NOW, "list"])
        .assert()
        .success()
        .stdout(contains("Keep me"));
}

#[test]
fn test_log_print() {
    let db_path = setup_test_db("cli_log");
    init(&db_path);
    add(&db_path, "2025-10-07", "09:00", "10:00", "Logged");

    rtb()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("migration_applied"))
        .stdout(contains("Logged"));

    rtb()
        .args(["--db", &db_path, "log", "--print", "--last", "1"])
        .assert()
        .success()
        .stdout(contains("Logged"))
        .stdout(contains("migration_applied").not());
}

#[test]
fn test_config_print() {
    let db_path = setup_test_db("cli_config");

    rtb()
        .args(["--db", &db_path, "config", "--print"])
        .assert()
        .success()
        .stdout(contains("database:"))
        .stdout(contains("display_slot_size"));
}

#[test]
fn test_bad_now_is_rejected() {
    let db_path = setup_test_db("cli_bad_now");
    init(&db_path);

    rtb()
        .args(["--db", &db_path, "--now", "tomorrow", "list"])
        .assert()
        .failure()
        .stderr(contains("Error:"));
}
