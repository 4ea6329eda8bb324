use log::info;
use rusqlite::{Connection, OptionalExtension, Result, params};

/// Versioned schema changes applied after the base tables exist.
/// Each one is recorded as a `migration_applied` row in `log`.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20251006_0001_index_tasks_by_status",
        "Added status/date index to tasks",
        "CREATE INDEX IF NOT EXISTS idx_tasks_status_date ON tasks(status, date);",
    ),
    (
        "20251013_0002_add_task_updated_at",
        "Added updated_at column to tasks",
        "ALTER TABLE tasks ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';",
    ),
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if the `tasks` table exists.
fn tasks_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='tasks'")?;
    let exists: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create the `tasks` table with the base schema.
fn create_tasks_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            description  TEXT NOT NULL,
            category     TEXT NOT NULL DEFAULT 'deep' CHECK(category IN ('deep','shallow')),
            status       TEXT NOT NULL DEFAULT 'scheduled'
                         CHECK(status IN ('scheduled','cancelled','postponed')),
            date         TEXT NOT NULL,
            start_time   TEXT NOT NULL,
            end_time     TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            CHECK(end_time > start_time)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_date_start ON tasks(date, start_time);
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// `true` when the migration ran now, `false` when it was already recorded.
fn apply_migration(conn: &Connection, version: &str, message: &str, sql: &str) -> Result<bool> {
    if migration_applied(conn, version)? {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![version, message],
    )?;
    tx.commit()?;

    info!("event=migration_applied module=db status=ok version={version}");
    Ok(true)
}

/// Brings the schema up to date and returns how many versioned
/// migrations were applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Base schema
    if !tasks_table_exists(conn)? {
        create_tasks_table(conn)?;
        info!("event=schema_created module=db status=ok table=tasks");
    }

    // 3) Versioned changes, in order
    let mut applied = 0;
    for (version, message, sql) in MIGRATIONS {
        if apply_migration(conn, version, message, sql)? {
            applied += 1;
        }
    }

    Ok(applied)
}
