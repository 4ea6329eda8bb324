use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::status::StatusLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::task_status::TaskStatus;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { id, status } = cmd {
        let status =
            TaskStatus::from_code(status).ok_or_else(|| AppError::InvalidStatus(status.clone()))?;

        let pool = DbPool::new(&cfg.database)?;
        let task = StatusLogic::apply(&pool.conn, *id, status)?;
        success(format!(
            "Task #{} is now {}.",
            task.id,
            task.status.to_db_str()
        ));
    }

    Ok(())
}
