use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::add::AddLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::task::Task;
use crate::ui::messages::success;
use crate::utils::date;
use crate::utils::time::parse_time_arg;

/// Schedule a new task.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        date,
        start,
        end,
        description,
        category,
    } = cmd
    {
        let d = date::parse_date(date).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        let start_t = parse_time_arg(start)?;
        let end_t = parse_time_arg(end)?;
        let category = Category::from_code(category)
            .ok_or_else(|| AppError::InvalidCategory(category.to_string()))?;

        let task = Task::new(0, description.trim(), category, d, start_t, end_t);

        let pool = DbPool::new(&cfg.database)?;
        let id = AddLogic::apply(&pool.conn, &task)?;

        success(format!(
            "Added task #{} on {}: {} → {} {}",
            id,
            task.date_str(),
            task.start_str(),
            task.end_str(),
            task.description
        ));
    }

    Ok(())
}
