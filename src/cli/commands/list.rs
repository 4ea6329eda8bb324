use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::plan::{list_scheduled, window_range};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::grid::config::Clock;
use crate::models::task::Task;
use crate::utils::date::weekday_label;
use crate::utils::mins2readable;
use crate::utils::table::{Column, Table};
use std::sync::Arc;

pub fn handle(cmd: &Commands, cfg: &Config, clock: Arc<dyn Clock>) -> AppResult<()> {
    if let Commands::List { week, json } = cmd {
        let grid_cfg = cfg.grid_config(clock)?;
        let (from, to) = window_range(&grid_cfg, *week)?;

        let pool = DbPool::new(&cfg.database)?;
        let tasks = list_scheduled(&pool.conn, from, to)?;

        if *json {
            let out = serde_json::to_string_pretty(&tasks)
                .map_err(|e| AppError::Serialize(e.to_string()))?;
            println!("{out}");
            return Ok(());
        }

        if tasks.is_empty() {
            println!("No tasks scheduled between {} and {}.", from, to);
            return Ok(());
        }

        println!("📅 Tasks {} → {}\n", from, to);
        print!("{}", render_tasks(&tasks));

        let planned: i64 = tasks.iter().map(Task::duration_minutes).sum();
        println!("\nPlanned: {}", mins2readable(planned, false));
    }
    Ok(())
}

fn render_tasks(tasks: &[Task]) -> String {
    let mut table = Table::new(vec![
        Column::new("ID", 5),
        Column::new("Day", 3),
        Column::new("Date", 10),
        Column::new("Start", 5),
        Column::new("End", 5),
        Column::new("Cat", 7),
        Column::new("Description", 40),
    ]);

    for t in tasks {
        table.add_row(vec![
            t.id.to_string(),
            weekday_label(t.date).to_string(),
            t.date_str(),
            t.start_str(),
            t.end_str(),
            t.category.to_db_str().to_string(),
            t.description.clone(),
        ]);
    }

    table.render()
}
