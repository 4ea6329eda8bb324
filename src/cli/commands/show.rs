use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::plan::{load_window, window_range};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::grid::config::Clock;
use crate::ui::grid_view::render_week;
use std::sync::Arc;

pub fn handle(cmd: &Commands, cfg: &Config, clock: Arc<dyn Clock>) -> AppResult<()> {
    if let Commands::Show { week, task } = cmd {
        let grid_cfg = cfg.grid_config(clock)?;
        let (from, to) = window_range(&grid_cfg, Some(*week))?;

        let pool = DbPool::new(&cfg.database)?;
        let grid = load_window(&pool.conn, grid_cfg)?;

        println!("🗓️  Week {} ({} → {})\n", week, from, to);
        print!("{}", render_week(&grid, *week, *task));
    }
    Ok(())
}
