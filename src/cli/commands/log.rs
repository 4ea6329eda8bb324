use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print, last } = cmd else {
        return Ok(());
    };

    if !*print {
        info("Use --print to show the audit log.");
        return Ok(());
    }

    let pool = DbPool::new(&cfg.database)?;
    LogLogic::print_log(&pool.conn, *last)
}
