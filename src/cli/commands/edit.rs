use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::{EditLogic, EditOp, EditOutcome};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::grid::config::Clock;
use crate::ui::messages::{info, success};
use std::sync::Arc;

pub fn handle(cmd: &Commands, cfg: &Config, clock: Arc<dyn Clock>) -> AppResult<()> {
    if let Commands::Edit { ops, dry_run } = cmd {
        let ops = EditOp::parse_all(ops)?;
        let grid_cfg = cfg.grid_config(clock)?;

        let pool = DbPool::new(&cfg.database)?;
        let outcome = EditLogic::apply(&pool.conn, grid_cfg, cfg.undo_limit, &ops, *dry_run)?;

        print_outcome(&outcome);

        if outcome.changes.is_empty() && outcome.deleted.is_empty() {
            info("Nothing changed.");
        } else if outcome.saved {
            success(format!(
                "Saved: {} task(s) moved, {} deleted.",
                outcome.changes.len(),
                outcome.deleted.len()
            ));
        } else {
            info("Dry run: nothing was saved.");
        }
    }
    Ok(())
}

fn print_outcome(outcome: &EditOutcome) {
    for task in &outcome.changes {
        println!(
            "  ✏️  #{} {} {} → {}  {}",
            task.id,
            task.date_str(),
            task.start_str(),
            task.end_str(),
            task.description
        );
    }
    for id in &outcome.deleted {
        println!("  🗑️  #{} deleted", id);
    }
    if !outcome.dirty_dates.is_empty() {
        let dates: Vec<String> = outcome.dirty_dates.iter().map(|d| d.to_string()).collect();
        println!("  Days touched: {}", dates.join(", "));
    }
}
