//! Week view of a grid: one row per slot of the working hours, one column
//! per day.

use crate::adapters::coords::{DAYS_PER_WEEK, week_day_to_day_index};
use crate::grid::config::{SLOTS_PER_DAY, slot_ceil, slot_floor, slot_start_time};
use crate::grid::slot_grid::SlotGrid;
use crate::models::task::TaskId;
use crate::utils::colors::colorize_cell;
use crate::utils::date::weekday_label;
use crate::utils::formatting::{bold, pad_right, truncate};

const TIME_WIDTH: usize = 5;
const DAY_WIDTH: usize = 16;

/// Renders week `week` of the window. Tasks partly outside working hours are
/// clipped; `highlight` is drawn in bold.
pub fn render_week(grid: &SlotGrid, week: usize, highlight: Option<TaskId>) -> String {
    let config = grid.config();
    let (wh_start, wh_end) = config.working_hours();
    let first_slot = slot_floor(wh_start);
    let last_slot = slot_ceil(wh_end).min(SLOTS_PER_DAY);

    let days: Vec<usize> = (0..DAYS_PER_WEEK)
        .map(|wd| week_day_to_day_index(week, wd))
        .filter(|day| *day < grid.num_days())
        .collect();

    let mut out = String::new();

    out.push_str(&" ".repeat(TIME_WIDTH));
    for day in &days {
        let label = config
            .date_for_day(*day)
            .map(|d| format!("{} {}", weekday_label(d), d.format("%d/%m")))
            .unwrap_or_default();
        out.push_str(" │ ");
        out.push_str(&pad_right(&label, DAY_WIDTH));
    }
    out.push('\n');

    out.push_str(&"─".repeat(TIME_WIDTH));
    for _ in &days {
        out.push_str("─┼─");
        out.push_str(&"─".repeat(DAY_WIDTH));
    }
    out.push('\n');

    for slot in first_slot..last_slot {
        out.push_str(&slot_start_time(slot).format("%H:%M").to_string());
        for day in &days {
            out.push_str(" │ ");
            out.push_str(&render_cell(grid, *day, slot, first_slot, highlight));
        }
        out.push('\n');
    }

    out
}

fn render_cell(
    grid: &SlotGrid,
    day: usize,
    slot: usize,
    first_visible: usize,
    highlight: Option<TaskId>,
) -> String {
    let past = grid.is_past_position(day, slot);

    let Some(task) = grid.task_at(day, slot) else {
        let filler = if past { "·" } else { "" };
        return colorize_cell(&pad_right(filler, DAY_WIDTH), None, past);
    };

    let starts_here = slot == first_visible
        || grid
            .task_at(day, slot - 1)
            .is_none_or(|prev| prev.id != task.id);
    let text = if starts_here {
        format!("{} #{} {}", task.category.marker(), task.id, task.description)
    } else {
        format!("{} ┆", task.category.marker())
    };

    let cell = pad_right(&truncate(&text, DAY_WIDTH), DAY_WIDTH);
    let cell = if highlight == Some(task.id) {
        bold(&cell)
    } else {
        cell
    };
    colorize_cell(&cell, Some(task.category), past)
}
