pub mod category;
pub mod task;
pub mod task_status;
