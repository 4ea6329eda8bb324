use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimeblock
/// CLI application to plan the days in 15-minute blocks with SQLite
#[derive(Parser)]
#[command(
    name = "rtimeblock",
    version = env!("CARGO_PKG_VERSION"),
    about = "A time-block planner: place, move and resize tasks on a 3-week slot grid stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin the clock to "YYYY-MM-DD HH:MM" instead of reading local time
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, value_name = "N", help = "Only the N most recent rows")]
        last: Option<usize>,
    },

    /// Schedule a new task
    Add {
        /// Date of the task (YYYY-MM-DD)
        date: String,

        /// Start time (HH:MM)
        start: String,

        /// End time (HH:MM)
        end: String,

        /// What the block is for
        description: String,

        #[arg(
            long = "category",
            short = 'c',
            default_value = "deep",
            help = "Kind of work: deep (d) or shallow (s)"
        )]
        category: String,
    },

    /// List scheduled tasks of the planning window
    List {
        #[arg(long, short, help = "Only week N of the window (0, 1 or 2)")]
        week: Option<usize>,

        #[arg(long, help = "Print tasks as JSON")]
        json: bool,
    },

    /// Draw one week of the grid
    Show {
        #[arg(long, short, default_value_t = 0, help = "Week of the window (0, 1 or 2)")]
        week: usize,

        #[arg(long, short, help = "Highlight a task by ID")]
        task: Option<i64>,
    },

    /// Delete a task by ID
    Del {
        id: i64,

        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Change the status of a task
    Status {
        id: i64,

        /// scheduled | cancelled | postponed
        status: String,
    },

    /// Run a sequence of grid edits and save the result
    ///
    /// Operations: grow ID, shrink ID, space ID, space-at DATE HH:MM,
    /// unspace DATE HH:MM, delete ID, move ID DIR... (up|down|left|right), undo
    Edit {
        #[arg(required = true, num_args = 1..)]
        ops: Vec<String>,

        #[arg(long = "dry-run", help = "Show the changes without saving them")]
        dry_run: bool,
    },
}
