use clap::{Parser, Subcommand};

/// Command-line interface definition for rLodge
/// Lodge administration: positions, permissions, attendance and visitors on SQLite
#[derive(Parser)]
#[command(
    name = "rlodge",
    version = env!("CARGO_PKG_VERSION"),
    about = "Lodge administration CLI: positions, permissions, attendance sessions and visitors using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Act as this user (brother id or e-mail); permissions are checked
    #[arg(global = true, long = "user", value_name = "ID|EMAIL")]
    pub user: Option<String>,

    /// Act with the admin role (bypasses position checks)
    #[arg(global = true, long = "admin")]
    pub admin: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, info)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup file")]
        force: bool,
    },

    /// Manage lodge members
    Brother {
        #[command(subcommand)]
        action: BrotherAction,
    },

    /// Manage lodge positions (offices)
    Position {
        #[command(subcommand)]
        action: PositionAction,
    },

    /// Check whether the current user may open a module
    Access {
        /// Module id (dashboard, irmaos, cargos, chancelaria, tesouraria, ...)
        module: String,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Evaluate on this date (default: today)")]
        date: Option<String>,
    },

    /// Manage attendance sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Mark member attendance in a session
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },

    /// Register visitors from other lodges
    Visitor {
        #[command(subcommand)]
        action: VisitorAction,
    },
}

#[derive(Subcommand)]
pub enum BrotherAction {
    /// Register a new member
    Add {
        name: String,

        #[arg(long)]
        email: Option<String>,
    },

    /// List members
    List {
        #[arg(long, help = "Include inactive members")]
        all: bool,
    },

    /// Mark a member as inactive (excluded from quorum)
    Deactivate {
        /// Brother id or e-mail
        brother: String,
    },
}

#[derive(Subcommand)]
pub enum PositionAction {
    /// Assign an office, archiving the current holder
    Assign {
        /// Office code (veneravel_mestre, tesoureiro, secretario, ...)
        position: String,

        /// Brother id or e-mail; omit to leave the office vacant
        holder: Option<String>,

        #[arg(long = "from", value_name = "YYYY-MM-DD")]
        from: String,

        #[arg(long = "to", value_name = "YYYY-MM-DD")]
        to: String,
    },

    /// Remove an active position record (archived to history)
    Remove { id: String },

    /// List active positions
    List {
        #[arg(long, help = "Show archived tenures instead")]
        history: bool,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
    },

    /// Show the current user's office and modules
    Whoami {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start the attendance list of an event (idempotent)
    Start {
        event_id: String,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
    },

    /// List sessions
    List,

    /// Finalize a session
    Finalize {
        /// Session id or event id
        session: String,

        #[arg(long, help = "Charity collection amount")]
        charity: Option<f64>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the quorum of a session
    Quorum {
        /// Session id or event id
        session: String,

        #[arg(long, help = "Override the number of active members")]
        members: Option<usize>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AttendanceAction {
    /// Toggle a member between present and absent
    Toggle {
        /// Session id or event id
        session: String,
        /// Brother id or e-mail
        brother: String,
    },

    /// Mark a justified absence
    Justify { session: String, brother: String },

    /// Show attendance of every active member
    List { session: String },
}

#[derive(Subcommand)]
pub enum VisitorAction {
    /// Add a visitor to a session
    Add {
        /// Session id or event id
        session: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        degree: String,

        #[arg(long)]
        lodge: String,

        #[arg(long = "lodge-number")]
        lodge_number: String,

        #[arg(long)]
        obedience: String,

        #[arg(long = "masonic-number")]
        masonic_number: Option<String>,
    },

    /// Remove a visitor from a session
    Remove { session: String, visitor: String },

    /// List visitors of a session
    List { session: String },
}
