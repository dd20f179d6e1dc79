//! CLI argument definitions using clap

use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use clap_complete::Shell;

/// indico-store - Local data for recently viewed events and categories
#[derive(Parser, Debug)]
#[command(name = "indico-store")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recently viewed items
    #[command(subcommand)]
    Mru(MruCommand),

    /// Recency database lifecycle
    #[command(subcommand)]
    Db(DbCommand),

    /// User-defined categories
    #[command(subcommand)]
    Categories(CategoriesCommand),

    /// Blob cache maintenance
    #[command(subcommand)]
    Maintenance(MaintenanceCommand),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum MruCommand {
    /// Record that an item was opened
    Add {
        /// Display title (at most 40 characters)
        title: String,

        /// External reference of the item (at most 256 characters)
        id_ref: String,

        /// Start time in RFC 3339 format (defaults to now)
        #[arg(short, long)]
        start: Option<DateTime<Utc>>,
    },

    /// List recently viewed items
    List {
        /// Maximum number of items to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Mark an item as opened now
    Open {
        /// Item ID
        id: i64,
    },

    /// Remove an item
    Remove {
        /// Item ID
        id: i64,
    },

    /// Keep only the most recent items
    Prune {
        /// Number of items to keep
        #[arg(short, long)]
        keep: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create the database and schema if missing
    Create,

    /// Drop and recreate the tables, discarding all items
    Reset,

    /// Delete the database file
    Delete,

    /// Show database location and statistics
    Status,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    /// List configured categories
    List {
        /// Print the stored JSON document
        #[arg(long)]
        json: bool,
    },

    /// Add a category
    #[command(group(ArgGroup::new("source").required(true).args(["category", "search", "url", "favorites"])))]
    Add {
        /// Category title
        title: String,

        /// Show the category on the home page
        #[arg(long)]
        home: bool,

        /// Event server for --category or --search
        #[arg(long)]
        server: Option<String>,

        /// Category ID on the event server
        #[arg(long, requires = "server")]
        category: Option<String>,

        /// Saved search query on the event server
        #[arg(long, requires = "server")]
        search: Option<String>,

        /// Meeting list URL
        #[arg(long)]
        url: Option<String>,

        /// The user's favourite events
        #[arg(long)]
        favorites: bool,
    },

    /// Remove categories by title
    Remove {
        /// Category title
        title: String,
    },

    /// Remove all categories
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum MaintenanceCommand {
    /// Compact the blob cache once
    Run,

    /// Compact the blob cache on the configured interval until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
