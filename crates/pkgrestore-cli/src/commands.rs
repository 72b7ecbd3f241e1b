use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pkgrestore_constants::{BIN_NAME, DESCRIPTION, VERSION};

#[derive(Parser)]
#[command(name = BIN_NAME)]
#[command(version = VERSION)]
#[command(propagate_version = true)]
#[command(about = DESCRIPTION, long_about = None)]
pub struct Cli {
    /// Only print errors
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// JSON output owns stdout, so status lines are suppressed with it.
    #[must_use]
    pub const fn quiet_output(&self) -> bool {
        self.quiet || matches!(self.command, Commands::Restore { json: true, .. })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Requests packages and restores them in a single session
    #[command(alias = "r")]
    Restore {
        /// Package references (e.g. Foo@1.0.0 or "nuget:Foo, 1.0.0")
        #[arg(required = true)]
        packages: Vec<String>,
        /// Additional restore source, searched before the default store
        #[arg(short = 's', long = "source")]
        sources: Vec<String>,
        /// Package store to resolve from (defaults to ~/.pkgrestore/packages)
        #[arg(long)]
        store: Option<PathBuf>,
        /// Give up waiting after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Print the restore result as JSON
        #[arg(long)]
        json: bool,
        /// Enable debug mode for verbose output
        #[arg(long)]
        debug: bool,
    },
    /// Manages the local package store
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
pub enum StoreAction {
    /// Unpacks a .tgz archive into the store as <name>/<version>
    Add {
        archive: PathBuf,
        name: String,
        #[arg(value_name = "VERSION")]
        package_version: String,
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Lists the versions stored for a package
    #[command(alias = "ls")]
    List {
        name: String,
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Prints the default store location
    Path,
}
