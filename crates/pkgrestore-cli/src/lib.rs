pub mod commands;
pub mod handlers;
pub mod observer;

use clap::Parser;

use commands::{Cli, Commands, StoreAction};
use handlers::{RestoreHandler, StoreHandler};

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    pkgrestore_logger::init_logger(cli.quiet_output());

    match cli.command {
        Commands::Restore {
            packages,
            sources,
            store,
            timeout,
            json,
            debug,
        } => RestoreHandler::handle_restore(&packages, &sources, store, timeout, json, debug),
        Commands::Store { action } => match action {
            StoreAction::Add {
                archive,
                name,
                package_version,
                store,
            } => StoreHandler::handle_add(&archive, &name, &package_version, store),
            StoreAction::List { name, store } => StoreHandler::handle_list(&name, store),
            StoreAction::Path => StoreHandler::handle_path(),
        },
    }
}
