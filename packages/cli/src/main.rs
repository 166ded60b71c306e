mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use confdeck_client::HttpConfigStore;
use confdeck_workspace::ConfigWorkspace;

/// Confdeck CLI - browse and edit a server's configuration through its
/// remote configuration store
#[derive(Parser, Debug)]
#[command(name = "confdeck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the configuration store
    #[arg(long, default_value = "http://127.0.0.1:8080/")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the whole configuration tree
    Tree,

    /// Resolve a path and print the addressed node as JSON
    Get {
        /// Path of a block, item, sibling list, or parameter
        path: String,
    },

    /// Write one parameter value
    Set {
        /// Path of the parameter
        path: String,
        /// New value (always a string on the wire)
        value: String,
    },

    /// Append a new block under a parent
    AddBlock {
        /// Path of the parent block
        parent_path: String,
        /// Child key of the block to append (e.g. "server")
        block_key: String,
    },

    /// Delete the block at a path
    DeleteBlock {
        /// Path of the block to remove
        block_path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let store = HttpConfigStore::from_url(&cli.base_url)?;
    let mut workspace = ConfigWorkspace::new(Arc::new(store));
    workspace.refresh().await?;

    match cli.command {
        Command::Tree => commands::tree(&workspace),
        Command::Get { path } => commands::get(&workspace, &path),
        Command::Set { path, value } => commands::set(&mut workspace, &path, &value).await,
        Command::AddBlock {
            parent_path,
            block_key,
        } => commands::add_block(&mut workspace, &parent_path, &block_key).await,
        Command::DeleteBlock { block_path } => {
            commands::delete_block(&mut workspace, &block_path).await
        }
    }
}
