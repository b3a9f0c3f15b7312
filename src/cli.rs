use clap::{Parser, Subcommand};

use crate::commands::{browse, plugins, settings, sources, volumes};

#[derive(Debug, Parser)]
#[command(name = "quarry")]
#[command(about = "Catalog engine for a desktop object launcher", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the sources of loaded plugins
    Sources(sources::Args),

    /// Browse a directory the way the catalog presents it
    Browse(browse::Args),

    /// List loaded and disabled plugins
    Plugins(plugins::Args),

    /// Show or change plugin settings
    Settings(settings::Args),

    /// List mounted volumes, or unmount one
    Volumes(volumes::Args),
}
