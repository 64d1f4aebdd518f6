//! Command modules for CLI

pub mod index;
pub mod list;
pub mod publish;

use clap::Subcommand;

#[derive(Debug, Subcommand)]
#[command(about = "pips3 commands")]
pub enum Commands {
    /// Upload package files and refresh the package index (default)
    #[command(about = "Upload package files and refresh the package index")]
    Publish(publish::PublishArgs),

    /// List keys stored under the repository prefix
    #[command(about = "List keys stored in the repository")]
    List(list::ListArgs),

    /// Render a package index, optionally uploading it
    #[command(about = "Print or upload the index.html of a package")]
    Index(index::IndexArgs),
}
