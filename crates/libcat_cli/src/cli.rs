//! Command-line grammar shared by the one-shot runner and the shell.

use crate::config::StorageKind;
use clap::{Parser, Subcommand};
use libcat_core::EntityId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "libcat")]
#[command(version)]
#[command(about = "Library catalog: books, authors, genres and comments", long_about = None)]
pub struct Cli {
    /// Config file (TOML). Defaults to ./libcat.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum, global = true)]
    pub storage: Option<StorageKind>,

    /// Fill an empty catalog with demo data before running
    #[arg(long, global = true)]
    pub seed: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for log files. File logging is off without it
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the interactive shell
    Shell,

    #[command(flatten)]
    Catalog(CatalogCommand),
}

/// Catalog operations available in both front-ends.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CatalogCommand {
    /// List all authors
    Authors,

    /// List all genres
    Genres,

    /// List all books
    Books,

    /// Show one book with its comments
    Book {
        id: EntityId,
    },

    /// Add a book
    BookAdd {
        #[arg(long)]
        title: String,
        /// Author id
        #[arg(long)]
        author: EntityId,
        /// Genre ids
        #[arg(long = "genre", required = true, num_args = 1..)]
        genres: Vec<EntityId>,
    },

    /// Replace title, author and genres of a book
    BookUpdate {
        id: EntityId,
        #[arg(long)]
        title: String,
        /// Author id
        #[arg(long)]
        author: EntityId,
        /// Genre ids
        #[arg(long = "genre", required = true, num_args = 1..)]
        genres: Vec<EntityId>,
    },

    /// Delete a book with its comments
    BookDelete {
        id: EntityId,
    },

    /// List comments of a book
    Comments {
        book_id: EntityId,
    },

    /// Show one comment
    Comment {
        id: EntityId,
    },

    /// Add a comment to a book
    CommentAdd {
        /// Book id
        #[arg(long)]
        book: EntityId,
        #[arg(long)]
        text: String,
    },

    /// Replace the text of a comment
    CommentUpdate {
        id: EntityId,
        #[arg(long)]
        text: String,
    },

    /// Delete a comment
    CommentDelete {
        id: EntityId,
    },

    /// Introduce yourself
    Whoami,
}

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(name = "libcat", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,

    #[command(flatten)]
    Catalog(CatalogCommand),
}

#[cfg(test)]
mod tests {
    use super::{CatalogCommand, Cli, Command, ShellCommand, ShellLine};
    use clap::{CommandFactory, Parser};

    #[test]
    fn grammar_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn book_add_accepts_repeated_and_grouped_genres() {
        let cli = Cli::try_parse_from([
            "libcat", "book-add", "--title", "Dune", "--author", "1", "--genre", "2", "3",
            "--genre", "5",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Command::Catalog(CatalogCommand::BookAdd { ref genres, .. }) if genres == &vec![2, 3, 5]
        ));
    }

    #[test]
    fn shell_line_parses_without_binary_name() {
        let line = ShellLine::try_parse_from(["comment", "7"]).unwrap();
        assert!(matches!(
            line.command,
            ShellCommand::Catalog(CatalogCommand::Comment { id: 7 })
        ));

        let quit = ShellLine::try_parse_from(["quit"]).unwrap();
        assert!(matches!(quit.command, ShellCommand::Exit));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["libcat", "books", "--storage", "memory", "--seed"]).unwrap();
        assert!(cli.seed);
        assert!(cli.storage.is_some());
    }
}
