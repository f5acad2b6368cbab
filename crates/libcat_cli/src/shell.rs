//! Interactive read-eval-print loop over catalog commands.

use crate::catalog::Catalog;
use crate::cli::{ShellCommand, ShellLine};
use crate::commands::execute;
use crate::format::OutputFormat;
use anyhow::Result;
use clap::Parser;
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Write};

pub const PROMPT: &str = "libcat> ";

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|'([^']*)'|(\S+)"#).expect("valid token regex"));

/// Splits a shell line into arguments. Quoted runs keep their spaces.
pub fn tokenize(line: &str) -> Vec<String> {
    TOKEN_RE
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|token| token.as_str().to_string())
        .collect()
}

/// Reads commands from `input` until `exit` or end of input.
///
/// Parse errors and failed commands are reported and the loop continues.
pub fn run_shell<R: BufRead, W: Write>(
    catalog: &Catalog<'_>,
    input: &mut R,
    out: &mut W,
    format: OutputFormat,
) -> Result<()> {
    info!("event=shell_start module=cli status=ok");
    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let tokens = tokenize(&line);
        if tokens.is_empty() {
            continue;
        }

        let parsed = match ShellLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed,
            Err(err) => {
                write!(out, "{}", err.render())?;
                continue;
            }
        };

        match parsed.command {
            ShellCommand::Exit => break,
            ShellCommand::Catalog(command) => {
                if let Err(err) = execute(catalog, &command, input, out, format) {
                    error!("event=command module=cli status=error error={err}");
                    writeln!(out, "Error: {err:#}")?;
                }
            }
        }
    }
    info!("event=shell_stop module=cli status=ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run_shell, tokenize};
    use crate::catalog::Catalog;
    use crate::format::OutputFormat;
    use libcat_core::MemoryStore;
    use std::io::Cursor;

    fn session(store: &MemoryStore, script: &str) -> String {
        let catalog = Catalog::memory(store);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        run_shell(&catalog, &mut input, &mut out, OutputFormat::Text).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn tokenize_keeps_quoted_phrases_together() {
        assert_eq!(
            tokenize(r#"book-add --title "War and Peace" --author 1 --genre 2 3"#),
            vec!["book-add", "--title", "War and Peace", "--author", "1", "--genre", "2", "3"]
        );
        assert_eq!(
            tokenize("comment-update 4 --text 'so-so'"),
            vec!["comment-update", "4", "--text", "so-so"]
        );
        assert!(tokenize("   \n").is_empty());
    }

    #[test]
    fn tokenize_keeps_empty_quotes_as_empty_argument() {
        assert_eq!(
            tokenize(r#"comment-add --book 1 --text """#),
            vec!["comment-add", "--book", "1", "--text", ""]
        );
    }

    #[test]
    fn session_runs_until_exit() {
        let store = MemoryStore::with_demo_data();
        let out = session(&store, "authors\nexit\nbooks\n");

        assert!(out.contains("Id: 3, FullName: Author_3"));
        assert!(!out.contains("BookTitle_1"));
    }

    #[test]
    fn session_survives_unknown_command_and_missing_entity() {
        let store = MemoryStore::with_demo_data();
        let out = session(&store, "frobnicate\ncomment 100\ngenres\n");

        assert!(out.contains("frobnicate"));
        assert!(out.contains("Comment with id 100 not found"));
        assert!(out.contains("Id: 6, Name: Genre_6"));
    }

    #[test]
    fn session_changes_are_visible_to_later_commands() {
        let store = MemoryStore::with_demo_data();
        let out = session(
            &store,
            "book-update 1 --title \"Renamed\" --author 2 --genre 3\nbook 1\nquit\n",
        );

        assert!(out.contains("Id: 1, title: Renamed, author: {Id: 2, FullName: Author_2}"));
    }
}
