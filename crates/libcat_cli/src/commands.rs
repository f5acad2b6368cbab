//! Executes one catalog command against the wired services.

use crate::catalog::Catalog;
use crate::cli::CatalogCommand;
use crate::format::{write_list, write_one, OutputFormat};
use anyhow::Result;
use libcat_core::{EntityId, EntityKind, ServiceError, StreamsIoService, StudentService};
use log::{debug, warn};
use std::io::{BufRead, Write};

/// How a command ended when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The catalog refused the request; the reason was already printed.
    Rejected,
}

/// Runs `command`, writing results to `out`.
///
/// Missing entities and invalid input are reported on `out` and yield
/// [`Outcome::Rejected`]. Storage and IO faults are returned as errors.
pub fn execute<R: BufRead, W: Write>(
    catalog: &Catalog<'_>,
    command: &CatalogCommand,
    input: &mut R,
    out: &mut W,
    format: OutputFormat,
) -> Result<Outcome> {
    let name = command_name(command);
    match dispatch(catalog, command, input, out, format) {
        Ok(()) => {
            debug!("event=command module=cli status=ok name={name}");
            Ok(Outcome::Done)
        }
        Err(err) => match err.downcast_ref::<ServiceError>() {
            Some(ServiceError::NotFound(message)) | Some(ServiceError::Validation(message)) => {
                warn!("event=command module=cli status=rejected name={name}");
                writeln!(out, "{message}")?;
                Ok(Outcome::Rejected)
            }
            _ => Err(err),
        },
    }
}

fn dispatch<R: BufRead, W: Write>(
    catalog: &Catalog<'_>,
    command: &CatalogCommand,
    input: &mut R,
    out: &mut W,
    format: OutputFormat,
) -> Result<()> {
    match command {
        CatalogCommand::Authors => write_list(out, format, &catalog.authors.find_all()?),
        CatalogCommand::Genres => write_list(out, format, &catalog.genres.find_all()?),
        CatalogCommand::Books => write_list(out, format, &catalog.books.find_all()?),
        CatalogCommand::Book { id } => {
            let book = catalog
                .books
                .find_by_id(*id)?
                .ok_or_else(|| missing(EntityKind::Book, *id))?;
            write_one(out, format, &book)
        }
        CatalogCommand::BookAdd {
            title,
            author,
            genres,
        } => {
            let book = catalog.books.insert(title, *author, genres)?;
            write_one(out, format, &book)
        }
        CatalogCommand::BookUpdate {
            id,
            title,
            author,
            genres,
        } => {
            let book = catalog.books.update(*id, title, *author, genres)?;
            write_one(out, format, &book)
        }
        CatalogCommand::BookDelete { id } => Ok(catalog.books.delete_by_id(*id)?),
        CatalogCommand::Comments { book_id } => write_list(
            out,
            format,
            &catalog.comments.find_all_by_book_id(*book_id)?,
        ),
        CatalogCommand::Comment { id } => {
            let comment = catalog
                .comments
                .find_by_id(*id)?
                .ok_or_else(|| missing(EntityKind::Comment, *id))?;
            write_one(out, format, &comment)
        }
        CatalogCommand::CommentAdd { book, text } => {
            let comment = catalog.comments.insert(text, *book)?;
            write_one(out, format, &comment)
        }
        CatalogCommand::CommentUpdate { id, text } => {
            let comment = catalog.comments.update(*id, text)?;
            write_one(out, format, &comment)
        }
        CatalogCommand::CommentDelete { id } => Ok(catalog.comments.delete_by_id(*id)?),
        CatalogCommand::Whoami => {
            let student = {
                let io = StreamsIoService::new(&mut *input, &mut *out);
                StudentService::new(io).determine_current_student()?
            };
            writeln!(out, "Hello, {student}!")?;
            Ok(())
        }
    }
}

fn missing(entity: EntityKind, id: EntityId) -> ServiceError {
    ServiceError::NotFound(format!("{entity} with id {id} not found"))
}

fn command_name(command: &CatalogCommand) -> &'static str {
    match command {
        CatalogCommand::Authors => "authors",
        CatalogCommand::Genres => "genres",
        CatalogCommand::Books => "books",
        CatalogCommand::Book { .. } => "book",
        CatalogCommand::BookAdd { .. } => "book-add",
        CatalogCommand::BookUpdate { .. } => "book-update",
        CatalogCommand::BookDelete { .. } => "book-delete",
        CatalogCommand::Comments { .. } => "comments",
        CatalogCommand::Comment { .. } => "comment",
        CatalogCommand::CommentAdd { .. } => "comment-add",
        CatalogCommand::CommentUpdate { .. } => "comment-update",
        CatalogCommand::CommentDelete { .. } => "comment-delete",
        CatalogCommand::Whoami => "whoami",
    }
}
