//! Text and JSON rendering of catalog entities.

use anyhow::Result;
use libcat_core::{Author, Book, Comment, Genre};
use serde::Serialize;
use std::io::Write;

const LIST_SEPARATOR: &str = ",\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Single-line text form of an entity.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Author {
    fn render(&self) -> String {
        format!("Id: {}, FullName: {}", self.id, self.full_name)
    }
}

impl Render for Genre {
    fn render(&self) -> String {
        format!("Id: {}, Name: {}", self.id, self.name)
    }
}

impl Render for Comment {
    fn render(&self) -> String {
        format!("Id: {}, text: {}, bookId: {}", self.id, self.text, self.book_id)
    }
}

impl Render for Book {
    fn render(&self) -> String {
        let mut line = format!(
            "Id: {}, title: {}, author: {{{}}}, genres: [{}]",
            self.id,
            self.title,
            self.author.render(),
            braced(&self.genres)
        );
        if !self.comments.is_empty() {
            line.push_str(&format!(", comments: [{}]", braced(&self.comments)));
        }
        line
    }
}

fn braced<T: Render>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("{{{}}}", item.render()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn write_one<T, W>(out: &mut W, format: OutputFormat, item: &T) -> Result<()>
where
    T: Render + Serialize,
    W: Write + ?Sized,
{
    match format {
        OutputFormat::Text => writeln!(out, "{}", item.render())?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(item)?)?,
    }
    Ok(())
}

/// Writes a list. Text output puts one entity per line, separated by commas.
pub fn write_list<T, W>(out: &mut W, format: OutputFormat, items: &[T]) -> Result<()>
where
    T: Render + Serialize,
    W: Write + ?Sized,
{
    match format {
        OutputFormat::Text => {
            let lines: Vec<String> = items.iter().map(Render::render).collect();
            writeln!(out, "{}", lines.join(LIST_SEPARATOR))?;
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(items)?)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_list, write_one, OutputFormat, Render};
    use libcat_core::{Author, Book, Comment, Genre};

    fn book() -> Book {
        Book::new(
            1,
            "BookTitle_1",
            Author::new(1, "Author_1"),
            vec![Genre::new(1, "Genre_1"), Genre::new(2, "Genre_2")],
        )
    }

    #[test]
    fn book_renders_author_and_genres_inline() {
        assert_eq!(
            book().render(),
            "Id: 1, title: BookTitle_1, author: {Id: 1, FullName: Author_1}, \
             genres: [{Id: 1, Name: Genre_1}, {Id: 2, Name: Genre_2}]"
        );
    }

    #[test]
    fn book_with_comments_appends_them() {
        let rendered = book()
            .with_comments(vec![Comment::new(4, "Comment_4", 1)])
            .render();
        assert!(rendered.ends_with(", comments: [{Id: 4, text: Comment_4, bookId: 1}]"));
    }

    #[test]
    fn text_list_is_joined_with_comma_newline() {
        let mut out = Vec::new();
        let authors = vec![Author::new(1, "Author_1"), Author::new(2, "Author_2")];
        write_list(&mut out, OutputFormat::Text, &authors).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Id: 1, FullName: Author_1,\nId: 2, FullName: Author_2\n"
        );
    }

    #[test]
    fn json_output_omits_empty_comments() {
        let mut out = Vec::new();
        write_one(&mut out, OutputFormat::Json, &book()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["title"], "BookTitle_1");
        assert_eq!(value["genres"].as_array().unwrap().len(), 2);
        assert!(value.get("comments").is_none());
    }
}
