//! Student identification use-case.
//!
//! # Responsibility
//! - Ask the person at the console for first and last name.
//!
//! # Invariants
//! - Names are trimmed; blank answers are rejected.

use crate::model::student::Student;
use crate::service::{ServiceError, ServiceResult};
use std::io::{self, BufRead, Write};

pub const FIRST_NAME_PROMPT: &str = "Please input your first name";
pub const LAST_NAME_PROMPT: &str = "Please input your last name";

/// Console seam used by interactive use-cases.
pub trait IoService {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    /// Prints `prompt` and reads one line without its trailing newline.
    fn read_string_with_prompt(&mut self, prompt: &str) -> io::Result<String>;
}

/// `IoService` over any buffered reader and writer pair.
pub struct StreamsIoService<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamsIoService<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> IoService for StreamsIoService<R, W> {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    fn read_string_with_prompt(&mut self, prompt: &str) -> io::Result<String> {
        self.print_line(prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

pub struct StudentService<I: IoService> {
    io: I,
}

impl<I: IoService> StudentService<I> {
    pub fn new(io: I) -> Self {
        Self { io }
    }

    pub fn determine_current_student(&mut self) -> ServiceResult<Student> {
        let first_name = self.ask(FIRST_NAME_PROMPT, "first name")?;
        let last_name = self.ask(LAST_NAME_PROMPT, "last name")?;
        Ok(Student::new(first_name, last_name))
    }

    fn ask(&mut self, prompt: &str, field: &str) -> ServiceResult<String> {
        let answer = self.io.read_string_with_prompt(prompt)?;
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Validation(format!("{field} must not be blank")));
        }
        Ok(trimmed.to_string())
    }
}
