//! Line prompts for template values

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::TemplatemanError;

/// Source of answers for template variables
pub trait Prompter {
    /// Ask for a value for `label`. An empty answer yields `default`.
    fn prompt(&mut self, label: &str, default: &str) -> Result<String, TemplatemanError>;
}

/// Prompts on a writer (stderr by default) and reads answers line by line
pub struct StdinPrompter<R, W> {
    reader: R,
    writer: W,
}

impl StdinPrompter<io::StdinLock<'static>, io::Stderr> {
    pub fn new() -> Self {
        Self {
            reader: io::stdin().lock(),
            writer: io::stderr(),
        }
    }
}

impl Default for StdinPrompter<io::StdinLock<'static>, io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinPrompter<R, W> {
    pub fn with_io(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Prompter for StdinPrompter<R, W> {
    fn prompt(&mut self, label: &str, default: &str) -> Result<String, TemplatemanError> {
        if default.is_empty() {
            write!(self.writer, "{label}: ")?;
        } else {
            write!(self.writer, "{label} [{default}]: ")?;
        }
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            // Keep the terminal tidy after ^D
            writeln!(self.writer)?;
            return Err(TemplatemanError::PromptAborted {
                name: label.to_string(),
            });
        }

        let answer = strip_line_ending(&line);
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Prompter answering from a fixed script, recording every question asked
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<(String, String)>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// `(label, default)` pairs in the order they were asked
    pub fn asked(&self) -> &[(String, String)] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, label: &str, default: &str) -> Result<String, TemplatemanError> {
        self.asked.push((label.to_string(), default.to_string()));
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| TemplatemanError::PromptAborted {
                name: label.to_string(),
            })?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> StdinPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        StdinPrompter::with_io(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn answer_is_returned_verbatim() {
        let mut p = prompter("  spaced out \n");
        assert_eq!(p.prompt("name", "").unwrap(), "  spaced out ");
    }

    #[test]
    fn empty_answer_uses_default() {
        let mut p = prompter("\n");
        assert_eq!(p.prompt("name", "World").unwrap(), "World");
    }

    #[test]
    fn crlf_is_stripped() {
        let mut p = prompter("value\r\n");
        assert_eq!(p.prompt("name", "").unwrap(), "value");
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let mut p = prompter("tail");
        assert_eq!(p.prompt("name", "").unwrap(), "tail");
    }

    #[test]
    fn prompt_shows_default_in_brackets() {
        let mut p = prompter("\n\n");
        p.prompt("author", "nobody").unwrap();
        p.prompt("title", "").unwrap();
        let shown = String::from_utf8(p.writer.clone()).unwrap();
        assert_eq!(shown, "author [nobody]: title: ");
    }

    #[test]
    fn one_line_per_prompt() {
        let mut p = prompter("first\nsecond\n");
        assert_eq!(p.prompt("a", "").unwrap(), "first");
        assert_eq!(p.prompt("b", "").unwrap(), "second");
    }

    #[test]
    fn end_of_input_aborts() {
        let mut p = prompter("");
        let err = p.prompt("name", "x").unwrap_err();
        assert!(matches!(err, TemplatemanError::PromptAborted { ref name } if name == "name"));
    }

    #[test]
    fn scripted_records_questions() {
        let mut p = ScriptedPrompter::new(["", "b"]);
        assert_eq!(p.prompt("first", "dflt").unwrap(), "dflt");
        assert_eq!(p.prompt("second", "").unwrap(), "b");
        assert!(p.prompt("third", "").is_err());
        assert_eq!(p.asked().len(), 3);
        assert_eq!(p.asked()[0], ("first".to_string(), "dflt".to_string()));
    }
}
