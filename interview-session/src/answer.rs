//! Sources of the candidate's answers.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

/// Supplies the candidate's answer to a question.
///
/// The session calls [`answer`](AnswerProvider::answer) exactly once per
/// turn, in question order.
#[async_trait]
pub trait AnswerProvider: Send {
    async fn answer(&mut self, question: &str) -> Result<String>;
}

/// Pre-scripted answers consumed in order.
///
/// Once the script is drained every further answer is an empty string.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    queue: VecDeque<String>,
}

impl ScriptedAnswers {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { queue: answers.into_iter().map(Into::into).collect() }
    }

    /// One answer per non-blank line, trimmed.
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    /// Read a newline-delimited answers file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_lines(&fs::read_to_string(path)?))
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

#[async_trait]
impl AnswerProvider for ScriptedAnswers {
    async fn answer(&mut self, question: &str) -> Result<String> {
        Ok(self.queue.pop_front().unwrap_or_else(|| {
            debug!(question, "answer script exhausted, answering with empty string");
            String::new()
        }))
    }
}

/// Prompts on a writer and reads one line per answer from a reader.
pub struct InteractiveAnswers<R, W> {
    reader: R,
    writer: W,
}

impl InteractiveAnswers<BufReader<Stdin>, Stdout> {
    /// Prompt on stdout and read from stdin.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> InteractiveAnswers<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

#[async_trait]
impl<R, W> AnswerProvider for InteractiveAnswers<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    async fn answer(&mut self, question: &str) -> Result<String> {
        write!(self.writer, "\nQUESTION: {question}\nYour answer: ")?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[tokio::test]
    async fn scripted_answers_drain_to_empty_strings() {
        let mut answers = ScriptedAnswers::from_lines("first\n\n  second  \n");
        assert_eq!(answers.remaining(), 2);
        assert_eq!(answers.answer("q1").await.unwrap(), "first");
        assert_eq!(answers.answer("q2").await.unwrap(), "second");
        assert_eq!(answers.answer("q3").await.unwrap(), "");
        assert_eq!(answers.answer("q4").await.unwrap(), "");
    }

    #[tokio::test]
    async fn scripted_answers_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.txt");
        fs::write(&path, "one\ntwo\n").unwrap();

        let mut answers = ScriptedAnswers::from_file(&path).unwrap();
        assert_eq!(answers.answer("q").await.unwrap(), "one");
    }

    #[test]
    fn missing_answers_file_is_an_error() {
        assert!(ScriptedAnswers::from_file("/definitely/not/here.txt").is_err());
    }

    #[tokio::test]
    async fn interactive_prints_question_and_reads_line() {
        let mut output = Vec::new();
        {
            let input = Cursor::new("  I used Raft.  \nnext\n");
            let mut answers = InteractiveAnswers::new(input, &mut output);
            assert_eq!(answers.answer("What is consensus?").await.unwrap(), "I used Raft.");
        }
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("QUESTION: What is consensus?"));
        assert!(printed.ends_with("Your answer: "));
    }

    #[tokio::test]
    async fn interactive_eof_gives_empty_answer() {
        let mut answers = InteractiveAnswers::new(Cursor::new(""), Vec::new());
        assert_eq!(answers.answer("q").await.unwrap(), "");
    }
}
