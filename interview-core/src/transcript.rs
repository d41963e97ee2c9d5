//! Interview turns and the transcript that collects them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One completed question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterviewTurn {
    /// The generated interview question.
    pub question: String,
    /// The candidate's answer, empty when no answer was available.
    pub user_answer: String,
    /// The reference answer generated from the resolved context.
    pub generated_answer: String,
    /// The context the reference answer was grounded on.
    pub relevant_context: String,
}

/// The ordered record of every turn of one session.
///
/// Turns can only be appended; there is no API to reorder, edit, or remove
/// them. Serializes as a plain JSON array of [`InterviewTurn`] objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<InterviewTurn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed turn.
    pub fn push(&mut self, turn: InterviewTurn) {
        self.turns.push(turn);
    }

    /// All turns in the order they were recorded.
    pub fn turns(&self) -> &[InterviewTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InterviewTurn> {
        self.turns.iter()
    }

    /// Decode a transcript from its JSON array form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the transcript as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a transcript file written by [`Transcript::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the transcript to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

impl From<Vec<InterviewTurn>> for Transcript {
    fn from(turns: Vec<InterviewTurn>) -> Self {
        Self { turns }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a InterviewTurn;
    type IntoIter = std::slice::Iter<'a, InterviewTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
