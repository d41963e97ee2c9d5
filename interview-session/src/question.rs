//! Interview question generation.

use std::sync::Arc;

use interview_core::CompletionModel;
use interview_rag::Retriever;
use tracing::info;

use crate::error::Result;

/// Number of questions requested from (and kept by) the direct-generation path.
pub const FALLBACK_QUESTION_COUNT: usize = 8;

/// Produces the ordered question list for a session.
///
/// With a retriever configured, the composite prompt is issued as a single
/// retrieval query and the returned lines are used as-is; nothing checks
/// that they read as questions. Without one, the engine is asked directly
/// for [`FALLBACK_QUESTION_COUNT`] line-delimited questions.
pub struct QuestionGenerator {
    model: Arc<dyn CompletionModel>,
    retriever: Option<Arc<dyn Retriever>>,
}

impl QuestionGenerator {
    pub fn new(model: Arc<dyn CompletionModel>, retriever: Option<Arc<dyn Retriever>>) -> Self {
        Self { model, retriever }
    }

    pub fn uses_retriever(&self) -> bool {
        self.retriever.is_some()
    }

    pub async fn generate_questions(
        &self,
        cv_text: &str,
        jd_text: &str,
        objective: &str,
    ) -> Result<Vec<String>> {
        let prompt = question_prompt(cv_text, jd_text, objective);

        let questions = match &self.retriever {
            Some(retriever) => retriever.query(&prompt).await?,
            None => {
                let prompt = format!(
                    "{prompt}\nList {FALLBACK_QUESTION_COUNT} questions, each on a new line."
                );
                let raw = self.model.complete(&prompt).await?;
                parse_question_lines(&raw)
            }
        };

        info!(
            question_count = questions.len(),
            via_retriever = self.uses_retriever(),
            "generated questions"
        );
        Ok(questions)
    }
}

fn question_prompt(cv_text: &str, jd_text: &str, objective: &str) -> String {
    let objective = objective.trim();
    let objective_block = if objective.is_empty() {
        String::new()
    } else {
        format!("Interview objective:\n{objective}\n\n")
    };
    format!(
        "You are conducting an in-depth interview based on the following documents:\n\n\
         Candidate's CV:\n{cv_text}\n\n\
         Job Description:\n{jd_text}\n\n\
         {objective_block}\
         Generate a structured sequence of interview questions that build progressively on previous answers. \
         Focus on skills, problem-solving, and role alignment. Do not include explanations, only the questions."
    )
}

/// Split raw completion text into at most [`FALLBACK_QUESTION_COUNT`]
/// questions, dropping bullet markers and blank lines.
pub fn parse_question_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            line.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '•'))
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(FALLBACK_QUESTION_COUNT)
        .map(str::to_string)
        .collect()
}
