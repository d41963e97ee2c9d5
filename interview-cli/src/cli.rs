//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use interview_eval::DEFAULT_THRESHOLD;

/// Default transcript file written by `interview` and read by `evaluate`.
pub const INTERVIEW_DATA_FILE: &str = "interview_data.json";

/// Default results file written by `evaluate`.
pub const EVALUATION_RESULTS_FILE: &str = "evaluation_results.json";

#[derive(Debug, Parser)]
#[command(
    name = "mock-interview",
    version,
    about = "Context-grounded mock interviews with automated grading"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an interview session and save the transcript
    Interview(InterviewArgs),
    /// Grade a saved transcript with the quality metrics
    Evaluate(EvaluateArgs),
}

#[derive(Debug, Args)]
pub struct InterviewArgs {
    /// Candidate CV (PDF, RTF or text)
    #[arg(long)]
    pub cv: PathBuf,

    /// Job description (PDF, RTF or text)
    #[arg(long)]
    pub jd: PathBuf,

    /// Reference files to ground questions and answers
    #[arg(long, num_args = 1.., required = true)]
    pub refs: Vec<PathBuf>,

    /// Text file with one answer per line, instead of answering interactively
    #[arg(long = "non-interactive-answers", alias = "non_interactive_answers")]
    pub answers: Option<PathBuf>,

    /// What the interview should assess
    #[arg(long, default_value = "")]
    pub objective: String,

    /// Where to write the transcript
    #[arg(long, default_value = INTERVIEW_DATA_FILE)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Transcript written by `interview`
    #[arg(long, default_value = INTERVIEW_DATA_FILE)]
    pub data: PathBuf,

    /// Score a metric must reach to pass, between 0 and 1
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Where to write the results
    #[arg(long, default_value = EVALUATION_RESULTS_FILE)]
    pub output: PathBuf,
}
