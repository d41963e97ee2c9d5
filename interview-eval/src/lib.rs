//! # interview-eval
//!
//! Grades a finished interview transcript with four LLM-judged metrics:
//! answer relevancy, contextual precision, contextual recall and
//! faithfulness.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use interview_eval::{JudgeAdapter, load_transcript, run_evaluation};
//!
//! let transcript = load_transcript("interview_data.json")?;
//! let judge = Arc::new(JudgeAdapter::new(model));
//! let results = run_evaluation(judge, &transcript, 0.7).await?;
//! for (metric, record) in &results {
//!     println!("{metric}: {:?} passed={}", record.score, record.passed());
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod test_case;

pub use adapter::{JudgeAdapter, JudgeModel};
pub use error::{EvalError, Result};
pub use evaluator::{
    DEFAULT_THRESHOLD, EvaluationResults, Evaluator, load_transcript, parse_transcript,
    run_evaluation, save_results, validate_threshold,
};
pub use metrics::{
    AnswerRelevancyMetric, ContextualPrecisionMetric, ContextualRecallMetric, EvaluationRecord,
    FaithfulnessMetric, Metric, MetricKind,
};
pub use test_case::{LlmTestCase, build_test_cases};
