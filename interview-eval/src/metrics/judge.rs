//! Judge prompting and verdict parsing shared by the metrics.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::MetricKind;
use crate::adapter::JudgeModel;
use crate::error::{EvalError, Result};

/// Appended to every prompt that expects structured output.
pub(crate) const JSON_ONLY: &str = "Respond with JSON only. Do not wrap it in markdown.";

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Verdict {
    pub verdict: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Verdict {
    pub fn is(&self, label: &str) -> bool {
        self.verdict.trim().eq_ignore_ascii_case(label)
    }

    /// The judge's reason, or `fallback` when it gave none.
    pub fn finding(&self, fallback: &str) -> String {
        self.reason.clone().filter(|r| !r.trim().is_empty()).unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Verdicts {
    #[serde(default)]
    pub verdicts: Vec<Verdict>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Statements {
    #[serde(default)]
    pub statements: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Claims {
    #[serde(default)]
    pub claims: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Reason {
    reason: String,
}

/// The outermost `{...}` span of `raw`, ignoring fences and chatter.
pub(crate) fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Send `prompt` and decode the judge's JSON answer.
pub(crate) async fn ask<T: DeserializeOwned>(
    judge: &dyn JudgeModel,
    metric: MetricKind,
    prompt: &str,
) -> Result<T> {
    let raw = judge.generate(prompt).await?;
    let json = extract_json(&raw).ok_or_else(|| EvalError::Metric {
        metric: metric.to_string(),
        message: format!("{} returned no JSON object", judge.model_name()),
    })?;
    serde_json::from_str(json).map_err(|e| EvalError::Metric {
        metric: metric.to_string(),
        message: format!("malformed judge output: {e}"),
    })
}

/// Ask the judge to explain an aggregated score.
///
/// Falls back to the raw reply when it is not the expected JSON.
pub(crate) async fn explain(
    judge: &dyn JudgeModel,
    metric: MetricKind,
    score: f64,
    findings: &[String],
) -> Result<String> {
    let listed = if findings.is_empty() {
        "None".to_string()
    } else {
        findings.iter().map(|f| format!("- {f}")).collect::<Vec<_>>().join("\n")
    };
    let prompt = format!(
        "Give a concise reason for the {metric} score.\n\n\
         Score: {score:.2}\n\n\
         Findings that lowered the score:\n{listed}\n\n\
         {JSON_ONLY} Format: {{\"reason\": \"...\"}}"
    );

    let raw = judge.generate(&prompt).await?;
    Ok(extract_json(&raw)
        .and_then(|json| serde_json::from_str::<Reason>(json).ok())
        .map(|r| r.reason)
        .unwrap_or_else(|| raw.trim().to_string()))
}

/// Render `items` as a JSON array for embedding in a prompt.
pub(crate) fn json_list(items: &[String]) -> String {
    serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
}

/// Fraction of verdicts not labelled `no`; `empty` when there are none.
pub(crate) fn non_negative_ratio(verdicts: &[Verdict], empty: f64) -> f64 {
    if verdicts.is_empty() {
        return empty;
    }
    verdicts.iter().filter(|v| !v.is("no")).count() as f64 / verdicts.len() as f64
}
