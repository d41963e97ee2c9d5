//! The two entry points: run an interview, grade a transcript.

use std::sync::Arc;

use anyhow::{Context, Result};
use interview_core::{CompletionModel, Transcript};
use interview_eval::{
    EvaluationResults, JudgeAdapter, JudgeModel, load_transcript, run_evaluation, save_results,
    validate_threshold,
};
use interview_model::GroqClient;
use interview_rag::{EmbeddingProvider, Reranker, RetrieverConfig, SentenceWindowRetriever};
use interview_session::{AnswerProvider, InteractiveAnswers, InterviewSession, ScriptedAnswers};
use tracing::info;

use crate::cli::{EvaluateArgs, InterviewArgs};
use crate::config::AppConfig;
use crate::extract::{extract_text, load_reference_documents};

/// Dimensions of the hashing embedder used when built without default features.
#[cfg(not(feature = "fastembed"))]
pub const HASH_EMBEDDING_DIMENSIONS: usize = 384;

/// Run an interview against Groq and save the transcript to `args.output`.
///
/// A missing API key fails here, before any file is read.
pub async fn interview(config: &AppConfig, args: &InterviewArgs) -> Result<Transcript> {
    let model: Arc<dyn CompletionModel> = Arc::new(GroqClient::new(config.groq_config())?);
    let (embedder, reranker) = retrieval_backends(&config.retriever_config()?)?;

    match &args.answers {
        Some(path) => {
            let mut answers = ScriptedAnswers::from_file(path)
                .with_context(|| format!("failed to read answers from {}", path.display()))?;
            info!(answer_count = answers.remaining(), "using pre-scripted answers");
            interview_with(model, embedder, reranker, config, args, &mut answers).await
        }
        None => {
            let mut answers = InteractiveAnswers::stdio();
            interview_with(model, embedder, reranker, config, args, &mut answers).await
        }
    }
}

/// [`interview`] with the engine, retrieval backends and answer source supplied.
pub async fn interview_with(
    model: Arc<dyn CompletionModel>,
    embedder: Arc<dyn EmbeddingProvider>,
    reranker: Arc<dyn Reranker>,
    config: &AppConfig,
    args: &InterviewArgs,
    answers: &mut dyn AnswerProvider,
) -> Result<Transcript> {
    let retriever_config = config.retriever_config()?;

    let cv_text = extract_text(&args.cv)?;
    let jd_text = extract_text(&args.jd)?;
    let references = load_reference_documents(&args.refs)?;
    info!(reference_count = references.len(), "loaded documents");

    let retriever =
        SentenceWindowRetriever::build_or_load(retriever_config, &references, embedder, reranker)
            .await
            .context("failed to prepare the sentence index")?;

    let mut session = InterviewSession::builder()
        .model(model)
        .cv_text(cv_text)
        .jd_text(jd_text)
        .objective(args.objective.clone())
        .reference_documents(references)
        .retriever(Arc::new(retriever))
        .context_strategy(config.context_strategy)
        .build()?;

    let transcript = session.run(answers).await?;
    transcript
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(path = %args.output.display(), turn_count = transcript.len(), "saved interview data");
    Ok(transcript)
}

/// Grade `args.data` with Groq as the judge and save the results.
pub async fn evaluate(config: &AppConfig, args: &EvaluateArgs) -> Result<EvaluationResults> {
    let model: Arc<dyn CompletionModel> = Arc::new(GroqClient::new(config.groq_config())?);
    evaluate_with(Arc::new(JudgeAdapter::new(model)), args).await
}

/// [`evaluate`] with the judge supplied.
pub async fn evaluate_with(
    judge: Arc<dyn JudgeModel>,
    args: &EvaluateArgs,
) -> Result<EvaluationResults> {
    validate_threshold(args.threshold)?;
    let transcript = load_transcript(&args.data)
        .with_context(|| format!("failed to load transcript {}", args.data.display()))?;

    let results = run_evaluation(judge, &transcript, args.threshold).await?;
    for (metric, record) in &results {
        info!(metric = %metric, score = ?record.score, passed = record.passed(), "metric result");
    }

    save_results(&results, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(path = %args.output.display(), "saved evaluation results");
    Ok(results)
}

#[cfg(feature = "fastembed")]
fn retrieval_backends(
    config: &RetrieverConfig,
) -> Result<(Arc<dyn EmbeddingProvider>, Arc<dyn Reranker>)> {
    use interview_rag::{FastEmbedProvider, FastEmbedReranker};

    let embedder = FastEmbedProvider::try_new(&config.embedding_model)?;
    let reranker = FastEmbedReranker::try_new(&config.reranker_model)?;
    Ok((Arc::new(embedder), Arc::new(reranker)))
}

#[cfg(not(feature = "fastembed"))]
fn retrieval_backends(
    config: &RetrieverConfig,
) -> Result<(Arc<dyn EmbeddingProvider>, Arc<dyn Reranker>)> {
    use interview_rag::{HashEmbeddingProvider, LexicalReranker};

    tracing::warn!(
        embedding_model = %config.embedding_model,
        reranker_model = %config.reranker_model,
        "built without the fastembed feature, using the hashing embedder and lexical reranker"
    );
    let embedder = HashEmbeddingProvider::new("hash/fnv1a", HASH_EMBEDDING_DIMENSIONS)?;
    Ok((Arc::new(embedder), Arc::new(LexicalReranker::default())))
}

#[cfg(all(test, feature = "fastembed"))]
mod tests {
    use super::*;

    #[test]
    fn configured_embedding_model_is_loaded() {
        let config = RetrieverConfig::builder()
            .embedding_model("acme/no-such-embedder")
            .build()
            .unwrap();

        let err = retrieval_backends(&config).err().unwrap();
        assert!(format!("{err:#}").contains("acme/no-such-embedder"));
    }
}
