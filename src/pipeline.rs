use chrono::Utc;
use std::path::Path;
use tracing::info;

use crate::chunker::chunk_text;
use crate::classifier::{ChunkClassifier, GeminiClient};
use crate::config::Config;
use crate::error::Result;
use crate::merge::merge_document;
use crate::model::{AnalysisRecord, ClassificationDocument};
use crate::persistence::{DatabaseWriter, ResultsWriter};
use crate::transcript::TranscriptExtractor;

/// Caller-supplied or generated run identifiers, immutable for the run.
#[derive(Debug, Clone)]
pub struct RunIdentifiers {
    pub analysis_id: String,
    pub transcript_id: String,
    pub creator_id: String,
}

/// One full worker run: extract, chunk, classify, merge, persist.
///
/// Fully sequential; the first failing stage aborts the run and nothing
/// partial is written.
pub async fn run(
    config: &Config,
    file: &Path,
    ids: RunIdentifiers,
    skip_db: bool,
) -> Result<AnalysisRecord> {
    // Fail on a missing API key before spending transcription time.
    let classifier = GeminiClient::new(config.classifier.clone())?;
    run_with_classifier(config, &classifier, file, ids, skip_db).await
}

/// Run the pipeline against any classifier backend.
pub async fn run_with_classifier(
    config: &Config,
    classifier: &dyn ChunkClassifier,
    file: &Path,
    ids: RunIdentifiers,
    skip_db: bool,
) -> Result<AnalysisRecord> {
    let extractor = TranscriptExtractor::new(config.transcription.clone());
    extractor.report_backends().await;

    info!("Extracting transcript from {}", file.display());
    let transcript = extractor.extract(file).await?;
    info!("Transcript extracted: {} characters", transcript.chars().count());

    let chunks = chunk_text(&transcript, config.max_chunk_chars);
    let document = classify_chunks(classifier, &chunks).await?;

    let record = AnalysisRecord {
        analysis_id: ids.analysis_id,
        transcript_id: ids.transcript_id,
        creator_id: ids.creator_id,
        document,
        created_at: Utc::now(),
        status: "success".to_string(),
    };

    ResultsWriter::new(&config.results_dir).write(&record).await?;

    if skip_db {
        info!("Database persistence suppressed (--no-db)");
    } else {
        DatabaseWriter::new(config.database.clone())
            .insert(&record)
            .await?;
    }

    Ok(record)
}

/// Classify each chunk in order and fold the results into one aggregate.
pub async fn classify_chunks(
    classifier: &dyn ChunkClassifier,
    chunks: &[String],
) -> Result<ClassificationDocument> {
    let mut aggregate = ClassificationDocument::default();

    for (index, chunk) in chunks.iter().enumerate() {
        info!(
            "Classifying chunk {}/{} ({} chars)",
            index + 1,
            chunks.len(),
            chunk.chars().count()
        );
        let document = classifier.classify(chunk).await?;
        merge_document(&mut aggregate, &document);
    }

    Ok(aggregate)
}
