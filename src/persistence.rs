use std::path::{Path, PathBuf};
use tokio_postgres::NoTls;
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::error::{Result, WorkerError};
use crate::model::AnalysisRecord;

/// Writes one analysis record per run to `<results_dir>/<analysis_id>.json`.
pub struct ResultsWriter {
    results_dir: PathBuf,
}

impl ResultsWriter {
    pub fn new(results_dir: &Path) -> Self {
        Self {
            results_dir: results_dir.to_path_buf(),
        }
    }

    pub async fn write(&self, record: &AnalysisRecord) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.results_dir).await?;

        let path = self
            .results_dir
            .join(format!("{}.json", record.analysis_id));
        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&path, json).await?;

        info!("Result file written: {}", path.display());
        Ok(path)
    }
}

/// Inserts one row per run into the configured Postgres table.
///
/// The connection is opened, used for a single insert and dropped within
/// this call; there is no pooling or reuse across runs. With no host
/// configured the insert is a silent no-op.
pub struct DatabaseWriter {
    config: DatabaseConfig,
}

impl DatabaseWriter {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub async fn insert(&self, record: &AnalysisRecord) -> Result<()> {
        let Some(host) = self.config.host.as_deref() else {
            debug!("No database host configured, skipping insert");
            return Ok(());
        };

        let conn_params = format!(
            "host={} port={} user={} password={} dbname={}",
            host, self.config.port, self.config.user, self.config.password, self.config.dbname
        );

        let (client, connection) = tokio_postgres::connect(&conn_params, NoTls)
            .await
            .map_err(|e| WorkerError::Persistence(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("Database connection error: {}", e);
            }
        });

        let statement = format!(
            "INSERT INTO {} \
             (analysis_id, transcript_id, creator_id, entities, tone, style, safety_flags, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            self.config.table
        );

        let entities = serde_json::to_value(&record.document.entities)?;
        let tone = serde_json::to_value(&record.document.tone)?;
        let style = serde_json::to_value(&record.document.style)?;
        let safety_flags = serde_json::to_value(&record.document.safety_flags)?;

        client
            .execute(
                &statement,
                &[
                    &record.analysis_id,
                    &record.transcript_id,
                    &record.creator_id,
                    &entities,
                    &tone,
                    &style,
                    &safety_flags,
                    &record.created_at,
                    &record.created_at,
                ],
            )
            .await
            .map_err(|e| WorkerError::Persistence(e.to_string()))?;

        info!("Row inserted into {}", self.config.table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassificationDocument;
    use chrono::Utc;

    fn sample_record() -> AnalysisRecord {
        AnalysisRecord {
            analysis_id: "an-123".to_string(),
            transcript_id: "tr-456".to_string(),
            creator_id: "cr-789".to_string(),
            document: ClassificationDocument::default(),
            created_at: Utc::now(),
            status: "success".to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_names_file_by_analysis_id() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultsWriter::new(dir.path());

        let path = writer.write(&sample_record()).await.unwrap();
        assert_eq!(path, dir.path().join("an-123.json"));

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["analysis_id"], "an-123");
        assert_eq!(value["status"], "success");
        assert!(value.get("entities").is_some());
    }

    #[tokio::test]
    async fn test_write_creates_results_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("results");
        let writer = ResultsWriter::new(&nested);

        writer.write(&sample_record()).await.unwrap();
        assert!(nested.join("an-123.json").exists());
    }

    #[tokio::test]
    async fn test_insert_without_host_is_noop() {
        let writer = DatabaseWriter::new(DatabaseConfig {
            host: None,
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "entity_classification".to_string(),
            table: "scribe_entity_classification_dev".to_string(),
        });

        writer.insert(&sample_record()).await.unwrap();
    }
}
