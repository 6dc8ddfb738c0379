use std::path::PathBuf;
use tracing::warn;

/// Runtime configuration for the worker, read once from the environment at
/// startup and passed by reference to each component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini classification settings
    pub classifier: ClassifierConfig,

    /// Whisper transcription settings
    pub transcription: TranscriptionConfig,

    /// Database sink settings (disabled when no host is configured)
    pub database: DatabaseConfig,

    /// Directory for per-run JSON result files
    pub results_dir: PathBuf,

    /// Maximum transcript chunk size in characters
    pub max_chunk_chars: usize,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// API key for the Gemini API; classification fails fast without one
    pub api_key: Option<String>,

    /// Model name passed to the generateContent endpoint
    pub model: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// Whisper model name (tiny, base, small, ...)
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub table: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig {
                api_key: None,
                model: "gemini-2.5-flash".to_string(),
                timeout_seconds: 120,
            },
            transcription: TranscriptionConfig {
                model: "base".to_string(),
            },
            database: DatabaseConfig {
                host: None,
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                dbname: "entity_classification".to_string(),
                table: "scribe_entity_classification_dev".to_string(),
            },
            results_dir: PathBuf::from("results"),
            max_chunk_chars: 16000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// documented defaults for everything except credentials.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(key) = env_nonempty("GEMINI_API_KEY") {
            config.classifier.api_key = Some(key);
        }
        if let Some(model) = env_nonempty("GEMINI_MODEL") {
            config.classifier.model = model;
        }
        if let Some(model) = env_nonempty("WHISPER_MODEL") {
            config.transcription.model = model;
        }

        if let Some(host) = env_nonempty("DB_HOST") {
            config.database.host = Some(host);
        }
        if let Some(port) = env_nonempty("DB_PORT") {
            match port.parse() {
                Ok(port) => config.database.port = port,
                Err(_) => warn!("Invalid DB_PORT '{}', using {}", port, config.database.port),
            }
        }
        if let Some(user) = env_nonempty("DB_USER") {
            config.database.user = user;
        }
        if let Some(password) = env_nonempty("DB_PASSWORD") {
            config.database.password = password;
        }
        if let Some(name) = env_nonempty("DB_NAME") {
            config.database.dbname = name;
        }
        if let Some(table) = env_nonempty("DB_TABLE") {
            config.database.table = table;
        }

        if let Some(dir) = env_nonempty("RESULTS_DIR") {
            config.results_dir = PathBuf::from(dir);
        }
        if let Some(max) = env_nonempty("MAX_CHUNK_CHARS") {
            match max.parse() {
                Ok(max) if max > 0 => config.max_chunk_chars = max,
                _ => warn!(
                    "Invalid MAX_CHUNK_CHARS '{}', using {}",
                    max, config.max_chunk_chars
                ),
            }
        }

        config
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => {
            let value = value.trim().to_string();
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        }
        Err(_) => None,
    }
}
