use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::TranscriptionConfig;
use crate::error::{Result, WorkerError};

/// Media category resolved from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Text,
    Audio,
    Video,
}

fn sniff_media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "txt" | "text" | "md" | "markdown" => Some(MediaKind::Text),
        "wav" | "mp3" | "m4a" | "flac" | "ogg" | "aac" => Some(MediaKind::Audio),
        "mp4" | "mov" | "mkv" | "avi" | "webm" => Some(MediaKind::Video),
        _ => None,
    }
}

/// Resolves a media file to a plain-text transcript.
///
/// Text files are read directly; audio is handed to the external whisper
/// CLI; video is demuxed to a temporary WAV with ffmpeg first. Both
/// external tools are opaque collaborators, probed for availability and
/// never retried.
pub struct TranscriptExtractor {
    config: TranscriptionConfig,
}

impl TranscriptExtractor {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self { config }
    }

    /// Log which external backends are reachable. Absence is only an
    /// error once an input actually needs the missing tool.
    pub async fn report_backends(&self) {
        for tool in ["whisper", "ffmpeg"] {
            if check_command_available(tool).await {
                debug!("{} backend available", tool);
            } else {
                warn!("{} not found on PATH; related inputs will fail", tool);
            }
        }
    }

    pub async fn extract(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(WorkerError::FileNotFound(path.to_path_buf()));
        }

        match sniff_media_kind(path) {
            Some(MediaKind::Text) => {
                debug!("Reading text transcript directly: {}", path.display());
                Ok(tokio::fs::read_to_string(path).await?)
            }
            Some(MediaKind::Audio) => self.transcribe_audio(path).await,
            Some(MediaKind::Video) => self.transcribe_video(path).await,
            None => Err(WorkerError::UnsupportedMedia(path.to_path_buf())),
        }
    }

    /// Run the whisper CLI on an audio file and read back the plain-text
    /// transcript it writes.
    async fn transcribe_audio(&self, audio_path: &Path) -> Result<String> {
        if !check_command_available("whisper").await {
            return Err(WorkerError::SpeechBackendUnavailable(
                "whisper CLI not found on PATH".to_string(),
            ));
        }

        let output_dir = tempfile::tempdir()?;

        info!(
            "Transcribing {} with whisper ({} model)",
            audio_path.display(),
            self.config.model
        );

        let output = Command::new("whisper")
            .arg(audio_path)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--output_dir")
            .arg(output_dir.path())
            .arg("--output_format")
            .arg("txt")
            .arg("--verbose")
            .arg("False")
            .arg("--fp16")
            .arg("False")
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WorkerError::SpeechBackendUnavailable(format!(
                "whisper exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stem = audio_path
            .file_stem()
            .ok_or_else(|| WorkerError::UnsupportedMedia(audio_path.to_path_buf()))?;
        let transcript_path = output_dir.path().join(stem).with_extension("txt");
        let transcript = tokio::fs::read_to_string(&transcript_path).await?;

        debug!("Whisper produced {} characters", transcript.len());
        Ok(transcript)
    }

    /// Demux the audio track to a scoped temp WAV, then transcribe it.
    /// The TempDir guard removes the intermediate file on every exit path.
    async fn transcribe_video(&self, video_path: &Path) -> Result<String> {
        if !check_command_available("ffmpeg").await {
            return Err(WorkerError::SpeechBackendUnavailable(
                "ffmpeg not found on PATH".to_string(),
            ));
        }

        let temp_dir = tempfile::tempdir()?;
        let audio_path = temp_dir.path().join("audio.wav");

        info!("Extracting audio track from {}", video_path.display());

        // 16kHz mono PCM, the rate whisper expects
        let status = Command::new("ffmpeg")
            .arg("-i")
            .arg(video_path)
            .arg("-vn")
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-ar")
            .arg("16000")
            .arg("-ac")
            .arg("1")
            .arg("-f")
            .arg("wav")
            .arg("-y")
            .arg(&audio_path)
            .status()
            .await?;

        if !status.success() {
            return Err(WorkerError::AudioExtraction(format!(
                "ffmpeg failed for {}",
                video_path.display()
            )));
        }

        self.transcribe_audio(&audio_path).await
    }
}

/// Check whether a command is available on PATH.
async fn check_command_available(cmd_name: &str) -> bool {
    Command::new(cmd_name)
        .arg("--help")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
