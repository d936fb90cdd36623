use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{AudioInput, CreateTranscriptionRequestArgs},
};
use std::future::Future;
use std::io::Cursor;
use std::path::Path;

use crate::error::TranscriptionError;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    pub fn from_path(path: &Path) -> Result<Self, TranscriptionError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "wav" => Ok(AudioFormat::Wav),
            "mp3" => Ok(AudioFormat::Mp3),
            _ => Err(TranscriptionError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }
}

// A recorded question, held in memory until it is uploaded.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub file_name: String,
    pub format: AudioFormat,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, TranscriptionError> {
        let file_name = file_name.into();
        let format = AudioFormat::from_path(Path::new(&file_name))?;
        if bytes.is_empty() {
            return Err(TranscriptionError::InvalidAudio(format!(
                "{file_name} is empty"
            )));
        }
        if format == AudioFormat::Wav {
            // Reject broken wav headers before paying for an upload.
            hound::WavReader::new(Cursor::new(bytes.as_slice()))?;
        }
        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TranscriptionError> {
        let path = path.as_ref();
        AudioFormat::from_path(path)?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("question")
            .to_string();
        Self::new(file_name, bytes)
    }
}

pub trait Transcriber: Send + Sync {
    fn transcribe(
        &self,
        clip: AudioClip,
    ) -> impl Future<Output = Result<String, TranscriptionError>> + Send;
}

#[derive(Clone, Debug)]
pub struct OpenAiTranscriber {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTranscriber {
    pub fn new(settings: &Settings, api_key: &str) -> Self {
        Self {
            client: settings.client(api_key),
            model: settings.transcription_model.clone(),
        }
    }
}

impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, TranscriptionError> {
        log::debug!(
            "Transcribing {} ({} bytes, {})",
            clip.file_name,
            clip.bytes.len(),
            clip.format.extension()
        );
        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(clip.file_name, clip.bytes))
            .model(&self.model)
            .build()?;

        let response = self.client.audio().transcribe(request).await.map_err(|e| {
            log::error!("Transcription failed: {e}");
            TranscriptionError::from(e)
        })?;
        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(TranscriptionError::Remote(
                "the transcription came back empty".to_string(),
            ));
        }
        Ok(text)
    }
}
