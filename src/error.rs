use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API key found. Set GROQ_API_KEY or add `api_key` to {0}")]
    MissingCredential(String),

    #[error("Could not resolve the home directory")]
    NoHomeDirectory,

    #[error("Settings IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// Failures of the LLM service, recovered locally by every caller.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Remote(String),
}

impl From<async_openai::error::OpenAIError> for GatewayError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        match err {
            async_openai::error::OpenAIError::InvalidArgument(message) => {
                GatewayError::InvalidRequest(message)
            }
            other => GatewayError::Remote(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Unsupported audio format: {0} (expected wav or mp3)")]
    UnsupportedFormat(String),

    #[error("Invalid audio file: {0}")]
    InvalidAudio(String),

    #[error("Audio IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transcription service error: {0}")]
    Remote(String),
}

impl From<hound::Error> for TranscriptionError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => TranscriptionError::Io(e),
            other => TranscriptionError::InvalidAudio(other.to_string()),
        }
    }
}

impl From<async_openai::error::OpenAIError> for TranscriptionError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        TranscriptionError::Remote(err.to_string())
    }
}

// Bad player input. Never mutates state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Ask the suspect something first.")]
    EmptyQuestion,

    #[error("Name a culprit before accusing.")]
    EmptyGuess,

    #[error("No suspect named {0} in this case.")]
    UnknownSuspect(String),

    #[error("Generate a mystery first!")]
    NoMystery,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("The case is already solved. Start a new case.")]
    AlreadySolved,

    #[error("No questions left. Make your final guess.")]
    OutOfQuestions,
}
