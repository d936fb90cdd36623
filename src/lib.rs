pub mod app;
pub mod case;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod message;
pub mod session;
pub mod settings;
pub mod story;
pub mod transcribe;
pub mod tui;
pub mod ui;

// Re-export commonly used items for easier access
pub use case::{Case, Suspect, pick_culprit, pick_random_case};
pub use error::{ConfigError, GatewayError, InputError, SessionError, TranscriptionError};
pub use gateway::{Gateway, OpenAiGateway};
pub use message::{Message, Role};
pub use session::{
    Difficulty, GuessOutcome, QUESTION_BUDGET, Score, Session, SessionState, TurnOutcome,
    TurnPolicy,
};
pub use settings::Settings;
pub use story::{Mystery, MysteryBoard};
