use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

// One transcript entry. `suspect` is who a question was put to, or who answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspect: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
            suspect: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_suspect(mut self, suspect: impl Into<String>) -> Self {
        self.suspect = Some(suspect.into());
        self
    }

    /// Text as the model sees it. Questions carry the name of the suspect they address.
    pub fn prompt_content(&self) -> String {
        match (&self.role, &self.suspect) {
            (Role::User, Some(suspect)) => format!("[Detective to {}] {}", suspect, self.content),
            _ => self.content.clone(),
        }
    }
}
