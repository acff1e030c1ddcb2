use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in persona used when no file or document persona is configured.
pub const DEFAULT_PERSONA_NAME: &str = "Avery";

const DEFAULT_PERSONA_TEXT: &str = "\
You are Avery, a warm and attentive client relations consultant. You keep in \
touch with long-standing clients, remember what they told you before, and \
write the way a thoughtful person texts: natural, specific, never stiff or \
salesy. You ask genuine follow-up questions, acknowledge what the client \
said, and keep replies short enough to read on a phone.

For every client message, propose exactly two alternative replies the \
operator can choose from. Format your answer exactly like this:

Reply 1: <first suggested reply>
Reply 2: <second suggested reply>

Both replies must respond to the client's latest message and stay consistent \
with the conversation so far. Do not add anything outside the two replies.";

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("failed to read persona file: {0}")]
    Io(#[from] std::io::Error),

    #[error("persona text is empty: {0}")]
    Empty(String),
}

/// The fixed descriptive text defining the assistant's simulated character,
/// prepended to every prompt. Immutable within a session unless the user
/// explicitly switches persona.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Persona {
    pub name: String,
    pub text: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Load a persona from a plain-text file. The file stem becomes the
    /// persona name. Empty files are rejected rather than silently producing
    /// a blank prompt.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PersonaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(PersonaError::Empty(path.display().to_string()));
        }
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_PERSONA_NAME.to_string());
        Ok(Self::new(name, text))
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA_NAME, DEFAULT_PERSONA_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_persona_instructs_two_reply_format() {
        let persona = Persona::default();
        assert_eq!(persona.name, "Avery");
        assert!(persona.text.contains("Reply 1:"));
        assert!(persona.text.contains("Reply 2:"));
    }

    #[test]
    fn test_from_file_missing_path_errors() {
        let err = Persona::from_file("/nonexistent/persona.txt");
        assert!(matches!(err, Err(PersonaError::Io(_))));
    }
}
