//! Human-readable transcripts
//!
//! Groups consecutive sentences by speaker into `Speaker: text` lines.

use serde::{Deserialize, Serialize};

/// Label used when a sentence has no speaker
pub const UNKNOWN_SPEAKER: &str = "Unknown speaker";

/// One transcribed sentence as delivered by the meetings API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Sentence id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Spoken text
    #[serde(default)]
    pub transcript: String,
    /// ISO-8601 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Speaker name
    #[serde(default)]
    pub speaker: Option<String>,
}

impl Sentence {
    /// Create a sentence
    pub fn new(speaker: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self {
            speaker: Some(speaker.into()),
            transcript: transcript.into(),
            ..Default::default()
        }
    }

    fn speaker_label(&self) -> &str {
        match self.speaker.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => UNKNOWN_SPEAKER,
        }
    }
}

/// Output document of the `transcript` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Formatted transcript
    pub transcript: String,
}

/// Join consecutive sentences of the same speaker into one line.
///
/// Sentences with empty text are dropped and do not break a run.
pub fn format_transcript(sentences: &[Sentence]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut speaker: Option<&str> = None;
    let mut chunks: Vec<&str> = Vec::new();

    for sentence in sentences.iter().filter(|s| !s.transcript.is_empty()) {
        let label = sentence.speaker_label();
        if speaker != Some(label) {
            if let Some(name) = speaker {
                lines.push(format!("{name}: {}", chunks.join(" ")));
            }
            speaker = Some(label);
            chunks.clear();
        }
        chunks.push(&sentence.transcript);
    }

    if let Some(name) = speaker {
        lines.push(format!("{name}: {}", chunks.join(" ")));
    }

    lines.join("\n")
}
