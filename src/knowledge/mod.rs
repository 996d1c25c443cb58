// src/knowledge/mod.rs
// File-backed corpus of supportive texts, tagged by emotion.

use crate::emotion::EmotionLabel;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Fallback corpus when the file cannot be read or parsed.
const GENERIC_ENTRY_TEXT: &str = "I'm here to help. 🫂";

/// One supportive text, scoped to an emotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub emotion: EmotionLabel,
    pub text: String,
}

/// The default corpus written on first run: one entry per emotion.
pub fn default_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry {
            emotion: EmotionLabel::Happy,
            text: "It's great to hear you're feeling positive! 🌟".to_string(),
        },
        KnowledgeEntry {
            emotion: EmotionLabel::Sad,
            text: "I'm sorry you're feeling down. Remember, it's okay to feel sad. 🫂".to_string(),
        },
        KnowledgeEntry {
            emotion: EmotionLabel::Angry,
            text: "Feeling angry is normal sometimes. Let's work through it together. 🌪️"
                .to_string(),
        },
        KnowledgeEntry {
            emotion: EmotionLabel::Neutral,
            text: "I see. Tell me more about what's on your mind. 💬".to_string(),
        },
        KnowledgeEntry {
            emotion: EmotionLabel::Worried,
            text: "It sounds like you're dealing with some worry. Let's talk through it. 🤝"
                .to_string(),
        },
    ]
}

/// Load the knowledge base, synthesizing and persisting the default set if
/// the file does not exist yet. Never fails: unreadable or malformed files
/// degrade to a single generic neutral entry.
pub fn load_or_create(path: &Path) -> Vec<KnowledgeEntry> {
    match try_load_or_create(path) {
        Ok(entries) => {
            info!(count = entries.len(), path = %path.display(), "Loaded knowledge base");
            entries
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Knowledge base unavailable, using generic entry");
            vec![KnowledgeEntry {
                emotion: EmotionLabel::Neutral,
                text: GENERIC_ENTRY_TEXT.to_string(),
            }]
        }
    }
}

fn try_load_or_create(path: &Path) -> Result<Vec<KnowledgeEntry>> {
    if !path.exists() {
        info!(path = %path.display(), "Knowledge base not found, creating default set");
        let defaults = default_entries();
        fs::write(path, serde_json::to_string_pretty(&defaults)?)?;
        return Ok(defaults);
    }

    let raw = fs::read_to_string(path)?;
    let entries: Vec<KnowledgeEntry> = serde_json::from_str(&raw)?;
    Ok(entries)
}
