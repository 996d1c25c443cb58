// src/prompt/builder.rs
// Deterministic per-turn prompt block. Pure string formatting, cannot fail.

use crate::emotion::{analyze_mood_and_stress, EmotionLabel};

/// Sentinel line the generator later uses to locate the start of the model's
/// actual answer.
pub const ANSWER_SENTINEL: &str = "Assistant Response:";

/// Rendered in place of the context list when nothing was retrieved.
pub const NO_CONTEXT_MARKER: &str = "No specific context retrieved.";

/// Builds the user block of the prompt: raw input, detected emotion, coarse
/// mood/stress reading, and the retrieved context snippets. Always contains
/// the literal user input and always ends with [`ANSWER_SENTINEL`].
pub fn build_user_prompt(user_input: &str, emotion: EmotionLabel, contexts: &[String]) -> String {
    let (mood, stress) = analyze_mood_and_stress(user_input);

    let context_str = if contexts.is_empty() {
        NO_CONTEXT_MARKER.to_string()
    } else {
        contexts
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "User Input: {}\n\
         Detected Emotion: {}\n\
         Mood: {}\n\
         Stress Level: {}\n\
         Potentially Relevant Info:\n{}\n\
         {}",
        user_input, emotion, mood, stress, context_str, ANSWER_SENTINEL
    )
}
