// src/prompt/mod.rs

pub mod builder;

pub use builder::{build_user_prompt, ANSWER_SENTINEL, NO_CONTEXT_MARKER};
