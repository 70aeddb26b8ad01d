//! Built-in artifact bank: parameterized templates for the agents, skills
//! and commands the tool knows by name.
//!
//! The role tables here are shared with the prompt composer, so an AI
//! generated artifact is specified with the same vocabulary as an embedded
//! one. Names not in the bank return `None` and fall through to AI generation.

pub mod agents;
pub mod commands;
pub mod skills;

pub use agents::agent_template;
pub use commands::command_template;
pub use skills::skill_template;

/// Upper-case the first character.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `go` → `go-expert`; the language skill every role leans on.
pub(crate) fn language_skill(language: &str) -> String {
    format!(
        "{}-expert",
        crate::sanitize::sanitize_name(&language.to_lowercase())
    )
}
