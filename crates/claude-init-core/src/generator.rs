//! Per-artifact synthesis.
//!
//! Each artifact comes from the first source that has it: an external
//! template (adapted to the project), the embedded bank, then the provider.
//! Commands generated with agent/skill context skip both template sources,
//! because templates reference agents that may not exist in this run.

use std::path::{Path, PathBuf};

use ai_provider::{Provider, ProviderError};
use serde::Serialize;

use crate::embedded::{self, skills::BASE_SKILLS};
use crate::error::Result;
use crate::io::{atomic_write, read_if_exists};
use crate::paths;
use crate::profile::ProjectProfile;
use crate::prompts;
use crate::sanitize::sanitize_name;
use crate::templates::{adapt, ArtifactKind, TemplateResolver};

/// Where an artifact's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    External,
    Embedded,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    pub kind: ArtifactKind,
    pub name: String,
    pub path: PathBuf,
    pub source: Source,
}

/// The README indices handed to command generation.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub agents: String,
    pub skills: String,
}

impl CommandContext {
    pub fn is_empty(&self) -> bool {
        self.agents.trim().is_empty() && self.skills.trim().is_empty()
    }
}

/// Skill subdirectory: `base`, `language` or `framework`.
pub fn classify_skill(name: &str, profile: &ProjectProfile) -> &'static str {
    if BASE_SKILLS.contains(&name) {
        return "base";
    }
    let language = profile.language.trim();
    if name.eq_ignore_ascii_case(language) || name == sanitize_name(language) {
        return "language";
    }
    let framework = profile.framework.trim();
    if !framework.is_empty()
        && (framework.to_lowercase().contains(&name.to_lowercase())
            || name == sanitize_name(framework))
    {
        return "framework";
    }
    "language"
}

/// Drop a single fence wrapping the whole reply (```` ```markdown ... ``` ````).
fn unwrap_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    match inner.split_once('\n') {
        Some((tag, body)) if !tag.contains(' ') => body.trim(),
        _ => trimmed,
    }
}

pub struct Generator<'a> {
    root: &'a Path,
    out: &'a Path,
    profile: &'a ProjectProfile,
    provider: &'a dyn Provider,
    templates: &'a TemplateResolver,
}

impl<'a> Generator<'a> {
    pub fn new(
        root: &'a Path,
        out: &'a Path,
        profile: &'a ProjectProfile,
        provider: &'a dyn Provider,
        templates: &'a TemplateResolver,
    ) -> Self {
        Self {
            root,
            out,
            profile,
            provider,
            templates,
        }
    }

    /// Send `prompt` with the current on-disk `CLAUDE.md` as system context.
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        let claude_md = read_if_exists(&paths::claude_md(self.root))?;
        let system = prompts::system_prompt(claude_md.as_deref());
        let reply = self.provider.send(&system, prompt).await?;
        let body = unwrap_fence(&reply);
        if body.is_empty() {
            return Err(ProviderError::EmptyResponse("empty response").into());
        }
        Ok(format!("{body}\n"))
    }

    fn external(&self, kind: ArtifactKind, path: Option<PathBuf>) -> Option<String> {
        let path = path?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(adapt(kind, &text, self.profile)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read template, skipping it");
                None
            }
        }
    }

    fn write(
        &self,
        kind: ArtifactKind,
        name: String,
        path: PathBuf,
        content: String,
        source: Source,
    ) -> Result<Generated> {
        atomic_write(&path, content.as_bytes())?;
        tracing::info!(kind = %kind, name = %name, source = ?source, "generated");
        Ok(Generated {
            kind,
            name,
            path,
            source,
        })
    }

    pub async fn agent(&self, name: &str) -> Result<Generated> {
        let name = sanitize_name(name);
        let path = paths::agent_file(self.out, &name);
        let kind = ArtifactKind::Agent;

        if let Some(content) = self.external(kind, self.templates.find(kind, &name)) {
            return self.write(kind, name, path, content, Source::External);
        }
        if let Some(content) = embedded::agent_template(&name, self.profile) {
            return self.write(kind, name, path, content, Source::Embedded);
        }
        let content = self.ask(&prompts::agent_prompt(&name, self.profile)).await?;
        self.write(kind, name, path, content, Source::Ai)
    }

    pub async fn skill(&self, name: &str) -> Result<Generated> {
        let name = sanitize_name(name);
        let category = classify_skill(&name, self.profile);
        let path = paths::skill_file(self.out, category, &name);
        let kind = ArtifactKind::Skill;

        if let Some(content) = self.external(kind, self.templates.find_skill(category, &name)) {
            return self.write(kind, name, path, content, Source::External);
        }
        if let Some(content) = embedded::skill_template(&name, category, self.profile) {
            return self.write(kind, name, path, content, Source::Embedded);
        }
        let content = self
            .ask(&prompts::skill_prompt(&name, category, self.profile))
            .await?;
        self.write(kind, name, path, content, Source::Ai)
    }

    pub async fn command(&self, name: &str, context: Option<&CommandContext>) -> Result<Generated> {
        let name = sanitize_name(name);
        let path = paths::command_file(self.out, &name);
        let kind = ArtifactKind::Command;

        if let Some(ctx) = context.filter(|c| !c.is_empty()) {
            let prompt = prompts::command_prompt_with_context(
                &name,
                self.profile,
                &ctx.agents,
                &ctx.skills,
                self.provider.id(),
            );
            let content = self.ask(&prompt).await?;
            return self.write(kind, name, path, content, Source::Ai);
        }

        if let Some(content) = self.external(kind, self.templates.find(kind, &name)) {
            return self.write(kind, name, path, content, Source::External);
        }
        if let Some(content) = embedded::command_template(&name, self.profile) {
            return self.write(kind, name, path, content, Source::Embedded);
        }
        let content = self.ask(&prompts::command_prompt(&name, self.profile)).await?;
        self.write(kind, name, path, content, Source::Ai)
    }
}
