//! Which agents, commands and skills a project gets.
//!
//! The provider is asked first; any failure (transport, no JSON, wrong shape)
//! falls back to a fixed recommendation derived from the profile. The result
//! is then merged with the mandatory [`BaseItems`].

use std::collections::HashSet;
use std::path::Path;

use ai_provider::Provider;
use serde::{Deserialize, Serialize};

use crate::error::{InitError, Result};
use crate::extract::{extract_json, null_as_default};
use crate::io::read_if_exists;
use crate::paths;
use crate::prompts;
use crate::profile::ProjectProfile;
use crate::sanitize::sanitize_name;

/// Architectures complex enough to warrant a dedicated debugger agent.
const DEBUGGER_ARCHITECTURES: &[&str] =
    &["Microservicios", "DDD", "Hexagonal", "Event-Driven", "Serverless"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(deserialize_with = "null_as_default")]
    pub agents: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub commands: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl Recommendation {
    /// Parse a provider reply. Identifier lists are sanitized and
    /// de-duplicated; the description is kept verbatim.
    pub fn from_reply(reply: &str) -> Result<Self> {
        let json = extract_json(reply);
        if json.is_empty() {
            return Err(InitError::NoJson);
        }
        let raw: Recommendation = serde_json::from_str(&json)?;
        Ok(raw.normalized())
    }

    fn normalized(self) -> Self {
        Recommendation {
            agents: normalize_names(&self.agents),
            commands: normalize_names(&self.commands),
            skills: normalize_names(&self.skills),
            description: self.description,
        }
    }

    /// Union with the base items: base first, then recommended.
    pub fn merged(&self, base: &BaseItems) -> Recommendation {
        Recommendation {
            agents: merge(&self.agents, base.agents),
            commands: merge(&self.commands, base.commands),
            skills: merge(&self.skills, base.skills),
            description: self.description.clone(),
        }
    }
}

fn normalize_names(names: &[String]) -> Vec<String> {
    let sanitized: Vec<String> = names
        .iter()
        .filter(|n| !n.trim().is_empty())
        .map(|n| sanitize_name(n))
        .collect();
    merge::<&str>(&sanitized, &[])
}

/// Items every generation carries regardless of the recommendation.
#[derive(Debug, Clone, Copy)]
pub struct BaseItems {
    pub agents: &'static [&'static str],
    pub commands: &'static [&'static str],
    pub skills: &'static [&'static str],
}

pub const BASE_ITEMS: BaseItems = BaseItems {
    agents: &[
        "architect",
        "writer",
        "debugger",
        "planning-agent",
        "orchestrator-agent",
    ],
    commands: &crate::embedded::commands::BASE_COMMANDS,
    skills: &crate::embedded::skills::BASE_SKILLS,
};

/// Unique union of `base` and `recommended`, base items first, each list in
/// its original order.
pub fn merge<S: AsRef<str>>(recommended: &[String], base: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    base.iter()
        .map(|s| s.as_ref().to_string())
        .chain(recommended.iter().cloned())
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// The recommendation used whenever the provider's answer cannot be used.
pub fn default_recommendation(profile: &ProjectProfile) -> Recommendation {
    let mut agents: Vec<String> = ["architect", "developer", "tester", "reviewer"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let arch = profile.architecture.trim();
    if DEBUGGER_ARCHITECTURES
        .iter()
        .any(|a| a.eq_ignore_ascii_case(arch))
    {
        agents.push("debugger".to_string());
    }

    let mut skills = vec![sanitize_name(&profile.language)];
    if profile.has_framework() {
        skills.push(sanitize_name(&profile.framework));
    }

    Recommendation {
        agents,
        commands: vec!["test".into(), "lint".into(), "build".into()],
        skills: merge(&skills, &[] as &[&str]),
        description: format!(
            "Default structure for {} ({})",
            profile.name, profile.language
        ),
    }
}

/// Ask `provider` for a recommendation. Errors are returned as-is; see
/// [`recommend`] for the version that never fails.
pub async fn request_recommendation(
    provider: &dyn Provider,
    profile: &ProjectProfile,
    root: &Path,
) -> Result<Recommendation> {
    let claude_md = read_if_exists(&paths::claude_md(root))?;
    let system = prompts::system_prompt(claude_md.as_deref());
    let reply = provider
        .send(&system, &prompts::recommendation_prompt(profile))
        .await?;
    Recommendation::from_reply(&reply)
}

/// Provider recommendation, or [`default_recommendation`] with a warning.
pub async fn recommend(
    provider: &dyn Provider,
    profile: &ProjectProfile,
    root: &Path,
) -> Recommendation {
    match request_recommendation(provider, profile, root).await {
        Ok(rec) => {
            tracing::debug!(
                agents = rec.agents.len(),
                commands = rec.commands.len(),
                skills = rec.skills.len(),
                "recommendation received"
            );
            rec
        }
        Err(e) => {
            tracing::warn!(error = %e, "recommendation failed, using defaults");
            default_recommendation(profile)
        }
    }
}
