//! Authoring guides compiled into the binary and attached to every AI
//! generation prompt.

use rust_embed::Embed;

use crate::templates::ArtifactKind;

#[derive(Embed)]
#[folder = "embeds/"]
struct Guides;

const AGENT_FALLBACK: &str = "# Basic Agent Guide

## Principles
- The agent holds no hard-coded technical knowledge
- All technical knowledge comes from injected skills
- The agent applies structured reasoning to the context

## Minimum Structure
1. Reasoning profile (role, principles, goal)
2. Agent loop (gather context, act, verify, iterate)
3. Injected capabilities (skills and tools)
4. Decision strategy
5. Golden rules (no hallucination, empirical verification, traceability)
";

const SKILL_FALLBACK: &str = "# Basic Skill Guide

## Principles
- Skills are technical knowledge injected into agents
- Declarative, not imperative (what, not how)
- Domain-specific (languages, frameworks, patterns)
- Self-contained and reusable

## Minimum Structure
1. Frontmatter with name and description
2. Detailed description
3. How it works
4. Usage examples and trigger phrases
5. Capabilities and best practices
";

const COMMAND_FALLBACK: &str = "# Basic Command Guide

## Principles
- Commands orchestrate one or more agents
- They define a clear implementation flow
- They include critical rules and verification

## Minimum Structure
1. Command description
2. Orchestrated implementation flow
3. Critical rules
4. Agents involved
";

fn file_name(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Agent => "agent_guide.md",
        ArtifactKind::Skill => "skill_guide.md",
        ArtifactKind::Command => "command_guide.md",
    }
}

fn fallback(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Agent => AGENT_FALLBACK,
        ArtifactKind::Skill => SKILL_FALLBACK,
        ArtifactKind::Command => COMMAND_FALLBACK,
    }
}

/// The embedded guide for `kind`, or a minimal built-in one (with a warning)
/// when the embedded blob is missing or empty.
pub fn guide(kind: ArtifactKind) -> String {
    let name = file_name(kind);
    let text = Guides::get(name)
        .map(|f| String::from_utf8_lossy(&f.data).into_owned())
        .unwrap_or_default();
    resolve(kind, text)
}

fn resolve(kind: ArtifactKind, text: String) -> String {
    if text.trim().is_empty() {
        tracing::warn!(guide = file_name(kind), "embedded guide is empty, using fallback");
        return fallback(kind).to_string();
    }
    text
}
