use std::fmt::Write as _;

use super::{capitalize, language_skill};
use crate::profile::ProjectProfile;

pub const BASE_TOOLS: &str = "Read, Write, Edit, Bash, Glob, Grep";
pub const DEFAULT_COLOR: &str = "gray";
pub const DEFAULT_MODEL: &str = "sonnet";

/// Roles with a built-in agent template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Architect,
    Developer,
    Tester,
    Reviewer,
    Debugger,
    Writer,
    Planner,
    Orchestrator,
}

impl Role {
    pub fn from_name(name: &str) -> Option<Self> {
        let role = match name {
            "architect" => Role::Architect,
            "developer" => Role::Developer,
            "tester" => Role::Tester,
            "reviewer" => Role::Reviewer,
            "debugger" => Role::Debugger,
            "writer" => Role::Writer,
            "planner" | "planning-agent" => Role::Planner,
            "orchestrator" | "orchestrator-agent" => Role::Orchestrator,
            _ => return None,
        };
        Some(role)
    }

    pub fn color(self) -> &'static str {
        match self {
            Role::Architect => "cyan",
            Role::Developer => "pink",
            Role::Tester => "green",
            Role::Reviewer => "yellow",
            Role::Debugger => "red",
            Role::Writer => "blue",
            Role::Planner => "purple",
            Role::Orchestrator => "orange",
        }
    }

    fn extra_tools(self) -> &'static [&'static str] {
        match self {
            Role::Architect => &["Test", "WebSearch"],
            Role::Developer => &["Test"],
            Role::Tester => &["Test", "RunTests"],
            Role::Debugger => &["RunTests", "Browser"],
            _ => &[],
        }
    }

    pub fn tools(self) -> String {
        let mut tools = BASE_TOOLS.to_string();
        for t in self.extra_tools() {
            let _ = write!(tools, ", {t}");
        }
        tools
    }

    /// `(skill, why the agent injects it)` pairs.
    pub fn skills(self, language: &str) -> Vec<(String, String)> {
        let lang = language_skill(language);
        let pairs: Vec<(&str, String)> = match self {
            Role::Architect => vec![
                (lang.as_str(), "language mastery and architectural patterns".into()),
                ("system-architect", "architecture design and module structure".into()),
                ("code-reviewer", "validating the quality of the design".into()),
            ],
            Role::Developer => vec![
                (lang.as_str(), format!("advanced {language} and optimization")),
                ("domain-expert", "robust entities and DTOs".into()),
                ("usecase-developer", "implementing business logic".into()),
            ],
            Role::Tester => vec![
                ("qa-engineer", "testing strategy and coverage".into()),
                (lang.as_str(), "language-specific tests".into()),
                ("tdd-champion", "test-driven development".into()),
            ],
            Role::Reviewer => vec![
                ("code-reviewer", "quality review and best practices".into()),
                (lang.as_str(), "validating language conventions".into()),
            ],
            Role::Debugger => vec![
                ("debug-master", "bug analysis and resolution".into()),
                (lang.as_str(), "language-specific failure modes".into()),
            ],
            Role::Writer => vec![
                ("technical-writer", "technical documentation".into()),
                ("code-reviewer", "understanding the code being documented".into()),
            ],
            Role::Planner => vec![
                ("system-architect", "breaking work down along module boundaries".into()),
                ("technical-writer", "clear, trackable plans".into()),
            ],
            Role::Orchestrator => vec![
                ("code-reviewer", "checking each hand-off before the next phase".into()),
                ("technical-writer", "recording decisions and progress".into()),
            ],
        };
        pairs.into_iter().map(|(s, why)| (s.to_string(), why)).collect()
    }

    pub fn description(self, profile: &ProjectProfile) -> String {
        let p = &profile.name;
        let lang = &profile.language;
        match self {
            Role::Architect => format!("The Architect Agent for {p} is responsible for designing system architecture following best practices, defining package structure and interfaces, and ensuring scalability and maintainability."),
            Role::Developer => format!("The Developer Agent for {p} is responsible for developing and maintaining the codebase. This includes writing clean, maintainable {lang} code, following project architecture, writing comprehensive tests, and ensuring high code quality."),
            Role::Tester => format!("The QA/Testing Agent for {p} is responsible for writing comprehensive tests, finding edge cases and potential bugs, ensuring test coverage meets quality standards, and validating requirements against test results."),
            Role::Reviewer => format!("The Code Review Agent for {p} is responsible for reviewing code for quality, maintainability, and best practices, ensuring adherence to {lang} coding standards, identifying potential bugs and performance problems, and providing constructive feedback."),
            Role::Debugger => format!("The Debugging Specialist Agent for {p} is responsible for investigating and resolving complex bugs, analyzing stack traces and error messages, identifying race conditions and memory leaks, and proposing fixes."),
            Role::Writer => format!("The Technical Writer Agent for {p} is responsible for creating and maintaining documentation, writing clear and concise technical guides, ensuring documentation is up-to-date, and following documentation best practices."),
            Role::Planner => format!("The Planning Agent for {p} is responsible for turning requests into milestones and tasks, sequencing dependencies, and keeping the plan in sync with delivered work."),
            Role::Orchestrator => format!("The Orchestrator Agent for {p} is responsible for routing each task to the right specialist agent, coordinating hand-offs between phases, and verifying that every phase meets its exit criteria."),
        }
    }

    fn responsibilities(self, language: &str) -> Vec<String> {
        let lines: &[&str] = match self {
            Role::Architect => &[
                "Design system architecture following best practices",
                "Define package structure and interfaces",
                "Ensure scalability and maintainability",
                "Follow SOLID principles and {lang} conventions",
            ],
            Role::Developer => &[
                "Write clean, maintainable code following {lang} best practices",
                "Follow project conventions and architecture",
                "Write comprehensive tests for new features",
                "Document complex logic and decisions",
                "Ensure code quality and performance",
            ],
            Role::Tester => &[
                "Write comprehensive tests (unit, integration, e2e)",
                "Find edge cases and potential bugs",
                "Ensure test coverage meets quality standards",
                "Validate requirements against test results",
                "Create testing strategies and plans",
            ],
            Role::Reviewer => &[
                "Review code for quality, maintainability, and best practices",
                "Ensure adherence to {lang} coding standards",
                "Identify potential bugs, security issues, and performance problems",
                "Provide constructive feedback and suggestions",
                "Validate architectural decisions",
            ],
            Role::Debugger => &[
                "Investigate and resolve complex bugs",
                "Analyze stack traces and error messages",
                "Identify race conditions and memory leaks",
                "Root cause analysis for production issues",
                "Propose and implement fixes",
            ],
            Role::Writer => &[
                "Create and maintain project documentation",
                "Write clear API documentation",
                "Create technical guides and tutorials",
                "Keep documentation synchronized with code changes",
                "Follow documentation best practices",
            ],
            Role::Planner => &[
                "Break requests into milestones and actionable tasks",
                "Identify dependencies and sequence the work",
                "Estimate scope and flag risks early",
                "Keep the plan updated as work lands",
            ],
            Role::Orchestrator => &[
                "Route each task to the agent best suited for it",
                "Define hand-off points and exit criteria per phase",
                "Verify results before moving to the next phase",
                "Escalate blockers with a clear summary",
            ],
        };
        lines.iter().map(|l| l.replace("{lang}", language)).collect()
    }

    fn spec_tools(self, language: &str) -> Vec<(String, String)> {
        let extra: Vec<(&str, String)> = match self {
            Role::Architect => vec![(
                "Architecture Diagram Tools",
                "Tools for creating architecture diagrams".into(),
            )],
            Role::Developer => vec![
                ("IDE", format!("IDE for {language} development")),
                ("Linter", "Code quality tool".into()),
                ("Testing Framework", "Framework for running tests".into()),
            ],
            Role::Tester => vec![
                ("Testing Framework", "Framework for writing and running tests".into()),
                ("Coverage Tool", "Tool for measuring test coverage".into()),
            ],
            Role::Reviewer => vec![
                ("Static Analysis Tools", "Tools for code analysis".into()),
                ("Linter", "Code quality tool".into()),
            ],
            Role::Debugger => vec![
                ("Debugger", "Debugging tool".into()),
                ("Profiler", "Performance profiling tool".into()),
            ],
            _ => Vec::new(),
        };
        std::iter::once(("Git".to_string(), "Version control system".to_string()))
            .chain(extra.into_iter().map(|(n, d)| (n.to_string(), d)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Lookups shared with the prompt composer (any agent name)
// ---------------------------------------------------------------------------

/// `planning-agent` → `Planning Agent`.
pub(crate) fn title(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn color_for(name: &str) -> &'static str {
    Role::from_name(name).map_or(DEFAULT_COLOR, Role::color)
}

pub fn tools_for(name: &str) -> String {
    Role::from_name(name).map_or_else(|| BASE_TOOLS.to_string(), Role::tools)
}

pub(crate) fn role_description(name: &str, profile: &ProjectProfile) -> String {
    match Role::from_name(name) {
        Some(role) => role.description(profile),
        None => format!(
            "The {} Agent for {} assists with development tasks.",
            title(name),
            profile.name
        ),
    }
}

pub(crate) fn responsibilities(name: &str, profile: &ProjectProfile) -> Vec<String> {
    match Role::from_name(name) {
        Some(role) => role.responsibilities(&profile.language),
        None => vec![
            format!("Assist with {name}-related tasks"),
            format!("Follow {} best practices", profile.language),
            "Ensure code quality".to_string(),
        ],
    }
}

pub(crate) fn guidelines(profile: &ProjectProfile) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Adhere to {} best practices and coding standards",
            profile.language
        ),
        "Write modular and reusable code structures".to_string(),
        "Follow SOLID principles for software design".to_string(),
        "Use descriptive and consistent naming conventions".to_string(),
        "Document complex logic with inline comments".to_string(),
        "Maintain project structure as per existing conventions".to_string(),
    ];
    let extra = match profile.language.to_lowercase().as_str() {
        "typescript" => Some("Use strict typing and interfaces for type safety"),
        "go" | "golang" => Some("Follow Go conventions and Effective Go guidelines"),
        "python" => Some("Follow the PEP 8 style guide and Python conventions"),
        "rust" => Some("Follow Rust idioms and ownership patterns"),
        _ => None,
    };
    lines.extend(extra.map(str::to_string));
    lines
}

pub(crate) fn spec_tools(name: &str, profile: &ProjectProfile) -> Vec<(String, String)> {
    match Role::from_name(name) {
        Some(role) => role.spec_tools(&profile.language),
        None => vec![("Git".to_string(), "Version control system".to_string())],
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Built-in agent file for `name`, if it is a known role.
pub fn agent_template(name: &str, profile: &ProjectProfile) -> Option<String> {
    let role = Role::from_name(name)?;
    let description = role.description(profile);
    let skills = role.skills(&profile.language);
    let skill_names: Vec<&str> = skills.iter().map(|(s, _)| s.as_str()).collect();
    let lang = &profile.language;

    let mut out = String::new();
    let _ = write!(
        out,
        "---\nname: {name}\ndescription: {description}\ntools: {tools}\nmodel: {DEFAULT_MODEL}\ncolor: {color}\nskills: [{skill_list}]\n---\n\n",
        tools = role.tools(),
        color = role.color(),
        skill_list = skill_names.join(", "),
    );
    let _ = write!(
        out,
        "# Agent {title} - {project}\n\n## Role\n{description}\n\n",
        title = title(name),
        project = profile.name,
    );

    out.push_str("## Specialty\nYour technical mastery rests on the **skills** provided with every task:\n");
    for (skill, why) in &skills {
        let _ = writeln!(out, "- **{skill}**: {why}.");
    }

    let _ = write!(
        out,
        "\n## Work Process\n\
1. **Analysis**: understand the context and the requirements of the task.\n\
2. **Planning**: break the task into actionable steps.\n\
3. **Implementation**: execute following {lang} best practices.\n\
4. **Validation**: make sure the result meets the quality bar.\n\
5. **Documentation**: record the decisions and patterns applied.\n\
\n## Code Conventions\n\
- **Typing**: follow the type conventions of {lang}.\n\
- **Naming**: use the standard conventions of the language.\n\
- **Structure**: keep the organization clear and modular.\n\
- **Style**: follow the project's style guides.\n\
\n## Golden Rules\n\
- **Quality**: prefer clean, maintainable code.\n\
- **Testing**: keep test coverage adequate.\n\
- **Documentation**: document complex code and architectural decisions.\n\
- **Collaboration**: coordinate with other agents when needed.\n"
    );
    Some(out)
}
