//! Prompt composition for every provider call the pipeline makes.
//!
//! Each artifact prompt has the same frame: a project header, a per-kind
//! specification drawn from the embedded role tables, the authoring guide for
//! that kind and output instructions. Only the command-with-context prompt
//! varies by provider; see [`provider_addendum`].

use ai_provider::ProviderId;

use crate::embedded::{agents, commands, skills};
use crate::guides::guide;
use crate::profile::ProjectProfile;
use crate::templates::ArtifactKind;

const BASE_SYSTEM_PROMPT: &str = "You are an expert in software development and in generating configuration for software projects.

Your task is to generate configuration files for agents, commands and skills used in AI-assisted development.

Be precise and produce content that is directly usable without further editing.";

pub fn base_system_prompt() -> &'static str {
    BASE_SYSTEM_PROMPT
}

/// System prompt for a call, with the project's `CLAUDE.md` appended when
/// there is one.
pub fn system_prompt(claude_md: Option<&str>) -> String {
    match claude_md.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "{BASE_SYSTEM_PROMPT}\n\n# PROJECT CONTEXT (from CLAUDE.md)\n\n\
             The current context of the project follows. Keep it in mind so the generated \
             content is coherent and consistent with the existing project:\n\n\
             {context}\n---\nEND OF PROJECT CONTEXT\n"
        ),
        None => BASE_SYSTEM_PROMPT.to_string(),
    }
}

fn project_details(profile: &ProjectProfile) -> String {
    format!(
        "## PROJECT DETAILS\n\
         - Language: {}\n\
         - Framework: {}\n\
         - Architecture: {}\n\
         - Description: {}",
        profile.language,
        display_or_none(&profile.framework),
        profile.architecture,
        profile.description,
    )
}

fn display_or_none(value: &str) -> &str {
    if value.trim().is_empty() {
        "None"
    } else {
        value
    }
}

fn bullets(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| format!("  - {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

pub fn agent_prompt(name: &str, profile: &ProjectProfile) -> String {
    let tools: Vec<String> = agents::spec_tools(name, profile)
        .into_iter()
        .map(|(tool, why)| format!("{tool}: {why}"))
        .collect();
    format!(
        "Generate a comprehensive agent configuration file for a {name} agent for a project called {project}.

{details}

## AGENT SPECIFICATION
- Role: {role}
- Responsibilities:
{responsibilities}
- Coding Guidelines:
{guidelines}
- Tools:
{tools}
- Frontmatter: name, description, tools, model, color and (optionally) skills

## CRITICAL: AGENT CREATION GUIDE

You MUST follow this guide to create the agent. Read it carefully and apply ALL principles:

{guide}

## OUTPUT FORMAT

Generate the agent file following the template structure from the guide above. The output must be a complete, production-ready agent configuration that:

1. Follows the \"Official Agent Template\" structure from the guide
2. Implements the \"Agent Loop\" with all four phases
3. Defines the \"Injected Capabilities\" (skills and tools) properly
4. Includes a \"Decision Strategy\" with examples
5. Documents the \"Golden Rules\" and \"Constraints and Policies\"
6. Provides an \"Example Invocation\" with expected output

CRITICAL: The agent MUST be agnostic to specific technologies. All technical knowledge comes from injected skills, not from the agent definition itself.
Output only the file content, starting with the `---` frontmatter line.",
        project = profile.name,
        details = project_details(profile),
        role = agents::role_description(name, profile),
        responsibilities = bullets(&agents::responsibilities(name, profile)),
        guidelines = bullets(&agents::guidelines(profile)),
        tools = bullets(&tools),
        guide = guide(ArtifactKind::Agent),
    )
}

pub fn skill_prompt(name: &str, category: &str, profile: &ProjectProfile) -> String {
    format!(
        "Generate a comprehensive skill configuration file for a {category} skill called {name} for a project called {project}.

{details}

## SKILL SPECIFICATION
- Skill Type: {category}
- Description: {description}
- Title: {title}
- Frontmatter: name, description, category ({category}) and purpose

## CRITICAL: SKILL CREATION GUIDE

You MUST follow this guide to create the skill. Read it carefully and apply ALL principles:

{guide}

## OUTPUT FORMAT

Generate the skill file following the template structure from the guide above. The output must be a complete, production-ready skill configuration that:

1. Follows the \"Official Skill Template\" structure from the guide
2. Includes proper frontmatter with name and description
3. Documents \"How It Works\" with clear phases
4. Provides \"Usage\" examples and trigger phrases
5. Lists \"Capabilities\" with best practices and patterns
6. Includes \"Output Examples\" and \"Troubleshooting\" sections

CRITICAL: The skill must be domain-specific knowledge that agents can inject, not procedural instructions.
Output only the file content, starting with the `---` frontmatter line.",
        project = profile.name,
        details = project_details(profile),
        description = skills::description(name, profile),
        title = skills::title(name),
        guide = guide(ArtifactKind::Skill),
    )
}

fn command_specification(name: &str, profile: &ProjectProfile) -> String {
    format!(
        "## COMMAND SPECIFICATION
- Description: {}
- Usage: {}
- Frontmatter: name, description and usage
- Flow:
{}",
        commands::description(name, profile),
        commands::usage(name),
        commands::flow(name, profile),
    )
}

/// Prompt for a command with no knowledge of which agents and skills exist.
pub fn command_prompt(name: &str, profile: &ProjectProfile) -> String {
    format!(
        "Generate a comprehensive command configuration file for a {name} command for a project called {project}.

{details}

{spec}

## CRITICAL: COMMAND CREATION GUIDE

You MUST follow this guide to create the command. Read it carefully and apply ALL principles:

{guide}

## OUTPUT FORMAT

Generate the command file following the template structure from the guide above. The output must be a complete, production-ready command configuration that:

1. Follows the \"Official Command Template\" structure from the guide
2. Implements the \"Orchestrated Implementation Flow\" with all agents and phases
3. Includes \"Critical Rules\" and validation steps
4. Specifies which agents are involved and their responsibilities

CRITICAL: The command must orchestrate agents properly, defining clear responsibilities and handoff points between agents.
Output only the file content, starting with the `---` frontmatter line.",
        project = profile.name,
        details = project_details(profile),
        spec = command_specification(name, profile),
        guide = guide(ArtifactKind::Command),
    )
}

/// Prompt for a command that may only reference the agents and skills in
/// the supplied README indices.
pub fn command_prompt_with_context(
    name: &str,
    profile: &ProjectProfile,
    agents_context: &str,
    skills_context: &str,
    provider: ProviderId,
) -> String {
    let mut prompt = format!(
        "Generate a comprehensive command configuration file for a {name} command for a project called {project}.

{details}

{spec}

## CRITICAL: COMMAND CREATION GUIDE

{guide}

## AVAILABLE AGENTS AND SKILLS

Below are the agents and skills that have been created for this project.
You MUST reference ONLY these agents and skills when creating this command.

### AVAILABLE AGENTS

{agents_context}

### AVAILABLE SKILLS

{skills_context}

## HOW TO SELECT THE RIGHT AGENTS AND SKILLS

Analyze the lists above. Read each agent's DESCRIPTION and each skill's PURPOSE to decide which ones suit this command.

1. Read the descriptions of all available agents
2. Identify the agent whose role matches the command's primary goal
3. Read the purposes of all available skills
4. Select the skills that complement the chosen agent for this task
5. Do not default to the same agent and skills for every command

For a \"test\" command look for an agent whose description mentions testing or verification. For \"lint\" or \"review\", code quality and standards. For \"bug-fix\", debugging and investigation. For \"new-feature\", planning and implementation, which may take several agents.

## CRITICAL REQUIREMENTS

- Match by description and purpose, never by guesswork.
- Reference ONLY agents and skills from the lists above. Do not invent new ones.
- Name the reason for each selection next to it, for example:

### 1. [Phase Name]
- **Agent**: [agent-from-the-list] - selected because its description mentions \"[relevant part]\"
- **Skills**:
    - [skill-from-the-list]: provides \"[relevant purpose]\"
- [Action to perform]

Output only the file content, starting with the `---` frontmatter line.",
        project = profile.name,
        details = project_details(profile),
        spec = command_specification(name, profile),
        guide = guide(ArtifactKind::Command),
    );
    if let Some(extra) = provider_addendum(provider) {
        prompt.push_str("\n\n");
        prompt.push_str(extra);
    }
    prompt
}

const OPENAI_COMMAND_ADDENDUM: &str = "## ADDITIONAL REQUIREMENTS

Generate a comprehensive, detailed command configuration:

1. Be specific: include concrete examples in the Usage section
2. Be thorough: at least 4 distinct workflow phases
3. Use the available agents broadly: at least 4 different agents
4. Include a Mermaid diagram of the workflow
5. Include detailed rollback procedures

Minimum requirements:
- At least 4 different agents
- At least 4 distinct workflow phases
- Concrete usage examples
- Mermaid workflow diagram
- Detailed rollback procedures";

/// Extra command instructions for back-ends whose output tends to be thin.
/// Keyed by provider so further entries stay in one table.
pub fn provider_addendum(provider: ProviderId) -> Option<&'static str> {
    match provider {
        ProviderId::Openai => Some(OPENAI_COMMAND_ADDENDUM),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Project-level documents
// ---------------------------------------------------------------------------

pub fn recommendation_prompt(profile: &ProjectProfile) -> String {
    format!(
        "Based on the following project information, recommend the optimal AI-assisted development structure.

Project Name: {name}
Description: {description}
Language: {language}
Framework: {framework}
Architecture: {architecture}
Database: {database}
Project Category: {category}
Business Context: {business}

Please recommend:
1. Which agents should be generated (list agent names)
2. Which commands should be generated (list command names)
3. Which skills should be included (list skill names)
4. A brief description of the recommended structure

CRITICAL NAMING CONVENTION:
ALL agent, command and skill names MUST be kebab-case (lowercase with hyphens).
Valid: \"code-reviewer\", \"test-runner\", \"api-docs\", \"bug-fix\".
Invalid: \"CodeReviewer\", \"codeReviewer\", \"CODE_REVIEWER\".

Format your response as a JSON object with the following structure:
{{
  \"agents\": [\"agent-name-1\", \"agent-name-2\"],
  \"commands\": [\"command-name-1\", \"command-name-2\"],
  \"skills\": [\"skill-name-1\", \"skill-name-2\"],
  \"description\": \"Brief description of the recommended structure\"
}}

Base your recommendations on the project's technology stack and requirements.
Respond with the JSON object only.",
        name = profile.name,
        description = profile.description,
        language = profile.language,
        framework = display_or_none(&profile.framework),
        architecture = profile.architecture,
        database = display_or_none(&profile.database),
        category = profile.category,
        business = profile.business_context,
    )
}

pub fn claude_md_prompt(profile: &ProjectProfile, project_context: &str) -> String {
    format!(
        "Generate a complete and detailed CLAUDE.md file for the following project.

This file is read by AI coding assistants to understand the project and give accurate help.

**Basic project information:**
- **Name:** {name}
- **Description:** {description}
- **Main language:** {language}
- **Framework:** {framework}

**Additional information from analyzing the project:**
{project_context}

Generate a CLAUDE.md with this format and level of detail:

# CLAUDE.md

This file provides guidance to AI coding assistants when working with code in this repository.

## Project Overview
[Concise but complete description of the project, its purpose and goals]

## Tech Stack
- **Framework**: [framework and version]
- **Language**: [language and version]
- **Package Manager**: [which one MUST be used]
- [Other important technologies]

## Essential Commands
### Development
### Building
### Testing
### Other

## Architecture
### Directory Structure
[The REAL directory structure, not a generic one]
### Key Architectural Concepts

## Import Path Aliases
[If any, from tsconfig.json or similar]

## Code Quality
[Linters, formatters and hooks]

## Environment Setup

## Component/Module Guidelines

Write the whole document in Markdown, specific to this project. Do NOT use placeholders such as \"...\" or generic commands. When specific information is available (such as package.json scripts), USE it.",
        name = profile.name,
        description = profile.description,
        language = profile.language,
        framework = display_or_none(&profile.framework),
    )
}

pub fn development_guide_prompt(
    profile: &ProjectProfile,
    project_context: &str,
    agents_readme: &str,
    skills_readme: &str,
    command_names: &[String],
) -> String {
    format!(
        "Generate a complete and detailed development guide for the following project.

**Basic project information:**
- **Name:** {name}
- **Description:** {description}
- **Main language:** {language}
- **Framework:** {framework}
- **Architecture:** {architecture}

**Additional information from analyzing the project:**
{project_context}

## THE PROJECT'S .claude/ STRUCTURE

This project has a .claude/ directory with custom agents, skills and commands.

### Configured Agents
{agents_readme}

### Available Skills
{skills_readme}

### Available Commands
{commands}

The guide must be a complete Markdown document covering:

1. **Project Structure**: the REAL directory layout and how code is organized for this architecture
2. **Code Conventions**: formatting, file naming, identifiers, comments and project-specific patterns
3. **Builds and Scripts**: the important scripts, what each does and which package manager to use
4. **Specific Configuration**: import aliases, frameworks and any code generation steps
5. **Testing**: framework, strategy (unit, integration, e2e), commands and coverage target
6. **Git and Commits**: message convention, branching strategy and pull request process
7. **Code Review**: checklist and quality criteria
8. **Deployment**: process, environments and production build commands
9. **Using the .claude/ Structure**: how to use the commands, when to invoke each agent and which skills suit each task

IMPORTANT:
- Base the content on the REAL project information above
- Do NOT use generic placeholders such as \"...\"
- Include the real commands that would be run",
        name = profile.name,
        description = profile.description,
        language = profile.language,
        framework = display_or_none(&profile.framework),
        architecture = profile.architecture,
        commands = if command_names.is_empty() {
            "None".to_string()
        } else {
            command_names.join(", ")
        },
    )
}
