use super::capitalize;
use crate::profile::ProjectProfile;
use crate::sanitize::sanitize_name;

/// Skills every generation carries.
pub const BASE_SKILLS: [&str; 3] = ["technical-writer", "code-reviewer", "debug-master"];

const KNOWN_LANGUAGES: &[&str] = &["typescript", "javascript", "go", "python", "rust"];

fn is_known(name: &str, profile: &ProjectProfile) -> bool {
    BASE_SKILLS.contains(&name)
        || KNOWN_LANGUAGES.contains(&name)
        || name == sanitize_name(&profile.language)
        || (profile.has_framework() && name == sanitize_name(&profile.framework))
}

pub(crate) fn description(name: &str, profile: &ProjectProfile) -> String {
    let fixed = match name {
        "technical-writer" => Some("Assist with technical writing, documentation, and code comments"),
        "code-reviewer" => Some("Review code for quality, best practices, and potential issues"),
        "debug-master" => Some("Debug complex issues, analyze errors, and propose solutions"),
        "typescript" => Some("Optimize TypeScript performance and configure TypeScript projects"),
        "javascript" => Some("Optimize JavaScript performance and configure JavaScript projects"),
        "go" => Some("Optimize Go performance and configure Go projects"),
        "python" => Some("Optimize Python performance and configure Python projects"),
        "rust" => Some("Optimize Rust performance and configure Rust projects"),
        _ => None,
    };
    if let Some(desc) = fixed {
        return desc.to_string();
    }
    let lang = &profile.language;
    if name.eq_ignore_ascii_case(lang) || name == sanitize_name(lang) {
        return format!("Optimize {lang} performance and configure {lang} projects");
    }
    let fw = &profile.framework;
    if profile.has_framework() && (name.eq_ignore_ascii_case(fw) || name == sanitize_name(fw)) {
        return format!("Configure and optimize {fw} framework components");
    }
    format!("Assist with {name}-related tasks and configurations")
}

pub(crate) fn title(name: &str) -> String {
    match name {
        "technical-writer" => "Technical Writing Skill".to_string(),
        "code-reviewer" => "Code Review Skill".to_string(),
        "debug-master" => "Debugging Skill".to_string(),
        _ => format!("{} Skill", capitalize(name)),
    }
}

fn purpose(name: &str, category: &str) -> String {
    match category {
        "base" => format!("Cross-cutting {name} practices every agent can inject"),
        "framework" => format!("Framework conventions and patterns for {name}"),
        _ => format!("Language idioms, tooling and pitfalls for {name}"),
    }
}

fn triggers(name: &str) -> String {
    let lines: Vec<String> = match name {
        "technical-writer" => ["Write documentation for...", "Add comments to...", "Explain how this works...", "Create a guide for..."]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        "code-reviewer" => ["Review this code...", "Check for best practices...", "Identify potential issues...", "Suggest improvements..."]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        "debug-master" => ["Debug this error...", "Fix this bug...", "Why is this not working...", "Analyze this stack trace..."]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        _ => vec![
            format!("Optimize {name}..."),
            format!("Configure {name}..."),
            format!("Fix {name} issue..."),
            format!("Improve {name}..."),
        ],
    };
    lines
        .iter()
        .map(|l| format!("- \"{l}\""))
        .collect::<Vec<_>>()
        .join("\n")
}

fn output_example(name: &str, language: &str) -> String {
    match name {
        "technical-writer" => format!(
            "**Documentation Example:**\n\n```markdown\n## Function Name\n\nBrief description of what the function does.\n\n### Parameters\n- param1: Description\n- param2: Description\n\n### Returns\nDescription of return value.\n\n### Example\n```{}\n// Example code\n```\n```",
            sanitize_name(&language.to_lowercase())
        ),
        "code-reviewer" => format!(
            "**Review Summary:**\n- Code follows {language} best practices\n- Consider handling edge cases in...\n- Suggestion: Extract this logic into a separate function"
        ),
        "debug-master" => "**Analysis:**\nThe issue is caused by...\n**Solution:**\n1. Fix the root cause by...\n2. Add error handling for...\n3. Test with...".to_string(),
        _ => format!("**Example Output:**\nApplied {name} best practices to improve code quality and performance."),
    }
}

/// Built-in skill file for `name`, if the bank knows it. `category` is the
/// classification (`base`, `language`, `framework`) the file is written under.
pub fn skill_template(name: &str, category: &str, profile: &ProjectProfile) -> Option<String> {
    if !is_known(name, profile) {
        return None;
    }
    let desc = description(name, profile);
    Some(format!(
        "---
name: {name}
description: {desc}
category: {category}
purpose: {purpose}
---

# {title}

{desc}

## How It Works

1. The agent identifies the need to use this {name} skill.
2. The specific context and requirements are analyzed.
3. Appropriate {name} patterns and best practices are applied.

## Usage

This skill is automatically activated when working with {name} in the {project} project.

**Trigger phrases:**
{triggers}

## Capabilities

- Language-specific best practices for {name}
- Framework-specific patterns and conventions
- Code optimization techniques
- Testing strategies
- Common pitfalls and solutions

## Output Examples

{example}

## Present Results to User

When applying this skill, present results in a clear, structured format:
- Brief summary of what was done
- Key changes or recommendations
- Any relevant code snippets or examples
- Next steps or considerations

## Troubleshooting

**Common issues:**
- **Incorrect syntax**: Follow {lang} conventions and best practices
- **Missing dependencies**: Ensure all required packages are installed
- **Type errors**: Check type annotations and interfaces
- **Performance issues**: Review for optimization opportunities
",
        purpose = purpose(name, category),
        title = title(name),
        project = profile.name,
        triggers = triggers(name),
        example = output_example(name, &profile.language),
        lang = profile.language,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProjectOrigin;
    use ai_provider::ProviderId;

    fn profile(language: &str, framework: &str) -> ProjectProfile {
        ProjectProfile {
            name: "shop".into(),
            language: language.into(),
            framework: framework.into(),
            ..ProjectProfile::draft(ProjectOrigin::New, ProviderId::Cli)
        }
    }

    #[test]
    fn base_and_project_skills_are_known() {
        let p = profile("Node.js", "Express");
        assert!(skill_template("code-reviewer", "base", &p).is_some());
        assert!(skill_template("node-js", "language", &p).is_some());
        assert!(skill_template("express", "framework", &p).is_some());
        assert!(skill_template("go", "language", &p).is_some());
        assert!(skill_template("graphql-schema", "language", &p).is_none());
    }

    #[test]
    fn template_frontmatter_and_sections() {
        let t = skill_template("express", "framework", &profile("JavaScript", "Express")).unwrap();
        assert!(t.starts_with("---\nname: express\ndescription: Configure and optimize Express framework components\ncategory: framework\n"));
        assert!(t.contains("# Express Skill"));
        assert!(t.contains("- \"Configure express...\""));
        assert!(t.contains("in the shop project"));
    }

    #[test]
    fn titles_and_descriptions() {
        let p = profile("Go", "");
        assert_eq!(title("debug-master"), "Debugging Skill");
        assert_eq!(title("go"), "Go Skill");
        assert_eq!(description("go", &p), "Optimize Go performance and configure Go projects");
        assert_eq!(
            description("graphql", &p),
            "Assist with graphql-related tasks and configurations"
        );
    }
}
