//! Index pages for the generated artifact directories.

use crate::frontmatter::{AgentInfo, CommandInfo, SkillInfo, SKILL_CATEGORIES};

pub fn agents_readme(project: &str, agents: &[AgentInfo]) -> String {
    let mut out = String::new();
    out.push_str("# Available Agents\n\n");
    out.push_str(&format!("This directory contains the specialized agents of the {project} project.\n\n"));
    if agents.is_empty() {
        out.push_str("*No agents configured yet.*\n");
        return out;
    }

    out.push_str("## Configured Agents\n\n");
    for agent in agents {
        out.push_str(&format!("### {}\n\n", agent.name));
        out.push_str(&format!("**Description**: {}\n\n", agent.description));
        out.push_str(&format!("**Color**: {}\n", agent.color));
        out.push_str(&format!("\n**Model**: {}\n", agent.model));
        if !agent.tools.is_empty() {
            out.push_str(&format!("\n**Tools**: {}\n", agent.tools.join(", ")));
        }
        if !agent.skills.is_empty() {
            out.push_str("\n**Injected Skills**:\n");
            for skill in &agent.skills {
                out.push_str(&format!("- {skill}\n"));
            }
        }
        out.push_str("\n---\n\n");
    }

    out.push_str("## Using the Agents\n\n");
    out.push_str(
        "Agents are referenced by the commands in `commands/`. \
         Each command orchestrates one or more agents to carry out a specific task.\n",
    );
    out
}

pub fn skills_readme(project: &str, skills: &[SkillInfo]) -> String {
    let mut out = String::new();
    out.push_str("# Available Skills\n\n");
    out.push_str(&format!("This directory contains the technical skills injectable into the agents of the {project} project.\n\n"));
    if skills.is_empty() {
        out.push_str("*No skills configured yet.*\n");
        return out;
    }

    out.push_str("## Skills by Category\n\n");
    for category in SKILL_CATEGORIES {
        let group: Vec<&SkillInfo> = skills.iter().filter(|s| s.category == category).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}/\n\n", crate::embedded::capitalize(category)));
        for skill in group {
            out.push_str(&format!("#### {}\n\n", skill.name));
            out.push_str(&format!("**Description**: {}\n\n", skill.description));
            out.push_str(&format!("**Purpose**: {}\n\n", skill.purpose));
            out.push_str("---\n\n");
        }
    }

    out.push_str("## How Skills Work\n\n");
    out.push_str("Skills are injected into agents through the YAML frontmatter:\n\n");
    out.push_str("```yaml\n---\nskills: [go-expert, code-reviewer]\n---\n```\n");
    out
}

pub fn commands_readme(project: &str, commands: &[CommandInfo]) -> String {
    let mut out = String::new();
    out.push_str("# Available Commands\n\n");
    out.push_str(&format!("This directory contains the commands of the {project} project.\n\n"));
    if commands.is_empty() {
        out.push_str("*No commands configured yet.*\n");
        return out;
    }

    out.push_str("## Configured Commands\n\n");
    for cmd in commands {
        out.push_str(&format!("### {}\n\n", cmd.name));
        out.push_str(&format!("**Description**: {}\n\n", cmd.description));
        out.push_str(&format!("**Usage**: `{}`\n\n", cmd.usage));
        out.push_str("---\n\n");
    }

    out.push_str("## Using the Commands\n\n");
    out.push_str("Commands define orchestrated workflows that use one or more agents.\n");
    out
}
