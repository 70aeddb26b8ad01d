use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const AGENTS_DIR: &str = "agents";
pub const SKILLS_DIR: &str = "skills";
pub const COMMANDS_DIR: &str = "commands";

pub const PROJECT_FILE: &str = "project.yaml";
pub const README_FILE: &str = "README.md";
pub const DEVELOPMENT_GUIDE_FILE: &str = "development_guide.md";
pub const CLAUDE_MD: &str = "CLAUDE.md";

pub const CONFIG_APP_DIR: &str = "claude-init";
pub const CONFIG_FILE: &str = "config.yaml";

/// Locations probed, in order, for external templates.
pub const TEMPLATE_SEARCH_PATHS: [&str; 3] = [
    "./claude_examples",
    "../claude_examples",
    "../../claude_examples",
];

/// Directories never descended into by the analyzer.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    ".git",
    "dist",
    "build",
    "target",
    "bin",
    "obj",
    ".venv",
    "venv",
    "__pycache__",
    ".claude",
    ".idea",
    ".vscode",
];

/// Common documentation directory names.
pub const DOC_DIRS: &[&str] = &["docs", "documentation", "guide", "guides", "wiki", "help"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn claude_dir(root: &Path) -> PathBuf {
    root.join(CLAUDE_DIR)
}

pub fn project_file(root: &Path) -> PathBuf {
    claude_dir(root).join(PROJECT_FILE)
}

pub fn claude_md(root: &Path) -> PathBuf {
    root.join(CLAUDE_MD)
}

pub fn agents_dir(out: &Path) -> PathBuf {
    out.join(AGENTS_DIR)
}

pub fn skills_dir(out: &Path) -> PathBuf {
    out.join(SKILLS_DIR)
}

pub fn commands_dir(out: &Path) -> PathBuf {
    out.join(COMMANDS_DIR)
}

pub fn agent_file(out: &Path, name: &str) -> PathBuf {
    agents_dir(out).join(format!("{name}.md"))
}

pub fn skill_file(out: &Path, category: &str, name: &str) -> PathBuf {
    skills_dir(out).join(category).join(format!("{name}.md"))
}

pub fn command_file(out: &Path, name: &str) -> PathBuf {
    commands_dir(out).join(format!("{name}.md"))
}

pub fn agents_readme(out: &Path) -> PathBuf {
    agents_dir(out).join(README_FILE)
}

pub fn skills_readme(out: &Path) -> PathBuf {
    skills_dir(out).join(README_FILE)
}

pub fn commands_readme(out: &Path) -> PathBuf {
    commands_dir(out).join(README_FILE)
}

pub fn development_guide(out: &Path) -> PathBuf {
    out.join(DEVELOPMENT_GUIDE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_layout() {
        let out = Path::new("/p/.claude");
        assert_eq!(agent_file(out, "architect"), Path::new("/p/.claude/agents/architect.md"));
        assert_eq!(
            skill_file(out, "language", "go"),
            Path::new("/p/.claude/skills/language/go.md")
        );
        assert_eq!(command_file(out, "test"), Path::new("/p/.claude/commands/test.md"));
        assert_eq!(skills_readme(out), Path::new("/p/.claude/skills/README.md"));
        assert_eq!(
            development_guide(out),
            Path::new("/p/.claude/development_guide.md")
        );
    }

    #[test]
    fn project_paths() {
        let root = Path::new("/p");
        assert_eq!(project_file(root), Path::new("/p/.claude/project.yaml"));
        assert_eq!(claude_md(root), Path::new("/p/CLAUDE.md"));
    }
}
