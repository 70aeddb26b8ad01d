//! Best-effort metadata extraction from generated artifacts.
//!
//! Artifacts are Markdown with an optional `---` delimited header holding flat
//! `key: value` pairs. Model output is not trusted to be valid YAML, so the
//! header is read line by line and anything unrecognized is ignored. Parsing
//! never fails: a file without a usable header still yields a record built
//! from its basename and first body line.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::embedded::agents::{DEFAULT_COLOR, DEFAULT_MODEL};
use crate::error::Result;

const MAX_DESCRIPTION_CHARS: usize = 200;

/// Skill categories a README groups by, in display order.
pub const SKILL_CATEGORIES: [&str; 4] = ["language", "framework", "base", "other"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
    pub color: String,
    pub model: String,
    pub tools: Vec<String>,
    pub skills: Vec<String>,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillInfo {
    pub name: String,
    pub category: String,
    pub description: String,
    pub purpose: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub path: PathBuf,
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

struct Document<'a> {
    fields: HashMap<String, String>,
    body: Vec<&'a str>,
}

impl<'a> Document<'a> {
    fn parse(content: &'a str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let open = lines.iter().position(|l| l.trim() == "---");
        let close = open.and_then(|o| {
            lines[o + 1..]
                .iter()
                .position(|l| l.trim() == "---")
                .map(|c| o + 1 + c)
        });

        match (open, close) {
            (Some(o), Some(c)) => Document {
                fields: parse_fields(&lines[o + 1..c]),
                body: lines[c + 1..].to_vec(),
            },
            (Some(_), None) => Document {
                fields: HashMap::new(),
                body: Vec::new(),
            },
            (None, _) => Document {
                fields: HashMap::new(),
                body: lines,
            },
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// First non-empty body line with any heading marks removed.
    fn first_line(&self) -> Option<String> {
        self.body
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .map(|l| l.trim_start_matches('#').trim())
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().take(MAX_DESCRIPTION_CHARS).collect())
    }

    fn description(&self) -> Option<String> {
        self.get("description")
            .map(str::to_string)
            .or_else(|| self.first_line())
    }
}

fn parse_fields(lines: &[&str]) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    fields
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// `[a, b]` → `["a", "b"]`; `a, b` → `["a", "b"]`; empty → `[]`.
pub fn parse_list_value(value: &str) -> Vec<String> {
    let value = value.trim();
    let inner = value
        .strip_prefix('[')
        .map(|v| v.strip_suffix(']').unwrap_or(v))
        .unwrap_or(value);
    inner
        .split(',')
        .map(|s| unquote(s.trim()).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

impl AgentInfo {
    pub fn parse(path: &Path, content: &str) -> Self {
        let doc = Document::parse(content);
        let name = stem(path);
        AgentInfo {
            description: doc.description().unwrap_or_else(|| format!("Agent {name}")),
            color: doc.get("color").unwrap_or(DEFAULT_COLOR).to_string(),
            model: doc.get("model").unwrap_or(DEFAULT_MODEL).to_string(),
            tools: doc.get("tools").map(parse_list_value).unwrap_or_default(),
            skills: doc.get("skills").map(parse_list_value).unwrap_or_default(),
            path: path.to_path_buf(),
            name,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, &content))
    }
}

impl SkillInfo {
    /// The category comes from the directory the file sits in; the header's
    /// `category` only applies when the directory is not one of the known ones.
    pub fn parse(path: &Path, content: &str) -> Self {
        let doc = Document::parse(content);
        let name = stem(path);
        let from_dir = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|d| d.to_string_lossy().into_owned())
            .filter(|d| SKILL_CATEGORIES[..3].contains(&d.as_str()));
        let category = from_dir
            .or_else(|| {
                doc.get("category")
                    .map(str::to_lowercase)
                    .filter(|c| SKILL_CATEGORIES.contains(&c.as_str()))
            })
            .unwrap_or_else(|| "other".to_string());
        SkillInfo {
            description: doc.description().unwrap_or_else(|| format!("Skill {name}")),
            purpose: doc
                .get("purpose")
                .map(str::to_string)
                .unwrap_or_else(|| format!("Provides {name}-related expertise and capabilities")),
            category,
            path: path.to_path_buf(),
            name,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, &content))
    }
}

impl CommandInfo {
    pub fn parse(path: &Path, content: &str) -> Self {
        let doc = Document::parse(content);
        let name = stem(path);
        CommandInfo {
            description: doc.description().unwrap_or_else(|| format!("Command {name}")),
            usage: doc.get("usage").unwrap_or(&name).to_string(),
            path: path.to_path_buf(),
            name,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, &content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn agent_header_is_read() {
        let content = "---\nname: X\ndescription: Y\ncolor: c\ntools: [A, B]\n---\n\n# Body\n";
        let info = AgentInfo::parse(Path::new("agents/X.md"), content);
        assert_eq!(info.name, "X");
        assert_eq!(info.description, "Y");
        assert_eq!(info.color, "c");
        assert_eq!(info.model, DEFAULT_MODEL);
        assert_eq!(info.tools, vec!["A", "B"]);
        assert!(info.skills.is_empty());
    }

    #[test]
    fn name_comes_from_file_not_header() {
        let content = "---\nname: Something Else\ndescription: d\n---\n";
        let info = AgentInfo::parse(Path::new("agents/architect.md"), content);
        assert_eq!(info.name, "architect");
    }

    #[test]
    fn missing_header_uses_basename_and_first_line() {
        let content = "\n\n# Reviews pull requests carefully\n\nMore text.\n";
        let info = AgentInfo::parse(Path::new("/x/reviewer.md"), content);
        assert_eq!(info.name, "reviewer");
        assert_eq!(info.description, "Reviews pull requests carefully");
        assert_eq!(info.color, "gray");
        assert!(info.tools.is_empty());
    }

    #[test]
    fn unterminated_header_is_treated_as_body() {
        let content = "---\nname: broken\ndescription: never closed\n";
        let info = CommandInfo::parse(Path::new("commands/broken.md"), content);
        assert_eq!(info.description, "Command broken");
        assert_eq!(info.usage, "broken");
    }

    #[test]
    fn long_first_line_is_capped() {
        let line = "a".repeat(300);
        let info = SkillInfo::parse(Path::new("skills/base/x.md"), &line);
        assert_eq!(info.description.chars().count(), 200);
    }

    #[test]
    fn empty_file_gets_kind_defaults() {
        let info = CommandInfo::parse(Path::new("commands/deploy.md"), "");
        assert_eq!(info.description, "Command deploy");
        assert_eq!(info.usage, "deploy");
        let skill = SkillInfo::parse(Path::new("skills/go.md"), "");
        assert_eq!(skill.description, "Skill go");
        assert_eq!(skill.category, "other");
    }

    #[test]
    fn skill_category_prefers_directory() {
        let content = "---\ndescription: d\ncategory: base\npurpose: p\n---\n";
        let info = SkillInfo::parse(Path::new("skills/framework/express.md"), content);
        assert_eq!(info.category, "framework");
        assert_eq!(info.purpose, "p");
        let loose = SkillInfo::parse(Path::new("skills/express.md"), content);
        assert_eq!(loose.category, "base");
    }

    #[test]
    fn command_values_are_unquoted() {
        let content = "---\ndescription: \"Run tests\"\nusage: \"test [name]\"\n---\n";
        let info = CommandInfo::parse(Path::new("commands/test.md"), content);
        assert_eq!(info.description, "Run tests");
        assert_eq!(info.usage, "test [name]");
    }

    #[test]
    fn list_values() {
        assert_eq!(parse_list_value("[a, b , c]"), vec!["a", "b", "c"]);
        assert_eq!(parse_list_value("Read, Write"), vec!["Read", "Write"]);
        assert_eq!(parse_list_value("single"), vec!["single"]);
        assert!(parse_list_value("[]").is_empty());
        assert!(parse_list_value("  ").is_empty());
    }

    #[test]
    fn read_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tester.md");
        std::fs::write(&path, "---\ndescription: Tests\nskills: [qa-engineer]\n---\n").unwrap();
        let info = AgentInfo::read(&path).unwrap();
        assert_eq!(info.skills, vec!["qa-engineer"]);
        assert!(AgentInfo::read(&dir.path().join("missing.md")).is_err());
    }
}
