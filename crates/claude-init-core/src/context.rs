//! Local analyzers that enrich the `CLAUDE.md` prompt with facts read
//! straight from the project: scripts, package manager, tsconfig, layout,
//! code-quality tooling and documentation.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::Deserialize;

use crate::paths;

pub const NO_CONTEXT: &str = "No additional project information detected.";

const IMPORTANT_SCRIPTS: &[&str] = &["dev", "start", "build", "test", "lint", "type-check", "watch"];

const IMPORTANT_DEPENDENCIES: &[&str] = &[
    "react", "vue", "angular", "svelte", "next", "nuxt", "gatsby", "express", "fastify", "koa",
    "nest", "axios", "lodash", "ramda", "zod", "typeorm", "prisma", "mongoose", "sequelize", "joi",
    "yup",
];

const IMPORTANT_DEV_DEPENDENCIES: &[&str] = &[
    "typescript",
    "vite",
    "webpack",
    "rollup",
    "esbuild",
    "parcel",
    "jest",
    "vitest",
    "mocha",
    "jasmine",
    "cypress",
    "playwright",
    "@testing-library",
    "eslint",
    "prettier",
    "@typescript-eslint",
    "babel",
    "postcss",
    "tailwindcss",
    "sass",
    "less",
    "storybook",
];

const COMMON_SOURCE_DIRS: &[&str] = &[
    "src", "app", "lib", "components", "pages", "api", "server", "client", "tests", "test",
    "__tests__", "docs", "scripts", "config", "public",
];

/// Collect every analyzer section into one Markdown block. `doc_dirs` are the
/// profile-declared documentation directories, scanned in addition to the
/// common ones.
pub fn analyze_project_context(root: &Path, doc_dirs: &[String]) -> String {
    let sections = [
        ("Package.json info", package_json(root)),
        ("TypeScript config", tsconfig(root)),
        ("Directory structure", directory_structure(root)),
        ("Code quality tools", code_quality(root)),
        ("Documentation", documentation(root, doc_dirs)),
    ];

    let mut out = String::new();
    for (title, body) in sections {
        if let Some(body) = body {
            let _ = write!(out, "**{title}:**\n{body}\n\n");
        }
    }
    if out.is_empty() {
        NO_CONTEXT.to_string()
    } else {
        out
    }
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct PackageJson {
    scripts: BTreeMap<String, String>,
    dependencies: BTreeMap<String, String>,
    dev_dependencies: BTreeMap<String, String>,
}

fn package_json(root: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(root.join("package.json")).ok()?;
    let pkg: PackageJson = serde_json::from_str(&raw).ok()?;

    let mut out = String::from("- **Scripts:**\n");
    for key in IMPORTANT_SCRIPTS {
        if let Some(script) = pkg.scripts.get(*key) {
            let _ = writeln!(out, "  - `{key}`: {script}");
        }
    }

    let manager = if root.join("yarn.lock").exists() {
        "yarn (always use yarn, not npm)"
    } else if root.join("pnpm-lock.yaml").exists() {
        "pnpm"
    } else {
        "npm"
    };
    let _ = writeln!(out, "\n- **Package Manager**: {manager}");

    write_deps(&mut out, "Main dependencies", &pkg.dependencies, IMPORTANT_DEPENDENCIES);
    write_deps(&mut out, "Dev dependencies", &pkg.dev_dependencies, IMPORTANT_DEV_DEPENDENCIES);
    Some(out)
}

fn write_deps(out: &mut String, title: &str, deps: &BTreeMap<String, String>, filter: &[&str]) {
    if deps.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n- **{title}:**");
    for (name, version) in deps {
        if filter.iter().any(|f| name.contains(f)) {
            let _ = writeln!(out, "  - {name}: {version}");
        }
    }
}

fn tsconfig(root: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(root.join("tsconfig.json")).ok()?;
    let cfg: serde_json::Value = serde_json::from_str(&raw).ok()?;
    let opts = cfg.get("compilerOptions")?.as_object()?;

    let mut out = String::from("- **TypeScript Configuration:**\n");
    if let Some(target) = opts.get("target").and_then(|v| v.as_str()) {
        let _ = writeln!(out, "  - target: {target}");
    }
    if opts.get("strict").and_then(|v| v.as_bool()) == Some(true) {
        out.push_str("  - strict mode: enabled\n");
    }
    if let Some(aliases) = opts.get("paths").and_then(|v| v.as_object()) {
        if !aliases.is_empty() {
            out.push_str("\n- **Import Path Aliases:**\n");
            for (alias, target) in aliases {
                let _ = writeln!(out, "  - {alias}: {target}");
            }
        }
    }
    Some(out)
}

fn directory_structure(root: &Path) -> Option<String> {
    let mut body = String::new();
    for dir in COMMON_SOURCE_DIRS {
        let full = root.join(dir);
        if !full.is_dir() {
            continue;
        }
        let _ = writeln!(body, "{dir}/");
        let mut children: Vec<String> = std::fs::read_dir(&full)
            .into_iter()
            .flatten()
            .flatten()
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| !n.starts_with('.'))
            .collect();
        children.sort();
        for child in children {
            let _ = writeln!(body, "  └── {child}/");
        }
    }
    (!body.is_empty()).then(|| format!("```\n{body}```"))
}

fn code_quality(root: &Path) -> Option<String> {
    let mut out = String::new();

    if root.join("eslint.config.mjs").exists() {
        out.push_str("- ESLint: flat config (eslint.config.mjs)\n");
    } else if root.join(".eslintrc.json").exists() {
        out.push_str("- ESLint: .eslintrc.json\n");
    } else if root.join(".eslintrc.js").exists() {
        out.push_str("- ESLint: .eslintrc.js\n");
    }

    if root.join(".prettierrc").exists() {
        out.push_str("- Prettier: configured\n");
    } else if root.join(".prettierrc.json").exists() {
        out.push_str("- Prettier: configured (.prettierrc.json)\n");
    }

    if root.join(".husky").is_dir() {
        out.push_str("- Husky: git hooks configured\n");
    }

    (!out.is_empty()).then_some(out)
}

fn documentation(root: &Path, extra_dirs: &[String]) -> Option<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    let candidates = paths::DOC_DIRS
        .iter()
        .copied()
        .chain(extra_dirs.iter().map(String::as_str));
    for dir in candidates {
        if dir.is_empty() || seen.contains(&dir) || !root.join(dir).is_dir() {
            continue;
        }
        seen.push(dir);

        let mut block = format!("- Directory '{dir}/' found:\n");
        let mut files: Vec<String> = std::fs::read_dir(root.join(dir))
            .into_iter()
            .flatten()
            .flatten()
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".md") || n.ends_with(".txt"))
            .collect();
        files.sort();
        if !files.is_empty() {
            block.push_str("  Documentation files:\n");
            for file in files {
                match doc_summary(&root.join(dir).join(&file)) {
                    Some(summary) => {
                        let _ = writeln!(block, "  - {file}: {summary}");
                    }
                    None => {
                        let _ = writeln!(block, "  - {file}");
                    }
                }
            }
        }
        blocks.push(block);
    }

    if root.join(paths::README_FILE).is_file() {
        blocks.push("- README.md found at the project root\n".to_string());
    }

    (!blocks.is_empty()).then(|| blocks.join("\n"))
}

/// First heading, or else the first substantive line, of a doc file.
fn doc_summary(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    for line in content.lines().map(str::trim) {
        if let Some(title) = line.strip_prefix('#') {
            let title = title.trim_start_matches('#').trim();
            if !title.is_empty() && title.chars().count() < 100 {
                return Some(title.to_string());
            }
            continue;
        }
        let len = line.chars().count();
        if !line.starts_with("---") && len > 10 && len < 100 {
            return Some(line.to_string());
        }
    }
    None
}
