//! Name normalization for everything that becomes a file name.
//!
//! Callers never pre-normalize; this is the single place identifiers are
//! turned into kebab-case.

use regex::Regex;
use std::sync::OnceLock;

static INVALID_RE: OnceLock<Regex> = OnceLock::new();
static DASHES_RE: OnceLock<Regex> = OnceLock::new();

fn invalid_re() -> &'static Regex {
    INVALID_RE.get_or_init(|| Regex::new(r"[^a-z0-9_-]").expect("static regex"))
}

fn dashes_re() -> &'static Regex {
    DASHES_RE.get_or_init(|| Regex::new(r"-{2,}").expect("static regex"))
}

/// Fallback when nothing usable survives sanitization.
pub const UNNAMED: &str = "unnamed";

/// Turn an arbitrary label into a filesystem-safe kebab-case identifier.
///
/// 1. split camelCase / PascalCase with a hyphen (only after `[a-z0-9]`)
/// 2. lowercase
/// 3. replace anything outside `[a-z0-9_-]` with `-`
/// 4. collapse hyphen runs, trim leading/trailing hyphens
/// 5. empty result becomes `unnamed`
pub fn sanitize_name(input: &str) -> String {
    let mut split = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;
    for c in input.chars() {
        if c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            split.push('-');
        }
        split.push(c);
        prev = Some(c);
    }

    let lowered = split.to_lowercase();
    let replaced = invalid_re().replace_all(&lowered, "-");
    let collapsed = dashes_re().replace_all(&replaced, "-");
    let trimmed = collapsed.trim_matches('-');

    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitize every entry and drop later duplicates, keeping first-seen order.
pub fn sanitize_all<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let clean = sanitize_name(name.as_ref());
        if !out.contains(&clean) {
            out.push(clean);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_examples() {
        assert_eq!(sanitize_name("CodeReviewer"), "code-reviewer");
        assert_eq!(sanitize_name("api2Docs"), "api2-docs");
        assert_eq!(sanitize_name("code_reviewer"), "code_reviewer");
        assert_eq!(sanitize_name("@#$!"), "unnamed");
        assert_eq!(sanitize_name("code-reviewer"), "code-reviewer");
        assert_eq!(sanitize_name("-a--b-"), "a-b");
    }

    #[test]
    fn real_world_labels() {
        assert_eq!(sanitize_name("Node.js"), "node-js");
        assert_eq!(sanitize_name("Next.js 14"), "next-js-14");
        assert_eq!(sanitize_name("PlanningAgent"), "planning-agent");
        assert_eq!(sanitize_name("API REST"), "api-rest");
        assert_eq!(sanitize_name("HTTPServer"), "httpserver");
        assert_eq!(sanitize_name("Go"), "go");
        assert_eq!(sanitize_name(""), "unnamed");
        assert_eq!(sanitize_name("Café"), "caf");
    }

    #[test]
    fn idempotent_and_well_formed() {
        let valid = Regex::new(r"^[a-z0-9_]([a-z0-9_-]*[a-z0-9_])?$").unwrap();
        for s in [
            "CodeReviewer",
            "  spaced out  ",
            "UPPER_snake_Case",
            "emoji 🚀 rocket",
            "a1B2c3",
            "---",
            "Événement",
            "x",
            "React/Redux",
        ] {
            let once = sanitize_name(s);
            assert_eq!(sanitize_name(&once), once, "not idempotent for {s:?}");
            assert!(once == UNNAMED || valid.is_match(&once), "{s:?} -> {once:?}");
        }
    }

    #[test]
    fn sanitize_all_dedups_after_normalizing() {
        let names = ["Tester", "tester", "code reviewer", "Code-Reviewer"];
        assert_eq!(sanitize_all(&names), ["tester", "code-reviewer"]);
    }
}
