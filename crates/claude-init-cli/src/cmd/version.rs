use clap::Args;
use serde::Serialize;

use crate::output::print_json;

/// Version of the binary, embedded at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit and build date, set by the release build through the environment.
const COMMIT: Option<&str> = option_env!("CLAUDE_INIT_COMMIT");
const BUILD_DATE: Option<&str> = option_env!("CLAUDE_INIT_BUILD_DATE");

#[derive(Args)]
pub struct VersionArgs {
    /// Print only the version number
    #[arg(long, short = 's')]
    short: bool,

    /// Output as JSON
    #[arg(long, short = 'j')]
    json: bool,
}

#[derive(Debug, Serialize, PartialEq)]
struct BuildInfo {
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    build_date: Option<&'static str>,
}

impl BuildInfo {
    fn new(short: bool) -> Self {
        let known = |v: Option<&'static str>| v.filter(|v| !short && !v.is_empty() && *v != "unknown");
        BuildInfo {
            version: VERSION,
            commit: known(COMMIT),
            build_date: known(BUILD_DATE),
        }
    }
}

pub fn run(args: VersionArgs) -> anyhow::Result<()> {
    let info = BuildInfo::new(args.short);
    if args.json {
        return print_json(&info);
    }
    if args.short {
        println!("{}", info.version);
        return Ok(());
    }
    println!("claude-init {}", info.version);
    if let Some(commit) = info.commit {
        println!("commit:   {commit}");
    }
    if let Some(date) = info.build_date {
        println!("built at: {date}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_info_is_version_only() {
        assert_eq!(
            BuildInfo::new(true),
            BuildInfo {
                version: VERSION,
                commit: None,
                build_date: None,
            }
        );
    }

    #[test]
    fn json_always_has_version() {
        let json = serde_json::to_value(BuildInfo::new(false)).unwrap();
        assert_eq!(json["version"], VERSION);
    }
}
