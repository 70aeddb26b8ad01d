use std::path::Path;

use claude_init_core::{PipelineReport, Recommendation};
use console::style;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// `path` relative to `base` when it lives under it.
pub fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn print_recommendation(rec: &Recommendation) {
    println!("\n{}", style("Recommended structure").bold());
    if !rec.description.is_empty() {
        println!("  {}", rec.description);
    }
    println!("  agents:   {}", rec.agents.join(", "));
    println!("  skills:   {}", rec.skills.join(", "));
    println!("  commands: {}", rec.commands.join(", "));
}

pub fn print_planned(files: &[std::path::PathBuf], root: &Path) {
    println!("\n{}", style("Dry run: these files would be written").bold());
    for file in files {
        println!("  would write: {}", display_path(file, root));
    }
    println!("\nNothing was written.");
}

pub fn print_report(report: &PipelineReport, root: &Path) {
    println!();
    if report.claude_md_preserved {
        println!("  kept:    CLAUDE.md");
    }
    for path in report.written() {
        println!("  created: {}", display_path(path, root));
    }
    if !report.warnings.is_empty() {
        println!("\n{}", style(format!("{} item(s) skipped:", report.warnings.len())).yellow());
        for w in &report.warnings {
            println!("  [{}] {}: {}", w.stage, w.name, w.message);
        }
    }
    println!(
        "\n{} {} agents, {} skills, {} commands.",
        style("Done.").green().bold(),
        report.plan.agents.len(),
        report.plan.skills.len(),
        report.plan.commands.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_strips_root() {
        let root = Path::new("/work/app");
        assert_eq!(display_path(Path::new("/work/app/.claude/agents/x.md"), root), ".claude/agents/x.md");
        assert_eq!(display_path(Path::new("/elsewhere/out.md"), root), "/elsewhere/out.md");
    }
}
