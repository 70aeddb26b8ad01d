//! Line-oriented interactive prompts.
//!
//! Questions go to stderr so `--json` output on stdout stays clean. Answers
//! are read one line at a time; end of input aborts the survey.

use std::io::{BufRead, Write};

use anyhow::Context;
use claude_init_core::profile::{ProjectOrigin, ProjectProfile, MIN_BUSINESS_CONTEXT_CHARS};
use console::{style, Term};

pub struct Prompter<R, W> {
    input: R,
    output: W,
    /// Hide secret input. Only possible when attached to a terminal.
    secure: bool,
}

impl Prompter<std::io::StdinLock<'static>, Term> {
    pub fn stdio() -> Self {
        let term = Term::stderr();
        let secure = term.is_term() && Term::stdout().is_term();
        Self {
            input: std::io::stdin().lock(),
            output: term,
            secure,
        }
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            secure: false,
        }
    }

    pub fn say(&mut self, line: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn read_line(&mut self) -> anyhow::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context("failed to read answer")?;
        if n == 0 {
            anyhow::bail!("input ended before the survey was complete");
        }
        Ok(line.trim().to_string())
    }

    /// Ask one question. Empty input takes `default`; a required question
    /// without a default is asked again.
    pub fn ask(&mut self, question: &str, default: &str, required: bool) -> anyhow::Result<String> {
        loop {
            if default.is_empty() {
                write!(self.output, "{} {question} ", style("?").cyan().bold())?;
            } else {
                write!(
                    self.output,
                    "{} {question} {} ",
                    style("?").cyan().bold(),
                    style(format!("[{default}]")).dim()
                )?;
            }
            let answer = self.read_line()?;
            let answer = if answer.is_empty() { default.trim().to_string() } else { answer };
            if answer.is_empty() && required {
                writeln!(self.output, "  {}", style("an answer is required").red())?;
                continue;
            }
            return Ok(answer);
        }
    }

    /// Numbered choice. Accepts the number or the option text.
    pub fn choose(&mut self, question: &str, options: &[String], default: usize) -> anyhow::Result<usize> {
        writeln!(self.output, "{} {question}", style("?").cyan().bold())?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", i + 1)?;
        }
        let default_label = (default + 1).to_string();
        loop {
            let answer = self.ask("Choice:", &default_label, true)?;
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=options.len()).contains(&n) {
                    return Ok(n - 1);
                }
            }
            if let Some(i) = options.iter().position(|o| {
                o.eq_ignore_ascii_case(&answer)
                    || o.split_whitespace().next().is_some_and(|w| w.eq_ignore_ascii_case(&answer))
            }) {
                return Ok(i);
            }
            writeln!(self.output, "  {}", style(format!("pick 1-{}", options.len())).red())?;
        }
    }

    /// Read a secret. Echo is disabled when attached to a terminal.
    pub fn secret(&mut self, question: &str) -> anyhow::Result<String> {
        if !self.secure {
            return self.ask(question, "", true);
        }
        let term = Term::stderr();
        loop {
            term.write_str(&format!("{} {question} ", style("?").cyan().bold()))?;
            let answer = term.read_secure_line().context("failed to read secret")?;
            let answer = answer.trim().to_string();
            if !answer.is_empty() {
                return Ok(answer);
            }
            term.write_line(&format!("  {}", style("an answer is required").red()))?;
        }
    }

    pub fn origin(&mut self) -> anyhow::Result<ProjectOrigin> {
        let options = [
            "new (start from scratch)".to_string(),
            "existing (analyze the current code)".to_string(),
        ];
        Ok(match self.choose("Is this a new or an existing project?", &options, 0)? {
            0 => ProjectOrigin::New,
            _ => ProjectOrigin::Existing,
        })
    }

    /// Fill in every profile field, showing `draft` values as defaults.
    pub fn profile(&mut self, draft: ProjectProfile) -> anyhow::Result<ProjectProfile> {
        let mut p = draft;
        self.say(&format!("\n{}", style("Project survey").bold()))?;
        p.name = self.ask("Project name:", &p.name, true)?;
        p.description = self.ask("Short description:", &p.description, true)?;
        p.language = self.ask("Main language:", &p.language, true)?;
        p.framework = self.ask("Framework (optional, Enter to skip):", &p.framework, false)?;
        p.architecture = self.ask("Architecture:", &p.architecture, true)?;
        p.database = self.ask("Database (optional, Enter to skip):", &p.database, false)?;
        p.category = self.ask(
            "Project category (e.g. API REST, Web App, CLI, Library):",
            &p.category,
            true,
        )?;
        loop {
            p.business_context = self.ask(
                "Business context (goals, users, requirements):",
                &p.business_context,
                true,
            )?;
            if p.business_context.chars().count() >= MIN_BUSINESS_CONTEXT_CHARS {
                break;
            }
            writeln!(
                self.output,
                "  {}",
                style(format!("at least {MIN_BUSINESS_CONTEXT_CHARS} characters please")).red()
            )?;
            p.business_context.clear();
        }
        Ok(p.trimmed())
    }

    /// Extra documentation directories, comma separated.
    pub fn documentation_dirs(&mut self, detected: &[String]) -> anyhow::Result<Vec<String>> {
        if !detected.is_empty() {
            self.say(&format!("  documentation found: {}", detected.join(", ")))?;
        }
        let answer = self.ask(
            "Other documentation directories (comma separated, Enter to skip):",
            "",
            false,
        )?;
        Ok(answer
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_provider::ProviderId;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn required_question_is_asked_again() {
        let mut p = prompter("\n\nsvc\n");
        assert_eq!(p.ask("Name:", "", true).unwrap(), "svc");
        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown.matches("an answer is required").count(), 2);
    }

    #[test]
    fn enter_takes_the_default() {
        let mut p = prompter("\n");
        assert_eq!(p.ask("Language:", "Go", true).unwrap(), "Go");
    }

    #[test]
    fn end_of_input_aborts() {
        let mut p = prompter("");
        let err = p.ask("Name:", "", true).unwrap_err();
        assert!(err.to_string().contains("input ended"));
    }

    #[test]
    fn choice_by_number_or_word() {
        let options = vec!["new (start)".to_string(), "existing (scan)".to_string()];
        assert_eq!(prompter("2\n").choose("?", &options, 0).unwrap(), 1);
        assert_eq!(prompter("existing\n").choose("?", &options, 0).unwrap(), 1);
        assert_eq!(prompter("\n").choose("?", &options, 0).unwrap(), 0);
        assert_eq!(prompter("9\n1\n").choose("?", &options, 1).unwrap(), 0);
    }

    #[test]
    fn full_profile_with_prefilled_defaults() {
        let draft = ProjectProfile {
            language: "Go".into(),
            ..ProjectProfile::draft(ProjectOrigin::Existing, ProviderId::Cli)
        };
        let mut p = prompter("svc\nOrders\n\n\nClean\n\nAPI REST\ntoo short\nProcesses orders for the shop\n");
        let profile = p.profile(draft).unwrap();
        assert_eq!(profile.name, "svc");
        assert_eq!(profile.language, "Go");
        assert_eq!(profile.framework, "");
        assert_eq!(profile.database, "");
        assert_eq!(profile.business_context, "Processes orders for the shop");
        assert_eq!(profile.origin, ProjectOrigin::Existing);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn documentation_dirs_are_split() {
        let mut p = prompter(" notes , adr,\n");
        assert_eq!(p.documentation_dirs(&[]).unwrap(), vec!["notes", "adr"]);
    }
}
