use super::{capitalize, language_skill};
use crate::profile::ProjectProfile;

/// Commands every generation carries.
pub const BASE_COMMANDS: [&str; 3] = ["plan-manage", "orchestrator", "pre-flight"];

const KNOWN: &[&str] = &[
    "test",
    "lint",
    "build",
    "new-feature",
    "refactor",
    "bug-fix",
    "plan-manage",
    "orchestrator",
    "pre-flight",
];

pub(crate) fn description(name: &str, profile: &ProjectProfile) -> String {
    let p = &profile.name;
    match name {
        "test" => format!("Run the {p} test suite and report results"),
        "lint" => format!("Run linters to check code quality in {p}"),
        "build" => format!("Build {p} and produce deployable artifacts"),
        "new-feature" => format!("Plan and implement a new feature in {p}"),
        "refactor" => format!("Refactor code in {p} to improve its structure"),
        "bug-fix" => format!("Investigate and fix bugs in {p}"),
        "plan-manage" => format!("Create, review and update the work plan for {p}"),
        "orchestrator" => format!("Coordinate several agents through a multi-phase task in {p}"),
        "pre-flight" => format!("Check that {p} is ready to ship before merging or releasing"),
        _ => format!("Command for {name} in {p}"),
    }
}

pub(crate) fn usage(name: &str) -> String {
    let usage = match name {
        "test" => "test [test-name]",
        "lint" => "lint [file-or-directory]",
        "build" => "build [environment]",
        "new-feature" => "new-feature [feature-name] [description]",
        "refactor" => "refactor [file-or-component]",
        "bug-fix" => "bug-fix [error-description]",
        "plan-manage" => "plan-manage [create|review|update] [plan-name]",
        "orchestrator" => "orchestrator [task-description]",
        "pre-flight" => "pre-flight [branch-or-release]",
        _ => name,
    };
    usage.to_string()
}

pub(crate) fn flow(name: &str, profile: &ProjectProfile) -> String {
    let lang = language_skill(&profile.language);
    match name {
        "test" => format!(
            "### 1. Run Tests
- **Agent**: tester
- **Skills**: {lang}, qa-engineer
- Run the full suite or the requested subset

### 2. Analyze Results
- Review failing tests
- Look for patterns across failures
- Propose fixes

### 3. Report
- Produce a coverage report
- List failing tests with their errors
- Suggest improvements"
        ),
        "lint" => format!(
            "### 1. Run Linters
- **Agent**: reviewer
- **Skills**: code-reviewer, {lang}
- Run the project's linters

### 2. Analyze Problems
- Review warnings and errors
- Classify by severity
- Prioritize fixes

### 3. Automatic Fixes
- Apply auto-fix where possible
- Report remaining issues with suggestions"
        ),
        "build" => "### 1. Preparation
- **Agent**: developer
- Check dependencies
- Clean previous artifacts

### 2. Compilation
- Build for the target environment
- Make sure there are no compilation errors
- Produce artifacts

### 3. Validation
- Run smoke tests
- Check artifact sizes
- Produce a build report"
            .to_string(),
        "new-feature" => format!(
            "### 1. Planning
- **Agent**: planning-agent
- **Skills**: system-architect, {lang}
- Analyze requirements
- Create an implementation plan

### 2. Development (TDD)
- **Agent**: developer
- **Skills**: {lang}, usecase-developer
- Write the tests first
- Implement the minimum to pass them

### 3. Integration
- **Agent**: tester, reviewer
- **Skills**: qa-engineer, code-reviewer
- Integration tests
- Code review

### 4. Documentation
- **Agent**: writer
- **Skills**: technical-writer
- Update documentation
- Record the changes"
        ),
        "refactor" => format!(
            "### 1. Analysis
- **Agent**: reviewer
- **Skills**: code-reviewer, {lang}
- Identify code smells
- Propose structural improvements

### 2. Refactoring
- **Agent**: developer
- **Skills**: {lang}
- Apply refactorings step by step
- Keep tests green

### 3. Validation
- **Agent**: tester
- Run the full test suite
- Confirm there are no regressions"
        ),
        "bug-fix" => format!(
            "### 1. Investigation
- **Agent**: debugger
- **Skills**: debug-master, {lang}
- Reproduce the error
- Analyze stack traces and logs

### 2. Diagnosis
- Identify the root cause
- Form hypotheses
- Validate them with tests

### 3. Solution
- **Agent**: developer
- Implement the fix
- Make sure tests pass
- Add a regression test"
        ),
        "plan-manage" => "### 1. Gather Context
- **Agent**: planning-agent
- **Skills**: system-architect
- Read the request and the current plan, if any

### 2. Create or Update the Plan
- **Agent**: planning-agent
- **Skills**: technical-writer
- Break work into milestones and tasks
- Record dependencies and owners

### 3. Review
- **Agent**: architect
- **Skills**: code-reviewer
- Check the plan against the architecture
- Flag risks and missing steps"
            .to_string(),
        "orchestrator" => format!(
            "### 1. Triage
- **Agent**: orchestrator-agent
- Split the task into phases
- Pick the lead agent for each phase

### 2. Design
- **Agent**: architect
- **Skills**: system-architect
- Agree on the approach and interfaces

### 3. Implementation
- **Agent**: developer
- **Skills**: {lang}
- Implement the agreed design

### 4. Verification
- **Agent**: tester, reviewer
- **Skills**: qa-engineer, code-reviewer
- Tests and review before hand-off

### 5. Wrap-up
- **Agent**: writer
- **Skills**: technical-writer
- Document what changed and why"
        ),
        "pre-flight" => format!(
            "### 1. Static Checks
- **Agent**: reviewer
- **Skills**: code-reviewer, {lang}
- Run formatters and linters

### 2. Test Suite
- **Agent**: tester
- **Skills**: qa-engineer
- Run all tests and check coverage

### 3. Release Readiness
- **Agent**: debugger
- **Skills**: debug-master
- Review recent errors and open issues
- Confirm nothing blocks the release"
        ),
        _ => format!(
            "### 1. Execution
- **Agent**: developer
- **Skills**: {lang}
- Run the {name} command

### 2. Validation
- Check the results
- Report status"
        ),
    }
}

/// Built-in command file for `name`, if the bank knows it.
pub fn command_template(name: &str, profile: &ProjectProfile) -> Option<String> {
    if !KNOWN.contains(&name) {
        return None;
    }
    let desc = description(name, profile);
    Some(format!(
        "---
name: {name}
description: {desc}
usage: {usage}
---

# Command: {title}

{desc}

## Orchestrated Implementation Flow

{flow}

## Critical Rules
- **Quality**: keep code quality high.
- **Testing**: keep test coverage adequate.
- **Documentation**: document changes and decisions.
- **Collaboration**: coordinate with other agents when needed.

---

What {name} do you want to run in {project}?
",
        usage = usage(name),
        title = capitalize(name),
        flow = flow(name, profile),
        project = profile.name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProjectOrigin;
    use ai_provider::ProviderId;

    fn profile() -> ProjectProfile {
        ProjectProfile {
            name: "svc".into(),
            language: "Go".into(),
            ..ProjectProfile::draft(ProjectOrigin::New, ProviderId::Cli)
        }
    }

    #[test]
    fn base_commands_are_in_the_bank() {
        for name in BASE_COMMANDS {
            assert!(command_template(name, &profile()).is_some(), "{name}");
        }
        assert!(command_template("deploy-canary", &profile()).is_none());
    }

    #[test]
    fn template_has_usage_and_flow() {
        let t = command_template("bug-fix", &profile()).unwrap();
        assert!(t.starts_with("---\nname: bug-fix\ndescription: Investigate and fix bugs in svc\nusage: bug-fix [error-description]\n---\n"));
        assert!(t.contains("# Command: Bug-fix"));
        assert!(t.contains("- **Skills**: debug-master, go-expert"));
    }

    #[test]
    fn unknown_command_defaults() {
        assert_eq!(usage("deploy"), "deploy");
        assert_eq!(description("deploy", &profile()), "Command for deploy in svc");
        assert!(flow("deploy", &profile()).contains("Run the deploy command"));
    }
}
