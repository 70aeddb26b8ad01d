use clap_complete::Shell;

/// `claude-init completion <shell>`: write the script to stdout.
pub fn run(shell: Shell, cmd: &mut clap::Command) -> anyhow::Result<()> {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut std::io::stdout());
    Ok(())
}
