mod cmd;
mod output;
mod root;
mod survey;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use cmd::{config::ConfigArgs, generate::GenerateArgs, init::InitArgs, version::VersionArgs};

#[derive(Parser)]
#[command(
    name = "claude-init",
    about = "Generate a tailored .claude/ configuration (agents, skills, commands) for a project",
    version,
    propagate_version = true
)]
struct Cli {
    /// Show debug logs
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the project survey and generate the .claude/ directory
    Init(InitArgs),

    /// Regenerate artifacts from an existing .claude/project.yaml
    Generate(GenerateArgs),

    /// Configure AI providers and API keys
    Config(ConfigArgs),

    /// Print a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the version and build information
    Version(VersionArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Init(args) => cmd::init::run(args),
        Commands::Generate(args) => cmd::generate::run(args),
        Commands::Config(args) => cmd::config::run(args),
        Commands::Completion { shell } => cmd::completion::run(shell, &mut Cli::command()),
        Commands::Version(args) => cmd::version::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
