use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hattika", version, about = "Hattika landing page CLI")]
struct Cli {
    /// Keep the launch date in memory instead of the on-disk store
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch countdown
    Countdown {
        #[command(subcommand)]
        action: commands::countdown::CountdownAction,
    },
    /// Launch date management
    Launch {
        #[command(subcommand)]
        action: commands::launch::LaunchAction,
    },
    /// Submit an email to the "notify me" form
    Notify(commands::notify::NotifyArgs),
    /// Inspect the rendered page
    Page {
        #[command(subcommand)]
        action: commands::page::PageAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ephemeral = cli.ephemeral;
    let result = match cli.command {
        Commands::Countdown { action } => commands::countdown::run(action, ephemeral),
        Commands::Launch { action } => commands::launch::run(action, ephemeral),
        Commands::Notify(args) => commands::notify::run(args, ephemeral),
        Commands::Page { action } => commands::page::run(action, ephemeral),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "hattika", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
