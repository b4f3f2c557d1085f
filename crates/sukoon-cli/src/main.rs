use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "sukoon", version, about = "Sukoon wellness companion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guided breathing exercises
    Breathe {
        #[command(subcommand)]
        action: commands::breathe::BreatheAction,
    },
    /// Daily mood tracking
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Daily journal
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Today's affirmation
    Affirmation(commands::affirmation::AffirmationArgs),
    /// Talk to the support assistant
    Chat(commands::chat::ChatArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SUKOON_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Breathe { action } => commands::breathe::run(action).await,
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Journal { action } => commands::journal::run(action),
        Commands::Affirmation(args) => commands::affirmation::run(args),
        Commands::Chat(args) => commands::chat::run(args).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sukoon", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
