use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cyclewake", version, about = "Plan a night around prayer and work wake-ups")]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cycle layout and wake windows for a bedtime
    Cycles(commands::cycles::CyclesArgs),
    /// Find the sleep stage a wall-clock time falls into
    Locate(commands::locate::LocateArgs),
    /// Plan the night around prayer, work and wake-by times
    Plan(commands::plan::PlanArgs),
    /// Predict how going back to sleep until a fixed time ends
    Interrupt(commands::interrupt::InterruptArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Cycles(args) => commands::cycles::run(args),
        Commands::Locate(args) => commands::locate::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Interrupt(args) => commands::interrupt::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
