use clap::Parser;
use notesmith::cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summarize { input } => notesmith::cli::summarize::run(input.as_deref()),
        Commands::Sync { input } => notesmith::cli::sync::run(input.as_deref()),
        Commands::Schema { name } => notesmith::cli::schema::run(&name),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
