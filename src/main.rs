use clap::Parser;
use miette::Result;
use tcg_layers::cli::{Cli, Commands};
use tcg_layers::output::Printer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "tcg_layers=warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .init();

    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Back(args) => tcg_layers::cli::back::run(args, &cli.global, &printer)?,
        Commands::Front(args) => tcg_layers::cli::front::run(args, &cli.global, &printer)?,
        Commands::Detect(args) => tcg_layers::cli::detect::run(args, &cli.global, &printer)?,
        Commands::Themes(args) => tcg_layers::cli::themes::run(args, &cli.global)?,
        Commands::Init(args) => tcg_layers::cli::init::run(args, &printer)?,
        Commands::Completions(args) => tcg_layers::cli::completions::run(args)?,
    }

    Ok(())
}
