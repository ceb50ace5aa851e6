mod articles_cmd;
mod cli;
mod info_cmd;
mod search_cmd;

use clap::Parser;
use cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Info {
            ref archive,
            ref family,
        } => info_cmd::run(archive, family.as_deref()),
        cli::Commands::Articles {
            ref archive,
            ref document,
        } => articles_cmd::run(archive, document.as_deref()),
        cli::Commands::Search {
            ref archive,
            ref queries,
            ref method,
            min_ratio,
            regex,
            all_results,
        } => search_cmd::run(archive, queries, method, min_ratio, regex, all_results),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
