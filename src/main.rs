use clap::Parser;
use maybe::cli::{Cli, Commands};
use maybe::commands::{self, Settings};
use maybe::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let settings = Settings::resolve(&config, cli.data_dir, cli.max_entries, cli.verbose)?;

    match cli.command {
        Some(Commands::Add { path }) => {
            commands::add(&settings, &path)?;
            Ok(())
        }
        Some(Commands::Search { keywords }) => {
            let query = commands::query_from(&keywords.keywords);
            match commands::search(&settings, &query)? {
                Some(path) => {
                    println!("{path}");
                    Ok(())
                }
                // no match is not an error, but the shell must not cd anywhere
                None => std::process::exit(1),
            }
        }
        Some(Commands::List {
            keywords,
            limit,
            full,
        }) => {
            let query = commands::query_from(&keywords.keywords);
            let results = commands::list(&settings, &query, limit, full)?;
            print!("{}", commands::format_list(&results, settings.verbose));
            Ok(())
        }
        Some(Commands::Remove { path }) => {
            if commands::remove(&settings, &path)? {
                println!("Removed: {path}");
            } else {
                println!("Not in index: {path}");
            }
            Ok(())
        }
        Some(Commands::Stats) => {
            let stats = commands::stats(&settings)?;
            println!(
                "maybe {}   entries: {} / {}",
                env!("CARGO_PKG_VERSION"),
                stats.entries,
                stats.max_entries
            );
            if settings.verbose {
                println!("\nData file: {}", stats.data_file.display());
            }
            Ok(())
        }
        None => {
            Cli::parse_from(["maybe", "--help"]);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "maybe=debug" } else { "maybe=warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
