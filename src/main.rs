use std::{
    io::{self, IsTerminal},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use library_catalog::{
    Config, DueDateReminder, LibraryCatalog, LoanLogger, LogFormat, LoggingConfig, Menu, Role,
    config::CONFIG_ENV_VAR,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for the library catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with loan policy and logging settings
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Enable debug logging of every catalog operation
    #[arg(short, long)]
    verbose: bool,

    /// Start with a few demo users and books
    #[arg(long)]
    seed: bool,

    /// Disable colored menu output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::resolve(args.config.as_deref())
        .context("failed to load library catalog configuration")?;
    init_logging(&config.logging, args.verbose)?;

    tracing::debug!(policy = ?config.policy, "catalog starting");

    let mut catalog = LibraryCatalog::with_config(config.policy);
    catalog.register_observer(Box::new(LoanLogger));
    catalog.register_observer(Box::new(DueDateReminder));

    if args.seed {
        seed_demo(&mut catalog);
        println!("{}", "Loaded demo users and books.".yellow());
    }

    let color = !args.no_color && io::stdout().is_terminal();
    let mut menu = Menu::new(catalog, io::stdin().lock(), io::stdout().lock()).with_color(color);
    menu.run().context("menu loop failed")?;

    let (catalog, _) = menu.into_inner();
    tracing::debug!(
        users = catalog.user_count(),
        books = catalog.book_count(),
        loans = catalog.loan_history().len(),
        "catalog session finished"
    );
    Ok(())
}

/// Initializes the logging system.
///
/// Logs go to stderr so they never interleave with menu output. `RUST_LOG`
/// takes precedence over the configured level; `--verbose` forces debug.
fn init_logging(config: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(io::stderr))
            .try_init(),
    }
    .context("failed to install tracing subscriber")
}

/// Preload a small catalog for trying out the menu
fn seed_demo(catalog: &mut LibraryCatalog) {
    catalog.add_user("Alice", "alice@example.com", Role::Member);
    catalog.add_user("Bob", "bob@example.com", Role::Admin);
    catalog.add_book("Dune", "Frank Herbert", "978-0441013593", "Science Fiction");
    catalog.add_book("Emma", "Jane Austen", "978-0141439587", "Classic");
    catalog.add_book(
        "The Left Hand of Darkness",
        "Ursula K. Le Guin",
        "978-0441478125",
        "Science Fiction",
    );
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_config_path_falls_back_to_env_var() {
        let command = Args::command();
        let config = command.get_arguments().find(|arg| arg.get_id() == "config");
        assert_eq!(config.and_then(|arg| arg.get_env()), Some(OsStr::new(CONFIG_ENV_VAR)));
    }

    #[test]
    fn test_flags_parse() -> Result<(), clap::Error> {
        let args = Args::try_parse_from(["library-catalog", "--config", "policy.json", "--seed"])?;
        assert_eq!(args.config, Some(PathBuf::from("policy.json")));
        assert!(args.seed);
        assert!(!args.verbose);
        Ok(())
    }
}
