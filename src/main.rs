use clap::{Parser, Subcommand};
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;

use bteb_results::booklist::{load_catalog, Category};
use bteb_results::commands::{self, AutofillCommand, BooklistCommand, CgpaCommand, ResultCommand};
use bteb_results::config::{AppConfig, ConfigManager};
use bteb_results::error::Result;
use bteb_results::logging;
use bteb_results::regulation::Regulation;
use bteb_results::result::ResultQuery;

#[derive(Parser)]
#[command(name = "bteb")]
#[command(version)]
#[command(about = "BTEB diploma results, CGPA calculator and booklists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, help = "Enable verbose output", global = true)]
    verbose: bool,

    #[arg(long, value_name = "PATH", help = "Use this config file", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Compute a CGPA from semester GPAs")]
    Cgpa {
        #[arg(short, long, help = "Regulation (2010, 2016 or 2022)")]
        regulation: Option<String>,

        #[arg(
            allow_negative_numbers = true,
            help = "GPA per semester, in order; use - for a semester without a GPA"
        )]
        gpas: Vec<String>,

        #[arg(long, help = "Print JSON")]
        json: bool,
    },

    #[command(about = "Fetch a student's result and compute the CGPA from it")]
    Autofill {
        #[command(flatten)]
        lookup: LookupArgs,

        #[arg(long, help = "Print JSON")]
        json: bool,
    },

    #[command(about = "Look up a student's result by roll number")]
    Result {
        #[command(flatten)]
        lookup: LookupArgs,

        #[arg(long, help = "Print JSON")]
        json: bool,
    },

    #[command(about = "Show semester weights per regulation")]
    Weights {
        #[arg(help = "Only this regulation")]
        regulation: Option<String>,

        #[arg(long, help = "Print JSON")]
        json: bool,
    },

    #[command(about = "Browse semester-wise subject lists")]
    Booklist {
        #[command(subcommand)]
        action: BooklistAction,

        #[arg(long, help = "Print JSON", global = true)]
        json: bool,
    },

    #[command(about = "Manage the configuration file")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    #[command(about = "Manage cached results")]
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(clap::Args)]
struct LookupArgs {
    #[arg(help = "Roll number")]
    roll: String,

    #[arg(short, long, help = "Regulation (2010, 2016 or 2022)")]
    regulation: Option<String>,

    #[arg(short, long, help = "Program name")]
    program: Option<String>,

    #[arg(long, help = "Skip the result cache")]
    no_cache: bool,
}

#[derive(Subcommand)]
enum BooklistAction {
    #[command(about = "List technologies")]
    List {
        #[arg(short, long, help = "engineering, textile, agriculture or specialized")]
        category: Option<Category>,
    },
    #[command(about = "Search technologies by name or code")]
    Search {
        #[arg(help = "Search term")]
        term: String,
    },
    #[command(about = "Show the subjects of a technology")]
    Show {
        #[arg(help = "Technology slug, e.g. computer-science-technology")]
        slug: String,

        #[arg(short, long, help = "Only this semester")]
        semester: Option<u32>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Show the effective configuration")]
    Show,
    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
    #[command(about = "Print the configuration file path")]
    Path,
}

#[derive(Subcommand)]
enum CacheAction {
    #[command(about = "Remove all cached results")]
    Clear,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("{} {}", "⚠".yellow(), e);
    }

    if let Err(e) = run(cli) {
        eprint!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let load_config = || manager.load().map(|(config, _)| config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Cgpa {
            regulation,
            gpas,
            json,
        } => {
            let regulation = match regulation {
                Some(r) => r,
                None => load_config()?.default_regulation.id().to_string(),
            };
            CgpaCommand::new(regulation, gpas)
                .with_json(json)
                .execute(&mut out)?;
        }
        Commands::Autofill { lookup, json } => {
            let (query, config) = lookup_query(&lookup, load_config()?)?;
            AutofillCommand::new(commands::build_provider(&config)?)
                .with_json(json)
                .with_spinner(true)
                .execute(&mut out, &query)?;
        }
        Commands::Result { lookup, json } => {
            let (query, config) = lookup_query(&lookup, load_config()?)?;
            ResultCommand::new(commands::build_provider(&config)?)
                .with_json(json)
                .with_spinner(true)
                .execute(&mut out, &query)?;
        }
        Commands::Weights { regulation, json } => {
            let regulation = regulation
                .map(|r| r.parse::<Regulation>())
                .transpose()?;
            commands::weights(&mut out, regulation, json)?;
        }
        Commands::Booklist { action, json } => {
            let config = load_config()?;
            let catalog = load_catalog(config.booklist_path.as_deref())?;
            let command = BooklistCommand::new(&catalog).with_json(json);
            match action {
                BooklistAction::List { category } => {
                    command.list(&mut out, category)?;
                }
                BooklistAction::Search { term } => {
                    command.search(&mut out, &term)?;
                }
                BooklistAction::Show { slug, semester } => {
                    command.show(&mut out, &slug, semester)?;
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config_show(&mut out, &manager)?;
            }
            ConfigAction::Init { force } => {
                commands::config_init(&mut out, &manager, force)?;
            }
            ConfigAction::Path => commands::config_path(&mut out, &manager)?,
        },
        Commands::Cache { action } => match action {
            CacheAction::Clear => {
                commands::cache_clear(&mut out, &load_config()?)?;
            }
        },
    }

    out.flush()?;
    Ok(())
}

/// Build the query from arguments and config defaults. `--no-cache`
/// switches the cache off for this lookup only.
fn lookup_query(lookup: &LookupArgs, mut config: AppConfig) -> Result<(ResultQuery, AppConfig)> {
    let regulation = match &lookup.regulation {
        Some(r) => r.parse()?,
        None => config.default_regulation,
    };
    let program = lookup
        .program
        .as_deref()
        .unwrap_or(&config.default_program);
    let query = ResultQuery::new(&lookup.roll, regulation, program)?;

    if lookup.no_cache {
        config.cache_enabled = false;
    }
    Ok((query, config))
}
