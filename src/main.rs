use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use listing_search::config::{find_config_file, get_config, load_config, Config};
use listing_search::models::{Listing, SearchRequest, SortBy, SortOrder};
use listing_search::query::{get_query, normalize_query};
use listing_search::utils::{single_line, truncate_with_ellipsis};
use listing_search::ListingSearch;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Listing Search - keyword search over classified listings
#[derive(Parser, Debug)]
#[command(name = "listing-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keyword search over classified listings", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// Sort field for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortField {
    /// Sort by publication date
    Date,
    /// Sort by price
    Price,
    /// Sort by title
    Title,
}

/// Sort order
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Order {
    /// Ascending order
    Asc,
    /// Descending order
    Desc,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show how a query string is split into search terms
    #[command(alias = "t")]
    Terms {
        /// Search query string
        query: String,
    },

    /// Show the search predicate built from a query string
    #[command(alias = "p")]
    Predicate {
        /// Search query string
        query: String,

        /// Field to search (repeatable; default: configured fields)
        #[arg(long = "field", short = 'f')]
        fields: Vec<String>,

        /// Print a parameterised SQL fragment instead
        #[arg(long)]
        sql: bool,
    },

    /// Search listings from a JSON file
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// JSON file with an array of listings ("-" for stdin)
        #[arg(long, short)]
        data: PathBuf,

        /// Field to search (repeatable; default: configured fields)
        #[arg(long = "field", short = 'f')]
        fields: Vec<String>,

        /// Maximum number of results
        #[arg(long, short)]
        max_results: Option<usize>,

        /// Sort by field
        #[arg(long, value_enum)]
        sort_by: Option<SortField>,

        /// Sort order
        #[arg(long, value_enum)]
        order: Option<Order>,
    },

    /// List published listings, oldest first
    #[command(alias = "b")]
    Browse {
        /// JSON file with an array of listings ("-" for stdin)
        #[arg(long, short)]
        data: PathBuf,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write (default: ./listing-search.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    ShowConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config().context("Failed to read configuration from environment")?,
    };

    init_tracing(&cli, &config);
    log_loaded_config(config_path.as_deref(), &config);

    let format = resolve_format(cli.output);

    match cli.command {
        Some(Commands::Terms { query }) => {
            let terms = normalize_query(&query);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&terms)?),
                _ => {
                    for term in &terms {
                        println!("{}", term);
                    }
                }
            }
        }

        Some(Commands::Predicate { query, fields, sql }) => {
            let fields = if fields.is_empty() {
                config.search.fields.clone()
            } else {
                fields
            };

            let Some(predicate) = get_query(&query, &fields)? else {
                if !cli.quiet {
                    eprintln!("No search terms in query; nothing would be filtered.");
                }
                if format == OutputFormat::Json {
                    println!("null");
                }
                return Ok(());
            };

            match (sql, format) {
                (true, OutputFormat::Json) => {
                    println!("{}", serde_json::to_string_pretty(&predicate.to_sql()?)?)
                }
                (true, _) => {
                    let fragment = predicate.to_sql()?;
                    println!("{}", fragment.sql);
                    for (i, param) in fragment.params.iter().enumerate() {
                        println!("  ?{} = {:?}", i + 1, param);
                    }
                }
                (false, OutputFormat::Json) => {
                    println!("{}", serde_json::to_string_pretty(&predicate)?)
                }
                (false, _) => println!("{}", predicate),
            }
        }

        Some(Commands::Search {
            query,
            data,
            fields,
            max_results,
            sort_by,
            order,
        }) => {
            let listings = load_listings(&data)?;

            let mut request = SearchRequest::new(&query);
            request.fields = fields;
            request.max_results = max_results;
            request.sort_by = sort_by.map(|s| match s {
                SortField::Date => SortBy::Date,
                SortField::Price => SortBy::Price,
                SortField::Title => SortBy::Title,
            });
            request.sort_order = order.map(|o| match o {
                Order::Asc => SortOrder::Ascending,
                Order::Desc => SortOrder::Descending,
            });

            let search = ListingSearch::new(config.search.clone());
            let response = search.execute(&request, &listings)?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                match &response.found_entries {
                    None => {
                        if !cli.quiet {
                            eprintln!("No search terms in query.");
                        }
                    }
                    Some(found) => {
                        if !cli.quiet {
                            eprintln!(
                                "{} listing(s) matching {:?}",
                                found.len(),
                                response.query_string
                            );
                        }
                        output_listings(found, format)?;
                    }
                }
            }
        }

        Some(Commands::Browse { data }) => {
            let listings = load_listings(&data)?;
            let search = ListingSearch::new(config.search.clone());
            let published = search.browse(&listings, Utc::now());
            output_listings(&published, format)?;
        }

        Some(Commands::InitConfig { path, force }) => {
            let path = path.unwrap_or_else(|| PathBuf::from(listing_search::config::CONFIG_FILE_NAME));
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save(&path)?;
            if !cli.quiet {
                eprintln!("Wrote default configuration to {}", path.display());
            }
        }

        Some(Commands::ShowConfig) => match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
            _ => print!("{}", toml::to_string_pretty(&config)?),
        },

        None => {
            eprintln!("No command specified. Use --help for usage information.");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Install the tracing subscriber; logs go to stderr so stdout stays parseable.
fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("listing_search={}", level)),
    );

    let (plain, json) = if config.logging.json {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain)
        .with(json)
        .init();
}

/// Report the effective configuration. Runs after the subscriber is installed.
fn log_loaded_config(path: Option<&Path>, config: &Config) {
    match path {
        Some(path) => {
            tracing::info!("Using config file: {}", path.display());
            tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        }
        None => tracing::debug!(?config, "loaded configuration from environment"),
    }
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

fn load_listings(path: &Path) -> Result<Vec<Listing>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read listings from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read listings file {}", path.display()))?
    };

    let listings: Vec<Listing> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid listings JSON in {}", path.display()))?;
    tracing::debug!(count = listings.len(), "loaded listings");
    Ok(listings)
}

fn output_listings(listings: &[Listing], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(listings)?);
        }
        OutputFormat::Plain => {
            for listing in listings {
                println!("{} - {} ({:.2})", listing.id, listing.title, listing.price);
                println!("  by {}", listing.author);
                if !listing.text.is_empty() {
                    println!("  {}", single_line(&listing.text));
                }
                println!();
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["ID", "Title", "Price", "Author", "Published", "Text"]);

            for listing in listings {
                let published = listing
                    .published_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "draft".to_string());

                table.add_row(vec![
                    Cell::new(listing.id),
                    Cell::new(truncate_with_ellipsis(&listing.title, 40)).add_attribute(Attribute::Bold),
                    Cell::new(format!("{:.2}", listing.price)),
                    Cell::new(truncate_with_ellipsis(&listing.author, 20)),
                    Cell::new(published),
                    Cell::new(truncate_with_ellipsis(&single_line(&listing.text), 50)),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}
