//! Stockroom - command line entry point.
//!
//! Loads configuration, initializes logging and runs one inventory command
//! against the configured stock file. Command output goes to stdout, logs to
//! stderr.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockroom_lib::catalog::{Catalog, Product, SortKey};
use stockroom_lib::config::{
    load_default_config, ConfigLoader, LogConfig, StockroomConfig, ENV_PREFIX,
};
use stockroom_lib::error::{report_error, ErrorContext, StockroomError, StockroomResult};
use stockroom_lib::ledger::ProductUpdate;
use stockroom_lib::sale::{checkout, Cart};
use stockroom_lib::storage::JsonStockFile;

/// Command line arguments for Stockroom.
#[derive(Parser, Debug)]
#[clap(name = "stockroom", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List products whose name starts with a term
    Search {
        /// Name prefix, matched case-insensitively
        term: String,
    },

    /// Sell units of a product and save the stock file
    Sell {
        product_id: String,
        #[clap(allow_hyphen_values = true)]
        quantity: i64,

        /// Name of the buying customer
        #[clap(long)]
        customer: String,

        /// Name of the cashier ringing up the sale
        #[clap(long)]
        cashier: String,

        /// Print the sale record as JSON
        #[clap(long)]
        json: bool,
    },

    /// Receive units of a product
    Restock {
        product_id: String,
        #[clap(allow_hyphen_values = true)]
        quantity: i64,
    },

    /// Set the units on hand
    SetQuantity {
        product_id: String,
        #[clap(allow_hyphen_values = true)]
        quantity: i64,
    },

    /// Set the unit price in minor currency units
    SetPrice {
        product_id: String,
        #[clap(allow_hyphen_values = true)]
        price: i64,
    },

    /// Set the category, or clear it when omitted
    SetCategory {
        product_id: String,
        category: Option<String>,
    },

    /// Rename a product
    Rename { product_id: String, name: String },

    /// Show the inventory
    Inventory {
        /// Sort order
        #[clap(long, value_enum, default_value_t = SortKey::Expiry)]
        sort: SortKey,

        /// Only products below the low-stock threshold
        #[clap(long)]
        low_stock: bool,

        /// Only products with no units on hand
        #[clap(long, conflicts_with = "low_stock")]
        out_of_stock: bool,

        /// Only products whose name, category or id contains this text
        #[clap(long, conflicts_with_all = ["low_stock", "out_of_stock"])]
        filter: Option<String>,
    },

    /// Validate the configuration and the stock file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(log: &LogConfig) -> StockroomResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };

    result.map_err(|e| {
        StockroomError::Custom(format!("Failed to set global tracing subscriber: {e}"))
    })
}

/// Main entry point for the application.
fn main() {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => ConfigLoader::new(Some(path), ENV_PREFIX).load(),
        None => load_default_config(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            // Logging is not configured yet; fall back to defaults to report.
            if let Err(log_err) = init_logging(&LogConfig::default()) {
                eprintln!("{log_err}");
                eprintln!("Configuration error: {e}");
                process::exit(1);
            }
            report_error(ErrorContext::new(e, "config"));
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.log) {
        eprintln!("{e}");
        process::exit(1);
    }
    stockroom_lib::init();

    if let Err(e) = run(args.command, &config) {
        report_error(ErrorContext::new(e, "cli"));
        process::exit(1);
    }
}

fn run(command: Command, config: &StockroomConfig) -> StockroomResult<()> {
    match command {
        Command::Search { term } => {
            let (catalog, _) = stockroom_lib::open_catalog(config)?;
            let found = catalog.search(&term);
            if found.is_empty() {
                println!("No products match \"{term}\"");
            }
            print_products(&found);
            Ok(())
        }
        Command::Sell {
            product_id,
            quantity,
            customer,
            cashier,
            json,
        } => {
            let (mut catalog, store) = stockroom_lib::open_catalog(config)?;
            let mut cart = Cart::new();
            cart.add(&catalog, &product_id, quantity)?;

            let record = checkout(&mut catalog, &cart, &customer, &cashier, &store)?;
            if json {
                let rendered = serde_json::to_string_pretty(&record).map_err(|e| {
                    StockroomError::Custom(format!("Failed to serialize sale record: {e}"))
                })?;
                println!("{rendered}");
                return Ok(());
            }

            println!(
                "Sale to {} by {} at {}",
                record.customer,
                record.cashier,
                record.sold_at.format("%Y-%m-%d %H:%M:%S")
            );
            for line in &record.lines {
                println!(
                    "Sold {} x {} at {} = {}",
                    line.quantity,
                    line.name,
                    format_price(line.unit_price),
                    format_price(line.line_total)
                );
            }
            println!("Total {}", format_price(record.total));
            Ok(())
        }
        Command::Restock {
            product_id,
            quantity,
        } => {
            let (mut catalog, store) = stockroom_lib::open_catalog(config)?;
            let on_hand = catalog.restock(&product_id, quantity)?;
            save(&catalog, &store)?;
            println!("{product_id}: {on_hand} in stock");
            Ok(())
        }
        Command::SetQuantity {
            product_id,
            quantity,
        } => update(config, &product_id, ProductUpdate::SetQuantity(quantity)),
        Command::SetPrice { product_id, price } => {
            update(config, &product_id, ProductUpdate::SetPrice(price))
        }
        Command::SetCategory {
            product_id,
            category,
        } => update(config, &product_id, ProductUpdate::SetCategory(category)),
        Command::Rename { product_id, name } => {
            update(config, &product_id, ProductUpdate::SetName(name))
        }
        Command::Inventory {
            sort,
            low_stock,
            out_of_stock,
            filter,
        } => {
            let (catalog, _) = stockroom_lib::open_catalog(config)?;
            let listed = if let Some(term) = filter {
                catalog.filter(&term)
            } else if low_stock {
                catalog.low_stock()
            } else if out_of_stock {
                catalog.out_of_stock()
            } else {
                catalog.sorted_by(sort)
            };
            print_products(&listed);
            println!(
                "{} of {} products, stock value {}",
                listed.len(),
                catalog.len(),
                format_price(catalog.stock_value())
            );
            Ok(())
        }
        Command::Validate => {
            info!("Validating configuration and stock file");
            let (catalog, store) = stockroom_lib::open_catalog(config)?;
            println!(
                "Configuration valid; {} products in {}",
                catalog.len(),
                store.path().display()
            );
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");
            let default_config = StockroomConfig::default();

            // Create parent directories if they don't exist
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| StockroomError::Custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}

fn update(config: &StockroomConfig, product_id: &str, update: ProductUpdate) -> StockroomResult<()> {
    let (mut catalog, store) = stockroom_lib::open_catalog(config)?;
    catalog.apply_update(product_id, update)?;
    save(&catalog, &store)?;
    print_products(&[catalog.get(product_id)?]);
    Ok(())
}

fn save(catalog: &Catalog, store: &JsonStockFile) -> StockroomResult<()> {
    store.save(catalog.products())?;
    Ok(())
}

fn print_products(products: &[&Product]) {
    for product in products {
        println!(
            "{:<8} {:<30} {:>6} {:>10}  {}  {}",
            product.id(),
            product.name(),
            product.quantity(),
            format_price(product.unit_price()),
            product.expiry_date(),
            product.category().unwrap_or("-")
        );
    }
}

/// Render minor currency units with two decimals.
fn format_price(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}
