//! Command-line entry point for the item store.
//!
//! Settings come from `ITEMSTORE_*` environment variables; global flags
//! override them. Items are printed as one JSON object per line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use itemstore_core::config::parse_backend;
use itemstore_core::{
    init_logging, Backend, Item, ItemId, ItemSearchCond, ItemStore, ItemUpdateParams, NewItem,
    StoreConfig,
};
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "itemstore", version, about = "Store and search items", long_about = None)]
struct Cli {
    /// Storage backend: memory, sql, named-sql, derived, builder or split
    #[arg(long, global = true, value_parser = parse_backend)]
    backend: Option<Backend>,

    /// SQLite database file (in-memory when omitted)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Save the two sample items before running the command
    #[arg(long, global = true)]
    seed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List items, optionally filtered by name substring and price ceiling
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        max_price: Option<i64>,
    },
    /// Show one item
    Get { id: ItemId },
    /// Add an item and print it with its new id
    Add {
        name: String,
        #[arg(allow_negative_numbers = true)]
        price: i64,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Replace name, price and quantity of an existing item
    Update {
        id: ItemId,
        name: String,
        #[arg(allow_negative_numbers = true)]
        price: i64,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok backend={} command={:?}",
        config.backend, cli.command
    );

    let store = ItemStore::open(&config).context("failed to open item store")?;
    let service = store.service()?;

    let mut out = io::stdout().lock();
    match cli.command {
        Command::List { name, max_price } => {
            let cond = ItemSearchCond {
                item_name: name,
                max_price,
            };
            for item in service.find_items(&cond)? {
                print_item(&mut out, &item)?;
            }
        }
        Command::Get { id } => match service.find_by_id(id)? {
            Some(item) => print_item(&mut out, &item)?,
            None => bail!("item {id} not found"),
        },
        Command::Add {
            name,
            price,
            quantity,
        } => {
            let item = service.save(&NewItem::new(name, price, quantity))?;
            print_item(&mut out, &item)?;
        }
        Command::Update {
            id,
            name,
            price,
            quantity,
        } => {
            service.update(id, &ItemUpdateParams::new(name, price, quantity))?;
            if let Some(item) = service.find_by_id(id)? {
                print_item(&mut out, &item)?;
            }
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = StoreConfig::from_env().context("invalid ITEMSTORE_* environment")?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(db) = cli.db.clone() {
        config.db_path = Some(db);
    }
    if cli.seed {
        config.seed_data = true;
    }
    Ok(config)
}

fn print_item(out: &mut impl Write, item: &Item) -> Result<()> {
    serde_json::to_writer(&mut *out, item)?;
    writeln!(out)?;
    Ok(())
}
