pub mod commands;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::process::ExitCode;
use vitrina_core::domain::product::{NewProduct, ProductPatch};

#[derive(Debug, Parser)]
#[command(
    name = "vitrina",
    about = "Vitrina catalog operator CLI",
    long_about = "Inspect and edit the product catalog file, seed demo data, and check runtime readiness.",
    after_help = "Examples:\n  vitrina list --limit 5\n  vitrina add --title Mate --description Calabaza --price 1500 --thumbnail sin-imagen --code mate01 --stock 3\n  vitrina doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List catalog products in insertion order")]
    List {
        #[arg(long, help = "Only return the first N products")]
        limit: Option<usize>,
    },
    #[command(about = "Show one product by id")]
    Get { id: u64 },
    #[command(about = "Create a product; every field is required and code must be unique")]
    Add(ProductFields),
    #[command(about = "Override the given fields of an existing product")]
    Update {
        id: u64,
        #[command(flatten)]
        fields: ProductFields,
    },
    #[command(about = "Remove a product by id")]
    Delete { id: u64 },
    #[command(about = "Load the ten demo products, skipping codes already present")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate config and catalog file readability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Debug, Default, Args)]
struct ProductFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    thumbnail: Option<String>,
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    stock: Option<u64>,
}

impl From<ProductFields> for NewProduct {
    fn from(fields: ProductFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            price: fields.price,
            thumbnail: fields.thumbnail,
            code: fields.code,
            stock: fields.stock,
        }
    }
}

impl From<ProductFields> for ProductPatch {
    fn from(fields: ProductFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            price: fields.price,
            thumbnail: fields.thumbnail,
            code: fields.code,
            stock: fields.stock,
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::List { limit } => commands::products::list(limit),
        Command::Get { id } => commands::products::get(id),
        Command::Add(fields) => commands::products::add(fields.into()),
        Command::Update { id, fields } => commands::products::update(id, fields.into()),
        Command::Delete { id } => commands::products::delete(id),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
