use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use bookservice_app::modules::books::price;
use bookservice_app::{BookCodec, CodecOptions, UpdateBookDto};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Encode and validate book update payloads offline
#[derive(Debug, Parser)]
#[command(name = "bookservice-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the JSON encoding of a book update
    Encode {
        #[arg(long)]
        author_name: String,
        #[arg(long)]
        title: String,
        /// Exact decimal price, e.g. 29.99
        #[arg(long, value_parser = parse_price, allow_hyphen_values = true)]
        price: Decimal,
    },
    /// Decode a book update from a file (or stdin) and print its canonical form
    Decode {
        /// Input file; reads stdin when omitted
        path: Option<PathBuf>,
        /// Accept a string-encoded price
        #[arg(long)]
        accept_string_price: bool,
    },
}

fn parse_price(text: &str) -> Result<Decimal, String> {
    price::parse_decimal(text).map_err(|err| format!("'{text}' is not an exact decimal: {err}"))
}

fn read_input(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();

    let settings = bookservice_kernel::settings::Settings::load()
        .with_context(|| "failed to load book service settings")?;
    tracing::debug!(env = ?settings.environment, "settings loaded");

    match cli.command {
        Command::Encode {
            author_name,
            title,
            price,
        } => {
            let codec = BookCodec::new(CodecOptions::from(&settings.codec));
            let dto = UpdateBookDto::new(author_name, title, price);
            println!("{}", codec.encode(&dto)?);
        }
        Command::Decode {
            path,
            accept_string_price,
        } => {
            let mut options = CodecOptions::from(&settings.codec);
            options.accept_string_price |= accept_string_price;
            let codec = BookCodec::new(options);

            let text = read_input(path.as_ref())?;
            let dto = codec.decode(&text).context("invalid book update")?;
            println!("{}", codec.encode(&dto)?);
        }
    }

    Ok(())
}
