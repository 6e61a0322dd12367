use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    FormController, ListingGateway, MissingListingGateway, Notification, RpcListingGateway,
    SubmitError,
};
use shared::domain::{Tag, TimeSlot};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod listing_file;

use config::{load_settings, Settings};
use listing_file::ListingFile;

#[derive(Parser, Debug)]
#[command(
    name = "listing",
    about = "Validate and submit business listings to the listing backend",
    version
)]
struct Cli {
    /// Settings file; defaults to ./listing.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the selectable tags and opening times
    Options,
    /// Print a listing file pre-filled with the form defaults
    Template,
    /// Check a listing file without submitting it
    Validate { file: PathBuf },
    /// Validate a listing file and submit it to the backend
    Submit { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    init_tracing(&settings)?;

    match cli.command {
        Command::Options => print_options(),
        Command::Template => {
            let rendered = toml::to_string_pretty(&ListingFile::template())
                .context("failed to render listing template")?;
            print!("{rendered}");
        }
        Command::Validate { file } => {
            let controller = load_controller(&file)?;
            let errors = controller.validate();
            if !errors.is_empty() {
                print_field_errors(errors.iter().map(|(key, _)| key));
                bail!("listing has {} invalid field(s)", errors.len());
            }
            println!("Listing is valid.");
        }
        Command::Submit { file } => {
            let mut controller = load_controller(&file)?;
            let gateway = build_gateway(&settings)?;
            submit(&mut controller, gateway.as_ref()).await?;
        }
    }

    Ok(())
}

fn init_tracing(settings: &Settings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.log_level)
            .with_context(|| format!("invalid log level '{}'", settings.log_level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn build_gateway(settings: &Settings) -> Result<Box<dyn ListingGateway>> {
    match settings.gateway_config()? {
        Some(config) => {
            let gateway = RpcListingGateway::new(config)?;
            info!(endpoint = %gateway.endpoint(), "using listing backend");
            Ok(Box::new(gateway))
        }
        None => Ok(Box::new(MissingListingGateway)),
    }
}

fn load_controller(path: &std::path::Path) -> Result<FormController> {
    let file = ListingFile::load(path)?;
    let mut controller = FormController::new();
    file.apply_to(&mut controller)?;
    Ok(controller)
}

async fn submit(controller: &mut FormController, gateway: &dyn ListingGateway) -> Result<()> {
    let result = controller.submit(gateway).await;

    if let Some(notification) = controller.take_notification() {
        match notification {
            Notification::Success(message) => println!("{message}"),
            Notification::Failure { message } => {
                println!("Error saving business listing: {message}")
            }
        }
    }

    match result {
        Ok(()) => Ok(()),
        Err(SubmitError::Invalid(errors)) => {
            print_field_errors(errors.iter().map(|(key, _)| key));
            bail!("listing has {} invalid field(s); nothing was submitted", errors.len())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_field_errors(keys: impl Iterator<Item = shared::domain::FieldKey>) {
    for key in keys {
        println!("{}", key.label());
        println!("  {}", key.message());
    }
}

fn print_options() {
    println!("Tags:");
    for tag in Tag::ALL {
        println!("  {tag}");
    }
    println!("Opening times:");
    let slots: Vec<String> = TimeSlot::all().map(String::from).collect();
    println!("  {}", slots.join(", "));
}
