//! dynaglue CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dynaglue::cli::{Cli, Commands, OutputFormat};
use dynaglue::output::format_output;
use dynaglue::storage::dynamodb::{create_client, DynamoDbStore};
use dynaglue::ItemClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dynaglue=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "Command failed");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    let table = config.table()?.to_string();
    tracing::debug!(table = %table, target = %config.target_display(), "Using table");

    let client = ItemClient::new(DynamoDbStore::new(create_client(&config).await));

    let output = match cli.command {
        Commands::Create(args) => {
            let item = client.create(&table, args.attributes).await?;
            announce(&cli.format, cli.quiet, "Created:");
            format_output(&item, cli.format)
        }
        Commands::Update(args) => {
            let item = client.update(&table, &args.id, args.patch()).await?;
            announce(&cli.format, cli.quiet, "Updated:");
            format_output(&item, cli.format)
        }
        Commands::Delete(args) => {
            client.delete(&table, &args.id).await?;
            if !cli.quiet {
                println!("Deleted item {}", args.id);
            }
            return Ok(());
        }
        Commands::Query(args) => format_output(&client.query(&table, &args.spec()).await?, cli.format),
        Commands::Scan(args) => format_output(&client.scan(&table, &args.spec()).await?, cli.format),
    };
    println!("{output}");

    Ok(())
}

/// Heading printed above pretty results.
fn announce(format: &OutputFormat, quiet: bool, heading: &str) {
    if *format == OutputFormat::Pretty && !quiet {
        println!("{heading}");
    }
}
