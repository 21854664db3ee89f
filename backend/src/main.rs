//! matrixops CLI - serve matrix operations over HTTP
//!
//! # Commands
//!
//! ```bash
//! matrixops serve --port 8080           # Start HTTP server (or PORT=8080 in env/.env)
//! matrixops apply sum matrix.csv        # Run one operation on a local CSV file
//! matrixops operations                  # List operations and their routes
//! ```
//!
//! Send requests with:
//!
//! ```bash
//! curl -F 'file=@/path/matrix.csv' "localhost:8080/echo"
//! ```

use clap::{Parser, Subcommand};
use matrixops::api::ingest::ingest_bytes;
use matrixops::{Operation, ServerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "matrixops")]
#[command(about = "Echo, invert, flatten, sum and multiply CSV matrices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        #[command(flatten)]
        config: ServerConfig,
    },

    /// Run one operation on a local CSV file and print the result
    Apply {
        /// Operation to run
        #[arg(value_enum)]
        operation: Operation,

        /// Input CSV file
        input: PathBuf,
    },

    /// Show available operations
    Operations,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matrixops=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config } => cmd_serve(config).await,
        Commands::Apply { operation, input } => cmd_apply(operation, &input),
        Commands::Operations => cmd_operations(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    matrixops::server::start_server(config).await
}

fn cmd_apply(operation: Operation, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(%operation, input = %input.display(), "Applying operation");

    let bytes = fs::read(input)?;
    // Client errors print their detail only; the cause goes to the log.
    let matrix = ingest_bytes(&bytes).map_err(|e| {
        tracing::debug!(error = %e, "Ingestion failed");
        e.detail().to_string()
    })?;
    let output = operation
        .apply(Some(&matrix))
        .map_err(|e| match e.detail() {
            Some(detail) => {
                tracing::debug!(error = %e, "Operation failed");
                detail.to_string()
            }
            None => e.to_string(),
        })?;

    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn cmd_operations() -> Result<(), Box<dyn std::error::Error>> {
    for operation in Operation::ALL {
        println!("  POST {:<10} {}", operation.path(), operation_summary(operation));
    }
    Ok(())
}

fn operation_summary(operation: Operation) -> &'static str {
    match operation {
        Operation::Echo => "matrix as uploaded",
        Operation::Invert => "rows and columns swapped",
        Operation::Flatten => "all cells on one line",
        Operation::Sum => "sum of all cells",
        Operation::Multiply => "product of all cells",
    }
}
