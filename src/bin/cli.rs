//! docmux CLI Client
//!
//! Command-line interface for a document server.

use clap::{Parser, Subcommand};
use docmux::{Client, Command, Condition, Config, IdStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// docmux CLI
#[derive(Parser, Debug)]
#[command(name = "docmux-cli")]
#[command(about = "CLI for JSON document servers")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:1337")]
    server: String,

    /// Reply timeout in milliseconds (0 waits forever)
    #[arg(short, long, default_value = "30000")]
    timeout_ms: u64,

    /// Use timestamp-shaped request identifiers
    #[arg(long)]
    timestamp_ids: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a collection exists
    Exists {
        /// Collection name
        name: String,
    },

    /// Create a collection
    Create {
        /// Collection name
        name: String,
    },

    /// Get a document
    Get {
        /// Collection name
        collection: String,

        /// Document id
        document: String,
    },

    /// Create or replace a document
    Set {
        /// Collection name
        collection: String,

        /// Document id
        document: String,

        /// Document body as JSON
        value: String,
    },

    /// List the documents of a collection
    List {
        /// Collection name
        collection: String,

        /// Filter as `<key> <EQ|GT|LT> <value>`
        #[arg(long = "where", num_args = 3, value_names = ["KEY", "OP", "VALUE"])]
        condition: Option<Vec<String>>,
    },

    /// Delete a collection, or one document of it
    Delete {
        /// Collection name
        collection: String,

        /// Document id
        document: Option<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,docmux=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let command = match build_command(args.command) {
        Ok(command) => command,
        Err(message) => {
            tracing::error!("{}", message);
            std::process::exit(2);
        }
    };

    let config = Config::builder()
        .server_addr(&args.server)
        .request_timeout_ms(args.timeout_ms)
        .id_strategy(if args.timestamp_ids {
            IdStrategy::Timestamp
        } else {
            IdStrategy::Counter
        })
        .build();

    let client = match Client::connect(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    tracing::debug!("Executing: {}", command);

    match client.execute(&command) {
        Ok(data) => match serde_json::to_string_pretty(&data) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                tracing::error!("Failed to render reply: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!("{} failed: {}", command.verb(), e);
            std::process::exit(1);
        }
    }
}

/// Turn CLI arguments into a protocol command
fn build_command(command: Commands) -> Result<Command, String> {
    Ok(match command {
        Commands::Exists { name } => Command::Exists { name },
        Commands::Create { name } => Command::Create { name },
        Commands::Get { collection, document } => Command::Get { collection, document },
        Commands::Set { collection, document, value } => {
            // Validate and compact the body so it survives as one frame
            let parsed: serde_json::Value =
                serde_json::from_str(&value).map_err(|e| format!("Invalid JSON value: {}", e))?;
            Command::set(collection, document, &parsed).map_err(|e| e.to_string())?
        }
        Commands::List { collection, condition } => {
            let condition = match condition.as_deref() {
                None => None,
                Some([key, op, value]) => Some(
                    Condition::from_parts(key, op, value)
                        .ok_or_else(|| format!("Unknown condition operator '{}'", op))?,
                ),
                Some(_) => return Err("--where takes exactly KEY OP VALUE".to_string()),
            };
            Command::List { collection, condition }
        }
        Commands::Delete { collection, document: None } => Command::DeleteCollection { collection },
        Commands::Delete { collection, document: Some(document) } => {
            Command::DeleteDocument { collection, document }
        }
    })
}
