use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use wts_connector::{
    dispatcher, node_registry, ApiClient, FieldValues, Operation, ResolverRegistry, Resource,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "WTS Chat connector", long_about = None)]
struct Args {
    /// API base URL
    #[arg(long, default_value = ApiClient::DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token (falls back to the WTS_TOKEN environment variable)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dump the node schema: resources, operations and field definitions
    Describe,
    /// Execute one operation
    Run {
        /// Resource (contact, message, session, panel)
        #[arg(short, long)]
        resource: String,
        /// Operation id, e.g. getContactById
        #[arg(short, long)]
        operation: String,
        /// Path to a JSON object of field values
        #[arg(short, long)]
        fields: Option<PathBuf>,
    },
    /// Load the options of a selector field
    Options {
        /// Resolver name, e.g. getDepartmentsIds
        #[arg(short, long)]
        resolver: String,
        /// Path to a JSON object of field values (for dependent resolvers)
        #[arg(short, long)]
        fields: Option<PathBuf>,
    },
}

fn load_fields(path: Option<PathBuf>) -> Result<FieldValues> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)?;
            Ok(FieldValues::from_value(value))
        }
        None => Ok(FieldValues::new()),
    }
}

fn token(args_token: Option<String>) -> Result<String> {
    if let Some(token) = args_token {
        return Ok(token);
    }
    match std::env::var("WTS_TOKEN") {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => bail!("no credential: pass --token or set WTS_TOKEN"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match args.command {
        Commands::Describe => {
            println!("{}", serde_json::to_string_pretty(&node_registry::describe())?);
        }
        Commands::Run {
            resource,
            operation,
            fields,
        } => {
            let resource = Resource::parse(&resource)
                .with_context(|| format!("unknown resource: {}", resource))?;
            let operation = Operation::parse(&operation)
                .with_context(|| format!("unknown operation: {}", operation))?;
            let fields = load_fields(fields)?;
            let client = ApiClient::new(args.base_url, token(args.token)?);

            let records = dispatcher::execute(&client, resource, operation, &fields).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Options { resolver, fields } => {
            let fields = load_fields(fields)?;
            let client = ApiClient::new(args.base_url, token(args.token)?);
            let registry = ResolverRegistry::new();

            let options = registry.resolve(&resolver, &client, &fields).await?;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
    }

    Ok(())
}
