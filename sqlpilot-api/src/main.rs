use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlpilot_api::config::ApiConfig;
use sqlpilot_api::handlers;
use sqlpilot_api::helpers::{database, llm};
use sqlpilot_tools::{execute_statement, format_outcome, DatabaseConnector};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Schema-grounded SQL generation against a local model and a MySQL database
#[derive(Parser)]
#[command(name = "sqlpilot", version)]
#[command(about = "Generate MySQL statements from plain language and run them on request")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default)
    Serve,
    /// Print the schema description given to the model
    Schema,
    /// Generate a candidate statement without running it
    Generate {
        /// What the statement should do
        #[arg(short, long)]
        prompt: String,
    },
    /// Run a statement and print the result
    Execute {
        /// Statement to run
        #[arg(short, long)]
        sql: String,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (config, config_path) =
        ApiConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!(path = %config_path.display(), "Loaded configuration");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Schema => {
            let schema = database::load_schema(&config).await?;
            println!("{}", schema);
            Ok(())
        }
        Commands::Generate { prompt } => {
            let schema = Arc::new(database::load_schema(&config).await?);
            let agent = llm::create_agent(&config, schema)?;
            let generated = agent.generate(&prompt).await?;
            println!("{}", generated.sql);
            Ok(())
        }
        Commands::Execute { sql } => {
            let connector = database::create_connector(&config);
            let outcome = execute_statement(connector.as_ref(), Some(&sql)).await?;
            println!("{}", format_outcome(&outcome));
            Ok(())
        }
    }
}

async fn serve(config: ApiConfig) -> anyhow::Result<()> {
    let schema = Arc::new(database::load_schema(&config).await?);
    let agent = Arc::new(llm::create_agent(&config, schema)?);
    let connector: Arc<dyn DatabaseConnector> = database::create_connector(&config);

    let bind_addr = config.bind_addr();
    info!(
        provider = %agent.provider_name(),
        model = %agent.model_name(),
        "Starting sqlpilot server at http://{}",
        bind_addr
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(agent.clone()))
            .app_data(web::Data::new(connector.clone()))
            .configure(handlers::configure)
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
