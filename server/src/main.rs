mod config;
mod graphql;
mod http;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use platform_authn::{SessionStore, UserDirectory};
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use products_hr::{HrService, HrStore, PatternPolisher};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hr-server", version, about = "FossRust HR profiles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// List the accounts that can log in.
    Users,
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
        Command::Users => list_users(),
        Command::SchemaPrint { output } => schema_print(output),
    };
    shutdown_tracing();
    result
}

fn hr_service() -> Result<HrService> {
    let polisher = PatternPolisher::new().context("failed to compile polish rules")?;
    Ok(HrService::new(
        Arc::new(HrStore::seeded()),
        Arc::new(polisher),
    ))
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = Arc::new(AppConfig::load()?);
    let directory = Arc::new(UserDirectory::demo());
    info!(users = directory.users().len(), "user directory loaded");
    let state = AppState {
        schema: graphql::build_schema(hr_service()?),
        sessions: Arc::new(SessionStore::new(config.session_ttl)),
        config,
        directory,
    };
    http::serve(cmd.into(), state).await
}

fn list_users() -> Result<()> {
    for user in UserDirectory::demo().users() {
        println!(
            "{:<28} {:<9} employee {}",
            user.email,
            user.role.as_str(),
            user.employee_id
        );
    }
    Ok(())
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let target = path.unwrap_or_else(|| PathBuf::from("schema.graphql"));
    let sdl = graphql::build_schema(hr_service()?).sdl();
    std::fs::write(&target, sdl)
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!(path = %target.display(), "schema written");
    Ok(())
}
