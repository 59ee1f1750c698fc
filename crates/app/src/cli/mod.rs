use beacon_app::{
    auth::PgAuthService,
    database::{self, Db},
};
use clap::{Args, Parser, Subcommand};

mod admin;
mod db;
mod token;

#[derive(Debug, Parser)]
#[command(name = "beacon-app", about = "Beacon admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Admin(admin::AdminCommand),
    Token(token::TokenCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Admin(command) => admin::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        database::connect(&self.database_url, 1)
            .await
            .map(Db::new)
            .map_err(|error| format!("failed to connect to database: {error}"))
    }

    pub(crate) async fn auth_service(&self) -> Result<PgAuthService, String> {
        Ok(PgAuthService::new(self.connect().await?))
    }
}
