use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// eventbook - Event booking API
#[derive(Parser)]
#[command(name = "eventbook")]
#[command(about = "Event booking backend with accounts, events and bookings", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate the database then start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create the database if missing and apply migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Grant or revoke admin access
    SetRole {
        #[arg(long)]
        username: String,

        #[arg(long, value_enum)]
        role: cli::user::Role,
    },
    /// Delete a user with their events and bookings
    Delete {
        #[arg(long)]
        username: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = eventbook::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    eventbook::observability::init_observability(&config.observability)?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cli::migrate::migrate(config).await,
        Commands::Reset => cli::migrate::reset(config).await,
        Commands::User { command } => match command {
            UserCommands::SetRole { username, role } => {
                cli::user::set_role(config, username, role).await
            }
            UserCommands::Delete { username } => cli::user::delete(config, username).await,
        },
    }
}
