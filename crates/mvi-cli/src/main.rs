mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mvi")]
#[command(about = "Vehicle engine inventory tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive login + menu shell (the default when no command is given)
    Shell {
        /// YAML credential file; built-in development accounts when absent
        #[arg(long = "auth-config")]
        auth_config: Option<String>,
    },

    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Audit trail utilities
    Audit {
        #[command(subcommand)]
        cmd: AuditCmd,
    },

    /// Run the reconciliation & exception report once and exit
    Reconcile {
        /// User recorded in the audit summary
        #[arg(long, default_value = "cli")]
        user: String,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    Status,

    /// Apply SQL migrations
    Migrate,
}

#[derive(Subcommand)]
enum AuditCmd {
    /// Print the latest audit entries, newest first
    Recent {
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Dev-time .env bootstrap before anything reads MVI_DATABASE_URL.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        None => commands::shell::run(None).await,
        Some(Commands::Shell { auth_config }) => commands::shell::run(auth_config).await,
        Some(Commands::Db { cmd }) => match cmd {
            DbCmd::Status => commands::db::status().await,
            DbCmd::Migrate => commands::db::migrate().await,
        },
        Some(Commands::Audit { cmd }) => match cmd {
            AuditCmd::Recent { limit } => commands::audit::recent(limit).await,
        },
        Some(Commands::Reconcile { user }) => commands::reconcile::run_once(&user).await,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
