mod export;
mod import;
#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "medcat-cli")]
#[command(about = "MedsWell catalogue command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bulk-import products from block-formatted catalogue text
    Import {
        /// File with pasted product blocks; use '-' to read stdin
        file: String,
        /// Fail the whole import on the first malformed block instead of
        /// skipping it
        #[arg(long)]
        strict: bool,
        /// Parse and validate without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Export the catalogue as a CSV document
    Export {
        /// Output path; writes to stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Database administration
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Import {
            file,
            strict,
            dry_run,
        }) => {
            let pool = medcat_db::connect_pool_from_env().await?;
            import::run_import(&pool, &file, strict, dry_run).await?;
        }
        Some(Commands::Export { output }) => {
            let pool = medcat_db::connect_pool_from_env().await?;
            export::run_export(&pool, output.as_deref()).await?;
        }
        Some(Commands::Db { command }) => {
            let pool = medcat_db::connect_pool_from_env().await?;
            match command {
                DbCommands::Ping => {
                    medcat_db::ping(&pool).await?;
                    println!("database is reachable");
                }
                DbCommands::Migrate => {
                    let applied = medcat_db::run_migrations(&pool).await?;
                    println!("applied {applied} migrations");
                }
            }
        }
        None => println!("medcat-cli: pass a subcommand, see --help"),
    }

    Ok(())
}
